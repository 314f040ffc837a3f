use std::fmt;

use crate::domain::time::SimTime;

pub type PackageId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageStatus {
    AtHub,
    EnRoute,
    Delivered,
}

impl fmt::Display for PackageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PackageStatus::AtHub => "At Hub",
            PackageStatus::EnRoute => "En Route",
            PackageStatus::Delivered => "Delivered",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    pub id: PackageId,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub deadline: String,
    pub weight: f64,
    pub notes: String,

    pub status: PackageStatus,
    pub departure_time: Option<SimTime>,
    pub delivery_time: Option<SimTime>,
}

impl Package {
    /// A freshly loaded package: at the hub, no timestamps.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: PackageId,
        address: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        zip: impl Into<String>,
        deadline: impl Into<String>,
        weight: f64,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            id,
            address: address.into(),
            city: city.into(),
            state: state.into(),
            zip: zip.into(),
            deadline: deadline.into(),
            weight,
            notes: notes.into(),
            status: PackageStatus::AtHub,
            departure_time: None,
            delivery_time: None,
        }
    }

    /// Deadline as a time of day; `None` for "EOD" or anything unparsable.
    pub fn deadline_time(&self) -> Option<SimTime> {
        SimTime::parse(&self.deadline)
    }

    /// `None` until delivered. Packages without a timed deadline are always on time.
    pub fn delivered_on_time(&self) -> Option<bool> {
        let delivered = self.delivery_time?;
        Some(match self.deadline_time() {
            Some(deadline) => delivered <= deadline,
            None => delivered.is_finite(),
        })
    }

    /// Status as it would have been observed at `time`, reconstructed from the timestamps.
    pub fn status_at(&self, time: SimTime) -> PackageStatus {
        match (self.departure_time, self.delivery_time) {
            (_, Some(delivered)) if delivered <= time => PackageStatus::Delivered,
            (Some(departed), _) if departed <= time => PackageStatus::EnRoute,
            _ => PackageStatus::AtHub,
        }
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Package ID: {}, Address: {}, Deadline: {}, Weight: {}, Status: {}, ",
            self.id, self.address, self.deadline, self.weight, self.status
        )?;
        match self.delivery_time {
            Some(time) => write!(f, "Delivered at: {time}"),
            None => write!(f, "Not Delivered"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package(deadline: &str) -> Package {
        Package::new(1, "195 W Oakland Ave", "Salt Lake City", "UT", "84115", deadline, 21.0, "")
    }

    #[test]
    fn new_package_waits_at_hub() {
        let p = package("EOD");
        assert_eq!(p.status, PackageStatus::AtHub);
        assert_eq!(p.departure_time, None);
        assert_eq!(p.delivery_time, None);
        assert_eq!(p.delivered_on_time(), None);
    }

    #[test]
    fn on_time_against_timed_deadline() {
        let mut p = package("10:30 AM");
        p.delivery_time = Some(SimTime::from_hms(10, 30, 0));
        assert_eq!(p.delivered_on_time(), Some(true));

        p.delivery_time = Some(SimTime::from_hms(10, 31, 0));
        assert_eq!(p.delivered_on_time(), Some(false));
    }

    #[test]
    fn status_reconstructed_from_timestamps() {
        let mut p = package("EOD");
        p.status = PackageStatus::Delivered;
        p.departure_time = Some(SimTime::from_hms(8, 0, 0));
        p.delivery_time = Some(SimTime::from_hms(9, 0, 0));

        assert_eq!(p.status_at(SimTime::from_hms(7, 59, 0)), PackageStatus::AtHub);
        assert_eq!(p.status_at(SimTime::from_hms(8, 30, 0)), PackageStatus::EnRoute);
        assert_eq!(p.status_at(SimTime::from_hms(9, 0, 0)), PackageStatus::Delivered);
    }

    #[test]
    fn display_mentions_delivery() {
        let mut p = package("EOD");
        assert!(p.to_string().ends_with("Status: At Hub, Not Delivered"));

        p.status = PackageStatus::Delivered;
        p.delivery_time = Some(SimTime::from_hms(9, 15, 0));
        assert!(p.to_string().ends_with("Delivered at: 09:15:00"));
    }
}
