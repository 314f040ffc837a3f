use serde::Deserialize;

use crate::config::constant;
use crate::domain::package::PackageId;
use crate::domain::time::SimTime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectedAddress {
    pub address: String,
    pub zip: String,
}

/// Time-gated replacement of a package's delivery address.
///
/// Consulted once per delivery, after the package is selected and before the
/// truck leaves for it.
pub trait AddressCorrection {
    fn correction_for(&self, package_id: PackageId, now: SimTime) -> Option<CorrectedAddress>;
}

/// Never corrects anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCorrection;

impl AddressCorrection for NoCorrection {
    fn correction_for(&self, _: PackageId, _: SimTime) -> Option<CorrectedAddress> {
        None
    }
}

/// A single package whose correct address becomes known at `available_at`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimedAddressCorrection {
    pub package_id: PackageId,
    pub available_at: SimTime,
    pub address: String,
    pub zip: String,
}

impl TimedAddressCorrection {
    /// Package 9's address fix, available from 10:20.
    pub fn package_nine() -> Self {
        Self {
            package_id: constant::CORRECTED_PACKAGE_ID,
            available_at: SimTime::parse(constant::CORRECTION_AVAILABLE_AT)
                .unwrap_or(SimTime::from_hms(10, 20, 0)),
            address: constant::CORRECTED_ADDRESS.to_string(),
            zip: constant::CORRECTED_ZIP.to_string(),
        }
    }
}

impl AddressCorrection for TimedAddressCorrection {
    fn correction_for(&self, package_id: PackageId, now: SimTime) -> Option<CorrectedAddress> {
        (package_id == self.package_id && now >= self.available_at).then(|| CorrectedAddress {
            address: self.address.clone(),
            zip: self.zip.clone(),
        })
    }
}

/// First matching rule wins.
impl<C: AddressCorrection> AddressCorrection for [C] {
    fn correction_for(&self, package_id: PackageId, now: SimTime) -> Option<CorrectedAddress> {
        self.iter().find_map(|rule| rule.correction_for(package_id, now))
    }
}

impl<C: AddressCorrection> AddressCorrection for Vec<C> {
    fn correction_for(&self, package_id: PackageId, now: SimTime) -> Option<CorrectedAddress> {
        self.as_slice().correction_for(package_id, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gated_by_package_and_time() {
        let rule = TimedAddressCorrection::package_nine();
        let before = SimTime::from_hms(10, 19, 59);
        let at = SimTime::from_hms(10, 20, 0);

        assert_eq!(rule.correction_for(9, before), None);
        assert_eq!(rule.correction_for(8, at), None);
        assert_eq!(
            rule.correction_for(9, at),
            Some(CorrectedAddress {
                address: "410 S State St".to_string(),
                zip: "84111".to_string(),
            })
        );
    }

    #[test]
    fn first_matching_rule_wins() {
        let rules = vec![
            TimedAddressCorrection {
                package_id: 4,
                available_at: SimTime::from_hms(9, 0, 0),
                address: "first".to_string(),
                zip: "1".to_string(),
            },
            TimedAddressCorrection {
                package_id: 4,
                available_at: SimTime::from_hms(8, 0, 0),
                address: "second".to_string(),
                zip: "2".to_string(),
            },
        ];

        let early = rules.correction_for(4, SimTime::from_hms(8, 30, 0)).unwrap();
        assert_eq!(early.address, "second");
        let late = rules.correction_for(4, SimTime::from_hms(9, 30, 0)).unwrap();
        assert_eq!(late.address, "first");
        assert_eq!(NoCorrection.correction_for(4, SimTime::from_hms(23, 0, 0)), None);
    }
}
