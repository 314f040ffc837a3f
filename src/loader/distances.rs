use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use tracing::{debug, info};

use crate::distance::DistanceDirectory;
use crate::error::LoadError;

/// Reads a distance table CSV from disk. See [`read_distance_table`].
pub fn load_distance_csv(path: impl AsRef<Path>, hub: &str) -> Result<DistanceDirectory, LoadError> {
    let reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_path(path.as_ref())?;
    info!("Loading distance table from {}", path.as_ref().display());
    build_directory(reader, hub)
}

/// Parses rows of `address, d0, d1, ...` into a directory with `hub` at index 0.
///
/// Blank cells count as 0 and the matrix is mirrored, so a lower-triangular
/// table is accepted as-is.
pub fn read_distance_table<R: Read>(source: R, hub: &str) -> Result<DistanceDirectory, LoadError> {
    let reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(source);
    build_directory(reader, hub)
}

fn build_directory<R: Read>(mut reader: csv::Reader<R>, hub: &str) -> Result<DistanceDirectory, LoadError> {
    let mut addresses = vec![];
    let mut raw_rows: Vec<(usize, Vec<f64>)> = vec![];

    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let Some(label) = record.get(0) else {
            continue;
        };
        if label.is_empty() {
            continue;
        }
        addresses.push(clean_address(label));

        let mut values = vec![];
        for cell in record.iter().skip(1) {
            if cell.is_empty() {
                values.push(0.0);
                continue;
            }
            let value: f64 = cell.parse().map_err(|_| LoadError::MalformedRow {
                row,
                reason: format!("'{cell}' is not a distance"),
            })?;
            values.push(value);
        }
        while values.last() == Some(&0.0) {
            values.pop();
        }
        raw_rows.push((row, values));
    }

    let n = addresses.len();
    if n == 0 {
        return Err(LoadError::Empty("distance table"));
    }

    let mut matrix = vec![vec![0.0; n]; n];
    for (i, (row, values)) in raw_rows.iter().enumerate() {
        if values.len() > n {
            return Err(LoadError::MalformedRow {
                row: *row,
                reason: format!("{} distances for {} locations", values.len(), n),
            });
        }
        matrix[i][..values.len()].copy_from_slice(values);
    }
    symmetrize(&mut matrix);

    let hub_index = addresses
        .iter()
        .position(|a| a == hub.trim())
        .ok_or_else(|| LoadError::MissingHub(hub.to_string()))?;
    if hub_index != 0 {
        debug!("Moving hub from row {} to row 0", hub_index);
        let (addresses_sorted, matrix_sorted) = move_to_front(&addresses, &matrix, hub_index);
        addresses = addresses_sorted;
        matrix = matrix_sorted;
    }

    info!("Distance data loaded. Total locations: {}", n);
    Ok(DistanceDirectory::new(addresses, matrix)?)
}

/// Street line of a table label: the second line of a multi-line cell, without a `(zip)` suffix.
fn clean_address(label: &str) -> String {
    let lines: Vec<&str> = label.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    let street = match lines.as_slice() {
        [_, street, ..] => *street,
        [only] => *only,
        [] => "",
    };
    street.split('(').next().unwrap_or_default().trim().to_string()
}

fn symmetrize(matrix: &mut [Vec<f64>]) {
    let n = matrix.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let d = matrix[i][j].max(matrix[j][i]);
            matrix[i][j] = d;
            matrix[j][i] = d;
        }
    }
}

fn move_to_front(
    addresses: &[String],
    matrix: &[Vec<f64>],
    index: usize,
) -> (Vec<String>, Vec<Vec<f64>>) {
    let order: Vec<usize> = std::iter::once(index)
        .chain((0..addresses.len()).filter(|&i| i != index))
        .collect();
    let addresses = order.iter().map(|&i| addresses[i].clone()).collect();
    let matrix = order
        .iter()
        .map(|&i| order.iter().map(|&j| matrix[i][j]).collect())
        .collect();
    (addresses, matrix)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HUB: &str = "4001 South 700 East";

    #[test]
    fn lower_triangular_table_is_mirrored() {
        let csv = "\
4001 South 700 East,0
1060 Dalton Ave S,7.2,0
1330 2100 S,3.8,7.1,0
";
        let dir = read_distance_table(csv.as_bytes(), HUB).unwrap();

        assert_eq!(dir.len(), 3);
        assert_eq!(dir.hub(), HUB);
        assert_eq!(dir.distance(HUB, "1330 2100 S"), 3.8);
        assert_eq!(dir.distance("1060 Dalton Ave S", "1330 2100 S"), 7.1);
        assert_eq!(dir.distance("1330 2100 S", "1060 Dalton Ave S"), 7.1);
        assert!(dir.is_symmetric());
    }

    #[test]
    fn hub_is_moved_to_front() {
        let csv = "\
1060 Dalton Ave S,0,7.2,5.0
4001 South 700 East,7.2,0,3.8
1330 2100 S,5.0,3.8,0
";
        let dir = read_distance_table(csv.as_bytes(), HUB).unwrap();

        assert_eq!(dir.addresses(), &[HUB, "1060 Dalton Ave S", "1330 2100 S"]);
        assert_eq!(dir.distance(HUB, "1060 Dalton Ave S"), 7.2);
        assert_eq!(dir.distance(HUB, "1330 2100 S"), 3.8);
        assert_eq!(dir.distance("1060 Dalton Ave S", "1330 2100 S"), 5.0);
    }

    #[test]
    fn errors_report_the_csv_record_number() {
        let csv = "\
,header,row
4001 South 700 East,0
1060 Dalton Ave S,7.2,0,1.0,2.0
";
        assert!(matches!(
            read_distance_table(csv.as_bytes(), HUB),
            Err(LoadError::MalformedRow { row: 2, .. })
        ));
    }

    #[test]
    fn labels_are_cleaned() {
        assert_eq!(clean_address("Western Governors University\n4001 South 700 East"), HUB);
        assert_eq!(clean_address(" 1330 2100 S (84106) "), "1330 2100 S");
    }

    #[test]
    fn rejects_bad_tables() {
        assert!(matches!(
            read_distance_table("1060 Dalton Ave S,0\n".as_bytes(), HUB),
            Err(LoadError::MissingHub(_))
        ));
        assert!(matches!(
            read_distance_table("4001 South 700 East,zero\n".as_bytes(), HUB),
            Err(LoadError::MalformedRow { row: 0, .. })
        ));
        assert!(matches!(
            read_distance_table("4001 South 700 East,0,1,2\n".as_bytes(), HUB),
            Err(LoadError::MalformedRow { .. })
        ));
        assert!(matches!(
            read_distance_table("".as_bytes(), HUB),
            Err(LoadError::Empty(_))
        ));
    }
}
