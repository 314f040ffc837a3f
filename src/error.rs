use thiserror::Error;

/// Failures while reading distance tables, package files or fleet plans.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },

    #[error("{0} contains no data rows")]
    Empty(&'static str),

    #[error("hub address '{0}' not found in distance table")]
    MissingHub(String),

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Invariant violations when building a [`crate::distance::DistanceDirectory`].
#[derive(Debug, Error, PartialEq)]
pub enum DirectoryError {
    #[error("{addresses} addresses but matrix has {rows} rows")]
    LengthMismatch { addresses: usize, rows: usize },

    #[error("matrix row {row} has {len} columns, expected {expected}")]
    NotSquare { row: usize, len: usize, expected: usize },

    #[error("distance at ({row}, {col}) is {value}, expected a finite non-negative number")]
    InvalidDistance { row: usize, col: usize, value: f64 },

    #[error("distance table has no locations")]
    NoLocations,
}

#[derive(Debug, Error, PartialEq)]
pub enum DispatchError {
    #[error("truck {truck} has no start time and driver {driver} has not run a route yet")]
    MissingStartTime { truck: u32, driver: u32 },

    #[error("truck {truck} finished with non-finite mileage; check unresolved addresses")]
    NonFiniteMileage { truck: u32 },

    #[error("truck {truck} speed must be a positive finite number")]
    InvalidSpeed { truck: u32 },
}
