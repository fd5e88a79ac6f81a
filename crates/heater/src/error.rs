use thiserror::Error;

/// Everything that can go wrong while loading, reading or commanding a heater.
#[derive(Debug, Error)]
pub enum HeaterError {
    #[error("failed to read device list: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The device answered without a `dps` object.
    #[error("failed to retrieve status")]
    NoStatus,

    #[error("data point {0} missing from status")]
    MissingDataPoint(&'static str),

    #[error("data point {0} has an unexpected type")]
    InvalidDataPoint(&'static str),

    #[error("temperature {requested}°C out of range ({min}..={max}°C)")]
    OutOfRange { requested: f64, min: f64, max: f64 },

    #[error("heater {0} is offline")]
    Offline(String),

    #[error("device link error: {0}")]
    Link(String),

    #[error("no heater named {0}")]
    UnknownHeater(String),
}
