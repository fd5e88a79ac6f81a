// Heater: device model and control for Kesser/Tuya heaters
// Copyright 2024

mod config;
mod control;
mod device;
mod dps;
mod error;
mod history;
mod link;
mod snapshot;

pub use config::HeaterConfig;
pub use control::{HeaterControl, SharedHeater};
pub use device::{load_devices, parse_devices, DeviceRecord, KESSER_HEATER_PRODUCT_ID};
pub use dps::{DataPoint, HeaterStatus};
pub use error::HeaterError;
pub use history::{TemperatureHistory, TemperatureSample, GRAPH_MAX_TEMP, GRAPH_MIN_TEMP};
pub use link::{DeviceLink, SimulatedLink};
pub use snapshot::HeaterSnapshot;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HeaterError>;
