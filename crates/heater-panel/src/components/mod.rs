pub mod heater;
pub mod temperature_graph;

pub use self::heater::{Heater, HeaterActions, HeaterButton, HeaterLabels};
pub use self::temperature_graph::TemperatureGraph;
