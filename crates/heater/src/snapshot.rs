use serde::{Deserialize, Serialize};

use crate::TemperatureSample;

/// Everything the panel needs to draw one heater.
///
/// `id` addresses the device; `name` is only for display and need not be
/// unique. Temperatures are `None` until the device has been reached once.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeaterSnapshot {
    pub id: String,
    pub name: String,
    pub set_temp: Option<f64>,
    pub current_temp: Option<f64>,
    pub is_light_on: bool,
    pub is_on: bool,
    pub is_online: bool,
    pub history: Vec<TemperatureSample>,
}
