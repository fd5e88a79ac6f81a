use serde_json::Value;
use std::fmt;

use crate::{HeaterError, Result};

/// Tuya data points exposed by the Kesser heater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataPoint {
    Power,
    TargetTemp,
    CurrentTemp,
    Light,
}

impl DataPoint {
    /// The key used for this data point in the `dps` object.
    pub fn code(self) -> &'static str {
        match self {
            DataPoint::Power => "1",
            DataPoint::TargetTemp => "2",
            DataPoint::CurrentTemp => "3",
            DataPoint::Light => "101",
        }
    }
}

impl fmt::Display for DataPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Decoded heater status.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaterStatus {
    pub power: bool,
    pub set_temp: f64,
    pub current_temp: f64,
    pub light: bool,
}

impl HeaterStatus {
    /// Decode a status payload of the form `{"dps": {"1": true, "2": 22, ...}}`.
    ///
    /// The light data point is optional; older firmware does not report it.
    pub fn from_payload(payload: &Value) -> Result<Self> {
        let dps = payload.get("dps").ok_or(HeaterError::NoStatus)?;

        Ok(HeaterStatus {
            power: bool_dp(dps, DataPoint::Power)?,
            set_temp: number_dp(dps, DataPoint::TargetTemp)?,
            current_temp: number_dp(dps, DataPoint::CurrentTemp)?,
            light: match dps.get(DataPoint::Light.code()) {
                Some(_) => bool_dp(dps, DataPoint::Light)?,
                None => false,
            },
        })
    }

    /// Human readable status block.
    pub fn summary(&self) -> String {
        format!(
            "Heater Status:\n Power: {}\n Current Temp: {}°C\n Target Temp: {}°C\n",
            if self.power { "ON" } else { "OFF" },
            self.current_temp,
            self.set_temp,
        )
    }
}

fn bool_dp(dps: &Value, dp: DataPoint) -> Result<bool> {
    dps.get(dp.code())
        .ok_or(HeaterError::MissingDataPoint(dp.code()))?
        .as_bool()
        .ok_or(HeaterError::InvalidDataPoint(dp.code()))
}

fn number_dp(dps: &Value, dp: DataPoint) -> Result<f64> {
    dps.get(dp.code())
        .ok_or(HeaterError::MissingDataPoint(dp.code()))?
        .as_f64()
        .ok_or(HeaterError::InvalidDataPoint(dp.code()))
}
