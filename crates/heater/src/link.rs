use serde_json::{json, Map, Value};

use crate::{DataPoint, HeaterError, Result};

/// Transport to a single device.
///
/// `status` returns the raw status payload (`{"dps": {...}}`) and `set_value`
/// writes one data point.
pub trait DeviceLink {
    fn status(&mut self) -> Result<Value>;

    fn set_value(&mut self, dp: DataPoint, value: Value) -> Result<()>;
}

impl<L: DeviceLink + ?Sized> DeviceLink for Box<L> {
    fn status(&mut self) -> Result<Value> {
        (**self).status()
    }

    fn set_value(&mut self, dp: DataPoint, value: Value) -> Result<()> {
        (**self).set_value(dp, value)
    }
}

const AMBIENT_TEMP: f64 = 15.0;
const DRIFT_PER_POLL: f64 = 0.5;

/// In-memory heater.
///
/// Every status poll moves the measured temperature toward the target while
/// powered, and toward ambient otherwise.
#[derive(Debug, Clone)]
pub struct SimulatedLink {
    power: bool,
    target: f64,
    current: f64,
    light: bool,
    online: bool,
}

impl SimulatedLink {
    pub fn new(current: f64, target: f64) -> Self {
        SimulatedLink {
            power: true,
            target,
            current,
            light: true,
            online: true,
        }
    }

    /// Make the device (un)reachable.
    pub fn set_online(&mut self, online: bool) {
        self.online = online;
    }

    fn ensure_online(&self) -> Result<()> {
        if self.online {
            Ok(())
        } else {
            Err(HeaterError::Link("device unreachable".to_string()))
        }
    }

    fn drift(&mut self) {
        let goal = if self.power { self.target } else { AMBIENT_TEMP };
        let delta = goal - self.current;
        if delta.abs() <= DRIFT_PER_POLL {
            self.current = goal;
        } else {
            self.current += DRIFT_PER_POLL.copysign(delta);
        }
    }
}

impl DeviceLink for SimulatedLink {
    fn status(&mut self) -> Result<Value> {
        self.ensure_online()?;

        let mut dps = Map::new();
        dps.insert(DataPoint::Power.code().to_string(), json!(self.power));
        dps.insert(DataPoint::TargetTemp.code().to_string(), json!(self.target));
        dps.insert(DataPoint::CurrentTemp.code().to_string(), json!(self.current));
        dps.insert(DataPoint::Light.code().to_string(), json!(self.light));

        let payload = json!({ "dps": dps });
        self.drift();
        Ok(payload)
    }

    fn set_value(&mut self, dp: DataPoint, value: Value) -> Result<()> {
        self.ensure_online()?;

        let invalid = || HeaterError::Link(format!("invalid value {value} for data point {dp}"));
        match dp {
            DataPoint::Power => self.power = value.as_bool().ok_or_else(invalid)?,
            DataPoint::TargetTemp => self.target = value.as_f64().ok_or_else(invalid)?,
            DataPoint::Light => self.light = value.as_bool().ok_or_else(invalid)?,
            DataPoint::CurrentTemp => {
                return Err(HeaterError::Link(format!("data point {dp} is read-only")))
            }
        }
        Ok(())
    }
}
