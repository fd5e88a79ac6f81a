use serde_json::json;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    DataPoint, DeviceLink, HeaterConfig, HeaterError, HeaterSnapshot, HeaterStatus, Result,
    TemperatureHistory, TemperatureSample,
};

/// A single heater behind a [`DeviceLink`].
///
/// Keeps the last known status and a bounded temperature history. The heater
/// counts as online from the first successful refresh until a refresh fails;
/// commands are refused while it is offline.
pub struct HeaterControl<L: DeviceLink> {
    id: String,
    name: String,
    link: L,
    config: HeaterConfig,
    status: Option<HeaterStatus>, // Last successfully decoded status
    online: bool,
    history: TemperatureHistory,
}

impl<L: DeviceLink> HeaterControl<L> {
    /// Create a controller. Nothing is read from the device until [`refresh`](Self::refresh).
    ///
    /// The device id defaults to the name; see [`with_id`](Self::with_id).
    pub fn new(name: impl Into<String>, link: L, config: HeaterConfig) -> Self {
        let name = name.into();
        let history = TemperatureHistory::new(config.history_len());
        HeaterControl {
            id: name.clone(),
            name,
            link,
            config,
            status: None,
            online: false,
            history,
        }
    }

    /// Set the device id used to address this heater.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    /// Last known status, if the device was ever reached.
    pub fn status(&self) -> Option<HeaterStatus> {
        self.status
    }

    pub fn history(&self) -> &TemperatureHistory {
        &self.history
    }

    /// Poll the device.
    ///
    /// On failure the heater goes offline but keeps its last known
    /// temperatures.
    pub fn refresh(&mut self) -> Result<HeaterStatus> {
        let result = self
            .link
            .status()
            .and_then(|payload| HeaterStatus::from_payload(&payload));

        match result {
            Ok(status) => {
                if !self.online {
                    log::info!("{} is online", self.name);
                }
                self.online = true;
                self.status = Some(status);
                self.history.push(TemperatureSample {
                    current: status.current_temp,
                    set: status.set_temp,
                });
                log::debug!("{}: {:?}", self.name, status);
                Ok(status)
            }
            Err(e) => {
                if self.online {
                    log::warn!("{} went offline: {}", self.name, e);
                }
                self.online = false;
                Err(e)
            }
        }
    }

    /// Set the target temperature.
    pub fn set_temperature(&mut self, temp: f64) -> Result<()> {
        self.online_status()?;
        if !self.config.contains(temp) {
            log::warn!("{}: temperature {}°C out of range", self.name, temp);
            return Err(HeaterError::OutOfRange {
                requested: temp,
                min: self.config.min_temp(),
                max: self.config.max_temp(),
            });
        }

        self.link.set_value(DataPoint::TargetTemp, json!(temp))?;
        if let Some(status) = self.status.as_mut() {
            status.set_temp = temp;
        }
        log::info!("{}: target temperature set to {}°C", self.name, temp);
        Ok(())
    }

    /// Raise the target by one step and re-read the device.
    pub fn increase_temp(&mut self) -> Result<HeaterStatus> {
        let target = self.online_status()?.set_temp + self.config.step();
        self.set_temperature(target)?;
        self.refresh()
    }

    /// Lower the target by one step and re-read the device.
    pub fn decrease_temp(&mut self) -> Result<HeaterStatus> {
        let target = self.online_status()?.set_temp - self.config.step();
        self.set_temperature(target)?;
        self.refresh()
    }

    pub fn turn_on(&mut self) -> Result<HeaterStatus> {
        self.set_power(true)
    }

    pub fn turn_off(&mut self) -> Result<HeaterStatus> {
        self.set_power(false)
    }

    pub fn toggle_power(&mut self) -> Result<HeaterStatus> {
        let on = self.online_status()?.power;
        self.set_power(!on)
    }

    pub fn toggle_light(&mut self) -> Result<HeaterStatus> {
        let on = self.online_status()?.light;
        self.link.set_value(DataPoint::Light, json!(!on))?;
        log::info!("{}: light turned {}", self.name, if on { "OFF" } else { "ON" });
        self.refresh()
    }

    /// Display state for the panel.
    ///
    /// Temperatures stay unknown until the first successful refresh.
    pub fn snapshot(&self) -> HeaterSnapshot {
        HeaterSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            set_temp: self.status.map(|s| s.set_temp),
            current_temp: self.status.map(|s| s.current_temp),
            is_light_on: self.status.is_some_and(|s| s.light),
            is_on: self.status.is_some_and(|s| s.power),
            is_online: self.online,
            history: self.history.to_vec(),
        }
    }

    fn set_power(&mut self, on: bool) -> Result<HeaterStatus> {
        self.online_status()?;
        self.link.set_value(DataPoint::Power, json!(on))?;
        log::info!("{}: heater turned {}", self.name, if on { "ON" } else { "OFF" });
        self.refresh()
    }

    fn online_status(&self) -> Result<HeaterStatus> {
        match self.status {
            Some(status) if self.online => Ok(status),
            _ => Err(HeaterError::Offline(self.name.clone())),
        }
    }
}

/// Thread-safe handle to a heater.
///
/// Can be cloned and shared between request handlers and the status poller.
#[derive(Clone)]
pub struct SharedHeater {
    id: Arc<str>,
    controller: Arc<Mutex<HeaterControl<Box<dyn DeviceLink + Send>>>>,
}

impl SharedHeater {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        link: impl DeviceLink + Send + 'static,
        config: HeaterConfig,
    ) -> Self {
        let id = id.into();
        let link: Box<dyn DeviceLink + Send> = Box::new(link);
        let controller = HeaterControl::new(name, link, config).with_id(id.as_str());
        SharedHeater {
            id: Arc::from(id),
            controller: Arc::new(Mutex::new(controller)),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> String {
        self.lock().name().to_string()
    }

    pub fn is_online(&self) -> bool {
        self.lock().is_online()
    }

    pub fn refresh(&self) -> Result<HeaterStatus> {
        self.lock().refresh()
    }

    pub fn set_temperature(&self, temp: f64) -> Result<()> {
        self.lock().set_temperature(temp)
    }

    pub fn increase_temp(&self) -> Result<HeaterStatus> {
        self.lock().increase_temp()
    }

    pub fn decrease_temp(&self) -> Result<HeaterStatus> {
        self.lock().decrease_temp()
    }

    pub fn toggle_power(&self) -> Result<HeaterStatus> {
        self.lock().toggle_power()
    }

    pub fn toggle_light(&self) -> Result<HeaterStatus> {
        self.lock().toggle_light()
    }

    pub fn snapshot(&self) -> HeaterSnapshot {
        self.lock().snapshot()
    }

    fn lock(&self) -> MutexGuard<'_, HeaterControl<Box<dyn DeviceLink + Send>>> {
        // A panic mid-command leaves plain data behind; keep serving it.
        self.controller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SimulatedLink;
    use std::thread;

    fn connected(current: f64, target: f64) -> HeaterControl<SimulatedLink> {
        let mut heater =
            HeaterControl::new("Living Room", SimulatedLink::new(current, target), HeaterConfig::new());
        heater.refresh().unwrap();
        heater
    }

    #[test]
    fn test_commands_refused_before_first_refresh() {
        let mut heater =
            HeaterControl::new("Bathroom", SimulatedLink::new(19.0, 22.0), HeaterConfig::new());
        assert!(!heater.is_online());
        assert!(matches!(heater.increase_temp(), Err(HeaterError::Offline(name)) if name == "Bathroom"));

        let snapshot = heater.snapshot();
        assert!(!snapshot.is_online);
        assert!(snapshot.history.is_empty());
        assert_eq!(snapshot.set_temp, None);
        assert_eq!(snapshot.current_temp, None);
        assert!(!snapshot.is_on);
    }

    #[test]
    fn test_increase_and_decrease_step_by_one() {
        let mut heater = connected(19.0, 22.0);

        assert_eq!(heater.increase_temp().unwrap().set_temp, 23.0);
        assert_eq!(heater.decrease_temp().unwrap().set_temp, 22.0);
        assert_eq!(heater.decrease_temp().unwrap().set_temp, 21.0);
    }

    #[test]
    fn test_range_is_enforced() {
        let mut heater = connected(19.0, 30.0);

        let result = heater.increase_temp();
        assert!(matches!(
            result,
            Err(HeaterError::OutOfRange { requested, .. }) if requested == 31.0
        ));
        assert_eq!(heater.status().unwrap().set_temp, 30.0);

        assert!(heater.set_temperature(9.5).is_err());
        heater.set_temperature(10.0).unwrap();
        assert_eq!(heater.snapshot().set_temp, Some(10.0));
    }

    #[test]
    fn test_toggles() {
        let mut heater = connected(19.0, 22.0);
        assert!(heater.snapshot().is_light_on);

        assert!(!heater.toggle_light().unwrap().light);
        assert!(heater.toggle_light().unwrap().light);

        assert!(!heater.toggle_power().unwrap().power);
        assert!(heater.turn_on().unwrap().power);
        assert!(!heater.turn_off().unwrap().power);
    }

    #[test]
    fn test_failed_refresh_keeps_temperatures() {
        let mut link = SimulatedLink::new(19.0, 22.0);
        let mut heater = HeaterControl::new("Living Room", link.clone(), HeaterConfig::new());
        heater.refresh().unwrap();
        let before = heater.snapshot();

        // Swap in an unreachable device
        link.set_online(false);
        heater.link = link;
        assert!(heater.refresh().is_err());

        let after = heater.snapshot();
        assert!(!after.is_online);
        assert_eq!(after.set_temp, Some(22.0));
        assert_eq!(after.set_temp, before.set_temp);
        assert_eq!(after.current_temp, before.current_temp);
        assert!(matches!(heater.toggle_light(), Err(HeaterError::Offline(_))));
    }

    #[test]
    fn test_history_follows_refreshes() {
        let config = HeaterConfig::new().with_history_len(2);
        let mut heater = HeaterControl::new("Living Room", SimulatedLink::new(19.0, 22.0), config);
        for _ in 0..3 {
            heater.refresh().unwrap();
        }

        let currents: Vec<_> = heater.history().samples().map(|s| s.current).collect();
        assert_eq!(currents, vec![19.5, 20.0]);
    }

    #[test]
    fn test_shared_heater() {
        let heater = SharedHeater::new(
            "bf01",
            "Living Room",
            SimulatedLink::new(19.0, 15.0),
            HeaterConfig::new(),
        );
        heater.refresh().unwrap();
        assert_eq!(heater.id(), "bf01");
        assert_eq!(heater.name(), "Living Room");

        // Several threads pressing "up" at once
        let handles: Vec<_> = (0..5)
            .map(|_| {
                let heater = heater.clone();
                thread::spawn(move || heater.increase_temp().unwrap())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = heater.snapshot();
        assert!(snapshot.is_online);
        assert_eq!(snapshot.id, "bf01");
        assert_eq!(snapshot.set_temp, Some(20.0));
        assert_eq!(snapshot.history.len(), 6);
    }
}
