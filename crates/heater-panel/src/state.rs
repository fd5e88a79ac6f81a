//! Server-side heater state shared by the server functions and the poller.

use heater::{
    load_devices, DeviceRecord, HeaterConfig, HeaterError, HeaterSnapshot, SharedHeater,
    SimulatedLink,
};
use log::{debug, info, warn};
use std::env;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Server settings read from the environment.
#[derive(Debug, Clone)]
pub struct PanelSettings {
    pub devices_path: PathBuf,
    pub heater: HeaterConfig,
}

impl PanelSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// `HEATER_DEVICES` names the device list, `HEATER_POLL_SECS` the
    /// status polling interval.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let devices_path = lookup("HEATER_DEVICES")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("devices.json"));

        let mut heater = HeaterConfig::new();
        if let Some(raw) = lookup("HEATER_POLL_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => heater = heater.with_poll_interval(Duration::from_secs(secs)),
                _ => warn!("Ignoring invalid HEATER_POLL_SECS={}", raw),
            }
        }

        PanelSettings {
            devices_path,
            heater,
        }
    }
}

/// All heaters known to the server, addressed by device id.
#[derive(Clone)]
pub struct HeaterRegistry {
    heaters: Arc<Vec<SharedHeater>>,
}

impl HeaterRegistry {
    /// Build the registry from the device list, falling back to two demo
    /// heaters when the file does not exist.
    pub fn load(settings: &PanelSettings) -> heater::Result<Self> {
        let registry = match load_devices(&settings.devices_path) {
            Ok(records) => Self::from_records(&records, &settings.heater),
            Err(HeaterError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                warn!(
                    "{} not found, starting demo heaters",
                    settings.devices_path.display()
                );
                Self::demo(&settings.heater)
            }
            Err(e) => return Err(e),
        };

        registry.refresh_all();
        Ok(registry)
    }

    /// One heater per record. Names may repeat; a repeated id is skipped.
    pub fn from_records(records: &[DeviceRecord], config: &HeaterConfig) -> Self {
        let mut heaters: Vec<SharedHeater> = Vec::with_capacity(records.len());
        for record in records {
            if heaters.iter().any(|heater| heater.id() == record.id) {
                warn!("Skipping {}: device id {} is listed twice", record.name, record.id);
                continue;
            }
            info!("Registering {} ({} @ {})", record.name, record.id, record.ip);
            heaters.push(SharedHeater::new(
                record.id.clone(),
                record.name.clone(),
                SimulatedLink::new(19.0, 22.0),
                config.clone(),
            ));
        }
        HeaterRegistry {
            heaters: Arc::new(heaters),
        }
    }

    pub fn demo(config: &HeaterConfig) -> Self {
        let heaters = vec![
            SharedHeater::new(
                "demo-living-room",
                "Living Room",
                SimulatedLink::new(19.0, 22.0),
                config.clone(),
            ),
            SharedHeater::new(
                "demo-bathroom",
                "Bathroom",
                SimulatedLink::new(17.0, 21.0),
                config.clone(),
            ),
        ];
        HeaterRegistry {
            heaters: Arc::new(heaters),
        }
    }

    pub fn get(&self, id: &str) -> heater::Result<&SharedHeater> {
        self.heaters
            .iter()
            .find(|heater| heater.id() == id)
            .ok_or_else(|| HeaterError::UnknownHeater(id.to_string()))
    }

    pub fn snapshots(&self) -> Vec<HeaterSnapshot> {
        self.heaters.iter().map(SharedHeater::snapshot).collect()
    }

    /// Poll every heater once. Failures only mark the heater offline.
    pub fn refresh_all(&self) {
        for heater in self.heaters.iter() {
            if let Err(e) = heater.refresh() {
                debug!("Refreshing {} failed: {}", heater.id(), e);
            }
        }
    }
}

/// Refresh all heaters every `interval` in the background.
pub fn spawn_poller(registry: HeaterRegistry, interval: Duration) -> JoinHandle<()> {
    info!("Polling heaters every {:?}", interval);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately and the registry is fresh already
        ticker.tick().await;
        loop {
            ticker.tick().await;
            registry.refresh_all();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_settings_defaults() {
        let settings = PanelSettings::from_lookup(lookup(&[]));
        assert_eq!(settings.devices_path, PathBuf::from("devices.json"));
        assert_eq!(settings.heater.poll_interval(), Duration::from_secs(300));
    }

    #[test]
    fn test_settings_overrides() {
        let settings = PanelSettings::from_lookup(lookup(&[
            ("HEATER_DEVICES", "/etc/heaters.json"),
            ("HEATER_POLL_SECS", "30"),
        ]));
        assert_eq!(settings.devices_path, PathBuf::from("/etc/heaters.json"));
        assert_eq!(settings.heater.poll_interval(), Duration::from_secs(30));

        let invalid = PanelSettings::from_lookup(lookup(&[("HEATER_POLL_SECS", "soon")]));
        assert_eq!(invalid.heater.poll_interval(), Duration::from_secs(300));
    }

    #[test]
    fn test_missing_device_list_starts_demo() {
        let dir = tempfile::tempdir().unwrap();
        let settings = PanelSettings {
            devices_path: dir.path().join("devices.json"),
            heater: HeaterConfig::new(),
        };

        let registry = HeaterRegistry::load(&settings).unwrap();
        let names: Vec<_> = registry.snapshots().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Living Room", "Bathroom"]);
        assert!(registry.get("demo-living-room").unwrap().is_online());
    }

    #[test]
    fn test_device_list_is_used() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": "bf01", "ip": "10.0.0.5", "key": "k", "name": "Heater 1", "version": "3.3", "product_id": "sa7ty0oxseyuzzlp"}}]"#
        )
        .unwrap();
        let settings = PanelSettings {
            devices_path: file.path().to_path_buf(),
            heater: HeaterConfig::new(),
        };

        let registry = HeaterRegistry::load(&settings).unwrap();
        let snapshots = registry.snapshots();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].id, "bf01");
        assert_eq!(snapshots[0].name, "Heater 1");
        assert!(snapshots[0].is_online);
    }

    fn record(id: &str, name: &str) -> DeviceRecord {
        DeviceRecord {
            id: id.to_string(),
            ip: "10.0.0.5".to_string(),
            key: "k".to_string(),
            name: name.to_string(),
            version: "3.3".to_string(),
            product_id: heater::KESSER_HEATER_PRODUCT_ID.to_string(),
        }
    }

    #[test]
    fn test_same_named_heaters_are_controlled_separately() {
        let records = [record("bf01", "Heater"), record("bf02", "Heater")];
        let registry = HeaterRegistry::from_records(&records, &HeaterConfig::new());
        registry.refresh_all();

        registry.get("bf02").unwrap().increase_temp().unwrap();

        let snapshots = registry.snapshots();
        assert_eq!(snapshots[0].id, "bf01");
        assert_eq!(snapshots[0].set_temp, Some(22.0));
        assert_eq!(snapshots[1].id, "bf02");
        assert_eq!(snapshots[1].set_temp, Some(23.0));
    }

    #[test]
    fn test_repeated_id_is_registered_once() {
        let records = [record("bf01", "Heater 1"), record("bf01", "Heater 2")];
        let registry = HeaterRegistry::from_records(&records, &HeaterConfig::new());

        let names: Vec<_> = registry.snapshots().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Heater 1"]);
    }

    #[test]
    fn test_malformed_device_list_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let settings = PanelSettings {
            devices_path: file.path().to_path_buf(),
            heater: HeaterConfig::new(),
        };

        assert!(matches!(
            HeaterRegistry::load(&settings),
            Err(HeaterError::Json(_))
        ));
    }

    #[test]
    fn test_unknown_heater() {
        let registry = HeaterRegistry::demo(&HeaterConfig::new());
        assert!(matches!(
            registry.get("Living Room"),
            Err(HeaterError::UnknownHeater(id)) if id == "Living Room"
        ));
    }

    #[tokio::test]
    async fn test_poller_records_history() {
        let registry = HeaterRegistry::demo(&HeaterConfig::new());
        registry.refresh_all();

        let handle = spawn_poller(registry.clone(), Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.abort();

        let snapshot = registry.get("demo-bathroom").unwrap().snapshot();
        assert!(snapshot.history.len() > 1);
    }
}
