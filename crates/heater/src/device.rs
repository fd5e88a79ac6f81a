use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::Result;

/// Tuya product id of the Kesser heaters.
pub const KESSER_HEATER_PRODUCT_ID: &str = "sa7ty0oxseyuzzlp";

/// One entry of `devices.json`, as produced by the Tuya device wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub id: String,
    pub ip: String,
    pub key: String,
    pub name: String,
    pub version: String,
    pub product_id: String,
}

impl DeviceRecord {
    pub fn is_heater(&self) -> bool {
        self.product_id == KESSER_HEATER_PRODUCT_ID
    }
}

/// Parse a device list and keep only the heaters.
pub fn parse_devices(json: &str) -> Result<Vec<DeviceRecord>> {
    let records: Vec<DeviceRecord> = serde_json::from_str(json)?;
    let total = records.len();
    let heaters: Vec<_> = records.into_iter().filter(DeviceRecord::is_heater).collect();
    log::debug!("{} of {} devices are heaters", heaters.len(), total);
    Ok(heaters)
}

/// Read and parse a `devices.json` file.
pub fn load_devices(path: impl AsRef<Path>) -> Result<Vec<DeviceRecord>> {
    let path = path.as_ref();
    log::info!("Loading devices from {}", path.display());
    let json = std::fs::read_to_string(path)?;
    parse_devices(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HeaterError;
    use std::io::Write;

    const DEVICES: &str = r#"[
        {"id": "bf01", "ip": "192.168.1.20", "key": "k1", "name": "Heater 1", "version": "3.3", "product_id": "sa7ty0oxseyuzzlp"},
        {"id": "bf02", "ip": "192.168.1.21", "key": "k2", "name": "Desk Lamp", "version": "3.3", "product_id": "keyj3w8cmutjnwkd"},
        {"id": "bf03", "ip": "192.168.1.22", "key": "k3", "name": "Heater 2", "version": "3.4", "product_id": "sa7ty0oxseyuzzlp"}
    ]"#;

    #[test]
    fn test_only_heaters_are_kept() {
        let devices = parse_devices(DEVICES).unwrap();
        let names: Vec<_> = devices.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Heater 1", "Heater 2"]);
        assert_eq!(devices[1].version, "3.4");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DEVICES.as_bytes()).unwrap();

        let devices = load_devices(file.path()).unwrap();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].ip, "192.168.1.20");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_devices(dir.path().join("devices.json"));
        assert!(matches!(result, Err(HeaterError::Io(_))));
    }

    #[test]
    fn test_malformed_list() {
        let result = parse_devices(r#"[{"id": "bf01"}]"#);
        assert!(matches!(result, Err(HeaterError::Json(_))));
    }
}
