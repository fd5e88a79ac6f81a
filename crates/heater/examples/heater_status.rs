use heater::{load_devices, HeaterConfig, HeaterControl, SimulatedLink};
use std::env;

/// Lists the heaters found in a `devices.json` file and prints a status
/// block for each one, using simulated devices in place of the real link.
///
/// Usage: cargo run --example heater_status -- [path/to/devices.json]
fn main() {
    let path = env::args().nth(1).unwrap_or_else(|| "devices.json".to_string());

    println!("Heater Status Example");
    println!("=====================");
    println!("Reading devices from {}", path);
    println!();

    let devices = match load_devices(&path) {
        Ok(devices) => devices,
        Err(e) => {
            eprintln!("Could not load devices: {}", e);
            std::process::exit(1);
        }
    };

    if devices.is_empty() {
        println!("No Kesser heaters found.");
        return;
    }

    for device in devices {
        println!("{} ({} @ {}, protocol {})", device.name, device.id, device.ip, device.version);

        let mut heater = HeaterControl::new(
            device.name.clone(),
            SimulatedLink::new(19.0, 22.0),
            HeaterConfig::new(),
        )
        .with_id(device.id.clone());
        match heater.refresh() {
            Ok(status) => print!("{}", status.summary()),
            Err(e) => println!("{}", e),
        }
        println!();
    }
}
