use std::error::Error;

use evdev::{FFEffectData, FFEffectKind, FFReplay, FFTrigger};
use serde::Serialize;
use tabled::settings::{Panel, Style};
use tabled::{Table, Tabled};

use crate::{
    drivers::shanwan::driver::Driver,
    hid::driver::unbind,
    manager::{find_device, find_devices, open_device},
};

#[derive(Tabled, Serialize)]
struct DeviceRow {
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Interface")]
    interface: i32,
}

/// List the supported gamepads that are attached
pub fn handle_devices(json: bool) -> Result<(), Box<dyn Error + Send + Sync>> {
    let driver = Driver::new();
    let devices: Vec<DeviceRow> = find_devices(&driver)?
        .into_iter()
        .map(|info| DeviceRow {
            path: info.path,
            id: info.id.to_string(),
            name: info.name,
            interface: info.interface,
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&devices)?);
        return Ok(());
    }
    if devices.is_empty() {
        println!("No supported gamepads found");
        return Ok(());
    }

    let mut table = Table::new(devices);
    table
        .with(Style::modern_rounded())
        .with(Panel::header("Gamepads"));
    println!("{table}");

    Ok(())
}

/// Bind the driver to a gamepad and play a single rumble effect on it
pub fn handle_rumble(
    weak: u16,
    strong: u16,
    path: Option<&str>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let driver = Driver::new();
    let info = find_device(&driver, path)?;
    let mut hid = open_device(&driver, &info)?;

    let effect = FFEffectData {
        direction: 0,
        trigger: FFTrigger {
            button: 0,
            interval: 0,
        },
        replay: FFReplay {
            length: 0,
            delay: 0,
        },
        kind: FFEffectKind::Rumble {
            strong_magnitude: strong,
            weak_magnitude: weak,
        },
    };

    let result: Result<(), Box<dyn Error + Send + Sync>> =
        match hid.inputs_mut().first_mut().and_then(|input| input.ff_mut()) {
            Some(ff) => match ff.upload(0, effect).and_then(|_| ff.playback(0, 1)) {
                Ok(_) => Ok(()),
                Err(e) => Err(e.into()),
            },
            None => Err(format!("{}: force feedback is not available", info.path).into()),
        };
    unbind(&driver, &mut hid);
    result?;

    println!("Set rumble on {}: strong={strong:#06x} weak={weak:#06x}", info.path);

    Ok(())
}
