use std::{
    error::Error,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    thread, time,
};

use evdev::InputEvent;

use crate::{
    config::Config,
    drivers::shanwan::{
        driver::{Driver, InputHandler, HID_TIMEOUT},
        mapping::{abs_axes, translate_event, KEYS},
    },
    hid::{
        driver::{bind, match_id, unbind},
        hidraw::{self, HidrawInfo, HidrawTransport},
        HidDevice,
    },
    input::uinput::VirtualGamepad,
};

/// Largest input report that will be read from the device
const READ_BUFFER_SIZE: usize = 64;

/// Returns all attached gamepads the driver can bind to
pub fn find_devices(driver: &Driver) -> Result<Vec<HidrawInfo>, Box<dyn Error + Send + Sync>> {
    let devices = hidraw::enumerate()?
        .into_iter()
        .filter(|info| match_id(driver, &info.id).is_some())
        .collect();
    Ok(devices)
}

/// Returns the gamepad at the given hidraw path, or the first attached
/// gamepad if no path is given.
pub fn find_device(
    driver: &Driver,
    path: Option<&str>,
) -> Result<HidrawInfo, Box<dyn Error + Send + Sync>> {
    let mut devices = find_devices(driver)?.into_iter();
    let device = match path {
        Some(path) => devices.find(|info| info.path == path),
        None => devices.next(),
    };
    let Some(device) = device else {
        return match path {
            Some(path) => Err(format!("No supported gamepad found at {path}").into()),
            None => Err("No supported gamepad found".into()),
        };
    };
    Ok(device)
}

/// Open the given hidraw device and bind the driver to it
pub fn open_device(
    driver: &Driver,
    info: &HidrawInfo,
) -> Result<HidDevice, Box<dyn Error + Send + Sync>> {
    let transport = HidrawTransport::new(&info.path)?;
    let mut hid = HidDevice::new(info.id, info.name.clone(), Arc::new(Mutex::new(transport)));
    bind(driver, &mut hid)?;
    Ok(hid)
}

/// Stop the rumble motors of the device. The device keeps rumbling after an
/// effect is dropped unless a zero rumble is sent.
pub fn stop_rumble(hid: &mut HidDevice) {
    let name = hid.name().to_string();
    let Some(ff) = hid.inputs_mut().first_mut().and_then(|input| input.ff_mut()) else {
        return;
    };
    if let Err(e) = ff.stop_all() {
        log::warn!("{name}: failed to stop rumble: {e}");
    }
}

/// Stop rumble and unbind the driver from the device
pub fn release_device(driver: &Driver, hid: &mut HidDevice) {
    stop_rumble(hid);
    unbind(driver, hid);
}

/// Manages a single gamepad: binds the driver, exposes the gamepad through
/// uinput and forwards force feedback requests to it.
pub struct Manager {
    config: Config,
    driver: Driver,
    running: Arc<AtomicBool>,
}

impl Manager {
    pub fn new(config: Config) -> Self {
        let driver = Driver::new().with_force_feedback(config.rumble);
        Self {
            config,
            driver,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Run until the device goes away or the process is interrupted
    pub async fn run(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        log::debug!("Starting manager with config: {:?}", self.config);
        let info = find_device(&self.driver, self.config.device_path.as_deref())?;
        log::info!("Found {} ({}) at {}", info.name, info.id, info.path);

        self.running.store(true, Ordering::SeqCst);

        // Stop the device loop on CTRL+C
        let running = self.running.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Unable to listen for shutdown signal: {e}");
                return;
            }
            log::info!("Shutting down");
            running.store(false, Ordering::SeqCst);
        });

        // Spawn a blocking task to read the events
        let driver = self.driver.clone();
        let config = self.config.clone();
        let running = self.running.clone();
        let task =
            tokio::task::spawn_blocking(move || -> Result<(), Box<dyn Error + Send + Sync>> {
                let mut hid = open_device(&driver, &info)?;
                let result = poll_device(&mut hid, &config, &running);
                release_device(&driver, &mut hid);
                result
            });

        // Wait for the task to finish
        if let Err(e) = task.await? {
            return Err(e.to_string().into());
        }

        log::debug!("Manager stopped");

        Ok(())
    }
}

/// Read input reports and force feedback requests until stopped
fn poll_device(
    hid: &mut HidDevice,
    config: &Config,
    running: &AtomicBool,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let Some(input) = hid.inputs().first() else {
        return Err(format!("{}: no input device connected", hid.name()).into());
    };
    let mut gamepad =
        VirtualGamepad::new(&config.virtual_device_name, input, &KEYS, &abs_axes())?;
    let mut handler = InputHandler::new();
    let mut buf = [0; READ_BUFFER_SIZE];
    let interval = time::Duration::from_millis(config.poll_rate_ms);

    while running.load(Ordering::SeqCst) {
        let bytes_read = hid.read(&mut buf, HID_TIMEOUT)?;
        if bytes_read > 0 {
            let events = handler.handle_input_report(&buf[..bytes_read])?;
            let input_events: Vec<InputEvent> = events.iter().flat_map(translate_event).collect();
            gamepad.emit(&input_events)?;
        }

        if let Some(input) = hid.inputs_mut().first_mut() {
            gamepad.process_ff(input)?;
        }

        thread::sleep(interval);
    }

    Ok(())
}
