use super::{device_id::HidDeviceId, HidDevice, HidError};

/// Callback interface implemented by HID drivers
pub trait HidDriver {
    /// Name of the driver
    fn name(&self) -> &'static str;

    /// Devices this driver can bind to
    fn id_table(&self) -> &'static [HidDeviceId];

    /// Called with the report descriptor read from the device before it is
    /// parsed. Drivers may return a different descriptor to fix up broken
    /// devices.
    fn report_fixup<'a>(&self, _hid: &HidDevice, rdesc: &'a [u8]) -> &'a [u8] {
        rdesc
    }

    /// Bring up the device
    fn probe(&self, hid: &mut HidDevice, id: &HidDeviceId) -> Result<(), HidError>;

    /// Tear down the device
    fn remove(&self, hid: &mut HidDevice) {
        hid.hw_stop();
    }
}

/// Returns the entry of the driver's id table that matches the given device
pub fn match_id(driver: &dyn HidDriver, id: &HidDeviceId) -> Option<&'static HidDeviceId> {
    driver.id_table().iter().find(|entry| entry.matches(id))
}

/// Bind the driver to the device: read the report descriptor, let the driver
/// fix it up and probe the device.
pub fn bind(driver: &dyn HidDriver, hid: &mut HidDevice) -> Result<(), HidError> {
    let Some(id) = match_id(driver, hid.id()) else {
        return Err(HidError::NoDevice);
    };

    let raw = hid
        .transport()
        .lock()
        .map_err(|e| HidError::Transport(e.to_string()))?
        .raw_descriptor()?;
    log::debug!("{}: read {} byte report descriptor", hid.name(), raw.len());

    let rdesc = driver.report_fixup(hid, &raw).to_vec();
    hid.set_rdesc(rdesc);

    driver.probe(hid, id)?;
    log::info!("{}: bound to driver '{}' ({id})", hid.name(), driver.name());

    Ok(())
}

/// Unbind the driver from the device
pub fn unbind(driver: &dyn HidDriver, hid: &mut HidDevice) {
    log::info!("{}: unbinding driver '{}'", hid.name(), driver.name());
    driver.remove(hid);
}
