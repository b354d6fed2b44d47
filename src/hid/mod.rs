//! Minimal HID host model. A [HidDevice] wraps a low-level [Transport] and the
//! reports declared by its report descriptor, and a [driver::HidDriver] is
//! bound to it through the same callback interface a kernel HID driver uses
//! (report fixup, probe, remove).
pub mod device_id;
pub mod driver;
pub mod hidraw;
#[cfg(test)]
pub mod mock;
pub mod report;
pub mod transport;

use std::sync::MutexGuard;

use thiserror::Error;

use crate::input::device::InputDevice;

use self::{
    device_id::HidDeviceId,
    report::{HidReport, ReportEnum, ReportType},
    transport::{SharedTransport, Transport},
};

/// Possible errors raised by the HID host and its drivers
#[derive(Error, Debug)]
pub enum HidError {
    #[error("no inputs found")]
    NoInputs,
    #[error("no output reports found")]
    NoOutputReports,
    #[error("out of memory")]
    NoMemory,
    #[error("no matching device found")]
    NoDevice,
    #[error("report descriptor parse failed: {0}")]
    Parse(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("hidapi error: {0}")]
    HidApi(#[from] hidapi::HidError),
    #[error("device is not started")]
    NotStarted,
    #[error("unsupported: {0}")]
    Unsupported(String),
    #[error("invalid effect id: {0}")]
    InvalidEffect(i16),
    #[error("failed to pack report: {0}")]
    Pack(#[from] packed_struct::PackingError),
}

/// Which subsystems [HidDevice::hw_start] should connect the device to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectMask(u8);

impl ConnectMask {
    /// Create input devices for the input reports of the device
    pub const HIDINPUT: Self = Self(1 << 0);
    /// Attach the generic force feedback backend
    pub const FF: Self = Self(1 << 5);
    pub const DEFAULT: Self = Self(Self::HIDINPUT.0 | Self::FF.0);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }
}

/// Kind of request issued with [transport::hw_request]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestType {
    SetReport,
}

/// A HID device as seen by drivers
pub struct HidDevice {
    id: HidDeviceId,
    name: String,
    transport: SharedTransport,
    rdesc: Vec<u8>,
    reports: Option<ReportEnum>,
    inputs: Vec<InputDevice>,
}

impl HidDevice {
    pub fn new(id: HidDeviceId, name: impl Into<String>, transport: SharedTransport) -> Self {
        Self {
            id,
            name: name.into(),
            transport,
            rdesc: Vec::new(),
            reports: None,
            inputs: Vec::new(),
        }
    }

    pub fn id(&self) -> &HidDeviceId {
        &self.id
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the report descriptor in use, after any driver fixup
    pub fn rdesc(&self) -> &[u8] {
        self.rdesc.as_slice()
    }

    pub(crate) fn set_rdesc(&mut self, rdesc: Vec<u8>) {
        self.rdesc = rdesc;
        self.reports = None;
    }

    /// Returns a handle to the low-level transport of the device
    pub fn transport(&self) -> SharedTransport {
        self.transport.clone()
    }

    /// Enumerate the reports declared by the current report descriptor
    pub fn parse(&mut self) -> Result<(), HidError> {
        let reports = ReportEnum::parse(&self.rdesc)?;
        log::debug!(
            "{}: parsed {} input, {} output and {} feature report(s)",
            self.name,
            reports.reports(ReportType::Input).len(),
            reports.reports(ReportType::Output).len(),
            reports.reports(ReportType::Feature).len()
        );
        self.reports = Some(reports);
        Ok(())
    }

    /// Returns the reports of the given type, in declaration order. Empty if
    /// the descriptor has not been parsed.
    pub fn reports(&self, report_type: ReportType) -> &[HidReport] {
        match self.reports.as_ref() {
            Some(reports) => reports.reports(report_type),
            None => &[],
        }
    }

    pub fn inputs(&self) -> &[InputDevice] {
        self.inputs.as_slice()
    }

    pub fn inputs_mut(&mut self) -> &mut [InputDevice] {
        self.inputs.as_mut_slice()
    }

    /// Start the hardware transport and connect the device to the requested
    /// subsystems.
    pub fn hw_start(&mut self, mask: ConnectMask) -> Result<(), HidError> {
        self.lock_transport()?.start()?;

        if mask.contains(ConnectMask::HIDINPUT) && !self.reports(ReportType::Input).is_empty() {
            log::debug!("{}: connecting input device", self.name);
            self.inputs.push(InputDevice::new(self.name.clone()));
        }
        if mask.contains(ConnectMask::FF) {
            log::debug!("{}: no generic force feedback backend available", self.name);
        }

        Ok(())
    }

    /// Disconnect the input devices and stop the hardware transport
    pub fn hw_stop(&mut self) {
        self.inputs.clear();
        match self.lock_transport() {
            Ok(mut transport) => transport.stop(),
            Err(e) => log::error!("{}: failed to stop transport: {e}", self.name),
        }
    }

    /// Open the transport so input reports start being delivered
    pub fn hw_open(&mut self) -> Result<(), HidError> {
        self.lock_transport()?.open()
    }

    pub fn hw_close(&mut self) {
        match self.lock_transport() {
            Ok(mut transport) => transport.close(),
            Err(e) => log::error!("{}: failed to close transport: {e}", self.name),
        }
    }

    /// Read a single input report from the device. Returns the number of bytes
    /// read, which is zero if nothing arrived before the timeout.
    pub fn read(&self, buf: &mut [u8], timeout_ms: i32) -> Result<usize, HidError> {
        self.lock_transport()?.read(buf, timeout_ms)
    }

    fn lock_transport(&self) -> Result<MutexGuard<'_, dyn Transport + 'static>, HidError> {
        self.transport
            .lock()
            .map_err(|e| HidError::Transport(e.to_string()))
    }
}

impl std::fmt::Debug for HidDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HidDevice")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("rdesc_len", &self.rdesc.len())
            .field("inputs", &self.inputs.len())
            .finish()
    }
}
