use std::sync::{Arc, Mutex};

use super::{
    report::{HidReport, ReportType},
    HidError, RequestType,
};

/// Low-level transport of a HID device (e.g. hidraw). This is the seam
/// between the HID host and the bus the device is attached to.
pub trait Transport: Send {
    /// Read the report descriptor exactly as reported by the device
    fn raw_descriptor(&mut self) -> Result<Vec<u8>, HidError>;
    /// Claim the device
    fn start(&mut self) -> Result<(), HidError>;
    /// Release the device
    fn stop(&mut self);
    /// Start delivering input reports
    fn open(&mut self) -> Result<(), HidError>;
    /// Stop delivering input reports
    fn close(&mut self);
    /// Read one input report. Returns zero if nothing was read before the
    /// timeout or the transport is not open.
    fn read(&mut self, buf: &mut [u8], timeout_ms: i32) -> Result<usize, HidError>;
    /// Send a report to the device
    fn set_report(
        &mut self,
        report_type: ReportType,
        report_id: u8,
        data: &[u8],
    ) -> Result<(), HidError>;
}

/// Transport shared between a [super::HidDevice] and driver contexts that
/// write to it
pub type SharedTransport = Arc<Mutex<dyn Transport>>;

/// Issue a synchronous request for the given report. `buf` holds the payload
/// to send; anything past the report length is not sent. Returns the number
/// of bytes sent.
pub fn hw_request(
    transport: &SharedTransport,
    report: &HidReport,
    buf: &[u8],
    request: RequestType,
) -> Result<usize, HidError> {
    let len = report.len().min(buf.len());
    let mut transport = transport
        .lock()
        .map_err(|e| HidError::Transport(e.to_string()))?;
    match request {
        RequestType::SetReport => {
            transport.set_report(report.report_type, report.id, &buf[..len])?;
            Ok(len)
        }
    }
}
