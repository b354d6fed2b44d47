use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use super::{
    device_id::hid_usb_device, report::ReportType, transport::Transport, HidDevice, HidError,
};

/// Calls made on a [MockTransport], in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    RawDescriptor,
    Start,
    Stop,
    Open,
    Close,
    SetReport(ReportType, u8, Vec<u8>),
}

/// Transport that records every call and serves a fixed report descriptor
#[derive(Debug, Default)]
pub struct MockTransport {
    pub rdesc: Vec<u8>,
    pub calls: Vec<Call>,
    pub reads: VecDeque<Vec<u8>>,
    pub fail_start: bool,
    pub fail_open: bool,
    pub fail_set_report: bool,
    pub opened: bool,
}

impl MockTransport {
    pub fn new(rdesc: &[u8]) -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(Self {
            rdesc: rdesc.to_vec(),
            ..Default::default()
        }))
    }

    /// Returns the payloads of all reports written to the device
    pub fn written(&self) -> Vec<Vec<u8>> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::SetReport(_, _, data) => Some(data.clone()),
                _ => None,
            })
            .collect()
    }

    /// Returns the lifecycle calls, without report traffic
    pub fn lifecycle(&self) -> Vec<Call> {
        self.calls
            .iter()
            .filter(|call| !matches!(call, Call::SetReport(..)))
            .cloned()
            .collect()
    }
}

impl Transport for MockTransport {
    fn raw_descriptor(&mut self) -> Result<Vec<u8>, HidError> {
        self.calls.push(Call::RawDescriptor);
        Ok(self.rdesc.clone())
    }

    fn start(&mut self) -> Result<(), HidError> {
        self.calls.push(Call::Start);
        if self.fail_start {
            return Err(HidError::Transport("start failed".into()));
        }
        Ok(())
    }

    fn stop(&mut self) {
        self.calls.push(Call::Stop);
        self.opened = false;
    }

    fn open(&mut self) -> Result<(), HidError> {
        self.calls.push(Call::Open);
        if self.fail_open {
            return Err(HidError::Transport("open failed".into()));
        }
        self.opened = true;
        Ok(())
    }

    fn close(&mut self) {
        self.calls.push(Call::Close);
        self.opened = false;
    }

    fn read(&mut self, buf: &mut [u8], _timeout_ms: i32) -> Result<usize, HidError> {
        if !self.opened {
            return Ok(0);
        }
        let Some(data) = self.reads.pop_front() else {
            return Ok(0);
        };
        let len = data.len().min(buf.len());
        buf[..len].copy_from_slice(&data[..len]);
        Ok(len)
    }

    fn set_report(
        &mut self,
        report_type: ReportType,
        report_id: u8,
        data: &[u8],
    ) -> Result<(), HidError> {
        self.calls
            .push(Call::SetReport(report_type, report_id, data.to_vec()));
        if self.fail_set_report {
            return Err(HidError::Transport("set report failed".into()));
        }
        Ok(())
    }
}

/// Create a HID device backed by the given mock transport
pub fn mock_device(transport: &Arc<Mutex<MockTransport>>, vendor: u16, product: u16) -> HidDevice {
    HidDevice::new(
        hid_usb_device(vendor, product),
        "Mock Gamepad",
        transport.clone(),
    )
}
