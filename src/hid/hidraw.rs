use std::ffi::CString;

use hidapi::{DeviceInfo, HidApi, HidDevice};

use super::{
    device_id::{Bus, HidDeviceId},
    report::ReportType,
    transport::Transport,
    HidError,
};

/// Largest report descriptor the kernel will hand out
const HID_MAX_DESCRIPTOR_SIZE: usize = 4096;

/// Largest report hidraw will transfer, including the report ID
const HID_MAX_BUFFER_SIZE: usize = 4096;

/// Details about a hidraw device found during enumeration
#[derive(Debug, Clone)]
pub struct HidrawInfo {
    pub path: String,
    pub id: HidDeviceId,
    pub name: String,
    pub interface: i32,
}

impl From<&DeviceInfo> for HidrawInfo {
    fn from(info: &DeviceInfo) -> Self {
        let name = info.product_string().unwrap_or_default().to_string();
        Self {
            path: info.path().to_string_lossy().to_string(),
            id: HidDeviceId {
                bus: Bus::from(info.bus_type()),
                vendor: info.vendor_id(),
                product: info.product_id(),
            },
            name,
            interface: info.interface_number(),
        }
    }
}

/// Returns all hidraw devices currently attached to the system
pub fn enumerate() -> Result<Vec<HidrawInfo>, HidError> {
    let api = HidApi::new()?;
    let devices = api.device_list().map(HidrawInfo::from).collect();
    Ok(devices)
}

/// [Transport] over a Linux hidraw node using hidapi
pub struct HidrawTransport {
    path: String,
    device: Option<HidDevice>,
    opened: bool,
}

impl HidrawTransport {
    /// Open the hidraw device at the given path (e.g. "/dev/hidraw3")
    pub fn new(path: &str) -> Result<Self, HidError> {
        let device = Self::open_path(path)?;
        Ok(Self {
            path: path.to_string(),
            device: Some(device),
            opened: false,
        })
    }

    fn open_path(path: &str) -> Result<HidDevice, HidError> {
        log::debug!("Opening hidraw device at: {path}");
        let cs_path = CString::new(path).map_err(|e| HidError::Transport(e.to_string()))?;
        let api = HidApi::new()?;
        Ok(api.open_path(&cs_path)?)
    }

    fn device(&self) -> Result<&HidDevice, HidError> {
        self.device.as_ref().ok_or(HidError::NotStarted)
    }
}

impl Transport for HidrawTransport {
    fn raw_descriptor(&mut self) -> Result<Vec<u8>, HidError> {
        let mut buf = vec![0; HID_MAX_DESCRIPTOR_SIZE];
        let len = self.device()?.get_report_descriptor(&mut buf)?;
        buf.truncate(len);
        Ok(buf)
    }

    fn start(&mut self) -> Result<(), HidError> {
        if self.device.is_none() {
            self.device = Some(Self::open_path(&self.path)?);
        }
        Ok(())
    }

    fn stop(&mut self) {
        log::debug!("Closing hidraw device at: {}", self.path);
        self.opened = false;
        self.device = None;
    }

    fn open(&mut self) -> Result<(), HidError> {
        self.device()?;
        self.opened = true;
        Ok(())
    }

    fn close(&mut self) {
        self.opened = false;
    }

    fn read(&mut self, buf: &mut [u8], timeout_ms: i32) -> Result<usize, HidError> {
        if !self.opened {
            return Ok(0);
        }
        Ok(self.device()?.read_timeout(buf, timeout_ms)?)
    }

    fn set_report(
        &mut self,
        report_type: ReportType,
        report_id: u8,
        data: &[u8],
    ) -> Result<(), HidError> {
        if data.len() >= HID_MAX_BUFFER_SIZE {
            return Err(HidError::Transport(format!(
                "report of {} bytes is too large",
                data.len()
            )));
        }

        // hidraw expects the report ID as the first byte, 0 if unnumbered
        let mut buf = Vec::with_capacity(data.len() + 1);
        buf.push(report_id);
        buf.extend_from_slice(data);

        let device = self.device()?;
        match report_type {
            ReportType::Output => {
                let _bytes_written = device.write(&buf)?;
            }
            ReportType::Feature => device.send_feature_report(&buf)?,
            ReportType::Input => {
                return Err(HidError::Unsupported(
                    "input reports cannot be sent to the device".into(),
                ))
            }
        }

        Ok(())
    }
}
