use std::fmt::Display;

/// Bus a HID device is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bus {
    Usb,
    Bluetooth,
    I2c,
    Spi,
    Unknown,
}

impl From<hidapi::BusType> for Bus {
    fn from(value: hidapi::BusType) -> Self {
        match value {
            hidapi::BusType::Usb => Bus::Usb,
            hidapi::BusType::Bluetooth => Bus::Bluetooth,
            hidapi::BusType::I2c => Bus::I2c,
            hidapi::BusType::Spi => Bus::Spi,
            _ => Bus::Unknown,
        }
    }
}

impl Display for Bus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Bus::Usb => "USB",
            Bus::Bluetooth => "Bluetooth",
            Bus::I2c => "I2C",
            Bus::Spi => "SPI",
            Bus::Unknown => "Unknown",
        };
        write!(f, "{name}")
    }
}

/// Identifies a HID device a driver can bind to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HidDeviceId {
    pub bus: Bus,
    pub vendor: u16,
    pub product: u16,
}

impl HidDeviceId {
    /// Returns true if the given device is matched by this id
    pub fn matches(&self, device: &HidDeviceId) -> bool {
        self.bus == device.bus && self.vendor == device.vendor && self.product == device.product
    }
}

impl Display for HidDeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {:04x}:{:04x}", self.bus, self.vendor, self.product)
    }
}

/// Id table entry for a USB HID device
pub const fn hid_usb_device(vendor: u16, product: u16) -> HidDeviceId {
    HidDeviceId {
        bus: Bus::Usb,
        vendor,
        product,
    }
}
