use packed_struct::prelude::*;

/// Command byte of a rumble output report
pub const RUMBLE_COMMAND: u8 = 0x02;
/// Always 0x08 in rumble output reports
pub const RUMBLE_RESERVED: u8 = 0x08;
/// Rumble duration meaning "until told otherwise". Other values are 0-254.
pub const RUMBLE_DURATION_CONTINUOUS: u8 = 0xff;

/// Hat switch position, clockwise from up
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum Direction {
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
    #[default]
    None,
}

impl Direction {
    /// Decode the hat switch value. Anything outside of the logical range
    /// 0-7 is the null state.
    pub fn from_hat(value: u8) -> Self {
        match value {
            0 => Self::Up,
            1 => Self::UpRight,
            2 => Self::Right,
            3 => Self::DownRight,
            4 => Self::Down,
            5 => Self::DownLeft,
            6 => Self::Left,
            7 => Self::UpLeft,
            _ => Self::None,
        }
    }

    pub fn is_up(&self) -> bool {
        matches!(self, Self::Up | Self::UpRight | Self::UpLeft)
    }

    pub fn is_down(&self) -> bool {
        matches!(self, Self::Down | Self::DownRight | Self::DownLeft)
    }

    pub fn is_left(&self) -> bool {
        matches!(self, Self::Left | Self::DownLeft | Self::UpLeft)
    }

    pub fn is_right(&self) -> bool {
        matches!(self, Self::Right | Self::DownRight | Self::UpRight)
    }
}

/// Input report as laid out by the fixed report descriptor. The report has
/// no report ID.
#[derive(PackedStruct, Debug, Copy, Clone, PartialEq, Default)]
#[packed_struct(bit_numbering = "msb0", size_bytes = "35")]
pub struct PackedInputDataReport {
    // byte 0
    #[packed_field(bits = "0")]
    pub tr2: bool,
    #[packed_field(bits = "1")]
    pub tl2: bool,
    #[packed_field(bits = "2")]
    pub tr: bool,
    #[packed_field(bits = "3")]
    pub tl: bool,
    #[packed_field(bits = "4")]
    pub west: bool, // Square
    #[packed_field(bits = "5")]
    pub south: bool, // Cross
    #[packed_field(bits = "6")]
    pub east: bool, // Circle
    #[packed_field(bits = "7")]
    pub north: bool, // Triangle

    // byte 1
    #[packed_field(bits = "11")]
    pub mode: bool,
    #[packed_field(bits = "12")]
    pub thumbr: bool,
    #[packed_field(bits = "13")]
    pub thumbl: bool,
    #[packed_field(bits = "14")]
    pub start: bool,
    #[packed_field(bits = "15")]
    pub select: bool,

    // byte 2
    #[packed_field(bits = "20..=23")]
    pub hat: Integer<u8, packed_bits::Bits<4>>,

    // bytes 3-6
    #[packed_field(bytes = "3")]
    pub joystick_l_x: u8,
    #[packed_field(bytes = "4")]
    pub joystick_l_y: u8,
    #[packed_field(bytes = "5")]
    pub joystick_r_x: u8,
    #[packed_field(bytes = "6")]
    pub joystick_r_y: u8,

    // bytes 17-18, L2/R2 touch sensors
    #[packed_field(bytes = "17")]
    pub trigger_l: u8,
    #[packed_field(bytes = "18")]
    pub trigger_r: u8,

    // bytes 27-34
    #[packed_field(bytes = "27..=34")]
    pub vendor: [u8; 8],
}

impl PackedInputDataReport {
    pub fn direction(&self) -> Direction {
        Direction::from_hat(self.hat.to_primitive())
    }
}

/// Vendor output report driving the rumble motors
#[derive(PackedStruct, Debug, Copy, Clone, PartialEq)]
#[packed_struct(bit_numbering = "msb0", size_bytes = "8")]
pub struct PackedRumbleOutputReport {
    #[packed_field(bytes = "0")]
    pub command: u8,
    #[packed_field(bytes = "1")]
    pub reserved: u8,
    #[packed_field(bytes = "2")]
    pub right_motor: u8,
    #[packed_field(bytes = "3")]
    pub left_motor: u8,
    #[packed_field(bytes = "4")]
    pub duration: u8,
    #[packed_field(bytes = "5..=7")]
    pub padding: [u8; 3],
}

impl PackedRumbleOutputReport {
    pub fn new() -> Self {
        Self {
            command: RUMBLE_COMMAND,
            reserved: RUMBLE_RESERVED,
            right_motor: 0,
            left_motor: 0,
            duration: RUMBLE_DURATION_CONTINUOUS,
            padding: [0; 3],
        }
    }

    /// Build a continuous rumble report from 16-bit motor magnitudes. The
    /// right motor is the weak one, the left motor the strong one. Only the
    /// high byte of each magnitude is used.
    pub fn from_magnitudes(strong_magnitude: u16, weak_magnitude: u16) -> Self {
        Self {
            right_motor: (weak_magnitude / 256) as u8,
            left_motor: (strong_magnitude / 256) as u8,
            ..Self::new()
        }
    }
}

impl Default for PackedRumbleOutputReport {
    fn default() -> Self {
        Self::new()
    }
}
