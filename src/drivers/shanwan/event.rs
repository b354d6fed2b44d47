/// Events that can be emitted by the gamepad
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Button(ButtonEvent),
    Joystick(JoystickEvent),
    Trigger(TriggerEvent),
}

/// [BinaryInput] contains either pressed or unpressed
#[derive(Clone, Debug, PartialEq)]
pub struct BinaryInput {
    pub pressed: bool,
}

/// Button events represent binary inputs
#[derive(Clone, Debug, PartialEq)]
pub enum ButtonEvent {
    /// Cross
    South(BinaryInput),
    /// Circle
    East(BinaryInput),
    /// Triangle
    North(BinaryInput),
    /// Square
    West(BinaryInput),
    /// L1
    TL(BinaryInput),
    /// R1
    TR(BinaryInput),
    /// L2
    TL2(BinaryInput),
    /// R2
    TR2(BinaryInput),
    Select(BinaryInput),
    Start(BinaryInput),
    Mode(BinaryInput),
    /// Left stick click
    ThumbL(BinaryInput),
    /// Right stick click
    ThumbR(BinaryInput),
    DPadUp(BinaryInput),
    DPadDown(BinaryInput),
    DPadLeft(BinaryInput),
    DPadRight(BinaryInput),
}

/// [JoystickInput] is the raw stick position, 0-255 on each axis
#[derive(Clone, Debug, PartialEq)]
pub struct JoystickInput {
    pub x: u8,
    pub y: u8,
}

#[derive(Clone, Debug, PartialEq)]
pub enum JoystickEvent {
    LStick(JoystickInput),
    RStick(JoystickInput),
}

/// [TriggerInput] is the raw touch sensor value, 0-255
#[derive(Clone, Debug, PartialEq)]
pub struct TriggerInput {
    pub value: u8,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TriggerEvent {
    LTAnalog(TriggerInput),
    RTAnalog(TriggerInput),
}
