//! Translation of gamepad events into evdev events, following the button and
//! axis layout the fixed report descriptor declares.
use evdev::{AbsInfo, AbsoluteAxisCode, EventType, InputEvent, KeyCode, UinputAbsSetup};

use super::event::{ButtonEvent, Event, JoystickEvent, TriggerEvent};

/// Buttons exposed by the gamepad
pub const KEYS: [KeyCode; 13] = [
    KeyCode::BTN_SOUTH,
    KeyCode::BTN_EAST,
    KeyCode::BTN_NORTH,
    KeyCode::BTN_WEST,
    KeyCode::BTN_TL,
    KeyCode::BTN_TR,
    KeyCode::BTN_TL2,
    KeyCode::BTN_TR2,
    KeyCode::BTN_SELECT,
    KeyCode::BTN_START,
    KeyCode::BTN_MODE,
    KeyCode::BTN_THUMBL,
    KeyCode::BTN_THUMBR,
];

// Sticks and touch sensors report 0-255
const AXIS_MIN: i32 = 0;
const AXIS_MAX: i32 = 255;
const AXIS_CENTER: i32 = 128;

/// Returns the absolute axes exposed by the gamepad
pub fn abs_axes() -> Vec<UinputAbsSetup> {
    // Same fuzz and flat the kernel picks for a 0-255 gamepad axis
    let fuzz = (AXIS_MAX - AXIS_MIN) >> 8;
    let flat = (AXIS_MAX - AXIS_MIN) >> 4;
    let joystick_setup = AbsInfo::new(AXIS_CENTER, AXIS_MIN, AXIS_MAX, fuzz, flat, 0);
    let triggers_setup = AbsInfo::new(AXIS_MIN, AXIS_MIN, AXIS_MAX, fuzz, flat, 0);
    let dpad_setup = AbsInfo::new(0, -1, 1, 0, 0, 0);

    vec![
        UinputAbsSetup::new(AbsoluteAxisCode::ABS_X, joystick_setup),
        UinputAbsSetup::new(AbsoluteAxisCode::ABS_Y, joystick_setup),
        UinputAbsSetup::new(AbsoluteAxisCode::ABS_RX, joystick_setup),
        UinputAbsSetup::new(AbsoluteAxisCode::ABS_RY, joystick_setup),
        UinputAbsSetup::new(AbsoluteAxisCode::ABS_Z, triggers_setup),
        UinputAbsSetup::new(AbsoluteAxisCode::ABS_RZ, triggers_setup),
        UinputAbsSetup::new(AbsoluteAxisCode::ABS_HAT0X, dpad_setup),
        UinputAbsSetup::new(AbsoluteAxisCode::ABS_HAT0Y, dpad_setup),
    ]
}

fn key(code: KeyCode, pressed: bool) -> InputEvent {
    InputEvent::new(EventType::KEY.0, code.0, pressed as i32)
}

fn abs(code: AbsoluteAxisCode, value: i32) -> InputEvent {
    InputEvent::new(EventType::ABSOLUTE.0, code.0, value)
}

/// Translate the given gamepad event into evdev events
pub fn translate_event(event: &Event) -> Vec<InputEvent> {
    match event {
        Event::Button(button) => match button {
            ButtonEvent::South(value) => vec![key(KeyCode::BTN_SOUTH, value.pressed)],
            ButtonEvent::East(value) => vec![key(KeyCode::BTN_EAST, value.pressed)],
            ButtonEvent::North(value) => vec![key(KeyCode::BTN_NORTH, value.pressed)],
            ButtonEvent::West(value) => vec![key(KeyCode::BTN_WEST, value.pressed)],
            ButtonEvent::TL(value) => vec![key(KeyCode::BTN_TL, value.pressed)],
            ButtonEvent::TR(value) => vec![key(KeyCode::BTN_TR, value.pressed)],
            ButtonEvent::TL2(value) => vec![key(KeyCode::BTN_TL2, value.pressed)],
            ButtonEvent::TR2(value) => vec![key(KeyCode::BTN_TR2, value.pressed)],
            ButtonEvent::Select(value) => vec![key(KeyCode::BTN_SELECT, value.pressed)],
            ButtonEvent::Start(value) => vec![key(KeyCode::BTN_START, value.pressed)],
            ButtonEvent::Mode(value) => vec![key(KeyCode::BTN_MODE, value.pressed)],
            ButtonEvent::ThumbL(value) => vec![key(KeyCode::BTN_THUMBL, value.pressed)],
            ButtonEvent::ThumbR(value) => vec![key(KeyCode::BTN_THUMBR, value.pressed)],
            // The hat is a single axis pair, so a release centers the axis
            ButtonEvent::DPadUp(value) => {
                vec![abs(AbsoluteAxisCode::ABS_HAT0Y, -(value.pressed as i32))]
            }
            ButtonEvent::DPadDown(value) => {
                vec![abs(AbsoluteAxisCode::ABS_HAT0Y, value.pressed as i32)]
            }
            ButtonEvent::DPadLeft(value) => {
                vec![abs(AbsoluteAxisCode::ABS_HAT0X, -(value.pressed as i32))]
            }
            ButtonEvent::DPadRight(value) => {
                vec![abs(AbsoluteAxisCode::ABS_HAT0X, value.pressed as i32)]
            }
        },
        Event::Joystick(joystick) => match joystick {
            JoystickEvent::LStick(value) => vec![
                abs(AbsoluteAxisCode::ABS_X, value.x as i32),
                abs(AbsoluteAxisCode::ABS_Y, value.y as i32),
            ],
            JoystickEvent::RStick(value) => vec![
                abs(AbsoluteAxisCode::ABS_RX, value.x as i32),
                abs(AbsoluteAxisCode::ABS_RY, value.y as i32),
            ],
        },
        Event::Trigger(trigger) => match trigger {
            TriggerEvent::LTAnalog(value) => vec![abs(AbsoluteAxisCode::ABS_Z, value.value as i32)],
            TriggerEvent::RTAnalog(value) => {
                vec![abs(AbsoluteAxisCode::ABS_RZ, value.value as i32)]
            }
        },
    }
}
