use evdev::{FFEffectCode, FFEffectData, FFEffectKind};
use packed_struct::PackedStruct;

use crate::{
    hid::{
        device_id::{hid_usb_device, HidDeviceId},
        driver::HidDriver,
        report::{HidReport, ReportType},
        transport::{hw_request, SharedTransport},
        ConnectMask, HidDevice, HidError, RequestType,
    },
    input::ff::PlayEffect,
};

use super::{
    event::{
        BinaryInput, ButtonEvent, Event, JoystickEvent, JoystickInput, TriggerEvent, TriggerInput,
    },
    hid_report::{PackedInputDataReport, PackedRumbleOutputReport},
    report_descriptor::{report_fixup, RDESC_ORIG_SIZE},
};

// Hardware ID's
pub const VID: u16 = 0x2563;
pub const PID: u16 = 0x0575;

pub const DRIVER_NAME: &str = "shanwan";

static ID_TABLE: [HidDeviceId; 1] = [hid_usb_device(VID, PID)];

// Input report size
pub const PACKET_SIZE: usize = 35;

// HID buffer read timeout
pub const HID_TIMEOUT: i32 = 10;

/// Force feedback context of an attached gamepad. Holds the output report
/// used for rumble.
pub struct ShanwanDevice {
    report: HidReport,
    transport: SharedTransport,
}

impl ShanwanDevice {
    pub fn new(report: HidReport, transport: SharedTransport) -> Self {
        Self { report, transport }
    }
}

impl PlayEffect for ShanwanDevice {
    fn play(&mut self, effect: &FFEffectData) -> Result<(), HidError> {
        let FFEffectKind::Rumble {
            strong_magnitude,
            weak_magnitude,
        } = effect.kind
        else {
            return Ok(());
        };

        let report = PackedRumbleOutputReport::from_magnitudes(strong_magnitude, weak_magnitude);
        log::trace!("Sending rumble report: {report:?}");
        let buf = report.pack()?;
        hw_request(
            &self.transport,
            &self.report,
            &buf,
            RequestType::SetReport,
        )?;

        Ok(())
    }
}

/// HID driver for the Shanwan USB wireless gamepad
#[derive(Debug, Clone)]
pub struct Driver {
    force_feedback: bool,
}

impl Driver {
    pub fn new() -> Self {
        Self {
            force_feedback: true,
        }
    }

    /// Enable or disable rumble support
    pub fn with_force_feedback(mut self, enabled: bool) -> Self {
        self.force_feedback = enabled;
        self
    }

    /// Set up rumble on the first input device of the gamepad using its first
    /// output report.
    pub fn init(&self, hid: &mut HidDevice) -> Result<(), HidError> {
        if hid.inputs().is_empty() {
            log::error!("{}: no inputs found", hid.name());
            return Err(HidError::NoInputs);
        }

        let Some(report) = hid.reports(ReportType::Output).first().cloned() else {
            log::error!("{}: no output reports found", hid.name());
            return Err(HidError::NoOutputReports);
        };

        let shanwan = Box::new(ShanwanDevice::new(report, hid.transport()));
        let input = &mut hid.inputs_mut()[0];
        input.set_ffbit(FFEffectCode::FF_RUMBLE);
        input.create_ff_memless(shanwan)?;

        Ok(())
    }
}

impl Default for Driver {
    fn default() -> Self {
        Self::new()
    }
}

impl HidDriver for Driver {
    fn name(&self) -> &'static str {
        DRIVER_NAME
    }

    fn id_table(&self) -> &'static [HidDeviceId] {
        &ID_TABLE
    }

    fn report_fixup<'a>(&self, hid: &HidDevice, rdesc: &'a [u8]) -> &'a [u8] {
        if rdesc.len() == RDESC_ORIG_SIZE {
            log::debug!("{}: fixing up report descriptor", hid.name());
        } else {
            log::warn!(
                "{}: unexpected rdesc of {} bytes, please submit for review",
                hid.name(),
                rdesc.len()
            );
        }
        report_fixup(rdesc)
    }

    fn probe(&self, hid: &mut HidDevice, _id: &HidDeviceId) -> Result<(), HidError> {
        if let Err(e) = hid.parse() {
            log::error!("{}: parse failed", hid.name());
            return Err(e);
        }

        // Force feedback is handled by this driver
        if let Err(e) = hid.hw_start(ConnectMask::DEFAULT.without(ConnectMask::FF)) {
            log::error!("{}: hw start failed", hid.name());
            return Err(e);
        }

        if self.force_feedback {
            if let Err(e) = self.init(hid) {
                log::warn!(
                    "{}: Failed to enable force feedback support, error: {e}",
                    hid.name()
                );
            }
        } else {
            log::info!("{}: force feedback disabled", hid.name());
        }

        if let Err(e) = hid.hw_open() {
            log::error!("{}: hw open failed", hid.name());
            hid.hw_stop();
            return Err(e);
        }

        Ok(())
    }

    fn remove(&self, hid: &mut HidDevice) {
        hid.hw_close();
        hid.hw_stop();
    }
}

type ButtonVariant = fn(BinaryInput) -> ButtonEvent;

#[derive(Debug, Clone, Default)]
struct DPadState {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
}

/// Decodes input reports of the gamepad into events
#[derive(Debug, Default)]
pub struct InputHandler {
    /// State for the device
    state: Option<PackedInputDataReport>,
    /// Last DPad state
    dpad: DPadState,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unpacks the buffer into a [PackedInputDataReport] and returns the
    /// events for everything that changed since the last report.
    pub fn handle_input_report(&mut self, buf: &[u8]) -> Result<Vec<Event>, HidError> {
        let Ok(sized_buf) = <&[u8; PACKET_SIZE]>::try_from(buf) else {
            log::trace!("Ignoring input report of {} bytes", buf.len());
            return Ok(vec![]);
        };
        let input_report = PackedInputDataReport::unpack(sized_buf)?;

        // Update the state
        let old_state = self.update_state(input_report);

        // Translate the state into a stream of input events
        let events = self.translate_events(old_state);

        Ok(events)
    }

    fn update_state(
        &mut self,
        input_report: PackedInputDataReport,
    ) -> Option<PackedInputDataReport> {
        let old_state = self.state;
        self.state = Some(input_report);
        old_state
    }

    /// Translate the state into individual events
    fn translate_events(&mut self, old_state: Option<PackedInputDataReport>) -> Vec<Event> {
        let mut events = Vec::new();
        let Some(state) = self.state else {
            return events;
        };

        // Translate state changes into events if they have changed
        let Some(old_state) = old_state else {
            return events;
        };

        // Binary events
        let buttons: [(bool, bool, ButtonVariant); 13] = [
            (state.south, old_state.south, ButtonEvent::South),
            (state.east, old_state.east, ButtonEvent::East),
            (state.north, old_state.north, ButtonEvent::North),
            (state.west, old_state.west, ButtonEvent::West),
            (state.tl, old_state.tl, ButtonEvent::TL),
            (state.tr, old_state.tr, ButtonEvent::TR),
            (state.tl2, old_state.tl2, ButtonEvent::TL2),
            (state.tr2, old_state.tr2, ButtonEvent::TR2),
            (state.select, old_state.select, ButtonEvent::Select),
            (state.start, old_state.start, ButtonEvent::Start),
            (state.mode, old_state.mode, ButtonEvent::Mode),
            (state.thumbl, old_state.thumbl, ButtonEvent::ThumbL),
            (state.thumbr, old_state.thumbr, ButtonEvent::ThumbR),
        ];
        for (pressed, was_pressed, event) in buttons {
            if pressed != was_pressed {
                events.push(Event::Button(event(BinaryInput { pressed })));
            }
        }

        // Hat switch, releases are sent before presses
        if state.hat != old_state.hat {
            let direction = state.direction();
            let dpad_state = DPadState {
                up: direction.is_up(),
                down: direction.is_down(),
                left: direction.is_left(),
                right: direction.is_right(),
            };

            let changes: [(bool, bool, ButtonVariant); 4] = [
                (dpad_state.up, self.dpad.up, ButtonEvent::DPadUp),
                (dpad_state.down, self.dpad.down, ButtonEvent::DPadDown),
                (dpad_state.left, self.dpad.left, ButtonEvent::DPadLeft),
                (dpad_state.right, self.dpad.right, ButtonEvent::DPadRight),
            ];
            let (presses, releases): (Vec<_>, Vec<_>) = changes
                .into_iter()
                .filter(|(pressed, was_pressed, _)| pressed != was_pressed)
                .partition(|(pressed, _, _)| *pressed);
            for (pressed, _, event) in releases.into_iter().chain(presses) {
                events.push(Event::Button(event(BinaryInput { pressed })));
            }

            self.dpad = dpad_state;
        }

        // Axis events
        if state.joystick_l_x != old_state.joystick_l_x
            || state.joystick_l_y != old_state.joystick_l_y
        {
            events.push(Event::Joystick(JoystickEvent::LStick(JoystickInput {
                x: state.joystick_l_x,
                y: state.joystick_l_y,
            })));
        }
        if state.joystick_r_x != old_state.joystick_r_x
            || state.joystick_r_y != old_state.joystick_r_y
        {
            events.push(Event::Joystick(JoystickEvent::RStick(JoystickInput {
                x: state.joystick_r_x,
                y: state.joystick_r_y,
            })));
        }

        if state.trigger_l != old_state.trigger_l {
            events.push(Event::Trigger(TriggerEvent::LTAnalog(TriggerInput {
                value: state.trigger_l,
            })));
        }
        if state.trigger_r != old_state.trigger_r {
            events.push(Event::Trigger(TriggerEvent::RTAnalog(TriggerInput {
                value: state.trigger_r,
            })));
        }

        log::trace!("Got events: {events:?}");

        events
    }
}
