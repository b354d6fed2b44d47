use std::error::Error;

use evdev::{FFEffectCode, FFEffectData, FFEffectKind, FFReplay, FFTrigger};

use crate::{
    drivers::shanwan::{
        driver::{Driver, InputHandler, ShanwanDevice, PID, VID},
        event::{BinaryInput, ButtonEvent, Event, JoystickEvent, JoystickInput, TriggerEvent, TriggerInput},
        report_descriptor::{RDESC_FIXED, RDESC_ORIG_SIZE},
    },
    hid::{
        driver::{bind, unbind, HidDriver},
        mock::{mock_device, Call, MockTransport},
        report::{HidReport, ReportType},
        HidError,
    },
    input::ff::PlayEffect,
};

#[rustfmt::skip]
const RDESC_INPUT_ONLY: [u8; 13] = [
    0x05, 0x01, 0x09, 0x05, 0xa1, 0x01,
    0x75, 0x08, 0x95, 0x01, 0x81, 0x02,
    0xc0,
];

#[rustfmt::skip]
const RDESC_OUTPUT_ONLY: [u8; 13] = [
    0x05, 0x01, 0x09, 0x05, 0xa1, 0x01,
    0x75, 0x08, 0x95, 0x08, 0x91, 0x02,
    0xc0,
];

fn effect(kind: FFEffectKind) -> FFEffectData {
    FFEffectData {
        direction: 0,
        trigger: FFTrigger {
            button: 0,
            interval: 0,
        },
        replay: FFReplay {
            length: 0,
            delay: 0,
        },
        kind,
    }
}

fn rumble(strong: u16, weak: u16) -> FFEffectData {
    effect(FFEffectKind::Rumble {
        strong_magnitude: strong,
        weak_magnitude: weak,
    })
}

fn output_report() -> HidReport {
    HidReport {
        id: 0,
        report_type: ReportType::Output,
        size: 64,
    }
}

#[tokio::test]
async fn test_play_rumble() -> Result<(), Box<dyn Error>> {
    let transport = MockTransport::new(&[]);
    let mut shanwan = ShanwanDevice::new(output_report(), transport.clone());

    shanwan.play(&rumble(0x3200, 0x1900))?;
    shanwan.play(&rumble(0, 0))?;

    let calls = transport.lock().unwrap().calls.clone();
    assert_eq!(
        calls,
        vec![
            Call::SetReport(
                ReportType::Output,
                0,
                vec![0x02, 0x08, 0x19, 0x32, 0xff, 0x00, 0x00, 0x00]
            ),
            Call::SetReport(
                ReportType::Output,
                0,
                vec![0x02, 0x08, 0x00, 0x00, 0xff, 0x00, 0x00, 0x00]
            ),
        ]
    );

    Ok(())
}

#[tokio::test]
async fn test_play_ignores_other_effects() -> Result<(), Box<dyn Error>> {
    let transport = MockTransport::new(&[]);
    let mut shanwan = ShanwanDevice::new(output_report(), transport.clone());

    shanwan.play(&effect(FFEffectKind::Damper))?;
    shanwan.play(&effect(FFEffectKind::Inertia))?;

    assert!(transport.lock().unwrap().calls.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_play_propagates_transport_errors() -> Result<(), Box<dyn Error>> {
    let transport = MockTransport::new(&[]);
    transport.lock().unwrap().fail_set_report = true;
    let mut shanwan = ShanwanDevice::new(output_report(), transport.clone());

    let result = shanwan.play(&rumble(0xffff, 0xffff));
    assert!(matches!(result, Err(HidError::Transport(_))));

    Ok(())
}

#[tokio::test]
async fn test_bind_fixes_descriptor_and_enables_rumble() -> Result<(), Box<dyn Error>> {
    // The broken descriptor is only recognized by its size
    let transport = MockTransport::new(&[0u8; RDESC_ORIG_SIZE]);
    let mut hid = mock_device(&transport, VID, PID);
    let driver = Driver::new();

    bind(&driver, &mut hid)?;

    assert_eq!(hid.rdesc(), RDESC_FIXED.as_slice());
    assert_eq!(hid.reports(ReportType::Input)[0].len(), 35);
    assert_eq!(hid.inputs().len(), 1);

    let input = &mut hid.inputs_mut()[0];
    assert!(input.has_ff());
    assert!(input.ffbit().contains(FFEffectCode::FF_RUMBLE));
    assert!(input.ffbit().contains(FFEffectCode::FF_GAIN));

    let ff = input.ff_mut().unwrap();
    ff.upload(0, rumble(0x3200, 0x1900))?;
    ff.playback(0, 1)?;
    ff.playback(0, 0)?;

    let guard = transport.lock().unwrap();
    assert_eq!(
        guard.lifecycle(),
        vec![Call::RawDescriptor, Call::Start, Call::Open]
    );
    assert_eq!(
        guard.written(),
        vec![
            vec![0x02, 0x08, 0x19, 0x32, 0xff, 0x00, 0x00, 0x00],
            vec![0x02, 0x08, 0x00, 0x00, 0xff, 0x00, 0x00, 0x00],
        ]
    );
    assert!(guard.opened);

    Ok(())
}

#[tokio::test]
async fn test_bind_rejects_other_devices() -> Result<(), Box<dyn Error>> {
    let transport = MockTransport::new(&RDESC_FIXED);
    let mut hid = mock_device(&transport, VID, 0x0576);

    let result = bind(&Driver::new(), &mut hid);

    assert!(matches!(result, Err(HidError::NoDevice)));
    assert!(transport.lock().unwrap().calls.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_init_without_inputs() -> Result<(), Box<dyn Error>> {
    let transport = MockTransport::new(&RDESC_OUTPUT_ONLY);
    let mut hid = mock_device(&transport, VID, PID);
    let driver = Driver::new();

    // Output reports only, so no input device is connected
    bind(&driver, &mut hid)?;
    assert!(hid.inputs().is_empty());
    assert!(matches!(driver.init(&mut hid), Err(HidError::NoInputs)));

    // Still opened even though force feedback is missing
    assert!(transport.lock().unwrap().opened);

    Ok(())
}

#[tokio::test]
async fn test_init_without_output_reports() -> Result<(), Box<dyn Error>> {
    let transport = MockTransport::new(&RDESC_INPUT_ONLY);
    let mut hid = mock_device(&transport, VID, PID);
    let driver = Driver::new();

    bind(&driver, &mut hid)?;

    assert_eq!(hid.inputs().len(), 1);
    assert!(!hid.inputs()[0].has_ff());
    assert!(!hid.inputs()[0].ffbit().contains(FFEffectCode::FF_RUMBLE));
    assert!(matches!(
        driver.init(&mut hid),
        Err(HidError::NoOutputReports)
    ));
    assert!(transport.lock().unwrap().opened);

    Ok(())
}

#[tokio::test]
async fn test_force_feedback_disabled() -> Result<(), Box<dyn Error>> {
    let transport = MockTransport::new(&RDESC_FIXED);
    let mut hid = mock_device(&transport, VID, PID);
    let driver = Driver::new().with_force_feedback(false);

    bind(&driver, &mut hid)?;

    assert_eq!(hid.inputs().len(), 1);
    assert!(!hid.inputs()[0].has_ff());

    Ok(())
}

#[tokio::test]
async fn test_bind_fails_when_start_fails() -> Result<(), Box<dyn Error>> {
    let transport = MockTransport::new(&RDESC_FIXED);
    transport.lock().unwrap().fail_start = true;
    let mut hid = mock_device(&transport, VID, PID);

    let result = bind(&Driver::new(), &mut hid);

    assert!(matches!(result, Err(HidError::Transport(_))));
    assert!(hid.inputs().is_empty());
    assert_eq!(
        transport.lock().unwrap().lifecycle(),
        vec![Call::RawDescriptor, Call::Start]
    );

    Ok(())
}

#[tokio::test]
async fn test_bind_fails_on_bad_descriptor() -> Result<(), Box<dyn Error>> {
    // Unterminated collection
    let transport = MockTransport::new(&[0xa1, 0x01]);
    let mut hid = mock_device(&transport, VID, PID);

    let result = bind(&Driver::new(), &mut hid);

    assert!(matches!(result, Err(HidError::Parse(_))));
    assert_eq!(
        transport.lock().unwrap().lifecycle(),
        vec![Call::RawDescriptor]
    );

    Ok(())
}

#[tokio::test]
async fn test_bind_stops_when_open_fails() -> Result<(), Box<dyn Error>> {
    let transport = MockTransport::new(&RDESC_FIXED);
    transport.lock().unwrap().fail_open = true;
    let mut hid = mock_device(&transport, VID, PID);

    let result = bind(&Driver::new(), &mut hid);

    assert!(matches!(result, Err(HidError::Transport(_))));
    assert!(hid.inputs().is_empty());
    assert_eq!(
        transport.lock().unwrap().lifecycle(),
        vec![Call::RawDescriptor, Call::Start, Call::Open, Call::Stop]
    );

    Ok(())
}

#[tokio::test]
async fn test_remove_closes_then_stops() -> Result<(), Box<dyn Error>> {
    let transport = MockTransport::new(&RDESC_FIXED);
    let mut hid = mock_device(&transport, VID, PID);
    let driver = Driver::new();

    bind(&driver, &mut hid)?;
    transport.lock().unwrap().calls.clear();
    unbind(&driver, &mut hid);

    assert!(hid.inputs().is_empty());
    let guard = transport.lock().unwrap();
    assert_eq!(guard.lifecycle(), vec![Call::Close, Call::Stop]);
    assert!(!guard.opened);

    Ok(())
}

#[tokio::test]
async fn test_report_fixup_callback() -> Result<(), Box<dyn Error>> {
    let transport = MockTransport::new(&[]);
    let hid = mock_device(&transport, VID, PID);
    let driver = Driver::new();

    let broken = [0u8; RDESC_ORIG_SIZE];
    assert_eq!(driver.report_fixup(&hid, &broken), RDESC_FIXED.as_slice());

    let other = [0x05, 0x01];
    assert_eq!(driver.report_fixup(&hid, &other), other.as_slice());

    Ok(())
}

#[tokio::test]
async fn test_input_reports() -> Result<(), Box<dyn Error>> {
    let mut handler = InputHandler::new();
    let mut buf = [0u8; 35];
    buf[2] = 0x0f;
    buf[3] = 0x80;
    buf[4] = 0x80;

    // First report only sets the state
    assert!(handler.handle_input_report(&buf)?.is_empty());

    // Wrong sizes are ignored
    assert!(handler.handle_input_report(&buf[..8])?.is_empty());

    buf[0] = 0x04; // South
    buf[1] = 0x10; // Mode
    buf[3] = 0x00;
    buf[17] = 0xff;
    let events = handler.handle_input_report(&buf)?;
    assert_eq!(
        events,
        vec![
            Event::Button(ButtonEvent::South(BinaryInput { pressed: true })),
            Event::Button(ButtonEvent::Mode(BinaryInput { pressed: true })),
            Event::Joystick(JoystickEvent::LStick(JoystickInput { x: 0x00, y: 0x80 })),
            Event::Trigger(TriggerEvent::LTAnalog(TriggerInput { value: 0xff })),
        ]
    );

    // Nothing changed
    assert!(handler.handle_input_report(&buf)?.is_empty());

    buf[0] = 0x00;
    let events = handler.handle_input_report(&buf)?;
    assert_eq!(
        events,
        vec![Event::Button(ButtonEvent::South(BinaryInput {
            pressed: false
        }))]
    );

    Ok(())
}

#[tokio::test]
async fn test_hat_releases_before_presses() -> Result<(), Box<dyn Error>> {
    let mut handler = InputHandler::new();
    let mut buf = [0u8; 35];
    buf[2] = 0x0f;
    handler.handle_input_report(&buf)?;

    buf[2] = 0x04; // Down
    let events = handler.handle_input_report(&buf)?;
    assert_eq!(
        events,
        vec![Event::Button(ButtonEvent::DPadDown(BinaryInput {
            pressed: true
        }))]
    );

    buf[2] = 0x07; // Up-left
    let events = handler.handle_input_report(&buf)?;
    assert_eq!(
        events,
        vec![
            Event::Button(ButtonEvent::DPadDown(BinaryInput { pressed: false })),
            Event::Button(ButtonEvent::DPadUp(BinaryInput { pressed: true })),
            Event::Button(ButtonEvent::DPadLeft(BinaryInput { pressed: true })),
        ]
    );

    buf[2] = 0x0f; // Released
    let events = handler.handle_input_report(&buf)?;
    assert_eq!(
        events,
        vec![
            Event::Button(ButtonEvent::DPadUp(BinaryInput { pressed: false })),
            Event::Button(ButtonEvent::DPadLeft(BinaryInput { pressed: false })),
        ]
    );

    Ok(())
}
