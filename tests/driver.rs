use std::error::Error;
use std::sync::{Arc, Mutex};

use evdev::{FFEffectData, FFEffectKind, FFReplay, FFTrigger};

use shanwan::drivers::shanwan::driver::{Driver, PID, VID};
use shanwan::drivers::shanwan::report_descriptor::RDESC_ORIG_SIZE;
use shanwan::hid::device_id::hid_usb_device;
use shanwan::hid::driver::{bind, unbind};
use shanwan::hid::report::ReportType;
use shanwan::hid::transport::Transport;
use shanwan::hid::{HidDevice, HidError};

/// Transport that keeps every written output report
#[derive(Default)]
struct Gamepad {
    written: Vec<Vec<u8>>,
    opened: bool,
}

impl Transport for Gamepad {
    fn raw_descriptor(&mut self) -> Result<Vec<u8>, HidError> {
        Ok(vec![0; RDESC_ORIG_SIZE])
    }

    fn start(&mut self) -> Result<(), HidError> {
        Ok(())
    }

    fn stop(&mut self) {}

    fn open(&mut self) -> Result<(), HidError> {
        self.opened = true;
        Ok(())
    }

    fn close(&mut self) {
        self.opened = false;
    }

    fn read(&mut self, _buf: &mut [u8], _timeout_ms: i32) -> Result<usize, HidError> {
        Ok(0)
    }

    fn set_report(
        &mut self,
        report_type: ReportType,
        report_id: u8,
        data: &[u8],
    ) -> Result<(), HidError> {
        assert_eq!(report_type, ReportType::Output);
        assert_eq!(report_id, 0);
        self.written.push(data.to_vec());
        Ok(())
    }
}

#[tokio::test]
async fn test_rumble_through_bound_driver() -> Result<(), Box<dyn Error>> {
    let gamepad = Arc::new(Mutex::new(Gamepad::default()));
    let mut hid = HidDevice::new(
        hid_usb_device(VID, PID),
        "Shanwan Gamepad",
        gamepad.clone(),
    );
    let driver = Driver::new();

    bind(&driver, &mut hid)?;
    assert!(gamepad.lock().unwrap().opened);

    let ff = hid.inputs_mut()[0].ff_mut().ok_or("no force feedback")?;
    let effect = FFEffectData {
        direction: 0,
        trigger: FFTrigger {
            button: 0,
            interval: 0,
        },
        replay: FFReplay {
            length: 500,
            delay: 0,
        },
        kind: FFEffectKind::Rumble {
            strong_magnitude: 0x3200,
            weak_magnitude: 0x1900,
        },
    };
    ff.upload(0, effect)?;
    ff.playback(0, 1)?;
    ff.erase(0)?;

    unbind(&driver, &mut hid);

    let gamepad = gamepad.lock().unwrap();
    assert!(!gamepad.opened);
    assert_eq!(
        gamepad.written,
        vec![
            vec![0x02, 0x08, 0x19, 0x32, 0xff, 0x00, 0x00, 0x00],
            vec![0x02, 0x08, 0x00, 0x00, 0xff, 0x00, 0x00, 0x00],
        ]
    );

    Ok(())
}
