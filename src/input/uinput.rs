//! Virtual evdev device that exposes a connected [InputDevice] to the rest of
//! the system through uinput, and feeds force feedback requests made by
//! applications back into the device's force feedback backend.
use std::{error::Error, os::fd::AsRawFd};

use evdev::{
    uinput::{VirtualDevice, VirtualDeviceBuilder},
    AttributeSet, EventSummary, FFEffectCode, FFStatusCode, InputEvent, KeyCode,
    SynchronizationCode, SynchronizationEvent, UInputCode, UinputAbsSetup,
};
use nix::{
    errno::Errno,
    fcntl::{FcntlArg, OFlag},
};

use crate::hid::HidError;

use super::{device::InputDevice, ff::FF_MEMLESS_EFFECTS};

/// Returned to the application when a force feedback request fails
const FF_REQUEST_FAILED: i32 = -(Errno::EINVAL as i32);

/// Returns the uinput return value for the result of a force feedback
/// upload or erase request.
pub fn ff_retval(result: &Result<(), HidError>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(_) => FF_REQUEST_FAILED,
    }
}

/// A uinput gamepad backing an [InputDevice]
pub struct VirtualGamepad {
    device: VirtualDevice,
}

impl VirtualGamepad {
    /// Create the virtual device with the given buttons and axes. Force
    /// feedback is advertised if the input device has a force feedback
    /// backend.
    pub fn new(
        name: &str,
        input: &InputDevice,
        keys: &[KeyCode],
        axes: &[UinputAbsSetup],
    ) -> Result<Self, Box<dyn Error + Send + Sync>> {
        log::debug!("Creating virtual gamepad '{name}'");
        let mut key_set = AttributeSet::<KeyCode>::new();
        for key in keys {
            key_set.insert(*key);
        }

        let mut builder = VirtualDeviceBuilder::new()?
            .name(name)
            .with_keys(&key_set)?;
        for axis in axes {
            builder = builder.with_absolute_axis(axis)?;
        }
        if input.has_ff() {
            log::debug!("Advertising force feedback: {:?}", input.ffbit());
            builder = builder
                .with_ff(input.ffbit())?
                .with_ff_effects_max(FF_MEMLESS_EFFECTS as u32);
        }
        let device = builder.build()?;

        // Force feedback requests are polled, so reads must not block
        let raw_fd = device.as_raw_fd();
        nix::fcntl::fcntl(raw_fd, FcntlArg::F_SETFL(OFlag::O_NONBLOCK))?;

        Ok(Self { device })
    }

    /// Emit the given events followed by a sync report
    pub fn emit(&mut self, events: &[InputEvent]) -> Result<(), Box<dyn Error + Send + Sync>> {
        if events.is_empty() {
            return Ok(());
        }
        self.device.emit(events)?;
        self.device
            .emit(&[SynchronizationEvent::new(SynchronizationCode::SYN_REPORT, 0).into()])?;
        Ok(())
    }

    /// Process pending force feedback requests from applications and apply
    /// them to the given input device.
    pub fn process_ff(
        &mut self,
        input: &mut InputDevice,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let events: Vec<InputEvent> = match self.device.fetch_events() {
            Ok(events) => events.collect(),
            Err(err) => match err.kind() {
                // Do nothing if this would block
                std::io::ErrorKind::WouldBlock => vec![],
                _ => {
                    log::trace!("Failed to fetch events: {:?}", err);
                    return Err(err.into());
                }
            },
        };

        const STOPPED: i32 = FFStatusCode::FF_STATUS_STOPPED.0 as i32;

        for event in events {
            match event.destructure() {
                EventSummary::UInput(event, UInputCode::UI_FF_UPLOAD, ..) => {
                    let mut event = self.device.process_ff_upload(event)?;
                    let effect_id = event.effect_id();
                    log::debug!("Upload effect: {:?} with id {}", event.effect(), effect_id);

                    let Some(ff) = input.ff_mut() else {
                        event.set_retval(FF_REQUEST_FAILED);
                        continue;
                    };
                    let result = ff.upload(effect_id, event.effect());
                    if let Err(e) = &result {
                        log::warn!("Failed to upload effect {effect_id}: {e}");
                    }
                    event.set_retval(ff_retval(&result));
                }
                EventSummary::UInput(event, UInputCode::UI_FF_ERASE, ..) => {
                    let mut event = self.device.process_ff_erase(event)?;
                    let effect_id = event.effect_id() as i16;
                    log::debug!("Erase effect: {effect_id}");

                    let Some(ff) = input.ff_mut() else {
                        event.set_retval(FF_REQUEST_FAILED);
                        continue;
                    };
                    let result = ff.erase(effect_id);
                    if let Err(e) = &result {
                        log::warn!("Failed to erase effect {effect_id}: {e}");
                    }
                    event.set_retval(ff_retval(&result));
                }
                EventSummary::ForceFeedback(_, FFEffectCode::FF_GAIN, value) => {
                    let Some(ff) = input.ff_mut() else {
                        continue;
                    };
                    let gain = value.clamp(0, u16::MAX as i32) as u16;
                    if let Err(e) = ff.set_gain(gain) {
                        log::warn!("Failed to set gain: {e}");
                    }
                }
                EventSummary::ForceFeedback(_, effect_id, value) => {
                    if value == STOPPED {
                        log::debug!("Stopped effect ID: {}", effect_id.0);
                    } else {
                        log::debug!("Playing effect ID: {}", effect_id.0);
                    }
                    let Some(ff) = input.ff_mut() else {
                        continue;
                    };
                    if let Err(e) = ff.playback(effect_id.0 as i16, value) {
                        log::warn!("Failed to play effect {}: {e}", effect_id.0);
                    }
                }
                _ => {
                    log::trace!("Unhandled event: {:?}", event);
                }
            }
        }

        Ok(())
    }
}

impl std::fmt::Debug for VirtualGamepad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualGamepad").finish()
    }
}
