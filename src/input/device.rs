use evdev::{AttributeSet, AttributeSetRef, FFEffectCode};

use crate::hid::HidError;

use super::ff::{MemlessForceFeedback, PlayEffect};

/// An input device connected to a HID device. It carries the force feedback
/// capabilities and the force feedback backend, if any.
pub struct InputDevice {
    name: String,
    ffbit: AttributeSet<FFEffectCode>,
    ff: Option<MemlessForceFeedback>,
}

impl InputDevice {
    pub fn new(name: String) -> Self {
        Self {
            name,
            ffbit: AttributeSet::new(),
            ff: None,
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Force feedback effects supported by the device
    pub fn ffbit(&self) -> &AttributeSetRef<FFEffectCode> {
        &self.ffbit
    }

    pub fn set_ffbit(&mut self, code: FFEffectCode) {
        self.ffbit.insert(code);
    }

    /// Returns true if a force feedback backend has been created
    pub fn has_ff(&self) -> bool {
        self.ff.is_some()
    }

    pub fn ff_mut(&mut self) -> Option<&mut MemlessForceFeedback> {
        self.ff.as_mut()
    }

    /// Create a memory-less force feedback backend for the device. Effects
    /// uploaded to the device are combined and handed to the given player.
    pub fn create_ff_memless(&mut self, play: Box<dyn PlayEffect>) -> Result<(), HidError> {
        if self.ff.is_some() {
            return Err(HidError::Unsupported(format!(
                "{}: force feedback already created",
                self.name
            )));
        }
        let ff = MemlessForceFeedback::new(play)?;
        self.ffbit.insert(FFEffectCode::FF_GAIN);
        self.ff = Some(ff);
        Ok(())
    }
}

impl std::fmt::Debug for InputDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputDevice")
            .field("name", &self.name)
            .field("ffbit", &self.ffbit)
            .field("ff", &self.ff.is_some())
            .finish()
    }
}
