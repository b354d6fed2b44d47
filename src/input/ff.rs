//! Memory-less force feedback. Devices that cannot store effects themselves
//! get their effects stored here; whenever the set of playing effects
//! changes, the playing rumble effects are combined into one effect and
//! handed to the device's [PlayEffect] implementation. Effect replay timing
//! (length and delay) is not emulated.
use evdev::{FFEffectData, FFEffectKind, FFReplay, FFTrigger};

use crate::hid::HidError;

/// Number of effect slots of a memory-less device
pub const FF_MEMLESS_EFFECTS: usize = 16;

/// Gain applied when none has been set
pub const FF_GAIN_MAX: u16 = 0xffff;

/// Implemented by drivers to play a combined effect on the device
pub trait PlayEffect: Send {
    fn play(&mut self, effect: &FFEffectData) -> Result<(), HidError>;
}

#[derive(Debug, Clone)]
struct EffectState {
    effect: FFEffectData,
    playing: bool,
}

pub struct MemlessForceFeedback {
    player: Box<dyn PlayEffect>,
    states: Vec<Option<EffectState>>,
    gain: u16,
}

impl MemlessForceFeedback {
    pub fn new(player: Box<dyn PlayEffect>) -> Result<Self, HidError> {
        let mut states = Vec::new();
        states
            .try_reserve_exact(FF_MEMLESS_EFFECTS)
            .map_err(|_| HidError::NoMemory)?;
        states.resize(FF_MEMLESS_EFFECTS, None);

        Ok(Self {
            player,
            states,
            gain: FF_GAIN_MAX,
        })
    }

    pub fn gain(&self) -> u16 {
        self.gain
    }

    /// Returns true if the effect with the given id is currently playing
    pub fn is_playing(&self, id: i16) -> bool {
        self.slot(id)
            .ok()
            .and_then(|slot| self.states[slot].as_ref())
            .is_some_and(|state| state.playing)
    }

    /// Store the given effect under the given id, replacing any previous
    /// effect with that id.
    pub fn upload(&mut self, id: i16, effect: FFEffectData) -> Result<(), HidError> {
        let slot = self.slot(id)?;
        if !matches!(effect.kind, FFEffectKind::Rumble { .. }) {
            return Err(HidError::Unsupported(format!(
                "effect {:?} is not supported",
                effect.kind
            )));
        }

        let playing = self.states[slot]
            .as_ref()
            .is_some_and(|state| state.playing);
        log::debug!("Uploading effect {id} (playing: {playing})");
        self.states[slot] = Some(EffectState { effect, playing });

        if playing {
            self.play_effects()?;
        }
        Ok(())
    }

    /// Stop and remove the effect with the given id
    pub fn erase(&mut self, id: i16) -> Result<(), HidError> {
        let slot = self.slot(id)?;
        let Some(state) = self.states[slot].take() else {
            return Err(HidError::InvalidEffect(id));
        };
        log::debug!("Erasing effect {id}");

        if state.playing {
            self.play_effects()?;
        }
        Ok(())
    }

    /// Start (value > 0) or stop (value == 0) the effect with the given id
    pub fn playback(&mut self, id: i16, value: i32) -> Result<(), HidError> {
        let slot = self.slot(id)?;
        let Some(state) = self.states[slot].as_mut() else {
            return Err(HidError::InvalidEffect(id));
        };
        state.playing = value > 0;
        log::trace!("Effect {id} playing: {}", state.playing);

        self.play_effects()
    }

    /// Stop every effect and play a zero rumble, even if nothing was playing.
    /// Uploaded effects are kept.
    pub fn stop_all(&mut self) -> Result<(), HidError> {
        log::debug!("Stopping all effects");
        for state in self.states.iter_mut().flatten() {
            state.playing = false;
        }
        self.play_effects()
    }

    /// Set the gain applied to all effects
    pub fn set_gain(&mut self, gain: u16) -> Result<(), HidError> {
        log::debug!("Setting force feedback gain to {gain}");
        self.gain = gain;

        let playing = self.states.iter().flatten().any(|state| state.playing);
        if playing {
            self.play_effects()?;
        }
        Ok(())
    }

    /// Combine all playing effects into a single rumble effect
    pub fn combined_effect(&self) -> FFEffectData {
        let gain = self.gain as u32;
        let (strong, weak) = self
            .states
            .iter()
            .flatten()
            .filter(|state| state.playing)
            .fold((0u32, 0u32), |(strong, weak), state| match state.effect.kind {
                FFEffectKind::Rumble {
                    strong_magnitude,
                    weak_magnitude,
                } => (
                    strong + strong_magnitude as u32 * gain / FF_GAIN_MAX as u32,
                    weak + weak_magnitude as u32 * gain / FF_GAIN_MAX as u32,
                ),
                _ => (strong, weak),
            });

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
            kind: FFEffectKind::Rumble {
                strong_magnitude: strong.min(u16::MAX as u32) as u16,
                weak_magnitude: weak.min(u16::MAX as u32) as u16,
            },
        }
    }

    fn play_effects(&mut self) -> Result<(), HidError> {
        let effect = self.combined_effect();
        log::trace!("Playing combined effect: {:?}", effect.kind);
        self.player.play(&effect)
    }

    fn slot(&self, id: i16) -> Result<usize, HidError> {
        if id < 0 || id as usize >= FF_MEMLESS_EFFECTS {
            return Err(HidError::InvalidEffect(id));
        }
        Ok(id as usize)
    }
}

impl std::fmt::Debug for MemlessForceFeedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemlessForceFeedback")
            .field("states", &self.states)
            .field("gain", &self.gain)
            .finish()
    }
}
