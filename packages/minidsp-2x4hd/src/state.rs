//! Last-known device state.

use bitflags::bitflags;
use minidsp_hid::Update;

/// Preset value before the device has reported one.
pub const PRESET_UNKNOWN: u8 = 4;
/// Source value before the device has reported one.
pub const SOURCE_UNKNOWN: u8 = 3;
/// Volume value before the device has reported one. Wider than any register value.
pub const VOLUME_UNKNOWN: u16 = 0x100;
/// Mute value before the device has reported one.
pub const MUTED_UNKNOWN: u8 = 2;

/// Input selection.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum Source {
    Analog = 0,
    Toslink = 1,
    /// Reported by the device, but cannot be selected by command.
    Usb = 2,
}

impl TryFrom<u8> for Source {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Analog),
            1 => Ok(Self::Toslink),
            2 => Ok(Self::Usb),
            other => Err(other),
        }
    }
}

bitflags! {
    /// Fields whose stored value changed while handling a frame.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Changes: u8 {
        const PRESET = 0b0000_0001;
        const SOURCE = 0b0000_0010;
        const VOLUME = 0b0000_0100;
        const MUTED = 0b0000_1000;
        const INPUT_LEVELS = 0b0001_0000;
        const OUTPUT_LEVELS = 0b0010_0000;
    }
}

impl Changes {
    /// The field an update writes to.
    pub fn of(update: &Update) -> Self {
        match update {
            Update::Preset(_) => Self::PRESET,
            Update::Source(_) => Self::SOURCE,
            Update::Volume(_) => Self::VOLUME,
            Update::Muted(_) => Self::MUTED,
            Update::InputLevel { .. } => Self::INPUT_LEVELS,
            Update::OutputLevel { .. } => Self::OUTPUT_LEVELS,
        }
    }
}

/// Snapshot of the values last reported by the device.
///
/// Scalars start out at sentinel values no device report can carry, so the first
/// report of each field always counts as a change.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DeviceState {
    preset: u8,
    source: u8,
    volume: u16,
    muted: u8,
    input_levels: [f32; 2],
    output_levels: [f32; 4],
}

impl Default for DeviceState {
    fn default() -> Self {
        Self {
            preset: PRESET_UNKNOWN,
            source: SOURCE_UNKNOWN,
            volume: VOLUME_UNKNOWN,
            muted: MUTED_UNKNOWN,
            input_levels: [0.0; 2],
            output_levels: [0.0; 4],
        }
    }
}

impl DeviceState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an update. Returns whether the stored value changed.
    pub fn apply(&mut self, update: Update) -> bool {
        match update {
            Update::Preset(value) => store(&mut self.preset, value),
            Update::Source(value) => store(&mut self.source, value),
            Update::Volume(value) => store(&mut self.volume, value as u16),
            Update::Muted(value) => store(&mut self.muted, value),
            Update::InputLevel { channel, db } => self
                .input_levels
                .get_mut(channel)
                .is_some_and(|slot| store_level(slot, db)),
            Update::OutputLevel { channel, db } => self
                .output_levels
                .get_mut(channel)
                .is_some_and(|slot| store_level(slot, db)),
        }
    }

    /// Active preset, 0 through 3, or [`PRESET_UNKNOWN`].
    pub fn preset(&self) -> u8 {
        self.preset
    }

    /// Raw source code, or [`SOURCE_UNKNOWN`].
    pub fn source_raw(&self) -> u8 {
        self.source
    }

    pub fn source(&self) -> Option<Source> {
        Source::try_from(self.source).ok()
    }

    /// Volume in half-dB steps of attenuation. Example: 19 represents -9.5dB.
    pub fn volume(&self) -> u16 {
        self.volume
    }

    /// Volume in dB.
    pub fn volume_db(&self) -> f32 {
        -(self.volume as f32) / 2.0
    }

    /// Raw mute value, or [`MUTED_UNKNOWN`].
    pub fn muted_raw(&self) -> u8 {
        self.muted
    }

    /// Any nonzero report other than [`MUTED_UNKNOWN`] counts as muted.
    pub fn is_muted(&self) -> bool {
        self.muted != 0 && self.muted != MUTED_UNKNOWN
    }

    /// Input meters in dB.
    pub fn input_levels(&self) -> [f32; 2] {
        self.input_levels
    }

    /// Output meters in dB.
    pub fn output_levels(&self) -> [f32; 4] {
        self.output_levels
    }
}

fn store<T: PartialEq>(slot: &mut T, value: T) -> bool {
    let changed = *slot != value;
    *slot = value;
    changed
}

// Bitwise, so a NaN reading repeated is not a change.
fn store_level(slot: &mut f32, db: f32) -> bool {
    let changed = slot.to_bits() != db.to_bits();
    *slot = db;
    changed
}
