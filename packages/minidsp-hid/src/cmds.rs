//! Device-bound commands.

use crate::Encode;

/// Command opcodes.
///
/// Unary set commands are acknowledged with a `[0x01, opcode, value]` report;
/// read commands are answered with a range report echoing the opcode.
pub mod opcodes {
    pub const SET_VOLUME: u8 = 0x42;
    pub const SET_MUTE: u8 = 0x17;
    pub const SET_SOURCE: u8 = 0x34;
    pub const READ_BYTES: u8 = 0x05;
    pub const READ_FLOATS: u8 = 0x14;
}

/// Known memory addresses (low byte).
///
/// Byte values live in the `0xFF__` page, float values in the `0x00__` page.
pub mod addrs {
    /// High address byte of the byte-valued page.
    pub const BYTE_PAGE: u8 = 0xFF;
    /// High address byte of the float-valued page.
    pub const FLOAT_PAGE: u8 = 0x00;

    pub const PRESET: u8 = 0xD8;
    pub const SOURCE: u8 = 0xD9;
    /// Alternate location the device reports the source at.
    pub const SOURCE_ALT: u8 = 0xA9;
    pub const VOLUME: u8 = 0xDA;
    pub const MUTE: u8 = 0xDB;

    pub const INPUT_LEVEL_1: u8 = 0x44;
    pub const INPUT_LEVEL_2: u8 = 0x45;
    // 0x46 - 0x49 are outputs absent on the 2x4HD.
    pub const OUTPUT_LEVEL_1: u8 = 0x4A;
    pub const OUTPUT_LEVEL_4: u8 = 0x4D;
}

/// Sets the master volume in half-dB steps of attenuation (`0` = 0dB, `127` = -63.5dB).
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SetVolume(pub u8);

impl SetVolume {
    /// Builds the command from a gain in dB, clamped to `[-127, 0]`.
    pub fn from_db(db: f32) -> Self {
        let db = if db.is_nan() { 0.0 } else { db.clamp(-127.0, 0.0) };
        // -127dB maps to 254, the deepest attenuation the register holds.
        Self((-db * 2.0) as u8)
    }
}

impl Encode for SetVolume {
    fn size(&self) -> usize {
        2
    }

    fn encode(&self, data: &mut [u8]) {
        data[0] = opcodes::SET_VOLUME;
        data[1] = self.0;
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SetMute(pub bool);

impl Encode for SetMute {
    fn size(&self) -> usize {
        2
    }

    fn encode(&self, data: &mut [u8]) {
        data[0] = opcodes::SET_MUTE;
        data[1] = self.0 as u8;
    }
}

/// Selects the input source by raw code.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SetSource(pub u8);

impl Encode for SetSource {
    fn size(&self) -> usize {
        2
    }

    fn encode(&self, data: &mut [u8]) {
        data[0] = opcodes::SET_SOURCE;
        data[1] = self.0;
    }
}

/// Requests `count` bytes starting at `0xFF<addr>`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ReadBytes {
    pub addr: u8,
    pub count: u8,
}

impl Encode for ReadBytes {
    fn size(&self) -> usize {
        4
    }

    fn encode(&self, data: &mut [u8]) {
        data[..4].copy_from_slice(&[opcodes::READ_BYTES, addrs::BYTE_PAGE, self.addr, self.count]);
    }
}

/// Requests `count` floats starting at `0x00<addr>`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ReadFloats {
    pub addr: u8,
    pub count: u8,
}

impl Encode for ReadFloats {
    fn size(&self) -> usize {
        4
    }

    fn encode(&self, data: &mut [u8]) {
        data[..4].copy_from_slice(&[
            opcodes::READ_FLOATS,
            addrs::FLOAT_PAGE,
            self.addr,
            self.count,
        ]);
    }
}

/// Source, volume and mute.
pub const REQUEST_STATUS: ReadBytes = ReadBytes {
    addr: addrs::SOURCE,
    count: 3,
};

pub const REQUEST_SOURCE: ReadBytes = ReadBytes {
    addr: addrs::SOURCE,
    count: 1,
};

pub const REQUEST_VOLUME: ReadBytes = ReadBytes {
    addr: addrs::VOLUME,
    count: 1,
};

pub const REQUEST_MUTE: ReadBytes = ReadBytes {
    addr: addrs::MUTE,
    count: 1,
};

pub const REQUEST_INPUT_LEVELS: ReadFloats = ReadFloats {
    addr: addrs::INPUT_LEVEL_1,
    count: 2,
};

pub const REQUEST_OUTPUT_LEVELS: ReadFloats = ReadFloats {
    addr: addrs::OUTPUT_LEVEL_1,
    count: 4,
};

/// Inputs and outputs in one report, including the four unused slots between them.
pub const REQUEST_LEVELS: ReadFloats = ReadFloats {
    addr: addrs::INPUT_LEVEL_1,
    count: 10,
};
