//! Implementation of the miniDSP 2x4HD USB HID control protocol in Rust.
//!
//! Every message exchanged with the device is a fixed 64-byte HID report. Outbound
//! commands are framed by [`encode_frame`]; inbound reports are classified and
//! decoded into field [`Update`]s by [`Response::parse`].

#![no_std]

extern crate alloc;

pub mod cmds;
pub mod response;

mod decode;
mod encode;
mod frame;

pub use decode::{Decode, DecodeError, DecodeErrorKind};
pub use encode::Encode;
pub use frame::{EncodeError, checksum, encode_command, encode_frame};
pub use response::{Response, ResponseKind, Update, classify};

/// Size in bytes of every HID report exchanged with the device.
pub const FRAME_SIZE: usize = 64;

/// Largest command (opcode plus payload) that still fits a frame alongside
/// the length and checksum bytes.
pub const MAX_COMMAND_SIZE: usize = FRAME_SIZE - 2;

/// Byte used to fill the unused tail of an outbound frame.
pub const PADDING: u8 = 0xFF;

/// A single 64-byte HID report.
pub type Frame = [u8; FRAME_SIZE];
