//! Host-bound reports.
//!
//! The device answers with one of three report shapes. Range reports are sent
//! both as replies to [`ReadBytes`](crate::cmds::ReadBytes) / [`ReadFloats`](crate::cmds::ReadFloats)
//! and unsolicited, whenever the front panel or remote changes a setting while
//! the interface is idle. Both arrive with the same layout and decode identically.
//!
//! # Encoding
//!
//! Unary acknowledgment:
//!
//! | Field    | Size | Description |
//! |----------|------|-------------|
//! | `marker` | 1    | Always [`UNARY_MARKER`]. |
//! | `opcode` | 1    | The set command being acknowledged. |
//! | `value`  | 1    | The value now in effect. |
//!
//! Range report:
//!
//! | Field       | Size | Description |
//! |-------------|------|-------------|
//! | `len`       | 1    | Report length counted from `len` through the end of `data`. |
//! | `opcode`    | 1    | [`READ_BYTES`](opcodes::READ_BYTES) or [`READ_FLOATS`](opcodes::READ_FLOATS). |
//! | `addr_high` | 1    | Page of the range, [`BYTE_PAGE`](addrs::BYTE_PAGE) or [`FLOAT_PAGE`](addrs::FLOAT_PAGE). |
//! | `addr_low`  | 1    | Address of the first value. |
//! | `data`      | n    | `len - 4` bytes; one byte or one little-endian `f32` per address. |

use crate::{
    Frame,
    cmds::{addrs, opcodes},
    decode::{Decode, DecodeError, DecodeErrorKind},
};

/// Byte 0 of a unary set acknowledgment.
pub const UNARY_MARKER: u8 = 0x01;

/// Size of the fixed part of a range report preceding its data.
const RANGE_HEADER_SIZE: usize = 4;

/// The shape of an inbound report, judged from its marker bytes alone.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ResponseKind {
    UnaryAck,
    ByteRangeReport,
    FloatRangeReport,
    Unrecognized,
}

/// Classifies a report by its marker bytes.
///
/// A unary acknowledgment is the only report whose first byte is not a length,
/// so it is checked first.
pub fn classify(frame: &Frame) -> ResponseKind {
    if frame[0] == UNARY_MARKER {
        ResponseKind::UnaryAck
    } else if frame[1] == opcodes::READ_BYTES && frame[2] == addrs::BYTE_PAGE {
        ResponseKind::ByteRangeReport
    } else if frame[1] == opcodes::READ_FLOATS && frame[2] == addrs::FLOAT_PAGE {
        ResponseKind::FloatRangeReport
    } else {
        ResponseKind::Unrecognized
    }
}

/// A single field assignment reported by the device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Update {
    Preset(u8),
    Source(u8),
    /// Volume in half-dB steps of attenuation.
    Volume(u8),
    Muted(u8),
    InputLevel { channel: usize, db: f32 },
    OutputLevel { channel: usize, db: f32 },
}

/// Acknowledgment of a unary set command.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct UnaryAck {
    pub opcode: u8,
    pub value: u8,
}

impl UnaryAck {
    /// The field this acknowledgment sets, if the opcode is known.
    pub fn update(&self) -> Option<Update> {
        match self.opcode {
            opcodes::SET_VOLUME => Some(Update::Volume(self.value)),
            opcodes::SET_MUTE => Some(Update::Muted(self.value)),
            opcodes::SET_SOURCE => Some(Update::Source(self.value)),
            _ => None,
        }
    }
}

impl Decode for UnaryAck {
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
        let marker = u8::decode(data)?;
        if marker != UNARY_MARKER {
            return Err(DecodeError::new::<Self>(DecodeErrorKind::Unrecognized {
                marker: [marker, 0, 0],
            }));
        }

        let opcode = u8::decode(data)?;
        let value = u8::decode(data)?;

        Ok(Self { opcode, value })
    }
}

/// A run of byte values from the `0xFF__` page.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ByteRangeReport<'a> {
    pub base: u8,
    pub data: &'a [u8],
}

impl<'a> ByteRangeReport<'a> {
    /// Decodes the report. `frame` must already be classified as a byte range report.
    pub fn parse(frame: &'a Frame) -> Result<Self, DecodeError> {
        let (base, data) = range_data::<Self>(frame)?;
        Ok(Self { base, data })
    }

    /// Every `(address, value)` pair in the report. Addresses wrap within the page.
    pub fn values(self) -> impl Iterator<Item = (u8, u8)> + 'a {
        let base = self.base;
        self.data
            .iter()
            .enumerate()
            .map(move |(i, value)| (base.wrapping_add(i as u8), *value))
    }

    /// Field updates for the known addresses, in report order.
    pub fn updates(self) -> impl Iterator<Item = Update> + 'a {
        self.values().filter_map(|(addr, value)| match addr {
            addrs::PRESET => Some(Update::Preset(value)),
            addrs::SOURCE | addrs::SOURCE_ALT => Some(Update::Source(value)),
            addrs::VOLUME => Some(Update::Volume(value)),
            addrs::MUTE => Some(Update::Muted(value)),
            _ => None,
        })
    }
}

/// A run of little-endian `f32` values from the `0x00__` page.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct FloatRangeReport<'a> {
    pub base: u8,
    pub data: &'a [u8],
}

impl<'a> FloatRangeReport<'a> {
    /// Decodes the report. `frame` must already be classified as a float range report.
    ///
    /// Fails if the data length is not a whole number of floats.
    pub fn parse(frame: &'a Frame) -> Result<Self, DecodeError> {
        let (base, data) = range_data::<Self>(frame)?;
        if data.len() % 4 != 0 {
            return Err(DecodeError::new::<Self>(DecodeErrorKind::MisalignedFloats {
                len: data.len() as u8,
            }));
        }

        Ok(Self { base, data })
    }

    /// Every `(address, value)` pair in the report. Addresses wrap within the page.
    pub fn values(self) -> impl Iterator<Item = (u8, f32)> + 'a {
        let base = self.base;
        self.data.chunks_exact(4).enumerate().filter_map(move |(i, mut chunk)| {
            let value = f32::decode(&mut chunk).ok()?;
            Some((base.wrapping_add(i as u8), value))
        })
    }

    /// Level updates for the known addresses, in report order.
    pub fn updates(self) -> impl Iterator<Item = Update> + 'a {
        self.values().filter_map(|(addr, db)| match addr {
            addrs::INPUT_LEVEL_1..=addrs::INPUT_LEVEL_2 => Some(Update::InputLevel {
                channel: (addr - addrs::INPUT_LEVEL_1) as usize,
                db,
            }),
            addrs::OUTPUT_LEVEL_1..=addrs::OUTPUT_LEVEL_4 => Some(Update::OutputLevel {
                channel: (addr - addrs::OUTPUT_LEVEL_1) as usize,
                db,
            }),
            _ => None,
        })
    }
}

/// Splits a range report into its base address and data region.
fn range_data<T>(frame: &Frame) -> Result<(u8, &[u8]), DecodeError> {
    let len = frame[0];
    let data_len = (len as usize)
        .checked_sub(RANGE_HEADER_SIZE)
        .ok_or_else(|| DecodeError::new::<T>(DecodeErrorKind::InvalidLength { len }))?;

    let data = frame
        .get(RANGE_HEADER_SIZE..RANGE_HEADER_SIZE + data_len)
        .ok_or_else(|| DecodeError::new::<T>(DecodeErrorKind::InvalidLength { len }))?;

    Ok((frame[3], data))
}

/// A classified and decoded report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Response<'a> {
    UnaryAck(UnaryAck),
    ByteRange(ByteRangeReport<'a>),
    FloatRange(FloatRangeReport<'a>),
}

impl<'a> Response<'a> {
    /// Classifies and decodes a report.
    ///
    /// # Errors
    ///
    /// Fails for unrecognized reports and for range reports whose length
    /// cannot be honoured. Callers are expected to drop such frames.
    pub fn parse(frame: &'a Frame) -> Result<Self, DecodeError> {
        match classify(frame) {
            ResponseKind::UnaryAck => Ok(Self::UnaryAck(UnaryAck::decode(&mut frame.as_slice())?)),
            ResponseKind::ByteRangeReport => Ok(Self::ByteRange(ByteRangeReport::parse(frame)?)),
            ResponseKind::FloatRangeReport => {
                Ok(Self::FloatRange(FloatRangeReport::parse(frame)?))
            }
            ResponseKind::Unrecognized => {
                let mut data = frame.as_slice();
                let marker = <[u8; 3]>::decode(&mut data)?;
                Err(DecodeError::new::<Self>(DecodeErrorKind::Unrecognized {
                    marker,
                }))
            }
        }
    }

    /// The classification this response was parsed under.
    pub fn kind(&self) -> ResponseKind {
        match self {
            Self::UnaryAck(_) => ResponseKind::UnaryAck,
            Self::ByteRange(_) => ResponseKind::ByteRangeReport,
            Self::FloatRange(_) => ResponseKind::FloatRangeReport,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::{FRAME_SIZE, PADDING};

    fn frame(bytes: &[u8]) -> Frame {
        let mut frame = [PADDING; FRAME_SIZE];
        frame[..bytes.len()].copy_from_slice(bytes);
        frame
    }

    fn float_frame(base: u8, values: &[f32]) -> Frame {
        let mut bytes = Vec::from([(4 + values.len() * 4) as u8, 0x14, 0x00, base]);
        for value in values {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        frame(&bytes)
    }

    #[test]
    fn classification() {
        assert_eq!(classify(&frame(&[0x01, 0x42, 0x13])), ResponseKind::UnaryAck);
        assert_eq!(
            classify(&frame(&[0x07, 0x05, 0xFF, 0xD9])),
            ResponseKind::ByteRangeReport
        );
        assert_eq!(
            classify(&frame(&[0x0C, 0x14, 0x00, 0x44])),
            ResponseKind::FloatRangeReport
        );
        assert_eq!(
            classify(&frame(&[0x07, 0x05, 0x00, 0xD9])),
            ResponseKind::Unrecognized
        );
        assert_eq!(classify(&[0x00; FRAME_SIZE]), ResponseKind::Unrecognized);
    }

    #[test]
    fn unary_marker_wins() {
        // Looks like a byte report too, but byte 0 decides.
        assert_eq!(classify(&frame(&[0x01, 0x05, 0xFF])), ResponseKind::UnaryAck);
    }

    #[test]
    fn unary_volume_ack() {
        let frame = frame(&[0x01, 0x42, 0x13]);
        let response = Response::parse(&frame).unwrap();
        assert_eq!(response.kind(), classify(&frame));
        let Response::UnaryAck(ack) = response else {
            panic!("expected a unary ack, got {response:?}");
        };

        assert_eq!(ack.update(), Some(Update::Volume(0x13)));
    }

    #[test]
    fn unary_unknown_opcode() {
        let ack = UnaryAck {
            opcode: 0x99,
            value: 0x01,
        };
        assert_eq!(ack.update(), None);
    }

    #[test]
    fn byte_report_updates() {
        let frame = frame(&[0x08, 0x05, 0xFF, 0xD8, 0x02, 0x01, 0x13, 0x00]);
        let report = ByteRangeReport::parse(&frame).unwrap();

        assert_eq!(
            report.updates().collect::<Vec<_>>(),
            [
                Update::Preset(2),
                Update::Source(1),
                Update::Volume(0x13),
                Update::Muted(0),
            ]
        );
    }

    #[test]
    fn byte_report_alternate_source() {
        let frame = frame(&[0x05, 0x05, 0xFF, 0xA9, 0x01]);
        let report = ByteRangeReport::parse(&frame).unwrap();

        assert_eq!(report.updates().collect::<Vec<_>>(), [Update::Source(1)]);
    }

    #[test]
    fn byte_report_wraps_addresses() {
        let frame = frame(&[0x07, 0x05, 0xFF, 0xFE, 0x0A, 0x0B, 0x0C]);
        let report = ByteRangeReport::parse(&frame).unwrap();

        assert_eq!(
            report.values().collect::<Vec<_>>(),
            [(0xFE, 0x0A), (0xFF, 0x0B), (0x00, 0x0C)]
        );
        assert_eq!(report.updates().count(), 0);
    }

    #[test]
    fn byte_report_bad_lengths() {
        let short = frame(&[0x03, 0x05, 0xFF, 0xD9]);
        assert_eq!(
            ByteRangeReport::parse(&short).unwrap_err().kind(),
            DecodeErrorKind::InvalidLength { len: 3 }
        );

        let long = frame(&[0x45, 0x05, 0xFF, 0xD9]);
        assert_eq!(
            ByteRangeReport::parse(&long).unwrap_err().kind(),
            DecodeErrorKind::InvalidLength { len: 0x45 }
        );

        // An empty range is legal and carries nothing.
        let empty = frame(&[0x04, 0x05, 0xFF, 0xD9]);
        assert_eq!(ByteRangeReport::parse(&empty).unwrap().updates().count(), 0);
    }

    #[test]
    fn float_report_levels() {
        let frame = float_frame(0x44, &[-12.5, -3.0]);
        let report = FloatRangeReport::parse(&frame).unwrap();

        assert_eq!(
            report.updates().collect::<Vec<_>>(),
            [
                Update::InputLevel {
                    channel: 0,
                    db: -12.5
                },
                Update::InputLevel {
                    channel: 1,
                    db: -3.0
                },
            ]
        );
    }

    #[test]
    fn float_report_skips_unused_outputs() {
        let values: Vec<f32> = (0..10).map(|i| -(i as f32)).collect();
        let frame = float_frame(0x44, &values);
        let report = FloatRangeReport::parse(&frame).unwrap();
        let updates = report.updates().collect::<Vec<_>>();

        assert_eq!(updates.len(), 6);
        assert_eq!(
            updates[2],
            Update::OutputLevel {
                channel: 0,
                db: -6.0
            }
        );
        assert_eq!(
            updates[5],
            Update::OutputLevel {
                channel: 3,
                db: -9.0
            }
        );
    }

    #[test]
    fn float_report_misaligned() {
        let frame = frame(&[0x07, 0x14, 0x00, 0x44, 0x00, 0x00, 0x80]);
        assert_eq!(
            Response::parse(&frame).unwrap_err().kind(),
            DecodeErrorKind::MisalignedFloats { len: 3 }
        );
    }

    #[test]
    fn unrecognized_reports_markers() {
        let frame = frame(&[0x07, 0x33, 0x10]);
        assert_eq!(
            Response::parse(&frame).unwrap_err().kind(),
            DecodeErrorKind::Unrecognized {
                marker: [0x07, 0x33, 0x10]
            }
        );
    }
}
