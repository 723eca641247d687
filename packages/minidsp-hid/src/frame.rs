//! Outbound frame construction.
//!
//! # Encoding
//!
//! | Field      | Size   | Description |
//! |------------|--------|-------------|
//! | `len`      | 1      | Size of `command` plus the checksum byte. |
//! | `command`  | 1–62   | Opcode followed by its payload. |
//! | `checksum` | 1      | Additive checksum of `len` and `command`, see [`checksum`]. |
//! | `padding`  | n      | [`PADDING`] up to [`FRAME_SIZE`]. |

use thiserror::Error;

use crate::{Encode, FRAME_SIZE, Frame, MAX_COMMAND_SIZE, PADDING};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    #[error("Command is empty")]
    EmptyCommand,

    #[error("Command of {len} bytes does not fit in a frame (at most {MAX_COMMAND_SIZE})")]
    CommandTooLong { len: usize },
}

/// Sums `data` modulo 256.
pub fn checksum(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |sum, byte| sum.wrapping_add(*byte))
}

/// Frames an encodable command into a 64-byte report.
///
/// # Errors
///
/// Fails without producing a frame if the command is empty or larger than
/// [`MAX_COMMAND_SIZE`].
pub fn encode_frame(command: &impl Encode) -> Result<Frame, EncodeError> {
    let len = command.size();
    if len == 0 {
        return Err(EncodeError::EmptyCommand);
    }
    if len > MAX_COMMAND_SIZE {
        return Err(EncodeError::CommandTooLong { len });
    }

    let mut frame = [PADDING; FRAME_SIZE];

    // Length covers the command and the checksum byte.
    frame[0] = (len + 1) as u8;
    command.encode(&mut frame[1..=len]);

    let checksum_offset = len + 1;
    frame[checksum_offset] = checksum(&frame[..checksum_offset]);

    Ok(frame)
}

/// Frames a raw opcode-and-payload byte sequence.
///
/// # Errors
///
/// See [`encode_frame`].
pub fn encode_command(command: &[u8]) -> Result<Frame, EncodeError> {
    encode_frame(&command)
}
