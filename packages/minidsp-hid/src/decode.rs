use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub struct DecodeError {
    kind: DecodeErrorKind,
    type_name: &'static str,
}

impl DecodeError {
    pub fn new<T>(kind: DecodeErrorKind) -> Self {
        Self {
            kind,
            type_name: core::any::type_name::<T>(),
        }
    }

    pub const fn kind(&self) -> DecodeErrorKind {
        self.kind
    }
}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Failed to decode {}: {}", self.type_name, self.kind)
    }
}

#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeErrorKind {
    #[error("Report was too short.")]
    UnexpectedEnd,

    #[error(
        "Report did not match any known response shape. Found markers {marker:02x?}."
    )]
    Unrecognized { marker: [u8; 3] },

    #[error("Report length {len} does not fit within a frame.")]
    InvalidLength { len: u8 },

    #[error("Float report carries {len} data bytes, which is not a multiple of 4.")]
    MisalignedFloats { len: u8 },
}

/// A type that can be reconstructed (decoded) from a raw sequence of bytes.
///
/// The input slice is advanced by the number of bytes consumed.
pub trait Decode {
    /// Attempts to decode `Self` from the beginning of the provided byte slice.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the input is too short to hold a complete value.
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError>
    where
        Self: Sized;
}

macro_rules! impl_decode_for_primitive {
    ($($t:ty),*) => {
        $(
            impl Decode for $t {
                fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
                    let (bytes, rest) = data
                        .split_first_chunk::<{ size_of::<$t>() }>()
                        .ok_or_else(|| DecodeError::new::<Self>(DecodeErrorKind::UnexpectedEnd))?;
                    *data = rest;
                    Ok(Self::from_le_bytes(*bytes))
                }
            }
        )*
    };
}

// Float reports carry IEEE-754 singles in little-endian order.
impl_decode_for_primitive!(u8, f32);

impl<const N: usize> Decode for [u8; N] {
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
        let (bytes, rest) = data
            .split_first_chunk::<N>()
            .ok_or_else(|| DecodeError::new::<Self>(DecodeErrorKind::UnexpectedEnd))?;
        *data = rest;
        Ok(*bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::{Decode, DecodeErrorKind};

    #[test]
    fn float_is_little_endian() {
        let bytes = (-12.25f32).to_le_bytes();
        let mut data = bytes.as_slice();

        assert_eq!(f32::decode(&mut data).unwrap(), -12.25);
        assert!(data.is_empty());
    }

    #[test]
    fn short_input() {
        let mut data = [0x01, 0x02, 0x03].as_slice();
        let err = f32::decode(&mut data).unwrap_err();

        assert_eq!(err.kind(), DecodeErrorKind::UnexpectedEnd);
        // Nothing is consumed on failure
        assert_eq!(data.len(), 3);
    }
}
