//! Crate for controlling the miniDSP 2x4HD over USB HID. Not affiliated with miniDSP Ltd.
//!
//! A [`Session`] owns the last-known [`DeviceState`] and a [`Transport`] used to
//! send commands. Inbound reports are handed to [`Session::handle_frame`], which
//! updates the state and runs the registered change callbacks.

pub use minidsp_hid as protocol;

use minidsp_hid::{EncodeError, Frame};
use thiserror::Error;

mod callbacks;
#[cfg(feature = "hid")]
pub mod hid;
pub mod session;
pub mod state;

pub use session::{NotifyMode, Session};
pub use state::{Changes, DeviceState, Source};

/// The USB vendor ID for miniDSP devices
pub const MINIDSP_VID: u16 = 0x2752;

/// The USB PID of the 2x4HD
pub const MINIDSP_2X4HD_PID: u16 = 0x0011;

/// Whether a USB identity belongs to a 2x4HD.
pub fn is_supported(vid: u16, pid: u16) -> bool {
    vid == MINIDSP_VID && pid == MINIDSP_2X4HD_PID
}

/// The capability to emit outbound frames to the device.
pub trait Transport {
    type Error: std::error::Error + 'static;

    /// Sends one complete 64-byte frame.
    fn send_frame(&mut self, frame: &Frame) -> Result<(), Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn send_frame(&mut self, frame: &Frame) -> Result<(), Self::Error> {
        (**self).send_frame(frame)
    }
}

#[derive(Error, Debug)]
pub enum SessionError<E: std::error::Error + 'static> {
    #[error("Command encoding error: {0}")]
    Encode(#[from] EncodeError),
    #[error("Source {0} cannot be selected")]
    InvalidSource(u8),
    #[error("Transport error: {0}")]
    Transport(#[source] E),
}
