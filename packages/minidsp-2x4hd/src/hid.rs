//! [`Transport`] over an already opened `hidapi` device.
//!
//! Finding and opening the device is left to the caller; see [`is_supported`](crate::is_supported)
//! for the identity check.

use hidapi::{HidDevice, HidError};
use log::{debug, trace};
use minidsp_hid::{FRAME_SIZE, Frame};

use crate::{Changes, Session, Transport};

pub struct HidTransport {
    device: HidDevice,
}

impl HidTransport {
    pub fn new(device: HidDevice) -> Self {
        Self { device }
    }

    pub fn device(&self) -> &HidDevice {
        &self.device
    }

    /// Waits up to `timeout_ms` for one report. A negative timeout blocks.
    ///
    /// Returns `None` on timeout. Reports shorter than a frame are discarded.
    pub fn read_frame(&self, timeout_ms: i32) -> Result<Option<Frame>, HidError> {
        let mut frame = [0; FRAME_SIZE];
        match self.device.read_timeout(&mut frame, timeout_ms)? {
            0 => Ok(None),
            FRAME_SIZE => Ok(Some(frame)),
            len => {
                debug!("Discarding {len}-byte report");
                Ok(None)
            }
        }
    }
}

impl Transport for HidTransport {
    type Error = HidError;

    fn send_frame(&mut self, frame: &Frame) -> Result<(), HidError> {
        // hidapi expects a leading report ID; the device doesn't number its reports.
        let mut report = [0; FRAME_SIZE + 1];
        report[1..].copy_from_slice(frame);

        let written = self.device.write(&report)?;
        trace!("Wrote {written} bytes");
        Ok(())
    }
}

impl Session<HidTransport> {
    /// Reads at most one report from the device and applies it.
    ///
    /// Returns `None` if nothing arrived within `timeout_ms`.
    pub fn poll(&mut self, timeout_ms: i32) -> Result<Option<Changes>, HidError> {
        let Some(frame) = self.transport().read_frame(timeout_ms)? else {
            return Ok(None);
        };

        Ok(Some(self.handle_frame(&frame)))
    }
}
