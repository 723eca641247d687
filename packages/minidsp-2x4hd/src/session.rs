//! A control session with one device.

use log::{debug, trace, warn};
use minidsp_hid::{
    Encode, Frame, Response, Update,
    cmds::{self, SetMute, SetSource, SetVolume},
    encode_frame,
};

use crate::{
    SessionError, Transport,
    callbacks::Callbacks,
    is_supported,
    state::{Changes, DeviceState, Source},
};

/// When scalar change callbacks run.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum NotifyMode {
    /// On every report of the field.
    #[default]
    Always,
    /// Only when the reported value differs from the stored one.
    OnChange,
}

/// Device state, change callbacks and an outbound transport for one device.
///
/// Frames are handled one at a time through `&mut self`, so callbacks can never
/// observe a half-applied frame or re-enter the session.
pub struct Session<T: Transport> {
    transport: T,
    state: DeviceState,
    callbacks: Callbacks,
    notify: NotifyMode,
}

impl<T: Transport> Session<T> {
    /// Starts a session with every field unknown.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: DeviceState::new(),
            callbacks: Callbacks::default(),
            notify: NotifyMode::default(),
        }
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    pub fn notify_mode(&self) -> NotifyMode {
        self.notify
    }

    /// Takes effect from the next frame onwards.
    pub fn set_notify_mode(&mut self, mode: NotifyMode) {
        self.notify = mode;
    }

    /// Run change callbacks only when values change.
    pub fn callback_on_change(&mut self) {
        self.set_notify_mode(NotifyMode::OnChange);
    }

    /// Run change callbacks on every report.
    pub fn callback_on_response(&mut self) {
        self.set_notify_mode(NotifyMode::Always);
    }

    pub fn on_initialized(&mut self, f: impl FnMut() + Send + 'static) {
        self.callbacks.init = Some(Box::new(f));
    }

    /// Registers a preset handler.
    ///
    /// # Note
    ///
    /// The device's preset reports are stored, but this handler is currently
    /// never invoked.
    pub fn on_preset_change(&mut self, f: impl FnMut(u8) + Send + 'static) {
        self.callbacks.preset = Some(Box::new(f));
    }

    /// Receives the raw source code: 0 = Analog, 1 = TOSLINK, 2 = USB.
    pub fn on_source_change(&mut self, f: impl FnMut(u8) + Send + 'static) {
        self.callbacks.source = Some(Box::new(f));
    }

    /// Receives the volume in half-dB steps. Example: 19 represents -9.5dB.
    pub fn on_volume_change(&mut self, f: impl FnMut(u8) + Send + 'static) {
        self.callbacks.volume = Some(Box::new(f));
    }

    pub fn on_mute_change(&mut self, f: impl FnMut(bool) + Send + 'static) {
        self.callbacks.muted = Some(Box::new(f));
    }

    /// Runs once per float report touching an input meter, with both meters.
    pub fn on_input_levels(&mut self, f: impl FnMut([f32; 2]) + Send + 'static) {
        self.callbacks.input_levels = Some(Box::new(f));
    }

    /// Runs once per float report touching an output meter, with all four meters.
    pub fn on_output_levels(&mut self, f: impl FnMut([f32; 4]) + Send + 'static) {
        self.callbacks.output_levels = Some(Box::new(f));
    }

    /// Observes every recognized report before it is applied.
    ///
    /// Recognized reports that fail to parse, such as a float report whose data
    /// isn't a whole number of floats or a length running past the frame, are
    /// dropped without reaching this handler.
    pub fn on_frame(&mut self, f: impl FnMut(&Frame) + Send + 'static) {
        self.callbacks.frame = Some(Box::new(f));
    }

    /// Signals that the transport finished setting up the device.
    ///
    /// Runs the initialization callback and returns `true` if the identity
    /// belongs to a supported device.
    pub fn initialized(&mut self, vid: u16, pid: u16) -> bool {
        if !is_supported(vid, pid) {
            warn!("Ignoring initialization of unsupported device {vid:04x}:{pid:04x}");
            return false;
        }

        debug!("Device {vid:04x}:{pid:04x} initialized");
        self.callbacks.init();
        true
    }

    /// Applies one inbound report.
    ///
    /// Unrecognized and malformed reports are dropped without touching the state.
    /// Returns the fields whose stored value changed.
    pub fn handle_frame(&mut self, frame: &Frame) -> Changes {
        let response = match Response::parse(frame) {
            Ok(response) => response,
            Err(err) => {
                debug!("Dropping report: {err}");
                return Changes::empty();
            }
        };
        trace!("Received {:?}: {:?}", response.kind(), response);

        self.callbacks.frame(frame);

        let mut changes = Changes::empty();
        match response {
            Response::UnaryAck(ack) => match ack.update() {
                Some(update) => changes |= self.apply(update),
                None => debug!("Ignoring acknowledgment of opcode {:#04x}", ack.opcode),
            },
            Response::ByteRange(report) => {
                for update in report.updates() {
                    changes |= self.apply(update);
                }
            }
            Response::FloatRange(report) => {
                let mut touched = Changes::empty();
                for update in report.updates() {
                    touched |= Changes::of(&update);
                    changes |= self.apply(update);
                }

                // Meters are reported once per frame with every channel.
                if touched.contains(Changes::INPUT_LEVELS) {
                    self.callbacks.input_levels(self.state.input_levels());
                }
                if touched.contains(Changes::OUTPUT_LEVELS) {
                    self.callbacks.output_levels(self.state.output_levels());
                }
            }
        }

        changes
    }

    /// Stores a scalar or meter update and runs the scalar's callback.
    fn apply(&mut self, update: Update) -> Changes {
        let changed = self.state.apply(update);
        let notify = changed || self.notify == NotifyMode::Always;

        if notify {
            match update {
                Update::Source(source) => self.callbacks.source(source),
                Update::Volume(volume) => self.callbacks.volume(volume),
                Update::Muted(_) => self.callbacks.muted(self.state.is_muted()),
                Update::Preset(_) | Update::InputLevel { .. } | Update::OutputLevel { .. } => {}
            }
        }

        if changed {
            Changes::of(&update)
        } else {
            Changes::empty()
        }
    }

    /// Frames and sends a command.
    pub fn send(&mut self, command: &impl Encode) -> Result<(), SessionError<T::Error>> {
        let frame = encode_frame(command).inspect_err(|err| warn!("Refusing to send: {err}"))?;
        trace!("Sending {:02x?}", &frame[..=frame[0] as usize]);

        self.transport
            .send_frame(&frame)
            .map_err(SessionError::Transport)
    }

    /// Frames and sends a raw opcode-and-payload sequence.
    pub fn send_command(&mut self, command: &[u8]) -> Result<(), SessionError<T::Error>> {
        self.send(&command)
    }

    /// Sets the volume in half-dB steps of attenuation.
    pub fn set_volume(&mut self, volume: u8) -> Result<(), SessionError<T::Error>> {
        self.send(&SetVolume(volume))
    }

    /// Sets the volume in dB, clamped to `[-127, 0]`.
    pub fn set_volume_db(&mut self, db: f32) -> Result<(), SessionError<T::Error>> {
        self.send(&SetVolume::from_db(db))
    }

    pub fn set_mute(&mut self, muted: bool) -> Result<(), SessionError<T::Error>> {
        self.send(&SetMute(muted))
    }

    /// Selects analog (0) or TOSLINK (1).
    ///
    /// USB is only ever reported by the device and cannot be selected.
    pub fn set_source(&mut self, source: u8) -> Result<(), SessionError<T::Error>> {
        if source > Source::Toslink as u8 {
            warn!("Refusing to select source {source}");
            return Err(SessionError::InvalidSource(source));
        }

        self.send(&SetSource(source))
    }

    /// Requests source, volume and mute.
    pub fn request_status(&mut self) -> Result<(), SessionError<T::Error>> {
        self.send(&cmds::REQUEST_STATUS)
    }

    pub fn request_source(&mut self) -> Result<(), SessionError<T::Error>> {
        self.send(&cmds::REQUEST_SOURCE)
    }

    pub fn request_volume(&mut self) -> Result<(), SessionError<T::Error>> {
        self.send(&cmds::REQUEST_VOLUME)
    }

    pub fn request_mute(&mut self) -> Result<(), SessionError<T::Error>> {
        self.send(&cmds::REQUEST_MUTE)
    }

    pub fn request_input_levels(&mut self) -> Result<(), SessionError<T::Error>> {
        self.send(&cmds::REQUEST_INPUT_LEVELS)
    }

    pub fn request_output_levels(&mut self) -> Result<(), SessionError<T::Error>> {
        self.send(&cmds::REQUEST_OUTPUT_LEVELS)
    }

    /// Requests input and output meters in one report.
    pub fn request_levels(&mut self) -> Result<(), SessionError<T::Error>> {
        self.send(&cmds::REQUEST_LEVELS)
    }
}
