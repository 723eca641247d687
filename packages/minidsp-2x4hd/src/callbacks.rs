use minidsp_hid::Frame;

type Handler<T> = Option<Box<dyn FnMut(T) + Send>>;

/// One optional handler per event. Registering a handler replaces the previous one.
#[derive(Default)]
pub(crate) struct Callbacks {
    pub init: Option<Box<dyn FnMut() + Send>>,
    // Preset reports are stored but never dispatched.
    #[allow(dead_code)]
    pub preset: Handler<u8>,
    pub source: Handler<u8>,
    pub volume: Handler<u8>,
    pub muted: Handler<bool>,
    pub input_levels: Handler<[f32; 2]>,
    pub output_levels: Handler<[f32; 4]>,
    pub frame: Option<Box<dyn FnMut(&Frame) + Send>>,
}

impl Callbacks {
    pub fn init(&mut self) {
        if let Some(f) = self.init.as_mut() {
            f();
        }
    }

    pub fn source(&mut self, source: u8) {
        if let Some(f) = self.source.as_mut() {
            f(source);
        }
    }

    pub fn volume(&mut self, volume: u8) {
        if let Some(f) = self.volume.as_mut() {
            f(volume);
        }
    }

    pub fn muted(&mut self, muted: bool) {
        if let Some(f) = self.muted.as_mut() {
            f(muted);
        }
    }

    pub fn input_levels(&mut self, levels: [f32; 2]) {
        if let Some(f) = self.input_levels.as_mut() {
            f(levels);
        }
    }

    pub fn output_levels(&mut self, levels: [f32; 4]) {
        if let Some(f) = self.output_levels.as_mut() {
            f(levels);
        }
    }

    pub fn frame(&mut self, frame: &Frame) {
        if let Some(f) = self.frame.as_mut() {
            f(frame);
        }
    }
}
