//! Sound cues for the terminal front-end.
//!
//! A terminal has one sound: the bell.  Damage rings it; everything else is
//! only logged.  Background music is tracked as a flag so game over can
//! "stop" it.

use std::io::Write;

use log::debug;
use meadow_run::compute::Cue;

#[derive(Debug, Default)]
pub struct Audio {
    pub muted: bool,
    background: bool,
}

impl Audio {
    pub fn new(muted: bool) -> Self {
        Audio {
            muted,
            background: false,
        }
    }

    /// Fire-and-forget.  `Background` loops until [`Audio::stop_background`].
    pub fn play<W: Write>(&mut self, out: &mut W, cue: Cue) -> std::io::Result<()> {
        debug!("cue {:?}", cue);
        match cue {
            Cue::Background => self.background = true,
            Cue::Negative if !self.muted => {
                out.write_all(b"\x07")?;
            }
            Cue::Negative | Cue::Positive => {}
        }
        Ok(())
    }

    pub fn stop_background(&mut self) {
        if self.background {
            debug!("background music stopped");
        }
        self.background = false;
    }
}
