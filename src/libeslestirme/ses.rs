use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Pickup,
    Correct,
    Wrong,
}

/// Audible feedback for the drag surface. Frontends without an audio device
/// swap in a no-op implementation.
pub trait CuePlayer {
    fn play(&self, cue: Cue);
}

pub struct SilentCues;

impl CuePlayer for SilentCues {
    fn play(&self, cue: Cue) {
        debug!("[Cue] {:?} (silent).", cue);
    }
}

/// Rings the terminal bell on a wrong drop.
pub struct BellCues;

impl CuePlayer for BellCues {
    fn play(&self, cue: Cue) {
        debug!("[Cue] {:?}.", cue);
        if cue == Cue::Wrong {
            print!("\x07");
        }
    }
}
