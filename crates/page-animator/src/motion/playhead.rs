//! Playback state of a single animation.

use serde::{Deserialize, Serialize};

/// Direction time flows in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Towards the end
    Forward,
    /// Towards the start
    Backward,
}

/// Control applied to an animation by a scroll trigger
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackAction {
    /// Play forward from the current position
    Play,
    /// Stop where it is
    Pause,
    /// Continue in the current direction
    Resume,
    /// Play backward from the current position
    Reverse,
    /// Jump to the start and play forward
    Restart,
    /// Jump to the start and stop
    Reset,
    /// Jump to the end and stop
    Complete,
    /// Do nothing
    None,
}

impl PlaybackAction {
    /// Keyword used in toggle action strings
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Reverse => "reverse",
            Self::Restart => "restart",
            Self::Reset => "reset",
            Self::Complete => "complete",
            Self::None => "none",
        }
    }

    /// Parse a toggle action keyword
    #[must_use]
    pub fn from_keyword(word: &str) -> Option<Self> {
        Some(match word {
            "play" => Self::Play,
            "pause" => Self::Pause,
            "resume" => Self::Resume,
            "reverse" => Self::Reverse,
            "restart" => Self::Restart,
            "reset" => Self::Reset,
            "complete" => Self::Complete,
            "none" => Self::None,
            _ => return None,
        })
    }
}

/// Position and motion of an animation's clock.
///
/// Progress is stored normalized so zero-length animations still have a
/// meaningful start and end.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Playhead {
    progress: f64,
    duration: f64,
    direction: Direction,
    paused: bool,
}

impl Playhead {
    /// Playhead at the start, playing forward
    #[must_use]
    pub fn playing(duration: f64) -> Self {
        Self {
            progress: 0.0,
            duration: duration.max(0.0),
            direction: Direction::Forward,
            paused: false,
        }
    }

    /// Playhead at the start, paused
    #[must_use]
    pub fn paused(duration: f64) -> Self {
        Self {
            paused: true,
            ..Self::playing(duration)
        }
    }

    /// Normalized position (0.0-1.0)
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Position in seconds
    #[must_use]
    pub fn time(&self) -> f64 {
        self.progress * self.duration
    }

    /// Length in seconds
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Current direction
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether time is not advancing
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether the playhead rests at the end of a forward run
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.direction == Direction::Forward && self.progress >= 1.0
    }

    /// Change the length, keeping the normalized position
    pub fn set_duration(&mut self, duration: f64) {
        self.duration = duration.max(0.0);
    }

    /// Jump to a normalized position without changing play state
    pub fn seek_progress(&mut self, progress: f64) {
        self.progress = progress.clamp(0.0, 1.0);
    }

    /// Apply a trigger action
    pub fn apply(&mut self, action: PlaybackAction) {
        match action {
            PlaybackAction::Play => {
                self.direction = Direction::Forward;
                self.paused = false;
            }
            PlaybackAction::Pause => self.paused = true,
            PlaybackAction::Resume => self.paused = false,
            PlaybackAction::Reverse => {
                self.direction = Direction::Backward;
                self.paused = false;
            }
            PlaybackAction::Restart => {
                self.progress = 0.0;
                self.direction = Direction::Forward;
                self.paused = false;
            }
            PlaybackAction::Reset => {
                self.progress = 0.0;
                self.direction = Direction::Forward;
                self.paused = true;
            }
            PlaybackAction::Complete => {
                self.progress = 1.0;
                self.direction = Direction::Forward;
                self.paused = true;
            }
            PlaybackAction::None => {}
        }
    }

    /// Move by `dt` seconds. Returns whether the position changed.
    ///
    /// Reaching either end pauses the playhead there.
    pub fn advance(&mut self, dt: f64) -> bool {
        if self.paused {
            return false;
        }
        let before = self.progress;
        let target = match self.direction {
            Direction::Forward => 1.0,
            Direction::Backward => 0.0,
        };
        if self.duration <= 0.0 || !dt.is_finite() {
            self.progress = target;
        } else {
            let step = dt.max(0.0) / self.duration;
            self.progress = match self.direction {
                Direction::Forward => (self.progress + step).min(1.0),
                Direction::Backward => (self.progress - step).max(0.0),
            };
        }
        if (self.progress - target).abs() < f64::EPSILON {
            self.progress = target;
            self.paused = true;
        }
        (self.progress - before).abs() > f64::EPSILON
    }

    /// Jump straight to wherever the current direction leads.
    /// Returns whether the position changed.
    pub fn finish(&mut self) -> bool {
        if self.paused {
            return false;
        }
        self.advance(f64::INFINITY)
    }
}
