//! Scroll trigger state machine and toggle actions.

use crate::motion::PlaybackAction;
use crate::result::{AnimatorError, AnimatorResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Where the scroll source sits relative to a trigger's range
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerState {
    /// Before the start
    Before,
    /// Between start and end
    Active,
    /// Past the end
    After,
}

/// Crossing of a trigger boundary
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerEvent {
    /// Crossed the start going forward
    Enter,
    /// Crossed the end going forward
    Leave,
    /// Crossed the end going backward
    EnterBack,
    /// Crossed the start going backward
    LeaveBack,
}

/// Resolved scroll range of a trigger
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerBounds {
    /// Scroll offset where the trigger starts
    pub start: f64,
    /// Scroll offset where the trigger ends
    pub end: f64,
}

impl TriggerBounds {
    /// Create bounds; an end before the start is moved onto it
    #[must_use]
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Length of the range
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.end - self.start
    }

    /// Normalized position of `scroll` within the range
    #[must_use]
    pub fn progress(&self, scroll: f64) -> f64 {
        let distance = self.distance();
        if distance <= 0.0 {
            if scroll >= self.start {
                1.0
            } else {
                0.0
            }
        } else {
            ((scroll - self.start) / distance).clamp(0.0, 1.0)
        }
    }

    /// State for a given scroll offset
    #[must_use]
    pub fn state_at(&self, scroll: f64) -> TriggerState {
        if scroll < self.start {
            TriggerState::Before
        } else if scroll > self.end {
            TriggerState::After
        } else {
            TriggerState::Active
        }
    }
}

/// What an animation does on each of the four boundary crossings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ToggleActions {
    /// On [`TriggerEvent::Enter`]
    pub on_enter: PlaybackAction,
    /// On [`TriggerEvent::Leave`]
    pub on_leave: PlaybackAction,
    /// On [`TriggerEvent::EnterBack`]
    pub on_enter_back: PlaybackAction,
    /// On [`TriggerEvent::LeaveBack`]
    pub on_leave_back: PlaybackAction,
}

impl Default for ToggleActions {
    fn default() -> Self {
        Self {
            on_enter: PlaybackAction::Play,
            on_leave: PlaybackAction::None,
            on_enter_back: PlaybackAction::None,
            on_leave_back: PlaybackAction::None,
        }
    }
}

impl ToggleActions {
    /// `play none none reverse`: plays on the way in, rewinds when the
    /// page scrolls back above the start
    pub const PLAY_REVERSE: Self = Self {
        on_enter: PlaybackAction::Play,
        on_leave: PlaybackAction::None,
        on_enter_back: PlaybackAction::None,
        on_leave_back: PlaybackAction::Reverse,
    };

    /// Action for a crossing
    #[must_use]
    pub fn action_for(&self, event: TriggerEvent) -> PlaybackAction {
        match event {
            TriggerEvent::Enter => self.on_enter,
            TriggerEvent::Leave => self.on_leave,
            TriggerEvent::EnterBack => self.on_enter_back,
            TriggerEvent::LeaveBack => self.on_leave_back,
        }
    }
}

impl FromStr for ToggleActions {
    type Err = AnimatorError;

    fn from_str(s: &str) -> AnimatorResult<Self> {
        let invalid = || AnimatorError::InvalidToggleActions {
            input: s.to_string(),
        };
        let actions = s
            .split_whitespace()
            .map(|word| PlaybackAction::from_keyword(word).ok_or_else(invalid))
            .collect::<AnimatorResult<Vec<_>>>()?;
        match actions.as_slice() {
            [on_enter, on_leave, on_enter_back, on_leave_back] => Ok(Self {
                on_enter: *on_enter,
                on_leave: *on_leave,
                on_enter_back: *on_enter_back,
                on_leave_back: *on_leave_back,
            }),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for ToggleActions {
    type Error = AnimatorError;

    fn try_from(value: String) -> AnimatorResult<Self> {
        value.parse()
    }
}

impl From<ToggleActions> for String {
    fn from(actions: ToggleActions) -> Self {
        format!(
            "{} {} {} {}",
            actions.on_enter.keyword(),
            actions.on_leave.keyword(),
            actions.on_enter_back.keyword(),
            actions.on_leave_back.keyword()
        )
    }
}

/// Boundary tracker for one trigger.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScrollTrigger {
    bounds: TriggerBounds,
    state: TriggerState,
}

impl ScrollTrigger {
    /// New trigger that has not seen any scroll yet
    #[must_use]
    pub fn new(bounds: TriggerBounds) -> Self {
        Self {
            bounds,
            state: TriggerState::Before,
        }
    }

    /// Current range
    #[must_use]
    pub fn bounds(&self) -> TriggerBounds {
        self.bounds
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> TriggerState {
        self.state
    }

    /// Whether the source is inside the range
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == TriggerState::Active
    }

    /// Replace the range without emitting events; the next
    /// [`update`](Self::update) reports any crossing the change implies.
    pub fn set_bounds(&mut self, bounds: TriggerBounds) {
        self.bounds = bounds;
    }

    /// Feed a new scroll offset and collect the crossings, in order.
    pub fn update(&mut self, scroll: f64, out: &mut Vec<TriggerEvent>) {
        use TriggerState::{Active, After, Before};

        let next = self.bounds.state_at(scroll);
        match (self.state, next) {
            (Before, Active) => out.push(TriggerEvent::Enter),
            (Before, After) => out.extend([TriggerEvent::Enter, TriggerEvent::Leave]),
            (Active, After) => out.push(TriggerEvent::Leave),
            (Active, Before) => out.push(TriggerEvent::LeaveBack),
            (After, Active) => out.push(TriggerEvent::EnterBack),
            (After, Before) => out.extend([TriggerEvent::EnterBack, TriggerEvent::LeaveBack]),
            _ => {}
        }
        self.state = next;
    }
}
