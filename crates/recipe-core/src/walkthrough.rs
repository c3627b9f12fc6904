//! Guided walkthrough state machine.
//!
//! [`WalkthroughController`] owns the current position in a recipe's step
//! sequence, the per-category progress counts and the cooking-step countdown.
//! It never touches a clock or a screen: hosts call [`advance`], [`retreat`],
//! [`toggle_timer_pause`] and [`tick`], then drain [`WalkthroughEvent`]s to
//! render state and to start or stop their real timer sources.
//!
//! Two kinds of timer source exist, each identified by a [`SourceId`]:
//!
//! * the repeating one-second **tick source**, at most one at a time, which
//!   the host turns into calls to [`on_tick`];
//! * the one-shot **auto-advance** delay scheduled when a countdown expires,
//!   which the host turns into a call to [`fire_auto_advance`].
//!
//! Every step transition cancels both. Ids are never reused, so a tick or
//! firing that was already in flight when its source was cancelled is
//! recognised as stale and ignored.
//!
//! [`advance`]: WalkthroughController::advance
//! [`retreat`]: WalkthroughController::retreat
//! [`toggle_timer_pause`]: WalkthroughController::toggle_timer_pause
//! [`tick`]: WalkthroughController::tick
//! [`on_tick`]: WalkthroughController::on_tick
//! [`fire_auto_advance`]: WalkthroughController::fire_auto_advance

use crate::card::{build_cards, Card};
use crate::config::WalkthroughConfig;
use crate::countdown::CountdownTime;
use crate::recipe::{CookingStep, Recipe};
use crate::sequence::StepSequence;
use crate::types::StepCategory;
use serde::Serialize;
use std::fmt;
use tracing::{debug, trace};

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

/// Identity of one timer source started by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SourceId(u64);

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How far the user has got through one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    fn empty(total: usize) -> Self {
        Self {
            completed: 0,
            total,
        }
    }

    /// Categories with no steps have no progress indicator.
    pub fn is_tracked(&self) -> bool {
        self.total > 0
    }

    /// Completed fraction in `0.0..=1.0`; untracked categories read as done.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "remaining", rename_all = "snake_case")]
pub enum TimerState {
    Idle,
    Running(CountdownTime),
    Paused(CountdownTime),
    Expired,
}

impl TimerState {
    pub fn remaining(&self) -> Option<CountdownTime> {
        match self {
            TimerState::Idle => None,
            TimerState::Running(r) | TimerState::Paused(r) => Some(*r),
            TimerState::Expired => Some(CountdownTime::ZERO),
        }
    }

    /// `HH:MM:SS` for the host's timer label, `None` when no countdown is set.
    pub fn display(&self) -> Option<String> {
        self.remaining().map(|r| r.to_string())
    }
}

/// State changes for the host to render or act on, in the order they
/// happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WalkthroughEvent {
    StepChanged {
        position: usize,
        category: StepCategory,
        category_position: usize,
    },
    ProgressChanged {
        category: StepCategory,
        completed: usize,
        total: usize,
    },
    TimerChanged {
        timer: TimerState,
    },
    /// Pulse cue for the last five seconds of a countdown.
    FinalCountdown {
        remaining: CountdownTime,
    },
    /// Transient play/pause indicator; the host hides it again on its own.
    PauseIndicator {
        paused: bool,
    },
    PreviousAffordance {
        visible: bool,
    },
    NextAffordance {
        visible: bool,
    },
    TickSourceStarted {
        source: SourceId,
    },
    TickSourceCancelled {
        source: SourceId,
    },
    AutoAdvanceScheduled {
        source: SourceId,
        delay_seconds: u32,
    },
    AutoAdvanceCancelled {
        source: SourceId,
    },
}

/// Point-in-time view of the walkthrough for status displays.
#[derive(Debug, Clone, Serialize)]
pub struct WalkthroughSnapshot {
    pub position: usize,
    pub total_steps: usize,
    pub category: StepCategory,
    pub category_position: usize,
    pub progress: Vec<(StepCategory, Progress)>,
    pub timer: TimerState,
    pub paused: bool,
    pub shows_previous: bool,
    pub shows_next: bool,
    pub card: Card,
}

// ---------------------------------------------------------------------------
// WalkthroughController
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct WalkthroughController {
    sequence: StepSequence,
    cards: Vec<Card>,
    /// Parsed countdown per cooking step; `None` for absent or malformed.
    targets: Vec<Option<CountdownTime>>,
    config: WalkthroughConfig,
    position: usize,
    progress: [Progress; 3],
    timer: TimerState,
    paused: bool,
    tick_source: Option<SourceId>,
    auto_advance: Option<SourceId>,
    next_source: u64,
    events: Vec<WalkthroughEvent>,
}

impl WalkthroughController {
    /// Start a walkthrough at the first step.
    ///
    /// # Panics
    ///
    /// If the recipe has no steps at all. Check [`Recipe::is_playable`]
    /// before entering a walkthrough.
    pub fn new(recipe: &Recipe, multiplier: Option<&str>, config: WalkthroughConfig) -> Self {
        let sequence = StepSequence::from_recipe(recipe);
        assert!(
            sequence.total_steps() > 0,
            "recipe '{}' has no steps to walk through",
            recipe.slug
        );

        let progress = [
            Progress::empty(sequence.count(StepCategory::Ingredient)),
            Progress::empty(sequence.count(StepCategory::PrepStep)),
            Progress::empty(sequence.count(StepCategory::CookingStep)),
        ];

        let mut controller = Self {
            sequence,
            cards: build_cards(recipe, multiplier),
            targets: recipe
                .cooking_steps
                .iter()
                .map(CookingStep::countdown)
                .collect(),
            config,
            position: 0,
            progress,
            timer: TimerState::Idle,
            paused: !config.auto_advance,
            tick_source: None,
            auto_advance: None,
            next_source: 0,
            events: Vec::new(),
        };
        controller.enter_first_step();
        controller
    }

    fn enter_first_step(&mut self) {
        debug!(
            total_steps = self.total_steps(),
            auto_advance = self.config.auto_advance,
            "walkthrough started"
        );
        self.emit_step();
        // Entering the walkthrough counts as reaching step 1 of the first
        // non-empty category.
        self.set_progress(self.category(), 1);
        self.emit(WalkthroughEvent::PreviousAffordance { visible: false });
        self.emit(WalkthroughEvent::NextAffordance {
            visible: self.shows_next(),
        });
        self.auto_start_countdown();
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn total_steps(&self) -> usize {
        self.sequence.total_steps()
    }

    pub fn category(&self) -> StepCategory {
        self.sequence.category_at(self.position)
    }

    pub fn category_position(&self) -> usize {
        self.sequence.category_local_index(self.position)
    }

    pub fn sequence(&self) -> &StepSequence {
        &self.sequence
    }

    pub fn config(&self) -> &WalkthroughConfig {
        &self.config
    }

    pub fn progress(&self, category: StepCategory) -> Progress {
        self.progress[category.index()]
    }

    pub fn timer_state(&self) -> TimerState {
        self.timer
    }

    pub fn timer_display(&self) -> Option<String> {
        self.timer.display()
    }

    /// Whether the user has paused timer playback.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn shows_previous(&self) -> bool {
        self.position > 0
    }

    pub fn shows_next(&self) -> bool {
        self.position + 1 < self.total_steps()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn current_card(&self) -> &Card {
        &self.cards[self.position]
    }

    pub fn active_tick_source(&self) -> Option<SourceId> {
        self.tick_source
    }

    pub fn pending_auto_advance(&self) -> Option<SourceId> {
        self.auto_advance
    }

    /// Countdown target of the current step, if it is a cooking step with a
    /// well-formed time.
    pub fn current_target(&self) -> Option<CountdownTime> {
        if self.category() != StepCategory::CookingStep {
            return None;
        }
        self.targets
            .get(self.category_position())
            .copied()
            .flatten()
    }

    pub fn snapshot(&self) -> WalkthroughSnapshot {
        WalkthroughSnapshot {
            position: self.position,
            total_steps: self.total_steps(),
            category: self.category(),
            category_position: self.category_position(),
            progress: StepCategory::all()
                .iter()
                .map(|&c| (c, self.progress(c)))
                .filter(|(_, p)| p.is_tracked())
                .collect(),
            timer: self.timer,
            paused: self.paused,
            shows_previous: self.shows_previous(),
            shows_next: self.shows_next(),
            card: self.current_card().clone(),
        }
    }

    /// Take all events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<WalkthroughEvent> {
        std::mem::take(&mut self.events)
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Move to the next step. Returns false, changing nothing, at the last
    /// step.
    pub fn advance(&mut self) -> bool {
        let last = self.total_steps() - 1;
        if self.position == last {
            trace!("advance ignored at last step");
            return false;
        }

        self.cancel_timer_sources();
        self.set_timer(TimerState::Idle);

        let from = self.position;
        self.position += 1;
        self.emit_step();
        self.set_progress(self.category(), self.category_position() + 1);

        if from == 0 {
            self.emit(WalkthroughEvent::PreviousAffordance { visible: true });
        }
        if self.position == last {
            self.emit(WalkthroughEvent::NextAffordance { visible: false });
        }

        debug!(
            from,
            to = self.position,
            category = %self.category(),
            "advanced"
        );
        self.auto_start_countdown();
        true
    }

    /// Move to the previous step. Returns false, changing nothing, at the
    /// first step. Progress for every category after the one now current is
    /// cleared.
    pub fn retreat(&mut self) -> bool {
        if self.position == 0 {
            trace!("retreat ignored at first step");
            return false;
        }

        self.cancel_timer_sources();
        self.set_timer(TimerState::Idle);

        let last = self.total_steps() - 1;
        let from = self.position;
        self.position -= 1;
        self.emit_step();

        let category = self.category();
        self.set_progress(category, self.category_position() + 1);
        let mut later = category.next();
        while let Some(c) = later {
            self.set_progress(c, 0);
            later = c.next();
        }

        if self.position == 0 {
            self.emit(WalkthroughEvent::PreviousAffordance { visible: false });
        }
        if from == last {
            self.emit(WalkthroughEvent::NextAffordance { visible: true });
        }

        debug!(
            from,
            to = self.position,
            category = %category,
            "retreated"
        );
        // Always a fresh countdown from the full target; nothing of a
        // previous visit's remaining time is kept.
        self.auto_start_countdown();
        true
    }

    // -----------------------------------------------------------------------
    // Countdown
    // -----------------------------------------------------------------------

    /// Start a countdown from an `HH:MM:SS` target. A malformed target means
    /// no timer: nothing changes and false is returned.
    ///
    /// While the user has playback paused the countdown is armed but does not
    /// tick until resumed.
    pub fn start_timer(&mut self, time: &str) -> bool {
        match CountdownTime::parse(time) {
            Ok(t) => {
                self.start_countdown(t);
                true
            }
            Err(_) => {
                debug!(time, "ignoring malformed timer target");
                false
            }
        }
    }

    /// One second elapsed on the running countdown.
    pub fn tick(&mut self) {
        let TimerState::Running(mut remaining) = self.timer else {
            trace!(timer = ?self.timer, "tick ignored");
            return;
        };

        remaining.tick_down();
        if remaining.is_zero() {
            self.expire();
            return;
        }

        self.set_timer(TimerState::Running(remaining));
        // The tick that reaches zero expires above, so the cue covers 5..=1.
        if remaining.is_final_countdown() {
            self.emit(WalkthroughEvent::FinalCountdown { remaining });
        }
    }

    /// A tick from a host timer source. Ticks from any source other than the
    /// active one are stale and ignored. Returns whether the tick applied.
    pub fn on_tick(&mut self, source: SourceId) -> bool {
        if self.tick_source != Some(source) {
            trace!(%source, "stale tick");
            return false;
        }
        self.tick();
        true
    }

    /// The post-expiry delay elapsed. Advances if this one-shot is still
    /// pending; returns false for a cancelled or unknown source.
    pub fn fire_auto_advance(&mut self, source: SourceId) -> bool {
        if self.auto_advance != Some(source) {
            trace!(%source, "stale auto-advance");
            return false;
        }
        self.auto_advance = None;
        debug!(%source, position = self.position, "auto-advancing");
        self.advance();
        true
    }

    /// Flip user pause. Only applies on a cooking step with a countdown
    /// target; returns false otherwise.
    ///
    /// Pausing freezes the remaining time. Resuming continues from it, or
    /// starts the step's countdown if none was started yet.
    pub fn toggle_timer_pause(&mut self) -> bool {
        let Some(target) = self.current_target() else {
            trace!("pause toggle ignored without a countdown target");
            return false;
        };

        self.paused = !self.paused;
        self.emit(WalkthroughEvent::PauseIndicator {
            paused: self.paused,
        });

        if self.paused {
            if let TimerState::Running(remaining) = self.timer {
                self.cancel_tick_source();
                self.set_timer(TimerState::Paused(remaining));
            }
        } else {
            match self.timer {
                TimerState::Paused(remaining) => {
                    self.set_timer(TimerState::Running(remaining));
                    self.start_tick_source();
                }
                TimerState::Idle => self.start_countdown(target),
                TimerState::Running(_) | TimerState::Expired => {}
            }
        }

        debug!(paused = self.paused, timer = ?self.timer, "pause toggled");
        true
    }

    /// Cancel both timer sources. Hosts call this when leaving the
    /// walkthrough.
    pub fn teardown(&mut self) {
        self.cancel_timer_sources();
        debug!(position = self.position, "walkthrough torn down");
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn auto_start_countdown(&mut self) {
        if !self.config.auto_advance {
            return;
        }
        if let Some(target) = self.current_target() {
            self.start_countdown(target);
        }
    }

    fn start_countdown(&mut self, target: CountdownTime) {
        self.cancel_timer_sources();
        if self.paused {
            self.set_timer(TimerState::Paused(target));
        } else {
            self.set_timer(TimerState::Running(target));
            self.start_tick_source();
        }
        debug!(countdown = %target, paused = self.paused, "countdown started");
    }

    fn expire(&mut self) {
        self.cancel_tick_source();
        self.set_timer(TimerState::Expired);
        debug!(position = self.position, "countdown expired");

        if self.config.auto_advance {
            let source = self.allocate_source();
            self.auto_advance = Some(source);
            self.emit(WalkthroughEvent::AutoAdvanceScheduled {
                source,
                delay_seconds: self.config.auto_advance_delay_seconds,
            });
        }
    }

    fn start_tick_source(&mut self) {
        // Only one tick source may exist; a leaked one would double-decrement.
        self.cancel_tick_source();
        let source = self.allocate_source();
        self.tick_source = Some(source);
        self.emit(WalkthroughEvent::TickSourceStarted { source });
    }

    fn cancel_tick_source(&mut self) {
        if let Some(source) = self.tick_source.take() {
            self.emit(WalkthroughEvent::TickSourceCancelled { source });
        }
    }

    fn cancel_timer_sources(&mut self) {
        self.cancel_tick_source();
        if let Some(source) = self.auto_advance.take() {
            self.emit(WalkthroughEvent::AutoAdvanceCancelled { source });
        }
    }

    fn allocate_source(&mut self) -> SourceId {
        self.next_source += 1;
        SourceId(self.next_source)
    }

    fn set_timer(&mut self, timer: TimerState) {
        if self.timer != timer {
            self.timer = timer;
            self.emit(WalkthroughEvent::TimerChanged { timer });
        }
    }

    fn set_progress(&mut self, category: StepCategory, completed: usize) {
        let progress = &mut self.progress[category.index()];
        if !progress.is_tracked() || progress.completed == completed {
            return;
        }
        progress.completed = completed;
        let total = progress.total;
        self.emit(WalkthroughEvent::ProgressChanged {
            category,
            completed,
            total,
        });
    }

    fn emit_step(&mut self) {
        self.emit(WalkthroughEvent::StepChanged {
            position: self.position,
            category: self.category(),
            category_position: self.category_position(),
        });
    }

    fn emit(&mut self, event: WalkthroughEvent) {
        self.events.push(event);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
