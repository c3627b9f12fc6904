//! Virtual-clock host for a [`WalkthroughController`].
//!
//! Honours the controller's timer-source events against a simulated clock,
//! so whole sessions (countdowns, expiry, auto-advance) can be replayed
//! deterministically without sleeping. Used by the tests and by
//! `recipe play --simulate`.

use crate::walkthrough::{SourceId, WalkthroughController, WalkthroughEvent};
use serde::Serialize;
use tracing::trace;

/// An event stamped with the virtual second it happened at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimedEvent {
    pub at: u64,
    #[serde(flatten)]
    pub event: WalkthroughEvent,
}

#[derive(Debug)]
pub struct Simulator {
    controller: WalkthroughController,
    now: u64,
    tick_source: Option<SourceId>,
    /// Pending one-shot and the virtual second it is due.
    auto_advance: Option<(SourceId, u64)>,
    log: Vec<TimedEvent>,
}

impl Simulator {
    pub fn new(controller: WalkthroughController) -> Self {
        let mut sim = Self {
            controller,
            now: 0,
            tick_source: None,
            auto_advance: None,
            log: Vec::new(),
        };
        sim.settle();
        sim
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn controller(&self) -> &WalkthroughController {
        &self.controller
    }

    pub fn advance(&mut self) -> bool {
        let moved = self.controller.advance();
        self.settle();
        moved
    }

    pub fn retreat(&mut self) -> bool {
        let moved = self.controller.retreat();
        self.settle();
        moved
    }

    pub fn toggle_pause(&mut self) -> bool {
        let toggled = self.controller.toggle_timer_pause();
        self.settle();
        toggled
    }

    /// Let `seconds` of virtual time pass. Within each second the tick is
    /// delivered first, then any auto-advance that has come due.
    ///
    /// With no tick source running the clock jumps straight to the next due
    /// auto-advance, so long idle waits cost nothing.
    pub fn wait(&mut self, seconds: u64) {
        let mut left = seconds;
        while left > 0 {
            let step = match (self.tick_source, self.auto_advance) {
                (Some(_), _) => 1,
                (None, Some((_, due))) => due.saturating_sub(self.now).clamp(1, left),
                (None, None) => left,
            };
            self.now = self.now.saturating_add(step);
            left -= step;
            if let Some(source) = self.tick_source {
                self.controller.on_tick(source);
            }
            self.settle();
        }
    }

    pub fn teardown(&mut self) {
        self.controller.teardown();
        self.settle();
    }

    /// Events recorded since the last call.
    pub fn take_log(&mut self) -> Vec<TimedEvent> {
        std::mem::take(&mut self.log)
    }

    fn settle(&mut self) {
        self.pump();
        while let Some((source, due)) = self.auto_advance {
            if due > self.now {
                break;
            }
            self.auto_advance = None;
            trace!(%source, at = self.now, "firing auto-advance");
            self.controller.fire_auto_advance(source);
            self.pump();
        }
    }

    fn pump(&mut self) {
        for event in self.controller.drain_events() {
            match event {
                WalkthroughEvent::TickSourceStarted { source } => {
                    self.tick_source = Some(source);
                }
                WalkthroughEvent::TickSourceCancelled { source } => {
                    if self.tick_source == Some(source) {
                        self.tick_source = None;
                    }
                }
                WalkthroughEvent::AutoAdvanceScheduled {
                    source,
                    delay_seconds,
                } => {
                    self.auto_advance = Some((source, self.now + u64::from(delay_seconds)));
                }
                WalkthroughEvent::AutoAdvanceCancelled { source } => {
                    if matches!(self.auto_advance, Some((pending, _)) if pending == source) {
                        self.auto_advance = None;
                    }
                }
                _ => {}
            }
            self.log.push(TimedEvent {
                at: self.now,
                event,
            });
        }
    }
}
