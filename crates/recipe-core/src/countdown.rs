//! `HH:MM:SS` countdown values.
//!
//! The same format is used for a cooking step's time ultimatum and for the
//! live remaining-time display, so parsing is strict: exactly two digits per
//! field, minutes and seconds below 60.

use crate::error::{RecipeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CountdownTime {
    hours: u8,
    minutes: u8,
    seconds: u8,
}

impl CountdownTime {
    pub const ZERO: CountdownTime = CountdownTime {
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Largest representable value, `99:59:59`.
    pub const MAX_SECONDS: u32 = 99 * 3600 + 59 * 60 + 59;

    pub fn new(hours: u8, minutes: u8, seconds: u8) -> Option<Self> {
        if hours > 99 || minutes > 59 || seconds > 59 {
            return None;
        }
        Some(Self {
            hours,
            minutes,
            seconds,
        })
    }

    pub fn from_seconds(total: u32) -> Option<Self> {
        if total > Self::MAX_SECONDS {
            return None;
        }
        Some(Self {
            hours: (total / 3600) as u8,
            minutes: ((total % 3600) / 60) as u8,
            seconds: (total % 60) as u8,
        })
    }

    /// Parse `HH:MM:SS`. Anything else is rejected rather than guessed at.
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || RecipeError::InvalidTime(s.to_string());
        let bytes = s.as_bytes();
        if bytes.len() != 8 || bytes[2] != b':' || bytes[5] != b':' {
            return Err(invalid());
        }
        let field = |at: usize| -> Option<u8> {
            let (hi, lo) = (bytes[at], bytes[at + 1]);
            if hi.is_ascii_digit() && lo.is_ascii_digit() {
                Some((hi - b'0') * 10 + (lo - b'0'))
            } else {
                None
            }
        };
        let (Some(hours), Some(minutes), Some(seconds)) = (field(0), field(3), field(6)) else {
            return Err(invalid());
        };
        Self::new(hours, minutes, seconds).ok_or_else(invalid)
    }

    pub fn hours(&self) -> u8 {
        self.hours
    }

    pub fn minutes(&self) -> u8 {
        self.minutes
    }

    pub fn seconds(&self) -> u8 {
        self.seconds
    }

    pub fn total_seconds(&self) -> u32 {
        u32::from(self.hours) * 3600 + u32::from(self.minutes) * 60 + u32::from(self.seconds)
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// True inside the last five seconds, when the host pulses the display.
    pub fn is_final_countdown(&self) -> bool {
        self.hours == 0 && self.minutes == 0 && (1..=5).contains(&self.seconds)
    }

    /// Remove one second, borrowing from minutes and then hours.
    /// Returns false (and leaves the value alone) when already at zero.
    pub fn tick_down(&mut self) -> bool {
        if self.seconds > 0 {
            self.seconds -= 1;
        } else if self.minutes > 0 {
            self.minutes -= 1;
            self.seconds = 59;
        } else if self.hours > 0 {
            self.hours -= 1;
            self.minutes = 59;
            self.seconds = 59;
        } else {
            return false;
        }
        true
    }
}

impl fmt::Display for CountdownTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds
        )
    }
}

impl std::str::FromStr for CountdownTime {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<CountdownTime> for String {
    fn from(t: CountdownTime) -> Self {
        t.to_string()
    }
}

impl TryFrom<String> for CountdownTime {
    type Error = RecipeError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}
