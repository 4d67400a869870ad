//! Score keeping and the two-digit display
//!
//! The display has two digits, each able to show 0-15. Reaching
//! [`SCORE_OVERFLOW`] wraps the score to zero and leaves the display blinking
//! until the session is restarted.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_DIGIT, SCORE_OVERFLOW};

/// What the score display currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreDisplay {
    Digits { tens: u8, ones: u8 },
    /// Blank glyphs (blink off-phase)
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreState {
    pub score: u32,
    pub overflowed: bool,
    pub blinking: bool,
    pub blink_steps_left: u32,
    /// Blink on-phase (digits shown)
    pub blink_visible: bool,
    /// Steps per blink sequence
    blink_steps: u32,
}

impl ScoreState {
    pub fn new(blink_steps: u32) -> Self {
        Self {
            score: 0,
            overflowed: false,
            blinking: false,
            blink_steps_left: 0,
            blink_visible: true,
            blink_steps,
        }
    }

    /// Add points. Returns true if this addition overflowed the display.
    pub fn add(&mut self, points: u32) -> bool {
        self.score += points;
        if self.score >= SCORE_OVERFLOW {
            self.score = 0;
            self.overflowed = true;
            return true;
        }
        false
    }

    pub fn digits(&self) -> (u8, u8) {
        let tens = (self.score / 10).min(MAX_DIGIT as u32) as u8;
        let ones = (self.score % 10).min(MAX_DIGIT as u32) as u8;
        (tens, ones)
    }

    pub fn display(&self) -> ScoreDisplay {
        if self.blinking && !self.blink_visible {
            return ScoreDisplay::Blank;
        }
        let (tens, ones) = self.digits();
        ScoreDisplay::Digits { tens, ones }
    }

    /// Normal display update. While overflowed, this (re)starts the blink.
    /// Returns true if a blink sequence was started.
    pub fn publish(&mut self) -> bool {
        if self.overflowed && !self.blinking {
            self.start_blink();
            return true;
        }
        false
    }

    pub fn start_blink(&mut self) {
        self.blinking = true;
        self.blink_steps_left = self.blink_steps;
        self.blink_visible = true;
    }

    /// One blink step. Returns true while the display is still blinking
    /// afterwards (including a restarted overflow sequence).
    pub fn step_blink(&mut self) -> bool {
        if !self.blinking {
            return false;
        }
        self.blink_visible = !self.blink_visible;
        self.blink_steps_left = self.blink_steps_left.saturating_sub(1);
        if self.blink_steps_left == 0 {
            self.blinking = false;
            self.blink_visible = true;
            self.publish();
        }
        self.blinking
    }
}
