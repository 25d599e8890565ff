//! Per-contact pen state and the ink width heuristics.

use crate::config::BoardConfig;
use crate::draw::{Color, Stroke};
use crate::util;

/// Stroke state tracker for one input contact (the mouse or a touch slot).
///
/// A pen is idle (`active == false`), pressed without movement
/// (`active && point`), or pressed and moving (`active && !point`). The
/// `point` flag selects dot-vs-segment rendering when the contact lifts. Pens
/// are allocated once per board and mutated in place by every event.
#[derive(Debug, Clone)]
pub struct Pen {
    /// True while the button or touch contact is held.
    pub active: bool,
    /// True until the first movement after a press; a release in this state
    /// renders a steady dot instead of a segment.
    pub point: bool,
    /// Host timestamp of the last recorded event, in milliseconds.
    pub time_stamp: f64,
    /// Milliseconds elapsed between the last two recorded events.
    pub time_lapse: f64,
    /// Ink color, fixed for the lifetime of the pen.
    pub color: Color,
    /// Previous X position, in logical surface coordinates.
    pub x0: f64,
    /// Previous Y position.
    pub y0: f64,
    /// Current X position.
    pub x1: f64,
    /// Current Y position.
    pub y1: f64,
}

impl Pen {
    /// Creates an idle pen with the given ink color.
    pub fn new(color: Color) -> Self {
        Self {
            active: false,
            point: false,
            time_stamp: 0.0,
            time_lapse: 0.0,
            color,
            x0: 0.0,
            y0: 0.0,
            x1: 0.0,
            y1: 0.0,
        }
    }

    /// Press: records the entry position as both previous and current point
    /// and stamps the event time.
    pub fn start(&mut self, x: f64, y: f64, time_ms: f64) {
        self.active = true;
        self.point = true;
        self.time_stamp = time_ms;
        self.time_lapse = 0.0;
        self.x0 = x;
        self.y0 = y;
        self.x1 = x;
        self.y1 = y;
    }

    /// Movement while pressed.
    ///
    /// Shifts the current point into the previous slot, records the new point
    /// and timing, and returns the segment to render. Returns `None` when the
    /// pen is not active (motion with no held contact).
    pub fn move_to(
        &mut self,
        x: f64,
        y: f64,
        time_ms: f64,
        force: Option<f64>,
        config: &BoardConfig,
    ) -> Option<Stroke> {
        if !self.active {
            return None;
        }
        self.point = false;
        self.advance(x, y, time_ms);
        let travelled = util::distance(self.x0, self.y0, self.x1, self.y1);
        Some(Stroke::Move {
            x0: self.x0,
            y0: self.y0,
            x1: self.x1,
            y1: self.y1,
            color: self.color,
            width: motion_width(travelled, force, config),
        })
    }

    /// Steady check: when no movement happened since the press, returns the
    /// dwell-weighted dot for the tap. No-op once the pen has moved.
    pub fn steady(
        &mut self,
        x: f64,
        y: f64,
        time_ms: f64,
        force: Option<f64>,
        config: &BoardConfig,
    ) -> Option<Stroke> {
        if !self.point {
            return None;
        }
        self.point = false;
        self.advance(x, y, time_ms);
        Some(Stroke::Steady {
            x: self.x1,
            y: self.y1,
            color: self.color,
            width: dwell_width(self.time_lapse, force, config),
        })
    }

    /// Release: clears the active flag, then runs the steady check so a
    /// zero-movement press still leaves a visible dot.
    pub fn stop(
        &mut self,
        x: f64,
        y: f64,
        time_ms: f64,
        force: Option<f64>,
        config: &BoardConfig,
    ) -> Option<Stroke> {
        self.active = false;
        self.steady(x, y, time_ms, force, config)
    }

    /// Returns the pen to idle without touching its color or history.
    pub fn rest(&mut self) {
        self.active = false;
        self.point = false;
    }

    fn advance(&mut self, x: f64, y: f64, time_ms: f64) {
        self.time_lapse = time_ms - self.time_stamp;
        self.time_stamp = time_ms;
        self.x0 = self.x1;
        self.y0 = self.y1;
        self.x1 = x;
        self.y1 = y;
    }
}

/// Addresses one pen in a [`PenSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PenSlot {
    /// The dedicated mouse pen.
    Mouse,
    /// A touch pen, addressed by the host-assigned contact identifier.
    Touch(u32),
}

/// Owned, bounds-checked pen collection.
///
/// Touch contacts index the touch pens `0..touch_slots`; the mouse pen lives
/// in its own field, so it can never collide with a touch identifier. Lookups
/// for unknown identifiers return `None` rather than reaching outside the
/// collection.
#[derive(Debug, Clone)]
pub struct PenSet {
    touch: Vec<Pen>,
    mouse: Pen,
}

impl PenSet {
    /// Allocates `touch_slots` touch pens plus the mouse pen, each with a
    /// pseudo-random opaque color.
    pub fn new(touch_slots: usize) -> Self {
        Self {
            touch: (0..touch_slots).map(|_| Pen::new(Color::random())).collect(),
            mouse: Pen::new(Color::random()),
        }
    }

    /// Number of touch slots allocated at creation.
    pub fn touch_slots(&self) -> usize {
        self.touch.len()
    }

    /// The mouse pen.
    pub fn mouse(&self) -> &Pen {
        &self.mouse
    }

    /// Mutable access to the mouse pen.
    pub fn mouse_mut(&mut self) -> &mut Pen {
        &mut self.mouse
    }

    /// The pen for a touch identifier, when one exists.
    pub fn touch(&self, identifier: u32) -> Option<&Pen> {
        self.touch.get(identifier as usize)
    }

    /// Mutable access to the pen for a touch identifier, when one exists.
    pub fn touch_mut(&mut self, identifier: u32) -> Option<&mut Pen> {
        self.touch.get_mut(identifier as usize)
    }

    /// Returns every pen to the idle state, keeping colors and history.
    pub fn rest_all(&mut self) {
        for pen in &mut self.touch {
            pen.rest();
        }
        self.mouse.rest();
    }
}

/// Reported force with a fallback: unsupported or zero force reads as 0.5.
fn effective_force(force: Option<f64>) -> f64 {
    match force {
        Some(f) if f > 0.0 => f,
        _ => 0.5,
    }
}

/// Ink width for a movement segment.
///
/// Interpolates from `max_ink` at a standstill down to `min_ink` as the
/// travelled distance approaches `max_distance` (closer = thicker, matching a
/// pen decelerating to a stop); at or beyond the threshold the width is
/// `max_ink`. The result is scaled by twice the effective force.
pub(crate) fn motion_width(distance: f64, force: Option<f64>, config: &BoardConfig) -> f64 {
    let base = if distance < config.max_distance {
        config.max_ink - (config.max_ink - config.min_ink) * distance / config.max_distance
    } else {
        config.max_ink
    };
    base * effective_force(force) * 2.0
}

/// Ink width for a steady dot.
///
/// Grows from `min_ink` to `max_ink` as dwell time approaches `max_time`
/// (longer dwell = thicker, simulating pressure build-up); clamped at
/// `max_ink` beyond the threshold. The result is scaled by twice the
/// effective force.
pub(crate) fn dwell_width(lapse_ms: f64, force: Option<f64>, config: &BoardConfig) -> f64 {
    let base = if lapse_ms < config.max_time {
        (config.max_ink - config.min_ink) * lapse_ms / config.max_time + config.min_ink
    } else {
        config.max_ink
    };
    base * effective_force(force) * 2.0
}
