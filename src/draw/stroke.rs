//! Stroke primitives produced by the pen state machine.

use super::color::Color;
use serde::{Deserialize, Serialize};

/// One rendered ink primitive.
///
/// Each input event produces at most one stroke: it is painted onto the
/// surface, handed to stroke listeners, and then discarded. Nothing retains a
/// vector model of the drawing beyond the raster pixels. The serialized form
/// (tagged with `pen`) is the notification payload external consumers such as
/// multi-peer mirrors subscribe to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "pen", rename_all = "lowercase")]
pub enum Stroke {
    /// Line segment between the pen's previous and current points.
    Move {
        /// Previous X coordinate
        x0: f64,
        /// Previous Y coordinate
        y0: f64,
        /// Current X coordinate
        x1: f64,
        /// Current Y coordinate
        y1: f64,
        /// Ink color
        color: Color,
        /// Segment width in pixels
        width: f64,
    },
    /// Filled dot produced by a press released without movement.
    Steady {
        /// Dot center X coordinate
        x: f64,
        /// Dot center Y coordinate
        y: f64,
        /// Ink color
        color: Color,
        /// Dot diameter in pixels
        width: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steady_wire_shape_is_tagged_with_pen() {
        let stroke = Stroke::Steady {
            x: 12.0,
            y: 34.0,
            color: Color::from_rgb8(0xff, 0x00, 0x00),
            width: 3.5,
        };
        let value = serde_json::to_value(&stroke).unwrap();
        assert_eq!(value["pen"], "steady");
        assert_eq!(value["x"], 12.0);
        assert_eq!(value["y"], 34.0);
        assert_eq!(value["color"], "#ff0000");
        assert_eq!(value["width"], 3.5);
    }

    #[test]
    fn move_wire_shape_carries_both_endpoints() {
        let stroke = Stroke::Move {
            x0: 1.0,
            y0: 2.0,
            x1: 3.0,
            y1: 4.0,
            color: Color::from_rgb8(0x00, 0xff, 0x7f),
            width: 5.5,
        };
        let value = serde_json::to_value(&stroke).unwrap();
        assert_eq!(value["pen"], "move");
        assert_eq!(value["x0"], 1.0);
        assert_eq!(value["y1"], 4.0);
        assert_eq!(value["color"], "#00ff7f");
    }

    #[test]
    fn stroke_round_trips_through_json() {
        let stroke = Stroke::Move {
            x0: 10.5,
            y0: 20.5,
            x1: 30.0,
            y1: 40.0,
            color: Color::from_rgb8(1, 2, 3),
            width: 2.0,
        };
        let json = serde_json::to_string(&stroke).unwrap();
        let back: Stroke = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stroke);
    }
}
