//! Freehand ink painting surface with simulated pen pressure.
//!
//! `inkboard` renders pointer and multi-touch input onto a fixed-resolution
//! raster surface. The host environment owns windowing and event decoding; it
//! feeds client-space events to [`InkBoard`], which maps them onto the
//! logical surface (correcting for letterboxed scaling), tracks one pen per
//! contact, derives ink width from movement and dwell heuristics, and hands
//! every rendered stroke to registered listeners for external mirroring.

pub mod board;
pub mod config;
pub mod draw;
pub mod input;
pub mod util;

pub use board::{BoardError, ExportFormat, InkBoard};
pub use config::{BoardConfig, ConfigError};
pub use draw::{Color, Stroke};
pub use input::{ButtonState, MouseButton, PenSlot, Touch};
pub use util::ViewRect;
