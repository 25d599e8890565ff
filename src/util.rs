//! Geometry helpers: view rectangles and client-to-surface coordinate mapping.

/// Displayed bounding rectangle of the surface, in client pixels.
///
/// The view may be letterboxed relative to the logical surface: when the host
/// scales the surface `object-fit: contain`-style, the aspect ratios differ
/// along at most one axis and the content is centered on that axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewRect {
    /// Left edge in client pixels
    pub x: f64,
    /// Top edge in client pixels
    pub y: f64,
    /// Displayed width in client pixels
    pub width: f64,
    /// Displayed height in client pixels
    pub height: f64,
}

impl ViewRect {
    /// Creates a view rectangle from its left/top corner and size.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Maps a client-space point into logical surface coordinates.
///
/// Compares the view's aspect ratio with the logical surface's. The axis that
/// fills the view maps with a uniform scale; the letterboxed axis is first
/// shifted by half the leftover space, then scaled by the same ratio. The
/// mapping must be exact: an off-by-one scale puts ink visibly away from the
/// contact point.
///
/// # Arguments
/// * `view` - Displayed bounding rectangle of the surface in client pixels
/// * `width` - Logical surface width in pixels
/// * `height` - Logical surface height in pixels
/// * `client_x` - Input event X position in client pixels
/// * `client_y` - Input event Y position in client pixels
///
/// # Returns
/// The corresponding point in logical surface coordinates.
pub fn map_to_surface(
    view: &ViewRect,
    width: u32,
    height: u32,
    client_x: f64,
    client_y: f64,
) -> (f64, f64) {
    let surface_aspect = f64::from(height) / f64::from(width);
    let view_aspect = view.height / view.width;

    if view_aspect > surface_aspect {
        // View is relatively taller: width fills it, height is letterboxed.
        let ratio = f64::from(width) / view.width;
        let scaled_height = f64::from(height) / ratio;
        let top = view.y + (view.height - scaled_height) / 2.0;
        ((client_x - view.x) * ratio, (client_y - top) * ratio)
    } else {
        // View is relatively wider: height fills it, width is letterboxed.
        let ratio = f64::from(height) / view.height;
        let scaled_width = f64::from(width) / ratio;
        let left = view.x + (view.width - scaled_width) / 2.0;
        ((client_x - left) * ratio, (client_y - view.y) * ratio)
    }
}

/// Euclidean distance between two points.
pub fn distance(x0: f64, y0: f64, x1: f64, y1: f64) -> f64 {
    let dx = x1 - x0;
    let dy = y1 - y0;
    (dx * dx + dy * dy).sqrt()
}
