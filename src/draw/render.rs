//! Cairo-based rendering for ink strokes and the surface background.

use super::color::{BLACK, Color};
use super::stroke::Stroke;

/// Renders a single stroke to a Cairo context.
///
/// Dispatches on the stroke kind: segments are stroked lines, steady dots are
/// filled circles of radius `width / 2`.
pub fn render_stroke(ctx: &cairo::Context, stroke: &Stroke) {
    match stroke {
        Stroke::Move {
            x0,
            y0,
            x1,
            y1,
            color,
            width,
        } => {
            render_segment(ctx, *x0, *y0, *x1, *y1, *color, *width);
        }
        Stroke::Steady {
            x,
            y,
            color,
            width,
        } => {
            render_dot(ctx, *x, *y, *color, *width);
        }
    }
}

/// Render one ink segment with round caps.
///
/// Endpoints are shifted by half a pixel on both axes so hairline-scale
/// strokes land on pixel centers.
pub fn render_segment(
    ctx: &cairo::Context,
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    color: Color,
    width: f64,
) {
    ctx.set_source_rgba(color.r, color.g, color.b, color.a);
    ctx.set_line_width(width);
    ctx.set_line_cap(cairo::LineCap::Round);
    ctx.set_line_join(cairo::LineJoin::Round);

    ctx.move_to(x0 + 0.5, y0 + 0.5);
    ctx.line_to(x1 + 0.5, y1 + 0.5);
    let _ = ctx.stroke();
}

/// Render a steady dot as a filled circle of radius `width / 2`.
pub fn render_dot(ctx: &cairo::Context, x: f64, y: f64, color: Color, width: f64) {
    ctx.set_source_rgba(color.r, color.g, color.b, color.a);
    ctx.arc(x + 0.5, y + 0.5, width * 0.5, 0.0, std::f64::consts::PI * 2.0);
    let _ = ctx.fill();
}

/// Paints the initial guide pattern onto an empty surface.
///
/// Two corner-to-corner diagonals plus a border rectangle, stroked at 1 px in
/// black with round caps and joins and a miter limit of 10.
pub fn render_guides(ctx: &cairo::Context, width: u32, height: u32) {
    let w = f64::from(width);
    let h = f64::from(height);

    ctx.set_source_rgba(BLACK.r, BLACK.g, BLACK.b, BLACK.a);
    ctx.set_line_width(1.0);
    ctx.set_line_cap(cairo::LineCap::Round);
    ctx.set_line_join(cairo::LineJoin::Round);
    ctx.set_miter_limit(10.0);

    ctx.move_to(0.0, 0.0);
    ctx.line_to(w - 1.0, h - 1.0);
    ctx.move_to(w - 1.0, 0.0);
    ctx.line_to(0.0, h - 1.0);
    ctx.rectangle(0.0, 0.0, w, h);
    let _ = ctx.stroke();
}

/// Clears the whole surface back to transparent.
pub fn clear(ctx: &cairo::Context) {
    ctx.save().ok();
    ctx.set_operator(cairo::Operator::Clear);
    let _ = ctx.paint();
    ctx.restore().ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairo::{Context, Format, ImageSurface};

    fn surface_with_context(width: i32, height: i32) -> (ImageSurface, Context) {
        let surface = ImageSurface::create(Format::ARgb32, width, height).unwrap();
        let ctx = Context::new(&surface).unwrap();
        (surface, ctx)
    }

    fn surface_has_pixels(surface: &mut ImageSurface) -> bool {
        surface
            .data()
            .map(|data| data.iter().any(|byte| *byte != 0))
            .unwrap_or(false)
    }

    #[test]
    fn guides_leave_visible_pixels() {
        let (mut surface, ctx) = surface_with_context(64, 48);
        render_guides(&ctx, 64, 48);
        drop(ctx);
        assert!(surface_has_pixels(&mut surface));
    }

    #[test]
    fn clear_erases_everything() {
        let (mut surface, ctx) = surface_with_context(32, 32);
        render_guides(&ctx, 32, 32);
        clear(&ctx);
        drop(ctx);
        assert!(!surface_has_pixels(&mut surface));
    }

    #[test]
    fn dot_paints_the_target_pixel() {
        let (mut surface, ctx) = surface_with_context(32, 32);
        render_dot(&ctx, 16.0, 16.0, Color::from_rgb8(255, 0, 0), 6.0);
        drop(ctx);
        surface.flush();
        let stride = surface.stride() as usize;
        let data = surface.data().unwrap();
        // ARGB32 is native-endian 0xAARRGGBB; pixel (16, 16) sits fully
        // inside the dot, so it must be opaque red.
        let px = 16 * stride + 16 * 4;
        let argb = u32::from_ne_bytes([data[px], data[px + 1], data[px + 2], data[px + 3]]);
        assert_eq!(argb, 0xffff_0000);
    }
}
