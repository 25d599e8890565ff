//! The ink board: surface ownership, event intake, and image load/export.

use crate::config::{BoardConfig, ConfigError};
use crate::draw::{self, Stroke};
use crate::input::{ButtonState, MouseButton, Pen, PenSet, PenSlot, Touch};
use crate::util::{self, ViewRect};
use cairo::{Context, Format, ImageSurface};
use image::codecs::jpeg::JpegEncoder;
use log::{debug, info, warn};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors surfaced by board operations.
#[derive(Debug, Error)]
pub enum BoardError {
    /// A touch identifier addressed a pen slot that does not exist.
    #[error("invalid contact: no pen slot for touch identifier {id} (touch slots: {slots})")]
    InvalidContact { id: u32, slots: usize },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("failed to read image from {path}: {source}")]
    ImageRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("drawing backend error: {0}")]
    Backend(#[from] cairo::Error),

    #[error("surface data unavailable: {0}")]
    SurfaceData(#[from] cairo::BorrowError),
}

/// Encoded output format for [`InkBoard::export`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Lossless PNG with alpha.
    Png,
    /// JPEG at the given quality (1-100). The surface is composited over
    /// white because JPEG carries no alpha.
    Jpeg { quality: u8 },
}

/// Callback receiving every stroke the board renders.
pub type StrokeListener = Box<dyn FnMut(&Stroke)>;

/// A fixed-resolution ink surface driven by host pointer and touch events.
///
/// The board owns the raster surface and one pen per possible simultaneous
/// contact: `max_touch_points` touch pens plus a dedicated mouse pen. Event
/// methods take the displayed view rectangle alongside client coordinates and
/// map them onto the logical surface, so a letterboxed view still puts ink
/// under the finger.
pub struct InkBoard {
    config: BoardConfig,
    surface: ImageSurface,
    pens: PenSet,
    listeners: Vec<StrokeListener>,
}

impl InkBoard {
    /// Creates a board with the given configuration and one pen per
    /// simultaneous touch contact the host reports supporting.
    ///
    /// The fresh surface is transparent apart from the guide pattern (two
    /// corner-to-corner diagonals and a border).
    ///
    /// # Errors
    /// Fails when the configuration is invalid or the raster surface cannot
    /// be allocated.
    pub fn new(config: BoardConfig, max_touch_points: usize) -> Result<Self, BoardError> {
        config.validate()?;

        let surface = ImageSurface::create(
            Format::ARgb32,
            config.width as i32,
            config.height as i32,
        )?;

        let board = Self {
            pens: PenSet::new(max_touch_points),
            config,
            surface,
            listeners: Vec::new(),
        };

        {
            let ctx = Context::new(&board.surface)?;
            draw::render::render_guides(&ctx, board.config.width, board.config.height);
        }

        debug!(
            "Ink board ready: {}x{}, {} touch slots",
            board.config.width, board.config.height, max_touch_points
        );
        Ok(board)
    }

    /// The board configuration.
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Logical surface width in pixels.
    pub fn width(&self) -> u32 {
        self.config.width
    }

    /// Logical surface height in pixels.
    pub fn height(&self) -> u32 {
        self.config.height
    }

    /// Read access to a pen's state.
    ///
    /// # Errors
    /// Fails with [`BoardError::InvalidContact`] for an out-of-range touch
    /// identifier.
    pub fn pen(&self, slot: PenSlot) -> Result<&Pen, BoardError> {
        match slot {
            PenSlot::Mouse => Ok(self.pens.mouse()),
            PenSlot::Touch(id) => self.pens.touch(id).ok_or(BoardError::InvalidContact {
                id,
                slots: self.pens.touch_slots(),
            }),
        }
    }

    /// Registers a stroke listener, called after each stroke is rendered.
    pub fn on_stroke(&mut self, listener: impl FnMut(&Stroke) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Primary-button press: starts the mouse pen at the mapped position.
    /// Other buttons are ignored.
    ///
    /// # Errors
    /// Currently infallible; kept fallible for uniformity with the other
    /// event methods.
    pub fn mouse_down(
        &mut self,
        button: MouseButton,
        view: &ViewRect,
        client_x: f64,
        client_y: f64,
        time_ms: f64,
    ) -> Result<(), BoardError> {
        if button != MouseButton::Left {
            return Ok(());
        }
        let (x, y) = self.map(view, client_x, client_y);
        self.pens.mouse_mut().start(x, y, time_ms);
        Ok(())
    }

    /// Mouse motion: draws a segment while the primary button is held.
    ///
    /// # Errors
    /// Fails when the raster backend rejects the draw.
    pub fn mouse_move(
        &mut self,
        buttons: ButtonState,
        view: &ViewRect,
        client_x: f64,
        client_y: f64,
        time_ms: f64,
    ) -> Result<(), BoardError> {
        if !buttons.left {
            return Ok(());
        }
        let (x, y) = self.map(view, client_x, client_y);
        let stroke = self
            .pens
            .mouse_mut()
            .move_to(x, y, time_ms, None, &self.config);
        self.finish(stroke)
    }

    /// Primary-button release: stops the mouse pen, rendering a steady dot
    /// when no movement happened since the press.
    ///
    /// # Errors
    /// Fails when the raster backend rejects the draw.
    pub fn mouse_up(
        &mut self,
        button: MouseButton,
        view: &ViewRect,
        client_x: f64,
        client_y: f64,
        time_ms: f64,
    ) -> Result<(), BoardError> {
        if button != MouseButton::Left {
            return Ok(());
        }
        let (x, y) = self.map(view, client_x, client_y);
        let stroke = self
            .pens
            .mouse_mut()
            .stop(x, y, time_ms, None, &self.config);
        self.finish(stroke)
    }

    /// Touch contacts beginning: starts the pen for each changed contact.
    ///
    /// # Errors
    /// Fails with [`BoardError::InvalidContact`] when an identifier has no
    /// pen slot.
    pub fn touch_start(
        &mut self,
        view: &ViewRect,
        time_ms: f64,
        touches: &[Touch],
    ) -> Result<(), BoardError> {
        for touch in touches {
            let (x, y) = self.map(view, touch.client_x, touch.client_y);
            pen_for_touch(&mut self.pens, touch.identifier)?.start(x, y, time_ms);
        }
        Ok(())
    }

    /// Touch contacts moving: draws a segment for each changed contact whose
    /// pen is active.
    ///
    /// # Errors
    /// Fails with [`BoardError::InvalidContact`] for an unknown identifier,
    /// or when the raster backend rejects a draw.
    pub fn touch_move(
        &mut self,
        view: &ViewRect,
        time_ms: f64,
        touches: &[Touch],
    ) -> Result<(), BoardError> {
        for touch in touches {
            let (x, y) = self.map(view, touch.client_x, touch.client_y);
            let stroke = pen_for_touch(&mut self.pens, touch.identifier)?.move_to(
                x,
                y,
                time_ms,
                touch.force,
                &self.config,
            );
            self.finish(stroke)?;
        }
        Ok(())
    }

    /// Touch contacts lifting: stops the pen for each changed contact,
    /// rendering a steady dot for contacts that never moved.
    ///
    /// # Errors
    /// Fails with [`BoardError::InvalidContact`] for an unknown identifier,
    /// or when the raster backend rejects a draw.
    pub fn touch_end(
        &mut self,
        view: &ViewRect,
        time_ms: f64,
        touches: &[Touch],
    ) -> Result<(), BoardError> {
        for touch in touches {
            let (x, y) = self.map(view, touch.client_x, touch.client_y);
            let stroke = pen_for_touch(&mut self.pens, touch.identifier)?.stop(
                x,
                y,
                time_ms,
                touch.force,
                &self.config,
            );
            self.finish(stroke)?;
        }
        Ok(())
    }

    /// Replaces the surface content with a decoded raster image.
    ///
    /// On success the surface is cleared, the image is drawn at the origin,
    /// and every pen returns to idle so a stroke begun before the swap cannot
    /// continue onto the new content. On failure the surface and pens are
    /// left untouched.
    ///
    /// # Errors
    /// Fails with [`BoardError::Image`] when the bytes do not decode as a
    /// supported raster format.
    pub fn set_image(&mut self, encoded: &[u8]) -> Result<(), BoardError> {
        let decoded = image::load_from_memory(encoded)?;
        self.blit(&decoded.to_rgba8())
    }

    /// [`set_image`](Self::set_image) reading the encoded bytes from a file.
    ///
    /// # Errors
    /// Fails with [`BoardError::ImageRead`] when the file cannot be read, or
    /// any [`set_image`](Self::set_image) error.
    pub fn set_image_file(&mut self, path: &Path) -> Result<(), BoardError> {
        let encoded = fs::read(path).map_err(|source| BoardError::ImageRead {
            path: path.to_path_buf(),
            source,
        })?;
        self.set_image(&encoded)
    }

    /// Serializes the current raster content to the requested format.
    ///
    /// # Errors
    /// Fails when the surface pixels cannot be borrowed or encoding fails.
    pub fn export(&mut self, format: ExportFormat) -> Result<Vec<u8>, BoardError> {
        let rgba = self.snapshot_rgba()?;
        let mut encoded = Cursor::new(Vec::new());
        match format {
            ExportFormat::Png => {
                rgba.write_to(&mut encoded, image::ImageFormat::Png)?;
            }
            ExportFormat::Jpeg { quality } => {
                let rgb = composite_over_white(&rgba);
                JpegEncoder::new_with_quality(&mut encoded, quality.clamp(1, 100))
                    .encode_image(&rgb)?;
            }
        }
        debug!("Exported {:?} snapshot ({} bytes)", format, encoded.get_ref().len());
        Ok(encoded.into_inner())
    }

    fn map(&self, view: &ViewRect, client_x: f64, client_y: f64) -> (f64, f64) {
        util::map_to_surface(view, self.config.width, self.config.height, client_x, client_y)
    }

    /// Renders a produced stroke and hands it to the listeners.
    fn finish(&mut self, stroke: Option<Stroke>) -> Result<(), BoardError> {
        let Some(stroke) = stroke else {
            return Ok(());
        };
        {
            let ctx = Context::new(&self.surface)?;
            draw::render::render_stroke(&ctx, &stroke);
        }
        for listener in &mut self.listeners {
            listener(&stroke);
        }
        Ok(())
    }

    fn blit(&mut self, rgba: &image::RgbaImage) -> Result<(), BoardError> {
        let source = surface_from_rgba(rgba)?;
        {
            let ctx = Context::new(&self.surface)?;
            draw::render::clear(&ctx);
            ctx.set_source_surface(&source, 0.0, 0.0)?;
            ctx.paint()?;
        }
        self.pens.rest_all();
        info!(
            "Loaded {}x{} image onto the surface",
            rgba.width(),
            rgba.height()
        );
        Ok(())
    }

    /// Copies the surface out as straight (non-premultiplied) RGBA pixels.
    fn snapshot_rgba(&mut self) -> Result<image::RgbaImage, BoardError> {
        let width = self.config.width;
        let height = self.config.height;
        let stride = self.surface.stride() as usize;
        self.surface.flush();

        let data = self.surface.data()?;
        let mut rgba = image::RgbaImage::new(width, height);
        for y in 0..height {
            let line = &data[y as usize * stride..];
            for x in 0..width {
                let px = x as usize * 4;
                let argb = u32::from_ne_bytes([line[px], line[px + 1], line[px + 2], line[px + 3]]);
                let a = (argb >> 24) as u8;
                let r = unpremultiply((argb >> 16) as u8, a);
                let g = unpremultiply((argb >> 8) as u8, a);
                let b = unpremultiply(argb as u8, a);
                rgba.put_pixel(x, y, image::Rgba([r, g, b, a]));
            }
        }
        Ok(rgba)
    }
}

fn pen_for_touch(pens: &mut PenSet, id: u32) -> Result<&mut Pen, BoardError> {
    let slots = pens.touch_slots();
    pens.touch_mut(id).ok_or_else(|| {
        warn!("Touch identifier {id} has no pen slot ({slots} available)");
        BoardError::InvalidContact { id, slots }
    })
}

/// Converts straight RGBA8 pixels into a premultiplied ARGB32 Cairo surface.
fn surface_from_rgba(rgba: &image::RgbaImage) -> Result<ImageSurface, BoardError> {
    let (width, height) = rgba.dimensions();
    let mut surface = ImageSurface::create(Format::ARgb32, width as i32, height as i32)?;
    let stride = surface.stride() as usize;
    {
        let mut data = surface.data()?;
        for (y, row) in rgba.rows().enumerate() {
            let line = &mut data[y * stride..];
            for (x, pixel) in row.enumerate() {
                let [r, g, b, a] = pixel.0;
                let argb = (u32::from(a) << 24)
                    | (u32::from(premultiply(r, a)) << 16)
                    | (u32::from(premultiply(g, a)) << 8)
                    | u32::from(premultiply(b, a));
                line[x * 4..x * 4 + 4].copy_from_slice(&argb.to_ne_bytes());
            }
        }
    }
    surface.mark_dirty();
    Ok(surface)
}

fn premultiply(channel: u8, alpha: u8) -> u8 {
    ((u16::from(channel) * u16::from(alpha) + 127) / 255) as u8
}

fn unpremultiply(channel: u8, alpha: u8) -> u8 {
    if alpha == 0 {
        0
    } else {
        ((u16::from(channel) * 255 + u16::from(alpha) / 2) / u16::from(alpha)).min(255) as u8
    }
}

/// Flattens transparency onto a white backdrop for alpha-less formats.
fn composite_over_white(rgba: &image::RgbaImage) -> image::RgbImage {
    let mut rgb = image::RgbImage::new(rgba.width(), rgba.height());
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let blend =
            |c: u8| ((u32::from(c) * u32::from(a) + 255 * (255 - u32::from(a)) + 127) / 255) as u8;
        rgb.put_pixel(x, y, image::Rgb([blend(r), blend(g), blend(b)]));
    }
    rgb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn premultiply_round_trips_opaque_pixels() {
        for channel in [0u8, 1, 17, 128, 254, 255] {
            assert_eq!(unpremultiply(premultiply(channel, 255), 255), channel);
        }
    }

    #[test]
    fn premultiply_round_trips_within_rounding_error() {
        for alpha in [1u8, 63, 127, 200] {
            for channel in [0u8, 50, 100, 200, 255] {
                let back = unpremultiply(premultiply(channel, alpha), alpha);
                let drift = i16::from(back) - i16::from(channel);
                // One premultiplied step can lose up to 255/alpha of channel
                // resolution.
                assert!(drift.unsigned_abs() <= 255 / u16::from(alpha) + 1);
            }
        }
    }

    #[test]
    fn transparent_pixels_flatten_to_white() {
        let rgba = image::RgbaImage::from_pixel(2, 2, image::Rgba([9, 9, 9, 0]));
        let rgb = composite_over_white(&rgba);
        assert_eq!(rgb.get_pixel(0, 0).0, [255, 255, 255]);
    }

    #[test]
    fn opaque_pixels_survive_flattening() {
        let rgba = image::RgbaImage::from_pixel(1, 1, image::Rgba([12, 200, 77, 255]));
        let rgb = composite_over_white(&rgba);
        assert_eq!(rgb.get_pixel(0, 0).0, [12, 200, 77]);
    }
}
