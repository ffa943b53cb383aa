//! Circular avatar cropper.
//!
//! The source image is shown behind a circular viewport whose diameter is
//! the output size. The user pans (drag deltas in viewport pixels), zooms
//! between [`MIN_ZOOM`] and [`MAX_ZOOM`] and rotates. Placement is always
//! clamped so the image covers the whole circle.
//!
//! Screen placement of a source point `q` is `R(θ)·s·(q − c) + offset`, where
//! `c` is the image centre and `s` the effective scale. Rendering walks the
//! output pixels and inverts that mapping.

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, Rgba, RgbaImage};

use crate::error::{Result, ShopError};

pub const MIN_ZOOM: f32 = 1.0;
pub const MAX_ZOOM: f32 = 3.0;
/// Zoom change per wheel notch
pub const WHEEL_STEP: f32 = 0.1;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// An in-progress crop. Nothing leaves the session until [`confirm`](Self::confirm).
#[derive(Debug, Clone)]
pub struct CropSession {
    source: RgbaImage,
    output_size: u32,
    zoom: f32,
    /// Degrees, normalised into (-180, 180]
    rotation: f32,
    offset: (f32, f32),
}

impl CropSession {
    pub fn new(source: RgbaImage, output_size: u32) -> Result<Self> {
        if source.width() == 0 || source.height() == 0 {
            return Err(ShopError::validation("image has no pixels"));
        }
        if output_size == 0 {
            return Err(ShopError::validation("output size must be positive"));
        }
        Ok(Self {
            source,
            output_size,
            zoom: MIN_ZOOM,
            rotation: 0.0,
            offset: (0.0, 0.0),
        })
    }

    /// Decode a PNG or JPEG file
    pub fn open(path: &Path, output_size: u32) -> Result<Self> {
        let source = image::open(path)?.to_rgba8();
        Self::new(source, output_size)
    }

    pub fn from_bytes(bytes: &[u8], output_size: u32) -> Result<Self> {
        let source = image::load_from_memory(bytes)?.to_rgba8();
        Self::new(source, output_size)
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn offset(&self) -> (f32, f32) {
        self.offset
    }

    pub fn output_size(&self) -> u32 {
        self.output_size
    }

    /// Pan by a pointer delta in viewport pixels
    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.offset = (self.offset.0 + dx, self.offset.1 + dy);
        self.clamp_offset();
    }

    /// Zoom by wheel notches, positive zooms in
    pub fn wheel(&mut self, notches: i32) {
        self.set_zoom(self.zoom + notches as f32 * WHEEL_STEP);
    }

    /// Absolute zoom, as from a slider
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = if zoom.is_finite() {
            zoom.clamp(MIN_ZOOM, MAX_ZOOM)
        } else {
            MIN_ZOOM
        };
        self.clamp_offset();
    }

    pub fn rotate(&mut self, degrees: f32) {
        self.set_rotation(self.rotation + degrees);
    }

    pub fn set_rotation(&mut self, degrees: f32) {
        self.rotation = normalize_degrees(degrees);
        self.clamp_offset();
    }

    fn radius(&self) -> f32 {
        self.output_size as f32 / 2.0
    }

    /// Viewport pixels per source pixel
    fn scale(&self) -> f32 {
        let shortest = self.source.width().min(self.source.height()) as f32;
        self.output_size as f32 / shortest * self.zoom
    }

    fn clamp_offset(&mut self) {
        let theta = self.rotation.to_radians();
        let s = self.scale();
        let r = self.radius();
        let max_x = (self.source.width() as f32 * s / 2.0 - r).max(0.0);
        let max_y = (self.source.height() as f32 * s / 2.0 - r).max(0.0);

        let (ox, oy) = rotate(self.offset, -theta);
        let local = (ox.clamp(-max_x, max_x), oy.clamp(-max_y, max_y));
        self.offset = rotate(local, theta);
    }

    /// Render the square crop
    pub fn render(&self) -> RgbaImage {
        let n = self.output_size;
        let half = n as f32 / 2.0;
        let theta = self.rotation.to_radians();
        let s = self.scale();
        let centre = (
            self.source.width() as f32 / 2.0,
            self.source.height() as f32 / 2.0,
        );

        RgbaImage::from_fn(n, n, |i, j| {
            let p = (i as f32 + 0.5 - half, j as f32 + 0.5 - half);
            let (x, y) = rotate((p.0 - self.offset.0, p.1 - self.offset.1), -theta);
            sample_bilinear(&self.source, x / s + centre.0, y / s + centre.1)
        })
    }

    /// Finish the crop and encode it as PNG
    pub fn confirm(self) -> Result<Vec<u8>> {
        let rendered = self.render();
        let mut out = Cursor::new(Vec::new());
        rendered.write_to(&mut out, ImageFormat::Png)?;
        tracing::debug!(
            size = self.output_size,
            zoom = self.zoom,
            rotation = self.rotation,
            "avatar crop confirmed"
        );
        Ok(out.into_inner())
    }

    /// Abandon the crop, releasing the source image
    pub fn cancel(self) {
        tracing::debug!("avatar crop cancelled");
    }
}

fn normalize_degrees(degrees: f32) -> f32 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let mut d = degrees.rem_euclid(360.0);
    if d > 180.0 {
        d -= 360.0;
    }
    d
}

fn rotate((x, y): (f32, f32), theta: f32) -> (f32, f32) {
    let (sin, cos) = theta.sin_cos();
    (x * cos - y * sin, x * sin + y * cos)
}

/// Sample at continuous coordinates where pixel `(i, j)` covers
/// `[i, i+1) x [j, j+1)`. Points outside the image are transparent.
fn sample_bilinear(img: &RgbaImage, x: f32, y: f32) -> Rgba<u8> {
    let (w, h) = img.dimensions();
    if !(0.0..=w as f32).contains(&x) || !(0.0..=h as f32).contains(&y) {
        return TRANSPARENT;
    }

    let fx = (x - 0.5).clamp(0.0, (w - 1) as f32);
    let fy = (y - 0.5).clamp(0.0, (h - 1) as f32);
    let x0 = fx.floor() as u32;
    let y0 = fy.floor() as u32;
    let x1 = (x0 + 1).min(w - 1);
    let y1 = (y0 + 1).min(h - 1);
    let tx = fx - x0 as f32;
    let ty = fy - y0 as f32;

    let p00 = img.get_pixel(x0, y0).0;
    let p10 = img.get_pixel(x1, y0).0;
    let p01 = img.get_pixel(x0, y1).0;
    let p11 = img.get_pixel(x1, y1).0;

    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = p00[c] as f32 * (1.0 - tx) + p10[c] as f32 * tx;
        let bottom = p01[c] as f32 * (1.0 - tx) + p11[c] as f32 * tx;
        out[c] = (top * (1.0 - ty) + bottom * ty).round().clamp(0.0, 255.0) as u8;
    }
    Rgba(out)
}
