use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::error::StylistError;

pub const DEFAULT_POSITION: f32 = 50.0;

const DIVIDER: Rgba<u8> = Rgba([255, 255, 255, 200]);
const DIVIDER_WIDTH: u32 = 2;

/// Decoded original and generated images at the same size, ready to be
/// split by the before/after slider.
#[derive(Debug, Clone)]
pub struct ComparisonFrames {
    original: RgbaImage,
    generated: RgbaImage,
}

impl ComparisonFrames {
    /// Decodes both images and letterboxes the original into the generated
    /// image's dimensions, keeping its aspect ratio.
    pub fn prepare(original: &[u8], generated: &[u8]) -> Result<Self, StylistError> {
        let generated = image::load_from_memory(generated)
            .map_err(|e| StylistError::FileRead(format!("generated image: {}", e)))?
            .to_rgba8();
        let original = image::load_from_memory(original)
            .map_err(|e| StylistError::FileRead(format!("original image: {}", e)))?
            .to_rgba8();

        let original = contain(&original, generated.width(), generated.height());
        Ok(Self {
            original,
            generated,
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.generated.dimensions()
    }

    /// Renders the split view: generated on the left of `position` (0-100),
    /// original on the right, with a divider at the split.
    pub fn compose(&self, position: f32) -> RgbaImage {
        let (width, height) = self.dimensions();
        let split = split_column(width, position);

        let mut frame = self.original.clone();
        if width == 0 || height == 0 {
            return frame;
        }

        let stride = width as usize * 4;
        let left = split as usize * 4;
        let divider = split.saturating_sub(DIVIDER_WIDTH / 2);
        let start = divider as usize * 4;
        let end = (divider + DIVIDER_WIDTH).min(width) as usize * 4;
        let generated = self.generated.as_raw();

        for (row, source) in frame.chunks_exact_mut(stride).zip(generated.chunks_exact(stride)) {
            row[..left].copy_from_slice(&source[..left]);
            for pixel in row[start..end].chunks_exact_mut(4) {
                pixel.copy_from_slice(&DIVIDER.0);
            }
        }

        frame
    }
}

/// First column that shows the original image.
pub fn split_column(width: u32, position: f32) -> u32 {
    let position = if position.is_finite() {
        position.clamp(0.0, 100.0)
    } else {
        DEFAULT_POSITION
    };
    ((width as f32 * position / 100.0).round() as u32).min(width)
}

/// Scales `source` to fit inside `width` x `height`, centred on a
/// transparent canvas.
fn contain(source: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if source.dimensions() == (width, height) {
        return source.clone();
    }

    let scale = (width as f32 / source.width() as f32).min(height as f32 / source.height() as f32);
    let fit_w = ((source.width() as f32 * scale).round() as u32).clamp(1, width.max(1));
    let fit_h = ((source.height() as f32 * scale).round() as u32).clamp(1, height.max(1));
    let resized = imageops::resize(source, fit_w, fit_h, FilterType::Triangle);

    let mut canvas = RgbaImage::new(width, height);
    let x = (width - fit_w) / 2;
    let y = (height - fit_h) / 2;
    imageops::overlay(&mut canvas, &resized, x as i64, y as i64);
    canvas
}
