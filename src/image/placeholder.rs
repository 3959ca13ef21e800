// src/image/placeholder.rs
// Deterministic SVG placeholders derived from the prompt text

use async_trait::async_trait;

use super::artifact::ImageArtifact;
use super::provider::{ImageProvider, PLACEHOLDER_MODEL};
use crate::error::Result;

/// Side length of the rendered swatch, in SVG user units
const SWATCH_SIZE: u32 = 512;

/// An HSL triple with integer degrees and percentages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsl {
    pub hue: u32,
    pub saturation: u32,
    pub lightness: u32,
}

impl Hsl {
    /// Lowercase `#rrggbb`. Channels are truncated, not rounded.
    pub fn to_hex(self) -> String {
        let (r, g, b) = hls_to_rgb(
            f64::from(self.hue) / 360.0,
            f64::from(self.lightness) / 100.0,
            f64::from(self.saturation) / 100.0,
        );
        format!(
            "#{:02x}{:02x}{:02x}",
            (r * 255.0) as u8,
            (g * 255.0) as u8,
            (b * 255.0) as u8
        )
    }
}

fn hls_to_rgb(h: f64, l: f64, s: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (l, l, l);
    }
    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0 * l - m2;
    (
        hue_channel(m1, m2, h + 1.0 / 3.0),
        hue_channel(m1, m2, h),
        hue_channel(m1, m2, h - 1.0 / 3.0),
    )
}

fn hue_channel(m1: f64, m2: f64, hue: f64) -> f64 {
    let hue = hue.rem_euclid(1.0);
    if hue < 1.0 / 6.0 {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < 2.0 / 3.0 {
        m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
    } else {
        m1
    }
}

/// Pure function from `(prompt, count)` to a batch of inline SVG images
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderSynthesizer;

impl PlaceholderSynthesizer {
    pub fn new() -> Self {
        Self
    }

    /// First 32 bits of the prompt's MD5 digest
    pub fn seed(prompt: &str) -> u64 {
        let hex = format!("{:x}", md5::compute(prompt.as_bytes()));
        hex.chars()
            .take(8)
            .filter_map(|c| c.to_digit(16))
            .fold(0u64, |acc, d| acc * 16 + u64::from(d))
    }

    /// Color for slot `index`. Hues step 120° apart from the seed's base hue.
    pub fn slot_color(seed: u64, index: u64) -> Hsl {
        let base_hue = seed % 360;
        Hsl {
            hue: ((base_hue + index * 120) % 360) as u32,
            saturation: (60 + (seed / (index + 1)) % 40) as u32,
            lightness: (50 + (seed / (index + 2)) % 30) as u32,
        }
    }

    /// The first `count` slot colors for a prompt, as hex strings
    pub fn palette(prompt: &str, count: usize) -> Vec<String> {
        let seed = Self::seed(prompt);
        (0..count as u64)
            .map(|i| Self::slot_color(seed, i).to_hex())
            .collect()
    }

    /// `count` placeholder images. Image `i` is a gradient from slot color `i` to slot color `i + 1`.
    pub fn generate(&self, prompt: &str, count: usize) -> Vec<ImageArtifact> {
        let colors = Self::palette(prompt, count + 1);
        (0..count)
            .map(|i| ImageArtifact::inline_svg(&render_svg(i, count, &colors[i], &colors[i + 1])))
            .collect()
    }
}

fn render_svg(index: usize, count: usize, start: &str, end: &str) -> String {
    let size = SWATCH_SIZE;
    let center = size / 2;
    format!(
        concat!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"##,
            r##"<defs><linearGradient id="grad{index}" x1="0%" y1="0%" x2="100%" y2="100%">"##,
            r##"<stop offset="0%" style="stop-color:{start};stop-opacity:1"/>"##,
            r##"<stop offset="100%" style="stop-color:{end};stop-opacity:1"/>"##,
            r##"</linearGradient></defs>"##,
            r##"<rect width="{size}" height="{size}" fill="url(#grad{index})"/>"##,
            r##"<circle cx="{center}" cy="{center}" r="{radius}" fill="#ffffff" fill-opacity="0.18"/>"##,
            r##"<text x="{center}" y="{label_y}" font-family="sans-serif" font-size="20" fill="#ffffff" fill-opacity="0.85" text-anchor="middle">Preview {number} of {count}</text>"##,
            r##"</svg>"##
        ),
        size = size,
        center = center,
        radius = size / 5,
        label_y = size - 32,
        index = index,
        number = index + 1,
        count = count,
        start = start,
        end = end,
    )
}

#[async_trait]
impl ImageProvider for PlaceholderSynthesizer {
    fn provider_name(&self) -> &str {
        "placeholder"
    }

    fn model_name(&self) -> &str {
        PLACEHOLDER_MODEL
    }

    fn image_model(&self) -> String {
        PLACEHOLDER_MODEL.to_string()
    }

    async fn generate(&self, prompt: &str, count: usize) -> Result<Vec<ImageArtifact>> {
        Ok(PlaceholderSynthesizer::generate(self, prompt, count))
    }
}
