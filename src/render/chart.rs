use crate::config::GraphsConfig;
use crate::error::Result;
use crate::language::Category;
use crate::model::DayBucket;
use image::{Rgb, RgbImage};
use palette::{FromColor, Lch, ShiftHue, Srgb};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const HUE_STEP: f32 = 47.0;

/// Draws charts for the report and returns the Markdown link target of
/// each image, or `None` when no image was produced.
pub trait ChartRenderer {
    fn language_chart(&mut self, label: &str, breakdown: &[(Category, u64)]) -> Option<String>;
    fn activity_chart(&mut self, label: &str, activity: &[DayBucket]) -> Option<String>;
}

pub struct NoCharts;

impl ChartRenderer for NoCharts {
    fn language_chart(&mut self, _label: &str, _breakdown: &[(Category, u64)]) -> Option<String> {
        None
    }

    fn activity_chart(&mut self, _label: &str, _activity: &[DayBucket]) -> Option<String> {
        None
    }
}

pub fn slug(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for c in label.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_matches('_').to_string()
}

/// Writes PNG charts into a directory next to the document.
pub struct PngCharts {
    out_dir: PathBuf,
    link_dir: String,
    width: u32,
    height: u32,
    color: Srgb<u8>,
}

impl PngCharts {
    pub fn new(document_dir: &Path, config: &GraphsConfig) -> Self {
        let color = Srgb::<u8>::from_str(config.color.trim()).unwrap_or_else(|e| {
            warn!(color = %config.color, error = %e, "invalid graph color, using default");
            fallback_color()
        });
        Self {
            out_dir: document_dir.join(&config.dir),
            link_dir: config.dir.trim_end_matches('/').to_string(),
            width: config.width.max(1),
            height: config.height.max(1),
            color,
        }
    }

    fn save(&self, name: String, image: &RgbImage) -> Option<String> {
        match self.write(&name, image) {
            Ok(path) => {
                debug!(path = %path.display(), "wrote chart");
                Some(format!("{}/{}", self.link_dir, name))
            }
            Err(e) => {
                warn!(chart = %name, error = %e, "failed to write chart, falling back to text");
                None
            }
        }
    }

    fn write(&self, name: &str, image: &RgbImage) -> Result<PathBuf> {
        fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join(name);
        image.save(&path)?;
        Ok(path)
    }
}

impl ChartRenderer for PngCharts {
    /// A single stacked bar, one segment per category, widths proportional
    /// to line volume.
    fn language_chart(&mut self, label: &str, breakdown: &[(Category, u64)]) -> Option<String> {
        let total: u64 = breakdown.iter().map(|(_, v)| v).sum();
        if total == 0 {
            return None;
        }
        let mut image = RgbImage::from_pixel(self.width, self.height, BACKGROUND);
        let mut x0 = 0u32;
        for (i, (_, lines)) in breakdown.iter().enumerate() {
            let x1 = if i + 1 == breakdown.len() {
                self.width
            } else {
                x0 + (*lines as f64 / total as f64 * self.width as f64).round() as u32
            };
            fill_rect(&mut image, x0, 0, x1.min(self.width), self.height, shade(self.color, i));
            x0 = x1.min(self.width);
        }
        self.save(format!("lang_{}.png", slug(label)), &image)
    }

    /// One column per day, height proportional to that day's commits.
    fn activity_chart(&mut self, label: &str, activity: &[DayBucket]) -> Option<String> {
        let max = activity.iter().map(|b| b.commit_count).max().unwrap_or(0);
        if max == 0 {
            return None;
        }
        let mut image = RgbImage::from_pixel(self.width, self.height, BACKGROUND);
        let color = to_rgb(self.color);
        let columns = activity.len() as u32;
        for (i, bucket) in activity.iter().enumerate() {
            let x0 = i as u32 * self.width / columns;
            let x1 = ((i as u32 + 1) * self.width / columns).max(x0 + 1);
            let bar = (bucket.commit_count as f64 / max as f64 * self.height as f64).round() as u32;
            fill_rect(&mut image, x0, self.height.saturating_sub(bar), x1, self.height, color);
        }
        self.save(format!("activity_{}.png", slug(label)), &image)
    }
}

fn fill_rect(image: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgb<u8>) {
    for x in x0..x1.min(image.width()) {
        for y in y0..y1.min(image.height()) {
            image.put_pixel(x, y, color);
        }
    }
}

fn fallback_color() -> Srgb<u8> {
    Srgb::new(0x4e, 0x79, 0xa7)
}

fn to_rgb(color: Srgb<u8>) -> Rgb<u8> {
    let (r, g, b) = color.into_components();
    Rgb([r, g, b])
}

/// Rotates the base colour's hue so neighbouring segments stay distinct.
fn shade(base: Srgb<u8>, index: usize) -> Rgb<u8> {
    if index == 0 {
        return to_rgb(base);
    }
    let lch: Lch = Lch::from_color(base.into_format::<f32>());
    let shifted: Srgb = Srgb::from_color(lch.shift_hue(HUE_STEP * index as f32));
    let (r, g, b) = shifted.into_components();
    Rgb([(r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8])
}
