use super::{file_frequencies, frequencies::stem_of};
use crate::{
    export::{Layout, Section},
    Result, UrsError,
};
use plotters::{coord::Shift, prelude::*};
use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::{debug, info};

pub const CANVAS: (u32, u32) = (1600, 900);
const MAX_WORDS: usize = 200;
const MIN_FONT: f64 = 14.0;
const MAX_FONT: f64 = 140.0;
/// Rough advance width of a sans-serif glyph relative to its size.
const GLYPH_WIDTH: f64 = 0.6;
const SPIRAL_STEP: f64 = 0.05;
const SPIRAL_GROWTH: f64 = 3.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImageFormat {
    #[default]
    Png,
    Jpg,
    Jpeg,
    Bmp,
    Svg,
}

impl ImageFormat {
    pub const NAMES: &'static str = "png, jpg, jpeg, bmp, svg";

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Jpeg => "jpeg",
            Self::Bmp => "bmp",
            Self::Svg => "svg",
        }
    }
}

impl FromStr for ImageFormat {
    type Err = UrsError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "png" => Self::Png,
            "jpg" => Self::Jpg,
            "jpeg" => Self::Jpeg,
            "bmp" => Self::Bmp,
            "svg" => Self::Svg,
            _ => {
                return Err(UrsError::InvalidArgument(format!(
                    "unsupported wordcloud format {s:?}, expected one of {}",
                    Self::NAMES
                )))
            }
        })
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A word with its final position on the canvas, top-left anchored.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedWord {
    pub word: String,
    pub font_size: f64,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub color: RGBColor,
}

impl PlacedWord {
    fn overlaps(&self, other: &PlacedWord) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

fn rgb(r: f64, g: f64, b: f64) -> RGBColor {
    RGBColor((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
}

/// `h`, `s` and `v` all in `0.0..=1.0`.
fn hsv_to_rgb(h: f64, s: f64, v: f64) -> RGBColor {
    let h = h.rem_euclid(1.0);
    if s <= 0.01 {
        return rgb(v, v, v);
    }
    let i = (h * 6.0) as i32;
    let f = (h * 6.0) - i as f64;
    let p = v * (1. - s);
    let q = v * (1. - s * f);
    let t = v * (1. - s * (1. - f));
    match i % 6 {
        0 => rgb(v, t, p),
        1 => rgb(q, v, p),
        2 => rgb(p, v, t),
        3 => rgb(p, q, v),
        4 => rgb(t, p, v),
        _ => rgb(v, p, q),
    }
}

/// Font size scaled by the square root of relative frequency.
fn font_size(frequency: usize, max_frequency: usize) -> f64 {
    let ratio = (frequency as f64 / max_frequency.max(1) as f64).sqrt();
    MIN_FONT + (MAX_FONT - MIN_FONT) * ratio
}

/// Places words largest first along an Archimedean spiral from the canvas centre.
///
/// Words that cannot be placed without overlapping or leaving the canvas are dropped.
pub fn layout_words(frequencies: &[(String, usize)], canvas: (u32, u32)) -> Vec<PlacedWord> {
    let (canvas_w, canvas_h) = (canvas.0 as f64, canvas.1 as f64);
    let max_frequency = frequencies.iter().map(|(_, n)| *n).max().unwrap_or(1);
    let max_radius = canvas_w.hypot(canvas_h) / 2.0;
    let mut placed: Vec<PlacedWord> = vec![];

    for (index, (word, frequency)) in frequencies.iter().take(MAX_WORDS).enumerate() {
        let size = font_size(*frequency, max_frequency);
        let width = (word.chars().count() as f64 * size * GLYPH_WIDTH).ceil() as i32;
        let height = size.ceil() as i32;
        if width as f64 > canvas_w || height as f64 > canvas_h {
            debug!(word = %word, "too large for the canvas");
            continue;
        }

        let mut candidate = PlacedWord {
            word: word.clone(),
            font_size: size,
            x: 0,
            y: 0,
            width,
            height,
            color: hsv_to_rgb(index as f64 * 0.137, 0.65, 0.75),
        };

        let mut theta: f64 = 0.0;
        loop {
            let radius = SPIRAL_GROWTH * theta;
            if radius > max_radius {
                debug!(word = %word, "no room left");
                break;
            }
            candidate.x = (canvas_w / 2.0 + radius * theta.cos() - width as f64 / 2.0) as i32;
            candidate.y = (canvas_h / 2.0 + radius * theta.sin() - height as f64 / 2.0) as i32;
            let inside = candidate.x >= 0
                && candidate.y >= 0
                && (candidate.x + width) as f64 <= canvas_w
                && (candidate.y + height) as f64 <= canvas_h;
            if inside && !placed.iter().any(|other| other.overlaps(&candidate)) {
                placed.push(candidate);
                break;
            }
            theta += SPIRAL_STEP;
        }
    }
    placed
}

fn draw<DB: DrawingBackend>(root: DrawingArea<DB, Shift>, words: &[PlacedWord], path: &Path) -> Result<()> {
    let render_error = |err: DrawingAreaErrorKind<DB::ErrorType>| UrsError::Render {
        path: path.to_path_buf(),
        message: err.to_string(),
    };

    root.fill(&WHITE).map_err(render_error)?;
    for word in words {
        root.draw(&Text::new(
            word.word.clone(),
            (word.x, word.y),
            ("sans-serif", word.font_size).into_font().color(&word.color),
        ))
        .map_err(render_error)?;
    }
    root.present().map_err(render_error)?;
    Ok(())
}

/// Draws placed words to `output`, bitmap or SVG depending on `format`.
pub fn render_wordcloud(words: &[PlacedWord], output: &Path, format: ImageFormat) -> Result<()> {
    match format {
        ImageFormat::Svg => draw(SVGBackend::new(output, CANVAS).into_drawing_area(), words, output),
        _ => draw(BitMapBackend::new(output, CANVAS).into_drawing_area(), words, output),
    }
}

/// Builds a wordcloud from a scrape file and saves it under `analytics/wordcloud`.
pub fn generate_wordcloud(layout: &Layout, scrape_file: &Path, format: ImageFormat) -> Result<PathBuf> {
    info!("Generating a {format} wordcloud for {}.", scrape_file.display());
    let frequencies = file_frequencies(scrape_file)?;
    let words = layout_words(&frequencies, CANVAS);
    info!("Placed {} of {} words.", words.len(), frequencies.len());

    let stem = stem_of(scrape_file);
    let output = layout.unique_path(Section::Wordcloud, &format!("{stem}-wordcloud"), format.extension())?;
    render_wordcloud(&words, &output, format)?;
    info!("Saved to {}", output.display());
    Ok(output)
}
