//! Greedy word wrapping against a width metric.

/// Measures rendered text in logical units.
pub trait TextMeasure {
    fn width(&self, text: &str) -> f32;
    fn line_height(&self) -> f32;
}

/// Every character has the same advance, like a terminal cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Monospace {
    pub advance: f32,
    pub line_height: f32,
}

impl TextMeasure for Monospace {
    fn width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.advance
    }

    fn line_height(&self) -> f32 {
        self.line_height
    }
}

/// Splits `text` on spaces and packs words into lines narrower than
/// `max_width`. A word that alone exceeds the limit gets its own line.
pub fn wrap<M: TextMeasure + ?Sized>(text: &str, measure: &M, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split(' ').filter(|w| !w.is_empty()) {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if current.is_empty() || measure.width(&candidate) < max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Pre-wrapped text that can be placed anywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub width: f32,
    pub line_height: f32,
}

impl TextBlock {
    pub fn build<M: TextMeasure + ?Sized>(text: &str, measure: &M, max_width: f32) -> Self {
        let lines = wrap(text, measure, max_width);
        let width = lines
            .iter()
            .map(|l| measure.width(l))
            .fold(0.0_f32, f32::max);
        Self {
            lines,
            width,
            line_height: measure.line_height(),
        }
    }

    pub fn height(&self) -> f32 {
        self.lines.len() as f32 * self.line_height
    }

    /// Top-left position of every line when the block starts at `(x, y)`.
    pub fn positioned(&self, x: f32, y: f32) -> impl Iterator<Item = (f32, f32, &str)> + '_ {
        self.lines
            .iter()
            .enumerate()
            .map(move |(i, l)| (x, y + i as f32 * self.line_height, l.as_str()))
    }
}
