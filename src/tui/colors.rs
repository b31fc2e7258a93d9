//! Color handling for the terminal user interface.
//!
//! Theme colors arrive as CSS-style hex strings. They are mapped to terminal
//! RGB here; anything unparsable falls back to the terminal's own colors.

use ratatui::style::{Color, Modifier, Style};

use crate::theme::Theme;

/// Opacity used when `bgAlpha` is not a number.
const FALLBACK_ALPHA: f32 = 0.7;

/// Used for bubbles that open a task
pub const BUBBLE: Color = Color::Rgb(40, 44, 60);
/// Used for the highlighted bubble
pub const BUBBLE_ACTIVE: Color = Color::Rgb(102, 224, 255);
/// Used for blank padding bubbles
pub const BUBBLE_BLANK: Color = Color::Rgb(70, 70, 70);
/// Used for passing check results
pub const RESULT_PASS: Color = Color::Rgb(80, 200, 120);
/// Used for failing check results
pub const RESULT_FAIL: Color = Color::Rgb(230, 90, 90);

/// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`. Alpha is ignored.
pub fn parse_hex_color(raw: &str) -> Option<(u8, u8, u8)> {
    let hex = raw.trim().strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut it = hex.chars().map(|c| channel(&format!("{c}{c}")));
            Some((it.next()??, it.next()??, it.next()??))
        }
        6 | 8 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        _ => None,
    }
}

fn to_color(raw: &str) -> Color {
    parse_hex_color(raw).map_or(Color::Reset, |(r, g, b)| Color::Rgb(r, g, b))
}

/// Opacity for the terminal blend. The style variable keeps the raw text.
fn blend_alpha(raw: &str) -> f32 {
    match raw.trim().parse::<f32>() {
        Ok(alpha) if alpha.is_finite() => alpha.clamp(0.0, 1.0),
        _ => {
            tracing::debug!(value = raw, "bgAlpha is not a number, blending with the default");
            FALLBACK_ALPHA
        }
    }
}

/// Blend a color toward black, the terminal's stand-in for transparency.
fn with_alpha(raw: &str, alpha: &str) -> Color {
    let alpha = blend_alpha(alpha);
    match parse_hex_color(raw) {
        Some((r, g, b)) => {
            let scale = |c: u8| (f32::from(c) * alpha).round() as u8;
            Color::Rgb(scale(r), scale(g), scale(b))
        }
        None => Color::Reset,
    }
}

/// Terminal styles derived from the theme's style variables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardPalette {
    pub background: Color,
    pub text: Color,
    pub border: Option<Color>,
    pub neon: Option<Color>,
}

impl CardPalette {
    pub fn from_theme(theme: &Theme) -> Self {
        CardPalette {
            background: with_alpha(&theme.bg, &theme.bg_alpha),
            text: to_color(&theme.text),
            border: theme.border_on.then(|| to_color(&theme.border_color)),
            neon: theme.neon.then(|| to_color(&theme.neon_color)),
        }
    }

    pub fn body(&self) -> Style {
        Style::default().bg(self.background).fg(self.text)
    }

    /// Border style of a card region; neon overrides the plain border.
    pub fn region_border(&self) -> Style {
        match (self.neon, self.border) {
            (Some(neon), _) => Style::default().fg(neon).add_modifier(Modifier::BOLD),
            (None, Some(border)) => Style::default().fg(border),
            (None, None) => Style::default().fg(self.background),
        }
    }

    pub fn has_frame(&self) -> bool {
        self.neon.is_some() || self.border.is_some()
    }
}
