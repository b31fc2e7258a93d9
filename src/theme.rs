//! Theme resolution.
//!
//! Theme options are read once from the overlay parameters and exposed as
//! named style variables that every card region picks up. Values are not
//! validated: a malformed color or font only affects how the card looks.

use serde::Serialize;

use crate::config::Params;

pub const DEFAULT_BG: &str = "#0b0b10";
pub const DEFAULT_BG_ALPHA: &str = "0.7";
pub const DEFAULT_BORDER_COLOR: &str = "#ffffff40";
pub const DEFAULT_TEXT: &str = "#ffffff";
pub const DEFAULT_FONT: &str = "Inter, system-ui, sans-serif";
pub const DEFAULT_FONT_SIZE: &str = "16";
pub const DEFAULT_NEON_COLOR: &str = "#66e0ff";

/// Resolved theme options.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Theme {
    pub bg: String,
    /// Background opacity as written, e.g. `0.7`.
    pub bg_alpha: String,
    pub border_on: bool,
    pub border_color: String,
    pub text: String,
    pub font: String,
    /// Font size with its unit, e.g. `16px`.
    pub font_size: String,
    pub neon: bool,
    pub neon_color: String,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            bg: DEFAULT_BG.to_string(),
            bg_alpha: DEFAULT_BG_ALPHA.to_string(),
            border_on: true,
            border_color: DEFAULT_BORDER_COLOR.to_string(),
            text: DEFAULT_TEXT.to_string(),
            font: DEFAULT_FONT.to_string(),
            font_size: format!("{DEFAULT_FONT_SIZE}px"),
            neon: false,
            neon_color: DEFAULT_NEON_COLOR.to_string(),
        }
    }
}

impl Theme {
    pub fn from_params(params: &Params) -> Self {
        Theme {
            bg: params.get_or("bg", DEFAULT_BG).to_string(),
            bg_alpha: params.get_or("bgAlpha", DEFAULT_BG_ALPHA).to_string(),
            border_on: params.get_or("border", "1") == "1",
            border_color: params.get_or("borderColor", DEFAULT_BORDER_COLOR).to_string(),
            text: params.get_or("text", DEFAULT_TEXT).to_string(),
            font: params.get_or("font", DEFAULT_FONT).to_string(),
            font_size: format!("{}px", params.get_or("fontSize", DEFAULT_FONT_SIZE)),
            neon: params.get_or("neon", "0") == "1",
            neon_color: params.get_or("neonColor", DEFAULT_NEON_COLOR).to_string(),
        }
    }

    /// Named style variables, in application order.
    pub fn style_variables(&self) -> Vec<(&'static str, String)> {
        vec![
            ("--card-bg", self.bg.clone()),
            ("--card-bg-alpha", self.bg_alpha.clone()),
            ("--card-border", self.border_color.clone()),
            ("--card-has-border", if self.border_on { "1" } else { "0" }.to_string()),
            ("--card-text", self.text.clone()),
            ("--card-font", self.font.clone()),
            ("--card-font-size", self.font_size.clone()),
            ("--neon-color", self.neon_color.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let theme = Theme::from_params(&Params::default());
        assert_eq!(theme, Theme::default());
        assert_eq!(theme.font_size, "16px");
        assert!(theme.border_on);
        assert!(!theme.neon);
    }

    #[test]
    fn test_reads_every_option() {
        let params = Params::parse(
            "bg=%23202020&bgAlpha=0.5&border=0&borderColor=red&text=%23eee&font=Mono&fontSize=20&neon=1&neonColor=%23f0f",
        )
        .unwrap();
        let theme = Theme::from_params(&params);
        assert_eq!(theme.bg, "#202020");
        assert_eq!(theme.bg_alpha, "0.5");
        assert!(!theme.border_on);
        assert_eq!(theme.border_color, "red");
        assert_eq!(theme.text, "#eee");
        assert_eq!(theme.font, "Mono");
        assert_eq!(theme.font_size, "20px");
        assert!(theme.neon);
        assert_eq!(theme.neon_color, "#f0f");
    }

    #[test]
    fn test_flags_are_true_only_for_one() {
        let theme = Theme::from_params(&Params::parse("border=true&neon=yes").unwrap());
        assert!(!theme.border_on);
        assert!(!theme.neon);
    }

    #[test]
    fn test_malformed_values_pass_through() {
        let theme = Theme::from_params(&Params::parse("bg=notacolor&fontSize=huge&bgAlpha=abc").unwrap());
        assert_eq!(theme.bg, "notacolor");
        assert_eq!(theme.font_size, "hugepx");
        assert_eq!(theme.bg_alpha, "abc");
        assert!(theme.style_variables().contains(&("--card-bg-alpha", "abc".to_string())));
    }

    #[test]
    fn test_style_variables() {
        let vars = Theme::default().style_variables();
        let names: Vec<_> = vars.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            [
                "--card-bg",
                "--card-bg-alpha",
                "--card-border",
                "--card-has-border",
                "--card-text",
                "--card-font",
                "--card-font-size",
                "--neon-color"
            ]
        );
        assert!(vars.contains(&("--card-has-border", "1".to_string())));
        assert!(vars.contains(&("--card-bg-alpha", "0.7".to_string())));
        assert!(vars.contains(&("--card-font-size", "16px".to_string())));
    }
}
