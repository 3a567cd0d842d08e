use std::fs;
use std::path::PathBuf;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};

pub const DEFAULT_THEME: &str = "catppuccin-mocha";

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    #[serde(default)]
    pub colors: ThemeColors,
}

/// Declares the palette once: the serialized hex fields, their fallbacks,
/// and a `Color` accessor per field.
macro_rules! palette {
    ($($field:ident = $hex:literal),* $(,)?) => {
        #[derive(Clone, Debug, Serialize, Deserialize)]
        #[serde(default)]
        pub struct ThemeColors {
            $(pub $field: String,)*
        }

        impl Default for ThemeColors {
            fn default() -> Self {
                Self {
                    $($field: $hex.to_string(),)*
                }
            }
        }

        impl ThemeColors {
            $(
                pub fn $field(&self) -> Color {
                    parse_color(&self.$field)
                }
            )*
        }
    };
}

palette! {
    bg = "#1e1e2e",
    fg = "#cdd6f4",
    text_correct = "#a6e3a1",
    text_incorrect = "#f38ba8",
    text_pending = "#585b70",
    code_fg = "#f9e2af",
    accent = "#89b4fa",
    accent_dim = "#45475a",
    border = "#45475a",
    border_focused = "#89b4fa",
    header_bg = "#313244",
    header_fg = "#cdd6f4",
    bar_filled = "#89b4fa",
    bar_empty = "#313244",
    xp = "#f9e2af",
    streak = "#fab387",
}

/// `#rrggbb` to an RGB color. Anything else renders as the terminal default.
pub fn parse_color(hex: &str) -> Color {
    let Some(digits) = hex.strip_prefix('#').filter(|d| d.len() == 6) else {
        return Color::Reset;
    };
    match u32::from_str_radix(digits, 16) {
        Ok(rgb) => Color::from_u32(rgb),
        Err(_) => Color::Reset,
    }
}

impl Theme {
    /// Look up a theme by name. A file in the user's theme directory wins
    /// over the bundled theme of the same name.
    pub fn load(name: &str) -> Option<Self> {
        if let Some(path) = user_theme_path(name)
            && let Ok(content) = fs::read_to_string(&path)
        {
            match toml::from_str::<Theme>(&content) {
                Ok(theme) => return Some(theme),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "ignoring broken user theme");
                }
            }
        }

        let file = ThemeAssets::get(&format!("{name}.toml"))?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        toml::from_str::<Theme>(content).ok()
    }

    pub fn available_themes() -> Vec<String> {
        let mut names: Vec<String> = ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(str::to_string))
            .collect();
        names.sort();
        names
    }
}

fn user_theme_path(name: &str) -> Option<PathBuf> {
    Some(
        dirs::config_dir()?
            .join("algolingo")
            .join("themes")
            .join(format!("{name}.toml")),
    )
}

impl Default for Theme {
    fn default() -> Self {
        Self::load(DEFAULT_THEME).unwrap_or_else(|| Self {
            name: "fallback".to_string(),
            colors: ThemeColors::default(),
        })
    }
}
