//! Injectable color themes.
//!
//! Layout and styling belong to the front end; the view-model only decides
//! which palette slot each series uses, so one core serves every skin.

use serde::{Deserialize, Serialize};

/// Light or dark rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

/// Semantic color slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Primary,
    Success,
    Danger,
    Warning,
    Purple,
    Indigo,
    Slate,
}

/// Hex colors for each slot plus chart chrome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub primary: &'static str,
    pub success: &'static str,
    pub danger: &'static str,
    pub warning: &'static str,
    pub purple: &'static str,
    pub indigo: &'static str,
    pub slate: &'static str,
    pub grid: &'static str,
    pub text: &'static str,
}

impl Palette {
    pub fn for_mode(mode: ThemeMode) -> Self {
        let dark = mode == ThemeMode::Dark;
        Self {
            primary: "#2563EB",
            success: "#10B981",
            danger: "#EF4444",
            warning: "#F59E0B",
            purple: "#8B5CF6",
            indigo: "#4F46E5",
            slate: if dark { "#64748B" } else { "#94A3B8" },
            grid: if dark { "#1E293B" } else { "#F1F5F9" },
            text: if dark { "#94A3B8" } else { "#64748B" },
        }
    }

    pub fn color(&self, tone: Tone) -> &'static str {
        match tone {
            Tone::Primary => self.primary,
            Tone::Success => self.success,
            Tone::Danger => self.danger,
            Tone::Warning => self.warning,
            Tone::Purple => self.purple,
            Tone::Indigo => self.indigo,
            Tone::Slate => self.slate,
        }
    }
}

/// Active theme.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub mode: ThemeMode,
    pub palette: Palette,
}

impl Theme {
    pub fn new(mode: ThemeMode) -> Self {
        Self {
            mode,
            palette: Palette::for_mode(mode),
        }
    }

    /// Flip between light and dark.
    pub fn toggled(&self) -> Self {
        Self::new(match self.mode {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        })
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(ThemeMode::default())
    }
}
