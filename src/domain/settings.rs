//! Accessibility preferences and the interfaces that persist and apply them.

use std::fmt;

use super::errors::DomainResult;

pub const KEY_HIGH_CONTRAST: &str = "highContrastMode";
pub const KEY_FONT_SIZE: &str = "fontSize";
pub const KEY_MOTION_REDUCED: &str = "motionReduced";
pub const KEY_TEXT_SPACING: &str = "textSpacing";
pub const KEY_COLOR_BLIND_MODE: &str = "colorBlindMode";
pub const KEY_DARK_THEME: &str = "darkTheme";

pub const FONT_SIZE_DEFAULT: u8 = 16;
pub const FONT_SIZE_MIN: u8 = 12;
pub const FONT_SIZE_MAX: u8 = 24;
const FONT_SIZE_STEP: u8 = 2;

pub const TEXT_SPACING_DEFAULT: f32 = 1.0;
const TEXT_SPACING_MAX: f32 = 3.0;

/// String key/value persistence for preferences.
pub trait SettingsStore: fmt::Debug {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> DomainResult<()>;
}

/// Side effect run whenever settings change (theme switch, spacing, ...).
pub trait SettingsApplier {
    fn apply(&mut self, settings: &AccessibilitySettings);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorBlindMode {
    #[default]
    None,
    Protanopia,
    Deuteranopia,
    Tritanopia,
}

impl ColorBlindMode {
    pub const ALL: [ColorBlindMode; 4] = [
        ColorBlindMode::None,
        ColorBlindMode::Protanopia,
        ColorBlindMode::Deuteranopia,
        ColorBlindMode::Tritanopia,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorBlindMode::None => "none",
            ColorBlindMode::Protanopia => "protanopia",
            ColorBlindMode::Deuteranopia => "deuteranopia",
            ColorBlindMode::Tritanopia => "tritanopia",
        }
    }

    /// Unknown values fall back to `None`.
    pub fn parse(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == value)
            .unwrap_or_default()
    }

    pub fn next(&self) -> Self {
        let index = Self::ALL.iter().position(|m| m == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for ColorBlindMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccessibilitySettings {
    pub high_contrast: bool,
    pub font_size: u8,
    pub motion_reduced: bool,
    pub text_spacing: f32,
    pub color_blind_mode: ColorBlindMode,
    pub dark_theme: bool,
}

impl Default for AccessibilitySettings {
    fn default() -> Self {
        Self {
            high_contrast: false,
            font_size: FONT_SIZE_DEFAULT,
            motion_reduced: false,
            text_spacing: TEXT_SPACING_DEFAULT,
            color_blind_mode: ColorBlindMode::None,
            dark_theme: false,
        }
    }
}

impl AccessibilitySettings {
    /// Reads every key, falling back to defaults for missing or unparsable
    /// values. Booleans are only true for the exact string `"true"`.
    pub fn load(store: &dyn SettingsStore) -> Self {
        let flag = |key: &str| store.get(key).as_deref() == Some("true");
        let font_size = store
            .get(KEY_FONT_SIZE)
            .and_then(|v| v.trim().parse::<u8>().ok())
            .map(|size| size.clamp(FONT_SIZE_MIN, FONT_SIZE_MAX))
            .unwrap_or(FONT_SIZE_DEFAULT);
        let text_spacing = store
            .get(KEY_TEXT_SPACING)
            .and_then(|v| v.trim().parse::<f32>().ok())
            .filter(|v| v.is_finite())
            .map(clamp_spacing)
            .unwrap_or(TEXT_SPACING_DEFAULT);
        let color_blind_mode = store
            .get(KEY_COLOR_BLIND_MODE)
            .map(|v| ColorBlindMode::parse(&v))
            .unwrap_or_default();

        Self {
            high_contrast: flag(KEY_HIGH_CONTRAST),
            font_size,
            motion_reduced: flag(KEY_MOTION_REDUCED),
            text_spacing,
            color_blind_mode,
            dark_theme: flag(KEY_DARK_THEME),
        }
    }

    pub fn save(&self, store: &mut dyn SettingsStore) -> DomainResult<()> {
        store.set(KEY_HIGH_CONTRAST, &self.high_contrast.to_string())?;
        store.set(KEY_FONT_SIZE, &self.font_size.to_string())?;
        store.set(KEY_MOTION_REDUCED, &self.motion_reduced.to_string())?;
        store.set(KEY_TEXT_SPACING, &self.text_spacing.to_string())?;
        store.set(KEY_COLOR_BLIND_MODE, self.color_blind_mode.as_str())?;
        store.set(KEY_DARK_THEME, &self.dark_theme.to_string())?;
        Ok(())
    }

    pub fn toggle_high_contrast(&mut self) {
        self.high_contrast = !self.high_contrast;
    }

    pub fn increase_font_size(&mut self) {
        self.font_size = (self.font_size + FONT_SIZE_STEP).min(FONT_SIZE_MAX);
    }

    pub fn decrease_font_size(&mut self) {
        self.font_size = self.font_size.saturating_sub(FONT_SIZE_STEP).max(FONT_SIZE_MIN);
    }

    pub fn reset_font_size(&mut self) {
        self.font_size = FONT_SIZE_DEFAULT;
    }

    pub fn toggle_motion_reduced(&mut self) {
        self.motion_reduced = !self.motion_reduced;
    }

    pub fn set_text_spacing(&mut self, spacing: f32) {
        if spacing.is_finite() {
            self.text_spacing = clamp_spacing(spacing);
        }
    }

    pub fn set_color_blind_mode(&mut self, mode: ColorBlindMode) {
        self.color_blind_mode = mode;
    }

    pub fn toggle_dark_theme(&mut self) {
        self.dark_theme = !self.dark_theme;
    }
}

fn clamp_spacing(spacing: f32) -> f32 {
    spacing.clamp(TEXT_SPACING_DEFAULT, TEXT_SPACING_MAX)
}
