//! Terminal rendering of the accessibility preferences.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::{AccessibilitySettings, ColorBlindMode, SettingsApplier, FONT_SIZE_DEFAULT};

const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];
const MAX_FIELD_SPACING: u16 = 3;

/// Colors and layout tweaks the UI draws with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub foreground: Color,
    pub background: Color,
    pub accent: Color,
    pub muted: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub error: Color,
    pub success: Color,
    /// Blank lines between fields.
    pub field_spacing: u16,
    /// Bold labels stand in for a larger font.
    pub emphasize_labels: bool,
    pub animate: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            foreground: Color::Reset,
            background: Color::Reset,
            accent: Color::Cyan,
            muted: Color::DarkGray,
            highlight_fg: Color::Black,
            highlight_bg: Color::LightBlue,
            error: Color::Red,
            success: Color::Green,
            field_spacing: 0,
            emphasize_labels: false,
            animate: true,
        }
    }
}

impl Theme {
    pub fn from_settings(settings: &AccessibilitySettings) -> Self {
        let mut theme = Self::default();
        theme.apply(settings);
        theme
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.background)
    }

    pub fn highlight(&self) -> Style {
        Style::default().fg(self.highlight_fg).bg(self.highlight_bg)
    }

    pub fn label(&self) -> Style {
        let style = self.base();
        if self.emphasize_labels {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }

    pub fn error_style(&self) -> Style {
        self.base().fg(self.error)
    }

    pub fn success_style(&self) -> Style {
        self.base().fg(self.success)
    }

    pub fn muted_style(&self) -> Style {
        self.base().fg(self.muted)
    }

    pub fn accent_style(&self) -> Style {
        self.base().fg(self.accent)
    }

    /// Progress indicator for the in-flight submission.
    pub fn spinner(&self, tick: u64) -> &'static str {
        if self.animate {
            SPINNER_FRAMES[(tick % SPINNER_FRAMES.len() as u64) as usize]
        } else {
            "..."
        }
    }
}

impl SettingsApplier for Theme {
    fn apply(&mut self, settings: &AccessibilitySettings) {
        *self = Self::default();

        if settings.dark_theme {
            self.foreground = Color::Gray;
            self.background = Color::Black;
            self.muted = Color::DarkGray;
            self.highlight_fg = Color::White;
            self.highlight_bg = Color::Blue;
        }

        match settings.color_blind_mode {
            ColorBlindMode::None => {}
            ColorBlindMode::Protanopia | ColorBlindMode::Deuteranopia => {
                self.error = Color::Rgb(213, 94, 0);
                self.success = Color::Rgb(0, 114, 178);
            }
            ColorBlindMode::Tritanopia => {
                self.error = Color::Rgb(220, 50, 32);
                self.success = Color::Rgb(0, 158, 115);
                self.accent = Color::Magenta;
            }
        }

        // High contrast wins over the other palettes.
        if settings.high_contrast {
            self.foreground = Color::White;
            self.background = Color::Black;
            self.accent = Color::Yellow;
            self.muted = Color::White;
            self.highlight_fg = Color::Black;
            self.highlight_bg = Color::Yellow;
            if settings.color_blind_mode == ColorBlindMode::None {
                self.error = Color::LightRed;
                self.success = Color::LightGreen;
            }
        }

        let extra = ((settings.text_spacing - 1.0) * 2.0).round().max(0.0) as u16;
        self.field_spacing = extra.min(MAX_FIELD_SPACING);
        self.emphasize_labels = settings.font_size > FONT_SIZE_DEFAULT;
        self.animate = !settings.motion_reduced;
    }
}
