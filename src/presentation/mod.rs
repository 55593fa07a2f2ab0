//! Presentation layer handling terminal UI and user input.
//!
//! This module manages the terminal user interface using ratatui,
//! handles keyboard input, and turns accessibility preferences into the
//! colors the wizard is drawn with.

pub mod input;
pub mod theme;
pub mod ui;

pub use input::*;
pub use theme::*;
pub use ui::*;
