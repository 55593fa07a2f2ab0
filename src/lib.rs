//! bilimforms - BilimCert application forms in the terminal
//!
//! A multi-step form wizard for the partnership, recognition and
//! accreditation applications, with per-step validation, submission to the
//! forms API and persisted accessibility preferences.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;
pub mod presentation;

pub use application::*;
pub use domain::*;
