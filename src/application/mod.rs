//! Application layer managing wizard sessions and UI state.
//!
//! This module coordinates between the domain layer and presentation layer:
//! the generic wizard engine drives a single form, and the [`App`] wraps it
//! with focus, input buffers and the background submission.

pub mod state;
pub mod wizard;

pub use state::*;
pub use wizard::*;
