//! Infrastructure layer providing external service integrations.
//!
//! This module contains the HTTP gateway to the forms API, settings and
//! document file access, CSV export and the system clipboard.

pub mod clipboard;
pub mod export;
pub mod gateway;
pub mod persistence;

pub use clipboard::*;
pub use export::*;
pub use gateway::*;
pub use persistence::*;
