//! NoteSmith Core Library
//!
//! Finds the notes most related to a target note and explains why. Local
//! ranking combines eight text signals; an optional external scorer can
//! re-rank the local answer but is never required.

pub mod config;
pub mod error;
pub mod format;
pub mod hybrid;
pub mod logging;
pub mod note;
pub mod semantic;
pub mod similarity;
pub mod store;
pub mod text;
