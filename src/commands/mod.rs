//! Command implementations for notesmith

pub mod compare;
pub mod config;
pub mod dispatch;
pub mod related;

use notesmith_core::error::{NoteSmithError, Result};
use notesmith_core::note::Note;

/// Borrow a note from a loaded corpus by id
pub(crate) fn find_in<'a>(notes: &'a [Note], id: &str) -> Result<&'a Note> {
    notes
        .iter()
        .find(|note| note.id == id)
        .ok_or_else(|| NoteSmithError::NoteNotFound { id: id.to_string() })
}
