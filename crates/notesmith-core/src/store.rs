//! Read-only corpus loading
//!
//! The ranking code never writes notes. It only needs a point-in-time
//! snapshot of the corpus, in a stable order.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{NoteSmithError, Result};
use crate::note::Note;

/// Anything that can produce the current corpus
pub trait NoteSource {
    /// Snapshot of every note, in a stable order
    fn load_notes(&self) -> Result<Vec<Note>>;

    /// Find a single note by id
    fn find_note(&self, id: &str) -> Result<Note> {
        self.load_notes()?
            .into_iter()
            .find(|note| note.id == id)
            .ok_or_else(|| NoteSmithError::NoteNotFound { id: id.to_string() })
    }
}

/// A JSON file can hold one note or an array of notes
#[derive(Deserialize)]
#[serde(untagged)]
enum NoteFile {
    Many(Vec<Note>),
    One(Box<Note>),
}

impl NoteFile {
    fn into_notes(self) -> Vec<Note> {
        match self {
            NoteFile::Many(notes) => notes,
            NoteFile::One(note) => vec![*note],
        }
    }
}

/// Notes stored as JSON on disk
///
/// `path` is either a single `.json` file or a directory whose `*.json`
/// files are read recursively in file-name order.
#[derive(Debug, Clone)]
pub struct JsonNoteStore {
    path: PathBuf,
}

impl JsonNoteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonNoteStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(path: &Path) -> Result<Vec<Note>> {
        let content = fs::read_to_string(path)?;
        let parsed: NoteFile = serde_json::from_str(&content)
            .map_err(|e| NoteSmithError::invalid_corpus(path, e))?;
        Ok(parsed.into_notes())
    }

    fn read_dir(dir: &Path) -> Result<Vec<Note>> {
        let mut notes = Vec::new();

        for entry in WalkDir::new(dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !entry.file_type().is_file() || !path.extension().is_some_and(|e| e == "json") {
                continue;
            }

            match Self::read_file(path) {
                Ok(mut loaded) => notes.append(&mut loaded),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to parse note file");
                }
            }
        }

        Ok(notes)
    }
}

impl NoteSource for JsonNoteStore {
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    fn load_notes(&self) -> Result<Vec<Note>> {
        if !self.path.exists() {
            return Err(NoteSmithError::CorpusNotFound {
                path: self.path.clone(),
            });
        }

        let notes = if self.path.is_dir() {
            Self::read_dir(&self.path)?
        } else {
            Self::read_file(&self.path)?
        };

        let notes = dedup_by_id(notes);
        debug!(count = notes.len(), "loaded corpus");
        Ok(notes)
    }
}

/// Keep the first note for each id
fn dedup_by_id(notes: Vec<Note>) -> Vec<Note> {
    let mut seen = HashSet::new();
    notes
        .into_iter()
        .filter(|note| {
            let fresh = seen.insert(note.id.clone());
            if !fresh {
                warn!(id = %note.id, "duplicate note id, keeping the first");
            }
            fresh
        })
        .collect()
}
