//! Core story data model
//!
//! The story owns flat arenas of files and passages; everything else
//! cross-references them through index newtypes. Links are recomputed as
//! a derived pass over the whole arena, never patched incrementally.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Index of a passage in [`Story::passages`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PassageId(pub usize);

/// Index of a file in [`Story::files`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub usize);

/// Canvas position of a passage in the editor
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Canvas footprint of a passage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Default for Size {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 100.0,
        }
    }
}

/// Key-order-preserving passage metadata mapping
pub type MetaMap = serde_json::Map<String, Value>;

/// One named unit of story text
#[derive(Debug, Clone, Serialize)]
pub struct Passage {
    /// Exact text of the title line as last written to disk, `::` marker
    /// included. This is the literal anchor for in-place saves.
    pub title_line: String,
    /// Display name and link-resolution key
    pub title: String,
    pub tags: Vec<String>,
    /// Full metadata mapping; `position` and `size` are mirrored below
    pub meta: MetaMap,
    pub position: Position,
    pub size: Size,
    /// Raw body text, one trailing newline per source line
    pub content: String,
    /// Link targets as scanned from the body, duplicates kept
    pub text_links: Vec<String>,
    /// Resolved outgoing links; valid after link resolution has run
    pub links_to: Vec<PassageId>,
    /// Resolved incoming links
    pub linked_from: Vec<PassageId>,
    /// Owning file
    pub file: FileId,
}

/// One story file and the passages parsed from it, in file order
#[derive(Debug, Clone, Serialize)]
pub struct StoryFile {
    pub name: String,
    pub path: PathBuf,
    pub passages: Vec<PassageId>,
}

/// A loaded story: every file and every passage, cross-referenced by id
#[derive(Debug, Clone, Default, Serialize)]
pub struct Story {
    pub files: Vec<StoryFile>,
    pub passages: Vec<Passage>,
}

impl Story {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(&self, id: FileId) -> &StoryFile {
        &self.files[id.0]
    }

    pub fn passage(&self, id: PassageId) -> &Passage {
        &self.passages[id.0]
    }

    pub fn passage_mut(&mut self, id: PassageId) -> &mut Passage {
        &mut self.passages[id.0]
    }

    /// Ids of every passage whose title matches, in arena order
    pub fn passages_titled(&self, title: &str) -> Vec<PassageId> {
        self.passages
            .iter()
            .enumerate()
            .filter(|(_, passage)| passage.title == title)
            .map(|(idx, _)| PassageId(idx))
            .collect()
    }
}
