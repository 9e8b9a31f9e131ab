//! Backend for Twee-style story folders
//!
//! Parses passage files into an in-memory story graph, resolves
//! `[[link]]` references across files, saves passage edits back in place
//! and watches the folder for outside changes. The editing surface on top
//! is someone else's concern; this crate owns the format and the graph.

pub mod config;
pub mod error;
pub mod file_ops;
pub mod story;
pub mod watcher;

pub use error::StoryError;
pub use story::{
    FileId, MetaMap, Passage, PassageId, Position, Size, Story, StoryFile, load_story_dir,
    load_story_files, parse_story_file, resolve_links, save_passages,
};
pub use watcher::{FolderWatcher, WatchEvent, WatchEventKind};
