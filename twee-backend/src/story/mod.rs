//! Story model and the passage file format
//!
//! Passages live in plain text files: a `::` title line carrying a name,
//! optional `[tags]` and a JSON metadata blob, followed by free body text
//! with `[[link]]` references. Parsing builds the arena in `types`,
//! `links` derives the cross-file graph, and `serializer` writes edits
//! back without disturbing the rest of the file.

pub mod links;
pub mod loader;
pub mod meta;
pub mod parser;
pub mod serializer;
pub mod title_line;
pub mod types;

pub use links::{resolve_links, scan_text_links};
pub use loader::{load_story_dir, load_story_files};
pub use parser::{PASSAGE_MARKER, parse_story_file};
pub use serializer::{build_title_line, save_passages};
pub use title_line::{TitleParts, split_title_line};
pub use types::{FileId, MetaMap, Passage, PassageId, Position, Size, Story, StoryFile};
