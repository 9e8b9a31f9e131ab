//! Passage file parser
//!
//! A line whose first two characters are `::` opens a new passage; every
//! line up to the next marker is its body. Text before the first marker
//! is discarded. The raw title line is kept verbatim on the passage, it
//! anchors the in-place save later.

use std::path::PathBuf;

use crate::story::meta;
use crate::story::title_line;
use crate::story::types::{FileId, Passage, PassageId, Story, StoryFile};

/// Lines starting with this marker open a new passage
pub const PASSAGE_MARKER: &str = "::";

/// Parse one file's text into passages appended to the story arena.
/// Returns the id of the new file record.
///
/// The text is split on `'\n'` alone, so carriage returns stay in the
/// raw lines and a newline-terminated file contributes a final empty
/// body line, exactly as persisted files round-trip through the editor.
pub fn parse_story_file(story: &mut Story, path: PathBuf, text: &str) -> FileId {
    let file_id = FileId(story.files.len());
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    story.files.push(StoryFile {
        name,
        path,
        passages: Vec::new(),
    });

    let mut current: Option<PassageId> = None;
    for line in text.split('\n') {
        if line.starts_with(PASSAGE_MARKER) {
            let id = PassageId(story.passages.len());
            story.passages.push(parse_passage_title(line, file_id));
            story.files[file_id.0].passages.push(id);
            current = Some(id);
        } else if let Some(id) = current {
            let content = &mut story.passages[id.0].content;
            content.push_str(line);
            content.push('\n');
        }
    }

    file_id
}

/// Build a passage from its raw title line (marker included)
fn parse_passage_title(line: &str, file: FileId) -> Passage {
    let parts = title_line::split_title_line(&line[PASSAGE_MARKER.len()..]);
    let tags = parts.tags_part.split(' ').map(str::to_string).collect();
    let meta = meta::decode_meta(&parts.meta_part);

    Passage {
        title_line: line.to_string(),
        title: parts.title,
        tags,
        position: meta::meta_position(&meta),
        size: meta::meta_size(&meta),
        meta,
        content: String::new(),
        text_links: Vec::new(),
        links_to: Vec::new(),
        linked_from: Vec::new(),
        file,
    }
}
