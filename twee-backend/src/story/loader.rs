//! Batch loading of story folders
//!
//! All files are read concurrently and the whole batch fails if any
//! single read does. Link resolution runs exactly once, after every file
//! has been parsed, so references resolve across file boundaries.

use std::path::{Path, PathBuf};

use futures_util::future::try_join_all;

use crate::error::StoryError;
use crate::file_ops;
use crate::story::links;
use crate::story::parser;
use crate::story::types::Story;

/// Read and parse every path into one story, in input order
pub async fn load_story_files(paths: &[PathBuf]) -> Result<Story, StoryError> {
    let contents = try_join_all(paths.iter().map(|path| file_ops::read_file(path))).await?;

    let mut story = Story::new();
    for (path, text) in paths.iter().zip(&contents) {
        parser::parse_story_file(&mut story, path.clone(), text);
    }
    links::resolve_links(&mut story);
    Ok(story)
}

/// Load every story file under a folder
pub async fn load_story_dir(folder: &Path) -> Result<Story, StoryError> {
    let files = file_ops::list_story_files(folder)?;
    load_story_files(&files).await
}
