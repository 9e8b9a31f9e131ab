//! In-place passage saving
//!
//! A passage is persisted by splicing a freshly built title line over the
//! previously recorded one inside the file's current text. Bodies and
//! every other byte of the file stay untouched, so unrelated edits made
//! outside the editor survive a save.

use std::collections::HashSet;

use crate::error::StoryError;
use crate::file_ops;
use crate::story::meta;
use crate::story::types::{Passage, PassageId, Story};

/// Rebuild the on-disk title line for a passage, stamping its current
/// position and size into the metadata blob. A non-empty tag list
/// serializes as ` [tags]`; the quirk-produced single empty tag counts as
/// non-empty and yields ` []`.
pub fn build_title_line(passage: &mut Passage) -> Result<String, StoryError> {
    let meta_blob = meta::encode_meta(&mut passage.meta, passage.position, passage.size)?;
    let tags = if passage.tags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", passage.tags.join(" "))
    };
    Ok(format!(":: {}{} {}", passage.title, tags, meta_blob))
}

/// Persist the given passages, one write per touched file.
///
/// Files are visited in first-appearance order of `ids`; within a file
/// the selected passages are processed in original parse order. Each
/// passage's recorded title line is replaced at its first literal
/// occurrence in the file text, then the record is updated to the new
/// line, so an unchanged passage saves idempotently. A title line that
/// no longer occurs aborts that file before anything is written and
/// surfaces as [`StoryError::StaleAnchor`]; files earlier in the batch
/// are already on disk at that point.
///
/// Passages sharing one recorded title line all anchor to its earliest
/// occurrence, so batch-saving such duplicates stacks their rewrites onto
/// that first line; every ambiguous replacement logs a warning.
pub async fn save_passages(story: &mut Story, ids: &[PassageId]) -> Result<(), StoryError> {
    let selected: HashSet<PassageId> = ids.iter().copied().collect();
    let mut file_order = Vec::new();
    for &id in ids {
        let file = story.passages[id.0].file;
        if !file_order.contains(&file) {
            file_order.push(file);
        }
    }

    for file_id in file_order {
        let path = story.files[file_id.0].path.clone();
        let mut content = file_ops::read_file(&path).await?;

        let in_parse_order: Vec<PassageId> = story.files[file_id.0]
            .passages
            .iter()
            .copied()
            .filter(|id| selected.contains(id))
            .collect();
        for id in in_parse_order {
            let passage = &mut story.passages[id.0];

            let new_line = build_title_line(passage)?;
            if !content.contains(&passage.title_line) {
                return Err(StoryError::StaleAnchor {
                    title: passage.title.clone(),
                    path,
                });
            }
            if content.matches(&passage.title_line).count() > 1 {
                log::warn!(
                    "Title line of {:?} occurs more than once in {:?}, replacing the first",
                    passage.title,
                    path
                );
            }
            content = content.replacen(&passage.title_line, &new_line, 1);
            passage.title_line = new_line;
        }

        file_ops::write_file(&path, &content).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::story::loader::load_story_files;
    use crate::story::types::Position;
    use std::fs;
    use tempfile::tempdir;

    async fn load_single(path: &std::path::Path) -> Story {
        load_story_files(&[path.to_path_buf()])
            .await
            .expect("Failed to load story file")
    }

    fn all_ids(story: &Story) -> Vec<PassageId> {
        (0..story.passages.len()).map(PassageId).collect()
    }

    #[tokio::test]
    async fn test_canonical_file_round_trips_byte_identical() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("story.tw");
        let original = ":: Start [] {\"position\":\"10,20\",\"size\":\"100,150\"}\n\
                        Go on to [[End]].\n\
                        :: End [] {\"position\":\"30,40\",\"size\":\"100,100\"}\n\
                        fin\n";
        fs::write(&path, original).expect("Failed to write story file");

        let mut story = load_single(&path).await;
        let ids = all_ids(&story);
        save_passages(&mut story, &ids)
            .await
            .expect("Failed to save passages");

        let saved = fs::read_to_string(&path).expect("Failed to read saved file");
        assert_eq!(saved, original);
    }

    #[tokio::test]
    async fn test_save_normalizes_once_then_stays_stable() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("story.tw");
        fs::write(&path, ":: Foo {\"position\":\"10.4,20\"}\nbody\n")
            .expect("Failed to write story file");

        let mut story = load_single(&path).await;
        save_passages(&mut story, &[PassageId(0)])
            .await
            .expect("Failed to save passage");

        let first = fs::read_to_string(&path).expect("Failed to read saved file");
        assert_eq!(
            first,
            ":: Foo [] {\"position\":\"10,20\",\"size\":\"100,100\"}\nbody\n"
        );
        assert_eq!(
            story.passages[0].title_line,
            ":: Foo [] {\"position\":\"10,20\",\"size\":\"100,100\"}"
        );

        save_passages(&mut story, &[PassageId(0)])
            .await
            .expect("Failed to save passage again");
        let second = fs::read_to_string(&path).expect("Failed to read saved file");
        assert_eq!(second, first);
    }

    #[tokio::test]
    async fn test_moved_passage_rewrites_only_its_title_line() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("story.tw");
        fs::write(
            &path,
            ":: A [] {\"position\":\"0,0\",\"size\":\"100,100\"}\n\
             body stays [[B]]\n\
             :: B [] {\"position\":\"5,5\",\"size\":\"100,100\"}\n\
             also stays\n",
        )
        .expect("Failed to write story file");

        let mut story = load_single(&path).await;
        story.passage_mut(PassageId(0)).position = Position { x: 120.0, y: 40.2 };
        save_passages(&mut story, &[PassageId(0)])
            .await
            .expect("Failed to save passage");

        let saved = fs::read_to_string(&path).expect("Failed to read saved file");
        assert_eq!(
            saved,
            ":: A [] {\"position\":\"120,40\",\"size\":\"100,100\"}\n\
             body stays [[B]]\n\
             :: B [] {\"position\":\"5,5\",\"size\":\"100,100\"}\n\
             also stays\n"
        );
    }

    #[tokio::test]
    async fn test_extension_meta_keys_survive_in_order() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("story.tw");
        fs::write(
            &path,
            ":: A [] {\"custom\":\"x\",\"position\":\"1,2\",\"size\":\"100,100\"}\n",
        )
        .expect("Failed to write story file");

        let mut story = load_single(&path).await;
        story.passage_mut(PassageId(0)).position = Position { x: 3.0, y: 4.0 };
        save_passages(&mut story, &[PassageId(0)])
            .await
            .expect("Failed to save passage");

        let saved = fs::read_to_string(&path).expect("Failed to read saved file");
        assert_eq!(
            saved,
            ":: A [] {\"custom\":\"x\",\"position\":\"3,4\",\"size\":\"100,100\"}\n"
        );
    }

    #[tokio::test]
    async fn test_stale_anchor_fails_without_writing() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("story.tw");
        fs::write(&path, ":: A\nbody\n").expect("Failed to write story file");

        let mut story = load_single(&path).await;
        let outside_edit = ":: Renamed Elsewhere\nbody\n";
        fs::write(&path, outside_edit).expect("Failed to rewrite story file");

        let result = save_passages(&mut story, &[PassageId(0)]).await;
        assert!(matches!(result, Err(StoryError::StaleAnchor { .. })));
        let on_disk = fs::read_to_string(&path).expect("Failed to read file");
        assert_eq!(on_disk, outside_edit);
    }

    #[tokio::test]
    async fn test_one_call_writes_every_touched_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path_a = dir.path().join("a.tw");
        let path_b = dir.path().join("b.tw");
        fs::write(&path_a, ":: A\n.\n").expect("Failed to write story file");
        fs::write(&path_b, ":: B\n.\n").expect("Failed to write story file");

        let mut story = load_story_files(&[path_a.clone(), path_b.clone()])
            .await
            .expect("Failed to load story files");
        story.passage_mut(PassageId(0)).position = Position { x: 1.0, y: 1.0 };
        story.passage_mut(PassageId(1)).position = Position { x: 2.0, y: 2.0 };
        let ids = all_ids(&story);
        save_passages(&mut story, &ids)
            .await
            .expect("Failed to save passages");

        let a = fs::read_to_string(&path_a).expect("Failed to read file");
        let b = fs::read_to_string(&path_b).expect("Failed to read file");
        assert_eq!(a, ":: A [] {\"position\":\"1,1\",\"size\":\"100,100\"}\n.\n");
        assert_eq!(b, ":: B [] {\"position\":\"2,2\",\"size\":\"100,100\"}\n.\n");
    }

    #[tokio::test]
    async fn test_duplicate_title_lines_replace_first_occurrence() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("story.tw");
        fs::write(&path, ":: Twin\nfirst\n:: Twin\nsecond\n")
            .expect("Failed to write story file");

        let mut story = load_single(&path).await;
        story.passage_mut(PassageId(0)).position = Position { x: 9.0, y: 9.0 };
        save_passages(&mut story, &[PassageId(0)])
            .await
            .expect("Failed to save passage");

        let saved = fs::read_to_string(&path).expect("Failed to read saved file");
        assert_eq!(
            saved,
            ":: Twin [] {\"position\":\"9,9\",\"size\":\"100,100\"}\nfirst\n:: Twin\nsecond\n"
        );
    }

    #[tokio::test]
    async fn test_batch_saving_duplicate_titles_stacks_on_first_line() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("story.tw");
        fs::write(&path, ":: Twin\nfirst\n:: Twin\nsecond\n")
            .expect("Failed to write story file");

        let mut story = load_single(&path).await;
        story.passage_mut(PassageId(0)).position = Position { x: 1.0, y: 1.0 };
        story.passage_mut(PassageId(1)).position = Position { x: 2.0, y: 2.0 };
        let ids = all_ids(&story);
        save_passages(&mut story, &ids)
            .await
            .expect("Failed to save passages");

        let saved = fs::read_to_string(&path).expect("Failed to read saved file");
        assert_eq!(
            saved,
            ":: Twin [] {\"position\":\"2,2\",\"size\":\"100,100\"} \
             [] {\"position\":\"1,1\",\"size\":\"100,100\"}\nfirst\n:: Twin\nsecond\n"
        );
    }
}
