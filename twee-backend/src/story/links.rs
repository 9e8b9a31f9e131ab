//! Passage link graph
//!
//! Bodies reference other passages with `[[link]]`, `[[text|link]]`,
//! `[[link][setter]]`, or `[[text|link][setter]]`. The scan keeps only
//! the target name; resolution then joins names to passages across every
//! file of the story.

use std::collections::HashSet;

use crate::story::types::{PassageId, Story};

/// Target names referenced by a body, in scan order, duplicates kept.
///
/// A candidate starts at `[[` and must be closed by `]]` somewhere later.
/// The name is cut at the first `]` and, when a label is present, only
/// the part after the last `|` counts. Unmatched names are not an error;
/// they simply resolve to nothing.
pub fn scan_text_links(content: &str) -> Vec<String> {
    content
        .split("[[")
        .skip(1)
        .filter(|part| part.contains("]]"))
        .map(|part| {
            let target = part.split(']').next().unwrap_or(part);
            let target = target.rsplit('|').next().unwrap_or(target);
            target.trim().to_string()
        })
        .collect()
}

/// Rebuild `text_links`, `links_to` and `linked_from` for every passage.
///
/// One pass over the complete cross-file arena: each target name resolves
/// to every passage carrying that title. `links_to` is ordered by first
/// appearance in the body, then by arena order within a shared title, one
/// entry per target. Each resolved edge appends the source to the
/// target's `linked_from`. Must run after all files are parsed.
pub fn resolve_links(story: &mut Story) {
    for passage in &mut story.passages {
        passage.text_links = scan_text_links(&passage.content);
        passage.links_to.clear();
        passage.linked_from.clear();
    }

    for source in 0..story.passages.len() {
        let text_links = story.passages[source].text_links.clone();
        let mut seen = HashSet::new();
        let mut targets = Vec::new();
        for name in &text_links {
            for target in story.passages_titled(name) {
                if seen.insert(target) {
                    targets.push(target);
                }
            }
        }

        for &target in &targets {
            story.passages[target.0].linked_from.push(PassageId(source));
        }
        story.passages[source].links_to = targets;
    }
}
