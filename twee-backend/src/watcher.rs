//! Story folder watching
//!
//! Wraps a recursive notify watcher into a stream of file-level events.
//! Raw notifications are coalesced per path over a quiet window so an
//! editor save (truncate, write burst, atomic rename) arrives as a single
//! event.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::event::{CreateKind, ModifyKind, RemoveKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::config;
use crate::error::StoryError;
use crate::file_ops;

/// What happened to a story file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatchEventKind {
    Added,
    Removed,
    Changed,
}

/// One coalesced, file-level change notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchEvent {
    pub kind: WatchEventKind,
    pub path: PathBuf,
}

/// Watches a story folder recursively for changes to story files.
///
/// Only file-level events surface: directory events, excluded paths and
/// non-story extensions are dropped, and renames arrive as a remove of
/// the old path plus an add of the new one. Dropping the handle stops the
/// watch and ends the stream.
pub struct FolderWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::UnboundedReceiver<WatchEvent>,
}

impl FolderWatcher {
    /// Watch `folder` with the configured quiet window
    pub fn new(folder: &Path) -> Result<Self, StoryError> {
        Self::with_debounce(folder, config::watch_debounce())
    }

    /// Watch `folder`, coalescing raw events per path over `debounce`
    pub fn with_debounce(folder: &Path, debounce: Duration) -> Result<Self, StoryError> {
        let root = folder.to_path_buf();
        let (raw_tx, raw_rx) = mpsc::unbounded_channel();

        let event_root = root.clone();
        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| match result {
                Ok(event) => {
                    for file_event in map_event(&event_root, &event) {
                        let _ = raw_tx.send(file_event);
                    }
                }
                Err(e) => log::warn!("Story folder watcher error: {}", e),
            },
            notify::Config::default(),
        )
        .map_err(|source| StoryError::Watch {
            path: root.clone(),
            source,
        })?;

        watcher
            .watch(&root, RecursiveMode::Recursive)
            .map_err(|source| StoryError::Watch {
                path: root.clone(),
                source,
            })?;

        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(debounce_loop(raw_rx, tx, debounce));

        Ok(Self {
            _watcher: watcher,
            rx,
        })
    }

    /// Next coalesced event; `None` once the watcher has shut down
    pub async fn next_event(&mut self) -> Option<WatchEvent> {
        self.rx.recv().await
    }
}

/// Translate one raw notify event into file-level story events
fn map_event(root: &Path, event: &Event) -> Vec<WatchEvent> {
    let mut out = Vec::new();
    match &event.kind {
        EventKind::Create(kind) => {
            if !matches!(kind, CreateKind::Folder) {
                for path in &event.paths {
                    push_event(root, &mut out, WatchEventKind::Added, path);
                }
            }
        }
        EventKind::Remove(kind) => {
            if !matches!(kind, RemoveKind::Folder) {
                for path in &event.paths {
                    push_event(root, &mut out, WatchEventKind::Removed, path);
                }
            }
        }
        EventKind::Modify(ModifyKind::Name(mode)) => match mode {
            RenameMode::Both if event.paths.len() == 2 => {
                push_event(root, &mut out, WatchEventKind::Removed, &event.paths[0]);
                push_event(root, &mut out, WatchEventKind::Added, &event.paths[1]);
            }
            _ => {
                for path in &event.paths {
                    let kind = if path.exists() {
                        WatchEventKind::Added
                    } else {
                        WatchEventKind::Removed
                    };
                    push_event(root, &mut out, kind, path);
                }
            }
        },
        EventKind::Modify(ModifyKind::Metadata(_)) | EventKind::Access(_) => {}
        EventKind::Modify(_) => {
            for path in &event.paths {
                if path.is_dir() {
                    continue;
                }
                push_event(root, &mut out, WatchEventKind::Changed, path);
            }
        }
        EventKind::Any | EventKind::Other => {}
    }
    out
}

fn push_event(root: &Path, out: &mut Vec<WatchEvent>, kind: WatchEventKind, path: &Path) {
    let relative = path.strip_prefix(root).unwrap_or(path);
    if file_ops::is_excluded(relative) || !file_ops::has_story_extension(path) {
        return;
    }
    out.push(WatchEvent {
        kind,
        path: path.to_path_buf(),
    });
}

async fn debounce_loop(
    mut raw: mpsc::UnboundedReceiver<WatchEvent>,
    out: mpsc::UnboundedSender<WatchEvent>,
    window: Duration,
) {
    let mut pending: Vec<WatchEvent> = Vec::new();
    loop {
        if pending.is_empty() {
            match raw.recv().await {
                Some(event) => coalesce(&mut pending, event),
                None => break,
            }
        } else {
            match tokio::time::timeout(window, raw.recv()).await {
                Ok(Some(event)) => coalesce(&mut pending, event),
                Ok(None) => break,
                Err(_) => {
                    for event in pending.drain(..) {
                        if out.send(event).is_err() {
                            return;
                        }
                    }
                }
            }
        }
    }
    for event in pending.drain(..) {
        let _ = out.send(event);
    }
}

// Latest kind wins per path; the first-seen order is kept for the flush.
fn coalesce(pending: &mut Vec<WatchEvent>, event: WatchEvent) {
    if let Some(existing) = pending.iter_mut().find(|e| e.path == event.path) {
        existing.kind = event.kind;
    } else {
        pending.push(event);
    }
}
