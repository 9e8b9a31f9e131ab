//! Headless driver for story folders: load, summarize, optionally keep
//! following file events. Stands in for the desktop editor shell.

use std::path::PathBuf;

use dotenv::dotenv;

use twee_backend::config;
use twee_backend::story::{Story, load_story_dir};
use twee_backend::watcher::FolderWatcher;

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let mut folder: Option<PathBuf> = None;
    let mut watch = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--watch" => watch = true,
            other => folder = Some(PathBuf::from(other)),
        }
    }
    let Some(folder) = folder.or_else(config::story_dir) else {
        log::error!(
            "Usage: twee-backend <story-folder> [--watch] (or set {})",
            config::env_vars::STORY_DIR
        );
        std::process::exit(2);
    };

    log::info!("twee-backend v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Story folder: {:?}", folder);

    let story = match load_story_dir(&folder).await {
        Ok(story) => story,
        Err(e) => {
            log::error!("Failed to load story: {}", e);
            std::process::exit(1);
        }
    };
    log_summary(&story);

    if !watch {
        return;
    }

    let mut watcher = match FolderWatcher::new(&folder) {
        Ok(watcher) => watcher,
        Err(e) => {
            log::error!("Failed to watch story folder: {}", e);
            std::process::exit(1);
        }
    };
    log::info!("Watching for changes...");
    while let Some(event) = watcher.next_event().await {
        log::info!("{:?}: {:?}", event.kind, event.path);
        match load_story_dir(&folder).await {
            Ok(story) => log_summary(&story),
            Err(e) => log::warn!("Reload failed: {}", e),
        }
    }
}

fn log_summary(story: &Story) {
    for file in &story.files {
        log::info!("  {} ({} passages)", file.name, file.passages.len());
    }
    let links: usize = story.passages.iter().map(|p| p.links_to.len()).sum();
    let dangling: usize = story
        .passages
        .iter()
        .map(|p| {
            p.text_links
                .iter()
                .filter(|name| story.passages_titled(name).is_empty())
                .count()
        })
        .sum();
    log::info!(
        "Loaded {} passages from {} files ({} links, {} dangling)",
        story.passages.len(),
        story.files.len(),
        links,
        dangling
    );
}
