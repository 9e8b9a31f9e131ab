use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const STORY_DIR: &str = "STORY_DIR";
    /// Override for the watcher's quiet window, in milliseconds.
    pub const WATCH_DEBOUNCE_MS: &str = "WATCH_DEBOUNCE_MS";
}

/// Default values
pub mod defaults {
    /// File extensions treated as story files.
    pub const STORY_EXTENSIONS: &[&str] = &["tw", "twee"];
    /// Directory names never listed or watched.
    pub const EXCLUDED_DIRS: &[&str] = &["node_modules"];
    /// Quiet window for coalescing watcher events, in milliseconds.
    pub const WATCH_DEBOUNCE_MS: u64 = 250;
}

/// Get the story folder from the environment, if set
pub fn story_dir() -> Option<PathBuf> {
    env::var(env_vars::STORY_DIR).ok().map(PathBuf::from)
}

/// Get the watcher quiet window
pub fn watch_debounce() -> Duration {
    let ms = env::var(env_vars::WATCH_DEBOUNCE_MS)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(defaults::WATCH_DEBOUNCE_MS);
    Duration::from_millis(ms)
}
