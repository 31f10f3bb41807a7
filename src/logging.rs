//! Tracing setup. Stdout belongs to the UI, so events go to a file.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

const DEFAULT_LEVEL: &str = "info";

/// `~/.cache/berth/berth.log`, or `berth.log` in the working directory.
pub fn default_log_path() -> PathBuf {
    dirs::cache_dir()
        .map(|p| p.join("berth").join("berth.log"))
        .unwrap_or_else(|| PathBuf::from("berth.log"))
}

/// Command line beats config, config beats the default.
pub fn resolve_log_path(cli: Option<&Path>, config: Option<&Path>) -> PathBuf {
    cli.or(config)
        .map(Path::to_path_buf)
        .unwrap_or_else(default_log_path)
}

/// `RUST_LOG` when set and valid, else `level`, else `info`.
pub fn env_filter(level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level.unwrap_or(DEFAULT_LEVEL)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

/// Installs the global subscriber, appending to `path`.
pub fn init(level: Option<&str>, path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_path_wins() {
        let path = resolve_log_path(Some(Path::new("/tmp/a.log")), Some(Path::new("/tmp/b.log")));
        assert_eq!(path, PathBuf::from("/tmp/a.log"));
    }

    #[test]
    fn config_path_before_default() {
        assert_eq!(
            resolve_log_path(None, Some(Path::new("/tmp/b.log"))),
            PathBuf::from("/tmp/b.log")
        );
        assert_eq!(resolve_log_path(None, None), default_log_path());
    }

    #[test]
    fn default_path_is_named_after_the_app() {
        assert!(default_log_path().ends_with("berth.log"));
    }
}
