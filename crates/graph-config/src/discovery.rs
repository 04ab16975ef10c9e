//! Locating the `.graphm.yaml` configuration file.

use std::path::{Path, PathBuf};

/// The name of the configuration file searched for.
pub const CONFIG_FILE_NAME: &str = ".graphm.yaml";

/// Environment variable naming a configuration file explicitly.
pub const CONFIG_ENV: &str = "GRAPHM_CONFIG";

/// Walk up the directory tree from `start` looking for `.graphm.yaml`.
///
/// `GRAPHM_CONFIG` wins when set, whether or not the file exists; loading a
/// missing file yields defaults. Returns `None` when the filesystem root is
/// reached without a match.
///
/// ```no_run
/// use graph_config::find_config_file;
/// use std::path::Path;
///
/// if let Some(path) = find_config_file(Path::new(".")) {
///     println!("using {}", path.display());
/// }
/// ```
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }

    let start = start.canonicalize().ok()?;
    let mut current = start.as_path();
    loop {
        let candidate = current.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        match current.parent() {
            Some(parent) if parent != current => current = parent,
            _ => return None,
        }
    }
}
