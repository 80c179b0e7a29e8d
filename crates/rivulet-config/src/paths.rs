//! Platform-specific paths for configuration and patch files.
//!
//! # Directory Structure
//!
//! - **User config**: `~/.config/rivulet/` (Linux), `~/Library/Application Support/rivulet/` (macOS), `%APPDATA%\rivulet\` (Windows)
//! - **User patches**: `<user config>/patches/`

use std::path::{Path, PathBuf};

/// Application name used for directory paths.
const APP_NAME: &str = "rivulet";

/// Subdirectory name for patches.
const PATCHES_SUBDIR: &str = "patches";

/// File name of the runtime configuration.
const CONFIG_FILE: &str = "config.toml";

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the path of the default runtime configuration file.
pub fn default_config_path() -> PathBuf {
    user_config_dir().join(CONFIG_FILE)
}

/// Returns the user-specific patches directory.
pub fn user_patches_dir() -> PathBuf {
    user_config_dir().join(PATCHES_SUBDIR)
}

/// Find a patch file by name.
///
/// `name` may be a path to an existing file, or a patch name (with or without
/// `.toml`) looked up in [`user_patches_dir`].
pub fn find_patch(name: &str) -> Option<PathBuf> {
    find_patch_in(name, &user_patches_dir())
}

/// [`find_patch`] against an explicit patches directory.
pub fn find_patch_in(name: &str, patches_dir: &Path) -> Option<PathBuf> {
    let direct = PathBuf::from(name);
    if direct.is_file() {
        return Some(direct);
    }
    let file_name = if Path::new(name).extension().is_some_and(|e| e == "toml") {
        name.to_string()
    } else {
        format!("{name}.toml")
    };
    let candidate = patches_dir.join(file_name);
    candidate.is_file().then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_share_app_dir() {
        let base = user_config_dir();
        assert!(base.ends_with(APP_NAME));
        assert_eq!(default_config_path(), base.join("config.toml"));
        assert_eq!(user_patches_dir(), base.join("patches"));
    }

    #[test]
    fn find_patch_by_name_and_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.toml");
        std::fs::write(&path, "").unwrap();

        assert_eq!(find_patch_in("demo", dir.path()), Some(path.clone()));
        assert_eq!(find_patch_in("demo.toml", dir.path()), Some(path.clone()));
        let absolute = path.to_string_lossy().into_owned();
        assert_eq!(find_patch_in(&absolute, dir.path()), Some(path));
        assert_eq!(find_patch_in("missing", dir.path()), None);
    }
}
