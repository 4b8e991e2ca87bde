use dirs::home_dir;
use std::path::{Path, PathBuf};

/// Expands a leading `~` or `~/` to the user's home directory. `~user` forms
/// are not supported and pass through untouched.
pub fn expand_tilde(path: &str) -> PathBuf {
    let Some(home) = home_dir() else {
        return PathBuf::from(path);
    };

    match path.strip_prefix('~') {
        Some("") => home,
        Some(rest) => match rest.strip_prefix('/') {
            Some(tail) => home.join(tail),
            None => PathBuf::from(path),
        },
        None => PathBuf::from(path),
    }
}

/// Replaces a leading home-directory prefix with `~`, for display in error
/// messages.
pub fn contract_tilde(path: &Path) -> String {
    let path_str = path.to_string_lossy();
    let Some(home) = home_dir() else {
        return path_str.into_owned();
    };
    let home_str = home.to_string_lossy();

    match path_str.strip_prefix(home_str.as_ref()) {
        Some("") => "~".to_string(),
        Some(rest) if rest.starts_with('/') => format!("~{}", rest),
        _ => path_str.into_owned(),
    }
}
