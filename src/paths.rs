//! Path and file helpers

use anyhow::{Context, Result};
use std::fs::{File, FileTimes};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tempfile::TempDir;

/// Convert backslashes to forward slashes.
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Replace the home directory prefix of `path` with `~`.
pub fn tilde(path: &Path) -> String {
    let text = path.to_string_lossy();
    match dirs::home_dir() {
        Some(home) => {
            let home = home.to_string_lossy();
            match text.strip_prefix(home.as_ref()) {
                Some(rest) if rest.is_empty() || rest.starts_with('/') => format!("~{rest}"),
                _ => text.into_owned(),
            }
        }
        None => text.into_owned(),
    }
}

/// `path` itself when it is a directory, otherwise its parent.
///
/// With `none` set, a path that does not exist yields `None`.
pub fn parent(path: &Path, none: bool) -> Option<PathBuf> {
    if path.is_dir() {
        return Some(path.to_path_buf());
    }
    if none && !path.exists() {
        return None;
    }
    path.parent().map(Path::to_path_buf)
}

/// What [`findup`] requires of a candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PathIs {
    Exists,
    #[default]
    IsFile,
    IsDir,
}

impl PathIs {
    pub fn matches(self, path: &Path) -> bool {
        match self {
            PathIs::Exists => path.exists(),
            PathIs::IsFile => path.is_file(),
            PathIs::IsDir => path.is_dir(),
        }
    }
}

/// Walk up from `start` (or the current directory) looking for `name`.
///
/// Returns the nearest match, or the uppermost one when `uppermost` is set.
/// The filesystem root itself is not searched.
pub fn findup(start: Option<&Path>, kind: PathIs, name: &str, uppermost: bool) -> Option<PathBuf> {
    let start = match start {
        Some(path) if path.is_absolute() => path.to_path_buf(),
        Some(path) => std::env::current_dir().ok()?.join(path),
        None => std::env::current_dir().ok()?,
    };
    let base = parent(&start, false)?;
    let mut latest = None;
    for dir in base.ancestors().take_while(|dir| dir.parent().is_some()) {
        let candidate = dir.join(name);
        if kind.matches(&candidate) {
            if !uppermost {
                return Some(candidate);
            }
            latest = Some(candidate);
        }
    }
    latest
}

/// Changes the current directory and restores the previous one on drop.
#[derive(Debug)]
pub struct ChdirGuard {
    previous: PathBuf,
    current: PathBuf,
    _temp: Option<TempDir>,
}

impl ChdirGuard {
    pub fn previous(&self) -> &Path {
        &self.previous
    }

    pub fn current(&self) -> &Path {
        &self.current
    }
}

impl Drop for ChdirGuard {
    fn drop(&mut self) {
        if let Err(err) = std::env::set_current_dir(&self.previous) {
            tracing::warn!("Failed to restore directory {}: {}", self.previous.display(), err);
        }
    }
}

/// Enter `path`, or its parent when `path` is a file or does not exist.
pub fn chdir(path: &Path) -> Result<ChdirGuard> {
    let target = parent(path, false)
        .with_context(|| format!("No directory to enter for {}", path.display()))?;
    enter(target, None)
}

/// Enter a fresh temporary directory, removed when the guard drops.
pub fn chdir_temp() -> Result<ChdirGuard> {
    let temp = TempDir::new().context("Failed creating temporary directory")?;
    let target = temp.path().to_path_buf();
    enter(target, Some(temp))
}

fn enter(target: PathBuf, temp: Option<TempDir>) -> Result<ChdirGuard> {
    let previous = std::env::current_dir().context("Failed reading current directory")?;
    std::env::set_current_dir(&target)
        .with_context(|| format!("Failed entering {}", target.display()))?;
    Ok(ChdirGuard { previous, current: target, _temp: temp })
}

/// Join path-like parts with `.`, optionally dropping each part's extension.
///
/// `"a/b/c.py"` and `["a", "b", "c.py"]` both become `"a.b.c"`.
pub fn tomodules<S: AsRef<str>>(parts: &[S], strip_suffix: bool) -> String {
    parts
        .iter()
        .flat_map(|part| part.as_ref().split(['/', ' ']))
        .filter(|part| !part.is_empty())
        .map(|part| {
            if strip_suffix {
                match Path::new(part).extension().and_then(|e| e.to_str()) {
                    Some(ext) => &part[..part.len() - ext.len() - 1],
                    None => part,
                }
            } else {
                part
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

/// Set the modification time of `path` to now.
pub fn timestamp_now(path: &Path) -> Result<()> {
    let now = SystemTime::now();
    let file = File::options()
        .write(true)
        .open(path)
        .with_context(|| format!("Failed opening {}", path.display()))?;
    file.set_times(FileTimes::new().set_accessed(now).set_modified(now))
        .with_context(|| format!("Failed updating timestamps of {}", path.display()))
}
