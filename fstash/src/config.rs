//! Runtime configuration resolved once at startup.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Environment variable overriding the storage root.
pub const ROOT_ENV: &str = "FSTASH_HOME";

/// Storage directory name under the home directory.
pub const DEFAULT_DIR_NAME: &str = ".fstash";

/// Paths the commands operate on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Where stashes live.
    pub storage_root: PathBuf,
    /// Directory the tool was started from.
    pub working_dir: PathBuf,
}

impl Config {
    /// Resolve from the `--root` flag, the environment and the process state.
    ///
    /// Storage root: `--root` > `FSTASH_HOME` > `$HOME/.fstash`.
    pub fn resolve(root_arg: Option<PathBuf>) -> Result<Self> {
        let working_dir =
            std::env::current_dir().context("Failed to determine the working directory")?;
        let env_root = std::env::var_os(ROOT_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        let storage_root = resolve_root(root_arg, env_root, dirs::home_dir())?;

        Ok(Self {
            storage_root: absolutize(&working_dir, &storage_root),
            working_dir,
        })
    }

    /// Resolve a user-supplied directory against the working directory.
    ///
    /// `.` is the working directory itself.
    pub fn resolve_dir(&self, dir: &Path) -> PathBuf {
        if dir == Path::new(".") {
            self.working_dir.clone()
        } else {
            absolutize(&self.working_dir, dir)
        }
    }
}

fn resolve_root(
    root_arg: Option<PathBuf>,
    env_root: Option<PathBuf>,
    home: Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(root) = root_arg.or(env_root) {
        return Ok(root);
    }
    let home = home.with_context(|| {
        format!(
            "Could not determine the home directory; set {} or pass --root",
            ROOT_ENV
        )
    })?;
    Ok(home.join(DEFAULT_DIR_NAME))
}

fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_precedence() {
        let arg = Some(PathBuf::from("/from/arg"));
        let env = Some(PathBuf::from("/from/env"));
        let home = Some(PathBuf::from("/home/user"));

        assert_eq!(
            resolve_root(arg, env.clone(), home.clone()).unwrap(),
            PathBuf::from("/from/arg")
        );
        assert_eq!(
            resolve_root(None, env, home.clone()).unwrap(),
            PathBuf::from("/from/env")
        );
        assert_eq!(
            resolve_root(None, None, home).unwrap(),
            PathBuf::from("/home/user/.fstash")
        );
    }

    #[test]
    fn test_root_without_home() {
        let err = resolve_root(None, None, None).unwrap_err();
        assert!(err.to_string().contains(ROOT_ENV));
    }

    #[test]
    fn test_resolve_dir() {
        let config = Config {
            storage_root: PathBuf::from("/store"),
            working_dir: PathBuf::from("/work"),
        };
        assert_eq!(config.resolve_dir(Path::new(".")), PathBuf::from("/work"));
        assert_eq!(config.resolve_dir(Path::new("out")), PathBuf::from("/work/out"));
        assert_eq!(config.resolve_dir(Path::new("/abs")), PathBuf::from("/abs"));
    }
}
