use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::FatiguemapConfig;
use crate::errors::{FatigueError, Result};

pub const CONFIG_FILE_NAME: &str = ".fatiguemap.toml";
const MAX_TRAVERSAL_DEPTH: usize = 10;

pub(crate) fn read_config_file(path: &Path) -> std::result::Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse TOML and run semantic validation
pub fn parse_and_validate_config(contents: &str) -> Result<FatiguemapConfig> {
    let config: FatiguemapConfig = toml::from_str(contents)?;
    config.validate()?;
    Ok(config)
}

/// Load a discovered config file; problems are logged and yield `None`
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<FatiguemapConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            tracing::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            tracing::warn!("Ignoring {}: {}. Using defaults.", config_path.display(), e);
            None
        }
    }
}

fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // Absence is the normal case while walking ancestors
    if error.kind() != std::io::ErrorKind::NotFound {
        tracing::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// `start` and its parents, nearest first, at most `max_depth` entries
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Nearest `.fatiguemap.toml` walking up from `start`, or defaults
pub fn discover_config(start: PathBuf) -> FatiguemapConfig {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            tracing::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            FatiguemapConfig::default()
        })
}

/// Discover from the working directory
pub fn load_config() -> FatiguemapConfig {
    match std::env::current_dir() {
        Ok(dir) => discover_config(dir),
        Err(e) => {
            tracing::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            FatiguemapConfig::default()
        }
    }
}

/// Load an explicitly named file. Unlike discovery, every problem is an error.
pub fn load_config_from(path: &Path) -> Result<FatiguemapConfig> {
    let contents = read_config_file(path).map_err(|e| {
        FatigueError::configuration(format!(
            "cannot read config file {}: {}",
            path.display(),
            e
        ))
    })?;
    parse_and_validate_config(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use tempfile::TempDir;

    #[test]
    fn test_directory_ancestors_stops_at_depth() {
        let dirs: Vec<PathBuf> = directory_ancestors(PathBuf::from("/a/b/c/d"), 3).collect();
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("/a/b/c/d"),
                PathBuf::from("/a/b/c"),
                PathBuf::from("/a/b"),
            ]
        );
    }

    #[test]
    fn test_discovery_finds_parent_config() {
        let root = TempDir::new().unwrap();
        fs::write(
            root.path().join(CONFIG_FILE_NAME),
            indoc! {r#"
                [risk]
                moderate = 30.0
                high = 70.0
            "#},
        )
        .unwrap();
        let nested = root.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();

        let config = discover_config(nested);
        assert_eq!(config.risk_thresholds().moderate, 30.0);
        assert_eq!(config.risk_thresholds().high, 70.0);
    }

    #[test]
    fn test_invalid_discovered_config_falls_back_to_defaults() {
        let root = TempDir::new().unwrap();
        fs::write(
            root.path().join(CONFIG_FILE_NAME),
            "[risk]\nmoderate = 80.0\nhigh = 20.0\n",
        )
        .unwrap();

        let config = discover_config(root.path().to_path_buf());
        assert_eq!(config.risk_thresholds().moderate, 35.0);
    }

    #[test]
    fn test_explicit_invalid_config_is_an_error() {
        let root = TempDir::new().unwrap();
        let path = root.path().join("custom.toml");
        fs::write(&path, "[training\n").unwrap();
        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, FatigueError::Toml(_)));

        let missing = load_config_from(&root.path().join("absent.toml")).unwrap_err();
        assert!(matches!(missing, FatigueError::Configuration(_)));
    }
}
