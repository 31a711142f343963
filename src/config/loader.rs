use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::RiskConfig;
use crate::errors::RiskError;

/// File name searched for in the working directory and its ancestors.
pub const CONFIG_FILE_NAME: &str = ".chainrisk.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Pure function to read config file contents
pub(crate) fn read_config_file(path: &Path) -> Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse and validate config from a TOML string
///
/// Supplier weights that are non-negative but do not sum to 1.0 are
/// rescaled rather than rejected.
pub fn parse_and_validate_config(contents: &str) -> Result<RiskConfig, String> {
    let mut config = toml::from_str::<RiskConfig>(contents)
        .map_err(|e| format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))?;

    let weights = &mut config.scoring.weights;
    let weights_non_negative = [
        weights.financial,
        weights.delivery,
        weights.quality,
        weights.geographical,
    ]
    .iter()
    .all(|w| w.is_finite() && *w >= 0.0);
    if !weights_non_negative {
        return Err("scoring.weights must all be non-negative".to_string());
    }
    if weights.sum() <= 0.0 {
        return Err("scoring.weights must not all be zero".to_string());
    }
    if (weights.sum() - 1.0).abs() > 0.001 {
        log::warn!(
            "Supplier factor weights sum to {:.3}; normalizing to 1.0",
            weights.sum()
        );
    }
    weights.normalize();

    let errors = config.validation_errors();
    if !errors.is_empty() {
        return Err(errors.join("; "));
    }

    Ok(config)
}

/// Load configuration from an explicit path. Any failure is an error.
pub fn load_config_from(path: &Path) -> Result<RiskConfig, RiskError> {
    let contents = read_config_file(path).map_err(|e| {
        RiskError::config_with_path(format!("Failed to read {}: {}", path.display(), e), path)
    })?;
    let config =
        parse_and_validate_config(&contents).map_err(|e| RiskError::config_with_path(e, path))?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Try loading config from a discovered path, warning on invalid files
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<RiskConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{} in {}. Ignoring file.", e, config_path.display());
            None
        }
    }
}

/// Handle file read errors with appropriate logging
pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // Only log actual errors, not "file not found"
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// Directory ancestors of `start` (inclusive), up to `max_depth` entries
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

/// `<user config dir>/chainrisk/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("chainrisk").join("config.toml"))
}

/// Search `start` and its ancestors, then the user config directory.
pub fn discover_config(start: PathBuf) -> Option<RiskConfig> {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .or_else(|| user_config_path().and_then(|path| try_load_config_from_path(&path)))
}

pub fn load_config() -> RiskConfig {
    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            return RiskConfig::default();
        }
    };

    discover_config(current).unwrap_or_else(|| {
        log::debug!(
            "No config found after checking {} directories. Using default config.",
            MAX_TRAVERSAL_DEPTH
        );
        RiskConfig::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use tempfile::TempDir;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config = parse_and_validate_config(indoc! {r#"
            [alerts]
            lookback_hours = 48

            [parallel]
            max_concurrency = 2
        "#})
        .unwrap();

        assert_eq!(config.alerts.lookback_hours, 48);
        assert_eq!(config.alerts.default_alert_threshold, 70);
        assert_eq!(config.parallel.max_concurrency, Some(2));
        assert_eq!(config.retry.max_retries, 3);
    }

    #[test]
    fn test_weights_are_normalized() {
        let config = parse_and_validate_config(indoc! {r#"
            [scoring.weights]
            financial = 0.6
            delivery = 0.6
            quality = 0.6
            geographical = 0.2
        "#})
        .unwrap();

        let weights = &config.scoring.weights;
        assert!((weights.sum() - 1.0).abs() < 1e-9);
        assert!((weights.financial - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_negative_weight_rejected() {
        let err = parse_and_validate_config(indoc! {r#"
            [scoring.weights]
            financial = -0.1
        "#})
        .unwrap_err();
        assert!(err.contains("non-negative"));
    }

    #[test]
    fn test_invalid_toml_reports_file_name() {
        let err = parse_and_validate_config("[alerts\nlookback_hours = 1").unwrap_err();
        assert!(err.contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_discover_walks_up_to_ancestor() {
        let root = TempDir::new().unwrap();
        std::fs::write(
            root.path().join(CONFIG_FILE_NAME),
            "[recommendations]\nmax_per_part = 7\n",
        )
        .unwrap();
        let nested = root.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let config = discover_config(nested).unwrap();
        assert_eq!(config.recommendations.max_per_part, 7);
    }

    #[test]
    fn test_load_config_from_missing_file_is_error() {
        let root = TempDir::new().unwrap();
        let err = load_config_from(&root.path().join("absent.toml")).unwrap_err();
        assert_eq!(err.kind(), "config");
    }

    #[test]
    fn test_directory_ancestors_limited() {
        let dirs: Vec<_> = directory_ancestors(PathBuf::from("/a/b/c/d"), 2).collect();
        assert_eq!(dirs, vec![PathBuf::from("/a/b/c/d"), PathBuf::from("/a/b/c")]);
    }
}
