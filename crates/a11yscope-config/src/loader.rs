//! Configuration loader.

use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::schema::Config;

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let config: Config = toml::from_str(&expanded)?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise from the user config file if
    /// one exists, otherwise return defaults.
    ///
    /// An explicitly requested file that does not exist is an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Config::default_path() {
            Some(default) if default.exists() => Self::load(&default),
            _ => Ok(Config::default()),
        }
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();
        let re = regex::Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name).map_err(|_| {
                ConfigError::EnvVarNotSet(var_name.to_string())
            })?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/.config`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_empty_config() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config.capture.max_depth, 25);
    }

    #[test]
    fn test_expand_path() {
        let expanded = ConfigLoader::expand_path("~/.a11yscope");
        assert!(!expanded.starts_with('~'));
    }

    #[test]
    fn test_load_capture_section() {
        let content = r#"
            [capture]
            max_depth = 12
            max_children = 50
            text_snippet_limit = 40
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.capture.max_depth, 12);
        assert_eq!(config.capture.max_children, 50);
        assert_eq!(config.capture.text_snippet_limit, 40);
    }

    #[test]
    fn test_load_full_config() {
        let content = r#"
            [capture]
            excluded_tags = ["script", "svg"]
            excluded_attributes = ["class"]

            [logging]
            level = "debug"
            json = true
            directory = "/tmp/a11yscope-logs"

            [output]
            pretty = false
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.capture.excluded_tags, vec!["script", "svg"]);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
        assert_eq!(config.logging.directory.as_deref(), Some("/tmp/a11yscope-logs"));
        assert!(!config.output.pretty);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[capture]").unwrap();
        writeln!(file, "max_children = 5").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.capture.max_children, 5);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/path/config.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_or_default_with_explicit_missing_file() {
        let result = ConfigLoader::load_or_default(Some(Path::new("/nonexistent/a11yscope.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_invalid_toml() {
        let content = "invalid = [unclosed";
        let result = ConfigLoader::load_str(content);
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: This test runs in isolation and sets a unique test-only env var
        unsafe {
            std::env::set_var("A11YSCOPE_TEST_CONFIG_VAR", "warn");
        }
        let content = "[logging]\nlevel = \"${A11YSCOPE_TEST_CONFIG_VAR}\"";
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.logging.level, "warn");
        unsafe {
            std::env::remove_var("A11YSCOPE_TEST_CONFIG_VAR");
        }
    }

    #[test]
    fn test_expand_env_vars_not_set() {
        let content = "value = \"${NONEXISTENT_TEST_VAR_12345}\"";
        let result = ConfigLoader::expand_env_vars(content);
        assert!(matches!(result, Err(ConfigError::EnvVarNotSet(ref v)) if v == "NONEXISTENT_TEST_VAR_12345"));
    }

    #[test]
    fn test_expand_env_vars_no_vars() {
        let content = "value = \"no variables here\"";
        let expanded = ConfigLoader::expand_env_vars(content).unwrap();
        assert_eq!(expanded, content);
    }

    #[test]
    fn test_expand_path_no_tilde() {
        let path = "/usr/local/bin";
        let expanded = ConfigLoader::expand_path(path);
        assert_eq!(expanded, path);
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = ConfigLoader::expand_path("~/test");
        assert!(!expanded.starts_with('~'));
        assert!(expanded.ends_with("/test"));
    }
}
