//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Levels accepted by `logging.level`.
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Minimum snippet length: one character plus the `...` suffix.
const MIN_SNIPPET_LIMIT: usize = 4;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Turn the first error into a `ConfigError::InvalidValue`.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(ConfigError::InvalidValue {
                field: err.path,
                message: err.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_capture(config, &mut result);
        Self::validate_logging(config, &mut result);

        Ok(result)
    }

    fn validate_capture(config: &Config, result: &mut ValidationResult) {
        let capture = &config.capture;

        if capture.max_depth == 0 {
            result.add_error(ValidationError::new(
                "capture.max_depth",
                "max_depth must be greater than 0",
            ));
        } else if capture.max_depth > 64 {
            result.add_warning(ValidationWarning::new(
                "capture.max_depth",
                "max_depth is very high (>64), deep pages may produce very large trees",
            ));
        }

        if capture.max_children == 0 {
            result.add_error(ValidationError::new(
                "capture.max_children",
                "max_children must be greater than 0",
            ));
        } else if capture.max_children > 10_000 {
            result.add_warning(ValidationWarning::new(
                "capture.max_children",
                "max_children is very high (>10000)",
            ));
        }

        if capture.text_snippet_limit < MIN_SNIPPET_LIMIT {
            result.add_error(ValidationError::new(
                "capture.text_snippet_limit",
                format!("text_snippet_limit must be at least {}", MIN_SNIPPET_LIMIT),
            ));
        }

        for tag in &capture.excluded_tags {
            if tag.eq_ignore_ascii_case("html") || tag.eq_ignore_ascii_case("body") {
                result.add_warning(ValidationWarning::new(
                    "capture.excluded_tags",
                    format!("Excluding '{}' removes the whole document", tag),
                ));
            }
        }
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        let level = config.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            result.add_error(ValidationError::new(
                "logging.level",
                format!(
                    "Unknown log level '{}', valid values: {:?}",
                    config.logging.level, LOG_LEVELS
                ),
            ));
        }

        if config.logging.directory.is_some() && config.logging.max_log_files == 0 {
            result.add_warning(ValidationWarning::new(
                "logging.max_log_files",
                "max_log_files is 0, rotated log files will not be pruned",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
