//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand environment variable references in a string.
///
/// Supports:
/// - `${VAR}` - expands to the value of VAR, errors if unset
/// - `${VAR:-default}` - expands to VAR if set, otherwise uses default
///
/// Strings without `${` are returned unchanged, so CSS selectors such as
/// `[href$=".css"]` pass through as written.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, LookupError> {
        match std::env::var(var) {
            Ok(val) => Ok(Some(val)),
            Err(_) => Err(LookupError {
                var_name: var.to_owned(),
            }),
        }
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.cause.var_name),
    })
}

struct LookupError {
    var_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_simple_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("SP_TEST_ROOT", "/srv/pages");
        }
        let result = expand_env("${SP_TEST_ROOT}", "root_folder").unwrap();
        assert_eq!(result, "/srv/pages");
        unsafe {
            std::env::remove_var("SP_TEST_ROOT");
        }
    }

    #[test]
    fn test_expand_with_default_uses_default() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("SP_UNSET_SELECTOR");
        }
        let result = expand_env("${SP_UNSET_SELECTOR:-main}", "content_selector").unwrap();
        assert_eq!(result, "main");
    }

    #[test]
    fn test_expand_missing_var_error() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("SP_MISSING_VAR");
        }
        let err = expand_env("${SP_MISSING_VAR}/pages", "root_folder").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("SP_MISSING_VAR"));
        assert!(err.to_string().contains("root_folder"));
    }

    #[test]
    fn test_selector_with_dollar_not_expanded() {
        let result = expand_env("link[href$=\".css\"]", "content_selector").unwrap();
        assert_eq!(result, "link[href$=\".css\"]");
    }
}
