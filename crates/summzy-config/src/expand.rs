//! Environment variable expansion for configuration strings.

use std::borrow::Cow;

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in `value`.
///
/// `field` names the config key in error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::env(value)
        .map(Cow::into_owned)
        .map_err(|err| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", err.var_name),
        })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_literal_unchanged() {
        assert_eq!(expand_env("1,2,3", "field").unwrap(), "1,2,3");
    }

    #[test]
    fn test_default_used_when_unset() {
        assert_eq!(
            expand_env("${SUMMZY_EXPAND_TEST_UNSET:-[7, 8]}", "field").unwrap(),
            "[7, 8]"
        );
    }

    #[test]
    fn test_empty_default() {
        assert_eq!(
            expand_env("${SUMMZY_EXPAND_TEST_UNSET:-}", "field").unwrap(),
            ""
        );
    }

    #[test]
    fn test_missing_var_names_field_and_var() {
        let err = expand_env("${SUMMZY_EXPAND_TEST_UNSET}", "telegram.admin_user_ids").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        let msg = err.to_string();
        assert!(msg.contains("SUMMZY_EXPAND_TEST_UNSET"));
        assert!(msg.contains("telegram.admin_user_ids"));
    }
}
