//! Runtime feature flag handling for the Bookline application.
//!
//! Features are toggled in two ways:
//!
//! 1. A `use_*` runtime flag in the configuration file (or env override)
//! 2. The presence of the feature's configuration section
//!
//! A feature only runs when both are present, so a half-configured feature
//! stays off instead of failing at request time.

use bookline_config::AppConfig;
use std::sync::Arc;

/// Check if a feature is enabled at runtime based on configuration.
///
/// # Arguments
///
/// * `config` - The application configuration
/// * `use_feature` - The configuration flag that enables the feature
/// * `feature_config` - The configuration section for the feature
///
/// # Returns
///
/// `true` if the feature is enabled, `false` otherwise
pub fn is_feature_enabled<T>(
    _config: &Arc<AppConfig>,
    use_feature: bool,
    feature_config: Option<&T>,
) -> bool {
    use_feature && feature_config.is_some()
}
