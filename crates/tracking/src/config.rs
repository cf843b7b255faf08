//! Integration configuration loaded from the host's settings store.
//!
//! Two settings control the whole integration: the Crowdstream app id and
//! the tracking-enabled flag. Both fall back to their legacy option names
//! so stores configured under the old plugin keep working. Tracking is
//! never enabled without an app id, whatever the stored flag says.

use tracing::warn;

use crowdstream_core::SettingsStore;

/// Primary option name for the app id.
pub const APP_ID_KEY: &str = "crowdstream_app_id";
/// Legacy option name for the app id (backwards compat).
pub const APP_ID_LEGACY_KEY: &str = "woocommerce_crowdstream_app_id";
/// Primary option name for the tracking-enabled flag.
pub const TRACKING_ENABLED_KEY: &str = "crowdstream_tracking_enabled";
/// Legacy option name for the tracking-enabled flag (backwards compat).
pub const TRACKING_ENABLED_LEGACY_KEY: &str = "woocommerce_crowdstream_tracking_enabled";

/// Stored flag value meaning "enabled".
const ENABLED_VALUE: &str = "yes";

/// Per-request integration configuration.
///
/// Built once from persisted settings and immutable thereafter.
///
/// # Invariants
///
/// - `tracking_enabled()` is `false` whenever the app id is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrationConfig {
    app_id: String,
    tracking_enabled: bool,
}

impl IntegrationConfig {
    /// Build a configuration from raw setting values, enforcing the
    /// no-app-id-means-disabled invariant.
    #[must_use]
    pub fn new(app_id: impl Into<String>, enabled_flag: &str) -> Self {
        let app_id = app_id.into().trim().to_string();
        let tracking_enabled = enabled_flag == ENABLED_VALUE && !app_id.is_empty();
        Self {
            app_id,
            tracking_enabled,
        }
    }

    /// A configuration with tracking off and no app id.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            app_id: String::new(),
            tracking_enabled: false,
        }
    }

    /// Load the configuration from the host's settings store.
    ///
    /// Missing settings default to empty / disabled; a failing settings
    /// backend is logged and treated the same as missing. This never fails.
    pub fn load<S: SettingsStore>(settings: &S) -> Self {
        let app_id = read_setting(settings, APP_ID_KEY, APP_ID_LEGACY_KEY).unwrap_or_default();
        let flag = read_setting(settings, TRACKING_ENABLED_KEY, TRACKING_ENABLED_LEGACY_KEY)
            .unwrap_or_default();
        Self::new(app_id, &flag)
    }

    /// The configured app id; empty when unconfigured.
    #[must_use]
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Whether tracking code should be emitted at all.
    #[must_use]
    pub const fn tracking_enabled(&self) -> bool {
        self.tracking_enabled
    }
}

/// Read a setting, falling back to its legacy option name when unset.
fn read_setting<S: SettingsStore>(settings: &S, key: &str, legacy_key: &str) -> Option<String> {
    for name in [key, legacy_key] {
        match settings.get(name) {
            Ok(Some(value)) => return Some(value),
            Ok(None) => {}
            Err(err) => {
                warn!(setting = name, error = %err, "settings read failed, treating as unset");
            }
        }
    }
    None
}
