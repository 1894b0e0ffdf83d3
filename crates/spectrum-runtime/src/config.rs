#![forbid(unsafe_code)]

//! Report engine configuration.
//!
//! Defaults suit a debug build. Every field can be overridden from the
//! environment with [`SpectrumConfig::from_env`]; malformed values are
//! collected as [`ConfigError`]s and leave the field at its default.
//! A running engine is reconfigured through [`Configure`].
//!
//! | Variable | Field | Format |
//! |----------|-------|--------|
//! | `SPECTRUM_ENABLED` | `enabled` | bool |
//! | `SPECTRUM_LOG_TAG` | `log_tag` | non-empty text |
//! | `SPECTRUM_LOG_LEVEL` | `log_level` | level name or `2..=7` |
//! | `SPECTRUM_APPEND_PACKAGES` | `append_package_names` | bool |
//! | `SPECTRUM_APPEND_ELEMENT_ID` | `append_element_id` | bool |
//! | `SPECTRUM_APPEND_ELEMENT_LOCATION` | `append_element_location` | bool |
//! | `SPECTRUM_SHOW_HIERARCHY` | `show_hierarchy` | bool |
//! | `SPECTRUM_AUTO_REPORT` | `auto_report` | bool |
//! | `SPECTRUM_THROTTLE` | `throttle` | bool |
//! | `SPECTRUM_THROTTLE_WINDOW_MS` | `throttle_window` | milliseconds |
//! | `SPECTRUM_MAX_MESSAGE_BYTES` | `max_message_bytes` | positive integer |
//! | `SPECTRUM_GLYPHS` | `glyphs` | `unicode` or `ascii` |

use std::env;
use std::fmt;
use std::time::Duration;

use spectrum_render::{DEFAULT_MAX_MESSAGE_BYTES, GlyphSet, Severity};
use spectrum_tree::BuildOptions;

use crate::scheduler::SchedulePolicy;

const ENV_ENABLED: &str = "SPECTRUM_ENABLED";
const ENV_LOG_TAG: &str = "SPECTRUM_LOG_TAG";
const ENV_LOG_LEVEL: &str = "SPECTRUM_LOG_LEVEL";
const ENV_APPEND_PACKAGES: &str = "SPECTRUM_APPEND_PACKAGES";
const ENV_APPEND_ELEMENT_ID: &str = "SPECTRUM_APPEND_ELEMENT_ID";
const ENV_APPEND_ELEMENT_LOCATION: &str = "SPECTRUM_APPEND_ELEMENT_LOCATION";
const ENV_SHOW_HIERARCHY: &str = "SPECTRUM_SHOW_HIERARCHY";
const ENV_AUTO_REPORT: &str = "SPECTRUM_AUTO_REPORT";
const ENV_THROTTLE: &str = "SPECTRUM_THROTTLE";
const ENV_THROTTLE_WINDOW_MS: &str = "SPECTRUM_THROTTLE_WINDOW_MS";
const ENV_MAX_MESSAGE_BYTES: &str = "SPECTRUM_MAX_MESSAGE_BYTES";
const ENV_GLYPHS: &str = "SPECTRUM_GLYPHS";

/// Default sink tag.
pub const DEFAULT_LOG_TAG: &str = "Spectrum";
/// Default throttle window.
pub const DEFAULT_THROTTLE_WINDOW: Duration = Duration::from_millis(500);

/// Report engine settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpectrumConfig {
    /// Master switch; a disabled engine ignores every call.
    pub enabled: bool,
    pub log_tag: String,
    /// Severity of report messages (warnings always use `Warn`).
    pub log_level: Severity,
    pub append_package_names: bool,
    pub append_element_id: bool,
    pub append_element_location: bool,
    pub show_hierarchy: bool,
    /// Report automatically when changes are detected.
    pub auto_report: bool,
    /// Coalesce automatic reports within `throttle_window`.
    pub throttle: bool,
    pub throttle_window: Duration,
    pub max_message_bytes: usize,
    pub glyphs: GlyphSet,
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        Self {
            enabled: cfg!(debug_assertions),
            log_tag: DEFAULT_LOG_TAG.to_owned(),
            log_level: Severity::Debug,
            append_package_names: false,
            append_element_id: true,
            append_element_location: false,
            show_hierarchy: true,
            auto_report: true,
            throttle: true,
            throttle_window: DEFAULT_THROTTLE_WINDOW,
            max_message_bytes: DEFAULT_MAX_MESSAGE_BYTES,
            glyphs: GlyphSet::Unicode,
        }
    }
}

impl SpectrumConfig {
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_log_tag(mut self, tag: impl Into<String>) -> Self {
        self.log_tag = tag.into();
        self
    }

    #[must_use]
    pub fn with_log_level(mut self, level: Severity) -> Self {
        self.log_level = level;
        self
    }

    #[must_use]
    pub fn with_package_names(mut self, enabled: bool) -> Self {
        self.append_package_names = enabled;
        self
    }

    #[must_use]
    pub fn with_element_id(mut self, enabled: bool) -> Self {
        self.append_element_id = enabled;
        self
    }

    #[must_use]
    pub fn with_element_location(mut self, enabled: bool) -> Self {
        self.append_element_location = enabled;
        self
    }

    #[must_use]
    pub fn with_hierarchy(mut self, enabled: bool) -> Self {
        self.show_hierarchy = enabled;
        self
    }

    #[must_use]
    pub fn with_auto_report(mut self, enabled: bool) -> Self {
        self.auto_report = enabled;
        self
    }

    #[must_use]
    pub fn with_throttle(mut self, enabled: bool) -> Self {
        self.throttle = enabled;
        self
    }

    #[must_use]
    pub fn with_throttle_window(mut self, window: Duration) -> Self {
        self.throttle_window = window;
        self
    }

    #[must_use]
    pub fn with_max_message_bytes(mut self, bytes: usize) -> Self {
        self.max_message_bytes = bytes;
        self
    }

    #[must_use]
    pub fn with_glyphs(mut self, glyphs: GlyphSet) -> Self {
        self.glyphs = glyphs;
        self
    }

    /// Capture options for the tree builder.
    #[must_use]
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            show_hierarchy: self.show_hierarchy,
            append_package_names: self.append_package_names,
            append_element_id: self.append_element_id,
            append_element_location: self.append_element_location,
        }
    }

    #[must_use]
    pub fn schedule_policy(&self) -> SchedulePolicy {
        SchedulePolicy {
            auto_report: self.auto_report,
            throttle: self.throttle,
            window: self.throttle_window,
        }
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> ConfigParse {
        Self::from_env_with(|key| env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_env_with<F>(mut get: F) -> ConfigParse
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let mut errors = Vec::new();

        read_bool(&mut get, ENV_ENABLED, "enabled", &mut config.enabled, &mut errors);

        if let Some(value) = get(ENV_LOG_TAG) {
            if value.trim().is_empty() {
                errors.push(ConfigError::new("log_tag", value, "must not be empty"));
            } else {
                config.log_tag = value.trim().to_owned();
            }
        }

        if let Some(value) = get(ENV_LOG_LEVEL) {
            match Severity::parse(&value) {
                Some(level) => config.log_level = level,
                None => errors.push(ConfigError::new(
                    "log_level",
                    value,
                    "expected verbose|debug|info|warn|error|assert or 2..7",
                )),
            }
        }

        let flags: [(&str, &'static str, &mut bool); 6] = [
            (ENV_APPEND_PACKAGES, "append_package_names", &mut config.append_package_names),
            (ENV_APPEND_ELEMENT_ID, "append_element_id", &mut config.append_element_id),
            (
                ENV_APPEND_ELEMENT_LOCATION,
                "append_element_location",
                &mut config.append_element_location,
            ),
            (ENV_SHOW_HIERARCHY, "show_hierarchy", &mut config.show_hierarchy),
            (ENV_AUTO_REPORT, "auto_report", &mut config.auto_report),
            (ENV_THROTTLE, "throttle", &mut config.throttle),
        ];
        for (key, field, slot) in flags {
            read_bool(&mut get, key, field, slot, &mut errors);
        }

        if let Some(value) = get(ENV_THROTTLE_WINDOW_MS) {
            match parse_u64(&value) {
                Some(ms) => config.throttle_window = Duration::from_millis(ms),
                None => errors.push(ConfigError::new(
                    "throttle_window",
                    value,
                    "expected milliseconds",
                )),
            }
        }

        if let Some(value) = get(ENV_MAX_MESSAGE_BYTES) {
            match parse_u64(&value).and_then(|n| usize::try_from(n).ok()) {
                Some(bytes) if bytes > 0 => config.max_message_bytes = bytes,
                _ => errors.push(ConfigError::new(
                    "max_message_bytes",
                    value,
                    "expected positive integer",
                )),
            }
        }

        if let Some(value) = get(ENV_GLYPHS) {
            match GlyphSet::parse(&value) {
                Some(glyphs) => config.glyphs = glyphs,
                None => errors.push(ConfigError::new("glyphs", value, "expected unicode|ascii")),
            }
        }

        for error in &errors {
            tracing::warn!(field = error.field, value = %error.value, "{}", error.message);
        }
        ConfigParse { config, errors }
    }

    /// Check value constraints and return all violations.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();
        if self.log_tag.is_empty() {
            errors.push(ConfigError::new("log_tag", "", "must not be empty"));
        }
        if self.max_message_bytes == 0 {
            errors.push(ConfigError::new("max_message_bytes", "0", "must be positive"));
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Result of environment parsing.
#[derive(Debug, Clone)]
pub struct ConfigParse {
    pub config: SpectrumConfig,
    pub errors: Vec<ConfigError>,
}

/// A rejected configuration value with field context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl ConfigError {
    fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// In-place editor for a live configuration.
///
/// ```
/// use spectrum_runtime::config::{Configure, SpectrumConfig};
///
/// let mut config = SpectrumConfig::default();
/// Configure::new(&mut config)
///     .log_tag("Ui")
///     .append_element_location(true)
///     .throttle_window_ms(250);
/// assert_eq!(config.log_tag, "Ui");
/// assert!(config.append_element_location);
/// ```
#[derive(Debug)]
pub struct Configure<'a> {
    config: &'a mut SpectrumConfig,
}

impl<'a> Configure<'a> {
    pub fn new(config: &'a mut SpectrumConfig) -> Self {
        Self { config }
    }

    pub fn log_tag(self, tag: impl Into<String>) -> Self {
        self.config.log_tag = tag.into();
        self
    }

    pub fn log_level(self, level: Severity) -> Self {
        self.config.log_level = level;
        self
    }

    pub fn append_package_names(self, enabled: bool) -> Self {
        self.config.append_package_names = enabled;
        self
    }

    pub fn append_element_id(self, enabled: bool) -> Self {
        self.config.append_element_id = enabled;
        self
    }

    pub fn append_element_location(self, enabled: bool) -> Self {
        self.config.append_element_location = enabled;
        self
    }

    pub fn show_hierarchy(self, enabled: bool) -> Self {
        self.config.show_hierarchy = enabled;
        self
    }

    pub fn auto_report(self, enabled: bool) -> Self {
        self.config.auto_report = enabled;
        self
    }

    pub fn throttle(self, enabled: bool) -> Self {
        self.config.throttle = enabled;
        self
    }

    pub fn throttle_window_ms(self, ms: u64) -> Self {
        self.config.throttle_window = Duration::from_millis(ms);
        self
    }

    pub fn max_message_bytes(self, bytes: usize) -> Self {
        self.config.max_message_bytes = bytes.max(1);
        self
    }

    pub fn glyphs(self, glyphs: GlyphSet) -> Self {
        self.config.glyphs = glyphs;
        self
    }
}

fn read_bool<F>(
    get: &mut F,
    key: &str,
    field: &'static str,
    slot: &mut bool,
    errors: &mut Vec<ConfigError>,
) where
    F: FnMut(&str) -> Option<String>,
{
    if let Some(value) = get(key) {
        match parse_bool(&value) {
            Some(parsed) => *slot = parsed,
            None => errors.push(ConfigError::new(
                field,
                value,
                "expected bool (1/0/true/false)",
            )),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[inline]
fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}
