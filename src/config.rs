use {
    crate::error::ConfigError,
    serde::Deserialize,
    std::time::Duration,
};


/// Backoff between non-blocking lock attempts, in microseconds.
///
/// About 100 ms in total before the contention warning is logged.
///
/// ```
/// use object_lock::{DEFAULT_BACKOFF_US, LockConfig};
///
/// assert_eq!(LockConfig::release().backoff_us, DEFAULT_BACKOFF_US);
/// ```
pub const DEFAULT_BACKOFF_US: [u64; 5] = [1, 10_000, 20_000, 30_000, 40_000];

/// Construction-time configuration of an [`Object`](crate::Object).
///
/// With `diagnostics` disabled, locking reduces to a plain blocking acquire and release.
/// With it enabled, every object records which thread holds it and where it was locked,
/// contended acquisitions back off through `backoff_us` before blocking, and lock misuse
/// panics.
///
/// Configurations can be loaded from TOML:
///
/// ```
/// use object_lock::LockConfig;
///
/// let config = LockConfig::from_toml_str(r#"
///     diagnostics = true
///     backoff_us = [1, 500]
/// "#).unwrap();
/// assert!(config.diagnostics);
/// assert_eq!(config.backoff_us, [1, 500]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LockConfig {
    pub diagnostics: bool,
    pub backoff_us: Vec<u64>,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            diagnostics: cfg!(debug_assertions),
            backoff_us: DEFAULT_BACKOFF_US.to_vec(),
        }
    }
}

impl LockConfig {
    /// Diagnostics enabled with the default backoff.
    pub fn debug() -> Self {
        Self {
            diagnostics: true,
            ..Self::default()
        }
    }

    /// Diagnostics disabled.
    pub fn release() -> Self {
        Self {
            diagnostics: false,
            ..Self::default()
        }
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.diagnostics && self.backoff_us.is_empty() {
            return Err(ConfigError::EmptyBackoff);
        }
        Ok(())
    }

    pub(crate) fn backoff(&self) -> impl Iterator<Item = Duration> + '_ {
        self.backoff_us.iter().map(|&us| Duration::from_micros(us))
    }
}
