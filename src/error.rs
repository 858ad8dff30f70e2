//! Errors returned by the construction-time paths of this crate.
//!
//! Locking, reporting and waiting never return errors; misuse of those is fatal.

use thiserror::Error;

/// A raw object id that is in neither category range.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryError {
    /// The id is outside both the media and the audio id ranges.
    #[error("object id {0:#x} is not a known category")]
    OutOfRange(u32),
}

/// Errors produced while assigning aggregator instance slots.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotError {
    /// Every slot of the aggregator is in use.
    #[error("all {capacity} instance slots are in use")]
    Exhausted {
        /// Number of slots the aggregator tracks.
        capacity: u32,
    },

    /// The slot number is 0 or exceeds the aggregator capacity.
    #[error("instance slot {0} is out of range")]
    OutOfRange(u32),
}

/// Errors produced while loading a [`LockConfig`](crate::LockConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("invalid lock configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Diagnostics are enabled but the backoff schedule has no steps.
    #[error("backoff schedule must contain at least one step when diagnostics are enabled")]
    EmptyBackoff,
}
