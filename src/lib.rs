//! This crate provides [`Object`], an exclusively lockable unit of a shared object model
//! whose attribute changes are routed either to synchronous handlers or, coalesced, to an
//! [`Aggregator`].
//!
//! # Protocol
//!
//! A caller locks an object, mutates it, and unlocks it while reporting the set of
//! attributes it changed:
//!
//! ```
//! use std::sync::Arc;
//! use object_lock::{Aggregator, AttributeMask, Category, HandlerTable, Object};
//!
//! #[derive(Default)]
//! struct Player {
//!     volume: u32,
//!     applied_volume: u32,
//! }
//!
//! fn apply_gain(_: &Object<Player>, player: &mut Player) -> AttributeMask {
//!     player.applied_volume = player.volume;
//!     AttributeMask::GAIN
//! }
//!
//! let handlers = Arc::new(HandlerTable::<Player>::new().with(Category::AudioPlayer, 0, apply_gain));
//! let aggregator = Arc::new(Aggregator::new());
//! let player = Object::new(Category::AudioPlayer, Player::default())
//!     .with_handlers(handlers)
//!     .register_with(&aggregator)
//!     .unwrap();
//!
//! let mut guard = player.lock_exclusive();
//! guard.volume = 7;
//! guard.unlock_and_report(AttributeMask::GAIN | AttributeMask::POSITION);
//!
//! // GAIN was handled while the object was still locked, POSITION is pending.
//! let mut guard = player.lock_exclusive();
//! assert_eq!(guard.applied_volume, 7);
//! assert_eq!(guard.pending(), AttributeMask::POSITION);
//! drop(guard);
//!
//! // The aggregator learned that instance 1 has pending changes.
//! assert_eq!(aggregator.take_changed(), 0b1);
//! ```
//!
//! Handlers run while the object is locked, lowest bit first, and may use the object they
//! are given to signal its waiters. The bits they return are removed from the report; everything else is merged into the object's pending mask. Only
//! the transition of the pending mask from empty to non-empty notifies the aggregator,
//! and that happens after the object's lock has been released, so the object lock and the
//! aggregator lock are never held at the same time.
//!
//! # Diagnostics
//!
//! [`LockConfig::diagnostics`] enables holder tracking. Each object then records which
//! thread holds it and the call site that locked, unlocked or waited on it last. Recursive
//! locking, unlocking from a thread that does not hold the lock, and finding a stale
//! holder after acquisition are fatal. Contended acquisitions back off through
//! [`LockConfig::backoff_us`] and log a warning with the holder's call site before
//! blocking.
//!
//! Diagnostics default to on in debug builds and off in release builds. With diagnostics
//! off, locking is a plain mutex acquire and release.

pub use {
    aggregator::{Aggregator, InstanceSlot, MAX_INSTANCES},
    attributes::{ATTRIBUTE_INDEX_MAX, AttributeMask, SetBits},
    category::{
        AUDIO_FIRST, AUDIO_LAST, AUDIO_OFFSET, CATEGORY_COUNT, Category, MEDIA_FIRST, MEDIA_LAST,
        normalize, normalize_or_abort,
    },
    config::{DEFAULT_BACKOFF_US, LockConfig},
    error::{CategoryError, ConfigError, SlotError},
    execution_unit::ExecutionUnit,
    handlers::{AttributeHandler, HandlerTable},
    object::{Object, ObjectGuard},
    provenance::Provenance,
};

mod aggregator;
mod attributes;
mod category;
mod config;
mod error;
mod execution_unit;
mod handlers;
mod object;
mod provenance;
