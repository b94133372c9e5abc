//! Playback and debugging engine for Branchwork stories.
//!
//! A [`Player`] simulates one reader walking a story graph while the author
//! edits it. It keeps its own overlay of variable values and a replayable
//! history of visited steps, supports undo and jump-to-step, pauses on
//! breakpoints, measures play time without a background task, and records
//! the session as a [`Playthrough`] for export.
//!
//! Every command runs synchronously and completes before returning. Failures
//! are reported through `Result`/`bool` returns and the player's error log;
//! no command panics.

/// Breakpoint set consulted on every passage entry.
pub mod breakpoints;
/// Time sources for timestamps and play duration.
pub mod clock;
/// Player configuration.
pub mod config;
/// Error types and the recoverable error log.
pub mod error;
/// Replayable history of visited steps.
pub mod history;
/// Change notifications for observers.
pub mod observer;
/// The playback engine and its command surface.
pub mod player;
/// Playthrough recording and export.
pub mod recorder;
/// Passage template rendering.
pub mod render;
/// Read-only projections over the player's overlay.
pub mod state;
/// Pause-aware play duration.
pub mod timer;
/// Live variable bindings and snapshots.
pub mod variables;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::PlayerConfig;
pub use error::{ErrorEntry, ErrorKind, PlayerError, PlayerResult};
pub use history::Step;
pub use observer::{PlayerEvent, SubscriptionId};
pub use player::Player;
pub use recorder::Playthrough;
pub use state::{Phase, PlayerState};
pub use variables::{Snapshot, VariableMap};
