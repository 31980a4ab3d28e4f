//! # starwatch-core
//!
//! Discovery and log-extraction pipeline for a long-running MESA-style
//! stellar-evolution simulation: find the process, work out which output
//! layout the run uses, read the newest row of each history file, and
//! classify the physical state for display.
//!
//! ## Design Principles
//!
//! - **Synchronous**: No async runtime dependency. Clients can wrap with
//!   async if needed.
//! - **Stateless per request**: Every capture re-scans the process table and
//!   re-reads the history files; nothing is cached between calls, so
//!   concurrent callers never share mutable state.
//! - **Graceful degradation**: A missing process, an unresolvable layout, or
//!   an unreadable file leaves only the corresponding fields empty. Nothing
//!   in this crate is fatal to the hosting process.
//! - **Read-only**: Simulation output is never written or mutated, and the
//!   simulation process is never signalled.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use starwatch_core::snapshot::{self, WatchConfig};
//!
//! let snapshot = snapshot::capture(&WatchConfig::default());
//! if let Some(star) = &snapshot.star1 {
//!     println!("model {} at {}", star.model_number, star.stage);
//! }
//! ```

pub mod error;
pub mod history;
pub mod layout;
pub mod locate;
pub mod snapshot;
pub mod stage;
pub mod tail;

pub use error::{Result, WatchError};
pub use history::{BinaryRecord, StarRecord};
pub use layout::RunLayout;
pub use locate::ProcessHandle;
pub use snapshot::{SimulationSnapshot, WatchConfig};
pub use stage::{EvolutionaryStage, MassTransferCase};
