//! Per-request snapshot assembly.
//!
//! One synchronous run of the full pipeline: locate the process, derive the
//! run directory, resolve the layout, parse each history file, classify.
//! Every stage that fails leaves only its own fields unpopulated and adds a
//! note, so the caller can render partial data instead of an error page.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::history::{self, BinaryRecord, StarRecord};
use crate::layout::{self, RunLayout};
use crate::locate::{self, ProcessHandle, DEFAULT_EXECUTABLE_NAMES};
use crate::stage::{self, MassTransferCase};

/// Discovery settings, passed explicitly rather than read from globals.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Executable names to look for in the process table.
    pub executable_names: Vec<String>,
    /// When set, overrides deriving the run directory from the executable
    /// path. Needed when the binary runs from outside its work directory.
    pub run_directory: Option<PathBuf>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            executable_names: DEFAULT_EXECUTABLE_NAMES
                .iter()
                .map(|name| name.to_string())
                .collect(),
            run_directory: None,
        }
    }
}

/// Everything the presentation layer needs for one page render. Built new
/// per request; never cached.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationSnapshot {
    pub captured_at: chrono::DateTime<chrono::Utc>,
    pub process: Option<ProcessHandle>,
    pub layout: Option<RunLayout>,
    pub star1: Option<StarRecord>,
    pub star2: Option<StarRecord>,
    pub binary: Option<BinaryRecord>,
    /// Human-readable problems encountered while assembling.
    pub notes: Vec<String>,
}

impl SimulationSnapshot {
    fn empty() -> Self {
        Self {
            captured_at: chrono::Utc::now(),
            process: None,
            layout: None,
            star1: None,
            star2: None,
            binary: None,
            notes: Vec::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.process.is_some()
    }
}

/// Runs the whole pipeline once.
///
/// No process means an empty snapshot: the expected outcome between runs,
/// not a failure.
pub fn capture(config: &WatchConfig) -> SimulationSnapshot {
    let Some(process) = locate::find_simulation(&config.executable_names) else {
        debug!("simulation not running");
        return SimulationSnapshot::empty();
    };

    let root = match &config.run_directory {
        Some(dir) => dir.clone(),
        None => match process.exe.parent() {
            Some(parent) => parent.to_path_buf(),
            None => {
                let mut snapshot = SimulationSnapshot::empty();
                snapshot
                    .notes
                    .push(format!("cannot derive run directory from {}", process.exe.display()));
                snapshot.process = Some(process);
                return snapshot;
            }
        },
    };

    let mut snapshot = capture_from_root(&root);
    snapshot.process = Some(process);
    snapshot
}

/// Assembles the file-derived part of a snapshot from a known run
/// directory. Split from [`capture`] so fixture directories can be captured
/// without a live process.
pub fn capture_from_root(root: &Path) -> SimulationSnapshot {
    let mut snapshot = SimulationSnapshot::empty();

    let layout = match layout::resolve(root) {
        Ok(layout) => layout,
        Err(err) => {
            warn!(error = %err, root = %root.display(), "layout unresolved");
            snapshot.notes.push(err.to_string());
            return snapshot;
        }
    };

    match history::parse_star(&layout.star1_history) {
        Ok(rec) => snapshot.star1 = Some(rec),
        Err(err) => {
            warn!(error = %err, "star 1 history unreadable");
            snapshot.notes.push(err.to_string());
        }
    }

    if let Some(path) = &layout.star2_history {
        match history::parse_star(path) {
            Ok(rec) => snapshot.star2 = Some(rec),
            Err(err) => {
                warn!(error = %err, "star 2 history unreadable");
                snapshot.notes.push(err.to_string());
            }
        }
    }

    if let Some(path) = &layout.binary_history {
        match history::parse_binary(path) {
            Ok(mut rec) => {
                rec.mt_case = transfer_case_for(&rec, &snapshot);
                snapshot.binary = Some(rec);
            }
            Err(err) => {
                warn!(error = %err, "binary history unreadable");
                snapshot.notes.push(err.to_string());
            }
        }
    }

    snapshot.layout = Some(layout);
    snapshot
}

/// The donor index selects which star's overflow fraction and stage feed
/// the mass-transfer classification. An unparsed donor record means the
/// case cannot be derived this request.
fn transfer_case_for(binary: &BinaryRecord, snapshot: &SimulationSnapshot) -> MassTransferCase {
    let (overflow, donor) = if binary.donor_index == 1 {
        (binary.rel_overflow_1, snapshot.star1.as_ref())
    } else {
        (binary.rel_overflow_2, snapshot.star2.as_ref())
    };

    match donor {
        Some(star) => stage::mass_transfer_case(overflow, star.stage),
        None => MassTransferCase::NoMassTransfer,
    }
}
