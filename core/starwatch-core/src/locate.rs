//! Simulation process discovery.
//!
//! One pass over the live process table, matching each entry's short
//! executable name against a candidate set. Same-user processes need no
//! elevated privileges; entries that cannot be inspected (permissions, exit
//! races) are skipped rather than failing the scan.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sysinfo::{ProcessRefreshKind, System, UpdateKind};
use tracing::debug;

/// Executable names the MESA family installs, most common first.
pub const DEFAULT_EXECUTABLE_NAMES: &[&str] = &["star", "binary", "rn"];

/// A live simulation process matched during discovery.
///
/// Found anew on every capture; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessHandle {
    /// The candidate name that matched the process-table entry.
    pub name: String,
    pub pid: u32,
    /// Absolute path of the executable image on disk.
    pub exe: PathBuf,
}

/// Scans the process table once and returns the first process whose short
/// executable name equals one of `candidates`.
///
/// `None` is the normal outcome when the simulation is not running; callers
/// render "not running" and nothing is logged above debug level.
pub fn find_simulation(candidates: &[String]) -> Option<ProcessHandle> {
    if candidates.is_empty() {
        return None;
    }

    let mut sys = System::new();
    sys.refresh_processes_specifics(ProcessRefreshKind::new().with_exe(UpdateKind::Always));
    find_in_table(&sys, candidates)
}

fn find_in_table(sys: &System, candidates: &[String]) -> Option<ProcessHandle> {
    for (pid, process) in sys.processes() {
        let name = process.name();
        if !candidates.iter().any(|candidate| candidate == name) {
            continue;
        }

        let exe = match process.exe() {
            Some(exe) => strip_deleted_suffix(exe),
            None => continue,
        };
        if exe.as_os_str().is_empty() {
            // Image path unreadable for this entry; keep scanning.
            continue;
        }

        debug!(
            pid = pid.as_u32(),
            name,
            exe = %exe.display(),
            "matched simulation process"
        );
        return Some(ProcessHandle {
            name: name.to_string(),
            pid: pid.as_u32(),
            exe,
        });
    }

    debug!("no simulation process in table");
    None
}

/// The kernel appends ` (deleted)` to the image link of an unlinked binary;
/// the on-disk path is everything before the suffix.
fn strip_deleted_suffix(exe: &Path) -> PathBuf {
    match exe.to_str().and_then(|s| s.strip_suffix(" (deleted)")) {
        Some(stripped) => PathBuf::from(stripped),
        None => exe.to_path_buf(),
    }
}
