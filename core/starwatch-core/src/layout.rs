//! History-file layout resolution.
//!
//! The same simulation family self-reports its output locations
//! inconsistently across configurations: single-star runs write under
//! `LOGS/`, binary runs variously under `LOGS1`/`LOGS2`, `LOGS_companion`,
//! or with star-specific filenames. Resolution tries the known conventions
//! in a fixed priority order, most specific first, so the outcome is
//! deterministic whenever several candidates exist.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, WatchError};

const STAR_HISTORY: &str = "history.data";
const BINARY_HISTORY: &str = "binary_history.data";

const BINARY_LOG_DIR: &str = "LOGS_binary";
const STAR_LOG_DIR: &str = "LOGS";
const STAR1_LOG_DIR: &str = "LOGS1";
const STAR2_LOG_DIR: &str = "LOGS2";
const COMPANION_LOG_DIR: &str = "LOGS_companion";

/// Resolved on-disk layout of a simulation's output files.
///
/// When `is_binary` is false only `star1_history` is meaningful. When true,
/// `binary_history` is always present as well, and `star2_history` may still
/// be absent for star + point-mass runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunLayout {
    pub root: PathBuf,
    pub is_binary: bool,
    pub star1_history: PathBuf,
    pub star2_history: Option<PathBuf>,
    pub binary_history: Option<PathBuf>,
}

/// Decides the evolution topology under `root` and resolves concrete paths.
///
/// The star-1 history is required; if no naming convention matches, the
/// layout is unresolved and the run cannot be displayed. A missing star-2
/// history in a binary run is not an error.
pub fn resolve(root: &Path) -> Result<RunLayout> {
    let binary_history = find_binary_history(root);
    let is_binary = binary_history.is_some();
    debug!(
        root = %root.display(),
        is_binary,
        "resolving history layout"
    );

    let star1_history = first_existing(&[
        root.join(STAR_LOG_DIR).join(STAR_HISTORY),
        root.join(STAR1_LOG_DIR).join(STAR_HISTORY),
        root.join(STAR1_LOG_DIR).join("primary_history.data"),
        root.join(COMPANION_LOG_DIR).join(STAR_HISTORY),
    ])
    .ok_or_else(|| WatchError::LayoutUnresolved(root.to_path_buf()))?;

    let star2_history = if is_binary {
        let found = first_existing(&[
            root.join(STAR2_LOG_DIR).join(STAR_HISTORY),
            root.join(STAR2_LOG_DIR).join("secondary_history.data"),
        ]);
        if found.is_none() {
            info!("no star 2 history; assuming star + point-mass evolution");
        }
        found
    } else {
        None
    };

    Ok(RunLayout {
        root: root.to_path_buf(),
        is_binary,
        star1_history,
        star2_history,
        binary_history,
    })
}

/// The binary-summary file sits directly under the run directory, or one
/// level down in `LOGS_binary/`. Its existence is also the topology test.
fn find_binary_history(root: &Path) -> Option<PathBuf> {
    first_existing(&[
        root.join(BINARY_HISTORY),
        root.join(BINARY_LOG_DIR).join(BINARY_HISTORY),
    ])
}

fn first_existing(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|path| path.is_file()).cloned()
}
