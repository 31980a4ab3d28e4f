//! History-file parsing.
//!
//! The on-disk format is a fixed external contract shared by every
//! configuration of the simulation family: row 2 holds whitespace-separated
//! header names, row 3 the corresponding values, row 6 the column names of
//! the data table, and every later row records one simulation step. Only the
//! six preamble rows and the final data row are ever read: the preamble
//! sequentially, the final row through [`crate::tail`].
//!
//! Different configurations emit different column subsets, so extraction is
//! by name: unrecognized columns are ignored and missing recognized columns
//! leave their fields at zero. A recognized column whose value fails type
//! conversion aborts that one record; sibling records in the same request
//! are unaffected.

use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, WatchError};
use crate::stage::{self, EvolutionaryStage, MassTransferCase};
use crate::tail;

const HEADER_NAMES_ROW: usize = 2;
const HEADER_VALUES_ROW: usize = 3;
const COLUMN_NAMES_ROW: usize = 6;

/// Scalar snapshot of one simulated star, taken from the newest row of its
/// history file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StarRecord {
    /// Format version from the file header (written quoted in the file).
    pub version: i64,
    /// Generation date from the file header, as written.
    pub date: String,
    pub model_number: i64,
    pub num_zones: i64,
    /// Current mass in solar masses.
    pub mass: f64,
    /// log10 |mass-loss rate|.
    pub log_mdot: f64,
    /// Age in years.
    pub age: f64,
    pub center_h1: f64,
    pub center_he4: f64,
    pub log_center_t: f64,
    pub num_retries: i64,
    pub num_iters: i64,
    /// Wall-clock runtime in minutes. The file records seconds; the
    /// conversion happens on ingestion.
    pub elapsed_minutes: f64,
    pub stage: EvolutionaryStage,
}

/// Scalar snapshot of the orbital system in a binary run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BinaryRecord {
    pub model_number: i64,
    /// Initial donor mass in solar masses, from the file header.
    pub initial_donor_mass: f64,
    /// Initial accretor mass in solar masses, from the file header.
    pub initial_accretor_mass: f64,
    /// Initial orbital period in days, from the file header.
    pub initial_period_days: f64,
    pub age: f64,
    pub star1_mass: f64,
    pub star2_mass: f64,
    pub period_days: f64,
    /// Which star is donating mass (1 or 2).
    pub donor_index: i64,
    /// Which star is modelled as a point mass; 0 when both are resolved.
    pub point_mass_index: i64,
    pub rel_overflow_1: f64,
    pub rel_overflow_2: f64,
    /// Filled in during snapshot assembly, since it needs the donor's
    /// stage, which lives in the star records.
    pub mt_case: MassTransferCase,
}

impl BinaryRecord {
    /// A zero point-mass index means both components are resolved stars.
    pub fn has_two_stars(&self) -> bool {
        self.point_mass_index == 0
    }
}

/// Parses the current state of a single star from its history file.
pub fn parse_star(path: &Path) -> Result<StarRecord> {
    let preamble = read_preamble(path)?;
    let mut rec = StarRecord::default();

    for (name, value) in preamble.header_names.iter().zip(&preamble.header_values) {
        match name.as_str() {
            // The format version is written as a quoted integer.
            "version_number" => rec.version = parse_int(value.trim_matches('"'), name, path)?,
            "date" => rec.date = value.clone(),
            _ => {}
        }
    }

    let values = fields(&tail::last_line(path)?);
    for (name, value) in preamble.column_names.iter().zip(&values) {
        apply_star_column(&mut rec, name, value, path)?;
    }

    rec.stage = stage::classify(rec.mass, rec.center_h1, rec.center_he4, rec.log_center_t);
    debug!(
        path = %path.display(),
        model = rec.model_number,
        stage = %rec.stage,
        "parsed star history"
    );
    Ok(rec)
}

/// Parses the current state of the orbital system from the binary-summary
/// history file. `mt_case` stays at its default here; see
/// [`crate::snapshot`].
pub fn parse_binary(path: &Path) -> Result<BinaryRecord> {
    let preamble = read_preamble(path)?;
    let mut rec = BinaryRecord::default();

    for (name, value) in preamble.header_names.iter().zip(&preamble.header_values) {
        match name.as_str() {
            "initial_don_mass" => rec.initial_donor_mass = parse_float(value, name, path)?,
            "initial_acc_mass" => rec.initial_accretor_mass = parse_float(value, name, path)?,
            "initial_period_days" => rec.initial_period_days = parse_float(value, name, path)?,
            _ => {}
        }
    }

    let values = fields(&tail::last_line(path)?);
    for (name, value) in preamble.column_names.iter().zip(&values) {
        apply_binary_column(&mut rec, name, value, path)?;
    }

    debug!(
        path = %path.display(),
        model = rec.model_number,
        donor = rec.donor_index,
        "parsed binary history"
    );
    Ok(rec)
}

/// One match arm per recognized column; unrecognized names fall through.
fn apply_star_column(rec: &mut StarRecord, name: &str, value: &str, path: &Path) -> Result<()> {
    match name {
        "model_number" => rec.model_number = parse_int(value, name, path)?,
        "num_zones" => rec.num_zones = parse_int(value, name, path)?,
        "star_mass" => rec.mass = parse_float(value, name, path)?,
        "log_abs_mdot" => rec.log_mdot = parse_float(value, name, path)?,
        "star_age" => rec.age = parse_float(value, name, path)?,
        "center_h1" => rec.center_h1 = parse_float(value, name, path)?,
        "center_he4" => rec.center_he4 = parse_float(value, name, path)?,
        // Older configurations abbreviate the column name.
        "log_center_T" | "log_cntr_T" => rec.log_center_t = parse_float(value, name, path)?,
        "num_retries" => rec.num_retries = parse_int(value, name, path)?,
        "num_iters" => rec.num_iters = parse_int(value, name, path)?,
        "elapsed_time" => rec.elapsed_minutes = parse_float(value, name, path)? / 60.0,
        _ => {}
    }
    Ok(())
}

fn apply_binary_column(rec: &mut BinaryRecord, name: &str, value: &str, path: &Path) -> Result<()> {
    match name {
        "model_number" => rec.model_number = parse_int(value, name, path)?,
        "age" => rec.age = parse_float(value, name, path)?,
        "period_days" => rec.period_days = parse_float(value, name, path)?,
        "star_1_mass" => rec.star1_mass = parse_float(value, name, path)?,
        "star_2_mass" => rec.star2_mass = parse_float(value, name, path)?,
        "donor_index" => rec.donor_index = parse_int(value, name, path)?,
        "point_mass_index" => rec.point_mass_index = parse_int(value, name, path)?,
        "rl_relative_overflow_1" => rec.rel_overflow_1 = parse_float(value, name, path)?,
        "rl_relative_overflow_2" => rec.rel_overflow_2 = parse_float(value, name, path)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Default)]
struct Preamble {
    header_names: Vec<String>,
    header_values: Vec<String>,
    column_names: Vec<String>,
}

/// Reads the six fixed preamble rows. A file that ends before the
/// column-name row (or whose column row is blank) breaks the format
/// contract and is rejected rather than guessed at.
fn read_preamble(path: &Path) -> Result<Preamble> {
    let file = fs_err::File::open(path).map_err(|source| WatchError::FileUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let mut preamble = Preamble::default();
    for (index, line) in reader.lines().take(COLUMN_NAMES_ROW).enumerate() {
        let line = line.map_err(|source| WatchError::FileUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        match index + 1 {
            HEADER_NAMES_ROW => preamble.header_names = fields(&line),
            HEADER_VALUES_ROW => preamble.header_values = fields(&line),
            COLUMN_NAMES_ROW => preamble.column_names = fields(&line),
            _ => {}
        }
    }

    if preamble.column_names.is_empty() {
        return Err(WatchError::TruncatedHistory(path.to_path_buf()));
    }
    Ok(preamble)
}

fn fields(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

fn parse_int(value: &str, column: &str, path: &Path) -> Result<i64> {
    value.parse().map_err(|_| malformed(path, column, value))
}

fn parse_float(value: &str, column: &str, path: &Path) -> Result<f64> {
    value.parse().map_err(|_| malformed(path, column, value))
}

fn malformed(path: &Path, column: &str, value: &str) -> WatchError {
    WatchError::MalformedField {
        path: path.to_path_buf(),
        column: column.to_string(),
        value: value.to_string(),
    }
}
