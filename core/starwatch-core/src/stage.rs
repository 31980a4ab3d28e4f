//! Evolutionary-stage and mass-transfer-case classification.
//!
//! Pure functions over the scalar quantities extracted from the history
//! files. The thresholds form a priority cascade: each test is only
//! meaningful after the ones before it have failed, so the order must not
//! be rearranged.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Central H1 mass fraction above which the star is still on the main
/// sequence.
pub const H1_DEPLETION: f64 = 1.0e-4;

/// Central He4 mass fraction below which the core counts as helium-depleted.
pub const HE4_DEPLETION: f64 = 1.0e-4;

/// log10 central temperature (K) marking helium ignition.
pub const LOG_T_HELIUM_IGNITION: f64 = 7.95;

/// Chandrasekhar mass in solar masses.
pub const CHANDRASEKHAR_MASS: f64 = 1.4;

/// Discrete evolutionary stage of a single star.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EvolutionaryStage {
    #[default]
    MainSequence,
    /// Post-main-sequence but the core has not yet ignited helium.
    HydrogenShellBurning,
    CoreHeliumBurning,
    HeliumDepleted,
    WhiteDwarf,
    /// Degenerate core above the Chandrasekhar mass: an electron-capture
    /// supernova progenitor rather than a stable remnant.
    EcsnProgenitor,
}

impl fmt::Display for EvolutionaryStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EvolutionaryStage::MainSequence => "main sequence",
            EvolutionaryStage::HydrogenShellBurning => "hydrogen shell burning",
            EvolutionaryStage::CoreHeliumBurning => "core helium burning",
            EvolutionaryStage::HeliumDepleted => "helium depleted",
            EvolutionaryStage::WhiteDwarf => "white dwarf",
            EvolutionaryStage::EcsnProgenitor => "ECSN progenitor",
        };
        f.write_str(label)
    }
}

/// Which mass-transfer case a binary is in, keyed to the donor's stage at
/// the onset of Roche-lobe overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MassTransferCase {
    #[default]
    NoMassTransfer,
    CaseA,
    EarlyCaseB,
    CaseB,
    CaseC,
}

impl fmt::Display for MassTransferCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MassTransferCase::NoMassTransfer => "none",
            MassTransferCase::CaseA => "case A",
            MassTransferCase::EarlyCaseB => "early case B",
            MassTransferCase::CaseB => "case B",
            MassTransferCase::CaseC => "case C",
        };
        f.write_str(label)
    }
}

/// Classifies a star's evolutionary stage from its central conditions.
///
/// The cascade: hydrogen still burning in the core beats everything else;
/// below the helium-ignition temperature the core is either inert helium or
/// already degenerate; at or above it, the helium abundance decides between
/// core burning and depletion.
pub fn classify(mass: f64, center_h1: f64, center_he4: f64, log_center_t: f64) -> EvolutionaryStage {
    if center_h1 > H1_DEPLETION {
        return EvolutionaryStage::MainSequence;
    }

    if log_center_t < LOG_T_HELIUM_IGNITION {
        if center_he4 < HE4_DEPLETION {
            return if mass < CHANDRASEKHAR_MASS {
                EvolutionaryStage::WhiteDwarf
            } else {
                EvolutionaryStage::EcsnProgenitor
            };
        }
        return EvolutionaryStage::HydrogenShellBurning;
    }

    if center_he4 > HE4_DEPLETION {
        EvolutionaryStage::CoreHeliumBurning
    } else if mass < CHANDRASEKHAR_MASS {
        EvolutionaryStage::WhiteDwarf
    } else {
        EvolutionaryStage::HeliumDepleted
    }
}

/// Classifies the mass-transfer case from the donor's relative Roche-lobe
/// overflow and its evolutionary stage.
///
/// A negative overflow means the donor sits inside its Roche lobe: no mass
/// transfer, whatever the stage.
pub fn mass_transfer_case(rel_overflow: f64, donor_stage: EvolutionaryStage) -> MassTransferCase {
    if rel_overflow < 0.0 {
        return MassTransferCase::NoMassTransfer;
    }

    match donor_stage {
        EvolutionaryStage::MainSequence => MassTransferCase::CaseA,
        EvolutionaryStage::HydrogenShellBurning => MassTransferCase::EarlyCaseB,
        EvolutionaryStage::CoreHeliumBurning => MassTransferCase::CaseB,
        _ => MassTransferCase::CaseC,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hydrogen_rich_core_is_main_sequence() {
        assert_eq!(
            classify(1.0, 0.5, 0.0, 7.0),
            EvolutionaryStage::MainSequence
        );
    }

    #[test]
    fn test_cool_depleted_low_mass_core_is_white_dwarf() {
        assert_eq!(classify(1.0, 1.0e-6, 1.0e-5, 7.0), EvolutionaryStage::WhiteDwarf);
    }

    #[test]
    fn test_cool_depleted_massive_core_is_ecsn_progenitor() {
        assert_eq!(
            classify(2.0, 1.0e-6, 1.0e-5, 7.0),
            EvolutionaryStage::EcsnProgenitor
        );
    }

    #[test]
    fn test_cool_helium_rich_core_is_shell_burning() {
        assert_eq!(
            classify(1.0, 1.0e-6, 0.98, 7.0),
            EvolutionaryStage::HydrogenShellBurning
        );
    }

    #[test]
    fn test_hot_helium_rich_core_is_core_helium_burning() {
        assert_eq!(
            classify(1.0, 1.0e-6, 0.5, 8.5),
            EvolutionaryStage::CoreHeliumBurning
        );
    }

    #[test]
    fn test_hot_depleted_low_mass_core_is_white_dwarf() {
        assert_eq!(
            classify(1.0, 1.0e-6, 1.0e-5, 8.5),
            EvolutionaryStage::WhiteDwarf
        );
    }

    #[test]
    fn test_hot_depleted_massive_core_is_helium_depleted() {
        assert_eq!(
            classify(2.0, 1.0e-6, 1.0e-5, 8.5),
            EvolutionaryStage::HeliumDepleted
        );
    }

    #[test]
    fn test_main_sequence_test_precedes_temperature_test() {
        // Hydrogen-rich but hot: the H1 test wins because the cascade is
        // ordered, not a set of independent conditions.
        assert_eq!(
            classify(1.0, 0.7, 0.28, 8.5),
            EvolutionaryStage::MainSequence
        );
    }

    #[test]
    fn test_negative_overflow_means_no_transfer() {
        assert_eq!(
            mass_transfer_case(-0.1, EvolutionaryStage::MainSequence),
            MassTransferCase::NoMassTransfer
        );
        assert_eq!(
            mass_transfer_case(-0.1, EvolutionaryStage::CoreHeliumBurning),
            MassTransferCase::NoMassTransfer
        );
    }

    #[test]
    fn test_main_sequence_donor_is_case_a() {
        assert_eq!(
            mass_transfer_case(0.1, EvolutionaryStage::MainSequence),
            MassTransferCase::CaseA
        );
    }

    #[test]
    fn test_shell_burning_donor_is_early_case_b() {
        assert_eq!(
            mass_transfer_case(0.05, EvolutionaryStage::HydrogenShellBurning),
            MassTransferCase::EarlyCaseB
        );
    }

    #[test]
    fn test_core_helium_burning_donor_is_case_b() {
        assert_eq!(
            mass_transfer_case(0.02, EvolutionaryStage::CoreHeliumBurning),
            MassTransferCase::CaseB
        );
    }

    #[test]
    fn test_evolved_donor_is_case_c() {
        assert_eq!(
            mass_transfer_case(0.3, EvolutionaryStage::HeliumDepleted),
            MassTransferCase::CaseC
        );
        assert_eq!(
            mass_transfer_case(0.3, EvolutionaryStage::WhiteDwarf),
            MassTransferCase::CaseC
        );
    }

    #[test]
    fn test_zero_overflow_counts_as_transfer() {
        // The boundary sits at exactly zero: touching the Roche lobe is
        // already overflow.
        assert_eq!(
            mass_transfer_case(0.0, EvolutionaryStage::MainSequence),
            MassTransferCase::CaseA
        );
    }
}
