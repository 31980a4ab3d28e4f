//! Host statistics for the dashboard.
//!
//! Covers the machine the simulation runs on, not the simulation itself.

use serde::Serialize;
use sysinfo::System;

#[derive(Debug, Clone, Default, Serialize)]
pub struct HostReport {
    pub hostname: String,
    pub uptime_hours: f64,
    pub cpu_model: String,
    pub core_count: usize,
    /// Usage percentage per core, in core order.
    pub per_core_load: Vec<f32>,
}

/// Samples CPU usage over the minimum measurement window. Blocks for that
/// window, so callers run it on a blocking thread.
pub fn collect() -> HostReport {
    let mut sys = System::new();
    sys.refresh_cpu();
    std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
    sys.refresh_cpu();

    let cpus = sys.cpus();
    HostReport {
        hostname: System::host_name().unwrap_or_default(),
        uptime_hours: System::uptime() as f64 / 3600.0,
        cpu_model: cpus
            .first()
            .map(|cpu| cpu.brand().to_string())
            .unwrap_or_default(),
        core_count: cpus.len(),
        per_core_load: cpus.iter().map(|cpu| cpu.cpu_usage()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_reports_every_core() {
        let report = collect();
        assert!(report.core_count > 0);
        assert_eq!(report.per_core_load.len(), report.core_count);
    }

    #[test]
    fn test_loads_are_sane() {
        let report = collect();
        for load in &report.per_core_load {
            assert!(load.is_finite());
            assert!(*load >= 0.0);
        }
    }
}
