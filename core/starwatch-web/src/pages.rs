//! Minimal HTML rendering of a snapshot.
//!
//! No template engine: the page is a handful of tables built in code.

use starwatch_core::{BinaryRecord, SimulationSnapshot, StarRecord};

use crate::host::HostReport;

pub fn dashboard(snapshot: &SimulationSnapshot, host: &HostReport) -> String {
    let mut page = String::with_capacity(4096);
    page.push_str("<!doctype html><html><head><meta charset=\"utf-8\"><title>starwatch</title>");
    page.push_str(
        "<style>body{font-family:monospace;margin:2em}table{border-collapse:collapse;margin:0.5em 0}\
         td,th{border:1px solid #999;padding:0.3em 0.6em;text-align:left}\
         h2{margin-top:1.5em}.note{color:#a00}</style>",
    );
    page.push_str("</head><body><h1>starwatch</h1>");

    render_host(&mut page, host);
    render_simulation(&mut page, snapshot);

    page.push_str(&format!(
        "<p>captured {}</p>",
        snapshot.captured_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    page.push_str("</body></html>");
    page
}

fn render_host(page: &mut String, host: &HostReport) {
    page.push_str("<h2>host</h2><table>");
    row(page, "hostname", &escape(&host.hostname));
    row(page, "uptime", &format!("{:.1} h", host.uptime_hours));
    row(page, "cpu", &escape(&host.cpu_model));
    row(page, "cores", &host.core_count.to_string());
    let loads: Vec<String> = host
        .per_core_load
        .iter()
        .map(|load| format!("{:.1}%", load))
        .collect();
    row(page, "load", &loads.join(" "));
    page.push_str("</table>");
}

fn render_simulation(page: &mut String, snapshot: &SimulationSnapshot) {
    page.push_str("<h2>simulation</h2>");

    for note in &snapshot.notes {
        page.push_str(&format!("<p class=\"note\">{}</p>", escape(note)));
    }

    let Some(process) = &snapshot.process else {
        page.push_str("<p>simulation not running</p>");
        render_records(page, snapshot);
        return;
    };

    page.push_str("<table>");
    row(page, "executable", &escape(&process.name));
    row(page, "pid", &process.pid.to_string());
    row(page, "path", &escape(&process.exe.display().to_string()));
    if let Some(layout) = &snapshot.layout {
        row(
            page,
            "topology",
            if layout.is_binary { "binary" } else { "single star" },
        );
    }
    page.push_str("</table>");

    render_records(page, snapshot);
}

fn render_records(page: &mut String, snapshot: &SimulationSnapshot) {
    if let Some(star) = &snapshot.star1 {
        render_star(page, "star 1", star);
    }
    if let Some(star) = &snapshot.star2 {
        render_star(page, "star 2", star);
    }
    if let Some(binary) = &snapshot.binary {
        render_binary(page, binary);
    }
}

fn render_star(page: &mut String, title: &str, star: &StarRecord) {
    page.push_str(&format!("<h2>{}</h2><table>", title));
    row(page, "stage", &star.stage.to_string());
    row(page, "model", &star.model_number.to_string());
    row(page, "zones", &star.num_zones.to_string());
    row(page, "mass [Msun]", &format!("{:.4}", star.mass));
    row(page, "log |mdot|", &format!("{:.3}", star.log_mdot));
    row(page, "age [yr]", &format!("{:.4e}", star.age));
    row(page, "center h1", &format!("{:.4e}", star.center_h1));
    row(page, "center he4", &format!("{:.4e}", star.center_he4));
    row(page, "log Tc", &format!("{:.3}", star.log_center_t));
    row(page, "retries", &star.num_retries.to_string());
    row(page, "iterations", &star.num_iters.to_string());
    row(page, "runtime [min]", &format!("{:.1}", star.elapsed_minutes));
    row(page, "format version", &star.version.to_string());
    row(page, "generated", &escape(&star.date));
    page.push_str("</table>");
}

fn render_binary(page: &mut String, binary: &BinaryRecord) {
    page.push_str("<h2>binary system</h2><table>");
    row(page, "mass transfer", &binary.mt_case.to_string());
    row(page, "model", &binary.model_number.to_string());
    row(page, "age [yr]", &format!("{:.4e}", binary.age));
    row(page, "period [d]", &format!("{:.4}", binary.period_days));
    row(
        page,
        "masses [Msun]",
        &format!("{:.4} + {:.4}", binary.star1_mass, binary.star2_mass),
    );
    row(
        page,
        "initial masses [Msun]",
        &format!(
            "{:.4} + {:.4}",
            binary.initial_donor_mass, binary.initial_accretor_mass
        ),
    );
    row(
        page,
        "initial period [d]",
        &format!("{:.4}", binary.initial_period_days),
    );
    row(page, "donor", &format!("star {}", binary.donor_index));
    row(
        page,
        "companion",
        if binary.has_two_stars() {
            "resolved star"
        } else {
            "point mass"
        },
    );
    row(
        page,
        "rel. RLOF",
        &format!("{:.4} / {:.4}", binary.rel_overflow_1, binary.rel_overflow_2),
    );
    page.push_str("</table>");
}

fn row(page: &mut String, label: &str, value: &str) {
    page.push_str(&format!("<tr><th>{}</th><td>{}</td></tr>", label, value));
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use starwatch_core::snapshot;
    use std::path::Path;
    use tempfile::TempDir;

    fn fixture_host() -> HostReport {
        HostReport {
            hostname: "workhorse".to_string(),
            uptime_hours: 12.5,
            cpu_model: "Fixture CPU".to_string(),
            core_count: 2,
            per_core_load: vec![3.5, 97.0],
        }
    }

    fn write_star_history(root: &Path, relative: &str, columns: &str, row: &str) {
        let path = root.join(relative);
        fs_err::create_dir_all(path.parent().unwrap()).unwrap();
        let contents = format!(
            "fixture run\nversion_number date\n\"15140\" 20260807\n\n\n{}\n{}\n",
            columns, row
        );
        fs_err::write(&path, contents).unwrap();
    }

    #[test]
    fn test_dashboard_shows_not_running() {
        let dir = TempDir::new().unwrap();
        let snapshot = snapshot::capture_from_root(dir.path());
        let page = dashboard(&snapshot, &fixture_host());

        assert!(page.contains("simulation not running"));
        assert!(page.contains("workhorse"));
    }

    #[test]
    fn test_dashboard_renders_star_record() {
        let dir = TempDir::new().unwrap();
        write_star_history(
            dir.path(),
            "LOGS/history.data",
            "model_number star_mass center_h1",
            "42 1.0 0.7",
        );

        let snapshot = snapshot::capture_from_root(dir.path());
        let page = dashboard(&snapshot, &fixture_host());

        assert!(page.contains("star 1"));
        assert!(page.contains("<td>42</td>"));
        assert!(page.contains("main sequence"));
    }

    #[test]
    fn test_notes_are_escaped() {
        let dir = TempDir::new().unwrap();
        let mut snapshot = snapshot::capture_from_root(dir.path());
        snapshot.notes.push("<script>alert(1)</script>".to_string());

        let page = dashboard(&snapshot, &fixture_host());
        assert!(!page.contains("<script>"));
        assert!(page.contains("&lt;script&gt;"));
    }
}
