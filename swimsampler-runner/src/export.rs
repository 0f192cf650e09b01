//! Artifact export — CSV records and the JSON run manifest.
//!
//! A run saves two artifacts under a timestamped directory:
//! - `manifest.json` — the full `CollectionResult` with schema versioning
//! - `swims.csv` — the flat records for external analysis tools
//!
//! Unknown manifest schema versions are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use swimsampler_core::domain::SwimRecord;

use crate::collector::{CollectionResult, SCHEMA_VERSION};

// ─── JSON manifest ──────────────────────────────────────────────────

/// Serialize a `CollectionResult` to pretty JSON.
pub fn export_json(result: &CollectionResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize CollectionResult to JSON")
}

/// Deserialize a `CollectionResult`, rejecting newer schema versions.
pub fn import_json(json: &str) -> Result<CollectionResult> {
    let result: CollectionResult =
        serde_json::from_str(json).context("failed to deserialize CollectionResult from JSON")?;
    if result.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            result.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(result)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export the flat records as CSV, one row per (swimmer, event).
///
/// Columns: swimmer_id, swimmer_name, team_name, division, event,
/// time_seconds, time_str, meet_name, year
pub fn export_records_csv(records: &[SwimRecord]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "swimmer_id",
        "swimmer_name",
        "team_name",
        "division",
        "event",
        "time_seconds",
        "time_str",
        "meet_name",
        "year",
    ])?;

    for r in records {
        wtr.write_record([
            &r.swimmer_id.to_string(),
            &r.swimmer_name,
            &r.team_name,
            &r.division,
            &r.event,
            &format!("{:.2}", r.time_seconds),
            &r.time_str,
            &r.meet_name,
            &r.year.to_string(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the artifact set for one run.
///
/// Creates `collection_{timestamp}/` under `output_dir` containing
/// `manifest.json` and `swims.csv`, and returns the created path.
pub fn save_artifacts(result: &CollectionResult, output_dir: &Path) -> Result<PathBuf> {
    let dirname = format!(
        "collection_{}",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    let json = export_json(result)?;
    std::fs::write(run_dir.join("manifest.json"), &json)?;

    let records_csv = export_records_csv(&result.records)?;
    std::fs::write(run_dir.join("swims.csv"), &records_csv)?;

    Ok(run_dir)
}

/// Load a `CollectionResult` back from an artifact directory.
pub fn load_artifacts(dir: &Path) -> Result<CollectionResult> {
    let manifest_path = dir.join("manifest.json");
    let json = std::fs::read_to_string(&manifest_path)
        .with_context(|| format!("failed to read {}", manifest_path.display()))?;
    import_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::{DivisionOutcome, FailureCounters};
    use crate::config::CollectConfig;
    use std::collections::BTreeMap;
    use swimsampler_core::domain::{BestTime, Swimmer, SwimmerId, TeamId};

    fn sample_swimmer() -> Swimmer {
        let mut times = BTreeMap::new();
        times.insert(
            "100 Breast".to_string(),
            BestTime {
                seconds: 62.45,
                display: "1:02.45".into(),
                meet_name: "Invite".into(),
                year: 2024,
            },
        );
        Swimmer {
            id: SwimmerId(9001),
            name: "B. Backstroke".into(),
            team_id: TeamId(12),
            team_name: "Tech".into(),
            division: "Division 2".into(),
            times,
        }
    }

    fn sample_result() -> CollectionResult {
        let swimmer = sample_swimmer();
        let records = swimmer.to_records();
        CollectionResult {
            schema_version: SCHEMA_VERSION,
            config: CollectConfig::default(),
            divisions: vec![DivisionOutcome {
                division: "Division 2".into(),
                population: 300,
                target: 1,
                teams_selected: 1,
                collected: 1,
            }],
            counters: FailureCounters::default(),
            targets_exact: true,
            halted_early: false,
            swimmers: vec![swimmer],
            records,
        }
    }

    #[test]
    fn json_roundtrip() {
        let original = sample_result();
        let json = export_json(&original).unwrap();
        let restored = import_json(&json).unwrap();

        assert_eq!(restored.schema_version, SCHEMA_VERSION);
        assert_eq!(restored.swimmers.len(), 1);
        assert_eq!(restored.records, original.records);
        assert_eq!(restored.config, original.config);
        assert_eq!(restored.divisions, original.divisions);
    }

    #[test]
    fn json_rejects_unknown_version() {
        let mut result = sample_result();
        result.schema_version = 99;
        let json = export_json(&result).unwrap();
        let err = import_json(&json);
        assert!(err.is_err());
        assert!(err
            .unwrap_err()
            .to_string()
            .contains("unsupported schema version 99"));
    }

    #[test]
    fn csv_has_expected_header_and_rows() {
        let result = sample_result();
        let csv = export_records_csv(&result.records).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "swimmer_id,swimmer_name,team_name,division,event,time_seconds,time_str,meet_name,year"
        );
        assert!(lines[1].contains("9001"));
        assert!(lines[1].contains("1:02.45"));
        assert!(lines[1].contains("62.45"));
    }

    #[test]
    fn csv_empty_records() {
        let csv = export_records_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn save_load_artifacts_roundtrip() {
        let result = sample_result();
        let dir = tempfile::tempdir().unwrap();
        let run_dir = save_artifacts(&result, dir.path()).unwrap();

        assert!(run_dir.join("manifest.json").exists());
        assert!(run_dir.join("swims.csv").exists());

        let loaded = load_artifacts(&run_dir).unwrap();
        assert_eq!(loaded.records, result.records);
        assert_eq!(loaded.schema_version, SCHEMA_VERSION);
    }
}
