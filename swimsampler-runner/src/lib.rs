//! SwimSampler Runner — collection orchestration, configuration, export.
//!
//! This crate builds on `swimsampler-core` to provide:
//! - The end-to-end collection pipeline (survey → apportion → select →
//!   sample → fetch → assemble)
//! - The `plan` stage, which stops after allocation for dry runs
//! - TOML run configuration with validation
//! - Artifact export (CSV records + versioned JSON manifest)

pub mod collector;
pub mod config;
pub mod export;

pub use collector::{
    allocate_teams, collect, division_targets, plan, CollectionPlan, CollectionResult,
    DivisionOutcome, DivisionPlan, FailureCounters, TeamPlan, SCHEMA_VERSION,
};
pub use config::{CollectConfig, ConfigError};
pub use export::{
    export_json, export_records_csv, import_json, load_artifacts, save_artifacts,
};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn collection_result_is_send_sync() {
        assert_send::<CollectionResult>();
        assert_sync::<CollectionResult>();
    }

    #[test]
    fn config_is_send_sync() {
        assert_send::<CollectConfig>();
        assert_sync::<CollectConfig>();
    }

    #[test]
    fn plan_types_are_send_sync() {
        assert_send::<CollectionPlan>();
        assert_sync::<CollectionPlan>();
        assert_send::<DivisionPlan>();
        assert_sync::<DivisionPlan>();
    }
}
