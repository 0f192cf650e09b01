//! Provider boundary — trait, boundary records, and structured error types.
//!
//! The `SwimProvider` trait is the only I/O seam in the sampler. The real
//! implementation talks to SwimCloud over HTTP; tests swap in a mock. The
//! orchestrator never reacts to a raised error type — every provider failure
//! is converted to an empty result at the call site, counted, and the run
//! continues with degraded data.

pub mod circuit_breaker;
pub mod swimcloud;
pub mod throttle;

use thiserror::Error;

use crate::domain::{SwimmerId, TeamEntry, TeamId};

pub use circuit_breaker::CircuitBreaker;
pub use swimcloud::SwimCloudProvider;
pub use throttle::{NoThrottle, Throttle, UniformJitter};

/// One swimmer as listed on a team roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub id: SwimmerId,
    pub name: String,
}

/// One raw swim as returned by the provider, before any validation.
///
/// Every field is optional at this boundary; the collector decides what is
/// usable. A swim with no time string parses to the unusable sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSwim {
    pub time: Option<String>,
    pub meet_name: Option<String>,
    pub year: Option<i32>,
}

/// Structured error types for provider operations.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("not found: {what}")]
    NotFound { what: String },

    #[error("hard stop: provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("provider error: {0}")]
    Other(String),
}

/// Trait for swim-data providers.
///
/// Implementations handle the specifics of one data source. Any call may
/// fail or return empty; callers must treat both the same way.
pub trait SwimProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Teams competing in a division.
    fn college_teams(&self, division: &str) -> Result<Vec<TeamEntry>, ProviderError>;

    /// A team's roster for one gender and season.
    fn roster(
        &self,
        team: &TeamEntry,
        gender: &str,
        season: i32,
    ) -> Result<Vec<RosterEntry>, ProviderError>;

    /// All raw swims for a swimmer in one event.
    fn swimmer_times(&self, swimmer: SwimmerId, event: &str)
        -> Result<Vec<RawSwim>, ProviderError>;

    /// Ranking list of team ids, best first. May be unavailable.
    fn team_rankings(&self, gender: &str, season: i32) -> Result<Vec<TeamId>, ProviderError>;

    /// Whether the provider is currently willing to serve requests.
    fn is_available(&self) -> bool;
}

/// Progress callbacks for a collection run.
pub trait CollectProgress: Send {
    /// A division's collection pass is starting.
    fn on_division_start(&self, division: &str, target: usize, teams_selected: usize);

    /// A team's roster is about to be sampled.
    fn on_team_start(&self, division: &str, team: &str, quota: usize);

    /// A swimmer finished processing; `events_recorded` is 0 when the
    /// swimmer is dropped for having no usable times.
    fn on_swimmer_done(&self, swimmer: &str, events_recorded: usize);

    /// A division's collection pass finished.
    fn on_division_complete(&self, division: &str, collected: usize, target: usize);

    /// A provider call failed and the run is continuing with empty data.
    fn on_provider_failure(&self, context: &str, error: &ProviderError);

    /// The whole run finished.
    fn on_run_complete(&self, swimmers: usize, records: usize);
}

/// Progress reporter that prints to stdout, mirroring the interactive tool.
pub struct StdoutProgress;

impl CollectProgress for StdoutProgress {
    fn on_division_start(&self, division: &str, target: usize, teams_selected: usize) {
        println!("--- Collecting {target} swimmer(s) from {teams_selected} team(s) in {division} ---");
    }

    fn on_team_start(&self, _division: &str, team: &str, quota: usize) {
        println!("  - Getting {quota} swimmer(s) from {team}...");
    }

    fn on_swimmer_done(&self, swimmer: &str, events_recorded: usize) {
        if events_recorded == 0 {
            println!("    - {swimmer}: no usable times, dropped");
        } else {
            println!("    - {swimmer}: {events_recorded} event(s)");
        }
    }

    fn on_division_complete(&self, division: &str, collected: usize, target: usize) {
        println!("{division} complete: {collected}/{target} swimmer(s) collected");
    }

    fn on_provider_failure(&self, context: &str, error: &ProviderError) {
        eprintln!("  WARN: {context}: {error} — continuing with empty data");
    }

    fn on_run_complete(&self, swimmers: usize, records: usize) {
        println!("\nCollection complete: {swimmers} swimmer(s), {records} record(s)");
    }
}

/// Progress reporter that swallows everything. Used by tests and `plan`.
pub struct SilentProgress;

impl CollectProgress for SilentProgress {
    fn on_division_start(&self, _division: &str, _target: usize, _teams_selected: usize) {}
    fn on_team_start(&self, _division: &str, _team: &str, _quota: usize) {}
    fn on_swimmer_done(&self, _swimmer: &str, _events_recorded: usize) {}
    fn on_division_complete(&self, _division: &str, _collected: usize, _target: usize) {}
    fn on_provider_failure(&self, _context: &str, _error: &ProviderError) {}
    fn on_run_complete(&self, _swimmers: usize, _records: usize) {}
}
