//! End-to-end collector tests against a mock provider.
//!
//! These exercise the whole pipeline — survey, division apportionment, team
//! selection, team apportionment, roster sampling, time collection, result
//! assembly — with no network and a fixed seed.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use swimsampler_core::domain::{SwimmerId, TeamEntry, TeamId};
use swimsampler_core::provider::{
    ProviderError, RawSwim, RosterEntry, SilentProgress, SwimProvider,
};
use swimsampler_runner::{collect, plan, CollectConfig};

// ─── Mock provider ──────────────────────────────────────────────────

#[derive(Default)]
struct MockProvider {
    teams: HashMap<String, Vec<TeamEntry>>,
    rosters: HashMap<TeamId, Vec<RosterEntry>>,
    times: HashMap<(SwimmerId, String), Vec<RawSwim>>,
    /// None → the rankings call errors; Some(vec) → that ranking.
    rankings: Option<Vec<TeamId>>,
    available: bool,
    roster_calls: Mutex<usize>,
}

impl MockProvider {
    fn new() -> Self {
        Self {
            available: true,
            ..Self::default()
        }
    }

    fn team(&mut self, division: &str, id: u32, name: &str) {
        self.teams
            .entry(division.to_string())
            .or_default()
            .push(TeamEntry {
                id: TeamId(id),
                name: name.into(),
            });
    }

    fn add_roster(&mut self, team: u32, swimmers: &[(u32, &str)]) {
        self.rosters.insert(
            TeamId(team),
            swimmers
                .iter()
                .map(|&(id, name)| RosterEntry {
                    id: SwimmerId(id),
                    name: name.into(),
                })
                .collect(),
        );
    }

    fn swim(&mut self, swimmer: u32, event: &str, time: &str) {
        self.times
            .entry((SwimmerId(swimmer), event.to_string()))
            .or_default()
            .push(RawSwim {
                time: Some(time.into()),
                meet_name: Some("Mock Invite".into()),
                year: Some(2024),
            });
    }
}

impl SwimProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn college_teams(&self, division: &str) -> Result<Vec<TeamEntry>, ProviderError> {
        Ok(self.teams.get(division).cloned().unwrap_or_default())
    }

    fn roster(
        &self,
        team: &TeamEntry,
        _gender: &str,
        _season: i32,
    ) -> Result<Vec<RosterEntry>, ProviderError> {
        *self.roster_calls.lock().unwrap() += 1;
        Ok(self.rosters.get(&team.id).cloned().unwrap_or_default())
    }

    fn swimmer_times(
        &self,
        swimmer: SwimmerId,
        event: &str,
    ) -> Result<Vec<RawSwim>, ProviderError> {
        Ok(self
            .times
            .get(&(swimmer, event.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    fn team_rankings(&self, _gender: &str, _season: i32) -> Result<Vec<TeamId>, ProviderError> {
        match &self.rankings {
            Some(ranked) => Ok(ranked.clone()),
            None => Err(ProviderError::NetworkUnreachable("rankings down".into())),
        }
    }

    fn is_available(&self) -> bool {
        self.available
    }
}

// ─── Fixtures ───────────────────────────────────────────────────────

fn test_config() -> CollectConfig {
    CollectConfig {
        total_sample_size: 5,
        priority_events: vec!["100 Free".into(), "100 Breast".into()],
        divisions: vec!["Division 1".into(), "Division 2".into()],
        ranked_division: "Division 1".into(),
        min_per_division: 1,
        seed: 42,
        ..CollectConfig::default()
    }
}

/// 2 divisions, 4 teams, 10 swimmers. Division 1 has a ranking list whose
/// stride pick is team 2.
fn populated_provider() -> MockProvider {
    let mut p = MockProvider::new();
    p.team("Division 1", 1, "Alpha");
    p.team("Division 1", 2, "Bravo");
    p.team("Division 2", 3, "Charlie");
    p.team("Division 2", 4, "Delta");

    p.add_roster(1, &[(101, "S101"), (102, "S102"), (103, "S103")]);
    p.add_roster(2, &[(104, "S104"), (105, "S105")]);
    p.add_roster(3, &[(106, "S106"), (107, "S107")]);
    p.add_roster(4, &[(108, "S108"), (109, "S109"), (110, "S110")]);

    // Ranking list leads with team 2: one team needed → stride picks it.
    p.rankings = Some(vec![TeamId(2), TeamId(1)]);

    p.swim(104, "100 Free", "48.32");
    p.swim(104, "100 Breast", "1:01.50");
    // Swimmer 105 only ever produced an unparseable placeholder.
    p.swim(105, "100 Free", "DQ");
    for id in 101..=103 {
        p.swim(id, "100 Free", "50.00");
    }
    for id in 106..=110 {
        p.swim(id, "100 Free", "52.10");
    }
    p
}

// ─── End-to-end ─────────────────────────────────────────────────────

#[test]
fn collects_at_most_the_requested_total() {
    let provider = populated_provider();
    let result = collect(&test_config(), &provider, &SilentProgress);

    assert!(result.swimmers.len() <= 5);
    assert!(!result.swimmers.is_empty());
    assert!(result.targets_exact);
    assert!(!result.halted_early);

    // Every surviving swimmer has at least one usable event.
    assert!(result.swimmers.iter().all(|s| !s.times.is_empty()));

    // Flat record count equals the summed event counts.
    let expected: usize = result.swimmers.iter().map(|s| s.times.len()).sum();
    assert_eq!(result.records.len(), expected);

    // No swimmer appears twice.
    let unique: HashSet<SwimmerId> = result.swimmers.iter().map(|s| s.id).collect();
    assert_eq!(unique.len(), result.swimmers.len());
}

#[test]
fn division_targets_follow_population_shares() {
    let provider = populated_provider();
    let result = collect(&test_config(), &provider, &SilentProgress);

    // Populations are 5 and 5; the total of 5 splits 2/3 after the
    // away-from-zero tie is corrected against the first division.
    assert_eq!(result.divisions.len(), 2);
    assert_eq!(result.divisions[0].target, 2);
    assert_eq!(result.divisions[1].target, 3);
}

#[test]
fn stride_selection_samples_the_ranked_team() {
    let provider = populated_provider();
    let result = collect(&test_config(), &provider, &SilentProgress);

    // Division 1's stride pick is team 2, so its swimmers come from the
    // 104–105 roster; 105 has no usable time and is dropped.
    let d1: Vec<_> = result
        .swimmers
        .iter()
        .filter(|s| s.division == "Division 1")
        .collect();
    assert_eq!(d1.len(), 1);
    assert_eq!(d1[0].id, SwimmerId(104));
    assert_eq!(d1[0].team_id, TeamId(2));
    assert_eq!(d1[0].times.len(), 2);
    assert_eq!(result.counters.swimmers_without_times, 1);
}

#[test]
fn ranking_failure_falls_back_to_random_selection() {
    let mut provider = populated_provider();
    provider.rankings = None;

    let result = collect(&test_config(), &provider, &SilentProgress);

    // The failure is counted, and Division 1 still collects swimmers
    // through the uniform fallback.
    assert!(result.counters.provider_failures >= 1);
    assert!(result
        .swimmers
        .iter()
        .any(|s| s.division == "Division 1"));
}

#[test]
fn identical_seeds_reproduce_identical_runs() {
    let provider = populated_provider();
    let config = test_config();

    let a = collect(&config, &provider, &SilentProgress);
    let b = collect(&config, &provider, &SilentProgress);

    assert_eq!(a.records, b.records);
    assert_eq!(a.divisions, b.divisions);
}

#[test]
fn unavailable_provider_halts_with_empty_result() {
    let mut provider = populated_provider();
    provider.available = false;

    let result = collect(&test_config(), &provider, &SilentProgress);

    assert!(result.halted_early);
    assert!(result.swimmers.is_empty());
    assert!(result.records.is_empty());
    assert!(result.divisions.iter().all(|d| d.collected == 0));
}

#[test]
fn unknown_division_yields_zero_target_not_a_crash() {
    let provider = populated_provider();
    let mut config = test_config();
    config.divisions.push("Division 9".into());

    let result = collect(&config, &provider, &SilentProgress);

    let d9 = result
        .divisions
        .iter()
        .find(|d| d.division == "Division 9")
        .unwrap();
    assert_eq!(d9.population, 0);
    assert_eq!(d9.target, 0);
    assert_eq!(d9.collected, 0);
}

#[test]
fn empty_roster_at_collection_time_is_counted() {
    let mut p = MockProvider::new();
    p.team("Division 2", 7, "Ghost");
    // Roster lookups return empty: the survey falls back to the default
    // estimate, and collection then finds nobody to sample.
    let mut config = test_config();
    config.divisions = vec!["Division 2".into()];

    let result = collect(&config, &p, &SilentProgress);

    assert_eq!(result.swimmers.len(), 0);
    assert!(result.counters.empty_rosters >= 1);
    assert_eq!(result.divisions[0].population, config.default_roster_size);
}

#[test]
fn plan_allocates_without_fetching_swimmers() {
    let provider = populated_provider();
    let config = test_config();

    let planned = plan(&config, &provider, &SilentProgress);

    assert!(planned.targets_exact);
    assert_eq!(planned.divisions.len(), 2);
    let total: usize = planned.divisions.iter().map(|d| d.target).sum();
    assert_eq!(total, 5);
    // Quotas never exceed roster estimates.
    for division in &planned.divisions {
        for team in &division.teams {
            assert!(team.quota <= team.roster_estimate);
            assert!(team.quota > 0);
        }
    }
    // Planning touches rosters only for the survey (4 teams), never for
    // swimmer sampling.
    assert_eq!(*provider.roster_calls.lock().unwrap(), 4);
}
