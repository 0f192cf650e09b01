//! Collection orchestration.
//!
//! Drives the end-to-end pipeline: division survey → division apportionment
//! → per-division team selection → team apportionment → seeded roster
//! sampling → per-swimmer time collection → result assembly.
//!
//! The run is infallible: every provider failure is counted and degraded to
//! empty data at its call site, and the collector always returns whatever it
//! managed to gather. The only thing that stops work early is the provider
//! reporting itself unavailable (circuit breaker), and even then the partial
//! result comes back normally.

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use swimsampler_core::apportion::{apportion, Apportionment};
use swimsampler_core::domain::{
    BestTime, DivisionSurvey, SurveyedTeam, SwimRecord, Swimmer, TeamAllocation, TeamEntry,
};
use swimsampler_core::provider::{CollectProgress, ProviderError, RosterEntry, SwimProvider};
use swimsampler_core::rng::RngHierarchy;
use swimsampler_core::select::{random_select, stride_select};
use swimsampler_core::timeparse::{is_usable, parse_seconds};

use crate::config::CollectConfig;

/// Version stamp for persisted collection results.
pub const SCHEMA_VERSION: u32 = 1;

/// Non-fatal failure tallies, surfaced to the operator instead of errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureCounters {
    /// Provider calls that errored and were treated as empty.
    pub provider_failures: usize,
    /// Rosters that came back empty at collection time.
    pub empty_rosters: usize,
    /// Sampled swimmers dropped for having no usable times.
    pub swimmers_without_times: usize,
}

/// Per-division summary of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisionOutcome {
    pub division: String,
    pub population: usize,
    pub target: usize,
    pub teams_selected: usize,
    pub collected: usize,
}

/// Everything one collection run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionResult {
    pub schema_version: u32,
    /// Config echo — a run is reproducible from this alone.
    pub config: CollectConfig,
    pub divisions: Vec<DivisionOutcome>,
    pub counters: FailureCounters,
    /// False when the division targets were infeasible (best-effort quotas).
    pub targets_exact: bool,
    /// True when the circuit breaker stopped the run before all divisions
    /// were processed.
    pub halted_early: bool,
    pub swimmers: Vec<Swimmer>,
    /// Flat rows, one per (swimmer, event).
    pub records: Vec<SwimRecord>,
}

/// A selected team with its quota, as shown by `plan`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamPlan {
    pub team: String,
    pub roster_estimate: usize,
    pub quota: usize,
}

/// Division-level view of what a run would do, without fetching swimmers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisionPlan {
    pub division: String,
    pub population: usize,
    pub target: usize,
    pub teams: Vec<TeamPlan>,
}

/// Output of the survey-and-allocate stages alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionPlan {
    pub divisions: Vec<DivisionPlan>,
    pub targets_exact: bool,
}

/// Run the full pipeline.
pub fn collect(
    config: &CollectConfig,
    provider: &dyn SwimProvider,
    progress: &dyn CollectProgress,
) -> CollectionResult {
    let mut collector = Collector::new(config, provider, progress);
    let surveys = collector.survey_divisions();
    let targets = division_targets(&surveys, config);

    let mut divisions = Vec::with_capacity(surveys.len());
    let mut swimmers: Vec<Swimmer> = Vec::new();
    for (survey, &target) in surveys.iter().zip(&targets.quotas) {
        divisions.push(collector.collect_division(survey, target, &mut swimmers));
    }

    let records: Vec<SwimRecord> = swimmers.iter().flat_map(Swimmer::to_records).collect();
    progress.on_run_complete(swimmers.len(), records.len());

    CollectionResult {
        schema_version: SCHEMA_VERSION,
        config: config.clone(),
        divisions,
        counters: collector.counters,
        targets_exact: targets.exact,
        halted_early: collector.halted_early,
        swimmers,
        records,
    }
}

/// Run the survey and allocation stages only — no swimmer data is fetched.
pub fn plan(
    config: &CollectConfig,
    provider: &dyn SwimProvider,
    progress: &dyn CollectProgress,
) -> CollectionPlan {
    let mut collector = Collector::new(config, provider, progress);
    let surveys = collector.survey_divisions();
    let targets = division_targets(&surveys, config);

    let divisions = surveys
        .iter()
        .zip(&targets.quotas)
        .map(|(survey, &target)| {
            let selected = if target > 0 && !survey.teams.is_empty() {
                collector.select_teams(survey, target)
            } else {
                Vec::new()
            };
            let teams = allocate_teams(&selected, target)
                .into_iter()
                .map(|a| TeamPlan {
                    team: a.team.entry.name,
                    roster_estimate: a.team.roster_estimate,
                    quota: a.quota,
                })
                .collect();
            DivisionPlan {
                division: survey.name.clone(),
                population: survey.estimated_population(),
                target,
                teams,
            }
        })
        .collect();

    CollectionPlan {
        divisions,
        targets_exact: targets.exact,
    }
}

/// Division-level apportionment: population weights, configured floor, no
/// capacities (the floor may overshoot a tiny division's true population;
/// team-level capacity clamping bounds what actually gets collected).
pub fn division_targets(surveys: &[DivisionSurvey], config: &CollectConfig) -> Apportionment {
    let weights: Vec<usize> = surveys.iter().map(|s| s.estimated_population()).collect();
    apportion(
        &weights,
        config.total_sample_size,
        config.min_per_division,
        None,
    )
}

/// Team-level apportionment: roster estimates are both weights and
/// capacities, no floor. Teams allocated zero are dropped.
pub fn allocate_teams(selected: &[SurveyedTeam], target: usize) -> Vec<TeamAllocation> {
    let weights: Vec<usize> = selected.iter().map(|t| t.roster_estimate).collect();
    let result = apportion(&weights, target, 0, Some(&weights));

    selected
        .iter()
        .zip(result.quotas)
        .filter(|(_, quota)| *quota > 0)
        .map(|(team, quota)| TeamAllocation {
            team: team.clone(),
            quota,
        })
        .collect()
}

struct Collector<'a> {
    config: &'a CollectConfig,
    provider: &'a dyn SwimProvider,
    progress: &'a dyn CollectProgress,
    rng: RngHierarchy,
    counters: FailureCounters,
    halted_early: bool,
}

impl<'a> Collector<'a> {
    fn new(
        config: &'a CollectConfig,
        provider: &'a dyn SwimProvider,
        progress: &'a dyn CollectProgress,
    ) -> Self {
        Self {
            config,
            provider,
            progress,
            rng: RngHierarchy::new(config.seed),
            counters: FailureCounters::default(),
            halted_early: false,
        }
    }

    fn note_failure(&mut self, context: &str, error: &ProviderError) {
        self.counters.provider_failures += 1;
        self.progress.on_provider_failure(context, error);
    }

    /// Fetch every division's team list and estimate roster sizes.
    ///
    /// A failed team listing leaves the division empty (population zero); a
    /// failed or empty roster lookup falls back to the configured default
    /// estimate.
    fn survey_divisions(&mut self) -> Vec<DivisionSurvey> {
        let mut surveys = Vec::with_capacity(self.config.divisions.len());
        for division in &self.config.divisions {
            let mut survey = DivisionSurvey::new(division.clone());
            if !self.provider.is_available() {
                self.halted_early = true;
                surveys.push(survey);
                continue;
            }

            let teams = match self.provider.college_teams(division) {
                Ok(teams) => teams,
                Err(e) => {
                    self.note_failure(&format!("listing teams for {division}"), &e);
                    surveys.push(survey);
                    continue;
                }
            };

            for entry in teams {
                let roster_estimate = self.roster_estimate(&entry);
                survey.teams.push(SurveyedTeam {
                    entry,
                    roster_estimate,
                });
            }
            surveys.push(survey);
        }
        surveys
    }

    fn roster_estimate(&mut self, entry: &TeamEntry) -> usize {
        match self
            .provider
            .roster(entry, &self.config.gender, self.config.season)
        {
            Ok(roster) if !roster.is_empty() => roster.len(),
            Ok(_) => self.config.default_roster_size,
            Err(e) => {
                self.note_failure(&format!("sizing roster of {}", entry.name), &e);
                self.config.default_roster_size
            }
        }
    }

    /// Pick the teams to sample from: ranking stride for the configured
    /// ranked division when a ranking is obtainable, uniform random
    /// otherwise.
    fn select_teams(&mut self, survey: &DivisionSurvey, target: usize) -> Vec<SurveyedTeam> {
        if survey.name == self.config.ranked_division {
            match self
                .provider
                .team_rankings(&self.config.gender, self.config.season)
            {
                Ok(ranked) if !ranked.is_empty() => {
                    return stride_select(
                        &ranked,
                        &survey.teams,
                        target,
                        self.config.swimmers_per_team,
                    );
                }
                Ok(_) => {}
                Err(e) => {
                    self.note_failure(&format!("ranking teams for {}", survey.name), &e);
                }
            }
        }

        let mut rng = self.rng.team_selection(&survey.name);
        random_select(&survey.teams, target, self.config.swimmers_per_team, &mut rng)
    }

    fn collect_division(
        &mut self,
        survey: &DivisionSurvey,
        target: usize,
        out: &mut Vec<Swimmer>,
    ) -> DivisionOutcome {
        let population = survey.estimated_population();
        if target == 0 || survey.teams.is_empty() {
            return DivisionOutcome {
                division: survey.name.clone(),
                population,
                target,
                teams_selected: 0,
                collected: 0,
            };
        }

        let selected = self.select_teams(survey, target);
        self.progress
            .on_division_start(&survey.name, target, selected.len());
        let allocations = allocate_teams(&selected, target);

        let mut collected = 0usize;
        for allocation in &allocations {
            if collected >= target {
                break;
            }
            if !self.provider.is_available() {
                self.halted_early = true;
                break;
            }
            collected += self.collect_team(survey, allocation, target - collected, out);
        }

        self.progress
            .on_division_complete(&survey.name, collected, target);

        DivisionOutcome {
            division: survey.name.clone(),
            population,
            target,
            teams_selected: selected.len(),
            collected,
        }
    }

    /// Sample up to `remaining` swimmers from one team. Returns how many
    /// made it into `out`.
    fn collect_team(
        &mut self,
        survey: &DivisionSurvey,
        allocation: &TeamAllocation,
        remaining: usize,
        out: &mut Vec<Swimmer>,
    ) -> usize {
        let team = &allocation.team;
        self.progress
            .on_team_start(&survey.name, &team.entry.name, allocation.quota);

        let roster = match self
            .provider
            .roster(&team.entry, &self.config.gender, self.config.season)
        {
            Ok(roster) if !roster.is_empty() => roster,
            Ok(_) => {
                self.counters.empty_rosters += 1;
                return 0;
            }
            Err(e) => {
                self.note_failure(&format!("fetching roster of {}", team.entry.name), &e);
                return 0;
            }
        };

        let mut rng = self.rng.roster_sampling(team.entry.id);
        let wanted = allocation.quota.min(roster.len());
        let picks: Vec<RosterEntry> = roster.choose_multiple(&mut rng, wanted).cloned().collect();

        let mut added = 0usize;
        for pick in picks {
            if added >= remaining {
                break;
            }
            match self.collect_swimmer(&pick, team, &survey.name) {
                Some(swimmer) => {
                    self.progress
                        .on_swimmer_done(&swimmer.name, swimmer.times.len());
                    out.push(swimmer);
                    added += 1;
                }
                None => {
                    self.counters.swimmers_without_times += 1;
                    self.progress.on_swimmer_done(&pick.name, 0);
                }
            }
        }
        added
    }

    /// Fetch the priority events for one swimmer and keep the best usable
    /// time per event. Returns `None` when nothing usable came back.
    fn collect_swimmer(
        &mut self,
        entry: &RosterEntry,
        team: &SurveyedTeam,
        division: &str,
    ) -> Option<Swimmer> {
        let mut times = BTreeMap::new();
        for event in &self.config.priority_events {
            let swims = match self.provider.swimmer_times(entry.id, event) {
                Ok(swims) => swims,
                Err(e) => {
                    self.note_failure(&format!("times for {} ({event})", entry.name), &e);
                    continue;
                }
            };

            let Some((seconds, best)) = swims
                .iter()
                .map(|s| (parse_seconds(s.time.as_deref()), s))
                .min_by(|a, b| a.0.total_cmp(&b.0))
            else {
                continue;
            };
            if !is_usable(seconds) {
                continue;
            }

            times.insert(
                event.clone(),
                BestTime {
                    seconds,
                    display: best.time.clone().unwrap_or_default(),
                    meet_name: best.meet_name.clone().unwrap_or_default(),
                    year: best.year.unwrap_or(0),
                },
            );
        }

        if times.is_empty() {
            return None;
        }
        Some(Swimmer {
            id: entry.id,
            name: entry.name.clone(),
            team_id: team.entry.id,
            team_name: team.entry.name.clone(),
            division: division.to_string(),
            times,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swimsampler_core::domain::TeamId;

    fn team(id: u32, roster: usize) -> SurveyedTeam {
        SurveyedTeam {
            entry: TeamEntry {
                id: TeamId(id),
                name: format!("Team {id}"),
            },
            roster_estimate: roster,
        }
    }

    fn survey(name: &str, teams: &[(u32, usize)]) -> DivisionSurvey {
        DivisionSurvey {
            name: name.into(),
            teams: teams.iter().map(|&(id, r)| team(id, r)).collect(),
        }
    }

    #[test]
    fn division_targets_are_proportional_with_floor() {
        let config = CollectConfig {
            total_sample_size: 100,
            min_per_division: 10,
            ..CollectConfig::default()
        };
        let surveys = vec![
            survey("Division 1", &[(1, 300), (2, 300)]),
            survey("Division 2", &[(3, 50)]),
            survey("NAIA", &[]),
        ];
        let targets = division_targets(&surveys, &config);
        assert!(targets.exact);
        assert_eq!(targets.assigned(), 100);
        assert_eq!(targets.quotas[2], 0);
        assert!(targets.quotas[1] >= 10);
    }

    #[test]
    fn allocate_teams_respects_roster_capacity() {
        let selected = vec![team(1, 3), team(2, 40)];
        let allocations = allocate_teams(&selected, 20);
        let by_id: std::collections::HashMap<u32, usize> = allocations
            .iter()
            .map(|a| (a.team.entry.id.0, a.quota))
            .collect();
        assert!(by_id[&1] <= 3);
        assert_eq!(by_id.values().sum::<usize>(), 20);
    }

    #[test]
    fn allocate_teams_drops_zero_quotas() {
        let selected = vec![team(1, 50), team(2, 1)];
        let allocations = allocate_teams(&selected, 2);
        assert!(allocations.iter().all(|a| a.quota > 0));
        assert_eq!(
            allocations.iter().map(|a| a.quota).sum::<usize>(),
            2
        );
    }

    #[test]
    fn allocate_teams_with_nothing_selected_is_empty() {
        assert!(allocate_teams(&[], 10).is_empty());
    }
}
