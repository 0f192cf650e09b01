//! Team selection within a division.
//!
//! Two strategies decide which teams actually get their rosters fetched:
//! - **Stride**: for the ranked division, walk the provider's ranking list
//!   at a fixed step so coverage spans the competitive spectrum instead of
//!   clustering at the top.
//! - **Random**: uniform sample without replacement, used for every other
//!   division and as the fallback when the ranking list is unavailable.
//!
//! Breadth comes from the `swimmers_per_team` heuristic: a division target
//! of N swimmers is assumed to need about `N / swimmers_per_team` teams.
//! Randomness is only ever drawn from an injected seeded generator.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::HashSet;

use crate::domain::{SurveyedTeam, TeamId};

/// Number of teams to cover a target of `target` swimmers, at least one.
fn teams_needed(target: usize, swimmers_per_team: usize) -> usize {
    assert!(swimmers_per_team > 0, "swimmers_per_team must be positive");
    (target / swimmers_per_team).max(1)
}

/// Every `stride`-th entry of the ranking list, intersected with the
/// surveyed candidates.
///
/// Candidate order is preserved in the result. Ranked teams that were not
/// surveyed are skipped; an empty ranking yields an empty selection (the
/// caller falls back to [`random_select`] when the ranking is unavailable).
pub fn stride_select(
    ranked: &[TeamId],
    candidates: &[SurveyedTeam],
    target: usize,
    swimmers_per_team: usize,
) -> Vec<SurveyedTeam> {
    let needed = teams_needed(target, swimmers_per_team);
    let stride = (ranked.len() / needed).max(1);

    let picked: HashSet<TeamId> = ranked.iter().step_by(stride).copied().collect();
    candidates
        .iter()
        .filter(|team| picked.contains(&team.entry.id))
        .cloned()
        .collect()
}

/// Uniform sample of teams without replacement.
///
/// Draws `max(1, target / swimmers_per_team)` teams, or every candidate when
/// fewer exist than requested. Identical seeds reproduce identical draws.
pub fn random_select(
    candidates: &[SurveyedTeam],
    target: usize,
    swimmers_per_team: usize,
    rng: &mut StdRng,
) -> Vec<SurveyedTeam> {
    let needed = teams_needed(target, swimmers_per_team).min(candidates.len());
    candidates.choose_multiple(rng, needed).cloned().collect()
}
