//! Division and team census types.
//!
//! A division survey is the population estimate the sampler works from:
//! every team the provider lists for the division, each with a roster-size
//! estimate (the configured default when the roster could not be fetched).

use serde::{Deserialize, Serialize};

use super::ids::TeamId;

/// A team as listed by the provider, before any roster lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamEntry {
    pub id: TeamId,
    pub name: String,
}

/// A team with its estimated roster size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyedTeam {
    pub entry: TeamEntry,
    /// Estimated member count. Falls back to the configured default when the
    /// roster lookup fails or returns empty.
    pub roster_estimate: usize,
}

/// All surveyed teams of one division, in provider listing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisionSurvey {
    pub name: String,
    pub teams: Vec<SurveyedTeam>,
}

impl DivisionSurvey {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            teams: Vec::new(),
        }
    }

    /// Sum of roster estimates — the division's population weight.
    pub fn estimated_population(&self) -> usize {
        self.teams.iter().map(|t| t.roster_estimate).sum()
    }
}

/// A selected team together with its integer sample quota.
///
/// Produced by the team-level apportionment; the quota never exceeds the
/// roster estimate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamAllocation {
    pub team: SurveyedTeam,
    pub quota: usize,
}
