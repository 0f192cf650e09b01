//! Sampled swimmers and their best times.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ids::{SwimmerId, TeamId};

/// Best recorded time for one swimmer in one event.
///
/// Chosen as the minimum parsed value among all raw swims the provider
/// returned for that swimmer/event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestTime {
    /// Canonical value in seconds.
    pub seconds: f64,
    /// Original display string as returned by the provider (e.g. "1:05.32").
    pub display: String,
    /// Meet the time was swum at; empty when the provider omitted it.
    pub meet_name: String,
    /// Season year; zero when the provider omitted it.
    pub year: i32,
}

/// A sampled swimmer with whatever priority-event times could be collected.
///
/// The team fields are a back-reference only — swimmers do not own their team.
/// Event keys are stored in a `BTreeMap` so flattening order is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Swimmer {
    pub id: SwimmerId,
    pub name: String,
    pub team_id: TeamId,
    pub team_name: String,
    pub division: String,
    pub times: BTreeMap<String, BestTime>,
}

impl Swimmer {
    /// Flatten into one output row per recorded event.
    pub fn to_records(&self) -> Vec<SwimRecord> {
        self.times
            .iter()
            .map(|(event, best)| SwimRecord {
                swimmer_id: self.id,
                swimmer_name: self.name.clone(),
                team_name: self.team_name.clone(),
                division: self.division.clone(),
                event: event.clone(),
                time_seconds: best.seconds,
                time_str: best.display.clone(),
                meet_name: best.meet_name.clone(),
                year: best.year,
            })
            .collect()
    }
}

/// Flat output row, one per (swimmer, event) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwimRecord {
    pub swimmer_id: SwimmerId,
    pub swimmer_name: String,
    pub team_name: String,
    pub division: String,
    pub event: String,
    pub time_seconds: f64,
    pub time_str: String,
    pub meet_name: String,
    pub year: i32,
}
