//! SwimCloud data provider.
//!
//! Fetches team lists, rosters, rankings, and per-swimmer times from the
//! SwimCloud JSON API. Handles the politeness throttle, bounded retries with
//! exponential backoff, HTTP status mapping, and the circuit breaker.
//!
//! SwimCloud has no official API contract and is subject to unannounced
//! format changes; every payload goes through typed response structs so a
//! drift shows up as `ResponseFormatChanged` rather than bad data.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use super::circuit_breaker::CircuitBreaker;
use super::throttle::Throttle;
use super::{ProviderError, RawSwim, RosterEntry, SwimProvider};
use crate::domain::{SwimmerId, TeamEntry, TeamId};

const DEFAULT_BASE_URL: &str = "https://www.swimcloud.com";

/// SwimCloud's numeric code for a collegiate division name.
pub fn division_code(division: &str) -> Option<u8> {
    match division.trim() {
        "Division 1" | "Division I" => Some(1),
        "Division 2" | "Division II" => Some(2),
        "Division 3" | "Division III" => Some(3),
        "NAIA" => Some(4),
        _ => None,
    }
}

// ─── API response shapes ────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct TeamListResponse {
    results: Vec<ApiTeam>,
}

#[derive(Debug, Deserialize)]
struct ApiTeam {
    id: u32,
    name: String,
}

#[derive(Debug, Deserialize)]
struct RosterResponse {
    swimmers: Vec<ApiRosterSwimmer>,
}

#[derive(Debug, Deserialize)]
struct ApiRosterSwimmer {
    id: u32,
    name: String,
}

#[derive(Debug, Deserialize)]
struct TimesResponse {
    times: Vec<ApiSwim>,
}

#[derive(Debug, Deserialize)]
struct ApiSwim {
    time: Option<String>,
    meet_name: Option<String>,
    season: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct RankingsResponse {
    teams: Vec<ApiRankedTeam>,
}

#[derive(Debug, Deserialize)]
struct ApiRankedTeam {
    id: u32,
}

// ─── Provider ───────────────────────────────────────────────────────

/// SwimCloud data provider over blocking HTTP.
pub struct SwimCloudProvider {
    client: reqwest::blocking::Client,
    base_url: String,
    breaker: Arc<CircuitBreaker>,
    throttle: Arc<dyn Throttle>,
    max_retries: u32,
    base_delay: Duration,
}

impl SwimCloudProvider {
    pub fn new(breaker: Arc<CircuitBreaker>, throttle: Arc<dyn Throttle>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            breaker,
            throttle,
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        }
    }

    /// Point the provider at a different host (mock server in tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// One throttled, retried GET returning a typed JSON payload.
    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let url = format!("{}{}", self.base_url, path);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if !self.breaker.allows() {
                return Err(ProviderError::CircuitBreakerTripped);
            }
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                std::thread::sleep(delay);
            }
            self.throttle.pause();

            match self.client.get(&url).query(query).send() {
                Ok(resp) => {
                    let status = resp.status();

                    if status == reqwest::StatusCode::FORBIDDEN {
                        // Ban signal — stop the whole run, not just this call
                        self.breaker.trip();
                        return Err(ProviderError::CircuitBreakerTripped);
                    }

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        self.breaker.note_failure();
                        let retry_after = resp
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.parse::<u64>().ok())
                            .unwrap_or(60);
                        last_error = Some(ProviderError::RateLimited {
                            retry_after_secs: retry_after,
                        });
                        continue;
                    }

                    if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(ProviderError::NotFound {
                            what: url.clone(),
                        });
                    }

                    if !status.is_success() {
                        self.breaker.note_failure();
                        last_error = Some(ProviderError::Other(format!("HTTP {status} for {url}")));
                        continue;
                    }

                    let payload: T = resp.json().map_err(|e| {
                        ProviderError::ResponseFormatChanged(format!(
                            "failed to parse response from {url}: {e}"
                        ))
                    })?;
                    self.breaker.note_success();
                    return Ok(payload);
                }
                Err(e) => {
                    if e.is_connect() || e.is_timeout() {
                        self.breaker.note_failure();
                        last_error = Some(ProviderError::NetworkUnreachable(e.to_string()));
                        continue;
                    }
                    return Err(ProviderError::NetworkUnreachable(e.to_string()));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ProviderError::Other("max retries exceeded".into())))
    }
}

impl SwimProvider for SwimCloudProvider {
    fn name(&self) -> &str {
        "swimcloud"
    }

    fn college_teams(&self, division: &str) -> Result<Vec<TeamEntry>, ProviderError> {
        let code = division_code(division).ok_or_else(|| ProviderError::NotFound {
            what: format!("division '{division}'"),
        })?;

        let resp: TeamListResponse =
            self.get_json("/api/teams", &[("division", code.to_string())])?;

        Ok(resp
            .results
            .into_iter()
            .map(|t| TeamEntry {
                id: TeamId(t.id),
                name: t.name,
            })
            .collect())
    }

    fn roster(
        &self,
        team: &TeamEntry,
        gender: &str,
        season: i32,
    ) -> Result<Vec<RosterEntry>, ProviderError> {
        let resp: RosterResponse = self.get_json(
            &format!("/api/teams/{}/roster", team.id),
            &[
                ("gender", gender.to_string()),
                ("season", season.to_string()),
            ],
        )?;

        Ok(resp
            .swimmers
            .into_iter()
            .map(|s| RosterEntry {
                id: SwimmerId(s.id),
                name: s.name,
            })
            .collect())
    }

    fn swimmer_times(
        &self,
        swimmer: SwimmerId,
        event: &str,
    ) -> Result<Vec<RawSwim>, ProviderError> {
        let resp: TimesResponse = self.get_json(
            &format!("/api/swimmers/{swimmer}/times"),
            &[("event", event.to_string())],
        )?;

        Ok(resp
            .times
            .into_iter()
            .map(|s| RawSwim {
                time: s.time,
                meet_name: s.meet_name,
                year: s.season,
            })
            .collect())
    }

    fn team_rankings(&self, gender: &str, season: i32) -> Result<Vec<TeamId>, ProviderError> {
        let resp: RankingsResponse = self.get_json(
            "/api/teams/rankings",
            &[
                ("gender", gender.to_string()),
                ("season", season.to_string()),
            ],
        )?;

        Ok(resp.teams.into_iter().map(|t| TeamId(t.id)).collect())
    }

    fn is_available(&self) -> bool {
        self.breaker.allows()
    }
}
