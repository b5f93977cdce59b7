//! Football fixtures and standings client.
//!
//! Talks to a football-data style API: `GET /competitions/{code}/matches`
//! and `/standings`, authenticated with an `X-Auth-Token` header. The API
//! serves whole competitions; the club's own fixtures are filtered
//! client-side by a case-insensitive name substring.

use reqwest::Client;
use serde::Deserialize;
use terrace_common::config::{ClubConfig, FootballConfig};
use terrace_common::{AppError, AppResult};

/// A reference to a team as the provider names it.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TeamRef {
    /// Full team name.
    pub name: String,
    /// Short name (optional).
    pub short_name: Option<String>,
    /// Three-letter abbreviation (optional).
    pub tla: Option<String>,
}

/// Full-time score of a match, absent until played.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    /// Home goals.
    pub home: Option<i64>,
    /// Away goals.
    pub away: Option<i64>,
}

/// One match in a competition.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    /// Provider-assigned match id.
    pub id: u64,
    /// Kickoff in UTC.
    pub utc_date: chrono::DateTime<chrono::Utc>,
    /// Match status, e.g. `SCHEDULED` or `FINISHED`.
    pub status: String,
    /// Home side.
    pub home_team: TeamRef,
    /// Away side.
    pub away_team: TeamRef,
    /// Full-time score.
    #[serde(default)]
    pub score: FixtureScore,
}

/// Score container as the provider nests it.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FixtureScore {
    /// Winner marker: `HOME_TEAM`, `AWAY_TEAM` or `DRAW`.
    pub winner: Option<String>,
    /// Full-time goals.
    #[serde(default)]
    pub full_time: Score,
}

/// One row of a league table.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    /// League position, 1-based.
    pub position: u32,
    /// The team in this row.
    pub team: TeamRef,
    /// Games played.
    pub played_games: u32,
    /// Wins.
    pub won: u32,
    /// Draws.
    pub draw: u32,
    /// Losses.
    pub lost: u32,
    /// Points total.
    pub points: i32,
    /// Goals scored.
    pub goals_for: i32,
    /// Goals conceded.
    pub goals_against: i32,
    /// Goal difference.
    pub goal_difference: i32,
}

#[derive(Debug, Deserialize)]
struct MatchesResponse {
    matches: Vec<Fixture>,
}

#[derive(Debug, Deserialize)]
struct StandingsResponse {
    standings: Vec<Standing>,
}

#[derive(Debug, Deserialize)]
struct Standing {
    #[serde(rename = "type")]
    kind: String,
    table: Vec<TableRow>,
}

/// Keep the fixtures involving the club, matched by case-insensitive
/// name substring against either side.
#[must_use]
pub fn filter_club_fixtures(fixtures: Vec<Fixture>, club_name: &str) -> Vec<Fixture> {
    let needle = club_name.to_lowercase();
    fixtures
        .into_iter()
        .filter(|fixture| {
            fixture.home_team.name.to_lowercase().contains(&needle)
                || fixture.away_team.name.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Client for the fixtures/standings provider.
///
/// No explicit timeout is set; the underlying HTTP client's default
/// applies. Failures surface once, retry is manual.
#[derive(Clone)]
pub struct FootballClient {
    http: Client,
    base_url: String,
    api_token: String,
    competition: String,
    club_name: String,
}

impl FootballClient {
    /// Create a client for one club in one competition.
    #[must_use]
    pub fn new(football: &FootballConfig, club: &ClubConfig) -> Self {
        Self {
            http: Client::new(),
            base_url: football.base_url.trim_end_matches('/').to_string(),
            api_token: football.api_token.clone(),
            competition: club.competition.clone(),
            club_name: club.name.clone(),
        }
    }

    /// Fetch all matches of the configured competition.
    pub async fn matches(&self) -> AppResult<Vec<Fixture>> {
        let url = format!("{}/competitions/{}/matches", self.base_url, self.competition);
        let response: MatchesResponse = self.fetch(&url, "fixtures").await?;
        tracing::debug!(count = response.matches.len(), "Fetched fixtures");
        Ok(response.matches)
    }

    /// Fetch the club's own matches, filtered client-side.
    pub async fn club_matches(&self) -> AppResult<Vec<Fixture>> {
        let matches = self.matches().await?;
        Ok(filter_club_fixtures(matches, &self.club_name))
    }

    /// Fetch the competition's overall league table.
    pub async fn standings(&self) -> AppResult<Vec<TableRow>> {
        let url = format!(
            "{}/competitions/{}/standings",
            self.base_url, self.competition
        );
        let response: StandingsResponse = self.fetch(&url, "standings").await?;

        // The provider returns TOTAL, HOME and AWAY tables; display the
        // overall one.
        let table = response
            .standings
            .into_iter()
            .find(|s| s.kind == "TOTAL")
            .map(|s| s.table)
            .unwrap_or_default();
        tracing::debug!(rows = table.len(), "Fetched standings");
        Ok(table)
    }

    async fn fetch<T: serde::de::DeserializeOwned>(&self, url: &str, what: &str) -> AppResult<T> {
        let response = self
            .http
            .get(url)
            .header("X-Auth-Token", &self.api_token)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Failed to fetch {what}: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "Failed to fetch {what}: provider returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Invalid {what} response: {e}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn fixture(home: &str, away: &str) -> Fixture {
        serde_json::from_value(serde_json::json!({
            "id": 1,
            "utcDate": "2026-09-12T14:00:00Z",
            "status": "SCHEDULED",
            "homeTeam": { "name": home, "shortName": null, "tla": null },
            "awayTeam": { "name": away, "shortName": null, "tla": null },
        }))
        .unwrap()
    }

    #[test]
    fn test_filter_matches_either_side_case_insensitive() {
        let fixtures = vec![
            fixture("Bristol Rovers FC", "Exeter City FC"),
            fixture("Portsmouth FC", "BRISTOL ROVERS FC"),
            fixture("Portsmouth FC", "Exeter City FC"),
        ];

        let filtered = filter_club_fixtures(fixtures, "bristol rovers");
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|f| {
            f.home_team.name.to_lowercase().contains("bristol rovers")
                || f.away_team.name.to_lowercase().contains("bristol rovers")
        }));
    }

    #[test]
    fn test_filter_no_match_yields_empty() {
        let fixtures = vec![fixture("Portsmouth FC", "Exeter City FC")];
        assert!(filter_club_fixtures(fixtures, "Bristol Rovers").is_empty());
    }

    #[test]
    fn test_matches_response_deserializes_provider_shape() {
        let raw = serde_json::json!({
            "filters": { "season": "2026" },
            "matches": [{
                "id": 327304,
                "utcDate": "2026-08-15T14:00:00Z",
                "status": "FINISHED",
                "homeTeam": { "name": "Bristol Rovers FC", "shortName": "Bristol Rovers", "tla": "BRI" },
                "awayTeam": { "name": "Exeter City FC", "shortName": "Exeter", "tla": "EXE" },
                "score": {
                    "winner": "HOME_TEAM",
                    "fullTime": { "home": 2, "away": 1 }
                }
            }]
        });

        let response: MatchesResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(response.matches.len(), 1);
        let m = &response.matches[0];
        assert_eq!(m.home_team.tla.as_deref(), Some("BRI"));
        assert_eq!(m.score.full_time.home, Some(2));
        assert_eq!(m.score.winner.as_deref(), Some("HOME_TEAM"));
    }

    #[test]
    fn test_standings_response_picks_total_table() {
        let raw = serde_json::json!({
            "standings": [
                { "type": "HOME", "table": [] },
                { "type": "TOTAL", "table": [{
                    "position": 1,
                    "team": { "name": "Bristol Rovers FC", "shortName": null, "tla": "BRI" },
                    "playedGames": 4,
                    "won": 3,
                    "draw": 1,
                    "lost": 0,
                    "points": 10,
                    "goalsFor": 8,
                    "goalsAgainst": 2,
                    "goalDifference": 6
                }] }
            ]
        });

        let response: StandingsResponse = serde_json::from_value(raw).unwrap();
        let total = response
            .standings
            .into_iter()
            .find(|s| s.kind == "TOTAL")
            .unwrap();
        assert_eq!(total.table[0].position, 1);
        assert_eq!(total.table[0].goal_difference, 6);
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_an_error_not_a_panic() {
        let football = FootballConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            api_token: "token".to_string(),
        };
        let club = ClubConfig {
            name: "Bristol Rovers".to_string(),
            competition: "EL1".to_string(),
        };

        let client = FootballClient::new(&football, &club);
        let result = client.club_matches().await;
        assert!(matches!(result, Err(AppError::ExternalService(_))));
    }
}
