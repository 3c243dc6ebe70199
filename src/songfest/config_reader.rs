use serde::{Deserialize, Serialize};
use snafu::prelude::*;
use std::fs;

use jury_voting::{Contest, EmailDomainDirectory, PointScale, TieBreakMode};
use serde_json::Value as JSValue;

use crate::songfest::*;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct OutputSettings {
    #[serde(rename = "contestName")]
    pub contest_name: String,
    #[serde(rename = "contestDate")]
    pub contest_date: Option<String>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ConfigGroup {
    pub name: String,
    pub domains: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ContestRules {
    #[serde(rename = "tiebreakMode")]
    pub tiebreak_mode: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BallotSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SongfestConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    pub groups: Vec<ConfigGroup>,
    #[serde(rename = "pointScale")]
    pub point_scale: Option<Vec<u32>>,
    pub rules: Option<ContestRules>,
    #[serde(rename = "ballotSources")]
    pub ballot_sources: Option<Vec<BallotSource>>,
}

// The "config" section of the summary.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct OutputConfig {
    pub contest: String,
    pub date: Option<String>,
    pub groups: usize,
    pub ballots: usize,
    pub rejected: usize,
}

pub fn read_config(path: &str) -> SongfestResult<SongfestConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: SongfestConfig = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    Ok(config)
}

pub fn read_summary(path: &str) -> SongfestResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    Ok(js)
}

fn tiebreak_mode(rules: &Option<ContestRules>) -> SongfestResult<TieBreakMode> {
    let mode = rules.as_ref().and_then(|r| r.tiebreak_mode.clone());
    match mode.as_deref() {
        None | Some("alphabetical") => Ok(TieBreakMode::Alphabetical),
        Some("useGroupOrder") => Ok(TieBreakMode::UseGroupOrder),
        Some(x) => whatever!("Unknown tiebreak mode {:?}", x),
    }
}

/// The contest described by the configuration. Without `pointScale`, the
/// song contest scale is used.
pub fn build_contest(config: &SongfestConfig) -> SongfestResult<Contest> {
    let scale = match &config.point_scale {
        Some(values) => PointScale::new(values).context(InvalidContestSnafu {})?,
        None => PointScale::song_contest(),
    };
    let groups: Vec<String> = config.groups.iter().map(|g| g.name.clone()).collect();
    let mode = tiebreak_mode(&config.rules)?;
    Contest::new(&groups, scale, mode).context(InvalidContestSnafu {})
}

pub fn build_directory(
    config: &SongfestConfig,
    contest: &Contest,
) -> SongfestResult<EmailDomainDirectory> {
    let domains: Vec<(String, Vec<String>)> = config
        .groups
        .iter()
        .map(|g| (g.name.clone(), g.domains.clone().unwrap_or_default()))
        .collect();
    EmailDomainDirectory::new(contest, &domains).context(InvalidContestSnafu {})
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(js: &str) -> SongfestConfig {
        serde_json::from_str(js).unwrap()
    }

    #[test]
    fn minimal_config() {
        let config = parse(
            r#"{
            "outputSettings": {"contestName": "test"},
            "groups": [{"name": "A", "domains": ["a.be"]}, {"name": "B"}, {"name": "C"}],
            "pointScale": [1, 0]
        }"#,
        );
        let contest = build_contest(&config).unwrap();
        assert_eq!(contest.groups().len(), 3);
        assert_eq!(contest.tiebreak_mode(), TieBreakMode::Alphabetical);
        let directory = build_directory(&config, &contest).unwrap();
        assert!(directory.is_allowed("x@a.be"));
        assert!(!directory.is_allowed("x@b.be"));
    }

    #[test]
    fn default_scale_needs_twelve_groups() {
        let config = parse(
            r#"{
            "outputSettings": {"contestName": "test"},
            "groups": [{"name": "A"}, {"name": "B"}, {"name": "C"}]
        }"#,
        );
        assert!(build_contest(&config).is_err());
    }

    #[test]
    fn tiebreak_modes() {
        let config = parse(
            r#"{
            "outputSettings": {"contestName": "test"},
            "groups": [{"name": "A"}, {"name": "B"}],
            "pointScale": [0],
            "rules": {"tiebreakMode": "useGroupOrder"}
        }"#,
        );
        let contest = build_contest(&config).unwrap();
        assert_eq!(contest.tiebreak_mode(), TieBreakMode::UseGroupOrder);

        let mut other = config.clone();
        other.rules = Some(ContestRules {
            tiebreak_mode: Some("random".to_string()),
        });
        assert!(build_contest(&other).is_err());
    }
}
