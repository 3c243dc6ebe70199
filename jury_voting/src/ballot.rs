use log::debug;
use snafu::{ensure, OptionExt};
use std::collections::{BTreeMap, HashSet};

use crate::config::*;

/// The points a voter wants to hand out, as submitted.
///
/// Nothing is checked at this stage: the same group may appear several times
/// and the points may be anything. See [validate].
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Submission {
    entries: Vec<(String, u32)>,
}

impl Submission {
    pub fn new() -> Submission {
        Submission::default()
    }

    pub fn push(&mut self, group: &str, points: u32) {
        self.entries.push((group.to_string(), points));
    }

    pub fn with(mut self, group: &str, points: u32) -> Submission {
        self.push(group, points);
        self
    }

    /// Reads points as they come from a form or an export.
    ///
    /// Every value must be a non-negative integer. Anything else fails the
    /// whole submission.
    pub fn parse(raw: &[(String, String)]) -> Result<Submission, BallotError> {
        let mut entries: Vec<(String, u32)> = Vec::new();
        for (group, value) in raw.iter() {
            entries.push((group.clone(), parse_points(group, value)?));
        }
        Ok(Submission { entries })
    }

    /// Turns an ordered list of groups (favourite first) into points: the
    /// group at position `i` receives the value at rank `i` of the scale.
    ///
    /// Groups beyond the length of the scale get no value.
    pub fn from_ranking(contest: &Contest, ranking: &[String]) -> Submission {
        let entries = ranking
            .iter()
            .enumerate()
            .filter_map(|(rank, group)| {
                contest
                    .scale()
                    .points_at(rank)
                    .map(|points| (group.clone(), points))
            })
            .collect();
        Submission { entries }
    }

    pub fn entries(&self) -> &[(String, u32)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, u32)> for Submission {
    fn from_iter<I: IntoIterator<Item = (String, u32)>>(iter: I) -> Self {
        Submission {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Parses one point value. Surrounding whitespace is accepted, signs,
/// decimals and exponents are not.
pub fn parse_points(group: &str, raw: &str) -> Result<u32, BallotError> {
    let s = raw.trim();
    let valid_digits = !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    ensure!(valid_digits, InvalidPointsSnafu { group, value: raw });
    s.parse::<u32>()
        .ok()
        .context(InvalidPointsSnafu { group, value: raw })
}

/// An accepted ballot: every other group of the contest received exactly one
/// value of the scale.
///
/// It can only be obtained through [validate] and does not change afterwards.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Ballot {
    owner: String,
    scores: BTreeMap<String, u32>,
}

impl Ballot {
    /// The group of the voter.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn points_for(&self, group: &str) -> Option<u32> {
        self.scores.get(group).cloned()
    }

    pub fn scores(&self) -> &BTreeMap<String, u32> {
        &self.scores
    }
}

/// Checks a submission from a voter of `voter_group`.
///
/// The checks run in this order and stop at the first failure:
/// 1. the voter's group must be part of the contest
/// 2. the voter's own group must not receive points
/// 3. the points must be the values of the scale, each used once
/// 4. the groups must be all the other groups of the contest, each once
pub fn validate(
    contest: &Contest,
    voter_group: &str,
    submission: &Submission,
) -> Result<Ballot, BallotError> {
    ensure!(
        contest.contains(voter_group),
        UnknownVoterGroupSnafu { voter: voter_group }
    );

    let is_self_vote = submission.entries.iter().any(|(g, _)| g == voter_group);
    ensure!(!is_self_vote, SelfVoteSnafu { group: voter_group });

    let scale = contest.scale().values();
    let mut got: Vec<u32> = submission.entries.iter().map(|(_, p)| *p).collect();
    got.sort_unstable_by(|a, b| b.cmp(a));
    let matches_scale = got.len() == scale.len()
        && scale
            .iter()
            .all(|p| got.iter().filter(|x| *x == p).count() == 1);
    ensure!(
        matches_scale,
        PointScaleMismatchSnafu {
            expected: scale.to_vec(),
            got
        }
    );
    // The scale ends with 0, so the check above already enforces a single 0.
    debug_assert_eq!(got.iter().filter(|p| **p == 0).count(), 1);

    let expected: HashSet<&str> = contest.other_groups(voter_group).map(|g| g.as_str()).collect();
    let keys: HashSet<&str> = submission.entries.iter().map(|(g, _)| g.as_str()).collect();
    let matches_groups = submission.entries.len() == expected.len()
        && keys.len() == submission.entries.len()
        && keys == expected;
    ensure!(
        matches_groups,
        GroupSetMismatchSnafu {
            group: voter_group,
            got: submission
                .entries
                .iter()
                .map(|(g, _)| g.clone())
                .collect::<Vec<String>>()
        }
    );

    debug!("validate: accepted ballot from {}", voter_group);
    Ok(Ballot {
        owner: voter_group.to_string(),
        scores: submission.entries.iter().cloned().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Four groups and three values: every voter ranks the three other groups.
    fn contest() -> Contest {
        let groups: Vec<String> = ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect();
        Contest::new(
            &groups,
            PointScale::new(&[3, 2, 0]).unwrap(),
            TieBreakMode::Alphabetical,
        )
        .unwrap()
    }

    #[test]
    fn accepts_complete_ballot() {
        let s = Submission::new().with("B", 3).with("C", 0).with("D", 2);
        let b = validate(&contest(), "A", &s).unwrap();
        assert_eq!(b.owner(), "A");
        assert_eq!(b.points_for("B"), Some(3));
        assert_eq!(b.points_for("C"), Some(0));
        assert_eq!(b.points_for("D"), Some(2));
        assert_eq!(b.points_for("A"), None);
    }

    #[test]
    fn order_of_entries_does_not_matter() {
        let s1 = Submission::new().with("B", 3).with("C", 0).with("D", 2);
        let s2 = Submission::new().with("D", 2).with("B", 3).with("C", 0);
        assert_eq!(validate(&contest(), "A", &s1), validate(&contest(), "A", &s2));
    }

    #[test]
    fn self_vote_is_rejected_whatever_the_points() {
        let valid_points = Submission::new().with("A", 3).with("C", 0).with("D", 2);
        let garbage = Submission::new().with("A", 100);
        for s in [valid_points, garbage] {
            let err = validate(&contest(), "A", &s).unwrap_err();
            assert_eq!(
                err,
                BallotError::SelfVote {
                    group: "A".to_string()
                }
            );
            assert_eq!(err.reason_code(), "self-vote");
        }
    }

    #[test]
    fn repeated_value_is_rejected() {
        let s = Submission::new().with("B", 3).with("C", 3).with("D", 0);
        let err = validate(&contest(), "A", &s).unwrap_err();
        assert_eq!(err.reason_code(), "point-scale-mismatch");
    }

    #[test]
    fn missing_group_is_rejected() {
        let s = Submission::new().with("B", 3).with("C", 0);
        let err = validate(&contest(), "A", &s).unwrap_err();
        // Only two values for a scale of three.
        assert_eq!(
            err,
            BallotError::PointScaleMismatch {
                expected: vec![3, 2, 0],
                got: vec![3, 0]
            }
        );
    }

    #[test]
    fn value_outside_scale_is_rejected() {
        let s = Submission::new().with("B", 3).with("C", 1).with("D", 2);
        let err = validate(&contest(), "A", &s).unwrap_err();
        assert_eq!(err.reason_code(), "point-scale-mismatch");
    }

    #[test]
    fn duplicated_group_reports_group_mismatch() {
        // D is missing and B appears twice, but the values are the scale.
        let s = Submission::new().with("B", 3).with("B", 2).with("C", 0);
        let err = validate(&contest(), "A", &s).unwrap_err();
        assert_eq!(
            err,
            BallotError::GroupSetMismatch {
                group: "A".to_string(),
                got: vec!["B".to_string(), "B".to_string(), "C".to_string()]
            }
        );
    }

    #[test]
    fn unknown_recipient_reports_group_mismatch() {
        let s = Submission::new().with("B", 3).with("C", 0).with("Z", 2);
        let err = validate(&contest(), "A", &s).unwrap_err();
        assert_eq!(err.reason_code(), "group-set-mismatch");
    }

    #[test]
    fn unknown_voter_group() {
        let s = Submission::new().with("B", 3).with("C", 0).with("D", 2);
        let err = validate(&contest(), "Z", &s).unwrap_err();
        assert_eq!(
            err,
            BallotError::UnknownVoterGroup {
                voter: "Z".to_string()
            }
        );
    }

    #[test]
    fn parse_points_is_strict() {
        assert_eq!(parse_points("B", "12"), Ok(12));
        assert_eq!(parse_points("B", " 7 "), Ok(7));
        for bad in ["", "twelve", "-1", "+1", "1.0", "1e1", "99999999999"] {
            assert_eq!(
                parse_points("B", bad),
                Err(BallotError::InvalidPoints {
                    group: "B".to_string(),
                    value: bad.to_string()
                }),
                "{:?} should not parse",
                bad
            );
        }
    }

    #[test]
    fn parse_submission() {
        let raw = vec![
            ("B".to_string(), "3".to_string()),
            ("C".to_string(), "0".to_string()),
            ("D".to_string(), "2".to_string()),
        ];
        let s = Submission::parse(&raw).unwrap();
        assert!(validate(&contest(), "A", &s).is_ok());

        let raw_bad = vec![
            ("B".to_string(), "3".to_string()),
            ("C".to_string(), "zero".to_string()),
        ];
        assert_eq!(
            Submission::parse(&raw_bad).unwrap_err().reason_code(),
            "invalid-points"
        );
    }

    #[test]
    fn ranking_follows_scale() {
        let ranking: Vec<String> = ["D", "B", "C"].iter().map(|s| s.to_string()).collect();
        let s = Submission::from_ranking(&contest(), &ranking);
        assert_eq!(
            s,
            Submission::new().with("D", 3).with("B", 2).with("C", 0)
        );
        assert!(validate(&contest(), "A", &s).is_ok());
    }

    #[test]
    fn ranking_longer_than_scale_is_truncated() {
        let ranking: Vec<String> = ["D", "B", "C", "A"].iter().map(|s| s.to_string()).collect();
        let s = Submission::from_ranking(&contest(), &ranking);
        assert_eq!(s.len(), 3);
    }
}
