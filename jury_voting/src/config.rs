// ********* Errors ***********

use snafu::{ensure, Snafu};
use std::collections::HashSet;

/// The reasons for which a submission is turned down.
///
/// None of them is fatal: the submission is discarded and nothing is recorded.
#[derive(Eq, PartialEq, Debug, Clone, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum BallotError {
    /// The voter handed points to their own group.
    #[snafu(display("voters from {group} may not vote for their own group"))]
    SelfVote { group: String },
    /// The points are not exactly the values of the scale, each used once.
    #[snafu(display("points must be exactly {expected:?}, each used once, but got {got:?}"))]
    PointScaleMismatch { expected: Vec<u32>, got: Vec<u32> },
    /// The groups receiving points are not all the other groups of the contest.
    #[snafu(display(
        "the ballot of {group} must give points to every other group exactly once, got {got:?}"
    ))]
    GroupSetMismatch { group: String, got: Vec<String> },
    /// A point value could not be read as a non-negative integer.
    #[snafu(display("could not read the points {value:?} given to {group}"))]
    InvalidPoints { group: String, value: String },
    /// The voter does not belong to any group of the contest.
    #[snafu(display("no participating group found for voter {voter:?}"))]
    UnknownVoterGroup { voter: String },
}

impl BallotError {
    /// A stable identifier for the rejection, meant for machines.
    pub fn reason_code(&self) -> &'static str {
        match self {
            BallotError::SelfVote { .. } => "self-vote",
            BallotError::PointScaleMismatch { .. } => "point-scale-mismatch",
            BallotError::GroupSetMismatch { .. } => "group-set-mismatch",
            BallotError::InvalidPoints { .. } => "invalid-points",
            BallotError::UnknownVoterGroup { .. } => "unknown-voter-group",
        }
    }
}

/// Errors in the description of a contest. They are detected once, when the
/// contest is built, and should stop the program.
#[derive(Eq, PartialEq, Debug, Clone, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ConfigError {
    #[snafu(display("a contest needs at least 2 groups, got {count}"))]
    NotEnoughGroups { count: usize },
    #[snafu(display("group names may not be empty"))]
    EmptyGroupName {},
    #[snafu(display("group {name} is declared more than once"))]
    DuplicateGroup { name: String },
    #[snafu(display(
        "the point scale has {scale_len} values but {groups} groups need {} values",
        groups - 1
    ))]
    ScaleLength { scale_len: usize, groups: usize },
    #[snafu(display("the point scale must be strictly decreasing: {values:?}"))]
    ScaleNotDescending { values: Vec<u32> },
    #[snafu(display("the last value of the point scale must be 0: {values:?}"))]
    ScaleWithoutZero { values: Vec<u32> },
    #[snafu(display("domain {domain} is mapped to {group}, which is not part of the contest"))]
    UnknownDirectoryGroup { group: String, domain: String },
}

// ********* Configuration **********

/// The points handed out by the juries of the song contest, from the first
/// place to the last one.
pub const SONG_CONTEST_SCALE: [u32; 11] = [12, 10, 8, 7, 6, 5, 4, 3, 2, 1, 0];

/// How to order two groups that have exactly the same score.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum TieBreakMode {
    /// The group whose name comes first (byte order) is placed first.
    Alphabetical,
    /// The group declared first in the contest is placed first.
    UseGroupOrder,
}

/// The values handed out by one jury, one per rank.
///
/// Invariant: strictly decreasing, and the last value is 0.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PointScale(Vec<u32>);

impl PointScale {
    pub fn new(values: &[u32]) -> Result<PointScale, ConfigError> {
        ensure!(
            values.windows(2).all(|w| w[0] > w[1]),
            ScaleNotDescendingSnafu {
                values: values.to_vec()
            }
        );
        ensure!(
            values.last() == Some(&0),
            ScaleWithoutZeroSnafu {
                values: values.to_vec()
            }
        );
        Ok(PointScale(values.to_vec()))
    }

    pub fn song_contest() -> PointScale {
        PointScale(SONG_CONTEST_SCALE.to_vec())
    }

    pub fn values(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The points for the given rank (0 is the best rank).
    pub fn points_at(&self, rank: usize) -> Option<u32> {
        self.0.get(rank).cloned()
    }
}

/// A validated contest: the closed set of groups, and the scale used by every
/// jury.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Contest {
    groups: Vec<String>,
    scale: PointScale,
    tiebreak_mode: TieBreakMode,
}

impl Contest {
    pub fn new(
        groups: &[String],
        scale: PointScale,
        tiebreak_mode: TieBreakMode,
    ) -> Result<Contest, ConfigError> {
        ensure!(
            groups.len() >= 2,
            NotEnoughGroupsSnafu {
                count: groups.len()
            }
        );
        let mut seen: HashSet<&str> = HashSet::new();
        for name in groups.iter() {
            ensure!(!name.trim().is_empty(), EmptyGroupNameSnafu {});
            ensure!(seen.insert(name.as_str()), DuplicateGroupSnafu { name });
        }
        ensure!(
            scale.len() + 1 == groups.len(),
            ScaleLengthSnafu {
                scale_len: scale.len(),
                groups: groups.len()
            }
        );
        Ok(Contest {
            groups: groups.to_vec(),
            scale,
            tiebreak_mode,
        })
    }

    /// The groups, in the order in which they were declared.
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    pub fn scale(&self) -> &PointScale {
        &self.scale
    }

    pub fn tiebreak_mode(&self) -> TieBreakMode {
        self.tiebreak_mode
    }

    pub fn contains(&self, group: &str) -> bool {
        self.group_index(group).is_some()
    }

    pub(crate) fn group_index(&self, group: &str) -> Option<usize> {
        self.groups.iter().position(|g| g == group)
    }

    /// All the groups a voter of `group` has to give points to.
    pub fn other_groups<'a>(
        &'a self,
        group: &'a str,
    ) -> impl DoubleEndedIterator<Item = &'a String> + 'a {
        self.groups.iter().filter(move |g| g.as_str() != group)
    }
}

// ******** Output data structures *********

/// The points given by one jury to one recipient.
#[derive(PartialEq, Debug, Clone)]
pub struct JuryAward {
    pub recipient: String,
    /// The mean of the points given by the voters of the jury.
    pub average: f64,
    pub points: u32,
}

/// The outcome of the vote of one group, seen as a single jury.
#[derive(PartialEq, Debug, Clone)]
pub struct JuryRanking {
    pub jury: String,
    /// The number of ballots cast by the voters of this group.
    pub ballots: usize,
    /// Ordered by rank, the best ranked recipient first.
    pub awards: Vec<JuryAward>,
}

impl JuryRanking {
    pub fn points_for(&self, recipient: &str) -> Option<u32> {
        self.awards
            .iter()
            .find(|a| a.recipient == recipient)
            .map(|a| a.points)
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct LeaderboardEntry {
    pub group: String,
    pub points: u64,
}

#[derive(PartialEq, Debug, Clone)]
pub struct ContestResults {
    /// Only the groups with at least one ballot, in the order of the contest.
    pub juries: Vec<JuryRanking>,
    /// Ordered by decreasing number of points.
    pub leaderboard: Vec<LeaderboardEntry>,
}

impl ContestResults {
    pub fn jury(&self, group: &str) -> Option<&JuryRanking> {
        self.juries.iter().find(|j| j.jury == group)
    }

    pub fn total_for(&self, group: &str) -> Option<u64> {
        self.leaderboard
            .iter()
            .find(|e| e.group == group)
            .map(|e| e.points)
    }

    pub fn winner(&self) -> Option<&str> {
        self.leaderboard.first().map(|e| e.group.as_str())
    }
}
