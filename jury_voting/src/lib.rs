mod ballot;
pub mod builder;
mod config;
mod directory;
pub mod manual;
mod store;
mod tally;

use log::{debug, info, warn};

use std::{cmp::Ordering, collections::HashMap, ops::AddAssign};

pub use crate::ballot::*;
pub use crate::config::*;
pub use crate::directory::*;
pub use crate::store::*;
pub use crate::tally::*;

// **** Private structures ****

// Position of a group in the contest.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
struct GroupId(usize);

#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash)]
struct PointTotal(u64);

impl PointTotal {
    const EMPTY: PointTotal = PointTotal(0);
}

impl std::iter::Sum for PointTotal {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        PointTotal(iter.map(|pt| pt.0).sum())
    }
}

impl AddAssign for PointTotal {
    fn add_assign(&mut self, rhs: PointTotal) {
        self.0 += rhs.0;
    }
}

// The points received by one recipient from all the voters of one jury.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
struct JuryScore {
    recipient: GroupId,
    // All the ballots of a jury share the same denominator, so the sum orders
    // the recipients exactly like the average.
    sum: PointTotal,
}

/// Computes the outcome of the contest from the stored ballots.
///
/// Each group with at least one ballot acts as a jury: the points of its
/// voters are averaged per recipient, the recipients are ranked by
/// decreasing average and the ranks are mapped onto the point scale. The
/// leaderboard sums, for every recipient, the points of all the juries.
///
/// Groups without ballots are not a jury and give no points. Exact ties are
/// resolved with the tie-break mode of the contest, so the outcome does not
/// depend on the order in which the ballots were recorded.
pub fn compute_results(contest: &Contest, ballots: &BallotsByGroup) -> ContestResults {
    info!(
        "compute_results: {} ballot(s) over {} group(s), tiebreak mode: {:?}",
        ballots.values().map(|v| v.len()).sum::<usize>(),
        contest.groups().len(),
        contest.tiebreak_mode()
    );
    for owner in ballots.keys() {
        if !contest.contains(owner) {
            warn!(
                "compute_results: ignoring ballots from {}, which is not part of the contest",
                owner
            );
        }
    }

    let mut juries: Vec<JuryRanking> = Vec::new();
    let mut totals: HashMap<GroupId, PointTotal> = HashMap::new();
    for (idx, jury_name) in contest.groups().iter().enumerate() {
        let jury_ballots: &[Ballot] = match ballots.get(jury_name) {
            Some(v) if !v.is_empty() => v,
            _ => {
                debug!("compute_results: no ballots from {}, skipping", jury_name);
                continue;
            }
        };
        let ranking = jury_ranking(contest, GroupId(idx), jury_ballots);
        for award in ranking.awards.iter() {
            if let Some(rid) = contest.group_index(&award.recipient) {
                let e = totals.entry(GroupId(rid)).or_insert(PointTotal::EMPTY);
                *e += PointTotal(award.points as u64);
            }
        }
        juries.push(ranking);
    }

    let mut sorted_totals: Vec<(GroupId, PointTotal)> =
        totals.iter().map(|(gid, pt)| (*gid, *pt)).collect();
    sorted_totals.sort_by(|(g1, p1), (g2, p2)| {
        p2.cmp(p1).then_with(|| tiebreak(contest, *g1, *g2))
    });

    let leaderboard: Vec<LeaderboardEntry> = sorted_totals
        .iter()
        .map(|(gid, pt)| LeaderboardEntry {
            group: contest.groups()[gid.0].clone(),
            points: pt.0,
        })
        .collect();
    debug!("compute_results: leaderboard: {:?}", leaderboard);

    ContestResults {
        juries,
        leaderboard,
    }
}

// Invariant: ballots is not empty and all the ballots belong to the jury.
fn jury_ranking(contest: &Contest, jury: GroupId, ballots: &[Ballot]) -> JuryRanking {
    let jury_name = &contest.groups()[jury.0];
    let mut scores: Vec<JuryScore> = contest
        .groups()
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != jury.0)
        .map(|(idx, name)| JuryScore {
            recipient: GroupId(idx),
            // Accepted ballots give points to every other group.
            sum: ballots
                .iter()
                .map(|b| PointTotal(b.points_for(name).unwrap_or(0) as u64))
                .sum(),
        })
        .collect();
    scores.sort_by(|s1, s2| {
        s2.sum
            .cmp(&s1.sum)
            .then_with(|| tiebreak(contest, s1.recipient, s2.recipient))
    });
    debug!("jury_ranking: {}: sorted scores: {:?}", jury_name, scores);

    let num_ballots = ballots.len();
    let awards: Vec<JuryAward> = scores
        .iter()
        .enumerate()
        .map(|(rank, s)| JuryAward {
            recipient: contest.groups()[s.recipient.0].clone(),
            average: s.sum.0 as f64 / num_ballots as f64,
            points: contest.scale().points_at(rank).unwrap_or(0),
        })
        .collect();

    JuryRanking {
        jury: jury_name.clone(),
        ballots: num_ballots,
        awards,
    }
}

// Order between two groups with the same score: the first one is placed first.
fn tiebreak(contest: &Contest, g1: GroupId, g2: GroupId) -> Ordering {
    match contest.tiebreak_mode() {
        TieBreakMode::Alphabetical => contest.groups()[g1.0].cmp(&contest.groups()[g2.0]),
        TieBreakMode::UseGroupOrder => g1.cmp(&g2),
    }
}
