use log::{info, warn};
use snafu::OptionExt;

use crate::ballot::*;
use crate::config::*;
use crate::directory::VoterDirectory;
use crate::store::BallotStore;

/// A running contest: validates submissions, keeps the accepted ballots and
/// computes the results on demand.
///
/// It can be shared between threads (behind an `Arc`): submissions are
/// appended atomically and results are always computed on a consistent set
/// of ballots.
///
/// Several voters of the same group each cast a full ballot, and their
/// ballots are averaged into the jury of the group. Limiting voters to one
/// ballot each is up to the [VoterDirectory].
#[derive(Debug)]
pub struct JuryTally {
    contest: Contest,
    store: BallotStore,
}

impl JuryTally {
    /// Starts a contest with no ballots.
    pub fn new(contest: Contest) -> JuryTally {
        info!(
            "JuryTally: new contest with groups {:?} and scale {:?}",
            contest.groups(),
            contest.scale().values()
        );
        JuryTally {
            contest,
            store: BallotStore::new(),
        }
    }

    pub fn contest(&self) -> &Contest {
        &self.contest
    }

    /// Validates the submission of a voter from `voter_group` and records it.
    ///
    /// A rejected submission leaves the ballots untouched.
    pub fn submit_ballot(
        &self,
        voter_group: &str,
        submission: &Submission,
    ) -> Result<Ballot, BallotError> {
        match validate(&self.contest, voter_group, submission) {
            Ok(ballot) => {
                self.store.record(ballot.clone());
                info!("submit_ballot: recorded a ballot from {}", voter_group);
                Ok(ballot)
            }
            Err(e) => {
                warn!(
                    "submit_ballot: rejected a ballot from {} ({}): {}",
                    voter_group,
                    e.reason_code(),
                    e
                );
                Err(e)
            }
        }
    }

    /// Same as [JuryTally::submit_ballot], the group being found from the
    /// identity of the voter.
    pub fn submit_from_identity<D: VoterDirectory + ?Sized>(
        &self,
        directory: &D,
        identity: &str,
        submission: &Submission,
    ) -> Result<Ballot, BallotError> {
        let group = directory
            .resolve_voter_group(identity)
            .context(UnknownVoterGroupSnafu { voter: identity })
            .map_err(|e| {
                warn!("submit_from_identity: {}", e);
                e
            })?;
        self.submit_ballot(&group, submission)
    }

    /// The results over all the ballots recorded so far.
    pub fn results(&self) -> ContestResults {
        self.store
            .read(|ballots| crate::compute_results(&self.contest, ballots))
    }

    pub fn ballot_count(&self) -> usize {
        self.store.len()
    }

    /// The number of ballots per group, in the order of the contest.
    pub fn ballots_by_group(&self) -> Vec<(String, usize)> {
        self.store.read(|ballots| {
            self.contest
                .groups()
                .iter()
                .map(|g| (g.clone(), ballots.get(g).map(|v| v.len()).unwrap_or(0)))
                .collect()
        })
    }

    /// Drops all the ballots. The contest itself does not change.
    pub fn reset(&self) {
        warn!("reset: dropping {} ballot(s)", self.store.len());
        self.store.reset();
    }
}
