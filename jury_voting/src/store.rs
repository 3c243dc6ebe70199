use log::debug;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::ballot::Ballot;

/// The accepted ballots, grouped by the group of their voters.
pub type BallotsByGroup = HashMap<String, Vec<Ballot>>;

/// Append-only storage of the accepted ballots.
///
/// Appending takes the write lock for a single push, and readers hold the
/// read lock for their whole computation. A reader therefore sees a ballot
/// either completely or not at all.
#[derive(Debug, Default)]
pub struct BallotStore {
    ballots: RwLock<BallotsByGroup>,
}

impl BallotStore {
    pub fn new() -> BallotStore {
        BallotStore::default()
    }

    pub fn record(&self, ballot: Ballot) {
        // A panic elsewhere cannot leave a half-pushed ballot behind, so a
        // poisoned lock is still consistent.
        let mut ballots = self.ballots.write().unwrap_or_else(PoisonError::into_inner);
        let owner = ballot.owner().to_string();
        let group_ballots = ballots.entry(owner.clone()).or_default();
        group_ballots.push(ballot);
        debug!(
            "record: {} ballot(s) stored for group {}",
            group_ballots.len(),
            owner
        );
    }

    /// Runs `f` against a consistent view of the ballots.
    pub fn read<R, F: FnOnce(&BallotsByGroup) -> R>(&self, f: F) -> R {
        let ballots = self.ballots.read().unwrap_or_else(PoisonError::into_inner);
        f(&ballots)
    }

    /// The total number of ballots.
    pub fn len(&self) -> usize {
        self.read(|b| b.values().map(|v| v.len()).sum())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn count_for(&self, group: &str) -> usize {
        self.read(|b| b.get(group).map(|v| v.len()).unwrap_or(0))
    }

    /// Drops every ballot.
    pub fn reset(&self) {
        let mut ballots = self.ballots.write().unwrap_or_else(PoisonError::into_inner);
        ballots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ballot::{validate, Submission};
    use crate::config::*;
    use std::sync::Arc;
    use std::thread;

    fn contest() -> Contest {
        let groups: Vec<String> = ["A", "B", "C"].iter().map(|s| s.to_string()).collect();
        Contest::new(
            &groups,
            PointScale::new(&[1, 0]).unwrap(),
            TieBreakMode::Alphabetical,
        )
        .unwrap()
    }

    fn ballot_from(group: &str) -> Ballot {
        let c = contest();
        let others: Vec<String> = c.other_groups(group).cloned().collect();
        validate(&c, group, &Submission::from_ranking(&c, &others)).unwrap()
    }

    #[test]
    fn record_appends_per_group() {
        let store = BallotStore::new();
        assert!(store.is_empty());
        store.record(ballot_from("A"));
        store.record(ballot_from("A"));
        store.record(ballot_from("B"));
        assert_eq!(store.len(), 3);
        assert_eq!(store.count_for("A"), 2);
        assert_eq!(store.count_for("B"), 1);
        assert_eq!(store.count_for("C"), 0);
    }

    #[test]
    fn reset_empties_the_store() {
        let store = BallotStore::new();
        store.record(ballot_from("C"));
        store.reset();
        assert!(store.is_empty());
        store.record(ballot_from("C"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn concurrent_records_are_all_kept() {
        let store = Arc::new(BallotStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let group = ["A", "B", "C"][i % 3];
                    for _ in 0..25 {
                        store.record(ballot_from(group));
                        // Readers never see a group with an empty list.
                        store.read(|b| assert!(b.values().all(|v| !v.is_empty())));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.len(), 200);
    }
}
