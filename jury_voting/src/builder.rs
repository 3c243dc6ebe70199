pub use crate::ballot::*;
pub use crate::config::*;

use log::debug;

/// A builder for tabulating a batch of ballots, for example an export of a
/// voting form.
///
/// Unlike [crate::JuryTally], it keeps track of the rejected submissions.
///
/// ```
/// pub use jury_voting::builder::Builder;
/// pub use jury_voting::{Contest, PointScale, TieBreakMode};
/// # use jury_voting::BallotError;
///
/// let groups = vec!["Gent".to_string(), "Leuven".to_string(), "Utrecht".to_string()];
/// let scale = PointScale::new(&[2, 0]).unwrap();
/// let contest = Contest::new(&groups, scale, TieBreakMode::Alphabetical).unwrap();
/// let mut builder = Builder::new(&contest);
///
/// builder.add_ranking("Gent", &["Utrecht".to_string(), "Leuven".to_string()])?;
/// assert!(builder.add_ranking("Gent", &["Gent".to_string()]).is_err());
///
/// let results = builder.results();
/// assert_eq!(results.winner(), Some("Utrecht"));
/// assert_eq!(builder.rejected().len(), 1);
///
/// # Ok::<(), BallotError>(())
/// ```
pub struct Builder {
    pub(crate) _contest: Contest,
    pub(crate) _ballots: Vec<Ballot>,
    pub(crate) _rejected: Vec<(usize, BallotError)>,
    pub(crate) _submitted: usize,
}

impl Builder {
    pub fn new(contest: &Contest) -> Builder {
        Builder {
            _contest: contest.clone(),
            _ballots: Vec::new(),
            _rejected: Vec::new(),
            _submitted: 0,
        }
    }

    /// Adds the points of a voter from `voter_group`.
    ///
    /// A rejected submission is remembered with its position (starting at 0)
    /// among all the submissions of this builder.
    pub fn add_ballot(
        &mut self,
        voter_group: &str,
        submission: &Submission,
    ) -> Result<(), BallotError> {
        let position = self._submitted;
        self._submitted += 1;
        match validate(&self._contest, voter_group, submission) {
            Ok(ballot) => {
                self._ballots.push(ballot);
                Ok(())
            }
            Err(e) => {
                debug!("add_ballot: submission {} rejected: {}", position, e);
                self._rejected.push((position, e.clone()));
                Err(e)
            }
        }
    }

    /// Adds the ranking of a voter, favourite first.
    pub fn add_ranking(
        &mut self,
        voter_group: &str,
        ranking: &[String],
    ) -> Result<(), BallotError> {
        let submission = Submission::from_ranking(&self._contest, ranking);
        self.add_ballot(voter_group, &submission)
    }

    pub fn ballots(&self) -> &[Ballot] {
        &self._ballots
    }

    pub fn rejected(&self) -> &[(usize, BallotError)] {
        &self._rejected
    }

    pub fn results(&self) -> ContestResults {
        let mut by_group: crate::BallotsByGroup = crate::BallotsByGroup::new();
        for b in self._ballots.iter() {
            by_group
                .entry(b.owner().to_string())
                .or_default()
                .push(b.clone());
        }
        crate::compute_results(&self._contest, &by_group)
    }
}
