use log::{debug, info, warn};

use jury_voting::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::songfest::config_reader::*;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_json;
mod io_xlsx;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SongfestError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing the summary to {path}"))]
    WritingJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON: {source}"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of the CSV file"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Error opening Excel file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Empty Excel file"))]
    EmptyExcel {},
    #[snafu(display("Could not find the e-mail column of {path}"))]
    MissingEmailColumn { path: String },
    #[snafu(display("Invalid contest description: {source}"))]
    InvalidContest { source: ConfigError },
    #[snafu(display("Could not find the directory of the configuration file"))]
    MissingParentDir {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SongfestResult<T> = Result<T, SongfestError>;

/// The choices of a voter, as found in the input. They are checked by the
/// tally, not by the readers.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ParsedChoices {
    /// Raw point values per group.
    Points(Vec<(String, String)>),
    /// Groups in order of preference.
    Ranking(Vec<String>),
}

/// A ballot, as parsed by the readers.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedBallot {
    pub id: String,
    pub email: Option<String>,
    pub choices: ParsedChoices,
}

fn read_ballot_file(
    path: &str,
    provider: &str,
    groups: &[String],
) -> SongfestResult<Vec<ParsedBallot>> {
    info!("Attempting to read ballot file {:?}", path);
    match provider {
        "json" => io_json::read_json_ballots(path),
        "csv" => io_csv::read_csv_ballots(path),
        "xlsx" => io_xlsx::read_xlsx_ballots(path, groups),
        x => whatever!("Provider not implemented {:?}", x),
    }
}

fn read_ballots(
    args: &Args,
    config: &SongfestConfig,
    contest: &Contest,
    root_p: &Path,
) -> SongfestResult<Vec<ParsedBallot>> {
    if let Some(input) = &args.input {
        let provider = args.input_type.clone().unwrap_or_else(|| "json".to_string());
        return read_ballot_file(input, &provider, contest.groups());
    }

    let sources = config.ballot_sources.clone().unwrap_or_default();
    if sources.is_empty() {
        whatever!("No ballot sources in the configuration and no --input given")
    }
    let mut res: Vec<ParsedBallot> = Vec::new();
    for source in sources.iter() {
        let p: PathBuf = root_p.join(&source.file_path);
        let mut file_data =
            read_ballot_file(&p.display().to_string(), &source.provider, contest.groups())?;
        res.append(&mut file_data);
    }
    Ok(res)
}

fn submission_of(contest: &Contest, choices: &ParsedChoices) -> Result<Submission, BallotError> {
    match choices {
        ParsedChoices::Points(points) => Submission::parse(points),
        ParsedChoices::Ranking(ranking) => Ok(Submission::from_ranking(contest, ranking)),
    }
}

/// Submits all the ballots and returns the number of rejected ones.
fn tabulate(
    tally: &JuryTally,
    directory: &dyn VoterDirectory,
    ballots: &[ParsedBallot],
) -> usize {
    let mut rejected: usize = 0;
    for pb in ballots.iter() {
        let voter = pb.email.clone().unwrap_or_default();
        // The identity is resolved first: nothing else matters for unknown voters.
        let res = match directory.resolve_voter_group(&voter) {
            None => Err(BallotError::UnknownVoterGroup { voter }),
            Some(group) => submission_of(tally.contest(), &pb.choices)
                .and_then(|s| tally.submit_ballot(&group, &s)),
        };
        if let Err(e) = res {
            warn!("ballot {}: rejected ({}): {}", pb.id, e.reason_code(), e);
            rejected += 1;
        }
    }
    rejected
}

fn log_results(results: &ContestResults) {
    for jury in results.juries.iter() {
        info!("Jury {} ({} ballot(s))", jury.jury, jury.ballots);
        for award in jury.awards.iter() {
            info!(
                "      {:>3} {} (average: {:.2})",
                award.points, award.recipient, award.average
            );
        }
    }
    if results.leaderboard.is_empty() {
        info!("No ballots yet");
    }
    for (idx, entry) in results.leaderboard.iter().enumerate() {
        info!("{:>3}. {} {}", idx + 1, entry.group, entry.points);
    }
}

fn result_stats_to_json(results: &ContestResults) -> (JSValue, JSValue) {
    let mut jury: JSMap<String, JSValue> = JSMap::new();
    for j in results.juries.iter() {
        let mut awards: JSMap<String, JSValue> = JSMap::new();
        for award in j.awards.iter() {
            awards.insert(award.recipient.clone(), json!(award.points));
        }
        jury.insert(j.jury.clone(), JSValue::Object(awards));
    }
    let leaderboard: Vec<JSValue> = results
        .leaderboard
        .iter()
        .map(|e| json!({"group": e.group, "points": e.points}))
        .collect();
    (JSValue::Object(jury), JSValue::Array(leaderboard))
}

fn build_summary_js(
    config: &SongfestConfig,
    tally: &JuryTally,
    results: &ContestResults,
    rejected: usize,
) -> JSValue {
    let c = OutputConfig {
        contest: config.output_settings.contest_name.clone(),
        date: config.output_settings.contest_date.clone(),
        groups: tally.contest().groups().len(),
        ballots: tally.ballot_count(),
        rejected,
    };
    let (jury, leaderboard) = result_stats_to_json(results);
    json!({
        "config": c,
        "jury": jury,
        "results": leaderboard })
}

fn write_summary(
    pretty_js: &str,
    args: &Args,
    config: &SongfestConfig,
    root_p: &Path,
) -> SongfestResult<()> {
    let out_path: Option<PathBuf> = match (&args.out, &config.output_settings.output_directory) {
        (Some(out), _) if out == "stdout" => {
            println!("{}", pretty_js);
            None
        }
        (Some(out), _) => Some(PathBuf::from(out)),
        (None, Some(dir)) => {
            let dir_p = root_p.join(dir);
            fs::create_dir_all(&dir_p).context(WritingJsonSnafu {
                path: dir_p.display().to_string(),
            })?;
            Some(dir_p.join("summary.json"))
        }
        (None, None) => None,
    };
    if let Some(p) = out_path {
        let path = p.display().to_string();
        info!("Writing summary to {:?}", path);
        fs::write(&p, pretty_js).context(WritingJsonSnafu { path })?;
    }
    Ok(())
}

/// Runs a whole contest: reads the configuration and the ballots, tallies them
/// and writes the summary. Returns the summary.
pub fn run_contest(args: &Args) -> SongfestResult<JSValue> {
    let config = read_config(&args.config)?;
    debug!("config: {:?}", config);
    let config_p = Path::new(args.config.as_str());
    let root_p = config_p.parent().context(MissingParentDirSnafu {})?;

    let contest = build_contest(&config)?;
    let directory = build_directory(&config, &contest)?;

    let ballots = read_ballots(args, &config, &contest, root_p)?;
    info!("Read {} ballot(s)", ballots.len());

    let tally = JuryTally::new(contest);
    let rejected = tabulate(&tally, &directory, &ballots);
    info!(
        "{} ballot(s) accepted, {} rejected",
        tally.ballot_count(),
        rejected
    );
    for (group, count) in tally.ballots_by_group() {
        debug!("{}: {} ballot(s)", group, count);
    }

    let results = tally.results();
    log_results(&results);

    let result_js = build_summary_js(&config, &tally, &results, rejected);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
    write_summary(&pretty_js_stats, args, &config, root_p)?;

    // The reference summary, if provided for comparison
    if let Some(summary_p) = &args.reference {
        let summary_ref = read_summary(summary_p)?;
        debug!("summary: {:?}", summary_ref);
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference string");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
    }

    Ok(result_js)
}
