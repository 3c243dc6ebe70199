// Ballots stored as a CSV file: one row per voter, one column per group.

use log::debug;
use snafu::prelude::*;

use crate::songfest::io_common::{make_default_id, simplify_file_name};
use crate::songfest::*;

pub fn read_csv_ballots(path: &str) -> SongfestResult<Vec<ParsedBallot>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let headers = rdr.headers().context(CsvOpenSnafu { path })?.clone();
    ensure!(
        headers
            .get(0)
            .map(|h| h.eq_ignore_ascii_case("email"))
            .unwrap_or(false),
        MissingEmailColumnSnafu { path }
    );
    let groups: Vec<String> = headers.iter().skip(1).map(|s| s.to_string()).collect();
    debug!("read_csv_ballots: groups: {:?}", groups);

    let file_name = simplify_file_name(path);
    let mut res: Vec<ParsedBallot> = Vec::new();
    for (idx, line) in rdr.records().enumerate() {
        // The header is the first line.
        let record = line.context(CsvLineParseSnafu { lineno: idx + 2 })?;
        let email = record
            .get(0)
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());
        let points: Vec<(String, String)> = groups
            .iter()
            .zip(record.iter().skip(1))
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(group, cell)| (group.clone(), cell.to_string()))
            .collect();
        res.push(ParsedBallot {
            id: make_default_id(&file_name, idx),
            email,
            choices: ParsedChoices::Points(points),
        });
    }
    Ok(res)
}
