// Ballots stored as a JSON array.

use log::debug;
use serde::Deserialize;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use snafu::prelude::*;
use std::fs;

use crate::songfest::io_common::{make_default_id, simplify_file_name};
use crate::songfest::*;

#[derive(Deserialize, Debug)]
struct JsonBallot {
    email: Option<String>,
    points: Option<JSMap<String, JSValue>>,
    ranking: Option<Vec<String>>,
}

// Strings are kept as they are, so that "12" and 12 mean the same thing.
// Anything else is checked later as its JSON text.
fn raw_points(value: &JSValue) -> String {
    match value {
        JSValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn read_json_ballots(path: &str) -> SongfestResult<Vec<ParsedBallot>> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let raw: Vec<JsonBallot> = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    let file_name = simplify_file_name(path);
    let mut res: Vec<ParsedBallot> = Vec::new();
    for (idx, jb) in raw.into_iter().enumerate() {
        let id = make_default_id(&file_name, idx);
        let choices = match (jb.points, jb.ranking) {
            (Some(points), None) => ParsedChoices::Points(
                points
                    .iter()
                    .map(|(group, value)| (group.clone(), raw_points(value)))
                    .collect(),
            ),
            (None, Some(ranking)) => ParsedChoices::Ranking(ranking),
            _ => whatever!("Ballot {} must have either 'points' or 'ranking'", id),
        };
        debug!("read_json_ballots: {}: {:?}", id, choices);
        res.push(ParsedBallot {
            id,
            email: jb.email,
            choices,
        });
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_points_and_rankings() {
        let path = format!(
            "{}/tests/data/songfest_small/ballots.json",
            env!("CARGO_MANIFEST_DIR")
        );
        let ballots = read_json_ballots(&path).unwrap();
        assert_eq!(ballots.len(), 8);
        assert_eq!(ballots[0].id, "ballots.json-00000001");
        assert_eq!(ballots[0].email.as_deref(), Some("a@hogent.be"));
        assert_eq!(
            ballots[2].choices,
            ParsedChoices::Ranking(vec![
                "Utrecht".to_string(),
                "Gent".to_string(),
                "Tilburg".to_string()
            ])
        );
        assert_eq!(
            ballots[3].choices,
            ParsedChoices::Points(vec![
                ("Gent".to_string(), "0".to_string()),
                ("Leuven".to_string(), "5".to_string()),
                ("Utrecht".to_string(), "3".to_string()),
            ])
        );
    }

    #[test]
    fn raw_points_of_values() {
        assert_eq!(raw_points(&JSValue::from(12)), "12");
        assert_eq!(raw_points(&JSValue::from("10")), "10");
        assert_eq!(raw_points(&JSValue::Null), "null");
    }
}
