// Ballots exported from a form to an Excel workbook: one row per answer, an
// e-mail column and one column per group. Other columns are ignored.

use calamine::{open_workbook, DataType, Reader, Xlsx};
use log::debug;
use snafu::prelude::*;

use crate::songfest::io_common::{make_default_id, simplify_file_name};
use crate::songfest::*;

fn get_range(path: &str) -> SongfestResult<calamine::Range<DataType>> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let mut worksheets = workbook.worksheets();
    match worksheets.len() {
        0 => EmptyExcelSnafu {}.fail(),
        1 => {
            let (worksheet_name, wrange) = worksheets.remove(0);
            debug!("get_range: path: {:?} worksheet: {:?}", path, worksheet_name);
            Ok(wrange)
        }
        n => whatever!("The workbook {} has {} worksheets, expected exactly one", path, n),
    }
}

// The raw value of a cell, or None for an empty cell.
fn cell_points(cell: &DataType) -> Option<String> {
    match cell {
        DataType::Empty => None,
        DataType::String(s) if s.trim().is_empty() => None,
        DataType::String(s) => Some(s.trim().to_string()),
        DataType::Int(i) => Some(i.to_string()),
        DataType::Float(f) if f.fract() == 0.0 && *f >= 0.0 && *f <= u32::MAX as f64 => {
            Some(format!("{}", *f as u64))
        }
        other => Some(other.to_string()),
    }
}

fn header_name(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

pub fn read_xlsx_ballots(path: &str, groups: &[String]) -> SongfestResult<Vec<ParsedBallot>> {
    let wrange = get_range(path)?;
    let mut rows = wrange.rows();
    let header: Vec<String> = rows
        .next()
        .context(EmptyExcelSnafu {})?
        .iter()
        .map(header_name)
        .collect();
    debug!("read_xlsx_ballots: header: {:?}", header);

    let email_idx = header
        .iter()
        .position(|h| h.eq_ignore_ascii_case("email") || h.eq_ignore_ascii_case("e-mail"))
        .context(MissingEmailColumnSnafu { path })?;
    let group_cols: Vec<(usize, String)> = header
        .iter()
        .enumerate()
        .filter(|(_, h)| groups.contains(h))
        .map(|(idx, h)| (idx, h.clone()))
        .collect();
    debug!("read_xlsx_ballots: group columns: {:?}", group_cols);

    let file_name = simplify_file_name(path);
    let mut res: Vec<ParsedBallot> = Vec::new();
    for (idx, row) in rows.enumerate() {
        let email = row.get(email_idx).and_then(cell_points);
        let points: Vec<(String, String)> = group_cols
            .iter()
            .filter_map(|(col, group)| {
                row.get(*col)
                    .and_then(cell_points)
                    .map(|value| (group.clone(), value))
            })
            .collect();
        res.push(ParsedBallot {
            id: make_default_id(&file_name, idx),
            email,
            choices: ParsedChoices::Points(points),
        });
    }
    Ok(res)
}
