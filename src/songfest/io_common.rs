use std::path::Path;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// The id of the ballot at position `idx` (starting at 0) of a file.
pub fn make_default_id(file_name: &str, idx: usize) -> String {
    format!("{}-{:08}", file_name, idx + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ids() {
        let name = simplify_file_name("/tmp/votes/ballots.json");
        assert_eq!(name, "ballots.json");
        assert_eq!(make_default_id(&name, 0), "ballots.json-00000001");
    }
}
