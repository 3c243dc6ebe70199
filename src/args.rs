use clap::Parser;

/// This is a tabulation program for jury-style (song contest) votes between groups.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The JSON file describing the contest: groups, e-mail domains, point scale
    /// and ballot sources. See the manual of the jury_voting crate for the format.
    #[clap(short, long, value_parser)]
    pub config: String,

    /// (file path) A reference file containing the outcome of a contest in JSON format. If
    /// provided, songfest will check that the tabulated output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the contest will be written
    /// in JSON format to the given location. Setting this option overrides the output directory
    /// that may be specified in the configuration.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) If specified, the ballots are read from this file instead of the
    /// sources listed in the configuration.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default json) The type of the input given with --input: json, csv or xlsx.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
