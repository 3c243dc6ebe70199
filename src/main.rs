mod args;
mod songfest;

use clap::Parser;
use log::{debug, error, LevelFilter};
use snafu::ErrorCompat;

use crate::args::Args;

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);
    debug!("args: {:?}", args);

    if let Err(e) = songfest::run_contest(&args) {
        error!("Error occured {:?}", e);
        eprintln!("An error occured: {}", e);
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        }
        std::process::exit(1);
    }
}
