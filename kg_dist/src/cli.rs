use std::path::PathBuf;

use clap::{
    crate_authors, crate_description, crate_name, crate_version, value_parser, Arg, Command,
};

use utils::{init_log, log_args};

use crate::config::*;

/// Set up definition of command options for clap
fn cli_model() -> Command {
    let cmd = Command::new(crate_name!())
        .about(crate_description!())
        .version(crate_version!())
        .author(crate_authors!());

    log_args(cmd)
        .arg(
            Arg::new("output")
                .short('o')
                .long("output-file")
                .value_parser(value_parser!(PathBuf))
                .value_name("PATH")
                .default_value("disease_distribution.png")
                .help("Set output plot file"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_parser(value_parser!(u64))
                .value_name("INT")
                .help("Seed for the estimated counts of unlisted diseases"),
        )
        .arg(
            Arg::new("log_file")
                .value_parser(value_parser!(PathBuf))
                .value_name("LOG_FILE")
                .default_value("log.txt")
                .help("Analysis log written by kg_overview"),
        )
}

/// Handle command line options.  Set up Config structure
pub fn handle_cli() -> anyhow::Result<Config> {
    // Get matches from command line
    let m = cli_model().get_matches();

    // Setup logging
    init_log(&m)?;

    debug!("Processing command line options");

    let input = m
        .get_one::<PathBuf>("log_file")
        .expect("Missing default log file")
        .to_owned();
    let output = m
        .get_one::<PathBuf>("output")
        .expect("Missing default output file")
        .to_owned();
    Ok(Config::new(input, output, m.get_one::<u64>("seed").copied()))
}
