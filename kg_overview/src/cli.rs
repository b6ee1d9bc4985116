use std::path::PathBuf;

use clap::{
    crate_authors, crate_description, crate_name, crate_version, value_parser, Arg, ArgAction,
    Command,
};

use kg_graph::{check_ident, connection_args, ConnectionConfig};
use utils::{init_log, log_args};

use crate::config::*;

fn parse_label(s: &str) -> Result<String, String> {
    check_ident(s).map(|s| s.to_owned()).map_err(|e| e.to_string())
}

/// Set up definition of command options for clap
fn cli_model() -> Command {
    let cmd = Command::new(crate_name!())
        .about(crate_description!())
        .version(crate_version!())
        .author(crate_authors!());

    connection_args(log_args(cmd))
        .arg(
            Arg::new("log_file")
                .short('L')
                .long("log-file")
                .value_parser(value_parser!(PathBuf))
                .value_name("PATH")
                .default_value("log.txt")
                .help("Analysis log file (overwritten)"),
        )
        .arg(
            Arg::new("control")
                .short('c')
                .long("control")
                .value_parser(value_parser!(String))
                .value_name("STRING")
                .default_value("control")
                .help("Name of the control group"),
        )
        .arg(
            Arg::new("min_occurrence")
                .short('m')
                .long("min-occurrence")
                .value_parser(value_parser!(u64))
                .value_name("INT")
                .default_value("3")
                .help("Minimum number of samples for a disease to be listed"),
        )
        .arg(
            Arg::new("top_k")
                .short('k')
                .long("top")
                .value_parser(value_parser!(usize))
                .value_name("INT")
                .help("Only consider the INT diseases with the most samples"),
        )
        .arg(
            Arg::new("label")
                .short('n')
                .long("label")
                .action(ArgAction::Append)
                .value_parser(parse_label)
                .value_name("LABEL")
                .help("Node label to count (can be repeated) [default: all standard labels]"),
        )
        .arg(
            Arg::new("relationship")
                .short('r')
                .long("relationship")
                .action(ArgAction::Append)
                .value_parser(value_parser!(RelSpec))
                .value_name("START:REL:END")
                .help("Relationship to summarize (can be repeated) [default: all standard relationships]"),
        )
        .arg(
            Arg::new("attribute")
                .short('a')
                .long("attribute")
                .action(ArgAction::Append)
                .value_parser(value_parser!(RelSpec))
                .value_name("START:REL:END:PROPERTY")
                .help("Relationship property to summarize (can be repeated)"),
        )
}

/// Handle command line options.  Set up Config structure
pub fn handle_cli() -> anyhow::Result<Config> {
    // Get matches from command line
    let m = cli_model().get_matches();

    // Setup logging
    init_log(&m)?;

    debug!("Processing command line options");

    let mut cfg = Config::new(
        ConnectionConfig::from_matches(&m),
        m.get_one::<PathBuf>("log_file")
            .expect("Missing default log file")
            .to_owned(),
        m.get_one::<String>("control")
            .expect("Missing default control name")
            .clone(),
    );

    cfg.set_min_occurrence(
        *m.get_one::<u64>("min_occurrence")
            .expect("Missing default min occurrence"),
    );
    if let Some(k) = m.get_one::<usize>("top_k") {
        cfg.set_top_k(*k)
    }
    if let Some(v) = m.get_many::<String>("label") {
        cfg.set_labels(v.cloned().collect())
    }
    if let Some(v) = m.get_many::<RelSpec>("relationship") {
        cfg.set_relationships(v.cloned().collect())
    }
    if let Some(v) = m.get_many::<RelSpec>("attribute") {
        let v: Vec<_> = v.cloned().collect();
        if let Some(r) = v.iter().find(|r| r.attribute.is_none()) {
            return Err(anyhow!("No property given for attribute {}", r));
        }
        cfg.set_attributes(v)
    }
    Ok(cfg)
}
