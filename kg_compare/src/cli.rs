use std::path::PathBuf;

use clap::{
    crate_authors, crate_description, crate_name, crate_version, value_parser, Arg, ArgAction,
    Command,
};

use kg_graph::{connection_args, query::Link, ConnectionConfig};
use utils::{init_log, log_args};

use crate::{compare::Sections, config::*};

/// Set up definition of command options for clap
fn cli_model() -> Command {
    let cmd = Command::new(crate_name!())
        .about(crate_description!())
        .version(crate_version!())
        .author(crate_authors!());

    connection_args(log_args(cmd))
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
            Arg::new("min_samples")
                .short('m')
                .long("min-samples")
                .value_parser(value_parser!(u64))
                .value_name("INT")
                .default_value("5")
                .help("Minimum number of samples for a disease to be compared"),
        )
        .arg(
            Arg::new("link")
                .short('k')
                .long("link")
                .action(ArgAction::Append)
                .value_parser(value_parser!(Link))
                .value_name("RELATIONSHIP:NODE_TYPE")
                .help("Relationship and node type to compare (can be repeated) [default: HAS_PHENOTYPE:Phenotype, HAS_DAMAGE:Gene, HAS_PROTEIN:Protein]"),
        )
        .arg(
            Arg::new("sections")
                .short('s')
                .long("sections")
                .allow_hyphen_values(true)
                .value_parser(value_parser!(Sections))
                .value_name("LIST")
                .help("Comma separated, ascending list of section boundaries for percentage differences [default: -1,-0.75,-0.5,-0.25,-0.1,0,0.1,0.25,0.5,0.75,1]"),
        )
        .arg(
            Arg::new("output_dir")
                .short('o')
                .long("output-dir")
                .value_parser(value_parser!(PathBuf))
                .value_name("PATH")
                .help("Set output directory [default: current directory]"),
        )
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
            Arg::new("no_plot")
                .action(ArgAction::SetTrue)
                .long("no-plot")
                .help("Do not generate comparison plots"),
        )
        .arg(
            Arg::new("plot_occurrences")
                .action(ArgAction::SetTrue)
                .long("plot-occurrences")
                .conflicts_with("no_plot")
                .help("Also plot the occurrences for each disease and the control group"),
        )
        .arg(
            Arg::new("save_analysis")
                .short('S')
                .action(ArgAction::SetTrue)
                .long("save-analysis")
                .help("Write occurrence tables and summaries as CSV files"),
        )
}

/// Handle command line options.  Set up Config structure
pub fn handle_cli() -> anyhow::Result<Config> {
    // Get matches from command line
    let m = cli_model().get_matches();

    // Setup logging
    init_log(&m)?;

    debug!("Processing command line options");

    let links: Vec<Link> = m
        .get_many::<Link>("link")
        .map(|v| v.cloned().collect())
        .unwrap_or_else(Link::defaults);

    let control = m
        .get_one::<String>("control")
        .expect("Missing default control name")
        .clone();

    let mut cfg = Config::new(ConnectionConfig::from_matches(&m), control, links);

    cfg.set_min_samples(
        *m.get_one::<u64>("min_samples")
            .expect("Missing default min samples"),
    );
    if let Some(s) = m.get_one::<Sections>("sections") {
        cfg.set_sections(s.clone())
    }
    if let Some(d) = m.get_one::<PathBuf>("output_dir") {
        cfg.set_output_dir(d.to_owned())
    }
    cfg.set_log_file(
        m.get_one::<PathBuf>("log_file")
            .expect("Missing default log file")
            .to_owned(),
    );
    cfg.set_plot(!m.get_flag("no_plot"), m.get_flag("plot_occurrences"));
    cfg.set_save_analysis(m.get_flag("save_analysis"));

    debug!(
        "Comparing {} against {} for diseases with at least {} samples",
        cfg.links()
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join(", "),
        cfg.control(),
        cfg.min_samples()
    );
    Ok(cfg)
}
