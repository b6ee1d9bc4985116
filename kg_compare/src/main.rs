mod cli;
mod compare;
mod config;
mod plot;
mod process;
mod report;

#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;

use anyhow::Context;
use kg_graph::Neo4jHttp;

fn main() -> anyhow::Result<()> {
    let cfg = cli::handle_cli().with_context(|| "Error processing command line arguments")?;
    let db = Neo4jHttp::new(cfg.connection().clone())?;
    process::process_diseases(&cfg, &db)
}
