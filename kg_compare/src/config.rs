use std::path::{Path, PathBuf};

use kg_graph::{query::Link, ConnectionConfig};

use crate::compare::Sections;

/// Config
///
/// Configuration info for the program
/// This is generated from the command line arguments
/// Once set it is read only
///
/// connection - graph database connection parameters
/// control - name of the control 'disease'
/// min_samples - minimum number of samples for a disease to be analyzed
/// links - relationships from samples to the node types being compared
/// sections - boundaries used to bucket the percentage differences
/// output_dir - per-disease folders are created below this
/// log_file - analysis log
///
pub struct Config {
    connection: ConnectionConfig,
    control: String,
    min_samples: u64,
    links: Vec<Link>,
    sections: Sections,
    output_dir: PathBuf,
    log_file: PathBuf,
    plot: bool,
    plot_occurrences: bool,
    save_analysis: bool,
}

impl Config {
    pub fn new(connection: ConnectionConfig, control: String, links: Vec<Link>) -> Self {
        Self {
            connection,
            control,
            min_samples: 5,
            links,
            sections: Sections::default(),
            output_dir: PathBuf::from("."),
            log_file: PathBuf::from("log.txt"),
            plot: true,
            plot_occurrences: false,
            save_analysis: false,
        }
    }

    pub fn set_min_samples(&mut self, n: u64) {
        self.min_samples = n
    }
    pub fn set_sections(&mut self, s: Sections) {
        self.sections = s
    }
    pub fn set_output_dir(&mut self, d: PathBuf) {
        self.output_dir = d
    }
    pub fn set_log_file(&mut self, p: PathBuf) {
        self.log_file = p
    }
    pub fn set_plot(&mut self, plot: bool, plot_occurrences: bool) {
        self.plot = plot;
        self.plot_occurrences = plot_occurrences;
    }
    pub fn set_save_analysis(&mut self, x: bool) {
        self.save_analysis = x
    }

    pub fn connection(&self) -> &ConnectionConfig {
        &self.connection
    }

    pub fn control(&self) -> &str {
        &self.control
    }

    pub fn min_samples(&self) -> u64 {
        self.min_samples
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn sections(&self) -> &Sections {
        &self.sections
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    pub fn plot(&self) -> bool {
        self.plot
    }

    pub fn plot_occurrences(&self) -> bool {
        self.plot_occurrences
    }

    pub fn save_analysis(&self) -> bool {
        self.save_analysis
    }
}
