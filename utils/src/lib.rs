#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;

use std::{
    fmt,
    fs::{File, OpenOptions},
    io::{BufRead, Write},
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

/// LogLevel
///
/// Represents minimum level of messages that will be logged
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLevel {
    pub level: usize,
}

impl FromStr for LogLevel {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(LogLevel { level: 0 }),
            "warn" => Ok(LogLevel { level: 1 }),
            "info" => Ok(LogLevel { level: 2 }),
            "debug" => Ok(LogLevel { level: 3 }),
            "trace" => Ok(LogLevel { level: 4 }),
            "none" => Ok(LogLevel { level: 5 }),
            _ => Err("no match"),
        }
    }
}

impl LogLevel {
    pub fn is_none(&self) -> bool {
        self.level > 4
    }
    pub fn get_level(&self) -> usize {
        if self.level > 4 {
            0
        } else {
            self.level
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let level_str = ["error", "warn", "info", "debug", "trace", "none"];
        if self.level < 6 {
            write!(f, "{}", level_str[self.level])
        } else {
            write!(f, "unknown")
        }
    }
}

/// Add the logging options shared by all of the tools (timestamp, loglevel, quiet)
pub fn log_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("timestamp")
            .short('X')
            .long("timestamp")
            .value_parser(value_parser!(stderrlog::Timestamp))
            .value_name("GRANULARITY")
            .default_value("none")
            .help("Prepend log entries with a timestamp"),
    )
    .arg(
        Arg::new("loglevel")
            .short('l')
            .long("loglevel")
            .value_name("LOGLEVEL")
            .value_parser(value_parser!(LogLevel))
            .ignore_case(true)
            .default_value("info")
            .help("Set log level"),
    )
    .arg(
        Arg::new("quiet")
            .action(ArgAction::SetTrue)
            .long("quiet")
            .conflicts_with("loglevel")
            .help("Silence all output"),
    )
}

/// Initialize logging from command line arguments
pub fn init_log(m: &ArgMatches) -> anyhow::Result<()> {
    let verbose = m
        .get_one::<LogLevel>("loglevel")
        .copied()
        .unwrap_or(LogLevel { level: 2 });
    let quiet = verbose.is_none() || m.get_flag("quiet");
    let ts = m
        .get_one::<stderrlog::Timestamp>("timestamp")
        .copied()
        .unwrap_or(stderrlog::Timestamp::Off);

    stderrlog::new()
        .quiet(quiet)
        .verbosity(verbose.get_level())
        .timestamp(ts)
        .init()
        .with_context(|| "Could not initialize logging")
}

/// Read in next line, returning it with surrounding white space trimmed
pub fn get_next_line<'a, R: BufRead>(
    rdr: &mut R,
    buf: &'a mut String,
) -> anyhow::Result<Option<&'a str>> {
    buf.clear();
    if rdr.read_line(buf)? == 0 {
        Ok(None)
    } else {
        Ok(Some(buf.trim()))
    }
}

const SECTION_RULE: &str = "-------------------------";

/// Header line used to start a section of the analysis log
pub fn section_header(title: &str) -> String {
    format!("{} {} {}", SECTION_RULE, title, SECTION_RULE)
}

/// Returns true if line is a section header (of any section)
pub fn is_section_header(line: &str) -> bool {
    line.starts_with(SECTION_RULE)
}

/// AnalysisLog
///
/// Plain text, append only log of the human readable analysis summaries.
/// Every line written is also echoed to the program log at info level.
pub struct AnalysisLog {
    path: PathBuf,
    file: File,
}

impl AnalysisLog {
    /// Create a new log, truncating any existing file
    pub fn create<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref().to_owned();
        debug!("Creating analysis log {}", path.display());
        let file = File::create(&path)
            .with_context(|| format!("Could not create analysis log {}", path.display()))?;
        Ok(Self { path, file })
    }

    /// Open an existing log (or create one) for appending
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref().to_owned();
        debug!("Opening analysis log {} for appending", path.display());
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Could not open analysis log {}", path.display()))?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn line<D: fmt::Display>(&mut self, msg: D) -> anyhow::Result<()> {
        let s = msg.to_string();
        info!("{}", s);
        writeln!(self.file, "{}", s)
            .with_context(|| format!("Error writing to analysis log {}", self.path.display()))
    }

    pub fn blank(&mut self) -> anyhow::Result<()> {
        writeln!(self.file)
            .with_context(|| format!("Error writing to analysis log {}", self.path.display()))
    }

    /// Start a new section, preceded by an empty line
    pub fn section(&mut self, title: &str) -> anyhow::Result<()> {
        if title.is_empty() {
            return Err(anyhow!("Empty section title"));
        }
        self.blank()?;
        self.line(section_header(title))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn log_level_names() {
        assert_eq!(LogLevel::from_str("WARN").unwrap().level, 1);
        assert!(LogLevel::from_str("none").unwrap().is_none());
        assert_eq!(LogLevel::from_str("none").unwrap().get_level(), 0);
        assert!(LogLevel::from_str("loud").is_err());
        assert_eq!(LogLevel { level: 3 }.to_string(), "debug");
        assert_eq!(LogLevel { level: 9 }.to_string(), "unknown");
    }

    #[test]
    fn next_line_is_trimmed() {
        let mut rdr = Cursor::new("  first line \nsecond\n");
        let mut buf = String::new();
        assert_eq!(get_next_line(&mut rdr, &mut buf).unwrap(), Some("first line"));
        assert_eq!(get_next_line(&mut rdr, &mut buf).unwrap(), Some("second"));
        assert_eq!(get_next_line(&mut rdr, &mut buf).unwrap(), None);
    }

    #[test]
    fn section_headers() {
        let h = section_header("Node counts");
        assert_eq!(
            h,
            "------------------------- Node counts -------------------------"
        );
        assert!(is_section_header(&h));
        assert!(!is_section_header("Gene: 12"));
    }

    #[test]
    fn analysis_log_truncates_then_appends() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("log.txt");
        std::fs::write(&p, "old content\n").unwrap();

        let mut log = AnalysisLog::create(&p).unwrap();
        log.line("Disease analysis").unwrap();
        log.section("Node counts").unwrap();
        drop(log);

        let mut log = AnalysisLog::open(&p).unwrap();
        log.line(format_args!("Gene: {}", 12)).unwrap();
        assert_eq!(log.path(), p.as_path());
        drop(log);

        let s = std::fs::read_to_string(&p).unwrap();
        assert_eq!(
            s,
            "Disease analysis\n\n------------------------- Node counts -------------------------\nGene: 12\n"
        );
    }
}
