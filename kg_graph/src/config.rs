use clap::{value_parser, Arg, ArgMatches, Command};

/// Connection parameters for the graph database
///
/// Generated from the command line arguments, read only afterwards
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    url: String,
    user: Option<String>,
    password: Option<String>,
    database: String,
}

impl ConnectionConfig {
    pub fn new(url: &str, database: &str) -> Self {
        Self {
            url: url.trim_end_matches('/').to_owned(),
            user: None,
            password: None,
            database: database.to_owned(),
        }
    }

    pub fn set_credentials(&mut self, user: String, password: Option<String>) {
        self.user = Some(user);
        self.password = password;
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    /// Collect connection parameters from matches of a command built with [`connection_args`]
    pub fn from_matches(m: &ArgMatches) -> Self {
        let mut cfg = Self::new(
            m.get_one::<String>("url")
                .map(|s| s.as_str())
                .unwrap_or(DEFAULT_URL),
            m.get_one::<String>("database")
                .map(|s| s.as_str())
                .unwrap_or(DEFAULT_DATABASE),
        );
        if let Some(user) = m.get_one::<String>("user") {
            cfg.set_credentials(user.clone(), m.get_one::<String>("password").cloned())
        }
        debug!(
            "Graph database {} at {} (user: {})",
            cfg.database,
            cfg.url,
            cfg.user().unwrap_or("<none>")
        );
        cfg
    }
}

const DEFAULT_URL: &str = "http://localhost:7474";
const DEFAULT_DATABASE: &str = "neo4j";

/// Add the graph database connection options to a command
pub fn connection_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("url")
            .short('u')
            .long("url")
            .value_parser(value_parser!(String))
            .value_name("URL")
            .default_value(DEFAULT_URL)
            .help("Base URL of the graph database HTTP endpoint"),
    )
    .arg(
        Arg::new("user")
            .short('U')
            .long("user")
            .value_parser(value_parser!(String))
            .value_name("STRING")
            .env("NEO4J_USER")
            .help("User name for the graph database"),
    )
    .arg(
        Arg::new("password")
            .short('p')
            .long("password")
            .value_parser(value_parser!(String))
            .value_name("STRING")
            .env("NEO4J_PASSWORD")
            .hide_env_values(true)
            .requires("user")
            .help("Password for the graph database"),
    )
    .arg(
        Arg::new("database")
            .short('d')
            .long("database")
            .value_parser(value_parser!(String))
            .value_name("STRING")
            .default_value(DEFAULT_DATABASE)
            .help("Name of the database to query"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_from_command_line() {
        let m = connection_args(Command::new("test")).get_matches_from([
            "test",
            "--url",
            "http://graph.example.org:7474/",
            "-U",
            "reader",
            "-p",
            "secret",
            "-d",
            "graph2.db",
        ]);
        let cfg = ConnectionConfig::from_matches(&m);
        assert_eq!(cfg.url(), "http://graph.example.org:7474");
        assert_eq!(cfg.user(), Some("reader"));
        assert_eq!(cfg.password(), Some("secret"));
        assert_eq!(cfg.database(), "graph2.db");
    }

    #[test]
    fn connection_defaults() {
        let cfg = ConnectionConfig::new(DEFAULT_URL, DEFAULT_DATABASE);
        assert_eq!(cfg.url(), "http://localhost:7474");
        assert_eq!(cfg.user(), None);
        assert_eq!(cfg.database(), "neo4j");
    }
}
