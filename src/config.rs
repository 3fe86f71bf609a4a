//! Startup configuration: command-line flags merged with the conventional
//! `PG*` environment variables and hardcoded defaults, in that priority
//! order. Parsed once, never mutated.

use clap::Parser;

/// Runtime configuration for a pgq invocation.
///
/// Unknown flags are rejected at startup (no connection is attempted).
/// `-h` is claimed by `--host` to match the conventional client flags, so
/// the automatic help short flag is disabled and help is `--help` only.
#[derive(Debug, Parser)]
#[command(
    name = "pgq",
    version,
    about = "Run PostgreSQL queries from the command line, printing rows as JSON",
    disable_help_flag = true
)]
pub struct Config {
    /// SQL to execute; `-` or absent means read the query from stdin.
    /// Ignored in session mode, where each input line is a query.
    pub query: Option<String>,

    /// Server host name or address
    #[arg(short = 'h', long, env = "PGHOST", default_value = "localhost")]
    pub host: String,

    /// Server port
    #[arg(short = 'o', long, env = "PGPORT", default_value_t = 5432)]
    pub port: u16,

    /// Role to authenticate as
    #[arg(short = 'u', long, env = "PGUSER", default_value_t = default_user())]
    pub user: String,

    // The single-space default is deliberate; an empty string reads as no
    // password at all.
    /// Password for the role
    #[arg(
        short = 'p',
        long,
        env = "PGPASSWORD",
        default_value = " ",
        hide_default_value = true
    )]
    pub password: String,

    /// Database to connect to (server default when omitted)
    #[arg(short = 'd', long, env = "PGDATABASE")]
    pub database: Option<String>,

    /// Server-side statement timeout, in seconds
    #[arg(short = 't', long, default_value_t = 60)]
    pub timeout: u64,

    /// Positional bind parameter ($1, $2, ...); repeatable, order-preserving,
    /// reused for every query in session mode
    #[arg(short = 'm', long = "param", value_name = "VALUE")]
    pub params: Vec<String>,

    /// Keep the connection open and execute one query per line of input
    /// until interrupted
    #[arg(short = 's', long)]
    pub session: bool,

    /// Print help
    #[arg(long, action = clap::ArgAction::HelpLong)]
    help: Option<bool>,
}

impl Config {
    /// Statement timeout converted to the milliseconds the server expects.
    pub fn timeout_ms(&self) -> u64 {
        self.timeout * 1000
    }

    /// Builds the driver connection config, including the server-side
    /// statement timeout as a startup option.
    pub fn pg(&self) -> tokio_postgres::Config {
        let mut pg = tokio_postgres::Config::new();
        pg.host(&self.host)
            .port(self.port)
            .user(&self.user)
            .password(&self.password)
            .options(&format!("-c statement_timeout={}", self.timeout_ms()));
        if let Some(database) = &self.database {
            pg.dbname(database);
        }
        pg
    }
}

/// Fallback role name when neither `--user` nor `PGUSER` is given: the
/// current OS user, or `postgres` when the environment does not say.
fn default_user() -> String {
    std::env::var("USER").unwrap_or_else(|_| String::from("postgres"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Tests that read or write PG* variables serialize on this lock so the
    // process environment stays consistent under the parallel test runner.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("pgq").chain(args.iter().copied()))
            .expect("parse failed")
    }

    #[test]
    fn test_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::remove_var("PGHOST");
        std::env::remove_var("PGPORT");
        std::env::remove_var("PGDATABASE");

        let config = parse(&[]);
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 5432);
        assert_eq!(config.database, None);
        assert_eq!(config.timeout, 60);
        assert!(config.params.is_empty());
        assert!(!config.session);
        assert_eq!(config.query, None);
    }

    #[test]
    fn test_flags_override_environment() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var("PGHOST", "db.internal");
        std::env::set_var("PGPORT", "6543");

        let from_env = parse(&[]);
        assert_eq!(from_env.host, "db.internal");
        assert_eq!(from_env.port, 6543);

        let from_flags = parse(&["--host", "other", "-o", "5433"]);
        assert_eq!(from_flags.host, "other");
        assert_eq!(from_flags.port, 5433);

        std::env::remove_var("PGHOST");
        std::env::remove_var("PGPORT");
    }

    #[test]
    fn test_password_defaults_to_single_space() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::remove_var("PGPASSWORD");

        let config = parse(&[]);
        assert_eq!(config.password, " ");
    }

    #[test]
    fn test_params_preserve_order() {
        let config = parse(&["-m", "1", "--param", "two", "-m", "3"]);
        assert_eq!(config.params, vec!["1", "two", "3"]);
    }

    #[test]
    fn test_positional_query_and_session_flag() {
        let config = parse(&["-s", "select 1"]);
        assert!(config.session);
        assert_eq!(config.query.as_deref(), Some("select 1"));

        let dash = parse(&["-"]);
        assert_eq!(dash.query.as_deref(), Some("-"));
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        let result = Config::try_parse_from(["pgq", "--bogus"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_timeout_converts_to_milliseconds() {
        let config = parse(&["-t", "5"]);
        assert_eq!(config.timeout_ms(), 5000);
    }

    #[test]
    fn test_pg_config_carries_connection_settings() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::remove_var("PGHOST");
        std::env::remove_var("PGPORT");
        std::env::remove_var("PGDATABASE");

        let config = parse(&["-u", "app", "-d", "appdb", "-t", "2"]);
        let pg = config.pg();
        assert_eq!(pg.get_user(), Some("app"));
        assert_eq!(pg.get_dbname(), Some("appdb"));
        assert_eq!(pg.get_options(), Some("-c statement_timeout=2000"));
        assert_eq!(pg.get_ports(), &[5432]);
    }
}
