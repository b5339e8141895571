use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{configuration_error, Error};

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub public_dir: PathBuf,
    pub bind_addr: SocketAddr,
    pub capture: CaptureConfig,
}

#[derive(Clone, Debug)]
pub struct CaptureConfig {
    pub concurrency: usize,
    pub navigation_timeout: Duration,
    pub settle_delay: Duration,
    pub chrome_executable: Option<PathBuf>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            concurrency: 2,
            navigation_timeout: Duration::from_secs(60),
            settle_delay: Duration::from_millis(2000),
            chrome_executable: None,
        }
    }
}

impl Config {
    /// Reads the process environment. Call `dotenv` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, Error> {
        let defaults = CaptureConfig::default();

        let capture = CaptureConfig {
            concurrency: parse_var("CAPTURE_CONCURRENCY", defaults.concurrency)?,
            navigation_timeout: Duration::from_secs(parse_var(
                "CAPTURE_NAVIGATION_TIMEOUT_SECS",
                defaults.navigation_timeout.as_secs(),
            )?),
            settle_delay: Duration::from_millis(parse_var(
                "CAPTURE_SETTLE_MILLIS",
                defaults.settle_delay.as_millis() as u64,
            )?),
            chrome_executable: env::var("CHROME_EXECUTABLE").ok().map(PathBuf::from),
        };

        if capture.concurrency == 0 {
            return Err(configuration_error("CAPTURE_CONCURRENCY must be at least 1"));
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://trafico.sqlite".into()),
            database_max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 5)?,
            public_dir: env::var("PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("public")),
            bind_addr: parse_var("BIND_ADDR", SocketAddr::from(([127, 0, 0, 1], 3000)))?,
            capture,
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T, Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|err| configuration_error(format!("{}: {}", name, err))),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(err) => Err(err.into()),
    }
}

#[test]
fn parse_var_falls_back_to_default() {
    let value: u32 = parse_var("MAPZONES_TEST_UNSET_VARIABLE", 7).unwrap();
    assert_eq!(value, 7);
}

#[test]
fn parse_var_rejects_malformed_value() {
    env::set_var("MAPZONES_TEST_MALFORMED_VARIABLE", "not-a-number");

    let err = parse_var::<u32>("MAPZONES_TEST_MALFORMED_VARIABLE", 7).unwrap_err();
    assert_eq!(err.kind, crate::error::ErrorKind::Configuration);
}
