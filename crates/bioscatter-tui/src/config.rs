#![forbid(unsafe_code)]

//! Command line and environment configuration.
//!
//! Flags win over environment variables. `BIOSCATTER_LOG` carries the
//! tracing filter; logging goes to a file because stdout belongs to the
//! renderer.

use std::env;
use std::fmt;
use std::path::PathBuf;

/// Where cluster results come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendKind {
    /// POST to a clustering service at this base URL.
    Http(String),
    /// Read pre-computed result files from a directory.
    Static(PathBuf),
}

/// Resolved viewer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub backend: BackendKind,
    /// Result cache directory; `None` keeps the cache in memory only.
    pub cache_dir: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

/// Default clustering service address.
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";

/// A flag the parser rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `-h`/`--help`; the caller prints usage and exits cleanly.
    HelpRequested,
    UnknownFlag(String),
    MissingValue(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HelpRequested => f.write_str("help requested"),
            Self::UnknownFlag(flag) => write!(f, "unknown flag '{flag}'"),
            Self::MissingValue(flag) => write!(f, "flag '{flag}' requires a value"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Usage text for `--help` and flag errors.
pub const USAGE: &str = "\
bioscatter - scatter plot viewer for clustered biodiversity embeddings

USAGE:
    bioscatter [OPTIONS]

OPTIONS:
    --backend <URL>     Clustering service base URL
                        (default http://127.0.0.1:5000, env BIOSCATTER_BACKEND)
    --data-dir <PATH>   Read static result files instead of a service
                        (env BIOSCATTER_DATA_DIR)
    --cache-dir <PATH>  Persist fetched results under PATH
                        (default: the user cache directory,
                        env BIOSCATTER_CACHE_DIR)
    --no-cache          Keep results in memory only
    --log <PATH>        Append tracing output to PATH
                        (filter via BIOSCATTER_LOG, e.g. debug)
    -h, --help          Show this help
";

/// The per-user cache directory, following XDG conventions with a
/// temp-dir fallback for environments without a home.
fn default_cache_dir() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_CACHE_HOME")
        && !xdg.is_empty()
    {
        return PathBuf::from(xdg).join("bioscatter");
    }
    if let Ok(home) = env::var("HOME")
        && !home.is_empty()
    {
        return PathBuf::from(home).join(".cache").join("bioscatter");
    }
    env::temp_dir().join("bioscatter")
}

impl Config {
    /// Parse configuration from arguments (without the program name).
    pub fn from_args(args: impl IntoIterator<Item = String>) -> Result<Self, ConfigError> {
        let mut backend_url = env::var("BIOSCATTER_BACKEND").ok();
        let mut data_dir = env::var("BIOSCATTER_DATA_DIR").ok().map(PathBuf::from);
        let mut cache_dir = env::var("BIOSCATTER_CACHE_DIR").ok().map(PathBuf::from);
        let mut no_cache = false;
        let mut log_file: Option<PathBuf> = None;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let mut value_for = |flag: &str| {
                args.next()
                    .ok_or_else(|| ConfigError::MissingValue(flag.to_string()))
            };
            match arg.as_str() {
                "-h" | "--help" => return Err(ConfigError::HelpRequested),
                "--backend" => backend_url = Some(value_for("--backend")?),
                "--data-dir" => data_dir = Some(PathBuf::from(value_for("--data-dir")?)),
                "--cache-dir" => cache_dir = Some(PathBuf::from(value_for("--cache-dir")?)),
                "--no-cache" => no_cache = true,
                "--log" => log_file = Some(PathBuf::from(value_for("--log")?)),
                other => return Err(ConfigError::UnknownFlag(other.to_string())),
            }
        }

        let backend = match data_dir {
            Some(dir) => BackendKind::Static(dir),
            None => BackendKind::Http(
                backend_url.unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string()),
            ),
        };
        let cache_dir = if no_cache {
            None
        } else {
            Some(cache_dir.unwrap_or_else(default_cache_dir))
        };

        Ok(Self {
            backend,
            cache_dir,
            log_file,
        })
    }
}
