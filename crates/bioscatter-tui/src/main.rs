#![forbid(unsafe_code)]

//! bioscatter entry point.
//!
//! # Controls
//!
//! - 1 / 2 / 3: k-means, DBSCAN, hierarchical results
//! - arrows or left-drag: pan
//! - + / - or mouse wheel: zoom (wheel zooms about the cursor)
//! - r: reset the view
//! - q / Esc / Ctrl+C: quit

use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};

use bioscatter_client::{
    CacheStore, ClusterBackend, ClusterClient, FileCache, HttpBackend, MemoryCache,
    StaticFileBackend,
};
use bioscatter_tui::config::{BackendKind, Config, ConfigError, USAGE};
use bioscatter_tui::{Program, ScatterApp};

fn init_logging(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = tracing_subscriber::EnvFilter::try_from_env("BIOSCATTER_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn build_client(config: &Config) -> Result<ClusterClient, Box<dyn std::error::Error>> {
    let backend: Arc<dyn ClusterBackend> = match &config.backend {
        BackendKind::Http(url) => Arc::new(HttpBackend::new(url.clone())?),
        BackendKind::Static(dir) => Arc::new(StaticFileBackend::new(dir.clone())),
    };
    let cache: Arc<dyn CacheStore> = match &config.cache_dir {
        Some(dir) => Arc::new(FileCache::open(dir.clone())?),
        None => Arc::new(MemoryCache::new()),
    };
    Ok(ClusterClient::new(backend, cache))
}

fn main() {
    let config = match Config::from_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(ConfigError::HelpRequested) => {
            print!("{USAGE}");
            return;
        }
        Err(e) => {
            eprintln!("bioscatter: {e}");
            eprint!("{USAGE}");
            std::process::exit(2);
        }
    };

    if let Err(e) = init_logging(&config) {
        eprintln!("Failed to open log file: {e}");
        std::process::exit(1);
    }

    let client = match build_client(&config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            eprintln!("Failed to initialize: {e}");
            std::process::exit(1);
        }
    };

    let app = ScatterApp::new(client);
    if let Err(e) = Program::new(app).run() {
        eprintln!("Runtime error: {e}");
        std::process::exit(1);
    }
}
