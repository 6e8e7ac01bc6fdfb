use std::collections::VecDeque;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Mutex, Once};

use tracing::Level;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt::writer::BoxMakeWriter;

static INIT: Once = Once::new();

/// Where log lines end up. The interactive UI owns the terminal, so it logs to
/// a file or nowhere.
#[derive(Debug, Clone)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
    Discard,
}

#[derive(Debug, Clone, Default)]
pub struct Logger {
    prefixes: VecDeque<String>,
}

impl Logger {
    pub fn new() -> Self {
        Self {
            prefixes: VecDeque::new(),
        }
    }

    pub fn with_new_prefixes(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.clear();
        self.prefixes.push_back(prefix.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push_back(prefix.into());
        self
    }

    fn prefix(&self) -> String {
        self.prefixes.iter().map(|p| format!("{} ", p)).collect()
    }

    pub fn info(&self, message: &str) {
        tracing::info!("{}{}", self.prefix(), message);
    }

    pub fn warn(&self, message: &str) {
        tracing::warn!("{}{}", self.prefix(), message);
    }

    pub fn debug(&self, message: &str) {
        tracing::debug!("{}{}", self.prefix(), message);
    }
}

/// Installs the global `fmt` subscriber once. `RUST_LOG` overrides `level`.
pub fn init_logging(level: Level, target: LogTarget) -> std::io::Result<Logger> {
    let (writer, ansi) = match target {
        LogTarget::Stderr => (BoxMakeWriter::new(std::io::stderr), true),
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        LogTarget::Discard => (BoxMakeWriter::new(std::io::sink), false),
    };

    if !tracing::dispatcher::has_been_set() {
        INIT.call_once(|| {
            let filter = EnvFilter::builder()
                .with_default_directive(LevelFilter::from_level(level).into())
                .from_env_lossy();
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(ansi)
                .init();
        });
    }
    Ok(Logger::new())
}
