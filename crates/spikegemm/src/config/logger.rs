use super::{GlobalConfig, SetupLogLevel};
use alloc::{string::ToString, sync::Arc, vec::Vec};
use core::fmt::Display;

#[cfg(std_io)]
use std::{
    fs::{File, OpenOptions},
    io::{BufWriter, Write},
    path::PathBuf,
};

/// Configuration of one logger, parameterized by a log level type.
///
/// Several sinks can be enabled at the same time.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(bound = "")]
pub struct LoggerConfig<L: LogLevel> {
    /// Path to the log file, if file logging is enabled.
    #[serde(default)]
    #[cfg(std_io)]
    pub file: Option<PathBuf>,

    /// Whether to append to the log file (true) or overwrite it (false). Defaults to true.
    #[serde(default = "append_default")]
    pub append: bool,

    /// Whether to log to standard output.
    #[serde(default)]
    pub stdout: bool,

    /// Whether to log to standard error.
    #[serde(default)]
    pub stderr: bool,

    /// Optional forwarding to the `log` crate at the given level.
    #[serde(default)]
    pub log: Option<LogCrateLevel>,

    /// Verbosity of this logger.
    #[serde(default)]
    pub level: L,
}

impl<L: LogLevel> Default for LoggerConfig<L> {
    fn default() -> Self {
        Self {
            #[cfg(std_io)]
            file: None,
            append: true,
            stdout: false,
            stderr: false,
            log: None,
            level: L::default(),
        }
    }
}

/// Levels of the `log` crate a logger can forward to.
#[derive(
    Clone, Copy, Debug, Default, serde::Serialize, serde::Deserialize, Hash, PartialEq, Eq,
)]
pub enum LogCrateLevel {
    #[default]
    #[serde(rename = "info")]
    Info,

    #[serde(rename = "debug")]
    Debug,

    #[serde(rename = "trace")]
    Trace,
}

fn append_default() -> bool {
    true
}

/// Trait for types that can be used as log levels in [LoggerConfig].
pub trait LogLevel:
    serde::de::DeserializeOwned + serde::Serialize + Clone + Copy + core::fmt::Debug + Default
{
}

/// Fans setup messages out to the sinks of the global configuration.
#[derive(Debug)]
pub struct Logger {
    loggers: Vec<LoggerKind>,

    /// Global configuration the sinks were built from.
    pub config: Arc<GlobalConfig>,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Creates a logger from [GlobalConfig::get].
    ///
    /// Opens the configured file, so creating a logger is not free.
    pub fn new() -> Self {
        let config = GlobalConfig::get();
        let mut loggers = Vec::new();
        let setup = &config.setup.logger;

        if setup.level != SetupLogLevel::Disabled {
            #[cfg(std_io)]
            if let Some(file) = &setup.file {
                match FileLogger::new(file, setup.append) {
                    Ok(logger) => loggers.push(LoggerKind::File(logger)),
                    Err(err) => log::warn!("Unable to open setup log file {file:?}: {err}"),
                }
            }

            #[cfg(feature = "std")]
            if setup.stdout {
                loggers.push(LoggerKind::Stdout);
            }

            #[cfg(feature = "std")]
            if setup.stderr {
                loggers.push(LoggerKind::Stderr);
            }

            if let Some(level) = setup.log {
                loggers.push(LoggerKind::Log(level));
            }
        }

        Self { loggers, config }
    }

    /// Logs a setup message to every configured sink.
    pub fn log_setup<S: Display>(&mut self, msg: &S) {
        match self.loggers.as_mut_slice() {
            [] => {}
            [logger] => logger.log(msg),
            loggers => {
                let msg = msg.to_string();
                for logger in loggers {
                    logger.log(&msg);
                }
            }
        }
    }
}

#[derive(Debug)]
enum LoggerKind {
    #[cfg(std_io)]
    File(FileLogger),

    #[cfg(feature = "std")]
    Stdout,

    #[cfg(feature = "std")]
    Stderr,

    Log(LogCrateLevel),
}

impl LoggerKind {
    fn log<S: Display>(&mut self, msg: &S) {
        match self {
            #[cfg(std_io)]
            LoggerKind::File(file_logger) => file_logger.log(msg),
            #[cfg(feature = "std")]
            LoggerKind::Stdout => println!("{msg}"),
            #[cfg(feature = "std")]
            LoggerKind::Stderr => eprintln!("{msg}"),
            LoggerKind::Log(level) => match level {
                LogCrateLevel::Info => log::info!("{msg}"),
                LogCrateLevel::Debug => log::debug!("{msg}"),
                LogCrateLevel::Trace => log::trace!("{msg}"),
            },
        }
    }
}

#[derive(Debug)]
#[cfg(std_io)]
struct FileLogger {
    writer: BufWriter<File>,
}

#[cfg(std_io)]
impl FileLogger {
    fn new(path: &PathBuf, append: bool) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .append(append)
            .truncate(!append)
            .create(true)
            .open(path)?;

        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    // Flushes after every message so a crash keeps the setup trail.
    fn log<S: Display>(&mut self, msg: &S) {
        if let Err(err) = writeln!(self.writer, "{msg}").and_then(|_| self.writer.flush()) {
            log::warn!("Unable to write setup log: {err}");
        }
    }
}
