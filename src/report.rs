//! Logging and error reporting for a walk.
//!
//! Nothing here is global: a [`Config`] travels with every walk and decides
//! where log lines go and whether a problem aborts the walk. A `Config` is
//! `Send + Sync`, so several walks on several threads can share one.

use std::fmt;
use std::path::Path as FsPath;

use crate::error::{Error, ErrorCode};
use crate::walk::JsonKind;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Error,
    Trace,
}

/// Threshold for the default log sink. A custom logger ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum LogLevel {
    Off,
    #[default]
    Error,
    Trace,
}

pub type Logger = Box<dyn Fn(Severity, &str) + Send + Sync>;

/// `Ok(())` suppresses the fault and lets the walk go on, `Err(code)` aborts
/// with `code`. Ignored for fatal codes.
pub type ErrorHandler = Box<dyn Fn(&Fault<'_>) -> Result<(), ErrorCode> + Send + Sync>;

/// A problem found while ingesting or walking, as handed to an [`ErrorHandler`].
#[derive(Debug)]
pub struct Fault<'a> {
    pub code: ErrorCode,
    pub reason: &'static str,
    pub message: &'a str,
    pub detail: Detail<'a>,
}

#[derive(Debug)]
pub enum Detail<'a> {
    File {
        path: &'a FsPath,
        source: &'a std::io::Error,
    },
    Json {
        source: &'a serde_json::Error,
    },
    /// Value at `path` didn't fit the node (or the node itself is corrupt).
    Node {
        key: Option<&'a str>,
        description: &'a str,
        path: &'a str,
        found: JsonKind,
    },
    /// Fixed-key map at `path` got an undeclared `key`.
    Key {
        key: &'a str,
        path: &'a str,
    },
}

/// Per-walk reporting setup.
///
/// Without a custom logger, messages that pass the threshold are emitted as
/// `tracing` events (`error!`/`trace!`, target `json_bind::report`). Nothing is
/// printed unless the application installs a subscriber, e.g. one from
/// `tracing-subscriber` writing to stderr.
#[derive(Default)]
pub struct Config {
    log_level: LogLevel,
    logger: Option<Logger>,
    error_handler: Option<ErrorHandler>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl LogLevel {
    pub fn allows(self, severity: Severity) -> bool {
        match self {
            LogLevel::Off => false,
            LogLevel::Error => severity == Severity::Error,
            LogLevel::Trace => true,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Trace => "trace",
        })
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    pub fn with_logger(mut self, logger: impl Fn(Severity, &str) + Send + Sync + 'static) -> Self {
        self.logger = Some(Box::new(logger));
        self
    }

    pub fn with_error_handler(
        mut self,
        handler: impl Fn(&Fault<'_>) -> Result<(), ErrorCode> + Send + Sync + 'static,
    ) -> Self {
        self.error_handler = Some(Box::new(handler));
        self
    }

    pub fn set_log_level(&mut self, level: LogLevel) {
        self.log_level = level;
    }

    /// `None` goes back to the default sink.
    pub fn set_logger(&mut self, logger: Option<Logger>) {
        self.logger = logger;
    }

    /// `None` goes back to the default handler (log and propagate).
    pub fn set_error_handler(&mut self, handler: Option<ErrorHandler>) {
        self.error_handler = handler;
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    /// Hand a message to the custom logger, or else to `tracing` if the
    /// threshold allows it.
    pub fn log(&self, severity: Severity, args: fmt::Arguments<'_>) {
        if let Some(logger) = &self.logger {
            logger(severity, &args.to_string());
            return;
        }
        if !self.log_level.allows(severity) {
            return;
        }
        match severity {
            Severity::Error => tracing::error!("{args}"),
            Severity::Trace => tracing::trace!("{args}"),
        }
    }

    pub(crate) fn trace(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Trace, args)
    }

    /// Route a fault through the handler. `Ok(())` means carry on.
    pub fn raise(&self, fault: &Fault<'_>) -> Result<(), Error> {
        let Some(handler) = &self.error_handler else {
            self.log(Severity::Error, format_args!("{}", fault.message));
            return Err(Error::new(fault.code, fault.message));
        };
        let verdict = handler(fault);
        if fault.code.is_fatal() {
            return Err(Error::new(fault.code, fault.message));
        }
        verdict.map_err(|code| Error::new(code, fault.message))
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("log_level", &self.log_level)
            .field("logger", &self.logger.is_some())
            .field("error_handler", &self.error_handler.is_some())
            .finish()
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
