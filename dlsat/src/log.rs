//! Solver internal logging.
//!
//! Messages are written to stdout as DIMACS comment lines. Log statements use the [`info!`],
//! [`verbose!`], [`debug!`] and [`trace!`] macros, which take anything implementing
//! [`HasLogger`] as first argument:
//!
//! ```ignore
//! debug!(ctx, "backtrack", level = frames.len(), = trail.len());
//! ```
use std::{fmt::Debug, io::Write, panic::Location};

/// Log levels used for solver internal logging.
///
/// The levels are listed from less to more verbose.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum LogLevel {
    /// Default log level
    Info,
    /// More logging
    Verbose,
    /// Detailed logging
    Debug,
    /// Log everything
    Trace,
}

pub use dlsat_macros::{debug, info, trace, verbose};

/// Solver internal logger.
///
/// The default logger is silent.
#[derive(Default)]
pub struct Logger {
    level_limit: u8,
    log_source_locations: bool,
}

impl Logger {
    /// Limits generated log messages to at most the given log level.
    ///
    /// `None` disables logging.
    pub fn set_log_level(&mut self, level: Option<LogLevel>) {
        self.level_limit = level.map_or(0, |level| level as u8 + 1);
    }

    /// Returns whether messages of the given level are logged.
    #[inline(always)]
    pub fn enabled(&self, level: LogLevel) -> bool {
        (level as u8) < self.level_limit
    }

    /// Sets whether to print source locations for log messages.
    pub fn log_source_locations(&mut self, log_source_locations: bool) {
        self.log_source_locations = log_source_locations
    }

    /// Logs a message.
    ///
    /// The log message is populated by the `action` closure passed. The closure will only be called
    /// if the given `level` is currently active.
    #[inline(always)]
    #[track_caller]
    pub fn log(&self, level: LogLevel, action: impl for<'a> FnOnce(&'a mut dyn LogMessage)) {
        if self.enabled(level) {
            self.perform_log(level, Location::caller(), action)
        }
    }

    #[inline(never)]
    #[cold]
    fn perform_log(
        &self,
        level: LogLevel,
        location: &'static Location<'static>,
        action: impl for<'a> FnOnce(&'a mut dyn LogMessage),
    ) {
        let out = std::io::stdout();
        let mut out = out.lock();

        let prefix = match level {
            LogLevel::Info => "c",
            LogLevel::Verbose => "c V:",
            LogLevel::Debug => "c D:",
            LogLevel::Trace => "c T:",
        };

        // A closed stdout is not a reason to abort the search.
        let _ = write!(out, "{prefix}");
        action(&mut out);
        let _ = if self.log_source_locations {
            writeln!(
                out,
                " \x1b[34m{}:{}\x1b[0m",
                location.file(),
                location.line()
            )
        } else {
            writeln!(out)
        };
    }
}

/// Construct a log message.
pub trait LogMessage {
    /// Adds a (space separated) static string to the message.
    fn add_message(&mut self, message: &'static str);

    /// Adds a (space separated) value to the message.
    fn add_value(&mut self, value: &dyn Debug);
}

impl<T> LogMessage for T
where
    T: Write,
{
    fn add_message(&mut self, message: &'static str) {
        let _ = write!(self, " {message}");
    }

    fn add_value(&mut self, value: &dyn Debug) {
        let _ = write!(self, " {value:?}");
    }
}

/// Retreives the logger from some context.
pub trait HasLogger {
    /// Retreives the logger from some context.
    fn logger(&self) -> &Logger;
}

impl HasLogger for Logger {
    #[inline(always)]
    fn logger(&self) -> &Logger {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_limit() {
        let mut logger = Logger::default();
        assert!(!logger.enabled(LogLevel::Info));

        logger.set_log_level(Some(LogLevel::Verbose));
        assert!(logger.enabled(LogLevel::Info));
        assert!(logger.enabled(LogLevel::Verbose));
        assert!(!logger.enabled(LogLevel::Debug));

        logger.set_log_level(None);
        assert!(!logger.enabled(LogLevel::Info));
    }

    #[test]
    fn message_formatting() {
        let mut buf: Vec<u8> = vec![];
        {
            let message: &mut dyn LogMessage = &mut buf;
            message.add_message("decision");
            message.add_value(&-3isize);
        }
        assert_eq!(String::from_utf8_lossy(&buf), " decision -3");
    }

    #[test]
    fn disabled_levels_skip_the_closure() {
        let mut logger = Logger::default();
        logger.set_log_level(Some(LogLevel::Info));
        let mut called = false;
        logger.log(LogLevel::Trace, |_| called = true);
        assert!(!called);
    }
}
