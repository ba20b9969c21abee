//! Logging sink consumed by the bootstrap and the conversion orchestrator.
//!
//! Library code never talks to a concrete backend. It receives a `&dyn LogSink`
//! and asks `is_debug_enabled` / `is_info_enabled` before building messages.

use std::sync::Mutex;

/// Severity of a recorded message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Error,
}

/// Three-level logging sink
pub trait LogSink {
    fn debug(&self, message: &str);
    fn info(&self, message: &str);
    fn error(&self, message: &str);

    fn is_debug_enabled(&self) -> bool {
        true
    }

    fn is_info_enabled(&self) -> bool {
        true
    }
}

/// Sink forwarding to the process-wide logger (log file plus console)
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleLog;

impl LogSink for ConsoleLog {
    fn debug(&self, message: &str) {
        crate::debug(message);
    }

    fn info(&self, message: &str) {
        crate::info(message);
    }

    fn error(&self, message: &str) {
        crate::error(message);
    }

    fn is_debug_enabled(&self) -> bool {
        crate::is_verbose()
    }
}

/// Sink that keeps every message in memory
#[derive(Debug, Default)]
pub struct MemoryLog {
    debug_enabled: bool,
    records: Mutex<Vec<(Level, String)>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self {
            debug_enabled: true,
            records: Mutex::new(Vec::new()),
        }
    }

    /// A sink that reports debug as disabled, so guarded debug messages are never built
    pub fn without_debug() -> Self {
        Self {
            debug_enabled: false,
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn records(&self) -> Vec<(Level, String)> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    /// Messages recorded at `level`, in order
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message)
            .collect()
    }

    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.messages(level).iter().any(|m| m.contains(needle))
    }

    fn push(&self, level: Level, message: &str) {
        if let Ok(mut records) = self.records.lock() {
            records.push((level, message.to_string()));
        }
    }
}

impl LogSink for MemoryLog {
    fn debug(&self, message: &str) {
        self.push(Level::Debug, message);
    }

    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }

    fn error(&self, message: &str) {
        self.push(Level::Error, message);
    }

    fn is_debug_enabled(&self) -> bool {
        self.debug_enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_log_keeps_order_and_levels() {
        let log = MemoryLog::new();
        log.info("found archive");
        log.debug("extracting docs/readme.txt");
        log.error("cannot read entry");

        let records = log.records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].0, Level::Info);
        assert_eq!(log.messages(Level::Error), vec!["cannot read entry"]);
        assert!(log.contains(Level::Debug, "readme"));
    }

    #[test]
    fn test_memory_log_without_debug() {
        let log = MemoryLog::without_debug();
        assert!(!log.is_debug_enabled());
        assert!(log.is_info_enabled());
    }

    #[test]
    fn test_console_log_is_usable_as_trait_object() {
        let sink: &dyn LogSink = &ConsoleLog;
        assert!(sink.is_info_enabled());
    }
}
