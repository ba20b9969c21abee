//! Process-wide logger for the adoc binary.
//!
//! Every message is appended to `~/.config/adoc/adoc.log` once
//! [`init_with_verbosity`] has run. The console only sees debug and info output
//! at `-v` or above; errors and success lines are always shown unless console
//! output is disabled.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

mod sink;

pub use sink::{ConsoleLog, Level, LogSink, MemoryLog};

const LOG_FILE_NAME: &str = "adoc.log";
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

struct Settings {
    verbosity: u8,
    no_stdout: bool,
    log_file: Option<PathBuf>,
}

static SETTINGS: Mutex<Settings> = Mutex::new(Settings {
    verbosity: 0,
    no_stdout: false,
    log_file: None,
});
static SPINNER: Mutex<Option<ProgressBar>> = Mutex::new(None);

fn read_settings<R>(f: impl FnOnce(&Settings) -> R) -> Option<R> {
    SETTINGS.lock().ok().map(|settings| f(&settings))
}

pub fn get_verbosity() -> u8 {
    read_settings(|s| s.verbosity).unwrap_or(0)
}

/// Whether debug output reaches the console (`-v` or more)
pub fn is_verbose() -> bool {
    get_verbosity() >= 1
}

pub fn get_no_stdout() -> bool {
    read_settings(|s| s.no_stdout).unwrap_or(false)
}

pub fn set_no_stdout(disabled: bool) {
    if let Ok(mut settings) = SETTINGS.lock() {
        settings.no_stdout = disabled;
    }
}

/// Set the console verbosity and start a fresh log file
pub fn init_with_verbosity(verbosity: u8, no_stdout: bool) -> Result<(), String> {
    let log_dir = log_dir().ok_or("Could not determine the adoc config directory")?;
    fs::create_dir_all(&log_dir)
        .map_err(|e| format!("Failed to create {}: {}", log_dir.display(), e))?;

    // One log per run
    let log_file = log_dir.join(LOG_FILE_NAME);
    if log_file.exists() {
        let _ = fs::remove_file(&log_file);
    }

    let mut settings = SETTINGS
        .lock()
        .map_err(|e| format!("Logger settings lock poisoned: {}", e))?;
    settings.verbosity = verbosity;
    settings.no_stdout = no_stdout;
    settings.log_file = Some(log_file);
    Ok(())
}

fn log_dir() -> Option<PathBuf> {
    #[cfg(not(target_os = "windows"))]
    let base = dirs::home_dir()?.join(".config");

    #[cfg(target_os = "windows")]
    let base = dirs::config_dir()?;

    Some(base.join("adoc"))
}

fn write_to_log(tag: &str, message: &str) {
    let Some(Some(path)) = read_settings(|s| s.log_file.clone()) else {
        return;
    };
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let _ = writeln!(file, "[{}] {} {}", timestamp, tag, message);
    }
}

fn console_enabled() -> bool {
    !get_no_stdout()
}

pub fn info(message: &str) {
    write_to_log("INFO", message);
    if is_verbose() && console_enabled() {
        eprintln!("{}", message);
    }
}

pub fn debug(message: &str) {
    write_to_log("DEBUG", message);
    if is_verbose() && console_enabled() {
        eprintln!("{} {}", "DEBUG:".blue().bold(), message);
    }
}

pub fn error(message: &str) {
    write_to_log("ERROR", message);
    if console_enabled() {
        eprintln!("{} {}", "Error:".red().bold(), message);
    }
}

/// Confirmation for the user; shown even when console logging is off
pub fn success(message: &str) {
    write_to_log("SUCCESS", message);
    eprintln!("{} {}", "✔".green().bold(), message);
}

/// Show a spinner while a long call runs. Verbose runs print their own
/// progress and get no spinner.
pub fn spinner_start(message: &str) {
    write_to_log("INFO", message);
    if is_verbose() || get_no_stdout() {
        return;
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(SPINNER_FRAMES)
        .template("{spinner:.cyan} {msg}")
    {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(message.to_string());

    if let Ok(mut slot) = SPINNER.lock() {
        *slot = Some(spinner);
    }
}

pub fn spinner_success(message: &str) {
    spinner_stop();
    success(message);
}

pub fn spinner_error(message: &str) {
    spinner_stop();
    write_to_log("ERROR", message);
    eprintln!("  {} {}", "✗".red().bold(), message);
}

pub fn spinner_stop() {
    if let Ok(mut slot) = SPINNER.lock() {
        if let Some(spinner) = slot.take() {
            spinner.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_stdout_toggle() {
        set_no_stdout(true);
        assert!(get_no_stdout());
        set_no_stdout(false);
        assert!(!get_no_stdout());
    }

    #[test]
    fn test_log_lines_are_stamped() -> Result<(), Box<dyn std::error::Error>> {
        let temp = tempfile::TempDir::new()?;
        let path = temp.path().join(LOG_FILE_NAME);
        SETTINGS.lock().map_err(|e| e.to_string())?.log_file = Some(path.clone());

        error("stamped line");
        SETTINGS.lock().map_err(|e| e.to_string())?.log_file = None;

        let written = fs::read_to_string(&path)?;
        let line = written
            .lines()
            .find(|l| l.ends_with("ERROR stamped line"))
            .ok_or("missing log line")?;
        // [YYYY-MM-DD HH:MM:SS]
        assert_eq!(line.find(']'), Some(20));
        Ok(())
    }

    #[test]
    fn test_logging_before_init_is_harmless() {
        debug("debug before init");
        info("info before init");
        spinner_stop();
    }
}
