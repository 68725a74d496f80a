//! Console output.
//!
//! Progress lines go to stdout through [`ConsoleReporter`]; the final
//! colored status line is printed by [`print_success`] / [`print_failure`].
//! Logs from `tracing` go to stderr.

use apphub_core::Reporter;
use crossterm::style::Stylize;

const ICON_SUCCESS: &str = "✓";
const ICON_WARNING: &str = "⚠";
const ICON_INFO: &str = "•";

/// [`Reporter`] printing straight to the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Reporter for ConsoleReporter {
    fn section(&self, title: &str) {
        println!();
        println!("{} {}", title, "─".repeat(40).dark_grey());
    }

    fn checked(&self, app_id: &str) {
        println!("  {} {}", ICON_SUCCESS.green(), app_id);
    }

    fn packed(&self, app_id: &str, create_at: i64) {
        println!(
            "  {} {} {}",
            ICON_SUCCESS.green(),
            app_id,
            format!("createAt {create_at}").dark_grey()
        );
    }

    fn info(&self, msg: &str) {
        println!("  {ICON_INFO} {msg}");
    }

    fn warning(&self, msg: &str) {
        println!("  {} {}", ICON_WARNING.yellow(), msg.yellow());
    }

    fn summary(&self, count: usize, action: &str) {
        let msg = format!(
            "{} app{} {}",
            count,
            if count == 1 { "" } else { "s" },
            action
        );
        println!();
        println!("{} {}", ICON_SUCCESS.green(), msg);
    }
}

/// Red `<prefix>: <message>` status line.
pub fn print_failure(prefix: &str, message: &str) {
    println!("{}", format!("{prefix}: {message}").red());
}

/// Green status line.
pub fn print_success(message: &str) {
    println!("{}", message.green());
}
