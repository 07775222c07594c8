//! Console host
//!
//! Routes engine messages to stderr and answers prompts from stdin.

use crossterm::style::Stylize;
use pppm_core::Host;
use std::io::{BufRead, IsTerminal, Write};

/// Host backed by the terminal of the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleHost {
    verbose: bool,
}

impl ConsoleHost {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Host for ConsoleHost {
    fn warning(&self, msg: &str) {
        eprintln!("{} {msg}", "warning:".yellow().bold());
    }

    fn verbose(&self, msg: &str) {
        if self.verbose {
            eprintln!("{} {msg}", "verbose:".dark_grey());
        }
    }

    fn error(&self, msg: &str) {
        eprintln!("{} {msg}", "error:".red().bold());
    }

    fn choose(&self, caption: &str, message: &str, options: &[String], default: usize) -> usize {
        let stdin = std::io::stdin();
        // Nobody to ask
        if !stdin.is_terminal() {
            tracing::debug!("Non-interactive prompt '{caption}', taking option {default}");
            return default;
        }

        eprintln!();
        eprintln!("{}", caption.bold());
        eprintln!("{message}");
        for (i, option) in options.iter().enumerate() {
            let marker = if i == default { "*" } else { " " };
            eprintln!("  {marker} [{}] {option}", i + 1);
        }
        eprint!("Choice (default {}): ", default + 1);
        let _ = std::io::stderr().flush();

        let mut input = String::new();
        if stdin.lock().read_line(&mut input).is_err() {
            return default;
        }
        parse_choice(&input, options.len()).unwrap_or(default)
    }
}

/// One-based answer to a zero-based index. Empty or out of range is `None`.
fn parse_choice(input: &str, len: usize) -> Option<usize> {
    input
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .filter(|&i| i < len)
}
