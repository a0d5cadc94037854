//! Terminal rendering for tellonym-check.
//!
//! Result lines go to stdout; the progress counter goes to stderr and is
//! only drawn when stderr is a terminal, so piped output stays clean.
//! Uses only the `console` crate for styling.

use console::{style, StyledObject, Term};
use std::time::Duration;
use tellonym_check_lib::{
    proxy_line, terminal_lines, CheckResult, IdentifierKind, LogFile, Reporter, RunSummary,
    TerminalLine, Tone,
};

// ── Progress ─────────────────────────────────────────────────────────────────

/// Single-line `Progress: i/N` counter on stderr.
struct Progress {
    term: Term,
    enabled: bool,
}

impl Progress {
    fn new() -> Self {
        let term = Term::stderr();
        let enabled = term.is_term();
        Self { term, enabled }
    }

    fn draw(&self, done: usize, total: usize) {
        if self.enabled {
            let _ = self.term.clear_line();
            let _ = self.term.write_str(&format!(
                "{} {}/{}",
                style("Progress:").cyan(),
                done,
                total
            ));
        }
    }

    fn clear(&self) {
        if self.enabled {
            let _ = self.term.clear_line();
        }
    }
}

// ── Reporter ─────────────────────────────────────────────────────────────────

/// Prints each result as it arrives and mirrors it to the log file.
pub struct TerminalReporter {
    log: Option<LogFile>,
    progress: Progress,
}

impl TerminalReporter {
    pub fn new(log: Option<LogFile>) -> Self {
        Self {
            log,
            progress: Progress::new(),
        }
    }

    /// Show the counter at zero before the first check.
    pub fn begin(&self, total: usize) {
        if total > 0 {
            self.progress.draw(0, total);
        }
    }

    pub fn finish(&self) {
        self.progress.clear();
    }
}

impl Reporter for TerminalReporter {
    fn proxy_selected(&mut self, proxy: &str) {
        self.progress.clear();
        println!();
        print_line(&proxy_line(proxy));
    }

    fn report(&mut self, index: usize, total: usize, result: &CheckResult) {
        self.progress.clear();
        for line in terminal_lines(result) {
            print_line(&line);
        }

        if let Some(log) = &self.log {
            if let Err(e) = log.append(result) {
                tracing::warn!(path = %log.path().display(), error = %e, "could not write log line");
            }
        }

        self.progress.draw(index, total);
    }
}

fn print_line(line: &TerminalLine) {
    println!("{}", styled(line));
}

fn styled(line: &TerminalLine) -> StyledObject<&str> {
    let text = style(line.text.as_str());
    match line.tone {
        Tone::NotFound => text.red(),
        Tone::Found => text.green(),
        Tone::Target => text.magenta(),
        Tone::Failure => text.red().bright(),
        Tone::Notice => text.yellow(),
    }
}

// ── Banner & summary ─────────────────────────────────────────────────────────

pub fn print_banner(kind: IdentifierKind) {
    println!();
    println!(
        "{}",
        style(format!("[+] Starting Tellonym OSINT scan ({} mode)...", kind)).cyan()
    );
    println!();
}

/// Argument errors that clap cannot express, in the tool's own voice.
pub fn print_usage_error(message: &str) {
    eprintln!("{}", style(format!("❌ {}", message)).red());
}

/// One-line tally after a multi-item run.
///
/// Counts use OSINT framing: unavailable identifiers are "found".
pub fn print_summary(summary: &RunSummary, duration: Duration) {
    println!();
    println!(
        "  {}",
        style("────────────────────────────────────────────────────").dim()
    );
    println!(
        "  {} check{} in {:.1}s  {}  {}  {}  {}  {}  {}",
        style(summary.checked).bold(),
        if summary.checked == 1 { "" } else { "s" },
        duration.as_secs_f64(),
        style("|").dim(),
        style(format!("{} found", summary.unavailable)).green(),
        style("|").dim(),
        style(format!("{} not found", summary.available)).red(),
        style("|").dim(),
        style(format!("{} errors", summary.errors)).yellow(),
    );
    if summary.proxy_switches > 0 {
        println!(
            "  {}",
            style(format!("{} proxy switches", summary.proxy_switches)).dim()
        );
    }
}
