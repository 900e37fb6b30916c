use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use console::style;
use dialoguer::Confirm;

/// Units between two batch progress lines.
pub const PROGRESS_EVERY: usize = 10;

static QUIET: AtomicBool = AtomicBool::new(false);

/// Silences status lines (`info`, `progress`, `fetch_op`). Warnings and
/// errors still print.
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

fn quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

pub fn info(message: &str) {
    if !quiet() {
        let _ = writeln!(io::stderr(), "{}", message);
    }
}

pub fn warn(message: &str) {
    let _ = writeln!(io::stderr(), "{}", style(message).yellow());
}

pub fn error(message: &str) {
    let _ = writeln!(io::stderr(), "{}", style(message).red());
}

/// `done / total`, reported once every [`PROGRESS_EVERY`] units.
pub fn progress_line(done: usize, total: usize) -> Option<String> {
    (done > 0 && done % PROGRESS_EVERY == 0).then(|| format!("{} / {}", done, total))
}

pub fn progress(done: usize, total: usize) {
    if let Some(line) = progress_line(done, total) {
        info(&line);
    }
}

pub fn fetch_line(spec: &str, dry_run: bool) -> String {
    let verb = if dry_run { "would download" } else { "downloading" };
    format!("{} {} {}", style("source").cyan(), verb, spec)
}

pub fn fetch_op(spec: &str, dry_run: bool) {
    info(&fetch_line(spec, dry_run));
}

pub fn confirm(prompt: &str, assume_yes: bool) -> Result<bool, dialoguer::Error> {
    if assume_yes {
        return Ok(true);
    }

    Confirm::new().with_prompt(prompt).default(false).interact()
}
