// User-facing notifications.
//
// The HTTP wrapper reports every failed request here before handing the
// error back to the caller. The terminal sink prints a coloured line and
// returns immediately; it never waits for the user.

use crossterm::style::{style, Stylize};
use indicatif::MultiProgress;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// One error message for the user, with how long it should stay on
/// screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub duration: Duration,
}

/// Sink for notices. Implementations must not block.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Writes notices to stderr using terminal colours.
///
/// Spinners shown while a request is running are registered on the same
/// `MultiProgress`, so a notice is printed with the spinner suspended
/// instead of on top of it.
///
/// A terminal has no transient overlay, so the line stays in the
/// scrollback; `duration` only matters to sinks that can fade.
#[derive(Debug, Clone)]
pub struct TerminalNotifier {
    progress: MultiProgress,
}

impl TerminalNotifier {
    pub fn new(progress: MultiProgress) -> Self {
        TerminalNotifier { progress }
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        let line = style(format!("✖ {}", notice.message)).red().bold();
        self.progress.suspend(|| eprintln!("{line}"));
    }
}

/// Keeps every notice in memory. Handy for tests and for embedding the
/// client somewhere without a terminal.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.notices().into_iter().map(|n| n.message).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }
}
