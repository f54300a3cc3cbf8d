//! Event-driven refresh loop for the workspace feed.
//!
//! The window manager's event stream delivers one JSON object per line.
//! Each object is classified; workspace-affecting events cause a fresh
//! query of the full workspace set, which is formatted and written as a new
//! status line.
//!
//! # Wire format
//!
//! ```json
//! {"WorkspacesChanged":{"workspaces":[...]}}
//! {"WorkspaceActivated":{"id":3,"focused":true}}
//! {"WindowFocusChanged":{"id":12}}
//! ```
//!
//! Only the top-level key matters.  The payload is never trusted; every
//! refresh re-queries the [`WorkspaceSource`].

use crate::traits::WorkspaceSource;
use crate::workspace::format_workspaces;
use log::{debug, info, warn};
use std::io::{BufRead, Write};

/// Top-level event keys that trigger a refresh.
pub const TRIGGER_KEYS: [&str; 4] = [
    "WorkspaceActivated",
    "WorkspacesChanged",
    "WorkspaceAdded",
    "WorkspaceRemoved",
];

/// Classification of one event-stream line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceEvent {
    /// Not UTF-8 or not JSON.  Dropped.
    Malformed,
    /// Valid JSON without a trigger key.
    Ignored,
    /// Carries the given trigger key.
    Trigger(&'static str),
}

/// Classify a raw line from the event stream.
pub fn classify_event(line: &[u8]) -> WorkspaceEvent {
    let value: serde_json::Value = match serde_json::from_slice(line) {
        Ok(v) => v,
        Err(_) => return WorkspaceEvent::Malformed,
    };
    let Some(object) = value.as_object() else {
        return WorkspaceEvent::Ignored;
    };
    TRIGGER_KEYS
        .iter()
        .find(|key| object.contains_key(**key))
        .map(|key| WorkspaceEvent::Trigger(*key))
        .unwrap_or(WorkspaceEvent::Ignored)
}

/// Errors that end the watch loop.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("workspace query failed: {0}")]
    Query(String),
    #[error("failed to write status line: {0}")]
    Output(std::io::Error),
    #[error("failed to read event stream: {0}")]
    Events(std::io::Error),
}

/// Emits a workspace status line on start-up and after every triggering
/// event.
pub struct WorkspaceWatcher<S: WorkspaceSource, W: Write> {
    source: S,
    out: W,
    last_output: Option<String>,
}

impl<S: WorkspaceSource, W: Write> WorkspaceWatcher<S, W> {
    pub fn new(source: S, out: W) -> Self {
        Self {
            source,
            out,
            last_output: None,
        }
    }

    /// Query the source and write one status line.
    ///
    /// A query failure writes nothing.
    pub fn emit(&mut self) -> Result<(), WatchError> {
        let workspaces = self
            .source
            .workspaces()
            .map_err(|e| WatchError::Query(e.to_string()))?;
        debug!("refreshing with {} workspace(s)", workspaces.len());

        let report = format_workspaces(workspaces, self.last_output.as_deref());
        if report.last_output.is_some() {
            self.last_output = report.last_output;
        }
        report.line.write_line(&mut self.out).map_err(WatchError::Output)
    }

    /// Consume `events` until end-of-stream, refreshing on every trigger.
    ///
    /// Malformed lines are dropped.  A failed refresh is logged and the
    /// loop keeps going; only I/O failures end it early.
    pub fn watch<R: BufRead>(&mut self, mut events: R) -> Result<(), WatchError> {
        let mut line = Vec::new();
        loop {
            line.clear();
            let n = events.read_until(b'\n', &mut line).map_err(WatchError::Events)?;
            if n == 0 {
                info!("event stream closed");
                return Ok(());
            }

            match classify_event(&line) {
                WorkspaceEvent::Malformed => {
                    debug!("dropping malformed event: {}", String::from_utf8_lossy(&line).trim_end());
                }
                WorkspaceEvent::Ignored => {}
                WorkspaceEvent::Trigger(key) => {
                    debug!("refresh on {}", key);
                    match self.emit() {
                        Ok(()) => {}
                        Err(WatchError::Query(e)) => warn!("refresh after {} failed: {}", key, e),
                        Err(e) => return Err(e),
                    }
                }
            }
        }
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.out
    }
}

//  Tests
