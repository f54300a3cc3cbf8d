//! [`WorkspaceSource`] implementation backed by `niri msg -j`.
//!
//! Workspaces are listed with `niri msg -j workspaces`; change
//! notifications come from the long-running `niri msg -j event-stream`.

use crate::process::{self, ProcessError};
use crate::traits::WorkspaceSource;
use crate::workspace::Workspace;
use log::info;
use std::process::{Child, Command, Stdio};

/// niri-backed workspace source.
///
/// Each query spawns a short-lived `niri msg` process; nothing is kept open
/// between calls.
#[derive(Debug, Clone)]
pub struct NiriCli {
    program: String,
}

/// Errors that can occur when talking to niri.
#[derive(Debug, thiserror::Error)]
pub enum NiriError {
    #[error(transparent)]
    Process(#[from] ProcessError),
    #[error("failed to parse workspace list: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to start event stream: {0}")]
    EventStream(std::io::Error),
}

impl Default for NiriCli {
    fn default() -> Self {
        Self::new("niri")
    }
}

impl NiriCli {
    /// Use `program` as the niri client binary.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Spawn `niri msg -j event-stream` with its stdout piped.
    ///
    /// The caller owns the child and reads events from its stdout.
    pub fn event_stream(&self) -> Result<Child, NiriError> {
        let child = Command::new(&self.program)
            .args(["msg", "-j", "event-stream"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(NiriError::EventStream)?;
        info!("subscribed to niri event stream (pid {})", child.id());
        Ok(child)
    }
}

impl WorkspaceSource for NiriCli {
    type Error = NiriError;

    fn workspaces(&self) -> Result<Vec<Workspace>, NiriError> {
        let json = process::run(&self.program, &["msg", "-j", "workspaces"], None)?;
        Ok(serde_json::from_str(&json)?)
    }
}
