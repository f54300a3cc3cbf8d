//! Workspace records and the text the workspace feed renders from them.
//!
//! A snapshot is always formatted from scratch: workspaces are sorted by
//! `(output, idx)`, grouped per output with a `|` token between groups, and
//! every workspace becomes a glyph-prefixed label.
//!
//! ```text
//! ● 1 · 2 | ○ web
//! ```

use crate::status::StatusLine;
use serde::Deserialize;
use std::fmt;

/// Separator token placed between two output groups.
pub const OUTPUT_SEPARATOR: &str = "|";

/// Text shown when the window manager reports no workspaces.
pub const EMPTY_TEXT: &str = "No workspaces";

/// One workspace as reported by `niri msg -j workspaces`.
///
/// Only the fields the feed needs are decoded; everything else in the
/// record is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Workspace {
    /// Output (monitor) the workspace lives on.
    pub output: String,
    /// 1-based position on its output.
    pub idx: u32,
    #[serde(default)]
    pub name: Option<String>,
    pub is_focused: bool,
    pub is_active: bool,
}

impl Workspace {
    /// The label shown for this workspace: its name, or its index when the
    /// name is missing or empty.
    pub fn label(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.idx.to_string(),
        }
    }

    pub fn status(&self) -> WorkspaceStatus {
        if self.is_focused {
            WorkspaceStatus::Focused
        } else if self.is_active {
            WorkspaceStatus::Active
        } else {
            WorkspaceStatus::Inactive
        }
    }
}

/// How a workspace is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceStatus {
    /// Receives input.
    Focused,
    /// Visible on its output but not focused.
    Active,
    Inactive,
}

impl WorkspaceStatus {
    pub fn glyph(self) -> &'static str {
        match self {
            WorkspaceStatus::Focused => "●",
            WorkspaceStatus::Active => "○",
            WorkspaceStatus::Inactive => "·",
        }
    }
}

impl fmt::Display for WorkspaceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkspaceStatus::Focused => write!(f, "focused"),
            WorkspaceStatus::Active => write!(f, "active"),
            WorkspaceStatus::Inactive => write!(f, "inactive"),
        }
    }
}

/// A formatted snapshot plus the last output it contained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceReport {
    pub line: StatusLine,
    /// Output of the last workspace in sort order, if any.
    pub last_output: Option<String>,
}

/// Format a workspace set.
///
/// `previous_output` is the last output seen by an earlier snapshot.  It is
/// only used for the tooltip when `workspaces` is empty; with no earlier
/// snapshot the tooltip reads `Monitor: unknown`.
///
/// The class is `"active"` when some workspace is *focused* (not merely
/// active on its output), otherwise `"inactive"`.
pub fn format_workspaces(mut workspaces: Vec<Workspace>, previous_output: Option<&str>) -> WorkspaceReport {
    workspaces.sort_by(|a, b| a.output.cmp(&b.output).then(a.idx.cmp(&b.idx)));

    let mut text_parts: Vec<String> = Vec::with_capacity(workspaces.len() + 2);
    let mut tooltip_parts: Vec<String> = Vec::with_capacity(workspaces.len());
    let mut current_output: Option<&str> = None;
    let mut any_focused = false;

    for ws in &workspaces {
        if current_output != Some(ws.output.as_str()) {
            if current_output.is_some() {
                text_parts.push(OUTPUT_SEPARATOR.to_string());
            }
            current_output = Some(ws.output.as_str());
        }

        let label = ws.label();
        let status = ws.status();
        any_focused |= status == WorkspaceStatus::Focused;

        text_parts.push(format!("{} {}", status.glyph(), label));
        tooltip_parts.push(format!("{}: {} ({})", ws.output, label, status));
    }

    let last_output = current_output.map(str::to_string);

    let text = if text_parts.is_empty() {
        EMPTY_TEXT.to_string()
    } else {
        text_parts.join(" ")
    };
    let tooltip = if tooltip_parts.is_empty() {
        format!("Monitor: {}", previous_output.unwrap_or("unknown"))
    } else {
        tooltip_parts.join("\n")
    };
    let class = if any_focused { "active" } else { "inactive" };

    WorkspaceReport {
        line: StatusLine::new(text, tooltip, class),
        last_output,
    }
}
