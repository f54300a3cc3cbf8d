//! The document waybar expects from a `custom` module with
//! `"return-type": "json"`.
//!
//! Every update is one line of JSON with exactly three string members:
//!
//! ```json
//! {"text": "● 1 | ○ web", "tooltip": "DP-1: 1 (focused)", "class": "active"}
//! ```
//!
//! Members are separated by `", "` and keys by `": "` so the output matches
//! what existing bar configurations and scripts were written against.

use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};
use std::io::{self, Write};

/// One status update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusLine {
    pub text: String,
    pub tooltip: String,
    pub class: String,
}

impl StatusLine {
    pub fn new(
        text: impl Into<String>,
        tooltip: impl Into<String>,
        class: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            tooltip: tooltip.into(),
            class: class.into(),
        }
    }

    /// Serialize as a single JSON object (no trailing newline).
    pub fn to_json(&self) -> String {
        let mut buf = Vec::new();
        if self.serialize_into(&mut buf).is_err() {
            return String::new();
        }
        String::from_utf8(buf).unwrap_or_default()
    }

    /// Write the document followed by `\n`, then flush.
    ///
    /// The bar reads stdout line by line, so the flush is what actually
    /// delivers the update.
    pub fn write_line<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.serialize_into(&mut *out)?;
        out.write_all(b"\n")?;
        out.flush()
    }

    fn serialize_into<W: Write>(&self, out: W) -> io::Result<()> {
        let mut ser = Serializer::with_formatter(out, SpacedFormatter);
        self.serialize(&mut ser)?;
        Ok(())
    }
}

/// Compact JSON with a space after every `,` and `:`.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b": ")
    }
}
