//! Stylesheet fragment that shows the album art in the bar.
//!
//! The bar imports this file; the `?ts=` query on the image URL changes on
//! every write so the renderer does not keep a stale image.

use crate::player::artlog::ArtLog;
use std::path::Path;

/// Render the rule block for `selector`.
///
/// `art` is only used when the file actually exists.
pub fn render_stylesheet(selector: &str, art: Option<&Path>, ts: i64) -> String {
    match art.filter(|p| p.exists()) {
        Some(path) => format!(
            "{selector} {{\n  min-width: 32px;\n  min-height: 32px;\n  background-image: url(\"file://{path}?ts={ts}\");\n  background-repeat: no-repeat;\n  background-size: contain;\n  background-position: center;\n}}\n",
            selector = selector,
            path = path.display(),
            ts = ts,
        ),
        None => format!(
            "{selector} {{\n  min-width: 32px;\n  min-height: 32px;\n  background-image: none;\n}}\n",
            selector = selector,
        ),
    }
}

/// Overwrite `css_file` with a fresh rule block and log the update.
pub fn write_stylesheet(
    css_file: &Path,
    selector: &str,
    art: Option<&Path>,
    log: &ArtLog,
) -> std::io::Result<()> {
    let ts = chrono::Utc::now().timestamp();
    std::fs::write(css_file, render_stylesheet(selector, art, ts))?;
    log.write(&format!("Updated CSS (ts={})", ts));
    Ok(())
}
