//! The now-playing feed.
//!
//! [`reporter::PlayerReporter`] ties together the pieces below: the
//! persisted track id, the album-art cache, the generated stylesheet and the
//! plain-text activity log.

pub mod art;
pub mod artlog;
pub mod reporter;
pub mod stylesheet;
pub mod track;
