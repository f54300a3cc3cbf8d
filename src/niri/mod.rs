//! niri-specific implementations.
//!
//! This module provides the [`WorkspaceSource`](crate::traits::WorkspaceSource)
//! backend and the event-stream subscription, both powered by the `niri msg`
//! command-line client.
//!
//! Nothing outside this module should reference niri directly.

pub mod msg;
