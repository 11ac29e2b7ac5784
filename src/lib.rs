//! Parlance is a line-mode chat client that renders replies as lightweight
//! markdown and reveals them word by word.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`render`] turns message text into a block document: fenced code is
//!   split out first, prose is segmented into headings, lists and
//!   paragraphs, and each line is formatted into inline spans.
//! - [`core`] owns the conversation session, the reveal state machine, the
//!   tick scheduler, message types and configuration.
//! - [`api`] defines the wire types and the transport that posts a message
//!   to the chat service.
//! - [`ui`] maps rendered blocks to styled terminal lines.
//!
//! The binary (`src/main.rs`) routes through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod logging;
pub mod render;
pub mod ui;
pub mod utils;
