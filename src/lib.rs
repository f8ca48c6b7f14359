//! Plate - extracts a trusted task list from plain-text outline documents
//!
//! This library provides the core functionality for Plate, including:
//! - Line classification and context-tag extraction
//! - The recursive outline parser with ordered-list blocking semantics
//! - Recurrence grammar parsing and next-date resolution
//! - The Plate task store with staleness-driven refresh
//! - Context filtering and urgency classification
//!
//! # Example
//!
//! ```no_run
//! use plate::cli::run;
//!
//! fn main() {
//!     if let Err(e) = run() {
//!         eprintln!("Error: {}", e);
//!         std::process::exit(1);
//!     }
//! }
//! ```

pub mod cli;
pub mod config;
pub mod context;
pub mod filter;
pub mod lines;
pub mod models;
pub mod outline;
pub mod plate;
pub mod recur;
pub mod urgency;
