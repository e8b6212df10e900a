//! Diagnostic console (diagcon)
//!
//! Log ingestion, category counters, background filtering, and a data source
//! for a virtualized list of variable-height rows, with a terminal front end.
//!
//! The console core ([`console`], [`filter`], [`measure`], [`model`]) is pure
//! and single-threaded apart from the filter worker; [`source`], [`view`] and
//! [`logging`] are the impure shell around it.

pub mod config;
pub mod console;
pub mod counter;
pub mod export;
pub mod filter;
pub mod logging;
pub mod measure;
pub mod model;
pub mod source;
pub mod view;
