//! `checkin` - QR badges and check-in for event registrants
//!
//! This library turns a CSV roster into one QR code per registrant and
//! provides the handler those QR codes point at: a scanner page pre-filled
//! from the query string, and a submit page that records the check-in in
//! object storage.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod handler;
pub mod logging;
pub mod payload;
pub mod qr;
pub mod registrant;
pub mod roster;
pub mod server;
pub mod slug;
pub mod store;
pub mod submission;
pub mod templates;

pub use config::Config;
pub use error::{Error, Result};
pub use generator::{GenerationReport, Generator};
pub use handler::{CheckinHandler, Event, Response};
pub use logging::init_logging;
pub use registrant::Registrant;
pub use roster::Roster;
pub use store::{HttpObjectStore, LocalFsStore, MemoryStore, ObjectStore};
pub use submission::Submission;
pub use templates::Templates;
