//! Session management module.
//!
//! A [`Session`] owns the single connection to the server and tracks its
//! lifecycle through [`SessionState`].

mod client;
mod exchange;
mod state;

pub use client::{Session, SessionOptions};
pub use exchange::Exchange;
pub use state::SessionState;
