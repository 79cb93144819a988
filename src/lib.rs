//! # datastacks-shell
//!
//! Interactive command shell for the DataStacks key/value server.
//!
//! The client opens one TCP connection, sends the password as a small
//! JSON object and then forwards each typed line to the server, printing
//! the reply together with the measured round-trip time.
//!
//! ## Features
//!
//! - **Single owned session**: one [`Session`] drives connect, handshake
//!   and the request loop with forward-only [`SessionState`] transitions
//! - **Pluggable framing**: legacy raw reads, newline or length-prefixed
//!   messages through one [`WireCodec`]
//! - **Layered configuration**: defaults, JSON file, environment, CLI
//!
//! ## Quick Start
//!
//! ```no_run
//! use datastacks_shell::{Session, SessionOptions};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> datastacks_shell::Result<()> {
//!     let mut session = Session::connect("localhost", 3008, SessionOptions::default()).await?;
//!     session.authenticate("123").await?;
//!
//!     let reply = session.request("PING").await?;
//!     println!("{} ({:?})", reply.text(), reply.elapsed());
//!
//!     session.close().await
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod protocol;
pub mod session;
pub mod shell;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, ShellError};
pub use protocol::{AuthOutcome, Credentials, Framing, WireCodec};
pub use session::{Exchange, Session, SessionOptions, SessionState};
pub use shell::Prompter;
