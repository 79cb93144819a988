//! Interactive terminal front end.
//!
//! Asks for host, password and port, connects, performs the handshake
//! and hands over to the command loop.

mod prompt;
mod repl;

pub use prompt::{parse_port, Prompter, INVALID_PORT};
pub use repl::{EXIT_COMMAND, PROMPT};

use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::info;

use crate::config::{Config, ConnectionSection, DEFAULT_PASSWORD};
use crate::protocol::AuthOutcome;
use crate::session::Session;
use crate::Result;

/// Printed after the server accepts the password.
pub const AUTHORIZED: &str = "Authorized!";

/// Where and how to connect, as settled by the startup prompts.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    pub host: String,
    pub password: String,
    pub port: u16,
}

impl std::fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("host", &self.host)
            .field("password", &"<redacted>")
            .field("port", &self.port)
            .finish()
    }
}

impl From<&ConnectionSection> for ConnectionParams {
    fn from(section: &ConnectionSection) -> Self {
        Self {
            host: section.host.clone(),
            password: section.password.clone(),
            port: section.port,
        }
    }
}

/// Run the startup prompts, with `defaults` supplying empty answers.
pub async fn ask_params<R, W>(
    prompter: &mut Prompter<R, W>,
    defaults: &ConnectionSection,
) -> Result<ConnectionParams>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let host = prompter
        .ask_or_default(
            &format!("DataStacks host [default: {}]: ", defaults.host),
            &defaults.host,
        )
        .await?;

    // Only the well-known default is shown in clear
    let shown = if defaults.password == DEFAULT_PASSWORD {
        defaults.password.as_str()
    } else {
        "******"
    };
    let password = prompter
        .ask_or_default(
            &format!("DataStacks password [default {}]: ", shown),
            &defaults.password,
        )
        .await?;

    let port = prompter
        .ask_port(
            &format!("DataStacks port [default: {}]: ", defaults.port),
            defaults.port,
        )
        .await?;

    Ok(ConnectionParams {
        host,
        password,
        port,
    })
}

/// Full client flow: prompts, connect, handshake, command loop.
pub async fn run<R, W>(config: &Config, prompter: &mut Prompter<R, W>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let params = if config.connection.prompt {
        ask_params(prompter, &config.connection).await?
    } else {
        ConnectionParams::from(&config.connection)
    };

    let mut session =
        Session::connect(&params.host, params.port, config.session_options()).await?;

    let outcome = session.authenticate(&params.password).await?;
    info!(
        peer = session.peer(),
        framing = %session.options().framing,
        authorized = outcome.is_authorized(),
        "handshake complete"
    );
    if let AuthOutcome::Authorized = outcome {
        prompter.println(AUTHORIZED).await?;
    }

    let requests = repl::run(&mut session, prompter).await?;
    info!(requests, "goodbye");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section() -> ConnectionSection {
        ConnectionSection::default()
    }

    #[tokio::test]
    async fn test_empty_answers_give_defaults() {
        let mut p = Prompter::new(&b"\n\n\n"[..], Vec::new());
        let params = ask_params(&mut p, &section()).await.unwrap();

        assert_eq!(params.host, "localhost");
        assert_eq!(params.password, "123");
        assert_eq!(params.port, 3008);

        let (_, out) = p.into_parts();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "DataStacks host [default: localhost]: \
             DataStacks password [default 123]: \
             DataStacks port [default: 3008]: "
        );
    }

    #[tokio::test]
    async fn test_answers_override_defaults() {
        let mut p = Prompter::new(&b"db.local\nsecret\nx\n4000\n"[..], Vec::new());
        let params = ask_params(&mut p, &section()).await.unwrap();

        assert_eq!(params.host, "db.local");
        assert_eq!(params.password, "secret");
        assert_eq!(params.port, 4000);
    }

    #[tokio::test]
    async fn test_configured_password_is_masked() {
        let mut defaults = section();
        defaults.password = "hunter2".into();
        let mut p = Prompter::new(&b"\n\n\n"[..], Vec::new());

        let params = ask_params(&mut p, &defaults).await.unwrap();
        assert_eq!(params.password, "hunter2");

        let (_, out) = p.into_parts();
        let out = String::from_utf8(out).unwrap();
        assert!(!out.contains("hunter2"));
        assert!(out.contains("DataStacks password [default ******]: "));
    }

    #[test]
    fn test_params_debug_redacts() {
        let params = ConnectionParams::from(&section());
        assert!(!format!("{:?}", params).contains("123"));
    }
}
