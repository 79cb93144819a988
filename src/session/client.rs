//! Connection-owning session.

use std::time::{Duration, Instant};

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_util::bytes::{Bytes, BytesMut};
use tokio_util::codec::Framed;
use tracing::{debug, info, warn};

use super::{Exchange, SessionState};
use crate::error::ShellError;
use crate::protocol::{AuthOutcome, Credentials, Framing, WireCodec};
use crate::Result;

/// Options controlling how a session talks to the server.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Message framing on the wire.
    pub framing: Framing,
    /// Upper bound on each wait for a reply. `None` waits forever.
    pub read_timeout: Option<Duration>,
    /// Fail the handshake unless the server answers `OK`.
    pub strict_auth: bool,
}

impl SessionOptions {
    pub fn with_framing(mut self, framing: Framing) -> Self {
        self.framing = framing;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    pub fn strict(mut self) -> Self {
        self.strict_auth = true;
        self
    }
}

/// One connection to a DataStacks server.
///
/// Drives `Init -> Authenticating -> Interactive -> Terminated`. Every
/// request is sent and its reply read before the call returns, so at most
/// one request is ever outstanding.
#[derive(Debug)]
pub struct Session<T> {
    framed: Framed<T, WireCodec>,
    state: SessionState,
    options: SessionOptions,
    peer: String,
    requests_sent: u64,
    created_at: Instant,
}

impl Session<TcpStream> {
    /// Open a TCP connection to `host:port`.
    pub async fn connect(host: &str, port: u16, options: SessionOptions) -> Result<Self> {
        let addr = format!("{}:{}", host, port);
        let stream = TcpStream::connect((host, port))
            .await
            .map_err(|source| ShellError::Connect {
                addr: addr.clone(),
                source,
            })?;

        info!(%addr, framing = %options.framing, "connected");
        Ok(Self::new(stream, addr, options))
    }
}

impl<T> Session<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    /// Wrap an already-open transport.
    pub fn new(transport: T, peer: impl Into<String>, options: SessionOptions) -> Self {
        Self {
            framed: Framed::new(transport, WireCodec::new(options.framing)),
            state: SessionState::Init,
            options,
            peer: peer.into(),
            requests_sent: 0,
            created_at: Instant::now(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Number of completed requests, not counting the handshake.
    pub fn requests_sent(&self) -> u64 {
        self.requests_sent
    }

    /// Time since the session was created.
    pub fn uptime(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Send the password and read the server's single reply.
    ///
    /// Any reply other than `OK` is reported as
    /// [`AuthOutcome::Unconfirmed`] and the session still becomes
    /// interactive, unless strict auth is enabled, in which case the
    /// session terminates with [`ShellError::AuthRejected`].
    pub async fn authenticate(&mut self, password: &str) -> Result<AuthOutcome> {
        self.state.transition_to(SessionState::Authenticating)?;

        let payload = Credentials::new(password).to_payload()?;
        self.framed.send(payload).await?;
        let reply = self.receive().await?;

        let outcome = AuthOutcome::from_response(&String::from_utf8_lossy(&reply));
        match outcome {
            AuthOutcome::Authorized => info!(peer = %self.peer, "authorized"),
            AuthOutcome::Unconfirmed(ref reply) if self.options.strict_auth => {
                warn!(peer = %self.peer, reply = %reply, "handshake rejected");
                self.state.transition_to(SessionState::Terminated)?;
                return Err(ShellError::AuthRejected(reply.clone()));
            }
            AuthOutcome::Unconfirmed(ref reply) => {
                warn!(peer = %self.peer, reply = %reply, "server did not confirm password, continuing");
            }
        }

        self.state.transition_to(SessionState::Interactive)?;
        Ok(outcome)
    }

    /// Send one command line and wait for its reply.
    pub async fn request(&mut self, line: &str) -> Result<Exchange> {
        if !self.state.is_interactive() {
            return Err(ShellError::NotInteractive(self.state));
        }

        let start = Instant::now();
        self.framed.send(Bytes::copy_from_slice(line.as_bytes())).await?;
        let reply = self.receive().await?;
        let elapsed = start.elapsed();

        self.requests_sent += 1;
        debug!(
            sent = line.len(),
            received = reply.len(),
            elapsed_us = elapsed.as_micros() as u64,
            "request completed"
        );

        Ok(Exchange::new(reply.freeze(), elapsed))
    }

    /// Flush and shut down the connection.
    ///
    /// Closing an already terminated session does nothing.
    pub async fn close(&mut self) -> Result<()> {
        if self.state.is_terminal() {
            return Ok(());
        }
        self.state.transition_to(SessionState::Terminated)?;
        SinkExt::<Bytes>::close(&mut self.framed).await?;

        info!(
            peer = %self.peer,
            requests = self.requests_sent,
            uptime_ms = self.uptime().as_millis() as u64,
            "session closed"
        );
        Ok(())
    }

    async fn receive(&mut self) -> Result<BytesMut> {
        let next = match self.options.read_timeout {
            Some(limit) => tokio::time::timeout(limit, self.framed.next())
                .await
                .map_err(|_| ShellError::Timeout)?,
            None => self.framed.next().await,
        };

        next.unwrap_or(Err(ShellError::ConnectionClosed))
    }
}
