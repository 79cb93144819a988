//! The `[datastacks] >` read-send-print loop.

use tokio::io::{AsyncBufRead, AsyncRead, AsyncWrite};
use tracing::debug;

use super::Prompter;
use crate::session::Session;
use crate::Result;

/// Prompt shown for each command.
pub const PROMPT: &str = "[datastacks] > ";

/// Input that ends the loop without being sent.
pub const EXIT_COMMAND: &str = "exit";

/// Run the interactive loop until `exit` or end of input, then close the
/// session.
///
/// Each line is sent verbatim; the reply and the round-trip time are
/// printed before the next prompt. Returns the number of requests made.
pub async fn run<T, R, W>(session: &mut Session<T>, prompter: &mut Prompter<R, W>) -> Result<u64>
where
    T: AsyncRead + AsyncWrite + Unpin,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        let line = match prompter.read_line(PROMPT).await? {
            Some(line) => line,
            None => {
                debug!("end of input");
                break;
            }
        };
        if line == EXIT_COMMAND {
            break;
        }

        let exchange = session.request(&line).await?;
        prompter.println(exchange.text()).await?;
        prompter
            .println(&format!("Elapsed: {}", exchange.elapsed_secs()))
            .await?;
    }

    session.close().await?;
    Ok(session.requests_sent())
}
