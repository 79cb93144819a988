//! Line-oriented terminal prompts.

use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout,
};

use crate::Result;

/// Message printed when the port prompt gets unparseable input.
pub const INVALID_PORT: &str = "Invalid port!";

/// Reads answers from `input` after writing a label to `output`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<BufReader<Stdin>, Stdout> {
    /// Prompter bound to the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> Prompter<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `label` and read one line.
    ///
    /// The line terminator is removed; nothing else is trimmed. Returns
    /// `None` at end of input.
    pub async fn read_line(&mut self, label: &str) -> Result<Option<String>> {
        self.output.write_all(label.as_bytes()).await?;
        self.output.flush().await?;

        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }

    /// Ask a question; an empty answer or end of input yields `default`.
    pub async fn ask_or_default(&mut self, label: &str, default: &str) -> Result<String> {
        match self.read_line(label).await? {
            Some(answer) if !answer.is_empty() => Ok(answer),
            _ => Ok(default.to_string()),
        }
    }

    /// Ask for a port until a valid one or an empty line is entered.
    pub async fn ask_port(&mut self, label: &str, default: u16) -> Result<u16> {
        loop {
            let answer = match self.read_line(label).await? {
                Some(answer) if !answer.is_empty() => answer,
                _ => return Ok(default),
            };
            match parse_port(&answer) {
                Some(port) => return Ok(port),
                None => self.println(INVALID_PORT).await?,
            }
        }
    }

    /// Write `text` followed by a newline.
    pub async fn println(&mut self, text: &str) -> Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        self.output.flush().await?;
        Ok(())
    }

    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }
}

/// Parse a port number, ignoring surrounding whitespace.
pub fn parse_port(text: &str) -> Option<u16> {
    text.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompter(input: &'static str) -> Prompter<&'static [u8], Vec<u8>> {
        Prompter::new(input.as_bytes(), Vec::new())
    }

    fn output(p: Prompter<&'static [u8], Vec<u8>>) -> String {
        String::from_utf8(p.into_parts().1).unwrap()
    }

    #[test]
    fn test_parse_port() {
        assert_eq!(parse_port("3008"), Some(3008));
        assert_eq!(parse_port(" 8080 "), Some(8080));
        assert_eq!(parse_port("+42"), Some(42));
        assert_eq!(parse_port("0"), Some(0));
        assert_eq!(parse_port("65535"), Some(65535));
        assert_eq!(parse_port("65536"), None);
        assert_eq!(parse_port("-1"), None);
        assert_eq!(parse_port("abc"), None);
        assert_eq!(parse_port("30o8"), None);
    }

    #[tokio::test]
    async fn test_read_line_strips_terminator_only() {
        let mut p = prompter("  spaced  \r\nnext\n");
        assert_eq!(p.read_line("> ").await.unwrap().as_deref(), Some("  spaced  "));
        assert_eq!(p.read_line("> ").await.unwrap().as_deref(), Some("next"));
        assert_eq!(p.read_line("> ").await.unwrap(), None);
        assert_eq!(output(p), "> > > ");
    }

    #[tokio::test]
    async fn test_last_line_without_newline() {
        let mut p = prompter("exit");
        assert_eq!(p.read_line("> ").await.unwrap().as_deref(), Some("exit"));
    }

    #[tokio::test]
    async fn test_ask_or_default() {
        let mut p = prompter("\ndb.internal\n");
        assert_eq!(p.ask_or_default("host: ", "localhost").await.unwrap(), "localhost");
        assert_eq!(p.ask_or_default("host: ", "localhost").await.unwrap(), "db.internal");
        // End of input falls back too
        assert_eq!(p.ask_or_default("host: ", "localhost").await.unwrap(), "localhost");
    }

    #[tokio::test]
    async fn test_ask_port_empty_uses_default() {
        let mut p = prompter("\n");
        assert_eq!(p.ask_port("port: ", 3008).await.unwrap(), 3008);
    }

    #[tokio::test]
    async fn test_ask_port_reprompts_on_garbage() {
        let mut p = prompter("abc\n99999\n4000\n");
        assert_eq!(p.ask_port("port: ", 3008).await.unwrap(), 4000);
        assert_eq!(
            output(p),
            "port: Invalid port!\nport: Invalid port!\nport: "
        );
    }

    #[tokio::test]
    async fn test_ask_port_garbage_then_empty() {
        let mut p = prompter("nope\n\n");
        assert_eq!(p.ask_port("port: ", 3008).await.unwrap(), 3008);
    }
}
