//! Request/response results.

use std::time::Duration;

use tokio_util::bytes::Bytes;

/// Outcome of one request: the server's reply and the round-trip time.
#[derive(Debug, Clone)]
pub struct Exchange {
    /// Raw response bytes.
    raw: Bytes,
    /// Response decoded as UTF-8 (invalid sequences replaced).
    text: String,
    /// Time from just before the send until the reply was read.
    elapsed: Duration,
}

impl Exchange {
    /// Create a new exchange from a raw reply.
    pub fn new(raw: Bytes, elapsed: Duration) -> Self {
        let text = String::from_utf8_lossy(&raw).into_owned();
        Self { raw, text, elapsed }
    }

    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Round-trip time in fractional seconds.
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_decoding() {
        let exchange = Exchange::new(Bytes::from_static(b"\"value\""), Duration::from_millis(3));
        assert_eq!(exchange.text(), "\"value\"");
        assert_eq!(exchange.raw(), b"\"value\"");
        assert!((exchange.elapsed_secs() - 0.003).abs() < 1e-9);
    }

    #[test]
    fn test_split_utf8_is_replaced() {
        // First two bytes of a three-byte character
        let exchange = Exchange::new(Bytes::from_static(b"ok \xe2\x82"), Duration::ZERO);
        assert!(exchange.text().starts_with("ok "));
        assert!(exchange.text().contains('\u{FFFD}'));
    }
}
