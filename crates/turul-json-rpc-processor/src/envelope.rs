//! Structural pre-classification of a raw payload.
//!
//! Detection looks only at the first object or array opener, it never
//! validates the payload. Full parsing happens afterwards on the normalized
//! text, which is always an array.

use std::borrow::Cow;

/// Shape of a raw JSON-RPC payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// A bare request object
    Single,
    /// An array of requests
    Batch,
}

impl Envelope {
    /// Classify by the first `{` or `[` in the text. Input containing
    /// neither is treated as a single request.
    pub fn detect(payload: &str) -> Self {
        payload
            .chars()
            .find_map(|c| match c {
                '{' => Some(Envelope::Single),
                '[' => Some(Envelope::Batch),
                _ => None,
            })
            .unwrap_or(Envelope::Single)
    }

    /// Wrap single payloads into a one-element array literal
    pub fn normalize(self, payload: &str) -> Cow<'_, str> {
        match self {
            Envelope::Single => Cow::Owned(format!("[{}]", payload)),
            Envelope::Batch => Cow::Borrowed(payload),
        }
    }
}
