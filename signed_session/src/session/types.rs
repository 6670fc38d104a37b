use std::fmt;

/// A digitally signed session identifier.
///
/// The encoded text is the URL-safe base64 (no padding) form of
/// `32 random bytes || HMAC-SHA256(random bytes)`. Values are only produced by
/// [`mint_session_id`](crate::mint_session_id) and
/// [`validate_session_id`](crate::validate_session_id); the empty value is the
/// unset sentinel returned by `SessionId::default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub(crate) fn from_encoded(encoded: String) -> Self {
        Self(encoded)
    }

    /// The unset sentinel, carrying no identifier.
    pub fn unset() -> Self {
        Self::default()
    }

    pub fn is_unset(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
