use std::fmt;

/// Bearer credential exactly as presented by the client. Not verified.
#[derive(Clone, PartialEq, Eq)]
pub struct RawCredential(String);

impl RawCredential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens must not end up in logs.
impl fmt::Debug for RawCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RawCredential(<redacted>)")
    }
}

/// What the extraction stage found on the request.
///
/// `Absent` is an expected outcome, not an error: public routes never look
/// at it and guarded routes turn it into 401 in the authentication stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    Bearer(RawCredential),
    Absent,
}
