//! API credentials passed explicitly to the components that need them.

use crate::error::{Result, SvarError};

/// The API credential for the embedding and generation collaborators.
///
/// Read once at startup and handed to constructors, so no component reaches
/// into the process environment on its own.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
}

impl Credentials {
    /// Create credentials from an explicit key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    /// Read the credential from `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        match std::env::var("OPENAI_API_KEY") {
            Ok(key) if !key.is_empty() => Ok(Self::new(key)),
            Ok(_) => Err(SvarError::Config(
                "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
            )),
            Err(_) => Err(SvarError::Config(
                "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
            )),
        }
    }

    /// The raw API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

// Keep the key out of debug output and logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"***")
            .finish()
    }
}
