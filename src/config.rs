//! Configuration for the phase router and its collaborators.

/// Default total wall-clock budget for a provisioning session, in seconds.
pub const DEFAULT_SESSION_TIMEOUT_SECS: u64 = 300;

/// Router configuration.
///
/// All fields have conservative defaults; construct with
/// [`RouterConfig::default`] and override with the builder methods.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Whether resource properties are scanned for secret reference tokens
    /// before dispatch. Enabled by default.
    pub resolve_secrets: bool,

    /// Number of callback delivery retries after the first attempt.
    /// Defaults to one best-effort retry; unbounded retry is deliberately
    /// not offered because CloudFormation does not define duplicate
    /// delivery semantics.
    pub callback_retries: u32,

    /// Session timeout applied when the envelope carries none.
    pub default_timeout_secs: u64,

    /// Output attribute names whose values are masked in logged responses.
    pub secure_attributes: Vec<String>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            resolve_secrets: true,
            callback_retries: 1,
            default_timeout_secs: DEFAULT_SESSION_TIMEOUT_SECS,
            secure_attributes: Vec::new(),
        }
    }
}

impl RouterConfig {
    /// Enables or disables the secret-resolution step.
    pub fn with_resolve_secrets(mut self, resolve_secrets: bool) -> Self {
        self.resolve_secrets = resolve_secrets;
        self
    }

    /// Sets the number of callback delivery retries.
    pub fn with_callback_retries(mut self, retries: u32) -> Self {
        self.callback_retries = retries;
        self
    }

    /// Sets the default session timeout in seconds.
    pub fn with_default_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.default_timeout_secs = timeout_secs;
        self
    }

    /// Sets the attribute names masked in logged responses.
    pub fn with_secure_attributes(mut self, attributes: Vec<String>) -> Self {
        self.secure_attributes = attributes;
        self
    }
}
