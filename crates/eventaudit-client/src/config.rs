//! Client configuration types.

/// Default SDK attempts per call, including the first
const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// How the AWS SDK configuration is loaded
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Region override; the SDK default chain is used when unset
    pub region: Option<String>,

    /// Named profile from the shared config files
    pub profile: Option<String>,

    /// Endpoint override applied to every service (local emulators, tests)
    pub endpoint_url: Option<String>,

    /// Maximum SDK attempts per call, retries on throttling included
    pub max_attempts: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientConfig {
    /// Create a configuration that defers everything to the SDK defaults
    #[must_use]
    pub const fn new() -> Self {
        Self {
            region: None,
            profile: None,
            endpoint_url: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Set the region
    #[must_use]
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the profile name
    #[must_use]
    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Set the endpoint override
    #[must_use]
    pub fn endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = Some(url.into());
        self
    }

    /// Set maximum attempts; zero is raised to one
    #[must_use]
    pub const fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = if attempts == 0 { 1 } else { attempts };
        self
    }
}
