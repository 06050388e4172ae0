//! DSL configuration
//!
//! The lookup tables and URL base that compilers consult. Passed explicitly to
//! every example group; there is no global registry.

use respec_domain::{MimeTable, StatusTable};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ApplicationError, ApplicationResult};

/// Host used to absolutize relative redirect targets.
pub const DEFAULT_BASE_URL: &str = "http://test.host/";

/// Configuration shared by all declarations of an example group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RespecConfig {
    /// Extra or overriding symbolic status names.
    pub statuses: StatusTable,
    /// Extra or overriding format → MIME entries.
    pub mimes: MimeTable,
    /// Base for relative redirect targets.
    pub base_url: Url,
}

impl RespecConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the status table.
    #[must_use]
    pub fn with_statuses(mut self, statuses: StatusTable) -> Self {
        self.statuses = statuses;
        self
    }

    /// Sets the MIME table.
    #[must_use]
    pub fn with_mimes(mut self, mimes: MimeTable) -> Self {
        self.mimes = mimes;
        self
    }

    /// Sets the redirect base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    /// Checks the loaded values.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Config`] for an invalid MIME entry or a base
    /// URL that cannot be joined against.
    pub fn validate(&self) -> ApplicationResult<()> {
        self.mimes
            .validate()
            .map_err(|err| ApplicationError::Config(err.to_string()))?;
        if self.base_url.cannot_be_a_base() {
            return Err(ApplicationError::Config(format!(
                "base_url {} cannot be a base",
                self.base_url
            )));
        }
        Ok(())
    }
}

impl Default for RespecConfig {
    fn default() -> Self {
        Self {
            statuses: StatusTable::new(),
            mimes: MimeTable::new(),
            base_url: default_base_url(),
        }
    }
}

#[allow(clippy::expect_used)]
fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("DEFAULT_BASE_URL is a valid absolute URL")
}
