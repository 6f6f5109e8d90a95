//! Engine configuration
//!
//! Plain serde structs with defaults, loadable from TOML:
//!
//! ```toml
//! api_prefix = "/api"
//! validate_on_load = true
//!
//! [identifiers]
//! strategy_prefix = "S"
//! evidence_prefix = "E"
//! claim_prefix = ""
//! first_index = 1
//! evidence_first_index = 0
//! ```

use crate::error::EngineResult;
use serde::{Deserialize, Serialize};

/// Display-label rules for new children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentifierScheme {
    /// Prefix of strategy labels (`S1`, `S2`, ...)
    pub strategy_prefix: String,
    /// Prefix of evidence labels (`E0`, `E1`, ...)
    pub evidence_prefix: String,
    /// Prefix of property-claim labels (empty: `1`, `1.2`)
    pub claim_prefix: String,
    /// First index for strategies and property claims
    pub first_index: u32,
    /// First index for evidence
    pub evidence_first_index: u32,
}

impl Default for IdentifierScheme {
    fn default() -> Self {
        Self {
            strategy_prefix: "S".to_string(),
            evidence_prefix: "E".to_string(),
            claim_prefix: String::new(),
            first_index: 1,
            evidence_first_index: 0,
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Label rules used by the identifier allocator
    pub identifiers: IdentifierScheme,
    /// Path prefix for REST request descriptors
    pub api_prefix: String,
    /// Run tree validation when loading a document
    pub validate_on_load: bool,
}

impl EngineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With identifier scheme
    #[inline]
    #[must_use]
    pub fn with_identifiers(mut self, identifiers: IdentifierScheme) -> Self {
        self.identifiers = identifiers;
        self
    }

    /// With API prefix
    #[inline]
    #[must_use]
    pub fn with_api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = prefix.into();
        self
    }

    /// With validation on load
    #[inline]
    #[must_use]
    pub fn with_validate_on_load(mut self, validate: bool) -> Self {
        self.validate_on_load = validate;
        self
    }

    /// Parse from TOML; absent keys take their defaults
    ///
    /// # Errors
    /// Returns error if the text is not valid TOML for this shape
    pub fn from_toml_str(text: &str) -> EngineResult<Self> {
        Ok(toml::from_str(text)?)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            identifiers: IdentifierScheme::default(),
            api_prefix: "/api".to_string(),
            validate_on_load: true,
        }
    }
}
