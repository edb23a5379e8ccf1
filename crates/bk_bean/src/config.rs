//! Container configuration.
//!
//! [`ContainerConfig`] is loaded by the application before bootstrap, in
//! any format `serde` supports. Every field has a default, so a partial
//! document only overrides what it names.
//!
//! # Example
//!
//! ```
//! use bk_bean::config::ContainerConfig;
//!
//! let config: ContainerConfig = serde_json::from_str(r#"{
//!     "deployment_types": ["Standard", "Production", "Mock"]
//! }"#).unwrap();
//!
//! assert_eq!(config.deployment_types.last().map(String::as_str), Some("Mock"));
//! assert_eq!(config.scopes, ContainerConfig::default().scopes);
//! ```

use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::tags;

// -----------------------------------------------------------------------------
// ContainerConfig

/// Process-wide settings consumed by the definition builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Enabled deployment types, lowest priority first.
    ///
    /// Index 0 is reserved for [`Standard`](tags::STANDARD): it is never
    /// selected from stereotype contributions.
    pub deployment_types: Vec<String>,
    /// Scope classification.
    pub scopes: Vec<ScopeConfig>,
    /// Classes allowed to have the `Standard` deployment type.
    pub standard_types: Vec<String>,
    /// Additional binding types.
    pub bindings: Vec<BindingConfig>,
    /// Additional stereotypes.
    pub stereotypes: Vec<StereotypeConfig>,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            deployment_types: vec![tags::STANDARD.to_string(), tags::PRODUCTION.to_string()],
            scopes: vec![
                ScopeConfig::pseudo(tags::DEPENDENT),
                ScopeConfig::normal(tags::REQUEST_SCOPED, false),
                ScopeConfig::normal(tags::APPLICATION_SCOPED, false),
                ScopeConfig::normal(tags::SESSION_SCOPED, true),
                ScopeConfig::normal(tags::CONVERSATION_SCOPED, true),
            ],
            standard_types: vec![
                String::from("bk.Manager"),
                String::from("bk.InjectionPoint"),
                String::from("bk.Instance"),
                String::from("bk.Event"),
            ],
            bindings: Vec::new(),
            stereotypes: Vec::new(),
        }
    }
}

// -----------------------------------------------------------------------------
// ScopeConfig

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeConfig {
    pub name: String,
    /// Normal scopes are accessed through a client proxy.
    #[serde(default)]
    pub normal: bool,
    /// Instances of passivating scopes may be written to storage.
    #[serde(default)]
    pub passivating: bool,
}

impl ScopeConfig {
    pub fn normal(name: &str, passivating: bool) -> Self {
        Self {
            name: name.to_string(),
            normal: true,
            passivating,
        }
    }

    pub fn pseudo(name: &str) -> Self {
        Self {
            name: name.to_string(),
            normal: false,
            passivating: false,
        }
    }
}

// -----------------------------------------------------------------------------
// BindingConfig

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingConfig {
    pub name: String,
    /// Members ignored when matching.
    #[serde(default)]
    pub non_binding: Vec<String>,
}

// -----------------------------------------------------------------------------
// StereotypeConfig

/// A stereotype declared in configuration rather than by a tag type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StereotypeConfig {
    pub name: String,
    pub scope: Option<String>,
    pub deployment_type: Option<String>,
    /// Definitions carrying the stereotype get a default name.
    pub named: bool,
    pub required_types: Vec<String>,
}

// -----------------------------------------------------------------------------
// Tests
