//! Enabled deployment types and their priorities.

use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::config::ContainerConfig;
use crate::tags;

// -----------------------------------------------------------------------------
// DeploymentTypes

/// The enabled deployment types, lowest priority first.
///
/// Index 0 holds [`Standard`](tags::STANDARD) in the default
/// configuration and is never chosen from stereotype contributions.
///
/// # Example
///
/// ```
/// use bk_bean::deployment::DeploymentTypes;
///
/// let types = DeploymentTypes::new(["Standard", "Production", "Mock"]);
///
/// // Highest priority wins, not the first one offered.
/// let offered = ["Mock", "Production"];
/// assert_eq!(types.highest_priority_present(|t| offered.contains(&t)).as_deref(), Some("Mock"));
///
/// // Index 0 is never selected.
/// assert_eq!(types.highest_priority_present(|t| t == "Standard"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentTypes {
    ordered: Arc<[Arc<str>]>,
}

impl Default for DeploymentTypes {
    fn default() -> Self {
        Self::new([tags::STANDARD, tags::PRODUCTION])
    }
}

impl DeploymentTypes {
    pub fn new<I, S>(ordered: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        Self {
            ordered: ordered.into_iter().map(Into::into).collect::<Vec<_>>().into(),
        }
    }

    pub fn from_config(config: &ContainerConfig) -> Self {
        Self::new(config.deployment_types.iter().map(|s| s.as_str()))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Arc<str>> {
        self.ordered.iter()
    }

    /// Position of the deployment type, higher is stronger.
    pub fn priority(&self, ty: &str) -> Option<usize> {
        self.ordered.iter().position(|t| &**t == ty)
    }

    #[inline]
    pub fn is_enabled(&self, ty: &str) -> bool {
        self.priority(ty).is_some()
    }

    /// Scans from the highest priority down and returns the first type for
    /// which `present` holds. Index 0 is not considered.
    pub fn highest_priority_present(&self, mut present: impl FnMut(&str) -> bool) -> Option<Arc<str>> {
        self.ordered
            .iter()
            .skip(1)
            .rev()
            .find(|t| present(t))
            .cloned()
    }
}

// -----------------------------------------------------------------------------
// Tests
