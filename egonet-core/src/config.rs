//! Dispatch configuration.
//!
//! Controls whether unsupported compact-backend calls fall back to the
//! reference implementation and whether compact results computed for
//! reference inputs are compatibility-wrapped.

use std::sync::Arc;

use crate::{Result, error::EgoError};

/// Environment variable enabling fallback to the reference backend.
pub const FALLBACK_ENV: &str = "EGONET_FALLBACK_TO_REFERENCE";
/// Environment variable controlling compatibility wrapping.
pub const COMPAT_ENV: &str = "EGONET_USE_COMPAT_GRAPHS";

/// Settings consumed by [`crate::Dispatcher`].
///
/// # Examples
/// ```
/// use egonet_core::DispatchConfig;
///
/// let config = DispatchConfig::new()
///     .with_fallback_to_reference(true)
///     .with_compat_graphs(false);
/// assert!(config.fallback_to_reference());
/// assert!(!config.use_compat_graphs());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchConfig {
    fallback_to_reference: bool,
    use_compat_graphs: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            fallback_to_reference: false,
            use_compat_graphs: true,
        }
    }
}

impl DispatchConfig {
    /// Creates a configuration populated with defaults.
    ///
    /// # Examples
    /// ```
    /// use egonet_core::DispatchConfig;
    ///
    /// let config = DispatchConfig::new();
    /// assert!(!config.fallback_to_reference());
    /// assert!(config.use_compat_graphs());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads overrides from the process environment.
    ///
    /// # Errors
    /// Returns [`EgoError::InvalidConfig`] when a variable is set to a value
    /// that is not a recognised boolean.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Reads overrides through `lookup`, which maps a variable name to its
    /// value when set.
    ///
    /// # Errors
    /// Returns [`EgoError::InvalidConfig`] for unrecognised values.
    ///
    /// # Examples
    /// ```
    /// use egonet_core::DispatchConfig;
    ///
    /// let config = DispatchConfig::from_vars(|name| {
    ///     (name == "EGONET_FALLBACK_TO_REFERENCE").then(|| " Yes ".to_owned())
    /// })?;
    /// assert!(config.fallback_to_reference());
    /// assert!(config.use_compat_graphs());
    /// # Ok::<(), egonet_core::EgoError>(())
    /// ```
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = lookup(FALLBACK_ENV) {
            config.fallback_to_reference = parse_flag(FALLBACK_ENV, &value)?;
        }
        if let Some(value) = lookup(COMPAT_ENV) {
            config.use_compat_graphs = parse_flag(COMPAT_ENV, &value)?;
        }
        Ok(config)
    }

    /// Enables or disables fallback to the reference backend.
    #[must_use]
    pub fn with_fallback_to_reference(mut self, enabled: bool) -> Self {
        self.fallback_to_reference = enabled;
        self
    }

    /// Enables or disables compatibility wrapping of compact results.
    #[must_use]
    pub fn with_compat_graphs(mut self, enabled: bool) -> Self {
        self.use_compat_graphs = enabled;
        self
    }

    /// Returns whether unsupported implicit calls fall back.
    #[must_use]
    pub fn fallback_to_reference(&self) -> bool {
        self.fallback_to_reference
    }

    /// Returns whether compact results for reference inputs are wrapped.
    #[must_use]
    pub fn use_compat_graphs(&self) -> bool {
        self.use_compat_graphs
    }
}

fn parse_flag(variable: &'static str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(EgoError::InvalidConfig {
            variable,
            value: Arc::from(value),
        }),
    }
}
