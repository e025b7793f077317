//! Ego-graph query parameters.
//!
//! Exposes [`Radius`] and the [`EgoParams`] builder shared by every backend so
//! that both sides of an equivalence check interpret a query identically.

use std::{fmt, sync::Arc};

use crate::{Result, error::EgoError};

/// Maximum distance from the center for a node to join the ego graph.
///
/// A node at distance `d` is included when `d <= radius`. The center is
/// always at distance zero and is therefore reached for any radius, even a
/// negative one.
///
/// # Examples
/// ```
/// use egonet_core::Radius;
///
/// assert_eq!(Radius::new(None)?, Radius::Unbounded);
/// assert_eq!(Radius::new(Some(f64::INFINITY))?, Radius::Unbounded);
/// assert!(Radius::new(Some(1.5))?.admits(1.0));
/// assert!(!Radius::new(Some(1.5))?.admits(2.0));
/// assert!(Radius::new(Some(f64::NAN)).is_err());
/// # Ok::<(), egonet_core::EgoError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Radius {
    /// No bound; every reachable node is included.
    Unbounded,
    /// Inclusive upper bound on the distance.
    Finite(f64),
}

impl Radius {
    /// Builds a radius from an optional value.
    ///
    /// `None` and positive infinity both mean [`Radius::Unbounded`].
    ///
    /// # Errors
    /// Returns [`EgoError::InvalidRadius`] when `value` is NaN.
    pub fn new(value: Option<f64>) -> Result<Self> {
        match value {
            None => Ok(Self::Unbounded),
            Some(value) if value.is_nan() => Err(EgoError::InvalidRadius),
            Some(value) if value == f64::INFINITY => Ok(Self::Unbounded),
            Some(value) => Ok(Self::Finite(value)),
        }
    }

    /// Returns whether a node at `distance` lies inside the radius.
    #[must_use]
    pub fn admits(self, distance: f64) -> bool {
        match self {
            Self::Unbounded => true,
            Self::Finite(limit) => distance <= limit,
        }
    }
}

impl Default for Radius {
    fn default() -> Self {
        Self::Finite(1.0)
    }
}

impl fmt::Display for Radius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbounded => f.write_str("inf"),
            Self::Finite(limit) => write!(f, "{limit}"),
        }
    }
}

/// Parameters of an ego-graph query, excluding the graph and center.
///
/// Defaults: radius `1`, center included, directed reachability, hop-count
/// distance.
///
/// # Examples
/// ```
/// use egonet_core::{EgoParams, Radius};
///
/// let params = EgoParams::new()
///     .with_radius(Radius::Unbounded)
///     .with_center(false)
///     .with_undirected(true)
///     .with_distance("weight");
/// assert_eq!(params.radius(), Radius::Unbounded);
/// assert!(!params.center());
/// assert!(params.undirected());
/// assert_eq!(params.distance(), Some("weight"));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct EgoParams {
    radius: Radius,
    center: bool,
    undirected: bool,
    distance: Option<Arc<str>>,
}

impl Default for EgoParams {
    fn default() -> Self {
        Self {
            radius: Radius::default(),
            center: true,
            undirected: false,
            distance: None,
        }
    }
}

impl EgoParams {
    /// Creates parameters populated with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the radius.
    #[must_use]
    pub fn with_radius(mut self, radius: Radius) -> Self {
        self.radius = radius;
        self
    }

    /// Controls whether the center node is kept in the result.
    #[must_use]
    pub fn with_center(mut self, center: bool) -> Self {
        self.center = center;
        self
    }

    /// Computes reachability on the undirected view of directed graphs.
    #[must_use]
    pub fn with_undirected(mut self, undirected: bool) -> Self {
        self.undirected = undirected;
        self
    }

    /// Measures distance by summing the named edge attribute.
    #[must_use]
    pub fn with_distance(mut self, attribute: impl Into<Arc<str>>) -> Self {
        self.distance = Some(attribute.into());
        self
    }

    /// Measures distance in hops.
    #[must_use]
    pub fn without_distance(mut self) -> Self {
        self.distance = None;
        self
    }

    /// Returns the radius.
    #[must_use]
    pub fn radius(&self) -> Radius {
        self.radius
    }

    /// Returns whether the center node is kept.
    #[must_use]
    pub fn center(&self) -> bool {
        self.center
    }

    /// Returns whether reachability ignores edge direction.
    #[must_use]
    pub fn undirected(&self) -> bool {
        self.undirected
    }

    /// Returns the distance attribute, if any.
    #[must_use]
    pub fn distance(&self) -> Option<&str> {
        self.distance.as_deref()
    }
}
