//! Edge-length interpretation shared by both backends.

use std::sync::Arc;

use crate::{
    Result,
    error::EgoError,
    graph::{AttrValue, NodeId},
};

/// Length of an edge whose distance attribute is missing.
pub(crate) const DEFAULT_LENGTH: f64 = 1.0;

/// Reads the length of edge `(from, to)` from its distance attribute value.
///
/// NaN and `+inf` are rejected like text and booleans, so an
/// unbounded radius and a large finite one see the same edges.
pub(crate) fn edge_length(
    value: Option<&AttrValue>,
    from: NodeId,
    to: NodeId,
    attribute: &str,
) -> Result<f64> {
    let Some(value) = value else {
        return Ok(DEFAULT_LENGTH);
    };
    let length = value.as_f64().ok_or_else(|| EgoError::NonNumericWeight {
        from,
        to,
        attribute: Arc::from(attribute),
    })?;
    if length < 0.0 {
        return Err(EgoError::NegativeWeight {
            from,
            to,
            attribute: Arc::from(attribute),
        });
    }
    if !length.is_finite() {
        return Err(EgoError::NonNumericWeight {
            from,
            to,
            attribute: Arc::from(attribute),
        });
    }
    Ok(length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, 1.0)]
    #[case(Some(AttrValue::Int(3)), 3.0)]
    #[case(Some(AttrValue::Float(0.25)), 0.25)]
    #[case(Some(AttrValue::Int(0)), 0.0)]
    fn numeric_values_become_lengths(#[case] value: Option<AttrValue>, #[case] expected: f64) {
        let length = edge_length(value.as_ref(), 0, 1, "weight").expect("numeric lengths are valid");
        assert_eq!(length, expected);
    }

    #[test]
    fn negative_lengths_are_rejected() {
        let err = edge_length(Some(&AttrValue::Float(-0.5)), 2, 3, "weight")
            .expect_err("negative lengths must fail");
        assert!(matches!(err, EgoError::NegativeWeight { from: 2, to: 3, .. }));
        let err = edge_length(Some(&AttrValue::Float(f64::NEG_INFINITY)), 2, 3, "weight")
            .expect_err("negative infinity is negative");
        assert!(matches!(err, EgoError::NegativeWeight { .. }));
    }

    #[rstest]
    #[case(AttrValue::Text("far".to_owned()))]
    #[case(AttrValue::Bool(true))]
    #[case(AttrValue::Float(f64::NAN))]
    #[case(AttrValue::Float(f64::INFINITY))]
    fn non_numeric_lengths_are_rejected(#[case] value: AttrValue) {
        let err = edge_length(Some(&value), 0, 1, "weight").expect_err("value is not a length");
        assert_eq!(err.code(), crate::error::EgoErrorCode::NonNumericWeight);
    }
}
