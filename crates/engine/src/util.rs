//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine};

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::InvalidId(format!("invalid {label} id")))
}

pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// `None` keeps the stored value, a blank string clears it.
pub(crate) fn apply_optional_text_patch(
    existing: Option<String>,
    patch: Option<&str>,
) -> Option<String> {
    match patch {
        None => existing,
        Some(value) => normalize_optional_text(Some(value)),
    }
}

pub(crate) fn ensure_non_negative_money(value: MoneyCents, label: &str) -> ResultEngine<()> {
    if value.is_negative() {
        return Err(EngineError::InvalidAmount(format!(
            "{label} must be >= 0, got {value}"
        )));
    }
    Ok(())
}

pub(crate) fn ensure_non_negative_quantity(value: i64, label: &str) -> ResultEngine<()> {
    if value < 0 {
        return Err(EngineError::InvalidAmount(format!(
            "{label} must be >= 0, got {value}"
        )));
    }
    Ok(())
}

/// `true` when the patch carries a value different from the stored one.
pub(crate) fn differs<T: PartialEq>(current: &T, patch: Option<&T>) -> bool {
    patch.is_some_and(|value| value != current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_patch_keeps_or_clears() {
        assert_eq!(
            apply_optional_text_patch(Some("shelf A".to_string()), None),
            Some("shelf A".to_string())
        );
        assert_eq!(apply_optional_text_patch(Some("shelf A".to_string()), Some("  ")), None);
        assert_eq!(
            apply_optional_text_patch(None, Some(" fridge ")),
            Some("fridge".to_string())
        );
    }

    #[test]
    fn required_name_is_trimmed() {
        assert_eq!(normalize_required_name("  Flour ", "product").unwrap(), "Flour");
        assert!(matches!(
            normalize_required_name("   ", "product"),
            Err(EngineError::InvalidName(_))
        ));
    }

    #[test]
    fn same_value_is_not_a_change() {
        assert!(!differs(&5, Some(&5)));
        assert!(!differs(&5, None));
        assert!(differs(&5, Some(&6)));
    }
}
