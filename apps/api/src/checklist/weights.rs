use crate::errors::FieldError;
use crate::models::checklist::ChecklistItem;

/// Accepted distance between the weight total and 100.
pub const WEIGHT_TOLERANCE: f64 = 0.01;

const DEFAULT_CRITERIA: [(&str, f64); 9] = [
    ("Safety", 15.0),
    ("Experience", 15.0),
    ("Programmatic Approach", 10.0),
    ("Commercial Excellence", 15.0),
    ("Innovative Solutions", 10.0),
    ("Mission Critical Experience", 15.0),
    ("Schedule", 10.0),
    ("Quality", 5.0),
    ("References", 5.0),
];

/// The rubric an RFP starts with before anyone edits it.
pub fn default_checklist() -> Vec<ChecklistItem> {
    DEFAULT_CRITERIA
        .iter()
        .map(|(criterion, weight)| ChecklistItem {
            criterion: criterion.to_string(),
            weight: *weight,
        })
        .collect()
}

pub fn total_weight(items: &[ChecklistItem]) -> f64 {
    items.iter().map(|item| item.weight).sum()
}

/// Accepts the list only when every row is well formed and the weights sum to 100.
pub fn validate_weights(items: &[ChecklistItem]) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if items.is_empty() {
        errors.push(FieldError::new("items", "Checklist must have at least one criterion"));
    }

    for (i, item) in items.iter().enumerate() {
        if item.criterion.trim().is_empty() {
            errors.push(FieldError::new(
                format!("items[{i}].criterion"),
                "Criterion must not be empty",
            ));
        }
        if !item.weight.is_finite() || item.weight < 0.0 {
            errors.push(FieldError::new(
                format!("items[{i}].weight"),
                "Weight must be a number of at least 0",
            ));
        }
    }

    if errors.is_empty() {
        let total = total_weight(items);
        if (total - 100.0).abs() >= WEIGHT_TOLERANCE {
            errors.push(FieldError::new(
                "items",
                format!("Weights must sum to 100 (currently {total:.2})"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(weights: &[f64]) -> Vec<ChecklistItem> {
        weights
            .iter()
            .enumerate()
            .map(|(i, w)| ChecklistItem {
                criterion: format!("Criterion {i}"),
                weight: *w,
            })
            .collect()
    }

    #[test]
    fn test_default_checklist_sums_to_100() {
        let defaults = default_checklist();
        assert_eq!(defaults.len(), 9);
        assert_eq!(total_weight(&defaults), 100.0);
        assert!(validate_weights(&defaults).is_ok());
    }

    #[test]
    fn test_sum_within_tolerance_is_accepted() {
        assert!(validate_weights(&items(&[33.33, 33.33, 33.335])).is_ok());
        assert!(validate_weights(&items(&[50.0, 50.0])).is_ok());
    }

    #[test]
    fn test_sum_outside_tolerance_is_rejected() {
        assert!(validate_weights(&items(&[50.0, 49.0])).is_err());
        assert!(validate_weights(&items(&[60.0, 50.0])).is_err());
        assert!(validate_weights(&items(&[33.0, 33.0, 33.98])).is_err());
    }

    #[test]
    fn test_negative_or_nan_weight_is_rejected() {
        let errors = validate_weights(&items(&[110.0, -10.0])).unwrap_err();
        assert_eq!(errors[0].field, "items[1].weight");
        assert!(validate_weights(&items(&[f64::NAN, 100.0])).is_err());
    }

    #[test]
    fn test_blank_criterion_and_empty_list_are_rejected() {
        let mut list = items(&[100.0]);
        list[0].criterion = "  ".to_string();
        assert_eq!(validate_weights(&list).unwrap_err()[0].field, "items[0].criterion");
        assert!(validate_weights(&[]).is_err());
    }
}
