use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::FieldError;
use crate::models::contractor::ContractorType;
use crate::models::rfp::RfpFields;

/// Intake form exactly as the client submits it.
///
/// Values stay loosely typed here so a bad value becomes a field error, not a body
/// rejection: `estimatedBudget` may arrive as a number or a numeric string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeForm {
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub scope_of_work: String,
    #[serde(default)]
    pub metro_code: String,
    #[serde(default)]
    pub contractor_type: String,
    #[serde(default)]
    pub estimated_budget: Value,
    pub rfp_start_date: Option<String>,
    pub rfp_end_date: Option<String>,
    pub project_start_date: Option<String>,
    pub project_end_date: Option<String>,
}

/// Keys a PATCH may overwrite.
pub const EDITABLE_FIELDS: [&str; 9] = [
    "projectName",
    "scopeOfWork",
    "metroCode",
    "contractorType",
    "estimatedBudget",
    "rfpStartDate",
    "rfpEndDate",
    "projectStartDate",
    "projectEndDate",
];

/// Validates the whole form, reporting every failing field.
pub fn validate_intake(form: &IntakeForm) -> Result<RfpFields, Vec<FieldError>> {
    let mut errors = Vec::new();

    let project_name = required_text(&form.project_name, "projectName", &mut errors);
    let scope_of_work = required_text(&form.scope_of_work, "scopeOfWork", &mut errors);

    let metro_code = form.metro_code.trim().to_ascii_uppercase();
    if !(3..=4).contains(&metro_code.len()) || !metro_code.chars().all(|c| c.is_ascii_alphabetic())
    {
        errors.push(FieldError::new(
            "metroCode",
            "Metro code must be 3 or 4 letters",
        ));
    }

    let contractor_type = form
        .contractor_type
        .parse::<ContractorType>()
        .map_err(|e| errors.push(FieldError::new("contractorType", e)))
        .ok();

    let estimated_budget = parse_budget(&form.estimated_budget)
        .map_err(|msg| errors.push(FieldError::new("estimatedBudget", msg)))
        .ok();

    let rfp_start_date = parse_date(&form.rfp_start_date, "rfpStartDate", &mut errors);
    let rfp_end_date = parse_date(&form.rfp_end_date, "rfpEndDate", &mut errors);
    let project_start_date = parse_date(&form.project_start_date, "projectStartDate", &mut errors);
    let project_end_date = parse_date(&form.project_end_date, "projectEndDate", &mut errors);

    if let (Some(start), Some(end)) = (rfp_start_date, rfp_end_date) {
        if end < start {
            errors.push(FieldError::new(
                "rfpEndDate",
                "RFP end date must not be before the start date",
            ));
        }
    }
    if let (Some(start), Some(end)) = (project_start_date, project_end_date) {
        if end < start {
            errors.push(FieldError::new(
                "projectEndDate",
                "Project end date must not be before the start date",
            ));
        }
    }

    match (contractor_type, estimated_budget) {
        (Some(contractor_type), Some(estimated_budget)) if errors.is_empty() => Ok(RfpFields {
            project_name,
            scope_of_work,
            metro_code,
            contractor_type,
            estimated_budget,
            rfp_start_date,
            rfp_end_date,
            project_start_date,
            project_end_date,
        }),
        _ => Err(errors),
    }
}

/// Blank counts as missing; a present value is stored exactly as entered.
fn required_text(raw: &str, field: &str, errors: &mut Vec<FieldError>) -> String {
    if raw.trim().is_empty() {
        errors.push(FieldError::new(field, "This field is required"));
    }
    raw.to_string()
}

/// Accepts a JSON number or a numeric string. Negative, non-finite and non-numeric
/// values are rejected.
pub fn parse_budget(raw: &Value) -> Result<f64, String> {
    let amount = match raw {
        Value::Null => return Err("Estimated budget is required".to_string()),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| "Estimated budget must be a number".to_string())?,
        Value::String(s) if !s.trim().is_empty() => s
            .trim()
            .parse::<f64>()
            .map_err(|_| "Estimated budget must be a number".to_string())?,
        Value::String(_) => return Err("Estimated budget is required".to_string()),
        _ => return Err("Estimated budget must be a number".to_string()),
    };
    if !amount.is_finite() {
        return Err("Estimated budget must be a number".to_string());
    }
    if amount < 0.0 {
        return Err("Estimated budget cannot be negative".to_string());
    }
    Ok(amount)
}

fn parse_date(raw: &Option<String>, field: &str, errors: &mut Vec<FieldError>) -> Option<NaiveDate> {
    let raw = raw.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(FieldError::new(field, "Dates must be formatted YYYY-MM-DD"));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form() -> IntakeForm {
        serde_json::from_value(json!({
            "projectName": "NYC Data Center Expansion",
            "scopeOfWork": "Install backup generators",
            "metroCode": "NYC",
            "contractorType": "Electrical",
            "estimatedBudget": 500000,
            "projectStartDate": "2025-01-01"
        }))
        .unwrap()
    }

    fn failing_fields(form: &IntakeForm) -> Vec<String> {
        validate_intake(form)
            .unwrap_err()
            .into_iter()
            .map(|e| e.field)
            .collect()
    }

    #[test]
    fn test_valid_form() {
        let fields = validate_intake(&form()).unwrap();
        assert_eq!(fields.metro_code, "NYC");
        assert_eq!(fields.estimated_budget, 500000.0);
        assert_eq!(
            fields.project_start_date,
            NaiveDate::from_ymd_opt(2025, 1, 1)
        );
        assert_eq!(fields.rfp_end_date, None);
    }

    #[test]
    fn test_text_fields_are_stored_as_entered() {
        let mut f = form();
        f.project_name = "  NYC Data Center Expansion ".to_string();
        f.scope_of_work = "Install backup generators\n".to_string();
        let fields = validate_intake(&f).unwrap();
        assert_eq!(fields.project_name, "  NYC Data Center Expansion ");
        assert_eq!(fields.scope_of_work, "Install backup generators\n");

        f.project_name = "   ".to_string();
        assert_eq!(failing_fields(&f), vec!["projectName"]);
    }

    #[test]
    fn test_negative_budget_rejected() {
        let mut f = form();
        f.estimated_budget = json!(-1);
        assert_eq!(failing_fields(&f), vec!["estimatedBudget"]);
    }

    #[test]
    fn test_non_numeric_budget_rejected() {
        let mut f = form();
        f.estimated_budget = json!("about half a million");
        assert_eq!(failing_fields(&f), vec!["estimatedBudget"]);

        f.estimated_budget = json!(true);
        assert_eq!(failing_fields(&f), vec!["estimatedBudget"]);
    }

    #[test]
    fn test_missing_budget_rejected() {
        let mut f = form();
        f.estimated_budget = Value::Null;
        assert_eq!(failing_fields(&f), vec!["estimatedBudget"]);
    }

    #[test]
    fn test_numeric_string_budget_accepted() {
        let mut f = form();
        f.estimated_budget = json!(" 1250000.50 ");
        assert_eq!(validate_intake(&f).unwrap().estimated_budget, 1_250_000.5);
    }

    #[test]
    fn test_zero_budget_accepted() {
        let mut f = form();
        f.estimated_budget = json!(0);
        assert!(validate_intake(&f).is_ok());
    }

    #[test]
    fn test_metro_code_is_uppercased_and_checked() {
        let mut f = form();
        f.metro_code = " dfw ".to_string();
        assert_eq!(validate_intake(&f).unwrap().metro_code, "DFW");

        f.metro_code = "D1W".to_string();
        assert_eq!(failing_fields(&f), vec!["metroCode"]);
    }

    #[test]
    fn test_reversed_dates_rejected() {
        let mut f = form();
        f.rfp_start_date = Some("2025-03-01".to_string());
        f.rfp_end_date = Some("2025-02-01".to_string());
        f.project_end_date = Some("2024-12-31".to_string());
        assert_eq!(failing_fields(&f), vec!["rfpEndDate", "projectEndDate"]);
    }

    #[test]
    fn test_bad_date_format_rejected() {
        let mut f = form();
        f.rfp_end_date = Some("03/01/2025".to_string());
        assert_eq!(failing_fields(&f), vec!["rfpEndDate"]);
    }

    #[test]
    fn test_every_missing_field_is_reported() {
        let fields = failing_fields(&IntakeForm::default());
        assert_eq!(
            fields,
            vec![
                "projectName",
                "scopeOfWork",
                "metroCode",
                "contractorType",
                "estimatedBudget"
            ]
        );
    }
}
