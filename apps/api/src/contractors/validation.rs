use serde::Deserialize;

use crate::contractors::metro_codes::extract_metro_codes;
use crate::errors::FieldError;
use crate::models::contractor::{ContractorType, PreferredStatus};
use crate::models::metro::MetroCode;

/// Contractor create/edit form as submitted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractorInput {
    pub name: String,
    #[serde(default)]
    pub contact_names: String,
    #[serde(default)]
    pub contact_emails: String,
    pub contractor_type: String,
    pub preferred_status: Option<String>,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub metro_site: String,
    /// Structured selection. Takes precedence over codes mined from `metro_site`.
    pub metro_codes: Option<Vec<String>>,
    pub performance: i64,
}

/// Field values that passed validation, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidContractor {
    pub name: String,
    pub contact_names: String,
    pub contact_emails: String,
    pub contractor_type: ContractorType,
    pub preferred_status: PreferredStatus,
    pub region: String,
    pub metro_site: String,
    pub metro_codes: Vec<String>,
    pub performance: u8,
}

pub fn validate_contractor(
    input: &ContractorInput,
    reference: &[MetroCode],
) -> Result<ValidContractor, Vec<FieldError>> {
    let mut errors = Vec::new();

    let name = input.name.trim().to_string();
    if name.is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    }

    let contractor_type = input
        .contractor_type
        .parse::<ContractorType>()
        .map_err(|e| errors.push(FieldError::new("contractorType", e)))
        .ok();

    let preferred_status = match &input.preferred_status {
        Some(raw) => raw
            .parse::<PreferredStatus>()
            .map_err(|e| errors.push(FieldError::new("preferredStatus", e)))
            .ok(),
        None => Some(PreferredStatus::NotEvaluated),
    };

    let performance = match u8::try_from(input.performance) {
        Ok(score) if score <= 100 => Some(score),
        _ => {
            errors.push(FieldError::new(
                "performance",
                "Performance must be between 0 and 100",
            ));
            None
        }
    };

    let metro_codes = match &input.metro_codes {
        Some(selected) => {
            let mut codes: Vec<String> = Vec::new();
            for raw in selected {
                let code = raw.trim().to_ascii_uppercase();
                if !reference.iter().any(|m| m.code == code) {
                    errors.push(FieldError::new(
                        "metroCodes",
                        format!("Unknown metro code '{}'", raw.trim()),
                    ));
                } else if !codes.contains(&code) {
                    codes.push(code);
                }
            }
            codes
        }
        None => extract_metro_codes(&input.metro_site),
    };

    for email in input
        .contact_emails
        .split(';')
        .map(str::trim)
        .filter(|e| !e.is_empty())
    {
        if !email.contains('@') {
            errors.push(FieldError::new(
                "contactEmails",
                format!("'{email}' is not an email address"),
            ));
        }
    }

    match (contractor_type, preferred_status, performance) {
        (Some(contractor_type), Some(preferred_status), Some(performance))
            if errors.is_empty() =>
        {
            Ok(ValidContractor {
                name,
                contact_names: input.contact_names.trim().to_string(),
                contact_emails: input.contact_emails.trim().to_string(),
                contractor_type,
                preferred_status,
                region: input.region.trim().to_string(),
                metro_site: input.metro_site.trim().to_string(),
                metro_codes,
                performance,
            })
        }
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::metro::reference_metros;

    fn input() -> ContractorInput {
        ContractorInput {
            name: "Northwind Mechanical".to_string(),
            contact_names: "Jo Park".to_string(),
            contact_emails: "jo@northwind.example".to_string(),
            contractor_type: "Mechanical".to_string(),
            preferred_status: Some("Preferred".to_string()),
            region: "South".to_string(),
            metro_site: "DFW (Dallas), HOU (Houston)".to_string(),
            metro_codes: None,
            performance: 87,
        }
    }

    #[test]
    fn test_codes_are_derived_from_site_text_by_default() {
        let valid = validate_contractor(&input(), &reference_metros()).unwrap();
        assert_eq!(valid.metro_codes, vec!["DFW", "HOU"]);
        assert_eq!(valid.preferred_status, PreferredStatus::Preferred);
    }

    #[test]
    fn test_structured_codes_take_precedence_and_are_checked() {
        let mut form = input();
        form.metro_codes = Some(vec!["phx".to_string(), "PHX".to_string()]);
        let valid = validate_contractor(&form, &reference_metros()).unwrap();
        assert_eq!(valid.metro_codes, vec!["PHX"]);

        form.metro_codes = Some(vec!["ZZZ".to_string()]);
        let errors = validate_contractor(&form, &reference_metros()).unwrap_err();
        assert_eq!(errors[0].field, "metroCodes");
    }

    #[test]
    fn test_performance_out_of_range() {
        let mut form = input();
        form.performance = 101;
        let errors = validate_contractor(&form, &reference_metros()).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "performance"));

        form.performance = -1;
        assert!(validate_contractor(&form, &reference_metros()).is_err());
    }

    #[test]
    fn test_collects_every_failing_field() {
        let mut form = input();
        form.name = "  ".to_string();
        form.contractor_type = "Landscaping".to_string();
        form.contact_emails = "jo.northwind.example".to_string();
        let fields: Vec<String> = validate_contractor(&form, &reference_metros())
            .unwrap_err()
            .into_iter()
            .map(|e| e.field)
            .collect();
        assert_eq!(fields, vec!["name", "contractorType", "contactEmails"]);
    }

    #[test]
    fn test_missing_preferred_status_defaults_to_not_evaluated() {
        let mut form = input();
        form.preferred_status = None;
        let valid = validate_contractor(&form, &reference_metros()).unwrap();
        assert_eq!(valid.preferred_status, PreferredStatus::NotEvaluated);
    }
}
