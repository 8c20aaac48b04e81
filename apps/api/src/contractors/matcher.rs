//! Contractor Matcher: suggests contractors for an RFP's Selection stage.

use std::cmp::Ordering;

use serde::Serialize;

use crate::models::contractor::{Contractor, ContractorType};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    #[serde(flatten)]
    pub contractor: Contractor,
    pub invited: bool,
}

/// Contractors serving `metro_code` with exactly `contractor_type`, best performers first.
///
/// Ties on performance go to the better preferred tier, then to name.
pub fn match_contractors(
    contractors: Vec<Contractor>,
    metro_code: &str,
    contractor_type: ContractorType,
) -> Vec<Contractor> {
    let mut matched: Vec<Contractor> = contractors
        .into_iter()
        .filter(|c| c.contractor_type == contractor_type && c.serves_metro(metro_code))
        .collect();
    matched.sort_by(rank);
    matched
}

fn rank(a: &Contractor, b: &Contractor) -> Ordering {
    b.performance
        .cmp(&a.performance)
        .then(a.preferred_status.cmp(&b.preferred_status))
        .then_with(|| a.name.cmp(&b.name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::contractor::PreferredStatus;
    use crate::testing::contractor;

    #[test]
    fn test_filters_by_metro_and_type_and_ranks_by_performance() {
        let pool = vec![
            contractor("Alpha Mech", ContractorType::Mechanical, "DFW (Dallas)", 72),
            contractor("Beta Mech", ContractorType::Mechanical, "DFW, HOU", 91),
            contractor("Gamma Elec", ContractorType::Electrical, "DFW (Dallas)", 99),
            contractor("Delta Mech", ContractorType::Mechanical, "PHX (Phoenix)", 95),
            contractor("Echo Mech", ContractorType::Mechanical, "SAT; DFW", 85),
        ];

        let names: Vec<String> = match_contractors(pool, "DFW", ContractorType::Mechanical)
            .into_iter()
            .map(|c| c.name)
            .collect();

        assert_eq!(names, vec!["Beta Mech", "Echo Mech", "Alpha Mech"]);
    }

    #[test]
    fn test_ties_prefer_better_tier_then_name() {
        let mut preferred = contractor("Zulu", ContractorType::Civil, "ATL", 80);
        preferred.preferred_status = PreferredStatus::MostPreferred;
        let mut plain_b = contractor("Bravo", ContractorType::Civil, "ATL", 80);
        plain_b.preferred_status = PreferredStatus::NotEvaluated;
        let mut plain_a = contractor("Alpha", ContractorType::Civil, "ATL", 80);
        plain_a.preferred_status = PreferredStatus::NotEvaluated;

        let names: Vec<String> =
            match_contractors(vec![plain_b, plain_a, preferred], "ATL", ContractorType::Civil)
                .into_iter()
                .map(|c| c.name)
                .collect();
        assert_eq!(names, vec!["Zulu", "Alpha", "Bravo"]);
    }

    #[test]
    fn test_no_matches_is_empty() {
        let pool = vec![contractor("Only", ContractorType::Plumbing, "SEA", 50)];
        assert!(match_contractors(pool, "DFW", ContractorType::Plumbing).is_empty());
    }
}
