use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

use crate::models::rfp::{Rfp, RfpStatus};

/// Look-ahead window for the upcoming-deadline list.
pub const DEADLINE_WINDOW_DAYS: i64 = 14;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Deadline {
    pub rfp_id: Uuid,
    pub project_name: String,
    pub rfp_end_date: NaiveDate,
    pub days_remaining: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_rfps: usize,
    pub active_rfps: usize,
    pub by_status: BTreeMap<&'static str, usize>,
    pub by_metro: BTreeMap<String, usize>,
    pub total_budget: f64,
    pub average_budget: f64,
    pub upcoming_deadlines: Vec<Deadline>,
}

pub fn summarize(rfps: &[Rfp], today: NaiveDate) -> DashboardSummary {
    let mut by_status: BTreeMap<&'static str, usize> =
        RfpStatus::ALL.iter().map(|s| (s.as_str(), 0)).collect();
    let mut by_metro: BTreeMap<String, usize> = BTreeMap::new();

    for rfp in rfps {
        *by_status.entry(rfp.status.as_str()).or_default() += 1;
        *by_metro.entry(rfp.metro_code.clone()).or_default() += 1;
    }

    let total_budget: f64 = rfps.iter().map(|r| r.estimated_budget).sum();
    let average_budget = if rfps.is_empty() {
        0.0
    } else {
        total_budget / rfps.len() as f64
    };

    let horizon = today + Duration::days(DEADLINE_WINDOW_DAYS);
    let mut upcoming_deadlines: Vec<Deadline> = rfps
        .iter()
        .filter(|r| r.status.is_active())
        .filter_map(|r| {
            let end = r.rfp_end_date?;
            (end >= today && end <= horizon).then(|| Deadline {
                rfp_id: r.id,
                project_name: r.project_name.clone(),
                rfp_end_date: end,
                days_remaining: (end - today).num_days(),
            })
        })
        .collect();
    upcoming_deadlines.sort_by_key(|d| d.rfp_end_date);

    DashboardSummary {
        total_rfps: rfps.len(),
        active_rfps: rfps.iter().filter(|r| r.status.is_active()).count(),
        by_status,
        by_metro,
        total_budget,
        average_budget,
        upcoming_deadlines,
    }
}
