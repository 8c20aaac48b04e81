//! Gantt rows: each RFP's RFP window and project window as day offsets from the
//! earliest date on the chart.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::models::rfp::{Rfp, RfpStatus};

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Span {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub offset_days: i64,
    pub duration_days: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GanttRow {
    pub rfp_id: Uuid,
    pub project_name: String,
    pub status: RfpStatus,
    pub rfp_window: Option<Span>,
    pub project_window: Option<Span>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GanttChart {
    pub origin: Option<NaiveDate>,
    pub rows: Vec<GanttRow>,
}

/// A window needs both ends. A lone start date counts as a one-day window.
fn window(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<(NaiveDate, NaiveDate)> {
    match (start, end) {
        (Some(s), Some(e)) => Some((s, e.max(s))),
        (Some(s), None) => Some((s, s)),
        _ => None,
    }
}

fn span(origin: NaiveDate, (start, end): (NaiveDate, NaiveDate)) -> Span {
    Span {
        start,
        end,
        offset_days: (start - origin).num_days(),
        duration_days: (end - start).num_days() + 1,
    }
}

pub fn build_gantt(rfps: &[Rfp]) -> GanttChart {
    let windows: Vec<(&Rfp, Option<(NaiveDate, NaiveDate)>, Option<(NaiveDate, NaiveDate)>)> = rfps
        .iter()
        .map(|r| {
            (
                r,
                window(r.rfp_start_date, r.rfp_end_date),
                window(r.project_start_date, r.project_end_date),
            )
        })
        .filter(|(_, rfp_w, project_w)| rfp_w.is_some() || project_w.is_some())
        .collect();

    let origin = windows
        .iter()
        .flat_map(|(_, a, b)| [a.map(|w| w.0), b.map(|w| w.0)])
        .flatten()
        .min();

    let Some(origin) = origin else {
        return GanttChart {
            origin: None,
            rows: Vec::new(),
        };
    };

    let mut rows: Vec<GanttRow> = windows
        .into_iter()
        .map(|(r, rfp_w, project_w)| GanttRow {
            rfp_id: r.id,
            project_name: r.project_name.clone(),
            status: r.status,
            rfp_window: rfp_w.map(|w| span(origin, w)),
            project_window: project_w.map(|w| span(origin, w)),
        })
        .collect();
    rows.sort_by_key(|row| {
        row.rfp_window
            .or(row.project_window)
            .map(|s| s.offset_days)
            .unwrap_or_default()
    });

    GanttChart {
        origin: Some(origin),
        rows,
    }
}
