use serde::Serialize;

use crate::models::contractor::Contractor;
use crate::models::metro::MetroCode;
use crate::models::rfp::Rfp;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPoint {
    #[serde(flatten)]
    pub metro: MetroCode,
    pub active_rfps: usize,
    pub contractors: usize,
}

/// One point per reference metro, with active RFP and contractor counts.
pub fn build_map(metros: Vec<MetroCode>, rfps: &[Rfp], contractors: &[Contractor]) -> Vec<MapPoint> {
    metros
        .into_iter()
        .map(|metro| MapPoint {
            active_rfps: rfps
                .iter()
                .filter(|r| r.status.is_active() && r.metro_code == metro.code)
                .count(),
            contractors: contractors
                .iter()
                .filter(|c| c.serves_metro(&metro.code))
                .count(),
            metro,
        })
        .collect()
}
