use std::convert::Infallible;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{Stream, StreamExt};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

/// GET /api/v1/rfps/:id/events
///
/// Streams change events for one RFP and everything under it. The subscription is
/// released when the client disconnects and the stream is dropped.
pub async fn handle_rfp_events(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    state.store.get_rfp(id).await?;

    let subscription = state.store.changes().subscribe(Some(id));
    info!(
        rfp_id = %id,
        active = state.store.changes().active_subscribers(),
        "Change stream opened"
    );

    let stream = subscription.into_stream().map(|change| {
        let event = Event::default()
            .event("change")
            .json_data(&change)
            .unwrap_or_else(|e| {
                warn!("Failed to encode change event: {e}");
                Event::default().event("error").data("encoding failed")
            });
        Ok(event)
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15))))
}
