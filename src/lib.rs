pub mod booking;
pub mod carrier;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod itinerary;
pub mod mcp;
pub mod model;
pub mod parse;
pub mod query;
pub mod selection;
pub mod session;
pub mod sort;
pub mod table;

use booking::BookingPayload;
use error::WayfareError;
use fetch::FetchOptions;
use model::{BookingRecord, LegRecord, Location};
use query::SearchRequest;

/// Runs one directional search and returns the raw leg groups, ready for
/// the itinerary builder.
pub async fn search(
    request: &SearchRequest,
    options: &FetchOptions,
) -> Result<Vec<Vec<LegRecord>>, WayfareError> {
    let params = request.to_url_params();
    let body = fetch::fetch_search(&params, options).await?;
    parse::parse_search_response(&body)
}

pub async fn locations(size: u32, options: &FetchOptions) -> Result<Vec<Location>, WayfareError> {
    let body = fetch::fetch_locations(size, options).await?;
    parse::parse_locations(&body)
}

pub async fn create_booking(
    payload: &BookingPayload,
    options: &FetchOptions,
) -> Result<String, WayfareError> {
    let body = fetch::post_booking(payload, options).await?;
    tracing::info!(
        departures = payload.departures.len(),
        returns = payload.returns.len(),
        "booking created"
    );
    Ok(body)
}

pub async fn bookings(
    user_id: u64,
    options: &FetchOptions,
) -> Result<Vec<BookingRecord>, WayfareError> {
    let body = fetch::fetch_bookings(user_id, options).await?;
    parse::parse_bookings(&body)
}

/// Runs the session's current search, both directions for a round trip,
/// and stores the results. On failure the previous results stay and the
/// session records a user-facing message.
pub async fn run_session_search(
    session: &mut session::SearchSession,
    options: &FetchOptions,
) -> Result<(), WayfareError> {
    let request = session
        .upstream_request()
        .ok_or_else(|| WayfareError::Validation("no search has been started".into()))?;
    let generation = session.generation();
    let reversed = request.reversed();

    let returns = async {
        if request.is_round_trip() {
            search(&reversed, options).await
        } else {
            Ok(Vec::new())
        }
    };
    let (outbound, returns) = tokio::join!(search(&request, options), returns);

    match outbound.and_then(|o| returns.map(|r| (o, r))) {
        Ok((outbound, returns)) => {
            session.apply_results(generation, outbound, returns);
            Ok(())
        }
        Err(e) => {
            session.record_failure(error::user_message(&e));
            Err(e)
        }
    }
}
