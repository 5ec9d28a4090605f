use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::schemars;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::booking;
use crate::carrier::parse_airlines;
use crate::error::WayfareError;
use crate::fetch::FetchOptions;
use crate::itinerary::Itinerary;
use crate::model::LegRecord;
use crate::query::SearchRequest;
use crate::selection::{SelectionTracker, TripType};
use crate::session::{LayoverPolicy, SearchSession};
use crate::sort::SortCriteria;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct SearchArgs {
    #[schemars(
        description = "Origin airport: IATA code or location string. Example: BOS or \"Boston (BOS)\""
    )]
    from: String,
    #[schemars(
        description = "Destination airport: IATA code or location string. Example: ORD or \"Chicago (ORD)\""
    )]
    to: String,
    #[schemars(description = "Departure date in YYYY-MM-DD format. Example: 2026-03-01")]
    date: Option<String>,
    #[schemars(
        description = "Return date in YYYY-MM-DD. Also searches the return direction (round trip)"
    )]
    return_date: Option<String>,
    #[schemars(description = "Maximum layover in minutes between connecting legs")]
    max_layover: Option<u32>,
    #[schemars(
        description = "Apply max_layover locally instead of sending it to the booking service. Default: false"
    )]
    client_layover: Option<bool>,
    #[schemars(
        description = "Only itineraries whose every leg is flown by these airlines, comma-separated. Example: delta,southwest"
    )]
    airlines: Option<String>,
    #[schemars(description = "Maximum stops. 0 = nonstop only. Omit for any number of stops")]
    max_stops: Option<u32>,
    #[schemars(description = "One of: duration, departure, arrival. Default: duration")]
    sort: Option<String>,
    #[schemars(description = "Return only the first N itineraries after sorting")]
    top: Option<usize>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct LocationsArgs {
    #[schemars(description = "Maximum number of locations. Default: 100")]
    size: Option<u32>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct BookingPayloadArgs {
    #[schemars(
        description = "Legs of the outbound itinerary, as returned in a wayfare_search result's legs array"
    )]
    outbound: Value,
    #[schemars(description = "Legs of the return itinerary, for round trips")]
    return_legs: Option<Value>,
}

fn build_session(args: &SearchArgs) -> Result<SearchSession, WayfareError> {
    let mut request = SearchRequest::new(&args.from, &args.to);
    request.departure_date = args.date.clone();
    request.return_date = args.return_date.clone();
    request.max_layover = args.max_layover;
    request.validate()?;

    let trip_type = if request.is_round_trip() {
        TripType::RoundTrip
    } else {
        TripType::OneWay
    };
    let policy = if args.client_layover.unwrap_or(false) {
        LayoverPolicy::Client
    } else {
        LayoverPolicy::Server
    };

    let mut session = SearchSession::new(trip_type, policy);
    session.begin_search(request);

    let mut filters = session.filters().clone();
    if let Some(ref airlines) = args.airlines {
        filters.selected_airlines = parse_airlines(airlines)?;
    }
    filters.max_stops = args.max_stops;
    session.set_filters(filters);

    if let Some(ref sort) = args.sort {
        session.set_sort(SortCriteria::from_str_loose(sort)?);
    }

    Ok(session)
}

fn parse_legs(value: Value) -> Result<Vec<LegRecord>, WayfareError> {
    serde_json::from_value(value)
        .map_err(|e| WayfareError::Validation(format!("invalid legs: {e}")))
}

fn top_n(mut itineraries: Vec<Itinerary>, top: Option<usize>) -> Vec<Itinerary> {
    if let Some(n) = top {
        itineraries.truncate(n);
    }
    itineraries
}

fn tool_error(msg: impl Into<String>) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::error(vec![Content::text(msg.into())]))
}

fn tool_json(value: &impl serde::Serialize) -> Result<CallToolResult, McpError> {
    match serde_json::to_string_pretty(value) {
        Ok(json) => Ok(CallToolResult::success(vec![Content::text(json)])),
        Err(e) => tool_error(format!("failed to encode result: {e}")),
    }
}

#[derive(Debug, Clone)]
struct WayfareMcp {
    options: FetchOptions,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl WayfareMcp {
    fn new(options: FetchOptions) -> Self {
        Self {
            options,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Search flights on the booking service and return itineraries as JSON. Each itinerary lists its legs, total duration in minutes, stop count and route. Filters: airlines (every leg must match), max_stops, max_layover. With return_date the return direction is searched too and listed under \"return\". To book, pass the chosen itineraries' legs to wayfare_booking_payload."
    )]
    async fn wayfare_search(
        &self,
        Parameters(args): Parameters<SearchArgs>,
    ) -> Result<CallToolResult, McpError> {
        let mut session = match build_session(&args) {
            Ok(s) => s,
            Err(e) => return tool_error(e.to_string()),
        };

        if let Err(e) = crate::run_session_search(&mut session, &self.options).await {
            return tool_error(e.to_string());
        }

        let outbound = top_n(session.visible_outbound(), args.top);
        let returns = top_n(session.visible_return(), args.top);
        tool_json(&json!({
            "outbound": outbound,
            "return": returns,
        }))
    }

    #[tool(description = "List the locations the booking service flies to, as \"City (IATA)\" strings")]
    async fn wayfare_locations(
        &self,
        Parameters(args): Parameters<LocationsArgs>,
    ) -> Result<CallToolResult, McpError> {
        match crate::locations(args.size.unwrap_or(100), &self.options).await {
            Ok(locations) => {
                let names: Vec<String> = locations.iter().map(|l| l.display_name()).collect();
                tool_json(&names)
            }
            Err(e) => tool_error(e.to_string()),
        }
    }

    #[tool(
        description = "Build the booking request body for a selected outbound itinerary and optional return itinerary. Does not create the booking."
    )]
    async fn wayfare_booking_payload(
        &self,
        Parameters(args): Parameters<BookingPayloadArgs>,
    ) -> Result<CallToolResult, McpError> {
        let outbound = match parse_legs(args.outbound) {
            Ok(legs) => legs,
            Err(e) => return tool_error(e.to_string()),
        };
        let return_legs = match args.return_legs.map(parse_legs).transpose() {
            Ok(legs) => legs,
            Err(e) => return tool_error(e.to_string()),
        };

        let trip_type = if return_legs.is_some() {
            TripType::RoundTrip
        } else {
            TripType::OneWay
        };
        let mut tracker = SelectionTracker::new(trip_type);
        if !outbound.is_empty() {
            tracker.select_outbound(Itinerary::from_legs(outbound));
        }
        if let Some(legs) = return_legs {
            if let Err(e) = tracker.select_return(Itinerary::from_legs(legs)) {
                return tool_error(e.to_string());
            }
        }

        match booking::assemble(tracker.current()) {
            Ok(payload) => tool_json(&payload),
            Err(e) => tool_error(e.to_string()),
        }
    }
}

#[tool_handler]
impl ServerHandler for WayfareMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "wayfare".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(
                "Flight booking tool. Workflow: (1) wayfare_locations to find airport names. (2) wayfare_search to list itineraries. (3) wayfare_booking_payload with the chosen itineraries' legs to build the booking request.".into(),
            ),
        }
    }
}

pub async fn run(options: FetchOptions) {
    let service = match WayfareMcp::new(options)
        .serve(rmcp::transport::stdio())
        .await
    {
        Ok(service) => service,
        Err(e) => {
            tracing::error!("failed to start MCP server: {e}");
            return;
        }
    };
    if let Err(e) = service.waiting().await {
        tracing::error!("MCP server error: {e}");
    }
}
