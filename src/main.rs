use std::process;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wayfare::booking::{self, BookingPayload};
use wayfare::carrier::parse_airlines;
use wayfare::error::{self, WayfareError};
use wayfare::fetch::FetchOptions;
use wayfare::itinerary::Itinerary;
use wayfare::query::SearchRequest;
use wayfare::selection::TripType;
use wayfare::session::{LayoverPolicy, SearchSession};
use wayfare::sort::SortCriteria;
use wayfare::table;

#[derive(Parser)]
#[command(
    name = "wayfare",
    about = "Search, filter and book flight itineraries from the terminal",
    version,
    after_help = "\
Examples:
  wayfare locations
  wayfare search -f BOS -t ORD -d 2026-04-01
  wayfare search -f \"Boston (BOS)\" -t \"Chicago (ORD)\" -d 2026-04-01 --return-date 2026-04-08
  wayfare search -f BOS -t LAX --airlines delta --max-stops 1 --sort departure
  wayfare search -f BOS -t ORD -d 2026-04-01 --pick 2 --book
  wayfare search -f BOS -t ORD --proxy socks5://127.0.0.1:1080
  wayfare bookings --user-id 7"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(
        long,
        global = true,
        env = "WAYFARE_API_URL",
        default_value = "http://localhost:8080",
        value_name = "URL",
        help = "Booking service base URL"
    )]
    api_url: String,

    #[arg(
        long,
        global = true,
        env = "WAYFARE_TOKEN",
        hide_env_values = true,
        value_name = "TOKEN",
        help = "Session token sent as a bearer token"
    )]
    token: Option<String>,

    #[arg(long, global = true, value_name = "URL", help = "HTTP or SOCKS5 proxy")]
    proxy: Option<String>,

    #[arg(long, global = true, value_name = "SECS", help = "Request timeout (default: none)")]
    timeout: Option<u64>,

    #[arg(short, long, global = true, help = "Log requests and decisions to stderr")]
    verbose: bool,
}

#[derive(clap::Subcommand)]
enum Commands {
    #[command(about = "List the locations the booking service flies to")]
    Locations {
        #[arg(long, default_value = "100", value_name = "N", help = "Maximum number of locations")]
        size: u32,
    },
    #[command(
        about = "Search for flights",
        long_about = "Search for flights between two locations, then filter and sort the itineraries.\n\
            With --return-date the return direction is searched too.\n\
            Use --pick/--pick-return to choose itineraries and --book to create the booking.",
        after_help = "\
Examples:
  One-way:      wayfare search -f BOS -t ORD -d 2026-04-01
  Round-trip:   wayfare search -f BOS -t ORD -d 2026-04-01 --return-date 2026-04-08
  Filtered:     wayfare search -f BOS -t LAX --airlines delta,southwest --max-stops 1
  Layover:      wayfare search -f BOS -t LAX --max-layover 120
  JSON output:  wayfare search -f BOS -t ORD --json --pretty
  Book:         wayfare search -f BOS -t ORD -d 2026-04-01 --pick 1 --book"
    )]
    Search(SearchArgs),
    #[command(about = "Show upcoming and past bookings for an account")]
    Bookings {
        #[arg(long, value_name = "ID", help = "Account id")]
        user_id: u64,
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    #[command(about = "Start MCP server for AI agents (stdio transport)")]
    Mcp,
}

#[derive(clap::Args)]
struct SearchArgs {
    #[arg(
        short, long,
        value_name = "LOCATION",
        help = "Origin airport",
        long_help = "Origin airport: a 3-letter IATA code (BOS) or a location \
            string as listed by `wayfare locations` (\"Boston (BOS)\")."
    )]
    from: String,

    #[arg(
        short, long,
        value_name = "LOCATION",
        help = "Destination airport",
        long_help = "Destination airport: a 3-letter IATA code (ORD) or a location \
            string as listed by `wayfare locations` (\"Chicago (ORD)\")."
    )]
    to: String,

    #[arg(short, long, value_name = "YYYY-MM-DD", help = "Departure date")]
    date: Option<String>,

    #[arg(
        long,
        value_name = "YYYY-MM-DD",
        help = "Return date (searches the return direction too)"
    )]
    return_date: Option<String>,

    #[arg(long, value_name = "MIN", help = "Maximum layover in minutes")]
    max_layover: Option<u32>,

    #[arg(
        long,
        help = "Apply --max-layover locally instead of sending it to the service"
    )]
    client_layover: bool,

    #[arg(
        long,
        value_name = "delta,southwest",
        help = "Only itineraries flown entirely by these airlines"
    )]
    airlines: Option<String>,

    #[arg(long, value_name = "N", help = "Maximum number of stops (0 = nonstop only)")]
    max_stops: Option<u32>,

    #[arg(
        long,
        default_value = "duration",
        value_name = "KEY",
        help = "Sort by [duration, departure, arrival]"
    )]
    sort: String,

    #[arg(long, value_name = "N", help = "Show only the first N itineraries")]
    top: Option<usize>,

    #[arg(long, value_name = "N", help = "Select outbound itinerary N (1-based) for booking")]
    pick: Option<usize>,

    #[arg(long, value_name = "N", help = "Select return itinerary N (1-based) for booking")]
    pick_return: Option<usize>,

    #[arg(long, help = "Create the booking for the picked itineraries")]
    book: bool,

    #[arg(long, help = "Output as JSON")]
    json: bool,

    #[arg(long, help = "Output as pretty-printed JSON")]
    pretty: bool,
}

fn is_json(args: &SearchArgs) -> bool {
    args.json || args.pretty
}

fn error_code(err: &WayfareError) -> i32 {
    match err {
        WayfareError::InvalidAirport(_)
        | WayfareError::InvalidDate(_)
        | WayfareError::Validation(_) => 2,
        WayfareError::Timeout
        | WayfareError::ConnectionFailed(_)
        | WayfareError::DnsResolution(_)
        | WayfareError::TlsError(_)
        | WayfareError::ProxyError(_) => 3,
        WayfareError::Unauthorized(_) => 4,
        WayfareError::HttpStatus(_) => 5,
        WayfareError::JsonParse(_) => 6,
        WayfareError::IncompleteSelection => 7,
    }
}

fn error_kind(err: &WayfareError) -> &'static str {
    match err {
        WayfareError::InvalidAirport(_) => "invalid_airport",
        WayfareError::InvalidDate(_) => "invalid_date",
        WayfareError::Validation(_) => "validation_error",
        WayfareError::Timeout => "timeout",
        WayfareError::ConnectionFailed(_) => "connection_failed",
        WayfareError::DnsResolution(_) => "dns_error",
        WayfareError::TlsError(_) => "tls_error",
        WayfareError::ProxyError(_) => "proxy_error",
        WayfareError::Unauthorized(_) => "unauthorized",
        WayfareError::HttpStatus(_) => "http_error",
        WayfareError::JsonParse(_) => "parse_error",
        WayfareError::IncompleteSelection => "incomplete_selection",
    }
}

fn die(err: &WayfareError, json_mode: bool) -> ! {
    if json_mode {
        let json = serde_json::json!({
            "error": {
                "kind": error_kind(err),
                "message": err.to_string(),
            }
        });
        println!("{json}");
    } else {
        eprintln!("error: {err}");
    }
    process::exit(error_code(err));
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "wayfare=debug" } else { "wayfare=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_json(value: &impl serde::Serialize, pretty: bool) {
    let output = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match output {
        Ok(s) => println!("{s}"),
        Err(e) => die(&error::from_json_error(e), true),
    }
}

/// Checks everything that can be checked before contacting the service and
/// builds the session for it.
fn prepare_session(args: &SearchArgs) -> Result<SearchSession, WayfareError> {
    let mut request = SearchRequest::new(&args.from, &args.to);
    request.departure_date = args.date.clone();
    request.return_date = args.return_date.clone();
    request.max_layover = args.max_layover;
    request.validate()?;

    let sort = SortCriteria::from_str_loose(&args.sort)?;
    let airlines = args.airlines.as_deref().map(parse_airlines).transpose()?;

    if args.pick_return.is_some() && !request.is_round_trip() {
        return Err(WayfareError::Validation(
            "--pick-return requires --return-date".into(),
        ));
    }
    if args.pick_return.is_some() && args.pick.is_none() {
        return Err(WayfareError::Validation(
            "--pick-return requires --pick".into(),
        ));
    }
    if args.pick == Some(0) || args.pick_return == Some(0) {
        return Err(WayfareError::Validation(
            "--pick and --pick-return count from 1".into(),
        ));
    }
    if args.book && args.pick.is_none() {
        return Err(WayfareError::IncompleteSelection);
    }
    if args.book && request.is_round_trip() && args.pick_return.is_none() {
        return Err(WayfareError::Validation(
            "round trip needs --pick-return before booking".into(),
        ));
    }
    if args.client_layover && args.max_layover.is_none() {
        return Err(WayfareError::Validation(
            "--client-layover requires --max-layover".into(),
        ));
    }

    let trip_type = if request.is_round_trip() {
        TripType::RoundTrip
    } else {
        TripType::OneWay
    };
    let policy = if args.client_layover {
        LayoverPolicy::Client
    } else {
        LayoverPolicy::Server
    };

    let mut session = SearchSession::new(trip_type, policy);
    session.begin_search(request);

    let mut filters = session.filters().clone();
    if let Some(airlines) = airlines {
        filters.selected_airlines = airlines;
    }
    filters.max_stops = args.max_stops;
    session.set_filters(filters);
    session.set_sort(sort);

    Ok(session)
}

fn pick(list: &[Itinerary], n: usize, flag: &str) -> Result<Itinerary, WayfareError> {
    list.get(n - 1).cloned().ok_or_else(|| {
        WayfareError::Validation(format!(
            "{flag} {n} is out of range: {} itineraries listed",
            list.len()
        ))
    })
}

fn select(
    session: &mut SearchSession,
    outbound: &[Itinerary],
    returns: &[Itinerary],
    args: &SearchArgs,
) -> Result<Option<BookingPayload>, WayfareError> {
    let Some(n) = args.pick else {
        return Ok(None);
    };
    session
        .selection_mut()
        .select_outbound(pick(outbound, n, "--pick")?);
    if let Some(m) = args.pick_return {
        session
            .selection_mut()
            .select_return(pick(returns, m, "--pick-return")?)?;
    }
    session.booking_payload().map(Some)
}

fn print_listing(title: &str, itineraries: &[Itinerary]) {
    println!("=== {title} ===");
    if itineraries.is_empty() {
        println!("No flights found.");
    } else {
        println!("{}", table::render(itineraries));
    }
}

fn truncate(mut list: Vec<Itinerary>, top: Option<usize>) -> Vec<Itinerary> {
    if let Some(n) = top {
        list.truncate(n);
    }
    list
}

async fn run_search(args: SearchArgs, options: FetchOptions) {
    let json_mode = is_json(&args);

    let mut session = match prepare_session(&args) {
        Ok(s) => s,
        Err(e) => die(&e, json_mode),
    };

    if let Err(e) = wayfare::run_session_search(&mut session, &options).await {
        if !json_mode {
            if let Some(message) = session.last_error() {
                eprintln!("{message}");
            }
        }
        die(&e, json_mode);
    }

    let outbound = truncate(session.visible_outbound(), args.top);
    let returns = truncate(session.visible_return(), args.top);

    let payload = match select(&mut session, &outbound, &returns, &args) {
        Ok(p) => p,
        Err(e) => die(&e, json_mode),
    };

    // JSON mode books first so a failure is the only document on stdout.
    if json_mode {
        if args.book {
            book(payload.as_ref(), &options, json_mode).await;
        }
        print_json(
            &serde_json::json!({
                "outbound": outbound,
                "return": returns,
                "booking": payload,
                "booked": args.book,
            }),
            args.pretty,
        );
        return;
    }

    let round_trip = session.trip_type() == TripType::RoundTrip;
    print_listing(if round_trip { "Outbound" } else { "Flights" }, &outbound);
    if round_trip {
        print_listing("Return", &returns);
    }
    if payload.is_some() {
        let selection = session.selection();
        println!(
            "{}",
            table::render_summary(
                selection.outbound_summary().as_ref(),
                selection.return_summary().as_ref(),
            )
        );
        if round_trip && !session.ready_to_book() {
            println!("Pick a return flight with --pick-return to book the round trip.");
        }
    }

    if args.book {
        book(payload.as_ref(), &options, json_mode).await;
        println!("Booking completed successfully!");
    }
}

async fn book(payload: Option<&BookingPayload>, options: &FetchOptions, json_mode: bool) {
    let Some(payload) = payload else {
        die(&WayfareError::IncompleteSelection, json_mode);
    };
    if let Err(e) = wayfare::create_booking(payload, options).await {
        if !json_mode {
            eprintln!("Failed to create booking. Please try again later.");
        }
        die(&e, json_mode);
    }
}

async fn run_bookings(user_id: u64, json: bool, options: FetchOptions) {
    let records = match wayfare::bookings(user_id, &options).await {
        Ok(r) => r,
        Err(e) => die(&e, json),
    };
    let now = chrono::Local::now().naive_local();
    let history = booking::partition_bookings(records, now);

    if json {
        print_json(&history, false);
        return;
    }

    for (title, list, empty) in [
        ("Upcoming Flights", &history.upcoming, "You don't have any upcoming flights."),
        ("Past Flights", &history.past, "No past flights to display."),
    ] {
        println!("=== {title} ===");
        if list.is_empty() {
            println!("{empty}");
        } else {
            println!("{}", table::render_bookings(list));
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = FetchOptions {
        base_url: cli.api_url,
        token: cli.token,
        proxy: cli.proxy,
        timeout: cli.timeout,
    };

    match cli.command {
        Commands::Mcp => wayfare::mcp::run(options).await,
        Commands::Locations { size } => match wayfare::locations(size, &options).await {
            Ok(locations) if locations.is_empty() => println!("No locations found."),
            Ok(locations) => {
                for location in &locations {
                    println!("{}", location.display_name());
                }
            }
            Err(e) => die(&e, false),
        },
        Commands::Search(args) => run_search(args, options).await,
        Commands::Bookings { user_id, json } => run_bookings(user_id, json, options).await,
    }
}
