use std::fmt;

#[derive(Debug)]
pub enum WayfareError {
    Timeout,
    ConnectionFailed(String),
    DnsResolution(String),
    ProxyError(String),
    Unauthorized(u16),
    HttpStatus(u16),
    TlsError(String),
    JsonParse(String),
    IncompleteSelection,
    InvalidAirport(String),
    InvalidDate(String),
    Validation(String),
}

impl fmt::Display for WayfareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(
                f,
                "request timed out: the booking service may be slow or unreachable. \
                 Try increasing --timeout or check that the service is running"
            ),
            Self::ConnectionFailed(detail) => write!(
                f,
                "connection failed: check --api-url and that the booking service is running ({detail})"
            ),
            Self::DnsResolution(host) => write!(
                f,
                "DNS resolution failed for {host}: check --api-url"
            ),
            Self::ProxyError(detail) => {
                write!(f, "proxy error: check that the --proxy URL is correct ({detail})")
            }
            Self::Unauthorized(status) => write!(
                f,
                "request rejected by the booking service (HTTP {status}): \
                 check that --token holds a valid session token"
            ),
            Self::HttpStatus(status) => {
                write!(f, "unexpected HTTP status {status} from the booking service")
            }
            Self::TlsError(detail) => write!(
                f,
                "TLS/SSL error: connection to the booking service failed ({detail})"
            ),
            Self::JsonParse(detail) => write!(
                f,
                "failed to parse the booking service response: {detail}"
            ),
            Self::IncompleteSelection => write!(
                f,
                "no bookable itinerary selected: pick an outbound flight, and a return for round trips, before booking"
            ),
            Self::InvalidAirport(input) => write!(
                f,
                "invalid airport \"{input}\": use a 3-letter IATA code (e.g. BOS) \
                 or a location like \"Boston (BOS)\""
            ),
            Self::InvalidDate(date) => write!(
                f,
                "invalid date \"{date}\": must be YYYY-MM-DD format (e.g. 2026-03-01)"
            ),
            Self::Validation(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for WayfareError {}

pub fn from_http_error(err: wreq::Error) -> WayfareError {
    let msg = err.to_string();
    let lower = msg.to_lowercase();

    if err.is_timeout() {
        return WayfareError::Timeout;
    }

    if err.is_connect() {
        if lower.contains("dns") || lower.contains("resolve") || lower.contains("getaddrinfo") {
            return WayfareError::DnsResolution(msg);
        }
        return WayfareError::ConnectionFailed(msg);
    }

    if lower.contains("proxy") || lower.contains("socks") {
        return WayfareError::ProxyError(msg);
    }

    if lower.contains("tls") || lower.contains("ssl") || lower.contains("certificate") {
        return WayfareError::TlsError(msg);
    }

    if lower.contains("builder error") && lower.contains("uri") {
        return WayfareError::ConnectionFailed(format!("invalid service URL: {msg}"));
    }

    WayfareError::ConnectionFailed(msg)
}

pub fn from_json_error(err: serde_json::Error) -> WayfareError {
    WayfareError::JsonParse(err.to_string())
}

/// Fixed message shown in place of results when a backend call fails.
pub fn user_message(err: &WayfareError) -> &'static str {
    match err {
        WayfareError::IncompleteSelection => "Select an outbound flight before booking.",
        WayfareError::InvalidAirport(_)
        | WayfareError::InvalidDate(_)
        | WayfareError::Validation(_) => "Please check your search and try again.",
        _ => "Failed to load flight data. Please try again later.",
    }
}
