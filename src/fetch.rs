use std::time::Duration;

use tracing::debug;
use wreq::header::AUTHORIZATION;
use wreq::{Client, RequestBuilder};

use crate::booking::BookingPayload;
use crate::error::{self, WayfareError};

const DEFAULT_API_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub base_url: String,
    pub token: Option<String>,
    pub proxy: Option<String>,
    pub timeout: Option<u64>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            token: None,
            proxy: None,
            timeout: None,
        }
    }
}

impl FetchOptions {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token {
            Some(ref token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }
}

fn client(options: &FetchOptions) -> Result<Client, WayfareError> {
    let mut builder = Client::builder();
    if let Some(secs) = options.timeout {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    if let Some(ref proxy) = options.proxy {
        builder = builder.proxy(wreq::Proxy::all(proxy).map_err(error::from_http_error)?);
    }
    builder.build().map_err(error::from_http_error)
}

fn check_status(status: u16) -> Result<(), WayfareError> {
    match status {
        200..=299 => Ok(()),
        401 | 403 => Err(WayfareError::Unauthorized(status)),
        _ => Err(WayfareError::HttpStatus(status)),
    }
}

async fn get_text(
    path: &str,
    params: &[(String, String)],
    options: &FetchOptions,
) -> Result<String, WayfareError> {
    let client = client(options)?;
    let url = options.url(path);
    debug!(%url, ?params, "GET");

    let response = options
        .authorize(client.get(url.as_str()).query(params))
        .send()
        .await
        .map_err(error::from_http_error)?;

    check_status(response.status().as_u16())?;
    response.text().await.map_err(error::from_http_error)
}

pub async fn fetch_locations(size: u32, options: &FetchOptions) -> Result<String, WayfareError> {
    get_text(
        "/api/locations",
        &[("size".to_string(), size.to_string())],
        options,
    )
    .await
}

pub async fn fetch_search(
    params: &[(String, String)],
    options: &FetchOptions,
) -> Result<String, WayfareError> {
    get_text("/api/flights/search", params, options).await
}

pub async fn fetch_bookings(user_id: u64, options: &FetchOptions) -> Result<String, WayfareError> {
    get_text(
        "/api/bookings",
        &[("userId".to_string(), user_id.to_string())],
        options,
    )
    .await
}

pub async fn post_booking(
    payload: &BookingPayload,
    options: &FetchOptions,
) -> Result<String, WayfareError> {
    let client = client(options)?;
    let url = options.url("/api/bookings/create");
    debug!(
        %url,
        departures = payload.departures.len(),
        returns = payload.returns.len(),
        "POST booking"
    );

    let response = options
        .authorize(client.post(url.as_str()).json(payload))
        .send()
        .await
        .map_err(error::from_http_error)?;

    check_status(response.status().as_u16())?;
    response.text().await.map_err(error::from_http_error)
}
