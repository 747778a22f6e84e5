//! weatherapi.com client

use reqwest::{Client, Request, StatusCode};
use serde::Deserialize;

use crate::config::Config;
use crate::state::{ForecastResult, LocationQuery};

/// The only failure text the user ever sees.
pub const FETCH_FAILED_MESSAGE: &str = "Could not fetch the weather data. Please try again.";

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("weather service returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("response decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// All failures collapse to one message on screen; the detail goes to
    /// the log.
    pub fn user_message(&self) -> &'static str {
        FETCH_FAILED_MESSAGE
    }
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    location: WireLocation,
    current: WireCurrent,
}

#[derive(Debug, Deserialize)]
struct WireLocation {
    name: String,
    #[serde(default)]
    region: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct WireCondition {
    text: String,
    icon: String,
    code: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct WireCurrent {
    condition: WireCondition,
    temp_c: f64,
    temp_f: f64,
    feelslike_c: f64,
    feelslike_f: f64,
    humidity: u8,
    wind_kph: f64,
    wind_dir: String,
    vis_km: f64,
    last_updated: Option<String>,
}

impl From<ForecastResponse> for ForecastResult {
    fn from(response: ForecastResponse) -> Self {
        let ForecastResponse { location, current } = response;
        ForecastResult {
            name: location.name,
            region: location.region,
            country: location.country,
            condition_text: current.condition.text,
            condition_icon: current.condition.icon,
            condition_code: current.condition.code,
            temp_c: current.temp_c,
            temp_f: current.temp_f,
            feelslike_c: current.feelslike_c,
            feelslike_f: current.feelslike_f,
            humidity: current.humidity,
            wind_kph: current.wind_kph,
            wind_dir: current.wind_dir,
            vis_km: current.vis_km,
            last_updated: current.last_updated,
        }
    }
}

/// Decode a forecast body. Anything short of the full current-conditions
/// shape is a decode error.
pub fn decode_forecast(body: &str) -> Result<ForecastResult, FetchError> {
    let response: ForecastResponse = serde_json::from_str(body)?;
    Ok(response.into())
}

// ============================================================================
// Client
// ============================================================================

#[derive(Clone, Debug)]
pub struct ForecastClient {
    http: Client,
    api_key: String,
    endpoint: String,
}

impl ForecastClient {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            endpoint: format!("{}/forecast.json", config.base_url),
        })
    }

    /// Build the GET for `query` without sending it.
    pub fn request(&self, query: &LocationQuery) -> Result<Request, FetchError> {
        let q = query.as_param();
        let mut params = vec![("key", self.api_key.clone()), ("q", q)];
        if let Some(days) = query.days() {
            params.push(("days", days.to_string()));
        }
        Ok(self.http.get(&self.endpoint).query(&params).build()?)
    }

    /// One GET, no retry.
    pub async fn fetch(&self, query: &LocationQuery) -> Result<ForecastResult, FetchError> {
        let request = self.request(query)?;
        let response = self.http.execute(request).await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        decode_forecast(&body)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

// ============================================================================
// Condition glyphs
// ============================================================================

/// Broad condition groups for weatherapi.com condition codes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConditionKind {
    Clear,
    PartlyCloudy,
    Cloudy,
    Fog,
    Drizzle,
    Rain,
    Sleet,
    Snow,
    Thunder,
    Unknown,
}

impl ConditionKind {
    pub fn from_code(code: Option<u16>) -> Self {
        match code {
            Some(1000) => ConditionKind::Clear,
            Some(1003) => ConditionKind::PartlyCloudy,
            Some(1006 | 1009) => ConditionKind::Cloudy,
            Some(1030 | 1135 | 1147) => ConditionKind::Fog,
            Some(1072 | 1150 | 1153 | 1168 | 1171) => ConditionKind::Drizzle,
            Some(1063 | 1180..=1201 | 1240 | 1243 | 1246) => ConditionKind::Rain,
            Some(1069 | 1204 | 1207 | 1249 | 1252 | 1237 | 1261 | 1264) => ConditionKind::Sleet,
            Some(1066 | 1114 | 1117 | 1210..=1225 | 1255 | 1258) => ConditionKind::Snow,
            Some(1087 | 1273..=1282) => ConditionKind::Thunder,
            _ => ConditionKind::Unknown,
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            ConditionKind::Clear => "\u{2600}\u{fe0f}",
            ConditionKind::PartlyCloudy => "\u{26c5}",
            ConditionKind::Cloudy => "\u{2601}\u{fe0f}",
            ConditionKind::Fog => "\u{1f32b}\u{fe0f}",
            ConditionKind::Drizzle => "\u{1f326}\u{fe0f}",
            ConditionKind::Rain => "\u{1f327}\u{fe0f}",
            ConditionKind::Sleet => "\u{1f328}\u{fe0f}",
            ConditionKind::Snow => "\u{2744}\u{fe0f}",
            ConditionKind::Thunder => "\u{26c8}\u{fe0f}",
            ConditionKind::Unknown => "\u{1f321}\u{fe0f}",
        }
    }
}
