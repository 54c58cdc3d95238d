//! SINAICA HTTP client.
//!
//! Two endpoints are used: the data endpoint, which takes a table name and
//! a row filter, and the station metadata endpoint, which takes a station
//! id and a method name. Both are form-encoded POSTs that return JSON text.
//!
//! Measurement downloads are strict: any failure is returned to the caller.
//! Station metadata lookups are best-effort: failures are logged and mapped
//! to an absent result.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::{DataType, InvalidArgument, StationId, StationTable};
use crate::table::{CrudeRow, DateLimits, ManualRow, ParamRow, Schema, Table};

use super::convert::{normalize_crude, normalize_date_limits, normalize_manual, normalize_params};
use super::error::SinaicaError;
use super::request::{
    DataQuery, Form, StationMethod, StationQuery, build_data_query, build_station_query,
};
use super::throttle::Throttle;
use super::types::{DateLimitsResponse, RawCrudeRecord, RawManualRecord, RawParam, decode_list};

/// Default URL of the measurement data endpoint.
pub const DEFAULT_DATA_URL: &str = "https://sinaica.inecc.gob.mx/lib/libd/cnxn.php";

/// Default URL of the station metadata endpoint.
pub const DEFAULT_META_URL: &str = "https://sinaica.inecc.gob.mx/lib/j/php/getData.php";

/// Default upper bound on the pause between requests.
const DEFAULT_MAX_PAUSE: Duration = Duration::from_secs(2);

/// How much of an unparseable body to keep in the error.
const BODY_EXCERPT_CHARS: usize = 500;

/// Configuration for the SINAICA client.
#[derive(Debug, Clone)]
pub struct SinaicaConfig {
    /// Measurement data endpoint
    pub data_url: String,
    /// Station metadata endpoint
    pub meta_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Upper bound on the random pause between requests
    pub max_pause: Duration,
    /// Optional User-Agent header
    pub user_agent: Option<String>,
}

impl SinaicaConfig {
    /// Create a config pointing at the production endpoints.
    pub fn new() -> Self {
        Self {
            data_url: DEFAULT_DATA_URL.to_string(),
            meta_url: DEFAULT_META_URL.to_string(),
            timeout_secs: 30,
            max_pause: DEFAULT_MAX_PAUSE,
            user_agent: None,
        }
    }

    /// Set a custom data endpoint (for testing).
    pub fn with_data_url(mut self, url: impl Into<String>) -> Self {
        self.data_url = url.into();
        self
    }

    /// Set a custom metadata endpoint (for testing).
    pub fn with_meta_url(mut self, url: impl Into<String>) -> Self {
        self.meta_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the pause ceiling. `Duration::ZERO` disables throttling.
    pub fn with_max_pause(mut self, max_pause: Duration) -> Self {
        self.max_pause = max_pause;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

impl Default for SinaicaConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Sends one form-encoded POST and returns the response body.
///
/// This abstraction allows the client to be tested without the network.
pub trait Transport {
    fn post_form(
        &self,
        url: &str,
        form: &Form,
    ) -> impl Future<Output = Result<String, SinaicaError>> + Send;
}

/// `Transport` backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &SinaicaConfig) -> Result<Self, SinaicaError> {
        let mut builder =
            reqwest::Client::builder().timeout(Duration::from_secs(config.timeout_secs));
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }

        Ok(Self {
            http: builder.build()?,
        })
    }
}

/// SINAICA sends JSON labelled as HTML or plain text; anything else is wrong.
fn acceptable_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime.is_empty() || mime.ends_with("json") || mime == "text/html" || mime == "text/plain"
}

impl Transport for HttpTransport {
    async fn post_form(&self, url: &str, form: &Form) -> Result<String, SinaicaError> {
        let response = self.http.post(url).form(form).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(SinaicaError::Api {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !acceptable_content_type(&content_type) {
            return Err(SinaicaError::ContentType {
                url: url.to_string(),
                content_type,
            });
        }

        Ok(response.text().await?)
    }
}

/// A downloaded measurement table, in the schema matching its data type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Measurements {
    Crude(Table<CrudeRow>),
    Manual(Table<ManualRow>),
}

impl Measurements {
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Measurements::Crude(_) => CrudeRow::COLUMNS,
            Measurements::Manual(_) => ManualRow::COLUMNS,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Measurements::Crude(t) => t.len(),
            Measurements::Manual(t) => t.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// SINAICA API client.
///
/// Holds the station metadata table used to annotate every measurement row.
#[derive(Debug)]
pub struct SinaicaClient<T = HttpTransport> {
    transport: T,
    data_url: String,
    meta_url: String,
    stations: Arc<StationTable>,
    throttle: Throttle,
}

impl SinaicaClient<HttpTransport> {
    /// Create a client that talks to SINAICA over HTTP.
    pub fn new(config: SinaicaConfig, stations: Arc<StationTable>) -> Result<Self, SinaicaError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(transport, config, stations))
    }
}

impl<T: Transport> SinaicaClient<T> {
    /// Create a client over any transport.
    pub fn with_transport(transport: T, config: SinaicaConfig, stations: Arc<StationTable>) -> Self {
        Self {
            transport,
            data_url: config.data_url,
            meta_url: config.meta_url,
            stations,
            throttle: Throttle::new(config.max_pause),
        }
    }

    /// The station metadata this client joins onto rows.
    pub fn stations(&self) -> &StationTable {
        &self.stations
    }

    /// Download one parameter for every station over a date range.
    ///
    /// `data_type` must be `"Crude"` or `"Manual"`, and the range must be at
    /// most one month. With `remove_extremes`, readings above the
    /// parameter's ceiling are dropped from the `value` column.
    pub async fn param_data(
        &self,
        parameter: &str,
        start: Option<&str>,
        end: Option<&str>,
        data_type: &str,
        remove_extremes: bool,
    ) -> Result<Measurements, SinaicaError> {
        let query = build_data_query(parameter, start, end, data_type)?;
        self.download(&query, remove_extremes).await
    }

    /// Download one parameter for a single station over a date range.
    pub async fn station_data(
        &self,
        station: StationId,
        parameter: &str,
        start: Option<&str>,
        end: Option<&str>,
        data_type: &str,
        remove_extremes: bool,
    ) -> Result<Measurements, SinaicaError> {
        let query = build_data_query(parameter, start, end, data_type)?.with_station(station);
        self.download(&query, remove_extremes).await
    }

    /// Run a validated download query.
    pub async fn download(
        &self,
        query: &DataQuery,
        remove_extremes: bool,
    ) -> Result<Measurements, SinaicaError> {
        let body = self.post(&self.data_url, &query.form()).await?;

        let measurements = match query.data_type() {
            DataType::Crude => {
                let records: Vec<RawCrudeRecord> = Self::decode(&self.data_url, &body)?;
                Measurements::Crude(normalize_crude(records, &self.stations, remove_extremes))
            }
            DataType::Manual => {
                let records: Vec<RawManualRecord> = Self::decode(&self.data_url, &body)?;
                Measurements::Manual(normalize_manual(records, &self.stations, remove_extremes))
            }
            DataType::Validated => {
                return Err(InvalidArgument::UnsupportedDataType(DataType::Validated.as_str()).into());
            }
        };

        debug!(
            parameter = %query.parameter(),
            data_type = %query.data_type(),
            rows = measurements.len(),
            "downloaded measurements"
        );
        Ok(measurements)
    }

    /// Parameters a station measures.
    ///
    /// Best-effort: any failure is logged and returns `None`.
    pub async fn station_params(
        &self,
        station: StationId,
        data_type: &str,
    ) -> Option<Table<ParamRow>> {
        match self.try_station_params(station, data_type).await {
            Ok(table) => Some(table),
            Err(e) => {
                warn!(%station, error = %e, "station parameter lookup failed");
                None
            }
        }
    }

    /// First and last date a station has data for.
    ///
    /// Best-effort: any failure is logged and both ends come back missing.
    pub async fn station_dates(&self, station: StationId, data_type: &str) -> DateLimits {
        match self.try_station_dates(station, data_type).await {
            Ok(limits) => limits,
            Err(e) => {
                warn!(%station, error = %e, "station date lookup failed");
                DateLimits::default()
            }
        }
    }

    async fn try_station_params(
        &self,
        station: StationId,
        data_type: &str,
    ) -> Result<Table<ParamRow>, SinaicaError> {
        let query = build_station_query(station, StationMethod::Parameters, data_type)?;
        let body = self.post_station(&query).await?;
        let params: Vec<RawParam> = Self::decode(&self.meta_url, &body)?;
        Ok(normalize_params(params))
    }

    async fn try_station_dates(
        &self,
        station: StationId,
        data_type: &str,
    ) -> Result<DateLimits, SinaicaError> {
        let query = build_station_query(station, StationMethod::DateLimits, data_type)?;
        let body = self.post_station(&query).await?;

        let body = body.trim();
        if body.is_empty() || body == "null" {
            return Ok(DateLimits::default());
        }

        let response: DateLimitsResponse =
            serde_json::from_str(body).map_err(|e| json_error(&self.meta_url, body, e))?;
        Ok(normalize_date_limits(response))
    }

    async fn post_station(&self, query: &StationQuery) -> Result<String, SinaicaError> {
        self.post(&self.meta_url, &query.form()).await
    }

    async fn post(&self, url: &str, form: &Form) -> Result<String, SinaicaError> {
        self.throttle.wait().await;
        debug!(url, ?form, "POST");
        self.transport.post_form(url, form).await
    }

    fn decode<R>(url: &str, body: &str) -> Result<Vec<R>, SinaicaError>
    where
        R: for<'de> serde::Deserialize<'de>,
    {
        decode_list(body).map_err(|e| json_error(url, body, e))
    }
}

fn json_error(url: &str, body: &str, e: serde_json::Error) -> SinaicaError {
    SinaicaError::Json {
        url: url.to_string(),
        message: e.to_string(),
        body: Some(body.chars().take(BODY_EXCERPT_CHARS).collect()),
    }
}
