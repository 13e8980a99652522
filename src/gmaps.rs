//! Google Distance Matrix HTTP adapter.
//!
//! Fetches traffic-aware driving durations, one request per origin
//! against all destinations. Elements without a usable duration become
//! unreachable-sentinel entries in the returned matrix, reported as
//! missing pairs rather than dropped.

use serde::Deserialize;
use tracing::warn;

use crate::matrix::{CostMatrix, UNREACHABLE};
use crate::traits::{CostMatrixProvider, ProviderError};

#[derive(Debug, Clone)]
pub struct GmapsConfig {
    pub api_key: String,
    pub base_url: String,
    pub mode: String,
    pub traffic_model: String,
    /// Unix timestamp for the departure; `None` means "now".
    pub departure_time: Option<u64>,
    pub timeout_secs: u64,
}

impl GmapsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://maps.googleapis.com/maps/api/distancematrix/json".to_string(),
            mode: "driving".to_string(),
            traffic_model: "best_guess".to_string(),
            departure_time: None,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GmapsClient {
    config: GmapsConfig,
    client: reqwest::blocking::Client,
}

impl GmapsClient {
    pub fn new(config: GmapsConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn fetch_row(&self, origin: &str, destinations: &str) -> Result<MatrixResponse, ProviderError> {
        let departure = self
            .config
            .departure_time
            .map(|ts| ts.to_string())
            .unwrap_or_else(|| "now".to_string());

        self.client
            .get(&self.config.base_url)
            .query(&[
                ("origins", origin),
                ("destinations", destinations),
                ("mode", self.config.mode.as_str()),
                ("departure_time", departure.as_str()),
                ("traffic_model", self.config.traffic_model.as_str()),
                ("key", self.config.api_key.as_str()),
            ])
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<MatrixResponse>())
            .map_err(|err| ProviderError::Unavailable(err.to_string()))
    }
}

impl CostMatrixProvider for GmapsClient {
    fn matrix_for(&self, locations: &[(f64, f64)]) -> Result<CostMatrix, ProviderError> {
        let n = locations.len();
        if n == 0 {
            return CostMatrix::from_rows(Vec::new())
                .map_err(|err| ProviderError::Malformed(err.to_string()));
        }

        let coords: Vec<String> = locations
            .iter()
            .map(|(lat, lon)| format!("{:.6},{:.6}", lat, lon))
            .collect();
        let destinations = coords.join("|");

        let mut rows = Vec::with_capacity(n);
        for origin in &coords {
            let response = self.fetch_row(origin, &destinations)?;
            if response.status != "OK" {
                return Err(ProviderError::Unavailable(format!(
                    "distance matrix status {}",
                    response.status
                )));
            }

            let row = response
                .rows
                .into_iter()
                .next()
                .ok_or_else(|| ProviderError::Malformed("response has no rows".to_string()))?;
            if row.elements.len() != n {
                return Err(ProviderError::Malformed(format!(
                    "expected {} elements, got {}",
                    n,
                    row.elements.len()
                )));
            }

            rows.push(row.elements.iter().map(element_cost).collect());
        }

        let matrix =
            CostMatrix::from_rows(rows).map_err(|err| ProviderError::Malformed(err.to_string()))?;
        if !matrix.missing_pairs().is_empty() {
            warn!(
                missing = matrix.missing_pairs().len(),
                "distance matrix is partial, missing pairs set to unreachable"
            );
        }
        Ok(matrix)
    }
}

/// Prefers the traffic-aware duration, falls back to the plain one,
/// and substitutes the unreachable sentinel when neither is present.
fn element_cost(element: &MatrixElement) -> i64 {
    if element.status.as_deref() == Some("OK") || element.status.is_none() {
        if let Some(duration) = element
            .duration_in_traffic
            .as_ref()
            .or(element.duration.as_ref())
        {
            return duration.value.round() as i64;
        }
    }
    UNREACHABLE
}

#[derive(Debug, Deserialize)]
struct MatrixResponse {
    status: String,
    #[serde(default)]
    rows: Vec<MatrixRow>,
}

#[derive(Debug, Deserialize)]
struct MatrixRow {
    #[serde(default)]
    elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
struct MatrixElement {
    status: Option<String>,
    duration: Option<DurationValue>,
    duration_in_traffic: Option<DurationValue>,
}

#[derive(Debug, Deserialize)]
struct DurationValue {
    value: f64,
}
