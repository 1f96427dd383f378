use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde_json::Value;

use super::state::TestStatus;
use crate::http::{HttpClient, HttpVerb, JsonResponse, StepError};

/// One atomic verification unit against an external API.
///
/// Concrete steps implement `run`; the plan invokes it exactly once, in list
/// order. A step must contain every failure mode itself — network trouble,
/// bad JSON, bad configuration — and collapse it to [`TestStatus::Fail`]
/// rather than surfacing an error to the plan.
#[async_trait]
pub trait TestStep: Send {
    /// Human-readable step name (not required to be unique).
    fn name(&self) -> &str;

    /// Informational description shown in logs.
    fn description(&self) -> &str;

    /// Execute the step and report its verdict.
    async fn run(&mut self, client: &HttpClient) -> TestStatus;
}

/// The data for one HTTP call made by a step.
#[derive(Debug, Clone)]
pub struct RestRequest {
    pub url: String,
    pub params: Vec<(String, String)>,
    pub verb: HttpVerb,
    pub timeout: Duration,
}

impl RestRequest {
    pub fn new(
        url: impl Into<String>,
        params: Vec<(String, String)>,
        verb: HttpVerb,
        timeout: Duration,
    ) -> Self {
        Self {
            url: url.into(),
            params,
            verb,
            timeout,
        }
    }

    /// Perform the call.
    ///
    /// This is the shared protocol between the base request and its
    /// validators: the validator maps any `Err` to a failed step, and only
    /// inspects the body on `Ok`. The request itself has no pass/fail
    /// opinion about content.
    pub async fn send(&self, client: &HttpClient) -> Result<JsonResponse, StepError> {
        client
            .request(self.verb, &self.url, &self.params, self.timeout)
            .await
    }
}

/// Checks that a geocoding response carries usable coordinates.
///
/// Expects `{"results": [{"geometry": {"location": {"lat", "lng"}}}]}` with
/// at least one result. Missing keys, an empty array, or non-numeric values
/// all count as "coordinates absent".
pub struct GeoCheck {
    name: String,
    description: String,
    request: RestRequest,
    /// Extracted latitude, kept for post-hoc inspection only.
    pub lat: Option<f64>,
    /// Extracted longitude, kept for post-hoc inspection only.
    pub lng: Option<f64>,
}

impl GeoCheck {
    pub fn new(name: impl Into<String>, description: impl Into<String>, request: RestRequest) -> Self {
        let name = name.into();
        debug!("created step '{}'", name);
        Self {
            name,
            description: description.into(),
            request,
            lat: None,
            lng: None,
        }
    }

    /// Decide the verdict for an already-decoded response.
    pub fn evaluate(&mut self, response: &JsonResponse) -> TestStatus {
        match coordinates(&response.body) {
            Some((lat, lng)) => {
                self.lat = Some(lat);
                self.lng = Some(lng);
                info!("step '{}': location resolved to {}, {}", self.name, lat, lng);
                TestStatus::Pass
            }
            None => {
                warn!("step '{}': no coordinates in response", self.name);
                TestStatus::Fail
            }
        }
    }
}

#[async_trait]
impl TestStep for GeoCheck {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn run(&mut self, client: &HttpClient) -> TestStatus {
        match self.request.send(client).await {
            Ok(response) => self.evaluate(&response),
            Err(e) => {
                warn!("step '{}' failed: {}", self.name, e);
                TestStatus::Fail
            }
        }
    }
}

/// First result's latitude/longitude, if the body has the expected shape.
fn coordinates(body: &Value) -> Option<(f64, f64)> {
    let location = body.pointer("/results/0/geometry/location")?;
    let lat = location.get("lat")?.as_f64()?;
    let lng = location.get("lng")?.as_f64()?;
    Some((lat, lng))
}

/// Checks that a place lookup returns a non-empty result list over HTTP 200.
///
/// A 200 with an empty list fails; a non-200 fails regardless of body.
pub struct PlaceCountCheck {
    name: String,
    description: String,
    request: RestRequest,
    /// Number of places in the last response, for inspection only.
    pub num_places: usize,
}

impl PlaceCountCheck {
    pub fn new(name: impl Into<String>, description: impl Into<String>, request: RestRequest) -> Self {
        let name = name.into();
        debug!("created step '{}'", name);
        Self {
            name,
            description: description.into(),
            request,
            num_places: 0,
        }
    }

    /// Decide the verdict for an already-decoded response.
    pub fn evaluate(&mut self, response: &JsonResponse) -> TestStatus {
        self.num_places = result_count(&response.body);

        if self.num_places > 0 && response.status == 200 {
            info!("step '{}': {} places found", self.name, self.num_places);
            TestStatus::Pass
        } else {
            warn!(
                "step '{}': {} places, HTTP {}",
                self.name, self.num_places, response.status
            );
            TestStatus::Fail
        }
    }
}

#[async_trait]
impl TestStep for PlaceCountCheck {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn run(&mut self, client: &HttpClient) -> TestStatus {
        match self.request.send(client).await {
            Ok(response) => self.evaluate(&response),
            Err(e) => {
                warn!("step '{}' failed: {}", self.name, e);
                TestStatus::Fail
            }
        }
    }
}

/// Number of elements under the top-level `results` array.
///
/// An absent key counts as zero, same as an empty list.
fn result_count(body: &Value) -> usize {
    body.get("results").and_then(Value::as_array).map_or(0, Vec::len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> RestRequest {
        RestRequest::new(
            "https://example.invalid/api",
            Vec::new(),
            HttpVerb::Get,
            Duration::from_millis(500),
        )
    }

    fn response(status: u16, body: Value) -> JsonResponse {
        JsonResponse { status, body }
    }

    #[test]
    fn geo_check_passes_on_coordinates() {
        let mut step = GeoCheck::new("geo", "coordinates present", request());
        let body = json!({
            "results": [{"geometry": {"location": {"lat": 37.38, "lng": -122.08}}}]
        });

        assert_eq!(step.evaluate(&response(200, body)), TestStatus::Pass);
        assert_eq!(step.lat, Some(37.38));
        assert_eq!(step.lng, Some(-122.08));
    }

    #[test]
    fn geo_check_fails_on_empty_results() {
        let mut step = GeoCheck::new("geo", "", request());
        assert_eq!(
            step.evaluate(&response(200, json!({"results": []}))),
            TestStatus::Fail
        );
        assert_eq!(step.lat, None);
    }

    #[test]
    fn geo_check_fails_on_missing_keys() {
        let mut step = GeoCheck::new("geo", "", request());
        let body = json!({"results": [{"geometry": {}}]});
        assert_eq!(step.evaluate(&response(200, body)), TestStatus::Fail);
    }

    #[test]
    fn geo_check_fails_on_non_numeric_coordinates() {
        let mut step = GeoCheck::new("geo", "", request());
        let body = json!({
            "results": [{"geometry": {"location": {"lat": "north", "lng": null}}}]
        });
        assert_eq!(step.evaluate(&response(200, body)), TestStatus::Fail);
    }

    #[test]
    fn place_count_passes_on_populated_list() {
        let mut step = PlaceCountCheck::new("places", "", request());
        let body = json!({"results": [{"name": "A"}, {"name": "B"}]});

        assert_eq!(step.evaluate(&response(200, body)), TestStatus::Pass);
        assert_eq!(step.num_places, 2);
    }

    #[test]
    fn place_count_fails_on_empty_list() {
        let mut step = PlaceCountCheck::new("places", "", request());
        assert_eq!(
            step.evaluate(&response(200, json!({"results": []}))),
            TestStatus::Fail
        );
        assert_eq!(step.num_places, 0);
    }

    #[test]
    fn place_count_fails_on_non_200_despite_results() {
        let mut step = PlaceCountCheck::new("places", "", request());
        let body = json!({"results": [{"name": "A"}]});
        assert_eq!(step.evaluate(&response(500, body)), TestStatus::Fail);
        // Count side effect is still recorded for inspection.
        assert_eq!(step.num_places, 1);
    }

    #[test]
    fn place_count_treats_absent_results_key_as_empty() {
        let mut step = PlaceCountCheck::new("places", "", request());
        assert_eq!(
            step.evaluate(&response(200, json!({"status": "OK"}))),
            TestStatus::Fail
        );
    }

    #[test]
    fn identical_steps_evaluate_identically() {
        // No hidden shared state between instances.
        let body = json!({
            "results": [{"geometry": {"location": {"lat": 1.0, "lng": 2.0}}}]
        });
        let mut first = GeoCheck::new("geo", "", request());
        let mut second = GeoCheck::new("geo", "", request());

        assert_eq!(
            first.evaluate(&response(200, body.clone())),
            second.evaluate(&response(200, body))
        );
    }

    #[tokio::test]
    async fn network_error_fails_the_step_without_panicking() {
        let client = HttpClient::new();
        let refused = RestRequest::new(
            "http://127.0.0.1:1/",
            Vec::new(),
            HttpVerb::Get,
            Duration::from_millis(500),
        );

        let mut geo = GeoCheck::new("geo", "", refused.clone());
        assert_eq!(geo.run(&client).await, TestStatus::Fail);

        let mut places = PlaceCountCheck::new("places", "", refused);
        assert_eq!(places.run(&client).await, TestStatus::Fail);
    }

    #[tokio::test]
    async fn unsupported_verb_fails_the_step() {
        let client = HttpClient::new();
        let post = RestRequest::new(
            "http://127.0.0.1:1/",
            Vec::new(),
            HttpVerb::Post,
            Duration::from_millis(500),
        );

        let mut step = GeoCheck::new("geo", "", post);
        assert_eq!(step.run(&client).await, TestStatus::Fail);
    }
}
