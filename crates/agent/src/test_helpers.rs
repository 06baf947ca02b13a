//! Shared test helpers for orchestrator tests.

use lightnavi_core::error::ServiceError;
use lightnavi_core::message::Candidate;
use lightnavi_core::service::{RecommendationService, ServiceRequest, ServiceResponse};
use std::collections::VecDeque;
use std::sync::Mutex;

/// A mock service that replays a sequence of scripted outcomes.
///
/// Each call to `recommend` pops the next outcome and records the request.
/// Panics if more calls are made than outcomes provided.
pub struct ScriptedService {
    outcomes: Mutex<VecDeque<Result<ServiceResponse, ServiceError>>>,
    requests: Mutex<Vec<ServiceRequest>>,
}

impl ScriptedService {
    pub fn new(outcomes: Vec<Result<ServiceResponse, ServiceError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A service that answers once with plain text.
    pub fn single_text(text: &str) -> Self {
        Self::new(vec![Ok(ServiceResponse::text(text))])
    }

    /// A service whose only call fails.
    pub fn failing(error: ServiceError) -> Self {
        Self::new(vec![Err(error)])
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<ServiceRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl RecommendationService for ScriptedService {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn recommend(&self, request: ServiceRequest) -> Result<ServiceResponse, ServiceError> {
        let mut requests = self.requests.lock().unwrap();
        let call = requests.len() + 1;
        requests.push(request);

        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("ScriptedService: no outcome for call #{call}"))
    }
}

/// Helper to create a candidate.
pub fn make_candidate(name: &str, manufacturer: &str, series: &str) -> Candidate {
    Candidate {
        name: name.into(),
        manufacturer: manufacturer.into(),
        series: series.into(),
        extra: serde_json::Map::new(),
    }
}
