use std::time::{Duration, Instant};

use log::{info, warn};

use super::state::{Aggregation, StepOutcome, TestStatus};
use super::step::{GeoCheck, PlaceCountCheck, RestRequest, TestStep};
use crate::http::HttpClient;
use crate::parser::{self, CheckKind, PlanSpec};
use crate::utils::config::Config;

/// An ordered sequence of test steps with a shared lifecycle and an
/// aggregate result.
///
/// Lifecycle: `Running` (initial) → `Abort` | `Fail` | `Pass` (terminal).
/// The plan exclusively owns its steps; insertion order is execution order.
pub struct TestPlan {
    name: String,
    operator: String,
    result: TestStatus,
    steps: Vec<Box<dyn TestStep>>,
    outcomes: Vec<StepOutcome>,
    aggregation: Aggregation,
    config: Config,
}

impl TestPlan {
    pub fn new(name: impl Into<String>, config: Config) -> Self {
        Self {
            name: name.into(),
            operator: String::new(),
            result: TestStatus::Running,
            steps: Vec::new(),
            outcomes: Vec::new(),
            aggregation: Aggregation::default(),
            config,
        }
    }

    /// Build a plan from declarative descriptors.
    ///
    /// `${VAR}` placeholders in parameter values are resolved from the
    /// process environment here, at assembly time.
    pub fn from_spec(spec: PlanSpec, config: Config) -> Self {
        let timeout = Duration::from_millis(config.request_timeout_ms);
        let mut plan = Self::new(spec.name, config).with_aggregation(spec.aggregation);
        if let Some(operator) = spec.operator {
            plan.operator = operator;
        }

        for step in spec.steps {
            let params = step
                .params
                .iter()
                .map(|(k, v)| (k.clone(), parser::substitute_env(&v.to_string())))
                .collect();
            let request = RestRequest::new(step.url, params, step.verb, timeout);

            let boxed: Box<dyn TestStep> = match step.check {
                CheckKind::Coordinates => {
                    Box::new(GeoCheck::new(step.name, step.description, request))
                }
                CheckKind::ResultCount => {
                    Box::new(PlaceCountCheck::new(step.name, step.description, request))
                }
            };
            plan.add_step(boxed);
        }

        plan
    }

    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = operator.into();
        self
    }

    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// Append a step; insertion order is execution order.
    pub fn add_step(&mut self, step: Box<dyn TestStep>) {
        self.steps.push(step);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn operator(&self) -> &str {
        &self.operator
    }

    pub fn result(&self) -> TestStatus {
        self.result
    }

    /// Per-step records of the last execution.
    pub fn outcomes(&self) -> &[StepOutcome] {
        &self.outcomes
    }

    /// Connectivity precheck: probe a known endpoint before spending time on
    /// the step sequence. A failed probe aborts the plan.
    async fn initialize(&mut self, client: &HttpClient) {
        info!("initializing test plan '{}'", self.name);

        let timeout = Duration::from_millis(self.config.probe_timeout_ms);
        if client.probe(&self.config.probe_url, timeout).await {
            info!("connectivity check OK ({})", self.config.probe_url);
        } else {
            warn!("connectivity check failed, aborting plan '{}'", self.name);
            self.result = TestStatus::Abort;
        }
    }

    /// Sole public entry point: initialize, run every step in order, fold
    /// the step statuses into the plan result, clean up.
    ///
    /// Step failures are never retried and never halt the sequence; the only
    /// abort path is the connectivity probe. Cleanup runs unconditionally.
    pub async fn execute(&mut self, client: &HttpClient) -> TestStatus {
        self.initialize(client).await;

        if self.result == TestStatus::Abort && self.config.halt_on_abort {
            self.cleanup();
            return self.result;
        }

        let mut outcomes = Vec::with_capacity(self.steps.len());
        for step in self.steps.iter_mut() {
            info!("executing step '{}': {}", step.name(), step.description());
            let started = Instant::now();
            let status = step.run(client).await;
            let duration_ms = started.elapsed().as_millis() as u64;

            match status {
                TestStatus::Pass => info!("step '{}' passed ({}ms)", step.name(), duration_ms),
                _ => warn!("step '{}' failed ({}ms)", step.name(), duration_ms),
            }

            outcomes.push(StepOutcome {
                name: step.name().to_string(),
                status,
                duration_ms,
            });
        }

        self.outcomes = outcomes;
        self.result = self.fold_outcomes();
        self.cleanup();
        self.result
    }

    fn fold_outcomes(&self) -> TestStatus {
        if self.outcomes.is_empty() {
            // Nothing ran: keep whatever initialize left behind.
            return self.result;
        }

        match self.aggregation {
            Aggregation::LastStep => self
                .outcomes
                .last()
                .map(|o| o.status)
                .unwrap_or(self.result),
            Aggregation::AllPass => {
                if self.outcomes.iter().all(|o| o.status == TestStatus::Pass) {
                    TestStatus::Pass
                } else {
                    TestStatus::Fail
                }
            }
        }
    }

    /// Teardown hook; runs regardless of step outcomes. Currently only logs,
    /// reserved as the resource-release extension point.
    fn cleanup(&mut self) {
        info!("cleaning up test plan '{}'", self.name);
    }
}
