use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::http::HttpVerb;
use crate::runner::state::Aggregation;

/// A declarative test plan, loaded from YAML or assembled in code.
///
/// Step definitions are data: adding or removing a step never touches the
/// orchestration code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSpec {
    pub name: String,

    /// Name of the test operator, if any.
    #[serde(default)]
    pub operator: Option<String>,

    /// How step statuses fold into the plan result.
    #[serde(default)]
    pub aggregation: Aggregation,

    #[serde(default)]
    pub steps: Vec<StepSpec>,
}

/// One declarative step: which validation to apply to which request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepSpec {
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Which validation to run against the response.
    pub check: CheckKind,

    pub url: String,

    /// Flat query-parameter map; values may reference `${ENV_VAR}`.
    #[serde(default)]
    pub params: HashMap<String, ParamValue>,

    #[serde(default)]
    pub verb: HttpVerb,
}

/// Supported response validations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum CheckKind {
    /// Expect geocoding coordinates in the first result.
    Coordinates,
    /// Expect a non-empty result list with HTTP 200.
    ResultCount,
}

/// Query-parameter value: strings and bare numbers are both accepted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    String(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(n) => write!(f, "{}", n),
            ParamValue::Float(n) => write!(f, "{}", n),
            ParamValue::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::String(value.to_string())
    }
}
