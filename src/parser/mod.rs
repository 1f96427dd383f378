pub mod types;
pub mod yaml;

use log::warn;

pub use types::{CheckKind, ParamValue, PlanSpec, StepSpec};

use crate::http::HttpVerb;

/// The built-in plan: the classic geolocation smoke checks, expressed with
/// the same declarative descriptors a YAML plan uses. The places API key is
/// injected from the environment, never embedded here.
pub fn default_plan() -> PlanSpec {
    PlanSpec {
        name: "Simple Test Plan".to_string(),
        operator: None,
        aggregation: Default::default(),
        steps: vec![
            StepSpec {
                name: "Geo Code Test".to_string(),
                description: "Resolve coordinates for a street address".to_string(),
                check: CheckKind::Coordinates,
                url: "https://maps.googleapis.com/maps/api/geocode/json".to_string(),
                params: [("address".to_string(), "mountain view, ca".into())]
                    .into_iter()
                    .collect(),
                verb: HttpVerb::Get,
            },
            StepSpec {
                name: "Place Lookup Test".to_string(),
                description: "Find restaurants around a lat/lng location".to_string(),
                check: CheckKind::ResultCount,
                url: "https://maps.googleapis.com/maps/api/place/nearbysearch/json".to_string(),
                params: [
                    ("location".to_string(), "41.8781136,-87.6297982".into()),
                    ("radius".to_string(), "1000".into()),
                    ("type".to_string(), "restaurant".into()),
                    ("key".to_string(), "${PLACES_API_KEY}".into()),
                ]
                .into_iter()
                .collect(),
                verb: HttpVerb::Get,
            },
        ],
    }
}

/// Substitute `${VAR}` placeholders from the process environment.
///
/// Unresolved placeholders are kept verbatim so the resulting request fails
/// visibly instead of silently sending an empty value.
pub fn substitute_env(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        match after.find('}') {
            Some(end) => {
                let key = &after[..end];
                match std::env::var(key) {
                    Ok(value) => out.push_str(&value),
                    Err(_) => {
                        warn!("environment variable '{}' is not set", key);
                        out.push_str(&rest[start..start + end + 3]);
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                // Unterminated placeholder, keep as-is.
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}
