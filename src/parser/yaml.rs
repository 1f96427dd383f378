use std::path::Path;

use anyhow::{Context, Result};

use super::types::PlanSpec;

/// Parse a YAML plan file into a [`PlanSpec`].
pub fn parse_plan_file(path: &Path) -> Result<PlanSpec> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read plan file: {}", path.display()))?;

    parse_plan_content(&content)
}

/// Parse YAML content into a [`PlanSpec`].
pub fn parse_plan_content(content: &str) -> Result<PlanSpec> {
    serde_yaml::from_str(content).context("Failed to parse YAML plan")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpVerb;
    use crate::parser::types::{CheckKind, ParamValue};
    use crate::runner::state::Aggregation;

    const PLAN: &str = r#"
name: Geolocation smoke plan
operator: qa
aggregation: lastStep

steps:
  - name: Geo Code Test
    description: Resolve coordinates for a street address
    check: coordinates
    url: https://maps.example.com/geocode/json
    params:
      address: mountain view, ca

  - name: Place Lookup Test
    check: resultCount
    url: https://maps.example.com/nearbysearch/json
    params:
      radius: 1000
      key: ${PLACES_API_KEY}
"#;

    #[test]
    fn parses_a_full_plan() {
        let plan = parse_plan_content(PLAN).unwrap();

        assert_eq!(plan.name, "Geolocation smoke plan");
        assert_eq!(plan.operator.as_deref(), Some("qa"));
        assert_eq!(plan.aggregation, Aggregation::LastStep);
        assert_eq!(plan.steps.len(), 2);

        let geo = &plan.steps[0];
        assert_eq!(geo.check, CheckKind::Coordinates);
        assert_eq!(geo.verb, HttpVerb::Get);
        assert_eq!(
            geo.params.get("address"),
            Some(&ParamValue::String("mountain view, ca".to_string()))
        );

        let places = &plan.steps[1];
        assert_eq!(places.check, CheckKind::ResultCount);
        assert_eq!(places.description, "");
        // Bare numbers are accepted alongside strings.
        assert_eq!(places.params.get("radius"), Some(&ParamValue::Int(1000)));
    }

    #[test]
    fn aggregation_defaults_to_all_pass() {
        let plan = parse_plan_content("name: minimal\nsteps: []\n").unwrap();
        assert_eq!(plan.aggregation, Aggregation::AllPass);
        assert!(plan.steps.is_empty());
    }

    #[test]
    fn unknown_check_kind_is_rejected() {
        let content = r#"
name: bad plan
steps:
  - name: step
    check: xmlSchema
    url: https://example.com
"#;
        assert!(parse_plan_content(content).is_err());
    }

    #[test]
    fn unknown_verb_is_rejected() {
        let content = r#"
name: bad plan
steps:
  - name: step
    check: coordinates
    url: https://example.com
    verb: patch
"#;
        assert!(parse_plan_content(content).is_err());
    }
}
