pub mod plan;
pub mod state;
pub mod step;

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use crate::http::HttpClient;
use crate::parser;
use crate::utils::config::Config;

pub use plan::TestPlan;
pub use state::{Aggregation, StepOutcome, TestStatus};

/// Run a plan file, or the built-in default plan when no path is given.
pub async fn run_plan(path: Option<&Path>, config: Config) -> Result<TestStatus> {
    let spec = match path {
        Some(p) => parser::yaml::parse_plan_file(p)?,
        None => parser::default_plan(),
    };

    let mut plan = TestPlan::from_spec(spec, config);
    let client = HttpClient::new();

    println!(
        "{} Running test plan: {}",
        "▶".green().bold(),
        plan.name().white().bold()
    );
    if !plan.operator().is_empty() {
        println!("  Operator: {}", plan.operator().cyan());
    }

    let result = plan.execute(&client).await;
    print_summary(&plan);

    Ok(result)
}

fn print_summary(plan: &TestPlan) {
    println!("\n{} Test plan finished", "■".blue().bold());

    for outcome in plan.outcomes() {
        let mark = match outcome.status {
            TestStatus::Pass => "✓".green(),
            _ => "✗".red(),
        };
        println!("  {} {} ({}ms)", mark, outcome.name, outcome.duration_ms);
    }

    let passed = plan
        .outcomes()
        .iter()
        .filter(|o| o.status == TestStatus::Pass)
        .count();
    let failed = plan.outcomes().len() - passed;
    println!(
        "  {} passed, {} failed",
        passed.to_string().green(),
        failed.to_string().red()
    );

    let result = match plan.result() {
        TestStatus::Pass => "PASS".green().bold(),
        TestStatus::Fail => "FAIL".red().bold(),
        TestStatus::Abort => "ABORT".yellow().bold(),
        TestStatus::Running => "RUNNING".white().bold(),
    };
    println!("  Result: {}", result);
}
