//! Runs the JSON fixtures under `fixtures/` through the planner.
//!
//! usage: dev-test-runner [FIXTURE_DIR] [NAME_FILTER]
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clonegen::{build_plans, ClonePlan, PlanOutcome, PlannerOptions, TypeDeclaration};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

static FIXTURE_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{3})_([a-z0-9_]+)\.json$").unwrap());

#[derive(Debug, Deserialize)]
struct Fixture {
    description: String,
    declaration: TypeDeclaration,
    #[serde(default)]
    multi_rank_arrays_as_statements: bool,
    expect: Expectations,
}

#[derive(Debug, Deserialize)]
struct Expectations {
    deep: Option<ExpectedPlan>,      // null: no plan
    shallow: Option<ExpectedPlan>,
}

#[derive(Debug, Deserialize)]
struct ExpectedPlan {
    strategy: Value,
    members: BTreeMap<String, Value>,   // member -> serialized action
}

fn load_fixture(path: &Path) -> Result<Fixture, String> {
    let src = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let de = &mut serde_json::Deserializer::from_str(&src);
    serde_path_to_error::deserialize::<_, Fixture>(de).map_err(|err| {
        let path = err.path().to_string();
        format!("at JSON path {path} → {}", err.into_inner())
    })
}

fn check(label: &str, actual: &PlanOutcome, expected: &Option<ExpectedPlan>) -> Vec<String> {
    let mut problems = Vec::new();
    match (actual.plan(), expected) {
        (None, None) => {}
        (Some(_), None) => problems.push(format!("{label}: expected no plan")),
        (None, Some(_)) => problems.push(format!("{label}: expected a plan, got {actual:?}")),
        (Some(plan), Some(want)) => problems.extend(compare(label, plan, want)),
    }
    problems
}

fn compare(label: &str, plan: &ClonePlan, want: &ExpectedPlan) -> Vec<String> {
    let mut problems = Vec::new();
    let strategy = serde_json::to_value(plan.strategy).unwrap_or(Value::Null);
    if strategy != want.strategy {
        problems.push(format!("{label}: strategy {strategy}, expected {}", want.strategy));
    }
    if plan.members.len() != want.members.len() {
        problems.push(format!(
            "{label}: {} members, expected {}",
            plan.members.len(),
            want.members.len()
        ));
    }
    for (name, want_action) in &want.members {
        match plan.members.get(name) {
            None => problems.push(format!("{label}: missing member `{name}`")),
            Some(entry) => {
                let action = serde_json::to_value(&entry.action).unwrap_or(Value::Null);
                if &action != want_action {
                    problems.push(format!("{label}.{name}: {action}, expected {want_action}"));
                }
            }
        }
    }
    problems
}

fn main() {
    let mut args = std::env::args().skip(1);
    let dir = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures"));
    let filter = args.next();

    let mut paths: Vec<PathBuf> = std::fs::read_dir(&dir)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", dir.display()))
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| FIXTURE_NAME.is_match(n))
        })
        .collect();
    paths.sort();

    let mut failed = 0usize;
    let mut ran = 0usize;
    for path in paths {
        let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default().to_string();
        let caps = FIXTURE_NAME.captures(&file_name).expect("filtered above");
        if let Some(filter) = &filter {
            if !caps[2].contains(filter.as_str()) {
                continue;
            }
        }
        ran += 1;
        let fixture = match load_fixture(&path) {
            Ok(x) => x,
            Err(error) => {
                eprintln!("❌ {file_name}: {error}");
                failed += 1;
                continue;
            }
        };
        let mut options = PlannerOptions::default();
        if fixture.multi_rank_arrays_as_statements {
            options = options.with_multi_rank_arrays_as_statements();
        }
        let set = build_plans(&fixture.declaration, &options);
        let mut problems = check("deep", &set.deep, &fixture.expect.deep);
        problems.extend(check("shallow", &set.shallow, &fixture.expect.shallow));
        if problems.is_empty() {
            eprintln!("✅ {} {}", &caps[1], fixture.description);
        } else {
            failed += 1;
            eprintln!("❌ {} {}", &caps[1], fixture.description);
            for p in problems {
                eprintln!("    {p}");
            }
        }
    }

    eprintln!("—— {ran} fixtures, {failed} failed ——");
    if failed > 0 {
        std::process::exit(1);
    }
}
