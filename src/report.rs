//! Output views over plan sets: a JSON report for emitters and a colored
//! explanation for humans.
use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::ir::{CloneAction, ClonePlan, ConstructionStrategy, ElementAction};
use crate::plan::{PlanOutcome, PlanSet, SkipReason};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanReport {
    pub types: Vec<PlanSet>,
}

impl PlanReport {
    pub fn new(types: Vec<PlanSet>) -> Self {
        Self { types }
    }

    pub fn planned_count(&self) -> usize {
        self.types
            .iter()
            .flat_map(|set| [&set.deep, &set.shallow])
            .filter(|outcome| outcome.plan().is_some())
            .count()
    }

    pub fn to_json(&self, compact: bool) -> serde_json::Result<String> {
        if compact {
            serde_json::to_string(self)
        } else {
            serde_json::to_string_pretty(self)
        }
    }
}

pub fn describe_action(action: &CloneAction) -> String {
    fn elem(e: ElementAction) -> &'static str {
        match e {
            ElementAction::Clone => "clone",
            ElementAction::Copy => "copy",
        }
    }
    match action {
        CloneAction::CopyScalar => "copy scalar".to_string(),
        CloneAction::CopyReference => "copy reference".to_string(),
        CloneAction::RecurseCloneable => "recurse".to_string(),
        CloneAction::CloneArray { rank, element } => {
            format!("array rank {rank}, elements {}", elem(*element))
        }
        CloneAction::CloneDictionary { variant, value } => {
            format!("rebuild {variant:?}, values {}", elem(*value))
        }
        CloneAction::CloneCollection { variant, element } => {
            format!("rebuild {variant:?}, elements {}", elem(*element))
        }
    }
}

fn describe_strategy(strategy: ConstructionStrategy) -> &'static str {
    match strategy {
        ConstructionStrategy::ObjectInitializer => "object initializer",
        ConstructionStrategy::FunctionalUpdate => "functional update",
        ConstructionStrategy::StatementSequence => "statement sequence",
    }
}

fn describe_skip(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::Abstract => "abstract type",
        SkipReason::UserImplemented => "already implemented by hand",
        SkipReason::NotMarked => "capability not opted into",
        SkipReason::NotRequested => "capability not requested",
    }
}

fn render_plan(out: &mut String, label: &str, plan: &ClonePlan) {
    out.push_str(&format!(
        "  {} {}\n",
        label.bold(),
        format!("({})", describe_strategy(plan.strategy)).dimmed()
    ));
    if plan.is_empty() {
        out.push_str(&format!("    {}\n", "no members".dimmed()));
    }
    for (name, entry) in &plan.members {
        let action = describe_action(&entry.action);
        let action = if entry.action.is_direct_assignment() { action.normal() } else { action.green() };
        let mut flags = Vec::new();
        if entry.null_guarded {
            flags.push("null-guarded");
        }
        if entry.init_only {
            flags.push("init-only");
        }
        let flags = if flags.is_empty() { String::new() } else { format!(" [{}]", flags.join(", ")) };
        let origin = if entry.declared_in == plan.type_name {
            String::new()
        } else {
            format!(" from {}", entry.declared_in)
        };
        out.push_str(&format!("    {name}: {action}{}{}\n", flags.yellow(), origin.dimmed()));
    }
}

fn render_outcome(out: &mut String, label: &str, outcome: &PlanOutcome) {
    match outcome {
        PlanOutcome::Planned { plan } => render_plan(out, label, plan),
        PlanOutcome::Skipped { reason } => {
            out.push_str(&format!("  {} {}\n", label.bold(), format!("skipped: {}", describe_skip(*reason)).red()));
        }
    }
}

pub fn explain(report: &PlanReport) -> String {
    let mut out = String::new();
    for set in &report.types {
        out.push_str(&format!("{}\n", set.name.cyan().bold()));
        render_outcome(&mut out, "deep", &set.deep);
        render_outcome(&mut out, "shallow", &set.shallow);
    }
    out
}
