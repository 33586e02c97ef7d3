use crate::ir::{CloneAction, ConstructionStrategy, MemberDescriptor};
use crate::options::PlannerOptions;

/// Whether the action can be written as one initializer value.
pub fn is_inline_expression(action: &CloneAction, options: &PlannerOptions) -> bool {
    match action {
        CloneAction::CloneArray { rank, .. } if *rank > 1 => options.inline_multi_rank_arrays,
        _ => true,
    }
}

pub fn select_strategy<'a>(
    record_like: bool,
    entries: impl IntoIterator<Item = (&'a MemberDescriptor, &'a CloneAction)>,
    options: &PlannerOptions,
) -> ConstructionStrategy {
    let mut any_init_only = false;
    let mut any_statement = false;
    for (member, action) in entries {
        any_init_only |= member.is_init_only();
        any_statement |= !is_inline_expression(action, options);
    }

    if record_like && any_init_only {
        ConstructionStrategy::FunctionalUpdate
    } else if any_statement || any_init_only {
        // init-only here implies a non-record type
        ConstructionStrategy::StatementSequence
    } else {
        ConstructionStrategy::ObjectInitializer
    }
}
