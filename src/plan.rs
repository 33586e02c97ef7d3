//! Clone plan building.
//!
//! For one containing type: walk its members (inherited ones included), ask
//! the classifier what to do with each, and pick how the clone gets
//! constructed. Every function here is pure; independent types can be
//! planned in parallel with [`plan_all`].

pub mod members;
pub mod strategy;

use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::classify;
use crate::ir::{Capability, CloneAction, ClonePlan, PlanEntry, TypeDeclaration};
use crate::options::PlannerOptions;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// Why no plan was produced. Never an error: the driver just skips the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Abstract,
    UserImplemented,
    NotMarked,
    NotRequested,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlanOutcome {
    Planned { plan: ClonePlan },
    Skipped { reason: SkipReason },
}

/// Both capabilities for one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSet {
    pub name: String,
    pub deep: PlanOutcome,
    pub shallow: PlanOutcome,
}

impl PlanOutcome {
    pub fn plan(&self) -> Option<&ClonePlan> {
        match self {
            Self::Planned { plan } => Some(plan),
            Self::Skipped { .. } => None,
        }
    }
}

impl PlanSet {
    pub fn get(&self, capability: Capability) -> &PlanOutcome {
        match capability {
            Capability::Deep => &self.deep,
            Capability::Shallow => &self.shallow,
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// FRONT API
// ————————————————————————————————————————————————————————————————————————————

pub fn check_eligibility(
    decl: &TypeDeclaration,
    capability: Capability,
    options: &PlannerOptions,
) -> Option<SkipReason> {
    if decl.is_abstract {
        return Some(SkipReason::Abstract);
    }
    if !options.requested.has(capability) {
        return Some(SkipReason::NotRequested);
    }
    if !decl.capabilities.has(capability) {
        return Some(SkipReason::NotMarked);
    }
    if decl.user_implemented.has(capability) {
        return Some(SkipReason::UserImplemented);
    }
    None
}

/// Plan with default options.
pub fn build_plan(decl: &TypeDeclaration, capability: Capability) -> Option<ClonePlan> {
    build_plan_with(decl, capability, &PlannerOptions::default())
}

pub fn build_plan_with(
    decl: &TypeDeclaration,
    capability: Capability,
    options: &PlannerOptions,
) -> Option<ClonePlan> {
    match plan_outcome(decl, capability, options) {
        PlanOutcome::Planned { plan } => Some(plan),
        PlanOutcome::Skipped { .. } => None,
    }
}

pub fn build_plans(decl: &TypeDeclaration, options: &PlannerOptions) -> PlanSet {
    PlanSet {
        name: decl.name.clone(),
        deep: plan_outcome(decl, Capability::Deep, options),
        shallow: plan_outcome(decl, Capability::Shallow, options),
    }
}

/// One task per type; output order follows input order.
pub fn plan_all(decls: &[TypeDeclaration], options: &PlannerOptions) -> Vec<PlanSet> {
    decls.par_iter().map(|decl| build_plans(decl, options)).collect()
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL
// ————————————————————————————————————————————————————————————————————————————

fn plan_outcome(decl: &TypeDeclaration, capability: Capability, options: &PlannerOptions) -> PlanOutcome {
    if let Some(reason) = check_eligibility(decl, capability, options) {
        debug!(type_name = %decl.name, ?capability, ?reason, "skipping");
        return PlanOutcome::Skipped { reason };
    }

    let collected = members::collect_members(decl);
    let mut actions: Vec<CloneAction> = Vec::with_capacity(collected.len());
    for c in collected.values() {
        let action = match capability {
            Capability::Deep => classify::classify(&c.member.ty),
            // shallow never recurses and never rebuilds containers
            Capability::Shallow => classify::direct_assignment(&c.member.ty),
        };
        trace!(type_name = %decl.name, member = %c.member.name, ?action, "classified");
        actions.push(action);
    }

    let strategy = strategy::select_strategy(
        decl.record_like,
        collected.values().map(|c| c.member).zip(actions.iter()),
        options,
    );

    let mut plan_members: IndexMap<String, PlanEntry> = IndexMap::with_capacity(collected.len());
    for (c, action) in collected.values().zip(actions) {
        let null_guarded = !action.is_direct_assignment() && c.member.ty.can_be_absent();
        plan_members.insert(c.member.name.clone(), PlanEntry {
            action,
            null_guarded,
            init_only: c.member.is_init_only(),
            declared_in: c.declared_in.to_string(),
        });
    }

    debug!(type_name = %decl.name, ?capability, ?strategy, members = plan_members.len(), "planned");
    PlanOutcome::Planned {
        plan: ClonePlan {
            type_name: decl.name.clone(),
            capability,
            strategy,
            members: plan_members,
        },
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{
        CollectionVariant, ConstructionStrategy, DictionaryVariant, ElementAction, MemberDescriptor,
        TypeDescriptor,
    };

    fn deep(decl: &TypeDeclaration) -> ClonePlan {
        build_plan(decl, Capability::Deep).expect("deep plan")
    }

    fn shallow(decl: &TypeDeclaration) -> ClonePlan {
        build_plan(decl, Capability::Shallow).expect("shallow plan")
    }

    #[test]
    fn scalars_only_use_an_initializer() {
        let decl = TypeDeclaration::class("Person", vec![
            MemberDescriptor::new("name", TypeDescriptor::string()),
            MemberDescriptor::new("age", TypeDescriptor::scalar("int")),
        ]);
        let plan = deep(&decl);
        assert_eq!(plan.strategy, ConstructionStrategy::ObjectInitializer);
        assert_eq!(plan.action("name"), Some(&CloneAction::CopyScalar));
        assert_eq!(plan.action("age"), Some(&CloneAction::CopyScalar));
        assert_eq!(plan.members.len(), 2);
    }

    #[test]
    fn nested_cloneable_recurses_deep_and_shares_shallow() {
        let decl = TypeDeclaration::class("Outer", vec![
            MemberDescriptor::new("name", TypeDescriptor::string()),
            MemberDescriptor::new("nested", TypeDescriptor::cloneable("NestedType")),
        ]);
        let d = deep(&decl);
        let s = shallow(&decl);
        assert_eq!(d.action("name"), Some(&CloneAction::CopyScalar));
        assert_eq!(d.action("nested"), Some(&CloneAction::RecurseCloneable));
        assert_eq!(s.action("name"), Some(&CloneAction::CopyScalar));
        assert_eq!(s.action("nested"), Some(&CloneAction::CopyReference));
        assert!(d.members["nested"].null_guarded);
        assert!(!s.members["nested"].null_guarded);
    }

    #[test]
    fn multi_rank_array_stays_an_initializer() {
        let decl = TypeDeclaration::class("Matrix", vec![
            MemberDescriptor::new("numbers", TypeDescriptor::array(TypeDescriptor::scalar("int"), 2)),
        ]);
        let plan = deep(&decl);
        assert_eq!(
            plan.action("numbers"),
            Some(&CloneAction::CloneArray { rank: 2, element: ElementAction::Copy })
        );
        assert_eq!(plan.strategy, ConstructionStrategy::ObjectInitializer);

        let opts = PlannerOptions::default().with_multi_rank_arrays_as_statements();
        let plan = build_plan_with(&decl, Capability::Deep, &opts).unwrap();
        assert_eq!(plan.strategy, ConstructionStrategy::StatementSequence);
    }

    #[test]
    fn record_with_init_only_members_uses_functional_update() {
        let decl = TypeDeclaration::record("Entry", vec![
            MemberDescriptor::init_only("name", TypeDescriptor::string()),
            MemberDescriptor::init_only("value", TypeDescriptor::scalar("int")),
        ]);
        for plan in [deep(&decl), shallow(&decl)] {
            assert_eq!(plan.strategy, ConstructionStrategy::FunctionalUpdate);
            assert_eq!(plan.action("name"), Some(&CloneAction::CopyScalar));
            assert_eq!(plan.action("value"), Some(&CloneAction::CopyScalar));
            assert!(plan.members.values().all(|e| e.init_only));
        }
    }

    #[test]
    fn init_only_on_a_class_uses_statements() {
        let decl = TypeDeclaration::class("Settings", vec![
            MemberDescriptor::init_only("key", TypeDescriptor::string()),
            MemberDescriptor::new("count", TypeDescriptor::scalar("int")),
        ]);
        assert_eq!(deep(&decl).strategy, ConstructionStrategy::StatementSequence);
        assert_eq!(shallow(&decl).strategy, ConstructionStrategy::StatementSequence);
    }

    #[test]
    fn record_without_init_only_members_is_an_initializer() {
        let decl = TypeDeclaration::record("Bag", vec![
            MemberDescriptor::new("items", TypeDescriptor::list(TypeDescriptor::cloneable("Item"))),
        ]);
        assert_eq!(deep(&decl).strategy, ConstructionStrategy::ObjectInitializer);
    }

    #[test]
    fn dictionary_of_cloneables_clones_values() {
        let decl = TypeDeclaration::class("Registry", vec![MemberDescriptor::new(
            "items",
            TypeDescriptor::dictionary(
                DictionaryVariant::Dictionary,
                TypeDescriptor::string(),
                TypeDescriptor::cloneable("NestedType"),
            ),
        )]);
        let plan = deep(&decl);
        assert_eq!(
            plan.action("items"),
            Some(&CloneAction::CloneDictionary { variant: DictionaryVariant::Dictionary, value: ElementAction::Clone })
        );
        assert!(plan.members["items"].null_guarded);
        assert_eq!(shallow(&decl).action("items"), Some(&CloneAction::CopyReference));
    }

    #[test]
    fn abstract_types_get_no_plan() {
        let mut decl = TypeDeclaration::class("Shape", vec![
            MemberDescriptor::new("id", TypeDescriptor::scalar("int")),
        ]);
        decl.is_abstract = true;
        assert!(build_plan(&decl, Capability::Deep).is_none());
        assert!(build_plan(&decl, Capability::Shallow).is_none());
        assert_eq!(
            check_eligibility(&decl, Capability::Deep, &PlannerOptions::default()),
            Some(SkipReason::Abstract)
        );
    }

    #[test]
    fn hand_written_methods_are_left_alone() {
        let mut decl = TypeDeclaration::class("Custom", vec![
            MemberDescriptor::new("id", TypeDescriptor::scalar("int")),
        ]);
        decl.user_implemented.deep = true;
        let set = build_plans(&decl, &PlannerOptions::default());
        assert_eq!(set.deep, PlanOutcome::Skipped { reason: SkipReason::UserImplemented });
        assert!(set.shallow.plan().is_some());
    }

    #[test]
    fn capabilities_must_be_marked_and_requested() {
        let mut decl = TypeDeclaration::class("OnlyDeep", vec![]);
        decl.capabilities.shallow = false;
        let set = build_plans(&decl, &PlannerOptions::default());
        assert!(set.deep.plan().is_some());
        assert_eq!(set.shallow, PlanOutcome::Skipped { reason: SkipReason::NotMarked });

        let set = build_plans(&decl, &PlannerOptions::shallow_only());
        assert_eq!(set.deep, PlanOutcome::Skipped { reason: SkipReason::NotRequested });

        decl.capabilities.deep = false;
        assert!(build_plan(&decl, Capability::Deep).is_none());
    }

    #[test]
    fn empty_type_degenerates_to_an_empty_initializer() {
        let decl = TypeDeclaration::record("Marker", vec![]);
        let plan = deep(&decl);
        assert!(plan.is_empty());
        assert_eq!(plan.strategy, ConstructionStrategy::ObjectInitializer);
    }

    #[test]
    fn inherited_members_merge_by_name() {
        let decl = TypeDeclaration::class("Derived", vec![
            MemberDescriptor::new("A", TypeDescriptor::cloneable("Nested")),
            MemberDescriptor::new("B", TypeDescriptor::scalar("int")),
        ])
        .with_ancestor("Base", vec![MemberDescriptor::new("A", TypeDescriptor::string())]);
        let plan = deep(&decl);
        assert_eq!(plan.members.len(), 2);
        assert_eq!(plan.action("A"), Some(&CloneAction::RecurseCloneable));
        assert_eq!(plan.members["A"].declared_in, "Derived");
        assert_eq!(plan.action("B"), Some(&CloneAction::CopyScalar));
    }

    #[test]
    fn null_guards_follow_absence() {
        let decl = TypeDeclaration::class("Holder", vec![
            MemberDescriptor::new("money", TypeDescriptor::opaque("Money").value_type().deep_cloneable()),
            MemberDescriptor::new("maybe_money", TypeDescriptor::opaque("Money").value_type().deep_cloneable().nullable()),
            MemberDescriptor::new("tags", TypeDescriptor::array(TypeDescriptor::string(), 1)),
            MemberDescriptor::new("label", TypeDescriptor::string().nullable()),
            MemberDescriptor::new("owner", TypeDescriptor::opaque("User")),
        ]);
        let plan = deep(&decl);
        assert!(!plan.members["money"].null_guarded);
        assert!(plan.members["maybe_money"].null_guarded);
        assert!(plan.members["tags"].null_guarded);
        // direct assignment already propagates absence
        assert!(!plan.members["label"].null_guarded);
        assert!(!plan.members["owner"].null_guarded);
    }

    #[test]
    fn shallow_and_deep_diverge_on_every_transformed_member() {
        let decl = TypeDeclaration::class("Mixed", vec![
            MemberDescriptor::new("id", TypeDescriptor::scalar("int")),
            MemberDescriptor::new("child", TypeDescriptor::cloneable("Child")),
            MemberDescriptor::new("grid", TypeDescriptor::array(TypeDescriptor::scalar("int"), 2)),
            MemberDescriptor::new("stack", TypeDescriptor::collection(CollectionVariant::Stack, TypeDescriptor::cloneable("Frame"))),
            MemberDescriptor::new("index", TypeDescriptor::dictionary(DictionaryVariant::ReadOnlyDictionary, TypeDescriptor::string(), TypeDescriptor::scalar("int"))),
            MemberDescriptor::new("client", TypeDescriptor::opaque("Client")),
        ]);
        let d = deep(&decl);
        let s = shallow(&decl);
        assert_eq!(d.members.keys().collect::<Vec<_>>(), s.members.keys().collect::<Vec<_>>());
        for (name, entry) in &d.members {
            let shallow_action = s.action(name).unwrap();
            assert!(shallow_action.is_direct_assignment(), "{name}");
            if entry.action.is_direct_assignment() {
                assert_eq!(&entry.action, shallow_action, "{name}");
            } else {
                assert_ne!(&entry.action, shallow_action, "{name}");
            }
        }
        assert_eq!(
            d.action("stack"),
            Some(&CloneAction::CloneCollection { variant: CollectionVariant::Stack, element: ElementAction::Clone })
        );
    }

    #[test]
    fn ineligible_members_are_left_out() {
        let mut write_only = MemberDescriptor::new("sink", TypeDescriptor::string());
        write_only.readable = false;
        let decl = TypeDeclaration::class("Filtered", vec![
            MemberDescriptor::new("kept", TypeDescriptor::string()),
            MemberDescriptor::new("private", TypeDescriptor::string()).hidden(),
            write_only,
        ]);
        let plan = deep(&decl);
        assert_eq!(plan.members.keys().collect::<Vec<_>>(), vec!["kept"]);
    }

    #[test]
    fn planning_is_deterministic_and_parallel_safe() {
        let decls: Vec<TypeDeclaration> = (0..32)
            .map(|i| TypeDeclaration::class(format!("T{i}"), vec![
                MemberDescriptor::new("child", TypeDescriptor::cloneable("Child")),
                MemberDescriptor::new("n", TypeDescriptor::scalar("int")),
            ]))
            .collect();
        let opts = PlannerOptions::default();
        let a = plan_all(&decls, &opts);
        let b = plan_all(&decls, &opts);
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
        assert_eq!(a[7].name, "T7");
    }

    #[test]
    fn outcomes_serialize_with_a_status_tag() {
        let decl = TypeDeclaration::class("Tiny", vec![
            MemberDescriptor::new("n", TypeDescriptor::scalar("int")),
        ]);
        let set = build_plans(&decl, &PlannerOptions::deep_only());
        let v = serde_json::to_value(&set).unwrap();
        assert_eq!(v["deep"]["status"], "planned");
        assert_eq!(v["deep"]["plan"]["strategy"], "object_initializer");
        assert_eq!(v["deep"]["plan"]["members"]["n"]["action"]["kind"], "copy_scalar");
        assert_eq!(v["shallow"]["status"], "skipped");
        assert_eq!(v["shallow"]["reason"], "not_requested");
    }
}
