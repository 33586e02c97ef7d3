//! # clonegen
//!
//! Decides how generated `DeepClone` / `ShallowClone` methods rebuild a type.
//!
//! Discovery hands in a [`TypeDeclaration`]; the classifier picks a
//! [`CloneAction`] per member, and the plan builder assembles an ordered
//! [`ClonePlan`] with a [`ConstructionStrategy`]. Rendering the plan into
//! source code belongs to the emitter and is not done here.
//!
//! ```rust
//! use clonegen::{build_plan, Capability, CloneAction, MemberDescriptor, TypeDeclaration, TypeDescriptor};
//!
//! let decl = TypeDeclaration::class("Outer", vec![
//!     MemberDescriptor::new("name", TypeDescriptor::string()),
//!     MemberDescriptor::new("nested", TypeDescriptor::cloneable("NestedType")),
//! ]);
//! let deep = build_plan(&decl, Capability::Deep).unwrap();
//! assert_eq!(deep.action("nested"), Some(&CloneAction::RecurseCloneable));
//! let shallow = build_plan(&decl, Capability::Shallow).unwrap();
//! assert_eq!(shallow.action("nested"), Some(&CloneAction::CopyReference));
//! ```

pub mod classify;
pub mod cli;
pub mod decode;
pub mod error;
pub mod ir;
pub mod jq_exec;
pub mod options;
pub mod plan;
pub mod report;

pub use classify::classify;
pub use error::{ClonegenError, ClonegenResult};
pub use ir::{
    AncestorDeclaration, Capabilities, Capability, CloneAction, ClonePlan, CollectionVariant,
    ConstructionStrategy, DictionaryVariant, ElementAction, MemberDescriptor, Mutability, PlanEntry,
    TypeDeclaration, TypeDescriptor, TypeKind, Visibility,
};
pub use options::PlannerOptions;
pub use plan::{build_plan, build_plan_with, build_plans, check_eligibility, plan_all, PlanOutcome, PlanSet, SkipReason};
pub use report::PlanReport;

/// Initialize tracing for the driver. Logs go to stderr so stdout stays clean for reports.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("clonegen=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
