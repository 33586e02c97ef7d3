use indexmap::IndexMap;

use crate::ir::{MemberDescriptor, TypeDeclaration};

/// A member that survived the inheritance walk, with the type that declared it.
#[derive(Debug, Clone, Copy)]
pub struct CollectedMember<'a> {
    pub member: &'a MemberDescriptor,
    pub declared_in: &'a str,
}

/// Walk the type and its ancestors, most-derived first, keeping the first
/// declaration of every name. Shadowing is decided before eligibility, so a
/// hidden redeclaration also hides the inherited public one.
pub fn collect_members(decl: &TypeDeclaration) -> IndexMap<&str, CollectedMember<'_>> {
    let levels = std::iter::once((decl.name.as_str(), &decl.members))
        .chain(decl.ancestors.iter().map(|a| (a.name.as_str(), &a.members)));

    let mut seen: IndexMap<&str, CollectedMember<'_>> = IndexMap::new();
    for (declared_in, members) in levels {
        for member in members {
            seen.entry(member.name.as_str())
                .or_insert(CollectedMember { member, declared_in });
        }
    }

    seen.retain(|_, c| c.member.is_eligible());
    seen
}
