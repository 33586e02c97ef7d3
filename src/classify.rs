//! Per-member clone strategy selection.
//!
//! `classify` is a pure function of a type's shape. The rules are tried in a
//! fixed order and the first match wins:
//!
//! 1. arrays
//! 2. user-cloneable types (even when they also look like containers)
//! 3. dictionaries
//! 4. other sequences
//! 5. value types and strings
//! 6. everything else
//!
//! Containers only unwrap one level: an element is either delegated to its
//! own clone or copied, never restructured.

pub mod array;
pub mod dict;
pub mod seq;

use crate::ir::{CloneAction, ElementAction, TypeDescriptor, TypeKind};

pub fn classify(ty: &TypeDescriptor) -> CloneAction {
    // 1) Arrays first, so an array of cloneables never degrades to delegation
    if let TypeKind::Array { rank, element } = &ty.kind {
        return array::classify_array(*rank, element);
    }

    // 2) The type's own clone wins over its structure
    if ty.is_user_cloneable() {
        return CloneAction::RecurseCloneable;
    }

    match &ty.kind {
        // 3) Dictionaries
        TypeKind::Dictionary { variant, key, value } => {
            dict::classify_dictionary(ty, *variant, key.as_deref(), value.as_deref())
        }
        // 4) Sequences
        TypeKind::Collection { variant, element } => {
            seq::classify_collection(ty, *variant, element.as_deref())
        }
        // 5) / 6)
        _ => direct_assignment(ty),
    }
}

/// The binary element question: is the element user-cloneable?
pub fn element_action(element: &TypeDescriptor) -> ElementAction {
    match classify(element) {
        CloneAction::RecurseCloneable => ElementAction::Clone,
        _ => ElementAction::Copy,
    }
}

/// Plain assignment: value types and strings are scalars, the rest is a shared reference.
pub fn direct_assignment(ty: &TypeDescriptor) -> CloneAction {
    if ty.is_value_type || matches!(ty.kind, TypeKind::String) {
        CloneAction::CopyScalar
    } else {
        CloneAction::CopyReference
    }
}
