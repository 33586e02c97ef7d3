use crate::ir::{CloneAction, DictionaryVariant, TypeDescriptor};

/// Keys are always kept; values are cloned only when user-cloneable.
pub fn classify_dictionary(
    ty: &TypeDescriptor,
    variant: DictionaryVariant,
    key: Option<&TypeDescriptor>,
    value: Option<&TypeDescriptor>,
) -> CloneAction {
    // zero-arity: nothing to rebuild with, copy as-is
    let (Some(_key), Some(value)) = (key, value) else {
        return super::direct_assignment(ty);
    };
    let variant = match variant {
        DictionaryVariant::Other => DictionaryVariant::Dictionary,
        known => known,
    };
    CloneAction::CloneDictionary { variant, value: super::element_action(value) }
}
