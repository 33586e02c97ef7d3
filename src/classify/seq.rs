use crate::ir::{CloneAction, CollectionVariant, TypeDescriptor};

pub fn classify_collection(
    ty: &TypeDescriptor,
    variant: CollectionVariant,
    element: Option<&TypeDescriptor>,
) -> CloneAction {
    let Some(element) = element else {
        return super::direct_assignment(ty);
    };
    // Unmatched sequence types fall back to the generic list rebuild
    let variant = match variant {
        CollectionVariant::Other => CollectionVariant::List,
        known => known,
    };
    CloneAction::CloneCollection { variant, element: super::element_action(element) }
}
