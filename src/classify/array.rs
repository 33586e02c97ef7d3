use crate::ir::{CloneAction, ElementAction, TypeDescriptor};

/// Rank 1 arrays map their elements (deep only when the element is
/// user-cloneable); higher ranks are always a structural duplicate.
pub fn classify_array(rank: u32, element: &TypeDescriptor) -> CloneAction {
    let rank = rank.max(1); // rank 0 is malformed; treat it like a vector
    let element = if rank == 1 {
        super::element_action(element)
    } else {
        ElementAction::Copy
    };
    CloneAction::CloneArray { rank, element }
}
