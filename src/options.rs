use crate::ir::Capabilities;

/// Knobs for plan building.
#[derive(Debug, Clone)]
pub struct PlannerOptions {
    /// Which capabilities the driver wants plans for.
    /// A type still has to opt into a capability to get a plan for it.
    pub requested: Capabilities,

    /// Treat a structural duplicate of a rank >= 2 array as a single
    /// expression. When false, such members force `StatementSequence`.
    pub inline_multi_rank_arrays: bool,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            requested: Capabilities::BOTH,
            inline_multi_rank_arrays: true,
        }
    }
}

impl PlannerOptions {
    pub fn deep_only() -> Self {
        Self {
            requested: Capabilities { deep: true, shallow: false },
            ..Default::default()
        }
    }

    pub fn shallow_only() -> Self {
        Self {
            requested: Capabilities { deep: false, shallow: true },
            ..Default::default()
        }
    }

    pub fn with_multi_rank_arrays_as_statements(mut self) -> Self {
        self.inline_multi_rank_arrays = false;
        self
    }
}
