//! Named rewrite stages.

/// One named rewrite stage in a conversion pipeline.
///
/// Stages are pure `&str -> String` rewrites applied in a fixed order.
/// Naming them keeps the ordering auditable and lets each stage be tested
/// in isolation.
pub struct Stage {
    /// Stage name, unique within its pipeline.
    pub name: &'static str,
    apply: fn(&str) -> String,
}

impl Stage {
    pub(crate) const fn new(name: &'static str, apply: fn(&str) -> String) -> Self {
        Self { name, apply }
    }

    /// Run the stage over the working text.
    #[must_use]
    pub fn apply(&self, input: &str) -> String {
        (self.apply)(input)
    }
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage").field("name", &self.name).finish()
    }
}
