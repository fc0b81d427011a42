/// Dry-run recording of a shape's slots: how many tokens the shape wants,
/// where its optional boundary sits, and what each slot expects.
///
/// Probing walks the same field description as real binding, but without
/// tokens, so the recorded widths cannot drift from the binding behaviour.
#[derive(Debug, Default)]
pub struct Shape {
    slots: Vec<String>,
    optional_from: Option<usize>,
}

impl Shape {
    /// Record one slot with its expected-value description.
    pub fn slot(&mut self, expected: impl Into<String>) {
        self.slots.push(expected.into());
    }

    /// Mark every slot from here on as optional. Only the first call counts.
    pub fn set_optional(&mut self) {
        if self.optional_from.is_none() {
            self.optional_from = Some(self.slots.len());
        }
    }

    /// Append another shape's slots. The merged shape's optional boundary is
    /// not inherited; a nested domain's trailing optionals do not make the
    /// enclosing domain optional.
    pub(crate) fn merge(&mut self, other: Shape) {
        self.slots.extend(other.slots);
    }

    /// Number of leading required slots.
    pub(crate) fn required(&self) -> usize {
        self.optional_from.unwrap_or(self.slots.len())
    }

    /// Total slot count.
    pub(crate) fn total(&self) -> usize {
        self.slots.len()
    }

    /// Braced description, e.g. `{string, f32[, i32]}`.
    pub(crate) fn braced(&self) -> String {
        let mut out = String::from("{");
        for (i, slot) in self.slots.iter().enumerate() {
            if self.optional_from.map_or(false, |mark| i >= mark) {
                out.push('[');
            }
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(slot);
        }
        for _ in self.required()..self.total() {
            out.push(']');
        }
        out.push('}');
        out
    }
}
