use std::collections::HashMap;
use std::ops::Index;
use std::rc::Rc;

use crate::parser::base::Binds;
use crate::value::Parse;

/// The per-parse result store: one [`ArgValue`] per declared argument,
/// keyed by long name (without the leading `--`), plus the unconsumed tail.
///
/// Immutable once `parse` returns. Querying an undeclared name or the wrong
/// static type is a programmer fault and panics; user-input problems are
/// never reported here (check `Parser::error` instead).
#[derive(Default)]
pub struct Outcome {
    entries: HashMap<String, ArgValue>,
    tail: Vec<String>,
}

impl Outcome {
    pub(crate) fn new(entries: HashMap<String, ArgValue>, tail: Vec<String>) -> Self {
        Self { entries, tail }
    }

    /// The binding outcome for `name`; panics on an undeclared name.
    pub fn get(&self, name: &str) -> &ArgValue {
        self.entries
            .get(name)
            .unwrap_or_else(|| panic!("fault: ['{name}']: unknown arg-name"))
    }

    /// Raw tokens left after a bare `--`, for hand-off to a sub-parser.
    pub fn tail(&self) -> &[String] {
        &self.tail
    }
}

impl Index<&str> for Outcome {
    type Output = ArgValue;

    fn index(&self, name: &str) -> &ArgValue {
        self.get(name)
    }
}

/// One argument's binding outcome: validity, appearance count, and the
/// materialized typed value.
pub struct ArgValue {
    name: String,
    binding: Rc<dyn Binds>,
}

impl ArgValue {
    pub(crate) fn new(name: String, binding: Rc<dyn Binds>) -> Self {
        Self { name, binding }
    }

    /// Did the argument bind a value (explicitly or through its default)?
    pub fn valid(&self) -> bool {
        self.binding.valid()
    }

    /// How many times the argument appeared on the command line.
    pub fn appear_count(&self) -> u32 {
        self.binding.appear_count()
    }

    /// The materialized value; `T` must match the declared shape exactly, a
    /// mismatch panics.
    pub fn of<T: Parse>(&self) -> &T {
        self.binding.value_any().downcast_ref::<T>().unwrap_or_else(|| {
            panic!(
                "fault: arg['{}']: bad type-cast as '{}'",
                self.name,
                T::describe()
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::value;
    use crate::parser::base::bind_for_test;

    #[test]
    fn typed_access() {
        let entries = HashMap::from([(
            "int".to_string(),
            ArgValue::new("int".to_string(), bind_for_test(value::<i32>(), 5)),
        )]);
        let outcome = Outcome::new(entries, Vec::default());
        assert_eq!(*outcome["int"].of::<i32>(), 5);
        assert!(outcome["int"].valid());
    }

    #[test]
    #[should_panic(expected = "unknown arg-name")]
    fn unknown_name_faults() {
        let outcome = Outcome::default();
        outcome.get("nope");
    }

    #[test]
    #[should_panic(expected = "bad type-cast as 'f32'")]
    fn wrong_type_faults() {
        let entries = HashMap::from([(
            "int".to_string(),
            ArgValue::new("int".to_string(), bind_for_test(value::<i32>(), 5)),
        )]);
        let outcome = Outcome::new(entries, Vec::default());
        outcome["int"].of::<f32>();
    }

    #[test]
    fn tail_hand_off() {
        let outcome = Outcome::new(
            HashMap::default(),
            vec!["-v".to_string(), "2".to_string()],
        );
        assert_eq!(outcome.tail(), &["-v".to_string(), "2".to_string()]);
    }
}
