use std::marker::PhantomData;

use regex::Regex;

use crate::model::{Limits, Sensing};
use crate::value::{Parse, Seen, Tuple};

type Predicate<U> = Box<dyn Fn(&U) -> bool>;
type Examine<U> = Box<dyn Fn(&mut U, &Seen<'_>) -> bool>;

/// The constraint set applied to each bound unit: membership in a choice set,
/// membership in inclusive ranges (or a regex for strings), and a custom
/// predicate. Choices and ranges are OR-combined; the predicate is
/// AND-combined on top.
#[derive(Default)]
pub struct Checker<U> {
    choices: Option<(Predicate<U>, String)>,
    ranges: Option<(Predicate<U>, String)>,
    examine: Option<(Examine<U>, String)>,
}

impl<U> Checker<U> {
    /// Is any constraint configured?
    pub fn active(&self) -> bool {
        self.choices.is_some() || self.ranges.is_some() || self.examine.is_some()
    }

    /// The composed constraint description, e.g.
    /// `(in set:{1, 3, 5} or within ranges:[(10, 20)]) and 'odd number'`.
    pub fn describe(&self) -> String {
        let mut desc = String::new();
        if let Some((_, choices)) = &self.choices {
            desc.push_str(&format!("in set:{choices}"));
        }
        if let Some((_, ranges)) = &self.ranges {
            if !desc.is_empty() {
                desc.push_str(" or ");
            }
            desc.push_str(ranges);
        }
        if let Some((_, examine)) = &self.examine {
            if self.choices.is_some() && self.ranges.is_some() {
                desc = format!("({desc})");
            }
            if !desc.is_empty() {
                desc.push_str(" and ");
            }
            desc.push_str(&format!("'{examine}'"));
        }
        desc
    }

    /// Evaluate the constraints against `value`; a failure returns the
    /// composed detail message.
    pub(crate) fn check(&self, value: &mut U, seen: &Seen<'_>) -> Option<String> {
        let mut admitted = false;
        if let Some((is_choice, _)) = &self.choices {
            if is_choice(value) {
                admitted = true;
            }
        }
        if !admitted {
            if let Some((in_range, _)) = &self.ranges {
                if in_range(value) {
                    admitted = true;
                }
            }
        }
        if (self.choices.is_some() || self.ranges.is_some()) && !admitted {
            return Some(format!("should meet constraint: {}", self.describe()));
        }
        if let Some((examine, _)) = &self.examine {
            if !examine(value, seen) {
                return Some(format!("should meet constraint: {}", self.describe()));
            }
        }
        None
    }
}

// Post-monomorphization guard replacing the original's nesting static_assert.
struct WellFormed<T: Parse>(PhantomData<T>);

impl<T: Parse> WellFormed<T> {
    const CHECK: () = assert!(
        T::LEGAL,
        "vectors of vectors of tuples are not supported"
    );
}

/// Start a value descriptor for the declared shape `T`.
pub fn value<T: Parse>() -> Spec<T> {
    #[allow(clippy::let_unit_value)]
    let _legal = WellFormed::<T>::CHECK;
    Spec {
        positional: false,
        hidden: false,
        stop_at_eof: false,
        sensing: None,
        default_value: None,
        implicit_value: T::preset_implicit(),
        implicit_overridden: false,
        appears: Limits::new(0, if T::CONTAINER { u32::MAX } else { 1 }),
        width: Limits::new(T::WIDTH.0, T::WIDTH.1),
        checker: Checker::default(),
        range_pairs: Vec::default(),
    }
}

/// The immutable per-argument value descriptor: shape, flags, defaults, both
/// dimension bounds, and the constraint set. Built fluently at definition
/// time; read-only during parsing.
pub struct Spec<T: Parse> {
    positional: bool,
    hidden: bool,
    stop_at_eof: bool,
    sensing: Option<Sensing>,
    default_value: Option<T>,
    implicit_value: Option<T::Implicit>,
    implicit_overridden: bool,
    appears: Limits,
    width: Limits,
    checker: Checker<T::Unit>,
    range_pairs: Vec<(T::Unit, T::Unit)>,
}

impl<T: Parse> Spec<T> {
    /// Fill this argument from bare tokens, in declaration order.
    pub fn positional(mut self) -> Self {
        self.positional = true;
        self
    }

    /// Require at least one appearance.
    pub fn required(mut self) -> Self {
        self.appears.at_least = 1;
        self
    }

    /// Value synthesized when the flag never appears at all.
    pub fn default_value(mut self, value: impl Into<T>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Value substituted when the flag appears with fewer trailing tokens
    /// than its minimum width.
    pub fn implicit_value(mut self, value: impl Into<T::Implicit>) -> Self {
        let value = value.into();
        if let Some(complement) = T::implicit_complement(&value) {
            self.default_value = Some(complement);
        }
        if T::IMPLICIT_RELAXES_WIDTH {
            self.width.at_least = 0;
        }
        self.implicit_value = Some(value);
        self.implicit_overridden = true;
        self
    }

    /// Exclude this argument from help output.
    pub fn hide(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Absorb raw tokens until the bare `--` delimiter.
    pub fn stop_at_eof(mut self) -> Self {
        self.stop_at_eof = true;
        self
    }

    /// Name-sensitive boundary sensing for this argument only.
    pub fn sensitive(mut self) -> Self {
        self.sensing = Some(Sensing::ByName);
        self
    }

    /// Custom predicate over each bound unit; AND-combined with the other
    /// constraints.
    pub fn examine(
        mut self,
        predicate: impl Fn(&mut T::Unit) -> bool + 'static,
        desc: impl Into<String>,
    ) -> Self {
        self.checker.examine = Some((
            Box::new(move |value: &mut T::Unit, _: &Seen<'_>| predicate(value)),
            desc.into(),
        ));
        self
    }

    /// Custom predicate that also receives the in-progress container, for
    /// cross-element invariants.
    pub fn examine_with(
        mut self,
        predicate: impl Fn(&mut T::Unit, &Seen<'_>) -> bool + 'static,
        desc: impl Into<String>,
    ) -> Self {
        self.checker.examine = Some((Box::new(predicate), desc.into()));
        self
    }
}

impl<T: Parse> Spec<T>
where
    T::Unit: PartialEq,
{
    /// Admit only units from `options`.
    pub fn choices(mut self, options: impl IntoIterator<Item = T::Unit>) -> Self {
        let options: Vec<T::Unit> = options.into_iter().collect();
        let rendered: Vec<String> = options.iter().map(Parse::render).collect();
        let desc = format!("{{{}}}", rendered.join(", "));
        self.checker.choices = Some((
            Box::new(move |value: &T::Unit| options.iter().any(|option| option == value)),
            desc,
        ));
        self
    }
}

impl<T: Parse> Spec<T>
where
    T::Unit: PartialOrd,
{
    /// Admit units within `[at_least, at_most]`; repeatable, accumulating
    /// intervals.
    pub fn range(self, at_least: T::Unit, at_most: T::Unit) -> Self {
        self.ranges(vec![(at_least, at_most)])
    }

    /// Admit units within any of the inclusive intervals; repeatable,
    /// accumulating.
    pub fn ranges(mut self, pairs: Vec<(T::Unit, T::Unit)>) -> Self {
        self.range_pairs.extend(pairs);
        let rendered: Vec<String> = self
            .range_pairs
            .iter()
            .map(|(lo, hi)| format!("({}, {})", lo.render(), hi.render()))
            .collect();
        let desc = format!("within ranges:[{}]", rendered.join(", "));
        let pairs = self.range_pairs.clone();
        self.checker.ranges = Some((
            Box::new(move |value: &T::Unit| {
                pairs.iter().any(|(lo, hi)| value >= lo && value <= hi)
            }),
            desc,
        ));
        self
    }
}

impl<T: Parse<Unit = String>> Spec<T> {
    /// Admit strings fully matching `pattern`; pass an empty `desc` for the
    /// default `match regex:"<pattern>"` description.
    pub fn regex(mut self, pattern: &str, desc: impl Into<String>) -> Self {
        let mut desc = desc.into();
        if desc.is_empty() {
            desc = format!("match regex:\"{pattern}\"");
        }
        let matcher: Predicate<String> = match Regex::new(&format!("^(?:{pattern})$")) {
            Ok(compiled) => Box::new(move |value: &String| compiled.is_match(value)),
            // an uncompilable pattern admits nothing
            Err(_) => Box::new(|_| false),
        };
        self.checker.ranges = Some((matcher, desc));
        self
    }
}

impl<T: Parse> Spec<T>
where
    T::Unit: Tuple,
{
    /// Lower the per-appearance width minimum: how many leading tuple
    /// elements must be supplied.
    pub fn line_width(mut self, at_least: u32) -> Self {
        self.width.at_least = at_least;
        self
    }
}

impl<A: crate::value::Element> Spec<Vec<A>> {
    /// Exactly `count` appearances (and, for flat vectors, at most `count`
    /// values per appearance).
    pub fn data_count(mut self, count: u32) -> Self {
        self.appears = Limits::exactly(count);
        if A::ATOM {
            self.width = Limits::new(1, count);
        }
        self
    }

    /// Between `at_least` and `at_most` appearances.
    pub fn data_count_between(mut self, at_least: u32, at_most: u32) -> Self {
        self.appears = Limits::new(at_least, at_most);
        if A::ATOM {
            self.width = Limits::new(1, at_most);
        }
        self
    }
}

impl<A: crate::value::Atom + crate::value::Field + crate::value::Element> Spec<Vec<Vec<A>>> {
    /// Exactly `width` values per row.
    pub fn row_width(mut self, width: u32) -> Self {
        self.width = Limits::exactly(width);
        self
    }

    /// Between `at_least` and `at_most` values per row.
    pub fn row_width_between(mut self, at_least: u32, at_most: u32) -> Self {
        self.width = Limits::new(at_least, at_most);
        self
    }
}

impl<T: Parse> Spec<T> {
    pub(crate) fn appears(&self) -> Limits {
        self.appears
    }

    pub(crate) fn width(&self) -> Limits {
        self.width
    }

    pub(crate) fn is_positional(&self) -> bool {
        self.positional
    }

    pub(crate) fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub(crate) fn stops_at_eof(&self) -> bool {
        self.stop_at_eof
    }

    pub(crate) fn sensing(&self) -> Option<Sensing> {
        self.sensing
    }

    pub(crate) fn default_ref(&self) -> Option<&T> {
        self.default_value.as_ref()
    }

    pub(crate) fn implicit_ref(&self) -> Option<&T::Implicit> {
        self.implicit_value.as_ref()
    }

    pub(crate) fn checker_ref(&self) -> Option<&Checker<T::Unit>> {
        if self.checker.active() {
            Some(&self.checker)
        } else {
            None
        }
    }

    pub(crate) fn checker(&self) -> &Checker<T::Unit> {
        &self.checker
    }

    /// The help `value:` line: shape, dimension summary, default/implicit.
    pub(crate) fn data_desc(&self) -> String {
        if T::FLAG && !self.implicit_overridden {
            return String::new();
        }
        let mut out = format!("'{}'", T::describe());
        if T::CONTAINER {
            out.push_str(&self.appears.compact());
            if T::UNIT_CONTAINER || T::TUPLE_UNIT {
                out.push_str(&self.width.compact());
            }
        } else if T::TUPLE_UNIT {
            out.push_str(&self.width.compact());
        } else if self.appears.at_least > 0 {
            out.push_str("[required]");
        } else {
            out.push_str("[optional]");
        }
        if let Some(default) = &self.default_value {
            out.push_str(&format!("; default:{}", default.render()));
        }
        if let Some(implicit) = &self.implicit_value {
            out.push_str(&format!("; implicit:{}", implicit.render()));
        }
        out
    }
}
