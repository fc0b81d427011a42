use std::collections::HashSet;

use crate::model::{expects, Limits, Sensing};
use crate::value::bind::Field;
use crate::value::probe::Shape;

/// A borrowed token window plus the boundary-sensing policy in effect.
///
/// The tokens are one appearance's candidate values; slicing produces
/// sub-windows for nested shapes without copying.
#[derive(Clone, Copy)]
pub struct Args<'a> {
    tokens: &'a [&'a str],
    sensing: Sensing,
    names: Option<&'a HashSet<String>>,
}

impl<'a> Args<'a> {
    /// Wrap a token slice with a sensing policy and (for name-sensitive
    /// parsing) the registered-name table.
    pub fn new(tokens: &'a [&'a str], sensing: Sensing, names: Option<&'a HashSet<String>>) -> Self {
        Self {
            tokens,
            sensing,
            names,
        }
    }

    /// Plain lenient window over a token slice.
    pub fn plain(tokens: &'a [&'a str]) -> Self {
        Self::new(tokens, Sensing::Lenient, None)
    }

    /// Window length.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Is the window empty?
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.tokens.get(index).copied()
    }

    /// Sub-window starting at `from`.
    pub fn skip(&self, from: usize) -> Args<'a> {
        Args {
            tokens: &self.tokens[from.min(self.tokens.len())..],
            ..*self
        }
    }

    /// The first `count` tokens, rendered for diagnostics.
    pub(crate) fn quoted(&self, count: usize) -> Vec<String> {
        self.tokens[..count.min(self.tokens.len())]
            .iter()
            .map(|token| format!("\"{token}\""))
            .collect()
    }

    /// Does `token` match a registered name under name-sensitive parsing?
    pub(crate) fn is_registered(&self, token: &str) -> bool {
        matches!(self.sensing, Sensing::ByName)
            && self.names.map_or(false, |names| names.contains(token))
    }

    /// Does `token` end value consumption before any conversion is attempted?
    /// Option-syntax tokens end flat container runs in every mode except
    /// at-eof; registered names additionally end runs in name-sensitive mode.
    pub(crate) fn is_boundary(&self, token: &str) -> bool {
        match self.sensing {
            Sensing::AtEof => false,
            Sensing::Lenient => looks_like_option(token),
            Sensing::ByName => looks_like_option(token) || self.is_registered(token),
        }
    }
}

/// Option syntax: `-`-prefixed, more than a bare dash, and not a negative
/// number.
pub(crate) fn looks_like_option(token: &str) -> bool {
    let mut chars = token.chars();
    if chars.next() != Some('-') {
        return false;
    }
    match chars.next() {
        None => false,
        Some(c) => !c.is_ascii_digit() && c != '.',
    }
}

/// Strip the literal-escape prefix: `\-x` binds the string `-x`.
pub(crate) fn strip_escape(token: &str) -> &str {
    match token.strip_prefix(crate::constant::ESCAPE) {
        Some(rest) if rest.starts_with('-') => rest,
        _ => token,
    }
}

struct Scope {
    name: String,
    prefix: String,
    suffix: String,
}

/// The live cursor over one appearance's token window.
///
/// Tracks how many slots were taken, the effective limit (shrunk when a
/// boundary terminates consumption), the required/optional mark, and the
/// name-scope stack used to compose dotted/bracketed paths for errors.
pub struct Window<'a> {
    args: Args<'a>,
    limit: usize,
    taken: usize,
    required_mark: Option<usize>,
    scopes: Vec<Scope>,
    errors: Vec<String>,
}

impl<'a> Window<'a> {
    pub(crate) fn new(args: Args<'a>) -> Self {
        Self {
            limit: args.len(),
            args,
            taken: 0,
            required_mark: None,
            scopes: Vec::default(),
            errors: Vec::default(),
        }
    }

    /// Mark the current consumption point as the least-required count.
    pub(crate) fn set_optional(&mut self) {
        if self.required_mark.is_none() {
            self.required_mark = Some(self.taken);
        }
    }

    pub(crate) fn is_optional(&self) -> bool {
        self.required_mark.is_some()
    }

    /// Claim the next token slot. Absent tokens error unless the window has
    /// passed its optional mark; the slot is counted either way so the
    /// expected width keeps accumulating.
    pub(crate) fn alloc(&mut self, name: &str, expected: &str) -> Option<&'a str> {
        if self.taken < self.limit {
            let token = self.args.get(self.taken);
            self.taken += 1;
            token
        } else {
            if !self.is_optional() {
                let path = self.path(name);
                let mut message = format!("a(n) '{expected}' value is required");
                if !path.is_empty() {
                    message.push_str(&format!(" as '{path}'"));
                }
                self.errors.push(message);
            }
            self.taken += 1;
            None
        }
    }

    /// Give back the most recently claimed token and stop consumption; every
    /// later slot behaves as absent.
    pub(crate) fn discontinue(&mut self) {
        self.limit = self.taken.saturating_sub(1);
    }

    /// Tokens actually consumed so far.
    pub(crate) fn consumed(&self) -> usize {
        self.taken.min(self.limit)
    }

    /// The unconsumed remainder as a sub-window.
    pub(crate) fn remaining(&self) -> Args<'a> {
        self.args.skip(self.consumed())
    }

    /// Account for tokens consumed by a nested composite field.
    pub(crate) fn advance(&mut self, count: usize) {
        self.taken += count;
    }

    /// Close the window: verify the window held at least the required count,
    /// and return the consumed total.
    pub(crate) fn submit(&mut self, name: &str) -> usize {
        if let Some(mark) = self.required_mark {
            if self.limit < mark {
                let limits = Limits::new(mark as u32, self.taken.max(mark) as u32);
                let mut message = String::new();
                if !name.is_empty() {
                    message.push_str(&format!("'{name}' "));
                }
                message.push_str(&expects(&limits, "value(s)", self.limit as u32));
                self.errors.push(message);
            }
        }
        self.consumed()
    }

    pub(crate) fn is_registered(&self, token: &str) -> bool {
        self.args.is_registered(token)
    }

    pub(crate) fn push_error(&mut self, error: String) {
        self.errors.push(error);
    }

    pub(crate) fn absorb(&mut self, errors: Vec<String>) {
        self.errors.extend(errors);
    }

    pub(crate) fn into_errors(self) -> Vec<String> {
        self.errors
    }

    /// Push a name scope; nested scopes compose prefixes/suffixes into paths
    /// like `MyStruct.offset` or `tuple<1>`.
    pub(crate) fn enter(
        &mut self,
        name: impl Into<String>,
        prefix: impl Into<String>,
        suffix: impl Into<String>,
    ) {
        self.scopes.push(Scope {
            name: name.into(),
            prefix: prefix.into(),
            suffix: suffix.into(),
        });
    }

    /// Pop the innermost name scope.
    pub(crate) fn leave(&mut self) {
        self.scopes.pop();
    }

    /// Compose the fully qualified path for `name` under the current scopes.
    pub(crate) fn path(&self, name: &str) -> String {
        let Some(first) = self.scopes.first() else {
            return name.to_string();
        };
        let mut out = first.name.clone();
        for pair in self.scopes.windows(2) {
            out.push_str(&pair[0].prefix);
            out.push_str(&pair[1].name);
            out.push_str(&pair[0].suffix);
        }
        if !name.is_empty() {
            let last = self.scopes.last().expect("scopes verified non-empty");
            out.push_str(&last.prefix);
            out.push_str(name);
            out.push_str(&last.suffix);
        }
        out
    }
}

/// The per-field binding handle handed to a record's `describe` walk.
///
/// One `describe` body serves two modes: probing (no tokens; records the
/// shape) and binding (consumes tokens). Keeping a single walk is what makes
/// the recorded arity and the real consumption agree by construction.
pub struct Fields<'w, 'a> {
    mode: Mode<'w, 'a>,
}

enum Mode<'w, 'a> {
    Probe(&'w mut Shape),
    Bind(&'w mut Window<'a>),
}

impl<'w, 'a> Fields<'w, 'a> {
    pub(crate) fn probe(shape: &'w mut Shape) -> Self {
        Self {
            mode: Mode::Probe(shape),
        }
    }

    pub(crate) fn bind(window: &'w mut Window<'a>) -> Self {
        Self {
            mode: Mode::Bind(window),
        }
    }

    /// Bind the next token(s) into `field`, falling back to `F::default()`
    /// when the field is past the optional mark. Returns whether a value was
    /// actually bound.
    pub fn assign<F: Field>(&mut self, field: &mut F, name: &str) -> bool {
        self.assign_or_else(field, name, None)
    }

    /// Like [`Fields::assign`], with an explicit fallback value.
    pub fn assign_or<F: Field>(&mut self, field: &mut F, name: &str, default: F) -> bool {
        self.assign_or_else(field, name, Some(default))
    }

    fn assign_or_else<F: Field>(&mut self, field: &mut F, name: &str, default: Option<F>) -> bool {
        match &mut self.mode {
            Mode::Probe(shape) => {
                let mut sub = Shape::default();
                F::probe(&mut sub);
                shape.merge(sub);
                false
            }
            Mode::Bind(window) => field.assign(window, name, default),
        }
    }

    /// Record `message` as an error if `condition` is false. Field-level
    /// custom invariants, independent of the constraint engine.
    pub fn check(&mut self, condition: bool, message: impl Into<String>) {
        if let Mode::Bind(window) = &mut self.mode {
            if !condition {
                window.push_error(message.into());
            }
        }
    }

    /// Mark the boundary: fields assigned before this call are mandatory,
    /// fields after it are optional with defaults.
    pub fn set_optional(&mut self) {
        match &mut self.mode {
            Mode::Probe(shape) => shape.set_optional(),
            Mode::Bind(window) => window.set_optional(),
        }
    }
}
