use std::any::Any;
use std::collections::{BTreeMap, HashMap};

use crate::descriptor::Checker;
use crate::model::{expects, Limits};
use crate::value::atom::{format_error, Atom};
use crate::value::probe::Shape;
use crate::value::window::{strip_escape, Args, Fields, Window};

/// Read-only view of the container being accumulated, handed to cross-element
/// constraint predicates (e.g. "ranges must not overlap" across accepted
/// vector items).
#[derive(Clone, Copy, Default)]
pub struct Seen<'a> {
    container: Option<&'a dyn Any>,
}

impl<'a> Seen<'a> {
    /// No container context.
    pub fn none() -> Self {
        Self { container: None }
    }

    /// View of `container`.
    pub fn of<C: 'static>(container: &'a C) -> Self {
        Self {
            container: Some(container),
        }
    }

    /// Downcast to the concrete container type.
    pub fn peek<C: 'static>(&self) -> Option<&'a C> {
        self.container.and_then(|c| c.downcast_ref::<C>())
    }
}

/// Outcome of one appearance-unit parse: how many tokens were consumed and
/// how many values were actually bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Take {
    /// Tokens consumed from the window.
    pub tokens: usize,
    /// Values bound (elements for flat runs, whole units otherwise).
    pub values: u32,
}

/// One appearance-unit parse request threaded through the recursive descent.
pub struct Request<'r, T: Parse> {
    /// Qualified base name for error paths; empty at the outermost level.
    pub name: String,
    /// Width lower bound for this unit.
    pub at_least: u32,
    /// Width upper bound for this unit.
    pub at_most: u32,
    /// Constraints applied to each bound unit.
    pub checker: Option<&'r Checker<T::Unit>>,
    /// Implicit value available to fill missing suffix slots.
    pub implicit: Option<&'r T::Implicit>,
    /// Already-accepted sibling values, for cross-element predicates.
    pub seen: Seen<'r>,
}

impl<'r, T: Parse> Request<'r, T> {
    /// Request with no constraints, implicit source, or sibling context.
    pub fn bare(name: impl Into<String>, at_least: u32, at_most: u32) -> Self {
        Self {
            name: name.into(),
            at_least,
            at_most,
            checker: None,
            implicit: None,
            seen: Seen::none(),
        }
    }
}

/// The recursive dispatcher capability: every shape the engine can bind from
/// a token window implements this, resolved statically at the declaration
/// site.
pub trait Parse: Clone + Default + 'static {
    /// The per-appearance unit constraints apply to: `Self` for scalars,
    /// tuples and records; the element for vectors; the mapped unit for maps.
    type Unit: Parse;
    /// Implicit-value payload when this shape backs an argument directly.
    type Implicit: Parse;
    /// Implicit-value payload when this shape is a vector's element.
    type ElementImplicit: Parse;

    /// Single-token leaf.
    const ATOM: bool = false;
    /// Repeatable container (vector or map).
    const CONTAINER: bool = false;
    /// Flag-like: appears without consuming separate tokens (bool only).
    const FLAG: bool = false;
    /// The per-appearance unit is a tuple.
    const TUPLE_UNIT: bool = false;
    /// The per-appearance unit is itself a container.
    const UNIT_CONTAINER: bool = false;
    /// Default width bounds for one appearance.
    const WIDTH: (u32, u32);
    /// Whether registering an implicit value relaxes the width minimum to 0,
    /// letting the flag appear bare.
    const IMPLICIT_RELAXES_WIDTH: bool;
    /// Nesting admissibility; vectors of vectors of tuples are rejected at
    /// descriptor construction.
    const LEGAL: bool = true;

    /// Canonical shape description, e.g. `vector<f32>` or `{string, f32[, i32]}`.
    fn describe() -> String;

    /// Diagnostic rendering of a bound value.
    fn render(&self) -> String;

    /// Implicit value established at descriptor construction time.
    fn preset_implicit() -> Option<Self::Implicit> {
        None
    }

    /// Default paired with an explicitly registered implicit value.
    fn implicit_complement(implicit: &Self::Implicit) -> Option<Self> {
        let _ = implicit;
        None
    }

    /// Consume one appearance-unit from the window.
    fn parse(&mut self, args: Args<'_>, errors: &mut Vec<String>, req: Request<'_, Self>) -> Take;
}

/// Shapes that may occupy slots inside a tuple or record domain.
pub trait Field: Parse {
    /// Record this shape's slots into `shape` without consuming tokens.
    fn probe(shape: &mut Shape);

    /// Bind one field inside an enclosing domain window. Returns whether a
    /// value was actually bound (false on fallback-to-default).
    fn assign(&mut self, window: &mut Window<'_>, name: &str, default: Option<Self>) -> bool;
}

/// Shapes admissible as vector elements or map values: every [`Field`], plus
/// one container level. Deeper nesting is rejected at descriptor
/// construction.
pub trait Element: Parse {
    /// Bridge an enclosing vector's implicit payload to this element's own.
    fn element_implicit(outer: &Self::ElementImplicit) -> Option<&Self::Implicit>;

    /// Slots available for index-aligned padding of a flat run.
    fn pad_slice(outer: &Self::ElementImplicit) -> &[Self] {
        let _ = outer;
        &[]
    }

    /// Whether `Vec<Self>` is its own element-implicit payload (flat runs).
    fn vec_as_own_implicit(vec: &Vec<Self>) -> Option<&Self::ElementImplicit> {
        let _ = vec;
        None
    }

    /// Merge a repeated map key's value into the existing bucket; `false`
    /// leaves the bucket untouched and reports the repeat.
    fn merge(bucket: &mut Self, value: Self) -> bool {
        let _ = (bucket, value);
        false
    }
}

/// Marker for tuple shapes; gates the tuple-only builder surface.
pub trait Tuple: Parse {}

/// One user-described aggregate: a named field sequence bound in declaration
/// order.
pub trait Record: Clone + Default + 'static {
    /// Domain name used in error paths when the record is outermost.
    const TYPE_NAME: &'static str;

    /// Walk the fields in declaration order. The same walk serves shape
    /// probing and real binding.
    fn describe(&mut self, fields: &mut Fields<'_, '_>);

    /// Diagnostic rendering, e.g. `{.name="x", .gain=1.5}`.
    fn render(&self) -> String;
}

/// Bind one atom field: claim a slot, screen for consumption boundaries,
/// convert, and fall back to the default on termination or absence.
pub(crate) fn assign_atom<A>(
    value: &mut A,
    window: &mut Window<'_>,
    name: &str,
    default: Option<A>,
) -> bool
where
    A: Atom + Parse,
{
    let Some(token) = window.alloc(name, &A::expected()) else {
        *value = default.unwrap_or_default();
        return false;
    };
    if window.is_registered(token) {
        window.discontinue();
        *value = default.unwrap_or_default();
        return false;
    }
    match A::parse_atom(strip_escape(token)) {
        Ok(parsed) => {
            *value = parsed;
            true
        }
        Err(expected) => {
            if token.len() > 1 && token.starts_with('-') {
                // an option-looking token ends consumption instead of erroring
                window.discontinue();
                *value = default.unwrap_or_default();
            } else {
                let path = window.path(name);
                window.push_error(format_error(token, &expected, &path));
            }
            false
        }
    }
}

/// Shared appearance-unit driver for window-walked shapes (atoms, records):
/// run the walk, close the window, decide between real errors and the
/// implicit fallback, then apply constraints.
pub(crate) fn parse_with<T>(
    value: &mut T,
    args: Args<'_>,
    errors: &mut Vec<String>,
    req: Request<'_, T>,
    walk: impl FnOnce(&mut T, &mut Window<'_>),
) -> Take
where
    T: Parse<Unit = T, Implicit = T>,
{
    let mut window = Window::new(args);
    if req.at_least < 1 {
        window.set_optional();
    }
    walk(value, &mut window);
    let consumed = window.submit(&req.name);
    let local = window.into_errors();
    let mut bound = consumed > 0;
    if consumed > 0 || req.at_least > 0 {
        errors.extend(local);
    } else if let Some(implicit) = req.implicit {
        *value = implicit.clone();
        bound = true;
    } else {
        errors.extend(local);
        return Take {
            tokens: consumed,
            values: 0,
        };
    }
    if let Some(checker) = req.checker {
        if let Some(detail) = checker.check(value, &req.seen) {
            let shown = match consumed {
                0 => value.render(),
                1 => args.get(0).map(str::to_string).unwrap_or_default(),
                _ => format!("[{}]", args.quoted(consumed).join(", ")),
            };
            errors.push(format!("invalid value '{shown}', {detail}"));
        }
    }
    Take {
        tokens: consumed,
        values: u32::from(bound),
    }
}

/// Parse one record appearance: scope the domain, walk the description.
#[doc(hidden)]
pub fn parse_record<T>(
    value: &mut T,
    args: Args<'_>,
    errors: &mut Vec<String>,
    req: Request<'_, T>,
) -> Take
where
    T: Record + Parse<Unit = T, Implicit = T>,
{
    let scope = if req.name.is_empty() {
        T::TYPE_NAME.to_string()
    } else {
        req.name.clone()
    };
    parse_with(value, args, errors, req, move |record, window| {
        window.enter(scope, ".", "");
        let mut fields = Fields::bind(&mut *window);
        record.describe(&mut fields);
        window.leave();
    })
}

/// Walk a record description in probe mode, recording its slots.
#[doc(hidden)]
pub fn probe_record<T: Record>(shape: &mut Shape) {
    let mut scratch = T::default();
    let mut fields = Fields::probe(shape);
    scratch.describe(&mut fields);
}

/// The braced description of a record shape, e.g. `{string, f32[, i32]}`.
#[doc(hidden)]
pub fn record_description<T: Record>() -> String {
    let mut shape = Shape::default();
    probe_record::<T>(&mut shape);
    shape.braced()
}

/// Bind one composite field (tuple or record) inside an enclosing domain:
/// probe its width, parse it over the remaining window, account for the
/// consumption.
#[doc(hidden)]
pub fn assign_composite<F: Field>(
    field: &mut F,
    window: &mut Window<'_>,
    name: &str,
    default: Option<F>,
) -> bool {
    let mut shape = Shape::default();
    F::probe(&mut shape);
    let needed = if window.is_optional() {
        0
    } else {
        shape.required() as u32
    };
    let sub = window.remaining();
    let mut local = Vec::new();
    let take = field.parse(
        sub,
        &mut local,
        Request::bare(window.path(name), needed, shape.total() as u32),
    );
    window.advance(take.tokens);
    window.absorb(local);
    if take.tokens == 0 {
        if let Some(d) = default {
            *field = d;
        }
        false
    } else {
        true
    }
}

macro_rules! atom_shapes {
    ($($ty:ty),+ $(,)?) => {$(
        impl Parse for $ty {
            type Unit = $ty;
            type Implicit = $ty;
            type ElementImplicit = Vec<$ty>;
            const ATOM: bool = true;
            const WIDTH: (u32, u32) = (1, 1);
            const IMPLICIT_RELAXES_WIDTH: bool = true;

            fn describe() -> String {
                <$ty as Atom>::NAME.to_string()
            }

            fn render(&self) -> String {
                format!("{}", self)
            }

            fn parse(
                &mut self,
                args: Args<'_>,
                errors: &mut Vec<String>,
                req: Request<'_, Self>,
            ) -> Take {
                let name = req.name.clone();
                parse_with(self, args, errors, req, move |value, window| {
                    Field::assign(value, window, &name, None);
                })
            }
        }

        impl Field for $ty {
            fn probe(shape: &mut Shape) {
                shape.slot(<$ty as Atom>::NAME);
            }

            fn assign(
                &mut self,
                window: &mut Window<'_>,
                name: &str,
                default: Option<Self>,
            ) -> bool {
                assign_atom(self, window, name, default)
            }
        }

        impl Element for $ty {
            fn element_implicit(_outer: &Vec<$ty>) -> Option<&$ty> {
                None
            }

            fn pad_slice(outer: &Vec<$ty>) -> &[$ty] {
                outer
            }

            fn vec_as_own_implicit(vec: &Vec<$ty>) -> Option<&Vec<$ty>> {
                Some(vec)
            }
        }
    )+};
}

atom_shapes!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

impl Parse for String {
    type Unit = String;
    type Implicit = String;
    type ElementImplicit = Vec<String>;
    const ATOM: bool = true;
    const WIDTH: (u32, u32) = (1, 1);
    const IMPLICIT_RELAXES_WIDTH: bool = true;

    fn describe() -> String {
        <String as Atom>::NAME.to_string()
    }

    fn render(&self) -> String {
        format!("\"{}\"", self)
    }

    fn parse(&mut self, args: Args<'_>, errors: &mut Vec<String>, req: Request<'_, Self>) -> Take {
        let name = req.name.clone();
        parse_with(self, args, errors, req, move |value, window| {
            Field::assign(value, window, &name, None);
        })
    }
}

impl Field for String {
    fn probe(shape: &mut Shape) {
        shape.slot(<String as Atom>::NAME);
    }

    fn assign(&mut self, window: &mut Window<'_>, name: &str, default: Option<Self>) -> bool {
        assign_atom(self, window, name, default)
    }
}

impl Element for String {
    fn element_implicit(_outer: &Vec<String>) -> Option<&String> {
        None
    }

    fn pad_slice(outer: &Vec<String>) -> &[String] {
        outer
    }

    fn vec_as_own_implicit(vec: &Vec<String>) -> Option<&Vec<String>> {
        Some(vec)
    }
}

impl Parse for bool {
    type Unit = bool;
    type Implicit = bool;
    type ElementImplicit = Vec<bool>;
    const ATOM: bool = true;
    const FLAG: bool = true;
    const WIDTH: (u32, u32) = (0, 1);
    const IMPLICIT_RELAXES_WIDTH: bool = true;

    fn describe() -> String {
        <bool as Atom>::NAME.to_string()
    }

    fn render(&self) -> String {
        format!("{}", self)
    }

    fn preset_implicit() -> Option<bool> {
        Some(true)
    }

    fn implicit_complement(implicit: &bool) -> Option<bool> {
        Some(!*implicit)
    }

    fn parse(&mut self, args: Args<'_>, errors: &mut Vec<String>, req: Request<'_, Self>) -> Take {
        let name = req.name.clone();
        parse_with(self, args, errors, req, move |value, window| {
            Field::assign(value, window, &name, None);
        })
    }
}

impl Field for bool {
    fn probe(shape: &mut Shape) {
        shape.slot(<bool as Atom>::NAME);
    }

    fn assign(&mut self, window: &mut Window<'_>, name: &str, default: Option<Self>) -> bool {
        assign_atom(self, window, name, default)
    }
}

impl Element for bool {
    fn element_implicit(_outer: &Vec<bool>) -> Option<&bool> {
        None
    }

    fn pad_slice(outer: &Vec<bool>) -> &[bool] {
        outer
    }

    fn vec_as_own_implicit(vec: &Vec<bool>) -> Option<&Vec<bool>> {
        Some(vec)
    }
}

macro_rules! tuple_shapes {
    ($(($len:literal, $(($idx:tt $T:ident)),+));+ $(;)?) => {$(
        impl<$($T: Atom + Field),+> Parse for ($($T,)+) {
            type Unit = Self;
            type Implicit = Self;
            type ElementImplicit = Self;
            const TUPLE_UNIT: bool = true;
            const WIDTH: (u32, u32) = (1, $len);
            const IMPLICIT_RELAXES_WIDTH: bool = false;

            fn describe() -> String {
                format!("tuple<{}>", [$(<$T as Atom>::NAME),+].join(", "))
            }

            fn render(&self) -> String {
                format!("({})", [$(self.$idx.render()),+].join(", "))
            }

            fn parse(
                &mut self,
                args: Args<'_>,
                errors: &mut Vec<String>,
                req: Request<'_, Self>,
            ) -> Take {
                let base = if req.name.is_empty() {
                    "tuple".to_string()
                } else {
                    req.name.clone()
                };
                let mut consumed = 0usize;
                let mut local = Vec::new();
                $({
                    let mut element_errors = Vec::new();
                    let step = self.$idx.parse(
                        args.skip($idx),
                        &mut element_errors,
                        Request::bare(
                            format!("{base}<{}>", $idx),
                            if req.at_least > $idx { 1 } else { 0 },
                            1,
                        ),
                    );
                    if step.tokens > 0 || req.at_least > $idx {
                        local.extend(element_errors);
                    } else if let Some(implicit) = req.implicit {
                        self.$idx = implicit.$idx.clone();
                    }
                    consumed += step.tokens;
                })+
                let clean = local.is_empty();
                errors.extend(local);
                if clean {
                    if let Some(checker) = req.checker {
                        let failed = checker.check(self, &req.seen);
                        if let Some(detail) = failed {
                            errors.push(format!(
                                "invalid value '{}', {detail}",
                                Parse::render(self)
                            ));
                        }
                    }
                }
                Take {
                    tokens: consumed,
                    values: u32::from(consumed > 0),
                }
            }
        }

        impl<$($T: Atom + Field),+> Tuple for ($($T,)+) {}

        impl<$($T: Atom + Field),+> Field for ($($T,)+) {
            fn probe(shape: &mut Shape) {
                $(shape.slot(<$T as Atom>::NAME);)+
            }

            fn assign(
                &mut self,
                window: &mut Window<'_>,
                name: &str,
                default: Option<Self>,
            ) -> bool {
                assign_composite(self, window, name, default)
            }
        }

        impl<$($T: Atom + Field),+> Element for ($($T,)+) {
            fn element_implicit(outer: &Self) -> Option<&Self> {
                Some(outer)
            }
        }
    )+};
}

tuple_shapes! {
    (2, (0 A), (1 B));
    (3, (0 A), (1 B), (2 C));
    (4, (0 A), (1 B), (2 C), (3 D));
    (5, (0 A), (1 B), (2 C), (3 D), (4 E));
    (6, (0 A), (1 B), (2 C), (3 D), (4 E), (5 F))
}

impl<T: Element> Parse for Vec<T> {
    type Unit = T::Unit;
    type Implicit = T::ElementImplicit;
    type ElementImplicit = Vec<T>;
    const CONTAINER: bool = true;
    const TUPLE_UNIT: bool = T::TUPLE_UNIT;
    const UNIT_CONTAINER: bool = T::CONTAINER;
    const WIDTH: (u32, u32) = (1, if T::ATOM { u32::MAX } else { T::WIDTH.1 });
    const IMPLICIT_RELAXES_WIDTH: bool = T::IMPLICIT_RELAXES_WIDTH;
    const LEGAL: bool = T::LEGAL && !(T::CONTAINER && T::TUPLE_UNIT);

    fn describe() -> String {
        format!("vector<{}>", T::describe())
    }

    fn render(&self) -> String {
        let items: Vec<String> = self.iter().map(Parse::render).collect();
        format!("[{}]", items.join(", "))
    }

    fn parse(&mut self, args: Args<'_>, errors: &mut Vec<String>, req: Request<'_, Self>) -> Take {
        let base = if req.name.is_empty() {
            "vector".to_string()
        } else {
            req.name.clone()
        };
        if T::ATOM {
            // flat run: one token per element until the cap, the window's
            // end, or a boundary
            let mut consumed = 0usize;
            let mut bound: u32 = 0;
            while bound < req.at_most && (self.len() as u32) < req.at_most {
                let Some(next) = args.get(consumed) else {
                    break;
                };
                if args.is_boundary(next) {
                    break;
                }
                let mut unit = T::default();
                let mut local = Vec::new();
                let request = Request {
                    name: format!("{base}[{}]", self.len()),
                    at_least: if bound < req.at_least { 1 } else { 0 },
                    at_most: 1,
                    checker: req.checker,
                    implicit: None,
                    seen: Seen::of(&*self),
                };
                let step = unit.parse(args.skip(consumed), &mut local, request);
                if step.tokens == 0 {
                    break;
                }
                self.push(unit);
                consumed += step.tokens;
                bound += 1;
                errors.extend(local);
            }
            if bound < req.at_least {
                errors.push(expects(
                    &Limits::new(req.at_least, req.at_most),
                    "value(s)",
                    bound,
                ));
            } else if let Some(implicit) = req.implicit {
                let pad = T::pad_slice(implicit);
                while bound < req.at_most && (bound as usize) < pad.len() {
                    self.push(pad[bound as usize].clone());
                    bound += 1;
                }
            }
            Take {
                tokens: consumed,
                values: bound,
            }
        } else {
            // one unit per appearance
            let mut unit = T::default();
            let request = Request {
                name: format!("{base}[{}]", self.len()),
                at_least: req.at_least,
                at_most: req.at_most,
                checker: req.checker,
                implicit: req.implicit.and_then(T::element_implicit),
                seen: Seen::of(&*self),
            };
            let take = unit.parse(args, errors, request);
            self.push(unit);
            take
        }
    }
}

impl<T: Element> Element for Vec<T> {
    fn element_implicit(outer: &Vec<T>) -> Option<&T::ElementImplicit> {
        T::vec_as_own_implicit(outer)
    }

    fn merge(bucket: &mut Self, value: Self) -> bool {
        bucket.extend(value);
        true
    }
}

/// Parse one `key value-unit` pair for a map appearance.
fn parse_map_entry<K, V>(
    args: Args<'_>,
    errors: &mut Vec<String>,
    base: &str,
    at_least: u32,
    at_most: u32,
    checker: Option<&Checker<V::Unit>>,
    implicit: Option<&V::Implicit>,
) -> (Take, Option<(K, V)>)
where
    K: Atom + Parse,
    V: Element,
{
    let Some(token) = args.get(0) else {
        errors.push(format!(
            "a(n) '{}' value is required as '{base}.key'",
            K::expected()
        ));
        return (Take::default(), None);
    };
    let mut key_ok = true;
    let mut key = K::default();
    match K::parse_atom(strip_escape(token)) {
        Ok(parsed) => key = parsed,
        Err(expected) => {
            key_ok = false;
            errors.push(format_error(token, &expected, &format!("{base}.key")));
        }
    }
    let mut value = V::default();
    let mut local = Vec::new();
    let request = Request {
        name: format!("{base}[{}]", key.render()),
        at_least,
        at_most,
        checker,
        implicit,
        seen: Seen::none(),
    };
    let inner = value.parse(args.skip(1), &mut local, request);
    let take = Take {
        tokens: 1 + inner.tokens,
        values: inner.values,
    };
    if !local.is_empty() {
        errors.extend(local);
        return (take, None);
    }
    if key_ok {
        (take, Some((key, value)))
    } else {
        (take, None)
    }
}

macro_rules! map_shapes {
    ($($map:ident via $entry_mod:ident requiring $($kbound:path),+;)+) => {$(
        impl<K, V> Parse for $map<K, V>
        where
            K: Atom + Parse $(+ $kbound)+,
            V: Element,
        {
            type Unit = V::Unit;
            type Implicit = V::Implicit;
            type ElementImplicit = V::Implicit;
            const CONTAINER: bool = true;
            const TUPLE_UNIT: bool = V::TUPLE_UNIT;
            const UNIT_CONTAINER: bool = V::CONTAINER;
            const WIDTH: (u32, u32) = V::WIDTH;
            const IMPLICIT_RELAXES_WIDTH: bool = V::IMPLICIT_RELAXES_WIDTH;
            const LEGAL: bool = V::LEGAL;

            fn describe() -> String {
                format!("map<{}, {}>", <K as Atom>::NAME, V::describe())
            }

            fn render(&self) -> String {
                let mut items: Vec<String> = self
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k.render(), v.render()))
                    .collect();
                items.sort();
                format!("{{{}}}", items.join(", "))
            }

            fn parse(
                &mut self,
                args: Args<'_>,
                errors: &mut Vec<String>,
                req: Request<'_, Self>,
            ) -> Take {
                let base = if req.name.is_empty() {
                    "map".to_string()
                } else {
                    req.name.clone()
                };
                let (take, entry) = parse_map_entry::<K, V>(
                    args,
                    errors,
                    &base,
                    req.at_least,
                    req.at_most,
                    req.checker,
                    req.implicit,
                );
                if let Some((key, value)) = entry {
                    match self.entry(key) {
                        std::collections::$entry_mod::Entry::Occupied(mut occupied) => {
                            if !V::merge(occupied.get_mut(), value) {
                                errors.push(format!(
                                    "repeated {base}.key '{}'",
                                    occupied.key().render()
                                ));
                            }
                        }
                        std::collections::$entry_mod::Entry::Vacant(vacant) => {
                            vacant.insert(value);
                        }
                    }
                }
                take
            }
        }
    )+};
}

map_shapes! {
    HashMap via hash_map requiring Eq, std::hash::Hash;
    BTreeMap via btree_map requiring Ord;
}

/// Register the shape implementations for a [`Record`] type, making it usable
/// as an argument type, a domain field, a vector element, and a map value.
#[macro_export]
macro_rules! record_shape {
    ($ty:ty) => {
        impl $crate::Parse for $ty {
            type Unit = $ty;
            type Implicit = $ty;
            type ElementImplicit = $ty;
            const WIDTH: (u32, u32) = (1, u32::MAX);
            const IMPLICIT_RELAXES_WIDTH: bool = true;

            fn describe() -> ::std::string::String {
                $crate::record_description::<$ty>()
            }

            fn render(&self) -> ::std::string::String {
                <$ty as $crate::Record>::render(self)
            }

            fn parse(
                &mut self,
                args: $crate::Args<'_>,
                errors: &mut ::std::vec::Vec<::std::string::String>,
                req: $crate::Request<'_, Self>,
            ) -> $crate::Take {
                $crate::parse_record(self, args, errors, req)
            }
        }

        impl $crate::Field for $ty {
            fn probe(shape: &mut $crate::Shape) {
                $crate::probe_record::<$ty>(shape);
            }

            fn assign(
                &mut self,
                window: &mut $crate::Window<'_>,
                name: &str,
                default: ::std::option::Option<Self>,
            ) -> bool {
                $crate::assign_composite(self, window, name, default)
            }
        }

        impl $crate::Element for $ty {
            fn element_implicit(outer: &$ty) -> ::std::option::Option<&$ty> {
                ::std::option::Option::Some(outer)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn run<T: Parse>(value: &mut T, tokens: &[&str], req: Request<'_, T>) -> (Take, Vec<String>) {
        let mut errors = Vec::new();
        let take = value.parse(Args::plain(tokens), &mut errors, req);
        (take, errors)
    }

    #[test]
    fn scalar_binds_one_token() {
        let mut value = 0i32;
        let (take, errors) = run(&mut value, &["5", "9"], Request::bare("", 1, 1));
        assert_eq!(take, Take { tokens: 1, values: 1 });
        assert_eq!(value, 5);
        assert!(errors.is_empty());
    }

    #[test]
    fn scalar_negative_number_binds() {
        let mut value = 0i32;
        let (take, errors) = run(&mut value, &["-5"], Request::bare("", 1, 1));
        assert_eq!(take.tokens, 1);
        assert_eq!(value, -5);
        assert!(errors.is_empty());
    }

    #[test]
    fn scalar_missing_required() {
        let mut value = 0i32;
        let (take, errors) = run(&mut value, &[], Request::bare("", 1, 1));
        assert_eq!(take, Take { tokens: 0, values: 0 });
        assert_eq!(errors, vec!["a(n) 'i32' value is required".to_string()]);
    }

    #[test]
    fn scalar_missing_with_implicit() {
        let mut value = 0i32;
        let implicit = 2i32;
        let request = Request {
            implicit: Some(&implicit),
            ..Request::bare("", 0, 1)
        };
        let (take, errors) = run(&mut value, &[], request);
        assert_eq!(take, Take { tokens: 0, values: 1 });
        assert_eq!(value, 2);
        assert!(errors.is_empty());
    }

    #[test]
    fn scalar_format_error() {
        let mut value = 0i32;
        let (take, errors) = run(&mut value, &["five"], Request::bare("", 1, 1));
        assert_eq!(take.tokens, 1);
        assert_eq!(
            errors,
            vec!["format error: 'five', expect a(n) 'i32' value".to_string()]
        );
    }

    #[test]
    fn scalar_string_escape() {
        let mut value = String::new();
        let (take, errors) = run(&mut value, &["\\-x"], Request::bare("", 1, 1));
        assert_eq!(take.tokens, 1);
        assert_eq!(value, "-x");
        assert!(errors.is_empty());
    }

    #[test]
    fn tuple_full_round_trip() {
        let mut value = <(String, f32, i32)>::default();
        let (take, errors) = run(&mut value, &["name", "5.12", "2"], Request::bare("", 1, 3));
        assert_eq!(take, Take { tokens: 3, values: 1 });
        assert_eq!(value, ("name".to_string(), 5.12, 2));
        assert!(errors.is_empty());
    }

    #[test]
    fn tuple_trailing_optional_defaults() {
        let mut value = <(String, f32, i32)>::default();
        let (take, errors) = run(&mut value, &["name", "5.12"], Request::bare("", 2, 3));
        assert_eq!(take.tokens, 2);
        assert_eq!(value, ("name".to_string(), 5.12, 0));
        assert!(errors.is_empty());
    }

    #[test]
    fn tuple_under_required_reports_path() {
        let mut value = <(String, f32, i32)>::default();
        let (_, errors) = run(&mut value, &["name"], Request::bare("", 2, 3));
        assert!(errors
            .iter()
            .any(|e| e == "a(n) 'f32' value is required as 'tuple<1>'"));
    }

    #[test]
    fn tuple_implicit_fills_suffix() {
        let mut value = <(String, f32, i32)>::default();
        let implicit = ("name".to_string(), 5.12f32, 2i32);
        let request = Request {
            implicit: Some(&implicit),
            ..Request::bare("", 2, 3)
        };
        let (take, errors) = run(&mut value, &["data", "4.9"], request);
        assert_eq!(take.tokens, 2);
        assert_eq!(value, ("data".to_string(), 4.9, 2));
        assert!(errors.is_empty());
    }

    #[test]
    fn tuple_describe() {
        assert_eq!(<(String, f32, i32)>::describe(), "tuple<string, f32, i32>");
    }

    #[rstest]
    #[case(vec!["-1", "5.0"], vec![-1.0, 5.0], 2)]
    #[case(vec!["1.5", "-x", "2.0"], vec![1.5], 1)]
    fn vector_flat_stops_at_boundary(
        #[case] tokens: Vec<&str>,
        #[case] expected: Vec<f32>,
        #[case] count: usize,
    ) {
        let mut value: Vec<f32> = Vec::default();
        let (take, errors) = run(&mut value, &tokens, Request::bare("", 1, u32::MAX));
        assert_eq!(take.tokens, count);
        assert_eq!(value, expected);
        assert!(errors.is_empty());
    }

    #[test]
    fn vector_flat_under_minimum() {
        let mut value: Vec<f32> = Vec::default();
        let (_, errors) = run(&mut value, &["5.12"], Request::bare("", 2, 3));
        assert_eq!(errors, vec!["expects 2 ~ 3 value(s), but got 1".to_string()]);
    }

    #[test]
    fn vector_flat_pads_from_implicit() {
        let mut value: Vec<f32> = Vec::default();
        let implicit = vec![5.12f32, 2.0, -1.0];
        let request = Request {
            implicit: Some(&implicit),
            ..Request::bare("", 0, 3)
        };
        let (take, errors) = run(&mut value, &["1.1"], request);
        assert_eq!(take, Take { tokens: 1, values: 3 });
        assert_eq!(value, vec![1.1, 2.0, -1.0]);
        assert!(errors.is_empty());
    }

    #[test]
    fn vector_of_tuples_one_unit_per_appearance() {
        let mut value: Vec<(String, f32)> = Vec::default();
        let (take, errors) = run(
            &mut value,
            &["data", "1.5", "bin", "2.5"],
            Request::bare("", 1, 2),
        );
        assert_eq!(take.tokens, 2);
        assert_eq!(value, vec![("data".to_string(), 1.5)]);
        assert!(errors.is_empty());
    }

    #[test]
    fn vector_unit_paths_carry_index() {
        let mut value: Vec<(String, f32)> = vec![("a".to_string(), 1.0)];
        let (_, errors) = run(&mut value, &["bin"], Request::bare("", 2, 2));
        assert!(errors
            .iter()
            .any(|e| e == "a(n) 'f32' value is required as 'vector[1]<1>'"));
    }

    #[test]
    fn matrix_rows_bind_per_appearance() {
        let mut value: Vec<Vec<f32>> = Vec::default();
        let (take, errors) = run(&mut value, &["5.12", "2"], Request::bare("", 1, u32::MAX));
        assert_eq!(take.tokens, 2);
        assert_eq!(value, vec![vec![5.12, 2.0]]);
        assert!(errors.is_empty());
    }

    #[test]
    fn matrix_row_padding_from_implicit() {
        let mut value: Vec<Vec<f32>> = Vec::default();
        let implicit: Vec<f32> = vec![5.12, 2.0, -1.0];
        let request = Request {
            implicit: Some(&implicit),
            ..Request::bare("", 0, 3)
        };
        let (take, errors) = run(&mut value, &["1.1", "4.9"], request);
        assert_eq!(take.tokens, 2);
        assert_eq!(value, vec![vec![1.1, 4.9, -1.0]]);
        assert!(errors.is_empty());
    }

    #[test]
    fn map_scalar_entry() {
        let mut value: HashMap<String, i32> = HashMap::default();
        let (take, errors) = run(&mut value, &["key1", "5"], Request::bare("", 1, 1));
        assert_eq!(take, Take { tokens: 2, values: 1 });
        assert_eq!(value.get("key1"), Some(&5));
        assert!(errors.is_empty());
    }

    #[test]
    fn map_missing_key() {
        let mut value: HashMap<String, i32> = HashMap::default();
        let (take, errors) = run(&mut value, &[], Request::bare("", 1, 1));
        assert_eq!(take.tokens, 0);
        assert_eq!(
            errors,
            vec!["a(n) 'string' value is required as 'map.key'".to_string()]
        );
    }

    #[test]
    fn map_duplicate_scalar_key_rejected() {
        let mut value: HashMap<String, i32> = HashMap::from([("key1".to_string(), 5)]);
        let (_, errors) = run(&mut value, &["key1", "6"], Request::bare("", 1, 1));
        assert_eq!(errors, vec!["repeated map.key '\"key1\"'".to_string()]);
        assert_eq!(value.get("key1"), Some(&5));
    }

    #[test]
    fn map_vector_bucket_appends() {
        let mut value: BTreeMap<String, Vec<f32>> = BTreeMap::default();
        let (_, errors) = run(&mut value, &["k", "1.5"], Request::bare("", 1, u32::MAX));
        assert!(errors.is_empty());
        let (_, errors) = run(&mut value, &["k", "2.5"], Request::bare("", 1, u32::MAX));
        assert!(errors.is_empty());
        assert_eq!(value.get("k"), Some(&vec![1.5, 2.5]));
    }

    #[test]
    fn map_value_path_carries_key() {
        let mut value: HashMap<String, (String, f32)> = HashMap::default();
        let (_, errors) = run(&mut value, &["key2", "bin"], Request::bare("", 2, 2));
        assert!(errors
            .iter()
            .any(|e| e == "a(n) 'f32' value is required as 'map[\"key2\"]<1>'"));
    }

    #[test]
    fn seen_peeks_container() {
        let container = vec![1.0f32, 2.0];
        let seen = Seen::of(&container);
        assert_eq!(seen.peek::<Vec<f32>>(), Some(&container));
        assert_eq!(seen.peek::<Vec<i32>>(), None);
    }

    #[test]
    fn shape_descriptions() {
        assert_eq!(<Vec<f32>>::describe(), "vector<f32>");
        assert_eq!(
            <HashMap<String, Vec<f32>>>::describe(),
            "map<string, vector<f32>>"
        );
    }
}
