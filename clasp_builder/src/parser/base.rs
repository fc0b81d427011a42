use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

use crate::constant::EOF_DELIMITER;
use crate::descriptor::{value, Spec};
use crate::model::{expects, Sensing};
use crate::parser::printer;
use crate::parser::store::{ArgValue, Outcome};
use crate::value::{looks_like_option, Args, Parse, Request, Seen};

/// Type-erased view of a value descriptor, as stored in the argument table.
pub(crate) trait Described {
    fn binding(&self) -> Box<dyn Binds>;
    fn is_positional(&self) -> bool;
    fn is_hidden(&self) -> bool;
    fn stops_at_eof(&self) -> bool;
    fn sensing(&self) -> Option<Sensing>;
    fn has_constraint(&self) -> bool;
    fn constraint_desc(&self) -> String;
    fn data_desc(&self) -> String;
}

struct Shared<T: Parse>(Rc<Spec<T>>);

impl<T: Parse> Described for Shared<T> {
    fn binding(&self) -> Box<dyn Binds> {
        Box::new(Binding::fresh(Rc::clone(&self.0)))
    }

    fn is_positional(&self) -> bool {
        self.0.is_positional()
    }

    fn is_hidden(&self) -> bool {
        self.0.is_hidden()
    }

    fn stops_at_eof(&self) -> bool {
        self.0.stops_at_eof()
    }

    fn sensing(&self) -> Option<Sensing> {
        self.0.sensing()
    }

    fn has_constraint(&self) -> bool {
        self.0.checker().active()
    }

    fn constraint_desc(&self) -> String {
        self.0.checker().describe()
    }

    fn data_desc(&self) -> String {
        self.0.data_desc()
    }
}

/// Type-erased per-parse binding state: appearance accounting plus the
/// materialized value.
pub(crate) trait Binds {
    fn valid(&self) -> bool;
    fn appear_count(&self) -> u32;
    fn appear(&mut self, args: Args<'_>, bound: bool, errors: &mut Vec<String>) -> usize;
    fn finish(&mut self) -> Option<String>;
    fn value_any(&self) -> &dyn Any;
}

struct Binding<T: Parse> {
    spec: Rc<Spec<T>>,
    appear_count: u32,
    data_count: u32,
    value: T,
}

impl<T: Parse> Binding<T> {
    fn fresh(spec: Rc<Spec<T>>) -> Self {
        Self {
            spec,
            appear_count: 0,
            data_count: 0,
            value: T::default(),
        }
    }
}

impl<T: Parse> Binds for Binding<T> {
    fn valid(&self) -> bool {
        self.appear_count > 0
    }

    fn appear_count(&self) -> u32 {
        self.appear_count
    }

    fn appear(&mut self, args: Args<'_>, bound: bool, errors: &mut Vec<String>) -> usize {
        // flags never consume separate tokens; `=`-bound values they do take
        let args = if T::FLAG && !bound {
            args.skip(args.len())
        } else {
            args
        };
        self.appear_count += 1;
        let header = format!("[{}th appearance]: ", self.appear_count);
        let width = self.spec.width();
        if self.appear_count > self.spec.appears().at_most {
            let mut scratch = T::default();
            let mut sink = Vec::new();
            let take = scratch.parse(
                args,
                &mut sink,
                Request::bare(String::new(), width.at_least, width.at_most),
            );
            let mut message = String::from("too many appearances");
            let shown: Vec<String> = (0..take.tokens)
                .filter_map(|i| args.get(i))
                .map(|token| format!("'{token}'"))
                .collect();
            if !shown.is_empty() {
                message.push_str(&format!(" [{}]", shown.join(" ")));
            }
            errors.push(format!("{header}{message}"));
            return take.tokens;
        }
        let mut local = Vec::new();
        let request = Request {
            name: String::new(),
            at_least: width.at_least,
            at_most: width.at_most,
            checker: self.spec.checker_ref(),
            implicit: self.spec.implicit_ref(),
            seen: Seen::none(),
        };
        let take = self.value.parse(args, &mut local, request);
        errors.extend(local.into_iter().map(|e| format!("{header}{e}")));
        self.data_count += take.values;
        take.tokens
    }

    fn finish(&mut self) -> Option<String> {
        if self.data_count == 0 {
            if let Some(default) = self.spec.default_ref() {
                self.value = default.clone();
                self.appear_count = 1;
                return None;
            }
        }
        let appears = self.spec.appears();
        let (count, noun) = if T::UNIT_CONTAINER {
            (self.appear_count, "appearance(s)")
        } else {
            (self.data_count, "value(s)")
        };
        if count < appears.at_least {
            return Some(format!(": {}", expects(&appears, noun, count)));
        }
        None
    }

    fn value_any(&self) -> &dyn Any {
        &self.value
    }
}

#[cfg(test)]
pub(crate) fn bind_for_test<T: Parse>(spec: Spec<T>, value: T) -> Rc<dyn Binds> {
    Rc::new(Binding {
        spec: Rc::new(spec),
        appear_count: 1,
        data_count: 1,
        value,
    })
}

/// One registered argument: short flag, normalized long name, aliases,
/// description, and the erased descriptor.
pub(crate) struct ArgEntry {
    pub(crate) short: Option<char>,
    pub(crate) name: String,
    pub(crate) aliases: Vec<String>,
    pub(crate) help: String,
    pub(crate) spec: Box<dyn Described>,
}

impl ArgEntry {
    /// Combined label for messages, e.g. `-v, --vec`.
    pub(crate) fn label(&self) -> String {
        match self.short {
            Some(short) => format!("-{short}, {}", self.name),
            None => self.name.clone(),
        }
    }
}

#[derive(Clone)]
enum Target {
    Entry(usize),
    Unknown,
}

/// The command line parser: the argument-descriptor table plus the argv
/// dispatch loop.
///
/// Definition errors and user-input errors both accumulate on the parser;
/// `error()` is the single signal to check. The parser never prints and
/// never exits; help rendering and exit codes belong to the caller.
pub struct Parser {
    pub(crate) program: String,
    pub(crate) about: String,
    allow_unknown: bool,
    sensing: Sensing,
    pub(crate) width: Option<usize>,
    pub(crate) concise: bool,
    pub(crate) entries: Vec<ArgEntry>,
    lookup: HashMap<String, usize>,
    names: HashSet<String>,
    pub(crate) errors: Vec<String>,
}

impl Parser {
    /// Create a parser for `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            about: String::default(),
            allow_unknown: false,
            sensing: Sensing::default(),
            width: None,
            concise: false,
            entries: Vec::default(),
            lookup: HashMap::default(),
            names: HashSet::default(),
            errors: Vec::default(),
        }
    }

    /// One-line description shown at the top of the help text.
    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about = about.into();
        self
    }

    /// Swallow unrecognized flags (and their values) instead of erroring.
    pub fn allow_unknown(mut self) -> Self {
        self.allow_unknown = true;
        self
    }

    /// Name-sensitive boundary sensing for every argument: any registered
    /// name ends value consumption, even if it would convert.
    pub fn sensitive_mode(mut self) -> Self {
        self.sensing = Sensing::ByName;
        self
    }

    /// Fix the help-rendering width instead of asking the terminal.
    pub fn set_width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    /// Suppress the per-argument `value:`/`constraint:` help lines.
    pub fn concise_help(mut self) -> Self {
        self.concise = true;
        self
    }

    /// Start an argument-registration chain.
    pub fn add(&mut self) -> Adder<'_> {
        Adder { parser: self }
    }

    /// Any definition or parse errors so far?
    pub fn error(&self) -> bool {
        !self.errors.is_empty()
    }

    /// The accumulated errors, in discovery order.
    pub fn error_details(&self) -> &[String] {
        &self.errors
    }

    /// Render the help text.
    pub fn help(&self) -> String {
        printer::render_help(self)
    }

    /// Print the help text to stdout.
    pub fn print_help(&self) {
        print!("{}", self.help());
    }

    fn add_arg<T: Parse>(&mut self, short: Option<char>, name: &str, help: &str, spec: Spec<T>) {
        let header = format!("define[{}]:", self.entries.len());
        if name.is_empty() {
            self.errors.push(format!("{header} long name is required"));
            return;
        }
        if name == "-" || name == "--" {
            self.errors
                .push(format!("{header} invalid long name '{name}'"));
            return;
        }
        if let Some(c) = short {
            if c == '-' {
                self.errors
                    .push(format!("{header} invalid short name '{c}'"));
                return;
            }
            let key = format!("-{c}");
            if self.lookup.contains_key(&key) {
                self.errors
                    .push(format!("{header} short name '{key}' is already in use"));
                return;
            }
        }
        let long = normalize_long(name);
        if self.lookup.contains_key(&long) {
            self.errors
                .push(format!("{header} long name '{long}' is already in use"));
            return;
        }
        let index = self.entries.len();
        if let Some(c) = short {
            let key = format!("-{c}");
            self.lookup.insert(key.clone(), index);
            self.names.insert(key);
        }
        self.lookup.insert(long.clone(), index);
        self.names.insert(long.clone());
        self.entries.push(ArgEntry {
            short,
            name: long,
            aliases: Vec::default(),
            help: help.to_string(),
            spec: Box::new(Shared(Rc::new(spec))),
        });
    }

    fn add_alias(&mut self, alias: &str) {
        let Some(index) = self.entries.len().checked_sub(1) else {
            self.errors
                .push("define[0]: alias requires a preceding argument".to_string());
            return;
        };
        let header = format!("define[{index}]:");
        let long = normalize_long(alias);
        if long == "-" || long == "--" || alias.is_empty() {
            self.errors.push(format!("{header} invalid alias '{alias}'"));
            return;
        }
        if self.lookup.contains_key(&long) {
            self.errors
                .push(format!("{header} alias '{long}' is already in use"));
            return;
        }
        self.lookup.insert(long.clone(), index);
        self.names.insert(long.clone());
        self.entries[index].aliases.push(long);
    }

    /// Parse a token slice (program name excluded).
    pub fn parse(&mut self, argv: &[&str]) -> Outcome {
        self.parse_from(argv, 0)
    }

    /// Parse the process arguments.
    pub fn parse_args(&mut self) -> Outcome {
        let tokens: Vec<String> = std::env::args().skip(1).collect();
        let refs: Vec<&str> = tokens.iter().map(AsRef::as_ref).collect();
        self.parse(&refs)
    }

    /// Parse a sub-range of a token slice, supporting re-parsing for
    /// sub-command hand-off.
    pub fn parse_from(&mut self, argv: &[&str], start: usize) -> Outcome {
        if self.error() {
            return Outcome::default();
        }
        let entries = &self.entries;
        let lookup = &self.lookup;
        let names = &self.names;
        let default_sensing = self.sensing;
        let allow_unknown = self.allow_unknown;

        let mut errors: Vec<String> = Vec::new();
        let mut bindings: Vec<Box<dyn Binds>> =
            entries.iter().map(|entry| entry.spec.binding()).collect();
        let mut unknown: Box<dyn Binds> =
            Box::new(Binding::fresh(Rc::new(value::<Vec<String>>())));
        let mut tail: Vec<String> = Vec::new();

        let mut positions: Vec<Option<usize>> = entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.spec.is_positional())
            .map(|(index, _)| Some(index))
            .collect();
        let mut cursor = 0usize;
        let mut last: Option<(String, Target)> = None;

        let mut eof_region = false;
        let mut i = start;
        while i < argv.len() {
            let token = argv[i];
            if token == EOF_DELIMITER {
                eof_region = true;
                i += 1;
                continue;
            }

            if eof_region {
                match lookup.get(token) {
                    Some(&index) if entries[index].spec.stops_at_eof() => {
                        let end = argv[i + 1..]
                            .iter()
                            .position(|t| *t == EOF_DELIMITER)
                            .map_or(argv.len(), |at| i + 1 + at);
                        let header = format!("usage: arg['{token}']");
                        dispatch(
                            bindings[index].as_mut(),
                            Args::new(&argv[i + 1..end], Sensing::AtEof, None),
                            false,
                            &header,
                            &mut errors,
                        );
                        i = end + 1;
                    }
                    _ => {
                        tail = argv[i..].iter().map(|t| t.to_string()).collect();
                        break;
                    }
                }
                continue;
            }

            if token.len() > 2 && token.starts_with("--") {
                // long name, possibly `=`-bound
                let (name, eq_value) = split_eq(token);
                let header = format!("usage: arg['{name}']");
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("dispatching long name '{name}'.");
                }
                let target = match lookup.get(name) {
                    Some(&index) => Target::Entry(index),
                    None => {
                        if !allow_unknown {
                            errors.push(format!("{header}: not supported"));
                        }
                        Target::Unknown
                    }
                };
                i += 1;
                if let Target::Entry(index) = &target {
                    mark_positional_used(&mut positions, &mut cursor, *index);
                }
                i += appear_at(
                    &target,
                    entries,
                    &mut bindings,
                    &mut unknown,
                    default_sensing,
                    names,
                    argv,
                    i,
                    eq_value,
                    &header,
                    &mut errors,
                );
                last = Some((name.to_string(), target));
            } else if looks_like_option(token) {
                // short flag group, possibly `=`-bound on the final flag
                let body = &token[1..];
                let (flags, eq_value) = match body.split_once('=') {
                    Some((flags, eq_value)) => (flags, Some(eq_value)),
                    None => (body, None),
                };
                let chars: Vec<char> = flags.chars().collect();
                i += 1;
                for (at, c) in chars.iter().enumerate() {
                    let name = format!("-{c}");
                    let header = format!("usage: arg['{name}']");
                    let target = match lookup.get(&name) {
                        Some(&index) => Target::Entry(index),
                        None => {
                            if !allow_unknown {
                                errors.push(format!("{header}: not supported"));
                            }
                            Target::Unknown
                        }
                    };
                    if let Target::Entry(index) = &target {
                        mark_positional_used(&mut positions, &mut cursor, *index);
                    }
                    if at + 1 == chars.len() {
                        i += appear_at(
                            &target,
                            entries,
                            &mut bindings,
                            &mut unknown,
                            default_sensing,
                            names,
                            argv,
                            i,
                            eq_value,
                            &header,
                            &mut errors,
                        );
                        last = Some((name, target));
                    } else if let Target::Entry(index) = &target {
                        // inner flags of a group appear bare
                        dispatch(
                            bindings[*index].as_mut(),
                            Args::new(&[], default_sensing, Some(names)),
                            false,
                            &header,
                            &mut errors,
                        );
                    }
                }
            } else {
                let positional = positions.get(cursor).copied().flatten();
                if let Some(index) = positional {
                    let entry = &entries[index];
                    let name = entry.name.clone();
                    let header = format!("usage: arg['{name}']");
                    mark_positional_used(&mut positions, &mut cursor, index);
                    let window = window_for(entry, argv, i);
                    let consumed = dispatch(
                        bindings[index].as_mut(),
                        Args::new(window, effective_sensing(entry, default_sensing), Some(names)),
                        false,
                        &header,
                        &mut errors,
                    );
                    i += consumed.max(1);
                    last = Some((name, Target::Entry(index)));
                } else {
                    let (name, count) = match &last {
                        Some((name, Target::Entry(index))) => {
                            (name.clone(), Some(bindings[*index].appear_count()))
                        }
                        Some((name, Target::Unknown)) => {
                            (name.clone(), Some(unknown.appear_count()))
                        }
                        None => (String::default(), None),
                    };
                    let mut header = format!("usage: arg['{name}']");
                    if let Some(count) = count {
                        header.push_str(&format!("[{count}th appearance]"));
                    }
                    errors.push(format!("{header}: too many value '{token}'"));
                    i += 1;
                }
            }
        }

        for (index, binding) in bindings.iter_mut().enumerate() {
            if let Some(detail) = binding.finish() {
                errors.push(format!("usage: arg['{}']{detail}", self.entries[index].label()));
            }
        }
        self.errors.extend(errors);

        let mut map = HashMap::new();
        for (entry, binding) in self.entries.iter().zip(bindings.into_iter()) {
            let key = entry.name.trim_start_matches('-').to_string();
            map.insert(key.clone(), ArgValue::new(key, Rc::from(binding)));
        }
        Outcome::new(map, tail)
    }
}

/// Argument-registration chain returned by [`Parser::add`].
pub struct Adder<'p> {
    parser: &'p mut Parser,
}

impl<'p> Adder<'p> {
    /// Register an argument with a short flag.
    pub fn arg<T: Parse>(self, short: char, name: &str, help: &str, spec: Spec<T>) -> Self {
        self.parser.add_arg(Some(short), name, help, spec);
        self
    }

    /// Register an argument with a long name only.
    pub fn arg_named<T: Parse>(self, name: &str, help: &str, spec: Spec<T>) -> Self {
        self.parser.add_arg(None, name, help, spec);
        self
    }

    /// Register a plain boolean flag: implicit `true`, default `false`.
    pub fn flag(self, short: char, name: &str, help: &str) -> Self {
        let spec = value::<bool>().implicit_value(true);
        self.parser.add_arg(Some(short), name, help, spec);
        self
    }

    /// Register an extra long name for the most recent argument.
    pub fn alias(self, alias: &str) -> Self {
        self.parser.add_alias(alias);
        self
    }
}

fn normalize_long(name: &str) -> String {
    if name.starts_with("--") {
        name.to_string()
    } else if name.starts_with('-') {
        format!("-{name}")
    } else {
        format!("--{name}")
    }
}

fn split_eq(token: &str) -> (&str, Option<&str>) {
    match token.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (token, None),
    }
}

fn effective_sensing(entry: &ArgEntry, parser_mode: Sensing) -> Sensing {
    if entry.spec.stops_at_eof() {
        Sensing::AtEof
    } else {
        entry.spec.sensing().unwrap_or(parser_mode)
    }
}

/// Window for one appearance starting at `argv[from]`: stop-at-eof arguments
/// capture up to (not including) the next bare `--`, everything else takes
/// the full remainder and lets the binding stop itself.
fn window_for<'a>(entry: &ArgEntry, argv: &'a [&'a str], from: usize) -> &'a [&'a str] {
    if entry.spec.stops_at_eof() {
        let end = argv[from..]
            .iter()
            .position(|t| *t == EOF_DELIMITER)
            .map_or(argv.len(), |at| from + at);
        &argv[from..end]
    } else {
        &argv[from..]
    }
}

fn dispatch(
    binding: &mut dyn Binds,
    args: Args<'_>,
    bound: bool,
    header: &str,
    errors: &mut Vec<String>,
) -> usize {
    let mut local = Vec::new();
    let consumed = binding.appear(args, bound, &mut local);
    errors.extend(local.into_iter().map(|e| format!("{header}{e}")));
    consumed
}

#[allow(clippy::too_many_arguments)]
fn appear_at(
    target: &Target,
    entries: &[ArgEntry],
    bindings: &mut [Box<dyn Binds>],
    unknown: &mut Box<dyn Binds>,
    default_sensing: Sensing,
    names: &HashSet<String>,
    argv: &[&str],
    from: usize,
    eq_value: Option<&str>,
    header: &str,
    errors: &mut Vec<String>,
) -> usize {
    match target {
        Target::Entry(index) => {
            if let Some(eq_value) = eq_value {
                // `=`-binding is an explicit assignment; nothing terminates it
                dispatch(
                    bindings[*index].as_mut(),
                    Args::new(&[eq_value], Sensing::AtEof, None),
                    true,
                    header,
                    errors,
                );
                0
            } else {
                let entry = &entries[*index];
                let window = window_for(entry, argv, from);
                dispatch(
                    bindings[*index].as_mut(),
                    Args::new(window, effective_sensing(entry, default_sensing), Some(names)),
                    false,
                    header,
                    errors,
                )
            }
        }
        Target::Unknown => {
            if let Some(eq_value) = eq_value {
                dispatch(
                    unknown.as_mut(),
                    Args::new(&[eq_value], Sensing::AtEof, None),
                    true,
                    header,
                    errors,
                );
                0
            } else {
                dispatch(
                    unknown.as_mut(),
                    Args::new(&argv[from..], default_sensing, Some(names)),
                    false,
                    header,
                    errors,
                )
            }
        }
    }
}

fn mark_positional_used(positions: &mut [Option<usize>], cursor: &mut usize, index: usize) {
    let Some(used) = positions.iter().position(|p| *p == Some(index)) else {
        return;
    };
    positions[used] = None;
    if let Some(next) = (used + 1..positions.len()).find(|&j| positions[j].is_some()) {
        *cursor = next;
    } else if let Some(earlier) = (0..used).find(|&j| positions[j].is_some()) {
        *cursor = earlier;
    } else {
        *cursor = positions.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_by_long_name() {
        let mut parser = Parser::new("test");
        parser.add().arg('i', "int", "", value::<i32>());
        let outcome = parser.parse(&["--int", "5"]);
        assert!(!parser.error());
        assert_eq!(*outcome["int"].of::<i32>(), 5);
    }

    #[test]
    fn scalar_by_short_name() {
        let mut parser = Parser::new("test");
        parser.add().arg('i', "int", "", value::<i32>());
        let outcome = parser.parse(&["-i", "5"]);
        assert!(!parser.error());
        assert_eq!(*outcome["int"].of::<i32>(), 5);
    }

    #[test]
    fn scalar_by_equals() {
        let mut parser = Parser::new("test");
        parser.add().arg('i', "int", "", value::<i32>());
        let outcome = parser.parse(&["--int=5"]);
        assert!(!parser.error());
        assert_eq!(*outcome["int"].of::<i32>(), 5);
    }

    #[test]
    fn flags_scatter_and_gather() {
        for tokens in [vec!["-h", "-b", "-r"], vec!["-hbr"]] {
            let mut parser = Parser::new("test");
            parser
                .add()
                .flag('h', "help", "")
                .arg('b', "normal", "", value::<bool>().implicit_value(true))
                .arg('r', "reverse", "", value::<bool>().implicit_value(false));
            let outcome = parser.parse(&tokens);
            assert!(!parser.error(), "{:?}", parser.error_details());
            assert!(*outcome["help"].of::<bool>());
            assert!(*outcome["normal"].of::<bool>());
            assert!(!*outcome["reverse"].of::<bool>());
        }
    }

    #[test]
    fn unknown_name_reports_and_swallows() {
        let mut parser = Parser::new("test");
        parser.add().arg('i', "int", "", value::<i32>());
        let outcome = parser.parse(&["--nope", "5", "-i", "2"]);
        assert!(parser.error());
        assert!(parser
            .error_details()
            .iter()
            .any(|e| e == "usage: arg['--nope']: not supported"));
        assert_eq!(*outcome["int"].of::<i32>(), 2);
    }

    #[test]
    fn unknown_name_allowed() {
        let mut parser = Parser::new("test").allow_unknown();
        parser.add().arg('i', "int", "", value::<i32>());
        let outcome = parser.parse(&["--nope", "5", "-i", "2"]);
        assert!(!parser.error(), "{:?}", parser.error_details());
        assert_eq!(*outcome["int"].of::<i32>(), 2);
    }

    #[test]
    fn too_many_value() {
        let mut parser = Parser::new("test");
        parser.add().arg('i', "int", "", value::<i32>());
        parser.parse(&["--int", "5", "9"]);
        assert!(parser
            .error_details()
            .iter()
            .any(|e| e == "usage: arg['--int'][1th appearance]: too many value '9'"));
    }

    #[test]
    fn duplicate_long_name() {
        let mut parser = Parser::new("test");
        parser
            .add()
            .arg('i', "int", "", value::<i32>())
            .arg('j', "int", "", value::<i32>());
        assert!(parser.error());
        assert!(parser
            .error_details()
            .iter()
            .any(|e| e == "define[1]: long name '--int' is already in use"));
    }

    #[test]
    fn duplicate_short_name() {
        let mut parser = Parser::new("test");
        parser
            .add()
            .arg('i', "int", "", value::<i32>())
            .arg('i', "other", "", value::<i32>());
        assert!(parser.error());
        assert!(parser
            .error_details()
            .iter()
            .any(|e| e == "define[1]: short name '-i' is already in use"));
    }

    #[test]
    fn alias_lookup() {
        let mut parser = Parser::new("test");
        parser
            .add()
            .arg('b', "base_address", "", value::<u64>().default_value(0u64))
            .alias("ba");
        let outcome = parser.parse(&["--ba", "0x10"]);
        assert!(!parser.error(), "{:?}", parser.error_details());
        assert_eq!(*outcome["base_address"].of::<u64>(), 16);
    }

    #[test]
    fn errored_definition_refuses_to_parse() {
        let mut parser = Parser::new("test");
        parser
            .add()
            .arg('i', "int", "", value::<i32>())
            .arg('i', "other", "", value::<i32>());
        let outcome = parser.parse(&["--int", "5"]);
        assert!(parser.error());
        assert!(outcome.tail().is_empty());
    }

    #[test]
    fn positional_fill_in_order() {
        let mut parser = Parser::new("test");
        parser
            .add()
            .arg('i', "int", "", value::<i32>().positional())
            .arg('f', "float", "", value::<f32>().positional())
            .arg(
                'v',
                "vector",
                "",
                value::<Vec<f32>>().positional().data_count(2),
            );
        let outcome = parser.parse(&["-1", "5.0", "1", "2.3"]);
        assert!(!parser.error(), "{:?}", parser.error_details());
        assert_eq!(*outcome["int"].of::<i32>(), -1);
        assert_eq!(*outcome["float"].of::<f32>(), 5.0);
        assert_eq!(*outcome["vector"].of::<Vec<f32>>(), vec![1.0, 2.3]);
    }

    #[test]
    fn positional_reorder_after_named_use() {
        let mut parser = Parser::new("test");
        parser
            .add()
            .arg('i', "int", "", value::<i32>().positional())
            .arg('f', "float", "", value::<f32>().positional())
            .arg(
                'v',
                "vector",
                "",
                value::<Vec<f32>>().positional().data_count(2),
            );
        let outcome = parser.parse(&["-f", "5.0", "1", "2.3", "-1"]);
        assert!(!parser.error(), "{:?}", parser.error_details());
        assert_eq!(*outcome["int"].of::<i32>(), -1);
        assert_eq!(*outcome["float"].of::<f32>(), 5.0);
        assert_eq!(*outcome["vector"].of::<Vec<f32>>(), vec![1.0, 2.3]);
    }

    #[test]
    fn start_index_skips_prefix() {
        let mut parser = Parser::new("test");
        parser.add().arg('i', "int", "", value::<i32>());
        let outcome = parser.parse_from(&["ignored", "--int", "5"], 1);
        assert!(!parser.error());
        assert_eq!(*outcome["int"].of::<i32>(), 5);
    }
}
