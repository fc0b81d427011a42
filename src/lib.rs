//! `clasp` is a declarative command line argument binder for Rust.
//!
//! Where most argument parsers stop at scalars and repeated flags, `clasp`
//! maps a flat token stream onto arbitrarily shaped values: scalars, tuples,
//! user-defined records, vectors and maps — with per-field recursive
//! composition. The same engine tracks two arity dimensions for every
//! argument (how many times a flag may appear, and how many tokens one
//! appearance consumes), substitutes defaults and implicit values, and runs
//! the declared constraints (choice sets, ranges, regexes, custom
//! predicates) against every bound unit.
//!
//! Design priorities:
//! * *Typed, recursive binding*:
//! declare `value::<Vec<(String, f32, i32)>>()` and get back exactly that,
//! element by element, with no conversion calls in application code.
//! * *Precise, localized errors*:
//! every failure names its position with a dotted/bracketed path, such as
//! `vector[1].gain` or `map["key2"]<1>`, and parsing continues best-effort
//! so one run surfaces as many independent problems as possible.
//! * *Boundary sensing*:
//! negative numbers bind as numbers; option-looking tokens end value runs.
//! Sensitive mode extends this to any registered name, and `\-` forces a
//! literal.
//! * *No hidden control flow*:
//! the parser never prints and never exits. `error()` is the one signal;
//! help rendering and exit codes stay with the caller.
//!
//! # Usage
//!
//! Declare arguments against a [`Parser`], parse, then query the [`Outcome`]
//! by name:
//!
//! ```
//! use clasp::{value, Parser};
//!
//! let mut parser = Parser::new("demo");
//! parser
//!     .add()
//!     .flag('h', "help", "Print this message and exit")
//!     .arg('i', "int", "An integer", value::<i32>().default_value(-1))
//!     .arg(
//!         'v',
//!         "vec",
//!         "Some floats",
//!         value::<Vec<f32>>().data_count_between(2, 3),
//!     );
//! let outcome = parser.parse(&["-i", "5", "--vec", "-1", "5.0"]);
//!
//! assert!(!parser.error());
//! assert_eq!(*outcome["int"].of::<i32>(), 5);
//! assert_eq!(*outcome["vec"].of::<Vec<f32>>(), vec![-1.0, 5.0]);
//! ```
//!
//! # Records
//!
//! A struct becomes bindable by describing its fields once; the same
//! description drives both arity probing and real binding. Derive it:
//!
//! ```
//! use clasp::{value, Parser, Record};
//!
//! #[derive(Record, Clone, Default, PartialEq, Debug)]
//! struct Station {
//!     name: String,
//!     gain: f32,
//!     #[clasp(optional, default = -1)]
//!     channel: i32,
//! }
//!
//! let mut parser = Parser::new("demo");
//! parser.add().arg('s', "station", "A station", value::<Station>());
//! let outcome = parser.parse(&["-s", "alpha", "2.5"]);
//!
//! assert!(!parser.error());
//! assert_eq!(
//!     *outcome["station"].of::<Station>(),
//!     Station { name: "alpha".to_string(), gain: 2.5, channel: -1 }
//! );
//! ```
//!
//! or implement [`Record`](trait@Record) by hand and register the shape with
//! [`record_shape!`]. Records compose: they may be vector elements and map
//! values, and their fields may themselves be tuples or records.
//!
//! # Constraints
//!
//! Choice sets and ranges are OR-combined; a custom predicate is AND-combined
//! on top. Violations report the value together with the composed
//! description:
//!
//! ```
//! use clasp::{value, Parser};
//!
//! let mut parser = Parser::new("demo");
//! parser.add().arg(
//!     'x',
//!     "x",
//!     "",
//!     value::<i32>().choices([1, 3, 5]).range(10, 20),
//! );
//! parser.parse(&["--x", "2"]);
//!
//! assert!(parser.error());
//! assert!(parser.error_details()[0].contains(
//!     "invalid value '2', should meet constraint: \
//!      in set:{1, 3, 5} or within ranges:[(10, 20)]"
//! ));
//! ```
//!
//! # Sub-command hand-off
//!
//! An argument declared with `stop_at_eof()` absorbs raw tokens until a bare
//! `--`; whatever follows the last delimiter is exposed via
//! [`Outcome::tail`] for a nested parser (see [`Parser::parse_from`]).

pub use clasp_builder::*;
pub use clasp_derive::Record;
