//! Builder module for `clasp`.
//! See [documentation root](https://docs.rs/clasp/latest/clasp/index.html) for full details.
#![deny(missing_docs)]
mod constant;
mod descriptor;
mod model;
mod parser;
mod value;
#[allow(missing_docs)]
pub mod prelude;

pub use descriptor::{value, Checker, Spec};
pub use model::{Limits, Sensing};
pub use parser::{Adder, ArgValue, Outcome, Parser};
pub use value::{
    assign_composite, parse_record, probe_record, record_description, Args, Atom, Element, Field,
    Fields, Parse, Record, Request, Seen, Shape, Take, Tuple, Unconvertable, Window,
};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
