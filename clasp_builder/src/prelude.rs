//! Traits needed when declaring argument shapes and record domains.
pub use crate::value::{Atom, Element, Field, Parse, Record, Seen};
