pub(crate) mod base;
mod printer;
mod store;

pub use base::{Adder, Parser};
pub use store::{ArgValue, Outcome};
