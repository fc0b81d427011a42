mod atom;
mod bind;
mod probe;
mod window;

pub use atom::{Atom, Unconvertable};
pub use bind::{
    assign_composite, parse_record, probe_record, record_description, Element, Field, Parse,
    Record, Request, Seen, Take, Tuple,
};
pub use probe::Shape;
pub use window::{Args, Fields, Window};

pub(crate) use window::looks_like_option;
