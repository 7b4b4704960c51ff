//! Domain models for the physique form.

mod draft;
mod field;
mod record;

pub use draft::*;
pub use field::*;
pub use record::*;
