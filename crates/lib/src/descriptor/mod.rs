//! Descriptor model: typed modules and targets.
//!
//! Raw descriptors come from an external loader as loosely-typed records
//! ([`RawModule`], [`RawTarget`]); [`load_module`] and [`load_target`] turn them
//! into validated [`Module`] and [`Target`] values or fail with a
//! [`DescriptorError`] naming the offending field.

mod load;
mod types;

pub use load::*;
pub use types::*;
