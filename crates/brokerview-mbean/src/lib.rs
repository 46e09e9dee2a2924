//! Object-name model for the broker management domain.
//!
//! A manageable entity (broker, address, queue, acceptor, ...) is named by
//! an object-name string of the form `domain:key1=value1,key2=value2`.
//! This crate parses those names, renders them canonically, and models the
//! JSON values returned by the management bridge as a typed variant.

pub mod error;
pub mod object_name;
pub mod value;

pub use error::*;
pub use object_name::*;
pub use value::*;
