//! Management tree builder.
//!
//! Maps the flat object-name list returned by a management query into a
//! hierarchical tree of broker, address, and queue nodes, and answers
//! find-and-select requests from the view layer. Merging the same name
//! list repeatedly is idempotent; the tree only ever grows within a
//! session, until the owning view resets it on reconnect.

pub mod builder;
pub mod node;
pub mod path;

pub use builder::*;
pub use node::*;
pub use path::*;
