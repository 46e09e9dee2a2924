//! Semantic path resolution for parsed object names.
//!
//! Source key order is not guaranteed, so the hierarchy is derived from a
//! fixed precedence list rather than string order: broker before address
//! before queue, with the grouping keys the broker emits in between.

use brokerview_mbean::ObjectName;

use crate::node::NodeKind;

/// Known hierarchy keys, outermost first.
const PRECEDENCE: [&str; 6] = [
    "broker",
    "component",
    "address",
    "subcomponent",
    "routing-type",
    "queue",
];

/// One level of the resolved entity chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegment {
    pub key: String,
    pub value: String,
    pub kind: NodeKind,
}

/// Classification for a property key.
pub fn kind_for_key(key: &str) -> NodeKind {
    match key {
        "broker" => NodeKind::Broker,
        "component" => NodeKind::AddressGroup,
        "address" => NodeKind::Address,
        // routing-type is a grouping level between the queues folder
        // and the queues themselves.
        "subcomponent" | "routing-type" => NodeKind::QueueGroup,
        "queue" => NodeKind::Queue,
        _ => NodeKind::Other,
    }
}

/// Resolve a parsed name into the ordered chain of ancestor segments.
///
/// Known keys come out in precedence order regardless of where they sat in
/// the source string; unknown keys follow in their original relative
/// order, classified [`NodeKind::Other`].
pub fn resolve_path(name: &ObjectName) -> Vec<PathSegment> {
    let mut segments = Vec::with_capacity(name.properties.len());

    for key in PRECEDENCE {
        for (k, v) in &name.properties {
            if k == key {
                segments.push(PathSegment {
                    key: k.clone(),
                    value: v.clone(),
                    kind: kind_for_key(k),
                });
            }
        }
    }
    for (k, v) in &name.properties {
        if !PRECEDENCE.contains(&k.as_str()) {
            segments.push(PathSegment {
                key: k.clone(),
                value: v.clone(),
                kind: NodeKind::Other,
            });
        }
    }
    segments
}
