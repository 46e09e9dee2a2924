//! View models for the console tabs.
//!
//! Each row normalizes one mbean's attribute mapping. Monitoring data may
//! be momentarily stale or partial, so missing and wrongly-typed
//! attributes degrade to defaults with a debug note instead of failing
//! the whole view.

use std::collections::BTreeMap;

use brokerview_mbean::{AttrValue, ObjectName};

/// Status tab: headline broker attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrokerStatus {
    pub name: String,
    pub version: String,
    pub started: bool,
    pub uptime: String,
    pub connection_count: i64,
    pub total_message_count: i64,
    pub address_memory_usage_percent: f64,
}

impl BrokerStatus {
    pub fn from_attributes(object_name: &str, attrs: &AttrValue) -> Self {
        BrokerStatus {
            name: name_property(object_name, "broker"),
            version: str_attr(attrs, "Version"),
            started: bool_attr(attrs, "Started"),
            uptime: str_attr(attrs, "Uptime"),
            connection_count: i64_attr(attrs, "ConnectionCount"),
            total_message_count: i64_attr(attrs, "TotalMessageCount"),
            address_memory_usage_percent: f64_attr(attrs, "AddressMemoryUsagePercentage"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressRow {
    pub name: String,
    pub object_name: String,
    pub routing_types: Vec<String>,
    pub queue_names: Vec<String>,
    pub message_count: i64,
}

impl AddressRow {
    pub fn from_attributes(object_name: &str, attrs: &AttrValue) -> Self {
        AddressRow {
            name: name_property(object_name, "address"),
            object_name: object_name.to_string(),
            routing_types: string_seq_attr(attrs, "RoutingTypes"),
            queue_names: string_seq_attr(attrs, "QueueNames"),
            message_count: i64_attr(attrs, "MessageCount"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueueRow {
    pub name: String,
    pub object_name: String,
    pub address: String,
    pub routing_type: String,
    pub durable: bool,
    pub message_count: i64,
    pub consumer_count: i64,
}

impl QueueRow {
    pub fn from_attributes(object_name: &str, attrs: &AttrValue) -> Self {
        QueueRow {
            name: name_property(object_name, "queue"),
            object_name: object_name.to_string(),
            address: str_attr(attrs, "Address"),
            routing_type: str_attr(attrs, "RoutingType"),
            durable: bool_attr(attrs, "Durable"),
            message_count: i64_attr(attrs, "MessageCount"),
            consumer_count: i64_attr(attrs, "ConsumerCount"),
        }
    }
}

/// Acceptors tab, read-only: broker-side network listeners.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AcceptorRow {
    pub name: String,
    pub object_name: String,
    pub factory: String,
    pub parameters: BTreeMap<String, String>,
    pub started: bool,
}

impl AcceptorRow {
    pub fn from_attributes(object_name: &str, attrs: &AttrValue) -> Self {
        let parameters = match attrs.get("Parameters") {
            Some(AttrValue::Mapping(map)) => map
                .iter()
                .map(|(k, v)| (k.clone(), display_value(v)))
                .collect(),
            _ => BTreeMap::new(),
        };
        AcceptorRow {
            name: name_property(object_name, "name"),
            object_name: object_name.to_string(),
            factory: str_attr(attrs, "FactoryClassName"),
            parameters,
            started: bool_attr(attrs, "Started"),
        }
    }
}

/// Cluster-connections tab, read-only: broker-to-broker links.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterConnectionRow {
    pub name: String,
    pub object_name: String,
    pub node_id: String,
    pub topology: String,
    pub started: bool,
}

impl ClusterConnectionRow {
    pub fn from_attributes(object_name: &str, attrs: &AttrValue) -> Self {
        ClusterConnectionRow {
            name: name_property(object_name, "name"),
            object_name: object_name.to_string(),
            node_id: str_attr(attrs, "NodeID"),
            topology: str_attr(attrs, "Topology"),
            started: bool_attr(attrs, "Started"),
        }
    }
}

/// The named property of an object name, or the raw name when it does not
/// parse (display fallback only; parse failures were already logged at
/// merge time).
fn name_property(object_name: &str, key: &str) -> String {
    ObjectName::parse(object_name)
        .ok()
        .and_then(|name| name.property(key).map(str::to_string))
        .unwrap_or_else(|| object_name.to_string())
}

fn str_attr(attrs: &AttrValue, key: &str) -> String {
    match attrs.get(key).and_then(AttrValue::as_str) {
        Some(s) => s.to_string(),
        None => {
            tracing::debug!(key, "missing or non-string attribute");
            String::new()
        }
    }
}

fn bool_attr(attrs: &AttrValue, key: &str) -> bool {
    attrs.get(key).and_then(AttrValue::as_bool).unwrap_or(false)
}

fn i64_attr(attrs: &AttrValue, key: &str) -> i64 {
    attrs.get(key).and_then(AttrValue::as_i64).unwrap_or(0)
}

fn f64_attr(attrs: &AttrValue, key: &str) -> f64 {
    attrs.get(key).and_then(AttrValue::as_f64).unwrap_or(0.0)
}

fn string_seq_attr(attrs: &AttrValue, key: &str) -> Vec<String> {
    attrs
        .get(key)
        .map(|v| v.iter().filter_map(AttrValue::as_str).map(str::to_string).collect())
        .unwrap_or_default()
}

fn display_value(value: &AttrValue) -> String {
    match value {
        AttrValue::String(s) => s.clone(),
        AttrValue::Bool(b) => b.to_string(),
        AttrValue::Number(n) => n.to_string(),
        AttrValue::Null => String::new(),
        other => format!("{other:?}"),
    }
}
