use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::sync::RwLock;

use brokerview_client::MockBroker;
use brokerview_console::{spawn_poller, ConsoleConfig, ConsoleError, ConsoleSession};
use brokerview_tree::{Found, NodeKind};

const DOMAIN: &str = "org.apache.activemq.artemis";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn test_config() -> ConsoleConfig {
    ConsoleConfig {
        domain: DOMAIN.into(),
        ..Default::default()
    }
}

async fn seeded_broker() -> MockBroker {
    init_tracing();
    let broker = MockBroker::new();
    broker
        .register(
            format!("{DOMAIN}:broker=\"b1\""),
            json!({
                "Version": "2.33.0",
                "Started": true,
                "Uptime": "3 days 2 hours",
                "ConnectionCount": 7,
                "TotalMessageCount": 42,
                "AddressMemoryUsagePercentage": 1.5,
            }),
        )
        .await;
    broker
        .register(
            format!("{DOMAIN}:broker=\"b1\",component=addresses,address=\"DLQ\""),
            json!({
                "RoutingTypes": ["ANYCAST"],
                "QueueNames": ["DLQ"],
                "MessageCount": 3,
            }),
        )
        .await;
    broker
        .register(
            format!(
                "{DOMAIN}:broker=\"b1\",component=addresses,address=\"DLQ\",\
                 subcomponent=queues,routing-type=\"anycast\",queue=\"DLQ\""
            ),
            json!({
                "Address": "DLQ",
                "RoutingType": "anycast",
                "Durable": true,
                "MessageCount": 3,
                "ConsumerCount": 1,
            }),
        )
        .await;
    broker
        .register(
            format!("{DOMAIN}:broker=\"b1\",component=acceptors,name=\"artemis\""),
            json!({
                "FactoryClassName": "org.apache.activemq.artemis.core.remoting.impl.netty.NettyAcceptorFactory",
                "Parameters": { "host": "0.0.0.0", "port": "61616" },
                "Started": true,
            }),
        )
        .await;
    broker
        .register(
            format!("{DOMAIN}:broker=\"b1\",component=cluster-connections,name=\"my-cluster\""),
            json!({
                "NodeID": "b1-node",
                "Topology": "live(b1)",
                "Started": true,
            }),
        )
        .await;
    broker
}

async fn seeded_session() -> ConsoleSession<MockBroker> {
    let mut session = ConsoleSession::new(test_config(), seeded_broker().await);
    session.refresh().await.unwrap();
    session
}

#[tokio::test]
async fn test_refresh_builds_tree_from_query() {
    let session = seeded_session().await;
    let tree = session.tree();
    assert!(!tree.is_empty());

    let queue = format!(
        "{DOMAIN}:broker=\"b1\",component=addresses,address=\"DLQ\",\
         subcomponent=queues,routing-type=\"anycast\",queue=\"DLQ\""
    );
    let Found::Exact(id) = tree.find(&queue) else {
        panic!("queue should be discoverable after refresh");
    };
    assert_eq!(tree.node(id).kind, NodeKind::Queue);
    assert_eq!(tree.node(id).label, "DLQ");
}

#[tokio::test]
async fn test_refresh_twice_is_idempotent() {
    let mut session = seeded_session().await;
    let count = session.tree().len();
    let report = session.refresh().await.unwrap();
    assert_eq!(report.created, 0);
    assert_eq!(session.tree().len(), count);
}

#[tokio::test]
async fn test_find_and_select_round_trip() {
    let mut session = seeded_session().await;

    let mut seen = Vec::new();
    let found = session.find_and_select(
        &format!("{DOMAIN}:broker=\"b1\",component=addresses,address=\"DLQ\""),
        |node| seen.push(node.label.clone()),
    );
    assert!(matches!(found, Found::Exact(_)));
    assert_eq!(seen, vec!["DLQ"]);
    assert_eq!(session.selected_node().map(|n| n.kind), Some(NodeKind::Address));
}

#[tokio::test]
async fn test_find_and_select_ancestor_while_loading() {
    let mut session = seeded_session().await;

    // A queue the query has not surfaced yet: selection lands on its
    // address until the finer node appears.
    let found = session.find_and_select(
        &format!(
            "{DOMAIN}:broker=\"b1\",component=addresses,address=\"DLQ\",\
             subcomponent=queues,routing-type=\"anycast\",queue=\"brand-new\""
        ),
        |_| {},
    );
    let Found::Ancestor(_) = found else {
        panic!("expected ancestor match, got {found:?}");
    };
    assert_eq!(session.selected_node().map(|n| n.label.clone()), Some("anycast".into()));
}

#[tokio::test]
async fn test_broker_status_view() {
    let mut session = seeded_session().await;
    let status = session.broker_status().await.unwrap();
    assert_eq!(status.name, "b1");
    assert_eq!(status.version, "2.33.0");
    assert!(status.started);
    assert_eq!(status.connection_count, 7);
    assert_eq!(status.total_message_count, 42);
    assert!((status.address_memory_usage_percent - 1.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_broker_not_found() {
    let mut session = ConsoleSession::new(test_config(), MockBroker::new());
    let err = session.broker_status().await.unwrap_err();
    assert!(matches!(err, ConsoleError::BrokerNotFound(_)));
}

#[tokio::test]
async fn test_address_and_queue_rows() {
    let mut session = seeded_session().await;

    let addresses = session.addresses().await.unwrap();
    assert_eq!(addresses.len(), 1);
    assert_eq!(addresses[0].name, "DLQ");
    assert_eq!(addresses[0].routing_types, vec!["ANYCAST"]);
    assert_eq!(addresses[0].message_count, 3);

    let queues = session.queues().await.unwrap();
    assert_eq!(queues.len(), 1);
    assert_eq!(queues[0].name, "DLQ");
    assert_eq!(queues[0].routing_type, "anycast");
    assert!(queues[0].durable);
    assert_eq!(queues[0].consumer_count, 1);
}

#[tokio::test]
async fn test_acceptor_and_cluster_rows() {
    let mut session = seeded_session().await;

    let acceptors = session.acceptors().await.unwrap();
    assert_eq!(acceptors.len(), 1);
    assert_eq!(acceptors[0].name, "artemis");
    assert!(acceptors[0].started);
    assert_eq!(acceptors[0].parameters.get("port").map(String::as_str), Some("61616"));

    let clusters = session.cluster_connections().await.unwrap();
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].name, "my-cluster");
    assert_eq!(clusters[0].node_id, "b1-node");
}

#[tokio::test]
async fn test_create_address_maps_to_exec() {
    let broker = seeded_broker().await;
    broker
        .stub_exec(format!("{DOMAIN}:broker=\"b1\""), "createAddress", json!("orders"))
        .await;
    let mut session = ConsoleSession::new(test_config(), broker);

    session.create_address("orders", "ANYCAST").await.unwrap();

    let calls = session.client().endpoint().exec_calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].operation, "createAddress");
    assert_eq!(calls[0].arguments, vec![json!("orders"), json!("ANYCAST")]);
}

#[tokio::test]
async fn test_refresh_after_close_is_discarded() {
    let mut session = ConsoleSession::new(test_config(), seeded_broker().await);
    session.shutdown_handle().close();

    let report = session.refresh().await.unwrap();
    assert_eq!(report.merged, 0);
    assert!(session.tree().is_empty());
    assert!(session.last_refresh().is_none());
}

#[tokio::test]
async fn test_reset_clears_tree_and_selection() {
    let mut session = seeded_session().await;
    session.find_and_select(&format!("{DOMAIN}:broker=\"b1\""), |_| {});
    assert!(session.selected_node().is_some());

    session.reset();
    assert!(session.tree().is_empty());
    assert!(session.selected_node().is_none());
    assert!(session.last_refresh().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_poller_refreshes_until_closed() {
    let session = Arc::new(RwLock::new(ConsoleSession::new(
        test_config(),
        seeded_broker().await,
    )));
    let shutdown = session.read().await.shutdown_handle();

    let handle = spawn_poller(session.clone(), Duration::from_secs(1));
    // First tick fires immediately; let it run.
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(!session.read().await.tree().is_empty());

    shutdown.close();
    tokio::time::sleep(Duration::from_secs(2)).await;
    handle.await.unwrap();
}
