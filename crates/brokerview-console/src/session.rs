//! The console session: one mounted view's tree, selection, and client.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::json;
use thiserror::Error;
use tokio::sync::RwLock;

use brokerview_client::{ClientError, Endpoint, ManagementClient};
use brokerview_mbean::ObjectName;
use brokerview_tree::{Found, ManagementTree, MergeReport, Selection, TreeNode};

use crate::config::ConsoleConfig;
use crate::views::{AcceptorRow, AddressRow, BrokerStatus, ClusterConnectionRow, QueueRow};

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("no broker found in domain {0}")]
    BrokerNotFound(String),
}

/// Cloneable teardown flag for a session driven by a background poller.
///
/// Once closed, in-flight refreshes discard their results instead of
/// touching the tree.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandle {
    closed: Arc<AtomicBool>,
}

impl ShutdownHandle {
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Owns the management tree and selection for one mounted view.
///
/// All tree mutation goes through [`refresh`](Self::refresh); the session
/// is driven by a single polling task, so merges are serialized by
/// construction (they are not reentrant-safe).
pub struct ConsoleSession<E: Endpoint> {
    client: ManagementClient<E>,
    config: ConsoleConfig,
    tree: ManagementTree,
    selection: Selection,
    shutdown: ShutdownHandle,
    broker_mbean: Option<String>,
    last_refresh: Option<DateTime<Utc>>,
}

impl<E: Endpoint> ConsoleSession<E> {
    pub fn new(config: ConsoleConfig, endpoint: E) -> Self {
        ConsoleSession {
            client: ManagementClient::new(endpoint),
            config,
            tree: ManagementTree::new(),
            selection: Selection::default(),
            shutdown: ShutdownHandle::default(),
            broker_mbean: None,
            last_refresh: None,
        }
    }

    pub fn tree(&self) -> &ManagementTree {
        &self.tree
    }

    pub fn client(&self) -> &ManagementClient<E> {
        &self.client
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Currently selected node, if any.
    pub fn selected_node(&self) -> Option<&TreeNode> {
        self.selection.selected().map(|id| self.tree.node(id))
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.last_refresh
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Query the domain and merge the result into the tree.
    ///
    /// A result that lands after [`ShutdownHandle::close`] is discarded;
    /// the tree of a torn-down view is never touched.
    pub async fn refresh(&mut self) -> Result<MergeReport, ConsoleError> {
        let names = self.client.search(&self.config.search_pattern()).await?;
        if self.shutdown.is_closed() {
            tracing::debug!("discarding query result after session close");
            return Ok(MergeReport::default());
        }
        let report = self.tree.merge_batch(&names);
        self.last_refresh = Some(Utc::now());
        Ok(report)
    }

    /// Clear the tree, selection, and cached broker name. Called by the
    /// view on broker reconnect.
    pub fn reset(&mut self) {
        self.tree.reset();
        self.selection.clear();
        self.broker_mbean = None;
        self.last_refresh = None;
        tracing::info!("console session reset");
    }

    /// Jump the tree selection to `target`, invoking `on_select` with the
    /// resolved node on an exact or ancestor hit. A miss is a normal
    /// outcome while data is still loading; the caller retries next poll.
    pub fn find_and_select<F>(&mut self, target: &str, on_select: F) -> Found
    where
        F: FnMut(&TreeNode),
    {
        self.tree.find_and_select(target, &mut self.selection, on_select)
    }

    /// Headline attributes of the (first discovered) broker.
    pub async fn broker_status(&mut self) -> Result<BrokerStatus, ConsoleError> {
        let mbean = self.broker_mbean().await?;
        let attrs = self.client.read(&mbean, None).await?;
        Ok(BrokerStatus::from_attributes(&mbean, &attrs))
    }

    pub async fn addresses(&mut self) -> Result<Vec<AddressRow>, ConsoleError> {
        self.rows(
            |name| {
                name.property("address").is_some()
                    && name.property("subcomponent").is_none()
                    && name.property("queue").is_none()
            },
            AddressRow::from_attributes,
        )
        .await
    }

    pub async fn queues(&mut self) -> Result<Vec<QueueRow>, ConsoleError> {
        self.rows(|name| name.property("queue").is_some(), QueueRow::from_attributes)
            .await
    }

    pub async fn acceptors(&mut self) -> Result<Vec<AcceptorRow>, ConsoleError> {
        self.rows(
            |name| name.property("component") == Some("acceptors"),
            AcceptorRow::from_attributes,
        )
        .await
    }

    pub async fn cluster_connections(&mut self) -> Result<Vec<ClusterConnectionRow>, ConsoleError> {
        self.rows(
            |name| name.property("component") == Some("cluster-connections"),
            ClusterConnectionRow::from_attributes,
        )
        .await
    }

    /// Create an address on the broker with the given routing type
    /// (`ANYCAST` or `MULTICAST`).
    pub async fn create_address(&mut self, name: &str, routing_type: &str) -> Result<(), ConsoleError> {
        let mbean = self.broker_mbean().await?;
        self.client
            .exec(&mbean, "createAddress", vec![json!(name), json!(routing_type)])
            .await?;
        tracing::info!(address = name, routing_type, "created address");
        Ok(())
    }

    /// Object name of the broker, discovered once and cached until reset.
    async fn broker_mbean(&mut self) -> Result<String, ConsoleError> {
        if let Some(mbean) = &self.broker_mbean {
            return Ok(mbean.clone());
        }
        let names = self.client.search(&self.config.broker_pattern()).await?;
        let mbean = names
            .into_iter()
            .find(|raw| {
                ObjectName::parse(raw)
                    .map(|name| name.properties.len() == 1 && name.property("broker").is_some())
                    .unwrap_or(false)
            })
            .ok_or_else(|| ConsoleError::BrokerNotFound(self.config.domain.clone()))?;
        self.broker_mbean = Some(mbean.clone());
        Ok(mbean)
    }

    /// Search the domain, keep the names `filter` accepts, and read each
    /// one into a row. Per-entity read failures are logged and dropped;
    /// the row reappears on the next successful poll.
    async fn rows<T, F, B>(&mut self, filter: F, build: B) -> Result<Vec<T>, ConsoleError>
    where
        F: Fn(&ObjectName) -> bool,
        B: Fn(&str, &brokerview_mbean::AttrValue) -> T,
    {
        let names = self.client.search(&self.config.search_pattern()).await?;
        let mut out = Vec::new();
        for raw in names {
            let Ok(parsed) = ObjectName::parse(&raw) else {
                continue;
            };
            if !filter(&parsed) {
                continue;
            }
            match self.client.read(&raw, None).await {
                Ok(attrs) => out.push(build(&raw, &attrs)),
                Err(err) => tracing::warn!(mbean = %raw, %err, "dropping row with unreadable attributes"),
            }
        }
        Ok(out)
    }
}

/// Drive `session.refresh()` on a fixed interval until its shutdown
/// handle closes. The single task serializes merges; no other writer
/// exists while it runs.
pub fn spawn_poller<E>(
    session: Arc<RwLock<ConsoleSession<E>>>,
    interval: Duration,
) -> tokio::task::JoinHandle<()>
where
    E: Endpoint + 'static,
{
    tokio::spawn(async move {
        let shutdown = session.read().await.shutdown_handle();
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            if shutdown.is_closed() {
                tracing::debug!("poller stopping: session closed");
                break;
            }
            let mut session = session.write().await;
            match session.refresh().await {
                Ok(report) => tracing::debug!(
                    merged = report.merged,
                    created = report.created,
                    skipped = report.skipped,
                    "poll refresh"
                ),
                Err(err) => tracing::warn!(%err, "poll refresh failed"),
            }
        }
    })
}
