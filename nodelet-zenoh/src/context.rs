//! Zenoh context (session) management.
//!
//! A [`Context`] wraps a Zenoh session plus the state every node shares:
//! the parsed command-line arguments, the parameter store, and the graph
//! cache fed by liveliness tokens. Everything that needs the session
//! reaches it through an explicit `Context` handle, there are no process
//! globals.
//!
//! # Reference
//!
//! See [rmw_zenoh design - Contexts](https://github.com/ros2/rmw_zenoh/blob/rolling/docs/design.md#contexts)

use crate::{
    error::{Error, Result},
    graph_cache::GraphCache,
    node::Node,
    parameter::ParameterStore,
};
use nodelet_args::RosArgs;
use parking_lot::Mutex;
use std::{
    env,
    sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    },
};
use zenoh::{Session, Wait};

/// Environment variable for custom Zenoh session config.
pub const ZENOH_SESSION_CONFIG_URI: &str = "ZENOH_SESSION_CONFIG_URI";

/// Environment variable for ROS domain ID.
pub const ROS_DOMAIN_ID: &str = "ROS_DOMAIN_ID";

/// Default Zenoh router endpoint.
pub const DEFAULT_ROUTER_ENDPOINT: &str = "tcp/localhost:7447";

/// Inner context data.
struct ContextInner {
    /// Zenoh session.
    session: Session,
    /// ROS domain ID.
    domain_id: u32,
    /// Session ID as hex string.
    session_id: String,
    /// Parsed `--ros-args` sections.
    args: RosArgs,
    /// Next node ID counter.
    next_node_id: AtomicU32,
    /// Graph cache for entity discovery.
    graph_cache: Arc<Mutex<GraphCache>>,
    /// Parameter store shared by all nodes in this context.
    params: Arc<Mutex<ParameterStore>>,
    /// Liveliness subscriber feeding the graph cache (kept alive).
    _graph_subscriber: zenoh::pubsub::Subscriber<()>,
}

/// Context wrapping a Zenoh session.
///
/// A context represents a single Zenoh session and can contain multiple
/// nodes. All nodes within a context share the same session, arguments,
/// and parameter store.
///
/// # Example
///
/// ```ignore
/// let ctx = Context::new()?;
/// let node = ctx.create_node("nodeletctl_1", None)?;
/// ```
#[derive(Clone)]
pub struct Context {
    inner: Arc<ContextInner>,
}

impl Context {
    /// Create a new context, parsing `--ros-args` from `std::env::args`.
    ///
    /// This will:
    /// 1. Read `ROS_DOMAIN_ID` from environment (default: 0)
    /// 2. Read `ZENOH_SESSION_CONFIG_URI` for custom config (optional)
    /// 3. Open a Zenoh session in peer mode connecting to localhost:7447
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments are malformed or the Zenoh
    /// session cannot be opened.
    pub fn new() -> Result<Self> {
        let cli_args: Vec<String> = env::args().collect();
        let (args, _) = nodelet_args::parse_args(&cli_args)?;
        Self::with_args(args)
    }

    /// Create a new context from already-parsed arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if the Zenoh session cannot be opened.
    pub fn with_args(args: RosArgs) -> Result<Self> {
        let domain_id = env::var(ROS_DOMAIN_ID)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);

        // Build Zenoh config
        let mut config = zenoh::Config::default();

        // Check for custom config file
        if let Ok(config_uri) = env::var(ZENOH_SESSION_CONFIG_URI) {
            config = zenoh::Config::from_file(&config_uri)
                .map_err(|e| Error::InvalidConfig(format!("Failed to load config: {}", e)))?;
        } else {
            // Default config: peer mode, connect to local router
            config
                .connect
                .endpoints
                .set(vec![DEFAULT_ROUTER_ENDPOINT.parse().unwrap()])
                .map_err(|e| Error::InvalidConfig(format!("Failed to set endpoints: {:?}", e)))?;
        }

        Self::with_config(domain_id, args, config)
    }

    /// Create a new context with custom Zenoh configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the Zenoh session cannot be opened.
    pub fn with_config(domain_id: u32, args: RosArgs, config: zenoh::Config) -> Result<Self> {
        let session = zenoh::open(config).wait()?;

        // ZenohId Display provides hex format
        let session_id = session.zid().to_string();

        let graph_cache = Arc::new(Mutex::new(GraphCache::new()));

        // Subscribe to liveliness tokens for graph discovery
        let key = format!("{}/**", crate::keyexpr::LIVELINESS_PREFIX);
        let cache_clone = Arc::clone(&graph_cache);
        let graph_subscriber = session
            .liveliness()
            .declare_subscriber(&key)
            .callback(move |sample| {
                let key_expr = sample.key_expr().as_str();
                let mut cache = cache_clone.lock();
                cache.handle_liveliness_token(key_expr, sample.kind());
            })
            .wait()?;

        // Query tokens that were already alive before we subscribed
        let replies = session.liveliness().get(&key).wait()?;
        {
            let mut cache = graph_cache.lock();
            while let Ok(reply) = replies.recv() {
                if let Ok(sample) = reply.result() {
                    cache.handle_liveliness_token(sample.key_expr().as_str(), sample.kind());
                }
            }
        }

        let inner = Arc::new(ContextInner {
            session,
            domain_id,
            session_id,
            args,
            next_node_id: AtomicU32::new(0),
            graph_cache,
            params: Arc::new(Mutex::new(ParameterStore::new())),
            _graph_subscriber: graph_subscriber,
        });

        Ok(Context { inner })
    }

    /// Get the ROS domain ID.
    pub fn domain_id(&self) -> u32 {
        self.inner.domain_id
    }

    /// Get the Zenoh session ID as a hex string.
    pub fn session_id(&self) -> &str {
        &self.inner.session_id
    }

    /// Get a reference to the Zenoh session.
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    /// Get the parsed command-line arguments.
    pub fn args(&self) -> &RosArgs {
        &self.inner.args
    }

    /// Get the shared parameter store.
    pub fn params(&self) -> &Arc<Mutex<ParameterStore>> {
        &self.inner.params
    }

    /// Create a new node.
    ///
    /// The effective name and namespace honor any `__node` and `__ns`
    /// remap rules from the context's arguments.
    ///
    /// # Arguments
    ///
    /// * `name` - Node name (must be a valid node name)
    /// * `namespace` - Optional namespace (must be a valid namespace)
    ///
    /// # Errors
    ///
    /// Returns an error if the name or namespace is invalid, or if the
    /// liveliness token cannot be declared.
    pub fn create_node(&self, name: &str, namespace: Option<&str>) -> Result<Arc<Node>> {
        nodelet_args::names::validate_node_name(name)?;

        if let Some(ns) = namespace
            && !ns.is_empty()
        {
            nodelet_args::names::validate_namespace(ns)?;
        }

        let node_id = self.inner.next_node_id.fetch_add(1, Ordering::SeqCst);

        Node::new(self.clone(), node_id, name, namespace.unwrap_or(""))
    }

    /// Get a snapshot of the graph cache.
    pub fn graph_cache(&self) -> GraphCache {
        self.inner.graph_cache.lock().clone()
    }
}
