//! Tree store service
//!
//! Owns all client-side tree state: root nodes, lazily loaded children,
//! expansion flags, locales and translations. Every read/write against the
//! remote API goes through it. Failures never escape as `Err`; they end up
//! in `error`, in a notification, and in the per-request status map.

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::application::{ApplicationResult, JsonResultExt};
use crate::config::Settings;
use crate::domain::{
    notification_text, resolve_title, ChildrenState, Locale, MessageKind, NewNode, Node, NodeId,
    Notification, Severity, Translations, DEFAULT_LANGUAGE,
};
use crate::infrastructure::traits::Transport;

pub const LOCALES_PATH: &str = "/locales";
pub const NODES_PATH: &str = "/nodes";
pub const NODE_PATH: &str = "/node";

const CREATE_FAILED: &str = "Failed to create node";
const DELETE_FAILED: &str = "Failed to delete node.";
const DELETE_HAS_CHILDREN: &str = "Can't delete a parent node.";

/// Identifies one logical request for status tracking.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RequestKey {
    Locales,
    RootNodes,
    Children(NodeId),
    Translations,
    CreateNode,
    DeleteNode(NodeId),
}

/// Outcome of the most recent request for a [`RequestKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestStatus {
    InFlight,
    Succeeded,
    Failed(String),
}

impl RequestStatus {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, RequestStatus::InFlight)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RequestStatus::Succeeded)
    }
}

/// Store tunables, usually derived from [`Settings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Language selected until `set_language` succeeds
    pub default_language: String,
    /// Endpoint serving the translations map
    pub translations_path: String,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            default_language: DEFAULT_LANGUAGE.to_string(),
            translations_path: LOCALES_PATH.to_string(),
        }
    }
}

impl From<&Settings> for StoreOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            default_language: settings.default_language.clone(),
            translations_path: settings.api.translations_path.clone(),
        }
    }
}

/// State container for the node browser.
pub struct TreeStore {
    transport: Arc<dyn Transport>,
    translations_path: String,

    nodes: Vec<Node>,
    node_children: HashMap<NodeId, Vec<Node>>,
    expanded_nodes: HashMap<NodeId, bool>,
    translations: Translations,
    locales: Vec<Locale>,
    current_language: String,
    requests: HashMap<RequestKey, RequestStatus>,
    error: Option<String>,
    notification: Option<Notification>,
}

impl TreeStore {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_options(transport, StoreOptions::default())
    }

    pub fn with_options(transport: Arc<dyn Transport>, options: StoreOptions) -> Self {
        Self {
            transport,
            translations_path: options.translations_path,
            nodes: Vec::new(),
            node_children: HashMap::new(),
            expanded_nodes: HashMap::new(),
            translations: Translations::new(),
            locales: Vec::new(),
            current_language: options.default_language,
            requests: HashMap::new(),
            error: None,
            notification: None,
        }
    }

    // ------------------------------------------------------------
    // state
    // ------------------------------------------------------------

    /// Root nodes in server order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn locales(&self) -> &[Locale] {
        &self.locales
    }

    pub fn translations(&self) -> &Translations {
        &self.translations
    }

    pub fn current_language(&self) -> &str {
        &self.current_language
    }

    /// Last error message, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    /// Remove and return the current notification.
    pub fn take_notification(&mut self) -> Option<Notification> {
        self.notification.take()
    }

    /// True while any request is in flight.
    pub fn is_loading(&self) -> bool {
        self.requests.values().any(RequestStatus::is_in_flight)
    }

    pub fn request_status(&self, key: &RequestKey) -> Option<&RequestStatus> {
        self.requests.get(key)
    }

    // ------------------------------------------------------------
    // network actions
    // ------------------------------------------------------------

    /// Replace the available locales.
    pub async fn fetch_locales(&mut self) -> RequestStatus {
        self.begin(RequestKey::Locales);
        self.error = None;

        let result = self.get_as::<Vec<Locale>>(LOCALES_PATH, &[]).await;
        match result {
            Ok(locales) => {
                debug!(count = locales.len(), "locales loaded");
                self.locales = locales;
                self.settle(RequestKey::Locales, RequestStatus::Succeeded)
            }
            Err(e) => self.fail(RequestKey::Locales, e.to_string()),
        }
    }

    /// Replace the root nodes.
    pub async fn fetch_root_nodes(&mut self) -> RequestStatus {
        self.begin(RequestKey::RootNodes);
        self.error = None;

        let result = self.transport.get(NODES_PATH, &[]).await;
        match result {
            Ok(value) => {
                let nodes = coerce_nodes(value);
                debug!(count = nodes.len(), "root nodes loaded");
                self.nodes = nodes;
                self.settle(RequestKey::RootNodes, RequestStatus::Succeeded)
            }
            Err(e) => self.fail(RequestKey::RootNodes, e.to_string()),
        }
    }

    /// Fetch the children of `parent_id` without caching them.
    ///
    /// Returns an empty list on failure.
    pub async fn fetch_children(&mut self, parent_id: &NodeId) -> Vec<Node> {
        let key = RequestKey::Children(parent_id.clone());
        self.begin(key.clone());

        let result = self
            .transport
            .get(NODES_PATH, &[("parent", parent_id.to_string())])
            .await;
        match result {
            Ok(value) => {
                self.settle(key, RequestStatus::Succeeded);
                coerce_nodes(value)
            }
            Err(e) => {
                self.fail(key, e.to_string());
                Vec::new()
            }
        }
    }

    /// Reload roots (`None`) or the children of a node.
    pub async fn refresh_node(&mut self, parent_id: Option<&NodeId>) {
        match parent_id {
            None => {
                self.fetch_root_nodes().await;
            }
            Some(id) => self.load_children(id).await,
        }
    }

    /// Create a node. The caller refreshes the affected level afterwards.
    pub async fn create_node(&mut self, data: &NewNode) -> bool {
        self.begin(RequestKey::CreateNode);

        let result = self.post_node(data).await;
        match result {
            Ok(created) => {
                debug!(response = %created, "node created");
                self.show_message(MessageKind::NodeCreatedSuccess, Severity::Success);
                self.settle(RequestKey::CreateNode, RequestStatus::Succeeded);
                true
            }
            Err(e) => {
                let message = e.server_message().unwrap_or(CREATE_FAILED).to_string();
                warn!(error = %e, "create node failed");
                self.error = Some(message.clone());
                self.show_message(MessageKind::FailedToCreateNode, Severity::Danger);
                self.settle(RequestKey::CreateNode, RequestStatus::Failed(message));
                false
            }
        }
    }

    /// Delete a node and drop it from the caches.
    ///
    /// Any failure is reported to the user as "can't delete a parent node";
    /// the actual cause is kept in the request status.
    pub async fn delete_node(&mut self, id: &NodeId, parent_id: Option<&NodeId>) -> bool {
        let key = RequestKey::DeleteNode(id.clone());
        self.begin(key.clone());

        let path = format!("{NODE_PATH}/{id}");
        let result = self.transport.delete(&path).await;
        match result {
            Ok(_) => {
                match parent_id {
                    None => self.nodes.retain(|node| &node.id != id),
                    Some(parent) => {
                        if let Some(children) = self.node_children.get_mut(parent) {
                            children.retain(|child| &child.id != id);
                        }
                    }
                }
                self.expanded_nodes.remove(id);
                self.node_children.remove(id);

                self.show_message(MessageKind::NodeDeletedSuccess, Severity::Success);
                self.settle(key, RequestStatus::Succeeded);
                true
            }
            Err(e) => {
                let cause = match (e.status(), e.server_message()) {
                    (Some(400), _) => DELETE_HAS_CHILDREN,
                    (_, Some(message)) => message,
                    _ => DELETE_FAILED,
                }
                .to_string();
                warn!(%id, %cause, "delete node failed");
                self.show_message(MessageKind::CannotDeleteParent, Severity::Danger);
                self.settle(key, RequestStatus::Failed(cause));
                false
            }
        }
    }

    /// Replace the translations map. Failures are only logged.
    pub async fn fetch_translations(&mut self) -> RequestStatus {
        self.begin(RequestKey::Translations);

        let result = self
            .get_as::<Translations>(&self.translations_path, &[])
            .await;
        match result {
            Ok(translations) => {
                debug!(count = translations.len(), "translations loaded");
                self.translations = translations;
                self.settle(RequestKey::Translations, RequestStatus::Succeeded)
            }
            Err(e) => {
                warn!(error = %e, "Could not load translations");
                self.settle(RequestKey::Translations, RequestStatus::Failed(e.to_string()))
            }
        }
    }

    /// Flip the expansion of a node, loading its children on first expand.
    pub async fn toggle_node(&mut self, node_id: &NodeId) {
        if self.is_node_expanded(node_id) {
            self.expanded_nodes.insert(node_id.clone(), false);
            return;
        }

        self.expanded_nodes.insert(node_id.clone(), true);
        if !self.node_children.contains_key(node_id) {
            self.load_children(node_id).await;
        }
    }

    /// Load and cache the children of a node.
    ///
    /// Always leaves an entry in the cache; 404 means "no children".
    pub async fn load_children(&mut self, node_id: &NodeId) {
        let key = RequestKey::Children(node_id.clone());
        self.begin(key.clone());

        let result = self
            .transport
            .get(NODES_PATH, &[("parent", node_id.to_string())])
            .await;
        match result {
            Ok(value) => {
                let children = coerce_nodes(value);
                debug!(%node_id, count = children.len(), "children loaded");
                self.node_children.insert(node_id.clone(), children);
                self.settle(key, RequestStatus::Succeeded);
            }
            Err(e) if e.status() == Some(404) => {
                self.node_children.insert(node_id.clone(), Vec::new());
                self.show_message(MessageKind::NoChildren, Severity::Info);
                self.settle(key, RequestStatus::Succeeded);
            }
            Err(e) => {
                error!(%node_id, error = %e, "Failed to load children");
                self.node_children.insert(node_id.clone(), Vec::new());
                self.show_message(MessageKind::FailedToLoadChildren, Severity::Danger);
                self.settle(key, RequestStatus::Failed(e.to_string()));
            }
        }
    }

    // ------------------------------------------------------------
    // local actions and reads
    // ------------------------------------------------------------

    /// Switch the display language. Unknown tags are ignored with a warning.
    pub fn set_language(&mut self, lang: &str) -> bool {
        if !self.locales.iter().any(|l| l.locale == lang) {
            warn!("Locale {lang} not available");
            return false;
        }
        self.current_language = lang.to_string();
        true
    }

    /// Display title of `node` in the current language.
    pub fn get_node_title(&self, node: &Node) -> String {
        resolve_title(node, &self.translations, &self.current_language)
    }

    /// Cached children, empty when not loaded.
    pub fn get_node_children(&self, node_id: &NodeId) -> &[Node] {
        self.node_children
            .get(node_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn children_state(&self, node_id: &NodeId) -> ChildrenState<'_> {
        ChildrenState::from_cached(self.node_children.get(node_id))
    }

    pub fn is_node_expanded(&self, node_id: &NodeId) -> bool {
        self.expanded_nodes.get(node_id).copied().unwrap_or(false)
    }

    pub fn has_children(&self, node_id: &NodeId) -> bool {
        !self.get_node_children(node_id).is_empty()
    }

    /// Localized message for a string key, see [`notification_text`].
    pub fn get_notification_text(&self, key: &str) -> String {
        notification_text(key, &self.current_language)
    }

    pub fn show_notification(&mut self, message: impl Into<String>, severity: Severity) {
        self.notification = Some(Notification::new(message, severity));
    }

    // ------------------------------------------------------------
    // helpers
    // ------------------------------------------------------------

    fn show_message(&mut self, kind: MessageKind, severity: Severity) {
        let text = kind.localized(&self.current_language);
        self.show_notification(text, severity);
    }

    fn begin(&mut self, key: RequestKey) {
        self.requests.insert(key, RequestStatus::InFlight);
    }

    fn settle(&mut self, key: RequestKey, status: RequestStatus) -> RequestStatus {
        self.requests.insert(key, status.clone());
        status
    }

    /// Record a failure as the last error.
    fn fail(&mut self, key: RequestKey, message: String) -> RequestStatus {
        self.error = Some(message.clone());
        self.settle(key, RequestStatus::Failed(message))
    }

    async fn get_as<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApplicationResult<T> {
        let value = self.transport.get(path, query).await?;
        debug!(path, response = %value, "response");
        serde_json::from_value(value).with_request_context(path)
    }

    async fn post_node(&self, data: &NewNode) -> ApplicationResult<Value> {
        let body = serde_json::to_value(data).with_request_context(NODE_PATH)?;
        Ok(self.transport.post(NODE_PATH, &body).await?)
    }
}

/// Node list payload to nodes; anything but an array counts as empty.
fn coerce_nodes(value: Value) -> Vec<Node> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<Node>(item) {
                Ok(node) => Some(node),
                Err(e) => {
                    warn!(error = %e, "skipping malformed child node");
                    None
                }
            })
            .collect(),
        other => {
            debug!(response = %other, "children response is not a list");
            Vec::new()
        }
    }
}
