//! Offline Worker Module
//!
//! Request interceptor that keeps the job board usable without a network.
//! Static assets, job API reads, images and pages are stored in versioned
//! cache partitions and served back, or replaced by synthetic responses,
//! when the upstream cannot answer.
//!
//! Events are dispatched through [`ServiceWorker::dispatch`]; each handler
//! returns its outcome instead of relying on listener registration.

mod fetch;
mod http;
mod lifecycle;
mod message;
mod network;
pub mod notification;
pub mod offline;
pub mod route;
mod storage;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::body::Bytes;
use axum::http::Method;
use tokio::sync::RwLock;
use tracing::debug;
use url::Url;

use crate::config::{Config, DEFAULT_STATIC_ASSETS};
use crate::error::{AppError, Result};

pub use http::{RequestMode, WorkerRequest, WorkerResponse, CACHE_HIT_HEADER};
pub use lifecycle::WorkerState;
pub use message::WorkerMessage;
pub use network::{HttpNetwork, Network};
pub use notification::{Notification, NotificationClick, PushPayload};
pub use storage::CacheStorage;

// == Worker Options ==
#[derive(Debug, Clone)]
pub struct WorkerOptions {
    /// Origin the worker is scoped to; relative routes resolve against it
    pub origin: Url,
    pub static_cache: String,
    pub dynamic_cache: String,
    /// Routes pre-cached on install
    pub static_assets: Vec<String>,
}

impl WorkerOptions {
    /// Options for a worker scoped to `origin`, using the configured
    /// partition names and static routes.
    pub fn from_config(config: &Config, origin: &str) -> Result<Self> {
        let origin = Url::parse(origin)
            .map_err(|e| AppError::InvalidRequest(format!("invalid origin '{origin}': {e}")))?;

        Ok(Self {
            origin,
            static_cache: config.static_cache_name(),
            dynamic_cache: config.dynamic_cache_name(),
            static_assets: config.static_assets.clone(),
        })
    }
}

impl Default for WorkerOptions {
    fn default() -> Self {
        Self {
            origin: Url::parse("http://localhost:3000").expect("static origin url is valid"),
            static_cache: "job-app-static-v1".to_string(),
            dynamic_cache: "job-app-dynamic-v1".to_string(),
            static_assets: DEFAULT_STATIC_ASSETS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

// == Events ==
/// Everything the worker reacts to.
#[derive(Debug, Clone)]
pub enum WorkerEvent {
    Install,
    Activate,
    Fetch(WorkerRequest),
    Message(WorkerMessage),
    Push(Option<Bytes>),
    NotificationClick(NotificationClick),
}

#[derive(Debug, Clone)]
pub enum EventOutcome {
    Installed,
    /// Names of the partitions deleted during activation
    Activated(Vec<String>),
    Response(WorkerResponse),
    /// Message applied; messages have no reply
    Handled,
    ShowNotification(Notification),
    /// Window to open after a click, `None` if dismissed
    OpenWindow(Option<String>),
}

// == Service Worker ==
pub struct ServiceWorker {
    options: WorkerOptions,
    storage: CacheStorage,
    network: Arc<dyn Network>,
    state: RwLock<WorkerState>,
    skip_waiting: AtomicBool,
    clients_claimed: AtomicBool,
}

impl ServiceWorker {
    pub fn new(options: WorkerOptions, network: Arc<dyn Network>) -> Self {
        Self::with_storage(options, network, CacheStorage::new())
    }

    /// Builds a worker over existing partitions, as a newer worker version
    /// would find them.
    pub fn with_storage(options: WorkerOptions, network: Arc<dyn Network>, storage: CacheStorage) -> Self {
        Self {
            options,
            storage,
            network,
            state: RwLock::new(WorkerState::Parsed),
            skip_waiting: AtomicBool::new(false),
            clients_claimed: AtomicBool::new(false),
        }
    }

    /// Routes an event to its handler.
    pub async fn dispatch(&self, event: WorkerEvent) -> Result<EventOutcome> {
        match event {
            WorkerEvent::Install => {
                self.install().await?;
                Ok(EventOutcome::Installed)
            }
            WorkerEvent::Activate => Ok(EventOutcome::Activated(self.activate().await)),
            WorkerEvent::Fetch(request) => Ok(EventOutcome::Response(self.handle_fetch(request).await?)),
            WorkerEvent::Message(message) => {
                self.handle_message(message).await;
                Ok(EventOutcome::Handled)
            }
            WorkerEvent::Push(data) => {
                let payload = PushPayload::parse(data.as_ref());
                let notification = Notification::from_payload(payload);
                debug!(title = %notification.title, "push received");
                Ok(EventOutcome::ShowNotification(notification))
            }
            WorkerEvent::NotificationClick(click) => {
                Ok(EventOutcome::OpenWindow(notification::click_target(&click)))
            }
        }
    }

    pub async fn state(&self) -> WorkerState {
        *self.state.read().await
    }

    async fn set_state(&self, state: WorkerState) {
        *self.state.write().await = state;
    }

    pub fn storage(&self) -> &CacheStorage {
        &self.storage
    }

    pub fn network(&self) -> &dyn Network {
        self.network.as_ref()
    }

    pub fn origin(&self) -> &Url {
        &self.options.origin
    }

    pub fn static_cache(&self) -> &str {
        &self.options.static_cache
    }

    pub fn dynamic_cache(&self) -> &str {
        &self.options.dynamic_cache
    }

    /// Requests activation as soon as install finishes.
    pub fn skip_waiting(&self) {
        self.skip_waiting.store(true, Ordering::SeqCst);
    }

    pub fn skip_waiting_requested(&self) -> bool {
        self.skip_waiting.load(Ordering::SeqCst)
    }

    fn claim_clients(&self) {
        self.clients_claimed.store(true, Ordering::SeqCst);
    }

    /// Whether open pages are controlled by this worker.
    pub fn clients_claimed(&self) -> bool {
        self.clients_claimed.load(Ordering::SeqCst)
    }

    fn static_requests(&self) -> Result<Vec<WorkerRequest>> {
        self.options
            .static_assets
            .iter()
            .map(|route| {
                let url = self.options.origin.join(route).map_err(|e| {
                    AppError::InvalidRequest(format!("invalid static route '{route}': {e}"))
                })?;
                Ok(WorkerRequest::new(Method::GET, url, RequestMode::Cors))
            })
            .collect()
    }
}

impl std::fmt::Debug for ServiceWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceWorker")
            .field("options", &self.options)
            .field("clients_claimed", &self.clients_claimed())
            .finish_non_exhaustive()
    }
}
