//! Shared fixtures for session scenarios.

use std::sync::Arc;

use bookpath::{
    BookPathConfig, MemoryMirrorStore, RecordingPresenter, Session, SessionContext,
    ShardedDocumentStore,
};
use tokio::runtime::Handle;

/// A session plus handles on everything it talks to.
pub struct Harness {
    pub session: Session,
    pub local: Arc<MemoryMirrorStore>,
    pub remote: Arc<ShardedDocumentStore>,
    pub presenter: Arc<RecordingPresenter>,
}

impl Harness {
    /// Session over fresh in-memory stores. Must run inside a Tokio runtime.
    pub fn new(config: BookPathConfig) -> Self {
        Self::with_stores(
            config,
            Arc::new(MemoryMirrorStore::new()),
            Arc::new(ShardedDocumentStore::new()),
        )
    }

    /// Session over the given stores, e.g. to simulate a restart.
    pub fn with_stores(
        config: BookPathConfig,
        local: Arc<MemoryMirrorStore>,
        remote: Arc<ShardedDocumentStore>,
    ) -> Self {
        let presenter = Arc::new(RecordingPresenter::default());
        let ctx = SessionContext::init(config, Handle::current());
        let session = Session::new(ctx, local.clone(), remote.clone(), presenter.clone());
        Self {
            session,
            local,
            remote,
            presenter,
        }
    }
}
