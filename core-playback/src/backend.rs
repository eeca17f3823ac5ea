//! # Backend Routing
//!
//! The controller holds exactly two backends and picks one per track from its
//! [`SourceKind`]. Callers never branch on the source themselves.

use bridge_traits::{BackendKind, MediaBackend};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

use crate::source::SourceKind;

/// The local and embed backends a controller routes between.
#[derive(Clone)]
pub struct BackendSet {
    local: Arc<dyn MediaBackend>,
    embed: Arc<dyn MediaBackend>,
}

impl BackendSet {
    pub fn new(local: Arc<dyn MediaBackend>, embed: Arc<dyn MediaBackend>) -> Self {
        if local.kind() != BackendKind::Local {
            warn!(kind = %local.kind(), "Backend registered as local reports a different kind");
        }
        if embed.kind() != BackendKind::Embed {
            warn!(kind = %embed.kind(), "Backend registered as embed reports a different kind");
        }
        Self { local, embed }
    }

    /// Backend that plays sources of `kind`.
    pub fn route(&self, kind: SourceKind) -> &Arc<dyn MediaBackend> {
        match kind.backend() {
            BackendKind::Local => &self.local,
            BackendKind::Embed => &self.embed,
        }
    }

    pub fn get(&self, kind: BackendKind) -> &Arc<dyn MediaBackend> {
        match kind {
            BackendKind::Local => &self.local,
            BackendKind::Embed => &self.embed,
        }
    }
}

impl fmt::Debug for BackendSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendSet")
            .field("local", &self.local.kind())
            .field("embed", &self.embed.kind())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::{MediaEventSink, MediaRequest};
    use mockall::mock;

    mock! {
        Backend {}

        #[async_trait::async_trait]
        impl MediaBackend for Backend {
            fn kind(&self) -> BackendKind;
            async fn load(&self, request: MediaRequest) -> BridgeResult<()>;
            async fn play(&self) -> BridgeResult<()>;
            async fn pause(&self) -> BridgeResult<()>;
            async fn seek(&self, position_secs: f64) -> BridgeResult<()>;
            async fn set_volume(&self, volume: f32) -> BridgeResult<()>;
            fn current_time(&self) -> f64;
            fn duration(&self) -> Option<f64>;
            fn attach(&self, sink: MediaEventSink);
            fn detach(&self);
        }
    }

    fn backend(kind: BackendKind) -> Arc<dyn MediaBackend> {
        let mut mock = MockBackend::new();
        mock.expect_kind().return_const(kind);
        Arc::new(mock)
    }

    #[test]
    fn test_route_by_source_kind() {
        let set = BackendSet::new(backend(BackendKind::Local), backend(BackendKind::Embed));

        assert_eq!(set.route(SourceKind::Local).kind(), BackendKind::Local);
        assert_eq!(set.route(SourceKind::DirectUrl).kind(), BackendKind::Embed);
        assert_eq!(set.route(SourceKind::YouTube).kind(), BackendKind::Embed);
        assert_eq!(set.get(BackendKind::Embed).kind(), BackendKind::Embed);
    }
}
