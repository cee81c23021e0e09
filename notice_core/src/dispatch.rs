//! Fan-out of a rendered notification to the in-game broadcast and the external
//! messaging platform.
//!
//! The local send runs first and to completion. The external send is spawned on
//! the runtime and never awaited here; its `JoinHandle` is handed back so a caller
//! can wait if it wants to. Neither sink can stop the other and nothing is retried.

use rand::seq::SliceRandom;
use rand::Rng;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::config::{NotifierConfig, DEFAULT_GLYPH};
use crate::error::SinkError;
use crate::events::RenderedNotification;

pub type SinkFuture = Pin<Box<dyn Future<Output = Result<(), SinkError>> + Send + 'static>>;

/// In-game broadcast. May block.
pub trait LocalSink: Send + Sync {
    fn send(
        &self,
        text: &str,
        sender_label: &str,
        target_id: u64,
        color_tag: &str,
    ) -> Result<(), SinkError>;
}

/// External messaging platform. Connection handling, timeouts and retries are the
/// sink's own business.
pub trait ExternalSink: Send + Sync {
    fn send_async(&self, destination: &str, text: String) -> SinkFuture;
}

/// What happened to one dispatch.
#[derive(Debug)]
pub struct DispatchOutcome {
    pub local: Result<(), SinkError>,
    /// Decorated text submitted to the external sink, if one was attempted.
    pub external_text: Option<String>,
    /// The spawned external send.
    pub external: Option<JoinHandle<Result<(), SinkError>>>,
}

impl DispatchOutcome {
    /// Wait for the external send. `None` if none was attempted.
    pub async fn external_result(self) -> Option<Result<(), SinkError>> {
        let handle = self.external?;
        Some(match handle.await {
            Ok(result) => result,
            Err(err) => Err(SinkError::Unavailable(format!(
                "external send task failed: {}",
                err
            ))),
        })
    }
}

pub struct NotificationDispatcher {
    config: Arc<NotifierConfig>,
    glyphs: Vec<String>,
    local: Arc<dyn LocalSink>,
    external: Option<Arc<dyn ExternalSink>>,
    runtime: Handle,
}

impl NotificationDispatcher {
    pub fn new(
        config: Arc<NotifierConfig>,
        local: Arc<dyn LocalSink>,
        external: Option<Arc<dyn ExternalSink>>,
        runtime: Handle,
    ) -> Self {
        let glyphs = config.glyphs();
        Self {
            config,
            glyphs,
            local,
            external,
            runtime,
        }
    }

    /// One of the configured glyphs, or the default.
    pub fn pick_glyph<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        self.glyphs
            .choose(rng)
            .map(String::as_str)
            .unwrap_or(DEFAULT_GLYPH)
    }

    /// Send to the local sink, then submit the decorated text to the external sink.
    pub fn dispatch<R: Rng + ?Sized>(
        &self,
        victim_name: &str,
        notification: &RenderedNotification,
        rng: &mut R,
    ) -> DispatchOutcome {
        let local = self.send_local(victim_name, &notification.local_text);

        let Some(sink) = self.external.clone() else {
            return DispatchOutcome {
                local,
                external_text: None,
                external: None,
            };
        };

        let text = format!("{} {}", self.pick_glyph(rng), notification.external_text);
        let destination = self.config.external_destination.clone();
        let victim = victim_name.to_string();
        let submitted = text.clone();

        let handle = self.runtime.spawn(async move {
            let result = sink.send_async(&destination, submitted).await;
            if let Err(err) = &result {
                log::warn!(
                    "external notification for {} to {} failed: {}",
                    victim,
                    destination,
                    err
                );
            }
            result
        });

        DispatchOutcome {
            local,
            external_text: Some(text),
            external: Some(handle),
        }
    }

    /// Send plain text to the local sink only.
    pub fn dispatch_local_only(&self, victim_name: &str, text: &str) -> DispatchOutcome {
        DispatchOutcome {
            local: self.send_local(victim_name, text),
            external_text: None,
            external: None,
        }
    }

    fn send_local(&self, victim_name: &str, text: &str) -> Result<(), SinkError> {
        let sent = panic::catch_unwind(AssertUnwindSafe(|| {
            self.local.send(
                text,
                &self.config.local_sender_label,
                self.config.local_target_id,
                &self.config.local_color,
            )
        }));

        let result = sent.unwrap_or_else(|_| {
            Err(SinkError::Unavailable("local sink panicked".to_string()))
        });
        match &result {
            Ok(()) => log::debug!("local notification for {} sent", victim_name),
            Err(err) => log::warn!("local notification for {} failed: {}", victim_name, err),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::death_type::DeathCategory;
    use crate::test_support::{FailingLocalSink, RecordingExternalSink, RecordingLocalSink};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn notification(text: &str) -> RenderedNotification {
        RenderedNotification {
            local_text: text.to_string(),
            external_text: text.to_string(),
            category: DeathCategory::Accident,
        }
    }

    fn dispatcher(
        config: NotifierConfig,
        local: Arc<dyn LocalSink>,
        external: Option<Arc<dyn ExternalSink>>,
    ) -> NotificationDispatcher {
        NotificationDispatcher::new(Arc::new(config), local, external, Handle::current())
    }

    #[tokio::test]
    async fn test_dispatch_to_both_sinks() {
        let local = Arc::new(RecordingLocalSink::default());
        let external = Arc::new(RecordingExternalSink::default());
        let dispatcher = dispatcher(
            NotifierConfig::default(),
            local.clone(),
            Some(external.clone()),
        );

        let outcome = dispatcher.dispatch(
            "Bob",
            &notification("Bob died"),
            &mut StdRng::seed_from_u64(3),
        );
        assert!(outcome.local.is_ok());
        assert_eq!(outcome.external_result().await, Some(Ok(())));

        let sent = local.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].text, "Bob died");
        assert_eq!(sent[0].sender_label, "Server");
        assert_eq!(sent[0].target_id, 0);
        assert_eq!(sent[0].color_tag, "Red");

        assert_eq!(
            external.sent(),
            vec![("deaths".to_string(), format!("{} Bob died", DEFAULT_GLYPH))]
        );
    }

    #[tokio::test]
    async fn test_glyph_from_configured_list() {
        let config = NotifierConfig {
            decoration_glyphs: "A, B ,C".to_string(),
            ..Default::default()
        };
        let dispatcher = dispatcher(config, Arc::new(RecordingLocalSink::default()), None);
        let mut rng = StdRng::seed_from_u64(11);

        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            seen.insert(dispatcher.pick_glyph(&mut rng).to_string());
        }
        let expected: std::collections::HashSet<String> =
            ["A", "B", "C"].iter().map(|s| s.to_string()).collect();
        assert_eq!(seen, expected);
    }

    #[tokio::test]
    async fn test_local_failure_still_sends_external() {
        let external = Arc::new(RecordingExternalSink::default());
        let dispatcher = dispatcher(
            NotifierConfig::default(),
            Arc::new(FailingLocalSink::errors()),
            Some(external.clone()),
        );

        let outcome = dispatcher.dispatch(
            "Bob",
            &notification("Bob died"),
            &mut StdRng::seed_from_u64(1),
        );
        assert!(matches!(outcome.local, Err(SinkError::Unavailable(_))));
        assert_eq!(outcome.external_result().await, Some(Ok(())));
        assert_eq!(external.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_local_panic_still_sends_external() {
        let external = Arc::new(RecordingExternalSink::default());
        let dispatcher = dispatcher(
            NotifierConfig::default(),
            Arc::new(FailingLocalSink::panics()),
            Some(external.clone()),
        );

        let outcome = dispatcher.dispatch(
            "Bob",
            &notification("Bob died"),
            &mut StdRng::seed_from_u64(1),
        );
        assert!(outcome.local.is_err());
        assert_eq!(outcome.external_result().await, Some(Ok(())));
        assert_eq!(external.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_external_failure_is_contained() {
        let local = Arc::new(RecordingLocalSink::default());
        let external = Arc::new(RecordingExternalSink::failing(SinkError::Timeout));
        let dispatcher = dispatcher(
            NotifierConfig::default(),
            local.clone(),
            Some(external.clone()),
        );

        let outcome = dispatcher.dispatch(
            "Bob",
            &notification("Bob died"),
            &mut StdRng::seed_from_u64(1),
        );
        assert!(outcome.local.is_ok());
        assert_eq!(outcome.external_result().await, Some(Err(SinkError::Timeout)));
        assert_eq!(local.sent().len(), 1);
        // Attempted once, no retry.
        assert_eq!(external.attempts(), 1);
    }

    #[tokio::test]
    async fn test_identical_dispatches_are_not_deduplicated() {
        let local = Arc::new(RecordingLocalSink::default());
        let external = Arc::new(RecordingExternalSink::default());
        let dispatcher = dispatcher(
            NotifierConfig::default(),
            local.clone(),
            Some(external.clone()),
        );
        let mut rng = StdRng::seed_from_u64(5);

        let first = dispatcher.dispatch("Bob", &notification("Bob died"), &mut rng);
        let second = dispatcher.dispatch("Bob", &notification("Bob died"), &mut rng);
        first.external_result().await;
        second.external_result().await;

        assert_eq!(local.sent().len(), 2);
        assert_eq!(external.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_without_external_sink() {
        let local = Arc::new(RecordingLocalSink::default());
        let dispatcher = dispatcher(NotifierConfig::default(), local.clone(), None);

        let outcome = dispatcher.dispatch(
            "Bob",
            &notification("Bob died"),
            &mut StdRng::seed_from_u64(1),
        );
        assert!(outcome.local.is_ok());
        assert!(outcome.external_text.is_none());
        assert_eq!(outcome.external_result().await, None);
        assert_eq!(local.sent().len(), 1);
    }
}
