//! Death notifier - the per-event pipeline from a death to two outbound messages.
//!
//! The pipeline works as follows:
//! 1. **Sanitize**: Clean the victim name
//! 2. **Attribute**: Resolve cause, killer and weapon from recorded damage
//! 3. **Locate**: Classify the death position into a zone (if enabled)
//! 4. **Categorize**: Map the cause to a death category
//! 5. **Render**: Pick a template and fill in names and location
//! 6. **Dispatch**: Broadcast locally, then submit to the external platform
//!
//! Steps 1-5 run inside a panic boundary. If a collaborator panics, the victim still
//! gets a plain `"<victim> died"` on the local channel. Event log failures, panics
//! included, are logged and dropped.
//!
//! Both channels carry the same text. It is stripped of control characters and
//! made safe for the game font before dispatch, so the external message is always
//! the local one with a glyph in front.

use rand::Rng;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tokio::runtime::Handle;

use sim_rules::{EntityRef, WorldState};

use crate::attribution::{AttributionResolver, AttributionResult, DamageHistory};
use crate::config::NotifierConfig;
use crate::death_type::classify;
use crate::dispatch::{DispatchOutcome, ExternalSink, LocalSink, NotificationDispatcher};
use crate::error::{Degradation, Outcome};
use crate::events::{DeathEvent, EventLog, NotificationRecord, RenderedNotification};
use crate::location::{LocationZoneClassifier, LocationZoneResult, WorldQuery};
use crate::sanitizer::{sanitize_for_external_channel, sanitize_for_local_channel, sanitize_name};
use crate::templates::{
    killer_display_name, render, weapon_display_name, MessageTemplateEngine, TemplateStore,
};

/// External services the notifier reads from and writes to.
pub struct Collaborators {
    pub damage: Arc<dyn DamageHistory>,
    pub world: Arc<dyn WorldQuery>,
    pub local: Arc<dyn LocalSink>,
    pub external: Option<Arc<dyn ExternalSink>>,
}

impl Collaborators {
    /// Use an in-memory world for both damage history and world queries.
    pub fn from_world(
        world: Arc<WorldState>,
        local: Arc<dyn LocalSink>,
        external: Option<Arc<dyn ExternalSink>>,
    ) -> Self {
        Self {
            damage: world.clone(),
            world,
            local,
            external,
        }
    }
}

/// Everything the render stage worked out for one death.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderReport {
    pub notification: RenderedNotification,
    pub attribution: AttributionResult,
    pub location: LocationZoneResult,
    pub killer: String,
    pub weapon: String,
    /// Fallbacks taken along the way, in pipeline order.
    pub diagnostics: Vec<Degradation>,
}

/// Turns death events into notifications.
pub struct DeathNotifier {
    config: Arc<NotifierConfig>,
    resolver: AttributionResolver,
    locator: LocationZoneClassifier,
    templates: MessageTemplateEngine,
    dispatcher: NotificationDispatcher,
    event_log: Option<Arc<dyn EventLog>>,
}

impl DeathNotifier {
    /// Create a notifier. External sends are spawned on `runtime`.
    pub fn new(config: NotifierConfig, collaborators: Collaborators, runtime: Handle) -> Self {
        let store = Arc::new(config.template_store());
        Self::with_templates(config, store, collaborators, runtime)
    }

    /// Create a notifier over an explicit template store, ignoring `config.templates`.
    pub fn with_templates(
        config: NotifierConfig,
        store: Arc<TemplateStore>,
        collaborators: Collaborators,
        runtime: Handle,
    ) -> Self {
        let config = Arc::new(config);
        Self {
            resolver: AttributionResolver::new(collaborators.damage),
            locator: LocationZoneClassifier::new(collaborators.world),
            templates: MessageTemplateEngine::new(store),
            dispatcher: NotificationDispatcher::new(
                config.clone(),
                collaborators.local,
                collaborators.external,
                runtime,
            ),
            config,
            event_log: None,
        }
    }

    /// Record every dispatched notification.
    pub fn with_event_log(mut self, event_log: Arc<dyn EventLog>) -> Self {
        self.event_log = Some(event_log);
        self
    }

    pub fn config(&self) -> &NotifierConfig {
        &self.config
    }

    /// Handle a death using a thread-local random source.
    pub fn notify(&self, event: &DeathEvent) -> DispatchOutcome {
        self.notify_with_rng(event, &mut rand::thread_rng())
    }

    /// Handle a death. Never fails and never panics on collaborator panics.
    pub fn notify_with_rng<R: Rng + ?Sized>(
        &self,
        event: &DeathEvent,
        rng: &mut R,
    ) -> DispatchOutcome {
        let victim = sanitize_name(&event.victim_name);

        let rendered = panic::catch_unwind(AssertUnwindSafe(|| self.render(event, rng)));
        let report = match rendered {
            Ok(report) => report,
            Err(_) => {
                log::error!("{} (victim {})", Degradation::PipelinePanicked, victim);
                let text = format!("{} died", victim);
                return self.dispatcher.dispatch_local_only(&victim, &text);
            }
        };

        if !report.diagnostics.is_empty() {
            log::debug!("notification for {} degraded: {:?}", victim, report.diagnostics);
        }

        let outcome = self.dispatcher.dispatch(&victim, &report.notification, rng);
        self.record(&victim, &report.notification);
        outcome
    }

    /// Run every stage up to dispatch.
    pub fn render<R: Rng + ?Sized>(&self, event: &DeathEvent, rng: &mut R) -> RenderReport {
        let mut diagnostics = Vec::new();
        let victim = sanitize_name(&event.victim_name);
        let entity = event.victim.as_ref();

        let attribution = self
            .resolver
            .resolve(entity.map(|e| e as &dyn EntityRef));
        let location = if self.config.enable_location_zones {
            self.locator
                .classify(entity.and_then(|e| e.position), entity.map(|e| e.id))
        } else {
            Outcome::degraded(LocationZoneResult::default(), Degradation::ZonesDisabled)
        };

        let category = classify(attribution.value.cause);
        let template = self.templates.select_template(category, rng);
        diagnostics.extend(
            [attribution.diagnostic, location.diagnostic, template.diagnostic]
                .into_iter()
                .flatten(),
        );

        let attribution = attribution.into_value();
        let location = location.into_value();
        let killer = killer_display_name(&attribution);
        let weapon = weapon_display_name(&attribution);
        let location_text = if self.config.enable_location_zones {
            location.describe(self.config.show_grid_name)
        } else {
            String::new()
        };

        let rendered = render(&template.value, &victim, &killer, &weapon, &location_text);
        let mut text = sanitize_for_local_channel(&sanitize_for_external_channel(&rendered));
        if text.is_empty() {
            text = format!("{} died", victim);
        }

        RenderReport {
            notification: RenderedNotification {
                external_text: text.clone(),
                local_text: text,
                category,
            },
            attribution,
            location,
            killer,
            weapon,
            diagnostics,
        }
    }

    fn record(&self, victim: &str, notification: &RenderedNotification) {
        let Some(event_log) = &self.event_log else {
            return;
        };
        let record = NotificationRecord {
            victim: victim.to_string(),
            category: notification.category,
            text: notification.local_text.clone(),
        };
        let recorded = panic::catch_unwind(AssertUnwindSafe(|| event_log.record(&record)));
        match recorded {
            Ok(Ok(())) => {}
            Ok(Err(err)) => log::warn!("failed to record notification for {}: {}", victim, err),
            Err(_) => log::warn!("event log panicked recording notification for {}", victim),
        }
    }
}
