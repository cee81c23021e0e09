//! Sink and collaborator doubles shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use sim_rules::{DamageRecord, EntityId};

use crate::attribution::DamageHistory;
use crate::dispatch::{ExternalSink, LocalSink, SinkFuture};
use crate::error::SinkError;
use crate::events::{EventLog, NotificationRecord};

#[derive(Debug, Clone, PartialEq)]
pub struct LocalMessage {
    pub text: String,
    pub sender_label: String,
    pub target_id: u64,
    pub color_tag: String,
}

#[derive(Default)]
pub struct RecordingLocalSink {
    sent: Mutex<Vec<LocalMessage>>,
}

impl RecordingLocalSink {
    pub fn sent(&self) -> Vec<LocalMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl LocalSink for RecordingLocalSink {
    fn send(
        &self,
        text: &str,
        sender_label: &str,
        target_id: u64,
        color_tag: &str,
    ) -> Result<(), SinkError> {
        self.sent.lock().unwrap().push(LocalMessage {
            text: text.to_string(),
            sender_label: sender_label.to_string(),
            target_id,
            color_tag: color_tag.to_string(),
        });
        Ok(())
    }
}

pub struct FailingLocalSink {
    panic: bool,
}

impl FailingLocalSink {
    pub fn errors() -> Self {
        Self { panic: false }
    }

    pub fn panics() -> Self {
        Self { panic: true }
    }
}

impl LocalSink for FailingLocalSink {
    fn send(&self, _: &str, _: &str, _: u64, _: &str) -> Result<(), SinkError> {
        if self.panic {
            panic!("broadcast API exploded");
        }
        Err(SinkError::Unavailable("server not ready".to_string()))
    }
}

#[derive(Default)]
pub struct RecordingExternalSink {
    sent: Arc<Mutex<Vec<(String, String)>>>,
    attempts: AtomicUsize,
    failure: Option<SinkError>,
}

impl RecordingExternalSink {
    pub fn failing(error: SinkError) -> Self {
        Self {
            failure: Some(error),
            ..Default::default()
        }
    }

    /// Successfully delivered `(destination, text)` pairs.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl ExternalSink for RecordingExternalSink {
    fn send_async(&self, destination: &str, text: String) -> SinkFuture {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let sent = Arc::clone(&self.sent);
        let failure = self.failure.clone();
        let destination = destination.to_string();

        Box::pin(async move {
            tokio::task::yield_now().await;
            match failure {
                Some(err) => Err(err),
                None => {
                    sent.lock().unwrap().push((destination, text));
                    Ok(())
                }
            }
        })
    }
}

/// Damage history that blows up, to exercise the pipeline's panic boundary.
pub struct PanickingHistory;

impl DamageHistory for PanickingHistory {
    fn damage_events(&self, _victim: EntityId) -> Vec<DamageRecord> {
        panic!("damage tracker unavailable");
    }
}

#[derive(Default)]
pub struct MemoryEventLog {
    records: Mutex<Vec<NotificationRecord>>,
}

impl MemoryEventLog {
    pub fn records(&self) -> Vec<NotificationRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl EventLog for MemoryEventLog {
    fn record(&self, record: &NotificationRecord) -> Result<(), String> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

pub struct FailingEventLog {
    panic: bool,
    attempts: AtomicUsize,
}

impl FailingEventLog {
    pub fn errors() -> Self {
        Self {
            panic: false,
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn panics() -> Self {
        Self {
            panic: true,
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl EventLog for FailingEventLog {
    fn record(&self, _record: &NotificationRecord) -> Result<(), String> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.panic {
            panic!("event log disk gone");
        }
        Err("event log full".to_string())
    }
}
