// Copyright (c) 2026 The clusterset authors
// SPDX-License-Identifier: Apache-2.0

//! Event emission behind an injected sink.
//!
//! The reconciler never talks to a globally retrieved recorder; it is handed
//! an [`EventSink`] at startup. Emission is fire-and-forget: a failed publish
//! is logged and otherwise ignored, it never fails a reconcile tick.

use crate::constants::EVENT_REPORTER;
use crate::crd::ClusterSet;
use async_trait::async_trait;
use kube::runtime::events::{Event, EventType, Recorder, Reporter};
use kube::{Client, Resource};
use tracing::warn;

/// Where reconcile notifications go.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Record a normal event against the owning object.
    async fn record(&self, object: &ClusterSet, reason: &str, message: &str);

    /// Record a warning event against the owning object.
    async fn record_warning(&self, object: &ClusterSet, reason: &str, message: &str);
}

/// [`EventSink`] publishing Kubernetes events.
#[derive(Clone)]
pub struct KubeEventSink {
    recorder: Recorder,
}

impl KubeEventSink {
    /// Sink reporting as the clusterset controller.
    #[must_use]
    pub fn new(client: Client) -> Self {
        let reporter = Reporter {
            controller: EVENT_REPORTER.into(),
            instance: std::env::var("POD_NAME").ok(),
        };
        Self {
            recorder: Recorder::new(client, reporter),
        }
    }

    async fn publish(&self, object: &ClusterSet, type_: EventType, reason: &str, message: &str) {
        let event = Event {
            type_,
            reason: reason.to_string(),
            note: Some(message.to_string()),
            action: "Sync".to_string(),
            secondary: None,
        };

        if let Err(e) = self.recorder.publish(&event, &object.object_ref(&())).await {
            warn!(reason = %reason, "Failed to publish event: {e}");
        }
    }
}

#[async_trait]
impl EventSink for KubeEventSink {
    async fn record(&self, object: &ClusterSet, reason: &str, message: &str) {
        self.publish(object, EventType::Normal, reason, message).await;
    }

    async fn record_warning(&self, object: &ClusterSet, reason: &str, message: &str) {
        self.publish(object, EventType::Warning, reason, message).await;
    }
}

/// [`EventSink`] that drops everything. Used by tests and one-shot commands.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullEventSink;

#[async_trait]
impl EventSink for NullEventSink {
    async fn record(&self, _object: &ClusterSet, _reason: &str, _message: &str) {}

    async fn record_warning(&self, _object: &ClusterSet, _reason: &str, _message: &str) {}
}
