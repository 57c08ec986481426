// SPDX-FileCopyrightText: 2026 Thud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event dispatcher: ordered handler lists per event name.
//!
//! Handlers run in registration order. A failing or panicking handler never
//! stops the rest of the round; failures are collected and returned together
//! once every handler has run.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use thud_core::{EventData, EventHandler, HandlerFailure, HandlerRecord, ThudError};

/// A handler as stored in the dispatcher.
#[derive(Clone)]
pub struct Subscription {
    pub module: String,
    pub callback: Arc<dyn EventHandler>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("module", &self.module)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy)]
struct PayloadType {
    id: TypeId,
    name: &'static str,
}

/// Per-event ordered handler lists and optional payload type declarations.
#[derive(Debug, Clone)]
pub struct EventDispatcher {
    subscriptions: HashMap<String, Vec<Subscription>>,
    payload_types: HashMap<String, PayloadType>,
    catch_panics: bool,
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new(true)
    }
}

impl EventDispatcher {
    /// Create an empty dispatcher. With `catch_panics`, a handler panic is
    /// recorded as a failure instead of unwinding through `publish`.
    pub fn new(catch_panics: bool) -> Self {
        Self {
            subscriptions: HashMap::new(),
            payload_types: HashMap::new(),
            catch_panics,
        }
    }

    /// Append a handler to its event's list.
    pub fn subscribe(&mut self, module: &str, record: &HandlerRecord) {
        let list = self.subscriptions.entry(record.event.clone()).or_default();
        list.push(Subscription {
            module: module.to_string(),
            callback: Arc::clone(&record.callback),
        });
        tracing::debug!(
            module,
            event = %record.event,
            position = list.len() - 1,
            "handler subscribed"
        );
    }

    /// Remove every handler registered by `module`. Returns how many were removed.
    pub fn unsubscribe_module(&mut self, module: &str) -> usize {
        let mut removed = 0;
        self.subscriptions.retain(|_, list| {
            let before = list.len();
            list.retain(|s| s.module != module);
            removed += before - list.len();
            !list.is_empty()
        });
        removed
    }

    /// Require payloads published on `event` to be of type `T`.
    pub fn declare_payload<T: Any>(&mut self, event: &str) {
        self.payload_types.insert(
            event.to_string(),
            PayloadType {
                id: TypeId::of::<T>(),
                name: std::any::type_name::<T>(),
            },
        );
    }

    /// Name of the payload type declared for `event`, if any.
    pub fn declared_payload(&self, event: &str) -> Option<&'static str> {
        self.payload_types.get(event).map(|p| p.name)
    }

    pub fn subscriber_count(&self, event: &str) -> usize {
        self.subscriptions.get(event).map_or(0, Vec::len)
    }

    /// Handlers of `event` in invocation order.
    pub fn subscribers(&self, event: &str) -> &[Subscription] {
        self.subscriptions.get(event).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Event names with at least one subscriber, sorted.
    pub fn events(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.subscriptions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Total number of subscriptions across all events.
    pub fn len(&self) -> usize {
        self.subscriptions.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Invoke every handler of `event` once, in registration order, with the
    /// same borrowed payload. Returns the number of handlers invoked.
    ///
    /// Publishing an event nobody subscribed to succeeds and does nothing,
    /// whatever the payload type.
    pub fn publish(&self, event: &str, payload: &dyn Any) -> Result<usize, ThudError> {
        let handlers = self.subscribers(event);
        if handlers.is_empty() {
            tracing::trace!(event, "published with no subscribers");
            return Ok(0);
        }

        if let Some(expected) = self.payload_types.get(event) {
            if (*payload).type_id() != expected.id {
                return Err(ThudError::PayloadMismatch {
                    event: event.to_string(),
                    expected: expected.name,
                });
            }
        }

        let data = EventData::new(event, payload);
        let mut failures = Vec::new();
        for (position, subscription) in handlers.iter().enumerate() {
            if let Err(failure) = self.call(position, subscription, &data) {
                tracing::warn!(
                    event,
                    module = %failure.module,
                    position,
                    panicked = failure.panicked,
                    error = %failure.message,
                    "event handler failed"
                );
                failures.push(failure);
            }
        }

        tracing::debug!(
            event,
            delivered = handlers.len(),
            failed = failures.len(),
            "event published"
        );
        if failures.is_empty() {
            Ok(handlers.len())
        } else {
            Err(ThudError::HandlerFailures {
                event: event.to_string(),
                delivered: handlers.len(),
                failures,
            })
        }
    }

    fn call(
        &self,
        position: usize,
        subscription: &Subscription,
        data: &EventData<'_>,
    ) -> Result<(), HandlerFailure> {
        let failure = |message: String, panicked: bool| HandlerFailure {
            module: subscription.module.clone(),
            position,
            message,
            panicked,
        };

        if !self.catch_panics {
            return subscription
                .callback
                .handle(data)
                .map_err(|e| failure(e.to_string(), false));
        }

        match catch_unwind(AssertUnwindSafe(|| subscription.callback.handle(data))) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(failure(e.to_string(), false)),
            Err(panic) => Err(failure(panic_message(panic.as_ref()), true)),
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tracing_test::traced_test;

    fn handler(f: impl EventHandler + 'static, event: &str) -> HandlerRecord {
        HandlerRecord {
            event: event.to_string(),
            callback: Arc::new(f),
        }
    }

    fn recorder(log: &Arc<Mutex<Vec<String>>>, tag: &'static str) -> impl EventHandler + 'static {
        let log = Arc::clone(log);
        move |_data: &EventData<'_>| -> Result<(), ThudError> {
            log.lock().unwrap().push(tag.to_string());
            Ok(())
        }
    }

    #[test]
    fn handlers_run_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = EventDispatcher::default();
        dispatcher.subscribe("A", &handler(recorder(&log, "A"), "startup"));
        dispatcher.subscribe("B", &handler(recorder(&log, "B"), "startup"));

        assert_eq!(dispatcher.publish("startup", &()).unwrap(), 2);
        assert_eq!(*log.lock().unwrap(), vec!["A", "B"]);
    }

    #[test]
    fn publish_without_subscribers_is_a_no_op() {
        let dispatcher = EventDispatcher::default();
        assert_eq!(dispatcher.publish("nobody-listens", &42u32).unwrap(), 0);
        assert!(dispatcher.is_empty());
    }

    #[test]
    fn every_handler_sees_the_same_payload() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = EventDispatcher::default();
        for module in ["a", "b", "c"] {
            let seen = Arc::clone(&seen);
            dispatcher.subscribe(
                module,
                &handler(
                    move |data: &EventData<'_>| -> Result<(), ThudError> {
                        let value = data.expect::<String>()?;
                        seen.lock().unwrap().push(value.as_ptr() as usize);
                        Ok(())
                    },
                    "msg",
                ),
            );
        }

        let payload = String::from("shared");
        dispatcher.publish("msg", &payload).unwrap();
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(seen.iter().all(|&p| p == payload.as_ptr() as usize));
    }

    #[test]
    fn failures_do_not_stop_later_handlers() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = EventDispatcher::default();
        dispatcher.subscribe("a", &handler(recorder(&log, "a"), "tick"));
        dispatcher.subscribe(
            "b",
            &handler(
                |_d: &EventData<'_>| -> Result<(), ThudError> {
                    Err(ThudError::Handler("nope".into()))
                },
                "tick",
            ),
        );
        dispatcher.subscribe(
            "c",
            &handler(|_d: &EventData<'_>| -> Result<(), ThudError> { panic!("kaboom") }, "tick"),
        );
        dispatcher.subscribe("d", &handler(recorder(&log, "d"), "tick"));

        match dispatcher.publish("tick", &()).unwrap_err() {
            ThudError::HandlerFailures { event, delivered, failures } => {
                assert_eq!(event, "tick");
                assert_eq!(delivered, 4);
                assert_eq!(failures.len(), 2);
                assert_eq!(failures[0].module, "b");
                assert_eq!(failures[0].position, 1);
                assert!(!failures[0].panicked);
                assert!(failures[0].message.contains("nope"));
                assert_eq!(failures[1].module, "c");
                assert!(failures[1].panicked);
                assert_eq!(failures[1].message, "kaboom");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(*log.lock().unwrap(), vec!["a", "d"]);
    }

    #[test]
    fn declared_payload_type_is_enforced() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = EventDispatcher::default();
        dispatcher.declare_payload::<u64>("block");
        dispatcher.subscribe("a", &handler(recorder(&log, "a"), "block"));

        let err = dispatcher.publish("block", &"not a number").unwrap_err();
        assert!(matches!(err, ThudError::PayloadMismatch { expected: "u64", .. }));
        assert!(log.lock().unwrap().is_empty());

        assert_eq!(dispatcher.publish("block", &7u64).unwrap(), 1);
        assert_eq!(dispatcher.declared_payload("block"), Some("u64"));
        assert_eq!(dispatcher.declared_payload("other"), None);
    }

    #[test]
    fn declared_payload_not_checked_without_subscribers() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = EventDispatcher::default();
        dispatcher.declare_payload::<u64>("block");
        assert_eq!(dispatcher.publish("block", &"x").unwrap(), 0);

        dispatcher.subscribe("a", &handler(recorder(&log, "a"), "block"));
        assert!(dispatcher.publish("block", &"x").is_err());
    }

    #[test]
    fn unsubscribe_module_keeps_other_handlers_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = EventDispatcher::default();
        dispatcher.subscribe("a", &handler(recorder(&log, "a1"), "e"));
        dispatcher.subscribe("b", &handler(recorder(&log, "b"), "e"));
        dispatcher.subscribe("a", &handler(recorder(&log, "a2"), "e"));
        dispatcher.subscribe("c", &handler(recorder(&log, "c"), "e"));
        dispatcher.subscribe("a", &handler(recorder(&log, "only-a"), "f"));

        assert_eq!(dispatcher.unsubscribe_module("a"), 3);
        assert_eq!(dispatcher.events(), vec!["e"]);
        dispatcher.publish("e", &()).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["b", "c"]);
    }

    #[test]
    #[traced_test]
    fn handler_failures_are_logged() {
        let mut dispatcher = EventDispatcher::default();
        dispatcher.subscribe(
            "noisy",
            &handler(
                |_d: &EventData<'_>| -> Result<(), ThudError> {
                    Err(ThudError::Handler("disk full".into()))
                },
                "flush",
            ),
        );

        assert!(dispatcher.publish("flush", &()).is_err());
        assert!(logs_contain("event handler failed"));
        assert!(logs_contain("disk full"));
    }
}
