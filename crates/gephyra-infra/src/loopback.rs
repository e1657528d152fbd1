// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Loopback remote-exposure transport.
//!
//! Registrations are weak rows over the bridge-owned tasks; a background
//! dispatch thread serves inspection snapshots over a channel, standing in
//! for the remote-invocation endpoint of a real deployment. The thread only
//! reads registration rows — it never executes component logic. Shutting
//! down the endpoints closes the channel and joins the thread.

use crossbeam_channel::{Receiver, Sender};
use gephyra_core::error::RegistrationError;
use gephyra_core::runtime::Task;
use gephyra_core::transport::{RemoteHandle, RemoteTransport};
use std::sync::{Arc, Mutex, Weak};
use std::thread;

/// One row of the inspection view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredComponent {
    /// Handle issued at registration.
    pub handle: RemoteHandle,
    /// Registered task name.
    pub name: String,
    /// Registered task model.
    pub model: String,
    /// Whether the underlying task is still alive.
    pub alive: bool,
}

enum InspectionRequest {
    List(Sender<Vec<RegisteredComponent>>),
    // Clients hold sender clones, so endpoint shutdown cannot rely on
    // channel disconnection alone to end the dispatch loop.
    Shutdown,
}

struct Row {
    handle: RemoteHandle,
    name: String,
    model: String,
    task: Weak<dyn Task>,
}

struct State {
    rows: Vec<Row>,
    next_handle: u64,
    closed: bool,
}

impl State {
    fn snapshot(&self) -> Vec<RegisteredComponent> {
        self.rows
            .iter()
            .map(|row| RegisteredComponent {
                handle: row.handle,
                name: row.name.clone(),
                model: row.model.clone(),
                alive: row.task.upgrade().is_some(),
            })
            .collect()
    }
}

/// Client side of the inspection endpoint.
#[derive(Clone)]
pub struct InspectionClient {
    request_tx: Sender<InspectionRequest>,
}

impl InspectionClient {
    /// Snapshot of all current registrations. Empty once the endpoints are
    /// shut down.
    pub fn list(&self) -> Vec<RegisteredComponent> {
        let (reply_tx, reply_rx) = crossbeam_channel::bounded(1);
        if self.request_tx.send(InspectionRequest::List(reply_tx)).is_err() {
            return Vec::new();
        }
        reply_rx.recv().unwrap_or_default()
    }
}

/// In-process implementation of the remote-exposure contract.
pub struct LoopbackTransport {
    state: Arc<Mutex<State>>,
    request_tx: Mutex<Option<Sender<InspectionRequest>>>,
    dispatcher: Mutex<Option<thread::JoinHandle<()>>>,
}

impl LoopbackTransport {
    /// Creates the transport and starts its inspection dispatch thread.
    pub fn new() -> Self {
        let state = Arc::new(Mutex::new(State {
            rows: Vec::new(),
            next_handle: 1,
            closed: false,
        }));
        let (request_tx, request_rx) = crossbeam_channel::unbounded();
        let dispatcher = thread::spawn({
            let state = Arc::clone(&state);
            move || dispatch_loop(state, request_rx)
        });
        Self {
            state,
            request_tx: Mutex::new(Some(request_tx)),
            dispatcher: Mutex::new(Some(dispatcher)),
        }
    }

    /// Client for the inspection endpoint, or `None` after shutdown.
    pub fn client(&self) -> Option<InspectionClient> {
        self.request_tx
            .lock()
            .unwrap()
            .as_ref()
            .map(|request_tx| InspectionClient {
                request_tx: request_tx.clone(),
            })
    }

    /// Number of current registration rows.
    pub fn registered(&self) -> usize {
        self.state.lock().unwrap().rows.len()
    }
}

impl Default for LoopbackTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn dispatch_loop(state: Arc<Mutex<State>>, request_rx: Receiver<InspectionRequest>) {
    log::debug!("Loopback: inspection dispatch thread started");
    while let Ok(request) = request_rx.recv() {
        match request {
            InspectionRequest::List(reply_tx) => {
                let snapshot = state.lock().unwrap().snapshot();
                let _ = reply_tx.send(snapshot);
            }
            InspectionRequest::Shutdown => break,
        }
    }
    log::debug!("Loopback: inspection dispatch thread stopped");
}

impl RemoteTransport for LoopbackTransport {
    fn register(&self, task: &Arc<dyn Task>) -> Result<RemoteHandle, RegistrationError> {
        let mut state = self.state.lock().unwrap();
        if state.closed {
            return Err(RegistrationError::EndpointsClosed);
        }
        if state.rows.iter().any(|row| row.name == task.name()) {
            return Err(RegistrationError::Refused {
                name: task.name().to_string(),
                reason: "a registration with this name already exists".to_string(),
            });
        }
        let handle = RemoteHandle(state.next_handle);
        state.next_handle += 1;
        state.rows.push(Row {
            handle,
            name: task.name().to_string(),
            model: task.model().to_string(),
            task: Arc::downgrade(task),
        });
        Ok(handle)
    }

    fn unregister_all(&self) {
        let mut state = self.state.lock().unwrap();
        if !state.rows.is_empty() {
            log::debug!("Loopback: dropping {} registrations", state.rows.len());
            state.rows.clear();
        }
    }

    fn shutdown_endpoints(&self) {
        {
            let mut state = self.state.lock().unwrap();
            if state.closed {
                return;
            }
            state.closed = true;
        }
        // Tell the dispatch loop to end, then join outside the state lock.
        if let Some(request_tx) = self.request_tx.lock().unwrap().take() {
            let _ = request_tx.send(InspectionRequest::Shutdown);
        }
        if let Some(dispatcher) = self.dispatcher.lock().unwrap().take() {
            let _ = dispatcher.join();
        }
        log::info!("Loopback: endpoints shut down");
    }
}

impl Drop for LoopbackTransport {
    fn drop(&mut self) {
        self.shutdown_endpoints();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubTask {
        name: String,
    }

    impl Task for StubTask {
        fn name(&self) -> &str {
            &self.name
        }
        fn model(&self) -> &str {
            "stub"
        }
    }

    fn task(name: &str) -> Arc<dyn Task> {
        Arc::new(StubTask {
            name: name.to_string(),
        })
    }

    #[test]
    fn inspection_reflects_registrations_and_liveness() {
        let transport = LoopbackTransport::new();
        let client = transport.client().unwrap();

        let alpha = task("alpha");
        let beta = task("beta");
        transport.register(&alpha).unwrap();
        transport.register(&beta).unwrap();

        let view = client.list();
        assert_eq!(view.len(), 2);
        assert_eq!(view[0].name, "alpha");
        assert!(view.iter().all(|row| row.alive));

        // Only weak references are held: dropping the task shows up in the
        // next snapshot.
        drop(beta);
        let view = client.list();
        assert!(view[0].alive);
        assert!(!view[1].alive);
    }

    #[test]
    fn duplicate_names_are_refused() {
        let transport = LoopbackTransport::new();
        let first = task("echo");
        let second = task("echo");
        transport.register(&first).unwrap();
        let err = transport.register(&second).unwrap_err();
        assert!(matches!(err, RegistrationError::Refused { name, .. } if name == "echo"));
    }

    #[test]
    fn shutdown_closes_registration_and_inspection() {
        let transport = LoopbackTransport::new();
        let client = transport.client().unwrap();
        transport.register(&task("alpha")).unwrap();

        transport.unregister_all();
        transport.shutdown_endpoints();
        // Idempotent.
        transport.shutdown_endpoints();

        assert!(matches!(
            transport.register(&task("beta")),
            Err(RegistrationError::EndpointsClosed)
        ));
        assert!(client.list().is_empty());
        assert!(transport.client().is_none());
    }
}
