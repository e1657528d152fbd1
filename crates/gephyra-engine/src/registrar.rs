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

//! Remote exposure registrar.
//!
//! Thin ownership wrapper over the transport: tracks how many registrations
//! are live and whether the endpoints have been torn down, so registration
//! after shutdown is refused instead of reaching a dead transport.

use gephyra_core::error::RegistrationError;
use gephyra_core::runtime::Task;
use gephyra_core::transport::{RemoteHandle, RemoteTransport};
use std::sync::Arc;

/// Registers adopted components with the remote-invocation transport.
pub struct RemoteRegistrar {
    transport: Arc<dyn RemoteTransport>,
    registered: usize,
    closed: bool,
}

impl RemoteRegistrar {
    /// Wraps a transport for this bridge's lifetime.
    pub fn new(transport: Arc<dyn RemoteTransport>) -> Self {
        Self {
            transport,
            registered: 0,
            closed: false,
        }
    }

    /// Publishes one task for remote access.
    pub fn register(&mut self, task: &Arc<dyn Task>) -> Result<RemoteHandle, RegistrationError> {
        if self.closed {
            return Err(RegistrationError::EndpointsClosed);
        }
        let handle = self.transport.register(task)?;
        self.registered += 1;
        log::debug!(
            "Registrar: exposed '{}' as {:?} ({} live)",
            task.name(),
            handle,
            self.registered
        );
        Ok(handle)
    }

    /// Number of currently live registrations.
    pub fn registered(&self) -> usize {
        self.registered
    }

    /// Removes every live registration. Idempotent.
    pub fn unregister_all(&mut self) {
        if self.registered > 0 {
            log::debug!("Registrar: removing {} registrations", self.registered);
            self.transport.unregister_all();
            self.registered = 0;
        }
    }

    /// Tears down the transport endpoint machinery. Idempotent; afterwards
    /// [`register`](Self::register) refuses with `EndpointsClosed`.
    pub fn shutdown_endpoints(&mut self) {
        if !self.closed {
            self.transport.shutdown_endpoints();
            self.closed = true;
        }
    }
}
