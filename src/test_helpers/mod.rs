// SPDX-License-Identifier: GPL-3.0-only
use std::sync::{Arc, Mutex};

use crate::manifest::Manifest;
use crate::status::{StatusEvent, StatusReporter};

/// Build a manifest from name/version pairs, in the given order.
pub fn manifest_of(pairs: &[(&str, &str)]) -> Manifest {
    let mut manifest = Manifest::new();
    for (name, version) in pairs {
        manifest.insert(*name, *version);
    }
    manifest
}

/// Reporter that records every event for later assertions.
pub struct RecordingReporter {
    events: Mutex<Vec<StatusEvent>>,
}

impl RecordingReporter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            events: Mutex::new(Vec::new()),
        })
    }

    pub fn events(&self) -> Vec<StatusEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl StatusReporter for RecordingReporter {
    fn report(&self, event: StatusEvent) {
        self.events.lock().unwrap().push(event);
    }
}
