// SPDX-License-Identifier: GPL-3.0-only

//! Cooperative close negotiation.
//!
//! A close request is never honoured immediately. The negotiator walks the
//! request through a fixed sequence:
//!
//! ```text
//! Idle -> CloseRequested -> Draining -> Closed
//! ```
//!
//! 1. **CloseRequested**: the request is marked handled and its deferral is
//!    taken, so the platform keeps the window alive.
//! 2. **Draining**: every registered [`CloseCallback`] runs once, in
//!    registration order. The registry is emptied before the first callback
//!    runs. A callback that fails or panics is logged and skipped.
//! 3. **Closed**: the window is consolidated and the deferral released,
//!    whether or not consolidation succeeded.
//!
//! The coordinator publishes `closing = true` between steps 1 and 2.

pub mod registry;

pub use registry::{CloseCallback, CloseCallbackRegistry, close_callback};

use crate::error::{ViewError, ViewResult};
use crate::platform::{CloseRequest, Deferral, ViewPlatform};
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Progress of the close negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CloseState {
    #[default]
    Idle,
    CloseRequested,
    Draining,
    Closed,
}

/// Outcome of draining the callback registry.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Number of callbacks that were invoked.
    pub invoked: usize,
    /// Failures, in invocation order.
    pub failures: Vec<ViewError>,
}

/// Runs the close sequence for the primary window.
#[derive(Debug, Default)]
pub struct CloseNegotiator {
    state: CloseState,
    registry: CloseCallbackRegistry,
}

impl CloseNegotiator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> CloseState {
        self.state
    }

    /// Registers a save-before-exit callback. See [`CloseCallbackRegistry::register`].
    pub fn register(&mut self, callback: CloseCallback) -> bool {
        self.registry.register(callback)
    }

    pub fn unregister(&mut self, callback: &CloseCallback) -> bool {
        self.registry.unregister(callback)
    }

    #[must_use]
    pub fn registry(&self) -> &CloseCallbackRegistry {
        &self.registry
    }

    /// Intercepts a close request and takes its deferral.
    ///
    /// Returns `None` when a negotiation has already started; the repeated
    /// request is still marked handled and its deferral released at once.
    pub fn intercept(&mut self, request: &mut CloseRequest) -> Option<Deferral> {
        request.set_handled();
        let deferral = request.take_deferral();

        if self.state != CloseState::Idle {
            tracing::debug!("Close already in progress ({:?}), releasing request", self.state);
            if let Some(deferral) = deferral {
                deferral.complete();
            }
            return None;
        }

        tracing::info!("Close requested, deferring teardown");
        self.state = CloseState::CloseRequested;
        // A request whose deferral was already taken still gets the full sequence.
        Some(deferral.unwrap_or_else(Deferral::detached))
    }

    /// Invokes every registered callback once, in registration order.
    pub fn drain(&mut self) -> DrainReport {
        self.state = CloseState::Draining;
        let callbacks = self.registry.take_for_drain();
        let mut report = DrainReport::default();

        for (index, callback) in callbacks.iter().enumerate() {
            report.invoked += 1;
            if let Err(err) = run_callback(callback) {
                tracing::warn!("Close callback {} failed: {}", index, err);
                report.failures.push(err);
            }
        }

        tracing::debug!(
            "Drained {} close callbacks ({} failed)",
            report.invoked,
            report.failures.len()
        );
        report
    }

    /// Consolidates the window and releases the deferral.
    ///
    /// Consolidation failures are not retried; the error is returned after the
    /// deferral has been released so the platform can finish its own shutdown.
    pub async fn finish(
        &mut self,
        platform: &mut impl ViewPlatform,
        deferral: Deferral,
    ) -> ViewResult<()> {
        let result = platform.try_consolidate().await;
        self.state = CloseState::Closed;

        match &result {
            Ok(()) => tracing::info!("Window consolidated"),
            Err(err) => tracing::error!("Failed to consolidate window: {}", err),
        }

        deferral.complete();
        result
    }
}

fn run_callback(callback: &CloseCallback) -> ViewResult<()> {
    match catch_unwind(AssertUnwindSafe(|| callback())) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(ViewError::CloseCallback(err.to_string())),
        Err(payload) => Err(ViewError::CloseCallback(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {message}")
    } else {
        "panicked".to_string()
    }
}
