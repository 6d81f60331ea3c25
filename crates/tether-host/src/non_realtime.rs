//! Triggered batch protocol.
//!
//! A trigger only queues a request. The batch itself runs when the host
//! services its serialized deferred context, so runs never overlap each
//! other and never overlap attribute changes made from that context.

use tether_core::{Client, Outcome, ParameterSet};

use crate::host::{Egress, Host};
use crate::reporter::ResultReporter;

/// Batch entry point of a client type.
pub type BatchFn<C> = fn(&mut C, &ParameterSet) -> Outcome;

/// Drives a client's batch capability.
pub struct NonRealTimeEngine<C: Client> {
    process: BatchFn<C>,
    pending: usize,
}

impl<C: Client> NonRealTimeEngine<C> {
    pub fn new(process: BatchFn<C>) -> Self {
        Self {
            process,
            pending: 0,
        }
    }

    /// Queue one batch run. Safe to call from any dispatch context.
    pub fn request(&mut self) {
        self.pending += 1;
    }

    /// Requests waiting for the deferred context.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Run every queued request, oldest first, each to completion.
    ///
    /// A run returning `Ok` fires [`Egress::Done`]. Any other outcome goes
    /// to `reporter` and suppresses the completion signal.
    pub fn drain(
        &mut self,
        client: &mut C,
        params: &ParameterSet,
        reporter: &mut ResultReporter,
        host: &dyn Host,
    ) -> usize {
        let mut runs = 0;
        while self.pending > 0 {
            self.pending -= 1;
            runs += 1;
            log::debug!("Running batch job ({} queued)", self.pending);

            let outcome = (self.process)(client, params);
            let ok = outcome.is_ok();
            reporter.report(outcome, host);
            if ok {
                host.emit(Egress::Done, &[]);
            }
        }
        runs
    }
}
