//! Surfacing outcomes as host diagnostics.

use tether_core::Outcome;

use crate::host::Host;

/// Maps outcomes to host diagnostics, gated by the `warnings` attribute.
///
/// The last reported outcome is kept whether or not it was posted.
#[derive(Debug)]
pub struct ResultReporter {
    object: &'static str,
    verbose: bool,
    last: Outcome,
}

impl ResultReporter {
    pub fn new(object: &'static str, verbose: bool) -> Self {
        Self {
            object,
            verbose,
            last: Outcome::Ok,
        }
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// The most recently reported outcome.
    pub fn last(&self) -> &Outcome {
        &self.last
    }

    /// Post `outcome` if verbose, then retain it.
    pub fn report(&mut self, outcome: Outcome, host: &dyn Host) {
        if self.verbose {
            match &outcome {
                Outcome::Ok => {}
                Outcome::Warning(message) => host.warn(self.object, message),
                Outcome::Error(message) => host.error(self.object, message),
            }
        }
        self.last = outcome;
    }
}
