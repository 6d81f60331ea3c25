//! Positional construction arguments.

use tether_core::{Atom, Outcome, ParameterSet, ParameterValue};

use crate::attribute::SlotConverter;
use crate::host::Host;

/// Binds leading positional atoms to fixed parameters in descriptor order.
///
/// Each fixed parameter consumes one atom per slot while atoms remain; slots
/// without an atom keep the descriptor default. Binding never fails.
pub struct ParamFetcher<'a> {
    args: &'a [Atom],
    cursor: usize,
}

impl<'a> ParamFetcher<'a> {
    /// `args` must already be cut at the first named attribute.
    pub fn new(args: &'a [Atom]) -> Self {
        Self { args, cursor: 0 }
    }

    /// Bind every fixed parameter of `params`.
    ///
    /// Clamping diagnostics are merged into `sink`.
    pub fn bind(&mut self, params: &mut ParameterSet, host: &dyn Host, sink: &mut Outcome) {
        let fixed: Vec<(usize, ParameterValue)> = params
            .iter()
            .filter(|(_, descriptor, _)| descriptor.fixed)
            .map(|(index, descriptor, _)| {
                let converter = SlotConverter::for_kind(descriptor.kind.scalar_kind());
                let mut slots = descriptor.default.to_slots();
                for slot in slots.iter_mut() {
                    if let Some(atom) = self.next() {
                        *slot = (converter.from_atom)(atom, host);
                    }
                }
                let value = ParameterValue::from_slots(&descriptor.kind, slots)
                    .unwrap_or_else(|| descriptor.default.clone());
                (index, value)
            })
            .collect();

        for (index, value) in fixed {
            params.set(index, value, Some(sink));
        }
    }

    /// Atoms consumed so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }

    /// Atoms left over after binding.
    pub fn remaining(&self) -> usize {
        self.args.len() - self.cursor
    }

    fn next(&mut self) -> Option<&'a Atom> {
        let atom = self.args.get(self.cursor)?;
        self.cursor += 1;
        Some(atom)
    }
}

/// Number of positional atoms the fixed parameters accept.
pub fn positional_capacity(params: &ParameterSet) -> usize {
    params
        .descriptors()
        .iter()
        .filter(|descriptor| descriptor.fixed)
        .map(|descriptor| descriptor.arity())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingHost;
    use std::sync::Arc;
    use tether_core::{ParameterDescriptor, Status};

    fn params() -> ParameterSet {
        let descriptors: Arc<[ParameterDescriptor]> = vec![
            ParameterDescriptor::float("threshold", "Threshold", 0.1).fixed(),
            ParameterDescriptor::long("size", "Size", 64),
            ParameterDescriptor::long("order", "Order", 1).fixed().with_max(8.0),
        ]
        .into();
        ParameterSet::new(descriptors)
    }

    #[test]
    fn test_binds_in_descriptor_order() {
        let host = RecordingHost::new();
        let mut params = params();
        let args = [Atom::Float(0.5), Atom::Long(2)];
        let mut fetcher = ParamFetcher::new(&args);
        let mut sink = Outcome::Ok;
        fetcher.bind(&mut params, &host, &mut sink);

        assert_eq!(params.float(0), 0.5);
        assert_eq!(params.long(1), 64);
        assert_eq!(params.long(2), 2);
        assert_eq!(fetcher.consumed(), 2);
        assert!(sink.is_ok());
    }

    #[test]
    fn test_missing_args_default_fill() {
        let host = RecordingHost::new();
        let mut params = params();
        let args = [Atom::Long(3)];
        let mut fetcher = ParamFetcher::new(&args);
        fetcher.bind(&mut params, &host, &mut Outcome::Ok);

        assert_eq!(params.float(0), 3.0);
        assert_eq!(params.long(2), 1);
        assert_eq!(fetcher.remaining(), 0);
    }

    #[test]
    fn test_excess_args_left_over_and_clamped() {
        let host = RecordingHost::new();
        let mut params = params();
        let args = [Atom::Float(0.2), Atom::Long(20), Atom::Long(7)];
        let mut fetcher = ParamFetcher::new(&args);
        let mut sink = Outcome::Ok;
        fetcher.bind(&mut params, &host, &mut sink);

        assert_eq!(params.long(2), 8);
        assert_eq!(sink.status(), Status::Warning);
        assert_eq!(fetcher.remaining(), 1);
        assert_eq!(positional_capacity(&params), 2);
    }
}
