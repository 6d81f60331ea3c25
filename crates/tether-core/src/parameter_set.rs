//! Runtime parameter storage.
//!
//! A [`ParameterSet`] holds one [`ParameterValue`] per descriptor, index
//! aligned with the descriptor list it was created from. Its length never
//! changes.
//!
//! # Constraints
//!
//! Writes through [`ParameterSet::set`] clamp the written parameter against
//! its own [`Constraint`]s. [`ParameterSet::keep_constrained`] re-checks the
//! whole set until it is stable, so that cross-parameter relations settle;
//! running it again on a stable set changes nothing and reports nothing.

use std::sync::Arc;

use crate::buffer::SharedBuffer;
use crate::descriptor::{Constraint, ParameterDescriptor, ParameterKind};
use crate::error::{CoreError, CoreResult};
use crate::outcome::Outcome;
use crate::value::{ParameterValue, Scalar};

/// Ordered, index-aligned collection of parameter values.
#[derive(Clone)]
pub struct ParameterSet {
    descriptors: Arc<[ParameterDescriptor]>,
    values: Vec<ParameterValue>,
}

impl ParameterSet {
    /// Create a set holding every descriptor's default.
    pub fn new(descriptors: Arc<[ParameterDescriptor]>) -> Self {
        let values = descriptors.iter().map(|d| d.default.clone()).collect();
        Self { descriptors, values }
    }

    pub fn descriptors(&self) -> &[ParameterDescriptor] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ParameterValue> {
        self.values.get(index)
    }

    /// Numeric value of a scalar parameter, `0.0` if it has none.
    pub fn float(&self, index: usize) -> f64 {
        self.get(index).and_then(ParameterValue::as_f64).unwrap_or(0.0)
    }

    /// Integer (or enumeration index) value, `0` if it has none.
    pub fn long(&self, index: usize) -> i64 {
        self.get(index).and_then(ParameterValue::as_long).unwrap_or(0)
    }

    /// Referenced buffer, `None` when null or not a resource handle.
    pub fn buffer(&self, index: usize) -> Option<&SharedBuffer> {
        self.get(index).and_then(ParameterValue::as_buffer)
    }

    /// Slots of a list parameter, empty if it is not one.
    pub fn list(&self, index: usize) -> &[Scalar] {
        self.get(index).and_then(ParameterValue::as_list).unwrap_or(&[])
    }

    /// Iterate `(index, descriptor, value)` in descriptor order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &ParameterDescriptor, &ParameterValue)> {
        self.descriptors
            .iter()
            .zip(self.values.iter())
            .enumerate()
            .map(|(i, (d, v))| (i, d, v))
    }

    /// Write a value, clamped to the parameter's constraints.
    ///
    /// Diagnostics go to `sink` when one is supplied. A value of the wrong
    /// shape, or an unknown index, is an error and leaves the set unchanged;
    /// clamping is a warning and the clamped value is stored.
    pub fn set(&mut self, index: usize, value: ParameterValue, sink: Option<&mut Outcome>) {
        let outcome = self.try_set(index, value);
        if let Some(sink) = sink {
            sink.merge(outcome);
        }
    }

    fn try_set(&mut self, index: usize, value: ParameterValue) -> Outcome {
        let Some(descriptor) = self.descriptors.get(index) else {
            return Outcome::error(CoreError::IndexOutOfRange(index).to_string());
        };
        if !value.matches(&descriptor.kind) {
            return Outcome::error(format!(
                "{}: value {:?} does not fit {:?}",
                descriptor.name, value, descriptor.kind
            ));
        }
        let (value, outcome) = self.constrain(index, value);
        self.values[index] = value;
        outcome
    }

    /// Replace every value with `other`'s.
    pub fn assign(&mut self, other: &ParameterSet) -> CoreResult<()> {
        if !self.same_schema(other) {
            return Err(CoreError::SchemaMismatch);
        }
        self.values.clone_from(&other.values);
        Ok(())
    }

    /// Whether both sets were built from the same descriptor list.
    pub fn same_schema(&self, other: &ParameterSet) -> bool {
        Arc::ptr_eq(&self.descriptors, &other.descriptors)
            || (self.len() == other.len()
                && self
                    .descriptors
                    .iter()
                    .zip(other.descriptors.iter())
                    .all(|(a, b)| a.name == b.name && a.kind == b.kind))
    }

    /// Enforce all constraints until the set is stable.
    ///
    /// Returns one diagnostic per adjustment made. A second call on the
    /// result adjusts nothing and returns an empty list.
    pub fn keep_constrained(&mut self) -> Vec<Outcome> {
        let mut results = Vec::new();
        // Each round settles at least one more link of a dependency chain.
        for _ in 0..=self.len() {
            let mut changed = false;
            for index in 0..self.len() {
                let current = self.values[index].clone();
                let (value, outcome) = self.constrain(index, current.clone());
                if value != current {
                    self.values[index] = value;
                    changed = true;
                    results.push(outcome);
                }
            }
            if !changed {
                break;
            }
        }
        results
    }

    /// Clamp `value` into the bounds of parameter `index`.
    fn constrain(&self, index: usize, value: ParameterValue) -> (ParameterValue, Outcome) {
        let descriptor = &self.descriptors[index];
        let (lower, upper) = self.bounds(descriptor);
        if lower.is_none() && upper.is_none() {
            return (value, Outcome::Ok);
        }

        let mut outcome = Outcome::Ok;
        let slots = value
            .to_slots()
            .into_iter()
            .map(|slot| {
                let adjusted = slot.clamp(lower, upper);
                if adjusted != slot {
                    outcome.merge(Outcome::warning(format!(
                        "{} value {} out of range, set to {}",
                        descriptor.name, slot, adjusted
                    )));
                }
                adjusted
            })
            .collect();

        match ParameterValue::from_slots(&descriptor.kind, slots) {
            Some(adjusted) => (adjusted, outcome),
            None => (value, Outcome::Ok),
        }
    }

    /// Effective lower and upper bound for a descriptor's numeric slots.
    fn bounds(&self, descriptor: &ParameterDescriptor) -> (Option<f64>, Option<f64>) {
        let mut lower: Option<f64> = None;
        let mut upper: Option<f64> = None;

        if let ParameterKind::Enum { options } = descriptor.kind {
            lower = Some(0.0);
            upper = Some(options.len().saturating_sub(1) as f64);
        }

        for constraint in &descriptor.constraints {
            match *constraint {
                Constraint::Min(min) => lower = Some(lower.map_or(min, |l| l.max(min))),
                Constraint::Max(max) => upper = Some(upper.map_or(max, |u| u.min(max))),
                Constraint::AtLeast(other) => {
                    if let Some(v) = self.first_numeric(other) {
                        lower = Some(lower.map_or(v, |l| l.max(v)));
                    }
                }
                Constraint::AtMost(other) => {
                    if let Some(v) = self.first_numeric(other) {
                        upper = Some(upper.map_or(v, |u| u.min(v)));
                    }
                }
            }
        }

        (lower, upper)
    }

    fn first_numeric(&self, index: usize) -> Option<f64> {
        self.values.get(index)?.slot(0)?.as_f64()
    }
}

impl std::fmt::Debug for ParameterSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(_, d, v)| (d.name, v)))
            .finish()
    }
}
