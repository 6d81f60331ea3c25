//! Type-erased host objects.

use tether_core::{Atom, Client, Notification};

use crate::attribute::AttributeTable;
use crate::error::WrapperResult;
use crate::host::Egress;
use crate::wrapper::Wrapper;

/// Object-safe view of a [`Wrapper`], as handed out by the class registry.
///
/// Host adapters hold `Box<dyn HostObject>` and route every callback for
/// an instance through it.
pub trait HostObject: Send {
    fn class_name(&self) -> &'static str;

    fn attributes(&self) -> &AttributeTable;

    fn set_attribute(&mut self, name: &str, args: &[Atom]) -> WrapperResult<()>;

    fn get_attribute(&self, name: &str) -> WrapperResult<Vec<Atom>>;

    /// Dispatch `reset`, `bang` or `dump`.
    fn message(&mut self, selector: &str, args: &[Atom]) -> WrapperResult<()>;

    fn notify(&self, notification: &Notification);

    fn dsp(&mut self, sample_rate: f64, connections: &[bool]) -> WrapperResult<()>;

    /// Audio callback. Must stay real-time safe.
    fn perform(&mut self, inputs: &[&[f64]], outputs: &mut [&mut [f64]], frames: usize);

    fn run_deferred(&mut self);

    fn egress(&self) -> &[Egress];

    fn audio_inputs(&self) -> usize;

    fn save_state(&self) -> WrapperResult<String>;

    fn load_state(&mut self, json: &str) -> WrapperResult<()>;
}

impl<C: Client> HostObject for Wrapper<C> {
    fn class_name(&self) -> &'static str {
        self.class().name()
    }

    fn attributes(&self) -> &AttributeTable {
        self.class().attributes()
    }

    fn set_attribute(&mut self, name: &str, args: &[Atom]) -> WrapperResult<()> {
        Wrapper::set_attribute(self, name, args)
    }

    fn get_attribute(&self, name: &str) -> WrapperResult<Vec<Atom>> {
        Wrapper::get_attribute(self, name)
    }

    fn message(&mut self, selector: &str, args: &[Atom]) -> WrapperResult<()> {
        Wrapper::message(self, selector, args)
    }

    fn notify(&self, notification: &Notification) {
        let routed = Wrapper::notify(self, notification);
        log::trace!("{}: notification routed to {} buffers", self.class().name(), routed);
    }

    fn dsp(&mut self, sample_rate: f64, connections: &[bool]) -> WrapperResult<()> {
        Wrapper::dsp(self, sample_rate, connections)
    }

    fn perform(&mut self, inputs: &[&[f64]], outputs: &mut [&mut [f64]], frames: usize) {
        Wrapper::perform(self, inputs, outputs, frames)
    }

    fn run_deferred(&mut self) {
        Wrapper::run_deferred(self)
    }

    fn egress(&self) -> &[Egress] {
        Wrapper::egress(self)
    }

    fn audio_inputs(&self) -> usize {
        Wrapper::audio_inputs(self)
    }

    fn save_state(&self) -> WrapperResult<String> {
        Wrapper::save_state(self)
    }

    fn load_state(&mut self, json: &str) -> WrapperResult<()> {
        Wrapper::load_state(self, json)
    }
}
