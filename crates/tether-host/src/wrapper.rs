//! The per-instance adapter between a host object and a client.
//!
//! A [`Wrapper`] owns the live [`ParameterSet`], the snapshot taken right
//! after construction, one client instance and the engines for the class's
//! capabilities. Every host callback lands on one of its methods.
//!
//! # Construction
//!
//! Arguments are a positional prefix followed by `@name values...` groups:
//!
//! ```text
//! peakfollow~ 0.5 2 @attack 10 @source drums
//!             ^^^^^ ^^^^^^^^^^^^^^^^^^^^^^^^^
//!             fixed  named attributes
//! ```
//!
//! The prefix binds fixed parameters in order, the groups go through the
//! attribute setters, then the whole set is constrained and snapshotted.
//!
//! # Threading
//!
//! Methods take `&mut self`; the host adapter serializes calls the way the
//! host itself does. [`Wrapper::perform`] is the only method meant for the
//! audio thread. [`Wrapper::run_deferred`] is called from the host's
//! serialized low-priority context.

use std::collections::BTreeMap;
use std::sync::Arc;

use tether_core::atom::{attribute_args_offset, attribute_groups};
use tether_core::config::{BANG_MESSAGE, DUMP_MESSAGE, LATENCY_ATTRIBUTE, RESET_MESSAGE};
use tether_core::{Atom, Client, Notification, Outcome, ParameterSet, Symbol};

use crate::attribute::{AttributeInfo, AttributeTarget};
use crate::class::ClientClass;
use crate::dual::Engine;
use crate::error::{WrapperError, WrapperResult};
use crate::fetcher::{positional_capacity, ParamFetcher};
use crate::host::{Egress, Host};
use crate::notify::route_notification;
use crate::realtime::RealTimeState;
use crate::reporter::ResultReporter;

/// One live instance of a client class.
pub struct Wrapper<C: Client> {
    class: Arc<ClientClass<C>>,
    host: Arc<dyn Host>,
    params: ParameterSet,
    snapshot: ParameterSet,
    client: C,
    engine: Engine<C>,
    reporter: ResultReporter,
    egress: Vec<Egress>,
    audio_inputs: usize,
}

impl<C: Client> Wrapper<C> {
    pub fn new(class: Arc<ClientClass<C>>, host: Arc<dyn Host>, args: &[Atom]) -> Self {
        let config = *class.config();
        let mut params = ParameterSet::new(Arc::clone(class.descriptors()));
        let mut reporter = ResultReporter::new(config.name, config.warnings);

        let offset = attribute_args_offset(args);
        let mut bound = Outcome::Ok;
        ParamFetcher::new(&args[..offset]).bind(&mut params, host.as_ref(), &mut bound);
        reporter.report(bound, host.as_ref());

        for (name, values) in attribute_groups(&args[offset..]) {
            if let Err(err) =
                write_attribute(&class, &mut params, &mut reporter, host.as_ref(), name, values)
            {
                log::warn!("{}: construction attribute '@{}' skipped: {}", config.name, name, err);
                host.warn(config.name, &err.to_string());
            }
        }

        for outcome in params.keep_constrained() {
            reporter.report(outcome, host.as_ref());
        }
        let snapshot = params.clone();

        let capacity = positional_capacity(&params);
        if offset > capacity {
            host.warn(
                config.name,
                &format!("Too many arguments. Got {offset}, expect at most {capacity}"),
            );
        }

        let client = C::new(&params);
        let control_outputs = client.control_channels_out();
        let mut egress = vec![Egress::Dump];
        if class.is_non_real_time() {
            egress.push(Egress::Done);
        }
        egress.extend((0..control_outputs).map(Egress::Control));
        egress.extend((0..client.audio_channels_out()).map(Egress::Signal));
        let audio_inputs = client.audio_channels_in();

        log::debug!(
            "Created '{}' with {} parameters, {} audio inputs, {} egress points",
            config.name,
            params.len(),
            audio_inputs,
            egress.len()
        );

        let mut engine = class.engine();
        if let Some(real_time) = engine.real_time_mut() {
            real_time.limit_control_egress(control_outputs);
        }

        Self {
            engine,
            class,
            host,
            params,
            snapshot,
            client,
            reporter,
            egress,
            audio_inputs,
        }
    }

    // =====================================================================
    // Attributes
    // =====================================================================

    /// Host attribute setter.
    ///
    /// Missing values default-fill; outcomes of the write go to the
    /// reporter. A parameter write also refreshes `latency`.
    pub fn set_attribute(&mut self, name: &str, args: &[Atom]) -> WrapperResult<()> {
        let target = write_attribute(
            &self.class,
            &mut self.params,
            &mut self.reporter,
            self.host.as_ref(),
            name,
            args,
        )?;
        if matches!(target, AttributeTarget::Parameter(_)) && self.class.attributes().has_latency() {
            self.host.touch_attribute(LATENCY_ATTRIBUTE);
        }
        Ok(())
    }

    /// Host attribute getter. Always returns the attribute's full arity.
    pub fn get_attribute(&self, name: &str) -> WrapperResult<Vec<Atom>> {
        let info = self
            .class
            .attributes()
            .get(name)
            .ok_or_else(|| WrapperError::UnknownAttribute(name.to_string()))?;
        Ok(self.read(info))
    }

    fn read(&self, info: &AttributeInfo) -> Vec<Atom> {
        match info.target {
            AttributeTarget::Parameter(index) => match self.params.get(index) {
                Some(value) => info.encode(value),
                None => Vec::new(),
            },
            AttributeTarget::Latency => vec![Atom::Long(self.client.latency() as i64)],
            AttributeTarget::Warnings => vec![Atom::Long(i64::from(self.reporter.verbose()))],
        }
    }

    // =====================================================================
    // Messages
    // =====================================================================

    /// Dispatch a host message by selector.
    pub fn message(&mut self, selector: &str, _args: &[Atom]) -> WrapperResult<()> {
        match selector {
            RESET_MESSAGE => self.reset(),
            BANG_MESSAGE => self.bang(),
            DUMP_MESSAGE => {
                self.dump();
                Ok(())
            }
            other => {
                log::warn!("{}: no method for '{}'", self.class.name(), other);
                Err(WrapperError::UnknownMessage(other.to_string()))
            }
        }
    }

    /// Restore the post-construction values and refresh every parameter
    /// attribute.
    pub fn reset(&mut self) -> WrapperResult<()> {
        self.params.assign(&self.snapshot)?;
        for (_, info) in self.class.attributes().parameters() {
            self.host.touch_attribute(&info.name);
        }
        Ok(())
    }

    /// Queue a batch run for the next [`Wrapper::run_deferred`].
    pub fn bang(&mut self) -> WrapperResult<()> {
        let engine = self
            .engine
            .non_real_time_mut()
            .ok_or(WrapperError::Unsupported("batch processing"))?;
        engine.request();
        Ok(())
    }

    /// Emit `<name> <values...>` for every attribute on [`Egress::Dump`].
    pub fn dump(&self) {
        for info in self.class.attributes().iter() {
            let mut atoms = vec![Atom::Symbol(Symbol::new(&info.name))];
            atoms.extend(self.read(info));
            self.host.emit(Egress::Dump, &atoms);
        }
    }

    /// Forward a buffer change notification to referenced buffers.
    pub fn notify(&self, notification: &Notification) -> usize {
        route_notification(&self.params, notification)
    }

    // =====================================================================
    // Processing
    // =====================================================================

    /// Negotiate the audio graph: rebuild the client and its buffers.
    ///
    /// `connections[i]` tells whether client input `i` is connected.
    ///
    /// # Panics
    ///
    /// Panics if the rebuilt client breaks the audio-or-control output
    /// contract.
    pub fn dsp(&mut self, sample_rate: f64, connections: &[bool]) -> WrapperResult<()> {
        let engine = self
            .engine
            .real_time_mut()
            .ok_or(WrapperError::Unsupported("audio processing"))?;
        engine.setup(&mut self.client, &self.params, sample_rate, connections);
        Ok(())
    }

    /// Process one audio block. Does nothing for batch-only classes.
    pub fn perform(&mut self, inputs: &[&[f64]], outputs: &mut [&mut [f64]], frames: usize) {
        if let Some(engine) = self.engine.real_time_mut() {
            engine.perform(&mut self.client, &self.params, inputs, outputs, frames);
        }
    }

    /// Service the deferred context: emit pending control values, then run
    /// queued batch jobs.
    pub fn run_deferred(&mut self) {
        log::trace!("{}: servicing deferred work", self.class.name());
        if let Some(engine) = self.engine.real_time_mut() {
            engine.emit_control(self.host.as_ref());
        }
        if let Some(engine) = self.engine.non_real_time_mut() {
            engine.drain(&mut self.client, &self.params, &mut self.reporter, self.host.as_ref());
        }
    }

    // =====================================================================
    // State
    // =====================================================================

    /// Serialize parameter attributes as a JSON object of atom lists.
    pub fn save_state(&self) -> WrapperResult<String> {
        let state: BTreeMap<&str, Vec<Atom>> = self
            .class
            .attributes()
            .parameters()
            .map(|(_, info)| (info.name.as_str(), self.read(info)))
            .collect();
        Ok(serde_json::to_string(&state)?)
    }

    /// Apply state written by [`Wrapper::save_state`].
    ///
    /// Entries are applied in descriptor order; names this class does not
    /// know are ignored.
    pub fn load_state(&mut self, json: &str) -> WrapperResult<()> {
        let state: BTreeMap<String, Vec<Atom>> = serde_json::from_str(json)?;
        let names: Vec<String> = self
            .class
            .attributes()
            .parameters()
            .map(|(_, info)| info.name.clone())
            .collect();
        for name in names {
            if let Some(atoms) = state.get(&name) {
                self.set_attribute(&name, atoms)?;
            }
        }
        for outcome in self.params.keep_constrained() {
            self.reporter.report(outcome, self.host.as_ref());
        }
        Ok(())
    }

    // =====================================================================
    // Accessors
    // =====================================================================

    pub fn class(&self) -> &Arc<ClientClass<C>> {
        &self.class
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn snapshot(&self) -> &ParameterSet {
        &self.snapshot
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Whether diagnostics are posted to the host.
    pub fn verbose(&self) -> bool {
        self.reporter.verbose()
    }

    /// Most recent outcome, posted or not.
    pub fn last_outcome(&self) -> &Outcome {
        self.reporter.last()
    }

    pub fn egress(&self) -> &[Egress] {
        &self.egress
    }

    /// Number of audio inlets fixed at construction.
    pub fn audio_inputs(&self) -> usize {
        self.audio_inputs
    }

    /// Audio protocol state, `None` for batch-only classes.
    pub fn real_time_state(&self) -> Option<RealTimeState> {
        self.engine.real_time().map(|engine| engine.state())
    }

    /// Batch runs waiting for the deferred context.
    pub fn pending_batches(&self) -> usize {
        self.engine
            .non_real_time()
            .map_or(0, |engine| engine.pending())
    }
}

/// Shared setter path for construction and host attribute writes.
fn write_attribute<C: Client>(
    class: &ClientClass<C>,
    params: &mut ParameterSet,
    reporter: &mut ResultReporter,
    host: &dyn Host,
    name: &str,
    args: &[Atom],
) -> WrapperResult<AttributeTarget> {
    let info = class
        .attributes()
        .get(name)
        .ok_or_else(|| WrapperError::UnknownAttribute(name.to_string()))?;

    match info.target {
        AttributeTarget::Latency => Err(WrapperError::ReadOnlyAttribute(name.to_string())),
        AttributeTarget::Warnings => {
            let (low, high) = info.clip.unwrap_or((0, 1));
            let value = args.first().map_or(0, Atom::as_long).clamp(low, high);
            reporter.set_verbose(value != 0);
            Ok(info.target)
        }
        AttributeTarget::Parameter(index) => {
            let descriptor = &class.descriptors()[index];
            let value = info.decode(descriptor, args, host);
            let mut sink = Outcome::Ok;
            params.set(index, value, Some(&mut sink));
            reporter.report(sink, host);
            Ok(info.target)
        }
    }
}
