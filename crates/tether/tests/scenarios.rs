//! End-to-end behaviour of wrapped clients against a recording host.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tether::host::testing::RecordingHost;
use tether::prelude::*;

// =========================================================================
// Test clients
// =========================================================================

/// Batch client with one parameter of every kind.
struct Analyzer;

#[derive(Copy, Clone, PartialEq, Debug, EnumChoice)]
enum Shape {
    #[name = "hann"]
    Hann,
    #[default]
    #[name = "blackman"]
    Blackman,
    Flat,
}

impl Client for Analyzer {
    fn descriptors() -> Vec<ParameterDescriptor> {
        vec![
            ParameterDescriptor::float("threshold", "Threshold", 0.1).fixed(),
            ParameterDescriptor::long("order", "Order", 1).fixed(),
            ParameterDescriptor::choice::<Shape>("shape", "Window Shape"),
            ParameterDescriptor::long_list("fftSettings", "FFT Settings", &[1024, -1, -1]),
            ParameterDescriptor::float_list("range", "Range", &[0.0, 1.0]),
            ParameterDescriptor::buffer("source", "Source"),
        ]
    }

    fn new(_params: &ParameterSet) -> Self {
        Self
    }
}

impl NonRealTime for Analyzer {
    fn process_batch(&mut self, _params: &ParameterSet) -> Outcome {
        Outcome::Ok
    }
}

/// Always fails its batch run.
struct Broken;

impl Client for Broken {
    fn descriptors() -> Vec<ParameterDescriptor> {
        vec![ParameterDescriptor::float("threshold", "Threshold", 0.1)]
    }

    fn new(_params: &ParameterSet) -> Self {
        Self
    }
}

impl NonRealTime for Broken {
    fn process_batch(&mut self, _params: &ParameterSet) -> Outcome {
        Outcome::error("bad state")
    }
}

static INSTANCES: AtomicUsize = AtomicUsize::new(0);

/// Two-input audio client recording what it sees.
struct Probe {
    id: usize,
    sample_rate: f64,
    blocks: usize,
    saw_input: [bool; 2],
}

impl Client for Probe {
    fn descriptors() -> Vec<ParameterDescriptor> {
        vec![ParameterDescriptor::float("gain", "Gain", 1.0)]
    }

    fn new(_params: &ParameterSet) -> Self {
        Self {
            id: INSTANCES.fetch_add(1, Ordering::SeqCst),
            sample_rate: 0.0,
            blocks: 0,
            saw_input: [false; 2],
        }
    }

    fn audio_channels_in(&self) -> usize {
        2
    }

    fn audio_channels_out(&self) -> usize {
        1
    }

    fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
    }
}

impl RealTime for Probe {
    fn process(&mut self, params: &ParameterSet, block: &mut ProcessBlock<'_, '_>) {
        self.blocks += 1;
        self.saw_input = [block.input(0).is_some(), block.input(1).is_some()];
        let first = block.input(0).map_or(0.0, |input| input[0]);
        let gain = params.float(0);
        if let Some(out) = block.output(0) {
            out.fill(first * gain);
        }
    }
}

/// Client with a configurable, possibly invalid, output layout.
struct Layout {
    audio: usize,
    control: usize,
}

impl Client for Layout {
    fn descriptors() -> Vec<ParameterDescriptor> {
        vec![
            ParameterDescriptor::long("audio", "Audio Outs", 0),
            ParameterDescriptor::long("control", "Control Outs", 0),
        ]
    }

    fn new(params: &ParameterSet) -> Self {
        Self {
            audio: params.long(0) as usize,
            control: params.long(1) as usize,
        }
    }

    fn audio_channels_out(&self) -> usize {
        self.audio
    }

    fn control_channels_out(&self) -> usize {
        self.control
    }
}

impl RealTime for Layout {
    fn process(&mut self, _params: &ParameterSet, block: &mut ProcessBlock<'_, '_>) {
        for ch in 0..block.num_outputs() {
            if let Some(out) = block.output(ch) {
                out.fill(1.0);
            }
        }
    }
}

/// Dual-mode level meter: control output per block, batch scan of a buffer.
struct Level {
    peak: f64,
}

impl Client for Level {
    fn descriptors() -> Vec<ParameterDescriptor> {
        vec![ParameterDescriptor::buffer("source", "Source")]
    }

    fn new(_params: &ParameterSet) -> Self {
        Self { peak: 0.0 }
    }

    fn audio_channels_in(&self) -> usize {
        1
    }

    fn control_channels_out(&self) -> usize {
        1
    }
}

impl RealTime for Level {
    fn process(&mut self, _params: &ParameterSet, block: &mut ProcessBlock<'_, '_>) {
        let peak = block
            .input(0)
            .map_or(0.0, |input| input.iter().fold(0.0_f64, |acc, v| acc.max(v.abs())));
        if let Some(out) = block.output(0) {
            out[0] = peak;
        }
    }
}

impl NonRealTime for Level {
    fn process_batch(&mut self, params: &ParameterSet) -> Outcome {
        let Some(source) = params.buffer(0) else {
            return Outcome::error("no source buffer");
        };
        let mut data = vec![0.0; source.num_frames()];
        source.read(0, 0, &mut data);
        self.peak = data.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
        Outcome::Ok
    }
}

fn host() -> Arc<RecordingHost> {
    Arc::new(RecordingHost::new())
}

fn analyzer(host: &Arc<RecordingHost>, args: &[Atom]) -> Wrapper<Analyzer> {
    let class = Arc::new(ClientClass::<Analyzer>::non_real_time(ClassConfig::new("test.analyzer")));
    class.instantiate(host.clone(), args)
}

// =========================================================================
// Construction
// =========================================================================

#[test]
fn test_positional_args_bind_fixed_parameters() {
    let host = host();
    let wrapper = analyzer(&host, &[Atom::Float(0.5), Atom::Long(2)]);
    assert_eq!(wrapper.params().float(0), 0.5);
    assert_eq!(wrapper.params().long(1), 2);
    assert!(host.warnings().is_empty());
}

#[test]
fn test_too_many_positional_args_warns() {
    let host = host();
    let wrapper = analyzer(&host, &[Atom::Float(0.5), Atom::Long(2), Atom::Long(3)]);
    assert_eq!(wrapper.params().long(1), 2);
    assert_eq!(host.warnings(), ["Too many arguments. Got 3, expect at most 2"]);
}

// =========================================================================
// Attribute get/set
// =========================================================================

/// In-range sample values for every slot of a parameter.
fn sample_values(kind: &ParameterKind) -> Vec<Atom> {
    match kind {
        ParameterKind::Float => vec![Atom::Float(0.75)],
        ParameterKind::Long => vec![Atom::Long(7)],
        ParameterKind::Enum { .. } => vec![Atom::Long(2)],
        ParameterKind::Buffer => vec![Atom::symbol("drums")],
        ParameterKind::List { element: ScalarKind::Float, arity } => {
            (0..*arity).map(|i| Atom::Float(0.25 * (i + 1) as f64)).collect()
        }
        ParameterKind::List { arity, .. } => (0..*arity).map(|i| Atom::Long(i as i64 + 2)).collect(),
    }
}

#[test]
fn test_set_prefix_then_get_default_fills() {
    let host = host();
    let descriptors = Analyzer::descriptors();

    for descriptor in &descriptors {
        let name = descriptor.attribute_name();
        let values = sample_values(&descriptor.kind);
        let defaults = analyzer(&host, &[]).get_attribute(&name).unwrap();

        for len in 0..=descriptor.arity() {
            let mut wrapper = analyzer(&host, &[]);
            wrapper.set_attribute(&name, &values[..len]).unwrap();
            let got = wrapper.get_attribute(&name).unwrap();

            assert_eq!(got.len(), descriptor.arity(), "{name}");
            assert_eq!(&got[..len], &values[..len], "{name} with {len} values");
            assert_eq!(&got[len..], &defaults[len..], "{name} with {len} values");
        }
    }
}

#[test]
fn test_full_arity_round_trip() {
    let host = host();
    let mut wrapper = analyzer(&host, &[]);
    for descriptor in Analyzer::descriptors() {
        let name = descriptor.attribute_name();
        let values = sample_values(&descriptor.kind);
        wrapper.set_attribute(&name, &values).unwrap();
        assert_eq!(wrapper.get_attribute(&name).unwrap(), values, "{name}");
    }
}

#[test]
fn test_empty_set_restores_default() {
    let host = host();
    let mut wrapper = analyzer(&host, &[Atom::Float(0.5)]);
    wrapper.set_attribute("threshold", &[]).unwrap();
    assert_eq!(wrapper.params().float(0), 0.1);
    assert!(wrapper.last_outcome().is_ok());
    assert!(host.errors().is_empty());
}

#[test]
fn test_enum_choice_options_and_clamp() {
    assert_eq!(Shape::COUNT, 3);
    assert_eq!(Shape::DEFAULT_INDEX, 1);
    assert_eq!(Shape::names(), &["hann", "blackman", "Flat"]);
    assert_eq!(Shape::from_value(0), Shape::Hann);
    assert_eq!(Shape::from_value(9), Shape::Blackman);
    assert_eq!(Shape::Flat.to_index(), 2);

    let host = host();
    let mut wrapper = analyzer(&host, &[]);
    let info = wrapper.class().attributes().get("shape").unwrap();
    assert_eq!(info.options, Shape::names());
    assert_eq!(wrapper.get_attribute("shape").unwrap(), vec![Atom::Long(1)]);

    wrapper.set_attribute("shape", &[Atom::Long(12)]).unwrap();
    assert_eq!(wrapper.params().long(2), 2);
    assert_eq!(Shape::from_value(wrapper.params().long(2)), Shape::Flat);
    assert_eq!(wrapper.last_outcome().status(), Status::Warning);
}

#[test]
fn test_reset_restores_post_construction_values() {
    let host = host();
    let mut wrapper = analyzer(
        &host,
        &[Atom::Float(0.3), Atom::symbol("@range"), Atom::Float(0.2), Atom::Float(0.4)],
    );
    let before: Vec<_> = Analyzer::descriptors()
        .iter()
        .map(|d| wrapper.get_attribute(&d.attribute_name()).unwrap())
        .collect();

    for descriptor in Analyzer::descriptors() {
        let name = descriptor.attribute_name();
        wrapper.set_attribute(&name, &sample_values(&descriptor.kind)).unwrap();
    }
    wrapper.message("reset", &[]).unwrap();

    let after: Vec<_> = Analyzer::descriptors()
        .iter()
        .map(|d| wrapper.get_attribute(&d.attribute_name()).unwrap())
        .collect();
    assert_eq!(before, after);
}

#[test]
fn test_keep_constrained_is_idempotent() {
    let descriptors: Arc<[ParameterDescriptor]> = vec![
        ParameterDescriptor::long("window", "Window", 256),
        ParameterDescriptor::long("hop", "Hop", 1024).at_most(0).with_min(1.0),
        ParameterDescriptor::long("fft", "FFT", 128).at_least(0),
    ]
    .into();
    let mut params = ParameterSet::new(descriptors);

    let first = params.keep_constrained();
    assert_eq!(first.len(), 2);
    let settled = params.clone();

    let second = params.keep_constrained();
    assert!(second.is_empty());
    for i in 0..params.len() {
        assert_eq!(params.get(i), settled.get(i));
    }
}

// =========================================================================
// Batch processing
// =========================================================================

#[test]
fn test_failed_batch_suppresses_completion() {
    let host = host();
    let class = Arc::new(ClientClass::<Broken>::non_real_time(
        ClassConfig::new("test.broken").with_warnings(true),
    ));
    let mut wrapper = class.instantiate(host.clone(), &[]);
    let before = wrapper.get_attribute("threshold").unwrap();

    wrapper.message("bang", &[]).unwrap();
    wrapper.run_deferred();

    assert!(host.emitted(Egress::Done).is_empty());
    assert_eq!(host.errors(), ["bad state"]);
    assert_eq!(wrapper.get_attribute("threshold").unwrap(), before);
}

#[test]
fn test_failed_batch_quiet_when_not_verbose() {
    let host = host();
    let class = Arc::new(ClientClass::<Broken>::non_real_time(ClassConfig::new("test.broken")));
    let mut wrapper = class.instantiate(host.clone(), &[]);

    wrapper.bang().unwrap();
    wrapper.run_deferred();

    assert!(host.events().is_empty());
    assert_eq!(wrapper.last_outcome(), &Outcome::error("bad state"));
}

#[test]
fn test_successful_batch_fires_done_once_per_request() {
    let host = host();
    let mut wrapper = analyzer(&host, &[]);
    wrapper.bang().unwrap();
    wrapper.bang().unwrap();
    assert!(host.emitted(Egress::Done).is_empty());

    wrapper.run_deferred();
    assert_eq!(host.emitted(Egress::Done).len(), 2);
    assert!(host.emitted(Egress::Done).iter().all(Vec::is_empty));
}

// =========================================================================
// Real-time processing
// =========================================================================

fn probe(host: &Arc<RecordingHost>) -> Wrapper<Probe> {
    let class = Arc::new(ClientClass::<Probe>::real_time(ClassConfig::new("test.probe~")));
    class.instantiate(host.clone(), &[])
}

#[test]
fn test_unconnected_input_never_bound() {
    let host = host();
    let mut wrapper = probe(&host);
    wrapper.dsp(44100.0, &[true, false]).unwrap();

    let a = [0.5; 4];
    let b = [f64::NAN; 4];
    let mut out = [0.0; 4];
    wrapper.perform(&[&a, &b], &mut [&mut out], 4);

    assert_eq!(wrapper.client().saw_input, [true, false]);
    assert_eq!(out, [0.5; 4]);
}

#[test]
fn test_renegotiation_reinstantiates_client() {
    let host = host();
    let mut wrapper = probe(&host);

    wrapper.dsp(44100.0, &[true, true]).unwrap();
    let first = wrapper.client().id;
    assert_eq!(wrapper.client().sample_rate, 44100.0);

    let input = [1.0; 2];
    let mut out = [0.0; 2];
    wrapper.perform(&[&input, &input], &mut [&mut out], 2);
    wrapper.perform(&[&input, &input], &mut [&mut out], 2);
    assert_eq!(wrapper.client().blocks, 2);

    wrapper.dsp(48000.0, &[true, true]).unwrap();
    assert_ne!(wrapper.client().id, first);
    assert_eq!(wrapper.client().sample_rate, 48000.0);
    // Streaming state does not survive renegotiation
    assert_eq!(wrapper.client().blocks, 0);
}

#[test]
fn test_parameter_changes_reach_next_block() {
    let host = host();
    let mut wrapper = probe(&host);
    wrapper.dsp(44100.0, &[true, true]).unwrap();
    wrapper.set_attribute("gain", &[Atom::Float(2.0)]).unwrap();

    let input = [0.25; 2];
    let mut out = [0.0; 2];
    wrapper.perform(&[&input, &input], &mut [&mut out], 2);
    assert_eq!(out, [0.5; 2]);
}

#[test]
#[should_panic(expected = "either audio outputs or control outputs")]
fn test_neither_output_kind_is_fatal() {
    let host = host();
    let class = Arc::new(ClientClass::<Layout>::real_time(ClassConfig::new("test.layout~")));
    let mut wrapper = class.instantiate(host.clone(), &[]);
    wrapper.dsp(44100.0, &[]).unwrap();
}

#[test]
#[should_panic(expected = "either audio outputs or control outputs")]
fn test_both_output_kinds_is_fatal() {
    let host = host();
    let class = Arc::new(ClientClass::<Layout>::real_time(ClassConfig::new("test.layout~")));
    let mut wrapper = class.instantiate(
        host.clone(),
        &[Atom::symbol("@audio"), Atom::Long(1), Atom::symbol("@control"), Atom::Long(1)],
    );
    wrapper.dsp(44100.0, &[]).unwrap();
}

fn control_layout(host: &Arc<RecordingHost>, control: i64) -> Wrapper<Layout> {
    let class = Arc::new(ClientClass::<Layout>::real_time(ClassConfig::new("test.layout~")));
    class.instantiate(host.clone(), &[Atom::symbol("@control"), Atom::Long(control)])
}

#[test]
fn test_renegotiation_drops_pending_control() {
    let host = host();
    let mut wrapper = control_layout(&host, 1);

    wrapper.dsp(44100.0, &[]).unwrap();
    wrapper.perform(&[], &mut [], 4);
    wrapper.dsp(48000.0, &[]).unwrap();
    wrapper.run_deferred();
    assert!(host.emitted(Egress::Control(0)).is_empty());

    wrapper.perform(&[], &mut [], 4);
    wrapper.run_deferred();
    assert_eq!(host.emitted(Egress::Control(0)), vec![vec![Atom::Float(1.0)]]);
}

#[test]
fn test_control_emission_limited_to_declared_egress() {
    let host = host();
    let mut wrapper = control_layout(&host, 1);
    assert_eq!(wrapper.egress(), &[Egress::Dump, Egress::Control(0)]);

    wrapper.set_attribute("control", &[Atom::Long(3)]).unwrap();
    wrapper.dsp(44100.0, &[]).unwrap();
    wrapper.perform(&[], &mut [], 4);
    wrapper.run_deferred();

    assert_eq!(host.emitted(Egress::Control(0)), vec![vec![Atom::Float(1.0)]]);
    assert!(host.emitted(Egress::Control(1)).is_empty());
    assert!(host.emitted(Egress::Control(2)).is_empty());
    assert_eq!(wrapper.egress(), &[Egress::Dump, Egress::Control(0)]);
}

// =========================================================================
// Dual mode through the registry
// =========================================================================

#[test]
fn test_dual_mode_through_registry() {
    let registry = ClassRegistry::builder()
        .register(ClientClass::<Level>::dual(ClassConfig::new("test.level~")))
        .register(ClientClass::<Probe>::real_time(ClassConfig::new("test.probe~")))
        .build()
        .unwrap();

    let source: SharedBuffer = Arc::new(MemoryBuffer::from_samples("loop", &[0.1, -0.8, 0.3], 44100.0));
    let recording = Arc::new(RecordingHost::new().with_buffer(source));
    let host: Arc<dyn Host> = recording.clone();
    let mut object = registry
        .create("test.level~", host, &[Atom::symbol("@source"), Atom::symbol("loop")])
        .unwrap();

    assert_eq!(object.audio_inputs(), 1);
    assert_eq!(object.egress(), &[Egress::Dump, Egress::Done, Egress::Control(0)]);

    object.dsp(44100.0, &[true]).unwrap();
    let input = [0.2, -0.6, 0.1];
    object.perform(&[&input], &mut [], 3);
    object.message("bang", &[]).unwrap();

    // Nothing leaves the object until the deferred context runs
    assert!(recording.emitted(Egress::Control(0)).is_empty());
    object.run_deferred();

    assert_eq!(recording.emitted(Egress::Control(0)), vec![vec![Atom::Float(0.6)]]);
    assert_eq!(recording.emitted(Egress::Done).len(), 1);

    // The control clock is single-shot
    object.run_deferred();
    assert_eq!(recording.emitted(Egress::Control(0)).len(), 1);

    object.notify(&Notification::new("loop", "buffer_modified"));
    assert_eq!(
        object.get_attribute("source").unwrap(),
        vec![Atom::symbol("loop")]
    );

    let saved = object.save_state().unwrap();
    let value: serde_json::Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(value["source"], serde_json::json!(["loop"]));
}
