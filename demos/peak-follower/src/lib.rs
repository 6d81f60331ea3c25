//! Tether Peak Follower - Example dual-mode client.
//!
//! Follows the amplitude envelope of one audio input. As a stream it
//! reports the envelope once per block on a control outlet; as a batch job
//! it renders the envelope of a source buffer into a target buffer.
//!
//! Key points:
//! 1. `#[derive(EnumChoice)]` turns the detector mode into an enumerated parameter
//! 2. `release` is constrained to be at least `attack`
//! 3. One struct implements both `RealTime` and `NonRealTime`, so the class
//!    is registered in dual mode

use tether::prelude::*;

// =============================================================================
// Class Configuration
// =============================================================================

/// Shared class configuration.
pub static CONFIG: ClassConfig = ClassConfig::new("peakfollow~").with_label("Peak Follower");

/// Register the follower with a class registry builder.
pub fn register(builder: tether::host::ClassRegistryBuilder) -> tether::host::ClassRegistryBuilder {
    builder.register(ClientClass::<PeakFollower>::dual(CONFIG))
}

// =============================================================================
// Parameters
// =============================================================================

const ATTACK: usize = 0;
const RELEASE: usize = 1;
const MODE: usize = 2;
const SOURCE: usize = 3;
const TARGET: usize = 4;

/// Envelope detector.
#[derive(Copy, Clone, PartialEq, Debug, EnumChoice)]
pub enum Detector {
    /// Rectified signal.
    #[default]
    #[name = "peak"]
    Peak,
    /// Squared signal, square root taken on output.
    #[name = "rms"]
    Rms,
}

// =============================================================================
// Envelope
// =============================================================================

/// One-pole attack/release smoother.
#[derive(Debug, Clone, Copy)]
struct Envelope {
    attack: f64,
    release: f64,
    detector: Detector,
    state: f64,
}

impl Envelope {
    fn new(params: &ParameterSet, sample_rate: f64) -> Self {
        Self {
            attack: coefficient(params.float(ATTACK), sample_rate),
            release: coefficient(params.float(RELEASE), sample_rate),
            detector: Detector::from_value(params.long(MODE)),
            state: 0.0,
        }
    }

    #[inline]
    fn tick(&mut self, sample: f64) -> f64 {
        let level = match self.detector {
            Detector::Peak => sample.abs(),
            Detector::Rms => sample * sample,
        };
        let coef = if level > self.state { self.attack } else { self.release };
        self.state = level + coef * (self.state - level);
        self.value()
    }

    fn value(&self) -> f64 {
        match self.detector {
            Detector::Peak => self.state,
            Detector::Rms => self.state.sqrt(),
        }
    }
}

/// Smoothing coefficient for a time constant in milliseconds.
fn coefficient(time_ms: f64, sample_rate: f64) -> f64 {
    let samples = time_ms * 0.001 * sample_rate;
    if samples <= 0.0 {
        0.0
    } else {
        (-1.0 / samples).exp()
    }
}

// =============================================================================
// Peak Follower Client
// =============================================================================

/// Dual-mode envelope follower.
///
/// Streaming state lives in `envelope` and starts from silence each time
/// the host renegotiates the graph.
pub struct PeakFollower {
    sample_rate: f64,
    envelope: Envelope,
}

impl PeakFollower {
    /// Current envelope value.
    pub fn level(&self) -> f64 {
        self.envelope.value()
    }
}

impl Client for PeakFollower {
    fn descriptors() -> Vec<ParameterDescriptor> {
        vec![
            ParameterDescriptor::float("attack", "Attack (ms)", 1.0)
                .fixed()
                .with_min(0.0)
                .with_max(1000.0),
            ParameterDescriptor::float("release", "Release (ms)", 100.0)
                .fixed()
                .with_max(10_000.0)
                .at_least(ATTACK),
            ParameterDescriptor::choice::<Detector>("mode", "Detector"),
            ParameterDescriptor::buffer("source", "Source Buffer"),
            ParameterDescriptor::buffer("target", "Target Buffer"),
        ]
    }

    fn new(params: &ParameterSet) -> Self {
        Self {
            sample_rate: 0.0,
            envelope: Envelope::new(params, 0.0),
        }
    }

    fn audio_channels_in(&self) -> usize {
        1
    }

    fn control_channels_out(&self) -> usize {
        1
    }

    fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
    }
}

impl RealTime for PeakFollower {
    fn process(&mut self, params: &ParameterSet, block: &mut ProcessBlock<'_, '_>) {
        // Parameters may change between blocks; the smoother state carries over
        let state = self.envelope.state;
        self.envelope = Envelope::new(params, self.sample_rate);
        self.envelope.state = state;

        if let Some(input) = block.input(0) {
            for &sample in input {
                self.envelope.tick(sample);
            }
        } else {
            for _ in 0..block.frames() {
                self.envelope.tick(0.0);
            }
        }

        if let Some(out) = block.output(0) {
            out[0] = self.envelope.value();
        }
    }
}

impl NonRealTime for PeakFollower {
    fn process_batch(&mut self, params: &ParameterSet) -> Outcome {
        let Some(source) = params.buffer(SOURCE) else {
            return Outcome::error("no source buffer");
        };
        if !source.exists() {
            return Outcome::error(format!("source buffer {} not found", source.name()));
        }
        let Some(target) = params.buffer(TARGET) else {
            return Outcome::error("no target buffer");
        };

        let frames = source.num_frames();
        let channels = source.num_channels();
        let sample_rate = source.sample_rate();
        if frames == 0 || channels == 0 {
            return Outcome::warning(format!("source buffer {} is empty", source.name()));
        }

        target.resize(frames, channels, sample_rate);
        let mut samples = vec![0.0; frames];
        for channel in 0..channels {
            let read = source.read(channel, 0, &mut samples);
            let mut envelope = Envelope::new(params, sample_rate);
            for sample in &mut samples[..read] {
                *sample = envelope.tick(*sample);
            }
            target.write(channel, 0, &samples[..read]);
        }

        log::debug!(
            "{}: rendered {frames} frames x {channels} channels into {}",
            CONFIG.name,
            target.name()
        );
        Outcome::Ok
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tether::host::testing::RecordingHost;

    fn follower(host: &Arc<RecordingHost>, args: &[Atom]) -> Box<dyn HostObject> {
        let registry = register(ClassRegistry::builder()).build().unwrap();
        registry.create("peakfollow~", host.clone(), args).unwrap()
    }

    #[test]
    fn test_coefficient() {
        assert_eq!(coefficient(0.0, 44100.0), 0.0);
        assert_eq!(coefficient(10.0, 0.0), 0.0);
        let c = coefficient(10.0, 1000.0);
        assert!((c - (-0.1f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_release_clamped_to_attack() {
        let host = Arc::new(RecordingHost::new());
        let obj = follower(&host, &[Atom::Float(50.0), Atom::Float(5.0)]);

        assert_eq!(obj.get_attribute("release").unwrap(), vec![Atom::Float(50.0)]);
        assert!(host.warnings().is_empty(), "warnings are off by default");
    }

    #[test]
    fn test_stream_reports_envelope() {
        let host = Arc::new(RecordingHost::new());
        let mut obj = follower(&host, &[Atom::Float(0.0), Atom::Float(0.0)]);

        obj.dsp(1000.0, &[true]).unwrap();
        let input = [0.0, -0.5, 0.25, 0.0];
        obj.perform(&[&input], &mut [], 4);
        obj.run_deferred();

        // Zero times make the follower track the rectified input exactly
        assert_eq!(
            host.emitted(Egress::Control(0)),
            vec![vec![Atom::Float(0.0)]]
        );

        let input = [0.0, 0.0, 0.0, 0.75];
        obj.perform(&[&input], &mut [], 4);
        obj.run_deferred();
        assert_eq!(host.emitted(Egress::Control(0)).last(), Some(&vec![Atom::Float(0.75)]));
    }

    #[test]
    fn test_batch_renders_target() {
        let source: SharedBuffer = Arc::new(MemoryBuffer::from_samples(
            "src",
            &[1.0, 0.0, 0.0, 0.0],
            1000.0,
        ));
        let target: SharedBuffer = Arc::new(MemoryBuffer::new("dst", 0, 0, 0.0));
        let host = Arc::new(
            RecordingHost::new()
                .with_buffer(source)
                .with_buffer(target.clone()),
        );
        let mut obj = follower(&host, &[]);

        obj.set_attribute("attack", &[Atom::Float(0.0)]).unwrap();
        obj.set_attribute("release", &[Atom::Float(1.0)]).unwrap();
        obj.set_attribute("source", &[Atom::symbol("src")]).unwrap();
        obj.set_attribute("target", &[Atom::symbol("dst")]).unwrap();
        obj.message("bang", &[]).unwrap();
        obj.run_deferred();

        assert_eq!(host.emitted(Egress::Done), vec![Vec::<Atom>::new()]);
        assert_eq!(target.num_frames(), 4);
        let mut rendered = [0.0; 4];
        target.read(0, 0, &mut rendered);
        assert_eq!(rendered[0], 1.0);
        assert!((rendered[1] - (-1.0f64).exp()).abs() < 1e-12);
        assert!(rendered[2] < rendered[1]);
    }

    #[test]
    fn test_batch_without_source_fails_quietly() {
        let host = Arc::new(RecordingHost::new());
        let mut obj = follower(&host, &[]);

        obj.message("bang", &[]).unwrap();
        obj.run_deferred();

        assert!(host.emitted(Egress::Done).is_empty());
        assert!(host.errors().is_empty());

        obj.set_attribute("warnings", &[Atom::Long(1)]).unwrap();
        obj.message("bang", &[]).unwrap();
        obj.run_deferred();
        assert_eq!(host.errors(), vec!["no source buffer".to_string()]);
    }

    #[test]
    fn test_mode_attribute_uses_option_names() {
        let host = Arc::new(RecordingHost::new());
        let mut obj = follower(&host, &[]);

        assert_eq!(Detector::names(), &["peak", "rms"]);
        obj.set_attribute("mode", &[Atom::Long(1)]).unwrap();
        assert_eq!(obj.get_attribute("mode").unwrap(), vec![Atom::Long(1)]);
    }
}
