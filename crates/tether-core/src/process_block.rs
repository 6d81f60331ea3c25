//! Views over one block of audio.
//!
//! A [`ProcessBlock`] is built by the real-time engine for each audio
//! callback from storage allocated at setup. Building one never allocates.

/// Output storage of a block: host audio buffers or control slots.
enum Outputs<'a, 'b> {
    Audio(&'a mut [&'b mut [f64]]),
    Control(&'a mut [f64]),
}

/// Input and output views handed to [`RealTime::process`](crate::RealTime::process).
pub struct ProcessBlock<'a, 'b> {
    inputs: &'a [&'a [f64]],
    connected: &'a [bool],
    outputs: Outputs<'a, 'b>,
    frames: usize,
}

impl<'a, 'b> ProcessBlock<'a, 'b> {
    /// Block writing audio outputs.
    ///
    /// `connected[i]` tells whether `inputs[i]` carries host data. Slots
    /// without a `true` entry are never exposed.
    pub fn audio(
        inputs: &'a [&'a [f64]],
        connected: &'a [bool],
        outputs: &'a mut [&'b mut [f64]],
        frames: usize,
    ) -> Self {
        Self {
            inputs,
            connected,
            outputs: Outputs::Audio(outputs),
            frames,
        }
    }

    /// Block writing one control value per control channel.
    pub fn control(
        inputs: &'a [&'a [f64]],
        connected: &'a [bool],
        control: &'a mut [f64],
        frames: usize,
    ) -> Self {
        Self {
            inputs,
            connected,
            outputs: Outputs::Control(control),
            frames,
        }
    }

    /// Number of frames in this block.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Number of declared inputs, connected or not.
    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    pub fn num_outputs(&self) -> usize {
        match &self.outputs {
            Outputs::Audio(outputs) => outputs.len(),
            Outputs::Control(control) => control.len(),
        }
    }

    /// Whether outputs are control slots rather than audio buffers.
    pub fn is_control(&self) -> bool {
        matches!(self.outputs, Outputs::Control(_))
    }

    /// Input `index`, or `None` if it is not connected.
    ///
    /// The slice borrows the host block, not `self`, so it can be held
    /// while writing outputs.
    pub fn input(&self, index: usize) -> Option<&'a [f64]> {
        if !self.connected.get(index).copied().unwrap_or(false) {
            return None;
        }
        let input: &'a [f64] = self.inputs.get(index)?;
        Some(&input[..self.frames.min(input.len())])
    }

    /// Output `index`.
    ///
    /// Audio outputs span the block. Control outputs are a single slot
    /// holding the value emitted for that channel.
    pub fn output(&mut self, index: usize) -> Option<&mut [f64]> {
        match &mut self.outputs {
            Outputs::Audio(outputs) => {
                let frames = self.frames;
                let output = outputs.get_mut(index)?;
                let len = frames.min(output.len());
                Some(&mut output[..len])
            }
            Outputs::Control(control) => control.get_mut(index..index + 1),
        }
    }
}
