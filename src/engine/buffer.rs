//! Circular per-pixel sample store read by the renderer.

/// One rendered column of the trace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalSample {
    /// Vertical pixel position (grows downward).
    pub vertical_position: f64,
    /// Whether the sample is highlighted.
    pub alert: bool,
    /// Simulation time the sample was synthesized for.
    pub source_time: f64,
}

impl SignalSample {
    /// A flat sample at `baseline`.
    pub fn flat(baseline: f64) -> Self {
        Self {
            vertical_position: baseline,
            alert: false,
            source_time: 0.0,
        }
    }
}

/// Fixed-width ring of samples with a scan cursor.
///
/// The cursor always lies in `[0, width)`, or is 0 for an empty buffer.
#[derive(Debug, Clone)]
pub struct SignalBuffer {
    samples: Vec<SignalSample>,
    cursor: usize,
    baseline: f64,
}

impl SignalBuffer {
    /// Creates a flat buffer `width` pixels wide.
    pub fn new(width: usize, baseline: f64) -> Self {
        Self {
            samples: vec![SignalSample::flat(baseline); width],
            cursor: 0,
            baseline,
        }
    }

    /// Reallocates to `width` pixels, flattening every sample and rewinding the cursor.
    pub fn resize(&mut self, width: usize) {
        self.samples.clear();
        self.samples.resize(width, SignalSample::flat(self.baseline));
        self.cursor = 0;
    }

    /// Buffer width in pixels.
    pub fn width(&self) -> usize {
        self.samples.len()
    }

    /// Whether the buffer has zero width.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Next write position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Vertical position of 0 mV.
    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    /// Writes at the cursor and advances it. Returns `false` for an empty buffer.
    pub fn write(&mut self, sample: SignalSample) -> bool {
        let width = self.samples.len();
        if width == 0 {
            return false;
        }
        self.samples[self.cursor] = sample;
        self.cursor = (self.cursor + 1) % width;
        true
    }

    /// Sample at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&SignalSample> {
        self.samples.get(index)
    }

    /// All samples left to right.
    pub fn as_slice(&self) -> &[SignalSample] {
        &self.samples
    }
}
