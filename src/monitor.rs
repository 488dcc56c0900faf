//! Simulation instance: one scrolling ECG trace.
//!
//! A [`Monitor`] owns its parameter set, beat queues, clock and sample
//! buffer. The host calls [`Monitor::advance`] once per display tick with
//! the wall-clock time since the previous tick and reads the buffer back
//! with [`Monitor::read_sample`] or [`Monitor::samples`].
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use ecg_synth::prelude::*;
//!
//! let catalog = Arc::new(ConditionCatalog::builtin());
//! let mut monitor = Monitor::new(600, catalog);
//! monitor.set_lead(Lead::V2);
//! monitor.set_condition("stemi_ant");
//!
//! let written = monitor.advance(1.0 / 60.0);
//! assert!(written <= 2);
//! assert_eq!(monitor.parameters().st.amplitude, 0.5);
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::catalog::{ConditionCatalog, ResolvedCondition};
use crate::config::MonitorParams;
use crate::engine::{
    BeatQueue, BeatQueueView, BeatQueueWriter, LeadTransform, PaperSpeed, RhythmScheduler,
    RhythmState, SignalBuffer, SignalSample, Stepper, SynthesisContext, WaveformSynthesizer,
    WaveMeta,
};
use crate::error::Result;
use crate::types::{AlertRegions, Lead, ParameterSet, RhythmMode};
use crate::utils::{Random, RandomSource};

pub use crate::config::{MAX_RATE, MIN_RATE};

/// One simulated ECG trace.
///
/// Not `Send`: a monitor may share its ventricular queue with other monitors
/// on the same thread through [`BeatQueueView`].
pub struct Monitor {
    catalog: Arc<ConditionCatalog>,
    params: MonitorParams,

    defaults: ParameterSet,
    parameters: ParameterSet,
    condition_id: Option<String>,
    lead: Lead,
    mode: RhythmMode,
    alert_regions: AlertRegions,
    noise_level: f64,
    paper_speed: PaperSpeed,
    amplitude_zoom: f64,
    paused: bool,

    beats: BeatQueueWriter,
    external: Option<BeatQueueView>,
    scheduler: RhythmScheduler,
    synthesizer: WaveformSynthesizer,
    stepper: Stepper,
    buffer: SignalBuffer,
    rng: Box<dyn RandomSource>,
}

impl Monitor {
    /// Creates a monitor `width` pixels wide with default parameters.
    pub fn new(width: usize, catalog: Arc<ConditionCatalog>) -> Self {
        let params = MonitorParams::default();
        let rng = Box::new(Random::from_optional_seed(params.seed));
        Self::build(width, catalog, params, rng)
    }

    /// Creates a monitor with validated parameters.
    pub fn with_params(
        width: usize,
        catalog: Arc<ConditionCatalog>,
        params: MonitorParams,
    ) -> Result<Self> {
        params.validate()?;
        let rng = Box::new(Random::from_optional_seed(params.seed));
        Ok(Self::build(width, catalog, params, rng))
    }

    /// Creates a monitor drawing interval jitter and noise from `rng`.
    ///
    /// `params.seed` is ignored.
    pub fn with_random_source(
        width: usize,
        catalog: Arc<ConditionCatalog>,
        params: MonitorParams,
        rng: Box<dyn RandomSource>,
    ) -> Result<Self> {
        params.validate()?;
        Ok(Self::build(width, catalog, params, rng))
    }

    fn build(
        width: usize,
        catalog: Arc<ConditionCatalog>,
        params: MonitorParams,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        let defaults = ParameterSet::default();
        let mut monitor = Self {
            catalog,
            defaults,
            parameters: defaults,
            condition_id: None,
            lead: params.lead,
            mode: RhythmMode::Sinus,
            alert_regions: AlertRegions::empty(),
            noise_level: params.noise_level,
            paper_speed: params.paper_speed,
            amplitude_zoom: params.amplitude_zoom,
            paused: false,
            beats: BeatQueueWriter::new(),
            external: None,
            scheduler: RhythmScheduler::new(params.scheduler_params()),
            synthesizer: WaveformSynthesizer::new(params.synth_params()),
            stepper: Stepper::new(params.initial_rate, params.max_elapsed),
            buffer: SignalBuffer::new(width, params.baseline),
            rng,
            params,
        };
        monitor.refresh_schedule(0.0);
        monitor
    }

    // ========================================================================
    // Simulation
    // ========================================================================

    /// Consumes `elapsed` wall-clock seconds and writes the whole samples they
    /// cover. Returns the number of samples written.
    ///
    /// A paused monitor or a zero-width buffer writes nothing and does not
    /// move simulation time.
    pub fn advance(&mut self, elapsed: f64) -> usize {
        if self.paused || self.buffer.is_empty() {
            return 0;
        }

        let plan = self.stepper.plan(elapsed, self.paper_speed);
        {
            let queue = match &self.external {
                Some(view) => view.read(),
                None => self.beats.read(),
            };
            let ctx = SynthesisContext {
                beats: &queue,
                atrial: self.scheduler.atrial(),
                params: &self.parameters,
                mode: self.mode,
                alert_regions: self.alert_regions,
                noise_level: self.noise_level,
            };
            let baseline = self.buffer.baseline();
            let scale = self.params.pixels_per_millivolt * self.amplitude_zoom;

            for _ in 0..plan.steps {
                let t = self.stepper.step(plan.period);
                let sample = self.synthesizer.sample(t, &ctx, &mut *self.rng);
                let voltage = LeadTransform::project(sample.voltage, self.lead);
                self.buffer.write(SignalSample {
                    vertical_position: baseline - voltage * scale,
                    alert: sample.alert,
                    source_time: t,
                });
            }
        }

        self.refresh_schedule(self.stepper.horizon());
        self.stepper.converge_rate(plan.elapsed);

        trace!(
            steps = plan.steps,
            time = self.stepper.time(),
            rate = self.stepper.current_rate(),
            "advanced"
        );
        plan.steps
    }

    fn refresh_schedule(&mut self, now: f64) {
        let state = RhythmState {
            rate: self.stepper.current_rate(),
            mode: self.mode,
            params: &self.parameters,
        };
        if self.external.is_some() {
            self.scheduler.advance_atrial_only(now, state);
        } else {
            let scheduler = &mut self.scheduler;
            let rng = &mut *self.rng;
            self.beats
                .with_mut(|beats| scheduler.advance(now, beats, state, rng));
        }
    }

    // ========================================================================
    // Conditions and leads
    // ========================================================================

    /// Switches to the catalog condition `id`.
    ///
    /// Rhythm, noise, alert regions, the atrial queue and annotations are
    /// reset first; beats already queued are relabeled for the new condition.
    /// The heart rate then converges toward the condition's base rate,
    /// clamped like [`set_target_rate`](Self::set_target_rate). Unknown ids
    /// fall back to the default shapes and leave the target rate alone.
    pub fn set_condition(&mut self, id: &str) {
        self.mode = RhythmMode::Sinus;
        self.noise_level = self.params.noise_level;
        self.alert_regions.clear();
        self.scheduler.reset();

        if self.catalog.contains(id) {
            self.condition_id = Some(id.to_string());
        } else {
            debug!(id, "unknown condition, using default parameters");
            self.condition_id = None;
        }

        let resolved = self.catalog.resolve(id, self.lead, &self.defaults);
        debug!(
            id,
            lead = %self.lead,
            mode = ?resolved.rhythm_mode,
            localized = resolved.localized_change_applied,
            "condition applied"
        );
        self.install(resolved);
        self.annotate_retained_beats();
        self.refresh_schedule(self.stepper.horizon());
    }

    fn annotate_retained_beats(&mut self) {
        if self.external.is_some() {
            return;
        }
        let state = RhythmState {
            rate: self.stepper.current_rate(),
            mode: self.mode,
            params: &self.parameters,
        };
        self.scheduler.annotate_queue(&self.beats.read(), state);
    }

    fn install(&mut self, resolved: ResolvedCondition) {
        self.parameters = resolved.parameters;
        self.mode = resolved.rhythm_mode;
        self.alert_regions = resolved.alert_regions;
        if let Some(rate) = resolved.target_rate {
            self.set_target_rate(rate);
        }
    }

    /// Views the trace from `lead`.
    ///
    /// The active condition is re-evaluated so lead-localized ST changes
    /// appear or disappear; noise and the beat queues are untouched.
    pub fn set_lead(&mut self, lead: Lead) {
        if lead == self.lead {
            return;
        }
        self.lead = lead;
        let id = self.condition_id.as_deref().unwrap_or_default();
        let resolved = self.catalog.resolve(id, lead, &self.defaults);
        self.parameters = resolved.parameters;
        self.alert_regions = resolved.alert_regions;
        debug!(lead = %lead, localized = resolved.localized_change_applied, "lead changed");
    }

    /// Like [`set_lead`](Self::set_lead) for a lead code such as `"aVF"`.
    pub fn set_lead_code(&mut self, code: &str) -> Result<()> {
        let lead: Lead = code.parse()?;
        self.set_lead(lead);
        Ok(())
    }

    // ========================================================================
    // Display controls
    // ========================================================================

    /// Sets the rate the current rate converges toward, clamped to
    /// [`MIN_RATE`]..=[`MAX_RATE`].
    pub fn set_target_rate(&mut self, bpm: f64) {
        if bpm.is_nan() {
            warn!("ignoring NaN target rate");
            return;
        }
        let rate = bpm.clamp(MIN_RATE, MAX_RATE);
        if rate != bpm {
            warn!(requested = bpm, rate, "target rate clamped");
        }
        self.stepper.set_target_rate(rate);
    }

    /// Sets peak-to-peak noise, clamped to `[0, 1]`.
    pub fn set_noise_level(&mut self, fraction: f64) {
        if fraction.is_nan() {
            warn!("ignoring NaN noise level");
            return;
        }
        let level = fraction.clamp(0.0, 1.0);
        if level != fraction {
            warn!(requested = fraction, level, "noise level clamped");
        }
        self.noise_level = level;
    }

    /// Sets the scroll speed. Takes effect on the next [`advance`](Self::advance).
    pub fn set_paper_speed(&mut self, speed: PaperSpeed) {
        if speed != self.paper_speed {
            debug!(mm_per_second = speed.mm_per_second(), "paper speed changed");
        }
        self.paper_speed = speed;
    }

    /// Sets the scroll speed in mm/s; only 25 and 50 are accepted.
    pub fn set_paper_speed_mm(&mut self, mm_per_second: u32) -> Result<()> {
        self.set_paper_speed(PaperSpeed::try_from(mm_per_second)?);
        Ok(())
    }

    /// Scales the vertical deflection. Non-positive or non-finite factors are ignored.
    pub fn set_amplitude_zoom(&mut self, factor: f64) {
        if factor.is_finite() && factor > 0.0 {
            self.amplitude_zoom = factor;
        } else {
            warn!(factor, "ignoring invalid amplitude zoom");
        }
    }

    /// Reallocates the buffer to `width` pixels. Every sample returns to the
    /// baseline and the cursor rewinds to 0.
    pub fn resize(&mut self, width: usize) {
        debug!(from = self.buffer.width(), to = width, "buffer resized");
        self.buffer.resize(width);
    }

    /// Freezes simulation time.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Unfreezes simulation time.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    // ========================================================================
    // Multi-lead synchronization
    // ========================================================================

    /// Read-only handle on this monitor's ventricular queue for other
    /// monitors to follow.
    pub fn beat_queue_view(&self) -> BeatQueueView {
        self.beats.view()
    }

    /// Follows another monitor's ventricular queue instead of scheduling one.
    ///
    /// The followed queue is never written by this monitor. A view of this
    /// monitor's own queue is rejected.
    pub fn attach_external_beat_queue(&mut self, view: BeatQueueView) {
        if view.follows(&self.beats) {
            warn!("refusing to follow own beat queue");
            return;
        }
        debug!("external beat queue attached");
        self.external = Some(view);
        self.refresh_schedule(self.stepper.horizon());
    }

    /// Resumes scheduling this monitor's own ventricular queue.
    pub fn detach_external_beat_queue(&mut self) {
        if self.external.take().is_some() {
            debug!("external beat queue detached");
            self.refresh_schedule(self.stepper.horizon());
        }
    }

    /// Whether this monitor follows another monitor's queue.
    pub fn is_following(&self) -> bool {
        self.external.is_some()
    }

    /// Copy of the ventricular queue currently driving synthesis.
    pub fn beat_queue(&self) -> BeatQueue {
        match &self.external {
            Some(view) => view.snapshot(),
            None => self.beats.snapshot(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Sample at pixel `index`, if in range.
    pub fn read_sample(&self, index: usize) -> Option<SignalSample> {
        self.buffer.get(index).copied()
    }

    /// All samples left to right.
    pub fn samples(&self) -> impl Iterator<Item = &SignalSample> + '_ {
        self.buffer.as_slice().iter()
    }

    /// The sample buffer.
    pub fn buffer(&self) -> &SignalBuffer {
        &self.buffer
    }

    /// Next write position.
    pub fn cursor(&self) -> usize {
        self.buffer.cursor()
    }

    /// Buffer width in pixels.
    pub fn width(&self) -> usize {
        self.buffer.width()
    }

    /// Simulation time in seconds.
    pub fn time(&self) -> f64 {
        self.stepper.time()
    }

    /// Heart rate currently used for scheduling.
    pub fn current_rate(&self) -> f64 {
        self.stepper.current_rate()
    }

    /// Heart rate being converged toward.
    pub fn target_rate(&self) -> f64 {
        self.stepper.target_rate()
    }

    /// Active rhythm.
    pub fn rhythm_mode(&self) -> RhythmMode {
        self.mode
    }

    /// Active lead.
    pub fn lead(&self) -> Lead {
        self.lead
    }

    /// Active shapes.
    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    /// Enabled alert regions.
    pub fn alert_regions(&self) -> AlertRegions {
        self.alert_regions
    }

    /// Wave labels for the display.
    pub fn annotations(&self) -> &[WaveMeta] {
        self.scheduler.annotations()
    }

    /// Independent atrial beats (complete block only).
    pub fn atrial_queue(&self) -> &BeatQueue {
        self.scheduler.atrial()
    }

    /// Active condition id; `None` before any condition or after an unknown id.
    pub fn condition_id(&self) -> Option<&str> {
        self.condition_id.as_deref()
    }

    /// Current noise level.
    pub fn noise_level(&self) -> f64 {
        self.noise_level
    }

    /// Current paper speed.
    pub fn paper_speed(&self) -> PaperSpeed {
        self.paper_speed
    }

    /// Current amplitude zoom.
    pub fn amplitude_zoom(&self) -> f64 {
        self.amplitude_zoom
    }

    /// Whether simulation time is frozen.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Construction parameters.
    pub fn params(&self) -> &MonitorParams {
        &self.params
    }

    /// Shared condition catalog.
    pub fn catalog(&self) -> &Arc<ConditionCatalog> {
        &self.catalog
    }
}

impl fmt::Debug for Monitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Monitor")
            .field("condition_id", &self.condition_id)
            .field("lead", &self.lead)
            .field("mode", &self.mode)
            .field("time", &self.stepper.time())
            .field("current_rate", &self.stepper.current_rate())
            .field("width", &self.buffer.width())
            .field("cursor", &self.buffer.cursor())
            .field("paused", &self.paused)
            .field("following", &self.external.is_some())
            .finish_non_exhaustive()
    }
}
