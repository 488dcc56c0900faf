//! Beat scheduling per rhythm mode.
//!
//! The ventricular [`BeatQueue`] is a sliding window of fiducial beat
//! instants kept populated `lookahead` seconds ahead of simulation time and
//! trimmed `history` seconds behind it. Under complete heart block a second,
//! independently paced atrial queue is maintained as well.

use std::cell::{Ref, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::config::{MAX_RATE, MIN_RATE};
use crate::types::{ParameterSet, RhythmMode, WaveName};
use crate::utils::RandomSource;

/// Probability that a Mobitz II beat fails to conduct.
pub const MOBITZ_DROP_PROBABILITY: f64 = 0.25;

/// AF interval factor range, `[min, max)`.
pub const AF_INTERVAL_RANGE: (f64, f64) = (0.5, 1.5);

/// Ascending sequence of beat instants (seconds of simulation time).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BeatQueue {
    beats: VecDeque<f64>,
}

impl BeatQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of scheduled beats.
    pub fn len(&self) -> usize {
        self.beats.len()
    }

    /// Whether no beat is scheduled.
    pub fn is_empty(&self) -> bool {
        self.beats.is_empty()
    }

    /// Oldest retained beat.
    pub fn first(&self) -> Option<f64> {
        self.beats.front().copied()
    }

    /// Latest scheduled beat.
    pub fn last(&self) -> Option<f64> {
        self.beats.back().copied()
    }

    /// Iterates in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.beats.iter().copied()
    }

    /// Beats within `radius` seconds of `t`.
    pub fn near(&self, t: f64, radius: f64) -> impl Iterator<Item = f64> + '_ {
        self.iter().filter(move |beat| (t - beat).abs() <= radius)
    }

    /// Whether the queue is sorted ascending.
    pub fn is_sorted(&self) -> bool {
        self.beats
            .iter()
            .zip(self.beats.iter().skip(1))
            .all(|(a, b)| a <= b)
    }

    pub(crate) fn push(&mut self, time: f64) {
        debug_assert!(self.last().map_or(true, |last| time >= last));
        self.beats.push_back(time);
    }

    pub(crate) fn evict_before(&mut self, cutoff: f64) {
        while self.beats.front().is_some_and(|&beat| beat < cutoff) {
            self.beats.pop_front();
        }
    }

    pub(crate) fn clear(&mut self) {
        self.beats.clear();
    }
}

/// Owning handle to a ventricular queue that other monitors may follow.
///
/// Only the holder of the writer schedules into the queue; everyone else
/// gets a [`BeatQueueView`].
#[derive(Debug, Default)]
pub struct BeatQueueWriter {
    inner: Rc<RefCell<BeatQueue>>,
}

impl BeatQueueWriter {
    /// Creates a writer around an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only handle for synchronized monitors.
    pub fn view(&self) -> BeatQueueView {
        BeatQueueView {
            inner: Rc::clone(&self.inner),
        }
    }

    /// Copy of the queue as it stands now.
    pub fn snapshot(&self) -> BeatQueue {
        self.inner.borrow().clone()
    }

    pub(crate) fn read(&self) -> Ref<'_, BeatQueue> {
        self.inner.borrow()
    }

    pub(crate) fn with_mut<R>(&self, f: impl FnOnce(&mut BeatQueue) -> R) -> R {
        f(&mut self.inner.borrow_mut())
    }
}

/// Read-only view of another monitor's ventricular queue.
#[derive(Debug, Clone)]
pub struct BeatQueueView {
    inner: Rc<RefCell<BeatQueue>>,
}

impl BeatQueueView {
    /// Copy of the followed queue as it stands now.
    pub fn snapshot(&self) -> BeatQueue {
        self.inner.borrow().clone()
    }

    pub(crate) fn read(&self) -> Ref<'_, BeatQueue> {
        self.inner.borrow()
    }

    /// Whether `self` and `writer` refer to the same queue.
    pub fn follows(&self, writer: &BeatQueueWriter) -> bool {
        Rc::ptr_eq(&self.inner, &writer.inner)
    }
}

/// Display annotation derived from a scheduled beat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveMeta {
    /// Which deflection this marks.
    pub label: WaveName,
    /// Absolute simulation time of the deflection's center.
    pub time: f64,
}

/// Horizons used by [`RhythmScheduler`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulerParams {
    /// Seconds kept populated ahead of `now`.
    pub lookahead: f64,
    /// Seconds of past beats retained.
    pub history: f64,
    /// Seconds annotations are retained.
    pub annotation_retention: f64,
    /// Independent atrial rate under complete block, per minute.
    pub atrial_rate: f64,
}

impl Default for SchedulerParams {
    fn default() -> Self {
        Self {
            lookahead: 2.0,
            history: 4.0,
            annotation_retention: 5.0,
            atrial_rate: 75.0,
        }
    }
}

/// Rhythm state consulted while scheduling.
#[derive(Debug, Clone, Copy)]
pub struct RhythmState<'a> {
    /// Current (converging) heart rate, per minute.
    pub rate: f64,
    /// Active rhythm mode.
    pub mode: RhythmMode,
    /// Active shapes, used for annotation offsets.
    pub params: &'a ParameterSet,
}

/// Maintains the beat queues and their annotations.
#[derive(Debug, Clone)]
pub struct RhythmScheduler {
    params: SchedulerParams,
    atrial: BeatQueue,
    annotations: Vec<WaveMeta>,
}

impl RhythmScheduler {
    /// Creates a scheduler with empty queues.
    pub fn new(params: SchedulerParams) -> Self {
        Self {
            params,
            atrial: BeatQueue::new(),
            annotations: Vec::new(),
        }
    }

    /// Scheduler horizons.
    pub fn params(&self) -> &SchedulerParams {
        &self.params
    }

    /// Independent atrial queue (empty unless in complete block).
    pub fn atrial(&self) -> &BeatQueue {
        &self.atrial
    }

    /// Retained annotations, oldest first per queue.
    pub fn annotations(&self) -> &[WaveMeta] {
        &self.annotations
    }

    /// Clears the atrial queue and annotations.
    pub fn reset(&mut self) {
        self.atrial.clear();
        self.annotations.clear();
    }

    /// Labels every beat already in `beats` under `state`.
    ///
    /// Beats survive a [`reset`](Self::reset) while their annotations do not;
    /// call this before the next [`advance`](Self::advance) so the retained
    /// beats are labeled with the new mode and shapes.
    pub fn annotate_queue(&mut self, beats: &BeatQueue, state: RhythmState<'_>) {
        for beat in beats.iter() {
            self.annotate_ventricular(beat, state);
        }
    }

    /// Restores the ventricular queue invariant around `now` and refreshes the
    /// atrial queue and annotations.
    pub fn advance(
        &mut self,
        now: f64,
        beats: &mut BeatQueue,
        state: RhythmState<'_>,
        rng: &mut dyn RandomSource,
    ) {
        self.extend_ventricular(now, beats, state, rng);
        self.advance_shared(now, state);
    }

    /// Like [`advance`](Self::advance) for a monitor following another
    /// monitor's ventricular queue: only the atrial queue and annotations move.
    pub fn advance_atrial_only(&mut self, now: f64, state: RhythmState<'_>) {
        self.advance_shared(now, state);
    }

    fn advance_shared(&mut self, now: f64, state: RhythmState<'_>) {
        if state.mode.has_independent_atria() {
            self.extend_atrial(now, state.params);
        } else {
            self.atrial.clear();
        }
        self.atrial.evict_before(now - self.params.history);

        let cutoff = now - self.params.annotation_retention;
        self.annotations.retain(|meta| meta.time >= cutoff);
    }

    fn extend_ventricular(
        &mut self,
        now: f64,
        beats: &mut BeatQueue,
        state: RhythmState<'_>,
        rng: &mut dyn RandomSource,
    ) {
        let horizon = now + self.params.lookahead;
        let base = beat_interval(state.rate);

        if beats.last().map_or(true, |last| last < now - self.params.history) {
            beats.clear();
            beats.push(now);
            self.annotate_ventricular(now, state);
        }

        while let Some(last) = beats.last().filter(|&last| last <= horizon) {
            let next = last + next_interval(base, state.mode, rng);
            beats.push(next);
            self.annotate_ventricular(next, state);
        }

        beats.evict_before(now - self.params.history);
    }

    fn extend_atrial(&mut self, now: f64, params: &ParameterSet) {
        let horizon = now + self.params.lookahead;
        let interval = beat_interval(self.params.atrial_rate);

        if self.atrial.last().map_or(true, |last| last < now - self.params.history) {
            self.atrial.clear();
            let first = now + interval / 3.0;
            self.atrial.push(first);
            self.annotate_atrial(first, params);
        }

        while let Some(last) = self.atrial.last().filter(|&last| last <= horizon) {
            let next = last + interval;
            self.atrial.push(next);
            self.annotate_atrial(next, params);
        }
    }

    fn annotate_ventricular(&mut self, beat: f64, state: RhythmState<'_>) {
        for label in [WaveName::P, WaveName::Q, WaveName::R, WaveName::S, WaveName::T] {
            if state.mode.shows(label) {
                self.annotations.push(WaveMeta {
                    label,
                    time: beat + state.params.get(label).offset,
                });
            }
        }
    }

    fn annotate_atrial(&mut self, beat: f64, params: &ParameterSet) {
        self.annotations.push(WaveMeta {
            label: WaveName::P,
            time: beat + params.p.offset,
        });
    }
}

/// Seconds per beat at `rate` beats per minute, with `rate` held to
/// [`MIN_RATE`]..=[`MAX_RATE`].
#[inline]
pub fn beat_interval(rate: f64) -> f64 {
    60.0 / rate.max(MIN_RATE).min(MAX_RATE)
}

fn next_interval(base: f64, mode: RhythmMode, rng: &mut dyn RandomSource) -> f64 {
    match mode {
        RhythmMode::AtrialFibrillation => {
            base * rng.next_range(AF_INTERVAL_RANGE.0, AF_INTERVAL_RANGE.1)
        }
        RhythmMode::Mobitz2Block if rng.chance(MOBITZ_DROP_PROBABILITY) => base * 2.0,
        _ => base,
    }
}
