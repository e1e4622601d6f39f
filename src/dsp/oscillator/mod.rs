#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use self::noise::{NoiseColor, NoiseGenerator};
use crate::dsp::filter::{AmSynthFilter, AmSynthType, Filter};
use self::shapes::ShapeFn;
use self::super_wave::SuperWave;

pub mod additive;
pub mod noise;
pub mod polyblep;
pub mod shapes;
pub mod super_wave;

/*
Oscillator Bank
===============

One phase accumulator, thirty-two waveforms in six families:

  Virtual analog    naive saw / tri-saw / pulse with PolyBLEP at each jump
  Phase distortion  a warped phase read through the cosine table
  Electronic        compositions of simple phase-shaping primitives
  Additive          1..N sine harmonics, N capped by width and Nyquist
  Super wave        seven detuned saws or squares, optionally through a
                    24 dB high-pass at the played pitch
  Noise             white, pink, low-pass and band-pass

The width parameter means something different per family: pulse width,
warp point, brightness, detune or noise resonance. It ramps linearly across
each block from the previous target to the new one.

Sync Signal
-----------

Every render writes a sync signal next to the audio, one value per sample:

  s >= 0       the phase wrapped at this sample, s samples ago
  -1 < s < 0   the phase will wrap within the next sample, -s samples ahead
  -2           nothing happening (NO_SYNC)

A slave oscillator with sync enabled reads its master's signal. On s >= 0 it
restarts its phase at s·inc, so the reset lands at the same sub-sample
instant as the master's. Band-limited renders round the resulting jump with
a PolyBLEP on both sides of it, which is what the negative values are for.
The slave passes the master's resets on through its own sync output.

Phase Modulation
----------------

With a non-zero amount, pm · input[i] is added to the phase before the
waveform lookup. The accumulator itself is untouched, so pitch is stable.

Example:
  let mut master = Oscillator::new(44_100.0);
  let mut slave = Oscillator::new(44_100.0);
  master.set_frequency(110.0);
  slave.set_frequency(317.0);
  slave.set_modulation(0.0, true);

  master.process(&mut scratch, &mut sync);
  slave.process_modulated(&silence, &sync, &mut out, &mut slave_sync);
*/

/// Sync value for "no reset near this sample".
pub const NO_SYNC: f32 = -2.0;

/// Chunk size for [`Oscillator::render`], which needs a scratch sync buffer.
const RENDER_CHUNK: usize = 64;

/// Largest phase below one, used to read a shape just before its wrap.
const BEFORE_WRAP: f32 = 1.0 - f32::EPSILON;

const DEFAULT_SEED: u64 = 0x5EED;

/// Wrap into `[0, 1)`. `x - floor(x)` rounds tiny negatives up to 1.0.
#[inline]
pub(crate) fn wrap(x: f32) -> f32 {
    let y = x - x.floor();
    if y >= 1.0 {
        0.0
    } else {
        y
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    VirtualAnalog,
    PhaseDistortion,
    Electronic,
    Additive,
    SuperWave,
    Noise,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OscillatorType {
    #[default]
    VaSaw,
    VaTriSaw,
    VaPulse,
    PdSaw,
    PdSquare,
    PdPulse,
    PdDoubleSine,
    PdSawPulse,
    PdRes1,
    PdRes2,
    PdRes3,
    PdHalfSine,
    ElSaw,
    ElDoubleSaw,
    ElTri,
    ElPulse,
    ElPulseSaw,
    ElSlope,
    ElAlpha1,
    ElAlpha2,
    ElExp,
    AsSaw,
    AsSquare,
    AsTriangle,
    SuperSaw,
    SuperSquare,
    SuperSaw2,
    SuperSquare2,
    NoiseWhite,
    NoisePink,
    NoiseLp,
    NoiseBp,
}

impl OscillatorType {
    pub const ALL: [OscillatorType; 32] = [
        OscillatorType::VaSaw,
        OscillatorType::VaTriSaw,
        OscillatorType::VaPulse,
        OscillatorType::PdSaw,
        OscillatorType::PdSquare,
        OscillatorType::PdPulse,
        OscillatorType::PdDoubleSine,
        OscillatorType::PdSawPulse,
        OscillatorType::PdRes1,
        OscillatorType::PdRes2,
        OscillatorType::PdRes3,
        OscillatorType::PdHalfSine,
        OscillatorType::ElSaw,
        OscillatorType::ElDoubleSaw,
        OscillatorType::ElTri,
        OscillatorType::ElPulse,
        OscillatorType::ElPulseSaw,
        OscillatorType::ElSlope,
        OscillatorType::ElAlpha1,
        OscillatorType::ElAlpha2,
        OscillatorType::ElExp,
        OscillatorType::AsSaw,
        OscillatorType::AsSquare,
        OscillatorType::AsTriangle,
        OscillatorType::SuperSaw,
        OscillatorType::SuperSquare,
        OscillatorType::SuperSaw2,
        OscillatorType::SuperSquare2,
        OscillatorType::NoiseWhite,
        OscillatorType::NoisePink,
        OscillatorType::NoiseLp,
        OscillatorType::NoiseBp,
    ];

    /// Map a host-side integer selector; out-of-range values fall back to `VaSaw`.
    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or_else(|| {
            log::debug!("oscillator type {index} out of range, using {:?}", Self::default());
            Self::default()
        })
    }

    pub fn family(self) -> Family {
        use OscillatorType::*;
        match self {
            VaSaw | VaTriSaw | VaPulse => Family::VirtualAnalog,
            PdSaw | PdSquare | PdPulse | PdDoubleSine | PdSawPulse | PdRes1 | PdRes2 | PdRes3
            | PdHalfSine => Family::PhaseDistortion,
            ElSaw | ElDoubleSaw | ElTri | ElPulse | ElPulseSaw | ElSlope | ElAlpha1 | ElAlpha2
            | ElExp => Family::Electronic,
            AsSaw | AsSquare | AsTriangle => Family::Additive,
            SuperSaw | SuperSquare | SuperSaw2 | SuperSquare2 => Family::SuperWave,
            NoiseWhite | NoisePink | NoiseLp | NoiseBp => Family::Noise,
        }
    }

    pub fn is_noise(self) -> bool {
        self.family() == Family::Noise
    }

    /// Super waves whose sum runs through the high-pass.
    pub fn is_filtered(self) -> bool {
        matches!(self, OscillatorType::SuperSaw2 | OscillatorType::SuperSquare2)
    }

    /// Per-sample waveform. Super waves return the shape of one voice; noise has none.
    fn shape<const BL: bool>(self) -> Option<ShapeFn> {
        use OscillatorType::*;
        let shape: ShapeFn = match self {
            VaSaw | SuperSaw | SuperSaw2 => shapes::va_saw::<BL>,
            VaTriSaw => shapes::va_tri_saw::<BL>,
            VaPulse | SuperSquare | SuperSquare2 => shapes::va_pulse::<BL>,
            PdSaw => shapes::pd_saw::<BL>,
            PdSquare => shapes::pd_square::<BL>,
            PdPulse => shapes::pd_pulse::<BL>,
            PdDoubleSine => shapes::pd_double_sine::<BL>,
            PdSawPulse => shapes::pd_saw_pulse::<BL>,
            PdRes1 => shapes::pd_res1::<BL>,
            PdRes2 => shapes::pd_res2::<BL>,
            PdRes3 => shapes::pd_res3::<BL>,
            PdHalfSine => shapes::pd_half_sine::<BL>,
            ElSaw => shapes::el_saw::<BL>,
            ElDoubleSaw => shapes::el_double_saw::<BL>,
            ElTri => shapes::el_tri::<BL>,
            ElPulse => shapes::el_pulse::<BL>,
            ElPulseSaw => shapes::el_pulse_saw::<BL>,
            ElSlope => shapes::el_slope::<BL>,
            ElAlpha1 => shapes::el_alpha1::<BL>,
            ElAlpha2 => shapes::el_alpha2::<BL>,
            ElExp => shapes::el_exp::<BL>,
            AsSaw => additive::saw::<BL>,
            AsSquare => additive::square::<BL>,
            AsTriangle => additive::triangle::<BL>,
            NoiseWhite | NoisePink | NoiseLp | NoiseBp => return None,
        };
        Some(shape)
    }

    fn noise_color(self) -> NoiseColor {
        match self {
            OscillatorType::NoisePink => NoiseColor::Pink,
            OscillatorType::NoiseLp => NoiseColor::LowPass,
            OscillatorType::NoiseBp => NoiseColor::BandPass,
            _ => NoiseColor::White,
        }
    }
}

/// Ramp phase in cycles plus the frequency that drives it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseState {
    pub phase: f32,
    pub frequency: f32,
    pub sample_rate: f32,
}

impl PhaseState {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            phase: 0.0,
            frequency: 440.0,
            sample_rate,
        }
    }

    #[inline]
    pub fn increment(&self) -> f32 {
        self.frequency / self.sample_rate
    }

    /// Advance one sample. Returns true if the phase wrapped.
    #[inline]
    pub fn advance(&mut self, inc: f32) -> bool {
        self.phase += inc;
        if self.phase >= 1.0 {
            self.phase = wrap(self.phase);
            true
        } else {
            false
        }
    }
}

/// Sync signal of an accumulator that just advanced by `inc`.
#[inline]
fn sync_signal(phase: f32, inc: f32, wrapped: bool) -> f32 {
    if wrapped {
        phase / inc
    } else if phase + inc >= 1.0 {
        (phase - 1.0) / inc
    } else {
        NO_SYNC
    }
}

#[derive(Debug, Clone)]
pub struct Oscillator {
    osc_type: OscillatorType,
    bandlimit: bool,
    shape: Option<ShapeFn>,
    naive: Option<ShapeFn>,

    state: PhaseState,
    start: f32,
    width_from: f32,
    width_to: f32,
    pm: f32,
    sync: bool,

    super_wave: SuperWave,
    super_filter: AmSynthFilter,
    noise: NoiseGenerator,
}

impl Oscillator {
    pub fn new(sample_rate: f32) -> Self {
        Self::with_seed(sample_rate, DEFAULT_SEED)
    }

    pub fn with_seed(sample_rate: f32, seed: u64) -> Self {
        let osc_type = OscillatorType::default();
        let mut super_filter = AmSynthFilter::new(sample_rate);
        super_filter.set_type(AmSynthType::Hp24);
        Self {
            osc_type,
            bandlimit: true,
            shape: osc_type.shape::<true>(),
            naive: osc_type.shape::<false>(),
            state: PhaseState::new(sample_rate),
            start: 0.0,
            width_from: 0.5,
            width_to: 0.5,
            pm: 0.0,
            sync: false,
            super_wave: SuperWave::new(0.0),
            super_filter,
            noise: NoiseGenerator::new(sample_rate, seed),
        }
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.noise.reseed(seed);
    }

    pub fn set_type(&mut self, osc_type: OscillatorType) {
        self.osc_type = osc_type;
        self.select_shape();
    }

    pub fn osc_type(&self) -> OscillatorType {
        self.osc_type
    }

    /// Turn PolyBLEP and the Nyquist caps off for a naive reference render.
    pub fn set_bandlimit(&mut self, bandlimit: bool) {
        self.bandlimit = bandlimit;
        self.select_shape();
    }

    fn select_shape(&mut self) {
        self.shape = if self.bandlimit {
            self.osc_type.shape::<true>()
        } else {
            self.osc_type.shape::<false>()
        };
        self.naive = self.osc_type.shape::<false>();
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        if !crate::config::accept_sample_rate("oscillator", sample_rate) {
            return;
        }
        log::debug!("oscillator sample rate {} -> {}", self.state.sample_rate, sample_rate);
        self.state.sample_rate = sample_rate;
        self.super_filter.set_sample_rate(sample_rate);
        self.noise.set_sample_rate(sample_rate);
    }

    /// Negative frequencies are treated as zero.
    pub fn set_frequency(&mut self, frequency: f32) {
        self.state.frequency = frequency.max(0.0);
    }

    pub fn frequency(&self) -> f32 {
        self.state.frequency
    }

    pub fn phase(&self) -> f32 {
        self.state.phase
    }

    /// Jump straight to `width` with no ramp.
    pub fn set_width(&mut self, width: f32) {
        self.set_width_target(width, width);
    }

    /// Ramp the width from `from` to `to` over the next block.
    pub fn set_width_target(&mut self, from: f32, to: f32) {
        self.width_from = from.clamp(0.0, 1.0);
        self.width_to = to.clamp(0.0, 1.0);
    }

    /// Phase-modulation depth in cycles per unit input, and hard-sync on/off.
    pub fn set_modulation(&mut self, pm: f32, sync: bool) {
        self.pm = pm;
        self.sync = sync;
    }

    /// Phase the oscillator restarts from on [`reset`](Self::reset).
    pub fn set_start(&mut self, start: f32) {
        self.start = wrap(start);
        self.super_wave.set_start(self.start);
    }

    /// Restart at the start phase. Type, frequency, width and modulation
    /// settings are kept.
    pub fn reset(&mut self) {
        self.state.phase = self.start;
        self.width_from = self.width_to;
        self.super_wave.reset();
        self.super_filter.clear();
        self.noise.reset();
    }

    /// Free-running render with no modulation inputs.
    pub fn process(&mut self, output: &mut [f32], sync_out: &mut [f32]) {
        let n = output.len().min(sync_out.len());
        self.dispatch(&[], &[], false, false, &mut output[..n], &mut sync_out[..n]);
    }

    /// Render with a phase-modulation input and a master's sync signal. Uses
    /// whichever of the two [`set_modulation`](Self::set_modulation) enabled.
    pub fn process_modulated(
        &mut self,
        pm_input: &[f32],
        sync_input: &[f32],
        output: &mut [f32],
        sync_out: &mut [f32],
    ) {
        let n = output
            .len()
            .min(sync_out.len())
            .min(pm_input.len())
            .min(sync_input.len());
        let pm = self.pm != 0.0;
        let sync = self.sync;
        self.dispatch(
            &pm_input[..n],
            &sync_input[..n],
            pm,
            sync,
            &mut output[..n],
            &mut sync_out[..n],
        );
    }

    /// Fill `output`, discarding the sync signal.
    pub fn render(&mut self, output: &mut [f32]) {
        let mut scratch = [0.0f32; RENDER_CHUNK];
        for chunk in output.chunks_mut(RENDER_CHUNK) {
            let n = chunk.len();
            self.process(chunk, &mut scratch[..n]);
        }
    }

    fn dispatch(
        &mut self,
        pm_input: &[f32],
        sync_input: &[f32],
        pm: bool,
        sync: bool,
        output: &mut [f32],
        sync_out: &mut [f32],
    ) {
        match (self.osc_type.family(), self.shape) {
            (Family::Noise, _) | (_, None) => self.render_noise(output, sync_out),
            (Family::SuperWave, Some(shape)) => match (sync, pm) {
                (false, false) => self.render_super::<false, false>(shape, pm_input, sync_input, output, sync_out),
                (false, true) => self.render_super::<false, true>(shape, pm_input, sync_input, output, sync_out),
                (true, false) => self.render_super::<true, false>(shape, pm_input, sync_input, output, sync_out),
                (true, true) => self.render_super::<true, true>(shape, pm_input, sync_input, output, sync_out),
            },
            (_, Some(shape)) => match (sync, pm) {
                (false, false) => self.render_shaped::<false, false>(shape, pm_input, sync_input, output, sync_out),
                (false, true) => self.render_shaped::<false, true>(shape, pm_input, sync_input, output, sync_out),
                (true, false) => self.render_shaped::<true, false>(shape, pm_input, sync_input, output, sync_out),
                (true, true) => self.render_shaped::<true, true>(shape, pm_input, sync_input, output, sync_out),
            },
        }
        self.width_from = self.width_to;
    }

    #[inline]
    fn width_step(&self, n: usize) -> f32 {
        if n == 0 {
            0.0
        } else {
            (self.width_to - self.width_from) / n as f32
        }
    }

    fn render_shaped<const SYNC: bool, const PM: bool>(
        &mut self,
        shape: ShapeFn,
        pm_input: &[f32],
        sync_input: &[f32],
        output: &mut [f32],
        sync_out: &mut [f32],
    ) {
        let inc = self.state.increment();
        let step = self.width_step(output.len());
        // Sync edges are rounded off with the naive shape on both sides.
        let naive = self.naive.filter(|_| SYNC && self.bandlimit);

        for (i, (out, sync_value)) in output.iter_mut().zip(sync_out.iter_mut()).enumerate() {
            let width = self.width_from + step * i as f32;
            let mut correction = 0.0;
            let s = if SYNC { sync_input[i] } else { NO_SYNC };

            if SYNC && s >= 0.0 {
                let at_reset = wrap(self.state.phase + (1.0 - s) * inc);
                self.state.phase = wrap(s * inc);
                *sync_value = s;
                if let Some(naive) = naive {
                    let jump = naive(BEFORE_WRAP, width, inc) - naive(at_reset, width, inc);
                    correction = jump * polyblep::residual(s);
                }
            } else {
                let wrapped = self.state.advance(inc);
                *sync_value = sync_signal(self.state.phase, inc, wrapped);
                if let (Some(naive), true) = (naive, s > -1.0) {
                    let at_reset = wrap(self.state.phase - s * inc);
                    let jump = naive(0.0, width, inc) - naive(at_reset, width, inc);
                    correction = jump * polyblep::residual(s);
                }
            }

            let phase = if PM {
                wrap(self.state.phase + self.pm * pm_input[i])
            } else {
                self.state.phase
            };
            *out = shape(phase, width, inc) + correction;
        }
    }

    fn render_super<const SYNC: bool, const PM: bool>(
        &mut self,
        shape: ShapeFn,
        pm_input: &[f32],
        sync_input: &[f32],
        output: &mut [f32],
        sync_out: &mut [f32],
    ) {
        let inc = self.state.increment();
        let step = self.width_step(output.len());
        let filtered = self.osc_type.is_filtered();
        if filtered {
            self.super_filter.set_coefficients(self.state.frequency, 0.0);
        }

        for (i, (out, sync_value)) in output.iter_mut().zip(sync_out.iter_mut()).enumerate() {
            let width = self.width_from + step * i as f32;
            if SYNC && sync_input[i] >= 0.0 {
                // Restart one sample early; tick() below advances to s·inc.
                let s = sync_input[i];
                self.super_wave.hard_sync(s - 1.0, inc, width);
            }
            let before = self.super_wave.center_phase();
            let offset = if PM { self.pm * pm_input[i] } else { 0.0 };
            let y = self.super_wave.tick(shape, inc, width, offset);
            *out = if filtered { self.super_filter.tick(y) } else { y };

            let center = self.super_wave.center_phase();
            self.state.phase = center;
            *sync_value = if SYNC && sync_input[i] >= 0.0 {
                sync_input[i]
            } else {
                sync_signal(center, inc, center < before)
            };
        }
    }

    fn render_noise(&mut self, output: &mut [f32], sync_out: &mut [f32]) {
        let color = self.osc_type.noise_color();
        if matches!(color, NoiseColor::LowPass | NoiseColor::BandPass) {
            self.noise.set_filter(color, self.state.frequency, self.width_to);
        }
        for out in output.iter_mut() {
            *out = self.noise.next(color);
        }
        sync_out.fill(NO_SYNC);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 44_100.0;

    fn render(osc: &mut Oscillator, len: usize) -> (Vec<f32>, Vec<f32>) {
        let mut out = vec![0.0; len];
        let mut sync = vec![0.0; len];
        osc.process(&mut out, &mut sync);
        (out, sync)
    }

    /// Single- and two-sample spikes: large opposite-signed first differences.
    fn count_clicks(samples: &[f32]) -> usize {
        const THRESHOLD: f32 = 0.4;
        let diff: Vec<f32> = samples.windows(2).map(|w| w[1] - w[0]).collect();
        let mut clicks = 0;
        for i in 0..diff.len().saturating_sub(2) {
            let (d1, d2, d3) = (diff[i], diff[i + 1], diff[i + 2]);
            let single = d1.abs() > THRESHOLD && d2.abs() > THRESHOLD && d1 * d2 < 0.0;
            let double =
                d1.abs() > THRESHOLD && d2.abs() < 0.1 && d3.abs() > THRESHOLD && d1 * d3 < 0.0;
            if single || double {
                clicks += 1;
            }
        }
        clicks
    }

    fn render_type(osc_type: OscillatorType, frequency: f32, width: f32, bandlimit: bool) -> Vec<f32> {
        let mut osc = Oscillator::new(SR);
        osc.set_type(osc_type);
        osc.set_bandlimit(bandlimit);
        osc.set_frequency(frequency);
        osc.set_width(width);
        let mut out = vec![0.0; 4410];
        osc.render(&mut out);
        out
    }

    #[test]
    fn from_index_clamps_to_default() {
        assert_eq!(OscillatorType::from_index(2), OscillatorType::VaPulse);
        assert_eq!(OscillatorType::from_index(27), OscillatorType::SuperSquare2);
        assert_eq!(OscillatorType::from_index(31), OscillatorType::NoiseBp);
        assert_eq!(OscillatorType::from_index(32), OscillatorType::VaSaw);
        assert!(OscillatorType::ALL.iter().enumerate().all(|(i, &t)| OscillatorType::from_index(i) == t));
    }

    #[test]
    fn families() {
        assert_eq!(OscillatorType::PdRes2.family(), Family::PhaseDistortion);
        assert_eq!(OscillatorType::AsTriangle.family(), Family::Additive);
        assert_eq!(OscillatorType::SuperSquare.family(), Family::SuperWave);
        assert_eq!(OscillatorType::SuperSaw2.family(), Family::SuperWave);
        assert!(OscillatorType::SuperSquare2.is_filtered());
        assert!(!OscillatorType::SuperSaw.is_filtered());
        assert!(OscillatorType::NoisePink.is_noise());
        assert!(!OscillatorType::ElExp.is_noise());
    }

    #[test]
    fn bandlimiting_never_adds_clicks() {
        for osc_type in OscillatorType::ALL.into_iter().filter(|t| !t.is_noise()) {
            for frequency in [220.0, 330.0] {
                for width in [0.1, 0.3, 0.5, 0.7, 0.9] {
                    let bandlimited = count_clicks(&render_type(osc_type, frequency, width, true));
                    let naive = count_clicks(&render_type(osc_type, frequency, width, false));
                    assert!(
                        bandlimited <= naive,
                        "{osc_type:?} {frequency} Hz w={width}: {bandlimited} > {naive}"
                    );
                }
            }
        }
    }

    #[test]
    fn polyblep_softens_the_saw_jump() {
        let naive = render_type(OscillatorType::VaSaw, 2_000.0, 0.5, false);
        let smooth = render_type(OscillatorType::VaSaw, 2_000.0, 0.5, true);
        let largest = |s: &[f32]| s.windows(2).map(|w| (w[1] - w[0]).abs()).fold(0.0, f32::max);
        assert!(largest(&smooth) < largest(&naive));
    }

    #[test]
    fn additive_has_no_energy_above_nyquist_cap() {
        use rustfft::{num_complex::Complex, FftPlanner};

        // 4410 Hz at 44.1 kHz: only harmonics 1..=4 sit below Nyquist.
        let samples = render_type(OscillatorType::AsSaw, 4_410.0, 1.0, true);
        let len = samples.len();
        let mut buffer: Vec<Complex<f32>> =
            samples.iter().map(|&x| Complex { re: x, im: 0.0 }).collect();
        FftPlanner::new().plan_fft_forward(len).process(&mut buffer);

        // Bin k is k·10 Hz, so harmonic h sits in bin 441·h.
        let magnitude = |bin: usize| buffer[bin].norm() / len as f32;
        assert!(magnitude(441) > 0.1);
        assert!(magnitude(441 * 4) > 0.05);
        let stray: f32 = (1..len / 2)
            .filter(|bin| bin % 441 != 0)
            .map(magnitude)
            .fold(0.0, f32::max);
        assert!(stray < 1e-3, "{stray}");
    }

    #[test]
    fn electronic_shapes_alias_less_when_bandlimited() {
        use rustfft::{num_complex::Complex, FftPlanner};

        // 3110 Hz over 4410 samples is exactly 311 cycles, so harmonic h
        // sits in bin 311·h and every other bin holds only folded energy.
        let aliasing = |osc_type: OscillatorType, bandlimit: bool| {
            let samples = render_type(osc_type, 3_110.0, 0.3, bandlimit);
            let len = samples.len();
            let mut buffer: Vec<Complex<f32>> =
                samples.iter().map(|&x| Complex { re: x, im: 0.0 }).collect();
            FftPlanner::new().plan_fft_forward(len).process(&mut buffer);
            (1..len / 2)
                .filter(|bin| bin % 311 != 0)
                .map(|bin| buffer[bin].norm_sqr())
                .sum::<f32>()
        };
        for osc_type in [OscillatorType::ElSaw, OscillatorType::ElPulse, OscillatorType::ElAlpha1] {
            let smooth = aliasing(osc_type, true);
            let naive = aliasing(osc_type, false);
            assert!(smooth < 0.5 * naive, "{osc_type:?}: {smooth} vs {naive}");
        }
    }

    #[test]
    fn filtered_super_waves_lose_their_lows() {
        use rustfft::{num_complex::Complex, FftPlanner};

        // 10 Hz bins; everything below bin 50 is the detuned fundamentals.
        let low_share = |osc_type: OscillatorType| {
            let samples = render_type(osc_type, 441.0, 0.5, true);
            let len = samples.len();
            let mut buffer: Vec<Complex<f32>> =
                samples.iter().map(|&x| Complex { re: x, im: 0.0 }).collect();
            FftPlanner::new().plan_fft_forward(len).process(&mut buffer);
            let energy = |bins: std::ops::Range<usize>| bins.map(|b| buffer[b].norm_sqr()).sum::<f32>();
            energy(1..50) / energy(1..len / 2)
        };
        for (plain, filtered) in [
            (OscillatorType::SuperSaw, OscillatorType::SuperSaw2),
            (OscillatorType::SuperSquare, OscillatorType::SuperSquare2),
        ] {
            let before = low_share(plain);
            let after = low_share(filtered);
            assert!(after < 0.7 * before, "{filtered:?}: {after} vs {before}");
        }
    }

    #[test]
    fn sync_signal_marks_each_wrap_once() {
        let mut osc = Oscillator::new(SR);
        osc.set_frequency(450.0);
        let (_, sync) = render(&mut osc, 1000);
        let resets = sync.iter().filter(|&&s| s >= 0.0).count();
        let warnings = sync.iter().filter(|&&s| s > -1.0 && s < 0.0).count();
        assert_eq!(resets, 10);
        assert_eq!(warnings, 10);
        assert!(sync.iter().all(|&s| s == NO_SYNC || (-1.0..1.0).contains(&s)));
    }

    #[test]
    fn slave_follows_master_resets() {
        // A 441-sample master period whose resets fall mid-sample.
        let mut master = Oscillator::new(SR);
        master.set_frequency(100.0);
        master.set_start(0.5);
        master.reset();
        let mut slave = Oscillator::new(SR);
        slave.set_frequency(370.0);
        slave.set_modulation(0.0, true);

        let len = 4410;
        let (_, master_sync) = render(&mut master, len);
        let silence = vec![0.0; len];
        let mut out = vec![0.0; len];
        let mut slave_sync = vec![0.0; len];
        slave.process_modulated(&silence, &master_sync, &mut out, &mut slave_sync);

        for (i, (&m, &s)) in master_sync.iter().zip(&slave_sync).enumerate() {
            if m >= 0.0 {
                assert_eq!(s, m, "sample {i}");
            }
        }

        // Once locked, the slave repeats with the master's period.
        let first = master_sync.iter().position(|&s| s >= 0.0).unwrap();
        for i in first..len - 441 {
            assert!((out[i] - out[i + 441]).abs() < 0.02, "sample {i}");
        }
        assert!(out.iter().all(|y| y.is_finite() && y.abs() < 1.5));
    }

    #[test]
    fn phase_modulation_leaves_pitch_alone() {
        let mut osc = Oscillator::new(SR);
        osc.set_type(OscillatorType::PdSaw);
        osc.set_frequency(450.0);
        osc.set_modulation(0.3, false);

        let modulator: Vec<f32> = (0..1000).map(|i| (i as f32 * 0.05).sin()).collect();
        let silence = vec![0.0; 1000];
        let mut out = vec![0.0; 1000];
        let mut sync = vec![0.0; 1000];
        osc.process_modulated(&modulator, &silence, &mut out, &mut sync);

        assert_eq!(sync.iter().filter(|&&s| s >= 0.0).count(), 10);
        let mut plain = Oscillator::new(SR);
        plain.set_type(OscillatorType::PdSaw);
        plain.set_frequency(450.0);
        let (reference, _) = render(&mut plain, 1000);
        assert_ne!(out, reference);
    }

    #[test]
    fn width_ramps_across_the_block() {
        let mut osc = Oscillator::new(SR);
        osc.set_type(OscillatorType::VaPulse);
        osc.set_bandlimit(false);
        osc.set_frequency(4_410.0);
        osc.set_width_target(0.1, 0.9);
        let (out, _) = render(&mut osc, 1000);

        let high = |cycle: &[f32]| cycle.iter().filter(|&&y| y > 0.0).count();
        assert!(high(&out[..10]) > high(&out[990..]));
    }

    #[test]
    fn reset_restores_a_fresh_render() {
        for osc_type in OscillatorType::ALL {
            let mut osc = Oscillator::with_seed(SR, 9);
            osc.set_type(osc_type);
            osc.set_frequency(523.0);
            osc.set_width(0.3);
            osc.set_start(0.25);
            osc.reset();
            let (first, _) = render(&mut osc, 300);

            osc.reset();
            osc.reset();
            let (again, _) = render(&mut osc, 300);
            assert_eq!(first, again, "{osc_type:?}");
        }
    }

    #[test]
    fn noise_is_seeded() {
        let mut a = Oscillator::with_seed(SR, 1);
        let mut b = Oscillator::with_seed(SR, 1);
        let mut c = Oscillator::with_seed(SR, 2);
        for osc in [&mut a, &mut b, &mut c] {
            osc.set_type(OscillatorType::NoiseWhite);
        }
        let (x, sync) = render(&mut a, 128);
        assert_eq!(x, render(&mut b, 128).0);
        assert_ne!(x, render(&mut c, 128).0);
        assert!(sync.iter().all(|&s| s == NO_SYNC));
    }

    #[test]
    fn very_high_frequency_wraps_once_per_sample() {
        let mut state = PhaseState::new(SR);
        state.frequency = 3.5 * SR;
        for _ in 0..100 {
            state.advance(state.increment());
            assert!((0.0..1.0).contains(&state.phase));
        }
    }

    #[test]
    fn invalid_sample_rate_keeps_the_pitch() {
        let mut osc = Oscillator::new(SR);
        osc.set_frequency(450.0);
        for rate in [0.0, -SR, f32::NAN] {
            osc.set_sample_rate(rate);
        }
        let (out, sync) = render(&mut osc, 1000);
        assert!(out.iter().all(|y| y.is_finite()));
        assert_eq!(sync.iter().filter(|&&s| s >= 0.0).count(), 10);
    }
}
