use crate::error::{Error, Result};

/*
Delay Lines
===========

All delay lines here sit on the same circular buffer: a fixed-capacity array,
a write cursor (`in_point`) and a read cursor (`out_point`) that trails it by
the requested delay. Both cursors advance by one every sample and wrap modulo
the capacity, so the buffer never grows while audio is running.

                 in_point
                    ↓
  [ . . . . r . . . w . . . . . . ]
            ↑
        out_point = in_point - delay (mod L)

Four read strategies:

  Delay    integer delay, reads one tap. Exact and cheap.

  DelayA   fractional delay via a first-order allpass interpolator:

               y[n] = c·x[n - D] + x[n - D - 1] - c·y[n - 1]
               c    = (1 - α) / (1 + α)

           Flat magnitude response (no high-frequency loss), but the recursion
           means a delay change settles over a few samples. The integer/fraction
           split keeps α in [0.5, 1.5), where the phase delay is flattest.

  DelayL   fractional delay via linear interpolation between two taps:

               y[n] = (1 - α)·x[n - ⌊D⌋] + α·x[n - ⌊D⌋ - 1]

           No state, no settling, but it lowpasses slightly when α ≈ 0.5.

  DelayH   fractional delay via a four-point cubic Hermite spline through
           the taps around the read position:

               c0 = y0          c1 = (y1 − y₋₁)/2
               c2 = y₋₁ − 5/2·y0 + 2·y1 − y2/2
               c3 = (y2 − y₋₁)/2 + 3/2·(y0 − y1)
               y  = ((c3·α + c2)·α + c1)·α + c0

           Stateless like DelayL and much flatter at the top of the band.
           It reads before it writes, so the nearest tap must already be in
           the buffer: the delay is at least two samples.

TapDelay keeps only the write cursor and lets callers read any number of taps
at integer offsets.
*/

/// Default buffer length, in samples.
pub const DEFAULT_CAPACITY: usize = 4096;
/// Smallest buffer any delay line accepts.
pub const MIN_CAPACITY: usize = 4;

fn check_capacity(capacity: usize) -> Result<()> {
    if capacity < MIN_CAPACITY {
        return Err(Error::InvalidCapacity {
            got: capacity,
            min: MIN_CAPACITY,
        });
    }
    Ok(())
}

/// Non-interpolating delay line.
#[derive(Debug, Clone, PartialEq)]
pub struct Delay {
    buffer: Vec<f32>,
    in_point: usize,
    out_point: usize,
    delay: usize,
    last: f32,
}

impl Default for Delay {
    fn default() -> Self {
        Self::new()
    }
}

impl Delay {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Capacities below [`MIN_CAPACITY`] are raised to it.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(MIN_CAPACITY);
        Self {
            buffer: vec![0.0; capacity],
            in_point: 0,
            out_point: 0,
            delay: 0,
            last: 0.0,
        }
    }

    pub fn try_with_capacity(capacity: usize) -> Result<Self> {
        check_capacity(capacity)?;
        Ok(Self::with_capacity(capacity))
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Grow the buffer to hold at least `capacity` samples.
    ///
    /// Allocates, so only call it during setup. Clears the line.
    pub fn set_max(&mut self, capacity: usize) {
        if capacity > self.buffer.len() {
            self.buffer = vec![0.0; capacity];
        }
        self.clear();
    }

    /// Delay in whole samples, clamped to `capacity - 1`.
    pub fn set_delay(&mut self, delay: usize) {
        let len = self.buffer.len();
        self.delay = delay.min(len - 1);
        self.out_point = (self.in_point + len - self.delay) % len;
    }

    pub fn delay(&self) -> usize {
        self.delay
    }

    /// The sample the next `process` call will return, if `delay > 0`.
    pub fn next_out(&self) -> f32 {
        self.buffer[self.out_point]
    }

    pub fn last_out(&self) -> f32 {
        self.last
    }

    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        let len = self.buffer.len();
        self.buffer[self.in_point] = sample;
        self.in_point = (self.in_point + 1) % len;

        self.last = self.buffer[self.out_point];
        self.out_point = (self.out_point + 1) % len;
        self.last
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.in_point = 0;
        self.last = 0.0;
        self.set_delay(self.delay);
    }
}

/// Allpass-interpolating fractional delay line.
#[derive(Debug, Clone, PartialEq)]
pub struct DelayA {
    buffer: Vec<f32>,
    in_point: usize,
    out_point: usize,
    delay: f32,
    alpha: f32,
    coeff: f32,
    last: f32,
    ap_input: f32,
}

impl Default for DelayA {
    fn default() -> Self {
        Self::new()
    }
}

impl DelayA {
    /// Shortest delay the interpolator can realise.
    pub const MIN_DELAY: f32 = 0.5;

    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(MIN_CAPACITY);
        let mut delay = Self {
            buffer: vec![0.0; capacity],
            in_point: 0,
            out_point: 0,
            delay: 0.0,
            alpha: 0.0,
            coeff: 0.0,
            last: 0.0,
            ap_input: 0.0,
        };
        delay.set_delay(Self::MIN_DELAY);
        delay
    }

    pub fn try_with_capacity(capacity: usize) -> Result<Self> {
        check_capacity(capacity)?;
        Ok(Self::with_capacity(capacity))
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Grow the buffer. Setup only; clears the line.
    pub fn set_max(&mut self, capacity: usize) {
        if capacity > self.buffer.len() {
            self.buffer = vec![0.0; capacity];
        }
        self.clear();
    }

    /// Largest delay the current buffer supports.
    pub fn max_delay(&self) -> f32 {
        (self.buffer.len() - 2) as f32
    }

    /// Fractional delay in samples, clamped to `[0.5, capacity - 2]`.
    pub fn set_delay(&mut self, delay: f32) {
        let len = self.buffer.len();
        let delay = delay.clamp(Self::MIN_DELAY, self.max_delay());
        self.delay = delay;

        // Read cursor chases the write cursor.
        let mut out_pointer = self.in_point as f32 - delay + 1.0;
        while out_pointer < 0.0 {
            out_pointer += len as f32;
        }

        let mut out_point = out_pointer as usize;
        if out_point >= len {
            out_point = 0;
        }
        let mut alpha = 1.0 + out_point as f32 - out_pointer;
        if alpha < 0.5 {
            // Flattest phase delay for alpha in [0.5, 1.5).
            out_point += 1;
            if out_point >= len {
                out_point -= len;
            }
            alpha += 1.0;
        }

        self.out_point = out_point;
        self.alpha = alpha;
        self.coeff = (1.0 - alpha) / (1.0 + alpha);
    }

    pub fn delay(&self) -> f32 {
        self.delay
    }

    /// Allpass coefficient for the current fractional part.
    pub fn coefficient(&self) -> f32 {
        self.coeff
    }

    /// The sample the next `process` call will return.
    pub fn next_out(&self) -> f32 {
        -self.coeff * self.last + self.ap_input + self.coeff * self.buffer[self.out_point]
    }

    pub fn last_out(&self) -> f32 {
        self.last
    }

    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        let len = self.buffer.len();
        self.buffer[self.in_point] = sample;
        self.in_point += 1;
        if self.in_point == len {
            self.in_point = 0;
        }

        self.last = self.next_out();

        self.ap_input = self.buffer[self.out_point];
        self.out_point += 1;
        if self.out_point == len {
            self.out_point = 0;
        }
        self.last
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.in_point = 0;
        self.last = 0.0;
        self.ap_input = 0.0;
        self.set_delay(self.delay);
    }
}

/// Linearly-interpolating fractional delay line.
#[derive(Debug, Clone, PartialEq)]
pub struct DelayL {
    buffer: Vec<f32>,
    in_point: usize,
    out_point: usize,
    delay: f32,
    alpha: f32,
    last: f32,
}

impl Default for DelayL {
    fn default() -> Self {
        Self::new()
    }
}

impl DelayL {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(MIN_CAPACITY);
        Self {
            buffer: vec![0.0; capacity],
            in_point: 0,
            out_point: 0,
            delay: 0.0,
            alpha: 0.0,
            last: 0.0,
        }
    }

    pub fn try_with_capacity(capacity: usize) -> Result<Self> {
        check_capacity(capacity)?;
        Ok(Self::with_capacity(capacity))
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Grow the buffer. Setup only; clears the line.
    pub fn set_max(&mut self, capacity: usize) {
        if capacity > self.buffer.len() {
            self.buffer = vec![0.0; capacity];
        }
        self.clear();
    }

    pub fn max_delay(&self) -> f32 {
        (self.buffer.len() - 1) as f32
    }

    /// Fractional delay in samples, clamped to `[0, capacity - 1]`.
    pub fn set_delay(&mut self, delay: f32) {
        let len = self.buffer.len();
        let delay = delay.clamp(0.0, self.max_delay());
        self.delay = delay;

        let mut out_pointer = self.in_point as f32 - delay;
        while out_pointer < 0.0 {
            out_pointer += len as f32;
        }

        let mut out_point = out_pointer as usize;
        if out_point >= len {
            out_point = 0;
        }
        self.alpha = (out_pointer - out_point as f32).clamp(0.0, 1.0);
        self.out_point = out_point;
    }

    pub fn delay(&self) -> f32 {
        self.delay
    }

    pub fn next_out(&self) -> f32 {
        let next = if self.out_point + 1 < self.buffer.len() {
            self.out_point + 1
        } else {
            0
        };
        self.buffer[self.out_point] * (1.0 - self.alpha) + self.buffer[next] * self.alpha
    }

    pub fn last_out(&self) -> f32 {
        self.last
    }

    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        let len = self.buffer.len();
        self.buffer[self.in_point] = sample;
        self.in_point += 1;
        if self.in_point == len {
            self.in_point = 0;
        }

        self.last = self.next_out();

        self.out_point += 1;
        if self.out_point == len {
            self.out_point = 0;
        }
        self.last
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.in_point = 0;
        self.last = 0.0;
        self.set_delay(self.delay);
    }
}

/// Cubic Hermite fractional delay line, for delays modulated every sample.
#[derive(Debug, Clone, PartialEq)]
pub struct DelayH {
    buffer: Vec<f32>,
    in_point: usize,
    delay: f32,
    last: f32,
}

impl Default for DelayH {
    fn default() -> Self {
        Self::new()
    }
}

impl DelayH {
    pub const MIN_DELAY: f32 = 2.0;

    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: vec![0.0; capacity.max(MIN_CAPACITY)],
            in_point: 0,
            delay: Self::MIN_DELAY,
            last: 0.0,
        }
    }

    pub fn try_with_capacity(capacity: usize) -> Result<Self> {
        check_capacity(capacity)?;
        Ok(Self::with_capacity(capacity))
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Grow the buffer. Setup only; clears the line.
    pub fn set_max(&mut self, capacity: usize) {
        if capacity > self.buffer.len() {
            self.buffer = vec![0.0; capacity];
        }
        self.clear();
    }

    /// The oldest tap of the spline sits a full buffer back.
    pub fn max_delay(&self) -> f32 {
        (self.buffer.len() - 2) as f32
    }

    /// Fractional delay in samples, clamped to `[2, capacity - 2]`.
    pub fn set_delay(&mut self, delay: f32) {
        self.delay = delay.clamp(Self::MIN_DELAY, self.max_delay());
    }

    pub fn delay(&self) -> f32 {
        self.delay
    }

    /// The sample written `ago` writes back, `1 ≤ ago ≤ capacity`.
    #[inline]
    fn tap(&self, ago: usize) -> f32 {
        let len = self.buffer.len();
        self.buffer[(self.in_point + len - ago) % len]
    }

    /// What the next [`process`](Self::process) will return.
    #[inline]
    pub fn next_out(&self) -> f32 {
        let whole = self.delay.floor();
        let alpha = self.delay - whole;
        let i = whole as usize;
        let (ym1, y0, y1, y2) = (self.tap(i - 1), self.tap(i), self.tap(i + 1), self.tap(i + 2));

        let c1 = 0.5 * (y1 - ym1);
        let c2 = ym1 - 2.5 * y0 + 2.0 * y1 - 0.5 * y2;
        let c3 = 0.5 * (y2 - ym1) + 1.5 * (y0 - y1);
        ((c3 * alpha + c2) * alpha + c1) * alpha + y0
    }

    pub fn last_out(&self) -> f32 {
        self.last
    }

    /// Push a sample without reading, for callers that already took
    /// [`next_out`](Self::next_out).
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.in_point] = sample;
        self.in_point += 1;
        if self.in_point == self.buffer.len() {
            self.in_point = 0;
        }
    }

    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        self.last = self.next_out();
        self.write(sample);
        self.last
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.in_point = 0;
        self.last = 0.0;
    }
}

/// Multi-tap delay buffer: write once per sample, read any integer offset.
#[derive(Debug, Clone, PartialEq)]
pub struct TapDelay {
    buffer: Vec<f32>,
    in_point: usize,
}

impl Default for TapDelay {
    fn default() -> Self {
        Self::new()
    }
}

impl TapDelay {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: vec![0.0; capacity.max(MIN_CAPACITY)],
            in_point: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn tick(&mut self, sample: f32) {
        self.buffer[self.in_point] = sample;
        self.in_point = (self.in_point + 1) % self.buffer.len();
    }

    /// The sample written `samples` ticks ago; `at(0)` is the latest write.
    #[inline]
    pub fn at(&self, samples: usize) -> f32 {
        let len = self.buffer.len();
        let samples = samples.min(len - 1);
        self.buffer[(self.in_point + 2 * len - 1 - samples) % len]
    }

    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.in_point = 0;
    }
}
