//! Transpiration model: maps the environment inputs to a rate in `[0, 100]`
//! and derives the particle tuning from that rate.
//!
//! Every function here is pure and total. Rates passed directly to the
//! derived functions are clamped into `[0, 100]` first, so outputs always stay
//! within their documented bounds.

use crate::params::SimulationParameters;

/// Lower and upper bound of a transpiration rate.
pub const RATE_MIN: f32 = 0.0;
pub const RATE_MAX: f32 = 100.0;

const LIGHT_WEIGHT: f32 = 0.4;
const TEMPERATURE_WEIGHT: f32 = 0.3;
const DRYNESS_WEIGHT: f32 = 0.3;

/// Spawn interval at rate 0 and its reduction at rate 100 (ms).
const SLOWEST_INTERVAL_MS: f32 = 800.0;
const INTERVAL_SPAN_MS: f32 = 780.0;

const MIN_POPULATION: f32 = 5.0;
const POPULATION_SPAN: f32 = 145.0;

const MIN_SPEED: f32 = 0.1;
const SPEED_SPAN: f32 = 2.9;

const MAX_BATCH: f32 = 3.0;

#[inline]
fn fraction(rate: f32) -> f32 {
    rate.clamp(RATE_MIN, RATE_MAX) / RATE_MAX
}

/// Weighted rate: `light*0.4 + temperature*0.3 + (100-humidity)*0.3`,
/// clamped to `[0, 100]`.
///
/// Non-decreasing in light and temperature, non-increasing in humidity.
pub fn transpiration_rate(params: &SimulationParameters) -> f32 {
    let light = params.light() as f32;
    let temperature = params.temperature() as f32;
    let dryness = (100 - params.humidity()) as f32;

    let rate = light * LIGHT_WEIGHT + temperature * TEMPERATURE_WEIGHT + dryness * DRYNESS_WEIGHT;
    rate.clamp(RATE_MIN, RATE_MAX)
}

/// Time between spawn ticks in ms, from 800 at rate 0 down to 20 at rate 100.
pub fn spawn_interval_ms(rate: f32) -> f32 {
    SLOWEST_INTERVAL_MS - fraction(rate) * INTERVAL_SPAN_MS
}

/// Population cap checked before each spawn, from 5 to 150.
pub fn max_population(rate: f32) -> usize {
    (MIN_POPULATION + fraction(rate) * POPULATION_SPAN).floor() as usize
}

/// Base particle speed, from 0.1 to 3.0.
pub fn particle_speed(rate: f32) -> f32 {
    MIN_SPEED + fraction(rate) * SPEED_SPAN
}

/// Number of particles created per spawn tick: `ceil(rate/100 * 3)`.
///
/// Zero at rate 0, three at rate 100.
pub fn batch_size(rate: f32) -> usize {
    (fraction(rate) * MAX_BATCH).ceil() as usize
}

/// All quantities derived from a single rate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Derived {
    pub rate: f32,
    pub spawn_interval_ms: f32,
    pub max_population: usize,
    pub particle_speed: f32,
    pub batch_size: usize,
}

impl Derived {
    pub fn from_rate(rate: f32) -> Self {
        let rate = rate.clamp(RATE_MIN, RATE_MAX);
        Self {
            rate,
            spawn_interval_ms: spawn_interval_ms(rate),
            max_population: max_population(rate),
            particle_speed: particle_speed(rate),
            batch_size: batch_size(rate),
        }
    }

    pub fn from_params(params: &SimulationParameters) -> Self {
        Self::from_rate(transpiration_rate(params))
    }
}

/// Overall activity classification shown next to the animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TranspirationStatus {
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl TranspirationStatus {
    pub fn from_rate(rate: f32) -> Self {
        if rate >= 80.0 {
            Self::VeryHigh
        } else if rate >= 60.0 {
            Self::High
        } else if rate >= 40.0 {
            Self::Moderate
        } else if rate >= 20.0 {
            Self::Low
        } else {
            Self::VeryLow
        }
    }
}

/// How a single input currently pushes the rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FactorLevel {
    Low,
    Moderate,
    High,
}

impl FactorLevel {
    fn classify(value: i32, low_below: i32, high_above: i32) -> Self {
        if value > high_above {
            Self::High
        } else if value < low_below {
            Self::Low
        } else {
            Self::Moderate
        }
    }

    pub fn temperature(celsius: i32) -> Self {
        Self::classify(celsius, 20, 30)
    }

    pub fn humidity(percent: i32) -> Self {
        Self::classify(percent, 30, 70)
    }

    pub fn light(percent: i32) -> Self {
        Self::classify(percent, 30, 70)
    }
}
