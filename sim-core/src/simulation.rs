//! The simulation controller: one object owning the parameters, the particle
//! engine and the scheduler, so both cadences always run in a single
//! scheduling context.
//!
//! A host drives it with [`Simulation::start`] once and [`Simulation::pump`]
//! on every repaint, reads [`Simulation::snapshot`] to draw, and forwards
//! slider changes through [`Simulation::set`]. Dropping the controller tears
//! the engine down.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    config::Config,
    engine::{EngineState, ParticleEngine},
    error::Result,
    model::{self, Derived, TranspirationStatus},
    params::{Parameter, SimulationParameters},
    particle::{ParticleSet, ParticleView},
    scheduler::{HostEvent, Scheduler},
};

/// Counts of what a single [`Simulation::pump`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PumpReport {
    pub spawned: usize,
    pub expired: usize,
    /// Particle moves, summed over the frames delivered.
    pub advanced: usize,
    pub frames: usize,
}

/// Everything the renderer needs for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneSnapshot {
    pub params: SimulationParameters,
    pub rate: f32,
    pub status: TranspirationStatus,
    pub particles: Vec<ParticleView>,
}

#[derive(Debug)]
pub struct Simulation<R: Rng = ChaCha8Rng> {
    params: SimulationParameters,
    engine: ParticleEngine<R>,
    scheduler: Scheduler,
}

impl Simulation<ChaCha8Rng> {
    /// Deterministic simulation: the same seed and inputs give the same particles.
    pub fn with_seed(cfg: Config, params: SimulationParameters, seed: u64) -> Result<Self> {
        Self::new(cfg, params, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Simulation<R> {
    /// Builds an idle simulation.
    ///
    /// ### Returns
    /// - `Err(ConfigError::Invalid)` if `cfg` fails [`Config::validate`].
    ///
    /// [`ConfigError::Invalid`]: crate::error::ConfigError::Invalid
    pub fn new(cfg: Config, params: SimulationParameters, rng: R) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            params,
            engine: ParticleEngine::new(cfg, rng),
            scheduler: Scheduler::new(),
        })
    }

    /// Starts both cadences at host time `now_ms`.
    pub fn start(&mut self, now_ms: f64) {
        self.scheduler.advance_clock(now_ms);
        let rate = self.rate();
        self.engine.start(&mut self.scheduler, rate);
    }

    /// Dispatches every event due at `now_ms`.
    ///
    /// The rate is recomputed from the current parameters for each event.
    pub fn pump(&mut self, now_ms: f64) -> PumpReport {
        let mut report = PumpReport::default();

        for event in self.scheduler.poll(now_ms) {
            let rate = self.rate();
            match event {
                HostEvent::Interval(handle) => {
                    report.spawned += self.engine.on_interval(handle, rate).len();
                }
                HostEvent::Frame {
                    handle,
                    timestamp_ms,
                } => {
                    if let Some(outcome) =
                        self.engine
                            .on_frame(&mut self.scheduler, handle, timestamp_ms, rate)
                    {
                        report.expired += outcome.expired;
                        report.advanced += outcome.advanced;
                        report.frames += 1;
                    }
                }
            }
        }
        report
    }

    pub fn params(&self) -> SimulationParameters {
        self.params
    }

    /// Updates one input. When the value actually changes and the engine is
    /// running, the spawn timer is restarted with the new interval.
    ///
    /// ### Returns
    /// `true` if the stored value changed.
    pub fn set(&mut self, param: Parameter, value: i32) -> bool {
        let changed = self.params.set(param, value);
        if changed {
            log::debug!(
                "{} set to {}{}",
                param.label(),
                self.params.get(param),
                param.unit()
            );
            let rate = self.rate();
            self.engine.restart_spawn_timer(&mut self.scheduler, rate);
        }
        changed
    }

    pub fn set_temperature(&mut self, celsius: i32) -> bool {
        self.set(Parameter::Temperature, celsius)
    }

    pub fn set_humidity(&mut self, percent: i32) -> bool {
        self.set(Parameter::Humidity, percent)
    }

    pub fn set_light(&mut self, percent: i32) -> bool {
        self.set(Parameter::Light, percent)
    }

    pub fn rate(&self) -> f32 {
        model::transpiration_rate(&self.params)
    }

    pub fn derived(&self) -> Derived {
        Derived::from_params(&self.params)
    }

    pub fn status(&self) -> TranspirationStatus {
        TranspirationStatus::from_rate(self.rate())
    }

    pub fn particles(&self) -> &ParticleSet {
        self.engine.particles()
    }

    pub fn config(&self) -> &Config {
        self.engine.config()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn state(&self) -> EngineState {
        self.engine.state()
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        let rate = self.rate();
        SceneSnapshot {
            params: self.params,
            rate,
            status: TranspirationStatus::from_rate(rate),
            particles: self.engine.views(),
        }
    }

    /// Cancels the spawn timer and the frame request. Idempotent; also runs on drop.
    pub fn teardown(&mut self) {
        self.engine.teardown(&mut self.scheduler);
    }
}

impl<R: Rng> Drop for Simulation<R> {
    fn drop(&mut self) {
        self.teardown();
    }
}
