use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::{
    config::Config,
    model,
    particle::{ParticleSet, ParticleView},
    phases,
    scheduler::Scheduler,
    types::{FrameHandle, IntervalHandle, ParticleId},
};

/// Lifecycle of a [`ParticleEngine`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    /// Created, nothing registered with the scheduler yet.
    Idle,
    /// Spawn timer and frame request are live.
    Running,
    /// Both registrations released; the collection is frozen.
    TornDown,
}

/// Owns the particle collection and its two cadences.
///
/// The spawn cadence is a repeating interval whose period follows the
/// current rate; the frame cadence re-requests itself on every frame. Both
/// registrations live in `Option`s and are `take()`n when released, so each
/// handle is canceled exactly once.
///
/// ### Fields
/// - `particles` - Live particles.
/// - `cfg` - Scene geometry and attribute ranges.
/// - `rng` - Random source for new particles.
/// - `next_id` - Id handed to the next spawned particle.
/// - `spawn_timer` - Current spawn interval, if registered.
/// - `frame_request` - Pending frame request, if any.
/// - `last_timestamp_ms` - Timestamp of the previous frame, for the delta.
/// - `state` - Lifecycle state.
#[derive(Debug)]
pub struct ParticleEngine<R: Rng = ChaCha8Rng> {
    particles: ParticleSet,
    cfg: Config,
    rng: R,
    next_id: ParticleId,
    spawn_timer: Option<IntervalHandle>,
    frame_request: Option<FrameHandle>,
    last_timestamp_ms: Option<f64>,
    state: EngineState,
}

/// What one frame callback did.
///
/// ### Fields
/// - `expired` - Particles removed for crossing the exit line.
/// - `advanced` - Particles moved by this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    pub expired: usize,
    pub advanced: usize,
}

impl<R: Rng> ParticleEngine<R> {
    pub fn new(cfg: Config, rng: R) -> Self {
        Self {
            particles: ParticleSet::new(),
            cfg,
            rng,
            next_id: 0,
            spawn_timer: None,
            frame_request: None,
            last_timestamp_ms: None,
            state: EngineState::Idle,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == EngineState::Running
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn particles(&self) -> &ParticleSet {
        &self.particles
    }

    pub fn views(&self) -> Vec<ParticleView> {
        self.particles.views()
    }

    pub fn spawn_timer(&self) -> Option<IntervalHandle> {
        self.spawn_timer
    }

    pub fn frame_request(&self) -> Option<FrameHandle> {
        self.frame_request
    }

    /// Registers the spawn timer and the first frame request.
    ///
    /// Only acts on an idle engine; a torn-down engine stays torn down.
    pub fn start(&mut self, scheduler: &mut Scheduler, rate: f32) {
        if self.state != EngineState::Idle {
            log::debug!("start ignored in state {:?}", self.state);
            return;
        }
        self.state = EngineState::Running;
        self.install_spawn_timer(scheduler, rate);
        self.frame_request = Some(scheduler.request_frame());
        log::info!(
            "particle engine started (rate {:.1}, {} origins)",
            rate,
            self.cfg.origins.len()
        );
    }

    fn install_spawn_timer(&mut self, scheduler: &mut Scheduler, rate: f32) {
        let period = model::spawn_interval_ms(rate);
        self.spawn_timer = Some(scheduler.set_interval(f64::from(period)));
        log::debug!(
            "spawn timer every {:.1} ms, cap {}, batch {}",
            period,
            model::max_population(rate),
            model::batch_size(rate)
        );
    }

    /// Replaces the spawn timer with one matching `rate`.
    ///
    /// Particles already in flight keep their attributes. Ignored unless the
    /// engine is running.
    pub fn restart_spawn_timer(&mut self, scheduler: &mut Scheduler, rate: f32) {
        if !self.is_running() {
            return;
        }
        if let Some(old) = self.spawn_timer.take() {
            scheduler.clear_interval(old);
        }
        self.install_spawn_timer(scheduler, rate);
    }

    /// Spawn tick. Events for any handle other than the live timer are stale
    /// and ignored.
    ///
    /// ### Returns
    /// Ids of the particles created by this tick.
    pub fn on_interval(&mut self, handle: IntervalHandle, rate: f32) -> Vec<ParticleId> {
        if !self.is_running() || self.spawn_timer != Some(handle) {
            return Vec::new();
        }
        let ids = phases::spawn_phase(
            &mut self.particles,
            &mut self.next_id,
            rate,
            &self.cfg,
            &mut self.rng,
        );
        if !ids.is_empty() {
            log::trace!("spawned {} particles, population {}", ids.len(), self.particles.len());
        }
        ids
    }

    /// Frame callback: expires, advances and requests the next frame.
    ///
    /// The first frame after start has a delta of zero.
    pub fn on_frame(
        &mut self,
        scheduler: &mut Scheduler,
        handle: FrameHandle,
        timestamp_ms: f64,
        rate: f32,
    ) -> Option<FrameOutcome> {
        if !self.is_running() || self.frame_request != Some(handle) {
            return None;
        }
        self.frame_request = None;

        let delta_ms = self
            .last_timestamp_ms
            .map_or(0.0, |last| timestamp_ms - last);
        self.last_timestamp_ms = Some(timestamp_ms);

        let expired = phases::expire_phase(&mut self.particles, &self.cfg);
        if expired > 0 {
            log::trace!("{} particles left the scene", expired);
        }
        phases::advance_phase(&mut self.particles, timestamp_ms, delta_ms, rate);

        self.frame_request = Some(scheduler.request_frame());

        Some(FrameOutcome {
            expired,
            advanced: self.particles.len(),
        })
    }

    /// Cancels the spawn timer and the pending frame request.
    ///
    /// Idempotent. Particles are left where they are.
    pub fn teardown(&mut self, scheduler: &mut Scheduler) {
        if let Some(timer) = self.spawn_timer.take() {
            scheduler.clear_interval(timer);
        }
        if let Some(frame) = self.frame_request.take() {
            scheduler.cancel_frame(frame);
        }
        if self.state != EngineState::TornDown {
            log::info!(
                "particle engine torn down with {} particles",
                self.particles.len()
            );
        }
        self.state = EngineState::TornDown;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::HostEvent;
    use rand::SeedableRng;

    fn engine() -> ParticleEngine {
        ParticleEngine::new(Config::default(), ChaCha8Rng::seed_from_u64(99))
    }

    /// Dispatches everything due at `now`, the way the controller does.
    fn pump(engine: &mut ParticleEngine, s: &mut Scheduler, now: f64, rate: f32) {
        for ev in s.poll(now) {
            match ev {
                HostEvent::Interval(h) => {
                    engine.on_interval(h, rate);
                }
                HostEvent::Frame {
                    handle,
                    timestamp_ms,
                } => {
                    engine.on_frame(s, handle, timestamp_ms, rate);
                }
            }
        }
    }

    #[test]
    fn start_registers_timer_and_frame() {
        let mut s = Scheduler::new();
        let mut e = engine();
        assert_eq!(e.state(), EngineState::Idle);

        e.start(&mut s, 42.5);

        assert!(e.is_running());
        assert_eq!(s.pending_intervals(), 1);
        assert_eq!(s.pending_frames(), 1);
        assert!((s.next_deadline_ms().unwrap() - 0.0).abs() < 1e-9);
    }

    #[test]
    fn frames_keep_rescheduling_themselves() {
        let mut s = Scheduler::new();
        let mut e = engine();
        e.start(&mut s, 42.5);

        for frame in 1..=10 {
            pump(&mut e, &mut s, frame as f64 * 16.0, 42.5);
            assert_eq!(s.pending_frames(), 1);
        }
    }

    #[test]
    fn spawn_ticks_follow_rate_interval() {
        let mut s = Scheduler::new();
        let mut e = engine();
        // Rate 100: 20 ms interval, batch of 3.
        e.start(&mut s, 100.0);

        pump(&mut e, &mut s, 19.0, 100.0);
        assert!(e.particles().is_empty());
        pump(&mut e, &mut s, 20.0, 100.0);
        assert_eq!(e.particles().len(), 3);
        pump(&mut e, &mut s, 40.0, 100.0);
        assert_eq!(e.particles().len(), 6);
    }

    #[test]
    fn restart_replaces_the_timer() {
        let mut s = Scheduler::new();
        let mut e = engine();
        e.start(&mut s, 0.0);
        let first = e.spawn_timer().unwrap();

        e.restart_spawn_timer(&mut s, 100.0);
        let second = e.spawn_timer().unwrap();

        assert_ne!(first, second);
        assert_eq!(s.pending_intervals(), 1);
        assert!(e.on_interval(first, 100.0).is_empty());
        assert_eq!(e.on_interval(second, 100.0).len(), 3);
    }

    #[test]
    fn restart_keeps_in_flight_particles() {
        let mut s = Scheduler::new();
        let mut e = engine();
        e.start(&mut s, 100.0);
        pump(&mut e, &mut s, 20.0, 100.0);
        let before: Vec<_> = e.particles().iter().cloned().collect();

        e.restart_spawn_timer(&mut s, 10.0);

        let after: Vec<_> = e.particles().iter().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn first_frame_only_wobbles_then_delta_follows_timestamps() {
        let mut s = Scheduler::new();
        let mut e = engine();
        s.advance_clock(10_000.0);
        e.start(&mut s, 100.0);
        let timer = e.spawn_timer().unwrap();
        assert_eq!(e.on_interval(timer, 100.0).len(), 3);
        let spawned: Vec<_> = e.particles().iter().cloned().collect();

        // First frame arrives long after the host clock's zero.
        pump(&mut e, &mut s, 10_000.0, 100.0);
        for before in &spawned {
            let p = e.particles().get(before.id).unwrap();
            let angle = 10_000.0 * 0.001 * f64::from(p.speed) + f64::from(p.phase);
            let wobble = angle.sin() as f32 * p.amplitude * 0.1;
            assert!((p.pos.x - (before.pos.x + wobble)).abs() < 1e-4);
            assert_eq!(p.pos.y, before.pos.y);
        }

        // Second frame: delta = 16 ms, progress = 16 * 0.03 * 3.0 = 1.44.
        let after_first: Vec<_> = e.particles().iter().cloned().collect();
        pump(&mut e, &mut s, 10_016.0, 100.0);
        for before in &after_first {
            let p = e.particles().get(before.id).unwrap();
            let expected = before.pos.y + before.drift.y * 1.44 * 0.05;
            assert!((p.pos.y - expected).abs() < 1e-4, "{} vs {}", p.pos.y, expected);
        }
    }

    #[test]
    fn frame_outcome_counts_moved_particles() {
        let mut s = Scheduler::new();
        let mut e = engine();
        e.start(&mut s, 100.0);
        let timer = e.spawn_timer().unwrap();
        e.on_interval(timer, 100.0);

        let frame = e.frame_request().unwrap();
        let outcome = e.on_frame(&mut s, frame, 0.0, 100.0).unwrap();
        assert_eq!(outcome, FrameOutcome { expired: 0, advanced: 3 });
    }

    #[test]
    fn stale_frame_handle_is_ignored() {
        let mut s = Scheduler::new();
        let mut e = engine();
        e.start(&mut s, 50.0);
        let live = e.frame_request().unwrap();

        assert!(e.on_frame(&mut s, FrameHandle(live.0 + 1000), 16.0, 50.0).is_none());
        assert_eq!(e.frame_request(), Some(live));
    }

    #[test]
    fn exited_particles_are_removed_and_never_return() {
        let mut s = Scheduler::new();
        let mut e = engine();
        e.start(&mut s, 100.0);
        pump(&mut e, &mut s, 20.0, 100.0);
        let ids: Vec<_> = e.particles().iter().map(|p| p.id).collect();
        assert!(!ids.is_empty());

        // Stop spawning so only the first batch is tracked.
        if let Some(timer) = e.spawn_timer.take() {
            s.clear_interval(timer);
        }

        // One long stall pushes everything far above the exit line.
        pump(&mut e, &mut s, 10_000.0, 100.0);
        assert!(e.particles().iter().all(|p| p.has_exited(-50.0)));

        pump(&mut e, &mut s, 10_016.0, 100.0);
        assert!(e.particles().is_empty());

        for t in 1..20 {
            pump(&mut e, &mut s, 10_016.0 + t as f64 * 16.0, 100.0);
            assert!(ids.iter().all(|id| e.particles().get(*id).is_none()));
        }
    }

    #[test]
    fn teardown_releases_everything_once() {
        let mut s = Scheduler::new();
        let mut e = engine();
        e.start(&mut s, 100.0);
        pump(&mut e, &mut s, 20.0, 100.0);

        e.teardown(&mut s);
        assert!(s.is_idle());
        assert_eq!(e.state(), EngineState::TornDown);
        assert!(e.spawn_timer().is_none());
        assert!(e.frame_request().is_none());

        // Second teardown is a no-op.
        e.teardown(&mut s);
        assert!(s.is_idle());
    }

    #[test]
    fn torn_down_engine_is_frozen() {
        let mut s = Scheduler::new();
        let mut e = engine();
        e.start(&mut s, 100.0);
        pump(&mut e, &mut s, 20.0, 100.0);
        let timer = e.spawn_timer().unwrap();
        let frozen: Vec<_> = e.particles().iter().cloned().collect();

        e.teardown(&mut s);
        e.start(&mut s, 100.0);
        e.restart_spawn_timer(&mut s, 100.0);

        assert!(e.on_interval(timer, 100.0).is_empty());
        pump(&mut e, &mut s, 1_000.0, 100.0);

        let now: Vec<_> = e.particles().iter().cloned().collect();
        assert_eq!(frozen, now);
        assert!(s.is_idle());
    }
}
