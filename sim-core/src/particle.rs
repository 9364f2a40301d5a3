use glam::Vec2;
use rand::Rng;

use crate::{
    config::Config,
    model::{self, RATE_MAX},
    types::ParticleId,
};

/// Which leaf a particle leaves from; decides the sign of its horizontal drift.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn of(origin: Vec2, center_x: f32) -> Self {
        if origin.x < center_x {
            Self::Left
        } else {
            Self::Right
        }
    }

    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// A single water vapour particle.
///
/// Everything except `pos` is fixed at creation time.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub id: ParticleId,
    pub origin: Vec2,
    /// Drift offset; `drift.y` is always negative so the particle rises.
    pub drift: Vec2,
    /// Base speed at the rate in effect when the particle was created.
    /// Only the lateral wobble uses it.
    pub speed: f32,
    pub amplitude: f32,
    pub phase: f32,
    pub pos: Vec2,
    pub size: f32,
    pub opacity: f32,
}

impl Particle {
    /// Creates a particle at a uniformly chosen origin with randomized drift
    /// and wobble, sized for `rate`.
    ///
    /// `cfg.origins` must not be empty; [`crate::phases::spawn_phase`] checks it.
    pub fn spawn(id: ParticleId, rate: f32, cfg: &Config, rng: &mut impl Rng) -> Self {
        let origin = cfg.origins[rng.random_range(0..cfg.origins.len())];
        let side = Side::of(origin, cfg.center_x);
        let t = rate / RATE_MAX;

        let drift = Vec2::new(
            side.sign() * cfg.drift_x.sample(rng),
            -cfg.drift_y.sample(rng),
        );

        Self {
            id,
            origin,
            drift,
            speed: model::particle_speed(rate),
            amplitude: cfg.amplitude.sample(rng),
            phase: rng.random_range(0.0..Config::PHASE_RANGE),
            pos: origin,
            size: cfg.size.lerp(t),
            opacity: cfg.opacity.lerp(t),
        }
    }

    pub fn side(&self, center_x: f32) -> Side {
        Side::of(self.origin, center_x)
    }

    /// `true` once the particle is above the exit line.
    #[inline]
    pub fn has_exited(&self, exit_y: f32) -> bool {
        self.pos.y < exit_y
    }

    pub fn view(&self) -> ParticleView {
        ParticleView {
            id: self.id,
            pos: self.pos,
            size: self.size,
            opacity: self.opacity,
        }
    }
}

/// Read-only per-particle data handed to the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleView {
    pub id: ParticleId,
    pub pos: Vec2,
    pub size: f32,
    pub opacity: f32,
}

/// The live particle collection. Order carries no meaning.
#[derive(Debug, Default)]
pub struct ParticleSet {
    pub particles: Vec<Particle>,
}

impl ParticleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn get(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.iter().find(|p| p.id == id)
    }

    pub fn views(&self) -> Vec<ParticleView> {
        self.particles.iter().map(Particle::view).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn side_is_split_at_center_line() {
        assert_eq!(Side::of(Vec2::new(85.0, 150.0), 150.0), Side::Left);
        assert_eq!(Side::of(Vec2::new(150.0, 150.0), 150.0), Side::Right);
        assert_eq!(Side::of(Vec2::new(215.0, 150.0), 150.0), Side::Right);
    }

    #[test]
    fn spawned_particles_respect_config_ranges() {
        let cfg = Config::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        for id in 0..500 {
            let p = Particle::spawn(id, 42.5, &cfg, &mut rng);

            assert!(cfg.origins.contains(&p.origin));
            assert_eq!(p.pos, p.origin);

            // Outward horizontal drift, always rising.
            let magnitude = p.drift.x.abs();
            assert!((20.0..50.0).contains(&magnitude));
            assert_eq!(p.drift.x.signum(), p.side(cfg.center_x).sign());
            assert!(p.drift.y <= -60.0 && p.drift.y > -100.0);

            assert!((3.0..7.0).contains(&p.amplitude));
            assert!((0.0..std::f32::consts::TAU).contains(&p.phase));
            assert!((p.speed - model::particle_speed(42.5)).abs() < 1e-6);
        }
    }

    #[test]
    fn size_and_opacity_scale_with_rate() {
        let cfg = Config::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let slow = Particle::spawn(0, 0.0, &cfg, &mut rng);
        let fast = Particle::spawn(1, 100.0, &cfg, &mut rng);

        assert_eq!(slow.size, 1.5);
        assert_eq!(slow.opacity, 0.5);
        assert_eq!(fast.size, 5.0);
        assert_eq!(fast.opacity, 1.0);
    }

    #[test]
    fn every_origin_gets_used() {
        let cfg = Config::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut seen = vec![false; cfg.origins.len()];

        for id in 0..400 {
            let p = Particle::spawn(id, 50.0, &cfg, &mut rng);
            let idx = cfg.origins.iter().position(|o| *o == p.origin).unwrap();
            seen[idx] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn exit_check_is_strict() {
        let cfg = Config::default();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut p = Particle::spawn(0, 50.0, &cfg, &mut rng);

        p.pos.y = -50.0;
        assert!(!p.has_exited(cfg.exit_y));
        p.pos.y = -50.01;
        assert!(p.has_exited(cfg.exit_y));
    }
}
