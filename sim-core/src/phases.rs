//! Per-cadence update phases for the particle collection.
//!
//! The engine drives them as:
//! 1. [`spawn_phase`] — on every spawn tick, append a rate-sized batch of
//!    new particles if the population is under its cap.
//! 2. [`expire_phase`] — at the start of every frame, drop particles that
//!    are already above the exit line.
//! 3. [`advance_phase`] — move every survivor by the wobble and drift terms.

use rand::Rng;

use crate::{
    config::Config,
    model,
    particle::{Particle, ParticleSet},
    types::ParticleId,
};

/// Appends a batch of new particles if the population is under the cap.
///
/// 1. Compares the current population against [`model::max_population`] for
///    `rate`; at or above the cap nothing is spawned.
/// 2. Creates [`model::batch_size`] particles via [`Particle::spawn`],
///    taking ids from `next_id`.
///
/// The cap is only checked before the batch, so the population may exceed
/// it by at most one batch afterwards.
///
/// ### Parameters
/// - `set` - Live particles; new ones are appended.
/// - `next_id` - Id counter, advanced by one per spawned particle.
/// - `rate` - Current transpiration rate.
/// - `cfg` - Scene config providing origins and attribute ranges.
/// - `rng` - Random source for the per-particle attributes.
///
/// ### Returns
/// The ids of the newly created particles, in creation order.
pub fn spawn_phase(
    set: &mut ParticleSet,
    next_id: &mut ParticleId,
    rate: f32,
    cfg: &Config,
    rng: &mut impl Rng,
) -> Vec<ParticleId> {
    let cap = model::max_population(rate);
    if cfg.origins.is_empty() || set.len() >= cap {
        return Vec::new();
    }

    let batch = model::batch_size(rate);
    let mut new_ids = Vec::with_capacity(batch);
    for _ in 0..batch {
        let id = *next_id;
        *next_id += 1;
        set.particles.push(Particle::spawn(id, rate, cfg, rng));
        new_ids.push(id);
    }
    new_ids
}

/// Removes every particle whose position is above `cfg.exit_y`.
///
/// Runs before [`advance_phase`], so a particle that crosses the line during
/// a frame is removed at the start of the next one.
///
/// ### Returns
/// Number of particles removed.
pub fn expire_phase(set: &mut ParticleSet, cfg: &Config) -> usize {
    let before = set.len();
    set.particles.retain(|p| !p.has_exited(cfg.exit_y));
    before - set.len()
}

/// Moves every particle for one frame.
///
/// With `progress = delta_ms * 0.03 * particle_speed(rate)`:
/// - `x += sin(t * 0.001 * p.speed + p.phase) * p.amplitude * 0.1 + drift.x * progress * 0.05`
/// - `y += drift.y * progress * 0.05`
///
/// `progress` uses the speed of the *current* rate for every particle, while
/// the wobble uses the speed stored on each particle at creation. `delta_ms`
/// is not capped: after a stall the particles jump by the whole interval.
///
/// ### Parameters
/// - `set` - Live particles; positions are updated in place.
/// - `timestamp_ms` - Host frame timestamp, drives the wobble.
/// - `delta_ms` - Time since the previous frame.
/// - `rate` - Current transpiration rate.
pub fn advance_phase(set: &mut ParticleSet, timestamp_ms: f64, delta_ms: f64, rate: f32) {
    let progress = delta_ms as f32 * 0.03 * model::particle_speed(rate);

    for p in &mut set.particles {
        // Phase computed in f64: timestamps grow without bound.
        let angle = timestamp_ms * 0.001 * f64::from(p.speed) + f64::from(p.phase);
        let wobble = angle.sin() as f32 * p.amplitude * 0.1;

        p.pos.x += wobble + p.drift.x * progress * 0.05;
        p.pos.y += p.drift.y * progress * 0.05;
    }
}
