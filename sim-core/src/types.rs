/// Identifier for a particle in a [`crate::particle::ParticleSet`].
///
/// Ids are handed out sequentially by the [`crate::engine::ParticleEngine`]
/// and are never reused within the lifetime of a given engine.
pub type ParticleId = u64;

/// Handle to a repeating timer registered with a [`crate::scheduler::Scheduler`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IntervalHandle(pub(crate) u64);

/// Handle to a pending "before the next frame" request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub(crate) u64);
