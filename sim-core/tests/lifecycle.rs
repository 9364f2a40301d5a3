use transpiration_core::{
    config::Config,
    engine::EngineState,
    model::{self, TranspirationStatus},
    params::SimulationParameters,
    simulation::Simulation,
};

const FRAME_MS: f64 = 1000.0 / 60.0;

fn run(sim: &mut Simulation, frames: usize) {
    for i in 0..=frames {
        sim.pump(i as f64 * FRAME_MS);
    }
}

#[test]
fn default_inputs_reach_a_steady_population() {
    let params = SimulationParameters::default();
    let mut sim = Simulation::with_seed(Config::default(), params, 42).unwrap();
    sim.start(0.0);

    let d = sim.derived();
    assert!((d.rate - 42.5).abs() < 1e-4);
    assert_eq!(d.max_population, 66);

    let mut peak = 0;
    for i in 0..=60 * 30 {
        let report = sim.pump(i as f64 * FRAME_MS);
        assert!(report.frames <= 1);
        peak = peak.max(sim.particles().len());
    }

    assert!(peak > 0);
    assert!(peak <= d.max_population + d.batch_size);
    assert_eq!(sim.status(), TranspirationStatus::Moderate);
}

#[test]
fn particles_rise_and_drift_outward() {
    let mut sim = Simulation::with_seed(
        Config::default(),
        SimulationParameters::new(35, 0, 100),
        7,
    )
    .unwrap();
    sim.start(0.0);
    run(&mut sim, 120);

    let cfg = sim.config().clone();
    for p in sim.particles().iter() {
        assert!(p.pos.y <= p.origin.y + 1e-3, "particle {} sank", p.id);
        let travelled = p.pos.x - p.origin.x;
        // Drift dominates wobble once a particle has risen a little.
        if p.origin.y - p.pos.y > 40.0 {
            assert_eq!(travelled.signum(), p.side(cfg.center_x).sign());
        }
    }
}

#[test]
fn same_seed_gives_same_scene() {
    let params = SimulationParameters::new(30, 20, 80);
    let mut a = Simulation::with_seed(Config::default(), params, 1234).unwrap();
    let mut b = Simulation::with_seed(Config::default(), params, 1234).unwrap();
    a.start(0.0);
    b.start(0.0);

    run(&mut a, 300);
    run(&mut b, 300);

    assert_eq!(a.snapshot(), b.snapshot());
}

#[test]
fn nothing_lingers_above_the_exit_line() {
    let mut sim = Simulation::with_seed(
        Config::default(),
        SimulationParameters::new(35, 0, 100),
        9,
    )
    .unwrap();
    sim.start(0.0);

    let exit_y = sim.config().exit_y;
    let mut last_above: Vec<u64> = Vec::new();
    for i in 0..=60 * 20 {
        sim.pump(i as f64 * FRAME_MS);
        // Whatever was above the line on the previous frame is gone now.
        for id in &last_above {
            assert!(sim.particles().get(*id).is_none());
        }
        last_above = sim
            .particles()
            .iter()
            .filter(|p| p.has_exited(exit_y))
            .map(|p| p.id)
            .collect();
    }
}

#[test]
fn slider_changes_mid_run_retune_spawning() {
    let mut sim = Simulation::with_seed(
        Config::default(),
        SimulationParameters::new(15, 100, 0),
        3,
    )
    .unwrap();
    sim.start(0.0);

    let mut slow_spawned = 0;
    for i in 0..=600 {
        slow_spawned += sim.pump(i as f64 * FRAME_MS).spawned;
    }
    let rate = sim.rate();
    assert!(sim.particles().len() <= model::max_population(rate) + model::batch_size(rate));

    sim.set_temperature(35);
    sim.set_humidity(0);
    sim.set_light(100);

    let mut fast_spawned = 0;
    for i in 601..=1200 {
        fast_spawned += sim.pump(i as f64 * FRAME_MS).spawned;
    }
    // 764.9 ms batches of one versus 172.1 ms batches of three.
    assert!(fast_spawned > slow_spawned * 5, "{fast_spawned} vs {slow_spawned}");
}

#[test]
fn teardown_leaves_scheduler_idle_and_scene_frozen() {
    let mut sim = Simulation::with_seed(Config::default(), SimulationParameters::default(), 11).unwrap();
    sim.start(0.0);
    run(&mut sim, 200);

    sim.teardown();
    assert_eq!(sim.state(), EngineState::TornDown);
    assert!(sim.scheduler().is_idle());

    let frozen = sim.snapshot();
    for i in 201..400 {
        sim.pump(i as f64 * FRAME_MS);
    }
    assert_eq!(sim.snapshot(), frozen);
}
