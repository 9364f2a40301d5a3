//! Decorative scene geometry and the values derived from the inputs.
//!
//! Everything here is in scene units (a 300x400 box, `y` down), matching the
//! particle coordinates produced by the core. Nothing here feeds back into the
//! simulation.

use glam::Vec2;
use transpiration_core::params::SimulationParameters;

/// Width and height of the scene box.
pub const SCENE_SIZE: Vec2 = Vec2::new(300.0, 400.0);

/// Stem from the pot line up to the leaf junction, and its width.
pub const STEM: [Vec2; 2] = [Vec2::new(150.0, 380.0), Vec2::new(150.0, 200.0)];
pub const STEM_WIDTH: f32 = 20.0;

/// Stomata drawn on the leaves; half-axes of each ellipse.
pub const STOMA_RADII: Vec2 = Vec2::new(4.0, 2.0);

/// Number of clouds shown when the air is humid.
pub const CLOUD_COUNT: usize = 5;

const BEZIER_SEGMENTS: usize = 16;

/// Samples a cubic Bézier curve into `segments + 1` points, both ends included.
pub fn cubic_bezier(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, segments: usize) -> Vec<Vec2> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|i| {
            let t = i as f32 / segments as f32;
            let u = 1.0 - t;
            p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
        })
        .collect()
}

/// Outline built from consecutive Bézier segments; filling closes it back to `start`.
fn outline(start: Vec2, segments: &[[Vec2; 3]]) -> Vec<Vec2> {
    let mut points = vec![start];
    let mut from = start;
    for [c1, c2, to] in segments {
        let curve = cubic_bezier(from, *c1, *c2, *to, BEZIER_SEGMENTS);
        points.extend(curve.into_iter().skip(1));
        from = *to;
    }
    points
}

/// Outlines of the left, right and top leaves.
pub fn leaf_outlines() -> [Vec<Vec2>; 3] {
    let left = outline(
        Vec2::new(150.0, 250.0),
        &[
            [Vec2::new(70.0, 220.0), Vec2::new(30.0, 160.0), Vec2::new(60.0, 100.0)],
            [Vec2::new(90.0, 40.0), Vec2::new(150.0, 200.0), Vec2::new(150.0, 200.0)],
        ],
    );
    let right = outline(
        Vec2::new(150.0, 250.0),
        &[
            [Vec2::new(230.0, 220.0), Vec2::new(270.0, 160.0), Vec2::new(240.0, 100.0)],
            [Vec2::new(210.0, 40.0), Vec2::new(150.0, 200.0), Vec2::new(150.0, 200.0)],
        ],
    );
    let top = outline(
        Vec2::new(150.0, 200.0),
        &[
            [Vec2::new(120.0, 150.0), Vec2::new(150.0, 100.0), Vec2::new(150.0, 100.0)],
            [Vec2::new(150.0, 100.0), Vec2::new(180.0, 150.0), Vec2::new(150.0, 200.0)],
        ],
    );
    [left, right, top]
}

/// Sun badge: grows, brightens and sharpens with light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sun {
    pub scale: f32,
    pub opacity: f32,
    pub blur: f32,
    /// Halo radius relative to the disc.
    pub halo: f32,
}

/// Cloud layer, present only above 60 % humidity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Clouds {
    pub opacity: f32,
    pub raining: bool,
}

impl Clouds {
    /// Position of cloud `i` as a fraction of the view (left, top).
    pub fn anchor(i: usize) -> Vec2 {
        Vec2::new(i as f32 * 0.20, i as f32 * 0.15)
    }
}

/// Thermometer gauge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thermometer {
    /// Fill level in `[0, 1]` over the 15-35 °C range.
    pub fill: f32,
    pub hot: bool,
}

/// All decoration for the current inputs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decor {
    pub sun: Sun,
    pub clouds: Option<Clouds>,
    pub thermometer: Thermometer,
}

impl Decor {
    pub fn from_params(params: &SimulationParameters) -> Self {
        let light = params.light() as f32 / 100.0;
        let humidity = params.humidity();
        let temperature = params.temperature();

        let sun = Sun {
            scale: 0.5 + light * 0.5,
            opacity: light,
            blur: (100 - params.light()) as f32 / 10.0,
            halo: 1.0 + light,
        };

        let clouds = (humidity > 60).then(|| Clouds {
            opacity: (humidity - 60) as f32 / 40.0,
            raining: humidity > 70,
        });

        let thermometer = Thermometer {
            fill: ((temperature - 15) as f32 / 20.0).clamp(0.0, 1.0),
            hot: temperature > 25,
        };

        Self {
            sun,
            clouds,
            thermometer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bezier_hits_its_end_points() {
        let p0 = Vec2::new(0.0, 0.0);
        let p3 = Vec2::new(10.0, -4.0);
        let pts = cubic_bezier(p0, Vec2::new(3.0, 5.0), Vec2::new(7.0, 5.0), p3, 8);

        assert_eq!(pts.len(), 9);
        assert_eq!(pts[0], p0);
        assert!((pts[8] - p3).length() < 1e-5);
    }

    #[test]
    fn leaf_outlines_stay_inside_the_scene() {
        for leaf in leaf_outlines() {
            assert_eq!(leaf.len(), 2 * BEZIER_SEGMENTS + 1);
            for p in &leaf {
                assert!(p.x >= 0.0 && p.x <= SCENE_SIZE.x);
                assert!(p.y >= 0.0 && p.y <= SCENE_SIZE.y);
            }
        }
    }

    #[test]
    fn left_and_right_leaves_mirror_each_other() {
        let [left, right, _] = leaf_outlines();
        assert_eq!(left.len(), right.len());
        for (l, r) in left.iter().zip(&right) {
            assert!((l.x - (SCENE_SIZE.x - r.x)).abs() < 1e-3);
            assert!((l.y - r.y).abs() < 1e-3);
        }
    }

    #[test]
    fn sun_follows_light() {
        let dark = Decor::from_params(&SimulationParameters::new(25, 50, 0)).sun;
        let bright = Decor::from_params(&SimulationParameters::new(25, 50, 100)).sun;

        assert_eq!(dark.scale, 0.5);
        assert_eq!(dark.opacity, 0.0);
        assert_eq!(dark.blur, 10.0);
        assert_eq!(bright.scale, 1.0);
        assert_eq!(bright.opacity, 1.0);
        assert_eq!(bright.blur, 0.0);
        assert_eq!(bright.halo, 2.0);
    }

    #[test]
    fn clouds_appear_above_sixty_and_rain_above_seventy() {
        assert!(Decor::from_params(&SimulationParameters::new(25, 60, 50)).clouds.is_none());

        let light = Decor::from_params(&SimulationParameters::new(25, 65, 50))
            .clouds
            .unwrap();
        assert!(!light.raining);
        assert!((light.opacity - 0.125).abs() < 1e-6);

        let heavy = Decor::from_params(&SimulationParameters::new(25, 100, 50))
            .clouds
            .unwrap();
        assert!(heavy.raining);
        assert_eq!(heavy.opacity, 1.0);
    }

    #[test]
    fn thermometer_fill_and_colour_switch() {
        let cold = Decor::from_params(&SimulationParameters::new(15, 50, 50)).thermometer;
        let warm = Decor::from_params(&SimulationParameters::new(25, 50, 50)).thermometer;
        let hot = Decor::from_params(&SimulationParameters::new(35, 50, 50)).thermometer;

        assert_eq!(cold.fill, 0.0);
        assert_eq!(warm.fill, 0.5);
        assert!(!warm.hot);
        assert_eq!(hot.fill, 1.0);
        assert!(hot.hot);
    }
}
