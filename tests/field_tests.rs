//! Integration tests for the particle field simulation and projection.

use fieldwave::canvas::{DrawCommand, DrawList};
use fieldwave::config::FieldConfig;
use fieldwave::field::{project, Particle, ParticleField, StepOutcome, Viewport};
use fieldwave::spawn::Spawner;
use glam::Vec3;

const WIDTH: f32 = 1280.0;
const HEIGHT: f32 = 720.0;

fn field_with(count: usize, seed: u64) -> ParticleField {
    let config = FieldConfig {
        particle_count: count,
        ..FieldConfig::default()
    };
    ParticleField::new(config, WIDTH, HEIGHT, Spawner::from_seed(seed))
}

fn lone_particle(config: &FieldConfig, viewport: &Viewport) -> Particle {
    let mut spawner = Spawner::from_seed(99);
    Particle::spawn(config, viewport, &mut spawner)
}

// ============================================================================
// Physics
// ============================================================================

#[test]
fn nothing_stays_below_ground() {
    let mut field = field_with(300, 11);
    let ground = field.config().ground;
    for _ in 0..2_000 {
        field.step();
        for p in field.particles() {
            assert!(p.position.y >= ground, "particle below ground: {:?}", p.position);
        }
    }
}

#[test]
fn lossless_bounce_preserves_vertical_speed() {
    let config = FieldConfig::default();
    let viewport = Viewport::new(WIDTH, HEIGHT, &config);
    let mut p = lone_particle(&config, &viewport);
    p.position = Vec3::new(0.0, 1.0, 800.0);
    p.velocity = Vec3::new(0.0, -5.0, -1.0);

    let speed_at_impact = (p.velocity.y - config.gravity).abs();
    assert!(p.integrate(&config));
    assert_eq!(p.position.y, config.ground);
    assert!((p.velocity.y.abs() - speed_at_impact).abs() < 1e-5);
    assert!(p.velocity.y > 0.0);
}

#[test]
fn elasticity_scales_rebound() {
    let config = FieldConfig {
        elasticity: 0.5,
        ..FieldConfig::default()
    };
    let viewport = Viewport::new(WIDTH, HEIGHT, &config);
    let mut p = lone_particle(&config, &viewport);
    p.position = Vec3::new(0.0, 0.5, 800.0);
    p.velocity = Vec3::new(0.0, -4.0, 0.0);

    let impact = p.velocity.y - config.gravity;
    p.integrate(&config);
    assert!((p.velocity.y - (-impact * 0.5)).abs() < 1e-5);
}

#[test]
fn crossing_near_clip_respawns_same_step() {
    let config = FieldConfig::default();
    let viewport = Viewport::new(WIDTH, HEIGHT, &config);
    let mut spawner = Spawner::from_seed(3);
    let mut p = Particle::spawn(&config, &viewport, &mut spawner);
    p.position = Vec3::new(0.0, 50.0, config.near_clip + 2.0);
    p.velocity = Vec3::new(0.0, 0.0, -5.0);

    assert_eq!(p.step(&config, &viewport, &mut spawner), StepOutcome::Respawned);
    assert!(p.position.z >= config.spawn_depth_min && p.position.z <= config.spawn_depth_max);
    assert!(p.position.y >= config.ground);
    assert!(p.velocity.z < 0.0);
}

#[test]
fn flying_far_above_the_viewport_respawns() {
    let config = FieldConfig::default();
    let viewport = Viewport::new(WIDTH, HEIGHT, &config);
    let mut spawner = Spawner::from_seed(8);
    let mut p = Particle::spawn(&config, &viewport, &mut spawner);
    p.position = Vec3::new(0.0, HEIGHT * 2.0 + 10.0, 900.0);
    p.velocity = Vec3::new(0.0, 20.0, -1.0);

    assert_eq!(p.step(&config, &viewport, &mut spawner), StepOutcome::Respawned);
    assert!(p.position.y <= config.ground + config.spawn_height);
}

#[test]
fn spawned_particles_respect_ranges() {
    let field = field_with(500, 21);
    let c = field.config();
    for p in field.particles() {
        assert!(p.position.z >= c.spawn_depth_min && p.position.z <= c.spawn_depth_max);
        assert!(p.position.x.abs() <= WIDTH * 0.5 + 1e-3);
        assert!(p.radius >= c.radius_min && p.radius <= c.radius_max);
        assert!(p.velocity.y >= c.launch_speed_min && p.velocity.y <= c.launch_speed_max);
        assert!(-p.velocity.z >= c.approach_speed_min && -p.velocity.z <= c.approach_speed_max);
    }
}

#[test]
fn population_is_invariant() {
    let mut field = field_with(300, 4);
    let mut respawned = 0;
    for _ in 0..1_500 {
        respawned += field.step().respawned;
        assert_eq!(field.len(), 300);
    }
    assert!(respawned > 0, "particles should cycle through the near plane");
}

#[test]
fn same_seed_same_run() {
    let mut a = field_with(64, 1234);
    let mut b = field_with(64, 1234);
    for _ in 0..200 {
        a.step();
        b.step();
    }
    let pa: Vec<Vec3> = a.particles().iter().map(|p| p.position).collect();
    let pb: Vec<Vec3> = b.particles().iter().map(|p| p.position).collect();
    assert_eq!(pa, pb);
}

// ============================================================================
// Projection and ordering
// ============================================================================

#[test]
fn optical_axis_projects_to_center() {
    let config = FieldConfig::default();
    let viewport = Viewport::new(WIDTH, HEIGHT, &config);
    for z in [50.0, 400.0, 1600.0] {
        let projection = project(Vec3::new(0.0, 30.0, z), 0.0, &viewport);
        assert!(projection.visible);
        assert!((projection.screen.x - viewport.center_x).abs() < 1e-4);
    }
}

#[test]
fn behind_camera_is_not_visible() {
    let config = FieldConfig::default();
    let viewport = Viewport::new(WIDTH, HEIGHT, &config);
    let projection = project(Vec3::new(0.0, 30.0, -1.0), 0.0, &viewport);
    assert!(!projection.visible);
    assert_eq!(projection.scale, 0.0);
}

#[test]
fn depth_sort_is_non_increasing_with_ties() {
    let mut field = field_with(6, 2);
    let depths = [300.0, 900.0, 300.0, 1200.0, 900.0, 50.0];
    for (p, z) in field.particles_mut().iter_mut().zip(depths) {
        p.position = Vec3::new(0.0, 10.0, z);
    }
    field.project_at_angle(0.0);
    field.depth_sort();

    let sorted: Vec<f32> = field.particles().iter().map(|p| p.rotated_depth).collect();
    assert_eq!(sorted, vec![1200.0, 900.0, 900.0, 300.0, 300.0, 50.0]);
}

#[test]
fn depth_sort_holds_across_a_run() {
    let mut field = field_with(300, 77);
    let mut list = DrawList::new();
    for frame in 0..300 {
        list.clear();
        field.frame(frame as f64 / 60.0, &mut list);
        for pair in field.particles().windows(2) {
            assert!(pair[0].rotated_depth >= pair[1].rotated_depth);
        }
    }
}

#[test]
fn frame_draws_fade_then_far_to_near_circles() {
    let mut field = field_with(200, 9);
    let mut list = DrawList::new();
    field.frame(0.5, &mut list);

    assert!(matches!(list.commands()[0], DrawCommand::Rect { .. }));

    let viewport = *field.viewport();
    let margin = field.config().cull_margin;
    let expected: Vec<(f32, f32, f32)> = field
        .particles()
        .iter()
        .filter(|p| {
            p.visible
                && p.scale > 0.0
                && viewport.overlaps_circle(p.screen, p.screen_radius(), margin)
        })
        .map(|p| (p.screen.x, p.screen.y, p.screen_radius()))
        .collect();
    let drawn: Vec<(f32, f32, f32)> = list.commands()[1..]
        .iter()
        .map(|c| match *c {
            DrawCommand::Circle { cx, cy, radius, .. } => (cx, cy, radius),
            other => panic!("expected only circles after the fade, got {other:?}"),
        })
        .collect();

    assert!(!drawn.is_empty());
    assert_eq!(drawn, expected);
    for pair in field.particles().windows(2) {
        assert!(pair[0].rotated_depth >= pair[1].rotated_depth);
    }
}

#[test]
fn resize_moves_center_and_focal_length() {
    let mut field = field_with(10, 5);
    field.resize(800.0, 1000.0);
    let v = field.viewport();
    assert_eq!(v.center_x, 400.0);
    assert_eq!(v.focal_length, 1000.0 * field.config().focal_factor);
    assert_eq!(v.vanishing_y, 1000.0 * field.config().horizon);
}
