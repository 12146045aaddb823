//! Property tests for the background simulation: icons never leave the
//! canvas, no body outruns the speed cap, and nothing turns into NaN.

use proptest::prelude::*;
use studyhub::core::physics::{Icon, Particle, PhysicsParams, Vec2, World};

prop_compose! {
    fn arbitrary_vec(bound: f64)
        (x in -bound..bound, y in -bound..bound)
        -> Vec2
    {
        Vec2::new(x, y)
    }
}

prop_compose! {
    fn arbitrary_icon()
        (pos in arbitrary_vec(3000.0), vel in arbitrary_vec(500.0), spin in -10.0f64..10.0)
        -> Icon
    {
        let mut icon = Icon::new(pos, vel, 48.0);
        icon.spin = spin;
        icon
    }
}

prop_compose! {
    fn arbitrary_particle(width: f64, height: f64)
        (x in 0.0..=width, y in 0.0..=height, vel in arbitrary_vec(50.0), radius in 1.0f64..3.0)
        -> Particle
    {
        Particle::new(Vec2::new(x, y), vel, radius)
    }
}

fn world_with(
    width: f64,
    height: f64,
    icons: Vec<Icon>,
    particles: Vec<Particle>,
) -> World {
    let mut world = World::new(width, height, PhysicsParams::default()).unwrap();
    for icon in icons {
        world.add_icon(icon);
    }
    for particle in particles {
        world.add_particle(particle);
    }
    world
}

fn assert_invariants(world: &World) -> Result<(), TestCaseError> {
    let cap = world.params().max_speed;
    prop_assert!(world.icons_contained(), "icon outside {:?}: {:?}", world.icon_bounds(), world.icons());
    prop_assert!(world.max_body_speed() <= cap + 1e-9, "speed {} over cap {}", world.max_body_speed(), cap);
    for icon in world.icons() {
        prop_assert!(icon.pos.is_finite() && icon.vel.is_finite());
        prop_assert!((0.0..=360.0).contains(&icon.rotation));
    }
    for particle in world.particles() {
        prop_assert!(particle.pos.is_finite() && particle.vel.is_finite());
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_icons_stay_contained_and_capped(
        (width, height) in (0.0f64..1200.0, 0.0f64..900.0),
        icons in prop::collection::vec(arbitrary_icon(), 0..10),
        particles in prop::collection::vec(arbitrary_particle(300.0, 300.0), 0..25),
        pointer in prop::option::of(arbitrary_vec(1500.0)),
        steps in 1usize..60
    ) {
        let mut world = world_with(width, height, icons, particles);
        for _ in 0..steps {
            world.step(pointer);
            assert_invariants(&world)?;
        }
    }

    #[test]
    fn prop_coincident_icons_never_produce_nan(
        pos in arbitrary_vec(400.0),
        count in 2usize..6,
        steps in 1usize..20
    ) {
        let icons = (0..count).map(|_| Icon::new(pos, Vec2::ZERO, 48.0)).collect();
        let mut world = world_with(500.0, 500.0, icons, Vec::new());
        for _ in 0..steps {
            world.step(Some(pos));
            assert_invariants(&world)?;
        }
    }

    #[test]
    fn prop_resize_keeps_bodies_inside(
        icons in prop::collection::vec(arbitrary_icon(), 1..8),
        particles in prop::collection::vec(arbitrary_particle(800.0, 600.0), 0..20),
        (new_width, new_height) in (-50.0f64..600.0, -50.0f64..600.0),
        steps in 0usize..20
    ) {
        let mut world = world_with(800.0, 600.0, icons, particles);
        world.resize(new_width, new_height);
        prop_assert!(world.icons_contained());
        let (width, height) = world.size();
        prop_assert!(width >= 0.0 && height >= 0.0);
        for particle in world.particles() {
            prop_assert!((0.0..=width.max(0.0)).contains(&particle.pos.x));
            prop_assert!((0.0..=height.max(0.0)).contains(&particle.pos.y));
        }
        for _ in 0..steps {
            world.step(None);
            assert_invariants(&world)?;
        }
    }

    #[test]
    fn prop_populate_respects_bounds(
        (width, height) in (0.0f64..1000.0, 0.0f64..1000.0),
        icons in 0usize..15,
        particles in 0usize..50,
        seed in any::<u64>()
    ) {
        use rand::{rngs::StdRng, SeedableRng};
        let mut world = World::new(width, height, PhysicsParams::default()).unwrap();
        world.populate(icons, particles, &mut StdRng::seed_from_u64(seed));
        prop_assert_eq!(world.icons().len(), icons);
        prop_assert_eq!(world.particles().len(), particles);
        assert_invariants(&world)?;
    }
}

#[test]
fn nan_canvas_size_is_treated_as_empty() {
    let mut world = World::new(f64::NAN, f64::INFINITY, PhysicsParams::default()).unwrap();
    world.add_icon(Icon::new(Vec2::new(10.0, 10.0), Vec2::new(1.0, 1.0), 48.0));
    world.step(None);
    assert_eq!(world.size(), (0.0, 0.0));
    assert_eq!(world.icons()[0].pos, Vec2::ZERO);
}
