//! Integration tests for the physics engine
//!
//! Drives whole worlds through `solve` in every dimension and checks the
//! conservation, collision and lifecycle behaviour end to end.

use std::cell::RefCell;
use std::rc::Rc;

use kinetic_math::{Vec2, Vec3, Vec4, Vector};
use kinetic_physics::{Body, Collider, Dimension, Shape, SweepAndPrune, World, D2, D3, D4};

const EPSILON: f32 = 0.01;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn empty_world<D: Dimension>(extent: f32) -> World<D> {
    let lower = D::Vector::splat(-extent);
    let upper = D::Vector::splat(extent);
    World::new(SweepAndPrune::new(lower, upper), D::Vector::ZERO)
}

/// Point on the first axis
fn on_axis<D: Dimension>(x: f32) -> D::Vector {
    D::Vector::unit(0) * x
}

/// Unit spheres A at 0 moving +x at 2 and B at rest at 3
fn head_on_world<D: Dimension>() -> (World<D>, usize, usize) {
    let mut world = empty_world::<D>(10.0);
    let a = world.add_body(Collider::sphere(on_axis::<D>(0.0), 0.5), 1.0, 1);
    let b = world.add_body(Collider::sphere(on_axis::<D>(3.0), 0.5), 1.0, 2);
    world.get_body_mut(a).unwrap().set_linear_velocity(on_axis::<D>(2.0));
    (world, a, b)
}

fn run_head_on<D: Dimension>(sorted: bool) {
    let (mut world, a, b) = head_on_world::<D>();
    let before = world.get_total_energy();
    assert!(approx_eq(before, 2.0));

    for _ in 0..150 {
        if sorted {
            world.solve(0.01, 0.0);
        } else {
            world.solve_no_sort(0.01, 0.0);
        }
    }

    let va = world.get_body(a).unwrap().linear_velocity();
    let vb = world.get_body(b).unwrap().linear_velocity();
    assert!(va.length() < EPSILON, "A should stop, got {:?}", va);
    assert!(approx_eq(vb.get(0), 2.0), "B should take A's speed, got {:?}", vb);
    assert!(approx_eq(world.get_total_energy(), before));

    let pa = world.get_body(a).unwrap().position().get(0);
    let pb = world.get_body(b).unwrap().position().get(0);
    assert!(pb - pa >= 1.0, "spheres must end separated");
}

#[test]
fn test_head_on_transfer_2d() {
    run_head_on::<D2>(true);
    run_head_on::<D2>(false);
}

#[test]
fn test_head_on_transfer_3d() {
    run_head_on::<D3>(true);
    run_head_on::<D3>(false);
}

#[test]
fn test_head_on_transfer_4d() {
    run_head_on::<D4>(true);
    run_head_on::<D4>(false);
}

#[test]
fn test_kinetic_energy_conserved_without_collisions() {
    let mut world = empty_world::<D3>(100.0);
    let velocities = [
        Vec3::new(1.0, -2.0, 0.5),
        Vec3::new(-3.0, 0.0, 1.0),
        Vec3::new(0.25, 4.0, -1.5),
    ];
    for (i, v) in velocities.iter().enumerate() {
        let k = world.add_body(Collider::sphere(Vec3::new(i as f32 * 20.0 - 20.0, 0.0, 0.0), 0.5), 1.0 + i as f32, 0);
        world.get_body_mut(k).unwrap().set_linear_velocity(*v);
    }

    let before = world.get_total_energy();
    for _ in 0..50 {
        world.solve(0.016, 0.0);
    }
    let after = world.get_total_energy();

    assert!((before - after).abs() < 1e-3);
}

#[test]
fn test_ball_rests_against_immovable_block() {
    let mut world: World<D2> = World::new(
        SweepAndPrune::new(Vec2::splat(-10.0), Vec2::splat(10.0)),
        Vec2::new(0.0, -10.0),
    );
    let floor = world.add_body(Collider::aabb(Vec2::new(0.0, -2.0), Vec2::new(5.0, 1.0)), 0.0, 0);
    let ball = world.add_body(Collider::sphere(Vec2::new(0.0, 2.0), 0.5), 1.0, 0);
    world.set_elasticity(0.0);

    for _ in 0..200 {
        world.solve(0.01, 0.0);
    }

    let floor_body = world.get_body(floor).unwrap();
    assert_eq!(floor_body.position(), Vec2::new(0.0, -2.0));
    assert_eq!(floor_body.linear_velocity(), Vec2::ZERO);

    // Resting on the top face at y = -1
    let y = world.get_body(ball).unwrap().position().y;
    assert!(y > -0.6 && y < -0.4, "ball should rest on the block, y = {}", y);
}

#[test]
fn test_sorted_and_unsorted_agree() {
    fn build() -> World<D2> {
        let mut world = empty_world::<D2>(20.0);
        for i in 0..6 {
            let x = (5 - i) as f32 * 1.5;
            let k = world.add_body(Collider::sphere(Vec2::new(x, 0.0), 0.5), 1.0, i);
            let vx = if i % 2 == 0 { 1.0 } else { -1.0 };
            world.get_body_mut(k).unwrap().set_linear_velocity(Vec2::new(vx, 0.0));
        }
        world
    }

    let mut sorted = build();
    let mut unsorted = build();
    for _ in 0..60 {
        sorted.solve(0.01, 0.0);
        unsorted.solve_no_sort(0.01, 0.0);
    }

    assert!(approx_eq(sorted.get_total_energy(), unsorted.get_total_energy()));
    for (a, b) in sorted.get_bodies().iter().zip(unsorted.get_bodies()) {
        assert_eq!(a.tag(), b.tag());
        assert!(approx_eq(a.position().x, b.position().x));
    }
}

#[test]
fn test_callbacks_fire_during_solve() {
    let (mut world, a, b) = head_on_world::<D3>();
    let hits = Rc::new(RefCell::new(Vec::new()));

    for index in [a, b] {
        let hits = Rc::clone(&hits);
        world
            .register_callback(index, move |me: &mut Body<D3>, peer: &mut Body<D3>| {
                hits.borrow_mut().push((me.tag(), peer.tag()));
            })
            .unwrap();
    }

    for _ in 0..150 {
        world.solve(0.01, 0.0);
    }

    assert_eq!(*hits.borrow(), vec![(1, 2), (2, 1)]);
}

#[test]
fn test_dead_bodies_do_not_collide() {
    let (mut world, a, b) = head_on_world::<D4>();
    world.clear_body(b);

    for _ in 0..150 {
        world.solve(0.01, 0.0);
    }

    let va = world.get_body(a).unwrap().linear_velocity();
    assert!(approx_eq(va.x, 2.0));
    assert_eq!(world.get_body(b).unwrap().position(), Vec4::new(3.0, 0.0, 0.0, 0.0));
}

#[test]
fn test_collision_along_fourth_axis() {
    let mut world = empty_world::<D4>(10.0);
    let a = world.add_body(Collider::sphere(Vec4::ZERO, 0.5), 1.0, 0);
    let b = world.add_body(Collider::sphere(Vec4::new(0.0, 0.0, 0.0, 0.9), 0.5), 1.0, 0);
    world.get_body_mut(a).unwrap().set_linear_velocity(Vec4::new(0.0, 0.0, 0.0, 1.0));
    world.get_body_mut(b).unwrap().set_linear_velocity(Vec4::new(0.0, 0.0, 0.0, -1.0));

    world.solve(0.001, 0.0);

    assert!(approx_eq(world.get_body(a).unwrap().linear_velocity().w, -1.0));
    assert!(approx_eq(world.get_body(b).unwrap().linear_velocity().w, 1.0));
}

#[test]
fn test_lifecycle_round_trip() {
    let mut world = empty_world::<D3>(10.0);
    let indices: Vec<usize> = (0..5)
        .map(|i| world.add_body(Collider::sphere(Vec3::new(i as f32 * 2.0 - 4.0, 0.0, 0.0), 0.5), 1.0, i))
        .collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4]);

    world.clear_body(1);
    world.clear_body(4);
    world.clear_body(4);
    assert_eq!(world.free_slots().len(), 2);

    world.prune_after(3);
    assert_eq!(world.get_bodies().len(), 3);
    assert_eq!(world.free_slots(), &[1]);
    assert!(world.get_bodies().iter().enumerate().all(|(i, body)| body.is_dead() == (i == 1)));

    let k = world.add_body(Collider::sphere(Vec3::new(0.0, 5.0, 0.0), 0.5), 2.0, 99);
    assert_eq!(k, 1);
    assert!(world.is_clean());
    assert_eq!(Shape::<D3>::position(world.get_shape(k).unwrap()), Vec3::new(0.0, 5.0, 0.0));

    world.solve(0.01, 0.0);
    assert_eq!(world.len(), 3);
}

#[test]
fn test_boundary_reflection_in_every_axis() {
    let mut world = empty_world::<D4>(1.0);
    let k = world.add_body(Collider::sphere(Vec4::new(0.95, -0.95, 0.0, 0.95), 0.1), 1.0, 0);
    world
        .get_body_mut(k)
        .unwrap()
        .set_linear_velocity(Vec4::new(1.0, -1.0, 0.5, 1.0));

    world.solve(0.1, 0.0);

    let body = world.get_body(k).unwrap();
    assert_eq!(body.position(), Vec4::new(1.0, -1.0, 0.05, 1.0));
    assert_eq!(body.linear_velocity(), Vec4::new(-1.0, 1.0, 0.5, -1.0));
}
