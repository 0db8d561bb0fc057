//! Headless scenario runner
//!
//! Builds a world of the configured dimension, seeds a lattice of bodies
//! above an immovable floor slab and steps it, tracking energy drift.

use kinetic_math::Vector;
use kinetic_physics::{Angular, Collider, Dimension, SweepAndPrune, World, D2, D3, D4};

use crate::config::{to_vector, AppConfig, ConfigError};

/// Summary of a finished run
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioReport {
    pub dimensions: usize,
    pub steps: usize,
    pub bodies: usize,
    pub initial_energy: f32,
    pub final_energy: f32,
    /// Body-vs-floor contacts over the whole run
    pub floor_hits: usize,
}

impl ScenarioReport {
    /// Energy change relative to the starting energy
    pub fn drift(&self) -> f32 {
        if self.initial_energy.abs() > f32::EPSILON {
            (self.final_energy - self.initial_energy) / self.initial_energy
        } else {
            self.final_energy - self.initial_energy
        }
    }
}

/// Validate `config` and run it in the configured dimension
pub fn run(config: &AppConfig) -> Result<ScenarioReport, ConfigError> {
    config.validate()?;
    let report = match config.world.dimensions {
        2 => run_in::<D2>(config),
        3 => run_in::<D3>(config),
        4 => run_in::<D4>(config),
        dims => {
            return Err(ConfigError::Invalid(format!(
                "unsupported dimension count {}",
                dims
            )))
        }
    };
    Ok(report)
}

/// Run the scenario with the reference collaborators in dimension `D`
pub fn run_in<D: Dimension>(config: &AppConfig) -> ScenarioReport {
    let lower: D::Vector = to_vector(&config.world.lower);
    let upper: D::Vector = to_vector(&config.world.upper);
    let gravity: D::Vector = to_vector(&config.physics.gravity);
    let sim = &config.simulation;

    let mut world: World<D> = World::with_config(SweepAndPrune::new(lower, upper), gravity, config.to_physics_config());
    world.reserve(sim.body_count);

    let floor = floor_slab::<D>(lower, upper, sim.body_radius);
    let floor_top = floor.center().get(1) + sim.body_radius;
    spawn_lattice(&mut world, config, lower, upper, floor_top);

    let initial_energy = world.get_total_energy();
    log::info!(
        "Running {}D scenario: {} bodies, {} steps of {}s ({} broad phase)",
        D::Vector::DIM,
        world.len(),
        sim.steps,
        sim.timestep,
        if sim.sorted { "sorted" } else { "unsorted" }
    );

    let mut floor_hits = 0;
    for step in 1..=sim.steps {
        if sim.sorted {
            world.solve(sim.timestep, config.physics.damping);
        } else {
            world.solve_no_sort(sim.timestep, config.physics.damping);
        }

        for index in 0..world.len() {
            if world.collide_static(index, &floor) {
                floor_hits += 1;
            }
        }

        let report_every = config.debug.report_every;
        if report_every > 0 && step % report_every == 0 {
            log::info!("step {}: total energy {:.4}", step, world.get_total_energy());
        }
    }

    let report = ScenarioReport {
        dimensions: D::Vector::DIM,
        steps: sim.steps,
        bodies: world.len(),
        initial_energy,
        final_energy: world.get_total_energy(),
        floor_hits,
    };
    log::info!(
        "Finished: energy {:.4} -> {:.4} (drift {:.3}%), {} floor contacts",
        report.initial_energy,
        report.final_energy,
        report.drift() * 100.0,
        report.floor_hits
    );
    report
}

/// A slab one body-diameter thick across the bottom of the world
fn floor_slab<D: Dimension>(lower: D::Vector, upper: D::Vector, radius: f32) -> Collider<D::Vector> {
    let mut center = (lower + upper) * 0.5;
    let mut half = (upper - lower) * 0.5;
    center.set(1, lower.get(1) + radius);
    half.set(1, radius);
    Collider::aabb(center, half)
}

/// Lattice coordinate of body `index` on a grid `per_axis` wide
fn lattice_cell(index: usize, per_axis: usize, dims: usize) -> Vec<usize> {
    let mut rest = index;
    (0..dims)
        .map(|_| {
            let digit = rest % per_axis;
            rest /= per_axis;
            digit
        })
        .collect()
}

/// Smallest grid width that fits `count` bodies in `dims` axes
fn lattice_width(count: usize, dims: usize) -> usize {
    let mut width: usize = 1;
    while width.pow(dims as u32) < count {
        width += 1;
    }
    width
}

/// Seed the lattice: every third body is a spinning box, the rest spheres,
/// with velocities alternating in sign
fn spawn_lattice<D: Dimension>(
    world: &mut World<D>,
    config: &AppConfig,
    lower: D::Vector,
    upper: D::Vector,
    floor_top: f32,
) {
    let sim = &config.simulation;
    let dims = D::Vector::DIM;
    let width = lattice_width(sim.body_count, dims);
    let spacing = sim.body_radius * 3.0;
    let center = (lower + upper) * 0.5;
    let offset = (width as f32 - 1.0) * 0.5;

    for index in 0..sim.body_count {
        let cell = lattice_cell(index, width, dims);
        let mut position = D::Vector::from_fn(|axis| center.get(axis) + (cell[axis] as f32 - offset) * spacing);
        // Keep the whole lattice above the floor
        let lowest = center.get(1) - offset * spacing;
        if lowest - sim.body_radius < floor_top {
            position.set(1, position.get(1) + floor_top - lowest + sim.body_radius);
        }

        let sign = if index % 2 == 0 { 1.0 } else { -1.0 };
        let velocity = D::Vector::from_fn(|axis| sign * sim.seed_speed / (axis + 1) as f32);

        let shape = if index % 3 == 2 {
            Collider::aabb(position, D::Vector::splat(sim.body_radius))
        } else {
            Collider::sphere(position, sim.body_radius)
        };
        let slot = world.add_body(shape, sim.body_mass, index as u64);
        if let Some(body) = world.get_body_mut(slot) {
            body.set_linear_velocity(velocity);
            if index % 3 == 2 {
                body.set_angular_velocity(<Angular<D> as Vector>::splat(sign));
            }
        }
    }
}
