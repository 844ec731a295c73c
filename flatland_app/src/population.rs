// Population of shaped agents driven by the collision demo.
// Agents drift and spin across a toroidal world; a few are "indoors" each
// tick and must not collide with anyone.

use flatland_engine::core::config::WorldConfig;
use flatland_engine::foundation::math::{constants::TAU, wrap, Transform2, Vec2};
use flatland_engine::physics::collision::ShapeError;
use flatland_engine::physics::{CollisionBody, EntityId, ShapeDescriptor};
use rand::prelude::*;
use std::collections::BTreeSet;

/// Shape families found in Flatland, from the lowliest to the most regular
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caste {
    Woman,
    Soldier,
    Merchant,
    Gentleman,
    Noble,
    Priest,
}

impl Caste {
    const ALL: [Caste; 6] = [
        Caste::Woman,
        Caste::Soldier,
        Caste::Merchant,
        Caste::Gentleman,
        Caste::Noble,
        Caste::Priest,
    ];

    fn shape(self, size: f64) -> Result<ShapeDescriptor, ShapeError> {
        match self {
            Caste::Woman => ShapeDescriptor::segment(size * 2.0),
            Caste::Soldier => ShapeDescriptor::polygon(vec![
                Vec2::new(size, 0.0),
                Vec2::new(-size * 0.5, size * 0.3),
                Vec2::new(-size * 0.5, -size * 0.3),
            ]),
            Caste::Merchant => ShapeDescriptor::regular_polygon(3, size),
            Caste::Gentleman => ShapeDescriptor::regular_polygon(4, size),
            Caste::Noble => ShapeDescriptor::regular_polygon(5, size),
            Caste::Priest => ShapeDescriptor::circle(size),
        }
    }
}

/// One simulated inhabitant
#[derive(Debug, Clone)]
pub struct Agent {
    pub id: EntityId,
    pub caste: Caste,
    pub shape: ShapeDescriptor,
    pub transform: Transform2,
    pub velocity: Vec2,
    pub spin: f64,
}

impl Agent {
    pub fn body(&self) -> CollisionBody {
        CollisionBody::new(self.id, self.transform, self.shape.clone()).with_velocity(self.velocity)
    }
}

/// All agents plus the indoor set for the current tick
pub struct Population {
    agents: Vec<Agent>,
    indoor: BTreeSet<EntityId>,
    rng: StdRng,
}

impl Population {
    /// Spawn `count` agents cycling through every caste
    pub fn spawn(count: usize, world: &WorldConfig, seed: u64) -> Result<Self, ShapeError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut agents = Vec::with_capacity(count);

        for (index, caste) in Caste::ALL.iter().cycle().take(count).enumerate() {
            let size = rng.gen_range(6.0..14.0);
            let heading: f64 = rng.gen_range(0.0..TAU);
            let speed = rng.gen_range(10.0..40.0);
            agents.push(Agent {
                id: index as EntityId + 1,
                caste: *caste,
                shape: caste.shape(size)?,
                transform: Transform2::new(
                    Vec2::new(rng.gen_range(0.0..world.width), rng.gen_range(0.0..world.height)),
                    heading,
                ),
                velocity: Vec2::new(heading.cos(), heading.sin()) * speed,
                spin: rng.gen_range(-1.0..1.0),
            });
        }

        log::info!("Spawned {} agents", agents.len());
        Ok(Self {
            agents,
            indoor: BTreeSet::new(),
            rng,
        })
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn is_indoor(&self, id: EntityId) -> bool {
        self.indoor.contains(&id)
    }

    pub fn indoor_count(&self) -> usize {
        self.indoor.len()
    }

    /// Advance positions and rotations, wrapping around the world edges
    pub fn integrate(&mut self, dt: f64, world: &WorldConfig) {
        for agent in &mut self.agents {
            let position = agent.transform.position + agent.velocity * dt;
            agent.transform.position = Vec2::new(wrap(position.x, world.width), wrap(position.y, world.height));
            agent.transform.rotation = wrap(agent.transform.rotation + agent.spin * dt, TAU);
        }

        // Agents wander in and out of their houses
        for agent in &self.agents {
            if self.rng.gen_bool(0.05) && !self.indoor.remove(&agent.id) {
                self.indoor.insert(agent.id);
            }
        }
    }

    pub fn bodies(&self) -> Vec<CollisionBody> {
        self.agents.iter().map(Agent::body).collect()
    }
}
