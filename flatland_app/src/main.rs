//! Headless Flatland collision demo
//!
//! Usage: `flatland_app [config-path] [ticks]`
//!
//! Spawns a seeded population of shaped agents, moves them around a
//! wrap-around world and runs the collision pipeline every tick, logging
//! contacts, sharp strikes, a vision sample and a pick.

mod population;

use flatland_engine::foundation::logging;
use flatland_engine::prelude::*;
use population::Population;

const SEED: u64 = 0x5EED_F1A7;
const AGENT_COUNT: usize = 48;
const DEFAULT_TICKS: u32 = 240;
const DT: f64 = 1.0 / 30.0;
const REPORT_EVERY: u32 = 30;

#[derive(thiserror::Error, Debug)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    Collision(#[from] CollisionError),

    #[error("invalid tick count: {0}")]
    Ticks(String),
}

fn load_config(path: Option<&str>) -> Result<FlatlandConfig, ConfigError> {
    match path {
        Some(path) => FlatlandConfig::load_validated(path),
        None => Ok(FlatlandConfig::default()),
    }
}

fn report(tick: u32, frame: &CollisionFrame, population: &Population, config: &FlatlandConfig) {
    let Some(viewer) = population.agents().first() else {
        return;
    };
    let bounds = config.world.bounds();

    let cone = VisionCone::from_config(viewer.transform.position, viewer.transform.rotation, &config.vision);
    let seen = cone.perceive(frame, &bounds, Some(viewer.id));
    match seen.first() {
        Some(nearest) => log::info!(
            "tick {}: agent {} ({:?}) sees {} others, nearest {} at {:.1}",
            tick,
            viewer.id,
            viewer.caste,
            seen.len(),
            nearest.target.raw_id(),
            nearest.distance
        ),
        None => log::info!("tick {}: agent {} sees nobody", tick, viewer.id),
    }

    let view = flatlander_view(
        frame,
        &bounds,
        viewer.transform.position,
        viewer.transform.rotation,
        config.vision.field_of_view,
        16,
        Some(viewer.id),
    );
    let walls = view
        .iter()
        .flatten()
        .filter(|hit| matches!(hit.target, SightTarget::Wall(_)))
        .count();
    log::debug!("tick {}: flatlander view has {} of {} columns on walls", tick, walls, view.len());

    let probe = population.agents()[population.agents().len() / 2].transform.position;
    match pick_entity(frame, probe, 2.0) {
        Some(id) => log::info!("tick {}: pick at ({:.1}, {:.1}) -> {}", tick, probe.x, probe.y, id),
        None => log::info!("tick {}: pick at ({:.1}, {:.1}) -> nothing", tick, probe.x, probe.y),
    }
}

fn run() -> Result<(), AppError> {
    let mut args = std::env::args().skip(1);
    let config_path = args.next();
    let ticks = match args.next() {
        Some(raw) => raw.parse::<u32>().map_err(|_| AppError::Ticks(raw))?,
        None => DEFAULT_TICKS,
    };

    let config = load_config(config_path.as_deref())?;
    logging::init_with_level(&config.log_level);

    log::info!("=== Flatland Collision Demo ===");
    log::info!("World {}x{}, {} ticks, seed {:#x}", config.world.width, config.world.height, ticks, SEED);

    let mut population = Population::spawn(AGENT_COUNT, &config.world, SEED)?;
    let mut pipeline = CollisionPipeline::new(config.collision.clone())?;

    let mut total_contacts = 0usize;
    let mut total_sharp = 0usize;
    for tick in 0..ticks {
        population.integrate(DT, &config.world);
        let bodies = population.bodies();
        let outdoors = |a: EntityId, b: EntityId| !(population.is_indoor(a) || population.is_indoor(b));
        let frame = pipeline.run(&bodies, &outdoors)?;

        let sharp: Vec<&Contact> = frame
            .contacts()
            .iter()
            .filter(|c| c.classification.kind == ContactKind::Vertex)
            .collect();
        total_contacts += frame.contacts().len();
        total_sharp += sharp.len();

        log::debug!(
            "tick {}: {} candidates, {} contacts, {} sharp, {} indoors",
            tick,
            frame.candidate_pairs().len(),
            frame.contacts().len(),
            sharp.len(),
            population.indoor_count()
        );
        for contact in &sharp {
            log::trace!(
                "tick {}: {} -> {} angle {:?} depth {:.2} closing {:.2}",
                tick,
                contact.pair.entity_a,
                contact.pair.entity_b,
                contact.classification.sharpest_angle(),
                contact.manifold.penetration,
                contact.manifold.closing_speed
            );
        }

        if tick % REPORT_EVERY == 0 {
            report(tick, &frame, &population, &config);
        }
    }

    log::info!("Done: {} contacts over {} ticks, {} sharp", total_contacts, ticks, total_sharp);
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("flatland_app: {}", e);
        std::process::exit(1);
    }
}
