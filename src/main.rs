use particle_engine::config::ParticleConfig;
use particle_engine::core::{init_logging, ParticleResult};
use particle_engine::particles::{ActorFactory, Emitter, EmitterStatus, GeneratorParams};
use particle_engine::scene::{Actor, Stage};

const FRAME_TIME: f32 = 1.0 / 60.0;
const MAX_FRAMES: u32 = 60 * 60;

fn run(config: &ParticleConfig) -> ParticleResult<u32> {
    let mut stage = Stage::new();
    let mut emitter = Emitter::spawn(&mut stage, Actor::new("emitter"), None)?
        .with_gravity(config.emitter.gravity);
    emitter.on_particles_end(|| tracing::info!(target: "particles", "All particles finished"));

    let params = GeneratorParams::from_config(&config.generator, "actor");
    let mut rng = rand::thread_rng();
    emitter.generate_explosion(&mut stage, &ActorFactory::new(), &params, &mut rng)?;

    let mut frames = 0;
    while frames < MAX_FRAMES {
        frames += 1;
        if emitter.update(&mut stage, FRAME_TIME)? == EmitterStatus::Finished {
            break;
        }
        if frames % 30 == 0 {
            let stats = emitter.stats();
            tracing::info!(
                target: "particles",
                "frame {}: {} active, {} pending",
                frames,
                stats.active,
                stats.pending
            );
        }
    }
    Ok(frames)
}

fn main() {
    let mut config = ParticleConfig::load_or_default();
    config.apply_env_overrides();
    init_logging(&config.logging);

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    match run(&config) {
        Ok(frames) => tracing::info!(target: "particles", "Simulation ended after {} frames", frames),
        Err(e) => {
            eprintln!("Simulation failed: {}", e);
            std::process::exit(1);
        }
    }
}
