use particle_engine::config::ParticleConfig;
use particle_engine::core::ParticleError;
use particle_engine::particles::{
    ActorFactory, ActorSource, Emitter, EmitterStatus, GeneratorParams, ParticleSpec, PropertyMap,
};
use particle_engine::scene::{Actor, Stage};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::rc::Rc;

const EPS: f32 = 1e-4;

#[test]
fn test_stage_drives_attached_emitter_to_completion() -> anyhow::Result<()> {
    let mut stage = Stage::new();
    let mut emitter = Emitter::spawn(&mut stage, Actor::new("emitter"), None)?;
    let params = GeneratorParams::new(5, "actor")
        .with_duration(0.5)
        .with_rate(10.0);
    let mut rng = StdRng::seed_from_u64(1);
    let ids = emitter.generate_explosion(&mut stage, &ActorFactory::new(), &params, &mut rng)?;

    let ended = Rc::new(RefCell::new(false));
    let flag = ended.clone();
    emitter.on_particles_end(move || *flag.borrow_mut() = true);

    // 挂载后由场景驱动
    let emitter_id = emitter.attach(&mut stage)?;
    assert!(stage.behavior::<Emitter>(emitter_id).is_some());

    let mut frames = 0;
    while stage.contains(emitter_id) {
        stage.update(0.1)?;
        frames += 1;
        assert!(frames < 100, "emitter never finished");
    }

    assert!(*ended.borrow());
    for id in ids {
        assert!(!stage.contains(id));
    }
    assert!(stage.is_empty());
    Ok(())
}

#[test]
fn test_unmanaged_actor_keeps_moving_next_to_emitter() -> anyhow::Result<()> {
    let mut stage = Stage::new();
    let mut emitter = Emitter::spawn(&mut stage, Actor::new("emitter"), None)?;
    let spark = stage.spawn(Actor::default(), None)?;
    emitter.add_particle(&mut stage, spark, ParticleSpec::new(10.0).with_lives(0))?;
    let emitter_id = emitter.attach(&mut stage)?;

    let ball = stage.spawn(Actor::default().with_velocity(10.0, 0.0), None)?;
    stage.update(0.5)?;

    assert!((stage.get(ball).map(|a| a.x).unwrap_or_default() - 5.0).abs() < EPS);
    let emitter = stage
        .behavior::<Emitter>(emitter_id)
        .ok_or_else(|| anyhow::anyhow!("emitter behaviour missing"))?;
    assert!((emitter.particle_state(spark).map(|s| s.life_time).unwrap_or_default() - 0.5).abs() < EPS);
    Ok(())
}

#[test]
fn test_orphan_particle_respawns_relative_to_moved_emitter() -> anyhow::Result<()> {
    let mut stage = Stage::new();
    let holder = stage.spawn(Actor::new("holder").with_position(100.0, 0.0), None)?;
    let mut emitter = Emitter::spawn(&mut stage, Actor::new("emitter"), None)?;

    let spark = stage.spawn(Actor::default().with_position(10.0, 0.0), Some(holder))?;
    emitter.add_particle(&mut stage, spark, ParticleSpec::new(1.0).infinite())?;

    assert_eq!(stage.parent_of(spark), Some(holder));
    assert!(emitter.particle_state(spark).map(|s| s.orphaned).unwrap_or(false));

    if let Some(actor) = stage.get_mut(emitter.id()) {
        actor.x = 50.0;
    }
    assert_eq!(emitter.update(&mut stage, 1.0)?, EmitterStatus::Running);

    // 世界坐标 (110, 0) 跟随发射器平移到 (160, 0)，即持有者空间中的 (60, 0)
    let actor = stage
        .get(spark)
        .ok_or_else(|| anyhow::anyhow!("particle destroyed"))?;
    assert!((actor.x - 60.0).abs() < EPS);
    assert!(actor.y.abs() < EPS);
    assert_eq!(stage.parent_of(spark), Some(holder));
    Ok(())
}

#[test]
fn test_plume_from_config_with_custom_actor() -> anyhow::Result<()> {
    let config = ParticleConfig::from_toml_str(
        r#"
        [emitter]
        gravity = 0.0

        [generator]
        count = 8
        duration = 2.0
        speed = 40.0
        rate = 4.0
        "#,
    )?;
    config.validate()?;

    let mut factory = ActorFactory::new();
    factory.register("smoke", || Actor::default().with_scale(0.5));

    let mut stage = Stage::new();
    let emitter_id = stage.spawn(Actor::new("chimney").with_position(0.0, 200.0), None)?;
    let mut emitter = Emitter::from_config(emitter_id, &config.emitter);

    let params = GeneratorParams::from_config(&config.generator, "smoke")
        .with_properties(PropertyMap::new().with("y", -10.0).with("opacity", 0.8));
    let mut rng = StdRng::seed_from_u64(3);
    let ids = emitter.generate_plume(&mut stage, &factory, &params, &mut rng)?;

    assert_eq!(ids.len(), 8);
    for id in &ids {
        let actor = stage
            .get(*id)
            .ok_or_else(|| anyhow::anyhow!("missing particle"))?;
        assert_eq!(actor.kind, "smoke");
        assert_eq!(actor.scale_x, 0.5);
        assert!((actor.opacity - 0.8).abs() < EPS);
        assert!((actor.y + 10.0).abs() < EPS);
        assert!(actor.motion.vy <= -20.0 && actor.motion.vy >= -60.0);
        let state = emitter
            .particle_state(*id)
            .ok_or_else(|| anyhow::anyhow!("missing state"))?;
        assert!(state.is_infinite());
    }

    // 烟柱无限重生，发射器一直运行
    for _ in 0..200 {
        assert_eq!(emitter.update(&mut stage, 0.05)?, EmitterStatus::Running);
    }
    assert_eq!(emitter.len(), 8);
    assert!(emitter.stats().total_resets > 0);
    Ok(())
}

#[test]
fn test_rain_spreads_across_width() -> anyhow::Result<()> {
    let mut stage = Stage::new();
    let mut emitter = Emitter::spawn(&mut stage, Actor::new("cloud"), None)?;
    let params = GeneratorParams::new(30, ActorSource::constructor(|| Actor::new("drop")))
        .with_speed(200.0)
        .with_duration(1.5)
        .with_width(100.0);
    let mut rng = StdRng::seed_from_u64(11);
    let ids = emitter.generate_rain(&mut stage, &ActorFactory::new(), &params, &mut rng)?;

    let mut min_x = f32::MAX;
    let mut max_x = f32::MIN;
    for id in &ids {
        let actor = stage
            .get(*id)
            .ok_or_else(|| anyhow::anyhow!("missing drop"))?;
        assert_eq!(actor.kind, "drop");
        assert!((-50.0..=50.0).contains(&actor.x));
        assert!(actor.motion.vy >= 100.0);
        min_x = min_x.min(actor.x);
        max_x = max_x.max(actor.x);
    }
    assert!(max_x > min_x);
    Ok(())
}

#[test]
fn test_rain_width_from_config_file() -> anyhow::Result<()> {
    let path = std::env::temp_dir().join(format!("particles_rain_{}.toml", std::process::id()));
    std::fs::write(
        &path,
        r#"
        [generator]
        count = 40
        speed = 50.0
        width = 40.0

        [logging]
        level = "Debug"
        "#,
    )?;
    let config = ParticleConfig::from_toml_file(&path);
    std::fs::remove_file(&path)?;
    let config = config?;
    config.validate()?;
    assert_eq!(config.generator.width, 40.0);

    let mut stage = Stage::new();
    let mut emitter = Emitter::spawn(&mut stage, Actor::new("cloud"), None)?;
    let params = GeneratorParams::from_config(&config.generator, "actor");
    let mut rng = StdRng::seed_from_u64(5);
    let ids = emitter.generate_rain(&mut stage, &ActorFactory::new(), &params, &mut rng)?;

    assert_eq!(ids.len(), 40);
    for id in ids {
        let actor = stage
            .get(id)
            .ok_or_else(|| anyhow::anyhow!("missing drop"))?;
        assert!((-20.0..=20.0).contains(&actor.x));
    }
    Ok(())
}

#[test]
fn test_unknown_actor_type_is_rejected() {
    let mut stage = Stage::new();
    let mut emitter = Emitter::spawn(&mut stage, Actor::new("emitter"), None).unwrap();
    let params = GeneratorParams::new(3, "ghost");
    let mut rng = StdRng::seed_from_u64(0);

    let result = emitter.generate_explosion(&mut stage, &ActorFactory::new(), &params, &mut rng);
    assert_eq!(result, Err(ParticleError::UnknownActorType("ghost".to_string())));
    assert!(emitter.is_empty());
}

#[test]
fn test_finished_emitter_rejects_new_particles() {
    let mut stage = Stage::new();
    let mut emitter = Emitter::spawn(&mut stage, Actor::new("emitter"), None).unwrap();
    let spark = stage.spawn(Actor::default(), None).unwrap();
    emitter
        .add_particle(&mut stage, spark, ParticleSpec::new(0.5))
        .unwrap();

    assert_eq!(emitter.update(&mut stage, 0.5).unwrap(), EmitterStatus::Finished);
    assert!(!stage.contains(emitter.id()));

    let late = stage.spawn(Actor::default(), None).unwrap();
    assert_eq!(
        emitter.add_particle(&mut stage, late, ParticleSpec::new(1.0)),
        Err(ParticleError::EmitterFinished(emitter.id()))
    );
}
