//! 粒子生命周期属性测试
//!
//! 使用proptest验证生命周期规律在任意帧间隔下成立

#[cfg(test)]
mod tests {
    use crate::particles::{Emitter, EmitterStatus, ParticleSpec};
    use crate::scene::{Actor, Stage};
    use proptest::prelude::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn delta() -> impl Strategy<Value = f32> {
        0.0f32..0.5
    }

    fn deltas() -> impl Strategy<Value = Vec<f32>> {
        prop::collection::vec(delta(), 1..60)
    }

    fn setup() -> (Stage, Emitter) {
        let mut stage = Stage::new();
        let emitter = Emitter::spawn(&mut stage, Actor::new("emitter"), None).unwrap();
        (stage, emitter)
    }

    proptest! {
        #[test]
        fn opacity_never_negative(
            vo in -1000.0f32..0.0,
            dts in deltas()
        ) {
            let (mut stage, mut emitter) = setup();
            let id = stage.spawn(Actor::default(), None).unwrap();
            emitter
                .add_particle(&mut stage, id, ParticleSpec::new(1000.0).with_fade(vo))
                .unwrap();

            for dt in dts {
                emitter.update(&mut stage, dt).unwrap();
                prop_assert!(stage.get(id).unwrap().opacity >= 0.0);
            }
        }

        #[test]
        fn infinite_particles_survive_expiry(
            life_span in 0.01f32..2.0,
            dts in deltas()
        ) {
            let (mut stage, mut emitter) = setup();
            let id = stage.spawn(Actor::default(), None).unwrap();
            emitter
                .add_particle(&mut stage, id, ParticleSpec::new(life_span).infinite())
                .unwrap();

            for dt in dts {
                prop_assert_eq!(emitter.update(&mut stage, dt).unwrap(), EmitterStatus::Running);
                prop_assert!(stage.contains(id));
                let state = emitter.particle_state(id).unwrap();
                prop_assert!(state.life_time < state.life_span);
            }
        }

        #[test]
        fn finite_lives_respawn_n_minus_one_times(lives in 1u32..6) {
            let (mut stage, mut emitter) = setup();
            let resets = Rc::new(Cell::new(0u32));
            let counter = resets.clone();
            emitter.on_particle_reset(move |_, _, _| counter.set(counter.get() + 1));

            let id = stage.spawn(Actor::default(), None).unwrap();
            emitter
                .add_particle(&mut stage, id, ParticleSpec::new(1.0).with_lives(lives))
                .unwrap();

            let mut status = EmitterStatus::Running;
            let mut frames = 0;
            while status == EmitterStatus::Running {
                status = emitter.update(&mut stage, 0.25).unwrap();
                frames += 1;
                prop_assert!(frames <= 4 * lives + 1);
            }

            prop_assert_eq!(resets.get(), lives - 1);
            prop_assert!(!stage.contains(id));
        }

        #[test]
        fn activation_happens_exactly_once(
            spawn_delay in 0.0f32..2.0,
            dts in deltas()
        ) {
            let (mut stage, mut emitter) = setup();
            let id = stage.spawn(Actor::default(), None).unwrap();
            emitter
                .add_particle(
                    &mut stage,
                    id,
                    ParticleSpec::new(1000.0).with_spawn_delay(spawn_delay),
                )
                .unwrap();

            let mut activations = 0;
            for dt in dts {
                let was_visible = stage.get(id).unwrap().visible;
                emitter.update(&mut stage, dt).unwrap();
                let actor = stage.get_mut(id).unwrap();
                if actor.visible && !was_visible {
                    activations += 1;
                }
                // 激活后立即隐藏，后续帧不应再被打开
                actor.visible = false;
            }

            prop_assert!(activations <= 1);
        }

        #[test]
        fn life_time_tracks_elapsed_time(dts in deltas()) {
            let (mut stage, mut emitter) = setup();
            let id = stage.spawn(Actor::default(), None).unwrap();
            emitter
                .add_particle(&mut stage, id, ParticleSpec::new(1000.0).with_spawn_delay(1.0))
                .unwrap();

            let mut expected = -1.0f32;
            for dt in dts {
                emitter.update(&mut stage, dt).unwrap();
                expected += dt;
                let life_time = emitter.particle_state(id).unwrap().life_time;
                prop_assert!((life_time - expected).abs() < 1e-3);
            }
        }
    }
}
