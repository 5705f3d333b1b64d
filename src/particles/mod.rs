//! 粒子系统模块
//!
//! 发射器是场景中的容器 Actor，管理一组带生命周期的子 Actor（粒子）。
//!
//! ## 架构设计
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                        Emitter                          │
//! ├─────────────────────────────────────────────────────────┤
//! │  1. Registration (add_particle)                         │
//! │     - 挂到发射器下（或保持孤儿）                         │
//! │     - 捕获快照、设置生成延迟                             │
//! │                                                         │
//! │  2. Update (每帧，逆序遍历)                              │
//! │     - 激活、缩放/透明度/重力积分、Actor 物理更新          │
//! │     - 过期：重生或销毁                                   │
//! │                                                         │
//! │  3. Completion                                          │
//! │     - 粒子集合为空时回调并销毁发射器                      │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 使用示例
//!
//! ```rust
//! use particle_engine::particles::{ActorFactory, Emitter, GeneratorParams};
//! use particle_engine::scene::{Actor, Stage};
//! use rand::SeedableRng;
//!
//! let mut stage = Stage::new();
//! let mut emitter = Emitter::spawn(&mut stage, Actor::new("emitter"), None)?.with_gravity(98.0);
//!
//! let params = GeneratorParams::new(10, "actor").with_duration(2.0).with_speed(100.0);
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//! emitter.generate_explosion(&mut stage, &ActorFactory::new(), &params, &mut rng)?;
//!
//! emitter.update(&mut stage, 1.0 / 60.0)?;
//! # Ok::<(), particle_engine::core::ParticleError>(())
//! ```

pub mod emitter;
pub mod factory;
pub mod generators;
pub mod hooks;
pub mod state;

#[cfg(test)]
mod property_tests;

pub use emitter::{Emitter, EmitterStats, EmitterStatus};
pub use factory::{ActorConstructor, ActorFactory, ActorSource, PropertyMap};
pub use generators::{GeneratorParams, Pattern};
pub use hooks::{EmitterHooks, ParticleHook, ParticleLostHook, ParticlesEndHook};
pub use state::{Particle, ParticlePhase, ParticleSnapshot, ParticleSpec, ParticleState};
