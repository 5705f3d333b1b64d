//! # Particle Engine
//!
//! Actor-based 2D particle emitters built on a small scene graph.
//!
//! ## Features
//!
//! - **Scene Graph**: Parent/child actors with cached 2D transforms and per-frame behaviours
//! - **Particle Lifecycle**: Spawn delays, activation, finite or infinite respawn, snapshot reset
//! - **Emitters**: Self-terminating containers with optional lifecycle callbacks
//! - **Generators**: Explosion, plume and rain patterns with staggered emission
//! - **Configuration**: TOML/JSON configuration with environment overrides
//!
//! ### Example
//!
//! ```rust
//! use particle_engine::particles::{Emitter, ParticleSpec};
//! use particle_engine::scene::{Actor, Stage};
//!
//! let mut stage = Stage::new();
//! let mut emitter = Emitter::spawn(&mut stage, Actor::new("emitter"), None)?;
//!
//! let spark = stage.spawn(Actor::default().with_velocity(10.0, -5.0), None)?;
//! emitter.add_particle(&mut stage, spark, ParticleSpec::new(2.0).infinite())?;
//!
//! emitter.update(&mut stage, 0.016)?;
//! # Ok::<(), particle_engine::core::ParticleError>(())
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Errors, logging and macros
//! - [`config`]: Configuration system
//! - [`scene`]: Actors and the stage they live on
//! - [`particles`]: Emitters, particle state and generators

/// Errors, logging initialisation and helper macros
pub mod core;
/// Configuration system
pub mod config;
/// Scene graph of actors
pub mod scene;
/// Particle emitters and generators
pub mod particles;
