//! 统一错误处理模块
//!
//! 粒子系统本身是纯模拟状态，没有可恢复的运行时错误。
//! 这里的错误全部是调用方违反契约（非法参数、未知的 Actor 类型等），
//! 在注册或生成阶段立即失败，而不是悄悄产生退化的粒子。

use crate::scene::ActorId;
use thiserror::Error;

/// 粒子系统错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParticleError {
    #[error("Invalid life span: {0} (must be finite and > 0)")]
    InvalidLifeSpan(f32),

    #[error("Invalid spawn delay: {0} (must be finite and >= 0)")]
    InvalidSpawnDelay(f32),

    #[error("Invalid frame delta: {0} (must be finite and >= 0)")]
    InvalidDelta(f32),

    #[error("Actor not found: {0}")]
    ActorNotFound(ActorId),

    #[error("Actor {0} is already registered with this emitter")]
    AlreadyRegistered(ActorId),

    #[error("Emitter {0} has finished and no longer accepts particles")]
    EmitterFinished(ActorId),

    #[error("Unknown actor type: {0}")]
    UnknownActorType(String),

    #[error("Invalid property `{key}`: {reason}")]
    InvalidProperty { key: String, reason: String },

    #[error("Invalid generator parameters: {0}")]
    InvalidGeneratorParams(String),

    #[error("Invalid scene operation: {0}")]
    InvalidHierarchy(String),
}

/// 粒子系统结果类型别名
pub type ParticleResult<T> = Result<T, ParticleError>;
