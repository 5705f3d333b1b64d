//! 场景图
//!
//! 提供粒子系统所需的 Actor 框架接口：父子所有权、2D 变换组合、
//! 坐标空间转换以及每帧更新。

pub mod actor;
pub mod stage;

pub use actor::{Actor, ActorId, Motion};
pub use stage::{Behavior, Stage};
