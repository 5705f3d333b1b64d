//! 通用 2D Actor
//!
//! 场景图中的基本节点：位置、旋转、缩放、透明度、深度、帧索引，
//! 以及由自身负责积分的线速度/角速度（带阻尼）。

use glam::{Affine2, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Actor唯一标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub u64);

impl ActorId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Actor({})", self.0)
    }
}

/// 运动状态
///
/// 由 [`Actor::integrate`] 积分，`damping` 每帧乘到速度上一次。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    /// 水平速度
    pub vx: f32,
    /// 垂直速度（正值向下）
    pub vy: f32,
    /// 角速度（弧度/秒）
    pub vr: f32,
    /// 每帧速度衰减系数（1.0 = 不衰减）
    pub damping: f32,
}

impl Default for Motion {
    fn default() -> Self {
        Self {
            vx: 0.0,
            vy: 0.0,
            vr: 0.0,
            damping: 1.0,
        }
    }
}

/// 场景图中的 Actor
///
/// 坐标均相对于父节点空间。父子关系由 [`Stage`](super::Stage) 维护。
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    /// 类型标签
    pub kind: String,
    pub x: f32,
    pub y: f32,
    /// 旋转（弧度）
    pub rotation: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub opacity: f32,
    pub depth: i32,
    pub current_frame: u32,
    pub active: bool,
    pub visible: bool,
    pub motion: Motion,
    /// 自定义属性
    pub properties: HashMap<String, serde_json::Value>,
}

impl Default for Actor {
    fn default() -> Self {
        Self {
            kind: "actor".to_string(),
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            opacity: 1.0,
            depth: 0,
            current_frame: 0,
            active: true,
            visible: true,
            motion: Motion::default(),
            properties: HashMap::new(),
        }
    }
}

impl Actor {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Default::default()
        }
    }

    /// 设置位置
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// 设置速度
    pub fn with_velocity(mut self, vx: f32, vy: f32) -> Self {
        self.motion.vx = vx;
        self.motion.vy = vy;
        self
    }

    /// 设置统一缩放
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale_x = scale;
        self.scale_y = scale;
        self
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.x = position.x;
        self.y = position.y;
    }

    /// 相对父节点的局部变换
    pub fn local_transform(&self) -> Affine2 {
        Affine2::from_scale_angle_translation(
            Vec2::new(self.scale_x, self.scale_y),
            self.rotation,
            self.position(),
        )
    }

    /// 每帧物理更新：积分位置和旋转，然后施加阻尼
    pub fn integrate(&mut self, dt: f32) {
        self.x += self.motion.vx * dt;
        self.y += self.motion.vy * dt;
        self.rotation += self.motion.vr * dt;

        let damping = self.motion.damping;
        if damping != 1.0 {
            self.motion.vx *= damping;
            self.motion.vy *= damping;
            self.motion.vr *= damping;
        }
    }
}
