//! 粒子生命周期状态
//!
//! 每个粒子 = 一个普通 Actor + 一份 [`ParticleState`]。

use crate::scene::Actor;
use serde::{Deserialize, Serialize};

/// 注册粒子时的参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleSpec {
    /// 激活后的存活时间（秒），必须 > 0
    pub life_span: f32,
    /// 重生次数，0 表示无限重生
    pub lives: u32,
    /// 生成延迟（秒）
    pub spawn_delay: f32,
    /// 透明度变化速度
    pub vo: f32,
    /// 水平缩放变化速度
    pub vsx: f32,
    /// 垂直缩放变化速度
    pub vsy: f32,
}

impl ParticleSpec {
    pub fn new(life_span: f32) -> Self {
        Self {
            life_span,
            lives: 1,
            spawn_delay: 0.0,
            vo: 0.0,
            vsx: 0.0,
            vsy: 0.0,
        }
    }

    pub fn with_lives(mut self, lives: u32) -> Self {
        self.lives = lives;
        self
    }

    /// 无限重生
    pub fn infinite(mut self) -> Self {
        self.lives = 0;
        self
    }

    pub fn with_spawn_delay(mut self, spawn_delay: f32) -> Self {
        self.spawn_delay = spawn_delay;
        self
    }

    pub fn with_fade(mut self, vo: f32) -> Self {
        self.vo = vo;
        self
    }

    pub fn with_growth(mut self, vsx: f32, vsy: f32) -> Self {
        self.vsx = vsx;
        self.vsy = vsy;
        self
    }
}

/// 注册时捕获的原始状态，重生时据此恢复
///
/// `x`/`y` 存储在发射器的局部空间中。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleSnapshot {
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub depth: i32,
    pub opacity: f32,
    pub frame: u32,
    pub vr: f32,
    pub vx: f32,
    pub vy: f32,
    pub vo: f32,
    pub vsx: f32,
    pub vsy: f32,
}

impl ParticleSnapshot {
    /// 从 Actor 当前字段和视觉速度捕获快照
    pub fn capture(actor: &Actor, vo: f32, vsx: f32, vsy: f32) -> Self {
        Self {
            x: actor.x,
            y: actor.y,
            rotation: actor.rotation,
            scale_x: actor.scale_x,
            scale_y: actor.scale_y,
            depth: actor.depth,
            opacity: actor.opacity,
            frame: actor.current_frame,
            vr: actor.motion.vr,
            vx: actor.motion.vx,
            vy: actor.motion.vy,
            vo,
            vsx,
            vsy,
        }
    }

    /// 把快照中除位置以外的字段写回 Actor
    pub fn restore_into(&self, actor: &mut Actor) {
        actor.rotation = self.rotation;
        actor.scale_x = self.scale_x;
        actor.scale_y = self.scale_y;
        actor.depth = self.depth;
        actor.opacity = self.opacity;
        actor.current_frame = self.frame;
        actor.motion.vr = self.vr;
        actor.motion.vx = self.vx;
        actor.motion.vy = self.vy;
    }
}

/// 粒子所处的生命周期阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticlePhase {
    /// 等待生成延迟结束
    Pending,
    /// 活跃
    Active,
}

/// 粒子生命周期状态
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleState {
    /// 自生成以来的秒数，等待延迟期间为负
    pub life_time: f32,
    pub life_span: f32,
    /// 剩余重生次数
    pub lives_remaining: u32,
    /// 注册时的重生次数，0 表示无限；与 `lives_remaining` 分开保存
    pub original_lives: u32,
    pub vo: f32,
    pub vsx: f32,
    pub vsy: f32,
    /// 父节点不是发射器
    pub orphaned: bool,
    pub origin: ParticleSnapshot,
}

impl ParticleState {
    pub fn phase(&self) -> ParticlePhase {
        if self.life_time < 0.0 {
            ParticlePhase::Pending
        } else {
            ParticlePhase::Active
        }
    }

    pub fn is_infinite(&self) -> bool {
        self.original_lives == 0
    }

    pub fn is_expired(&self) -> bool {
        self.life_time >= self.life_span
    }

    /// 消耗一条命并返回是否应当重生
    pub fn consume_life(&mut self) -> bool {
        if self.lives_remaining > 0 {
            self.lives_remaining -= 1;
        }
        self.lives_remaining > 0 || self.original_lives == 0
    }
}

/// 发射器持有的粒子：Actor 句柄 + 生命周期状态
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub id: crate::scene::ActorId,
    pub state: ParticleState,
}
