//! 预置发射模式：爆炸、烟柱、雨
//!
//! 三者共用同一套流程：创建 Actor → 合并属性 → 随机速度 →
//! `vo = -1/duration`（透明度在寿命结束时恰好降到 0）→
//! 以 `index / (count * rate)` 的错开延迟注册。
//!
//! | 模式 | vx | vy | 重生 | 位置 |
//! |---|---|---|---|---|
//! | 爆炸 | ±speed/2 | ±speed/2 | 1 条命 | 发射器原点 |
//! | 烟柱 | ±speed/2 | -speed ± speed/2 | 无限 | 发射器原点 |
//! | 雨 | 不变 | +speed ± speed/2 | 无限 | x ∈ ±width/2 |

use crate::config::GeneratorDefaults;
use crate::core::error::{ParticleError, ParticleResult};
use crate::particles::emitter::Emitter;
use crate::particles::factory::{ActorFactory, ActorSource, PropertyMap};
use crate::particles::state::ParticleSpec;
use crate::scene::{ActorId, Stage};
use glam::Vec2;
use rand::Rng;

/// 发射模式
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pattern {
    /// 径向爆炸，不重生
    Explosion,
    /// 向上的烟柱，无限重生
    Plume,
    /// 沿 x 方向铺开的下落雨滴，无限重生
    Rain { width: f32 },
}

impl Pattern {
    fn lives(&self) -> u32 {
        match self {
            Self::Explosion => 1,
            Self::Plume | Self::Rain { .. } => 0,
        }
    }
}

/// 生成器参数
#[derive(Debug, Clone)]
pub struct GeneratorParams {
    /// 粒子数量
    pub count: u32,
    /// 粒子 Actor 来源
    pub actor: ActorSource,
    /// 寿命（秒）
    pub duration: f32,
    pub speed: f32,
    pub spin_speed: f32,
    /// 发射速率，1.0 表示在 1 秒内发射完所有粒子
    pub rate: f32,
    pub damping: f32,
    /// 雨幕宽度，雨滴的 x 落在 ±width/2 内
    pub width: f32,
    /// 合并到每个粒子上的属性
    pub properties: PropertyMap,
    /// 粒子所在的父节点；`None` 时挂在发射器下
    pub parent: Option<ActorId>,
}

impl GeneratorParams {
    pub fn new(count: u32, actor: impl Into<ActorSource>) -> Self {
        Self::from_config(&GeneratorDefaults::default(), actor).with_count(count)
    }

    pub fn from_config(defaults: &GeneratorDefaults, actor: impl Into<ActorSource>) -> Self {
        Self {
            count: defaults.count,
            actor: actor.into(),
            duration: defaults.duration,
            speed: defaults.speed,
            spin_speed: defaults.spin_speed,
            rate: defaults.rate,
            damping: defaults.damping,
            width: defaults.width,
            properties: PropertyMap::new(),
            parent: None,
        }
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_spin_speed(mut self, spin_speed: f32) -> Self {
        self.spin_speed = spin_speed;
        self
    }

    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = rate;
        self
    }

    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    pub fn with_properties(mut self, properties: PropertyMap) -> Self {
        self.properties = properties;
        self
    }

    /// 把粒子放到另一个节点下（孤儿粒子），它们不会随发射器移动
    pub fn with_parent(mut self, parent: ActorId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// 第 `index` 个粒子的生成延迟
    pub fn spawn_delay(&self, index: u32) -> f32 {
        index as f32 / (self.count as f32 * self.rate)
    }

    pub fn validate(&self) -> ParticleResult<()> {
        if self.count == 0 {
            return Err(invalid("count must be > 0"));
        }
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(invalid("duration must be finite and > 0"));
        }
        if !(self.rate.is_finite() && self.rate > 0.0) {
            return Err(invalid("rate must be finite and > 0"));
        }
        for (name, value) in [
            ("speed", self.speed),
            ("spin_speed", self.spin_speed),
            ("damping", self.damping),
            ("width", self.width),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(&format!("{} must be finite and >= 0", name)));
            }
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> ParticleError {
    ParticleError::InvalidGeneratorParams(reason.to_string())
}

/// 在 `[-half, half]` 中均匀取值
fn spread<R: Rng>(rng: &mut R, half: f32) -> f32 {
    rng.gen_range(-half..=half)
}

impl Emitter {
    /// 径向爆炸：速度在 ±speed/2 的方形内随机，每个粒子只活一次
    pub fn generate_explosion<R: Rng>(
        &mut self,
        stage: &mut Stage,
        factory: &ActorFactory,
        params: &GeneratorParams,
        rng: &mut R,
    ) -> ParticleResult<Vec<ActorId>> {
        self.generate(stage, factory, params, Pattern::Explosion, rng)
    }

    /// 向上的烟柱：vy 偏向 -speed，无限重生
    pub fn generate_plume<R: Rng>(
        &mut self,
        stage: &mut Stage,
        factory: &ActorFactory,
        params: &GeneratorParams,
        rng: &mut R,
    ) -> ParticleResult<Vec<ActorId>> {
        self.generate(stage, factory, params, Pattern::Plume, rng)
    }

    /// 下落的雨：x 在 ±params.width/2 内随机，vy 偏向 +speed，无限重生
    pub fn generate_rain<R: Rng>(
        &mut self,
        stage: &mut Stage,
        factory: &ActorFactory,
        params: &GeneratorParams,
        rng: &mut R,
    ) -> ParticleResult<Vec<ActorId>> {
        let pattern = Pattern::Rain {
            width: params.width,
        };
        self.generate(stage, factory, params, pattern, rng)
    }

    /// 按模式批量创建并注册粒子
    ///
    /// 属性中的 `x`/`y` 视为相对发射器原点的偏移。
    pub fn generate<R: Rng>(
        &mut self,
        stage: &mut Stage,
        factory: &ActorFactory,
        params: &GeneratorParams,
        pattern: Pattern,
        rng: &mut R,
    ) -> ParticleResult<Vec<ActorId>> {
        params.validate()?;
        if let Pattern::Rain { width } = pattern {
            if !(width.is_finite() && width >= 0.0) {
                return Err(invalid("width must be finite and >= 0"));
            }
        }
        if !stage.contains(self.id()) {
            return Err(ParticleError::ActorNotFound(self.id()));
        }
        let space = params.parent.unwrap_or(self.id());
        if !stage.contains(space) {
            return Err(ParticleError::ActorNotFound(space));
        }

        // 孤儿粒子的坐标换算依赖最新的变换
        stage.refresh_transforms();

        let half = params.speed / 2.0;
        let half_spin = params.spin_speed / 2.0;
        let mut ids = Vec::with_capacity(params.count as usize);

        for index in 0..params.count {
            let mut actor = factory.create(&params.actor)?;
            let mut spec = ParticleSpec::new(params.duration)
                .with_lives(pattern.lives())
                .with_spawn_delay(params.spawn_delay(index));
            params.properties.apply(&mut actor, &mut spec)?;

            match pattern {
                Pattern::Explosion => {
                    actor.motion.vx = spread(rng, half);
                    actor.motion.vy = spread(rng, half);
                }
                Pattern::Plume => {
                    actor.motion.vx = spread(rng, half);
                    actor.motion.vy = -params.speed + spread(rng, half);
                }
                Pattern::Rain { width } => {
                    actor.x += spread(rng, width / 2.0);
                    actor.motion.vy = params.speed + spread(rng, half);
                }
            }
            actor.motion.vr = spread(rng, half_spin);
            actor.motion.damping = params.damping;
            spec.vo = -1.0 / params.duration;

            let local = actor.position();
            actor.set_position(stage.transform_point(local, Some(self.id()), Some(space)));

            let id = stage.spawn(actor, Some(space))?;
            ids.push(self.add_particle(stage, id, spec)?);
        }

        tracing::debug!(
            target: "particles",
            "{} generated {} particles ({:?})",
            self.id(),
            ids.len(),
            pattern
        );

        Ok(ids)
    }
}
