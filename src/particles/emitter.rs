//! 粒子发射器
//!
//! 发射器本身是场景中的一个 Actor，持有一组粒子并在每帧驱动它们的生命周期：
//!
//! ```text
//! add_particle ──► Pending (life_time < 0, 不可见)
//!                    │ life_time 跨过 0
//!                    ▼
//!                  Active ──积分速度/缩放/透明度/重力──┐
//!                    │ life_time >= life_span          │
//!                    ▼                                 │
//!          还有命或无限重生？ ──是──► reset ───────────┘
//!                    │否
//!                    ▼
//!          on_particle_lost 允许？ ──是──► 销毁
//! ```
//!
//! 粒子集合为空时触发 `on_particles_end` 并销毁发射器自身。

use crate::config::EmitterConfig;
use crate::core::error::{ParticleError, ParticleResult};
use crate::particles::hooks::EmitterHooks;
use crate::particles::state::{Particle, ParticlePhase, ParticleSnapshot, ParticleSpec, ParticleState};
use crate::scene::{Actor, ActorId, Behavior, Stage};
use glam::Vec2;
use std::any::Any;

/// 一次更新后的发射器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitterStatus {
    /// 仍有粒子
    Running,
    /// 粒子已全部结束，发射器已从场景中销毁
    Finished,
}

/// 发射器统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EmitterStats {
    /// 当前活跃粒子数
    pub active: u32,
    /// 当前等待生成的粒子数
    pub pending: u32,
    /// 累计注册数
    pub total_added: u64,
    /// 累计重生次数
    pub total_resets: u64,
    /// 累计丢失次数（包括被回调否决销毁的）
    pub total_lost: u64,
    /// 累计销毁数
    pub total_destroyed: u64,
}

/// 粒子发射器
#[derive(Debug)]
pub struct Emitter {
    id: ActorId,
    /// 每帧加到活跃粒子 `vy` 上的加速度
    pub gravity: f32,
    /// 按注册顺序保存，只能逆序遍历（见 [`Emitter::update`]）
    particles: Vec<Particle>,
    pub hooks: EmitterHooks,
    finished: bool,
    stats: EmitterStats,
}

impl Emitter {
    /// 为场景中已有的 Actor 创建发射器
    pub fn new(id: ActorId) -> Self {
        Self {
            id,
            gravity: 0.0,
            particles: Vec::new(),
            hooks: EmitterHooks::default(),
            finished: false,
            stats: EmitterStats::default(),
        }
    }

    /// 在场景中创建发射器 Actor
    pub fn spawn(stage: &mut Stage, actor: Actor, parent: Option<ActorId>) -> ParticleResult<Self> {
        let id = stage.spawn(actor, parent)?;
        Ok(Self::new(id))
    }

    pub fn from_config(id: ActorId, config: &EmitterConfig) -> Self {
        Self::new(id).with_gravity(config.gravity)
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// 把发射器挂载到自己的 Actor 上，由 [`Stage::update`] 驱动
    pub fn attach(self, stage: &mut Stage) -> ParticleResult<ActorId> {
        let id = self.id;
        stage.attach_behavior(id, Box::new(self))?;
        Ok(id)
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particle_state(&self, id: ActorId) -> Option<&ParticleState> {
        self.particles
            .iter()
            .find(|p| p.id == id)
            .map(|p| &p.state)
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn stats(&self) -> EmitterStats {
        self.stats
    }

    pub fn on_particle_added(
        &mut self,
        hook: impl FnMut(ActorId, &mut Actor, &ParticleState) + 'static,
    ) -> &mut Self {
        self.hooks.on_particle_added = Some(Box::new(hook));
        self
    }

    pub fn on_particle_reset(
        &mut self,
        hook: impl FnMut(ActorId, &mut Actor, &ParticleState) + 'static,
    ) -> &mut Self {
        self.hooks.on_particle_reset = Some(Box::new(hook));
        self
    }

    pub fn on_particles_end(&mut self, hook: impl FnMut() + 'static) -> &mut Self {
        self.hooks.on_particles_end = Some(Box::new(hook));
        self
    }

    /// 回调返回 `false` 时粒子保持过期状态而不被销毁
    pub fn on_particle_lost(
        &mut self,
        hook: impl FnMut(ActorId, &mut Actor, &ParticleState) -> bool + 'static,
    ) -> &mut Self {
        self.hooks.on_particle_lost = Some(Box::new(hook));
        self
    }

    /// 注册粒子
    ///
    /// 没有父节点的 Actor 会成为发射器的子节点；已挂在其他节点下的 Actor
    /// 保持原位（孤儿粒子），其快照位置被转换到发射器的局部空间。
    /// 快照取自注册时 Actor 的当前字段。
    pub fn add_particle(
        &mut self,
        stage: &mut Stage,
        actor_id: ActorId,
        spec: ParticleSpec,
    ) -> ParticleResult<ActorId> {
        if self.finished {
            return Err(ParticleError::EmitterFinished(self.id));
        }
        if !(spec.life_span.is_finite() && spec.life_span > 0.0) {
            return Err(ParticleError::InvalidLifeSpan(spec.life_span));
        }
        if !(spec.spawn_delay.is_finite() && spec.spawn_delay >= 0.0) {
            return Err(ParticleError::InvalidSpawnDelay(spec.spawn_delay));
        }
        if !stage.contains(actor_id) {
            return Err(ParticleError::ActorNotFound(actor_id));
        }
        if actor_id == self.id {
            return Err(ParticleError::InvalidHierarchy(format!(
                "{} cannot be a particle of itself",
                actor_id
            )));
        }
        match stage.manager_of(actor_id) {
            Some(manager) if manager == self.id => {
                return Err(ParticleError::AlreadyRegistered(actor_id));
            }
            Some(manager) => {
                return Err(ParticleError::InvalidHierarchy(format!(
                    "{} is already driven by {}",
                    actor_id, manager
                )));
            }
            None => {}
        }

        let parent = match stage.parent_of(actor_id) {
            Some(parent) => parent,
            None => {
                stage.add_child(self.id, actor_id)?;
                self.id
            }
        };
        let orphaned = parent != self.id;
        stage.set_manager(actor_id, Some(self.id))?;
        if orphaned {
            stage.refresh_transforms();
        }

        let life_time = -spec.spawn_delay;
        let local_position = match stage.get(actor_id) {
            Some(actor) if orphaned => {
                stage.transform_point(actor.position(), Some(parent), Some(self.id))
            }
            Some(actor) => actor.position(),
            None => return Err(ParticleError::ActorNotFound(actor_id)),
        };

        let actor = stage
            .get_mut(actor_id)
            .ok_or(ParticleError::ActorNotFound(actor_id))?;
        if life_time < 0.0 {
            actor.active = false;
            actor.visible = false;
        }

        let mut origin = ParticleSnapshot::capture(actor, spec.vo, spec.vsx, spec.vsy);
        origin.x = local_position.x;
        origin.y = local_position.y;

        let state = ParticleState {
            life_time,
            life_span: spec.life_span,
            lives_remaining: spec.lives,
            original_lives: spec.lives,
            vo: spec.vo,
            vsx: spec.vsx,
            vsy: spec.vsy,
            orphaned,
            origin,
        };

        self.hooks.particle_added(actor_id, actor, &state);
        self.particles.push(Particle { id: actor_id, state });
        self.stats.total_added += 1;
        if life_time < 0.0 {
            self.stats.pending += 1;
        } else {
            self.stats.active += 1;
        }

        tracing::debug!(
            target: "particles",
            "{} registered {} (life_span={}, lives={}, delay={}, orphaned={})",
            self.id,
            actor_id,
            spec.life_span,
            spec.lives,
            spec.spawn_delay,
            orphaned
        );

        Ok(actor_id)
    }

    /// 把粒子恢复到注册时的快照
    fn reset_particle(&mut self, stage: &mut Stage, index: usize) {
        let particle = &mut self.particles[index];
        let id = particle.id;
        let state = &mut particle.state;
        let origin = state.origin;

        let local = Vec2::new(origin.x, origin.y);
        let position = if state.orphaned {
            let parent = stage.parent_of(id);
            stage.transform_point(local, Some(self.id), parent)
        } else {
            local
        };

        state.vo = origin.vo;
        state.vsx = origin.vsx;
        state.vsy = origin.vsy;
        state.life_time = 0.0;

        if let Some(actor) = stage.get_mut(id) {
            origin.restore_into(actor);
            actor.set_position(position);
            actor.active = true;
            actor.visible = true;
            self.hooks.particle_reset(id, actor, state);
        }

        self.stats.total_resets += 1;
        tracing::debug!(target: "particles", "{} respawned {}", self.id, id);
    }

    /// 每帧更新
    ///
    /// 粒子按注册顺序的逆序遍历：删除下标 `i` 只会移动已经处理过的元素，
    /// 因此遍历中的就地删除既不会跳过也不会重复访问粒子。
    /// 发射器的自我销毁只发生在遍历结束之后。
    pub fn update(&mut self, stage: &mut Stage, dt: f32) -> ParticleResult<EmitterStatus> {
        if self.finished {
            return Ok(EmitterStatus::Finished);
        }
        if !(dt.is_finite() && dt >= 0.0) {
            return Err(ParticleError::InvalidDelta(dt));
        }

        // 孤儿粒子重生时要用到发射器和父节点的世界变换，它们在遍历中不会移动，
        // 因此每帧只刷新一次
        if self.particles.iter().any(|p| p.state.orphaned) {
            stage.refresh_transforms();
        }

        let gravity = self.gravity;
        let mut index = self.particles.len();
        while index > 0 {
            index -= 1;

            let particle = &mut self.particles[index];
            let id = particle.id;
            let Some(actor) = stage.get_mut(id) else {
                tracing::warn!(target: "particles", "{} dropped dangling particle {}", self.id, id);
                self.particles.remove(index);
                continue;
            };

            let state = &mut particle.state;
            let previous = state.life_time;
            state.life_time += dt;
            if state.life_time < 0.0 {
                continue;
            }

            if previous < 0.0 {
                actor.active = true;
                actor.visible = true;
                tracing::trace!(target: "particles", "{} activated", id);
            }

            if actor.active {
                actor.scale_x += state.vsx * dt;
                actor.scale_y += state.vsy * dt;
                actor.opacity = (actor.opacity + state.vo * dt).max(0.0);
                actor.motion.vy += gravity * dt;
                actor.integrate(dt);
            }

            if !state.is_expired() {
                continue;
            }

            if state.consume_life() {
                self.reset_particle(stage, index);
                continue;
            }

            self.stats.total_lost += 1;
            let particle = &self.particles[index];
            let may_destroy = match stage.get_mut(id) {
                Some(actor) => self.hooks.particle_lost(id, actor, &particle.state),
                None => true,
            };
            if may_destroy {
                stage.destroy(id);
                self.particles.remove(index);
                self.stats.total_destroyed += 1;
                tracing::debug!(target: "particles", "{} destroyed {}", self.id, id);
            }
        }

        self.refresh_stats();

        if self.particles.is_empty() {
            self.finished = true;
            self.hooks.particles_end();
            stage.destroy(self.id);
            tracing::debug!(target: "particles", "{} finished", self.id);
            return Ok(EmitterStatus::Finished);
        }

        stage.integrate(self.id, dt);
        Ok(EmitterStatus::Running)
    }

    fn refresh_stats(&mut self) {
        let pending = self
            .particles
            .iter()
            .filter(|p| p.state.phase() == ParticlePhase::Pending)
            .count() as u32;
        self.stats.pending = pending;
        self.stats.active = self.particles.len() as u32 - pending;
    }
}

impl Behavior for Emitter {
    fn update(&mut self, stage: &mut Stage, dt: f32) -> ParticleResult<()> {
        Emitter::update(self, stage, dt).map(|_| ())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
