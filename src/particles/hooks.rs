//! 发射器生命周期回调
//!
//! 四个回调都是可选的。未设置时使用默认行为：
//! 添加/重置/结束不做任何事，丢失时直接销毁粒子。

use crate::particles::state::ParticleState;
use crate::scene::{Actor, ActorId};

/// 粒子回调：添加、重置
pub type ParticleHook = Box<dyn FnMut(ActorId, &mut Actor, &ParticleState)>;

/// 粒子丢失回调，返回 `true` 允许销毁
pub type ParticleLostHook = Box<dyn FnMut(ActorId, &mut Actor, &ParticleState) -> bool>;

/// 全部粒子结束回调
pub type ParticlesEndHook = Box<dyn FnMut()>;

/// 发射器回调集合
#[derive(Default)]
pub struct EmitterHooks {
    pub on_particle_added: Option<ParticleHook>,
    pub on_particle_reset: Option<ParticleHook>,
    pub on_particles_end: Option<ParticlesEndHook>,
    pub on_particle_lost: Option<ParticleLostHook>,
}

impl EmitterHooks {
    pub(crate) fn particle_added(&mut self, id: ActorId, actor: &mut Actor, state: &ParticleState) {
        if let Some(hook) = self.on_particle_added.as_mut() {
            hook(id, actor, state);
        }
    }

    pub(crate) fn particle_reset(&mut self, id: ActorId, actor: &mut Actor, state: &ParticleState) {
        if let Some(hook) = self.on_particle_reset.as_mut() {
            hook(id, actor, state);
        }
    }

    /// 返回是否可以销毁该粒子
    pub(crate) fn particle_lost(
        &mut self,
        id: ActorId,
        actor: &mut Actor,
        state: &ParticleState,
    ) -> bool {
        match self.on_particle_lost.as_mut() {
            Some(hook) => hook(id, actor, state),
            None => true,
        }
    }

    pub(crate) fn particles_end(&mut self) {
        if let Some(hook) = self.on_particles_end.as_mut() {
            hook();
        }
    }
}

impl std::fmt::Debug for EmitterHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmitterHooks")
            .field("on_particle_added", &self.on_particle_added.is_some())
            .field("on_particle_reset", &self.on_particle_reset.is_some())
            .field("on_particles_end", &self.on_particles_end.is_some())
            .field("on_particle_lost", &self.on_particle_lost.is_some())
            .finish()
    }
}
