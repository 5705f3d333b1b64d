//! 场景舞台
//!
//! 以 `ActorId` 为键的 Actor 池，维护父子关系、缓存的世界变换
//! 以及挂载在 Actor 上的每帧行为（[`Behavior`]）。
//!
//! 世界变换是缓存值：修改 Actor 后需要调用 [`Stage::refresh_transforms`]
//! 才会反映到 [`Stage::transform_point`] 中。[`Stage::update`] 在每帧开始时自动刷新。

use crate::core::error::{ParticleError, ParticleResult};
use crate::scene::actor::{Actor, ActorId};
use glam::{Affine2, Vec2};
use std::any::Any;
use std::collections::HashMap;

/// 挂载在 Actor 上的每帧行为
///
/// 有行为的 Actor 由行为自身负责更新（包括调用基础的物理积分）。
pub trait Behavior: Any {
    /// 每帧更新
    fn update(&mut self, stage: &mut Stage, dt: f32) -> ParticleResult<()>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

struct ActorNode {
    actor: Actor,
    parent: Option<ActorId>,
    children: Vec<ActorId>,
    /// 负责驱动该 Actor 的另一个 Actor（例如粒子所属的发射器）
    manager: Option<ActorId>,
    world: Affine2,
    behavior: Option<Box<dyn Behavior>>,
}

/// 场景舞台
pub struct Stage {
    nodes: HashMap<ActorId, ActorNode>,
    roots: Vec<ActorId>,
    next_id: u64,
    transforms_dirty: bool,
    /// 世界变换重建次数
    refreshes: u64,
}

impl Default for Stage {
    fn default() -> Self {
        Self {
            nodes: HashMap::new(),
            roots: Vec::new(),
            next_id: 1,
            transforms_dirty: false,
            refreshes: 0,
        }
    }
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加 Actor，`parent` 为 `None` 时挂在根节点下
    pub fn spawn(&mut self, actor: Actor, parent: Option<ActorId>) -> ParticleResult<ActorId> {
        let parent_world = match parent {
            Some(p) => self
                .nodes
                .get(&p)
                .map(|node| node.world)
                .ok_or(ParticleError::ActorNotFound(p))?,
            None => Affine2::IDENTITY,
        };

        let id = ActorId::new(self.next_id);
        self.next_id += 1;

        let world = parent_world * actor.local_transform();
        self.nodes.insert(
            id,
            ActorNode {
                actor,
                parent,
                children: Vec::new(),
                manager: None,
                world,
                behavior: None,
            },
        );

        match parent {
            Some(p) => {
                if let Some(node) = self.nodes.get_mut(&p) {
                    node.children.push(id);
                }
            }
            None => self.roots.push(id),
        }

        Ok(id)
    }

    /// 将 `child` 移动到 `parent` 之下
    pub fn add_child(&mut self, parent: ActorId, child: ActorId) -> ParticleResult<()> {
        if !self.nodes.contains_key(&parent) {
            return Err(ParticleError::ActorNotFound(parent));
        }
        if !self.nodes.contains_key(&child) {
            return Err(ParticleError::ActorNotFound(child));
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(ParticleError::InvalidHierarchy(format!(
                "{} cannot become a child of its descendant {}",
                child, parent
            )));
        }

        self.detach(child);
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(child);
        }
        self.transforms_dirty = true;
        Ok(())
    }

    /// 销毁 Actor 及其所有子节点，返回是否存在
    pub fn destroy(&mut self, id: ActorId) -> bool {
        if !self.nodes.contains_key(&id) {
            return false;
        }
        self.detach(id);

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                stack.extend(node.children);
            }
        }
        tracing::trace!(target: "stage", "Destroyed {}", id);
        true
    }

    fn detach(&mut self, id: ActorId) {
        match self.nodes.get(&id).and_then(|node| node.parent) {
            Some(parent) => {
                if let Some(node) = self.nodes.get_mut(&parent) {
                    node.children.retain(|&c| c != id);
                }
            }
            None => self.roots.retain(|&r| r != id),
        }
    }

    fn is_ancestor_or_self(&self, ancestor: ActorId, mut id: ActorId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.parent_of(id) {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.nodes.get(&id).map(|node| &node.actor)
    }

    /// 获取可变引用，同时标记变换需要刷新
    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        let node = self.nodes.get_mut(&id)?;
        self.transforms_dirty = true;
        Some(&mut node.actor)
    }

    pub fn parent_of(&self, id: ActorId) -> Option<ActorId> {
        self.nodes.get(&id).and_then(|node| node.parent)
    }

    pub fn children_of(&self, id: ActorId) -> &[ActorId] {
        self.nodes
            .get(&id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn roots(&self) -> &[ActorId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 设置驱动该 Actor 的管理者；被管理的 Actor 不会在 [`Stage::update`] 中被重复积分
    pub fn set_manager(&mut self, id: ActorId, manager: Option<ActorId>) -> ParticleResult<()> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(ParticleError::ActorNotFound(id))?;
        node.manager = manager;
        Ok(())
    }

    pub fn manager_of(&self, id: ActorId) -> Option<ActorId> {
        self.nodes.get(&id).and_then(|node| node.manager)
    }

    /// 对单个 Actor 执行物理积分
    pub fn integrate(&mut self, id: ActorId, dt: f32) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.actor.integrate(dt);
                self.transforms_dirty = true;
                true
            }
            None => false,
        }
    }

    /// 重新计算所有缓存的世界变换
    pub fn refresh_transforms(&mut self) {
        if !self.transforms_dirty {
            return;
        }

        let mut stack: Vec<(ActorId, Affine2)> = self
            .roots
            .iter()
            .rev()
            .map(|&id| (id, Affine2::IDENTITY))
            .collect();

        while let Some((id, parent_world)) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(&id) {
                node.world = parent_world * node.actor.local_transform();
                let world = node.world;
                stack.extend(node.children.iter().rev().map(|&c| (c, world)));
            }
        }

        self.transforms_dirty = false;
        self.refreshes += 1;
    }

    /// 世界变换被实际重建的次数（未标记为脏时的刷新不计）
    pub fn refresh_count(&self) -> u64 {
        self.refreshes
    }

    /// 某个空间（`None` 为根空间）到世界空间的变换
    ///
    /// Actor 的空间即其子节点所在的坐标系。
    pub fn space_transform(&self, space: Option<ActorId>) -> Affine2 {
        space
            .and_then(|id| self.nodes.get(&id))
            .map(|node| node.world)
            .unwrap_or(Affine2::IDENTITY)
    }

    /// 把 `from` 空间中的点变换到 `to` 空间
    pub fn transform_point(
        &self,
        point: Vec2,
        from: Option<ActorId>,
        to: Option<ActorId>,
    ) -> Vec2 {
        if from == to {
            return point;
        }
        let world = self.space_transform(from).transform_point2(point);
        self.space_transform(to).inverse().transform_point2(world)
    }

    /// 挂载每帧行为
    pub fn attach_behavior(
        &mut self,
        id: ActorId,
        behavior: Box<dyn Behavior>,
    ) -> ParticleResult<()> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(ParticleError::ActorNotFound(id))?;
        node.behavior = Some(behavior);
        Ok(())
    }

    pub fn behavior<T: Behavior>(&self, id: ActorId) -> Option<&T> {
        self.nodes
            .get(&id)?
            .behavior
            .as_ref()?
            .as_any()
            .downcast_ref::<T>()
    }

    pub fn behavior_mut<T: Behavior>(&mut self, id: ActorId) -> Option<&mut T> {
        self.nodes
            .get_mut(&id)?
            .behavior
            .as_mut()?
            .as_any_mut()
            .downcast_mut::<T>()
    }

    /// 按深度优先顺序更新整棵树
    ///
    /// 有行为的 Actor 交给行为处理；被其他 Actor 管理的节点跳过；
    /// 其余活跃 Actor 执行物理积分。
    pub fn update(&mut self, dt: f32) -> ParticleResult<()> {
        self.refresh_transforms();

        let order = self.depth_first_order();
        for id in order {
            let Some(node) = self.nodes.get_mut(&id) else {
                continue;
            };

            if let Some(mut behavior) = node.behavior.take() {
                let result = behavior.update(self, dt);
                if let Some(node) = self.nodes.get_mut(&id) {
                    node.behavior = Some(behavior);
                }
                result?;
            } else if node.manager.is_none() && node.actor.active {
                node.actor.integrate(dt);
                self.transforms_dirty = true;
            }
        }

        Ok(())
    }

    fn depth_first_order(&self) -> Vec<ActorId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<ActorId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children_of(id).iter().rev());
        }
        order
    }
}
