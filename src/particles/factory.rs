//! Actor 工厂与属性覆盖
//!
//! 生成器通过 [`ActorSource`] 创建粒子：要么是注册过的类型名，要么是构造闭包。
//! 生成器从不检查类型本身，只调用工厂。

use crate::core::error::{ParticleError, ParticleResult};
use crate::particles::state::ParticleSpec;
use crate::scene::Actor;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Actor 构造函数
pub type ActorConstructor = Rc<dyn Fn() -> Actor>;

/// 粒子 Actor 的来源
#[derive(Clone)]
pub enum ActorSource {
    /// 通过 [`ActorFactory`] 中注册的名字创建
    Named(String),
    /// 直接调用构造闭包
    Constructor(ActorConstructor),
}

impl ActorSource {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn constructor(f: impl Fn() -> Actor + 'static) -> Self {
        Self::Constructor(Rc::new(f))
    }
}

impl From<&str> for ActorSource {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

impl From<String> for ActorSource {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl fmt::Debug for ActorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Constructor(_) => f.write_str("Constructor(..)"),
        }
    }
}

/// 按名字注册的 Actor 构造器
pub struct ActorFactory {
    constructors: HashMap<String, ActorConstructor>,
}

impl Default for ActorFactory {
    /// 预注册 `"actor"`，即默认的 [`Actor`]
    fn default() -> Self {
        let mut factory = Self::empty();
        factory.register("actor", Actor::default);
        factory
    }
}

impl ActorFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 不含任何注册项的工厂
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// 注册构造器，创建出的 Actor 的 `kind` 会被设为该名字
    pub fn register(&mut self, name: impl Into<String>, constructor: impl Fn() -> Actor + 'static) {
        let name = name.into();
        let kind = name.clone();
        self.constructors.insert(
            name,
            Rc::new(move || {
                let mut actor = constructor();
                actor.kind = kind.clone();
                actor
            }),
        );
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    pub fn create(&self, source: &ActorSource) -> ParticleResult<Actor> {
        match source {
            ActorSource::Named(name) => self
                .constructors
                .get(name)
                .map(|constructor| constructor())
                .ok_or_else(|| ParticleError::UnknownActorType(name.clone())),
            ActorSource::Constructor(constructor) => Ok(constructor()),
        }
    }
}

/// 生成粒子时合并到新 Actor 上的属性（扁平的键值表）
///
/// 已知键写入对应字段，其余键存入 [`Actor::properties`]。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyMap(HashMap<String, Value>);

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 把属性写入 Actor 和粒子参数
    pub fn apply(&self, actor: &mut Actor, spec: &mut ParticleSpec) -> ParticleResult<()> {
        for (key, value) in &self.0 {
            match key.as_str() {
                "x" => actor.x = number(key, value)?,
                "y" => actor.y = number(key, value)?,
                "rotation" => actor.rotation = number(key, value)?,
                "scale" => {
                    let scale = number(key, value)?;
                    actor.scale_x = scale;
                    actor.scale_y = scale;
                }
                "scale_x" => actor.scale_x = number(key, value)?,
                "scale_y" => actor.scale_y = number(key, value)?,
                "opacity" => actor.opacity = number(key, value)?,
                "vx" => actor.motion.vx = number(key, value)?,
                "vy" => actor.motion.vy = number(key, value)?,
                "vr" => actor.motion.vr = number(key, value)?,
                "damping" => actor.motion.damping = number(key, value)?,
                "vo" => spec.vo = number(key, value)?,
                "vsx" => spec.vsx = number(key, value)?,
                "vsy" => spec.vsy = number(key, value)?,
                "depth" => {
                    actor.depth = value
                        .as_i64()
                        .and_then(|v| i32::try_from(v).ok())
                        .ok_or_else(|| invalid(key, "expected a 32-bit integer"))?
                }
                "frame" => {
                    actor.current_frame = value
                        .as_u64()
                        .and_then(|v| u32::try_from(v).ok())
                        .ok_or_else(|| invalid(key, "expected a non-negative integer"))?
                }
                "visible" => {
                    actor.visible = value
                        .as_bool()
                        .ok_or_else(|| invalid(key, "expected a boolean"))?
                }
                _ => {
                    actor.properties.insert(key.clone(), value.clone());
                }
            }
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for PropertyMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

fn number(key: &str, value: &Value) -> ParticleResult<f32> {
    value
        .as_f64()
        .map(|v| v as f32)
        .ok_or_else(|| invalid(key, "expected a number"))
}

fn invalid(key: &str, reason: &str) -> ParticleError {
    ParticleError::InvalidProperty {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
