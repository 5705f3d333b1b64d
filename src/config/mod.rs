/// 粒子系统配置
///
/// 提供TOML/JSON配置文件、环境变量覆盖和验证
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::impl_default;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 文件读取错误
    #[error("Config file error: {0}")]
    FileError(#[from] std::io::Error),
    /// 解析错误
    #[error("Config parse error: {0}")]
    ParseError(String),
    /// 验证错误
    #[error("Config validation error: {0}")]
    ValidationError(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// 粒子系统主配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParticleConfig {
    /// 发射器配置
    #[serde(default)]
    pub emitter: EmitterConfig,

    /// 生成器默认参数
    #[serde(default)]
    pub generator: GeneratorDefaults,

    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ParticleConfig {
    /// 创建默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 从TOML文件加载配置
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_toml_str(&content)
    }

    /// 从TOML字符串解析配置
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 从JSON文件加载配置
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_json_str(&content)
    }

    /// 从JSON字符串解析配置
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 保存为TOML文件
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 从环境变量覆盖配置
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("PARTICLES_GRAVITY") {
            if let Ok(gravity) = val.parse() {
                self.emitter.gravity = gravity;
            }
        }
        if let Ok(val) = env::var("PARTICLES_COUNT") {
            if let Ok(count) = val.parse() {
                self.generator.count = count;
            }
        }
        if let Ok(val) = env::var("PARTICLES_DURATION") {
            if let Ok(duration) = val.parse() {
                self.generator.duration = duration;
            }
        }
        if let Ok(val) = env::var("PARTICLES_SPEED") {
            if let Ok(speed) = val.parse() {
                self.generator.speed = speed;
            }
        }
        if let Ok(val) = env::var("PARTICLES_RATE") {
            if let Ok(rate) = val.parse() {
                self.generator.rate = rate;
            }
        }
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        self.emitter.validate()?;
        self.generator.validate()?;
        Ok(())
    }

    /// 自动查找并加载配置文件
    ///
    /// 按以下顺序查找：
    /// 1. ./particles.toml
    /// 2. ./particles.json
    /// 3. 使用默认配置
    pub fn load_or_default() -> Self {
        if let Ok(config) = Self::from_toml_file("particles.toml") {
            tracing::info!(target: "config", "Loaded config from particles.toml");
            return config;
        }

        if let Ok(config) = Self::from_json_file("particles.json") {
            tracing::info!(target: "config", "Loaded config from particles.json");
            return config;
        }

        tracing::info!(target: "config", "Using default configuration");
        Self::default()
    }
}

/// 发射器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// 重力加速度（正值向下）
    pub gravity: f32,
}

impl_default!(EmitterConfig { gravity: 0.0 });

impl EmitterConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.gravity.is_finite() {
            return Err(ConfigError::ValidationError(
                "emitter.gravity must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// 生成器默认参数
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorDefaults {
    /// 粒子数量
    pub count: u32,
    /// 粒子寿命（秒），同时决定透明度衰减速度
    pub duration: f32,
    /// 速度
    pub speed: f32,
    /// 旋转速度
    pub spin_speed: f32,
    /// 发射速率，生成延迟为 `index / (count * rate)`
    pub rate: f32,
    /// 每帧速度衰减系数（1.0 = 不衰减）
    pub damping: f32,
    /// 雨幕宽度
    pub width: f32,
}

impl_default!(GeneratorDefaults {
    count: 20,
    duration: 1.0,
    speed: 100.0,
    spin_speed: 0.0,
    rate: 1.0,
    damping: 1.0,
    width: 200.0,
});

impl GeneratorDefaults {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.count == 0 {
            return Err(ConfigError::ValidationError(
                "generator.count must be > 0".to_string(),
            ));
        }
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(ConfigError::ValidationError(
                "generator.duration must be > 0".to_string(),
            ));
        }
        if !(self.rate.is_finite() && self.rate > 0.0) {
            return Err(ConfigError::ValidationError(
                "generator.rate must be > 0".to_string(),
            ));
        }
        for (name, value) in [
            ("speed", self.speed),
            ("spin_speed", self.spin_speed),
            ("damping", self.damping),
            ("width", self.width),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::ValidationError(format!(
                    "generator.{} must be finite and >= 0",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: LogLevel,

    /// 是否输出到控制台
    pub log_to_console: bool,
}

impl_default!(LoggingConfig {
    level: LogLevel::Info,
    log_to_console: true,
});

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    /// 跟踪
    Trace,
    /// 调试
    Debug,
    /// 信息
    Info,
    /// 警告
    Warn,
    /// 错误
    Error,
}
