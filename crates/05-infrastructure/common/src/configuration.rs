//! 容器配置
//!
//! 配置按 默认值 → TOML 文件 → 环境变量 的顺序叠加

use crate::errors::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 装配失败策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// 尽力装配：失败被记录到日志与报告中，对应的 Bean 缺席
    #[default]
    BestEffort,
    /// 快速失败：第一个失败即中止初始化并返回错误
    FailFast,
}

/// 容器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerSettings {
    /// 扫描包路径（模块路径前缀）
    pub base_package: String,
    /// 装配失败策略
    pub failure_policy: FailurePolicy,
    /// 最大递归解析深度（仅在关闭循环检测时生效）
    pub max_depth: usize,
    /// 是否检测循环依赖
    pub detect_cycles: bool,
}

impl Default for ContainerSettings {
    fn default() -> Self {
        Self {
            base_package: String::new(),
            failure_policy: FailurePolicy::BestEffort,
            max_depth: 100,
            detect_cycles: true,
        }
    }
}

impl ContainerSettings {
    /// 环境变量前缀
    pub const ENV_PREFIX: &'static str = "LORN_IOC";

    /// 创建指定扫描包的配置
    pub fn new(base_package: impl Into<String>) -> Self {
        Self {
            base_package: base_package.into(),
            ..Self::default()
        }
    }

    /// 设置失败策略
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// 设置最大递归深度
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// 设置是否检测循环依赖
    pub fn with_cycle_detection(mut self, enabled: bool) -> Self {
        self.detect_cycles = enabled;
        self
    }

    /// 从 TOML 文本解析
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// 加载配置：默认值，可选的配置文件，`LORN_IOC_*` 环境变量
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        Self::load_with_prefix(path, Self::ENV_PREFIX)
    }

    /// 以指定环境变量前缀加载配置
    pub fn load_with_prefix(path: Option<&Path>, env_prefix: &str) -> ConfigResult<Self> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                });
            }
            tracing::debug!("加载容器配置文件: {}", path.display());
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings: Self = builder
            .add_source(config::Environment::with_prefix(env_prefix).try_parsing(true))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_depth == 0 {
            return Err(ConfigError::ValidationError {
                message: "max_depth 必须大于 0".to_string(),
            });
        }
        Ok(())
    }
}
