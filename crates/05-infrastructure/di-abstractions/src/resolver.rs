//! 递归解析上下文
//!
//! 记录当前解析链，用于检测循环依赖与限制递归深度

use infrastructure_common::{ContainerSettings, DependencyError, TypeDescriptor};
use std::fmt;
use tracing::debug;

/// 解析链上的一帧
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveFrame {
    /// 正在构造的组件
    Component(TypeDescriptor),
    /// 正在调用的 Bean 方法
    Provider {
        /// 宿主类型
        host: TypeDescriptor,
        /// 方法名称
        method: &'static str,
    },
}

impl fmt::Display for ResolveFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Component(ty) => write!(f, "{ty}"),
            Self::Provider { host, method } => write!(f, "{host}::{method}"),
        }
    }
}

/// 解析选项
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// 最大递归深度（仅在关闭循环检测时生效）
    pub max_depth: usize,
    /// 是否检测循环依赖
    pub detect_cycles: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            max_depth: 100,
            detect_cycles: true,
        }
    }
}

impl From<&ContainerSettings> for ResolveOptions {
    fn from(settings: &ContainerSettings) -> Self {
        Self {
            max_depth: settings.max_depth,
            detect_cycles: settings.detect_cycles,
        }
    }
}

/// 解析上下文
#[derive(Debug, Clone, Default)]
pub struct ResolveContext {
    /// 当前解析链
    resolution_chain: Vec<ResolveFrame>,
    /// 解析选项
    options: ResolveOptions,
}

impl ResolveContext {
    /// 创建新的解析上下文
    pub fn new(options: ResolveOptions) -> Self {
        Self {
            resolution_chain: Vec::new(),
            options,
        }
    }

    /// 进入一帧
    ///
    /// 开启循环检测时解析链不含重复帧，深度受图规模约束，不再检查 `max_depth`
    pub fn enter(&mut self, frame: ResolveFrame) -> Result<(), DependencyError> {
        if self.options.detect_cycles && self.contains(&frame) {
            debug!("检测到循环依赖: {}", frame);
            return Err(self.cycle_error(&frame));
        }
        if !self.options.detect_cycles && self.resolution_chain.len() >= self.options.max_depth {
            return Err(DependencyError::DependencyResolutionFailed {
                type_name: frame.to_string(),
                message: format!("超过最大解析深度 {}", self.options.max_depth),
            });
        }
        self.resolution_chain.push(frame);
        Ok(())
    }

    /// 离开当前帧
    pub fn leave(&mut self) {
        self.resolution_chain.pop();
    }

    /// 帧是否在当前解析链上
    pub fn contains(&self, frame: &ResolveFrame) -> bool {
        self.resolution_chain.contains(frame)
    }

    /// 当前深度
    pub fn depth(&self) -> usize {
        self.resolution_chain.len()
    }

    /// 以当前解析链构造循环依赖错误，链从首次出现的帧开始
    pub fn cycle_error(&self, frame: &ResolveFrame) -> DependencyError {
        let start = self
            .resolution_chain
            .iter()
            .position(|existing| existing == frame)
            .unwrap_or(0);

        let dependency_chain = self.resolution_chain[start..]
            .iter()
            .chain(std::iter::once(frame))
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" -> ");

        DependencyError::CircularDependency { dependency_chain }
    }
}
