//! 错误类型定义

use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(error: config::ConfigError) -> Self {
        Self::ParseError {
            source: Box::new(error),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(error: toml::de::Error) -> Self {
        Self::ParseError {
            source: Box::new(error),
        }
    }
}

/// 调用错误类型
///
/// 构造函数或 Bean 方法在实参装配、接收者转换或自身执行时产生的错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvocationError {
    #[error("{callable} 缺少实参: {parameter}")]
    MissingArgument {
        callable: String,
        parameter: String,
    },

    #[error("{callable} 实参数量不匹配: 期望 {expected}, 实际 {actual}")]
    ArgumentCountMismatch {
        callable: String,
        expected: usize,
        actual: usize,
    },

    #[error("{callable} 实参类型不匹配: {parameter}, 期望 {expected}")]
    ArgumentTypeMismatch {
        callable: String,
        parameter: String,
        expected: String,
    },

    #[error("{callable} 缺少宿主实例")]
    MissingReceiver { callable: String },

    #[error("{callable} 宿主实例类型不匹配: 期望 {expected}")]
    ReceiverTypeMismatch { callable: String, expected: String },

    #[error("{callable} 的参数 {parameter} 无法由容器提供")]
    UnsupportedParameter {
        callable: String,
        parameter: String,
    },

    #[error("{callable} 执行失败: {message}")]
    Failed { callable: String, message: String },
}

impl InvocationError {
    /// 创建执行失败错误
    pub fn failed(callable: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Failed {
            callable: callable.into(),
            message: message.to_string(),
        }
    }

    /// 创建缺少实参错误
    pub fn missing_argument(callable: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self::MissingArgument {
            callable: callable.into(),
            parameter: parameter.into(),
        }
    }
}

/// 组件扫描错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComponentError {
    #[error("组件扫描失败: {message}")]
    ScanError { message: String },
}

impl ComponentError {
    /// 创建扫描错误
    pub fn scan_error(message: impl Into<String>) -> Self {
        Self::ScanError {
            message: message.into(),
        }
    }
}

/// 依赖注入错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DependencyError {
    #[error("组件未注册: {type_name}")]
    ComponentNotRegistered { type_name: String },

    #[error("Bean 类型不匹配: {key}, 期望 {expected}")]
    BeanTypeMismatch { key: String, expected: String },

    #[error("没有可用的构造函数: {type_name}")]
    NoUsableConstructor { type_name: String },

    #[error("组件创建失败: {type_name}, 原因: {source}")]
    ComponentCreationFailed {
        type_name: String,
        source: InvocationError,
    },

    #[error("Bean 方法调用失败: {type_name}::{method}, 原因: {source}")]
    ProviderInvocationFailed {
        type_name: String,
        method: String,
        source: InvocationError,
    },

    #[error("循环依赖检测到: {dependency_chain}")]
    CircularDependency { dependency_chain: String },

    #[error("依赖解析失败: {type_name}, 原因: {message}")]
    DependencyResolutionFailed { type_name: String, message: String },

    #[error("包扫描失败: {package}, 原因: {source}")]
    ScanFailed {
        package: String,
        source: ComponentError,
    },
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("依赖注入错误: {source}")]
    DependencyError {
        #[from]
        source: DependencyError,
    },

    #[error("基础设施启动失败: {message}")]
    BootstrapFailed { message: String },
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;
