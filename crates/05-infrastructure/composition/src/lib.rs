//! # Infrastructure Composition
//!
//! 组合层：把容器配置、日志与组件发现装配成可用的 [`ApplicationContext`]。
//!
//! ## 使用示例
//!
//! ```rust,no_run
//! use di_abstractions::BeanRegistry;
//! use infrastructure_composition::{ContextBuilder, LoggingConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (context, report) = ContextBuilder::new()
//!         .base_package("my_app::services")
//!         .with_logging(LoggingConfig::development())
//!         .build_and_init()?;
//!
//!     println!("Bean: {:?}, 失败: {}", context.bean_names(), report.failures.len());
//!     Ok(())
//! }
//! ```

pub mod builder;

pub use builder::{ContextBuilder, LoggingConfig};

pub use di_impl::{ApplicationContext, ContextState, InitFailure, InitReport};
pub use infrastructure_common::{
    ContainerSettings, FailurePolicy, InfrastructureError, InfrastructureResult,
};
