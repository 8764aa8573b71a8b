//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义容器引擎与外部协作者之间的接口。
//!
//! ## 核心接口
//!
//! - [`ComponentDiscovery`] - 组件发现协作者（枚举类型、判定标记、列出构造函数与方法、动态调用）
//! - [`BeanRegistry`] - Bean 查找接口
//! - [`ResolveContext`] - 递归解析上下文（循环依赖与深度保护）

pub mod discovery;
pub mod registry;
pub mod resolver;

pub use discovery::*;
pub use registry::*;
pub use resolver::*;
