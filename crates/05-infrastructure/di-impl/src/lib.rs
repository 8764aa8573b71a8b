//! # 依赖注入具体实现
//!
//! 提供基于约定的单例装配引擎：
//!
//! - [`ApplicationContext`] - 扫描包、构造组件、调用 Bean 方法并按键查找
//! - [`CatalogDiscovery`] - 基于类型注册表的组件发现器
//! - [`BeanStore`] - 按类型键与按名称的双索引存储
//! - [`InitReport`] - 一次初始化的结果汇总

pub mod context;
pub mod discovery;
pub mod report;
pub mod store;
mod wiring;

pub use context::{ApplicationContext, ContextState};
pub use discovery::CatalogDiscovery;
pub use report::{InitFailure, InitReport};
pub use store::BeanStore;
