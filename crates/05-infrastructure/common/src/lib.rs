//! # Infrastructure Common
//!
//! 这个 crate 提供了 Lorn IoC 容器各层共享的基础类型。
//!
//! ## 核心组件
//!
//! - [`Bean`] - 容器管理的单例实例句柄
//! - [`TypeDescriptor`] - 类型描述（替代运行时反射的类型标识）
//! - [`TypeCatalog`] - 编译时生成的类型注册表
//! - [`Marker`] - 声明式标记（组件标记、Bean 标记及其派生标记）
//! - [`NamingConventions`] - 规范键推导
//! - [`ContainerSettings`] - 容器配置
//!
//! ## 设计原则
//!
//! - 用编译时生成的注册表代替运行时反射
//! - 约定优于配置
//! - 装配失败可观测（日志 + 报告），策略可配置

pub mod component;
pub mod configuration;
pub mod conventions;
pub mod discovery;
pub mod errors;
pub mod metadata;

pub use component::*;
pub use configuration::*;
pub use conventions::*;
pub use discovery::*;
pub use errors::*;
pub use metadata::*;

/// 全局类型注册表
///
/// 由 `component-macros` 生成的 `ctor` 函数在程序启动时填充
static GLOBAL_TYPE_CATALOG: once_cell::sync::Lazy<parking_lot::RwLock<TypeCatalog>> =
    once_cell::sync::Lazy::new(|| parking_lot::RwLock::new(TypeCatalog::new()));

/// 向全局注册表登记类型条目（同一类型的多次登记会合并）
pub fn register_type_entry(entry: TypeEntry) {
    GLOBAL_TYPE_CATALOG.write().register(entry);
}

/// 向全局注册表登记标记声明
pub fn register_marker_declaration(declaration: MarkerDeclaration) {
    GLOBAL_TYPE_CATALOG.write().declare_marker(declaration);
}

/// 获取全局注册表的快照
///
/// 扫描在快照上进行，调用用户代码时不持有锁
pub fn global_catalog_snapshot() -> TypeCatalog {
    GLOBAL_TYPE_CATALOG.read().clone()
}
