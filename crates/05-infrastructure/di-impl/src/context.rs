//! 应用上下文

use crate::discovery::CatalogDiscovery;
use crate::report::InitReport;
use crate::store::BeanStore;
use crate::wiring::Wiring;
use di_abstractions::{BeanRegistry, ComponentDiscovery};
use infrastructure_common::{Bean, ContainerSettings, DependencyResult};
use std::fmt;
use std::sync::Arc;
use tracing::{error, info};

/// 上下文状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    /// 已创建，尚未初始化
    Created,
    /// 初始化中
    Initializing,
    /// 初始化完成，可查找
    Ready,
    /// 快速失败模式下初始化中止
    Failed,
}

/// 应用上下文
///
/// 持有唯一的 Bean 存储；`init()` 之后只读，可被多个调用方共享
pub struct ApplicationContext {
    settings: ContainerSettings,
    discovery: Arc<dyn ComponentDiscovery>,
    store: BeanStore,
    state: ContextState,
}

impl ApplicationContext {
    /// 以全局类型注册表创建上下文
    pub fn new(base_package: impl Into<String>) -> Self {
        Self::with_discovery(base_package, Arc::new(CatalogDiscovery::from_global()))
    }

    /// 以指定发现器创建上下文
    pub fn with_discovery(
        base_package: impl Into<String>,
        discovery: Arc<dyn ComponentDiscovery>,
    ) -> Self {
        Self::with_settings(ContainerSettings::new(base_package), discovery)
    }

    /// 以完整配置创建上下文
    pub fn with_settings(settings: ContainerSettings, discovery: Arc<dyn ComponentDiscovery>) -> Self {
        Self {
            settings,
            discovery,
            store: BeanStore::new(),
            state: ContextState::Created,
        }
    }

    /// 扫描包并装配所有 Bean
    ///
    /// 每次调用都从空存储重新开始。尽力装配模式下总是返回 `Ok`，失败记录在报告中；
    /// 快速失败模式下返回第一个失败，存储被清空
    pub fn init(&mut self) -> DependencyResult<InitReport> {
        self.store.clear();
        self.state = ContextState::Initializing;
        info!(
            "初始化应用上下文: 包 {} (发现器: {})",
            self.settings.base_package,
            self.discovery.name()
        );

        let result = Wiring::new(self.discovery.as_ref(), &mut self.store, &self.settings).run();

        match result {
            Ok(report) => {
                self.state = ContextState::Ready;
                info!(
                    "应用上下文初始化完成: {} 个 Bean, {} 个失败, 耗时 {}ms",
                    self.store.len(),
                    report.failures.len(),
                    report.duration().num_milliseconds()
                );
                Ok(report)
            }
            Err(e) => {
                error!("应用上下文初始化失败: {}", e);
                self.store.clear();
                self.state = ContextState::Failed;
                Err(e)
            }
        }
    }

    /// 当前状态
    pub fn state(&self) -> ContextState {
        self.state
    }

    /// 扫描包路径
    pub fn base_package(&self) -> &str {
        &self.settings.base_package
    }

    /// 容器配置
    pub fn settings(&self) -> &ContainerSettings {
        &self.settings
    }

    /// 已注册键的数量
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl BeanRegistry for ApplicationContext {
    fn lookup(&self, key: &str) -> Option<Bean> {
        self.store.lookup(key)
    }

    fn bean_names(&self) -> Vec<String> {
        self.store.names()
    }
}

impl fmt::Debug for ApplicationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationContext")
            .field("settings", &self.settings)
            .field("discovery", &self.discovery.name())
            .field("state", &self.state)
            .field("beans", &self.store.len())
            .finish()
    }
}
