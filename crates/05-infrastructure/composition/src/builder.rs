//! 应用上下文构建器

use di_abstractions::ComponentDiscovery;
use di_impl::{ApplicationContext, CatalogDiscovery, InitReport};
use infrastructure_common::{
    ContainerSettings, FailurePolicy, InfrastructureError, InfrastructureResult, TypeCatalog,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

/// 应用上下文构建器
///
/// 配置来源依次为：默认值、配置文件、环境变量、构建器上的显式设置
pub struct ContextBuilder {
    /// 完整配置（设置后不再加载文件与环境变量）
    settings: Option<ContainerSettings>,
    /// 配置文件路径
    settings_file: Option<PathBuf>,
    /// 环境变量前缀
    env_prefix: String,
    /// 扫描包路径
    base_package: Option<String>,
    /// 失败策略
    failure_policy: Option<FailurePolicy>,
    /// 最大递归深度
    max_depth: Option<usize>,
    /// 组件发现器
    discovery: Option<Arc<dyn ComponentDiscovery>>,
    /// 是否启用日志初始化
    logging_enabled: bool,
    /// 日志配置
    logging_config: LoggingConfig,
}

impl ContextBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            settings: None,
            settings_file: None,
            env_prefix: ContainerSettings::ENV_PREFIX.to_string(),
            base_package: None,
            failure_policy: None,
            max_depth: None,
            discovery: None,
            logging_enabled: false, // 默认不启用日志初始化
            logging_config: LoggingConfig::default(),
        }
    }

    /// 设置扫描包路径
    pub fn base_package(mut self, package: impl Into<String>) -> Self {
        self.base_package = Some(package.into());
        self
    }

    /// 设置失败策略
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = Some(policy);
        self
    }

    /// 设置最大递归深度
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// 直接使用完整配置
    pub fn with_settings(mut self, settings: ContainerSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// 添加 TOML 配置文件
    pub fn with_settings_file<P: AsRef<Path>>(mut self, path: P) -> InfrastructureResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(InfrastructureError::BootstrapFailed {
                message: format!("配置文件不存在: {}", path.display()),
            });
        }

        info!("添加容器配置文件: {}", path.display());
        self.settings_file = Some(path.to_path_buf());
        Ok(self)
    }

    /// 设置环境变量前缀
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// 使用自定义组件发现器
    pub fn with_discovery(mut self, discovery: Arc<dyn ComponentDiscovery>) -> Self {
        debug!("使用自定义组件发现器: {}", discovery.name());
        self.discovery = Some(discovery);
        self
    }

    /// 使用手工构建的类型注册表
    pub fn with_catalog(self, catalog: TypeCatalog) -> Self {
        self.with_discovery(Arc::new(CatalogDiscovery::new(catalog)))
    }

    /// 配置日志
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging_config = config;
        self.logging_enabled = true;
        self
    }

    /// 构建应用上下文（不初始化）
    pub fn build(self) -> InfrastructureResult<ApplicationContext> {
        // 只有在明确配置了日志时才初始化日志
        if self.logging_enabled {
            self.initialize_logging()?;
        }

        info!("开始构建应用上下文");
        let mut settings = match self.settings {
            Some(settings) => settings,
            None => ContainerSettings::load_with_prefix(self.settings_file.as_deref(), &self.env_prefix)?,
        };

        if let Some(package) = self.base_package {
            settings.base_package = package;
        }
        if let Some(policy) = self.failure_policy {
            settings.failure_policy = policy;
        }
        if let Some(max_depth) = self.max_depth {
            settings.max_depth = max_depth;
        }

        settings.validate()?;
        if settings.base_package.trim().is_empty() {
            return Err(InfrastructureError::BootstrapFailed {
                message: "未配置扫描包路径".to_string(),
            });
        }

        let discovery = self
            .discovery
            .unwrap_or_else(|| Arc::new(CatalogDiscovery::from_global()));

        info!(
            "应用上下文构建完成: 包 {}, 策略 {:?}",
            settings.base_package, settings.failure_policy
        );
        Ok(ApplicationContext::with_settings(settings, discovery))
    }

    /// 构建并初始化应用上下文
    pub fn build_and_init(self) -> InfrastructureResult<(ApplicationContext, InitReport)> {
        let mut context = self.build()?;
        let report = context.init()?;
        Ok((context, report))
    }

    /// 初始化日志系统
    fn initialize_logging(&self) -> InfrastructureResult<()> {
        let filter = match &self.logging_config.filter {
            Some(directives) => EnvFilter::try_new(directives).map_err(|e| {
                InfrastructureError::BootstrapFailed {
                    message: format!("日志过滤规则无效: {}", e),
                }
            })?,
            None => EnvFilter::builder()
                .with_default_directive(LevelFilter::from_level(self.logging_config.level).into())
                .from_env_lossy(),
        };

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(self.logging_config.show_target)
            .with_thread_ids(self.logging_config.show_thread_ids)
            .with_file(self.logging_config.show_file)
            .with_line_number(self.logging_config.show_line_number);

        if self.logging_config.json_format {
            subscriber.json().try_init()
        } else {
            subscriber.try_init()
        }
        .map_err(|e| InfrastructureError::BootstrapFailed {
            message: format!("日志初始化失败: {}", e),
        })?;

        info!("日志系统初始化完成");
        Ok(())
    }
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别（未设置过滤规则且没有 `RUST_LOG` 时生效）
    pub level: tracing::Level,
    /// 过滤规则，例如 `di_impl=debug,info`
    pub filter: Option<String>,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            filter: None,
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境日志配置
    pub fn development() -> Self {
        Self {
            level: tracing::Level::DEBUG,
            filter: None,
            show_target: true,
            show_thread_ids: true,
            show_file: true,
            show_line_number: true,
            json_format: false,
        }
    }

    /// 创建生产环境日志配置
    pub fn production() -> Self {
        Self {
            level: tracing::Level::INFO,
            filter: None,
            show_target: false,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: true,
        }
    }

    /// 设置过滤规则
    pub fn with_filter(mut self, directives: impl Into<String>) -> Self {
        self.filter = Some(directives.into());
        self
    }
}
