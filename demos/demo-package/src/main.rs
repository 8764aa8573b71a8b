//! # 约定装配演示
//!
//! 组件由宏登记，Bean 方法由配置类提供，容器按包路径扫描并装配。

use anyhow::Context;
use di_abstractions::BeanRegistry;
use infrastructure_composition::{ContextBuilder, FailurePolicy, LoggingConfig};
use tracing::{info, warn};

mod shop {
    use component_macros::{component, injectable, marked};
    use infrastructure_common::markers::Component;
    use std::collections::HashMap;
    use std::sync::Arc;

    pub const PACKAGE: &str = module_path!();

    /// 领域服务标记
    #[component_macros::marker(Component)]
    pub struct DomainService;

    #[derive(Debug)]
    pub struct DatabaseConfig {
        pub url: String,
        pub pool_size: usize,
    }

    #[derive(Debug)]
    pub struct ConnectionPool {
        pub config: Arc<DatabaseConfig>,
    }

    #[component]
    pub struct DatabaseModule;

    #[injectable]
    impl DatabaseModule {
        pub fn new() -> Self {
            DatabaseModule
        }

        #[bean(name = "databaseConfig")]
        pub fn database_config(&self) -> DatabaseConfig {
            DatabaseConfig {
                url: "postgres://localhost/shop".to_string(),
                pool_size: 8,
            }
        }

        #[bean]
        pub fn pool(&self, config: Arc<DatabaseConfig>) -> Result<ConnectionPool, String> {
            if config.pool_size == 0 {
                return Err("连接池大小不能为 0".to_string());
            }
            Ok(ConnectionPool { config })
        }
    }

    #[component]
    pub struct ProductRepository {
        prices: HashMap<&'static str, u32>,
    }

    #[injectable]
    impl ProductRepository {
        pub fn new() -> Self {
            let prices = HashMap::from([("keyboard", 399), ("mouse", 129)]);
            Self { prices }
        }

        pub fn price(&self, sku: &str) -> Option<u32> {
            self.prices.get(sku).copied()
        }
    }

    #[marked(DomainService)]
    pub struct PricingService {
        pub repository: Arc<ProductRepository>,
    }

    #[injectable]
    impl PricingService {
        /// 带折扣率的构造函数无法由容器满足，容器会选择下一个
        pub fn with_discount(repository: Arc<ProductRepository>, _discount: u8) -> Self {
            Self { repository }
        }

        pub fn new(repository: Arc<ProductRepository>) -> Self {
            Self { repository }
        }

        pub fn quote(&self, sku: &str, quantity: u32) -> Option<u32> {
            self.repository.price(sku).map(|price| price * quantity)
        }
    }

    /// 构造函数需要容器无法提供的 `u16` 端口，会以“没有可用的构造函数”出现在初始化报告中
    #[component]
    pub struct ReportMailer;

    #[injectable]
    impl ReportMailer {
        pub fn new(_smtp_port: u16) -> Self {
            ReportMailer
        }
    }
}

fn main() -> anyhow::Result<()> {
    let (context, report) = ContextBuilder::new()
        .base_package(shop::PACKAGE)
        .failure_policy(FailurePolicy::BestEffort)
        .with_logging(LoggingConfig::default().with_filter("info"))
        .build_and_init()
        .context("应用上下文初始化失败")?;

    info!(
        "初始化完成: {} 个组件, {} 个 Bean 方法, 耗时 {}ms",
        report.components_constructed,
        report.providers_invoked,
        report.duration().num_milliseconds()
    );
    for failure in &report.failures {
        warn!("装配失败: {}", failure);
    }

    let pricing = context
        .resolve::<shop::PricingService>("pricingService")
        .context("缺少 PricingService")?;
    info!("2 x keyboard = {:?}", pricing.quote("keyboard", 2));

    let pool = context
        .resolve::<shop::ConnectionPool>("pool")
        .context("缺少连接池")?;
    info!("连接池: {} ({})", pool.config.url, pool.config.pool_size);

    info!("已注册的 Bean: {}", context.bean_names().join(", "));
    Ok(())
}
