//! Bean 查找接口

use infrastructure_common::{Bean, DependencyError};
use std::sync::Arc;

/// Bean 注册表 trait
///
/// 初始化完成后只读，可被多个调用方并发读取
pub trait BeanRegistry: Send + Sync {
    /// 按键查找 Bean，缺席时返回 `None`
    fn lookup(&self, key: &str) -> Option<Bean>;

    /// 所有已注册的键
    fn bean_names(&self) -> Vec<String>;

    /// 检查键是否已注册
    fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// 按键查找并转换为具体类型
    fn get_bean<T>(&self, key: &str) -> Option<Arc<T>>
    where
        T: Send + Sync + 'static,
        Self: Sized,
    {
        self.lookup(key).and_then(|bean| bean.downcast::<T>().ok())
    }

    /// 按键解析具体类型，缺席或类型不符时返回错误
    fn resolve<T>(&self, key: &str) -> Result<Arc<T>, DependencyError>
    where
        T: Send + Sync + 'static,
        Self: Sized,
    {
        let bean = self
            .lookup(key)
            .ok_or_else(|| DependencyError::ComponentNotRegistered {
                type_name: key.to_string(),
            })?;

        bean.downcast::<T>()
            .map_err(|_| DependencyError::BeanTypeMismatch {
                key: key.to_string(),
                expected: std::any::type_name::<T>().to_string(),
            })
    }
}
