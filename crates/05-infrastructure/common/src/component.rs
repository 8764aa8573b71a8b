//! Bean 与标记的基础定义
//!
//! 提供容器管理实例的句柄类型、声明式标记，以及生成代码使用的实参装配工具

use crate::errors::InvocationError;
use std::any::Any;
use std::sync::Arc;

/// 容器管理的实例
///
/// 所有 Bean 以类型擦除的共享指针保存，由调用方按需向下转换
pub type Bean = Arc<dyn Any + Send + Sync>;

/// 将值包装为 Bean
pub fn into_bean<T: Send + Sync + 'static>(value: T) -> Bean {
    Arc::new(value)
}

/// 将共享指针直接作为 Bean
pub fn arc_into_bean<T: Send + Sync + 'static>(value: Arc<T>) -> Bean {
    value
}

/// 声明式标记 trait
///
/// 标记本身也可以带有其他标记，形成标记链（例如 `Service` 带有 `Component`）
pub trait Marker: 'static {
    /// 标记名称
    const NAME: &'static str;
}

/// 内置标记
pub mod markers {
    use super::Marker;

    /// 组件标记名称
    pub const COMPONENT: &str = "Component";
    /// Bean 方法标记名称
    pub const BEAN: &str = "Bean";

    /// 组件标记：带有此标记的类型会被自动构造
    #[derive(Debug, Clone, Copy, Default)]
    pub struct Component;

    impl Marker for Component {
        const NAME: &'static str = COMPONENT;
    }

    /// Bean 标记：带有此标记的方法的返回值会被注册为 Bean
    #[derive(Debug, Clone, Copy, Default)]
    pub struct Bean;

    impl Marker for Bean {
        const NAME: &'static str = BEAN;
    }
}

/// 调用实参
///
/// 生成的构造函数与 Bean 方法通过它按声明顺序取出实参
#[derive(Debug)]
pub struct Arguments {
    callable: &'static str,
    values: std::vec::IntoIter<Option<Bean>>,
}

impl Arguments {
    /// 创建调用实参
    pub fn new(callable: &'static str, values: Vec<Option<Bean>>) -> Self {
        Self {
            callable,
            values: values.into_iter(),
        }
    }

    /// 将宿主实例转换为具体类型
    pub fn receiver<T: Send + Sync + 'static>(
        receiver: &Bean,
        callable: &'static str,
    ) -> Result<Arc<T>, InvocationError> {
        Arc::clone(receiver)
            .downcast::<T>()
            .map_err(|_| InvocationError::ReceiverTypeMismatch {
                callable: callable.to_string(),
                expected: std::any::type_name::<T>().to_string(),
            })
    }

    /// 取出下一个 Bean 实参
    pub fn bean<T: Send + Sync + 'static>(
        &mut self,
        parameter: &'static str,
    ) -> Result<Arc<T>, InvocationError> {
        let value = self
            .values
            .next()
            .flatten()
            .ok_or_else(|| InvocationError::missing_argument(self.callable, parameter))?;

        value
            .downcast::<T>()
            .map_err(|_| InvocationError::ArgumentTypeMismatch {
                callable: self.callable.to_string(),
                parameter: parameter.to_string(),
                expected: std::any::type_name::<T>().to_string(),
            })
    }

    /// 取出下一个可缺席的 Bean 实参
    ///
    /// 依赖构造失败时实参缺席，返回 `None`
    pub fn optional_bean<T: Send + Sync + 'static>(
        &mut self,
        parameter: &'static str,
    ) -> Result<Option<Arc<T>>, InvocationError> {
        match self.values.next().flatten() {
            Some(value) => value.downcast::<T>().map(Some).map_err(|_| {
                InvocationError::ArgumentTypeMismatch {
                    callable: self.callable.to_string(),
                    parameter: parameter.to_string(),
                    expected: std::any::type_name::<T>().to_string(),
                }
            }),
            None => Ok(None),
        }
    }

    /// 跳过容器无法提供的参数
    ///
    /// 非 `Arc<T>` 参数不会被容器满足，调用总是失败
    pub fn unsupported<T>(&mut self, parameter: &'static str) -> Result<T, InvocationError> {
        let _ = self.values.next();
        Err(InvocationError::UnsupportedParameter {
            callable: self.callable.to_string(),
            parameter: parameter.to_string(),
        })
    }
}
