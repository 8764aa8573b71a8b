//! 组件发现抽象接口
//!
//! 提供枚举类型、判定标记、列出构造函数与方法以及动态调用的能力

use infrastructure_common::{
    Bean, ComponentError, ConstructorDescriptor, InvocationError, MethodDescriptor,
    TypeDescriptor,
};

/// 标记判定目标
#[derive(Debug, Clone, Copy)]
pub enum MarkerTarget<'a> {
    /// 类型
    Type(&'a TypeDescriptor),
    /// 方法
    Method(&'a MethodDescriptor),
    /// 标记本身
    Marker(&'a str),
}

/// 组件发现器 trait
///
/// 容器引擎只通过此接口了解类型结构，不关心信息来自运行时反射还是编译时注册表
pub trait ComponentDiscovery: Send + Sync {
    /// 枚举指定包中的所有类型
    fn list_types_in_package(&self, package: &str) -> Result<Vec<TypeDescriptor>, ComponentError>;

    /// 判断目标是否直接或经由标记链带有指定标记
    fn has_marker_transitive(&self, target: MarkerTarget<'_>, marker: &str) -> bool;

    /// 列出类型上直接或经由标记链带有指定标记的方法（声明顺序）
    fn list_methods_declaring_marker(
        &self,
        ty: &TypeDescriptor,
        marker: &str,
    ) -> Vec<MethodDescriptor>;

    /// 列出类型的构造函数（声明顺序）
    fn list_constructors(&self, ty: &TypeDescriptor) -> Vec<ConstructorDescriptor>;

    /// 调用构造函数
    fn invoke_constructor(
        &self,
        constructor: &ConstructorDescriptor,
        args: Vec<Option<Bean>>,
    ) -> Result<Bean, InvocationError>;

    /// 在宿主实例上调用方法
    fn invoke_method(
        &self,
        method: &MethodDescriptor,
        receiver: &Bean,
        args: Vec<Option<Bean>>,
    ) -> Result<Bean, InvocationError>;

    /// 获取发现器名称
    fn name(&self) -> &str;
}
