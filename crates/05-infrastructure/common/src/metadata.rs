//! 元数据定义
//!
//! 提供类型与参数的描述信息，作为注册表中类型的身份标识

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// 类型描述
///
/// 身份由 `TypeId` 决定，名称信息来自 `std::any::type_name`
#[derive(Clone, Copy)]
pub struct TypeDescriptor {
    /// 类型ID
    id: TypeId,
    /// 完整类型名称
    type_name: &'static str,
    /// 简短类型名称（不含模块路径与泛型参数）
    simple_name: &'static str,
    /// 定义所在的模块路径
    module_path: &'static str,
}

impl TypeDescriptor {
    /// 从类型获取类型描述
    pub fn of<T: ?Sized + 'static>() -> Self {
        let type_name = std::any::type_name::<T>();
        let (module_path, simple_name) = split_type_name(type_name);
        Self {
            id: TypeId::of::<T>(),
            type_name,
            simple_name,
            module_path,
        }
    }

    /// 类型ID
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// 完整类型名称
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// 简短类型名称
    pub fn simple_name(&self) -> &'static str {
        self.simple_name
    }

    /// 模块路径
    pub fn module_path(&self) -> &'static str {
        self.module_path
    }

    /// 是否位于指定包（模块路径前缀）之内
    pub fn is_in_package(&self, package: &str) -> bool {
        self.module_path == package
            || self
                .module_path
                .strip_prefix(package)
                .is_some_and(|rest| rest.starts_with("::"))
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeDescriptor").field(&self.type_name).finish()
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.simple_name)
    }
}

/// 拆分完整类型名称为 (模块路径, 简短名称)
fn split_type_name(type_name: &'static str) -> (&'static str, &'static str) {
    let base_end = type_name.find('<').unwrap_or(type_name.len());
    let base = &type_name[..base_end];
    match base.rfind("::") {
        Some(index) => (&type_name[..index], &type_name[index + 2..base_end]),
        None => ("", base),
    }
}

/// 参数描述
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamDescriptor {
    /// 参数名称
    pub name: &'static str,
    /// 参数声明类型
    pub ty: TypeDescriptor,
}

impl ParamDescriptor {
    /// 创建参数描述
    pub fn new(name: &'static str, ty: TypeDescriptor) -> Self {
        Self { name, ty }
    }

    /// 从类型创建参数描述
    pub fn of<T: ?Sized + 'static>(name: &'static str) -> Self {
        Self::new(name, TypeDescriptor::of::<T>())
    }
}
