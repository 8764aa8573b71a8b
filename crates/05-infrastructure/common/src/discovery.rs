//! 类型注册表与发现元数据
//!
//! Rust 没有运行时反射，这里用一张编译时生成的注册表代替：每个被标记的类型登记
//! 自己的标记、构造函数与方法，调用入口以闭包保存。注册表可以由
//! `component-macros` 生成的代码在启动时填充，也可以手工构建。

use crate::component::Bean;
use crate::errors::InvocationError;
use crate::metadata::{ParamDescriptor, TypeDescriptor};
use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// 构造函数调用入口
pub type ConstructorFn =
    Arc<dyn Fn(Vec<Option<Bean>>) -> Result<Bean, InvocationError> + Send + Sync>;

/// Bean 方法调用入口（第一个参数为宿主实例）
pub type MethodFn =
    Arc<dyn Fn(&Bean, Vec<Option<Bean>>) -> Result<Bean, InvocationError> + Send + Sync>;

/// 构造函数描述
#[derive(Clone)]
pub struct ConstructorDescriptor {
    declaring_type: TypeDescriptor,
    name: &'static str,
    params: Vec<ParamDescriptor>,
    invoker: ConstructorFn,
}

impl ConstructorDescriptor {
    /// 创建构造函数描述
    pub fn new<F>(
        declaring_type: TypeDescriptor,
        name: &'static str,
        params: Vec<ParamDescriptor>,
        invoker: F,
    ) -> Self
    where
        F: Fn(Vec<Option<Bean>>) -> Result<Bean, InvocationError> + Send + Sync + 'static,
    {
        Self {
            declaring_type,
            name,
            params,
            invoker: Arc::new(invoker),
        }
    }

    /// 所属类型
    pub fn declaring_type(&self) -> &TypeDescriptor {
        &self.declaring_type
    }

    /// 构造函数名称
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 参数列表（声明顺序）
    pub fn params(&self) -> &[ParamDescriptor] {
        &self.params
    }

    /// 以给定实参调用
    pub fn invoke(&self, args: Vec<Option<Bean>>) -> Result<Bean, InvocationError> {
        (self.invoker)(args)
    }
}

impl fmt::Debug for ConstructorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorDescriptor")
            .field("declaring_type", &self.declaring_type)
            .field("name", &self.name)
            .field("params", &self.params)
            .field("invoker", &"<function>")
            .finish()
    }
}

/// 方法描述
#[derive(Clone)]
pub struct MethodDescriptor {
    declaring_type: TypeDescriptor,
    name: &'static str,
    return_type: TypeDescriptor,
    params: Vec<ParamDescriptor>,
    markers: Vec<&'static str>,
    invoker: MethodFn,
}

impl MethodDescriptor {
    /// 创建方法描述
    pub fn new<F>(
        declaring_type: TypeDescriptor,
        name: &'static str,
        return_type: TypeDescriptor,
        params: Vec<ParamDescriptor>,
        invoker: F,
    ) -> Self
    where
        F: Fn(&Bean, Vec<Option<Bean>>) -> Result<Bean, InvocationError> + Send + Sync + 'static,
    {
        Self {
            declaring_type,
            name,
            return_type,
            params,
            markers: Vec::new(),
            invoker: Arc::new(invoker),
        }
    }

    /// 添加方法上的标记
    pub fn with_marker(mut self, marker: &'static str) -> Self {
        if !self.markers.contains(&marker) {
            self.markers.push(marker);
        }
        self
    }

    /// 所属类型
    pub fn declaring_type(&self) -> &TypeDescriptor {
        &self.declaring_type
    }

    /// 方法名称（也是 Bean 的注册名）
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 返回类型
    pub fn return_type(&self) -> &TypeDescriptor {
        &self.return_type
    }

    /// 参数列表（声明顺序，不含宿主）
    pub fn params(&self) -> &[ParamDescriptor] {
        &self.params
    }

    /// 直接声明的标记
    pub fn markers(&self) -> &[&'static str] {
        &self.markers
    }

    /// 在宿主实例上以给定实参调用
    pub fn invoke(&self, receiver: &Bean, args: Vec<Option<Bean>>) -> Result<Bean, InvocationError> {
        (self.invoker)(receiver, args)
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("declaring_type", &self.declaring_type)
            .field("name", &self.name)
            .field("return_type", &self.return_type)
            .field("params", &self.params)
            .field("markers", &self.markers)
            .field("invoker", &"<function>")
            .finish()
    }
}

/// 标记声明
///
/// 标记自身可以带有其他标记，例如 `Service` 带有 `Component`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerDeclaration {
    /// 标记名称
    pub name: &'static str,
    /// 该标记自身带有的标记
    pub markers: Vec<&'static str>,
}

impl MarkerDeclaration {
    /// 创建标记声明
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            markers: Vec::new(),
        }
    }

    /// 添加元标记
    pub fn with_marker(mut self, marker: &'static str) -> Self {
        if !self.markers.contains(&marker) {
            self.markers.push(marker);
        }
        self
    }
}

/// 类型注册条目
#[derive(Debug, Clone)]
pub struct TypeEntry {
    /// 类型描述
    pub descriptor: TypeDescriptor,
    /// 直接声明的标记
    pub markers: Vec<&'static str>,
    /// 构造函数（声明顺序）
    pub constructors: Vec<ConstructorDescriptor>,
    /// 方法（声明顺序）
    pub methods: Vec<MethodDescriptor>,
}

impl TypeEntry {
    /// 创建类型注册条目
    pub fn new(descriptor: TypeDescriptor) -> Self {
        Self {
            descriptor,
            markers: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// 从类型创建注册条目
    pub fn of<T: 'static>() -> Self {
        Self::new(TypeDescriptor::of::<T>())
    }

    /// 添加标记
    pub fn with_marker(mut self, marker: &'static str) -> Self {
        if !self.markers.contains(&marker) {
            self.markers.push(marker);
        }
        self
    }

    /// 添加构造函数
    pub fn with_constructor(mut self, constructor: ConstructorDescriptor) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// 添加方法
    pub fn with_method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    fn merge(&mut self, other: TypeEntry) {
        for marker in other.markers {
            if !self.markers.contains(&marker) {
                self.markers.push(marker);
            }
        }
        self.constructors.extend(other.constructors);
        self.methods.extend(other.methods);
    }
}

/// 类型注册表
///
/// 条目按登记顺序保存；同一类型的多次登记合并为一个条目
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    entries: Vec<TypeEntry>,
    index: HashMap<TypeId, usize>,
    markers: HashMap<&'static str, MarkerDeclaration>,
}

impl TypeCatalog {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记类型条目
    pub fn register(&mut self, entry: TypeEntry) {
        let id = entry.descriptor.id();
        match self.index.get(&id) {
            Some(&position) => self.entries[position].merge(entry),
            None => {
                self.index.insert(id, self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    /// 登记标记声明
    pub fn declare_marker(&mut self, declaration: MarkerDeclaration) {
        match self.markers.get_mut(declaration.name) {
            Some(existing) => {
                for marker in declaration.markers {
                    if !existing.markers.contains(&marker) {
                        existing.markers.push(marker);
                    }
                }
            }
            None => {
                self.markers.insert(declaration.name, declaration);
            }
        }
    }

    /// 链式登记类型条目
    pub fn with_type(mut self, entry: TypeEntry) -> Self {
        self.register(entry);
        self
    }

    /// 链式登记标记声明
    pub fn with_marker(mut self, declaration: MarkerDeclaration) -> Self {
        self.declare_marker(declaration);
        self
    }

    /// 所有条目（登记顺序）
    pub fn entries(&self) -> &[TypeEntry] {
        &self.entries
    }

    /// 按类型ID查找条目
    pub fn entry(&self, id: TypeId) -> Option<&TypeEntry> {
        self.index.get(&id).map(|&position| &self.entries[position])
    }

    /// 按名称查找标记声明
    pub fn marker(&self, name: &str) -> Option<&MarkerDeclaration> {
        self.markers.get(name)
    }

    /// 条目数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 位于指定包内的类型（登记顺序）
    pub fn types_in_package<'a>(&'a self, package: &'a str) -> impl Iterator<Item = &'a TypeEntry> + 'a {
        self.entries
            .iter()
            .filter(move |entry| entry.descriptor.is_in_package(package))
    }

    /// 判断一组直接声明的标记是否（传递地）带有目标标记
    ///
    /// 标记链中出现自引用或环时终止
    pub fn carries_marker(&self, declared: &[&'static str], marker: &str) -> bool {
        let mut visited = HashSet::new();
        self.carries_marker_inner(declared, marker, &mut visited)
    }

    fn carries_marker_inner(
        &self,
        declared: &[&'static str],
        marker: &str,
        visited: &mut HashSet<&'static str>,
    ) -> bool {
        if declared.iter().any(|name| *name == marker) {
            return true;
        }
        declared.iter().any(|name| {
            visited.insert(*name)
                && self
                    .markers
                    .get(name)
                    .is_some_and(|declaration| {
                        self.carries_marker_inner(&declaration.markers, marker, visited)
                    })
        })
    }
}
