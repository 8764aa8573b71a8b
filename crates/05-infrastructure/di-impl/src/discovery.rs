//! 基于类型注册表的组件发现器

use di_abstractions::{ComponentDiscovery, MarkerTarget};
use infrastructure_common::{
    global_catalog_snapshot, Bean, ComponentError, ConstructorDescriptor, InvocationError,
    MethodDescriptor, NamingConventions, TypeCatalog, TypeDescriptor,
};
use tracing::debug;

/// 基于 [`TypeCatalog`] 的组件发现器
///
/// 持有注册表快照，扫描与调用期间不访问全局锁
#[derive(Debug, Clone, Default)]
pub struct CatalogDiscovery {
    catalog: TypeCatalog,
}

impl CatalogDiscovery {
    /// 以给定注册表创建发现器
    pub fn new(catalog: TypeCatalog) -> Self {
        Self { catalog }
    }

    /// 以全局注册表的当前快照创建发现器
    pub fn from_global() -> Self {
        Self::new(global_catalog_snapshot())
    }

    /// 底层注册表
    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    fn declared_markers(&self, ty: &TypeDescriptor) -> &[&'static str] {
        self.catalog
            .entry(ty.id())
            .map(|entry| entry.markers.as_slice())
            .unwrap_or(&[])
    }

    fn check_arity(
        callable: &str,
        expected: usize,
        args: &[Option<Bean>],
    ) -> Result<(), InvocationError> {
        if args.len() == expected {
            Ok(())
        } else {
            Err(InvocationError::ArgumentCountMismatch {
                callable: callable.to_string(),
                expected,
                actual: args.len(),
            })
        }
    }
}

impl ComponentDiscovery for CatalogDiscovery {
    fn list_types_in_package(&self, package: &str) -> Result<Vec<TypeDescriptor>, ComponentError> {
        let package = NamingConventions::normalize_package(package)?;

        let types: Vec<TypeDescriptor> = self
            .catalog
            .types_in_package(&package)
            .map(|entry| entry.descriptor)
            .collect();

        if types.is_empty() {
            return Err(ComponentError::scan_error(format!(
                "包中没有已注册的类型: {package}"
            )));
        }

        debug!("包 {} 中发现 {} 个类型", package, types.len());
        Ok(types)
    }

    fn has_marker_transitive(&self, target: MarkerTarget<'_>, marker: &str) -> bool {
        match target {
            MarkerTarget::Type(ty) => self.catalog.carries_marker(self.declared_markers(ty), marker),
            MarkerTarget::Method(method) => self.catalog.carries_marker(method.markers(), marker),
            MarkerTarget::Marker(name) => {
                name == marker
                    || self
                        .catalog
                        .marker(name)
                        .is_some_and(|declaration| {
                            self.catalog.carries_marker(&declaration.markers, marker)
                        })
            }
        }
    }

    fn list_methods_declaring_marker(
        &self,
        ty: &TypeDescriptor,
        marker: &str,
    ) -> Vec<MethodDescriptor> {
        self.catalog
            .entry(ty.id())
            .map(|entry| {
                entry
                    .methods
                    .iter()
                    .filter(|method| self.catalog.carries_marker(method.markers(), marker))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn list_constructors(&self, ty: &TypeDescriptor) -> Vec<ConstructorDescriptor> {
        self.catalog
            .entry(ty.id())
            .map(|entry| entry.constructors.clone())
            .unwrap_or_default()
    }

    fn invoke_constructor(
        &self,
        constructor: &ConstructorDescriptor,
        args: Vec<Option<Bean>>,
    ) -> Result<Bean, InvocationError> {
        Self::check_arity(constructor.name(), constructor.params().len(), &args)?;
        constructor.invoke(args)
    }

    fn invoke_method(
        &self,
        method: &MethodDescriptor,
        receiver: &Bean,
        args: Vec<Option<Bean>>,
    ) -> Result<Bean, InvocationError> {
        Self::check_arity(method.name(), method.params().len(), &args)?;
        method.invoke(receiver, args)
    }

    fn name(&self) -> &str {
        "catalog"
    }
}
