//! 装配过程
//!
//! 一次 `init()` 对应一个 [`Wiring`]：先扫描包，再执行组件构造与 Bean 方法调用两轮装配。
//! 两条递归路径共用同一个 [`ResolveContext`]，失败按 [`FailurePolicy`] 处理。

use crate::report::{InitFailure, InitReport};
use crate::store::BeanStore;
use di_abstractions::{ComponentDiscovery, MarkerTarget, ResolveContext, ResolveFrame, ResolveOptions};
use infrastructure_common::{
    markers, Bean, ContainerSettings, DependencyError, DependencyResult, FailurePolicy,
    InvocationError, MethodDescriptor, NamingConventions, ParamDescriptor, TypeDescriptor,
};
use std::any::TypeId;
use std::collections::HashSet;
use tracing::{debug, info, warn};

pub(crate) struct Wiring<'a> {
    discovery: &'a dyn ComponentDiscovery,
    store: &'a mut BeanStore,
    settings: &'a ContainerSettings,
    resolve: ResolveContext,
    /// 本轮发现的全部 Bean 方法（宿主顺序，声明顺序）
    providers: Vec<MethodDescriptor>,
    /// 已调用过（成功或失败）的 Bean 方法
    finished: HashSet<(TypeId, &'static str)>,
    /// 构造失败的组件，本轮不再重试
    failed: HashSet<TypeId>,
    report: InitReport,
}

impl<'a> Wiring<'a> {
    pub(crate) fn new(
        discovery: &'a dyn ComponentDiscovery,
        store: &'a mut BeanStore,
        settings: &'a ContainerSettings,
    ) -> Self {
        Self {
            discovery,
            store,
            settings,
            resolve: ResolveContext::new(ResolveOptions::from(settings)),
            providers: Vec::new(),
            finished: HashSet::new(),
            failed: HashSet::new(),
            report: InitReport::start(),
        }
    }

    pub(crate) fn run(mut self) -> DependencyResult<InitReport> {
        let types = self.scan()?;
        self.add_components(&types)?;
        self.add_beans(&types)?;
        Ok(self.report.finish())
    }

    fn scan(&mut self) -> DependencyResult<Vec<TypeDescriptor>> {
        let package = &self.settings.base_package;
        match self.discovery.list_types_in_package(package) {
            Ok(types) => Ok(types),
            Err(source) => {
                let package = package.clone();
                self.absorb(
                    package.clone(),
                    DependencyError::ScanFailed { package, source },
                )?;
                Ok(Vec::new())
            }
        }
    }

    fn add_components(&mut self, types: &[TypeDescriptor]) -> DependencyResult<()> {
        let components: Vec<TypeDescriptor> = types
            .iter()
            .filter(|ty| self.is_component(ty))
            .copied()
            .collect();

        info!("开始构造组件: {} 个候选类型", components.len());
        for ty in &components {
            self.construct(ty)?;
        }
        info!("组件构造完成: {} 个", self.report.components_constructed);
        Ok(())
    }

    fn add_beans(&mut self, types: &[TypeDescriptor]) -> DependencyResult<()> {
        self.providers = types
            .iter()
            .flat_map(|ty| self.discovery.list_methods_declaring_marker(ty, markers::BEAN))
            .collect();

        let mut hosts: Vec<TypeDescriptor> = Vec::new();
        for method in &self.providers {
            if !hosts.contains(method.declaring_type()) {
                hosts.push(*method.declaring_type());
            }
        }

        info!(
            "开始调用 Bean 方法: {} 个宿主, {} 个方法",
            hosts.len(),
            self.providers.len()
        );
        for host in &hosts {
            self.construct(host)?;
        }

        let providers = self.providers.clone();
        for method in &providers {
            self.provide(method)?;
        }
        info!("Bean 方法调用完成: {} 个", self.report.providers_invoked);
        Ok(())
    }

    /// 构造组件（已注册则直接返回）
    ///
    /// 返回 `Err` 仅表示快速失败模式下需要中止初始化
    fn construct(&mut self, ty: &TypeDescriptor) -> DependencyResult<()> {
        let key = NamingConventions::canonical_key(ty);
        if self.store.contains_type(&key) || self.failed.contains(&ty.id()) {
            return Ok(());
        }

        if let Err(error) = self.resolve.enter(ResolveFrame::Component(*ty)) {
            return self.absorb(ty.to_string(), error);
        }
        let outcome = self.build(ty, &key);
        self.resolve.leave();

        match outcome {
            Ok(()) => Ok(()),
            Err(error) => {
                self.failed.insert(ty.id());
                self.absorb(ty.to_string(), error)
            }
        }
    }

    /// 依次尝试构造函数，第一个可用的胜出
    fn build(&mut self, ty: &TypeDescriptor, key: &str) -> DependencyResult<()> {
        for constructor in self.discovery.list_constructors(ty) {
            let mut usable = true;
            for param in constructor.params() {
                if self.is_component(&param.ty) {
                    self.construct(&param.ty)?;
                } else {
                    usable = false;
                }
            }

            if !usable {
                debug!("跳过构造函数 {}: 存在非组件参数", constructor.name());
                continue;
            }

            let args = self.arguments(constructor.params());
            let bean = self
                .discovery
                .invoke_constructor(&constructor, args)
                .map_err(|source| DependencyError::ComponentCreationFailed {
                    type_name: ty.type_name().to_string(),
                    source,
                })?;

            debug!("构造组件: {} -> {}", ty.type_name(), key);
            self.store.insert_type(key, bean);
            self.report.components_constructed += 1;
            return Ok(());
        }

        Err(DependencyError::NoUsableConstructor {
            type_name: ty.type_name().to_string(),
        })
    }

    /// 调用 Bean 方法（每轮最多一次）
    fn provide(&mut self, method: &MethodDescriptor) -> DependencyResult<()> {
        let host = *method.declaring_type();
        if !self.finished.insert((host.id(), method.name())) {
            return Ok(());
        }

        let subject = format!("{}::{}", host, method.name());
        if let Err(error) = self.resolve.enter(provider_frame(method)) {
            return self.absorb(subject, error);
        }
        let outcome = self.invoke_provider(method);
        self.resolve.leave();

        match outcome {
            Ok(()) => Ok(()),
            Err(error) => self.absorb(subject, error),
        }
    }

    fn invoke_provider(&mut self, method: &MethodDescriptor) -> DependencyResult<()> {
        for param in method.params() {
            if !self.store.contains_type(&NamingConventions::canonical_key(&param.ty)) {
                self.resolve_provided(&param.ty)?;
            }
        }

        let host = *method.declaring_type();
        let args = self.arguments(method.params());
        let result = match self.store.get_by_type(&NamingConventions::canonical_key(&host)) {
            Some(receiver) => self.discovery.invoke_method(method, &receiver, args),
            None => Err(InvocationError::MissingReceiver {
                callable: method.name().to_string(),
            }),
        };

        let bean = result.map_err(|source| DependencyError::ProviderInvocationFailed {
            type_name: host.type_name().to_string(),
            method: method.name().to_string(),
            source,
        })?;

        let type_key = NamingConventions::canonical_key(method.return_type());
        debug!("注册 Bean: {} / {}", method.name(), type_key);
        self.store.insert_provided(method.name(), type_key, bean);
        self.report.providers_invoked += 1;
        Ok(())
    }

    /// 通过返回类型匹配的 Bean 方法解析参数
    fn resolve_provided(&mut self, needed: &TypeDescriptor) -> DependencyResult<()> {
        let candidates: Vec<MethodDescriptor> = self
            .providers
            .iter()
            .filter(|method| method.return_type() == needed)
            .cloned()
            .collect();

        let mut blocked = None;
        for method in &candidates {
            let frame = provider_frame(method);
            if self.settings.detect_cycles && self.resolve.contains(&frame) {
                if blocked.is_none() {
                    blocked = Some(frame);
                }
                continue;
            }
            self.provide(method)?;
        }

        match blocked {
            Some(frame) if !self.store.contains_type(&NamingConventions::canonical_key(needed)) => {
                let error = self.resolve.cycle_error(&frame);
                self.absorb(needed.to_string(), error)
            }
            _ => Ok(()),
        }
    }

    fn arguments(&self, params: &[ParamDescriptor]) -> Vec<Option<Bean>> {
        params
            .iter()
            .map(|param| self.store.get_by_type(&NamingConventions::canonical_key(&param.ty)))
            .collect()
    }

    fn is_component(&self, ty: &TypeDescriptor) -> bool {
        self.discovery
            .has_marker_transitive(MarkerTarget::Type(ty), markers::COMPONENT)
    }

    fn absorb(&mut self, subject: impl Into<String>, error: DependencyError) -> DependencyResult<()> {
        match self.settings.failure_policy {
            FailurePolicy::FailFast => Err(error),
            FailurePolicy::BestEffort => {
                let subject = subject.into();
                warn!("装配失败 {}: {}", subject, error);
                self.report.failures.push(InitFailure { subject, error });
                Ok(())
            }
        }
    }
}

fn provider_frame(method: &MethodDescriptor) -> ResolveFrame {
    ResolveFrame::Provider {
        host: *method.declaring_type(),
        method: method.name(),
    }
}
