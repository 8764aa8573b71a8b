//! Centralized integration tests for di-impl crate
//!
//! 所有类型注册表均手工构建，描述与宏生成的代码一致

use di_abstractions::BeanRegistry;
use di_impl::{ApplicationContext, CatalogDiscovery, ContextState};
use infrastructure_common::{
    into_bean, markers, Arguments, ContainerSettings, ConstructorDescriptor, DependencyError,
    FailurePolicy, InvocationError, MarkerDeclaration, MethodDescriptor, ParamDescriptor,
    TypeCatalog, TypeDescriptor, TypeEntry,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn context_with(catalog: TypeCatalog, policy: FailurePolicy) -> ApplicationContext {
    ApplicationContext::with_settings(
        ContainerSettings::new(module_path!()).with_failure_policy(policy),
        Arc::new(CatalogDiscovery::new(catalog)),
    )
}

fn unit_constructor<T: Default + Send + Sync + 'static>(name: &'static str) -> ConstructorDescriptor {
    ConstructorDescriptor::new(TypeDescriptor::of::<T>(), name, Vec::new(), |_| {
        Ok(into_bean(T::default()))
    })
}

fn component<T: 'static>() -> TypeEntry {
    TypeEntry::of::<T>().with_marker(markers::COMPONENT)
}

// ---------------------------------------------------------------------------
// Repository / Service
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Repository;

#[derive(Debug)]
struct Service {
    repository: Arc<Repository>,
}

fn repository_service_catalog() -> TypeCatalog {
    TypeCatalog::new()
        .with_type(
            component::<Service>().with_constructor(ConstructorDescriptor::new(
                TypeDescriptor::of::<Service>(),
                "Service::new",
                vec![ParamDescriptor::of::<Repository>("repository")],
                |args| {
                    let mut args = Arguments::new("Service::new", args);
                    Ok(into_bean(Service {
                        repository: args.bean::<Repository>("repository")?,
                    }))
                },
            )),
        )
        .with_type(component::<Repository>().with_constructor(unit_constructor::<Repository>("Repository::new")))
}

#[test]
fn test_service_shares_repository_instance() {
    let mut context = context_with(repository_service_catalog(), FailurePolicy::BestEffort);
    let report = context.init().unwrap();

    assert!(report.is_clean());
    assert_eq!(report.components_constructed, 2);
    assert_eq!(context.state(), ContextState::Ready);

    let service = context.get_bean::<Service>("service").unwrap();
    let repository = context.get_bean::<Repository>("repository").unwrap();
    assert!(Arc::ptr_eq(&service.repository, &repository));
}

#[test]
fn test_lookup_is_idempotent() {
    let mut context = context_with(repository_service_catalog(), FailurePolicy::BestEffort);
    context.init().unwrap();

    let first = context.lookup("service").unwrap();
    let second = context.lookup("service").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(context.lookup("Service").is_none());
    assert!(context.lookup("missing").is_none());
}

// ---------------------------------------------------------------------------
// 构造函数选择
// ---------------------------------------------------------------------------

struct Port {
    value: u32,
}

#[test]
fn test_primitive_parameter_rejects_constructor() {
    let catalog = TypeCatalog::new().with_type(component::<Port>().with_constructor(
        ConstructorDescriptor::new(
            TypeDescriptor::of::<Port>(),
            "Port::new",
            vec![ParamDescriptor::of::<u32>("value")],
            |args| {
                let mut args = Arguments::new("Port::new", args);
                Ok(into_bean(Port {
                    value: args.unsupported::<u32>("value")?,
                }))
            },
        ),
    ));

    let mut context = context_with(catalog, FailurePolicy::BestEffort);
    let report = context.init().unwrap();

    assert!(context.lookup("port").is_none());
    assert!(matches!(
        report.failure_for("Port").map(|failure| &failure.error),
        Some(DependencyError::NoUsableConstructor { .. })
    ));
}

#[test]
fn test_first_usable_constructor_wins() {
    fn port_constructor(name: &'static str, value: u32) -> ConstructorDescriptor {
        ConstructorDescriptor::new(TypeDescriptor::of::<Port>(), name, Vec::new(), move |_| {
            Ok(into_bean(Port { value }))
        })
    }

    let rejected = ConstructorDescriptor::new(
        TypeDescriptor::of::<Port>(),
        "Port::with_value",
        vec![ParamDescriptor::of::<u32>("value")],
        |_| Ok(into_bean(Port { value: 0 })),
    );

    let catalog = TypeCatalog::new().with_type(
        component::<Port>()
            .with_constructor(rejected)
            .with_constructor(port_constructor("Port::first", 1))
            .with_constructor(port_constructor("Port::second", 2)),
    );

    let mut context = context_with(catalog, FailurePolicy::BestEffort);
    context.init().unwrap();

    assert_eq!(context.get_bean::<Port>("port").unwrap().value, 1);
}

#[derive(Debug, Default)]
struct Unbuildable;

struct Consumer {
    _dependency: Arc<Unbuildable>,
}

#[test]
fn test_failed_dependency_is_passed_as_absent_argument() {
    let catalog = TypeCatalog::new()
        .with_type(component::<Unbuildable>())
        .with_type(component::<Consumer>().with_constructor(ConstructorDescriptor::new(
            TypeDescriptor::of::<Consumer>(),
            "Consumer::new",
            vec![ParamDescriptor::of::<Unbuildable>("dependency")],
            |args| {
                let mut args = Arguments::new("Consumer::new", args);
                Ok(into_bean(Consumer {
                    _dependency: args.bean::<Unbuildable>("dependency")?,
                }))
            },
        )));

    let mut context = context_with(catalog, FailurePolicy::BestEffort);
    let report = context.init().unwrap();

    assert!(context.is_empty());
    assert_eq!(report.failures.len(), 2);
    assert_eq!(
        report.failure_for("Consumer").map(|failure| &failure.error),
        Some(&DependencyError::ComponentCreationFailed {
            type_name: std::any::type_name::<Consumer>().to_string(),
            source: InvocationError::missing_argument("Consumer::new", "dependency"),
        })
    );
}

// ---------------------------------------------------------------------------
// 标记链
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Mailer;

#[derive(Debug, Default)]
struct Unmarked;

#[test]
fn test_marker_of_marker_is_managed() {
    let catalog = TypeCatalog::new()
        .with_marker(MarkerDeclaration::new("Service").with_marker("Stereotype"))
        .with_marker(MarkerDeclaration::new("Stereotype").with_marker(markers::COMPONENT))
        .with_type(
            TypeEntry::of::<Mailer>()
                .with_marker("Service")
                .with_constructor(unit_constructor::<Mailer>("Mailer::new")),
        )
        .with_type(TypeEntry::of::<Unmarked>().with_constructor(unit_constructor::<Unmarked>("Unmarked::new")));

    let mut context = context_with(catalog, FailurePolicy::BestEffort);
    context.init().unwrap();

    assert!(context.get_bean::<Mailer>("mailer").is_some());
    assert!(context.lookup("unmarked").is_none());
}

// ---------------------------------------------------------------------------
// Bean 方法
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct AppConfig;

#[derive(Debug)]
struct Config {
    url: String,
}

#[derive(Debug)]
struct Client {
    config: Arc<Config>,
}

fn build_config_method(calls: &'static AtomicUsize) -> MethodDescriptor {
    MethodDescriptor::new(
        TypeDescriptor::of::<AppConfig>(),
        "buildConfig",
        TypeDescriptor::of::<Config>(),
        Vec::new(),
        move |receiver, _| {
            Arguments::receiver::<AppConfig>(receiver, "buildConfig")?;
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(into_bean(Config {
                url: "postgres://localhost".to_string(),
            }))
        },
    )
    .with_marker(markers::BEAN)
}

fn client_method() -> MethodDescriptor {
    MethodDescriptor::new(
        TypeDescriptor::of::<AppConfig>(),
        "client",
        TypeDescriptor::of::<Client>(),
        vec![ParamDescriptor::of::<Config>("config")],
        |_, args| {
            let mut args = Arguments::new("client", args);
            Ok(into_bean(Client {
                config: args.bean::<Config>("config")?,
            }))
        },
    )
    .with_marker(markers::BEAN)
}

#[test]
fn test_provider_registers_under_name_and_type_key() {
    static CALLS: AtomicUsize = AtomicUsize::new(0);
    let catalog = TypeCatalog::new().with_type(
        component::<AppConfig>()
            .with_constructor(unit_constructor::<AppConfig>("AppConfig::new"))
            .with_method(build_config_method(&CALLS)),
    );

    let mut context = context_with(catalog, FailurePolicy::BestEffort);
    let report = context.init().unwrap();
    assert_eq!(report.providers_invoked, 1);

    let by_name = context.get_bean::<Config>("buildConfig").unwrap();
    let by_type = context.get_bean::<Config>("config").unwrap();
    assert!(Arc::ptr_eq(&by_name, &by_type));
    assert_eq!(by_name.url, "postgres://localhost");
    assert!(context.get_bean::<AppConfig>("appConfig").is_some());
}

#[test]
fn test_provider_parameter_resolved_through_other_provider_once() {
    static CALLS: AtomicUsize = AtomicUsize::new(0);

    // client 声明在 buildConfig 之前，Config 只能经由返回类型解析
    let catalog = TypeCatalog::new().with_type(
        component::<AppConfig>()
            .with_constructor(unit_constructor::<AppConfig>("AppConfig::new"))
            .with_method(client_method())
            .with_method(build_config_method(&CALLS)),
    );

    let mut context = context_with(catalog, FailurePolicy::FailFast);
    let report = context.init().unwrap();

    assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    assert_eq!(report.providers_invoked, 2);

    let client = context.get_bean::<Client>("client").unwrap();
    let config = context.get_bean::<Config>("config").unwrap();
    assert!(Arc::ptr_eq(&client.config, &config));
}

#[derive(Debug)]
struct Foo(u32);

#[derive(Debug)]
struct FooUser {
    foo: Arc<Foo>,
}

fn foo_method(name: &'static str, value: u32) -> MethodDescriptor {
    MethodDescriptor::new(
        TypeDescriptor::of::<AppConfig>(),
        name,
        TypeDescriptor::of::<Foo>(),
        Vec::new(),
        move |_, _| Ok(into_bean(Foo(value))),
    )
    .with_marker(markers::BEAN)
}

#[test]
fn test_last_provider_of_shared_return_type_owns_type_key() {
    let user = MethodDescriptor::new(
        TypeDescriptor::of::<AppConfig>(),
        "user",
        TypeDescriptor::of::<FooUser>(),
        vec![ParamDescriptor::of::<Foo>("foo")],
        |_, args| {
            let foo = Arguments::new("user", args).bean::<Foo>("foo")?;
            Ok(into_bean(FooUser { foo }))
        },
    )
    .with_marker(markers::BEAN);

    let catalog = TypeCatalog::new().with_type(
        component::<AppConfig>()
            .with_constructor(unit_constructor::<AppConfig>("AppConfig::new"))
            .with_method(foo_method("first", 1))
            .with_method(foo_method("second", 2))
            .with_method(user),
    );

    let mut context = context_with(catalog, FailurePolicy::FailFast);
    let report = context.init().unwrap();
    assert_eq!(report.providers_invoked, 3);
    assert!(report.is_clean());

    let first = context.get_bean::<Foo>("first").unwrap();
    let second = context.get_bean::<Foo>("second").unwrap();
    let by_type = context.get_bean::<Foo>("foo").unwrap();
    assert_eq!(first.0, 1);
    assert!(Arc::ptr_eq(&by_type, &second));
    assert!(!Arc::ptr_eq(&by_type, &first));

    let user = context.get_bean::<FooUser>("user").unwrap();
    assert!(Arc::ptr_eq(&user.foo, &second));
}

#[test]
fn test_methods_without_bean_marker_are_not_invoked() {
    let plain = MethodDescriptor::new(
        TypeDescriptor::of::<AppConfig>(),
        "helper",
        TypeDescriptor::of::<Config>(),
        Vec::new(),
        |_, _| Ok(into_bean(Config { url: String::new() })),
    );
    let catalog = TypeCatalog::new().with_type(
        component::<AppConfig>()
            .with_constructor(unit_constructor::<AppConfig>("AppConfig::new"))
            .with_method(plain),
    );

    let mut context = context_with(catalog, FailurePolicy::BestEffort);
    let report = context.init().unwrap();

    assert_eq!(report.providers_invoked, 0);
    assert!(context.lookup("helper").is_none());
    assert!(context.lookup("config").is_none());
}

#[test]
fn test_provider_on_unconstructible_host_fails() {
    static CALLS: AtomicUsize = AtomicUsize::new(0);
    let catalog =
        TypeCatalog::new().with_type(TypeEntry::of::<AppConfig>().with_method(build_config_method(&CALLS)));

    let mut context = context_with(catalog, FailurePolicy::BestEffort);
    let report = context.init().unwrap();

    assert!(context.lookup("buildConfig").is_none());
    assert_eq!(CALLS.load(Ordering::SeqCst), 0);
    assert!(matches!(
        report.failure_for("AppConfig::buildConfig").map(|failure| &failure.error),
        Some(DependencyError::ProviderInvocationFailed {
            source: InvocationError::MissingReceiver { .. },
            ..
        })
    ));
}

#[derive(Debug, Default)]
struct Settings;

#[test]
fn test_provider_name_shadows_type_key() {
    let settings_method = MethodDescriptor::new(
        TypeDescriptor::of::<AppConfig>(),
        "settings",
        TypeDescriptor::of::<Config>(),
        Vec::new(),
        |_, _| Ok(into_bean(Config { url: "provided".to_string() })),
    )
    .with_marker(markers::BEAN);

    let catalog = TypeCatalog::new()
        .with_type(component::<Settings>().with_constructor(unit_constructor::<Settings>("Settings::new")))
        .with_type(
            component::<AppConfig>()
                .with_constructor(unit_constructor::<AppConfig>("AppConfig::new"))
                .with_method(settings_method),
        );

    let mut context = context_with(catalog, FailurePolicy::BestEffort);
    context.init().unwrap();

    assert!(context.get_bean::<Config>("settings").is_some());
    assert!(context.get_bean::<Settings>("settings").is_none());
}

// ---------------------------------------------------------------------------
// 循环依赖
// ---------------------------------------------------------------------------

struct Left {
    _right: Arc<Right>,
}

struct Right {
    _left: Arc<Left>,
}

fn cyclic_components() -> TypeCatalog {
    TypeCatalog::new()
        .with_type(component::<Left>().with_constructor(ConstructorDescriptor::new(
            TypeDescriptor::of::<Left>(),
            "Left::new",
            vec![ParamDescriptor::of::<Right>("right")],
            |args| {
                let mut args = Arguments::new("Left::new", args);
                Ok(into_bean(Left {
                    _right: args.bean::<Right>("right")?,
                }))
            },
        )))
        .with_type(component::<Right>().with_constructor(ConstructorDescriptor::new(
            TypeDescriptor::of::<Right>(),
            "Right::new",
            vec![ParamDescriptor::of::<Left>("left")],
            |args| {
                let mut args = Arguments::new("Right::new", args);
                Ok(into_bean(Right {
                    _left: args.bean::<Left>("left")?,
                }))
            },
        )))
}

#[test]
fn test_constructor_cycle_is_reported() {
    let mut context = context_with(cyclic_components(), FailurePolicy::BestEffort);
    let report = context.init().unwrap();

    assert!(context.is_empty());
    assert_eq!(
        report.failures[0].error,
        DependencyError::CircularDependency {
            dependency_chain: "Left -> Right -> Left".to_string(),
        }
    );
    assert!(report.failure_for("Right").is_some());
}

#[test]
fn test_constructor_cycle_fails_fast() {
    let mut context = context_with(cyclic_components(), FailurePolicy::FailFast);

    let error = context.init().unwrap_err();
    assert!(matches!(error, DependencyError::CircularDependency { .. }));
    assert_eq!(context.state(), ContextState::Failed);
}

#[derive(Debug, Default)]
struct Loops;

struct LeftBean;
struct RightBean;

#[test]
fn test_provider_cycle_is_reported() {
    let left = MethodDescriptor::new(
        TypeDescriptor::of::<Loops>(),
        "left",
        TypeDescriptor::of::<LeftBean>(),
        vec![ParamDescriptor::of::<RightBean>("right")],
        |_, args| {
            Arguments::new("left", args).bean::<RightBean>("right")?;
            Ok(into_bean(LeftBean))
        },
    )
    .with_marker(markers::BEAN);
    let right = MethodDescriptor::new(
        TypeDescriptor::of::<Loops>(),
        "right",
        TypeDescriptor::of::<RightBean>(),
        vec![ParamDescriptor::of::<LeftBean>("left")],
        |_, args| {
            Arguments::new("right", args).bean::<LeftBean>("left")?;
            Ok(into_bean(RightBean))
        },
    )
    .with_marker(markers::BEAN);

    let catalog = TypeCatalog::new().with_type(
        component::<Loops>()
            .with_constructor(unit_constructor::<Loops>("Loops::new"))
            .with_method(left)
            .with_method(right),
    );

    let mut context = context_with(catalog.clone(), FailurePolicy::BestEffort);
    let report = context.init().unwrap();
    assert_eq!(
        report.failure_for("LeftBean").map(|failure| &failure.error),
        Some(&DependencyError::CircularDependency {
            dependency_chain: "Loops::left -> Loops::right -> Loops::left".to_string(),
        })
    );
    assert!(context.lookup("left").is_none());
    assert!(context.lookup("right").is_none());

    let mut context = context_with(catalog, FailurePolicy::FailFast);
    assert!(matches!(
        context.init(),
        Err(DependencyError::CircularDependency { .. })
    ));
}

#[test]
fn test_provider_decorating_its_own_return_type_is_not_a_cycle() {
    static CALLS: AtomicUsize = AtomicUsize::new(0);
    let wrap = MethodDescriptor::new(
        TypeDescriptor::of::<AppConfig>(),
        "wrapped",
        TypeDescriptor::of::<Config>(),
        vec![ParamDescriptor::of::<Config>("inner")],
        |_, args| {
            let inner = Arguments::new("wrapped", args).bean::<Config>("inner")?;
            Ok(into_bean(Config {
                url: format!("{}?pool=8", inner.url),
            }))
        },
    )
    .with_marker(markers::BEAN);

    let catalog = TypeCatalog::new().with_type(
        component::<AppConfig>()
            .with_constructor(unit_constructor::<AppConfig>("AppConfig::new"))
            .with_method(wrap)
            .with_method(build_config_method(&CALLS)),
    );

    let mut context = context_with(catalog, FailurePolicy::FailFast);
    context.init().unwrap();

    assert_eq!(
        context.get_bean::<Config>("wrapped").unwrap().url,
        "postgres://localhost?pool=8"
    );
    // 后完成的注册覆盖类型键
    assert_eq!(
        context.get_bean::<Config>("config").unwrap().url,
        "postgres://localhost?pool=8"
    );
}

struct Level1;
struct Level2;
#[derive(Default)]
struct Level3;

#[test]
fn test_max_depth_is_enforced() {
    fn chained<T: Send + Sync + 'static, D: Send + Sync + 'static>(
        name: &'static str,
        make: fn() -> T,
    ) -> TypeEntry {
        component::<T>().with_constructor(ConstructorDescriptor::new(
            TypeDescriptor::of::<T>(),
            name,
            vec![ParamDescriptor::of::<D>("next")],
            move |args| {
                Arguments::new(name, args).bean::<D>("next")?;
                Ok(into_bean(make()))
            },
        ))
    }

    let catalog = TypeCatalog::new()
        .with_type(chained::<Level1, Level2>("Level1::new", || Level1))
        .with_type(chained::<Level2, Level3>("Level2::new", || Level2))
        .with_type(component::<Level3>().with_constructor(unit_constructor::<Level3>("Level3::new")));

    let mut context = ApplicationContext::with_settings(
        ContainerSettings::new(module_path!())
            .with_failure_policy(FailurePolicy::FailFast)
            .with_cycle_detection(false)
            .with_max_depth(2),
        Arc::new(CatalogDiscovery::new(catalog)),
    );

    assert!(matches!(
        context.init(),
        Err(DependencyError::DependencyResolutionFailed { .. })
    ));
}

// ---------------------------------------------------------------------------
// 扫描与重新初始化
// ---------------------------------------------------------------------------

#[test]
fn test_unknown_package_reports_scan_failure() {
    let mut context = ApplicationContext::with_discovery(
        "no_such_package::anywhere",
        Arc::new(CatalogDiscovery::new(repository_service_catalog())),
    );
    let report = context.init().unwrap();

    assert!(context.is_empty());
    assert!(matches!(
        report.failures.as_slice(),
        [failure] if matches!(failure.error, DependencyError::ScanFailed { .. })
    ));
}

#[test]
fn test_dotted_package_is_accepted() {
    let package = module_path!().replace("::", ".");
    let mut context = ApplicationContext::with_discovery(
        package,
        Arc::new(CatalogDiscovery::new(repository_service_catalog())),
    );

    assert!(context.init().unwrap().is_clean());
    assert!(context.contains("service"));
}

#[test]
fn test_reinit_rebuilds_from_empty() {
    let mut context = context_with(repository_service_catalog(), FailurePolicy::BestEffort);

    context.init().unwrap();
    let first = context.lookup("repository").unwrap();
    context.init().unwrap();
    let second = context.lookup("repository").unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(context.bean_names(), vec!["repository", "service"]);
}

#[test]
fn test_context_is_shareable_across_threads() {
    let mut context = context_with(repository_service_catalog(), FailurePolicy::BestEffort);
    context.init().unwrap();
    let context = Arc::new(context);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let context = Arc::clone(&context);
            std::thread::spawn(move || context.get_bean::<Service>("service").is_some())
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
