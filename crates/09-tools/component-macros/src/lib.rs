//! # Component Macros
//!
//! 这个 crate 提供了在编译时生成类型注册表的过程宏，代替运行时反射。
//!
//! ## 核心宏
//!
//! - [`component`] - 登记组件类型
//! - [`marked`] - 以任意标记登记类型
//! - [`marker`] - 声明标记（可带有其他标记）
//! - [`injectable`] - 登记构造函数与 Bean 方法
//! - [`bean`] - 在 `#[injectable]` 中标出 Bean 方法
//!
//! 生成的代码通过 `ctor` 在程序启动时写入 `infrastructure_common` 的全局注册表，
//! 使用方需要同时依赖 `infrastructure-common` 与 `ctor`。
//!
//! ## 使用示例
//!
//! ```ignore
//! use component_macros::{bean, component, injectable};
//! use std::sync::Arc;
//!
//! #[component]
//! pub struct Repository;
//!
//! #[injectable]
//! impl Repository {
//!     pub fn new() -> Self {
//!         Self
//!     }
//! }
//!
//! #[component]
//! pub struct AppConfig {
//!     repository: Arc<Repository>,
//! }
//!
//! #[injectable]
//! impl AppConfig {
//!     pub fn new(repository: Arc<Repository>) -> Self {
//!         Self { repository }
//!     }
//!
//!     #[bean(name = "buildConfig")]
//!     pub fn build_config(&self) -> Config {
//!         Config::default()
//!     }
//! }
//! ```

use proc_macro::TokenStream;

mod component;
mod injectable;
mod utils;

// Re-exports are not allowed in proc-macro crates

/// 组件登记宏
///
/// 登记结构体（或枚举）并带上 `Component` 标记，容器会自动构造它。
/// 参数为额外的标记类型路径。
///
/// # 示例
///
/// ```ignore
/// #[component]
/// pub struct Repository;
///
/// #[component(Audited)]
/// pub struct UserService;
/// ```
#[proc_macro_attribute]
pub fn component(args: TokenStream, input: TokenStream) -> TokenStream {
    component::component_impl(args.into(), input.into())
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// 标记登记宏
///
/// 用于类型时以给定标记登记类型；用于 `#[injectable]` 中的 `&self` 方法时将其作为 Bean 方法，
/// 只要标记传递地带有 `Bean`。
///
/// # 示例
///
/// ```ignore
/// #[marked(Service)]
/// pub struct Mailer;
/// ```
#[proc_macro_attribute]
pub fn marked(args: TokenStream, input: TokenStream) -> TokenStream {
    component::marked_impl(args.into(), input.into())
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// 标记声明宏
///
/// 单元结构体成为一个标记，名称即结构体名称；参数为该标记自身带有的标记。
///
/// # 示例
///
/// ```ignore
/// use infrastructure_common::markers::Component;
///
/// #[marker(Component)]
/// pub struct Service;
/// ```
#[proc_macro_attribute]
pub fn marker(args: TokenStream, input: TokenStream) -> TokenStream {
    component::marker_impl(args.into(), input.into())
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// 构造函数与 Bean 方法登记宏
///
/// 用于固有 impl 块。构造函数按声明顺序登记，容器选择第一个所有参数都是组件的构造函数。
#[proc_macro_attribute]
pub fn injectable(args: TokenStream, input: TokenStream) -> TokenStream {
    injectable::injectable_impl(args.into(), input.into())
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Bean 方法标记
///
/// 只在 `#[injectable]` impl 块中有意义，由 `#[injectable]` 处理并移除。
/// 可选参数 `name = "..."` 覆盖默认的注册名（方法名）。
#[proc_macro_attribute]
pub fn bean(_args: TokenStream, input: TokenStream) -> TokenStream {
    let mut output = syn::Error::new(
        proc_macro2::Span::call_site(),
        "#[bean] 必须位于 #[injectable] impl 块中",
    )
    .into_compile_error();
    output.extend(proc_macro2::TokenStream::from(input));
    output.into()
}
