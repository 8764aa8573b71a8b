//! 宏工具函数

use proc_macro2::TokenStream;
use quote::quote;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{Attribute, Path, Result, Token, Type};

/// 类型路径的最后一段名称
pub fn last_segment_name(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(type_path) if type_path.qself.is_none() => type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string()),
        Type::Group(group) => last_segment_name(&group.elem),
        Type::Paren(paren) => last_segment_name(&paren.elem),
        _ => None,
    }
}

/// 从类型中提取第一个泛型参数
pub fn extract_generic_type(ty: &Type) -> Option<&Type> {
    match ty {
        Type::Path(type_path) => {
            let segment = type_path.path.segments.last()?;
            match &segment.arguments {
                syn::PathArguments::AngleBracketed(args) => match args.args.first() {
                    Some(syn::GenericArgument::Type(inner_type)) => Some(inner_type),
                    _ => None,
                },
                _ => None,
            }
        }
        Type::Group(group) => extract_generic_type(&group.elem),
        _ => None,
    }
}

/// 检查类型是否为 Result<T, E>
pub fn is_result_type(ty: &Type) -> bool {
    last_segment_name(ty).as_deref() == Some("Result") && extract_generic_type(ty).is_some()
}

/// 检查类型是否为 Arc<T>，是则返回 T
pub fn arc_inner_type(ty: &Type) -> Option<&Type> {
    if last_segment_name(ty).as_deref() == Some("Arc") {
        extract_generic_type(ty)
    } else {
        None
    }
}

/// 检查类型是否为 Option<Arc<T>>，是则返回 T
pub fn option_arc_inner_type(ty: &Type) -> Option<&Type> {
    if last_segment_name(ty).as_deref() == Some("Option") {
        extract_generic_type(ty).and_then(arc_inner_type)
    } else {
        None
    }
}

/// 检查类型是否指代 impl 块的自身类型（`Self` 或同名类型）
pub fn is_self_type(ty: &Type, self_name: &str) -> bool {
    match ty {
        Type::Path(type_path) if type_path.path.is_ident("Self") => true,
        Type::Path(type_path) => type_path.path.segments.last().is_some_and(|segment| {
            segment.ident == self_name && segment.arguments.is_empty()
        }),
        Type::Group(group) => is_self_type(&group.elem, self_name),
        _ => false,
    }
}

/// 解析以逗号分隔的标记路径列表
pub fn parse_marker_paths(tokens: TokenStream) -> Result<Vec<Path>> {
    let paths = Punctuated::<Path, Token![,]>::parse_terminated.parse2(tokens)?;
    Ok(paths.into_iter().collect())
}

/// 标记路径对应的标记名称表达式
pub fn marker_names(paths: &[Path]) -> Vec<TokenStream> {
    paths
        .iter()
        .map(|path| quote! { <#path as ::infrastructure_common::Marker>::NAME })
        .collect()
}

/// 属性是否为指定名称（只看最后一段，允许 `component_macros::bean` 写法）
pub fn attribute_is(attr: &Attribute, name: &str) -> bool {
    attr.path()
        .segments
        .last()
        .is_some_and(|segment| segment.ident == name)
}

/// 包装在匿名常量中的启动注册函数
pub fn registration_block(body: TokenStream) -> TokenStream {
    quote! {
        const _: () = {
            #[::ctor::ctor]
            fn __lorn_ioc_register() {
                #body
            }
        };
    }
}
