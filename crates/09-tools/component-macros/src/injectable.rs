//! #[injectable] 宏实现
//!
//! 从固有 impl 块中收集构造函数与 Bean 方法，生成调用入口并登记到全局类型注册表。
//!
//! - 无接收者、返回 `Self`（或 `Result<Self, E>`）的关联函数是构造函数
//! - 带 `#[bean]` 或 `#[marked(..)]` 的 `&self` 方法是 Bean 方法
//! - `Arc<T>` 参数由容器以 Bean `T` 满足；`Option<Arc<T>>` 参数在 `T` 缺席时得到 `None`
//! - 其余参数原样描述，调用时总是失败

use crate::utils::{
    arc_inner_type, attribute_is, extract_generic_type, is_result_type, is_self_type,
    last_segment_name, marker_names, option_arc_inner_type, registration_block,
};
use proc_macro2::TokenStream;
use quote::{quote, ToTokens};
use syn::punctuated::Punctuated;
use syn::{
    Attribute, FnArg, ImplItem, ImplItemFn, ItemImpl, LitStr, Meta, Pat, Path, Result, ReturnType,
    Signature, Token, Type,
};

/// Bean 方法上的辅助属性
#[derive(Default)]
struct ProviderAttrs {
    /// 自定义注册名
    name: Option<String>,
    /// 方法标记名称表达式
    markers: Vec<TokenStream>,
}

/// 一个参数的描述与取值代码
struct Param {
    descriptor: TokenStream,
    argument: TokenStream,
}

/// 实现 #[injectable] 宏
pub fn injectable_impl(args: TokenStream, input: TokenStream) -> Result<TokenStream> {
    if !args.is_empty() {
        return Err(syn::Error::new_spanned(args, "#[injectable] 不接受参数"));
    }

    let mut item: ItemImpl = syn::parse2(input)?;
    if let Some((_, path, _)) = &item.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[injectable] 只能用于固有 impl 块",
        ));
    }
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &item.generics,
            "#[injectable] 不支持泛型 impl 块",
        ));
    }

    let self_ty = (*item.self_ty).clone();
    let self_name = last_segment_name(&self_ty)
        .ok_or_else(|| syn::Error::new_spanned(&self_ty, "#[injectable] 需要具名类型"))?;

    let mut constructors = Vec::new();
    let mut methods = Vec::new();

    for impl_item in &mut item.items {
        let ImplItem::Fn(function) = impl_item else {
            continue;
        };

        let provider = take_provider_attrs(&mut function.attrs)?;
        match (function.sig.receiver(), provider) {
            (Some(receiver), Some(attrs)) => {
                if !matches!(&*receiver.ty, Type::Reference(reference) if reference.mutability.is_none())
                {
                    return Err(syn::Error::new_spanned(
                        receiver,
                        "Bean 方法必须以 &self 为接收者",
                    ));
                }
                methods.push(provider_method(function, attrs, &self_ty, &self_name)?);
            }
            (None, Some(_)) => {
                return Err(syn::Error::new_spanned(
                    &function.sig,
                    "Bean 方法必须以 &self 为接收者",
                ));
            }
            (None, None) => {
                if let Some(constructor) = constructor(function, &self_ty, &self_name) {
                    constructors.push(constructor);
                }
            }
            (Some(_), None) => {}
        }
    }

    let registration = registration_block(quote! {
        let __ty = ::infrastructure_common::TypeDescriptor::of::<#self_ty>();
        ::infrastructure_common::register_type_entry(
            ::infrastructure_common::TypeEntry::new(__ty)
                #(.with_constructor(#constructors))*
                #(.with_method(#methods))*
        );
    });

    Ok(quote! {
        #item
        #registration
    })
}

/// 取出并移除 `#[bean]` / `#[marked(..)]` 属性
fn take_provider_attrs(attrs: &mut Vec<Attribute>) -> Result<Option<ProviderAttrs>> {
    let mut provider: Option<ProviderAttrs> = None;

    for attr in attrs.iter() {
        if attribute_is(attr, "bean") {
            let entry = provider.get_or_insert_with(ProviderAttrs::default);
            entry.markers.push(quote! { ::infrastructure_common::markers::BEAN });
            if !matches!(attr.meta, Meta::Path(_)) {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("name") {
                        let name: LitStr = meta.value()?.parse()?;
                        entry.name = Some(name.value());
                        Ok(())
                    } else {
                        Err(meta.error("#[bean] 只支持 name = \"...\""))
                    }
                })?;
            }
        } else if attribute_is(attr, "marked") {
            let paths: Vec<Path> = attr
                .parse_args_with(Punctuated::<Path, Token![,]>::parse_terminated)?
                .into_iter()
                .collect();
            if paths.is_empty() {
                return Err(syn::Error::new_spanned(attr, "#[marked] 至少需要一个标记"));
            }
            provider
                .get_or_insert_with(ProviderAttrs::default)
                .markers
                .extend(marker_names(&paths));
        }
    }

    attrs.retain(|attr| !attribute_is(attr, "bean") && !attribute_is(attr, "marked"));
    Ok(provider)
}

/// 构造函数描述；不符合构造函数形状的关联函数返回 `None`
fn constructor(function: &ImplItemFn, self_ty: &Type, self_name: &str) -> Option<TokenStream> {
    let sig = &function.sig;
    if !sig.generics.params.is_empty() || sig.asyncness.is_some() || sig.unsafety.is_some() {
        return None;
    }

    let fallible = match &sig.output {
        ReturnType::Type(_, ty) if is_self_type(ty, self_name) => false,
        ReturnType::Type(_, ty)
            if is_result_type(ty)
                && extract_generic_type(ty).is_some_and(|inner| is_self_type(inner, self_name)) =>
        {
            true
        }
        _ => return None,
    };

    // 含引用或 impl Trait 参数的构造函数无法由容器调用
    let params = params(sig).ok()?;

    let fname = &sig.ident;
    let callable = format!("{self_name}::{fname}");
    let descriptors = params.iter().map(|param| &param.descriptor);
    let arguments = params.iter().map(|param| &param.argument);
    let prelude = arguments_prelude(&params, &callable);
    let call = quote! { <#self_ty>::#fname(#(#arguments),*) };

    let produce = if fallible {
        quote! {
            #call
                .map(::infrastructure_common::into_bean)
                .map_err(|e| ::infrastructure_common::InvocationError::failed(#callable, e))
        }
    } else {
        quote! { Ok(::infrastructure_common::into_bean(#call)) }
    };

    Some(quote! {
        ::infrastructure_common::ConstructorDescriptor::new(
            __ty,
            #callable,
            vec![#(#descriptors),*],
            |__values| {
                #prelude
                #produce
            },
        )
    })
}

/// Bean 方法描述
fn provider_method(
    function: &ImplItemFn,
    attrs: ProviderAttrs,
    self_ty: &Type,
    self_name: &str,
) -> Result<TokenStream> {
    let sig = &function.sig;
    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(&sig.generics, "Bean 方法不支持泛型"));
    }
    if sig.asyncness.is_some() {
        return Err(syn::Error::new_spanned(sig.asyncness, "Bean 方法不支持 async"));
    }

    let ReturnType::Type(_, return_ty) = &sig.output else {
        return Err(syn::Error::new_spanned(sig, "Bean 方法必须有返回值"));
    };

    let (ok_ty, fallible) = match extract_generic_type(return_ty) {
        Some(inner) if is_result_type(return_ty) => (inner, true),
        _ => (&**return_ty, false),
    };
    if matches!(ok_ty, Type::ImplTrait(_)) || matches!(ok_ty, Type::Tuple(tuple) if tuple.elems.is_empty()) {
        return Err(syn::Error::new_spanned(
            ok_ty,
            "Bean 方法的返回类型必须是具体类型",
        ));
    }

    let (bean_ty, wrap) = match arc_inner_type(ok_ty) {
        Some(inner) => (inner, quote! { ::infrastructure_common::arc_into_bean }),
        None => (ok_ty, quote! { ::infrastructure_common::into_bean }),
    };
    if matches!(bean_ty, Type::TraitObject(_)) {
        return Err(syn::Error::new_spanned(bean_ty, "Bean 不支持 trait 对象"));
    }
    let bean_ty = if is_self_type(bean_ty, self_name) {
        self_ty.to_token_stream()
    } else {
        bean_ty.to_token_stream()
    };

    let params = params(sig)?;
    let fname = &sig.ident;
    let bean_name = attrs.name.unwrap_or_else(|| fname.to_string());
    let descriptors = params.iter().map(|param| &param.descriptor);
    let arguments = params.iter().map(|param| &param.argument);
    let prelude = arguments_prelude(&params, &bean_name);
    let markers = attrs.markers;

    let produce = if fallible {
        quote! {
            __result
                .map(#wrap)
                .map_err(|e| ::infrastructure_common::InvocationError::failed(#bean_name, e))
        }
    } else {
        quote! { Ok(#wrap(__result)) }
    };

    Ok(quote! {
        ::infrastructure_common::MethodDescriptor::new(
            __ty,
            #bean_name,
            ::infrastructure_common::TypeDescriptor::of::<#bean_ty>(),
            vec![#(#descriptors),*],
            |__receiver, __values| {
                let __host = ::infrastructure_common::Arguments::receiver::<#self_ty>(__receiver, #bean_name)?;
                #prelude
                let __result = __host.#fname(#(#arguments),*);
                #produce
            },
        )
        #(.with_marker(#markers))*
    })
}

/// 收集参数描述与取值代码
fn params(sig: &Signature) -> Result<Vec<Param>> {
    sig.inputs
        .iter()
        .filter_map(|input| match input {
            FnArg::Typed(pat_type) => Some(pat_type),
            FnArg::Receiver(_) => None,
        })
        .enumerate()
        .map(|(index, pat_type)| {
            let name = match &*pat_type.pat {
                Pat::Ident(pat_ident) => pat_ident.ident.to_string(),
                _ => format!("arg{index}"),
            };
            let ty = &*pat_type.ty;

            if let Some(inner) = arc_inner_type(ty) {
                if matches!(inner, Type::TraitObject(_)) {
                    return Err(syn::Error::new_spanned(ty, "Bean 不支持 trait 对象"));
                }
                return Ok(Param {
                    descriptor: quote! { ::infrastructure_common::ParamDescriptor::of::<#inner>(#name) },
                    argument: quote! { __args.bean::<#inner>(#name)? },
                });
            }

            if let Some(inner) = option_arc_inner_type(ty) {
                return Ok(Param {
                    descriptor: quote! { ::infrastructure_common::ParamDescriptor::of::<#inner>(#name) },
                    argument: quote! { __args.optional_bean::<#inner>(#name)? },
                });
            }

            if matches!(ty, Type::Reference(_) | Type::ImplTrait(_) | Type::Infer(_)) {
                return Err(syn::Error::new_spanned(
                    ty,
                    "参数必须是 Arc<T> 或具名的自有类型",
                ));
            }

            Ok(Param {
                descriptor: quote! { ::infrastructure_common::ParamDescriptor::of::<#ty>(#name) },
                argument: quote! { __args.unsupported::<#ty>(#name)? },
            })
        })
        .collect()
}

fn arguments_prelude(params: &[Param], callable: &str) -> TokenStream {
    if params.is_empty() {
        quote! { let _ = __values; }
    } else {
        quote! {
            let mut __args = ::infrastructure_common::Arguments::new(#callable, __values);
        }
    }
}
