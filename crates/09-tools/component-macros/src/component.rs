//! 类型与标记注册宏实现

use crate::utils::{marker_names, parse_marker_paths, registration_block};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Fields, Item, ItemStruct, Result};

/// 被注册的类型项（结构体或枚举）
fn registrable_item(input: TokenStream, macro_name: &str) -> Result<(Item, syn::Ident)> {
    let item: Item = syn::parse2(input)?;
    let (ident, generics) = match &item {
        Item::Struct(item) => (item.ident.clone(), &item.generics),
        Item::Enum(item) => (item.ident.clone(), &item.generics),
        other => {
            return Err(syn::Error::new_spanned(
                other,
                format!("#[{macro_name}] 只能用于结构体或枚举"),
            ))
        }
    };

    if !generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            generics,
            format!("#[{macro_name}] 不支持泛型类型"),
        ));
    }

    Ok((item, ident))
}

/// 实现 #[component] 宏
///
/// 登记类型并带上组件标记，参数中的标记一并登记
pub fn component_impl(args: TokenStream, input: TokenStream) -> Result<TokenStream> {
    let markers = parse_marker_paths(args)?;
    let (item, ident) = registrable_item(input, "component")?;
    let names = marker_names(&markers);

    let registration = registration_block(quote! {
        ::infrastructure_common::register_type_entry(
            ::infrastructure_common::TypeEntry::of::<#ident>()
                .with_marker(::infrastructure_common::markers::COMPONENT)
                #(.with_marker(#names))*
        );
    });

    Ok(quote! {
        #item
        #registration
    })
}

/// 实现 #[marked(..)] 宏（用于类型）
pub fn marked_impl(args: TokenStream, input: TokenStream) -> Result<TokenStream> {
    let markers = parse_marker_paths(args.clone())?;
    if markers.is_empty() {
        return Err(syn::Error::new_spanned(
            args,
            "#[marked] 至少需要一个标记",
        ));
    }

    let item: Item = syn::parse2(input.clone())?;
    if let Item::Fn(function) = &item {
        return Err(syn::Error::new_spanned(
            &function.sig,
            "#[marked] 用于方法时必须位于 #[injectable] impl 块中",
        ));
    }

    let (item, ident) = registrable_item(input, "marked")?;
    let names = marker_names(&markers);

    let registration = registration_block(quote! {
        ::infrastructure_common::register_type_entry(
            ::infrastructure_common::TypeEntry::of::<#ident>()
                #(.with_marker(#names))*
        );
    });

    Ok(quote! {
        #item
        #registration
    })
}

/// 实现 #[marker(..)] 宏
///
/// 标记名称即结构体名称；参数为该标记自身带有的标记
pub fn marker_impl(args: TokenStream, input: TokenStream) -> Result<TokenStream> {
    let meta_markers = parse_marker_paths(args)?;
    let item: ItemStruct = syn::parse2(input)?;

    if !matches!(item.fields, Fields::Unit) || !item.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &item.ident,
            "#[marker] 只能用于无泛型的单元结构体",
        ));
    }

    let ident = &item.ident;
    let name = ident.to_string();
    let names = marker_names(&meta_markers);

    let registration = registration_block(quote! {
        ::infrastructure_common::register_marker_declaration(
            ::infrastructure_common::MarkerDeclaration::new(#name)
                #(.with_marker(#names))*
        );
    });

    Ok(quote! {
        #item

        impl ::infrastructure_common::Marker for #ident {
            const NAME: &'static str = #name;
        }

        #registration
    })
}
