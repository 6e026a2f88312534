use crate::utils::{apply_derives, ensure_required_fields};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use std::collections::HashMap;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{
    Expr, Ident, Item, ItemEnum, ItemStruct, Result, Token, Type, parse::Parse,
    parse::ParseStream, parse_macro_input,
};

/// #[domain_event] 宏实现
/// - 作用于具名字段结构体，或仅含具名字段变体（`Variant { .. }`）的枚举
/// - 确保结构体/每个变体具备字段：`metadata: EventMetadata`
/// - 生成 `::domaid_domain::domain_event::{Event, DomainEvent}` 实现
/// - 事件类型默认为 `Struct` 或 `Enum.Variant`：
///   - 结构体可用 `#[domain_event(event_type = "...")]` 覆写；
///   - 变体可用 `#[event(event_type = "...")]` 覆写。
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as EventAttrConfig);
    let input = parse_macro_input!(item as Item);

    let result = match input {
        Item::Enum(e) => expand_enum(cfg, e),
        Item::Struct(s) => expand_struct(cfg, s),
        other => Err(syn::Error::new(
            other.span(),
            "#[domain_event] can only be used on struct or enum types",
        )),
    };

    match result {
        Ok(ts) => TokenStream::from(ts),
        Err(err) => err.to_compile_error().into(),
    }
}

fn metadata_ty() -> Type {
    syn::parse_quote! { ::domaid_domain::domain_event::EventMetadata }
}

// 合并/追加默认派生：Debug, Clone, PartialEq, Serialize, Deserialize
fn required_derives() -> Vec<syn::Path> {
    vec![
        syn::parse_quote!(Debug),
        syn::parse_quote!(Clone),
        syn::parse_quote!(PartialEq),
        syn::parse_quote!(serde::Serialize),
        syn::parse_quote!(serde::Deserialize),
    ]
}

fn expand_struct(cfg: EventAttrConfig, mut st: ItemStruct) -> Result<TokenStream2> {
    let meta_ty = metadata_ty();
    match &mut st.fields {
        syn::Fields::Named(fields_named) => {
            ensure_required_fields(
                fields_named,
                &[("metadata", &meta_ty)],
                /*reposition_existing*/ false,
            );
        }
        _ => {
            return Err(syn::Error::new(
                st.span(),
                "#[domain_event] supports only named-field structs, e.g., struct X { a: T }",
            ));
        }
    }
    apply_derives(&mut st.attrs, required_derives());

    let ident = &st.ident;
    let type_lit = cfg
        .event_type
        .unwrap_or_else(|| syn::LitStr::new(&ident.to_string(), ident.span()));

    let (impl_generics, ty_generics, where_clause) = st.generics.split_for_impl();

    Ok(quote! {
        #st

        impl #impl_generics ::domaid_domain::domain_event::Event for #ident #ty_generics #where_clause {
            fn event_type(&self) -> &str { #type_lit }
            fn date_occurred(&self) -> ::domaid_domain::chrono::DateTime<::domaid_domain::chrono::Utc> {
                self.metadata.date_occurred()
            }
        }

        impl #impl_generics ::domaid_domain::domain_event::DomainEvent for #ident #ty_generics #where_clause {
            fn metadata(&self) -> &#meta_ty { &self.metadata }
            fn metadata_mut(&mut self) -> &mut #meta_ty { &mut self.metadata }
        }
    })
}

fn expand_enum(cfg: EventAttrConfig, mut enum_item: ItemEnum) -> Result<TokenStream2> {
    if let Some(lit) = cfg.event_type {
        return Err(syn::Error::new(
            lit.span(),
            "'event_type' on an enum is not allowed; annotate each variant with #[event(event_type = ...)]",
        ));
    }
    if enum_item.variants.is_empty() {
        return Err(syn::Error::new(
            enum_item.span(),
            "#[domain_event] requires at least one variant",
        ));
    }

    apply_derives(&mut enum_item.attrs, required_derives());

    let meta_ty = metadata_ty();
    let mut variant_types: HashMap<String, syn::LitStr> = HashMap::new();

    for v in &mut enum_item.variants {
        let syn::Fields::Named(fields_named) = &mut v.fields else {
            return Err(syn::Error::new(
                v.span(),
                "#[domain_event] supports only named-field enum variants, e.g., Variant { x: T }",
            ));
        };
        ensure_required_fields(
            fields_named,
            &[("metadata", &meta_ty)],
            /*reposition_existing*/ false,
        );

        let mut retained_attrs = Vec::new();
        let mut type_lit: Option<syn::LitStr> = None;

        for attr in v.attrs.iter() {
            if !attr.path().is_ident("event") {
                retained_attrs.push(attr.clone());
                continue;
            }
            let parsed = parse_variant_event_attr(attr)?;
            if let Some(lit) = parsed {
                if type_lit.is_some() {
                    return Err(syn::Error::new(
                        attr.span(),
                        "duplicate 'event_type' specified for this variant",
                    ));
                }
                type_lit = Some(lit);
            }
        }

        v.attrs = retained_attrs;
        if let Some(lit) = type_lit {
            variant_types.insert(v.ident.to_string(), lit);
        }
    }

    let enum_ident = &enum_item.ident;
    let enum_name_string = enum_ident.to_string();

    let type_match_arms = enum_item.variants.iter().map(|v| {
        let v_ident = &v.ident;
        let key = v_ident.to_string();
        let lit = variant_types.get(&key).cloned().unwrap_or_else(|| {
            syn::LitStr::new(&format!("{enum_name_string}.{key}"), v_ident.span())
        });
        quote! { Self::#v_ident { .. } => #lit }
    });

    let occurred_match_arms = enum_item.variants.iter().map(|v| {
        let v_ident = &v.ident;
        quote! { Self::#v_ident { metadata, .. } => metadata.date_occurred() }
    });

    let meta_match_arms = enum_item.variants.iter().map(|v| {
        let v_ident = &v.ident;
        quote! { Self::#v_ident { metadata, .. } => metadata }
    });
    let meta_mut_match_arms = meta_match_arms.clone();

    let (impl_generics, ty_generics, where_clause) = enum_item.generics.split_for_impl();

    Ok(quote! {
        #enum_item

        impl #impl_generics ::domaid_domain::domain_event::Event for #enum_ident #ty_generics #where_clause {
            fn event_type(&self) -> &str { match self { #( #type_match_arms, )* } }
            fn date_occurred(&self) -> ::domaid_domain::chrono::DateTime<::domaid_domain::chrono::Utc> {
                match self { #( #occurred_match_arms, )* }
            }
        }

        impl #impl_generics ::domaid_domain::domain_event::DomainEvent for #enum_ident #ty_generics #where_clause {
            fn metadata(&self) -> &#meta_ty { match self { #( #meta_match_arms, )* } }
            fn metadata_mut(&mut self) -> &mut #meta_ty { match self { #( #meta_mut_match_arms, )* } }
        }
    })
}

// -------- parsing --------

// 变体级：#[event(event_type = "...")]
fn parse_variant_event_attr(attr: &syn::Attribute) -> Result<Option<syn::LitStr>> {
    let syn::Meta::List(_) = &attr.meta else {
        return Err(syn::Error::new(attr.span(), "expected #[event(...)]"));
    };

    let mut ty: Option<syn::LitStr> = None;
    let pairs: Punctuated<EventAttrKv, Token![,]> =
        attr.parse_args_with(Punctuated::<EventAttrKv, Token![,]>::parse_terminated)?;

    for kv in pairs {
        if kv.key != "event_type" {
            return Err(syn::Error::new(
                kv.key.span(),
                "unknown key; expected 'event_type'",
            ));
        }
        if ty.is_some() {
            return Err(syn::Error::new(
                kv.key.span(),
                "duplicate key 'event_type' in attribute",
            ));
        }
        ty = Some(kv.string_value()?);
    }

    Ok(ty)
}

struct EventAttrKv {
    key: Ident,
    value: Expr,
}

impl EventAttrKv {
    fn string_value(self) -> Result<syn::LitStr> {
        match self.value {
            Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Str(lit),
                ..
            }) => Ok(lit),
            other => Err(syn::Error::new(
                other.span(),
                "expected string literal for 'event_type'",
            )),
        }
    }
}

impl Parse for EventAttrKv {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: Ident = input.parse()?;
        let _eq: Token![=] = input.parse()?;
        let value: Expr = input.parse()?;
        Ok(Self { key, value })
    }
}

// 类型级配置：仅结构体可指定 event_type
struct EventAttrConfig {
    event_type: Option<syn::LitStr>,
}

impl Parse for EventAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut event_type: Option<syn::LitStr> = None;

        let pairs: Punctuated<EventAttrKv, Token![,]> =
            Punctuated::<EventAttrKv, Token![,]>::parse_terminated(input)?;

        for kv in pairs.into_iter() {
            if kv.key != "event_type" {
                return Err(syn::Error::new(
                    kv.key.span(),
                    "unknown key; expected 'event_type'",
                ));
            }
            if event_type.is_some() {
                return Err(syn::Error::new(
                    kv.key.span(),
                    "duplicate key 'event_type' in attribute",
                ));
            }
            event_type = Some(kv.string_value()?);
        }

        Ok(Self { event_type })
    }
}
