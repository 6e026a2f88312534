use crate::utils::{apply_derives, ensure_required_fields};
use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{
    Item, ItemStruct, Result, Token, Type, parse::Parse, parse::ParseStream, parse_macro_input,
};

/// #[entity] 宏实现
/// - 若缺失则追加字段 `base: EntityBase<Event>` 并置于字段最前
/// - 自动实现 `::domaid_domain::entity::Entity`（base/base_mut）
/// - 参数：`#[entity(event = EventType, debug = true|false)]`；
///   - `event` 必填，为该实体记录的领域事件类型
///   - `debug` 默认 `true`（派生 Debug）。为 `false` 时不派生 Debug，便于用户自定义实现。
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as EntityAttrConfig);
    let input = parse_macro_input!(item as Item);

    let mut st = match input {
        Item::Struct(s) => s,
        other => {
            return syn::Error::new(other.span(), "#[entity] only on struct")
                .to_compile_error()
                .into();
        }
    };

    let Some(event_ty) = cfg.event_ty else {
        return syn::Error::new(
            st.ident.span(),
            "#[entity] requires the event type, e.g. #[entity(event = OrderEvent)]",
        )
        .to_compile_error()
        .into();
    };

    // 仅支持具名字段结构体
    let fields_named = match &mut st.fields {
        syn::Fields::Named(f) => f,
        _ => {
            return syn::Error::new(st.span(), "only supports named-field struct")
                .to_compile_error()
                .into();
        }
    };

    let base_ty: Type = syn::parse_quote! { ::domaid_domain::entity::EntityBase<#event_ty> };
    ensure_required_fields(
        fields_named,
        &[("base", &base_ty)],
        /*reposition_existing*/ true,
    );

    // 合并/规范 derive：默认添加 Debug（可通过 debug=false 关闭）、Serialize、Deserialize
    let mut required: Vec<syn::Path> = vec![
        syn::parse_quote!(serde::Serialize),
        syn::parse_quote!(serde::Deserialize),
    ];
    if cfg.derive_debug.unwrap_or(true) {
        required.insert(0, syn::parse_quote!(Debug));
    }
    apply_derives(&mut st.attrs, required);

    let out_struct = ItemStruct { ..st };

    let ident = &out_struct.ident;
    let generics = out_struct.generics.clone();
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let expanded = quote! {
        #out_struct

        impl #impl_generics ::domaid_domain::entity::Entity for #ident #ty_generics #where_clause {
            type Event = #event_ty;

            fn base(&self) -> &::domaid_domain::entity::EntityBase<#event_ty> { &self.base }

            fn base_mut(&mut self) -> &mut ::domaid_domain::entity::EntityBase<#event_ty> { &mut self.base }
        }
    };

    TokenStream::from(expanded)
}

// -------- parsing --------

struct EntityAttrConfig {
    event_ty: Option<Type>,
    derive_debug: Option<bool>,
}

impl Parse for EntityAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut event_ty: Option<Type> = None;
        let mut derive_debug: Option<bool> = None;

        let elems: Punctuated<EntityAttrElem, Token![,]> =
            Punctuated::<EntityAttrElem, Token![,]>::parse_terminated(input)?;

        for elem in elems.into_iter() {
            match elem {
                EntityAttrElem::Event(ty) => {
                    if event_ty.is_some() {
                        return Err(syn::Error::new(
                            ty.span(),
                            "duplicate key 'event' in attribute",
                        ));
                    }
                    event_ty = Some(*ty);
                }
                EntityAttrElem::Debug(b) => {
                    if derive_debug.is_some() {
                        return Err(syn::Error::new(
                            proc_macro2::Span::call_site(),
                            "duplicate key 'debug' in attribute",
                        ));
                    }
                    derive_debug = Some(b);
                }
            }
        }

        Ok(Self {
            event_ty,
            derive_debug,
        })
    }
}

enum EntityAttrElem {
    Event(Box<Type>),
    Debug(bool),
}

impl Parse for EntityAttrElem {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: syn::Ident = input.parse()?;
        let _eq: Token![=] = input.parse()?;
        if key == "event" {
            let ty: Type = input.parse()?;
            Ok(EntityAttrElem::Event(Box::new(ty)))
        } else if key == "debug" {
            let lit: syn::LitBool = input.parse()?;
            Ok(EntityAttrElem::Debug(lit.value()))
        } else {
            Err(syn::Error::new(
                key.span(),
                "unknown key in attribute; expected 'event' or 'debug'",
            ))
        }
    }
}
