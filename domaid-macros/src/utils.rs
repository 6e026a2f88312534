use quote::ToTokens;
use syn::{Attribute, Field, FieldsNamed, Token, Type, punctuated::Punctuated};

// 提取非 derive 属性与已有 derive 列表
pub(crate) fn split_derives(attrs: &[Attribute]) -> (Vec<Attribute>, Vec<syn::Path>) {
    let mut retained = Vec::new();
    let mut existing = Vec::new();
    for attr in attrs.iter() {
        if !attr.path().is_ident("derive") {
            retained.push(attr.clone());
            continue;
        }
        if let Ok(list) =
            attr.parse_args_with(Punctuated::<syn::Path, Token![,]>::parse_terminated)
        {
            existing.extend(list);
        }
    }
    (retained, existing)
}

// 合并默认与已有 derive（去重，required 在前）
pub(crate) fn merge_derives(existing: Vec<syn::Path>, required: Vec<syn::Path>) -> Attribute {
    let mut seen = std::collections::HashSet::<String>::new();
    let final_list: Vec<syn::Path> = required
        .into_iter()
        .chain(existing)
        .filter(|p| seen.insert(derive_key(p)))
        .collect();
    syn::parse_quote!(#[derive(#(#final_list),*)])
}

// 归一化 derive 的 key，避免 Serialize 与 serde::Serialize 重复
pub(crate) fn derive_key(p: &syn::Path) -> String {
    match p.segments.last() {
        Some(last) => {
            let name = last.ident.to_string();
            match name.as_str() {
                "Serialize" | "Deserialize" => format!("serde::{name}"),
                _ => name,
            }
        }
        None => p.to_token_stream().to_string(),
    }
}

// 直接在 attrs 上应用默认派生合并
pub(crate) fn apply_derives(attrs: &mut Vec<Attribute>, required: Vec<syn::Path>) {
    let (retained, existing) = split_derives(attrs);
    let merged = merge_derives(existing, required);
    *attrs = std::iter::once(merged).chain(retained).collect();
}

fn is_named(field: &Field, name: &str) -> bool {
    field.ident.as_ref().map(|i| i == name).unwrap_or(false)
}

/// 确保具名字段结构体/变体包含所需字段
/// - required: (字段名, 字段类型) 列表，按给定顺序置于最前
/// - reposition_existing: 为 true 时已存在的字段也被移到最前（entity 需要）；
///   为 false 时仅在缺失时插入，已存在字段保持原位（domain_event 需要）。
pub(crate) fn ensure_required_fields(
    fields_named: &mut FieldsNamed,
    required: &[(&str, &Type)],
    reposition_existing: bool,
) {
    let old_named = fields_named.named.clone();
    let mut new_named: Punctuated<Field, Token![,]> = Punctuated::new();

    for (name, ty) in required.iter() {
        match old_named.iter().find(|f| is_named(f, name)) {
            Some(existing) if reposition_existing => new_named.push(existing.clone()),
            Some(_) => {}
            None => {
                let ident = syn::Ident::new(name, proc_macro2::Span::call_site());
                new_named.push(syn::parse_quote! { #ident: #ty });
            }
        }
    }

    for f in old_named.into_iter() {
        let moved = reposition_existing && required.iter().any(|(n, _)| is_named(&f, n));
        if !moved {
            new_named.push(f);
        }
    }

    fields_named.named = new_named;
}
