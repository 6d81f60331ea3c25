//! `#[derive(EnumChoice)]` implementation.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DataEnum, DeriveInput, Expr, ExprLit, Fields, Lit, Variant};

/// One parsed variant.
struct Choice {
    ident: syn::Ident,
    option: String,
    is_default: bool,
}

pub fn derive_enum_choice_impl(input: DeriveInput) -> syn::Result<TokenStream> {
    let data = match &input.data {
        Data::Enum(data) => data,
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "#[derive(EnumChoice)] only supports enums",
            ))
        }
    };

    let choices = parse_choices(data)?;
    if choices.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "#[derive(EnumChoice)] requires at least one variant",
        ));
    }
    let default_index = default_index(&input, &choices)?;

    let ty = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let count = choices.len();
    let idents: Vec<&syn::Ident> = choices.iter().map(|c| &c.ident).collect();
    let indices: Vec<usize> = (0..count).collect();
    let options: Vec<&str> = choices.iter().map(|c| c.option.as_str()).collect();
    let default_ident = &choices[default_index].ident;

    Ok(quote! {
        impl #impl_generics ::tether::core::choice::EnumChoice for #ty #ty_generics #where_clause {
            const COUNT: usize = #count;
            const DEFAULT_INDEX: usize = #default_index;

            fn from_index(index: usize) -> ::core::option::Option<Self> {
                match index {
                    #(#indices => ::core::option::Option::Some(#ty::#idents),)*
                    _ => ::core::option::Option::None,
                }
            }

            fn to_index(self) -> usize {
                match self {
                    #(#ty::#idents => #indices,)*
                }
            }

            fn default_value() -> Self {
                #ty::#default_ident
            }

            fn names() -> &'static [&'static str] {
                &[#(#options),*]
            }
        }
    })
}

fn parse_choices(data: &DataEnum) -> syn::Result<Vec<Choice>> {
    let mut choices: Vec<Choice> = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        let choice = parse_choice(variant)?;
        if choices.iter().any(|c| c.option == choice.option) {
            return Err(syn::Error::new_spanned(
                variant,
                format!("duplicate option name \"{}\"", choice.option),
            ));
        }
        choices.push(choice);
    }
    Ok(choices)
}

fn parse_choice(variant: &Variant) -> syn::Result<Choice> {
    if !matches!(variant.fields, Fields::Unit) {
        return Err(syn::Error::new_spanned(
            variant,
            "#[derive(EnumChoice)] variants cannot have fields",
        ));
    }
    let option = name_attribute(&variant.attrs)?.unwrap_or_else(|| variant.ident.to_string());
    Ok(Choice {
        ident: variant.ident.clone(),
        option,
        is_default: variant.attrs.iter().any(|a| a.path().is_ident("default")),
    })
}

fn default_index(input: &DeriveInput, choices: &[Choice]) -> syn::Result<usize> {
    let mut marked = choices
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_default)
        .map(|(i, _)| i);
    let first = marked.next();
    if marked.next().is_some() {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "only one variant can be #[default]",
        ));
    }
    Ok(first.unwrap_or(0))
}

/// Read `#[name = "..."]`.
fn name_attribute(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let Some(attr) = attrs.iter().find(|a| a.path().is_ident("name")) else {
        return Ok(None);
    };
    match &attr.meta.require_name_value()?.value {
        Expr::Lit(ExprLit {
            lit: Lit::Str(text),
            ..
        }) => Ok(Some(text.value())),
        other => Err(syn::Error::new_spanned(
            other,
            "expected #[name = \"...\"]",
        )),
    }
}
