mod attr;

use crate::injectable::attr::{parse_field_attrs, FieldArgs};

use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};
use syn::{spanned::Spanned as _, Data, DataEnum, DataStruct, DataUnion, DeriveInput, Error, Field, Index, LitStr, Member, Visibility};

fn expand_field_injection(index: usize, field: &Field) -> Option<TokenStream> {
    if !matches!(field.vis, Visibility::Public(_)) {
        return None;
    }

    let FieldArgs { inject } = parse_field_attrs(&field.attrs);
    if !inject {
        return None;
    }

    let (member, name) = match &field.ident {
        Some(ident) => (Member::Named(ident.clone()), ident.to_string()),
        None => (Member::Unnamed(Index::from(index)), index.to_string()),
    };
    let name = LitStr::new(name.trim_start_matches("r#"), field.span());

    Some(quote_spanned! { field.ty.span() =>
        ::tinydi::Resolver::inject_field(resolver, &mut self.#member, #name)?;
    })
}

pub(crate) fn expand(input: DeriveInput) -> syn::Result<TokenStream> {
    let fields = match &input.data {
        Data::Struct(DataStruct { fields, .. }) => fields,
        Data::Enum(DataEnum { enum_token, .. }) => {
            return Err(Error::new_spanned(enum_token, "#[derive(Injectable)] can only be used on structs"))
        }
        Data::Union(DataUnion { union_token, .. }) => {
            return Err(Error::new_spanned(union_token, "#[derive(Injectable)] can only be used on structs"))
        }
    };

    let injections = fields
        .iter()
        .enumerate()
        .filter_map(|(index, field)| expand_field_injection(index, field))
        .collect::<Box<[_]>>();

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::tinydi::Injectable for #ident #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn inject_fields(
                &mut self,
                resolver: &::tinydi::Resolver<'_>,
            ) -> ::core::result::Result<(), ::tinydi::ResolveErrorKind> {
                #( #injections )*
                ::core::result::Result::Ok(())
            }
        }
    })
}
