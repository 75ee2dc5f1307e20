use proc_macro::TokenStream;
use quote::ToTokens;
use std::env::var_os;
use syn::parse::Parse;

mod attr_parsing;
mod injectable;

/// Derives `tinydi::Injectable`.
///
/// Every `pub` field marked with `#[di(inject)]` or `#[di = "inject"]` is filled, in declaration order,
/// with the service resolved for the field's type. The field type must implement `tinydi::InjectSlot`,
/// e.g. `Option<Arc<Service>>`.
///
/// Other fields, non-`pub` fields and `di` attributes with any other value are left alone.
#[proc_macro_derive(Injectable, attributes(di))]
pub fn injectable(item: TokenStream) -> TokenStream {
    expand_with(item, injectable::expand)
}

fn expand_with<F, I, K>(input: TokenStream, f: F) -> TokenStream
where
    F: FnOnce(I) -> syn::Result<K>,
    I: Parse,
    K: ToTokens,
{
    expand(syn::parse(input).and_then(f))
}

fn expand<T>(result: syn::Result<T>) -> TokenStream
where
    T: ToTokens,
{
    match result {
        Ok(tokens) => {
            let tokens = tokens.into_token_stream();
            if var_os("MACROS_DEBUG").is_some() {
                match syn::parse2::<syn::File>(tokens.clone()) {
                    Ok(file) => eprintln!("{}", prettyplease::unparse(&file)),
                    Err(_) => eprintln!("{tokens}"),
                }
            }
            tokens.into()
        }
        Err(err) => err.into_compile_error().into(),
    }
}
