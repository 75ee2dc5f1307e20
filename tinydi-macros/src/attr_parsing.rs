use syn::{Attribute, Expr, ExprLit, Ident, Lit, LitStr, Meta};

pub(crate) fn attrs_named<'a>(ident: &'a str, attrs: &'a [Attribute]) -> impl Iterator<Item = &'a Attribute> + 'a {
    attrs.iter().filter(move |attr| attr.meta.path().is_ident(ident))
}

/// The single word an attribute carries: `inject` for both `#[di(inject)]` and `#[di = "inject"]`.
///
/// Returns `None` for a bare path or anything that isn't exactly one word or string literal.
pub(crate) fn attr_value(attr: &Attribute) -> Option<String> {
    match &attr.meta {
        Meta::Path(_) => None,
        Meta::List(_) => attr
            .parse_args::<Ident>()
            .map(|ident| ident.to_string())
            .or_else(|_| attr.parse_args::<LitStr>().map(|lit| lit.value()))
            .ok(),
        Meta::NameValue(name_value) => match &name_value.value {
            Expr::Lit(ExprLit { lit: Lit::Str(lit), .. }) => Some(lit.value()),
            _ => None,
        },
    }
}
