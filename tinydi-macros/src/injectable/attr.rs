use syn::Attribute;

use crate::attr_parsing::{attr_value, attrs_named};

const MARKER: &str = "di";
const INJECT: &str = "inject";

pub(super) struct FieldArgs {
    pub(super) inject: bool,
}

pub(super) fn parse_field_attrs(attrs: &[Attribute]) -> FieldArgs {
    FieldArgs {
        inject: attrs_named(MARKER, attrs).filter_map(attr_value).any(|value| value == INJECT),
    }
}
