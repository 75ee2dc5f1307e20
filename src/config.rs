/// What to do with a `#[di(inject)]` field whose type has no registration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldPolicy {
    /// Leave the field as the provider set it (usually `None`).
    #[default]
    Lenient,
    /// Fail the resolution of the owning service with [`crate::ResolveErrorKind::Field`].
    Strict,
}

/// Config for an injector
/// ## Fields
/// - `field_policy`:
///   How unregistered field dependencies are treated, see [`FieldPolicy`].
///
///   This only concerns the field's own type.
///   Failures further down the graph (cycles, provider errors) are always reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    pub field_policy: FieldPolicy,
}

impl Config {
    #[inline]
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            field_policy: FieldPolicy::Strict,
        }
    }
}
