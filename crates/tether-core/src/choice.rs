//! Rust enums as enumerated parameter options.

/// Trait for enums whose variants are the options of an enumerated parameter.
///
/// Usually implemented with `#[derive(EnumChoice)]`:
///
/// ```ignore
/// use tether::EnumChoice;
///
/// #[derive(Copy, Clone, PartialEq, EnumChoice)]
/// pub enum Mode {
///     #[name = "Mean"]
///     Mean,
///     #[default]
///     #[name = "Median"]
///     Median,
/// }
///
/// ParameterDescriptor::choice::<Mode>("mode", "Mode");
/// ```
pub trait EnumChoice: Copy + PartialEq + Send + Sync + 'static {
    /// Number of variants.
    const COUNT: usize;

    /// Index of the default variant (`#[default]` or the first one).
    const DEFAULT_INDEX: usize;

    fn from_index(index: usize) -> Option<Self>;

    fn to_index(self) -> usize;

    /// The default variant.
    fn default_value() -> Self;

    /// Display names in variant order.
    fn names() -> &'static [&'static str];

    /// Decode an integer parameter value, falling back to the default variant.
    fn from_value(value: i64) -> Self {
        usize::try_from(value)
            .ok()
            .and_then(Self::from_index)
            .unwrap_or_else(Self::default_value)
    }
}
