//! Derive macros for tether clients.

use proc_macro::TokenStream;

mod enum_choice;

/// Derive `EnumChoice` for a fieldless enum.
///
/// Each variant becomes one option of an enumerated parameter, in
/// declaration order.
///
/// # Attributes
///
/// - `#[name = "..."]` on a variant sets its option string (defaults to the
///   variant identifier)
/// - `#[default]` marks the default option (defaults to the first variant)
///
/// # Example
///
/// ```ignore
/// #[derive(Copy, Clone, PartialEq, EnumChoice)]
/// pub enum Mode {
///     #[name = "mean"]
///     Mean,
///     #[default]
///     #[name = "median"]
///     Median,
/// }
/// ```
#[proc_macro_derive(EnumChoice, attributes(name, default))]
pub fn derive_enum_choice(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);

    match enum_choice::derive_enum_choice_impl(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
