use proc_macro::TokenStream;

mod state;

/// Derives `routegraph::GraphState` for a struct with named fields.
///
/// Generates a `<Name>Update` enum with one variant per field. Each field may
/// carry `#[update(replace)]` (the default) or `#[update(append)]`, which
/// extends the field with the update's contents instead of overwriting it.
#[proc_macro_derive(State, attributes(update))]
pub fn derive_state(input: TokenStream) -> TokenStream {
    state::derive_state_impl(input)
}
