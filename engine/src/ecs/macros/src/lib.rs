mod component;
mod unique;

use proc_macro::TokenStream;

/// Derive `helium_engine::ecs::Component` for an entity-level data type.
#[proc_macro_derive(Component)]
pub fn derive_component(item: TokenStream) -> TokenStream {
    component::derive_component(item)
}

/// Derive `helium_engine::ecs::Unique` for a world-level singleton type.
#[proc_macro_derive(Unique)]
pub fn derive_unique(item: TokenStream) -> TokenStream {
    unique::derive_unique(item)
}
