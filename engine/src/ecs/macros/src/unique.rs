use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

pub fn derive_unique(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    let name = &ast.ident;
    let (impl_generics, type_generics, where_clause) = ast.generics.split_for_impl();

    // Same path trick as the component derive: works both inside and outside the engine crate.
    TokenStream::from(quote! {
        impl #impl_generics ::helium_engine::ecs::Unique for #name #type_generics #where_clause {
        }
    })
}
