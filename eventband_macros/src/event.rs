use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, LitStr};

pub fn derive_event(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let body = match &input.data {
        Data::Struct(_) => {
            let name = event_name(&input.attrs)?.unwrap_or_else(|| ident.to_string());
            quote! { #name }
        }
        Data::Enum(data) => {
            if event_name(&input.attrs)?.is_some() {
                return Err(syn::Error::new_spanned(
                    ident,
                    "#[event(name = ...)] belongs on enum variants, not on the enum",
                ));
            }

            let arms = data
                .variants
                .iter()
                .map(|variant| {
                    let variant_ident = &variant.ident;
                    let name = event_name(&variant.attrs)?
                        .unwrap_or_else(|| variant_ident.to_string());
                    Ok(quote! { Self::#variant_ident { .. } => #name })
                })
                .collect::<syn::Result<Vec<_>>>()?;

            if arms.is_empty() {
                quote! { match *self {} }
            } else {
                quote! { match self { #(#arms),* } }
            }
        }
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                ident,
                "Event can only be derived for structs and enums",
            ))
        }
    };

    Ok(quote! {
        impl #impl_generics ::eventband::Event for #ident #ty_generics #where_clause {
            fn name(&self) -> &str {
                #body
            }
        }
    })
}

/// Reads `#[event(name = "...")]`, rejecting unknown keys.
fn event_name(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut name = None;

    for attr in attrs {
        if !attr.path().is_ident("event") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                if value.value().is_empty() {
                    return Err(meta.error("event name must not be empty"));
                }
                name = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported event attribute, expected `name`"))
            }
        })?;
    }

    Ok(name)
}
