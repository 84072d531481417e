use proc_macro::TokenStream;
use quote::quote;
use syn::parse::Parser;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Ident, LitInt};

/// Add a `version: usize` field to any given `struct` and implement the `Versioned` trait for it.
///
/// The generated `new()` sets the version to the macro argument (default `1`) and everything
/// else to `Default::default()`, so the struct must derive or implement `Default`.
///
/// ```ignore
/// #[add_version(2)]
/// #[derive(Debug, Default, Deserialize)]
/// struct Config {
///     pub site: String,
/// }
/// ```
///
#[proc_macro_attribute]
pub fn add_version(args: TokenStream, input: TokenStream) -> TokenStream {
    let args = syn::parse::<LitInt>(args)
        .unwrap_or_else(|_| LitInt::new("1", proc_macro2::Span::call_site()));
    let mut input = parse_macro_input!(input as DeriveInput);
    let ident = input.ident.clone();

    let version_ident = Ident::new("version", ident.span());
    let version_type = quote! { usize };

    match input.data {
        Data::Struct(ref mut data_struct) => {
            if let Fields::Named(fields) = &mut data_struct.fields {
                let field = syn::Field::parse_named
                    .parse2(quote! { pub #version_ident: #version_type })
                    .map_err(|e| e.to_compile_error());
                match field {
                    Ok(field) => fields.named.push(field),
                    Err(e) => return e.into(),
                }
            } else {
                return syn::Error::new_spanned(&ident, "#[add_version] needs named fields")
                    .to_compile_error()
                    .into();
            }
        }
        _ => {
            return syn::Error::new_spanned(&ident, "#[add_version] is only for struct")
                .to_compile_error()
                .into();
        }
    }

    let output = quote! {
        #input

        impl Versioned for #ident {
            const VERSION: #version_type = #args;

            fn version(&self) -> #version_type {
                self.version
            }
        }

        impl #ident {
            #[allow(dead_code)]
            pub fn new() -> Self {
                Self {
                    version: #args,
                    ..Default::default()
                }
            }
        }
    };
    output.into()
}
