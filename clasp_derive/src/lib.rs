//! Derive module for `clasp`.
//! See [documentation root](https://docs.rs/clasp/latest/clasp/index.html) for full details.
extern crate proc_macro;

mod load;

use proc_macro::TokenStream;
use quote::quote;

use crate::load::{load_fields, RecordField};

/// Derive the `Record` protocol (and the shape registrations) for a named-
/// field struct.
///
/// Fields are assigned in declaration order. `#[clasp(optional)]` marks the
/// boundary: every field from there on is optional. `#[clasp(default = ..)]`
/// supplies the fallback bound when an optional field's tokens are absent.
///
/// ```ignore
/// #[derive(Record, Clone, Default)]
/// struct Station {
///     name: String,
///     gain: f32,
///     #[clasp(optional, default = -1)]
///     channel: i32,
/// }
/// ```
#[proc_macro_derive(Record, attributes(clasp))]
pub fn record(input: TokenStream) -> TokenStream {
    let ast: syn::DeriveInput = match syn::parse(input) {
        Ok(ast) => ast,
        Err(error) => return error.to_compile_error().into(),
    };
    let struct_name = &ast.ident;

    let fields = match &ast.data {
        syn::Data::Struct(syn::DataStruct {
            fields: syn::Fields::Named(named),
            ..
        }) => match load_fields(named) {
            Ok(fields) => fields,
            Err(error) => return error.to_compile_error().into(),
        },
        _ => {
            return syn::Error::new_spanned(
                &ast.ident,
                "Record requires a struct with named fields",
            )
            .to_compile_error()
            .into()
        }
    };

    let describe_statements = fields.iter().map(|field| {
        let RecordField {
            ident,
            optional,
            default,
        } = field;
        let name = format!("{ident}");
        let boundary = if *optional {
            quote! { fields.set_optional(); }
        } else {
            quote! {}
        };
        let assignment = match default {
            Some(default) => quote! {
                fields.assign_or(&mut self.#ident, #name, (#default).into());
            },
            None => quote! {
                fields.assign(&mut self.#ident, #name);
            },
        };
        quote! {
            #boundary
            #assignment
        }
    });

    let render_pieces = fields.iter().enumerate().map(|(at, field)| {
        let ident = &field.ident;
        let piece = if at == 0 {
            format!(".{ident}={{}}")
        } else {
            format!(", .{ident}={{}}")
        };
        quote! {
            out.push_str(&::std::format!(#piece, ::clasp::Parse::render(&self.#ident)));
        }
    });

    let type_name = format!("{struct_name}");
    let generated = quote! {
        impl ::clasp::Record for #struct_name {
            const TYPE_NAME: &'static str = #type_name;

            fn describe(&mut self, fields: &mut ::clasp::Fields<'_, '_>) {
                #( #describe_statements )*
            }

            fn render(&self) -> ::std::string::String {
                let mut out = ::std::string::String::from("{");
                #( #render_pieces )*
                out.push('}');
                out
            }
        }

        ::clasp::record_shape!(#struct_name);
    };
    generated.into()
}
