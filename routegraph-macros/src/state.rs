use convert_case::{Case, Casing};
use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_macro_input, Data, DeriveInput, Error, Fields};

enum Strategy {
    Replace,
    Append,
}

pub fn derive_state_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = input.ident;
    let vis = input.vis;
    let update_name = format_ident!("{}Update", name);

    let fields = match input.data {
        Data::Struct(data) => match data.fields {
            Fields::Named(fields) => fields.named,
            other => {
                return Err(Error::new_spanned(
                    other,
                    "State can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new_spanned(
                name,
                "State can only be derived for structs",
            ))
        }
    };

    let mut update_variants = vec![];
    let mut update_match_arms = vec![];

    for field in fields {
        let Some(field_name) = field.ident else {
            continue;
        };
        let field_type = field.ty;

        let mut strategy = Strategy::Replace;
        for attr in field.attrs.iter().filter(|a| a.path().is_ident("update")) {
            let ident: syn::Ident = attr.parse_args()?;
            strategy = match ident.to_string().as_str() {
                "replace" => Strategy::Replace,
                "append" => Strategy::Append,
                other => {
                    return Err(Error::new_spanned(
                        ident,
                        format!("unknown update strategy `{other}`, expected `replace` or `append`"),
                    ))
                }
            };
        }

        let variant_name = format_ident!("{}", field_name.to_string().to_case(Case::Pascal));
        update_variants.push(quote! {
            #variant_name(#field_type)
        });

        let apply = match strategy {
            Strategy::Append => quote! { self.#field_name.extend(value) },
            Strategy::Replace => quote! { self.#field_name = value },
        };

        update_match_arms.push(quote! {
            #update_name::#variant_name(value) => { #apply }
        });
    }

    Ok(quote! {
        #[derive(Debug)]
        #vis enum #update_name {
            #(#update_variants),*
        }

        impl ::routegraph::GraphState for #name {
            type Update = #update_name;

            fn apply(&mut self, update: Self::Update) {
                match update {
                    #(#update_match_arms),*
                }
            }
        }
    })
}
