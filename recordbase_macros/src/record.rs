use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Ident, LitStr};

pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let table = table_name(input)?;
    let idents = field_idents(input)?;
    let names: Vec<_> = idents.iter().map(|ident| ident.to_string()).collect();

    Ok(quote! {
        impl #impl_generics ::recordbase::Record for #name #ty_generics #where_clause {
            const TABLE: &'static str = #table;
            const FIELDS: &'static [&'static str] = &[#(#names),*];

            fn field(
                &self,
                name: &str,
            ) -> ::core::result::Result<::recordbase::Value, ::recordbase::StoreError> {
                match name {
                    #(
                        #names => ::recordbase::__private::encode_field(
                            <Self as ::recordbase::Record>::TABLE,
                            name,
                            &self.#idents,
                        ),
                    )*
                    _ => ::core::result::Result::Err(::recordbase::StoreError::UnknownField {
                        table: <Self as ::recordbase::Record>::TABLE,
                        field: name.to_string(),
                    }),
                }
            }

            fn set_field(
                &mut self,
                name: &str,
                value: ::recordbase::Value,
            ) -> ::core::result::Result<(), ::recordbase::StoreError> {
                match name {
                    #(
                        #names => {
                            self.#idents = ::recordbase::__private::decode_field(
                                <Self as ::recordbase::Record>::TABLE,
                                name,
                                value,
                            )?;
                            ::core::result::Result::Ok(())
                        }
                    )*
                    _ => ::core::result::Result::Err(::recordbase::StoreError::UnknownField {
                        table: <Self as ::recordbase::Record>::TABLE,
                        field: name.to_string(),
                    }),
                }
            }
        }
    })
}

/// Named fields in declaration order. `id` is reserved for the identifier
/// the table assigns.
fn field_idents(input: &DeriveInput) -> syn::Result<Vec<Ident>> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "Record derive only supports structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Record derive only supports structs",
            ))
        }
    };

    fields
        .iter()
        .filter_map(|field| field.ident.clone())
        .map(|ident| {
            if ident == "id" {
                Err(syn::Error::new_spanned(
                    &ident,
                    "`id` is reserved for the store-assigned identifier",
                ))
            } else {
                Ok(ident)
            }
        })
        .collect()
}

/// `#[record(table = "...")]`, or the pluralized snake_case struct name.
fn table_name(input: &DeriveInput) -> syn::Result<String> {
    let mut table: Option<LitStr> = None;

    for attr in input.attrs.iter().filter(|attr| attr.path().is_ident("record")) {
        attr.parse_nested_meta(|meta| {
            if !meta.path.is_ident("table") {
                return Err(meta.error("unsupported record attribute, expected `table = \"...\"`"));
            }

            let value: LitStr = meta.value()?.parse()?;
            if value.value().is_empty() {
                return Err(syn::Error::new(value.span(), "table name must not be empty"));
            }
            if table.is_some() {
                return Err(meta.error("duplicate `table` in record attribute"));
            }
            table = Some(value);
            Ok(())
        })?;
    }

    Ok(match table {
        Some(table) => table.value(),
        None => format!("{}s", snake_case(&input.ident.to_string())),
    })
}

/// `BookReview` -> `book_review`, `HTTPRequest` -> `http_request`.
fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut snake = String::with_capacity(name.len() + 4);

    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|next| next.is_lowercase());
            let word_start = prev.is_lowercase() || prev.is_ascii_digit();
            let acronym_end = prev.is_uppercase() && next_is_lower;
            if word_start || acronym_end {
                snake.push('_');
            }
        }
        snake.extend(ch.to_lowercase());
    }

    snake
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn table_attribute_sets_name() {
        let input: DeriveInput = parse_quote! {
            #[record(table = "library")]
            struct Volume { title: String }
        };
        assert_eq!(table_name(&input).unwrap(), "library");
    }

    #[test]
    fn default_table_name_is_plural_snake_case() {
        let input: DeriveInput = parse_quote! {
            struct BookReview { stars: u8 }
        };
        assert_eq!(table_name(&input).unwrap(), "book_reviews");
        assert_eq!(snake_case("HTTPRequest"), "http_request");
        assert_eq!(snake_case("User"), "user");
        assert_eq!(snake_case("Page2Draft"), "page2_draft");
    }

    #[test]
    fn misspelled_key_is_rejected() {
        let input: DeriveInput = parse_quote! {
            #[record(tabel = "library")]
            struct Volume { title: String }
        };
        let err = table_name(&input).unwrap_err();
        assert!(err.to_string().contains("unsupported record attribute"));
    }

    #[test]
    fn non_string_table_is_rejected() {
        let input: DeriveInput = parse_quote! {
            #[record(table = 5)]
            struct Tome { title: String }
        };
        assert!(table_name(&input).is_err());
    }

    #[test]
    fn empty_and_duplicate_tables_are_rejected() {
        let empty: DeriveInput = parse_quote! {
            #[record(table = "")]
            struct Tome { title: String }
        };
        assert!(table_name(&empty).is_err());

        let duplicate: DeriveInput = parse_quote! {
            #[record(table = "a", table = "b")]
            struct Tome { title: String }
        };
        let err = table_name(&duplicate).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn id_field_is_reserved() {
        let input: DeriveInput = parse_quote! {
            struct Tome { id: u64, title: String }
        };
        let err = expand(&input).unwrap_err();
        assert!(err.to_string().contains("reserved"));
    }

    #[test]
    fn tuple_structs_are_rejected() {
        let input: DeriveInput = parse_quote! {
            struct Tome(String);
        };
        assert!(expand(&input).is_err());
    }

    #[test]
    fn fields_keep_declaration_order() {
        let input: DeriveInput = parse_quote! {
            struct Book { title: String, pages: u32, read: bool }
        };
        let names: Vec<_> = field_idents(&input)
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(names, vec!["title", "pages", "read"]);
    }
}
