mod record;

use proc_macro::TokenStream;

// ============================================================================
// #[derive(Record)] derive macro
// ============================================================================

/// Derive macro for the `Record` trait.
///
/// # Usage
///
/// ```ignore
/// #[derive(Clone, Debug, Serialize, Deserialize, Record)]
/// #[record(table = "books")]
/// struct Book {
///     pub title: String,
///     pub pages: u32,
///     pub read: bool,
/// }
/// ```
///
/// - `#[record(table = "...")]` sets the table name.
///   If omitted, defaults to snake_case struct name + "s".
/// - Every named field becomes addressable by name through
///   `Record::field` / `Record::set_field`, in declaration order.
/// - A field named `id` is rejected: the identifier is assigned by the table.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::derive_record(input)
}
