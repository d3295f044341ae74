mod error_kind;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `mathedit_error::ErrorKind` for a unit struct or a struct with named fields.
///
/// The report is described by the `error` attribute:
/// ```
/// use mathedit_attrs::ErrorKind;
///
/// #[derive(Debug, ErrorKind)]
/// #[error(
///     message = format!("`{}` is not a variable", name),
///     labels = ["this name", "and this one"],
///     help = "variables are a single letter",
/// )]
/// pub struct BadName {
///     name: String,
/// }
/// ```
///
/// - `message` (required): the headline of the report.
/// - `labels`: an array with the text of the label on each span of the error. Labels beyond the
///   last span point at the last span, and empty texts draw an unlabeled highlight. Defaults to
///   a single unlabeled highlight.
/// - `help`: a hint printed under the report.
///
/// Tags are arbitrary expressions whose values implement `Display`. The fields of the struct are
/// in scope while they are evaluated.
///
/// The generated implementation names the `ariadne` and `mathedit_error` crates, which the
/// deriving crate must depend on.
#[proc_macro_derive(ErrorKind, attributes(error))]
pub fn error_kind(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    error_kind::derive(input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
