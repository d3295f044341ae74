use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{spanned::Spanned, Attribute, Data, DeriveInput, Error, Expr, Fields, Result};

/// The contents of the `#[error(...)]` attribute.
struct ReportTags {
    message: Expr,
    labels: Option<Expr>,
    help: Option<Expr>,
}

impl ReportTags {
    /// Reads the tags from the `error` attribute among the given attributes. `span` is used to
    /// point at the item if the attribute is missing.
    fn from_attrs(attrs: &[Attribute], span: proc_macro2::Span) -> Result<Self> {
        let attr = attrs.iter()
            .find(|attr| attr.path().is_ident("error"))
            .ok_or_else(|| Error::new(span, "missing `#[error(message = ...)]` attribute"))?;

        let (mut message, mut labels, mut help) = (None, None, None);
        attr.parse_nested_meta(|meta| {
            let slot = if meta.path.is_ident("message") {
                &mut message
            } else if meta.path.is_ident("labels") {
                &mut labels
            } else if meta.path.is_ident("help") {
                &mut help
            } else {
                return Err(meta.error("expected `message`, `labels` or `help`"));
            };
            if slot.is_some() {
                return Err(meta.error("this tag is given twice"));
            }
            *slot = Some(meta.value()?.parse::<Expr>()?);
            Ok(())
        })?;

        let message = message.ok_or_else(|| Error::new(attr.span(), "the `message` tag is required"))?;
        Ok(Self { message, labels, help })
    }
}

/// Builds the `let` statement bringing the named fields of `self` into scope. Unit structs have
/// nothing to bring in.
fn bind_fields(input: &DeriveInput) -> Result<TokenStream2> {
    let Data::Struct(data) = &input.data else {
        return Err(Error::new(input.ident.span(), "`ErrorKind` can only be derived for structs"));
    };
    let name = &input.ident;
    match &data.fields {
        Fields::Named(fields) => {
            let names = fields.named.iter().map(|field| &field.ident);
            Ok(quote! {
                #[allow(unused_variables)]
                let #name { #(#names),* } = self;
            })
        },
        Fields::Unit => Ok(TokenStream2::new()),
        Fields::Unnamed(fields) => Err(Error::new(
            fields.span(),
            "`ErrorKind` cannot be derived for tuple structs, name the fields instead",
        )),
    }
}

/// Generates the `ErrorKind` implementation for the struct.
pub fn derive(input: DeriveInput) -> Result<TokenStream2> {
    let tags = ReportTags::from_attrs(&input.attrs, input.ident.span())?;
    let bindings = bind_fields(&input)?;
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let message = &tags.message;
    let labels = tags.labels.as_ref().map_or_else(|| quote! { [""] }, |labels| quote! { #labels });
    let help = tags.help.as_ref().map(|help| quote! { report.set_help(#help); });

    Ok(quote! {
        impl #impl_generics mathedit_error::ErrorKind for #name #ty_generics #where_clause {
            fn build_report<'a>(
                &self,
                src_id: &'a str,
                spans: &[std::ops::Range<usize>],
            ) -> ariadne::Report<'_, (&'a str, std::ops::Range<usize>)> {
                #bindings

                let offset = spans.first().map_or(0, |span| span.start);
                let labels = #labels
                    .into_iter()
                    .enumerate()
                    .filter_map(|(i, text)| {
                        // a label past the last span points at the last span
                        let span = spans.get(i).or_else(|| spans.last())?.clone();
                        let label = ariadne::Label::new((src_id, span)).with_color(mathedit_error::EXPR);
                        let text = text.to_string();
                        Some(if text.is_empty() { label } else { label.with_message(text) })
                    })
                    .collect::<Vec<_>>();

                let mut report = ariadne::Report::build(ariadne::ReportKind::Error, src_id, offset)
                    .with_message(#message)
                    .with_labels(labels);
                #help
                report.finish()
            }
        }
    })
}
