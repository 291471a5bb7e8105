//! Expansion of the solver logging macros.
//!
//! `info!(ctx, "message", name = value, = expr)` expands to a call of `Logger::log` on
//! `ctx.logger()` with a closure that appends every argument to the log message. String literals
//! are appended verbatim, everything else is formatted using `Debug`.
use proc_macro2::{Span, TokenStream};
use quote::{quote, ToTokens};
use syn::{
    ext::IdentExt,
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    Expr, ExprLit, Ident, Lit, LitStr, Token,
};

use crate::crate_path;

/// A single argument of a logging macro.
#[allow(clippy::large_enum_variant)]
enum LogArg {
    /// A string literal.
    Text(String),
    /// An optionally named value.
    Value { label: Option<String>, expr: Expr },
}

impl Parse for LogArg {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut label = None;

        let expr: Expr = if input.peek(Token![=]) {
            // `= expr` uses the expression's source as label
            input.parse::<Token![=]>()?;
            let expr: Expr = input.parse()?;
            label = Some(expr.to_token_stream().to_string());
            expr
        } else {
            if input.peek2(Token![=]) {
                if input.peek(Ident) {
                    label = Some(input.parse::<Ident>()?.to_string());
                    input.parse::<Token![=]>()?;
                } else if input.peek(LitStr) {
                    label = Some(input.parse::<LitStr>()?.value());
                    input.parse::<Token![=]>()?;
                }
            }
            input.parse()?
        };

        if let Expr::Lit(ExprLit {
            attrs,
            lit: Lit::Str(text),
        }) = &expr
        {
            if attrs.is_empty() && label.is_none() {
                return Ok(LogArg::Text(text.value()));
            }
        }

        Ok(LogArg::Value { label, expr })
    }
}

/// A piece of a log message after merging adjacent text.
#[allow(clippy::large_enum_variant)]
enum Piece {
    Text(String),
    Value(Expr),
}

/// Appends text, merging it with a directly preceding text piece.
fn push_text(pieces: &mut Vec<Piece>, text: String) {
    if let Some(Piece::Text(last)) = pieces.last_mut() {
        last.push(' ');
        last.push_str(&text);
    } else {
        pieces.push(Piece::Text(text));
    }
}

/// Builds the closure that populates a log message from the macro arguments.
fn message_closure(input: ParseStream) -> syn::Result<TokenStream> {
    let args = Punctuated::<LogArg, Token![,]>::parse_terminated(input)?;

    let mut pieces: Vec<Piece> = vec![];

    for arg in args {
        match arg {
            LogArg::Text(text) => push_text(&mut pieces, text),
            LogArg::Value { label, expr } => {
                if let Some(mut label) = label {
                    label.push(':');
                    push_text(&mut pieces, label);
                }
                pieces.push(Piece::Value(expr));
            }
        }
    }

    let message = Ident::new("message", Span::mixed_site());

    let mut body = TokenStream::default();
    for piece in pieces {
        body.extend(match piece {
            Piece::Text(text) => quote! { #message.add_message(#text); },
            Piece::Value(expr) => quote! { #message.add_value(&(#expr)); },
        });
    }

    Ok(quote!(|#message| { #body }))
}

/// Expands a logging macro for the given level.
///
/// The first argument names a value implementing `dlsat::log::HasLogger`.
pub fn log_statement(level: &str, input: ParseStream) -> syn::Result<TokenStream> {
    // `Ident::parse_any` also accepts `self`.
    let ctx = input.call(Ident::parse_any)?;
    if !input.is_empty() {
        input.parse::<Token![,]>()?;
    }

    let closure = message_closure(input)?;

    let dlsat = crate_path("dlsat")?;
    let level = Ident::new(level, Span::call_site());
    Ok(quote! {{
        use #dlsat::log::HasLogger;
        #ctx.logger().log(#dlsat::log::LogLevel::#level, #closure)
    }})
}
