use proc_macro::TokenStream;
use quote::quote;
use syn::parse::{ParseStream, Parser};

mod log;

/// Logs a message at the `Info` level.
#[proc_macro]
pub fn info(input: TokenStream) -> TokenStream {
    log_macro("Info", input)
}

/// Logs a message at the `Verbose` level.
#[proc_macro]
pub fn verbose(input: TokenStream) -> TokenStream {
    log_macro("Verbose", input)
}

/// Logs a message at the `Debug` level.
#[proc_macro]
pub fn debug(input: TokenStream) -> TokenStream {
    log_macro("Debug", input)
}

/// Logs a message at the `Trace` level.
#[proc_macro]
pub fn trace(input: TokenStream) -> TokenStream {
    log_macro("Trace", input)
}

fn log_macro(level: &str, input: TokenStream) -> TokenStream {
    let parser = |input: ParseStream| log::log_statement(level, input);
    match parser.parse(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn crate_path(name: &str) -> syn::Result<proc_macro2::TokenStream> {
    let found_crate = proc_macro_crate::crate_name(name)
        .map_err(|err| syn::Error::new(proc_macro2::Span::call_site(), err.to_string()))?;
    Ok(match found_crate {
        proc_macro_crate::FoundCrate::Itself => quote!(crate),
        proc_macro_crate::FoundCrate::Name(name) => {
            let ident = syn::Ident::new(&name, proc_macro2::Span::call_site());
            quote!( ::#ident )
        }
    })
}
