//! Procedural macros for webblock - attribute schema literals.
//!
//! Provides the `attributes!` macro for declaring a component's attribute
//! schema.

mod descriptor;
mod suggestions;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{braced, token, Expr, Ident, LitStr, Result, Token};

use descriptor::{is_type_tag_ident, key_names, DescriptorKey};
use suggestions::{format_duplicate_error, format_unknown_key_error};

/// Declares an attribute schema.
///
/// Each entry is one of:
///
/// - a type tag: `count: Number` (any capitalized identifier; unknown tags
///   are accepted and coerced as text at runtime)
/// - a descriptor: `label: { type: String, default: "foo" }`, or
///   `parts: { converter: |el, raw| ..., default: PropValue::empty_list() }`
/// - a converter shorthand: `parts: |el, raw| ...` or a function path
///
/// Attribute names are identifiers or string literals (`"data-id": String`).
///
/// # Example
///
/// ```ignore
/// use webblock::prelude::*;
///
/// let schema = attributes! {
///     name: String,
///     count: { type: Number, default: 0 },
///     "data-tags": |_el, raw| match raw {
///         Some(text) => PropValue::list(text.split(':').map(PropValue::from)),
///         None => PropValue::empty_list(),
///     },
/// };
/// ```
#[proc_macro]
pub fn attributes(input: TokenStream) -> TokenStream {
    let schema = syn::parse_macro_input!(input as SchemaLiteral);
    schema.to_tokens().into()
}

struct SchemaLiteral {
    entries: Punctuated<Entry, Token![,]>,
}

impl Parse for SchemaLiteral {
    fn parse(input: ParseStream) -> Result<Self> {
        Ok(SchemaLiteral {
            entries: Punctuated::parse_terminated(input)?,
        })
    }
}

impl SchemaLiteral {
    fn to_tokens(&self) -> TokenStream2 {
        let mut seen: Vec<String> = Vec::new();
        let mut inserts = Vec::new();

        for entry in &self.entries {
            let name = entry.name.value();
            if seen.contains(&name) {
                let msg = format_duplicate_error(&name);
                return syn::Error::new(entry.name.span(), msg).to_compile_error();
            }
            seen.push(name.clone());

            let value = entry.value.to_tokens();
            inserts.push(quote! { __schema.insert(#name, #value); });
        }

        quote! {
            {
                let mut __schema = ::webblock::Schema::new();
                #( #inserts )*
                __schema
            }
        }
    }
}

/// `name: value`
struct Entry {
    name: AttrName,
    value: EntryValue,
}

impl Parse for Entry {
    fn parse(input: ParseStream) -> Result<Self> {
        let name: AttrName = input.parse()?;
        input.parse::<Token![:]>()?;
        let value: EntryValue = input.parse()?;
        Ok(Entry { name, value })
    }
}

enum AttrName {
    Ident(Ident),
    Lit(LitStr),
}

impl AttrName {
    fn value(&self) -> String {
        match self {
            AttrName::Ident(ident) => ident.to_string(),
            AttrName::Lit(lit) => lit.value(),
        }
    }

    fn span(&self) -> proc_macro2::Span {
        match self {
            AttrName::Ident(ident) => ident.span(),
            AttrName::Lit(lit) => lit.span(),
        }
    }
}

impl Parse for AttrName {
    fn parse(input: ParseStream) -> Result<Self> {
        if input.peek(LitStr) {
            Ok(AttrName::Lit(input.parse()?))
        } else {
            Ok(AttrName::Ident(input.call(Ident::parse_any)?))
        }
    }
}

enum EntryValue {
    /// A capitalized identifier such as `Number`.
    Type(Ident),
    Descriptor(Descriptor),
    /// Any other expression; used as a converter.
    Converter(Expr),
}

impl Parse for EntryValue {
    fn parse(input: ParseStream) -> Result<Self> {
        if input.peek(token::Brace) {
            return Ok(EntryValue::Descriptor(input.parse()?));
        }
        let fork = input.fork();
        if let Ok(ident) = fork.parse::<Ident>() {
            let ends_entry = fork.is_empty() || fork.peek(Token![,]);
            if ends_entry && is_type_tag_ident(&ident.to_string()) {
                input.parse::<Ident>()?;
                return Ok(EntryValue::Type(ident));
            }
        }
        Ok(EntryValue::Converter(input.parse()?))
    }
}

impl EntryValue {
    fn to_tokens(&self) -> TokenStream2 {
        match self {
            EntryValue::Type(ident) => type_tag_tokens(ident),
            EntryValue::Descriptor(descriptor) => descriptor.to_tokens(),
            EntryValue::Converter(expr) => quote! {
                ::webblock::core::SchemaEntry::<::webblock::Element>::converter(#expr)
            },
        }
    }
}

fn type_tag_tokens(ident: &Ident) -> TokenStream2 {
    let name = ident.to_string();
    quote! { ::webblock::core::TypeTag::from_name(#name) }
}

/// `{ type: T, converter: f, default: v }`, every key optional.
struct Descriptor {
    ty: Option<Ident>,
    converter: Option<Expr>,
    default: Option<Expr>,
}

impl Parse for Descriptor {
    fn parse(input: ParseStream) -> Result<Self> {
        let content;
        braced!(content in input);

        let mut descriptor = Descriptor {
            ty: None,
            converter: None,
            default: None,
        };
        let mut seen: Vec<String> = Vec::new();

        while !content.is_empty() {
            let key = content.call(Ident::parse_any)?;
            let key_name = key.to_string();
            content.parse::<Token![:]>()?;

            if seen.contains(&key_name) {
                return Err(syn::Error::new(
                    key.span(),
                    format!("descriptor key `{key_name}` given more than once"),
                ));
            }

            match DescriptorKey::from_name(&key_name) {
                Some(DescriptorKey::Type) => descriptor.ty = Some(content.parse()?),
                Some(DescriptorKey::Converter) => descriptor.converter = Some(content.parse()?),
                Some(DescriptorKey::Default) => descriptor.default = Some(content.parse()?),
                None => {
                    let msg = format_unknown_key_error(&key_name, &key_names());
                    return Err(syn::Error::new(key.span(), msg));
                }
            }
            seen.push(key_name);

            if content.peek(Token![,]) {
                content.parse::<Token![,]>()?;
            } else if !content.is_empty() {
                return Err(content.error("expected `,` between descriptor keys"));
            }
        }

        Ok(descriptor)
    }
}

impl Descriptor {
    fn to_tokens(&self) -> TokenStream2 {
        let ty = self.ty.as_ref().map(|ident| {
            let tag = type_tag_tokens(ident);
            quote! { .ty(#tag) }
        });
        let converter = self.converter.as_ref().map(|expr| {
            let span = expr.span();
            quote::quote_spanned! {span=> .converter(#expr) }
        });
        let default = self
            .default
            .as_ref()
            .map(|expr| quote! { .default_value(#expr) });

        quote! {
            ::webblock::core::Descriptor::<::webblock::Element>::new()
                #ty
                #converter
                #default
        }
    }
}
