extern crate proc_macro;

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{punctuated::Punctuated, token::Comma, Error};

/// Name of the field attribute marking a field for injection.
const INJECT_ATTR: &str = "inject";
/// Name of the struct attribute listing the interfaces a type implements.
const IMPLEMENTS_ATTR: &str = "implements";

/// Check whether a field carries the inject attribute.
///
/// All three attribute forms count: `#[inject]`, `#[inject = "..."]` and
/// `#[inject(...)]`. The tokens after the path are never parsed.
fn is_injectable(attrs: &[syn::Attribute]) -> syn::Result<bool> {
    let mut marked = false;
    for attr in attrs.iter().filter(|attr| attr.path.is_ident(INJECT_ATTR)) {
        if marked {
            return Err(Error::new_spanned(attr, "duplicate `inject` attribute"));
        }
        marked = true;
    }
    Ok(marked)
}

fn field_member(index: usize, field: &syn::Field) -> syn::Member {
    match &field.ident {
        Some(ident) => syn::Member::Named(ident.clone()),
        None => syn::Member::Unnamed(index.into()),
    }
}

/// Implement `Apply` for a struct.
///
/// Given an input of the form:
/// ```ignore
/// #[derive(Inject)]
/// struct Handler<T> {
///     #[inject]
///     db: Option<Arc<Database>>,
///     #[inject]
///     sinks: Vec<Arc<dyn Sink>>,
///     local: T,
/// }
/// ```
/// this function will generate
/// ```ignore
/// impl<T> ::inject::Apply for Handler<T> {
///     #[allow(unused_variables)]
///     fn apply(
///         &mut self,
///         injector: &::inject::Injector,
///     ) -> ::core::result::Result<(), ::inject::InjectError> {
///         let __inject_0 = <Option<Arc<Database>> as ::inject::Resolve>::resolve(injector)?;
///         let __inject_1 = <Vec<Arc<dyn Sink>> as ::inject::Resolve>::resolve(injector)?;
///         self.db = __inject_0;
///         self.sinks = __inject_1;
///         ::core::result::Result::Ok(())
///     }
/// }
/// ```
/// Every marked field is resolved before the first one is assigned.
fn inject_impl(input: syn::DeriveInput) -> syn::Result<TokenStream> {
    let fields = match &input.data {
        syn::Data::Struct(data) => &data.fields,
        syn::Data::Enum(data) => {
            return Err(Error::new_spanned(
                data.enum_token,
                "expected struct, found enum",
            ))
        }
        syn::Data::Union(data) => {
            return Err(Error::new_spanned(
                data.union_token,
                "expected struct, found union",
            ))
        }
    };

    let mut members = Vec::new();
    let mut tys = Vec::new();
    for (index, field) in fields.iter().enumerate() {
        if is_injectable(&field.attrs)? {
            members.push(field_member(index, field));
            tys.push(&field.ty);
        }
    }
    let locals = (0..members.len())
        .map(|i| format_ident!("__inject_{}", i))
        .collect::<Vec<_>>();

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::inject::Apply for #ident #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn apply(
                &mut self,
                injector: &::inject::Injector,
            ) -> ::core::result::Result<(), ::inject::InjectError> {
                #(let #locals = <#tys as ::inject::Resolve>::resolve(injector)?;)*
                #(self.#members = #locals;)*
                ::core::result::Result::Ok(())
            }
        }
    })
}

fn implements_impl(input: syn::DeriveInput) -> syn::Result<TokenStream> {
    let mut interfaces = Vec::new();
    for attr in input
        .attrs
        .iter()
        .filter(|attr| attr.path.is_ident(IMPLEMENTS_ATTR))
    {
        let tys = attr.parse_args_with(Punctuated::<syn::Type, Comma>::parse_terminated)?;
        for ty in tys {
            match ty {
                syn::Type::TraitObject(_) => interfaces.push(ty),
                _ => {
                    return Err(Error::new_spanned(
                        ty,
                        "expected trait object type, e.g. `dyn Trait`",
                    ))
                }
            }
        }
    }
    if interfaces.is_empty() {
        return Err(Error::new_spanned(
            &input.ident,
            "expected at least one interface in `#[implements(...)]`",
        ));
    }

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::inject::Implements for #ident #ty_generics #where_clause {
            fn capabilities(caps: &mut ::inject::Capabilities<Self>) {
                #(caps.add::<#interfaces>(|this| this as ::std::sync::Arc<#interfaces>);)*
            }
        }
    })
}

fn interface_impl(attr: TokenStream, item: syn::ItemTrait) -> syn::Result<TokenStream> {
    if !attr.is_empty() {
        return Err(Error::new_spanned(attr, "`interface` takes no arguments"));
    }
    if !item.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &item.generics,
            "generic interfaces are not supported",
        ));
    }

    let ident = &item.ident;
    Ok(quote! {
        #item

        impl ::inject::Interface for dyn #ident {}
    })
}

/// Fill the fields marked `#[inject]` from an injector.
///
/// Marked fields may use any of `#[inject]`, `#[inject = "..."]` or
/// `#[inject(...)]`; any tokens inside the attribute are ignored. Each marked
/// field's type must implement `inject::Resolve`, which covers `Arc<T>`,
/// `Option<Arc<T>>` and `Vec<Arc<dyn Interface>>`. Unmarked fields are left
/// alone. Only structs are supported.
#[proc_macro_derive(Inject, attributes(inject))]
pub fn derive_inject(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);

    inject_impl(input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

/// Declare the interfaces a type can be resolved as:
/// ```ignore
/// #[derive(Implements)]
/// #[implements(dyn Greeter, dyn Named)]
/// struct English;
/// ```
/// Register values with `Injector::map_implementing` for the declarations to
/// take effect.
#[proc_macro_derive(Implements, attributes(implements))]
pub fn derive_implements(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);

    implements_impl(input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

/// Mark a trait as an interface, implementing `inject::Interface` for its
/// trait object type.
///
/// The trait must be object safe and have `Send + Sync` as supertraits for
/// its trait objects to be registered.
#[proc_macro_attribute]
pub fn interface(
    attr: proc_macro::TokenStream,
    item_stream: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    let item = syn::parse_macro_input!(item_stream as syn::ItemTrait);

    interface_impl(attr.into(), item)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
