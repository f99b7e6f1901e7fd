// vim: tw=80
use proc_macro2::{TokenStream, TokenTree};
use quote::{format_ident, quote};
use syn::{
    ext::IdentExt,
    parse::Parser,
    spanned::Spanned,
    ImplItem,
    Item,
    ItemImpl,
    ItemTrait,
    LitStr,
    Path,
    TraitItem,
    Type
};

/// `#[prototype(..)]` arguments
#[derive(Debug, Default)]
struct Attrs {
    extends: Option<Path>,
    name: Option<LitStr>,
}

impl Attrs {
    fn parse(ts: TokenStream) -> syn::Result<Self> {
        let mut attrs = Attrs::default();
        let parser = syn::meta::parser(|meta| {
            if meta.path.is_ident("extends") {
                if attrs.extends.replace(meta.value()?.parse()?).is_some() {
                    return Err(meta.error("duplicate `extends` argument"));
                }
                Ok(())
            } else if meta.path.is_ident("name") {
                if attrs.name.replace(meta.value()?.parse()?).is_some() {
                    return Err(meta.error("duplicate `name` argument"));
                }
                Ok(())
            } else {
                Err(meta.error("unsupported prototype argument"))
            }
        });
        parser.parse2(ts)?;
        Ok(attrs)
    }
}

/// One member of the generated prototype
enum Member {
    Method(String),
    /// Name and an expression producing a `protomock::Value`
    Property(String, TokenStream),
}

impl Member {
    /// The builder call that defines this member
    fn define(&self) -> TokenStream {
        match self {
            Member::Method(name) => quote!(.method(#name)),
            Member::Property(name, value) => quote!(.property(#name, #value)),
        }
    }
}

/// Does `ts` name `Self` anywhere, including inside groups?
fn mentions_self(ts: TokenStream) -> bool {
    ts.into_iter().any(|tt| match tt {
        TokenTree::Ident(ident) => ident == "Self",
        TokenTree::Group(group) => mentions_self(group.stream()),
        _ => false
    })
}

/// Trait consts become properties.  A default that mentions `Self` depends
/// on the implementor, so like a const without a default it is `undefined`.
fn trait_members(item: &ItemTrait) -> Vec<Member> {
    item.items.iter()
        .filter_map(|ti| match ti {
            TraitItem::Fn(f) => {
                Some(Member::Method(f.sig.ident.unraw().to_string()))
            },
            TraitItem::Const(c) => {
                let value = match &c.default {
                    Some((_, expr)) if !mentions_self(quote!(#expr)) => {
                        quote!(::protomock::Value::from(#expr))
                    },
                    _ => quote!(::protomock::Value::Undefined),
                };
                Some(Member::Property(c.ident.unraw().to_string(), value))
            },
            _ => None
        }).collect()
}

fn impl_members(item: &ItemImpl) -> Vec<Member> {
    let self_ty = &item.self_ty;
    item.items.iter()
        .filter_map(|ii| match ii {
            ImplItem::Fn(f) => {
                Some(Member::Method(f.sig.ident.unraw().to_string()))
            },
            ImplItem::Const(c) => {
                let ident = &c.ident;
                let value = quote!(::protomock::Value::from(<#self_ty>::#ident));
                Some(Member::Property(ident.unraw().to_string(), value))
            },
            _ => None
        }).collect()
}

/// Generate the body of `Describe::descriptor`
fn descriptor_fn(default_name: String, attrs: &Attrs, members: &[Member])
    -> TokenStream
{
    let name = attrs.name.as_ref()
        .map(LitStr::value)
        .unwrap_or(default_name);
    let extends = attrs.extends.as_ref().map(|path| quote!(
        .extends(&<#path as ::protomock::Describe>::descriptor())
    ));
    let defines = members.iter().map(Member::define);
    quote! {
        fn descriptor() -> ::protomock::ClassDescriptor {
            ::protomock::ClassDescriptor::new(#name)
                #extends
                #(#defines)*
        }
    }
}

fn describe_trait(attrs: &Attrs, item: &ItemTrait) -> TokenStream {
    let vis = &item.vis;
    let ident = &item.ident;
    let struct_ident = format_ident!("{}Prototype", ident);
    let doc = format!(" Class descriptor for [`{}`].", ident.unraw());
    let body = descriptor_fn(ident.unraw().to_string(), attrs,
                             &trait_members(item));
    quote! {
        #[doc = #doc]
        #vis struct #struct_ident;
        impl ::protomock::Describe for #struct_ident {
            #body
        }
    }
}

/// The class name for an inherent impl: the last segment of its self type
fn class_name(ty: &Type) -> syn::Result<String> {
    if let Type::Path(tp) = ty {
        if let Some(seg) = tp.path.segments.last() {
            return Ok(seg.ident.unraw().to_string());
        }
    }
    Err(syn::Error::new(ty.span(),
        "#[prototype] requires an impl block for a named type"))
}

fn describe_impl(attrs: &Attrs, item: &ItemImpl) -> syn::Result<TokenStream> {
    if let Some((_, path, _)) = &item.trait_ {
        return Err(syn::Error::new(path.span(),
            "#[prototype] can't be used on trait impls.  Put it on the trait instead."));
    }
    let self_ty = &item.self_ty;
    let (ig, _tg, wc) = item.generics.split_for_impl();
    let body = descriptor_fn(class_name(self_ty)?, attrs, &impl_members(item));
    Ok(quote! {
        impl #ig ::protomock::Describe for #self_ty #wc {
            #body
        }
    })
}

pub(crate) fn expand(attrs: TokenStream, input: TokenStream)
    -> syn::Result<TokenStream>
{
    let attrs = Attrs::parse(attrs)?;
    let item: Item = syn::parse2(input)?;
    let describe = match &item {
        Item::Trait(item_trait) => describe_trait(&attrs, item_trait),
        Item::Impl(item_impl) => describe_impl(&attrs, item_impl)?,
        other => return Err(syn::Error::new(other.span(),
            "#[prototype] only applies to traits and inherent impl blocks"))
    };
    Ok(quote! {
        #item
        #describe
    })
}
