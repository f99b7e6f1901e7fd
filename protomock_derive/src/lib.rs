// vim: tw=80
//! Proc Macros for use with Protomock
//!
//! You probably don't want to use this crate directly.  Instead, you use
//! its reexports via the [`protomock`](../protomock/index.html) crate.

extern crate proc_macro;

use proc_macro2::TokenStream;

mod prototype;

/// Generate a class descriptor from a trait or an inherent `impl` block.
///
/// The item itself is emitted unchanged.  Every `fn` becomes a declared
/// method and every associated `const` becomes a property holding the
/// const's value.
///
/// * On a trait `Foo`, generates a unit struct `FooPrototype` implementing
///   `protomock::Describe`.
/// * On `impl Foo { .. }`, implements `protomock::Describe` for `Foo`.
///
/// # Arguments
///
/// * `extends = Path`: chain `Path`'s descriptor as the parent prototype.
///   `Path` must implement `protomock::Describe`.
/// * `name = "..."`: override the class name.
///
/// # Examples
/// ```ignore
/// #[prototype]
/// trait Clazz {
///     const INITIAL: i32 = 0;
///     fn foo(&self, x: u32) -> u32;
/// }
///
/// let instance = mock(&ClazzPrototype::descriptor(), None).unwrap();
/// ```
#[proc_macro_attribute]
pub fn prototype(attrs: proc_macro::TokenStream, input: proc_macro::TokenStream)
    -> proc_macro::TokenStream
{
    do_prototype(attrs.into(), input.into()).into()
}

fn do_prototype(attrs: TokenStream, input: TokenStream) -> TokenStream {
    match prototype::expand(attrs, input.clone()) {
        Ok(output) => output,
        Err(e) => {
            // Keep the original item around to avoid a cascade of errors
            let mut output = input;
            output.extend(e.to_compile_error());
            output
        }
    }
}
