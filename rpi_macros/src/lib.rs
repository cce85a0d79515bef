//! Macros that generate low-level boilerplate code.
//!
//! The generated items only exist when building for a bare-metal target
//! (`target_os = "none"`). On any other target the annotated function is
//! emitted unchanged.

use proc_macro::TokenStream;

use quote::{format_ident, quote};
use syn::{parse_macro_input, ItemFn};

/// Generates the boilerplate required to call the provided function on boot.
///
/// It also generates a panic handler that prints the panic location and
/// message on the UART and parks the core.
///
/// Under the hood it specifies that the entrypoint must be placed into a
/// section called `.entry`.
///
/// The Raspberry Pi 3 Model B expects the entrypoint of the kernel to be at
/// 0x80000. Therefore, we need the linker to place the section `.entry` at
/// this address.
///
/// The following example shows how to do this using a Cargo configuration
/// file.
///
/// ```text
/// [target.aarch64-unknown-none]
/// rustflags = [
///     "-Clink-arg=--image-base=0x80000",
///     "-Clink-arg=--section-start=.entry=0x80000",
/// ]
/// ```
#[proc_macro_attribute]
pub fn entrypoint(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let item_fn = parse_macro_input!(item as ItemFn);

    if !item_fn.sig.inputs.is_empty() {
        return syn::Error::new_spanned(
            &item_fn.sig.inputs,
            "the entrypoint must not take arguments",
        )
        .to_compile_error()
        .into();
    }

    let fname_rust = &item_fn.sig.ident;
    let fname_c = format_ident!("_rpi_c_{}", fname_rust);

    let tokens = quote! {
        // The stack grows downwards from the load address of the image.
        #[cfg(target_os = "none")]
        core::arch::global_asm!(
            ".pushsection .entry, \"ax\"",
            ".global _start",
            "_start:",
            "    ldr x5, =0x80000",
            "    mov sp, x5",
            "    bl {main}",
            "1:",
            "    wfe",
            "    b 1b",
            ".ltorg",
            ".popsection",
            main = sym #fname_c,
        );

        #[cfg(target_os = "none")]
        extern "C" fn #fname_c() {
            #fname_rust();
        }

        #[cfg(target_os = "none")]
        #[panic_handler]
        fn panic(info: &core::panic::PanicInfo) -> ! {
            rpi::print!("\n\n!!! PANIC !!!\n\n");

            if let Some(location) = info.location() {
                rpi::print!("{}:{}", location.file(), location.line());
            }

            rpi::println!(": {}", info.message());

            loop {
                rpi::cpu::wfe();
            }
        }

        #item_fn
    };

    tokens.into()
}
