//! Compiler wrapper
//!
//! Installed in place of `cl.exe`. Prepends `/Brepro` and appends linker
//! options after every original argument, so they land behind the compiler's
//! own `/link` marker. Override at build time with `CHAIN_WRAPPER_CL_PROG`,
//! `CHAIN_WRAPPER_CL_ARG` and `CHAIN_WRAPPER_CL_ARG_POST`.

use chain_wrapper::{configured, main_with, WrapperConfig};

const CONFIG: WrapperConfig<'static> = WrapperConfig::new(
    configured(option_env!("CHAIN_WRAPPER_CL_PROG"), "cl_real.exe"),
    configured(option_env!("CHAIN_WRAPPER_CL_ARG"), "/Brepro"),
    configured(
        option_env!("CHAIN_WRAPPER_CL_ARG_POST"),
        "/link /emittoolversioninfo:no",
    ),
);

fn main() {
    main_with(&CONFIG)
}
