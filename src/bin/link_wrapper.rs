//! Linker wrapper
//!
//! Installed in place of `link.exe`; every flag goes before the original
//! arguments. Override at build time with `CHAIN_WRAPPER_LINK_PROG`,
//! `CHAIN_WRAPPER_LINK_ARG` and `CHAIN_WRAPPER_LINK_ARG_POST`.

use chain_wrapper::{configured, main_with, WrapperConfig};

const CONFIG: WrapperConfig<'static> = WrapperConfig::new(
    configured(option_env!("CHAIN_WRAPPER_LINK_PROG"), "link_real.exe"),
    configured(option_env!("CHAIN_WRAPPER_LINK_ARG"), "/Brepro"),
    configured(option_env!("CHAIN_WRAPPER_LINK_ARG_POST"), ""),
);

fn main() {
    main_with(&CONFIG)
}
