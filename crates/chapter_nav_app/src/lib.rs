//! Content-script entry point. The sidebar only runs inside a browser page;
//! native builds of this crate are empty.
#[cfg(target_family = "wasm")]
mod platform;
