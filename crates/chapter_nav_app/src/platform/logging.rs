//! Browser console logging for the content script.

/// Routes `log` records to the console and panics to `console.error`.
pub fn initialize(level: log::Level) {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::new(level).module_prefix("chapter_nav"));
}
