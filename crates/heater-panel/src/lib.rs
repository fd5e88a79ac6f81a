pub mod app;
pub mod components;
#[cfg(feature = "ssr")]
pub mod state;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    use crate::app::*;

    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        leptos::logging::error!("error initializing log: {}", e);
    }

    log::debug!("hydrating heater panel");
    leptos::mount::hydrate_body(App);
}
