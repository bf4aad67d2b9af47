mod api;
mod app;
mod components;
mod config;
pub mod hierarchy;
mod logging;
mod models;
mod pages;
mod state;
mod storage;

pub use app::App;
pub use models::OrgNode;

use leptos::prelude::*;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
    logging::init_logging();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "org console starting");
    mount_to_body(App);
}
