#![forbid(unsafe_code)]
//! Browser bindings for Footle.
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod app;
pub mod config;
pub mod dom;
pub mod paths;
pub mod provider;
pub mod storage;

pub use app::{AppCore, AppError, FootleApp, HintView, ProgressView};
pub use provider::{HttpProvider, ProviderError};
pub use storage::LocalStore;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    log::info!("footle web bindings loaded from {}", paths::data_base());
}
