use cardboard::widgets::{Gallery, UrlPolicy};
use cardboard::Config;
use log::LevelFilter;
use wasm_bindgen::prelude::*;

/// Mount the gallery. Pass `strict` to also reject whitespace-only urls.
#[wasm_bindgen]
pub fn render(strict: bool) {
    let policy = if strict {
        UrlPolicy::NonBlank
    } else {
        UrlPolicy::NonEmpty
    };
    let config = Config::default()
        .target("photos")
        .log_level(LevelFilter::Debug);
    cardboard::run_with(Gallery::with_policy(policy), config).expect("Failed to start app")
}
