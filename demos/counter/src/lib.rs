use cardboard::widgets::Counter;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn render() {
    cardboard::run(Counter::new(), "app").expect("Failed to start app")
}
