use wasm_bindgen::prelude::wasm_bindgen;

mod draw;
mod input;
mod instance;

#[wasm_bindgen]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}
