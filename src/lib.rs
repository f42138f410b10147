pub mod app;
pub mod error;
pub mod listing;
pub mod form;
pub mod models {
    pub mod document;
    pub mod options;
}
pub mod db {
    pub mod repository;
}
pub mod storage {
    pub mod client;
}
pub mod api {
    pub mod documents;
    pub mod errors;
    pub mod upload;
}
pub mod components {
    pub mod dashboard;
    pub mod document_detail;
    pub mod document_table;
    pub mod submission_form;
}
pub mod demo_seeder;
#[cfg(feature = "ssr")]
pub mod config;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(app::App);
}
