//! Browser-only checks for blob object URLs.
//!
//! Run with: wasm-pack test --headless --firefox console-ui

#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

use console_ui::interop::BrowserObjectUrls;
use console_ui::viewers::source::ObjectUrls;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn text_urls_are_blob_urls_and_revocable() {
    let urls = BrowserObjectUrls;
    let handle = urls.create_text_url("hello").unwrap();
    assert!(handle.url().starts_with("blob:"));
    urls.release(handle);
}

#[wasm_bindgen_test]
fn binary_urls_carry_no_shared_state() {
    let urls = BrowserObjectUrls;
    let first = urls.create_binary_url(&[1, 2, 3], "application/pdf").unwrap();
    let second = urls.create_binary_url(&[1, 2, 3], "application/pdf").unwrap();
    assert_ne!(first.url(), second.url());
    urls.release(first);
    urls.release(second);
}
