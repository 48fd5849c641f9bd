//! Multi-window preview workspace.

use dioxus::prelude::*;

mod actions;
mod components;
mod effects;
pub mod frame;
mod shell;
pub mod shortcuts;
pub mod state;

pub use shell::PreviewDesktop;

#[component]
pub fn Desktop() -> Element {
    rsx! {
        PreviewDesktop {}
    }
}
