use super::super::{Model, Msg};
use yew::html::Scope;
use yew::prelude::*;

pub fn render_header() -> Html {
    html! {
        <header class="app-header">
            <h1><i class="fa-solid fa-lungs"></i> {" Chest X-ray Diagnostics"}</h1>
            <p class="subtitle">{"Multi-label screening for six thoracic findings"}</p>
        </header>
    }
}

pub fn render_theme_toggle(theme: &str, link: &Scope<Model>) -> Html {
    let (icon, title) = if theme == "light" {
        ("fa-solid fa-moon", "Switch to Dark Mode")
    } else {
        ("fa-solid fa-sun", "Switch to Light Mode")
    };

    html! {
        <button
            id="theme-toggle"
            class="theme-toggle"
            onclick={link.callback(|_| Msg::ToggleTheme)}
            title={title}
        >
            <i class={icon}></i>
        </button>
    }
}
