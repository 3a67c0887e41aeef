use super::super::{Model, Msg};
use super::utils::{debounce, format_bytes};
use yew::prelude::*;

pub fn render_preview_area(model: &Model, ctx: &Context<Model>) -> Html {
    let Some(image) = model.session.image() else {
        return html! {};
    };
    let link = ctx.link().clone();

    html! {
        <div id="preview-container">
            <img id="actual-image-preview" src={image.preview().to_string()} alt={image.name().to_string()} />
            <p class="image-details">
                { format!("{} ({})", image.name(), format_bytes(image.size())) }
            </p>
            <div class="button-container">
                <button
                    id="clear-btn"
                    class="analyze-btn"
                    style="background-color: var(--clear-color);"
                    onclick={link.callback(|_| Msg::ClearImage)}
                >
                    <i class="fa-solid fa-trash"></i>{" Clear"}
                </button>
                <button
                    class="analyze-btn"
                    onclick={debounce(300, {
                        let link = link.clone();
                        move || link.send_message(Msg::Analyze)
                    })}
                    disabled={!model.session.can_predict()}
                >
                    { render_analyze_button_content(model) }
                </button>
            </div>
        </div>
    }
}

fn render_analyze_button_content(model: &Model) -> Html {
    if model.session.is_loading() {
        html! { <><i class="fa-solid fa-spinner fa-spin"></i>{" Analyzing..."}</> }
    } else {
        let selection = model.session.selection();
        let model_name = model
            .session
            .registry()
            .model(selection.model())
            .map(|m| m.name.clone())
            .unwrap_or_else(|| selection.model().to_string());
        html! { <><i class="fa-solid fa-magnifying-glass"></i>{ format!(" Analyze with {}", model_name) }</> }
    }
}
