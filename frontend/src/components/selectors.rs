use super::super::{Model, Msg};
use shared::{ConfigId, ModelId};
use web_sys::HtmlSelectElement;
use yew::prelude::*;

pub fn render_selectors(model: &Model, ctx: &Context<Model>) -> Html {
    let registry = model.session.registry();
    let selection = model.session.selection();
    let link = ctx.link();

    let on_config = link.callback(|e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        Msg::SelectConfig(ConfigId::new(select.value()))
    });
    let on_model = link.callback(|e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        Msg::SelectModel(ModelId::new(select.value()))
    });

    let models = registry.models_for(selection.config());
    let description = registry
        .config(selection.config())
        .map(|c| {
            format!(
                "{} | {}×{} input | LR {:e}",
                c.description, c.image_size, c.image_size, c.learning_rate
            )
        })
        .unwrap_or_default();

    html! {
        <div class="selector-group">
            <label for="config-select">{"Configuration"}</label>
            <select id="config-select" onchange={on_config} disabled={model.session.is_loading()}>
                { for registry.configs().iter().map(|c| html! {
                    <option value={c.id.to_string()} selected={&c.id == selection.config()}>
                        { &c.name }
                    </option>
                })}
            </select>
            <p class="config-description">{ description }</p>

            <label for="model-select">{"Model"}</label>
            {
                if models.is_empty() {
                    html! { <p class="no-models">{"No trained models for this configuration."}</p> }
                } else {
                    html! {
                        <select id="model-select" onchange={on_model} disabled={model.session.is_loading()}>
                            { for models.iter().map(|m| html! {
                                <option value={m.id.to_string()} selected={&m.id == selection.model()}>
                                    { &m.name }
                                </option>
                            })}
                        </select>
                    }
                }
            }
        </div>
    }
}
