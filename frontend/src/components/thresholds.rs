use super::super::{Model, Msg};
use shared::Disease;
use web_sys::HtmlInputElement;
use yew::prelude::*;

pub fn render_threshold_panel(model: &Model, ctx: &Context<Model>) -> Html {
    let store = model.session.selection().thresholds();
    let link = ctx.link();
    let pristine = store.is_pristine(model.session.registry());

    html! {
        <div class="threshold-panel">
            <div class="panel-header">
                <h3>{"Decision thresholds"}</h3>
                <button
                    class="reset-btn"
                    disabled={pristine}
                    title="Restore the model's default thresholds"
                    onclick={link.callback(|_| Msg::ResetThresholds)}
                >
                    <i class="fa-solid fa-rotate-left"></i>{" Reset"}
                </button>
            </div>
            { for Disease::all().map(|disease| {
                let oninput = link.callback(move |e: InputEvent| {
                    let input: HtmlInputElement = e.target_unchecked_into();
                    Msg::SetThreshold(disease, input.value())
                });
                html! {
                    <div class="threshold-row" key={disease.to_string()}>
                        <label for={format!("threshold-{}", disease)}>{ disease.label() }</label>
                        <input
                            id={format!("threshold-{}", disease)}
                            type="number"
                            min="0"
                            max="1"
                            step="0.01"
                            value={format!("{:.2}", store.get(disease))}
                            {oninput}
                        />
                    </div>
                }
            })}
        </div>
    }
}
