use super::super::Model;
use client::DiseaseCall;
use yew::prelude::*;

fn render_call(call: &DiseaseCall) -> Html {
    let percentage = call.probability * 100.0;
    let marker = call.threshold * 100.0;

    html! {
        <div class={classes!("result-item", call.risk.css_class(), call.positive.then_some("positive"))}>
            <div class="result-label">{ call.disease.label() }</div>
            <div class="result-bar-container">
                <div class="result-bar" style={format!("width: {:.1}%", percentage)}></div>
                <div class="threshold-marker" style={format!("left: {:.1}%", marker)}
                    title={format!("Threshold {:.0}%", marker)}></div>
            </div>
            <div class="result-value">{ format!("{:.1}%", percentage) }</div>
            <div class="result-call">
                { if call.positive { "Positive" } else { "Negative" } }
                <span class="risk-label">{ call.risk.label() }</span>
            </div>
        </div>
    }
}

pub fn render_results(model: &Model) -> Html {
    let Some(classification) = model.session.classification() else {
        return html! {};
    };
    let summary = classification.summary;
    let any_positive = summary.positive_count > 0;

    html! {
        <div class={classes!("results-container", if any_positive { "findings" } else { "no-findings" })}>
            if model.session.is_synthetic() {
                <p class="synthetic-notice">
                    <i class="fa-solid fa-flask"></i>
                    {" Simulated results: the inference service could not be reached."}
                </p>
            }
            <div class="result-header">
                <h2>{ format!("{} positive finding{}", summary.positive_count, if summary.positive_count == 1 { "" } else { "s" }) }</h2>
                <div class="summary-stats">
                    <span>{ format!("Mean probability {:.1}%", summary.mean_percent) }</span>
                    <span>{ format!("Highest: {} ({:.1}%)", summary.top_disease.label(), summary.top_probability * 100.0) }</span>
                </div>
                {
                    if let Some(meta) = model.session.meta() {
                        html! {
                            <p class="result-meta">
                                { format!("{} · {} · {:.2}s", meta.model_version, meta.config, meta.processing_time) }
                            </p>
                        }
                    } else {
                        html! {}
                    }
                }
            </div>
            <div class="detailed-results">
                <h3>{"Per-finding analysis"}</h3>
                <div class="result-bars">
                    { for classification.calls.iter().map(render_call) }
                </div>
            </div>
        </div>
    }
}
