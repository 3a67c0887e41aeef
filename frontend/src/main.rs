mod api;
mod components;

use api::GlooTransport;
use client::{ClientConfig, Completion, ConfigRegistry, ReadTicket, Session, policy_for};
use components::handlers;
use components::header::{render_header, render_theme_toggle};
use components::preview_area::render_preview_area;
use components::results::render_results;
use components::selectors::render_selectors;
use components::thresholds::render_threshold_panel;
use components::upload_section::render_upload_section;
use components::utils::render_error_message;
use gloo_events::EventListener;
use gloo_file::{File as GlooFile, ObjectUrl};
use shared::{ConfigId, Disease, ModelId};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{ClipboardEvent, DragEvent};
use yew::prelude::*;

pub enum Msg {
    // Selection
    SelectConfig(ConfigId),
    SelectModel(ModelId),
    SetThreshold(Disease, String),
    ResetThresholds,

    // Image
    FileChosen(GlooFile),
    FileRead(ReadTicket, GlooFile, Result<Vec<u8>, String>),
    ClearImage,

    // Prediction
    Analyze,
    PredictionFinished(Completion),

    // UI states
    SetDragging(bool),
    ToggleTheme,

    // Input events
    HandleDrop(DragEvent),
    HandlePaste(ClipboardEvent),
}

pub struct Model {
    session: Session<ObjectUrl>,
    transport: GlooTransport,
    reading_file: bool,
    is_dragging: bool,
    paste_listener: Option<EventListener>,
    theme: String,
}

fn client_config() -> ClientConfig {
    ClientConfig::new(option_env!("API_BASE_URL"), option_env!("UNAVAILABLE_BACKEND"))
}

fn fallback_seed() -> u64 {
    (js_sys::Math::random() * u32::MAX as f64) as u64 ^ js_sys::Date::now() as u64
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let config = client_config();
        log::info!("Inference service: {}", config.api_base_url);

        let registry = Rc::new(ConfigRegistry::reference());
        let fallback = policy_for(config.unavailable_backend, fallback_seed());

        let mut model = Self {
            session: Session::new(registry, fallback),
            transport: GlooTransport::new(config),
            reading_file: false,
            is_dragging: false,
            paste_listener: None,
            theme: handlers::stored_theme(),
        };
        handlers::apply_theme(&model.theme);

        if let Some(window) = web_sys::window() {
            let link = ctx.link().clone();
            let listener = EventListener::new(&window, "paste", move |event| {
                if let Some(clipboard_event) = event.dyn_ref::<ClipboardEvent>() {
                    link.send_message(Msg::HandlePaste(clipboard_event.clone()));
                }
            });
            model.paste_listener = Some(listener);
        }

        model
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            // Selection
            Msg::SelectConfig(config) => {
                self.session.select_config(config);
                true
            }
            Msg::SelectModel(model) => {
                self.session.select_model(model);
                true
            }
            Msg::SetThreshold(disease, raw) => {
                self.session.set_threshold(disease, &raw);
                true
            }
            Msg::ResetThresholds => {
                self.session.reset_thresholds();
                true
            }

            // Image
            Msg::FileChosen(file) => handlers::handle_file_chosen(self, ctx, file),
            Msg::FileRead(ticket, file, bytes) => handlers::handle_file_read(self, ticket, file, bytes),
            Msg::ClearImage => {
                self.session.clear_image();
                self.reading_file = false;
                true
            }

            // Prediction
            Msg::Analyze => handlers::handle_analyze(self, ctx),
            Msg::PredictionFinished(completion) => self.session.complete_prediction(completion).is_some(),

            // UI states
            Msg::SetDragging(is_dragging) => {
                self.is_dragging = is_dragging;
                true
            }
            Msg::ToggleTheme => handlers::handle_toggle_theme(self),

            // Input events
            Msg::HandleDrop(event) => handlers::handle_drop(self, ctx, event),
            Msg::HandlePaste(event) => handlers::handle_paste(ctx, event),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                { render_header() }
                <div class="top-right">
                    { render_theme_toggle(&self.theme, ctx.link()) }
                </div>

                <main class="main-content">
                    <aside class="settings-panel">
                        { render_selectors(self, ctx) }
                        { render_threshold_panel(self, ctx) }
                    </aside>
                    <section class="analysis-panel">
                        { render_upload_section(self, ctx) }
                        { render_preview_area(self, ctx) }
                        { render_error_message(self) }
                        { render_results(self) }
                    </section>
                </main>

                <footer class="app-footer">
                    <p>{"Research demo only. Not for clinical use."}</p>
                </footer>
            </div>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.session.cancel_prediction();
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<Model>::new().render();
}
