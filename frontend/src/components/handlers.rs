use super::super::{Model, Msg};
use super::utils::first_file;
use client::{FileMeta, ReadTicket, Upload};
use gloo_file::{File as GlooFile, ObjectUrl};
use gloo_storage::{LocalStorage, Storage};
use wasm_bindgen_futures::spawn_local;
use web_sys::{ClipboardEvent, DragEvent};
use yew::prelude::*;

const THEME_KEY: &str = "theme";

pub fn handle_file_chosen(model: &mut Model, ctx: &Context<Model>, file: GlooFile) -> bool {
    let meta = FileMeta {
        name: file.name(),
        mime: file.raw_mime_type(),
        size: file.size(),
    };
    let Ok(ticket) = model.session.begin_read(&meta) else {
        return true;
    };

    model.reading_file = true;
    let link = ctx.link().clone();
    spawn_local(async move {
        let bytes = gloo_file::futures::read_as_bytes(&file)
            .await
            .map_err(|e| e.to_string());
        link.send_message(Msg::FileRead(ticket, file, bytes));
    });
    true
}

pub fn handle_file_read(
    model: &mut Model,
    ticket: ReadTicket,
    file: GlooFile,
    bytes: Result<Vec<u8>, String>,
) -> bool {
    let bytes = match bytes {
        Ok(bytes) => bytes,
        Err(e) => {
            log::error!("Failed to read {}: {}", file.name(), e);
            model.reading_file = false;
            return true;
        }
    };
    let upload = Upload::new(file.name(), file.raw_mime_type(), bytes);
    // Rejections are recorded on the session and rendered from there.
    match model
        .session
        .finish_read(ticket, upload, move |_| ObjectUrl::from(file))
    {
        Some(_) => {
            model.reading_file = false;
            true
        }
        None => false,
    }
}

pub fn handle_analyze(model: &mut Model, ctx: &Context<Model>) -> bool {
    let Some(dispatch) = model.session.begin_prediction() else {
        return false;
    };

    let transport = model.transport.clone();
    let link = ctx.link().clone();
    spawn_local(async move {
        if let Some(completion) = dispatch.send(&transport).await {
            link.send_message(Msg::PredictionFinished(completion));
        }
    });
    true
}

pub fn stored_theme() -> String {
    LocalStorage::get::<String>(THEME_KEY).unwrap_or_else(|_| "light".to_string())
}

pub fn apply_theme(theme: &str) {
    let Some(body) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.body())
    else {
        return;
    };
    let result = if theme == "dark" {
        body.class_list().add_1("dark-mode")
    } else {
        body.class_list().remove_1("dark-mode")
    };
    if result.is_err() {
        log::warn!("Failed to apply {} theme", theme);
    }
}

pub fn handle_toggle_theme(model: &mut Model) -> bool {
    model.theme = if model.theme == "light" { "dark" } else { "light" }.to_string();
    apply_theme(&model.theme);
    if LocalStorage::set(THEME_KEY, &model.theme).is_err() {
        log::warn!("Could not persist theme preference");
    }
    true
}

pub fn handle_drop(model: &mut Model, ctx: &Context<Model>, event: DragEvent) -> bool {
    event.prevent_default();
    model.is_dragging = false;

    if let Some(file) = event
        .data_transfer()
        .and_then(|data_transfer| data_transfer.files())
        .and_then(|file_list| first_file(&file_list))
    {
        ctx.link().send_message(Msg::FileChosen(file));
    }

    true
}

pub fn handle_paste(ctx: &Context<Model>, event: ClipboardEvent) -> bool {
    if let Some(file) = event
        .clipboard_data()
        .and_then(|data_transfer| data_transfer.files())
        .and_then(|file_list| first_file(&file_list))
    {
        event.prevent_default();
        ctx.link().send_message(Msg::FileChosen(file));
        return true;
    }
    false
}
