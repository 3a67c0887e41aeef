use super::super::{Model, Msg};
use super::utils::{debounce, first_file};
use client::upload::MAX_UPLOAD_BYTES;
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, HtmlInputElement};
use yew::prelude::*;

pub fn render_upload_section(model: &Model, ctx: &Context<Model>) -> Html {
    if model.session.image().is_some() {
        return html! {};
    }

    let link = ctx.link();
    let handle_change = link.batch_callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let file = input.files().as_ref().and_then(first_file);
        input.set_value("");
        file.map(Msg::FileChosen)
    });

    let handle_drag_over = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(true)
    });

    let handle_drag_leave = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(false)
    });

    let handle_drop = link.callback(Msg::HandleDrop);
    let trigger_file_input = move || {
        if let Some(input) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("file-input"))
        {
            if let Ok(html_input) = input.dyn_into::<web_sys::HtmlElement>() {
                html_input.click();
            }
        }
    };

    html! {
        <div class="upload-section">
            <input
                type="file"
                id="file-input"
                accept="image/png,image/jpeg"
                style="display: none;"
                onchange={handle_change}
            />

            <div
                id="drop-zone"
                class={classes!("upload-area", model.is_dragging.then_some("drag-over"), model.reading_file.then_some("reading"))}
                ondragover={handle_drag_over}
                ondragleave={handle_drag_leave}
                ondrop={handle_drop}
                onclick={debounce(300, trigger_file_input)}
            >
                <div class="upload-placeholder">
                    <i class="fa-solid fa-x-ray"></i>
                    <p>{"Drag & drop a radiograph here, paste, or click"}</p>
                    <p class="file-types">
                        { format!("PNG or JPEG, up to {} MB", MAX_UPLOAD_BYTES / (1024 * 1024)) }
                    </p>
                </div>
            </div>
        </div>
    }
}
