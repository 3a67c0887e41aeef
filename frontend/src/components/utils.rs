use super::super::Model;
use gloo_file::File as GlooFile;
use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::FileList;
use yew::prelude::*;

// Debounce function to limit button events
pub fn debounce<F>(duration: u32, callback: F) -> Callback<MouseEvent>
where
    F: Fn() + Clone + 'static,
{
    let timeout = Rc::new(RefCell::new(None::<Timeout>));

    Callback::from(move |_| {
        let mut timeout_ref = timeout.borrow_mut();

        if let Some(old_timeout) = timeout_ref.take() {
            old_timeout.cancel();
        }

        let inner_callback = callback.clone();
        *timeout_ref = Some(Timeout::new(duration, move || inner_callback()));
    })
}

/// Only one image is analysed at a time; extra files are ignored.
pub fn first_file(file_list: &FileList) -> Option<GlooFile> {
    if file_list.length() > 1 {
        log::warn!("{} files supplied, using the first", file_list.length());
    }
    file_list.item(0).map(GlooFile::from)
}

pub fn format_bytes(size: u64) -> String {
    const KIB: f64 = 1024.0;
    let size = size as f64;
    if size >= KIB * KIB {
        format!("{:.1} MB", size / (KIB * KIB))
    } else if size >= KIB {
        format!("{:.1} KB", size / KIB)
    } else {
        format!("{} B", size)
    }
}

pub fn render_error_message(model: &Model) -> Html {
    if let Some(error_msg) = model.session.error() {
        let class = if model.session.is_synthetic() { "warning-message" } else { "error-message" };
        html! {
            <div class={class}>
                <i class="fa-solid fa-circle-exclamation"></i>
                <p>{ error_msg }</p>
            </div>
        }
    } else {
        html! {}
    }
}
