use client::transport::{FIELD_CONFIG, FIELD_FILE, FIELD_MODEL, PREDICT_PATH};
use client::{ClientConfig, HttpReply, PredictRequest, PredictionTransport, TransportError};
use gloo_file::Blob;
use gloo_net::http::Request;
use wasm_bindgen::JsValue;
use web_sys::FormData;

fn js_error(value: JsValue) -> TransportError {
    TransportError(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}

fn net_error(e: gloo_net::Error) -> TransportError {
    TransportError(e.to_string())
}

/// Browser transport for `POST /predict` built on `fetch`.
#[derive(Clone)]
pub struct GlooTransport {
    config: ClientConfig,
}

impl GlooTransport {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }
}

impl PredictionTransport for GlooTransport {
    async fn send(&self, request: PredictRequest) -> Result<HttpReply, TransportError> {
        let blob = Blob::new_with_options(request.bytes.as_slice(), Some(request.mime.as_str()));
        let form_data = FormData::new().map_err(js_error)?;
        form_data
            .append_with_blob_and_filename(FIELD_FILE, blob.as_ref(), &request.file_name)
            .map_err(js_error)?;
        form_data
            .append_with_str(FIELD_MODEL, request.model.as_str())
            .map_err(js_error)?;
        form_data
            .append_with_str(FIELD_CONFIG, request.config.as_str())
            .map_err(js_error)?;

        let response = Request::post(&self.config.endpoint(PREDICT_PATH))
            .body(form_data)
            .map_err(net_error)?
            .send()
            .await
            .map_err(net_error)?;

        let status = response.status();
        let body = response.text().await.map_err(net_error)?;
        Ok(HttpReply { status, body })
    }
}
