use crate::classify::{Classification, classify};
use crate::error::ValidationError;
use crate::fallback::FallbackPolicy;
use crate::orchestrator::{Completion, Dispatch, Outcome, PredictionMeta, PredictionOrchestrator};
use crate::registry::ConfigRegistry;
use crate::results::ResultSet;
use crate::selection::{Selection, SelectionAction};
use crate::transport::{PredictRequest, PredictionTransport};
use crate::upload::{self, FileMeta, Upload, UploadSlot, UploadedImage};
use shared::{ConfigId, Disease, ModelId};
use std::rc::Rc;

/// Identifies one asynchronous file read. Only the most recent read may
/// install its image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadTicket(u64);

/// Everything one user works with: the selection, the uploaded image, and the
/// prediction state. `H` is the preview resource type of the host.
pub struct Session<H> {
    registry: Rc<ConfigRegistry>,
    selection: Selection,
    upload: UploadSlot<H>,
    prediction: PredictionOrchestrator,
    rejection: Option<ValidationError>,
    reads: u64,
}

impl<H> Session<H> {
    pub fn new(registry: Rc<ConfigRegistry>, fallback: Box<dyn FallbackPolicy>) -> Self {
        let selection = Selection::initial(&registry);
        Self {
            registry,
            selection,
            upload: UploadSlot::new(),
            prediction: PredictionOrchestrator::new(fallback),
            rejection: None,
            reads: 0,
        }
    }

    pub fn registry(&self) -> &ConfigRegistry {
        &self.registry
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn dispatch_selection(&mut self, action: SelectionAction) {
        self.selection.apply(&self.registry, action);
    }

    pub fn select_config(&mut self, config: ConfigId) {
        self.dispatch_selection(SelectionAction::SelectConfig(config));
    }

    pub fn select_model(&mut self, model: ModelId) {
        self.dispatch_selection(SelectionAction::SelectModel(model));
    }

    pub fn set_threshold(&mut self, disease: Disease, raw: &str) {
        self.dispatch_selection(SelectionAction::SetThreshold(disease, raw.to_string()));
    }

    pub fn reset_thresholds(&mut self) {
        self.dispatch_selection(SelectionAction::ResetThresholds);
    }

    /// Pre-read check of a file. A rejection is recorded for display.
    pub fn check_file(&mut self, meta: &FileMeta) -> Result<(), ValidationError> {
        upload::validate(meta).inspect_err(|e| {
            log::warn!("Rejected upload {}: {}", meta.name, e);
            self.rejection = Some(e.clone());
        })
    }

    /// Checks `meta` and, if it passes, starts a read that supersedes any
    /// read still pending.
    pub fn begin_read(&mut self, meta: &FileMeta) -> Result<ReadTicket, ValidationError> {
        self.check_file(meta)?;
        self.reads += 1;
        Ok(ReadTicket(self.reads))
    }

    /// Installs the bytes of a finished read. `None` when the read was
    /// superseded by a newer one or by a clear.
    pub fn finish_read<F>(
        &mut self,
        ticket: ReadTicket,
        upload: Upload,
        make_preview: F,
    ) -> Option<Result<(), ValidationError>>
    where
        F: FnOnce(&Upload) -> H,
    {
        if ticket.0 != self.reads {
            log::debug!("Ignoring stale read of {}", upload.name);
            return None;
        }
        Some(self.upload_image(upload, make_preview))
    }

    /// Accepts `upload` as the new image. Any previous image, result, error,
    /// and in-flight request are discarded.
    pub fn upload_image<F>(&mut self, upload: Upload, make_preview: F) -> Result<(), ValidationError>
    where
        F: FnOnce(&Upload) -> H,
    {
        match self.upload.replace(upload, make_preview) {
            Ok(_) => {
                self.prediction.clear();
                self.rejection = None;
                Ok(())
            }
            Err(e) => {
                self.rejection = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Removes the image together with any result and error. Pending reads
    /// are abandoned.
    pub fn clear_image(&mut self) {
        self.reads += 1;
        if self.upload.clear() {
            log::info!("Image cleared");
        }
        self.prediction.clear();
        self.rejection = None;
    }

    /// Starts a prediction for the current image and selection, clearing any
    /// displayed error. `None` when there is no image or a request is already
    /// in flight.
    pub fn begin_prediction(&mut self) -> Option<Dispatch> {
        if self.prediction.is_loading() {
            log::debug!("Prediction already in flight");
            return None;
        }
        let image = self.upload.current()?;
        let request = PredictRequest {
            file_name: image.name().to_string(),
            mime: image.mime().to_string(),
            bytes: image.bytes().to_vec(),
            model: self.selection.model().clone(),
            config: self.selection.config().clone(),
        };
        let dispatch = self.prediction.begin(request)?;
        self.rejection = None;
        Some(dispatch)
    }

    pub fn complete_prediction(&mut self, completion: Completion) -> Option<Outcome> {
        self.prediction.complete(completion)
    }

    pub fn cancel_prediction(&mut self) -> bool {
        self.prediction.cancel()
    }

    /// Begins, sends, and completes a prediction in one call.
    pub async fn run<T: PredictionTransport>(&mut self, transport: &T) -> Option<Outcome> {
        let dispatch = self.begin_prediction()?;
        let completion = dispatch.send(transport).await?;
        self.complete_prediction(completion)
    }

    pub fn image(&self) -> Option<&UploadedImage<H>> {
        self.upload.current()
    }

    pub fn results(&self) -> Option<&ResultSet> {
        self.prediction.results()
    }

    pub fn meta(&self) -> Option<&PredictionMeta> {
        self.prediction.meta()
    }

    pub fn is_loading(&self) -> bool {
        self.prediction.is_loading()
    }

    pub fn is_synthetic(&self) -> bool {
        self.prediction.is_synthetic()
    }

    /// The rejection of the last upload attempt, else the prediction error.
    pub fn error(&self) -> Option<String> {
        self.rejection
            .as_ref()
            .map(ToString::to_string)
            .or_else(|| self.prediction.error().map(str::to_string))
    }

    pub fn can_predict(&self) -> bool {
        self.upload.current().is_some() && !self.prediction.is_loading()
    }

    /// Calls for the current results against the current thresholds.
    pub fn classification(&self) -> Option<Classification> {
        self.results()
            .map(|results| classify(results, self.selection.thresholds().current()))
    }
}
