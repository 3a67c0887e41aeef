use client::{
    ConfigRegistry, FileMeta, HttpReply, Outcome, PredictRequest, PredictionTransport, Session, SurfaceFailure,
    SyntheticResults, TransportError, Upload, ValidationError,
};
use futures::executor::block_on;
use serde_json::json;
use shared::Disease;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

/// Replies in order and remembers what it was asked.
#[derive(Default)]
struct ScriptedTransport {
    replies: RefCell<VecDeque<Result<HttpReply, TransportError>>>,
    requests: RefCell<Vec<PredictRequest>>,
}

impl ScriptedTransport {
    fn with(replies: Vec<Result<HttpReply, TransportError>>) -> Self {
        Self {
            replies: RefCell::new(replies.into()),
            requests: RefCell::new(Vec::new()),
        }
    }

    fn sent(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl PredictionTransport for ScriptedTransport {
    async fn send(&self, request: PredictRequest) -> Result<HttpReply, TransportError> {
        self.requests.borrow_mut().push(request);
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError("no scripted reply".into())))
    }
}

struct Preview {
    live: Rc<Cell<i32>>,
}

impl Preview {
    fn untracked() -> Self {
        Self {
            live: Rc::new(Cell::new(1)),
        }
    }
}

impl Drop for Preview {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
    }
}

struct Harness {
    session: Session<Preview>,
    live: Rc<Cell<i32>>,
}

impl Harness {
    fn new() -> Self {
        Self::with_fallback(false)
    }

    fn with_fallback(synthetic: bool) -> Self {
        let registry = Rc::new(ConfigRegistry::reference());
        let session = if synthetic {
            Session::new(registry, Box::new(SyntheticResults::seeded(11)))
        } else {
            Session::new(registry, Box::new(SurfaceFailure))
        };
        Self {
            session,
            live: Rc::new(Cell::new(0)),
        }
    }

    fn upload(&mut self, name: &str, mime: &str, size: usize) -> Result<(), ValidationError> {
        let live = self.live.clone();
        self.session
            .upload_image(Upload::new(name, mime, vec![7; size]), move |_| {
                live.set(live.get() + 1);
                Preview { live }
            })
    }
}

fn reference_reply() -> Result<HttpReply, TransportError> {
    let body = json!({
        "success": true,
        "results": [
            {"disease": "Atelectasis", "prob": 0.9},
            {"disease": "Edema", "prob": 0.1},
            {"disease": "Lung_Opacity", "prob": 0.3},
            {"disease": "Pleural_Effusion", "prob": 0.5},
            {"disease": "Pneumonia", "prob": 0.2},
            {"disease": "Pneumothorax", "prob": 0.05}
        ],
        "processingTime": 0.52,
        "modelVersion": "efficientformerv2-s2",
        "config": "config3"
    });
    Ok(HttpReply::new(200, body.to_string()))
}

#[test]
fn end_to_end_prediction_and_classification() {
    let mut harness = Harness::new();
    harness.session.select_config("config3".into());
    harness.upload("scan.png", "image/png", 2048).unwrap();

    let transport = ScriptedTransport::with(vec![reference_reply()]);
    let outcome = block_on(harness.session.run(&transport));
    assert_eq!(outcome, Some(Outcome::Succeeded));

    let sent = &transport.requests.borrow()[0];
    assert_eq!(sent.model.as_str(), "efficientformerv2-s2");
    assert_eq!(sent.config.as_str(), "config3");
    assert_eq!(sent.file_name, "scan.png");
    assert_eq!(sent.bytes.len(), 2048);

    let classification = harness.session.classification().unwrap();
    assert_eq!(classification.summary.positive_count, 3);
    assert_eq!(classification.summary.mean_percent, 34.2);
    assert_eq!(classification.summary.top_disease, Disease::Atelectasis);
    assert_eq!(harness.session.meta().unwrap().processing_time, 0.52);
    assert!(harness.session.error().is_none());
}

#[test]
fn threshold_edits_reclassify_existing_results() {
    let mut harness = Harness::new();
    harness.upload("scan.png", "image/png", 16).unwrap();
    let transport = ScriptedTransport::with(vec![reference_reply()]);
    block_on(harness.session.run(&transport));

    harness.session.set_threshold(Disease::Pneumonia, "0.2");
    assert_eq!(harness.session.classification().unwrap().summary.positive_count, 4);

    harness.session.reset_thresholds();
    assert_eq!(harness.session.classification().unwrap().summary.positive_count, 3);
}

#[test]
fn run_without_image_sends_nothing() {
    let mut harness = Harness::new();
    let transport = ScriptedTransport::with(vec![reference_reply()]);
    assert_eq!(block_on(harness.session.run(&transport)), None);
    assert_eq!(transport.sent(), 0);
    assert!(!harness.session.can_predict());
}

#[test]
fn run_while_in_flight_is_a_no_op() {
    let mut harness = Harness::new();
    harness.upload("scan.jpg", "image/jpeg", 1024).unwrap();

    let pending = harness.session.begin_prediction().unwrap();
    assert!(harness.session.is_loading());

    let transport = ScriptedTransport::with(vec![reference_reply()]);
    assert_eq!(block_on(harness.session.run(&transport)), None);
    assert_eq!(transport.sent(), 0);
    assert!(harness.session.is_loading());

    let completion = block_on(pending.send(&transport)).unwrap();
    assert_eq!(harness.session.complete_prediction(completion), Some(Outcome::Succeeded));
    assert!(!harness.session.is_loading());
}

#[test]
fn clearing_always_resets_image_results_and_error() {
    let mut harness = Harness::new();
    harness.upload("scan.png", "image/png", 64).unwrap();
    let transport = ScriptedTransport::with(vec![reference_reply()]);
    block_on(harness.session.run(&transport));
    assert!(harness.session.results().is_some());

    harness.session.clear_image();
    assert!(harness.session.image().is_none());
    assert!(harness.session.results().is_none());
    assert!(harness.session.error().is_none());
    assert_eq!(harness.live.get(), 0);

    harness.session.clear_image();
    assert_eq!(harness.live.get(), 0);

    let failing = ScriptedTransport::with(vec![Ok(HttpReply::new(500, r#"{"error": "boom"}"#))]);
    harness.upload("scan.png", "image/png", 64).unwrap();
    block_on(harness.session.run(&failing));
    assert_eq!(harness.session.error().as_deref(), Some("boom"));

    harness.session.clear_image();
    assert!(harness.session.error().is_none());
}

#[test]
fn replacing_image_drops_stale_results_and_previews() {
    let mut harness = Harness::new();
    harness.upload("first.png", "image/png", 64).unwrap();
    let transport = ScriptedTransport::with(vec![reference_reply()]);
    block_on(harness.session.run(&transport));
    assert!(harness.session.results().is_some());

    for i in 0..5 {
        harness.upload(&format!("next-{i}.png"), "image/png", 64).unwrap();
        assert_eq!(harness.live.get(), 1);
    }
    assert!(harness.session.results().is_none());
    assert_eq!(harness.session.image().unwrap().name(), "next-4.png");
}

#[test]
fn clearing_during_flight_ignores_late_completion() {
    let mut harness = Harness::new();
    harness.upload("scan.png", "image/png", 64).unwrap();
    let pending = harness.session.begin_prediction().unwrap();
    let ticket = pending.ticket;

    harness.session.clear_image();
    assert!(!harness.session.is_loading());

    let late = client::Completion {
        ticket,
        reply: reference_reply(),
    };
    assert_eq!(harness.session.complete_prediction(late), None);
    assert!(harness.session.results().is_none());
}

#[test]
fn rejected_files_are_reported_and_cleared_by_next_upload() {
    let mut harness = Harness::new();
    let meta = FileMeta {
        name: "notes.txt".into(),
        mime: "text/plain".into(),
        size: 1024,
    };
    assert!(harness.session.check_file(&meta).is_err());
    assert!(harness.session.error().unwrap().contains("text/plain"));

    let oversize = harness.upload("huge.png", "image/png", 11 * 1024 * 1024);
    assert!(matches!(oversize, Err(ValidationError::TooLarge { .. })));
    assert!(harness.session.image().is_none());

    harness.upload("ok.png", "image/png", 9 * 1024 * 1024).unwrap();
    assert!(harness.session.error().is_none());
    assert!(harness.session.can_predict());
}

#[test]
fn successful_prediction_clears_earlier_rejection() {
    let mut harness = Harness::new();
    harness.upload("a.png", "image/png", 128).unwrap();
    let meta = FileMeta {
        name: "notes.txt".into(),
        mime: "text/plain".into(),
        size: 64,
    };
    assert!(harness.session.check_file(&meta).is_err());
    assert!(harness.session.error().is_some());
    assert_eq!(harness.session.image().unwrap().name(), "a.png");

    let transport = ScriptedTransport::with(vec![reference_reply()]);
    assert_eq!(block_on(harness.session.run(&transport)), Some(Outcome::Succeeded));
    assert!(harness.session.error().is_none());
    assert!(harness.session.results().is_some());
}

fn png_meta(name: &str) -> FileMeta {
    FileMeta {
        name: name.into(),
        mime: "image/png".into(),
        size: 32,
    }
}

fn png(name: &str) -> Upload {
    Upload::new(name, "image/png", vec![1; 32])
}

#[test]
fn clear_abandons_pending_read() {
    let mut harness = Harness::new();
    let ticket = harness.session.begin_read(&png_meta("a.png")).unwrap();
    harness.session.clear_image();

    assert!(harness.session.finish_read(ticket, png("a.png"), |_| Preview::untracked()).is_none());
    assert!(harness.session.image().is_none());
}

#[test]
fn older_read_finishing_last_is_ignored() {
    let mut harness = Harness::new();
    let first = harness.session.begin_read(&png_meta("first.png")).unwrap();
    let second = harness.session.begin_read(&png_meta("second.png")).unwrap();

    let installed = harness.session.finish_read(second, png("second.png"), |_| Preview::untracked());
    assert!(matches!(installed, Some(Ok(()))));
    assert!(harness.session.finish_read(first, png("first.png"), |_| Preview::untracked()).is_none());
    assert_eq!(harness.session.image().unwrap().name(), "second.png");
}

#[test]
fn rejected_file_issues_no_read() {
    let mut harness = Harness::new();
    let meta = FileMeta {
        name: "notes.txt".into(),
        mime: "text/plain".into(),
        size: 32,
    };
    assert!(harness.session.begin_read(&meta).is_err());
    assert!(harness.session.error().unwrap().contains("text/plain"));
}

#[test]
fn unreachable_backend_surfaces_without_fallback() {
    let mut harness = Harness::new();
    harness.upload("scan.png", "image/png", 64).unwrap();
    let transport = ScriptedTransport::default();
    assert_eq!(block_on(harness.session.run(&transport)), Some(Outcome::Failed));
    assert!(harness.session.results().is_none());
    assert_eq!(
        harness.session.error().as_deref(),
        Some("Network error: no scripted reply")
    );
}

#[test]
fn unreachable_backend_synthesizes_with_fallback() {
    let mut harness = Harness::with_fallback(true);
    harness.upload("scan.png", "image/png", 64).unwrap();
    let transport = ScriptedTransport::default();
    assert_eq!(block_on(harness.session.run(&transport)), Some(Outcome::Synthesized));
    assert!(harness.session.is_synthetic());

    let results = harness.session.results().unwrap();
    assert_eq!(results.iter().count(), Disease::count());
    assert!(results.iter().all(|(_, p)| (0.05..0.95).contains(&p)));
    assert!(harness.session.error().unwrap().contains("no scripted reply"));
}

#[test]
fn config_change_picks_first_model_and_reseeds() {
    let mut harness = Harness::new();
    harness.session.select_config("config4".into());
    harness.session.select_model("mobilevit-s".into());
    harness.session.set_threshold(Disease::Edema, "0.95");

    harness.session.select_config("config3".into());
    let selection = harness.session.selection();
    assert_eq!(selection.model().as_str(), "efficientformerv2-s2");
    assert_eq!(selection.thresholds().get(Disease::Edema), 0.40);
}
