use std::sync::Arc;
use std::sync::mpsc::Sender;

use tokio::runtime::Handle;
use tracing::debug;

use crate::app::model::{IntakeRequest, Task};
use crate::app::{App, Message, Model};
use crate::intake::{FilePicker, MarkdownConverter, PathPicker, convert_image};
use crate::viewer::{AssetPaths, PdfRenderer, RenderError};

/// Starts background work on the tokio runtime.
///
/// Every task reports back with exactly one [`Message`] on the channel; the
/// event loop applies it on the UI thread.
#[derive(Clone)]
pub(super) struct TaskRunner {
    handle: Handle,
    tx: Sender<Message>,
    dialog: Arc<dyn FilePicker>,
    converter: Arc<dyn MarkdownConverter>,
    renderer: Arc<dyn PdfRenderer>,
    assets: AssetPaths,
}

impl TaskRunner {
    pub(super) fn new(
        handle: Handle,
        tx: Sender<Message>,
        dialog: Arc<dyn FilePicker>,
        converter: Arc<dyn MarkdownConverter>,
        renderer: Arc<dyn PdfRenderer>,
        assets: AssetPaths,
    ) -> Self {
        Self {
            handle,
            tx,
            dialog,
            converter,
            renderer,
            assets,
        }
    }

    pub(super) fn spawn(&self, task: Task) {
        match task {
            Task::Pick(ticket, request) => {
                crate::perf::log_event("task.pick", format!("ticket={} {request:?}", ticket.seq()));
                let picker: Arc<dyn FilePicker> = match request {
                    IntakeRequest::Path(path) => Arc::new(PathPicker::new(path)),
                    IntakeRequest::Dialog => Arc::clone(&self.dialog),
                };
                let tx = self.tx.clone();
                self.handle.spawn(async move {
                    let result = picker.open_file().await;
                    send(&tx, Message::FilePicked(ticket, result));
                });
            }
            Task::Convert(ticket, url) => {
                crate::perf::log_event("task.convert", format!("ticket={} len={}", ticket.seq(), url.len()));
                let converter = Arc::clone(&self.converter);
                let tx = self.tx.clone();
                self.handle.spawn(async move {
                    let _scope = crate::perf::scope("task.convert.total");
                    let result = convert_image(&url, converter.as_ref()).await;
                    send(&tx, Message::MarkdownConverted(ticket, result));
                });
            }
            Task::LoadPdf(ticket, reference) => {
                crate::perf::log_event("task.load_pdf", format!("ticket={} {reference}", ticket.seq()));
                let renderer = Arc::clone(&self.renderer);
                let assets = self.assets.clone();
                let tx = self.tx.clone();
                self.handle.spawn(async move {
                    let _scope = crate::perf::scope("task.load_pdf.total");
                    let result =
                        tokio::task::spawn_blocking(move || renderer.load(&reference, &assets))
                            .await
                            .unwrap_or_else(|err| Err(RenderError::Task(err.to_string())));
                    send(&tx, Message::PdfLoaded(ticket, result));
                });
            }
        }
    }
}

fn send(tx: &Sender<Message>, msg: Message) {
    if tx.send(msg).is_err() {
        debug!("event loop gone; dropping task result");
    }
}

impl App {
    pub(super) fn handle_message_side_effects(
        runner: &TaskRunner,
        model: &mut Model,
        msg: &Message,
    ) -> usize {
        match msg {
            Message::FilePicked(_, Ok(None)) => {
                crate::perf::log_event("intake.cancelled", "no file selected");
            }
            Message::ToggleViewer => {
                crate::perf::log_event(
                    "layout.toggle",
                    format!("viewer_visible={}", model.store.viewer_visible()),
                );
            }
            _ => {}
        }
        let tasks = model.take_tasks();
        let started = tasks.len();
        for task in tasks {
            runner.spawn(task);
        }
        started
    }
}
