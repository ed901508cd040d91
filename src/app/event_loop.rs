use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, DisableBracketedPaste, EnableBracketedPaste};
use ratatui::DefaultTerminal;

use crate::app::effects::TaskRunner;
use crate::app::{App, Message, Model, ToastLevel, update};
use crate::editor::BufferFactory;
use crate::intake::DialogPicker;
use crate::store::DocumentStore;
use crate::viewer::{AssetPaths, LopdfRenderer};

/// How long to wait for input while background work may still report back.
const TASK_POLL_MS: u64 = 30;
const IDLE_POLL_MS: u64 = 250;

pub(super) struct ResizeDebouncer {
    delay_ms: u64,
    pending: Option<(u16, u16, u64)>,
}

impl ResizeDebouncer {
    pub(super) const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub(super) const fn queue(&mut self, width: u16, height: u16, now_ms: u64) {
        self.pending = Some((width, height, now_ms));
    }

    pub(super) fn take_ready(&mut self, now_ms: u64) -> Option<(u16, u16)> {
        let (width, height, queued_at) = self.pending?;
        if now_ms.saturating_sub(queued_at) >= self.delay_ms {
            self.pending = None;
            Some((width, height))
        } else {
            None
        }
    }

    pub(super) const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the async runtime or the terminal cannot be set
    /// up, or the event loop hits an I/O failure.
    pub fn run(&mut self) -> Result<()> {
        let _run_scope = crate::perf::scope("app.run.total");

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("Failed to start async runtime")?;

        // Create image picker BEFORE initializing terminal (queries stdio)
        let picker = if self.images_enabled {
            let _picker_scope = crate::perf::scope("app.create_picker");
            crate::ui::create_picker(self.force_half_cell)
        } else {
            None
        };

        let init_scope = crate::perf::scope("app.ratatui_init");
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal - docmark requires an interactive terminal")?;
        if let Err(err) = crossterm::execute!(std::io::stdout(), EnableBracketedPaste) {
            tracing::debug!("bracketed paste unavailable: {err}");
        }
        let size = terminal.size()?;
        drop(init_scope);

        let store = DocumentStore::new().with_viewer_visible(self.viewer_visible);
        let mut model = Model::new(store, (size.width, size.height)).with_picker(picker);
        model.images_enabled = self.images_enabled;
        model
            .config_global_path
            .clone_from(&self.config_global_path);
        model.config_local_path.clone_from(&self.config_local_path);

        if let Err(err) = model.editor.mount(&BufferFactory, &model.store) {
            model.show_toast(ToastLevel::Warning, format!("Editor unavailable: {err}"));
        }

        let assets = AssetPaths::under(&self.asset_root);
        let (tx, rx) = mpsc::channel();
        let runner = TaskRunner::new(
            runtime.handle().clone(),
            tx,
            Arc::new(DialogPicker::new(self.dialog_dir())),
            Arc::clone(&self.converter),
            Arc::new(LopdfRenderer),
            assets,
        );

        let mut in_flight = 0;
        if let Some(path) = &self.initial_file {
            let msg = Message::OpenPath(path.display().to_string());
            in_flight += Self::dispatch(&runner, &mut model, msg);
        }

        let result = Self::event_loop(&mut terminal, &mut model, &runner, &rx, in_flight);

        model.editor.unmount();
        let _ = crossterm::execute!(std::io::stdout(), DisableBracketedPaste);
        ratatui::restore();
        // Superseded tasks may still be running (e.g. an open dialog).
        runtime.shutdown_timeout(Duration::from_millis(200));

        result
    }

    fn dialog_dir(&self) -> Option<std::path::PathBuf> {
        self.initial_file
            .as_ref()
            .and_then(|p| p.parent())
            .filter(|p| !p.as_os_str().is_empty())
            .map(std::path::Path::to_path_buf)
    }

    /// Apply one message and start whatever work it queued.
    ///
    /// Returns the number of background tasks started.
    pub(super) fn dispatch(runner: &TaskRunner, model: &mut Model, msg: Message) -> usize {
        let side_msg = msg.clone();
        *model = update(std::mem::take(model), msg);
        Self::handle_message_side_effects(runner, model, &side_msg)
    }

    fn event_loop(
        terminal: &mut DefaultTerminal,
        model: &mut Model,
        runner: &TaskRunner,
        completions: &Receiver<Message>,
        mut in_flight: usize,
    ) -> Result<()> {
        let start = Instant::now();
        let mut resize_debouncer = ResizeDebouncer::new(100);
        let mut frame_idx: u64 = 0;
        let mut needs_render = true;

        loop {
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }

            let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
            if let Some((width, height)) = resize_debouncer.take_ready(now_ms) {
                crate::perf::log_event(
                    "event.resize.apply",
                    format!("frame={frame_idx} width={width} height={height}"),
                );
                in_flight += Self::dispatch(runner, model, Message::Resize(width, height));
                needs_render = true;
            }

            // Background completions, applied in arrival order.
            while let Ok(msg) = completions.try_recv() {
                crate::perf::log_event(
                    "task.complete",
                    format!("frame={frame_idx} msg={}", msg.name()),
                );
                in_flight = in_flight.saturating_sub(1);
                in_flight += Self::dispatch(runner, model, msg);
                needs_render = true;
            }

            let poll_ms = if needs_render {
                0
            } else if in_flight > 0 || resize_debouncer.is_pending() {
                TASK_POLL_MS
            } else {
                IDLE_POLL_MS
            };
            if event::poll(Duration::from_millis(poll_ms))? {
                // Coalesce key repeat bursts into a single render.
                loop {
                    let event_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                    let event = event::read()?;
                    if let Some(msg) =
                        Self::handle_event(&event, model, event_ms, &mut resize_debouncer)
                    {
                        crate::perf::log_event(
                            "event.message",
                            format!("frame={frame_idx} msg={}", msg.name()),
                        );
                        in_flight += Self::dispatch(runner, model, msg);
                        needs_render = true;
                    }
                    if !event::poll(Duration::from_millis(0))? {
                        break;
                    }
                }
            }

            if needs_render {
                frame_idx += 1;
                let draw_start = Instant::now();
                terminal.draw(|frame| crate::ui::render(model, frame))?;
                crate::perf::log_event(
                    "frame.draw",
                    format!(
                        "frame={} draw_ms={:.3}",
                        frame_idx,
                        draw_start.elapsed().as_secs_f64() * 1000.0
                    ),
                );
                needs_render = false;
            }

            if model.should_quit {
                break;
            }
        }
        Ok(())
    }
}
