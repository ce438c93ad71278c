use eframe::egui;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, warn};

use crate::config::Config;
use crate::keys::{self, Command};
use crate::pdf::{PageBitmap, PdfReply, PdfRequest, PdfWorker};
use crate::presentation::{self, PresentationMode};
use crate::render;
use crate::theme::Theme;
use crate::viewer::ingest::{self, FileSelection, FileSource};
use crate::viewer::source::{Frame, TextSlide};
use crate::viewer::{Notice, NoticeLevel, Viewer, ViewerOptions};

const FILE_FILTER: [&str; 4] = ["pdf", "pptx", "ppt", "odp"];

/// What the display surface currently shows.
enum Surface {
    Text(TextSlide),
    /// A PDF page; the texture is `None` until the first render lands.
    Page(Option<egui::TextureHandle>),
}

/// Follow-up work for the shell after a command.
#[derive(Debug, PartialEq)]
enum Effect {
    Show(Frame),
    PickFile,
    Quit,
    Nothing,
}

/// Apply one command to the viewer. Fullscreen goes through `mode`; the
/// rest is returned for the shell to carry out.
fn dispatch(
    viewer: &mut Viewer,
    command: Command,
    now: Instant,
    mode: &mut dyn PresentationMode,
) -> Effect {
    match command {
        Command::Advance => viewer.advance().map_or(Effect::Nothing, Effect::Show),
        Command::Retreat => viewer.retreat().map_or(Effect::Nothing, Effect::Show),
        Command::ToggleFullscreen => {
            presentation::toggle_fullscreen(mode);
            Effect::Nothing
        }
        Command::ExitFullscreen => {
            presentation::exit_fullscreen(mode);
            Effect::Nothing
        }
        Command::ToggleSlideshow => {
            viewer.toggle_slideshow(now);
            Effect::Nothing
        }
        Command::Open => Effect::PickFile,
        Command::Quit => Effect::Quit,
    }
}

struct ViewerApp {
    viewer: Viewer,
    worker: PdfWorker,
    theme: Theme,
    surface: Surface,
    start_fullscreen: bool,
    started: bool,
}

impl ViewerApp {
    fn new(
        ctx: &egui::Context,
        options: ViewerOptions,
        theme: Theme,
        start_fullscreen: bool,
        initial_file: Option<&Path>,
    ) -> std::io::Result<Self> {
        let wake_ctx = ctx.clone();
        let worker = PdfWorker::spawn(move || wake_ctx.request_repaint())?;

        let mut viewer = Viewer::new(options);
        let surface = match viewer.render_current() {
            Some(Frame::Text(slide)) => Surface::Text(slide),
            _ => Surface::Page(None),
        };

        let mut app = Self {
            viewer,
            worker,
            theme,
            surface,
            start_fullscreen,
            started: false,
        };
        if let Some(path) = initial_file {
            app.open(FileSelection::from_path(path));
        }
        Ok(app)
    }

    fn open(&mut self, selection: FileSelection) {
        if let Some(request) = self.viewer.ingest(selection) {
            self.worker.submit(PdfRequest::Load(request));
        }
    }

    fn pick_file(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Presentations", &FILE_FILTER)
            .add_filter("All files", &["*"])
            .set_title("Open Presentation")
            .pick_file()
        {
            self.open(FileSelection::from_path(&path));
        }
    }

    fn show(&mut self, frame: Frame) {
        match frame {
            Frame::Text(slide) => self.surface = Surface::Text(slide),
            Frame::Page(request) => {
                if matches!(self.surface, Surface::Text(_)) {
                    self.surface = Surface::Page(None);
                }
                self.worker.submit(PdfRequest::Render(request));
            }
        }
    }

    fn apply(&mut self, effect: Effect, ctx: &egui::Context) {
        match effect {
            Effect::Show(frame) => self.show(frame),
            Effect::PickFile => self.pick_file(),
            Effect::Quit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
            Effect::Nothing => {}
        }
    }

    fn drain_worker(&mut self, ctx: &egui::Context) {
        while let Some(reply) = self.worker.try_recv() {
            match reply {
                PdfReply::Loaded {
                    token,
                    page_count,
                    name,
                } => {
                    if let Some(frame) = self.viewer.document_loaded(token, page_count, &name) {
                        self.worker.submit(PdfRequest::Activate { document: token });
                        // Don't show a page of the previous document.
                        self.surface = Surface::Page(None);
                        self.show(frame);
                    }
                }
                PdfReply::LoadFailed { token, error } => {
                    self.viewer.document_failed(token, &error.to_string());
                }
                PdfReply::Rendered { token, bitmap } => {
                    if self.viewer.accept_render(token) {
                        self.upload_page(ctx, &bitmap);
                    }
                }
                PdfReply::RenderFailed { token, error } => {
                    self.viewer.render_failed(token, &error);
                }
            }
        }
    }

    fn upload_page(&mut self, ctx: &egui::Context, bitmap: &PageBitmap) {
        if !bitmap.is_well_formed() {
            warn!(?bitmap, "Discarding malformed page bitmap");
            return;
        }
        let image = egui::ColorImage::from_rgba_unmultiplied(
            [bitmap.width as usize, bitmap.height as usize],
            &bitmap.rgba,
        );
        let texture = ctx.load_texture("pdf-page", image, egui::TextureOptions::LINEAR);
        self.surface = Surface::Page(Some(texture));
    }

    fn collect_input(&mut self, ctx: &egui::Context) -> (Vec<Command>, Option<FileSelection>) {
        ctx.input_mut(|i| {
            let mut commands = Vec::new();
            for (key, command) in keys::BINDINGS {
                // Consuming keeps Space from also pressing a focused button.
                if i.consume_key(egui::Modifiers::NONE, key) {
                    commands.push(command);
                }
            }

            let dropped = ingest::first_selection(i.raw.dropped_files.iter().filter_map(|f| {
                if let Some(path) = &f.path {
                    Some(FileSelection::from_path(path))
                } else {
                    f.bytes.clone().map(|bytes| FileSelection {
                        name: f.name.clone(),
                        source: FileSource::Bytes(bytes),
                    })
                }
            }));
            (commands, dropped)
        })
    }

    fn draw_toolbar(&self, ctx: &egui::Context, commands: &mut Vec<Command>) {
        egui::TopBottomPanel::top("toolbar")
            .frame(egui::Frame::new().fill(self.theme.chrome_background).inner_margin(8.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if ui.button("Open\u{2026}").clicked() {
                        commands.push(Command::Open);
                    }
                    if let Some(doc) = self.viewer.active_document() {
                        ui.label(egui::RichText::new(&doc.name).color(self.theme.foreground));
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if let Some(status) = self.viewer.status() {
                            ui.label(egui::RichText::new(status).color(self.theme.accent));
                        }
                    });
                });
            });
    }

    fn draw_controls(&self, ctx: &egui::Context, commands: &mut Vec<Command>) {
        let controls = self.viewer.controls();
        egui::TopBottomPanel::bottom("controls")
            .frame(egui::Frame::new().fill(self.theme.chrome_background).inner_margin(8.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if ui
                        .add_enabled(controls.prev_enabled, egui::Button::new("\u{25C0} Prev"))
                        .clicked()
                    {
                        commands.push(Command::Retreat);
                    }
                    ui.label(
                        egui::RichText::new(format!(
                            "{} / {}",
                            self.viewer.current_index() + 1,
                            self.viewer.page_count()
                        ))
                        .monospace()
                        .color(self.theme.foreground),
                    );
                    if ui
                        .add_enabled(controls.next_enabled, egui::Button::new("Next \u{25B6}"))
                        .clicked()
                    {
                        commands.push(Command::Advance);
                    }

                    ui.separator();
                    let play_label = if self.viewer.is_playing() {
                        "\u{23F8} Pause"
                    } else {
                        "\u{25B6} Play"
                    };
                    let interval = self.viewer.slideshow_interval_secs();
                    if ui
                        .button(play_label)
                        .on_hover_text(format!("Advance every {interval}s"))
                        .clicked()
                    {
                        commands.push(Command::ToggleSlideshow);
                    }
                    if let Some(seconds) = self.viewer.countdown() {
                        ui.label(
                            egui::RichText::new(format!("Next slide in {seconds}s"))
                                .monospace()
                                .color(self.theme.accent),
                        );
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("\u{26F6} Fullscreen").clicked() {
                            commands.push(Command::ToggleFullscreen);
                        }
                    });
                });
            });
    }

    fn draw_surface(&self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(self.theme.background).inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                match &self.surface {
                    Surface::Text(slide) => render::draw_text_slide(ui, slide, &self.theme, rect),
                    Surface::Page(Some(texture)) => {
                        render::draw_page(ui, texture, &self.theme, rect)
                    }
                    Surface::Page(None) => render::draw_pending(ui, &self.theme, rect),
                }
            });
    }
}

fn show_notice(notice: &Notice) {
    let level = match notice.level {
        NoticeLevel::Info => rfd::MessageLevel::Info,
        NoticeLevel::Warning => rfd::MessageLevel::Warning,
        NoticeLevel::Error => rfd::MessageLevel::Error,
    };
    rfd::MessageDialog::new()
        .set_level(level)
        .set_title("pdfdeck")
        .set_description(notice.message.as_str())
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_worker(ctx);

        // Wait until the window is placed on a monitor before the one
        // startup request.
        if !self.started && presentation::has_display(ctx) {
            self.started = true;
            if self.start_fullscreen {
                presentation::enter_on_startup(presentation::for_context(ctx).as_mut());
            }
        }

        // Viewport commands are sent after the input closure
        // (sending inside ctx.input() causes RwLock deadlock)
        let (mut commands, dropped) = self.collect_input(ctx);
        if let Some(selection) = dropped {
            debug!(file = %selection.name, "File dropped");
            self.open(selection);
        }

        self.draw_toolbar(ctx, &mut commands);
        self.draw_controls(ctx, &mut commands);

        let now = Instant::now();
        for command in commands {
            let mut mode = presentation::for_context(ctx);
            let effect = dispatch(&mut self.viewer, command, now, mode.as_mut());
            self.apply(effect, ctx);
        }

        if let Some(frame) = self.viewer.poll(Instant::now()) {
            self.show(frame);
        }

        self.draw_surface(ctx);

        for notice in self.viewer.take_notices() {
            show_notice(&notice);
        }

        if let Some(wait) = self.viewer.next_wakeup(Instant::now()) {
            ctx.request_repaint_after(wait);
        }
    }
}

pub fn run(file: Option<PathBuf>, windowed: bool, interval: Option<u32>) -> anyhow::Result<()> {
    let config = Config::load_or_default();
    let options = config.viewer_options(interval);
    let theme = Theme::from_name(&config.theme());
    let start_fullscreen = !windowed && config.start_fullscreen();
    debug!(
        theme = %theme.name,
        interval = options.slideshow_interval_secs,
        scale = options.render_scale,
        start_fullscreen,
        "Starting viewer"
    );

    let title = match &file {
        Some(path) => format!(
            "pdfdeck - {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        ),
        None => "pdfdeck".to_string(),
    };

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([1280.0, 720.0])
        .with_title(&title)
        .with_drag_and_drop(true);

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        &title,
        native_options,
        Box::new(move |cc| {
            let app = ViewerApp::new(
                &cc.egui_ctx,
                options,
                theme,
                start_fullscreen,
                file.as_deref(),
            )?;
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
