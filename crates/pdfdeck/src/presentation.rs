use eframe::egui;
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum PresentationError {
    #[error("fullscreen is not supported here")]
    Unsupported,
}

/// Whatever can put the viewer into fullscreen. Implementations query the
/// real display state instead of tracking it.
pub trait PresentationMode {
    fn is_fullscreen(&self) -> bool;
    fn request_fullscreen(&mut self) -> Result<(), PresentationError>;
    fn exit_fullscreen(&mut self);
}

pub fn toggle_fullscreen(mode: &mut dyn PresentationMode) {
    if mode.is_fullscreen() {
        debug!("Leaving fullscreen");
        mode.exit_fullscreen();
    } else if let Err(e) = mode.request_fullscreen() {
        warn!("Fullscreen request failed: {e}");
    }
}

pub fn exit_fullscreen(mode: &mut dyn PresentationMode) {
    if mode.is_fullscreen() {
        mode.exit_fullscreen();
    }
}

/// The one unprompted request made at startup. Failure is logged only.
pub fn enter_on_startup(mode: &mut dyn PresentationMode) {
    if let Err(e) = mode.request_fullscreen() {
        warn!("Could not enter fullscreen at startup: {e}");
    }
}

/// Fullscreen for the native window.
///
/// Commands are sent through the viewport, so this must not be used inside
/// a `ctx.input()` closure.
pub struct ViewportPresentation<'a> {
    ctx: &'a egui::Context,
}

impl<'a> ViewportPresentation<'a> {
    pub fn new(ctx: &'a egui::Context) -> Self {
        Self { ctx }
    }
}

impl PresentationMode for ViewportPresentation<'_> {
    fn is_fullscreen(&self) -> bool {
        self.ctx
            .input(|i| i.viewport().fullscreen.unwrap_or(false))
    }

    fn request_fullscreen(&mut self) -> Result<(), PresentationError> {
        self.ctx
            .send_viewport_cmd(egui::ViewportCommand::Fullscreen(true));
        Ok(())
    }

    fn exit_fullscreen(&mut self) {
        self.ctx
            .send_viewport_cmd(egui::ViewportCommand::Fullscreen(false));
    }
}

/// Fallback for targets without a display.
pub struct NoPresentation;

/// Whether the windowing backend reports a monitor for the window.
pub fn has_display(ctx: &egui::Context) -> bool {
    ctx.input(|i| i.viewport().monitor_size.is_some())
}

/// The fullscreen capability for this frame: the window itself when it sits
/// on a monitor, otherwise [`NoPresentation`].
pub fn for_context(ctx: &egui::Context) -> Box<dyn PresentationMode + '_> {
    if has_display(ctx) {
        Box::new(ViewportPresentation::new(ctx))
    } else {
        Box::new(NoPresentation)
    }
}

impl PresentationMode for NoPresentation {
    fn is_fullscreen(&self) -> bool {
        false
    }

    fn request_fullscreen(&mut self) -> Result<(), PresentationError> {
        Err(PresentationError::Unsupported)
    }

    fn exit_fullscreen(&mut self) {}
}
