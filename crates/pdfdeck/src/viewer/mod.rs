//! Viewer state machine: navigation, slide source, slideshow timer and file
//! ingestion. Nothing here touches the window or the PDF engine; the app
//! feeds in user input, clock readings and worker replies, and acts on the
//! frames and notices that come back.

pub mod ingest;
pub mod slideshow;
pub mod source;

use std::time::{Duration, Instant};

use tracing::{debug, info, trace, warn};

use ingest::{FileKind, FileSelection, LoadRequest};
use slideshow::{Slideshow, Tick};
use source::{DocumentHandle, Frame, SlideSource};

pub const DEFAULT_RENDER_SCALE: f32 = 2.0;

const NO_DOCUMENT_FOR_SLIDESHOW: &str = "Please load a PDF first to start the slideshow.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A message for the blocking notification surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Enabled state of the prev/next controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

/// Tunables the viewer is created with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerOptions {
    pub slideshow_interval_secs: u32,
    pub render_scale: f32,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            slideshow_interval_secs: slideshow::DEFAULT_INTERVAL_SECS,
            render_scale: DEFAULT_RENDER_SCALE,
        }
    }
}

/// The single owned viewer state: current position, active source and
/// slideshow session.
///
/// `current_index` always lies in `[0, page_count - 1]`.
#[derive(Debug)]
pub struct Viewer {
    current_index: usize,
    source: SlideSource,
    slideshow: Slideshow,
    render_scale: f32,
    status: Option<String>,
    notices: Vec<Notice>,
    /// Latest issued render token; older completions are stale.
    render_token: u64,
    /// Latest issued load token; older decodes are stale.
    load_token: u64,
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new(ViewerOptions::default())
    }
}

impl Viewer {
    pub fn new(options: ViewerOptions) -> Self {
        Self {
            current_index: 0,
            source: SlideSource::default(),
            slideshow: Slideshow::new(options.slideshow_interval_secs),
            render_scale: options.render_scale,
            status: None,
            notices: Vec::new(),
            render_token: 0,
            load_token: 0,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn page_count(&self) -> usize {
        self.source.page_count()
    }

    pub fn active_document(&self) -> Option<&DocumentHandle> {
        self.source.document()
    }

    pub fn is_playing(&self) -> bool {
        self.slideshow.is_running()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Countdown readout, shown only while the slideshow runs.
    pub fn countdown(&self) -> Option<u32> {
        self.is_playing().then(|| self.slideshow.readout())
    }

    pub fn slideshow_interval_secs(&self) -> u32 {
        self.slideshow.interval_secs()
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn is_last_page(&self) -> bool {
        self.current_index + 1 >= self.page_count()
    }

    pub fn controls(&self) -> Controls {
        if self.is_playing() {
            return Controls {
                prev_enabled: false,
                next_enabled: false,
            };
        }
        Controls {
            prev_enabled: self.current_index > 0,
            next_enabled: !self.is_last_page(),
        }
    }

    /// Frame for the current position. Each PDF frame carries a fresh render
    /// token, invalidating every render still in flight.
    pub fn render_current(&mut self) -> Option<Frame> {
        if self.source.document().is_some() {
            self.render_token += 1;
        }
        self.source
            .render_current(self.current_index, self.render_token, self.render_scale)
    }

    /// Manual forward navigation. Ignored at the last page and while the
    /// slideshow runs.
    pub fn advance(&mut self) -> Option<Frame> {
        if self.is_playing() || self.is_last_page() {
            return None;
        }
        self.current_index += 1;
        self.render_current()
    }

    /// Manual backward navigation. Ignored at the first page and while the
    /// slideshow runs.
    pub fn retreat(&mut self) -> Option<Frame> {
        if self.is_playing() || self.current_index == 0 {
            return None;
        }
        self.current_index -= 1;
        self.render_current()
    }

    /// Whether a finished render should be put on screen.
    pub fn accept_render(&self, token: u64) -> bool {
        if token == self.render_token {
            true
        } else {
            trace!(token, latest = self.render_token, "Discarding stale render");
            false
        }
    }

    /// Render failures are logged and otherwise ignored; the previous frame
    /// stays on screen.
    pub fn render_failed(&self, token: u64, error: &dyn std::fmt::Display) {
        if token == self.render_token {
            warn!(page = self.current_index + 1, "Failed to render PDF page: {error}");
        } else {
            trace!(token, "Stale render failed: {error}");
        }
    }

    /// Dispatch a selected file by extension. Returns a load request for
    /// PDFs; everything else is rejected with guidance and leaves the
    /// viewer untouched.
    pub fn ingest(&mut self, selection: FileSelection) -> Option<LoadRequest> {
        let kind = selection.kind();
        if let Some(rejection) = kind.rejection() {
            info!(file = %selection.name, ?kind, "Rejected file");
            self.notices
                .push(Notice::new(NoticeLevel::Warning, rejection.alert));
            self.status = rejection.status.map(str::to_string);
            return None;
        }

        debug_assert_eq!(kind, FileKind::Pdf);
        self.load_token += 1;
        debug!(file = %selection.name, token = self.load_token, "Loading PDF");
        Some(LoadRequest {
            token: self.load_token,
            selection,
        })
    }

    /// A decode finished. Replaces the active document, resets to the first
    /// page and stops a running slideshow.
    pub fn document_loaded(&mut self, token: u64, page_count: usize, name: &str) -> Option<Frame> {
        if token != self.load_token {
            trace!(token, latest = self.load_token, "Discarding stale document");
            return None;
        }
        if page_count == 0 {
            self.document_failed(token, "the document has no pages");
            return None;
        }

        if self.slideshow.stop() {
            debug!("Slideshow stopped: document replaced");
        }
        info!(file = %name, pages = page_count, "PDF loaded");
        self.source = SlideSource::Pdf(DocumentHandle {
            token,
            page_count,
            name: name.to_string(),
        });
        self.current_index = 0;
        self.status = Some(format!("PDF loaded: {page_count} pages"));
        self.render_current()
    }

    /// A read or decode failed. Alerts and clears the status line; the
    /// active document and position are kept.
    pub fn document_failed(&mut self, token: u64, message: &str) {
        if token != self.load_token {
            trace!(token, "Stale load failed: {message}");
            return;
        }
        warn!("Error loading PDF: {message}");
        self.notices.push(Notice::new(
            NoticeLevel::Error,
            format!("Error loading PDF: {message}"),
        ));
        self.status = None;
    }

    /// Start or stop the slideshow. Starting requires a loaded PDF.
    pub fn toggle_slideshow(&mut self, now: Instant) {
        if self.slideshow.stop() {
            debug!(page = self.current_index + 1, "Slideshow paused");
            return;
        }
        if self.source.document().is_none() {
            self.notices
                .push(Notice::new(NoticeLevel::Info, NO_DOCUMENT_FOR_SLIDESHOW));
            return;
        }
        debug!(
            page = self.current_index + 1,
            interval = self.slideshow.interval_secs(),
            "Slideshow started"
        );
        self.slideshow.start(now);
    }

    /// Run the countdown up to `now`. Returns the frame to show if the
    /// slideshow advanced.
    pub fn poll(&mut self, now: Instant) -> Option<Frame> {
        let mut frame = None;
        while self.slideshow.poll(now) == Tick::Expired {
            if self.is_last_page() {
                self.slideshow.stop();
                debug!("Slideshow finished at the last page");
                break;
            }
            self.current_index += 1;
            debug!(page = self.current_index + 1, "Slideshow advanced");
            frame = self.render_current();
            self.slideshow.restart();
        }
        frame
    }

    /// How long the UI may sleep before the next countdown tick is due.
    pub fn next_wakeup(&self, now: Instant) -> Option<Duration> {
        self.slideshow
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    fn select(name: &str) -> FileSelection {
        FileSelection::from_path(Path::new(name))
    }

    /// Load a PDF with `pages` pages through the normal ingest path.
    fn viewer_with_pdf(pages: usize) -> Viewer {
        let mut viewer = Viewer::default();
        let req = viewer.ingest(select("deck.pdf")).unwrap();
        viewer.document_loaded(req.token, pages, "deck.pdf");
        viewer
    }

    #[test]
    fn test_initial_state() {
        let viewer = Viewer::default();
        assert_eq!(viewer.current_index(), 0);
        assert_eq!(viewer.page_count(), 3);
        assert!(viewer.active_document().is_none());
        assert!(!viewer.is_playing());
        assert!(viewer.countdown().is_none());
        assert_eq!(
            viewer.controls(),
            Controls {
                prev_enabled: false,
                next_enabled: true
            }
        );
    }

    #[test]
    fn test_navigation_stays_in_bounds() {
        let mut viewer = Viewer::default();
        assert!(viewer.retreat().is_none());
        assert_eq!(viewer.current_index(), 0);

        assert!(viewer.advance().is_some());
        assert!(viewer.advance().is_some());
        assert_eq!(viewer.current_index(), 2);
        assert!(viewer.advance().is_none());
        assert_eq!(viewer.current_index(), 2);
        assert_eq!(
            viewer.controls(),
            Controls {
                prev_enabled: true,
                next_enabled: false
            }
        );

        viewer.retreat();
        assert_eq!(
            viewer.controls(),
            Controls {
                prev_enabled: true,
                next_enabled: true
            }
        );
    }

    #[test]
    fn test_text_frames_follow_index() {
        let mut viewer = Viewer::default();
        match viewer.advance() {
            Some(Frame::Text(slide)) => assert_eq!(slide.title, "Slide 2"),
            other => panic!("expected text frame, got {other:?}"),
        }
    }

    #[test]
    fn test_loading_pdf_resets_index_and_total() {
        let mut viewer = Viewer::default();
        viewer.advance();
        viewer.advance();
        assert_eq!(viewer.current_index(), 2);

        let req = viewer.ingest(select("talk.pdf")).unwrap();
        let frame = viewer.document_loaded(req.token, 7, "talk.pdf");
        assert_eq!(viewer.current_index(), 0);
        assert_eq!(viewer.page_count(), 7);
        assert_eq!(viewer.status(), Some("PDF loaded: 7 pages"));
        match frame {
            Some(Frame::Page(r)) => assert_eq!(r.page_number, 1),
            other => panic!("expected page frame, got {other:?}"),
        }

        viewer.advance();
        let req = viewer.ingest(select("other.pdf")).unwrap();
        viewer.document_loaded(req.token, 2, "other.pdf");
        assert_eq!(viewer.current_index(), 0);
        assert_eq!(viewer.page_count(), 2);
    }

    #[test]
    fn test_pptx_never_mutates_state() {
        let mut viewer = viewer_with_pdf(4);
        viewer.advance();
        let doc_before = viewer.active_document().cloned();

        assert!(viewer.ingest(select("talk.pptx")).is_none());
        assert_eq!(viewer.active_document().cloned(), doc_before);
        assert_eq!(viewer.current_index(), 1);
        assert_eq!(viewer.status(), Some("Please convert PowerPoint to PDF"));

        let notices = viewer.take_notices();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].message.contains("PowerPoint"));
        assert!(notices[0].message.contains("Convert to PDF"));
    }

    #[test]
    fn test_unsupported_file_clears_status() {
        let mut viewer = viewer_with_pdf(2);
        assert!(viewer.ingest(select("photo.png")).is_none());
        assert!(viewer.status().is_none());
        assert_eq!(
            viewer.take_notices()[0].message,
            "Please upload a PDF file (.pdf)"
        );
        assert_eq!(viewer.page_count(), 2);
    }

    #[test]
    fn test_decode_failure_keeps_document() {
        let mut viewer = viewer_with_pdf(5);
        viewer.advance();
        let req = viewer.ingest(select("broken.pdf")).unwrap();
        viewer.document_failed(req.token, "Invalid PDF structure");

        assert_eq!(viewer.page_count(), 5);
        assert_eq!(viewer.current_index(), 1);
        assert!(viewer.status().is_none());
        let notices = viewer.take_notices();
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert_eq!(notices[0].message, "Error loading PDF: Invalid PDF structure");
    }

    #[test]
    fn test_empty_document_is_a_load_failure() {
        let mut viewer = Viewer::default();
        let req = viewer.ingest(select("empty.pdf")).unwrap();
        assert!(viewer.document_loaded(req.token, 0, "empty.pdf").is_none());
        assert!(viewer.active_document().is_none());
        assert_eq!(viewer.page_count(), 3);
        assert_eq!(viewer.take_notices().len(), 1);
    }

    #[test]
    fn test_stale_load_is_discarded() {
        let mut viewer = Viewer::default();
        let first = viewer.ingest(select("first.pdf")).unwrap();
        let second = viewer.ingest(select("second.pdf")).unwrap();

        viewer.document_loaded(second.token, 3, "second.pdf");
        assert!(viewer.document_loaded(first.token, 9, "first.pdf").is_none());
        assert_eq!(viewer.page_count(), 3);
        assert_eq!(viewer.active_document().unwrap().name, "second.pdf");

        viewer.document_failed(first.token, "late failure");
        assert!(viewer.take_notices().is_empty());
        assert_eq!(viewer.status(), Some("PDF loaded: 3 pages"));
    }

    #[test]
    fn test_stale_render_is_discarded() {
        let mut viewer = viewer_with_pdf(4);
        let Some(Frame::Page(first)) = viewer.advance() else {
            panic!("expected page frame");
        };
        let Some(Frame::Page(second)) = viewer.advance() else {
            panic!("expected page frame");
        };
        assert!(second.token > first.token);
        assert!(!viewer.accept_render(first.token));
        assert!(viewer.accept_render(second.token));
    }

    #[test]
    fn test_slideshow_requires_pdf() {
        let mut viewer = Viewer::default();
        viewer.toggle_slideshow(Instant::now());
        assert!(!viewer.is_playing());
        let notices = viewer.take_notices();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].message.contains("load a PDF first"));
    }

    #[test]
    fn test_slideshow_disables_manual_navigation() {
        let mut viewer = viewer_with_pdf(3);
        viewer.toggle_slideshow(Instant::now());
        assert!(viewer.is_playing());
        assert_eq!(viewer.countdown(), Some(45));
        assert_eq!(
            viewer.controls(),
            Controls {
                prev_enabled: false,
                next_enabled: false
            }
        );
        assert!(viewer.advance().is_none());
        assert_eq!(viewer.current_index(), 0);
    }

    #[test]
    fn test_slideshow_runs_to_last_page_and_stops() {
        let t0 = Instant::now();
        let mut viewer = viewer_with_pdf(3);
        viewer.toggle_slideshow(t0);

        assert!(viewer.poll(t0 + secs(44)).is_none());
        assert_eq!(viewer.countdown(), Some(1));

        let frame = viewer.poll(t0 + secs(45));
        assert!(matches!(frame, Some(Frame::Page(r)) if r.page_number == 2));
        assert_eq!(viewer.current_index(), 1);
        assert_eq!(viewer.countdown(), Some(45));

        viewer.poll(t0 + secs(90));
        assert_eq!(viewer.current_index(), 2);
        assert!(viewer.is_playing());

        assert!(viewer.poll(t0 + secs(135)).is_none());
        assert!(!viewer.is_playing());
        assert_eq!(viewer.current_index(), 2);
        assert_eq!(
            viewer.controls(),
            Controls {
                prev_enabled: true,
                next_enabled: false
            }
        );
    }

    #[test]
    fn test_slideshow_catches_up_after_long_gap() {
        let t0 = Instant::now();
        let mut viewer = viewer_with_pdf(3);
        viewer.toggle_slideshow(t0);
        viewer.poll(t0 + secs(600));
        assert!(!viewer.is_playing());
        assert_eq!(viewer.current_index(), 2);
    }

    #[test]
    fn test_toggle_off_cancels_pending_advance() {
        let t0 = Instant::now();
        let mut viewer = viewer_with_pdf(3);
        viewer.toggle_slideshow(t0);
        viewer.poll(t0 + secs(30));
        viewer.toggle_slideshow(t0 + secs(30));
        assert!(!viewer.is_playing());
        assert!(viewer.countdown().is_none());

        assert!(viewer.poll(t0 + secs(45)).is_none());
        assert!(viewer.poll(t0 + secs(300)).is_none());
        assert_eq!(viewer.current_index(), 0);
        assert!(viewer.next_wakeup(t0 + secs(300)).is_none());
        assert!(viewer.controls().next_enabled);
    }

    #[test]
    fn test_restarted_slideshow_counts_from_full_interval() {
        let t0 = Instant::now();
        let mut viewer = viewer_with_pdf(3);
        viewer.toggle_slideshow(t0);
        viewer.poll(t0 + secs(40));
        viewer.toggle_slideshow(t0 + secs(40));
        viewer.toggle_slideshow(t0 + secs(41));
        assert_eq!(viewer.countdown(), Some(45));
        assert!(viewer.poll(t0 + secs(85)).is_none());
        assert!(viewer.poll(t0 + secs(86)).is_some());
    }

    #[test]
    fn test_new_document_stops_slideshow() {
        let t0 = Instant::now();
        let mut viewer = viewer_with_pdf(3);
        viewer.toggle_slideshow(t0);
        let req = viewer.ingest(select("next.pdf")).unwrap();
        viewer.document_loaded(req.token, 5, "next.pdf");
        assert!(!viewer.is_playing());
        assert!(viewer.poll(t0 + secs(45)).is_none());
        assert_eq!(viewer.current_index(), 0);
    }

    #[test]
    fn test_next_wakeup_tracks_tick() {
        let t0 = Instant::now();
        let mut viewer = viewer_with_pdf(2);
        assert!(viewer.next_wakeup(t0).is_none());
        viewer.toggle_slideshow(t0);
        assert_eq!(viewer.next_wakeup(t0), Some(secs(1)));
        assert_eq!(viewer.next_wakeup(t0 + secs(5)), Some(Duration::ZERO));
    }

    #[test]
    fn test_custom_interval() {
        let t0 = Instant::now();
        let mut viewer = Viewer::new(ViewerOptions {
            slideshow_interval_secs: 5,
            render_scale: 1.0,
        });
        let req = viewer.ingest(select("deck.pdf")).unwrap();
        viewer.document_loaded(req.token, 2, "deck.pdf");
        viewer.toggle_slideshow(t0);
        assert_eq!(viewer.countdown(), Some(5));
        let frame = viewer.poll(t0 + secs(5));
        assert!(matches!(frame, Some(Frame::Page(r)) if r.scale == 1.0));
    }
}
