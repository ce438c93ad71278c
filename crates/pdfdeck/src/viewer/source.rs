/// A static slide shown when no PDF is loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSlide {
    pub title: &'static str,
    pub content: &'static str,
}

pub const SAMPLE_SLIDES: [TextSlide; 3] = [
    TextSlide {
        title: "Slide 1",
        content: "Welcome to pdfdeck",
    },
    TextSlide {
        title: "Slide 2",
        content: "Open a PDF presentation to get started",
    },
    TextSlide {
        title: "Slide 3",
        content: "Use the navigation buttons or the arrow keys to move between slides",
    },
];

/// Viewer-side reference to a document held by the PDF worker.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentHandle {
    /// Load token the worker decoded this document under.
    pub token: u64,
    pub page_count: usize,
    pub name: String,
}

/// A request for the worker to rasterise one page of the active document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderRequest {
    pub token: u64,
    pub document: u64,
    /// 1-indexed, as the engine numbers pages.
    pub page_number: usize,
    pub scale: f32,
}

/// What the display surface should show for the current position.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Text(TextSlide),
    Page(RenderRequest),
}

/// The active content behind the viewer: the built-in text slides or a
/// decoded PDF.
#[derive(Debug, Clone)]
pub enum SlideSource {
    Text(&'static [TextSlide]),
    Pdf(DocumentHandle),
}

impl Default for SlideSource {
    fn default() -> Self {
        Self::Text(&SAMPLE_SLIDES)
    }
}

impl SlideSource {
    pub fn page_count(&self) -> usize {
        match self {
            Self::Text(slides) => slides.len(),
            Self::Pdf(doc) => doc.page_count,
        }
    }

    pub fn document(&self) -> Option<&DocumentHandle> {
        match self {
            Self::Text(_) => None,
            Self::Pdf(doc) => Some(doc),
        }
    }

    /// Build the frame for `index`. Returns `None` only for an index outside
    /// the text slide list, which bounded navigation never produces.
    pub fn render_current(&self, index: usize, token: u64, scale: f32) -> Option<Frame> {
        match self {
            Self::Text(slides) => slides.get(index).cloned().map(Frame::Text),
            Self::Pdf(doc) => Some(Frame::Page(RenderRequest {
                token,
                document: doc.token,
                page_number: index + 1,
                scale,
            })),
        }
    }
}
