//! PDF decoding and rasterising.
//!
//! The engine itself is an external library (PDFium). Everything that talks
//! to it runs on one worker thread, see [`worker`].

pub mod pdfium;
pub mod worker;

#[cfg(test)]
pub(crate) mod fake;

use std::path::PathBuf;

pub use worker::{PdfReply, PdfRequest, PdfWorker};

#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    #[error("PDF engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Decode(String),

    #[error("page {page} is out of range (document has {count} pages)")]
    PageOutOfRange { page: usize, count: usize },

    #[error("no document is loaded")]
    NoDocument,

    #[error("document {requested} is no longer loaded")]
    StaleDocument { requested: u64 },

    #[error("failed to render page {page}: {message}")]
    Render { page: usize, message: String },
}

/// A rasterised page as straight (unpremultiplied) RGBA8 pixels.
#[derive(Clone, PartialEq)]
pub struct PageBitmap {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl PageBitmap {
    /// Whether the pixel buffer matches the stated dimensions.
    pub fn is_well_formed(&self) -> bool {
        self.rgba.len() == self.width as usize * self.height as usize * 4
    }
}

impl std::fmt::Debug for PageBitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageBitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

/// The three operations the viewer needs from a PDF library.
///
/// Documents may borrow from the engine, hence the lifetime on
/// [`PdfEngine::Document`].
pub trait PdfEngine {
    type Document<'a>
    where
        Self: 'a;

    fn decode<'a>(&'a self, bytes: Vec<u8>) -> Result<Self::Document<'a>, PdfError>;

    fn page_count<'a>(&'a self, document: &Self::Document<'a>) -> usize;

    /// Rasterise `page_number` (1-indexed) at `scale` times its natural size.
    fn render_page<'a>(
        &'a self,
        document: &Self::Document<'a>,
        page_number: usize,
        scale: f32,
    ) -> Result<PageBitmap, PdfError>;
}
