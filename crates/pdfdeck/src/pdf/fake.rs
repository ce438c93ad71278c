use super::{PageBitmap, PdfEngine, PdfError};

/// Accepts `%PDF pages=N` and renders page `n` as an `n`x1 bitmap.
pub struct FakeEngine;

pub struct FakeDocument {
    pages: usize,
}

impl PdfEngine for FakeEngine {
    type Document<'a> = FakeDocument;

    fn decode<'a>(&'a self, bytes: Vec<u8>) -> Result<FakeDocument, PdfError> {
        String::from_utf8(bytes)
            .ok()
            .and_then(|s| s.trim().strip_prefix("%PDF pages=")?.parse().ok())
            .map(|pages| FakeDocument { pages })
            .ok_or_else(|| PdfError::Decode("Invalid PDF structure".to_string()))
    }

    fn page_count<'a>(&'a self, document: &FakeDocument) -> usize {
        document.pages
    }

    fn render_page<'a>(
        &'a self,
        document: &FakeDocument,
        page_number: usize,
        scale: f32,
    ) -> Result<PageBitmap, PdfError> {
        if page_number == 0 || page_number > document.pages {
            return Err(PdfError::PageOutOfRange {
                page: page_number,
                count: document.pages,
            });
        }
        let width = (page_number as f32 * scale) as u32;
        Ok(PageBitmap {
            width,
            height: 1,
            rgba: vec![255; width as usize * 4],
        })
    }
}
