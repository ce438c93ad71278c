use pdfium_render::prelude::*;
use tracing::debug;

use super::{PageBitmap, PdfEngine, PdfError};

/// PDFium bound at runtime. Must stay on the thread that created it.
pub struct PdfiumEngine {
    pdfium: Pdfium,
}

impl PdfiumEngine {
    /// Bind to a PDFium library next to the executable, falling back to the
    /// system library.
    pub fn bind() -> Result<Self, PdfError> {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.to_string_lossy().into_owned()));

        let local = exe_dir.map(|dir| {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir.as_str()))
        });
        let bindings = match local {
            Some(Ok(bindings)) => bindings,
            _ => Pdfium::bind_to_system_library()
                .map_err(|e| PdfError::EngineUnavailable(e.to_string()))?,
        };

        debug!("PDFium bound");
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }
}

impl PdfEngine for PdfiumEngine {
    type Document<'a> = PdfDocument<'a>;

    fn decode<'a>(&'a self, bytes: Vec<u8>) -> Result<PdfDocument<'a>, PdfError> {
        self.pdfium
            .load_pdf_from_byte_vec(bytes, None)
            .map_err(|e| PdfError::Decode(e.to_string()))
    }

    fn page_count<'a>(&'a self, document: &PdfDocument<'a>) -> usize {
        document.pages().len() as usize
    }

    fn render_page<'a>(
        &'a self,
        document: &PdfDocument<'a>,
        page_number: usize,
        scale: f32,
    ) -> Result<PageBitmap, PdfError> {
        let count = self.page_count(document);
        if page_number == 0 || page_number > count {
            return Err(PdfError::PageOutOfRange {
                page: page_number,
                count,
            });
        }

        let render_error = |e: PdfiumError| PdfError::Render {
            page: page_number,
            message: e.to_string(),
        };

        let index = PdfPageIndex::try_from(page_number - 1).map_err(|_| {
            PdfError::PageOutOfRange {
                page: page_number,
                count,
            }
        })?;
        let page = document.pages().get(index).map_err(render_error)?;
        let config = PdfRenderConfig::new().scale_page_by_factor(scale);
        let bitmap = page.render_with_config(&config).map_err(render_error)?;

        Ok(PageBitmap {
            width: bitmap.width() as u32,
            height: bitmap.height() as u32,
            rgba: bitmap.as_rgba_bytes(),
        })
    }
}
