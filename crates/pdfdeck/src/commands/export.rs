use std::path::{Path, PathBuf};

use tracing::debug;

use crate::pdf::PdfEngine;
use crate::pdf::pdfium::PdfiumEngine;
use crate::viewer::ingest::FileKind;

/// Rasterise every page of `bytes` into `output_dir` as `page-NN.png`.
/// Returns the number of pages written.
fn export_pages<E: PdfEngine>(
    engine: &E,
    bytes: Vec<u8>,
    output_dir: &Path,
    scale: f32,
) -> anyhow::Result<usize> {
    let document = engine.decode(bytes)?;
    let page_count = engine.page_count(&document);
    if page_count == 0 {
        anyhow::bail!("Document has no pages");
    }

    std::fs::create_dir_all(output_dir)?;
    for page_number in 1..=page_count {
        let bitmap = engine.render_page(&document, page_number, scale)?;
        let filename = format!("page-{page_number:02}.png");
        let path = output_dir.join(&filename);
        image::save_buffer(
            &path,
            &bitmap.rgba,
            bitmap.width,
            bitmap.height,
            image::ColorType::Rgba8,
        )
        .map_err(|e| anyhow::anyhow!("Failed to save {}: {e}", path.display()))?;
        debug!(width = bitmap.width, height = bitmap.height, "Saved {filename}");
        eprintln!("  Saved {filename}");
    }
    Ok(page_count)
}

pub fn run(file: PathBuf, output_dir: PathBuf, scale: f32) -> anyhow::Result<()> {
    let name = file.to_string_lossy();
    if FileKind::from_name(&name) != FileKind::Pdf {
        anyhow::bail!("Only PDF files can be exported: {}", file.display());
    }
    if !(0.5..=4.0).contains(&scale) {
        anyhow::bail!("Invalid scale: {scale}. Must be between 0.5 and 4.0.");
    }

    let bytes = std::fs::read(&file)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", file.display()))?;
    let engine = PdfiumEngine::bind()?;

    eprintln!(
        "Exporting {} to {} (scale {scale})",
        file.display(),
        output_dir.display()
    );
    let pages = export_pages(&engine, bytes, &output_dir, scale)?;
    eprintln!("Export complete: {pages} page(s).");
    Ok(())
}
