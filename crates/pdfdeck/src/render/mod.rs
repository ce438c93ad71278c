use eframe::egui;

use crate::theme::Theme;
use crate::viewer::source::TextSlide;

const REF_WIDTH: f32 = 1920.0;
const REF_HEIGHT: f32 = 1080.0;

/// Scale factor relative to a 1920x1080 reference slide.
pub fn compute_scale(rect: egui::Rect) -> f32 {
    (rect.width() / REF_WIDTH).min(rect.height() / REF_HEIGHT)
}

/// Largest rect with the aspect ratio of `size` that fits centered in
/// `bounds`.
pub fn fit_rect(size: egui::Vec2, bounds: egui::Rect) -> egui::Rect {
    if size.x <= 0.0 || size.y <= 0.0 {
        return egui::Rect::from_center_size(bounds.center(), egui::Vec2::ZERO);
    }
    let factor = (bounds.width() / size.x).min(bounds.height() / size.y);
    egui::Rect::from_center_size(bounds.center(), size * factor)
}

/// Title and body centered in `rect`.
pub fn draw_text_slide(ui: &egui::Ui, slide: &TextSlide, theme: &Theme, rect: egui::Rect) {
    let scale = compute_scale(rect);
    let content_rect = rect.shrink(80.0 * scale);
    let painter = ui.painter();

    let heading_galley = painter.layout(
        slide.title.to_string(),
        egui::FontId::proportional(theme.title_size * scale),
        theme.heading_color,
        content_rect.width(),
    );
    let body_galley = painter.layout(
        slide.content.to_string(),
        egui::FontId::proportional(theme.body_size * scale),
        theme.foreground,
        content_rect.width(),
    );

    let gap = 30.0 * scale;
    let total_height = heading_galley.rect.height() + gap + body_galley.rect.height();
    let top = content_rect.center().y - total_height / 2.0;

    let heading_pos = egui::pos2(
        content_rect.center().x - heading_galley.rect.width() / 2.0,
        top,
    );
    let body_pos = egui::pos2(
        content_rect.center().x - body_galley.rect.width() / 2.0,
        top + heading_galley.rect.height() + gap,
    );
    painter.galley(heading_pos, heading_galley, theme.heading_color);
    painter.galley(body_pos, body_galley, theme.foreground);
}

/// A rasterised PDF page, letterboxed into `rect`.
pub fn draw_page(ui: &egui::Ui, texture: &egui::TextureHandle, theme: &Theme, rect: egui::Rect) {
    ui.painter().rect_filled(rect, 0.0, theme.page_backdrop);
    let target = fit_rect(texture.size_vec2(), rect.shrink(8.0));
    let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
    ui.painter()
        .image(texture.id(), target, uv, egui::Color32::WHITE);
}

/// Placeholder while the first page of a document is being rendered.
pub fn draw_pending(ui: &egui::Ui, theme: &Theme, rect: egui::Rect) {
    ui.painter().rect_filled(rect, 0.0, theme.page_backdrop);
    let color = Theme::with_opacity(theme.foreground, 0.5);
    let galley = ui.painter().layout_no_wrap(
        "Rendering\u{2026}".to_string(),
        egui::FontId::proportional(24.0 * compute_scale(rect).max(0.5)),
        color,
    );
    let pos = rect.center() - galley.rect.size() / 2.0;
    ui.painter().galley(pos, galley, color);
}
