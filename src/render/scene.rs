use vello::kurbo::{Affine, BezPath, Point};
use vello::peniko::{Color, Fill};
use vello::Scene;

use super::arc::wedge_path;
use super::text::{TextRenderResult, TextRenderer};
use crate::tree::arena::NodeTree;
use crate::ui::breadcrumb::{breadcrumb_points, BreadcrumbTrail};
use crate::ui::input::ChartGeometry;
use crate::ui::interaction::{ExplanationPanel, InteractionController};

const LABEL_FONT_SIZE: f32 = 14.0;
const PERCENTAGE_FONT_SIZE: f32 = 36.0;
const CAPTION_FONT_SIZE: f32 = 14.0;
const EXPLANATION_GRAY: [f32; 3] = [0.4, 0.4, 0.4];

/// Build a Vello scene from the controller's current state.
pub fn build_scene(
    scene: &mut Scene,
    controller: &InteractionController,
    tree: &NodeTree,
    geometry: &ChartGeometry,
    text_renderer: &TextRenderer,
) {
    scene.reset();

    let center = Point::new(geometry.center_x as f64, geometry.center_y as f64);
    let scale = geometry.radius as f64;
    for wedge in controller.wedges() {
        if !wedge.visible || wedge.shown.span <= 0.0 {
            continue;
        }
        let shape = wedge.shape();
        let color = shape.fill.with_opacity(wedge.opacity).to_peniko();
        scene.fill(
            Fill::NonZero,
            Affine::IDENTITY,
            color,
            None,
            &wedge_path(&shape, center, scale),
        );
    }

    let caption = format!("of {}", tree.get(controller.context().focus_root).name);
    draw_explanation(scene, controller.explanation(), &caption, center, text_renderer);
    draw_trail(scene, controller.trail(), geometry.trail_origin, text_renderer);
}

fn draw_explanation(
    scene: &mut Scene,
    panel: &ExplanationPanel,
    caption: &str,
    center: Point,
    text_renderer: &TextRenderer,
) {
    if !panel.visible || panel.opacity <= 0.0 {
        return;
    }
    let [r, g, b] = EXPLANATION_GRAY;
    let color = Color::new([r, g, b, panel.opacity.clamp(0.0, 1.0)]);

    if let Some(rendered) = text_renderer.render_text(&panel.percentage, "default", PERCENTAGE_FONT_SIZE) {
        let h = rendered.height;
        draw_text_centered(scene, rendered, center.x as f32, center.y as f32 - h * 0.35, color);
    }
    if let Some(rendered) = text_renderer.render_text(caption, "default", CAPTION_FONT_SIZE) {
        draw_text_centered(
            scene,
            rendered,
            center.x as f32,
            center.y as f32 + CAPTION_FONT_SIZE * 1.2,
            color,
        );
    }
}

fn draw_trail(
    scene: &mut Scene,
    trail: &BreadcrumbTrail,
    origin: (f32, f32),
    text_renderer: &TextRenderer,
) {
    if !trail.is_visible() {
        return;
    }
    let dims = trail.dims();
    let (ox, oy) = (origin.0 as f64, origin.1 as f64);
    let label_center_x = (dims.w + dims.t) / 2.0;
    let label_max_w = (dims.w - dims.t / 2.0) as f32;

    for crumb in trail.crumbs() {
        let left = ox + crumb.offset_x;
        let mut polygon = BezPath::new();
        for (i, (x, y)) in breadcrumb_points(crumb.index, &dims).into_iter().enumerate() {
            let p = (left + x, oy + y);
            if i == 0 {
                polygon.move_to(p);
            } else {
                polygon.line_to(p);
            }
        }
        polygon.close_path();
        scene.fill(
            Fill::NonZero,
            Affine::IDENTITY,
            crumb.fill.to_peniko(),
            None,
            &polygon,
        );

        let label = truncate_label(&crumb.label, label_max_w, LABEL_FONT_SIZE);
        if let Some(rendered) = text_renderer.render_text(&label, "default", LABEL_FONT_SIZE) {
            draw_text_centered(
                scene,
                rendered,
                (left + label_center_x) as f32,
                (oy + dims.h / 2.0) as f32,
                Color::WHITE,
            );
        }
    }

    let end = trail.end_label();
    if let Some(rendered) = text_renderer.render_text(&end.text, "default", LABEL_FONT_SIZE) {
        draw_text_centered(
            scene,
            rendered,
            (ox + end.x) as f32,
            (oy + dims.h / 2.0) as f32,
            Color::BLACK,
        );
    }
}

/// Draw text with its line box centred on (`cx`, `cy`).
fn draw_text_centered(scene: &mut Scene, text_result: TextRenderResult, cx: f32, cy: f32, color: Color) {
    let tx = (cx - text_result.width / 2.0).round();
    let ty = (cy - text_result.height / 2.0).round();
    let transform = Affine::translate((tx as f64, ty as f64));
    scene
        .draw_glyphs(&text_result.font)
        .font_size(text_result.font_size)
        .transform(transform)
        .brush(color)
        .hint(true)
        .draw(
            Fill::NonZero,
            text_result.glyphs.into_iter().map(|mut glyph| {
                glyph.x = glyph.x.round();
                glyph.y = glyph.y.round();
                glyph
            }),
        );
}

fn truncate_label(name: &str, max_width: f32, font_size: f32) -> String {
    let approx_char_w = (font_size * 0.58).max(1.0);
    let max_chars = (max_width / approx_char_w) as usize;
    if max_chars < 3 {
        return String::new();
    }
    if name.chars().count() <= max_chars {
        return name.to_string();
    }
    let keep = max_chars - 3;
    let truncated: String = name.chars().take(keep).collect();
    format!("{}...", truncated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_labels_pass_through() {
        assert_eq!(truncate_label("RAVON", 195.0, 14.0), "RAVON");
    }

    #[test]
    fn long_labels_are_ellipsized_to_fit() {
        let long = "ProcessingModuleWithAVeryLongFileName.cpp";
        let out = truncate_label(long, 100.0, 14.0);
        // 100 / (14 * 0.58) = 12 characters including the ellipsis.
        assert_eq!(out, "Processin...");
    }

    #[test]
    fn tiny_boxes_get_no_label() {
        assert_eq!(truncate_label("abc", 10.0, 14.0), "");
    }
}
