use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};

pub const BG_PANEL: Color32 = Color32::from_rgb(248, 248, 252);
pub const BG_WIDGET: Color32 = Color32::from_rgb(236, 237, 245);
pub const BG_WIDGET_HOVER: Color32 = Color32::from_rgb(224, 227, 245);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(40, 40, 48);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 120, 132);

pub const ACCENT: Color32 = Color32::from_rgb(102, 126, 234);
pub const ACCENT_GREEN: Color32 = Color32::from_rgb(46, 140, 35);
pub const ACCENT_ORANGE: Color32 = Color32::from_rgb(190, 120, 30);

pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(215, 217, 230);

pub const LABEL_TEXT: Color32 = Color32::BLACK;

pub fn apply_theme(ctx: &egui::Context) {
    let mut style = Style::default();

    let mut visuals = Visuals::light();
    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_PANEL;
    visuals.window_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    visuals.window_rounding = Rounding::same(6.0);
    visuals.selection.bg_fill = ACCENT.gamma_multiply(0.35);
    visuals.selection.stroke = Stroke::new(1.0, ACCENT);
    visuals.slider_trailing_fill = true;
    visuals.handle_shape = egui::style::HandleShape::Circle;

    for widget in [
        &mut visuals.widgets.noninteractive,
        &mut visuals.widgets.inactive,
        &mut visuals.widgets.open,
    ] {
        widget.bg_fill = BG_WIDGET;
        widget.weak_bg_fill = BG_WIDGET;
        widget.bg_stroke = Stroke::new(1.0, BORDER_SUBTLE);
        widget.rounding = Rounding::same(4.0);
    }
    visuals.widgets.hovered.bg_fill = BG_WIDGET_HOVER;
    visuals.widgets.hovered.weak_bg_fill = BG_WIDGET_HOVER;
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, ACCENT);
    visuals.widgets.active.bg_fill = ACCENT;
    visuals.widgets.active.bg_stroke = Stroke::new(2.0, ACCENT);
    style.visuals = visuals;

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.window_margin = egui::Margin::same(12.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);
    style.spacing.slider_width = 180.0;

    style.text_styles = [
        (TextStyle::Small, FontId::new(11.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Button, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Heading, FontId::new(18.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(13.0, FontFamily::Monospace)),
    ]
    .into();

    ctx.set_style(style);
}
