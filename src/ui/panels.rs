use egui::{Context, RichText, ScrollArea, Ui};

use coord3d::renderer::OrthographicCamera;
use coord3d::scene::params::ParameterGroup;
use coord3d::scene::{DIAGRAMS, DiagramKind, ParameterEdit, ParameterStore, Viewport};

use crate::ui::state::UiState;
use crate::ui::theme::*;

#[derive(Default)]
pub struct UiActions {
    pub edits: Vec<ParameterEdit>,
    pub switch_to: Option<DiagramKind>,
    pub reset: bool,
}

/// Counters shown in the statistics block.
pub struct SceneStats {
    pub nodes: usize,
    pub edges: usize,
    pub rebuilds: u64,
    pub frames: u64,
}

pub fn draw_side_panel(
    ctx: &Context,
    state: &mut UiState,
    store: &ParameterStore,
    stats: &SceneStats,
) -> UiActions {
    let mut actions = UiActions::default();

    egui::SidePanel::right("control_panel")
        .min_width(300.0)
        .max_width(380.0)
        .default_width(320.0)
        .frame(egui::Frame::default().fill(BG_PANEL).inner_margin(16.0))
        .show(ctx, |ui| {
            ScrollArea::vertical().show(ui, |ui| {
                ui.heading(RichText::new("Coordinate Systems").strong());
                ui.add_space(4.0);
                ui.label(RichText::new("Points and differential elements").color(TEXT_MUTED).size(11.0));
                ui.add_space(16.0);

                section_header(ui, "DIAGRAM");
                let current = state.selected.diagram();
                egui::ComboBox::from_id_salt("diagram")
                    .selected_text(current.title)
                    .width(ui.available_width())
                    .show_ui(ui, |ui| {
                        for d in DIAGRAMS {
                            if ui.selectable_label(d.kind == state.selected, d.title).clicked()
                                && d.kind != state.selected
                            {
                                state.selected = d.kind;
                                actions.switch_to = Some(d.kind);
                            }
                        }
                    });
                ui.add_space(4.0);
                ui.label(RichText::new(current.description).color(ACCENT).size(13.0));
                ui.add_space(12.0);
                ui.separator();
                ui.add_space(8.0);

                parameter_group(ui, "POSITION", store, ParameterGroup::Position, &mut actions);
                if store.specs().iter().any(|s| s.group == ParameterGroup::Differential) {
                    ui.add_space(8.0);
                    parameter_group(ui, "DIFFERENTIALS", store, ParameterGroup::Differential, &mut actions);
                }

                ui.add_space(8.0);
                if ui.button("Reset").clicked() {
                    actions.reset = true;
                }

                ui.add_space(12.0);
                ui.separator();
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    ui.checkbox(&mut state.show_labels, "Labels");
                    ui.checkbox(&mut state.show_stats, "Stats");
                });
                if state.show_stats {
                    ui.add_space(8.0);
                    stats_panel(ui, stats);
                }
            });
        });

    actions
}

fn section_header(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).color(TEXT_MUTED).size(11.0).strong());
    ui.add_space(4.0);
}

fn parameter_group(
    ui: &mut Ui,
    title: &str,
    store: &ParameterStore,
    group: ParameterGroup,
    actions: &mut UiActions,
) {
    section_header(ui, title);
    for (spec, value) in store.entries().filter(|(s, _)| s.group == group) {
        let mut v = value;
        let slider = egui::Slider::new(&mut v, spec.min..=spec.max)
            .step_by(spec.step)
            .text(spec.label);
        if ui.add(slider).changed() && v != value {
            actions.edits.push(ParameterEdit {
                name: spec.name.to_string(),
                value: v,
            });
        }
    }
}

fn stats_panel(ui: &mut Ui, stats: &SceneStats) {
    section_header(ui, "STATISTICS");
    egui::Frame::default()
        .fill(BG_WIDGET)
        .stroke(egui::Stroke::new(1.0, BORDER_SUBTLE))
        .rounding(6.0)
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.style_mut().override_font_id = Some(egui::FontId::new(11.0, egui::FontFamily::Monospace));
            egui::Grid::new("stats").num_columns(2).spacing([20.0, 4.0]).show(ui, |ui| {
                ui.label(RichText::new("Nodes").color(TEXT_MUTED));
                ui.label(RichText::new(stats.nodes.to_string()).color(TEXT_PRIMARY));
                ui.end_row();

                ui.label(RichText::new("Edge curves").color(TEXT_MUTED));
                ui.label(RichText::new(stats.edges.to_string()).color(ACCENT));
                ui.end_row();

                ui.label(RichText::new("Rebuilds").color(TEXT_MUTED));
                ui.label(RichText::new(stats.rebuilds.to_string()).color(ACCENT_ORANGE));
                ui.end_row();

                ui.label(RichText::new("Frames").color(TEXT_MUTED));
                ui.label(RichText::new(fmt_num(stats.frames)).color(ACCENT_GREEN));
                ui.end_row();
            });
        });
}

/// Paints scene labels at their projected anchors, behind the panels.
pub fn draw_labels<'a>(
    ctx: &Context,
    labels: impl Iterator<Item = (&'a str, glam::Vec3)>,
    camera: &OrthographicCamera,
    viewport: &Viewport,
) {
    let painter = ctx.layer_painter(egui::LayerId::background());
    let ppp = ctx.pixels_per_point();
    for (text, anchor) in labels {
        let Some(px) = camera.project(anchor, viewport) else {
            continue;
        };
        painter.text(
            egui::pos2(px.x / ppp, px.y / ppp),
            egui::Align2::CENTER_CENTER,
            text,
            egui::FontId::proportional(16.0),
            LABEL_TEXT,
        );
    }
}

pub fn draw_help_overlay(ctx: &Context) {
    egui::Area::new(egui::Id::new("help_overlay"))
        .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(12.0, -12.0))
        .show(ctx, |ui| {
            egui::Frame::default()
                .fill(BG_PANEL.gamma_multiply(0.9))
                .rounding(6.0)
                .inner_margin(10.0)
                .show(ui, |ui| {
                    ui.style_mut().override_font_id = Some(egui::FontId::new(11.0, egui::FontFamily::Monospace));
                    ui.label(RichText::new("LMB+Drag - Rotate | RMB+Drag - Pan | Scroll - Zoom").color(TEXT_MUTED));
                });
        });
}

fn fmt_num(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        format!("{}", n)
    }
}
