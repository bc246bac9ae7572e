use client_core::Classification;
use eframe::egui;
use shared::domain::ProcessParameter;

use crate::controller::dashboard::ResultView;
use crate::ui::theme;

/// Operator finished adjusting: drag released, track clicked, or keyboard step.
fn slider_committed(response: &egui::Response) -> bool {
    response.drag_stopped()
        || response.clicked()
        || (response.changed() && !response.is_pointer_button_down_on())
}

pub struct SliderOutcome {
    pub value: f64,
    pub changed: bool,
    pub committed: bool,
}

pub fn parameter_slider(ui: &mut egui::Ui, parameter: ProcessParameter, current: f64) -> SliderOutcome {
    let accent = theme::parameter_accent(parameter);
    let mut value = current;

    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(parameter.label()).size(16.0));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(
                egui::RichText::new(format!("{value:.0} {}", parameter.unit()))
                    .strong()
                    .color(accent),
            );
        });
    });

    let response = ui
        .scope(|ui| {
            ui.style_mut().visuals.selection.bg_fill = accent;
            ui.spacing_mut().slider_width = ui.available_width();
            ui.add(
                egui::Slider::new(&mut value, parameter.range())
                    .step_by(1.0)
                    .show_value(false),
            )
        })
        .inner;

    ui.label(
        egui::RichText::new(parameter.optimal_hint())
            .small()
            .color(theme::SUBTLE_TEXT),
    );

    SliderOutcome {
        value,
        changed: response.changed(),
        committed: slider_committed(&response),
    }
}

pub fn result_card(ui: &mut egui::Ui, view: &ResultView<'_>) {
    let fill = match view {
        ResultView::Outcome {
            classification: Classification::GoldenBatch,
            ..
        } => theme::GOLDEN_FILL,
        ResultView::Outcome {
            classification: Classification::DefectRisk,
            ..
        } => theme::DEFECT_FILL,
        _ => theme::PANEL_FILL,
    };

    egui::Frame::new()
        .fill(fill)
        .corner_radius(egui::CornerRadius::same(theme::CARD_RADIUS))
        .inner_margin(egui::Margin::same(16))
        .show(ui, |ui| {
            ui.set_min_height(ui.available_height());
            ui.vertical_centered(|ui| {
                ui.add_space(8.0);
                ui.label(
                    egui::RichText::new("PREDICTED OUTCOME")
                        .size(16.0)
                        .color(egui::Color32::from_white_alpha(200)),
                );
                ui.add_space(16.0);

                match view {
                    ResultView::Loading => {
                        ui.add(egui::Spinner::new().size(48.0));
                    }
                    ResultView::Offline => {
                        ui.label(egui::RichText::new("⚠ Error").size(30.0).strong());
                        ui.label("Backend Offline");
                    }
                    ResultView::Placeholder => {
                        ui.label(egui::RichText::new("...").size(36.0).strong());
                    }
                    ResultView::Outcome {
                        label,
                        classification,
                    } => {
                        let (icon, icon_color) = match classification {
                            Classification::GoldenBatch => ("✔", theme::GOLDEN_ICON),
                            Classification::DefectRisk => ("⚠", theme::DEFECT_ICON),
                        };
                        ui.label(egui::RichText::new(icon).size(64.0).color(icon_color));
                        ui.add_space(8.0);
                        ui.label(
                            egui::RichText::new(*label)
                                .size(36.0)
                                .strong()
                                .color(egui::Color32::WHITE),
                        );
                        ui.add_space(12.0);
                        egui::Frame::new()
                            .fill(egui::Color32::from_white_alpha(50))
                            .corner_radius(egui::CornerRadius::same(16))
                            .inner_margin(egui::Margin::symmetric(12, 4))
                            .show(ui, |ui| {
                                ui.label(
                                    egui::RichText::new(classification.label())
                                        .strong()
                                        .color(egui::Color32::WHITE),
                                );
                            });
                    }
                }
            });
        });
}
