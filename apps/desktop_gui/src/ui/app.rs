use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::ProcessParameter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::dashboard::DashboardState;
use crate::controller::events::{ServiceHealth, UiEvent};
use crate::ui::{panels, theme};

pub struct DesktopGuiApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    dashboard: DashboardState,
    service_url: String,
}

impl DesktopGuiApp {
    pub fn bootstrap(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        service_url: String,
    ) -> Self {
        let mut dashboard = DashboardState::new();
        dashboard.start(&cmd_tx);
        Self {
            cmd_tx,
            ui_rx,
            dashboard,
            service_url,
        }
    }

    fn show_header(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.label(
                egui::RichText::new("Golden Batch Simulator")
                    .size(30.0)
                    .strong()
                    .color(theme::HEADER_ACCENT),
            );
            ui.label(
                egui::RichText::new("Real-time Digital Twin & Quality Prediction")
                    .color(theme::SUBTLE_TEXT),
            );
        });
        ui.add_space(16.0);
    }

    fn show_controls(&mut self, ui: &mut egui::Ui) {
        egui::Frame::new()
            .fill(theme::PANEL_FILL)
            .corner_radius(egui::CornerRadius::same(theme::CARD_RADIUS))
            .inner_margin(egui::Margin::same(16))
            .show(ui, |ui| {
                ui.set_min_height(ui.available_height());
                ui.label(egui::RichText::new("Machine Parameters").size(22.0));
                ui.add_space(12.0);

                let mut commit = false;
                for parameter in ProcessParameter::ALL {
                    let current = self.dashboard.parameters().snapshot().get(parameter);
                    let outcome = panels::parameter_slider(ui, parameter, current);
                    if outcome.changed {
                        self.dashboard.set_parameter(parameter, outcome.value);
                    }
                    commit |= outcome.committed;
                    ui.add_space(20.0);
                }

                if commit {
                    self.dashboard.commit(&self.cmd_tx);
                }
            });
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let (dot, text, detail) = match self.dashboard.service_health() {
                    ServiceHealth::Unknown => (egui::Color32::GRAY, "checking", None),
                    ServiceHealth::Online(message) => {
                        (theme::GOLDEN_ICON, "online", message.as_deref())
                    }
                    ServiceHealth::Offline(reason) => {
                        (theme::DEFECT_ICON, "offline", Some(reason.as_str()))
                    }
                };
                ui.label(egui::RichText::new("●").color(dot));
                let health = ui.small(format!("{} {text}", self.service_url));
                if let Some(detail) = detail {
                    health.on_hover_text(detail);
                }
                ui.separator();
                ui.small(egui::RichText::new(self.dashboard.status()).weak());
                if let Some(updated) = self.dashboard.last_updated() {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.small(format!("updated {}", updated.format("%H:%M:%S")));
                    });
                }
            });
        });
    }
}

impl eframe::App for DesktopGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.dashboard.drain_events(&self.ui_rx);

        self.show_status_bar(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_header(ui);
            ui.columns(2, |columns| {
                self.show_controls(&mut columns[0]);
                panels::result_card(&mut columns[1], &self.dashboard.result_view());
            });
        });

        if self.dashboard.is_loading() {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
