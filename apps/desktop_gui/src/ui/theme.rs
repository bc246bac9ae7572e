use eframe::egui;
use egui::Color32;
use shared::domain::ProcessParameter;

pub const PANEL_FILL: Color32 = Color32::from_rgb(44, 44, 68);
pub const APP_BACKGROUND: Color32 = Color32::from_rgb(30, 30, 46);
pub const GOLDEN_FILL: Color32 = Color32::from_rgb(27, 94, 32);
pub const DEFECT_FILL: Color32 = Color32::from_rgb(183, 28, 28);
pub const GOLDEN_ICON: Color32 = Color32::from_rgb(105, 240, 174);
pub const DEFECT_ICON: Color32 = Color32::from_rgb(255, 138, 128);
pub const HEADER_ACCENT: Color32 = Color32::from_rgb(100, 181, 246);
pub const SUBTLE_TEXT: Color32 = Color32::from_rgb(176, 190, 197);
pub const CARD_RADIUS: u8 = 12;

pub fn parameter_accent(parameter: ProcessParameter) -> Color32 {
    match parameter {
        ProcessParameter::Temperature => Color32::from_rgb(255, 112, 67),
        ProcessParameter::Pressure => Color32::from_rgb(77, 182, 172),
    }
}

pub fn apply(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = APP_BACKGROUND;
    visuals.window_fill = PANEL_FILL;
    visuals.selection.bg_fill = HEADER_ACCENT;
    visuals.window_corner_radius = egui::CornerRadius::same(CARD_RADIUS);
    ctx.set_visuals(visuals);
}
