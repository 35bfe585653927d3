//! UI module for Ether
//!
//! Provides the receipt card shown after a completed charge and the
//! calibration panel for interaction thresholds, using egui.

use nannou_egui::egui;
use shared::{IngredientKind, Recipe};

use crate::Settings;

const INK: egui::Color32 = egui::Color32::from_rgb(20, 20, 20);
const MUTED: egui::Color32 = egui::Color32::from_rgb(110, 110, 110);
const PAPER: egui::Color32 = egui::Color32::from_rgb(245, 243, 238);

/// Result of receipt card interactions
#[derive(Default)]
pub struct ReceiptCardResult {
    /// Discard the recipe and return to tuning
    pub resample: bool,
}

/// Draw the receipt card (centered)
pub fn draw_receipt_card(ctx: &egui::Context, recipe: &Recipe) -> ReceiptCardResult {
    let mut result = ReceiptCardResult::default();

    let frame = egui::Frame::window(&ctx.style())
        .fill(PAPER)
        .inner_margin(egui::Margin::same(24.0));

    egui::Window::new("receipt")
        .title_bar(false)
        .collapsible(false)
        .resizable(false)
        .fixed_size([320.0, 0.0])
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .frame(frame)
        .show(ctx, |ui| {
            // Header
            ui.vertical_centered(|ui| {
                ui.label(egui::RichText::new("ETHER").size(28.0).strong().color(INK));
                ui.label(
                    egui::RichText::new("ATMOSPHERIC ANALYSIS REPORT")
                        .size(10.0)
                        .monospace()
                        .color(MUTED),
                );
            });
            ui.add_space(12.0);

            meta_row(ui, "ID", &recipe.id);
            meta_row(ui, "TIMESTAMP", &recipe.timestamp);
            meta_row(
                ui,
                "READING",
                &format!(
                    "{} / {}",
                    recipe.weather.display_name(),
                    recipe.mood.display_name()
                ),
            );

            ui.separator();

            // Ingredients
            for ingredient in &recipe.ingredients {
                let name = match ingredient.kind {
                    IngredientKind::Noise => egui::RichText::new(&ingredient.name).italics(),
                    _ => egui::RichText::new(&ingredient.name),
                };
                ui.horizontal(|ui| {
                    ui.label(name.size(14.0).color(INK));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!("{}%", ingredient.percentage))
                                .monospace()
                                .size(14.0)
                                .color(INK),
                        );
                    });
                });
            }

            ui.separator();
            ui.add_space(6.0);

            ui.vertical_centered(|ui| {
                ui.label(
                    egui::RichText::new(format!("\"{}\"", recipe.quote))
                        .italics()
                        .size(13.0)
                        .color(MUTED),
                );
            });
            ui.add_space(12.0);

            ui.vertical_centered(|ui| {
                let button = egui::Button::new(
                    egui::RichText::new("RESAMPLE").monospace().color(PAPER),
                )
                .fill(INK)
                .min_size(egui::vec2(200.0, 32.0));
                if ui
                    .add(button)
                    .on_hover_text("Discard this reading and tune again. Keyboard: R")
                    .clicked()
                {
                    result.resample = true;
                }
            });
        });

    result
}

fn meta_row(ui: &mut egui::Ui, label: &str, value: &str) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(label).monospace().size(10.0).color(MUTED));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(egui::RichText::new(value).monospace().size(10.0).color(INK));
        });
    });
}

/// Result of calibration panel interactions
#[derive(Default)]
pub struct CalibrationResult {
    /// Any setting changed and should be persisted
    pub changed: bool,
    /// Interaction thresholds changed and should reach the machine
    pub interaction_changed: bool,
    /// Delete the saved settings file and return to defaults
    pub forget: bool,
}

/// Draw the calibration panel
pub fn draw_calibration_panel(
    ctx: &egui::Context,
    open: &mut bool,
    settings: &mut Settings,
) -> CalibrationResult {
    let mut result = CalibrationResult::default();

    egui::Window::new("Calibration")
        .open(open)
        .collapsible(false)
        .resizable(false)
        .default_width(300.0)
        .anchor(egui::Align2::RIGHT_TOP, [-16.0, 16.0])
        .show(ctx, |ui| {
            ui.heading("Interaction");

            let interaction = &mut settings.interaction;
            let sliders = [
                ui.add(
                    egui::Slider::new(&mut interaction.velocity_threshold, 0.05..=3.0)
                        .text("Velocity threshold (px/ms)"),
                )
                .on_hover_text("Pointer speed above which it counts as moving"),
                ui.add(
                    egui::Slider::new(&mut interaction.stationary_debounce_ms, 50.0..=1000.0)
                        .text("Settle time (ms)"),
                )
                .on_hover_text("Quiet time before a slow pointer counts as still"),
                ui.add(
                    egui::Slider::new(&mut interaction.charge_duration_ms, 250.0..=5000.0)
                        .text("Charge (ms)"),
                )
                .on_hover_text("How long to hold still before a recipe is generated"),
                ui.add(
                    egui::Slider::new(&mut interaction.morph_duration_ms, 0.0..=5000.0)
                        .text("Morph (ms)"),
                )
                .on_hover_text("Length of the transition before the receipt appears"),
            ];
            if sliders.iter().any(|r| r.changed()) {
                result.interaction_changed = true;
                result.changed = true;
            }

            ui.separator();
            ui.heading("Display");

            if ui
                .checkbox(&mut settings.show_grid, "Grid guide (G)")
                .on_hover_text("Show the centre cross. Keyboard: G")
                .changed()
            {
                result.changed = true;
            }
            if ui
                .checkbox(&mut settings.reduced_motion, "Reduced motion (M)")
                .on_hover_text("Freeze the fluid drift and transition sweep. Keyboard: M")
                .changed()
            {
                result.changed = true;
            }

            ui.separator();
            if ui.button("Restore defaults").clicked() {
                *interaction = Default::default();
                result.interaction_changed = true;
                result.changed = true;
            }
            if ui
                .button("Forget saved settings")
                .on_hover_text("Delete the settings file and use defaults")
                .clicked()
            {
                result.forget = true;
            }
        });

    result
}
