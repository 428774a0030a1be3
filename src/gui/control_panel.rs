//! Control Panel Widget
//! Top bar with workbook selection, reload, export and the provider filter.

use egui::{Color32, ComboBox, RichText};
use std::path::Path;

/// Action requested from the control panel this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlPanelAction {
    None,
    OpenWorkbook,
    Reload,
    ExportCharts,
}

/// Top control bar state.
pub struct ControlPanel {
    /// Provider the services charts are narrowed to; `None` shows all.
    pub provider: Option<String>,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            provider: None,
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Forget a provider selection the current data no longer offers.
    pub fn retain_provider(&mut self, providers: &[String]) {
        if let Some(p) = &self.provider {
            if !providers.contains(p) {
                self.provider = None;
            }
        }
    }

    /// Draw the control bar
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        workbook: &Path,
        providers: &[String],
    ) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.horizontal(|ui| {
            ui.label(
                RichText::new("☁ Cloud Cost Dashboard")
                    .size(20.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.separator();

            let name = workbook
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "No workbook".to_string());
            ui.label(RichText::new(name).size(12.0));

            if ui.button("📂 Open…").clicked() {
                action = ControlPanelAction::OpenWorkbook;
            }
            if ui.button("🔄 Reload").clicked() {
                action = ControlPanelAction::Reload;
            }
            if ui.button("🖼 Export charts…").clicked() {
                action = ControlPanelAction::ExportCharts;
            }

            if !providers.is_empty() {
                ui.separator();
                ui.label("Provider:");
                ComboBox::from_id_salt("provider_filter")
                    .width(120.0)
                    .selected_text(self.provider.as_deref().unwrap_or("All"))
                    .show_ui(ui, |ui| {
                        ui.selectable_value(&mut self.provider, None, "All");
                        for p in providers {
                            ui.selectable_value(&mut self.provider, Some(p.clone()), p.as_str());
                        }
                    });
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(RichText::new(&self.status).size(11.0).color(Color32::GRAY));
            });
        });

        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retain_provider_drops_stale_selection() {
        let mut panel = ControlPanel::new();
        panel.provider = Some("GCP".to_string());

        panel.retain_provider(&["AWS".to_string(), "GCP".to_string()]);
        assert_eq!(panel.provider.as_deref(), Some("GCP"));

        panel.retain_provider(&["AWS".to_string()]);
        assert_eq!(panel.provider, None);
    }
}
