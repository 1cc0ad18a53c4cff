//! Bike Rental Dashboard Main Application
//! Main window with control panel and chart viewer.

use crate::data::RentalTable;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::settings::Settings;
use crate::stats::DashboardSummary;
use egui::SidePanel;
use tracing::{error, info};

/// Main application window.
pub struct DashboardApp {
    table: RentalTable,
    settings: Settings,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, table: RentalTable, settings: Settings) -> Self {
        let mut app = Self::with_table(table, settings);
        app.recompute();
        app
    }

    fn with_table(table: RentalTable, settings: Settings) -> Self {
        Self {
            control_panel: ControlPanel::new(&table),
            chart_viewer: ChartViewer::new(),
            table,
            settings,
        }
    }

    /// Rebuild every chart input from the loaded table and the current filters.
    fn recompute(&mut self) {
        let filter = self.control_panel.filter();
        match DashboardSummary::compute(&self.table, &filter, &self.settings.summary_options()) {
            Ok(summary) => {
                let status = if summary.is_empty() {
                    "No data for the current filters".to_string()
                } else {
                    format!("Showing {} of {} days", summary.row_count, self.table.height())
                };
                info!(rows = summary.row_count, "Dashboard updated");
                self.control_panel.set_status(&status);
                self.chart_viewer.set_summary(summary);
            }
            Err(e) => {
                error!("Failed to compute dashboard: {}", e);
                self.control_panel.set_status(&format!("Error: {}", e));
                self.chart_viewer.clear();
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::FiltersChanged => self.recompute(),
                        ControlPanelAction::Reset => {
                            self.control_panel.reset();
                            self.recompute();
                        }
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{RentalRecord, ALL_SENTINEL};
    use chrono::NaiveDate;

    fn app() -> DashboardApp {
        let records: Vec<RentalRecord> = (1..=10)
            .map(|d| RentalRecord {
                date: NaiveDate::from_ymd_opt(2012, 6, d),
                total_rentals: 1000.0 * d as f64,
                season: if d <= 5 { "Summer" } else { "Fall" }.to_string(),
                weathersit: "1".to_string(),
                ..Default::default()
            })
            .collect();
        let table = RentalTable::from_records(&records).unwrap();
        DashboardApp::with_table(table, Settings::default())
    }

    #[test]
    fn test_recompute_reports_filtered_rows() {
        let mut app = app();
        app.recompute();
        assert_eq!(app.control_panel.status, "Showing 10 of 10 days");

        app.control_panel.selected_seasons = vec!["Fall".to_string()];
        app.recompute();
        assert_eq!(app.control_panel.status, "Showing 5 of 10 days");
        let summary = app.chart_viewer.summary.as_ref().unwrap();
        assert_eq!(summary.row_count, 5);
        // The distribution ignores the sidebar filters
        assert_eq!(summary.distribution.count, 10);
    }

    #[test]
    fn test_empty_selection_keeps_summary() {
        let mut app = app();
        app.control_panel.selected_seasons = vec!["Winter".to_string()];
        app.recompute();
        assert_eq!(app.control_panel.status, "No data for the current filters");
        assert!(app.chart_viewer.summary.as_ref().unwrap().is_empty());

        app.control_panel.reset();
        app.recompute();
        assert_eq!(app.control_panel.selected_seasons, vec![ALL_SENTINEL]);
        assert_eq!(app.control_panel.status, "Showing 10 of 10 days");
    }
}
