//! Control Panel Widget
//! Left sidebar with the date range and category filters.

use crate::data::{DashboardFilter, Dimension, RentalTable, ALL_SENTINEL, DATE_FORMAT};
use chrono::NaiveDate;
use egui::{Color32, RichText};

/// Sidebar filter state.
pub struct ControlPanel {
    pub start_text: String,
    pub end_text: String,
    pub bounds: Option<(NaiveDate, NaiveDate)>,
    pub season_options: Vec<String>,
    pub weather_options: Vec<String>,
    pub selected_seasons: Vec<String>,
    pub selected_weather: Vec<String>,
    pub status: String,
}

impl ControlPanel {
    /// Sidebar initialized from the loaded table: full date range, "All" selected.
    pub fn new(table: &RentalTable) -> Self {
        let mut panel = Self {
            start_text: String::new(),
            end_text: String::new(),
            bounds: table.date_bounds(),
            season_options: table.unique_values(Dimension::Season),
            weather_options: table.unique_values(Dimension::Weather),
            selected_seasons: Vec::new(),
            selected_weather: Vec::new(),
            status: "Ready".to_string(),
        };
        panel.reset();
        panel
    }

    /// Restore the default filters.
    pub fn reset(&mut self) {
        let (start, end) = self
            .bounds
            .map(|(s, e)| (s.format(DATE_FORMAT).to_string(), e.format(DATE_FORMAT).to_string()))
            .unwrap_or_default();
        self.start_text = start;
        self.end_text = end;
        self.selected_seasons = vec![ALL_SENTINEL.to_string()];
        self.selected_weather = vec![ALL_SENTINEL.to_string()];
    }

    /// Parse a date entry; blank or invalid text leaves the bound open.
    pub fn parse_date(text: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok()
    }

    /// Current filters as chosen in the sidebar.
    pub fn filter(&self) -> DashboardFilter {
        DashboardFilter::default()
            .with_date_range(
                Self::parse_date(&self.start_text),
                Self::parse_date(&self.end_text),
            )
            .with_seasons(self.selected_seasons.iter().cloned())
            .with_weather(self.selected_weather.iter().cloned())
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🚲 Bike Rentals")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(RichText::new("Daily Dashboard").size(11.0).color(Color32::GRAY));
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Date Range Section =====
        ui.label(RichText::new("📅 Date Range").size(14.0).strong());
        ui.add_space(5.0);

        let label_width = 80.0;
        let default_start = self.bounds.map(|(s, _)| s);
        let default_end = self.bounds.map(|(_, e)| e);
        for (label, text, fallback) in [
            ("Start Date:", &mut self.start_text, default_start),
            ("End Date:", &mut self.end_text, default_end),
        ] {
            ui.horizontal(|ui| {
                ui.add_sized([label_width, 20.0], egui::Label::new(label));
                let response = ui.add(
                    egui::TextEdit::singleline(text)
                        .hint_text("YYYY-MM-DD")
                        .desired_width(110.0),
                );
                if response.lost_focus() || (response.changed() && Self::parse_date(text).is_some())
                {
                    action = ControlPanelAction::FiltersChanged;
                }
                if !text.trim().is_empty() && Self::parse_date(text).is_none() {
                    let hint = fallback
                        .map(|d| format!("invalid, using {}", d))
                        .unwrap_or_else(|| "invalid".to_string());
                    ui.label(RichText::new(hint).size(10.0).color(Color32::from_rgb(220, 53, 69)));
                }
            });
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Category Filters =====
        ui.label(RichText::new("🌤 Season").size(14.0).strong());
        ui.add_space(5.0);
        if Self::multi_select(ui, &self.season_options, &mut self.selected_seasons) {
            action = ControlPanelAction::FiltersChanged;
        }

        ui.add_space(10.0);
        ui.label(RichText::new("🌧 Weather").size(14.0).strong());
        ui.add_space(5.0);
        if Self::multi_select(ui, &self.weather_options, &mut self.selected_weather) {
            action = ControlPanelAction::FiltersChanged;
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        ui.vertical_centered(|ui| {
            let button = egui::Button::new(RichText::new("↺ Reset Filters").size(14.0))
                .min_size(egui::vec2(150.0, 30.0));
            if ui.add(button).clicked() {
                action = ControlPanelAction::Reset;
            }
        });

        ui.add_space(10.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.starts_with("No data") {
            Color32::from_rgb(243, 156, 18)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Checkbox list with a leading "All" entry. Returns true if anything changed.
    fn multi_select(ui: &mut egui::Ui, options: &[String], selected: &mut Vec<String>) -> bool {
        let mut changed = false;
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                let all = std::iter::once(ALL_SENTINEL.to_string());
                for option in all.chain(options.iter().cloned()) {
                    let mut checked = selected.contains(&option);
                    if ui.checkbox(&mut checked, &option).changed() {
                        if checked {
                            selected.push(option);
                        } else {
                            selected.retain(|s| s != &option);
                        }
                        changed = true;
                    }
                }
            });
        changed
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    FiltersChanged,
    Reset,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RentalRecord;

    fn table() -> RentalTable {
        let records: Vec<RentalRecord> = [(1, "Spring", "1"), (2, "Summer", "2"), (3, "Spring", "1")]
            .iter()
            .map(|&(d, season, weather)| RentalRecord {
                date: NaiveDate::from_ymd_opt(2011, 4, d),
                total_rentals: 1000.0,
                season: season.to_string(),
                weathersit: weather.to_string(),
                ..Default::default()
            })
            .collect();
        RentalTable::from_records(&records).unwrap()
    }

    #[test]
    fn test_defaults_select_everything() {
        let panel = ControlPanel::new(&table());
        assert_eq!(panel.start_text, "2011-04-01");
        assert_eq!(panel.end_text, "2011-04-03");
        assert_eq!(panel.season_options, vec!["Spring", "Summer"]);

        let filter = panel.filter();
        assert!(filter.seasons.is_unrestricted());
        assert!(filter.weather.is_unrestricted());
        assert_eq!(filter.apply(&table()).unwrap().height(), 3);
    }

    #[test]
    fn test_invalid_date_text_leaves_bound_open() {
        let mut panel = ControlPanel::new(&table());
        panel.start_text = "April 2".to_string();
        panel.end_text = "2011-04-02".to_string();

        let filter = panel.filter();
        assert_eq!(filter.date_range.start, None);
        assert_eq!(filter.date_range.end, NaiveDate::from_ymd_opt(2011, 4, 2));
        assert_eq!(filter.apply(&table()).unwrap().height(), 2);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut panel = ControlPanel::new(&table());
        panel.selected_seasons = vec!["Summer".to_string()];
        panel.end_text = "2011-04-01".to_string();

        panel.reset();
        assert_eq!(panel.selected_seasons, vec![ALL_SENTINEL]);
        assert_eq!(panel.end_text, "2011-04-03");
    }
}
