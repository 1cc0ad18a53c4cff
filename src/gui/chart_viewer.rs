//! Chart Viewer Widget
//! Central scrollable panel laying out one card per dashboard chart.

use crate::charts::{ChartPlotter, MUTED_COLOR};
use crate::stats::{DashboardSummary, GroupedAverage};
use egui::{Color32, RichText, ScrollArea};

/// Chart card configuration
const CHART_SPACING: f32 = 15.0;
const CARD_WIDTH: f32 = 620.0;

/// Scrollable chart display area.
#[derive(Default)]
pub struct ChartViewer {
    pub summary: Option<DashboardSummary>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_summary(&mut self, summary: DashboardSummary) {
        self.summary = Some(summary);
    }

    pub fn clear(&mut self) {
        self.summary = None;
    }

    /// Draw all chart cards, wrapping into as many columns as fit.
    pub fn show(&mut self, ui: &mut egui::Ui) {
        let Some(summary) = &self.summary else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading("Bike Rental Analysis");
                ui.label(
                    "Rentals by day, month, weather and more. \
                     The distribution covers the whole dataset; every other chart follows the sidebar filters.",
                );
                ui.add_space(CHART_SPACING);

                ui.horizontal_wrapped(|ui| {
                    Self::card(ui, "Distribution of Daily Rentals", |ui| {
                        if summary.distribution.is_empty() {
                            Self::empty(ui);
                        } else {
                            ChartPlotter::draw_distribution(ui, &summary.distribution);
                        }
                    });

                    if summary.is_empty() {
                        Self::card(ui, "Filtered Charts", Self::empty);
                        return;
                    }

                    Self::card(
                        ui,
                        &format!("Rental Trend ({}-day rolling average)", summary.trend.window),
                        |ui| {
                            if summary.trend.defined().next().is_none() {
                                ui.label(format!(
                                    "Need at least {} days for a rolling average",
                                    summary.trend.window
                                ));
                            } else {
                                ChartPlotter::draw_trend(ui, &summary.trend);
                            }
                        },
                    );

                    Self::card(ui, "Casual vs Registered Riders", |ui| {
                        match &summary.composition {
                            Some(composition) => ChartPlotter::draw_composition(ui, composition),
                            None => Self::empty(ui),
                        }
                    });

                    Self::card(ui, "Average Rentals by Day of Week", |ui| {
                        ChartPlotter::draw_grouped_line(ui, &summary.by_weekday);
                    });

                    for average in [
                        &summary.by_month,
                        &summary.by_workingday,
                        &summary.by_weather,
                        &summary.by_season,
                    ] {
                        Self::grouped_card(ui, average);
                    }

                    Self::card(ui, "Rental Categories", |ui| {
                        ChartPlotter::draw_bins(ui, &summary.bins);
                        ui.label(
                            RichText::new("Low (0, 1000] · Medium (1000, 5000] · High (5000, 10000]")
                                .size(11.0)
                                .color(MUTED_COLOR),
                        );
                    });
                });
            });
    }

    fn grouped_card(ui: &mut egui::Ui, average: &GroupedAverage) {
        let title = format!("Average Rentals by {}", average.dimension.title());
        Self::card(ui, &title, |ui| {
            if average.is_empty() {
                Self::empty(ui);
                return;
            }
            let horizontal = matches!(average.dimension, crate::data::Dimension::Month);
            ChartPlotter::draw_grouped_bars(
                ui,
                average,
                horizontal,
                ChartPlotter::base_color(average.dimension),
            );
            if let Some(top) = average.highlight() {
                ui.label(
                    RichText::new(format!(
                        "Highest: {} ({:.0})",
                        average.dimension.display_label(&top.label),
                        top.mean
                    ))
                    .size(12.0),
                );
            }
        });
    }

    /// Draw a single fixed-width chart card
    fn card(ui: &mut egui::Ui, title: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, Color32::from_gray(90)))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .outer_margin(CHART_SPACING / 2.0)
            .show(ui, |ui| {
                ui.set_width(CARD_WIDTH);
                ui.vertical(|ui| {
                    ui.label(RichText::new(title).size(16.0).strong());
                    ui.add_space(8.0);
                    add_contents(ui);
                });
            });
    }

    fn empty(ui: &mut egui::Ui) {
        ui.label(
            RichText::new("No data for the current filters")
                .size(14.0)
                .color(MUTED_COLOR),
        );
    }
}
