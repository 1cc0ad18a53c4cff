//! Chart Plotter Module
//! Draws the dashboard charts using egui_plot.

use crate::data::Dimension;
use crate::stats::{
    CategorySummary, DistributionSummary, GroupedAverage, RiderComposition, RollingTrend,
};
use chrono::{Datelike, NaiveDate};
use egui::{Align2, Color32, FontId, Pos2, RichText, Sense, Shape, Stroke};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Text, VLine};
use std::f32::consts::TAU;

pub const CHART_HEIGHT: f32 = 280.0;

pub const BAR_COLOR: Color32 = Color32::from_rgb(173, 216, 230); // Light blue
pub const HIGHLIGHT_COLOR: Color32 = Color32::from_rgb(30, 90, 220); // Blue
pub const MUTED_COLOR: Color32 = Color32::from_rgb(160, 160, 160); // Gray
pub const ALERT_COLOR: Color32 = Color32::from_rgb(220, 53, 69); // Red
pub const TREND_COLOR: Color32 = Color32::from_rgb(52, 152, 219);

const PIE_COLORS: [Color32; 2] = [
    Color32::from_rgb(173, 216, 230), // Casual
    Color32::from_rgb(65, 105, 225),  // Registered
];

/// Draws each dashboard chart from its precomputed summary.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Bar color: highlight for the top group, base color otherwise.
    pub fn bar_color(index: usize, len: usize, base: Color32, highlight: Color32) -> Color32 {
        if index + 1 == len {
            highlight
        } else {
            base
        }
    }

    /// Histogram of daily totals with the mean marked and the density overlaid.
    pub fn draw_distribution(ui: &mut egui::Ui, summary: &DistributionSummary) {
        Plot::new("distribution")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("Total Rentals")
            .y_axis_label("Days")
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                let bars: Vec<Bar> = summary
                    .buckets
                    .iter()
                    .map(|b| {
                        Bar::new(b.center(), b.count as f64)
                            .width(b.width())
                            .fill(MUTED_COLOR)
                    })
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).color(MUTED_COLOR).name("Days"));

                if !summary.density.is_empty() {
                    plot_ui.line(
                        Line::new(PlotPoints::from_iter(summary.density.iter().copied()))
                            .color(Color32::DARK_GRAY)
                            .width(1.5)
                            .name("Density"),
                    );
                }

                if let Some(mean) = summary.mean {
                    plot_ui.vline(
                        VLine::new(mean)
                            .color(ALERT_COLOR)
                            .width(2.0)
                            .style(egui_plot::LineStyle::dashed_loose())
                            .name(format!("Mean {:.0}", mean)),
                    );
                }
            });
    }

    /// Rolling average of daily totals against calendar dates.
    pub fn draw_trend(ui: &mut egui::Ui, trend: &RollingTrend) {
        let points: Vec<[f64; 2]> = trend
            .defined()
            .map(|(date, mean)| [date.num_days_from_ce() as f64, mean])
            .collect();

        Plot::new("trend")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .y_axis_label(format!("{}-day average", trend.window))
            .x_axis_formatter(|mark, _range| {
                NaiveDate::from_num_days_from_ce_opt(mark.value.round() as i32)
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default()
            })
            .label_formatter(|_name, value| {
                let date = NaiveDate::from_num_days_from_ce_opt(value.x.round() as i32)
                    .map(|d| d.to_string())
                    .unwrap_or_default();
                format!("{}\n{:.1}", date, value.y)
            })
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from_iter(points.iter().copied()))
                        .color(TREND_COLOR)
                        .width(1.5),
                );
            });
    }

    /// Casual vs registered pie with percentage labels.
    pub fn draw_composition(ui: &mut egui::Ui, composition: &RiderComposition) {
        let Some((casual, registered)) = composition.shares() else {
            ui.label("No riders in the current selection");
            return;
        };

        let size = egui::vec2(ui.available_width().min(CHART_HEIGHT), CHART_HEIGHT);
        let (response, painter) = ui.allocate_painter(size, Sense::hover());
        let center = response.rect.center();
        let radius = size.x.min(size.y) / 2.0 - 10.0;

        let slices = [
            ("Casual", casual, composition.casual_mean),
            ("Registered", registered, composition.registered_mean),
        ];

        // Start at 140 degrees, counter-clockwise
        let mut start = -140.0_f32.to_radians();
        for (i, (label, share, mean)) in slices.iter().enumerate() {
            let sweep = (*share as f32 / 100.0) * TAU;
            Self::draw_pie_slice(&painter, center, radius, start, sweep, PIE_COLORS[i]);

            let mid = start - sweep / 2.0;
            let label_pos = center + egui::vec2(mid.cos(), mid.sin()) * radius * 0.6;
            painter.text(
                label_pos,
                Align2::CENTER_CENTER,
                format!("{}\n{:.1}%\n({:.0})", label, share, mean),
                FontId::proportional(13.0),
                Color32::BLACK,
            );
            start -= sweep;
        }
    }

    /// Fill a pie slice as a fan of triangles so slices over 180 degrees stay convex.
    fn draw_pie_slice(
        painter: &egui::Painter,
        center: Pos2,
        radius: f32,
        start: f32,
        sweep: f32,
        color: Color32,
    ) {
        let steps = ((sweep.abs() / TAU) * 96.0).ceil().max(1.0) as usize;
        let point_at = |angle: f32| center + egui::vec2(angle.cos(), angle.sin()) * radius;

        for step in 0..steps {
            let a0 = start - sweep * step as f32 / steps as f32;
            let a1 = start - sweep * (step + 1) as f32 / steps as f32;
            painter.add(Shape::convex_polygon(
                vec![center, point_at(a0), point_at(a1)],
                color,
                Stroke::NONE,
            ));
        }
        painter.line_segment([center, point_at(start)], Stroke::new(1.0, Color32::WHITE));
    }

    /// Line with markers, highest point emphasized. Used for weekdays.
    pub fn draw_grouped_line(ui: &mut egui::Ui, average: &GroupedAverage) {
        let labels = Self::display_labels(average);
        let points: Vec<[f64; 2]> = average
            .groups
            .iter()
            .enumerate()
            .map(|(i, g)| [i as f64, g.mean])
            .collect();

        Plot::new(format!("grouped_line_{}", average.dimension))
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .y_axis_label("Mean rentals")
            .legend(Legend::default())
            .x_axis_formatter(move |mark, _range| Self::category_label(&labels, mark.value))
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from_iter(points.iter().copied()))
                        .color(MUTED_COLOR)
                        .width(1.5),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(points.iter().copied()))
                        .radius(4.0)
                        .color(MUTED_COLOR),
                );
                if let Some(&top) = points.last() {
                    plot_ui.points(
                        Points::new(PlotPoints::from(vec![top]))
                            .radius(8.0)
                            .color(ALERT_COLOR)
                            .name("Highest"),
                    );
                }
            });
    }

    /// Bars per group with the highest mean in the highlight color.
    pub fn draw_grouped_bars(
        ui: &mut egui::Ui,
        average: &GroupedAverage,
        horizontal: bool,
        base: Color32,
    ) {
        let labels = Self::display_labels(average);
        let len = average.groups.len();
        let bars: Vec<Bar> = average
            .groups
            .iter()
            .enumerate()
            .map(|(i, g)| {
                Bar::new(i as f64, g.mean)
                    .width(0.7)
                    .fill(Self::bar_color(i, len, base, HIGHLIGHT_COLOR))
                    .name(format!("{} (n={})", labels[i], g.count))
            })
            .collect();

        let mut chart = BarChart::new(bars).color(base);
        if horizontal {
            chart = chart.horizontal();
        }

        let mut plot = Plot::new(format!("grouped_bars_{}", average.dimension))
            .height(CHART_HEIGHT)
            .allow_scroll(false);
        plot = if horizontal {
            plot.x_axis_label("Mean rentals")
                .y_axis_formatter(move |mark, _range| Self::category_label(&labels, mark.value))
        } else {
            plot.y_axis_label("Mean rentals")
                .x_axis_formatter(move |mark, _range| Self::category_label(&labels, mark.value))
        };

        plot.show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
        });
    }

    /// Day counts per rental category, annotated with the category mean.
    pub fn draw_bins(ui: &mut egui::Ui, bins: &[CategorySummary]) {
        let labels: Vec<String> = bins.iter().map(|b| b.category.to_string()).collect();
        let bars: Vec<Bar> = bins
            .iter()
            .enumerate()
            .map(|(i, b)| {
                Bar::new(i as f64, b.count as f64)
                    .width(0.6)
                    .fill(BAR_COLOR)
                    .name(b.category.label())
            })
            .collect();
        let annotations: Vec<(f64, f64, String)> = bins
            .iter()
            .enumerate()
            .filter_map(|(i, b)| {
                b.mean
                    .map(|m| (i as f64, b.count as f64, format!("mean {:.0}", m)))
            })
            .collect();

        Plot::new("rental_bins")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .y_axis_label("Days")
            .x_axis_formatter(move |mark, _range| Self::category_label(&labels, mark.value))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(BAR_COLOR));
                for (x, y, text) in annotations {
                    plot_ui.text(
                        Text::new(PlotPoint::new(x, y), RichText::new(text).size(12.0))
                            .anchor(Align2::CENTER_BOTTOM),
                    );
                }
            });
    }

    fn display_labels(average: &GroupedAverage) -> Vec<String> {
        average
            .groups
            .iter()
            .map(|g| average.dimension.display_label(&g.label))
            .collect()
    }

    /// Axis label for an integer category position.
    fn category_label(labels: &[String], value: f64) -> String {
        let rounded = value.round();
        if (value - rounded).abs() > 1e-6 || rounded < 0.0 {
            return String::new();
        }
        labels.get(rounded as usize).cloned().unwrap_or_default()
    }

    /// Base bar color per dimension.
    pub fn base_color(dimension: Dimension) -> Color32 {
        match dimension {
            Dimension::Month => Color32::LIGHT_GRAY,
            _ => BAR_COLOR,
        }
    }
}
