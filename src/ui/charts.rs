use std::ops::RangeInclusive;

use eframe::egui::{self, Align2, Color32, FontId, RichText, Sense, Ui, Vec2};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, MarkerShape, Plot, Points};

use super::panels::{error, warning};
use crate::color::{diverging, generate_palette, text_on};
use crate::report::correlation::{CorrelationMatrix, TopCorrelations};
use crate::report::distribution::Distribution;
use crate::report::segmentation::Segmentation;
use crate::report::trend::MonthlyTrend;

const PLOT_HEIGHT: f32 = 320.0;
const CELL: Vec2 = Vec2::new(56.0, 26.0);
const BAR_COLOR: Color32 = Color32::from_rgb(135, 206, 235);
const LINE_COLOR: Color32 = Color32::from_rgb(30, 80, 220);

/// Axis formatter that shows `labels[i]` at integer positions only.
fn index_labels(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let idx = mark.value.round();
        if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// General tab
// ---------------------------------------------------------------------------

pub fn distribution(ui: &mut Ui, chart: &Distribution) {
    let (season, histogram) = match chart {
        Distribution::NoData { season } => {
            warning(ui, format!("No data for season {}.", season.name()));
            return;
        }
        Distribution::Histogram { season, histogram } => (season, histogram),
    };

    let bars: Vec<Bar> = histogram
        .bins
        .iter()
        .map(|b| {
            Bar::new(b.center(), b.count as f64)
                .width(b.width())
                .name(format!("{:.0}–{:.0}", b.start, b.end))
        })
        .collect();

    Plot::new("distribution_plot")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Rentals")
        .y_axis_label("Frequency")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .name(format!("{} days", season.name()))
                    .color(BAR_COLOR),
            );
            if !histogram.density.is_empty() {
                plot_ui.line(
                    Line::new(histogram.density.clone())
                        .name("Density")
                        .color(LINE_COLOR)
                        .width(2.0),
                );
            }
        });
}

/// Annotated correlation matrix drawn as a grid of coloured cells.
pub fn heatmap(ui: &mut Ui, matrix: &CorrelationMatrix) {
    if matrix.columns.is_empty() {
        warning(ui, "No numeric columns to correlate.");
        return;
    }

    egui::ScrollArea::horizontal()
        .id_salt("heatmap_scroll")
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("heatmap_grid")
                .spacing([2.0, 2.0])
                .show(ui, |ui: &mut Ui| {
                    ui.label("");
                    for name in &matrix.columns {
                        ui.add_sized(CELL, egui::Label::new(RichText::new(name).small().strong()));
                    }
                    ui.end_row();

                    for (i, name) in matrix.columns.iter().enumerate() {
                        ui.label(RichText::new(name).small().strong());
                        for j in 0..matrix.columns.len() {
                            let value = matrix.values[i][j];
                            let fill = diverging(value);
                            let (rect, response) = ui.allocate_exact_size(CELL, Sense::hover());
                            ui.painter().rect_filled(rect, 0.0, fill);
                            ui.painter().text(
                                rect.center(),
                                Align2::CENTER_CENTER,
                                matrix.annotation(i, j),
                                FontId::monospace(12.0),
                                text_on(fill),
                            );
                            response.on_hover_text(format!(
                                "{} × {}: {}",
                                name,
                                matrix.columns[j],
                                matrix.annotation(i, j)
                            ));
                        }
                        ui.end_row();
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Analytics tab
// ---------------------------------------------------------------------------

pub fn monthly_trend(ui: &mut Ui, trend: &MonthlyTrend) {
    if trend.points.is_empty() {
        warning(ui, "No monthly data.");
        return;
    }

    let labels: Vec<String> = trend.points.iter().map(|p| p.year_month.clone()).collect();
    let series: Vec<[f64; 2]> = trend
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| [i as f64, p.total as f64])
        .collect();

    Plot::new("monthly_trend_plot")
        .height(PLOT_HEIGHT)
        .x_axis_label("Time (year-month)")
        .y_axis_label("Total rentals")
        .x_axis_formatter(index_labels(labels))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(series.clone())
                    .name("Bike usage over time")
                    .color(LINE_COLOR)
                    .width(1.5),
            );
            plot_ui.points(
                Points::new(series)
                    .shape(MarkerShape::Circle)
                    .radius(3.5)
                    .color(LINE_COLOR),
            );
        });
}

/// Horizontal bars, weakest at the bottom.
pub fn top_correlations(ui: &mut Ui, top: &TopCorrelations) {
    if top.entries.is_empty() {
        warning(ui, format!("No correlations available for {}.", top.year));
        return;
    }

    let ascending = top.ascending();
    let labels: Vec<String> = ascending.iter().map(|e| e.column.clone()).collect();
    let bars: Vec<Bar> = ascending
        .iter()
        .enumerate()
        .map(|(i, e)| {
            Bar::new(i as f64, e.magnitude())
                .width(0.6)
                .name(format!("{} (r = {:.2})", e.column, e.correlation))
        })
        .collect();

    ui.label(format!(
        "Top {} correlations with monthly rentals ({}, {} months)",
        top.entries.len(),
        top.year,
        top.months
    ));
    Plot::new("top_correlations_plot")
        .height(PLOT_HEIGHT * 0.7)
        .x_axis_label("Correlation (|absolute value|)")
        .y_axis_formatter(index_labels(labels))
        .include_x(0.0)
        .include_x(1.0)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().color(BAR_COLOR));
        });
}

pub fn segmentation(ui: &mut Ui, seg: &Segmentation) {
    match seg {
        Segmentation::Missing {
            year,
            season,
            diagnostics,
        } => {
            error(
                ui,
                format!(
                    "No data for {} {year}. Check the CSV file.",
                    season.name()
                ),
            );
            ui.push_id("segmentation_diagnostics", |ui: &mut Ui| {
                TableBuilder::new(ui)
                    .striped(true)
                    .vscroll(false)
                    .column(Column::auto().at_least(120.0))
                    .column(Column::remainder())
                    .header(20.0, |mut header| {
                        header.col(|ui| {
                            ui.strong("dteday");
                        });
                        header.col(|ui| {
                            ui.strong("season");
                        });
                    })
                    .body(|mut body| {
                        for d in diagnostics {
                            body.row(18.0, |mut row| {
                                row.col(|ui| {
                                    ui.label(d.date.to_string());
                                });
                                row.col(|ui| {
                                    ui.label(d.season.code().to_string());
                                });
                            });
                        }
                    });
            });
        }
        Segmentation::Failed { message } => {
            error(ui, format!("Segmentation failed: {message}"));
        }
        Segmentation::Clusters {
            year,
            season,
            points,
            summaries,
        } => {
            let n = points.iter().map(|p| p.cluster + 1).max().unwrap_or(0);
            let palette = generate_palette(n);

            Plot::new("segmentation_plot")
                .height(PLOT_HEIGHT)
                .legend(Legend::default())
                .x_axis_label("Casual rentals")
                .y_axis_label("Registered rentals")
                .allow_scroll(false)
                .show(ui, |plot_ui| {
                    for (cluster, color) in palette.iter().enumerate() {
                        let members: Vec<[f64; 2]> = points
                            .iter()
                            .filter(|p| p.cluster == cluster)
                            .map(|p| [f64::from(p.casual), f64::from(p.registered)])
                            .collect();
                        plot_ui.points(
                            Points::new(members)
                                .name(format!("Cluster {cluster}"))
                                .color(*color)
                                .shape(MarkerShape::Circle)
                                .radius(5.0),
                        );
                    }
                });

            ui.label(format!("User segments, {} {year}", season.name()));
            ui.push_id("segmentation_summary", |ui: &mut Ui| {
                TableBuilder::new(ui)
                    .striped(true)
                    .vscroll(false)
                    .columns(Column::auto().at_least(90.0), 4)
                    .header(20.0, |mut header| {
                        for title in ["cluster", "days", "mean casual", "mean registered"] {
                            header.col(|ui| {
                                ui.strong(title);
                            });
                        }
                    })
                    .body(|mut body| {
                        for s in summaries {
                            body.row(18.0, |mut row| {
                                row.col(|ui| {
                                    let color = palette.get(s.cluster).copied().unwrap_or(Color32::GRAY);
                                    ui.label(RichText::new(s.cluster.to_string()).color(color).strong());
                                });
                                row.col(|ui| {
                                    ui.label(s.size.to_string());
                                });
                                row.col(|ui| {
                                    ui.label(format!("{:.1}", s.mean_casual));
                                });
                                row.col(|ui| {
                                    ui.label(format!("{:.1}", s.mean_registered));
                                });
                            });
                        }
                    });
            });
        }
    }
}
