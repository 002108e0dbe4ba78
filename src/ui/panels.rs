use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use super::charts;
use crate::state::{AppState, Tab};

const WARNING: Color32 = Color32::from_rgb(230, 160, 20);
const ERROR: Color32 = Color32::from_rgb(220, 50, 50);

// ---------------------------------------------------------------------------
// Left side panel – season filter
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Season filter");
    ui.separator();

    let Some(dashboard) = &state.dashboard else {
        ui.label("No dataset loaded.");
        return;
    };

    let choices = dashboard.season_choices.clone();
    let mut selected = dashboard.selected;

    ui.strong("Choose season");
    egui::ComboBox::from_id_salt("season_select")
        .selected_text(selected.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            for season in &choices {
                ui.selectable_value(&mut selected, *season, season.to_string());
            }
        });

    ui.add_space(6.0);
    ui.label(format!("Selected season: {}", dashboard.selected.name()));
    ui.label(format!("Rows: {}", dashboard.selected_rows));

    ui.separator();
    ui.strong("Data quality");
    ui.label(format!("{} rows loaded", dashboard.total_rows));
    ui.label(format!("{} rows dropped (invalid date)", dashboard.dropped.len()));
    ui.label(format!("{} rows with a missing count", dashboard.missing_count_rows));
    ui.label(format!("{} rows with unknown season", dashboard.unknown_season_rows));

    // Re-run the pipeline after the widgets released the dashboard borrow.
    if selected != dashboard.selected {
        state.select_season(selected);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.rerender();
                ui.close_menu();
            }
            let can_export = state.dashboard.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export view as JSON…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(state.data_path.display().to_string());

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(ERROR));
        }
    });
}

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Page title, tab strip and the active tab's sections.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("📊 Bike Sharing Dashboard");
    ui.label("Visualizations and insights from the Bike Sharing dataset");
    ui.add_space(4.0);

    if let Some(message) = &state.fatal {
        fatal_page(ui, message);
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        ui.selectable_value(&mut state.tab, Tab::General, "📈 General visualization");
        ui.selectable_value(&mut state.tab, Tab::Analytics, "📊 Analytical questions");
    });
    ui.separator();

    let Some(dashboard) = &state.dashboard else {
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match state.tab {
            Tab::General => {
                ui.heading(format!(
                    "Rental distribution, season: {}",
                    dashboard.selected.name()
                ));
                charts::distribution(ui, &dashboard.general.distribution);
                ui.add_space(12.0);

                ui.heading("Correlation between numeric variables");
                charts::heatmap(ui, &dashboard.general.heatmap);
            }
            Tab::Analytics => {
                ui.heading("🔍 Analytical questions");
                ui.add_space(4.0);

                ui.strong("1. How does bike usage change over time?");
                charts::monthly_trend(ui, &dashboard.analytics.trend);
                ui.add_space(12.0);

                ui.strong(format!(
                    "2. Which three numeric variables correlate most with monthly rentals in {}?",
                    dashboard.analytics.top_correlations.year
                ));
                charts::top_correlations(ui, &dashboard.analytics.top_correlations);
                ui.add_space(12.0);

                ui.strong("3. How do users segment by rental pattern in Fall 2012?");
                charts::segmentation(ui, &dashboard.analytics.segmentation);
            }
        });
}

/// Single message shown instead of every chart when loading failed.
pub fn fatal_page(ui: &mut Ui, message: &str) {
    ui.add_space(24.0);
    ui.label(RichText::new(format!("❌ {message}")).color(ERROR).size(16.0));
}

pub fn warning(ui: &mut Ui, text: impl Into<String>) {
    ui.label(RichText::new(format!("⚠ {}", text.into())).color(WARNING));
}

pub fn error(ui: &mut Ui, text: impl Into<String>) {
    ui.label(RichText::new(format!("❌ {}", text.into())).color(ERROR));
}

pub fn footer(ui: &mut Ui) {
    ui.label(RichText::new("By: Syakira - Bike Sharing Dashboard").weak());
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open bike sharing data")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Switching data file to {}", path.display());
        state.set_data_path(path);
    }
}

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export dashboard view")
        .add_filter("JSON", &["json"])
        .set_file_name("dashboard.json")
        .save_file();

    if let Some(path) = file {
        match state.export_json(&path) {
            Ok(()) => state.status_message = None,
            Err(e) => {
                log::error!("Export failed: {e:#}");
                state.status_message = Some(format!("Export failed: {e:#}"));
            }
        }
    }
}
