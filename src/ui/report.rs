// Copyright 2023 Remi Bernotavicius

use crate::database;
use crate::report::{self, MonthlyReport, ReportPeriod, SessionCounts};
use crate::session::AppSession;
use chrono::Datelike as _;
use eframe::egui;
use std::collections::BTreeMap;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const ONLINE_COLOR: egui::Color32 = egui::Color32::from_rgb(90, 140, 220);
const PRACTICAL_COLOR: egui::Color32 = egui::Color32::from_rgb(230, 140, 60);

fn month_name(month: u32) -> &'static str {
    MONTH_NAMES
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("")
}

pub struct ReportWindow {
    year: i32,
    month: u32,
    report: Option<MonthlyReport>,
    months: BTreeMap<u32, SessionCounts>,
}

impl ReportWindow {
    pub fn new(
        conn: &mut database::Connection,
        session: &AppSession,
        today: chrono::NaiveDate,
    ) -> Self {
        Self {
            year: today.year(),
            month: today.month(),
            report: ReportPeriod::containing(today)
                .map(|period| report::monthly_report(conn, session.chef_id(), period)),
            months: report::annual_breakdown(conn, session.chef_id(), today.year()),
        }
    }

    fn refresh(&mut self, conn: &mut database::Connection, session: &AppSession) {
        self.report = ReportPeriod::new(self.year, self.month)
            .map(|period| report::monthly_report(conn, session.chef_id(), period));
        self.months = report::annual_breakdown(conn, session.chef_id(), self.year);
    }

    fn update_statistics(&self, ui: &mut egui::Ui) {
        let Some(report) = &self.report else {
            ui.label("No report for this month");
            return;
        };
        egui::Grid::new("monthly report grid")
            .num_columns(2)
            .show(ui, |ui| {
                ui.label("Courses");
                ui.label(report.course_count.to_string());
                ui.end_row();
                ui.label("Online sessions");
                ui.label(report.online_sessions.to_string());
                ui.end_row();
                ui.label("Practical sessions");
                ui.label(report.practical_sessions.to_string());
                ui.end_row();
                ui.label("Most recipes in a session");
                ui.label(report.recipes.max.to_string());
                ui.end_row();
                ui.label("Fewest recipes in a session");
                ui.label(report.recipes.min.to_string());
                ui.end_row();
                ui.label("Average recipes per session");
                ui.label(format!("{:.2}", report.recipes.mean));
                ui.end_row();
            });
    }

    /// Grouped bar chart, one online and one practical bar per month.
    fn update_chart(&self, ui: &mut egui::Ui) {
        let desired = egui::vec2(ui.available_width().max(360.0), 220.0);
        let (response, painter) = ui.allocate_painter(desired, egui::Sense::hover());
        let rect = response.rect;
        let visuals = ui.visuals();
        painter.rect_filled(rect, 4.0, visuals.extreme_bg_color);

        let label_height = 18.0;
        let plot = egui::Rect::from_min_max(
            rect.min + egui::vec2(8.0, 8.0),
            rect.max - egui::vec2(8.0, label_height),
        );
        let highest = self
            .months
            .values()
            .map(|c| c.online.max(c.practical))
            .max()
            .unwrap_or(0)
            .max(1) as f32;

        let slot = plot.width() / 12.0;
        let bar = slot * 0.35;
        let font = egui::FontId::proportional(11.0);
        for (&month, counts) in &self.months {
            let left = plot.left() + slot * (month - 1) as f32 + slot * 0.15;
            for (i, (value, color)) in [
                (counts.online, ONLINE_COLOR),
                (counts.practical, PRACTICAL_COLOR),
            ]
            .into_iter()
            .enumerate()
            {
                let height = plot.height() * value as f32 / highest;
                let x = left + bar * i as f32;
                let bar_rect = egui::Rect::from_min_max(
                    egui::pos2(x, plot.bottom() - height),
                    egui::pos2(x + bar, plot.bottom()),
                );
                painter.rect_filled(bar_rect, 1.0, color);
                if value > 0 {
                    painter.text(
                        bar_rect.center_top() - egui::vec2(0.0, 2.0),
                        egui::Align2::CENTER_BOTTOM,
                        value.to_string(),
                        font.clone(),
                        visuals.text_color(),
                    );
                }
            }
            painter.text(
                egui::pos2(left + bar, rect.bottom() - 2.0),
                egui::Align2::CENTER_BOTTOM,
                &month_name(month)[..3],
                font.clone(),
                visuals.text_color(),
            );
        }

        if let Some(pos) = response.hover_pos() {
            let month = ((pos.x - plot.left()) / slot).floor() as u32 + 1;
            if let Some(counts) = self.months.get(&month) {
                response.on_hover_text_at_pointer(format!(
                    "{}: {} online, {} practical",
                    month_name(month),
                    counts.online,
                    counts.practical
                ));
            }
        }
    }

    /// Returns `true` when closed.
    pub fn update(
        &mut self,
        ctx: &egui::Context,
        conn: &mut database::Connection,
        session: &AppSession,
    ) -> bool {
        let mut open = true;
        let mut changed = false;
        egui::Window::new("Monthly Report")
            .open(&mut open)
            .default_width(520.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    egui::ComboBox::from_id_salt("report month")
                        .selected_text(month_name(self.month))
                        .show_ui(ui, |ui| {
                            for month in 1..=12 {
                                changed |= ui
                                    .selectable_value(&mut self.month, month, month_name(month))
                                    .changed();
                            }
                        });
                    changed |= ui
                        .add(egui::DragValue::new(&mut self.year).range(2000..=2100))
                        .changed();
                    if ui.button("Refresh").clicked() {
                        changed = true;
                    }
                });
                ui.separator();
                self.update_statistics(ui);
                ui.separator();
                ui.label(format!("Sessions in {}", self.year));
                self.update_chart(ui);
                ui.horizontal(|ui| {
                    ui.colored_label(ONLINE_COLOR, "■ online");
                    ui.colored_label(PRACTICAL_COLOR, "■ practical");
                });
            });

        if changed {
            self.refresh(conn, session);
        }
        !open
    }
}
