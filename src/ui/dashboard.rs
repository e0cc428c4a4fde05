// Copyright 2023 Remi Bernotavicius

use super::course_details::CourseDetailsWindow;
use super::show_error;
use crate::database;
use crate::database::models::{Course, CourseCategory, CourseId};
use crate::database::query;
use crate::session::AppSession;
use eframe::egui;
use std::collections::HashMap;

/// The chef's courses, newest first.
pub struct Dashboard {
    courses: Vec<Course>,
    category: Option<CourseCategory>,
}

impl Dashboard {
    pub fn new(
        conn: &mut database::Connection,
        session: &AppSession,
        toasts: &mut egui_toast::Toasts,
    ) -> Self {
        let mut dashboard = Self {
            courses: vec![],
            category: None,
        };
        dashboard.refresh(conn, session, toasts);
        dashboard
    }

    pub fn refresh(
        &mut self,
        conn: &mut database::Connection,
        session: &AppSession,
        toasts: &mut egui_toast::Toasts,
    ) {
        match query::courses_for_chef(conn, session.chef_id(), self.category) {
            Ok(courses) => self.courses = courses,
            Err(error) => show_error(toasts, "Couldn't load courses", error),
        }
    }

    pub fn update(
        &mut self,
        ctx: &egui::Context,
        conn: &mut database::Connection,
        toasts: &mut egui_toast::Toasts,
        session: &AppSession,
        course_windows: &mut HashMap<CourseId, CourseDetailsWindow>,
    ) {
        let mut category_changed = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("My Courses");
                ui.separator();
                let selected = self
                    .category
                    .map(|c| c.to_string())
                    .unwrap_or("All categories".into());
                egui::ComboBox::from_label("Category")
                    .selected_text(selected)
                    .show_ui(ui, |ui| {
                        category_changed |= ui
                            .selectable_value(&mut self.category, None, "All categories")
                            .changed();
                        for c in CourseCategory::iter() {
                            category_changed |= ui
                                .selectable_value(&mut self.category, Some(c), c.to_string())
                                .changed();
                        }
                    });
            });
            ui.separator();

            egui::ScrollArea::vertical()
                .auto_shrink(false)
                .show(ui, |ui| {
                    egui::Grid::new("course grid")
                        .striped(true)
                        .num_columns(5)
                        .show(ui, |ui| {
                            ui.strong("Title");
                            ui.strong("Category");
                            ui.strong("Start");
                            ui.strong("Every");
                            ui.strong("Sessions");
                            ui.end_row();

                            for course in &self.courses {
                                let mut shown = course_windows.contains_key(&course.id);
                                ui.toggle_value(&mut shown, &course.title);
                                ui.label(course.category.to_string());
                                ui.label(course.start_date.format("%d/%m/%Y").to_string());
                                ui.label(format!("{} days", course.frequency_days));
                                ui.label(course.session_count.to_string());
                                ui.end_row();

                                if shown && !course_windows.contains_key(&course.id) {
                                    match CourseDetailsWindow::new(conn, course.id) {
                                        Ok(window) => {
                                            course_windows.insert(course.id, window);
                                        }
                                        Err(error) => {
                                            show_error(toasts, "Couldn't open course", error)
                                        }
                                    }
                                } else if !shown {
                                    course_windows.remove(&course.id);
                                }
                            }
                        });
                    if self.courses.is_empty() {
                        ui.label("No courses yet. Create one from the Courses menu.");
                    }
                });
        });

        if category_changed {
            self.refresh(conn, session, toasts);
        }
    }
}
