// Copyright 2023 Remi Bernotavicius

use crate::database;
use crate::database::models::CourseId;
use crate::session::AppSession;
use eframe::egui;
use std::collections::HashMap;
use std::mem;

mod course_details;
mod dashboard;
mod login;
mod new_course;
mod notifications;
mod recipe_config;
mod report;
mod search;

pub fn new_error_toast(text: impl Into<egui::WidgetText>) -> egui_toast::Toast {
    egui_toast::Toast {
        kind: egui_toast::ToastKind::Error,
        text: text.into(),
        options: egui_toast::ToastOptions::default()
            .duration_in_seconds(5.0)
            .show_progress(true),
        style: egui_toast::ToastStyle::default(),
    }
}

pub fn new_info_toast(text: impl Into<egui::WidgetText>) -> egui_toast::Toast {
    egui_toast::Toast {
        kind: egui_toast::ToastKind::Info,
        text: text.into(),
        options: egui_toast::ToastOptions::default()
            .duration_in_seconds(3.0)
            .show_progress(true),
        style: egui_toast::ToastStyle::default(),
    }
}

/// Logs the error and shows it in a toast.
pub fn show_error(
    toasts: &mut egui_toast::Toasts,
    context: &str,
    error: impl std::fmt::Display,
) {
    log::error!("{context}: {error}");
    toasts.add(new_error_toast(format!("{context}: {error}")));
}

pub fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

struct ChefScreen {
    session: AppSession,
    dashboard: dashboard::Dashboard,
    course_windows: HashMap<CourseId, course_details::CourseDetailsWindow>,
    new_course_window: Option<new_course::NewCourseWindow>,
    report_window: Option<report::ReportWindow>,
    notifications_window: Option<notifications::NotificationsWindow>,
}

impl ChefScreen {
    fn new(
        conn: &mut database::Connection,
        session: AppSession,
        toasts: &mut egui_toast::Toasts,
    ) -> Self {
        Self {
            dashboard: dashboard::Dashboard::new(conn, &session, toasts),
            session,
            course_windows: Default::default(),
            new_course_window: None,
            report_window: None,
            notifications_window: None,
        }
    }

    /// Returns `true` when the chef logs out.
    fn update_menu(
        &mut self,
        ctx: &egui::Context,
        conn: &mut database::Connection,
        toasts: &mut egui_toast::Toasts,
    ) -> bool {
        let mut logout = false;
        egui::TopBottomPanel::top("menu").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("Courses", |ui| {
                    if ui.button("New Course").clicked() && self.new_course_window.is_none() {
                        self.new_course_window = Some(new_course::NewCourseWindow::new());
                        ui.close_menu();
                    }
                    if ui.button("Refresh").clicked() {
                        self.dashboard.refresh(conn, &self.session, toasts);
                        ui.close_menu();
                    }
                });
                ui.menu_button("View", |ui| {
                    if ui.button("Monthly Report").clicked() && self.report_window.is_none() {
                        self.report_window =
                            Some(report::ReportWindow::new(conn, &self.session, today()));
                        ui.close_menu();
                    }
                    if ui.button("Notifications").clicked() && self.notifications_window.is_none()
                    {
                        self.notifications_window = Some(
                            notifications::NotificationsWindow::new(conn, &self.session, toasts),
                        );
                        ui.close_menu();
                    }
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    logout = ui.button("Log Out").clicked();
                    ui.label(&self.session.chef().name);
                });
            });
        });
        logout
    }

    fn update_course_windows(
        &mut self,
        ctx: &egui::Context,
        conn: &mut database::Connection,
        toasts: &mut egui_toast::Toasts,
    ) {
        let mut refresh_dashboard = false;
        for (id, mut window) in mem::take(&mut self.course_windows) {
            match window.update(ctx, conn, toasts) {
                course_details::UpdateEvent::Closed => {}
                course_details::UpdateEvent::Deleted => refresh_dashboard = true,
                course_details::UpdateEvent::Changed => {
                    refresh_dashboard = true;
                    self.course_windows.insert(id, window);
                }
                course_details::UpdateEvent::None => {
                    self.course_windows.insert(id, window);
                }
            }
        }
        if refresh_dashboard {
            self.dashboard.refresh(conn, &self.session, toasts);
        }
    }

    fn update_new_course_window(
        &mut self,
        ctx: &egui::Context,
        conn: &mut database::Connection,
        toasts: &mut egui_toast::Toasts,
    ) {
        let Some(window) = &mut self.new_course_window else {
            return;
        };
        match window.update(ctx, conn, &self.session, toasts) {
            new_course::UpdateEvent::None => {}
            new_course::UpdateEvent::Closed => self.new_course_window = None,
            new_course::UpdateEvent::Created(course_id) => {
                self.new_course_window = None;
                self.dashboard.refresh(conn, &self.session, toasts);
                match course_details::CourseDetailsWindow::new(conn, course_id) {
                    Ok(window) => {
                        self.course_windows.insert(course_id, window);
                    }
                    Err(error) => show_error(toasts, "Couldn't load the new course", error),
                }
            }
        }
    }

    fn update_report_window(&mut self, ctx: &egui::Context, conn: &mut database::Connection) {
        if let Some(window) = &mut self.report_window {
            if window.update(ctx, conn, &self.session) {
                self.report_window = None;
            }
        }
    }

    fn update_notifications_window(
        &mut self,
        ctx: &egui::Context,
        conn: &mut database::Connection,
        toasts: &mut egui_toast::Toasts,
    ) {
        if let Some(window) = &mut self.notifications_window {
            if window.update(ctx, conn, &self.session, toasts) {
                self.notifications_window = None;
            }
        }
    }

    /// Returns `true` when the chef logs out.
    fn update(
        &mut self,
        ctx: &egui::Context,
        conn: &mut database::Connection,
        toasts: &mut egui_toast::Toasts,
    ) -> bool {
        if self.update_menu(ctx, conn, toasts) {
            return true;
        }
        self.dashboard
            .update(ctx, conn, toasts, &self.session, &mut self.course_windows);
        self.update_course_windows(ctx, conn, toasts);
        self.update_new_course_window(ctx, conn, toasts);
        self.update_report_window(ctx, conn);
        self.update_notifications_window(ctx, conn, toasts);
        false
    }
}

enum Screen {
    Login(login::LoginScreen),
    Chef(Box<ChefScreen>),
}

pub struct FoodLab {
    db: database::Database,
    screen: Screen,
    toasts: egui_toast::Toasts,
}

impl FoodLab {
    pub fn new(db: database::Database) -> Self {
        Self {
            db,
            screen: Screen::Login(login::LoginScreen::default()),
            toasts: egui_toast::Toasts::new()
                .anchor(egui::Align2::RIGHT_BOTTOM, (-10.0, -10.0))
                .direction(egui::Direction::BottomUp),
        }
    }

    fn update_screen(&mut self, ctx: &egui::Context, conn: &mut database::Connection) {
        match &mut self.screen {
            Screen::Login(login) => {
                if let Some(session) = login.update(ctx, conn, &mut self.toasts) {
                    let chef = ChefScreen::new(conn, session, &mut self.toasts);
                    self.screen = Screen::Chef(Box::new(chef));
                }
            }
            Screen::Chef(chef) => {
                if chef.update(ctx, conn, &mut self.toasts) {
                    log::info!("chef {} logged out", chef.session.chef_id());
                    self.screen = Screen::Login(login::LoginScreen::default());
                }
            }
        }
    }
}

impl eframe::App for FoodLab {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        match self.db.get() {
            Ok(mut conn) => self.update_screen(ctx, &mut conn),
            Err(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.centered_and_justified(|ui| {
                        ui.label(format!("The database is unavailable: {error}"));
                    });
                });
            }
        }
        self.toasts.show(ctx);
    }
}
