// Copyright 2023 Remi Bernotavicius

use super::{new_error_toast, new_info_toast, show_error};
use crate::database;
use crate::database::models::{ChangeKind, Course, CourseId, NewNotification, Notification};
use crate::database::query;
use crate::session::AppSession;
use diesel::result::QueryResult;
use eframe::egui;
use std::collections::HashMap;

/// A new notification being written. No course means it goes to every course of the chef.
struct Draft {
    title: String,
    message: String,
    change_kind: ChangeKind,
    course: Option<CourseId>,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            title: String::new(),
            message: String::new(),
            change_kind: ChangeKind::Other,
            course: None,
        }
    }
}

pub struct NotificationsWindow {
    notifications: Vec<Notification>,
    courses: HashMap<CourseId, Course>,
    only_global: bool,
    draft: Draft,
}

impl NotificationsWindow {
    pub fn new(
        conn: &mut database::Connection,
        session: &AppSession,
        toasts: &mut egui_toast::Toasts,
    ) -> Self {
        let mut window = Self {
            notifications: vec![],
            courses: HashMap::new(),
            only_global: false,
            draft: Draft::default(),
        };
        if let Err(error) = window.refresh(conn, session) {
            show_error(toasts, "Couldn't load notifications", error);
        }
        window
    }

    fn refresh(
        &mut self,
        conn: &mut database::Connection,
        session: &AppSession,
    ) -> QueryResult<()> {
        self.courses = query::courses_for_chef(conn, session.chef_id(), None)?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        self.notifications = if self.only_global {
            query::global_notifications_for_chef(conn, session.chef_id())?
        } else {
            query::notifications_for_chef(conn, session.chef_id())?
        };
        Ok(())
    }

    fn course_title(&self, course: Option<CourseId>) -> String {
        match course {
            Some(id) => self
                .courses
                .get(&id)
                .map(|c| c.title.clone())
                .unwrap_or(format!("Course {id}")),
            None => "All courses".into(),
        }
    }

    /// Returns `false` without writing anything if the title or message is empty.
    fn send(
        &mut self,
        conn: &mut database::Connection,
        session: &AppSession,
    ) -> QueryResult<bool> {
        let draft = &self.draft;
        if draft.title.trim().is_empty() || draft.message.trim().is_empty() {
            return Ok(false);
        }
        let id = query::add_notification(
            conn,
            &NewNotification {
                chef_id: session.chef_id(),
                course_id: draft.course,
                title: draft.title.trim(),
                message: draft.message.trim(),
                change_kind: draft.change_kind,
                is_global: draft.course.is_none(),
            },
        )?;
        log::info!("sent notification {id}");
        self.draft = Draft::default();
        Ok(true)
    }

    fn update_list(&self, ui: &mut egui::Ui, to_delete: &mut Vec<Notification>) {
        egui::ScrollArea::vertical()
            .max_height(260.0)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                if self.notifications.is_empty() {
                    ui.label("No notifications");
                }
                for notification in &self.notifications {
                    ui.horizontal(|ui| {
                        ui.strong(&notification.title);
                        ui.label(format!("[{}]", notification.change_kind));
                        ui.label(self.course_title(notification.course_id));
                        ui.label(notification.created_at.format("%d/%m/%Y %H:%M").to_string());
                        if ui.small_button("Delete").clicked() {
                            to_delete.push(notification.clone());
                        }
                    });
                    ui.label(&notification.message);
                    ui.separator();
                }
            });
    }

    fn update_draft(&mut self, ui: &mut egui::Ui) -> bool {
        let mut send = false;
        egui::Grid::new("notification draft").show(ui, |ui| {
            ui.label("Course");
            egui::ComboBox::from_id_salt("notification course")
                .selected_text(self.course_title(self.draft.course))
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut self.draft.course, None, "All courses");
                    for course in self.courses.values() {
                        let title = course.title.as_str();
                        ui.selectable_value(&mut self.draft.course, Some(course.id), title);
                    }
                });
            ui.end_row();

            ui.label("Change");
            egui::ComboBox::from_id_salt("notification change kind")
                .selected_text(self.draft.change_kind.to_string())
                .show_ui(ui, |ui| {
                    for kind in ChangeKind::iter() {
                        ui.selectable_value(&mut self.draft.change_kind, kind, kind.to_string());
                    }
                });
            ui.end_row();

            ui.label("Title");
            ui.text_edit_singleline(&mut self.draft.title);
            ui.end_row();

            ui.label("Message");
            ui.text_edit_multiline(&mut self.draft.message);
            ui.end_row();
        });
        if ui.button("Send").clicked() {
            send = true;
        }
        send
    }

    /// Returns `true` when closed.
    pub fn update(
        &mut self,
        ctx: &egui::Context,
        conn: &mut database::Connection,
        session: &AppSession,
        toasts: &mut egui_toast::Toasts,
    ) -> bool {
        let mut open = true;
        let mut to_delete = vec![];
        let mut send = false;
        let mut filter_changed = false;
        egui::Window::new("Notifications")
            .open(&mut open)
            .default_width(480.0)
            .show(ctx, |ui| {
                filter_changed = ui
                    .checkbox(&mut self.only_global, "Only notifications for all courses")
                    .changed();
                ui.separator();
                self.update_list(ui, &mut to_delete);
                ui.heading("New notification");
                send = self.update_draft(ui);
            });

        let mut refresh = filter_changed;
        for notification in to_delete {
            match query::delete_notification(conn, notification.id) {
                Ok(_) => refresh = true,
                Err(error) => show_error(toasts, "Couldn't delete notification", error),
            }
        }
        if send {
            match self.send(conn, session) {
                Ok(true) => {
                    toasts.add(new_info_toast("Notification sent"));
                    refresh = true;
                }
                Ok(false) => {
                    toasts.add(new_error_toast("A notification needs a title and a message"));
                }
                Err(error) => show_error(toasts, "Couldn't send notification", error),
            }
        }
        if refresh {
            if let Err(error) = self.refresh(conn, session) {
                show_error(toasts, "Couldn't load notifications", error);
            }
        }

        !open
    }
}
