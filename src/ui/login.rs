// Copyright 2023 Remi Bernotavicius

use super::{new_error_toast, show_error};
use crate::database;
use crate::session::AppSession;
use eframe::egui;

#[derive(Default)]
pub struct LoginScreen {
    email: String,
    password: String,
}

impl LoginScreen {
    fn try_login(
        &mut self,
        conn: &mut database::Connection,
        toasts: &mut egui_toast::Toasts,
    ) -> Option<AppSession> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            toasts.add(new_error_toast("Enter your email and password"));
            return None;
        }
        match AppSession::login(conn, &self.email, &self.password) {
            Ok(Some(session)) => Some(session),
            Ok(None) => {
                toasts.add(new_error_toast("Invalid email or password"));
                self.password.clear();
                None
            }
            Err(error) => {
                show_error(toasts, "Login failed", error);
                None
            }
        }
    }

    /// Returns the new session once the chef has logged in.
    pub fn update(
        &mut self,
        ctx: &egui::Context,
        conn: &mut database::Connection,
        toasts: &mut egui_toast::Toasts,
    ) -> Option<AppSession> {
        let mut submit = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() / 4.0);
                ui.heading("UninaFoodLab");
                ui.label("Log in to manage your courses");
                ui.add_space(20.0);

                egui::Grid::new("login grid").show(ui, |ui| {
                    ui.label("Email");
                    ui.add(egui::TextEdit::singleline(&mut self.email).desired_width(240.0));
                    ui.end_row();

                    ui.label("Password");
                    let password = ui.add(
                        egui::TextEdit::singleline(&mut self.password)
                            .password(true)
                            .desired_width(240.0),
                    );
                    if password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        submit = true;
                    }
                    ui.end_row();
                });
                ui.add_space(10.0);
                if ui.button("Log In").clicked() {
                    submit = true;
                }
            });
        });

        if submit {
            self.try_login(conn, toasts)
        } else {
            None
        }
    }
}
