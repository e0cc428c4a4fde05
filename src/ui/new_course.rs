// Copyright 2023 Remi Bernotavicius

use super::recipe_config::RecipeEditor;
use super::{new_error_toast, new_info_toast, show_error, today};
use crate::course::CourseCreation;
use crate::database;
use crate::database::models::{CourseCategory, CourseId};
use crate::schedule::{CourseDraft, SessionKind, SessionPlan, ValidationError};
use crate::session::AppSession;
use eframe::egui;

pub enum UpdateEvent {
    None,
    Closed,
    Created(CourseId),
}

struct SessionForm {
    date: chrono::NaiveDate,
    practical: bool,
    has_time: bool,
    hour: u32,
    minute: u32,
    custom_duration: bool,
    duration_minutes: u32,
    link: String,
    location: String,
    recipes: Vec<RecipeEditor>,
}

impl SessionForm {
    fn new(date: chrono::NaiveDate) -> Self {
        Self {
            date,
            practical: false,
            has_time: false,
            hour: 9,
            minute: 0,
            custom_duration: false,
            duration_minutes: 60,
            link: String::new(),
            location: String::new(),
            recipes: vec![],
        }
    }

    fn to_plan(&self) -> SessionPlan {
        SessionPlan {
            date: self.date,
            time: self
                .has_time
                .then(|| chrono::NaiveTime::from_hms_opt(self.hour, self.minute, 0))
                .flatten(),
            duration_minutes: self.custom_duration.then_some(self.duration_minutes),
            kind: if self.practical {
                SessionKind::Practical {
                    location: self.location.clone(),
                    recipes: self.recipes.iter().map(RecipeEditor::to_draft).collect(),
                }
            } else {
                SessionKind::Online {
                    link: self.link.clone(),
                }
            },
        }
    }
}

enum Page {
    Course,
    Sessions(Vec<SessionForm>),
}

/// Two step wizard: the course fields, then one form per generated session date.
pub struct NewCourseWindow {
    title: String,
    category: CourseCategory,
    start_date: chrono::NaiveDate,
    frequency_days: u32,
    session_count: u32,

    page: Page,
    creation: CourseCreation,
    next_editor_id: u64,
}

impl NewCourseWindow {
    pub fn new() -> Self {
        Self {
            title: String::new(),
            category: CourseCategory::Tradition,
            start_date: today(),
            frequency_days: 7,
            session_count: 4,

            page: Page::Course,
            creation: CourseCreation::new(),
            next_editor_id: 0,
        }
    }

    fn draft(&self) -> CourseDraft {
        CourseDraft {
            title: self.title.clone(),
            category: self.category,
            start_date: self.start_date,
            frequency_days: self.frequency_days,
            session_count: self.session_count,
        }
    }

    fn update_course_page(&mut self, ui: &mut egui::Ui, toasts: &mut egui_toast::Toasts) {
        egui::Grid::new("new course grid").show(ui, |ui| {
            ui.label("Title");
            ui.add(egui::TextEdit::singleline(&mut self.title).desired_width(260.0));
            ui.end_row();

            ui.label("Category");
            egui::ComboBox::from_id_salt("new course category")
                .selected_text(self.category.to_string())
                .show_ui(ui, |ui| {
                    for c in CourseCategory::iter() {
                        ui.selectable_value(&mut self.category, c, c.to_string());
                    }
                });
            ui.end_row();

            ui.label("Start date");
            ui.add(egui_extras::DatePickerButton::new(&mut self.start_date));
            ui.end_row();

            ui.label("Every");
            ui.horizontal(|ui| {
                ui.add(egui::DragValue::new(&mut self.frequency_days).range(1..=365));
                ui.label("days");
            });
            ui.end_row();

            ui.label("Sessions");
            ui.add(egui::DragValue::new(&mut self.session_count).range(1..=100));
            ui.end_row();
        });

        ui.separator();
        if ui.button("Next").clicked() {
            match self.creation.start(self.draft(), today()) {
                Ok(dates) => {
                    self.page = Page::Sessions(dates.into_iter().map(SessionForm::new).collect());
                }
                Err(error) => {
                    toasts.add(new_error_toast(error.to_string()));
                }
            }
        }
    }

    fn update_session_form(
        ui: &mut egui::Ui,
        conn: &mut database::Connection,
        toasts: &mut egui_toast::Toasts,
        number: usize,
        form: &mut SessionForm,
        next_editor_id: &mut u64,
    ) {
        let heading = format!("Session {number}: {}", form.date.format("%A %d/%m/%Y"));
        egui::CollapsingHeader::new(heading)
            .id_salt(("new session", number))
            .default_open(true)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.radio_value(&mut form.practical, false, "Online");
                    ui.radio_value(&mut form.practical, true, "Practical");
                });
                ui.horizontal(|ui| {
                    ui.checkbox(&mut form.has_time, "Time");
                    if form.has_time {
                        ui.add(egui::DragValue::new(&mut form.hour).range(0..=23));
                        ui.label(":");
                        ui.add(egui::DragValue::new(&mut form.minute).range(0..=59));
                    }
                });
                ui.horizontal(|ui| {
                    ui.checkbox(&mut form.custom_duration, "Duration");
                    if form.custom_duration {
                        ui.add(
                            egui::DragValue::new(&mut form.duration_minutes)
                                .range(1..=600)
                                .suffix(" min"),
                        );
                    } else {
                        ui.label(format!("{} min", form.to_plan().duration()));
                    }
                });

                if form.practical {
                    ui.horizontal(|ui| {
                        ui.label("Location");
                        ui.text_edit_singleline(&mut form.location);
                    });
                    for mut recipe in std::mem::take(&mut form.recipes) {
                        if !recipe.update(ui, conn, toasts) {
                            form.recipes.push(recipe);
                        }
                    }
                    if ui.button("Add recipe").clicked() {
                        form.recipes.push(RecipeEditor::new(*next_editor_id));
                        *next_editor_id += 1;
                    }
                } else {
                    ui.horizontal(|ui| {
                        ui.label("Meeting link");
                        ui.text_edit_singleline(&mut form.link);
                    });
                }
            });
    }

    fn confirm(
        &mut self,
        conn: &mut database::Connection,
        session: &AppSession,
        toasts: &mut egui_toast::Toasts,
    ) -> UpdateEvent {
        let Page::Sessions(forms) = &self.page else {
            return UpdateEvent::None;
        };
        let plans: Vec<_> = forms.iter().map(SessionForm::to_plan).collect();
        match self.creation.confirm(conn, session, &plans) {
            Ok(created) => {
                if created.is_complete() {
                    toasts.add(new_info_toast(format!(
                        "Created {} with {} sessions and {} recipes",
                        self.title.trim(),
                        created.sessions,
                        created.recipes
                    )));
                } else {
                    toasts.add(new_error_toast(format!(
                        "Created {}, but {} items couldn't be saved",
                        self.title.trim(),
                        created.skipped
                    )));
                }
                UpdateEvent::Created(created.course_id)
            }
            Err(error) => {
                if let Some(error) = error.downcast_ref::<ValidationError>() {
                    toasts.add(new_error_toast(error.to_string()));
                } else {
                    show_error(toasts, "Couldn't create the course", error);
                }
                UpdateEvent::None
            }
        }
    }

    pub fn update(
        &mut self,
        ctx: &egui::Context,
        conn: &mut database::Connection,
        session: &AppSession,
        toasts: &mut egui_toast::Toasts,
    ) -> UpdateEvent {
        let mut open = true;
        let mut back = false;
        let mut cancel = false;
        let mut confirm = false;
        egui::Window::new("New Course")
            .open(&mut open)
            .default_width(560.0)
            .show(ctx, |ui| match &mut self.page {
                Page::Course => self.update_course_page(ui, toasts),
                Page::Sessions(forms) => {
                    ui.label(format!(
                        "{} ({}), {} sessions every {} days",
                        self.title.trim(),
                        self.category,
                        forms.len(),
                        self.frequency_days
                    ));
                    ui.separator();
                    egui::ScrollArea::vertical()
                        .max_height(ui.available_height() - 35.0)
                        .show(ui, |ui| {
                            for (i, form) in forms.iter_mut().enumerate() {
                                Self::update_session_form(
                                    ui,
                                    conn,
                                    toasts,
                                    i + 1,
                                    form,
                                    &mut self.next_editor_id,
                                );
                            }
                        });
                    ui.separator();
                    ui.horizontal(|ui| {
                        back = ui.button("Back").clicked();
                        cancel = ui.button("Cancel").clicked();
                        confirm = ui.button("Confirm").clicked();
                    });
                }
            });

        if !open || cancel {
            self.creation.cancel();
            return UpdateEvent::Closed;
        }
        if back {
            self.creation.cancel();
            self.page = Page::Course;
        }
        if confirm {
            return self.confirm(conn, session, toasts);
        }
        UpdateEvent::None
    }
}
