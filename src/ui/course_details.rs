// Copyright 2023 Remi Bernotavicius

use super::{new_error_toast, new_info_toast, show_error};
use crate::database;
use crate::database::models::{
    Course, CourseCategory, CourseId, IngredientId, Notification, OnlineSession, OnlineSessionId,
    PracticalSession, PracticalSessionId, Recipe, RecipeId, Student,
};
use crate::database::query::{self, UsedIngredient};
use diesel::result::QueryResult;
use eframe::egui;

struct RecipeEntry {
    recipe: Recipe,
    ingredients: Vec<UsedIngredient>,
}

struct PracticalEntry {
    session: PracticalSession,
    recipes: Vec<RecipeEntry>,
}

enum SessionBeingEdited {
    Online(OnlineSession),
    Practical(PracticalSession),
}

struct RecipeBeingEdited {
    id: RecipeId,
    name: String,
}

struct QuantityBeingEdited {
    recipe: RecipeId,
    ingredient: IngredientId,
    quantity: String,
}

enum Action {
    OpenLink(String),
    SaveOnline(OnlineSession),
    SavePractical(PracticalSession),
    DeleteOnline(OnlineSessionId),
    DeletePractical(PracticalSessionId),
    RenameRecipe(RecipeId, String),
    DeleteRecipe(RecipeId),
    SaveQuantity(RecipeId, IngredientId, String),
    RemoveIngredient(RecipeId, IngredientId),
    SaveCourse(Course),
    DeleteCourse,
}

pub enum UpdateEvent {
    None,
    Closed,
    Changed,
    Deleted,
}

fn format_time(time: Option<chrono::NaiveTime>) -> String {
    time.map(|t| t.format("%H:%M").to_string())
        .unwrap_or("-".into())
}

pub struct CourseDetailsWindow {
    course: Course,
    online_sessions: Vec<OnlineSession>,
    practical_sessions: Vec<PracticalEntry>,
    students: Vec<Student>,
    notifications: Vec<Notification>,

    edit_mode: bool,
    confirm_delete: bool,
    course_being_edited: Option<Course>,
    session_being_edited: Option<SessionBeingEdited>,
    recipe_being_edited: Option<RecipeBeingEdited>,
    quantity_being_edited: Option<QuantityBeingEdited>,
}

impl CourseDetailsWindow {
    pub fn new(conn: &mut database::Connection, course_id: CourseId) -> QueryResult<Self> {
        let course = query::get_course(conn, course_id)?.ok_or(diesel::result::Error::NotFound)?;
        let online_sessions = query::online_sessions_for_course(conn, &course)?;

        let mut practical_sessions = vec![];
        for session in query::practical_sessions_for_course(conn, &course)? {
            let mut recipes = vec![];
            for recipe in query::recipes_for_practical_session(conn, &session)? {
                recipes.push(RecipeEntry {
                    ingredients: query::ingredients_for_recipe(conn, recipe.id)?,
                    recipe,
                });
            }
            practical_sessions.push(PracticalEntry { session, recipes });
        }

        Ok(Self {
            students: query::students_for_course(conn, course.id)?,
            notifications: query::notifications_for_course(conn, course.id)?,
            course,
            online_sessions,
            practical_sessions,

            edit_mode: false,
            confirm_delete: false,
            course_being_edited: None,
            session_being_edited: None,
            recipe_being_edited: None,
            quantity_being_edited: None,
        })
    }

    fn reload(&mut self, conn: &mut database::Connection) -> QueryResult<()> {
        let edit_mode = self.edit_mode;
        *self = Self::new(conn, self.course.id)?;
        self.edit_mode = edit_mode;
        Ok(())
    }

    fn update_online_sessions(&mut self, ui: &mut egui::Ui, actions: &mut Vec<Action>) {
        egui::Grid::new(("online sessions", self.course.id))
            .striped(true)
            .show(ui, |ui| {
                ui.strong("Date");
                ui.strong("Time");
                ui.strong("Minutes");
                ui.strong("Link");
                ui.end_row();

                for session in &self.online_sessions {
                    if let Some(SessionBeingEdited::Online(e)) = &mut self.session_being_edited {
                        if e.id == session.id {
                            ui.label(e.date.format("%a %d/%m/%Y").to_string());
                            ui.label(format_time(e.time));
                            ui.add(egui::DragValue::new(&mut e.duration_minutes).range(1..=600));
                            ui.text_edit_singleline(&mut e.link);
                            if ui.button("Save").clicked() {
                                actions.push(Action::SaveOnline(e.clone()));
                            }
                            ui.end_row();
                            continue;
                        }
                    }

                    ui.label(session.date.format("%a %d/%m/%Y").to_string());
                    ui.label(format_time(session.time));
                    ui.label(session.duration_minutes.to_string());
                    if ui.link(&session.link).clicked() {
                        actions.push(Action::OpenLink(session.link.clone()));
                    }
                    if self.edit_mode {
                        if ui.button("Edit").clicked() {
                            self.session_being_edited =
                                Some(SessionBeingEdited::Online(session.clone()));
                        }
                        if ui.button("Delete").clicked() {
                            actions.push(Action::DeleteOnline(session.id));
                        }
                    }
                    ui.end_row();
                }
            });
    }

    fn update_recipe(
        ui: &mut egui::Ui,
        entry: &RecipeEntry,
        edit_mode: bool,
        recipe_being_edited: &mut Option<RecipeBeingEdited>,
        quantity_being_edited: &mut Option<QuantityBeingEdited>,
        actions: &mut Vec<Action>,
    ) {
        let recipe = &entry.recipe;
        ui.horizontal(|ui| match recipe_being_edited {
            Some(e) if e.id == recipe.id => {
                ui.text_edit_singleline(&mut e.name);
                if ui.button("Save").clicked() {
                    actions.push(Action::RenameRecipe(e.id, e.name.clone()));
                }
            }
            _ => {
                ui.strong(&recipe.name);
                if edit_mode {
                    if ui.button("Rename").clicked() {
                        *recipe_being_edited = Some(RecipeBeingEdited {
                            id: recipe.id,
                            name: recipe.name.clone(),
                        });
                    }
                    if ui.button("Delete").clicked() {
                        actions.push(Action::DeleteRecipe(recipe.id));
                    }
                }
            }
        });

        egui::Grid::new(("recipe ingredients", recipe.id)).show(ui, |ui| {
            for used in &entry.ingredients {
                let ingredient = &used.ingredient;
                ui.label(&ingredient.name);
                ui.label(ingredient.category.as_deref().unwrap_or(""));
                match quantity_being_edited {
                    Some(e) if e.recipe == recipe.id && e.ingredient == ingredient.id => {
                        ui.add(egui::TextEdit::singleline(&mut e.quantity).desired_width(60.0));
                        ui.label(&ingredient.unit);
                        if ui.button("Save").clicked() {
                            actions.push(Action::SaveQuantity(
                                recipe.id,
                                ingredient.id,
                                e.quantity.clone(),
                            ));
                        }
                    }
                    _ => {
                        ui.label(used.quantity.to_string());
                        ui.label(&ingredient.unit);
                        if edit_mode {
                            if ui.button("Edit").clicked() {
                                *quantity_being_edited = Some(QuantityBeingEdited {
                                    recipe: recipe.id,
                                    ingredient: ingredient.id,
                                    quantity: used.quantity.to_string(),
                                });
                            }
                            if ui.button("Remove").clicked() {
                                actions.push(Action::RemoveIngredient(recipe.id, ingredient.id));
                            }
                        }
                    }
                }
                ui.end_row();
            }
        });
    }

    fn update_practical_sessions(&mut self, ui: &mut egui::Ui, actions: &mut Vec<Action>) {
        for entry in &self.practical_sessions {
            let session = &entry.session;
            let title = format!(
                "{} {} at {} ({} min, {} recipes)",
                session.date.format("%a %d/%m/%Y"),
                format_time(session.time),
                session.location,
                session.duration_minutes,
                entry.recipes.len()
            );
            egui::CollapsingHeader::new(title)
                .id_salt(("practical session", session.id))
                .show(ui, |ui| {
                    match &mut self.session_being_edited {
                        Some(SessionBeingEdited::Practical(e)) if e.id == session.id => {
                            ui.horizontal(|ui| {
                                ui.label("Location");
                                ui.text_edit_singleline(&mut e.location);
                                ui.label("Minutes");
                                ui.add(
                                    egui::DragValue::new(&mut e.duration_minutes).range(1..=600),
                                );
                                if ui.button("Save").clicked() {
                                    actions.push(Action::SavePractical(e.clone()));
                                }
                            });
                        }
                        _ => {
                            if self.edit_mode {
                                ui.horizontal(|ui| {
                                    if ui.button("Edit session").clicked() {
                                        self.session_being_edited =
                                            Some(SessionBeingEdited::Practical(session.clone()));
                                    }
                                    if ui.button("Delete session").clicked() {
                                        actions.push(Action::DeletePractical(session.id));
                                    }
                                });
                            }
                        }
                    }

                    if entry.recipes.is_empty() {
                        ui.label("No recipes");
                    }
                    for recipe in &entry.recipes {
                        Self::update_recipe(
                            ui,
                            recipe,
                            self.edit_mode,
                            &mut self.recipe_being_edited,
                            &mut self.quantity_being_edited,
                            actions,
                        );
                        ui.separator();
                    }
                });
        }
    }

    fn apply(
        &mut self,
        conn: &mut database::Connection,
        toasts: &mut egui_toast::Toasts,
        action: Action,
    ) -> QueryResult<UpdateEvent> {
        match action {
            Action::OpenLink(link) => {
                if let Err(error) = open::that(&link) {
                    show_error(toasts, "Couldn't open link", error);
                }
                return Ok(UpdateEvent::None);
            }
            Action::SaveOnline(session) => {
                if session.link.trim().is_empty() {
                    toasts.add(new_error_toast("An online session needs a link"));
                    return Ok(UpdateEvent::None);
                }
                query::update_online_session(conn, &session)?;
                self.session_being_edited = None;
            }
            Action::SavePractical(session) => {
                if session.location.trim().is_empty() {
                    toasts.add(new_error_toast("A practical session needs a location"));
                    return Ok(UpdateEvent::None);
                }
                query::update_practical_session(conn, &session)?;
                self.session_being_edited = None;
            }
            Action::DeleteOnline(id) => {
                query::delete_online_session(conn, id)?;
            }
            Action::DeletePractical(id) => {
                query::delete_practical_session(conn, id)?;
            }
            Action::RenameRecipe(id, name) => {
                if name.trim().is_empty() {
                    toasts.add(new_error_toast("A recipe needs a name"));
                    return Ok(UpdateEvent::None);
                }
                query::rename_recipe(conn, id, name.trim())?;
                self.recipe_being_edited = None;
            }
            Action::DeleteRecipe(id) => {
                query::delete_recipe(conn, id)?;
            }
            Action::SaveQuantity(recipe, ingredient, quantity) => {
                match quantity.trim().parse::<f32>() {
                    Ok(quantity) if quantity.is_finite() && quantity > 0.0 => {
                        query::update_recipe_ingredient_quantity(
                            conn, recipe, ingredient, quantity,
                        )?;
                        self.quantity_being_edited = None;
                    }
                    _ => {
                        toasts.add(new_error_toast(
                            "Quantities must be numbers greater than zero",
                        ));
                        return Ok(UpdateEvent::None);
                    }
                }
            }
            Action::RemoveIngredient(recipe, ingredient) => {
                query::delete_recipe_ingredient(conn, recipe, ingredient)?;
            }
            Action::SaveCourse(course) => {
                if course.title.trim().is_empty() {
                    toasts.add(new_error_toast("A course needs a title"));
                    return Ok(UpdateEvent::None);
                }
                query::update_course(
                    conn,
                    &Course {
                        title: course.title.trim().into(),
                        ..course
                    },
                )?;
                self.course_being_edited = None;
            }
            Action::DeleteCourse => {
                query::delete_course(conn, self.course.id)?;
                log::info!("deleted course {}", self.course.id);
                toasts.add(new_info_toast(format!("Deleted {}", self.course.title)));
                return Ok(UpdateEvent::Deleted);
            }
        }
        self.reload(conn)?;
        Ok(UpdateEvent::Changed)
    }

    pub fn update(
        &mut self,
        ctx: &egui::Context,
        conn: &mut database::Connection,
        toasts: &mut egui_toast::Toasts,
    ) -> UpdateEvent {
        let mut open = true;
        let mut actions = vec![];
        egui::Window::new(&self.course.title)
            .id(egui::Id::new(("course window", self.course.id)))
            .open(&mut open)
            .default_width(520.0)
            .show(ctx, |ui| {
                if let Some(e) = &mut self.course_being_edited {
                    ui.horizontal(|ui| {
                        ui.text_edit_singleline(&mut e.title);
                        egui::ComboBox::from_id_salt(("course category", e.id))
                            .selected_text(e.category.to_string())
                            .show_ui(ui, |ui| {
                                for c in CourseCategory::iter() {
                                    ui.selectable_value(&mut e.category, c, c.to_string());
                                }
                            });
                        if ui.button("Save").clicked() {
                            actions.push(Action::SaveCourse(e.clone()));
                        }
                    });
                } else if self.edit_mode && ui.button("Edit title and category").clicked() {
                    self.course_being_edited = Some(self.course.clone());
                }
                ui.horizontal(|ui| {
                    ui.label(self.course.category.to_string());
                    ui.separator();
                    ui.label(format!(
                        "From {}, every {} days",
                        self.course.start_date.format("%d/%m/%Y"),
                        self.course.frequency_days
                    ));
                    ui.separator();
                    ui.label(format!("{} enrolled", self.students.len()));
                });
                ui.separator();

                egui::ScrollArea::vertical()
                    .max_height(ui.available_height() - 35.0)
                    .show(ui, |ui| {
                        ui.heading("Online sessions");
                        if self.online_sessions.is_empty() {
                            ui.label("None");
                        } else {
                            self.update_online_sessions(ui, &mut actions);
                        }

                        ui.heading("Practical sessions");
                        if self.practical_sessions.is_empty() {
                            ui.label("None");
                        } else {
                            self.update_practical_sessions(ui, &mut actions);
                        }

                        egui::CollapsingHeader::new(format!("Students ({})", self.students.len()))
                            .id_salt(("students", self.course.id))
                            .show(ui, |ui| {
                                for student in &self.students {
                                    ui.label(format!(
                                        "{} ({}, {})",
                                        student.name, student.student_number, student.email
                                    ));
                                }
                            });

                        egui::CollapsingHeader::new(format!(
                            "Notifications ({})",
                            self.notifications.len()
                        ))
                        .id_salt(("course notifications", self.course.id))
                        .show(ui, |ui| {
                            for notification in &self.notifications {
                                ui.label(format!(
                                    "{} [{}] {}: {}",
                                    notification.created_at.format("%d/%m/%Y %H:%M"),
                                    notification.change_kind,
                                    notification.title,
                                    notification.message
                                ));
                            }
                        });
                    });

                ui.separator();
                ui.horizontal(|ui| {
                    ui.toggle_value(&mut self.edit_mode, "Edit");
                    if self.edit_mode {
                        if self.confirm_delete {
                            ui.label("Delete this course and all its sessions?");
                            if ui.button("Yes").clicked() {
                                actions.push(Action::DeleteCourse);
                            }
                            if ui.button("No").clicked() {
                                self.confirm_delete = false;
                            }
                        } else if ui.button("Delete Course").clicked() {
                            self.confirm_delete = true;
                        }
                    }
                });
            });

        if !open {
            return UpdateEvent::Closed;
        }

        let mut event = UpdateEvent::None;
        for action in actions {
            match self.apply(conn, toasts, action) {
                Ok(UpdateEvent::None) => {}
                Ok(e) => event = e,
                Err(error) => show_error(toasts, "Couldn't save the change", error),
            }
            if matches!(event, UpdateEvent::Deleted) {
                break;
            }
        }
        event
    }
}
