// Copyright 2023 Remi Bernotavicius

use crate::database;
use crate::database::models::Ingredient;
use crate::database::query;
use eframe::egui;
use std::hash::Hash;

struct CachedQuery {
    query: String,
    results: Vec<Ingredient>,
}

/// Text field that looks ingredients up by name while typing and offers the matches in a popup
/// below it. An exact (case-insensitive) name match selects the ingredient without clicking.
#[derive(Default)]
pub struct IngredientSearch {
    text: String,
    selected: Option<Ingredient>,
    cached: Option<CachedQuery>,
}

impl IngredientSearch {
    pub fn selected(&self) -> Option<&Ingredient> {
        self.selected.as_ref()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.selected = None;
    }

    fn search(&mut self, conn: &mut database::Connection) -> Vec<Ingredient> {
        if let Some(cached) = &self.cached {
            if cached.query == self.text {
                return cached.results.clone();
            }
        }

        let results = query::search_ingredients(conn, self.text.trim()).unwrap_or_else(|error| {
            log::error!("ingredient search for {:?} failed: {error}", self.text);
            vec![]
        });
        self.cached = Some(CachedQuery {
            query: self.text.clone(),
            results: results.clone(),
        });
        results
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        conn: &mut database::Connection,
        id_salt: impl Hash,
    ) -> egui::Response {
        let pop_up_id = ui.make_persistent_id(id_salt);

        let mut r = egui::TextEdit::singleline(&mut self.text)
            .hint_text("search for ingredient")
            .desired_width(180.0)
            .show(ui)
            .response;
        if r.gained_focus() {
            ui.memory_mut(|m| m.open_popup(pop_up_id));
        }
        if r.changed() {
            self.selected = None;
        }

        let results = self.search(conn);
        if self.selected.is_none() {
            let typed = self.text.trim();
            self.selected = results
                .iter()
                .find(|i| i.name.eq_ignore_ascii_case(typed))
                .cloned();
        }

        let mut picked = None;
        egui::popup_below_widget(
            ui,
            pop_up_id,
            &r,
            egui::PopupCloseBehavior::CloseOnClick,
            |ui| {
                egui::ScrollArea::vertical()
                    .max_height(240.0)
                    .show(ui, |ui| {
                        if results.is_empty() {
                            ui.label("No matching ingredients");
                        }
                        for ingredient in &results {
                            let text = match &ingredient.category {
                                Some(category) => {
                                    format!("{} ({category}, {})", ingredient.name, ingredient.unit)
                                }
                                None => format!("{} ({})", ingredient.name, ingredient.unit),
                            };
                            if ui.selectable_label(false, text).clicked() {
                                picked = Some(ingredient.clone());
                                ui.memory_mut(|m| m.close_popup());
                            }
                        }
                    });
            },
        );

        if let Some(ingredient) = picked {
            self.text = ingredient.name.clone();
            self.selected = Some(ingredient);
            r.mark_changed();
        }
        r
    }
}
