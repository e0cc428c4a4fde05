// Copyright 2023 Remi Bernotavicius

use super::new_error_toast;
use super::search::IngredientSearch;
use crate::database;
use crate::database::models::Ingredient;
use crate::schedule::{IngredientQuantity, RecipeDraft};
use eframe::egui;

struct IngredientLine {
    ingredient: Ingredient,
    quantity: String,
}

/// One recipe of a practical session that hasn't been saved yet.
pub struct RecipeEditor {
    id: u64,
    name: String,
    ingredients: Vec<IngredientLine>,

    search: IngredientSearch,
    new_quantity: String,
}

impl RecipeEditor {
    /// `id` only has to be unique among the open editors.
    pub fn new(id: u64) -> Self {
        Self {
            id,
            name: String::new(),
            ingredients: vec![],
            search: IngredientSearch::default(),
            new_quantity: String::new(),
        }
    }

    /// Unparseable quantities become 0 so they fail validation with a useful message.
    pub fn to_draft(&self) -> RecipeDraft {
        RecipeDraft {
            name: self.name.trim().into(),
            ingredients: self
                .ingredients
                .iter()
                .map(|line| IngredientQuantity {
                    ingredient_id: line.ingredient.id,
                    quantity: line.quantity.trim().parse().unwrap_or(0.0),
                })
                .collect(),
        }
    }

    fn add_ingredient(&mut self, toasts: &mut egui_toast::Toasts) {
        let Some(ingredient) = self.search.selected().cloned() else {
            toasts.add(new_error_toast("Couldn't find ingredient"));
            return;
        };
        if self
            .ingredients
            .iter()
            .any(|line| line.ingredient.id == ingredient.id)
        {
            toasts.add(new_error_toast(format!(
                "{} is already in this recipe",
                ingredient.name
            )));
            return;
        }
        self.ingredients.push(IngredientLine {
            ingredient,
            quantity: std::mem::take(&mut self.new_quantity),
        });
        self.search.clear();
    }

    /// Returns `true` if the recipe should be removed.
    pub fn update(
        &mut self,
        ui: &mut egui::Ui,
        conn: &mut database::Connection,
        toasts: &mut egui_toast::Toasts,
    ) -> bool {
        let mut remove = false;
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label("Recipe");
                ui.add(
                    egui::TextEdit::singleline(&mut self.name)
                        .hint_text("name")
                        .desired_width(200.0),
                );
                remove = ui.button("Remove recipe").clicked();
            });

            egui::Grid::new(("recipe editor ingredients", self.id)).show(ui, |ui| {
                for mut line in std::mem::take(&mut self.ingredients) {
                    ui.label(&line.ingredient.name);
                    ui.add(egui::TextEdit::singleline(&mut line.quantity).desired_width(60.0));
                    ui.label(&line.ingredient.unit);
                    if !ui.button("Remove").clicked() {
                        self.ingredients.push(line);
                    }
                    ui.end_row();
                }
            });

            ui.horizontal(|ui| {
                self.search
                    .show(ui, conn, ("recipe editor search", self.id));
                ui.add(
                    egui::TextEdit::singleline(&mut self.new_quantity)
                        .hint_text("quantity")
                        .desired_width(60.0),
                );
                if let Some(ingredient) = self.search.selected() {
                    ui.label(&ingredient.unit);
                }
                if ui.button("Add").clicked() {
                    self.add_ingredient(toasts);
                }
            });
        });
        remove
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::IngredientId;

    fn ingredient(id: i32, name: &str) -> Ingredient {
        Ingredient {
            id: IngredientId(id),
            name: name.into(),
            category: None,
            unit: "g".into(),
        }
    }

    #[test]
    fn draft_from_editor() {
        let mut editor = RecipeEditor::new(1);
        editor.name = "  Tiramisù ".into();
        editor.ingredients = vec![
            IngredientLine {
                ingredient: ingredient(1, "Mascarpone"),
                quantity: " 250 ".into(),
            },
            IngredientLine {
                ingredient: ingredient(2, "Savoiardi"),
                quantity: "a few".into(),
            },
        ];

        let draft = editor.to_draft();
        assert_eq!(draft.name, "Tiramisù");
        assert_eq!(
            draft.ingredients,
            vec![
                IngredientQuantity {
                    ingredient_id: IngredientId(1),
                    quantity: 250.0
                },
                IngredientQuantity {
                    ingredient_id: IngredientId(2),
                    quantity: 0.0
                },
            ]
        );
    }
}
