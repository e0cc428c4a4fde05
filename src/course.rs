// Copyright 2023 Remi Bernotavicius

//! Creating a course together with its sessions, recipes and recipe ingredients.
//!
//! Nothing touches the database until [`CourseCreation::confirm`]. Every row is then inserted on
//! its own: a course whose insert fails aborts the whole thing, anything after that which fails is
//! logged and skipped, and rows already written stay written.

use crate::database;
use crate::database::models::{
    CourseId, NewCourse, NewOnlineSession, NewPracticalSession, RecipeIngredient,
};
use crate::database::query;
use crate::schedule::{CourseDraft, SessionKind, SessionPlan, ValidationError};
use crate::session::AppSession;

/// What ended up in the database after a confirmed creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseCreated {
    pub course_id: CourseId,
    pub sessions: usize,
    pub recipes: usize,
    pub ingredient_links: usize,
    pub skipped: usize,
}

impl CourseCreated {
    pub fn is_complete(&self) -> bool {
        self.skipped == 0
    }
}

#[derive(Default)]
pub struct CourseCreation {
    draft: Option<CourseDraft>,
}

impl CourseCreation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and stages the course fields, returning the dates its sessions fall on.
    pub fn start(
        &mut self,
        draft: CourseDraft,
        today: chrono::NaiveDate,
    ) -> Result<Vec<chrono::NaiveDate>, ValidationError> {
        draft.validate(today)?;
        let dates = draft.session_dates()?;
        log::debug!("staged course {:?} with {} sessions", draft.title, dates.len());
        self.draft = Some(draft);
        Ok(dates)
    }

    pub fn draft(&self) -> Option<&CourseDraft> {
        self.draft.as_ref()
    }

    pub fn cancel(&mut self) {
        if let Some(draft) = self.draft.take() {
            log::debug!("discarded course {:?}", draft.title);
        }
    }

    /// Writes the staged course and `plans` for the logged in chef. `plans` must follow the dates
    /// returned by [`CourseCreation::start`] in order. The staged draft is kept if validation
    /// fails so the caller can correct the plans and try again.
    pub fn confirm(
        &mut self,
        conn: &mut database::Connection,
        session: &AppSession,
        plans: &[SessionPlan],
    ) -> crate::Result<CourseCreated> {
        let draft = self.draft.as_ref().ok_or(ValidationError::NoCourseStaged)?;

        if plans.len() != draft.session_count as usize {
            return Err(ValidationError::SessionCountMismatch {
                expected: draft.session_count,
                actual: plans.len(),
            }
            .into());
        }
        for (i, (plan, expected)) in plans.iter().zip(draft.session_dates()?).enumerate() {
            if plan.date != expected {
                return Err(ValidationError::SessionDateMismatch {
                    session: i + 1,
                    expected,
                    actual: plan.date,
                }
                .into());
            }
            plan.validate(i + 1)?;
        }
        let durations = plans
            .iter()
            .map(|plan| i32::try_from(plan.duration()))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let course_id = query::add_course(
            conn,
            &NewCourse {
                title: draft.title.trim(),
                category: draft.category,
                start_date: draft.start_date,
                frequency_days: i32::try_from(draft.frequency_days)?,
                session_count: i32::try_from(draft.session_count)?,
                chef_id: session.chef_id(),
            },
        )?;
        log::info!("created course {course_id} {:?}", draft.title);

        let mut created = CourseCreated {
            course_id,
            sessions: 0,
            recipes: 0,
            ingredient_links: 0,
            skipped: 0,
        };
        for (plan, duration_minutes) in plans.iter().zip(durations) {
            persist_session(conn, course_id, plan, duration_minutes, &mut created);
        }
        if !created.is_complete() {
            log::warn!(
                "course {course_id} was saved with {} failed writes",
                created.skipped
            );
        }

        self.draft = None;
        Ok(created)
    }
}

fn persist_session(
    conn: &mut database::Connection,
    course_id: CourseId,
    plan: &SessionPlan,
    duration_minutes: i32,
    created: &mut CourseCreated,
) {
    match &plan.kind {
        SessionKind::Online { link } => {
            let new_session = NewOnlineSession {
                course_id,
                date: plan.date,
                time: plan.time,
                duration_minutes,
                link: link.trim(),
            };
            match query::add_online_session(conn, &new_session) {
                Ok(_) => created.sessions += 1,
                Err(error) => {
                    log::error!("failed to save online session on {}: {error}", plan.date);
                    created.skipped += 1;
                }
            }
        }
        SessionKind::Practical { location, recipes } => {
            let new_session = NewPracticalSession {
                course_id,
                date: plan.date,
                time: plan.time,
                duration_minutes,
                location: location.trim(),
            };
            let session_id = match query::add_practical_session(conn, &new_session) {
                Ok(id) => id,
                Err(error) => {
                    log::error!(
                        "failed to save practical session on {}: {error}, its {} recipes are lost",
                        plan.date,
                        recipes.len()
                    );
                    created.skipped += 1;
                    return;
                }
            };
            created.sessions += 1;

            for recipe in recipes {
                let recipe_id = match query::add_recipe(conn, recipe.name.trim(), session_id) {
                    Ok(id) => id,
                    Err(error) => {
                        log::error!("failed to save recipe {:?}: {error}", recipe.name);
                        created.skipped += 1;
                        continue;
                    }
                };
                created.recipes += 1;

                for used in &recipe.ingredients {
                    let link = RecipeIngredient {
                        recipe_id,
                        ingredient_id: used.ingredient_id,
                        quantity: used.quantity,
                    };
                    match query::add_recipe_ingredient(conn, &link) {
                        Ok(()) => created.ingredient_links += 1,
                        Err(error) => {
                            log::error!(
                                "failed to add ingredient {} to recipe {:?}: {error}",
                                used.ingredient_id,
                                recipe.name
                            );
                            created.skipped += 1;
                        }
                    }
                }
            }
        }
    }
}
