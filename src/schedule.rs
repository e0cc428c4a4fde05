// Copyright 2023 Remi Bernotavicius

//! Turning a course's start date, frequency and session count into the dates of its sessions,
//! and the per-session details a chef fills in before anything is saved.

use crate::database::models::{CourseCategory, IngredientId};
use derive_more::Display;

pub const DEFAULT_ONLINE_DURATION_MINUTES: u32 = 120;
pub const DEFAULT_PRACTICAL_DURATION_MINUTES: u32 = 180;

/// Returns `count` dates starting at `start`, each `frequency_days` after the previous one, or
/// `None` if the last of them can't be represented. Weekends and holidays are not skipped.
pub fn session_dates(
    start: chrono::NaiveDate,
    frequency_days: u32,
    count: u32,
) -> Option<Vec<chrono::NaiveDate>> {
    (0..count)
        .map(|i| {
            start.checked_add_days(chrono::Days::new(
                u64::from(frequency_days) * u64::from(i),
            ))
        })
        .collect()
}

#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[display("the course title is required")]
    EmptyTitle,
    #[display("the start date {_0} is in the past")]
    StartDateInPast(chrono::NaiveDate),
    #[display("the frequency must be at least one day")]
    InvalidFrequency,
    #[display("a course needs at least one session")]
    InvalidSessionCount,
    #[display("the sessions would run past the last supported date")]
    ScheduleOutOfRange,
    #[display("no course is being created")]
    NoCourseStaged,
    #[display("expected {expected} sessions but {actual} were configured")]
    SessionCountMismatch { expected: u32, actual: usize },
    #[display("session {session} should be on {expected}, not {actual}")]
    SessionDateMismatch {
        session: usize,
        expected: chrono::NaiveDate,
        actual: chrono::NaiveDate,
    },
    #[display("session {_0} needs a meeting link")]
    MissingLink(usize),
    #[display("session {_0} needs a location")]
    MissingLocation(usize),
    #[display("session {_0} has a zero duration")]
    ZeroDuration(usize),
    #[display("every recipe of session {_0} needs a name")]
    EmptyRecipeName(usize),
    #[display("recipe {recipe:?} of session {session} needs at least one ingredient")]
    RecipeWithoutIngredients { session: usize, recipe: String },
    #[display("quantities in recipe {recipe:?} of session {session} must be greater than zero")]
    NonPositiveQuantity { session: usize, recipe: String },
}

impl std::error::Error for ValidationError {}

/// Course fields collected on the first page of the course wizard.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseDraft {
    pub title: String,
    pub category: CourseCategory,
    pub start_date: chrono::NaiveDate,
    pub frequency_days: u32,
    pub session_count: u32,
}

impl CourseDraft {
    pub fn validate(&self, today: chrono::NaiveDate) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.start_date < today {
            return Err(ValidationError::StartDateInPast(self.start_date));
        }
        if self.frequency_days < 1 {
            return Err(ValidationError::InvalidFrequency);
        }
        if self.session_count < 1 {
            return Err(ValidationError::InvalidSessionCount);
        }
        self.session_dates()?;
        Ok(())
    }

    pub fn session_dates(&self) -> Result<Vec<chrono::NaiveDate>, ValidationError> {
        session_dates(self.start_date, self.frequency_days, self.session_count)
            .ok_or(ValidationError::ScheduleOutOfRange)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IngredientQuantity {
    pub ingredient_id: IngredientId,
    pub quantity: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeDraft {
    pub name: String,
    pub ingredients: Vec<IngredientQuantity>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionKind {
    Online {
        link: String,
    },
    Practical {
        location: String,
        recipes: Vec<RecipeDraft>,
    },
}

impl SessionKind {
    pub fn default_duration(&self) -> u32 {
        match self {
            Self::Online { .. } => DEFAULT_ONLINE_DURATION_MINUTES,
            Self::Practical { .. } => DEFAULT_PRACTICAL_DURATION_MINUTES,
        }
    }
}

/// One generated date together with what the chef decided to do on it.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPlan {
    pub date: chrono::NaiveDate,
    pub time: Option<chrono::NaiveTime>,
    pub duration_minutes: Option<u32>,
    pub kind: SessionKind,
}

impl SessionPlan {
    pub fn duration(&self) -> u32 {
        self.duration_minutes
            .unwrap_or_else(|| self.kind.default_duration())
    }

    /// `number` is the 1-based position of the session in its course, used in messages.
    pub fn validate(&self, number: usize) -> Result<(), ValidationError> {
        if self.duration_minutes == Some(0) {
            return Err(ValidationError::ZeroDuration(number));
        }
        match &self.kind {
            SessionKind::Online { link } => {
                if link.trim().is_empty() {
                    return Err(ValidationError::MissingLink(number));
                }
            }
            SessionKind::Practical { location, recipes } => {
                if location.trim().is_empty() {
                    return Err(ValidationError::MissingLocation(number));
                }
                for recipe in recipes {
                    if recipe.name.trim().is_empty() {
                        return Err(ValidationError::EmptyRecipeName(number));
                    }
                    if recipe.ingredients.is_empty() {
                        return Err(ValidationError::RecipeWithoutIngredients {
                            session: number,
                            recipe: recipe.name.clone(),
                        });
                    }
                    if recipe
                        .ingredients
                        .iter()
                        .any(|i| !i.quantity.is_finite() || i.quantity <= 0.0)
                    {
                        return Err(ValidationError::NonPositiveQuantity {
                            session: number,
                            recipe: recipe.name.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, d: u32) -> chrono::NaiveDate {
        chrono::NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn draft() -> CourseDraft {
        CourseDraft {
            title: "Neapolitan pizza".into(),
            category: CourseCategory::Tradition,
            start_date: d(2025, 6, 2),
            frequency_days: 7,
            session_count: 4,
        }
    }

    #[test]
    fn weekly_sessions() {
        assert_eq!(
            session_dates(d(2025, 6, 2), 7, 4),
            Some(vec![d(2025, 6, 2), d(2025, 6, 9), d(2025, 6, 16), d(2025, 6, 23)])
        );
    }

    #[test]
    fn single_session_ignores_frequency() {
        for frequency in [1, 3, 30, 365] {
            assert_eq!(
                session_dates(d(2025, 2, 28), frequency, 1),
                Some(vec![d(2025, 2, 28)])
            );
        }
    }

    #[test]
    fn progression_is_strictly_increasing_with_constant_step() {
        let start = d(2024, 12, 20);
        for frequency in 1..=15u32 {
            for count in 1..=12u32 {
                let dates = session_dates(start, frequency, count).unwrap();
                assert_eq!(dates.len(), count as usize);
                assert_eq!(dates[0], start);
                for pair in dates.windows(2) {
                    assert_eq!((pair[1] - pair[0]).num_days(), i64::from(frequency));
                }
            }
        }
    }

    #[test]
    fn crosses_month_and_leap_day() {
        assert_eq!(
            session_dates(d(2024, 2, 27), 1, 4),
            Some(vec![d(2024, 2, 27), d(2024, 2, 28), d(2024, 2, 29), d(2024, 3, 1)])
        );
    }

    #[test]
    fn dates_past_the_calendar_limit() {
        assert_eq!(session_dates(d(2025, 1, 1), 4_000_000_000, 3), None);
        assert_eq!(session_dates(chrono::NaiveDate::MAX, 1, 2), None);
        assert_eq!(
            session_dates(chrono::NaiveDate::MAX, 1, 1),
            Some(vec![chrono::NaiveDate::MAX])
        );
        // a huge frequency is fine as long as only the start date is needed
        assert_eq!(
            session_dates(d(2025, 1, 1), u32::MAX, 1),
            Some(vec![d(2025, 1, 1)])
        );

        let mut far = draft();
        far.frequency_days = 4_000_000_000;
        assert_eq!(
            far.validate(d(2025, 6, 1)),
            Err(ValidationError::ScheduleOutOfRange)
        );
        assert_eq!(far.session_dates(), Err(ValidationError::ScheduleOutOfRange));
    }

    #[test]
    fn draft_validation() {
        let today = d(2025, 6, 1);
        assert_eq!(draft().validate(today), Ok(()));
        assert_eq!(draft().session_dates().unwrap().len(), 4);

        let mut untitled = draft();
        untitled.title = "   ".into();
        assert_eq!(untitled.validate(today), Err(ValidationError::EmptyTitle));

        assert_eq!(
            draft().validate(d(2025, 6, 3)),
            Err(ValidationError::StartDateInPast(d(2025, 6, 2)))
        );
        // starting today is fine
        assert_eq!(draft().validate(d(2025, 6, 2)), Ok(()));

        let mut no_frequency = draft();
        no_frequency.frequency_days = 0;
        assert_eq!(
            no_frequency.validate(today),
            Err(ValidationError::InvalidFrequency)
        );

        let mut no_sessions = draft();
        no_sessions.session_count = 0;
        assert_eq!(
            no_sessions.validate(today),
            Err(ValidationError::InvalidSessionCount)
        );
    }

    #[test]
    fn default_durations_by_kind() {
        let online = SessionPlan {
            date: d(2025, 6, 2),
            time: None,
            duration_minutes: None,
            kind: SessionKind::Online {
                link: "https://meet.example.com/a".into(),
            },
        };
        assert_eq!(online.duration(), 120);

        let practical = SessionPlan {
            kind: SessionKind::Practical {
                location: "Lab".into(),
                recipes: vec![],
            },
            ..online.clone()
        };
        assert_eq!(practical.duration(), 180);

        let custom = SessionPlan {
            duration_minutes: Some(45),
            ..online
        };
        assert_eq!(custom.duration(), 45);
    }

    #[test]
    fn plan_validation() {
        let base = SessionPlan {
            date: d(2025, 6, 2),
            time: chrono::NaiveTime::from_hms_opt(9, 0, 0),
            duration_minutes: None,
            kind: SessionKind::Online { link: " ".into() },
        };
        assert_eq!(base.validate(3), Err(ValidationError::MissingLink(3)));

        let no_location = SessionPlan {
            kind: SessionKind::Practical {
                location: String::new(),
                recipes: vec![],
            },
            ..base.clone()
        };
        assert_eq!(no_location.validate(1), Err(ValidationError::MissingLocation(1)));

        let recipe = |name: &str, quantities: &[f32]| RecipeDraft {
            name: name.into(),
            ingredients: quantities
                .iter()
                .map(|&quantity| IngredientQuantity {
                    ingredient_id: IngredientId(1),
                    quantity,
                })
                .collect(),
        };
        let with_recipes = |recipes| SessionPlan {
            kind: SessionKind::Practical {
                location: "Lab".into(),
                recipes,
            },
            ..base.clone()
        };

        assert_eq!(with_recipes(vec![recipe("Ragù", &[200.0])]).validate(2), Ok(()));
        assert_eq!(
            with_recipes(vec![recipe("", &[1.0])]).validate(2),
            Err(ValidationError::EmptyRecipeName(2))
        );
        assert_eq!(
            with_recipes(vec![recipe("Ragù", &[])]).validate(2),
            Err(ValidationError::RecipeWithoutIngredients {
                session: 2,
                recipe: "Ragù".into()
            })
        );
        assert_eq!(
            with_recipes(vec![recipe("Ragù", &[1.0, 0.0])]).validate(2),
            Err(ValidationError::NonPositiveQuantity {
                session: 2,
                recipe: "Ragù".into()
            })
        );

        let zero = SessionPlan {
            duration_minutes: Some(0),
            kind: SessionKind::Online {
                link: "https://meet.example.com/a".into(),
            },
            ..base
        };
        assert_eq!(zero.validate(4), Err(ValidationError::ZeroDuration(4)));
    }

    #[test]
    fn validation_messages() {
        assert_eq!(
            ValidationError::MissingLink(2).to_string(),
            "session 2 needs a meeting link"
        );
        assert_eq!(
            ValidationError::SessionCountMismatch {
                expected: 4,
                actual: 3
            }
            .to_string(),
            "expected 4 sessions but 3 were configured"
        );
    }
}
