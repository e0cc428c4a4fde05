// Copyright 2023 Remi Bernotavicius

//! Monthly statistics and the annual per-month breakdown of a chef's sessions.
//!
//! Every figure is computed by its own query. A query that fails is logged and its figure is
//! reported with its default value, so building a report never fails as a whole.

use crate::database;
use crate::database::models::{ChefId, PracticalSessionId};
use chrono::Datelike as _;
use diesel::result::QueryResult;
use diesel::BoolExpressionMethods as _;
use diesel::ExpressionMethods as _;
use diesel::QueryDsl as _;
use diesel::RunQueryDsl as _;
use std::collections::{BTreeMap, HashMap};

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPeriod {
    first_day: chrono::NaiveDate,
    next_first_day: chrono::NaiveDate,
}

impl ReportPeriod {
    /// Returns `None` when `month` is outside `1..=12` or the year can't be represented.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        let first_day = chrono::NaiveDate::from_ymd_opt(year, month, 1)?;
        let next_first_day = first_day.checked_add_months(chrono::Months::new(1))?;
        Some(Self {
            first_day,
            next_first_day,
        })
    }

    pub fn containing(date: chrono::NaiveDate) -> Option<Self> {
        Self::new(date.year(), date.month())
    }

    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    pub fn first_day(&self) -> chrono::NaiveDate {
        self.first_day
    }

    /// First day of the following month, the exclusive end of the period.
    pub fn next_first_day(&self) -> chrono::NaiveDate {
        self.next_first_day
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RecipeStats {
    pub max: i64,
    pub min: i64,
    pub mean: f64,
}

impl RecipeStats {
    /// `counts` has one entry per practical session, zero for sessions without recipes.
    pub fn from_counts(counts: &[i64]) -> Self {
        let (Some(&max), Some(&min)) = (counts.iter().max(), counts.iter().min()) else {
            return Self::default();
        };
        let total: i64 = counts.iter().sum();
        Self {
            max,
            min,
            mean: total as f64 / counts.len() as f64,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyReport {
    pub period: ReportPeriod,
    pub course_count: usize,
    pub online_sessions: usize,
    pub practical_sessions: usize,
    pub recipes: RecipeStats,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionCounts {
    pub online: u32,
    pub practical: u32,
}

fn or_log<T: Default>(what: &str, result: QueryResult<T>) -> T {
    result.unwrap_or_else(|error| {
        log::error!("failed to load {what}: {error}");
        T::default()
    })
}

/// Courses of `chef` with at least one session of either kind dated in `[from, until)`.
fn course_count(
    conn: &mut database::Connection,
    chef: ChefId,
    from: chrono::NaiveDate,
    until: chrono::NaiveDate,
) -> QueryResult<i64> {
    use database::schema::{courses, online_sessions, practical_sessions};

    let online = online_sessions::table
        .filter(online_sessions::date.ge(from))
        .filter(online_sessions::date.lt(until))
        .select(online_sessions::course_id);
    let practical = practical_sessions::table
        .filter(practical_sessions::date.ge(from))
        .filter(practical_sessions::date.lt(until))
        .select(practical_sessions::course_id);

    courses::table
        .filter(courses::chef_id.eq(chef))
        .filter(courses::id.eq_any(online).or(courses::id.eq_any(practical)))
        .count()
        .get_result(conn)
}

fn online_session_count(
    conn: &mut database::Connection,
    chef: ChefId,
    from: chrono::NaiveDate,
    until: chrono::NaiveDate,
) -> QueryResult<i64> {
    use database::schema::{courses, online_sessions};

    online_sessions::table
        .inner_join(courses::table)
        .filter(courses::chef_id.eq(chef))
        .filter(online_sessions::date.ge(from))
        .filter(online_sessions::date.lt(until))
        .count()
        .get_result(conn)
}

fn practical_session_ids(
    conn: &mut database::Connection,
    chef: ChefId,
    from: chrono::NaiveDate,
    until: chrono::NaiveDate,
) -> QueryResult<Vec<PracticalSessionId>> {
    use database::schema::{courses, practical_sessions};

    practical_sessions::table
        .inner_join(courses::table)
        .filter(courses::chef_id.eq(chef))
        .filter(practical_sessions::date.ge(from))
        .filter(practical_sessions::date.lt(until))
        .select(practical_sessions::id)
        .load(conn)
}

/// Number of recipes of each of `sessions`, in the same order. Sessions without recipes get 0.
fn recipe_counts(
    conn: &mut database::Connection,
    sessions: &[PracticalSessionId],
) -> QueryResult<Vec<i64>> {
    use database::schema::recipes;

    let counts: HashMap<PracticalSessionId, i64> = recipes::table
        .filter(recipes::practical_session_id.eq_any(sessions.to_vec()))
        .group_by(recipes::practical_session_id)
        .select((recipes::practical_session_id, diesel::dsl::count(recipes::id)))
        .load::<(PracticalSessionId, i64)>(conn)?
        .into_iter()
        .collect();
    Ok(sessions
        .iter()
        .map(|id| counts.get(id).copied().unwrap_or(0))
        .collect())
}

pub fn monthly_report(
    conn: &mut database::Connection,
    chef: ChefId,
    period: ReportPeriod,
) -> MonthlyReport {
    let (from, until) = (period.first_day(), period.next_first_day());

    let course_count = or_log("course count", course_count(conn, chef, from, until));
    let online_sessions = or_log(
        "online session count",
        online_session_count(conn, chef, from, until),
    );
    let practical = or_log(
        "practical sessions",
        practical_session_ids(conn, chef, from, until),
    );

    let recipes = if practical.is_empty() {
        RecipeStats::default()
    } else {
        RecipeStats::from_counts(&or_log(
            "recipe counts",
            recipe_counts(conn, &practical),
        ))
    };

    log::debug!(
        "chef {chef} {}-{:02}: {course_count} courses, {online_sessions} online, {} practical",
        period.year(),
        period.month(),
        practical.len()
    );
    MonthlyReport {
        period,
        course_count: usize::try_from(course_count).unwrap_or_default(),
        online_sessions: usize::try_from(online_sessions).unwrap_or_default(),
        practical_sessions: practical.len(),
        recipes,
    }
}

/// Month number of a date column, for grouping.
fn month_of(column: &str) -> diesel::expression::SqlLiteral<diesel::sql_types::Integer> {
    diesel::dsl::sql(&format!("CAST(strftime('%m', {column}) AS INTEGER)"))
}

/// Online sessions of `chef` dated in `[from, until)`, counted per month number.
fn online_sessions_by_month(
    conn: &mut database::Connection,
    chef: ChefId,
    from: chrono::NaiveDate,
    until: chrono::NaiveDate,
) -> QueryResult<Vec<(i32, i64)>> {
    use database::schema::{courses, online_sessions};

    online_sessions::table
        .inner_join(courses::table)
        .filter(courses::chef_id.eq(chef))
        .filter(online_sessions::date.ge(from))
        .filter(online_sessions::date.lt(until))
        .group_by(month_of("online_sessions.date"))
        .select((month_of("online_sessions.date"), diesel::dsl::count_star()))
        .load(conn)
}

fn practical_sessions_by_month(
    conn: &mut database::Connection,
    chef: ChefId,
    from: chrono::NaiveDate,
    until: chrono::NaiveDate,
) -> QueryResult<Vec<(i32, i64)>> {
    use database::schema::{courses, practical_sessions};

    practical_sessions::table
        .inner_join(courses::table)
        .filter(courses::chef_id.eq(chef))
        .filter(practical_sessions::date.ge(from))
        .filter(practical_sessions::date.lt(until))
        .group_by(month_of("practical_sessions.date"))
        .select((month_of("practical_sessions.date"), diesel::dsl::count_star()))
        .load(conn)
}

/// Session counts of `chef` for every month of `year`, keyed 1 through 12.
pub fn annual_breakdown(
    conn: &mut database::Connection,
    chef: ChefId,
    year: i32,
) -> BTreeMap<u32, SessionCounts> {
    let mut months: BTreeMap<u32, SessionCounts> =
        (1..=12).map(|m| (m, SessionCounts::default())).collect();

    let (Some(from), Some(until)) = (
        chrono::NaiveDate::from_ymd_opt(year, 1, 1),
        chrono::NaiveDate::from_ymd_opt(year + 1, 1, 1),
    ) else {
        log::error!("year {year} is out of range");
        return months;
    };

    for (month, count) in or_log(
        "online sessions by month",
        online_sessions_by_month(conn, chef, from, until),
    ) {
        if let Some(counts) = u32::try_from(month).ok().and_then(|m| months.get_mut(&m)) {
            counts.online = u32::try_from(count).unwrap_or_default();
        }
    }
    for (month, count) in or_log(
        "practical sessions by month",
        practical_sessions_by_month(conn, chef, from, until),
    ) {
        if let Some(counts) = u32::try_from(month).ok().and_then(|m| months.get_mut(&m)) {
            counts.practical = u32::try_from(count).unwrap_or_default();
        }
    }
    months
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::fixtures;
    use diesel::RunQueryDsl as _;
    use maplit::btreemap;

    fn march() -> ReportPeriod {
        ReportPeriod::new(2025, 3).unwrap()
    }

    /// Two courses in March 2025: one with 3 online sessions, one with 2 practical sessions
    /// holding 1 and 3 recipes. Sessions just outside the month and another chef's sessions
    /// are added around them.
    fn seed_march(conn: &mut database::Connection) -> ChefId {
        let chef = fixtures::chef(conn, "mario@foodlab.it");
        let other = fixtures::chef(conn, "luigi@foodlab.it");

        let theory = fixtures::course(conn, chef, "Theory", fixtures::date(2025, 3, 3));
        for day in [3, 10, 17] {
            fixtures::online_session(conn, theory, fixtures::date(2025, 3, day));
        }
        fixtures::online_session(conn, theory, fixtures::date(2025, 2, 28));

        let lab = fixtures::course(conn, chef, "Lab", fixtures::date(2025, 3, 5));
        let first = fixtures::practical_session(conn, lab, fixtures::date(2025, 3, 5));
        fixtures::recipes(conn, first, 1);
        let second = fixtures::practical_session(conn, lab, fixtures::date(2025, 3, 31));
        fixtures::recipes(conn, second, 3);
        let april = fixtures::practical_session(conn, lab, fixtures::date(2025, 4, 1));
        fixtures::recipes(conn, april, 7);

        let theirs = fixtures::course(conn, other, "Theirs", fixtures::date(2025, 3, 1));
        fixtures::online_session(conn, theirs, fixtures::date(2025, 3, 12));
        let theirs_lab = fixtures::practical_session(conn, theirs, fixtures::date(2025, 3, 12));
        fixtures::recipes(conn, theirs_lab, 9);

        chef
    }

    #[test]
    fn period_bounds() {
        let december = ReportPeriod::new(2024, 12).unwrap();
        assert_eq!(december.first_day(), fixtures::date(2024, 12, 1));
        assert_eq!(december.next_first_day(), fixtures::date(2025, 1, 1));
        assert_eq!(
            ReportPeriod::new(2024, 2).unwrap().next_first_day(),
            fixtures::date(2024, 3, 1)
        );
        assert_eq!(ReportPeriod::new(2025, 0), None);
        assert_eq!(ReportPeriod::new(2025, 13), None);
        assert_eq!(
            ReportPeriod::containing(fixtures::date(2025, 3, 17)),
            Some(march())
        );
    }

    #[test]
    fn stats_from_counts() {
        assert_eq!(RecipeStats::from_counts(&[]), RecipeStats::default());
        assert_eq!(
            RecipeStats::from_counts(&[2, 0, 4]),
            RecipeStats {
                max: 4,
                min: 0,
                mean: 2.0
            }
        );
        assert_eq!(RecipeStats::from_counts(&[5]).mean, 5.0);
    }

    #[test]
    fn month_without_practical_sessions() {
        let db = fixtures::database();
        let mut conn = db.get().unwrap();
        let chef = fixtures::chef(&mut conn, "mario@foodlab.it");
        let course = fixtures::course(&mut conn, chef, "Theory", fixtures::date(2025, 3, 3));
        fixtures::online_session(&mut conn, course, fixtures::date(2025, 3, 3));

        let report = monthly_report(&mut conn, chef, march());
        assert_eq!(report.course_count, 1);
        assert_eq!(report.online_sessions, 1);
        assert_eq!(report.practical_sessions, 0);
        assert_eq!(report.recipes, RecipeStats::default());
        assert_eq!(report.recipes.mean, 0.0);
    }

    #[test]
    fn sessions_without_recipes_count_as_zero() {
        let db = fixtures::database();
        let mut conn = db.get().unwrap();
        let chef = fixtures::chef(&mut conn, "mario@foodlab.it");
        let course = fixtures::course(&mut conn, chef, "Lab", fixtures::date(2025, 3, 3));
        for (day, count) in [(3, 2), (10, 0), (17, 4)] {
            let session =
                fixtures::practical_session(&mut conn, course, fixtures::date(2025, 3, day));
            fixtures::recipes(&mut conn, session, count);
        }

        let report = monthly_report(&mut conn, chef, march());
        assert_eq!(report.practical_sessions, 3);
        assert_eq!(
            report.recipes,
            RecipeStats {
                max: 4,
                min: 0,
                mean: 2.0
            }
        );
    }

    #[test]
    fn march_report() {
        let db = fixtures::database();
        let mut conn = db.get().unwrap();
        let chef = seed_march(&mut conn);

        let report = monthly_report(&mut conn, chef, march());
        assert_eq!(
            report,
            MonthlyReport {
                period: march(),
                course_count: 2,
                online_sessions: 3,
                practical_sessions: 2,
                recipes: RecipeStats {
                    max: 3,
                    min: 1,
                    mean: 2.0
                },
            }
        );
    }

    #[test]
    fn course_with_both_kinds_counts_once() {
        let db = fixtures::database();
        let mut conn = db.get().unwrap();
        let chef = fixtures::chef(&mut conn, "mario@foodlab.it");
        let course = fixtures::course(&mut conn, chef, "Mixed", fixtures::date(2025, 3, 3));
        fixtures::online_session(&mut conn, course, fixtures::date(2025, 3, 3));
        fixtures::online_session(&mut conn, course, fixtures::date(2025, 3, 10));
        fixtures::practical_session(&mut conn, course, fixtures::date(2025, 3, 17));
        let idle = fixtures::course(&mut conn, chef, "Idle", fixtures::date(2025, 4, 7));
        fixtures::online_session(&mut conn, idle, fixtures::date(2025, 4, 7));

        let report = monthly_report(&mut conn, chef, march());
        assert_eq!(report.course_count, 1);
        assert_eq!(report.online_sessions, 2);
        assert_eq!(report.practical_sessions, 1);
    }

    #[test]
    fn annual_breakdown_by_month() {
        let db = fixtures::database();
        let mut conn = db.get().unwrap();
        let chef = seed_march(&mut conn);
        let course = fixtures::course(&mut conn, chef, "Next year", fixtures::date(2026, 1, 5));
        fixtures::online_session(&mut conn, course, fixtures::date(2026, 1, 5));

        let months = annual_breakdown(&mut conn, chef, 2025);
        let mut expected: BTreeMap<u32, SessionCounts> =
            (1..=12).map(|m| (m, SessionCounts::default())).collect();
        expected.insert(
            2,
            SessionCounts {
                online: 1,
                practical: 0,
            },
        );
        expected.insert(
            3,
            SessionCounts {
                online: 3,
                practical: 2,
            },
        );
        expected.insert(
            4,
            SessionCounts {
                online: 0,
                practical: 1,
            },
        );
        assert_eq!(months, expected);
    }

    #[test]
    fn annual_breakdown_without_data() {
        let db = fixtures::database();
        let mut conn = db.get().unwrap();
        let chef = fixtures::chef(&mut conn, "mario@foodlab.it");

        let zero = SessionCounts::default();
        assert_eq!(
            annual_breakdown(&mut conn, chef, 2025),
            btreemap! {
                1 => zero, 2 => zero, 3 => zero, 4 => zero, 5 => zero, 6 => zero,
                7 => zero, 8 => zero, 9 => zero, 10 => zero, 11 => zero, 12 => zero,
            }
        );
    }

    #[test]
    fn failing_query_falls_back_to_default() {
        let db = fixtures::database();
        let mut conn = db.get().unwrap();
        let chef = seed_march(&mut conn);
        diesel::sql_query("DROP TABLE online_sessions")
            .execute(&mut *conn)
            .unwrap();

        let report = monthly_report(&mut conn, chef, march());
        assert_eq!(report.online_sessions, 0);
        assert_eq!(report.practical_sessions, 2);
        // the course count looks at both session tables
        assert_eq!(report.course_count, 0);
        assert_eq!(report.recipes.max, 3);

        let months = annual_breakdown(&mut conn, chef, 2025);
        assert_eq!(months.len(), 12);
        assert_eq!(
            months[&3],
            SessionCounts {
                online: 0,
                practical: 2
            }
        );
    }

    #[test]
    fn failing_recipe_query_keeps_session_counts() {
        let db = fixtures::database();
        let mut conn = db.get().unwrap();
        let chef = seed_march(&mut conn);
        diesel::sql_query("DROP TABLE recipes")
            .execute(&mut *conn)
            .unwrap();

        let report = monthly_report(&mut conn, chef, march());
        assert_eq!(report.practical_sessions, 2);
        assert_eq!(report.recipes, RecipeStats::default());
    }
}
