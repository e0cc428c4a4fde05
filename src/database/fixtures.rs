// Copyright 2023 Remi Bernotavicius

//! Rows shared by the database-backed tests.

use super::models::{
    ChefId, CourseCategory, CourseId, IngredientId, NewChef, NewCourse, NewIngredient,
    NewOnlineSession, NewPracticalSession, OnlineSessionId, PracticalSessionId,
};
use super::{query, Connection, Database};

pub fn database() -> Database {
    Database::in_memory().unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn chef(conn: &mut Connection, email: &str) -> ChefId {
    query::add_chef(
        conn,
        &NewChef {
            name: &format!("Chef {email}"),
            email,
            password: "secret",
            years_of_experience: 10,
            specialization_count: 2,
        },
    )
    .unwrap()
}

pub fn course(
    conn: &mut Connection,
    chef_id: ChefId,
    title: &str,
    start_date: chrono::NaiveDate,
) -> CourseId {
    query::add_course(
        conn,
        &NewCourse {
            title,
            category: CourseCategory::Tradition,
            start_date,
            frequency_days: 7,
            session_count: 4,
            chef_id,
        },
    )
    .unwrap()
}

pub fn online_session(
    conn: &mut Connection,
    course_id: CourseId,
    date: chrono::NaiveDate,
) -> OnlineSessionId {
    query::add_online_session(
        conn,
        &NewOnlineSession {
            course_id,
            date,
            time: chrono::NaiveTime::from_hms_opt(18, 0, 0),
            duration_minutes: 120,
            link: "https://meet.example.com/foodlab",
        },
    )
    .unwrap()
}

pub fn practical_session(
    conn: &mut Connection,
    course_id: CourseId,
    date: chrono::NaiveDate,
) -> PracticalSessionId {
    query::add_practical_session(
        conn,
        &NewPracticalSession {
            course_id,
            date,
            time: chrono::NaiveTime::from_hms_opt(9, 30, 0),
            duration_minutes: 180,
            location: "Kitchen lab 1",
        },
    )
    .unwrap()
}

/// Adds `count` recipes to a practical session.
pub fn recipes(conn: &mut Connection, session: PracticalSessionId, count: usize) {
    for i in 0..count {
        query::add_recipe(conn, &format!("Recipe {i}"), session).unwrap();
    }
}

pub fn ingredient(conn: &mut Connection, name: &str) -> IngredientId {
    query::add_ingredient(
        conn,
        &NewIngredient {
            name,
            category: Some("Pantry"),
            unit: "g",
        },
    )
    .unwrap()
}
