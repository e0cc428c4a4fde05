// Copyright 2023 Remi Bernotavicius

use derive_more::Display;
use diesel::associations::{Associations, Identifiable};
use diesel::deserialize::Queryable;
use diesel::expression::Selectable;
use diesel::prelude::Insertable;
use diesel_derive_enum::DbEnum;
use diesel_derive_newtype::DieselNewType;
use strum::EnumIter;

use crate::database::schema::{
    chefs, courses, enrollments, ingredients, notifications, online_sessions, practical_sessions,
    recipe_ingredients, recipes, students,
};

#[derive(DieselNewType, Debug, Display, Hash, PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
pub struct ChefId(pub(crate) i32);

#[derive(Queryable, Selectable, Identifiable, Clone, Debug, PartialEq)]
#[diesel(table_name = chefs)]
pub struct Chef {
    pub id: ChefId,
    pub name: String,
    pub email: String,
    pub password: String,
    pub years_of_experience: i32,
    pub specialization_count: i32,
}

#[derive(Insertable)]
#[diesel(table_name = chefs)]
pub struct NewChef<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub years_of_experience: i32,
    pub specialization_count: i32,
}

#[derive(Debug, Display, EnumIter, Hash, Copy, Clone, PartialEq, Eq, DbEnum)]
pub enum CourseCategory {
    #[display("Tradition")]
    Tradition,
    #[display("Innovation")]
    Innovation,
    #[display("Pastry")]
    Pastry,
    #[display("Asian Cuisine")]
    AsianCuisine,
    #[display("First Courses")]
    FirstCourses,
    #[display("Main Courses")]
    MainCourses,
    #[display("Seafood")]
    Seafood,
    #[display("Meat")]
    Meat,
    #[display("Vegetarian")]
    Vegetarian,
    #[display("Bakery")]
    Bakery,
}

impl CourseCategory {
    pub fn iter() -> impl Iterator<Item = Self> {
        <Self as strum::IntoEnumIterator>::iter()
    }
}

#[derive(DieselNewType, Debug, Display, Hash, PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
pub struct CourseId(pub(crate) i32);

#[derive(Associations, Queryable, Selectable, Identifiable, Clone, Debug, PartialEq)]
#[diesel(belongs_to(Chef))]
#[diesel(table_name = courses)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub category: CourseCategory,
    pub start_date: chrono::NaiveDate,
    pub frequency_days: i32,
    pub session_count: i32,
    pub chef_id: ChefId,
}

#[derive(Insertable)]
#[diesel(table_name = courses)]
pub struct NewCourse<'a> {
    pub title: &'a str,
    pub category: CourseCategory,
    pub start_date: chrono::NaiveDate,
    pub frequency_days: i32,
    pub session_count: i32,
    pub chef_id: ChefId,
}

#[derive(DieselNewType, Debug, Display, Hash, PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
pub struct OnlineSessionId(pub(crate) i32);

#[derive(Associations, Queryable, Selectable, Identifiable, Clone, Debug, PartialEq)]
#[diesel(belongs_to(Course))]
#[diesel(table_name = online_sessions)]
pub struct OnlineSession {
    pub id: OnlineSessionId,
    pub course_id: CourseId,
    pub date: chrono::NaiveDate,
    pub time: Option<chrono::NaiveTime>,
    pub duration_minutes: i32,
    pub link: String,
}

#[derive(Insertable)]
#[diesel(table_name = online_sessions)]
pub struct NewOnlineSession<'a> {
    pub course_id: CourseId,
    pub date: chrono::NaiveDate,
    pub time: Option<chrono::NaiveTime>,
    pub duration_minutes: i32,
    pub link: &'a str,
}

#[derive(DieselNewType, Debug, Display, Hash, PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
pub struct PracticalSessionId(pub(crate) i32);

#[derive(Associations, Queryable, Selectable, Identifiable, Clone, Debug, PartialEq)]
#[diesel(belongs_to(Course))]
#[diesel(table_name = practical_sessions)]
pub struct PracticalSession {
    pub id: PracticalSessionId,
    pub course_id: CourseId,
    pub date: chrono::NaiveDate,
    pub time: Option<chrono::NaiveTime>,
    pub duration_minutes: i32,
    pub location: String,
}

#[derive(Insertable)]
#[diesel(table_name = practical_sessions)]
pub struct NewPracticalSession<'a> {
    pub course_id: CourseId,
    pub date: chrono::NaiveDate,
    pub time: Option<chrono::NaiveTime>,
    pub duration_minutes: i32,
    pub location: &'a str,
}

#[derive(DieselNewType, Debug, Display, Hash, PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
pub struct RecipeId(pub(crate) i32);

#[derive(Associations, Queryable, Selectable, Identifiable, Clone, Debug, PartialEq)]
#[diesel(belongs_to(PracticalSession))]
#[diesel(table_name = recipes)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    pub practical_session_id: PracticalSessionId,
}

#[derive(DieselNewType, Debug, Display, Hash, PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
pub struct IngredientId(pub(crate) i32);

#[derive(Queryable, Selectable, Identifiable, Clone, Debug, PartialEq)]
#[diesel(table_name = ingredients)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub category: Option<String>,
    pub unit: String,
}

#[derive(Insertable)]
#[diesel(table_name = ingredients)]
pub struct NewIngredient<'a> {
    pub name: &'a str,
    pub category: Option<&'a str>,
    pub unit: &'a str,
}

/// Quantity of one ingredient used by one recipe, keyed by the pair.
#[derive(Associations, Queryable, Selectable, Identifiable, Insertable, Clone, Debug, PartialEq)]
#[diesel(belongs_to(Recipe))]
#[diesel(belongs_to(Ingredient))]
#[diesel(primary_key(recipe_id, ingredient_id))]
#[diesel(table_name = recipe_ingredients)]
pub struct RecipeIngredient {
    pub recipe_id: RecipeId,
    pub ingredient_id: IngredientId,
    pub quantity: f32,
}

#[derive(DieselNewType, Debug, Display, Hash, PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
pub struct StudentId(pub(crate) i32);

#[derive(Queryable, Selectable, Identifiable, Clone, Debug, PartialEq)]
#[diesel(table_name = students)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub student_number: String,
    pub email: String,
    pub password: String,
}

#[derive(Insertable)]
#[diesel(table_name = students)]
pub struct NewStudent<'a> {
    pub name: &'a str,
    pub student_number: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Associations, Queryable, Selectable, Identifiable, Clone, Debug, PartialEq)]
#[diesel(belongs_to(Student))]
#[diesel(belongs_to(Course))]
#[diesel(primary_key(student_id, course_id))]
#[diesel(table_name = enrollments)]
pub struct Enrollment {
    pub student_id: StudentId,
    pub course_id: CourseId,
    pub enrolled_at: chrono::NaiveDateTime,
}

#[derive(Debug, Display, EnumIter, Hash, Copy, Clone, PartialEq, Eq, DbEnum)]
pub enum ChangeKind {
    #[display("Date change")]
    DateChange,
    #[display("Time change")]
    TimeChange,
    #[display("Cancellation")]
    Cancellation,
    #[display("Other")]
    Other,
}

impl ChangeKind {
    pub fn iter() -> impl Iterator<Item = Self> {
        <Self as strum::IntoEnumIterator>::iter()
    }
}

#[derive(DieselNewType, Debug, Display, Hash, PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
pub struct NotificationId(pub(crate) i32);

#[derive(Queryable, Selectable, Identifiable, Clone, Debug, PartialEq)]
#[diesel(table_name = notifications)]
pub struct Notification {
    pub id: NotificationId,
    pub chef_id: ChefId,
    pub course_id: Option<CourseId>,
    pub title: String,
    pub message: String,
    pub change_kind: ChangeKind,
    pub is_global: bool,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = notifications)]
pub struct NewNotification<'a> {
    pub chef_id: ChefId,
    pub course_id: Option<CourseId>,
    pub title: &'a str,
    pub message: &'a str,
    pub change_kind: ChangeKind,
    pub is_global: bool,
}
