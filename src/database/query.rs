// Copyright 2023 Remi Bernotavicius

use crate::database;
use crate::database::models::{
    Chef, ChefId, Course, CourseCategory, CourseId, Enrollment, Ingredient, IngredientId,
    NewChef, NewCourse, NewIngredient, NewNotification, NewOnlineSession, NewPracticalSession,
    NewStudent, Notification, NotificationId, OnlineSession, OnlineSessionId, PracticalSession,
    PracticalSessionId, Recipe, RecipeId, RecipeIngredient, Student, StudentId,
};
use diesel::result::QueryResult;
use diesel::BelongingToDsl as _;
use diesel::BoolExpressionMethods as _;
use diesel::ExpressionMethods as _;
use diesel::OptionalExtension as _;
use diesel::QueryDsl as _;
use diesel::RunQueryDsl as _;
use diesel::SelectableHelper as _;

pub fn add_chef(conn: &mut database::Connection, new_chef: &NewChef<'_>) -> QueryResult<ChefId> {
    use database::schema::chefs::dsl::*;

    diesel::insert_into(chefs)
        .values(new_chef)
        .returning(id)
        .get_result(conn)
}

pub fn get_chef(conn: &mut database::Connection, chef_id: ChefId) -> QueryResult<Option<Chef>> {
    use database::schema::chefs::dsl::*;

    chefs
        .find(chef_id)
        .select(Chef::as_select())
        .first(conn)
        .optional()
}

/// Passwords are stored and compared as entered.
pub fn find_chef_by_credentials(
    conn: &mut database::Connection,
    login_email: &str,
    login_password: &str,
) -> QueryResult<Option<Chef>> {
    use database::schema::chefs::dsl::*;

    chefs
        .select(Chef::as_select())
        .filter(email.eq(login_email).and(password.eq(login_password)))
        .first(conn)
        .optional()
}

pub fn chef_email_exists(conn: &mut database::Connection, search_email: &str) -> QueryResult<bool> {
    use database::schema::chefs::dsl::*;

    diesel::select(diesel::dsl::exists(chefs.filter(email.eq(search_email)))).get_result(conn)
}

pub fn add_course(
    conn: &mut database::Connection,
    new_course: &NewCourse<'_>,
) -> QueryResult<CourseId> {
    use database::schema::courses::dsl::*;

    diesel::insert_into(courses)
        .values(new_course)
        .returning(id)
        .get_result(conn)
}

pub fn get_course(
    conn: &mut database::Connection,
    course_id: CourseId,
) -> QueryResult<Option<Course>> {
    use database::schema::courses::dsl::*;

    courses
        .find(course_id)
        .select(Course::as_select())
        .first(conn)
        .optional()
}

/// Courses owned by `owner`, newest start date first, optionally restricted to one category.
pub fn courses_for_chef(
    conn: &mut database::Connection,
    owner: ChefId,
    only_category: Option<CourseCategory>,
) -> QueryResult<Vec<Course>> {
    use database::schema::courses::dsl::*;

    let mut query = courses
        .select(Course::as_select())
        .filter(chef_id.eq(owner))
        .order_by((start_date.desc(), id.desc()))
        .into_boxed();
    if let Some(only_category) = only_category {
        query = query.filter(category.eq(only_category));
    }
    query.load(conn)
}

pub fn update_course(conn: &mut database::Connection, course: &Course) -> QueryResult<bool> {
    use database::schema::courses::dsl::*;

    diesel::update(courses.find(course.id))
        .set((
            title.eq(&course.title),
            category.eq(course.category),
            start_date.eq(course.start_date),
            frequency_days.eq(course.frequency_days),
            session_count.eq(course.session_count),
        ))
        .execute(conn)
        .map(|n| n == 1)
}

pub fn delete_course(conn: &mut database::Connection, delete_id: CourseId) -> QueryResult<bool> {
    use database::schema::courses::dsl::*;

    diesel::delete(courses.find(delete_id))
        .execute(conn)
        .map(|n| n == 1)
}

pub fn add_online_session(
    conn: &mut database::Connection,
    new_session: &NewOnlineSession<'_>,
) -> QueryResult<OnlineSessionId> {
    use database::schema::online_sessions::dsl::*;

    diesel::insert_into(online_sessions)
        .values(new_session)
        .returning(id)
        .get_result(conn)
}

pub fn online_sessions_for_course(
    conn: &mut database::Connection,
    course: &Course,
) -> QueryResult<Vec<OnlineSession>> {
    use database::schema::online_sessions::dsl::*;

    OnlineSession::belonging_to(course)
        .select(OnlineSession::as_select())
        .order_by((date.asc(), time.asc()))
        .load(conn)
}

pub fn update_online_session(
    conn: &mut database::Connection,
    session: &OnlineSession,
) -> QueryResult<bool> {
    use database::schema::online_sessions::dsl::*;

    diesel::update(online_sessions.find(session.id))
        .set((
            date.eq(session.date),
            time.eq(session.time),
            duration_minutes.eq(session.duration_minutes),
            link.eq(&session.link),
        ))
        .execute(conn)
        .map(|n| n == 1)
}

pub fn delete_online_session(
    conn: &mut database::Connection,
    delete_id: OnlineSessionId,
) -> QueryResult<bool> {
    use database::schema::online_sessions::dsl::*;

    diesel::delete(online_sessions.find(delete_id))
        .execute(conn)
        .map(|n| n == 1)
}

pub fn add_practical_session(
    conn: &mut database::Connection,
    new_session: &NewPracticalSession<'_>,
) -> QueryResult<PracticalSessionId> {
    use database::schema::practical_sessions::dsl::*;

    diesel::insert_into(practical_sessions)
        .values(new_session)
        .returning(id)
        .get_result(conn)
}

pub fn practical_sessions_for_course(
    conn: &mut database::Connection,
    course: &Course,
) -> QueryResult<Vec<PracticalSession>> {
    use database::schema::practical_sessions::dsl::*;

    PracticalSession::belonging_to(course)
        .select(PracticalSession::as_select())
        .order_by((date.asc(), time.asc()))
        .load(conn)
}

pub fn update_practical_session(
    conn: &mut database::Connection,
    session: &PracticalSession,
) -> QueryResult<bool> {
    use database::schema::practical_sessions::dsl::*;

    diesel::update(practical_sessions.find(session.id))
        .set((
            date.eq(session.date),
            time.eq(session.time),
            duration_minutes.eq(session.duration_minutes),
            location.eq(&session.location),
        ))
        .execute(conn)
        .map(|n| n == 1)
}

pub fn delete_practical_session(
    conn: &mut database::Connection,
    delete_id: PracticalSessionId,
) -> QueryResult<bool> {
    use database::schema::practical_sessions::dsl::*;

    diesel::delete(practical_sessions.find(delete_id))
        .execute(conn)
        .map(|n| n == 1)
}

pub fn add_recipe(
    conn: &mut database::Connection,
    new_name: &str,
    session_id: PracticalSessionId,
) -> QueryResult<RecipeId> {
    use database::schema::recipes::dsl::*;

    diesel::insert_into(recipes)
        .values((name.eq(new_name), practical_session_id.eq(session_id)))
        .returning(id)
        .get_result(conn)
}

pub fn recipes_for_practical_session(
    conn: &mut database::Connection,
    session: &PracticalSession,
) -> QueryResult<Vec<Recipe>> {
    use database::schema::recipes::dsl::*;

    Recipe::belonging_to(session)
        .select(Recipe::as_select())
        .order_by(name.asc())
        .load(conn)
}

pub fn recipes_for_course(
    conn: &mut database::Connection,
    course_id: CourseId,
) -> QueryResult<Vec<Recipe>> {
    use database::schema::{practical_sessions, recipes};

    recipes::table
        .inner_join(practical_sessions::table)
        .filter(practical_sessions::course_id.eq(course_id))
        .select(Recipe::as_select())
        .order_by(recipes::name.asc())
        .load(conn)
}

pub fn rename_recipe(
    conn: &mut database::Connection,
    recipe_id: RecipeId,
    new_name: &str,
) -> QueryResult<bool> {
    use database::schema::recipes::dsl::*;

    diesel::update(recipes.find(recipe_id))
        .set(name.eq(new_name))
        .execute(conn)
        .map(|n| n == 1)
}

/// Ingredient associations go with the recipe through the foreign key cascade.
pub fn delete_recipe(conn: &mut database::Connection, delete_id: RecipeId) -> QueryResult<bool> {
    use database::schema::recipes::dsl::*;

    diesel::delete(recipes.find(delete_id))
        .execute(conn)
        .map(|n| n == 1)
}

pub fn count_recipes_for_practical_session(
    conn: &mut database::Connection,
    session_id: PracticalSessionId,
) -> QueryResult<i64> {
    use database::schema::recipes::dsl::*;

    recipes
        .filter(practical_session_id.eq(session_id))
        .count()
        .get_result(conn)
}

pub fn add_ingredient(
    conn: &mut database::Connection,
    new_ingredient: &NewIngredient<'_>,
) -> QueryResult<IngredientId> {
    use database::schema::ingredients::dsl::*;

    diesel::insert_into(ingredients)
        .values(new_ingredient)
        .returning(id)
        .get_result(conn)
}

pub fn all_ingredients(conn: &mut database::Connection) -> QueryResult<Vec<Ingredient>> {
    use database::schema::ingredients::dsl::*;

    ingredients
        .select(Ingredient::as_select())
        .order_by(name.asc())
        .load(conn)
}

pub fn get_ingredient_by_name(
    conn: &mut database::Connection,
    search_name: &str,
) -> QueryResult<Option<Ingredient>> {
    use database::schema::ingredients::dsl::*;

    ingredients
        .select(Ingredient::as_select())
        .filter(name.eq(search_name))
        .first(conn)
        .optional()
}

/// `text` as a `LIKE` pattern matching it anywhere, with its own wildcards escaped by `\`.
fn contains_pattern(text: &str) -> String {
    let mut pattern = String::from("%");
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Substring match on the ingredient name. SQLite's `LIKE` ignores ASCII case.
pub fn search_ingredients(
    conn: &mut database::Connection,
    query: &str,
) -> QueryResult<Vec<Ingredient>> {
    use database::schema::ingredients::dsl::*;
    use diesel::expression_methods::{EscapeExpressionMethods as _, TextExpressionMethods as _};

    ingredients
        .select(Ingredient::as_select())
        .filter(name.like(contains_pattern(query)).escape('\\'))
        .order_by(name.asc())
        .load(conn)
}

pub fn ingredients_by_category(
    conn: &mut database::Connection,
    search_category: &str,
) -> QueryResult<Vec<Ingredient>> {
    use database::schema::ingredients::dsl::*;

    ingredients
        .select(Ingredient::as_select())
        .filter(category.eq(search_category))
        .order_by(name.asc())
        .load(conn)
}

pub fn add_recipe_ingredient(
    conn: &mut database::Connection,
    entry: &RecipeIngredient,
) -> QueryResult<()> {
    use database::schema::recipe_ingredients::dsl::*;

    diesel::insert_into(recipe_ingredients)
        .values(entry)
        .execute(conn)?;
    Ok(())
}

#[derive(Clone, Debug, PartialEq)]
pub struct UsedIngredient {
    pub ingredient: Ingredient,
    pub quantity: f32,
}

pub fn ingredients_for_recipe(
    conn: &mut database::Connection,
    for_recipe: RecipeId,
) -> QueryResult<Vec<UsedIngredient>> {
    use database::schema::{ingredients, recipe_ingredients};

    Ok(recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq(for_recipe))
        .select((Ingredient::as_select(), recipe_ingredients::quantity))
        .order_by(ingredients::name.asc())
        .load::<(Ingredient, f32)>(conn)?
        .into_iter()
        .map(|(ingredient, quantity)| UsedIngredient {
            ingredient,
            quantity,
        })
        .collect())
}

pub fn update_recipe_ingredient_quantity(
    conn: &mut database::Connection,
    for_recipe: RecipeId,
    for_ingredient: IngredientId,
    new_quantity: f32,
) -> QueryResult<bool> {
    use database::schema::recipe_ingredients::dsl::*;

    diesel::update(recipe_ingredients.find((for_recipe, for_ingredient)))
        .set(quantity.eq(new_quantity))
        .execute(conn)
        .map(|n| n == 1)
}

pub fn delete_recipe_ingredient(
    conn: &mut database::Connection,
    for_recipe: RecipeId,
    for_ingredient: IngredientId,
) -> QueryResult<bool> {
    use database::schema::recipe_ingredients::dsl::*;

    diesel::delete(recipe_ingredients.find((for_recipe, for_ingredient)))
        .execute(conn)
        .map(|n| n == 1)
}

pub fn add_student(
    conn: &mut database::Connection,
    new_student: &NewStudent<'_>,
) -> QueryResult<StudentId> {
    use database::schema::students::dsl::*;

    diesel::insert_into(students)
        .values(new_student)
        .returning(id)
        .get_result(conn)
}

pub fn enroll(
    conn: &mut database::Connection,
    new_student_id: StudentId,
    new_course_id: CourseId,
) -> QueryResult<()> {
    use database::schema::enrollments::dsl::*;

    diesel::insert_into(enrollments)
        .values((student_id.eq(new_student_id), course_id.eq(new_course_id)))
        .execute(conn)?;
    Ok(())
}

pub fn unenroll(
    conn: &mut database::Connection,
    for_student: StudentId,
    for_course: CourseId,
) -> QueryResult<bool> {
    use database::schema::enrollments::dsl::*;

    diesel::delete(enrollments.find((for_student, for_course)))
        .execute(conn)
        .map(|n| n == 1)
}

pub fn is_enrolled(
    conn: &mut database::Connection,
    for_student: StudentId,
    for_course: CourseId,
) -> QueryResult<bool> {
    use database::schema::enrollments::dsl::*;

    diesel::select(diesel::dsl::exists(
        enrollments.find((for_student, for_course)),
    ))
    .get_result(conn)
}

pub fn enrollments_for_course(
    conn: &mut database::Connection,
    for_course: CourseId,
) -> QueryResult<Vec<Enrollment>> {
    use database::schema::enrollments::dsl::*;

    enrollments
        .select(Enrollment::as_select())
        .filter(course_id.eq(for_course))
        .order_by(enrolled_at.asc())
        .load(conn)
}

pub fn students_for_course(
    conn: &mut database::Connection,
    for_course: CourseId,
) -> QueryResult<Vec<Student>> {
    use database::schema::{enrollments, students};

    students::table
        .inner_join(enrollments::table)
        .filter(enrollments::course_id.eq(for_course))
        .select(Student::as_select())
        .order_by(students::name.asc())
        .load(conn)
}

pub fn count_enrollments(
    conn: &mut database::Connection,
    for_course: CourseId,
) -> QueryResult<i64> {
    use database::schema::enrollments::dsl::*;

    enrollments
        .filter(course_id.eq(for_course))
        .count()
        .get_result(conn)
}

pub fn add_notification(
    conn: &mut database::Connection,
    new_notification: &NewNotification<'_>,
) -> QueryResult<NotificationId> {
    use database::schema::notifications::dsl::*;

    diesel::insert_into(notifications)
        .values(new_notification)
        .returning(id)
        .get_result(conn)
}

pub fn notifications_for_chef(
    conn: &mut database::Connection,
    author: ChefId,
) -> QueryResult<Vec<Notification>> {
    use database::schema::notifications::dsl::*;

    notifications
        .select(Notification::as_select())
        .filter(chef_id.eq(author))
        .order_by((created_at.desc(), id.desc()))
        .load(conn)
}

pub fn notifications_for_course(
    conn: &mut database::Connection,
    for_course: CourseId,
) -> QueryResult<Vec<Notification>> {
    use database::schema::notifications::dsl::*;

    notifications
        .select(Notification::as_select())
        .filter(course_id.eq(for_course))
        .order_by((created_at.desc(), id.desc()))
        .load(conn)
}

pub fn global_notifications_for_chef(
    conn: &mut database::Connection,
    author: ChefId,
) -> QueryResult<Vec<Notification>> {
    use database::schema::notifications::dsl::*;

    notifications
        .select(Notification::as_select())
        .filter(chef_id.eq(author).and(is_global.eq(true)))
        .order_by((created_at.desc(), id.desc()))
        .load(conn)
}

pub fn delete_notification(
    conn: &mut database::Connection,
    delete_id: NotificationId,
) -> QueryResult<bool> {
    use database::schema::notifications::dsl::*;

    diesel::delete(notifications.find(delete_id))
        .execute(conn)
        .map(|n| n == 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::fixtures;
    use crate::database::models::ChangeKind;

    #[test]
    fn chef_login_requires_matching_password() {
        let db = fixtures::database();
        let mut conn = db.get().unwrap();
        let chef = fixtures::chef(&mut conn, "mario@foodlab.it");

        let found = find_chef_by_credentials(&mut conn, "mario@foodlab.it", "secret")
            .unwrap()
            .unwrap();
        assert_eq!(found.id, chef);
        assert_eq!(found.name, "Chef mario@foodlab.it");

        assert!(find_chef_by_credentials(&mut conn, "mario@foodlab.it", "Secret")
            .unwrap()
            .is_none());
        assert!(chef_email_exists(&mut conn, "mario@foodlab.it").unwrap());
        assert!(!chef_email_exists(&mut conn, "luigi@foodlab.it").unwrap());
    }

    #[test]
    fn duplicate_chef_email_rejected() {
        let db = fixtures::database();
        let mut conn = db.get().unwrap();
        fixtures::chef(&mut conn, "mario@foodlab.it");

        let duplicate = add_chef(
            &mut conn,
            &NewChef {
                name: "Other",
                email: "mario@foodlab.it",
                password: "x",
                years_of_experience: 1,
                specialization_count: 0,
            },
        );
        assert!(duplicate.is_err());
    }

    #[test]
    fn courses_filtered_by_category_newest_first() {
        let db = fixtures::database();
        let mut conn = db.get().unwrap();
        let chef = fixtures::chef(&mut conn, "mario@foodlab.it");
        let other = fixtures::chef(&mut conn, "luigi@foodlab.it");

        let old = fixtures::course(&mut conn, chef, "Old", fixtures::date(2025, 1, 6));
        let new = fixtures::course(&mut conn, chef, "New", fixtures::date(2025, 9, 1));
        let pastry = add_course(
            &mut conn,
            &NewCourse {
                title: "Croissants",
                category: CourseCategory::Pastry,
                start_date: fixtures::date(2025, 3, 3),
                frequency_days: 7,
                session_count: 2,
                chef_id: chef,
            },
        )
        .unwrap();
        fixtures::course(&mut conn, other, "Not mine", fixtures::date(2025, 5, 5));

        let all: Vec<_> = courses_for_chef(&mut conn, chef, None)
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(all, vec![new, pastry, old]);

        let only_pastry = courses_for_chef(&mut conn, chef, Some(CourseCategory::Pastry)).unwrap();
        assert_eq!(only_pastry.len(), 1);
        assert_eq!(only_pastry[0].title, "Croissants");
        assert_eq!(only_pastry[0].category, CourseCategory::Pastry);
    }

    #[test]
    fn update_and_delete_course() {
        let db = fixtures::database();
        let mut conn = db.get().unwrap();
        let chef = fixtures::chef(&mut conn, "mario@foodlab.it");
        let id = fixtures::course(&mut conn, chef, "Pasta", fixtures::date(2025, 1, 6));

        let mut course = get_course(&mut conn, id).unwrap().unwrap();
        course.title = "Fresh pasta".into();
        course.category = CourseCategory::FirstCourses;
        assert!(update_course(&mut conn, &course).unwrap());
        assert_eq!(get_course(&mut conn, id).unwrap().unwrap(), course);

        assert!(delete_course(&mut conn, id).unwrap());
        assert!(get_course(&mut conn, id).unwrap().is_none());
        assert!(!delete_course(&mut conn, id).unwrap());
    }

    #[test]
    fn sessions_ordered_by_date() {
        let db = fixtures::database();
        let mut conn = db.get().unwrap();
        let chef = fixtures::chef(&mut conn, "mario@foodlab.it");
        let id = fixtures::course(&mut conn, chef, "Pasta", fixtures::date(2025, 1, 6));
        let course = get_course(&mut conn, id).unwrap().unwrap();

        fixtures::practical_session(&mut conn, id, fixtures::date(2025, 1, 20));
        fixtures::practical_session(&mut conn, id, fixtures::date(2025, 1, 6));
        fixtures::online_session(&mut conn, id, fixtures::date(2025, 1, 13));

        let dates: Vec<_> = practical_sessions_for_course(&mut conn, &course)
            .unwrap()
            .into_iter()
            .map(|s| s.date)
            .collect();
        assert_eq!(
            dates,
            vec![fixtures::date(2025, 1, 6), fixtures::date(2025, 1, 20)]
        );

        let mut online = online_sessions_for_course(&mut conn, &course).unwrap();
        assert_eq!(online.len(), 1);
        online[0].link = "https://meet.example.com/new".into();
        online[0].duration_minutes = 90;
        assert!(update_online_session(&mut conn, &online[0]).unwrap());
        assert_eq!(
            online_sessions_for_course(&mut conn, &course).unwrap(),
            online
        );
    }

    #[test]
    fn deleting_recipe_removes_its_ingredients() {
        let db = fixtures::database();
        let mut conn = db.get().unwrap();
        let chef = fixtures::chef(&mut conn, "mario@foodlab.it");
        let course = fixtures::course(&mut conn, chef, "Pasta", fixtures::date(2025, 1, 6));
        let session = fixtures::practical_session(&mut conn, course, fixtures::date(2025, 1, 6));
        let recipe = add_recipe(&mut conn, "Carbonara", session).unwrap();
        let eggs = fixtures::ingredient(&mut conn, "Eggs");
        let guanciale = fixtures::ingredient(&mut conn, "Guanciale");

        for (ingredient_id, quantity) in [(eggs, 4.0), (guanciale, 150.0)] {
            add_recipe_ingredient(
                &mut conn,
                &RecipeIngredient {
                    recipe_id: recipe,
                    ingredient_id,
                    quantity,
                },
            )
            .unwrap();
        }

        let used = ingredients_for_recipe(&mut conn, recipe).unwrap();
        let names: Vec<_> = used.iter().map(|u| u.ingredient.name.as_str()).collect();
        assert_eq!(names, vec!["Eggs", "Guanciale"]);
        assert_eq!(used[0].quantity, 4.0);

        assert!(update_recipe_ingredient_quantity(&mut conn, recipe, eggs, 5.0).unwrap());
        assert_eq!(ingredients_for_recipe(&mut conn, recipe).unwrap()[0].quantity, 5.0);

        assert_eq!(recipes_for_course(&mut conn, course).unwrap().len(), 1);
        assert!(delete_recipe(&mut conn, recipe).unwrap());
        assert!(ingredients_for_recipe(&mut conn, recipe).unwrap().is_empty());
        assert_eq!(count_recipes_for_practical_session(&mut conn, session).unwrap(), 0);

        // ingredients themselves are shared and survive
        assert_eq!(all_ingredients(&mut conn).unwrap().len(), 2);
    }

    #[test]
    fn ingredient_search_is_case_insensitive() {
        let db = fixtures::database();
        let mut conn = db.get().unwrap();
        for name in ["Flour", "Buckwheat flour", "Sugar"] {
            fixtures::ingredient(&mut conn, name);
        }

        let found: Vec<_> = search_ingredients(&mut conn, "FLOUR")
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(found, vec!["Buckwheat flour", "Flour"]);
        assert!(get_ingredient_by_name(&mut conn, "Sugar").unwrap().is_some());
        assert_eq!(ingredients_by_category(&mut conn, "Pantry").unwrap().len(), 3);
    }

    #[test]
    fn ingredient_search_matches_wildcards_literally() {
        let db = fixtures::database();
        let mut conn = db.get().unwrap();
        for name in ["Flour", "Dark chocolate 70%", "Salt_fine", "Sugar"] {
            fixtures::ingredient(&mut conn, name);
        }

        fn search(conn: &mut database::Connection, text: &str) -> Vec<String> {
            search_ingredients(conn, text)
                .unwrap()
                .into_iter()
                .map(|i| i.name)
                .collect()
        }
        assert_eq!(search(&mut conn, "_"), vec!["Salt_fine"]);
        assert_eq!(search(&mut conn, "%"), vec!["Dark chocolate 70%"]);
        assert_eq!(search(&mut conn, "70%"), vec!["Dark chocolate 70%"]);
        assert!(search(&mut conn, "\\").is_empty());
        assert_eq!(search(&mut conn, "").len(), 4);
    }

    #[test]
    fn enrollment_round() {
        let db = fixtures::database();
        let mut conn = db.get().unwrap();
        let chef = fixtures::chef(&mut conn, "mario@foodlab.it");
        let course = fixtures::course(&mut conn, chef, "Pasta", fixtures::date(2025, 1, 6));
        let student = add_student(
            &mut conn,
            &NewStudent {
                name: "Anna",
                student_number: "N86001234",
                email: "anna@studenti.it",
                password: "pw",
            },
        )
        .unwrap();

        assert!(!is_enrolled(&mut conn, student, course).unwrap());
        enroll(&mut conn, student, course).unwrap();
        assert!(is_enrolled(&mut conn, student, course).unwrap());
        assert!(enroll(&mut conn, student, course).is_err());

        assert_eq!(count_enrollments(&mut conn, course).unwrap(), 1);
        assert_eq!(enrollments_for_course(&mut conn, course).unwrap()[0].student_id, student);
        assert_eq!(students_for_course(&mut conn, course).unwrap()[0].name, "Anna");

        assert!(unenroll(&mut conn, student, course).unwrap());
        assert_eq!(count_enrollments(&mut conn, course).unwrap(), 0);
    }

    #[test]
    fn notifications_by_scope() {
        let db = fixtures::database();
        let mut conn = db.get().unwrap();
        let chef = fixtures::chef(&mut conn, "mario@foodlab.it");
        let course = fixtures::course(&mut conn, chef, "Pasta", fixtures::date(2025, 1, 6));

        let moved = add_notification(
            &mut conn,
            &NewNotification {
                chef_id: chef,
                course_id: Some(course),
                title: "Moved",
                message: "Lesson moved to Friday",
                change_kind: ChangeKind::DateChange,
                is_global: false,
            },
        )
        .unwrap();
        let global = add_notification(
            &mut conn,
            &NewNotification {
                chef_id: chef,
                course_id: None,
                title: "Holidays",
                message: "No lessons in August",
                change_kind: ChangeKind::Other,
                is_global: true,
            },
        )
        .unwrap();

        let all: Vec<_> = notifications_for_chef(&mut conn, chef)
            .unwrap()
            .into_iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(all, vec![global, moved]);

        let for_course = notifications_for_course(&mut conn, course).unwrap();
        assert_eq!(for_course.len(), 1);
        assert_eq!(for_course[0].change_kind, ChangeKind::DateChange);

        let globals = global_notifications_for_chef(&mut conn, chef).unwrap();
        assert_eq!(globals.len(), 1);
        assert_eq!(globals[0].course_id, None);

        assert!(delete_notification(&mut conn, moved).unwrap());
        assert_eq!(notifications_for_chef(&mut conn, chef).unwrap().len(), 1);
    }
}
