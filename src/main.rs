// Copyright 2023 Remi Bernotavicius

use clap::Parser;
use clap::Subcommand;
use std::path::PathBuf;

mod config;
mod course;
mod database;
mod report;
mod schedule;
mod session;
mod ui;

type Error = Box<dyn std::error::Error + Send + Sync + 'static>;
type Result<T> = std::result::Result<T, Error>;

#[derive(Parser, Debug)]
#[command(version, about = "Manage cooking courses, their sessions and recipes")]
struct Args {
    /// Configuration file to read instead of the one in the data directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Database file to open, overriding the configuration.
    #[arg(long)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    commands: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Open the application window. This is the default.
    Run,
    /// Write the configuration in use to the configuration file, which must not exist yet.
    InitConfig,
    AddChef {
        name: String,
        email: String,
        password: String,
        #[arg(long, default_value_t = 0)]
        years_of_experience: i32,
        #[arg(long, default_value_t = 0)]
        specializations: i32,
    },
    AddIngredient {
        name: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, default_value = "g")]
        unit: String,
    },
    AddStudent {
        name: String,
        student_number: String,
        email: String,
        password: String,
    },
    /// List ingredients, optionally only those of one category.
    Ingredients {
        #[arg(long)]
        category: Option<String>,
    },
    Enroll {
        student_id: i32,
        course_id: i32,
    },
    Unenroll {
        student_id: i32,
        course_id: i32,
    },
    /// Print a course with its sessions, recipes and enrollments.
    Course {
        course_id: i32,
    },
    /// Print the dates the sessions of a course would fall on.
    Schedule {
        start: chrono::NaiveDate,
        frequency: u32,
        count: u32,
    },
    /// Print the monthly report and the annual breakdown of a chef.
    Report {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        year: i32,
        month: u32,
    },
}

/// This is where the database and other user-data lives on-disk. On Linux it should be like:
/// `~/.local/share/foodlab/`
fn data_path() -> Result<PathBuf> {
    let dirs = directories::BaseDirs::new().ok_or("failed to get user home directory")?;
    let path = dirs.data_dir().join("foodlab");
    std::fs::create_dir_all(&path)?;
    Ok(path)
}

fn run(db: database::Database) -> Result<()> {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("FoodLab Manager")
            .with_maximized(true),
        ..Default::default()
    };
    eframe::run_native(
        "FoodLab Manager",
        native_options,
        Box::new(|_cc| Ok(Box::new(ui::FoodLab::new(db)))),
    )
    .map_err(|e| e.to_string())?;

    Ok(())
}

fn add_chef(
    conn: &mut database::Connection,
    new_chef: &database::models::NewChef<'_>,
) -> Result<()> {
    if database::query::chef_email_exists(conn, new_chef.email)? {
        return Err(format!("a chef with email {} already exists", new_chef.email).into());
    }
    let id = database::query::add_chef(conn, new_chef)?;
    println!("added chef {id}");
    Ok(())
}

fn add_ingredient(
    conn: &mut database::Connection,
    new_ingredient: &database::models::NewIngredient<'_>,
) -> Result<()> {
    if database::query::get_ingredient_by_name(conn, new_ingredient.name)?.is_some() {
        return Err(format!("ingredient {:?} already exists", new_ingredient.name).into());
    }
    let id = database::query::add_ingredient(conn, new_ingredient)?;
    println!("added ingredient {id}");
    Ok(())
}

fn print_ingredients(conn: &mut database::Connection, category: Option<&str>) -> Result<()> {
    let ingredients = match category {
        Some(category) => database::query::ingredients_by_category(conn, category)?,
        None => database::query::all_ingredients(conn)?,
    };
    for ingredient in ingredients {
        println!(
            "{:>4}  {} ({}) {}",
            ingredient.id,
            ingredient.name,
            ingredient.unit,
            ingredient.category.unwrap_or_default()
        );
    }
    Ok(())
}

fn enroll(
    conn: &mut database::Connection,
    student: database::models::StudentId,
    course: database::models::CourseId,
) -> Result<()> {
    if database::query::is_enrolled(conn, student, course)? {
        return Err(format!("student {student} is already enrolled in course {course}").into());
    }
    database::query::enroll(conn, student, course)?;
    println!(
        "course {course} now has {} students",
        database::query::count_enrollments(conn, course)?
    );
    Ok(())
}

fn print_course(
    conn: &mut database::Connection,
    course_id: database::models::CourseId,
) -> Result<()> {
    use database::query;

    let course = query::get_course(conn, course_id)?.ok_or("no such course")?;
    println!(
        "{} ({}), from {} every {} days, {} sessions",
        course.title,
        course.category,
        course.start_date,
        course.frequency_days,
        course.session_count
    );
    for session in query::online_sessions_for_course(conn, &course)? {
        println!(
            "  {} online, {} min, {}",
            session.date, session.duration_minutes, session.link
        );
    }
    for session in query::practical_sessions_for_course(conn, &course)? {
        println!(
            "  {} at {}, {} min, {} recipes",
            session.date,
            session.location,
            session.duration_minutes,
            query::count_recipes_for_practical_session(conn, session.id)?
        );
    }
    let recipes: Vec<_> = query::recipes_for_course(conn, course.id)?
        .into_iter()
        .map(|r| r.name)
        .collect();
    println!("  recipes: {}", recipes.join(", "));
    for enrollment in query::enrollments_for_course(conn, course.id)? {
        println!(
            "  student {} enrolled {}",
            enrollment.student_id, enrollment.enrolled_at
        );
    }
    Ok(())
}

fn print_schedule(start: chrono::NaiveDate, frequency: u32, count: u32) -> Result<()> {
    let dates = schedule::session_dates(start, frequency, count)
        .ok_or(schedule::ValidationError::ScheduleOutOfRange)?;
    for (i, date) in dates.into_iter().enumerate() {
        println!("{:>3}  {}", i + 1, date.format("%a %Y-%m-%d"));
    }
    Ok(())
}

fn init_config(path: &std::path::Path, config: &config::Config) -> Result<()> {
    if path.exists() {
        return Err(format!("{} already exists", path.display()).into());
    }
    config.save(path)?;
    log::info!("wrote configuration to {}", path.display());
    Ok(())
}

fn print_report(
    conn: &mut database::Connection,
    email: &str,
    password: &str,
    year: i32,
    month: u32,
) -> Result<()> {
    let session = session::AppSession::login(conn, email, password)?
        .ok_or("invalid email or password")?;
    let period = report::ReportPeriod::new(year, month)
        .ok_or_else(|| format!("invalid month {month}, expected 1 to 12"))?;

    let monthly = report::monthly_report(conn, session.chef_id(), period);
    println!("Report for {} {year}-{month:02}", session.chef().name);
    println!("  courses:            {}", monthly.course_count);
    println!("  online sessions:    {}", monthly.online_sessions);
    println!("  practical sessions: {}", monthly.practical_sessions);
    println!("  recipes per practical session:");
    println!("    max:  {}", monthly.recipes.max);
    println!("    min:  {}", monthly.recipes.min);
    println!("    mean: {:.2}", monthly.recipes.mean);

    println!("Sessions in {year}");
    for (month, counts) in report::annual_breakdown(conn, session.chef_id(), year) {
        println!(
            "  {month:>2}: {} online, {} practical",
            counts.online, counts.practical
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let data_dir = data_path()?;

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| data_dir.join(config::CONFIG_FILE_NAME));
    let (config, warning) = config::Config::load(&config_path);
    simple_logger::SimpleLogger::new()
        .with_level(config.log_level())
        .env()
        .init()?;
    if let Some(warning) = warning {
        log::warn!("{warning}");
    }

    let db_path = args
        .database
        .clone()
        .unwrap_or_else(|| config.database_path(&data_dir));
    let open = || database::Database::open(&db_path);

    match args.commands.unwrap_or(Commands::Run) {
        Commands::Schedule {
            start,
            frequency,
            count,
        } => print_schedule(start, frequency, count)?,
        Commands::Run => run(open()?)?,
        Commands::InitConfig => {
            let config = config::Config {
                database_path: args.database.clone().or(config.database_path.clone()),
                ..config.clone()
            };
            init_config(&config_path, &config)?
        }
        Commands::AddChef {
            name,
            email,
            password,
            years_of_experience,
            specializations,
        } => add_chef(
            &mut *open()?.get()?,
            &database::models::NewChef {
                name: &name,
                email: &email,
                password: &password,
                years_of_experience,
                specialization_count: specializations,
            },
        )?,
        Commands::AddIngredient {
            name,
            category,
            unit,
        } => add_ingredient(
            &mut *open()?.get()?,
            &database::models::NewIngredient {
                name: &name,
                category: category.as_deref(),
                unit: &unit,
            },
        )?,
        Commands::AddStudent {
            name,
            student_number,
            email,
            password,
        } => {
            let id = database::query::add_student(
                &mut *open()?.get()?,
                &database::models::NewStudent {
                    name: &name,
                    student_number: &student_number,
                    email: &email,
                    password: &password,
                },
            )?;
            println!("added student {id}");
        }
        Commands::Ingredients { category } => {
            print_ingredients(&mut *open()?.get()?, category.as_deref())?
        }
        Commands::Enroll {
            student_id,
            course_id,
        } => enroll(
            &mut *open()?.get()?,
            database::models::StudentId(student_id),
            database::models::CourseId(course_id),
        )?,
        Commands::Unenroll {
            student_id,
            course_id,
        } => {
            let student = database::models::StudentId(student_id);
            let course = database::models::CourseId(course_id);
            if !database::query::unenroll(&mut *open()?.get()?, student, course)? {
                return Err(format!("student {student} is not enrolled in course {course}").into());
            }
        }
        Commands::Course { course_id } => {
            print_course(&mut *open()?.get()?, database::models::CourseId(course_id))?
        }
        Commands::Report {
            email,
            password,
            year,
            month,
        } => print_report(&mut *open()?.get()?, &email, &password, year, month)?,
    }
    Ok(())
}
