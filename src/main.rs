use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, Level};

use grade_calc::model::Grade;
use grade_calc::scheme::SchemeConfig;
use grade_calc::store::Gradebook;

const EXIT_SUCCESS: i32 = 0;
const EXIT_DATA: i32 = 2;
const EXIT_REQUEST: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Class overview sorted by points (default if no subcommand)
    Class {
        /// Only show students on this course
        #[arg(long)]
        course: Option<String>,
        /// Tab-separated output for scripting
        #[arg(long)]
        tsv: bool,
    },
    /// Full result summary for one student
    Summary {
        /// Student id or name
        student: String,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Points for a grade on a unit of the given size
    Points {
        /// Unit size in guided learning hours
        glh: u32,
        /// Grade symbol (U, P, M, D)
        grade: String,
    },
    /// List courses in the gradebook
    Courses,
    /// Enrol a new student on a course
    AddStudent {
        name: String,
        #[arg(long)]
        course: String,
    },
    /// Record a grade for a unit
    Set {
        student: String,
        unit: String,
        grade: String,
    },
    /// Toggle the sign-off lock on a unit result
    Lock { student: String, unit: String },
    /// Start tracking an optional unit for a student
    AddUnit { student: String, unit: String },
    /// Stop tracking an optional unit for a student
    RemoveUnit { student: String, unit: String },
    /// Write a config file with the default grading scheme
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "grade-calc")]
#[command(about = "BTEC-style qualification grade calculator", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/grade-calc/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to gradebook file (overrides data_file from config)
    #[arg(long, global = true)]
    data: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn exit_with(code: i32, message: &str, err: &anyhow::Error) -> ! {
    eprintln!("{}: {:#}", message, err);
    std::process::exit(code);
}

fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        eprintln!("warning: {}", warning);
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let command = cli.command.unwrap_or(Commands::Class {
        course: None,
        tsv: false,
    });

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    if let Commands::Init { force } = command {
        let path = match config_path.map_or_else(grade_calc::config::get_config_path, Ok) {
            Ok(p) => p,
            Err(e) => exit_with(EXIT_CONFIG, "Config error", &e),
        };
        if let Err(e) = grade_calc::config::write_default_config(&path, force) {
            exit_with(EXIT_CONFIG, "Config error", &e);
        }
        println!("Wrote default config to {}", path.display());
        std::process::exit(EXIT_SUCCESS);
    }

    let config = match grade_calc::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => exit_with(EXIT_CONFIG, "Config error", &e),
    };

    // Validate scheme at startup
    let scheme = config.scheme.clone().unwrap_or_default();
    if let Err(errors) = grade_calc::scheme::validate_scheme(&scheme) {
        eprintln!("Scheme config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }
    debug!(
        points_rows = scheme.points.len(),
        boundaries = scheme.boundaries.len(),
        custom = config.scheme.is_some(),
        "grading scheme loaded"
    );

    let data_path = match cli.data.or(config.data_file).map(PathBuf::from) {
        Some(p) => p,
        None => match grade_calc::store::get_gradebook_path() {
            Ok(p) => p,
            Err(e) => exit_with(EXIT_DATA, "Gradebook error", &e),
        },
    };

    let mut book = match grade_calc::store::load_gradebook(&data_path) {
        Ok(b) => b,
        Err(e) => exit_with(EXIT_DATA, "Gradebook error", &e),
    };
    debug!(
        path = %data_path.display(),
        courses = book.courses.len(),
        students = book.students.len(),
        "gradebook loaded"
    );

    let use_colors = grade_calc::output::should_use_colors();
    let term_width = grade_calc::output::terminal_width();

    match command {
        Commands::Class { course, tsv } => {
            let mut rows: Vec<grade_calc::output::ClassRow> = Vec::new();
            for student in &book.students {
                if course.as_deref().is_some_and(|id| id != student.course_id) {
                    continue;
                }
                let Some(student_course) = book.course(&student.course_id) else {
                    eprintln!(
                        "warning: student {} references unknown course '{}'",
                        student.id, student.course_id
                    );
                    continue;
                };
                rows.push(grade_calc::output::ClassRow {
                    student,
                    summary: grade_calc::scheme::aggregate(student, student_course, &scheme),
                });
            }

            // Sort by points descending, then by name
            rows.sort_by(|a, b| {
                b.summary
                    .total_points
                    .cmp(&a.summary.total_points)
                    .then_with(|| a.student.name.cmp(&b.student.name))
            });

            if tsv {
                println!("{}", grade_calc::output::format_tsv(&rows));
            } else {
                println!(
                    "{}",
                    grade_calc::output::format_class_table(&rows, term_width, use_colors)
                );
            }
        }
        Commands::Summary { student, json } => {
            let (student, course) = match book.student_with_course(&student) {
                Ok(found) => found,
                Err(e) => exit_with(EXIT_REQUEST, "Error", &e),
            };

            print_warnings(&grade_calc::scheme::check_course(course, &scheme));
            print_warnings(&grade_calc::scheme::check_student(student, course));

            let summary = grade_calc::scheme::aggregate(student, course, &scheme);
            if json {
                match serde_json::to_string_pretty(&summary) {
                    Ok(out) => println!("{}", out),
                    Err(e) => exit_with(EXIT_DATA, "Error", &anyhow::Error::from(e)),
                }
            } else {
                println!(
                    "{}",
                    grade_calc::output::format_summary(
                        course,
                        student,
                        &summary,
                        term_width,
                        use_colors,
                    )
                );
            }
        }
        Commands::Points { glh, grade } => {
            let points = grade_calc::scheme::points_for_symbol(&scheme.points, glh, &grade);
            if cli.verbose && Grade::parse(&grade).is_err() {
                eprintln!("Unknown grade '{}' scores 0", grade);
            }
            println!("{}", points);
        }
        Commands::Courses => {
            println!(
                "{}",
                grade_calc::output::format_course_list(&book.courses, use_colors)
            );
        }
        Commands::AddStudent { name, course } => {
            let id = match book.add_student(&name, &course) {
                Ok(id) => id,
                Err(e) => exit_with(EXIT_REQUEST, "Error", &e),
            };
            save_or_exit(&data_path, &mut book);
            println!("Enrolled {} as {}", name, id);
        }
        Commands::Set {
            student,
            unit,
            grade,
        } => {
            let grade = match Grade::parse(&grade) {
                Ok(g) => g,
                Err(e) => exit_with(EXIT_REQUEST, "Error", &e),
            };
            or_exit(book.set_grade(&student, &unit, grade));
            save_or_exit(&data_path, &mut book);
            print_updated(&book, &student, &scheme);
        }
        Commands::Lock { student, unit } => {
            let locked = or_exit(book.toggle_lock(&student, &unit));
            save_or_exit(&data_path, &mut book);
            println!(
                "Unit {} is now {}",
                unit,
                if locked { "locked" } else { "unlocked" }
            );
        }
        Commands::AddUnit { student, unit } => {
            let added = or_exit(book.add_unit(&student, &unit));
            if added {
                save_or_exit(&data_path, &mut book);
                print_updated(&book, &student, &scheme);
            } else {
                println!("Unit {} is already tracked", unit);
            }
        }
        Commands::RemoveUnit { student, unit } => {
            let removed = or_exit(book.remove_unit(&student, &unit));
            if removed > 0 {
                save_or_exit(&data_path, &mut book);
                print_updated(&book, &student, &scheme);
            } else {
                println!("Unit {} has no recorded result", unit);
            }
        }
        Commands::Init { .. } => unreachable!("handled before loading config"),
    }

    std::process::exit(EXIT_SUCCESS);
}

/// Unwrap the result of a gradebook request, exiting on refusal
fn or_exit<T>(result: anyhow::Result<T>) -> T {
    match result {
        Ok(v) => v,
        Err(e) => exit_with(EXIT_REQUEST, "Error", &e),
    }
}

fn save_or_exit(path: &std::path::Path, book: &mut Gradebook) {
    if let Err(e) = grade_calc::store::save_gradebook(path, book) {
        exit_with(EXIT_DATA, "Gradebook error", &e);
    }
}

/// One-line recap after an edit
fn print_updated(book: &Gradebook, key: &str, scheme: &SchemeConfig) {
    if let Ok((student, course)) = book.student_with_course(key) {
        let summary = grade_calc::scheme::aggregate(student, course, scheme);
        println!(
            "{}: {} points, grade {}, {} UCAS, mandatory {}",
            student.name,
            summary.total_points,
            summary.grade,
            summary.ucas_points,
            grade_calc::output::format_mandatory_status(summary.mandatory_passed)
        );
    }
}
