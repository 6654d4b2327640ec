use std::{
    error::Error,
    path::{Path, PathBuf},
    process,
    time::{Duration, Instant},
};

use clap::{Parser, Subcommand};

use course_rbtree::{
    generator::GeneratorConfig,
    loader::{self, LoadReport},
    CatalogError, CourseCatalog,
};

/// Search batch used by `bench` when no `--search` is given.
const DEFAULT_SEARCHES: [&str; 14] = [
    "CSCI100", "CSCI150", "MATH200", "MATH249", "PHYS300", "PHYS349", "CHEM400", "CHEM429",
    "BIO500", "BIO529", "ENGL600", "ENGL619", "HIST700", "HIST719",
];

/// Course catalog backed by a red-black tree.
#[derive(Parser, Debug)]
#[command(name = "course-rbtree", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every course in course-number order.
    List { file: PathBuf },

    /// Print one course and its prerequisites.
    Show { file: PathBuf, number: String },

    /// Time loading, in-order traversal and a batch of searches.
    Bench {
        file: PathBuf,

        /// Course number to search for; repeatable.
        #[arg(long = "search")]
        searches: Vec<String>,
    },

    /// Write a synthetic course file.
    Generate {
        out: PathBuf,

        #[arg(long, default_value = "TEST")]
        prefix: String,

        #[arg(long, default_value_t = 1000)]
        start: u32,

        /// Exclusive.
        #[arg(long, default_value_t = 3000)]
        end: u32,
    },
}

fn load(file: &Path) -> Result<(CourseCatalog, LoadReport), CatalogError> {
    let mut catalog = CourseCatalog::new();
    let report = loader::load_from_path(&mut catalog, file)?;
    for rejected in &report.rejected {
        eprintln!("Error: {}", rejected.error);
    }
    Ok((catalog, report))
}

fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let out = f();
    (out, start.elapsed())
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Command::List { file } => {
            let (catalog, _) = load(&file)?;
            for course in catalog.enumerate() {
                println!("{}", course);
            }
        }
        Command::Show { file, number } => {
            let (catalog, _) = load(&file)?;
            match catalog.search(&number) {
                Some(course) => println!(
                    "Found course: {} | Prerequisites: {}",
                    course,
                    course.prerequisites().join(" ")
                ),
                None => println!("Course not found!"),
            }
        }
        Command::Bench { file, searches } => {
            let (loaded, load_time) = timed(|| load(&file));
            let (catalog, report) = loaded?;
            println!(
                "Loading + insertion time: {:.6} seconds ({} courses)",
                load_time.as_secs_f64(),
                report.loaded
            );

            let (visited, traverse_time) = timed(|| catalog.enumerate().count());
            println!(
                "Traversal time: {:.6} seconds ({} courses)",
                traverse_time.as_secs_f64(),
                visited
            );

            let searches: Vec<String> = if searches.is_empty() {
                DEFAULT_SEARCHES.iter().map(|s| s.to_string()).collect()
            } else {
                searches
            };
            let (found, search_time) =
                timed(|| searches.iter().filter(|s| catalog.contains(s)).count());
            println!(
                "Total search time for {} searches: {:.6} seconds ({} found)",
                searches.len(),
                search_time.as_secs_f64(),
                found
            );

            let tree = catalog.tree();
            let stats = tree.get_stats();
            println!(
                "height {} black-height {:?} rotations {} ({:.3} per insert) recolors {}",
                tree.height(),
                tree.black_height(),
                stats.rotations,
                stats.avg_rotations_per_insert(),
                stats.recolors
            );
        }
        Command::Generate {
            out,
            prefix,
            start,
            end,
        } => {
            let config = GeneratorConfig { prefix, start, end };
            let count = config.write_to_path(&out)?;
            println!("{} has been generated with {} records.", out.display(), count);
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
