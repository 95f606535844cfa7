//! Qimen CLI
//!
//! Usage:
//!   qimen --date 2024-06-21T12:00 --query "career opportunity"
//!   qimen --date "2024-06-21 12:00" --longitude 116.4 --query "will we marry" --gender female
//!   qimen --date 2024-06-21T12:00 --query "exam results" --birth-date 1990-08-15 --json

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use colored::Colorize;

use qimen::core::{EngineContext, QimenEngine};
use qimen::types::{
    CalendarMoment, Displacement, EngineConfig, EngineResult, Gender, Palace, Polarity, Profile,
    Reading, ReadingRequest,
};
use qimen::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "qimen",
    version = VERSION,
    about = "Qimen Dunjia plate engine - cast a plate for a moment and read a question against it",
    long_about = "Casts the Ground and Heaven plates for a civil moment, matches the\n\
                  classical patterns, scores the subjects a question is about and\n\
                  folds everything into a probability and a timing bucket.\n\n\
                  Times are civil times at the configured UTC offset (default +8).\n\
                  Passing --longitude shifts the day and hour pillars to local\n\
                  mean solar time."
)]
struct Args {
    /// Moment of the question (YYYY-MM-DDTHH:MM[:SS])
    #[arg(short, long)]
    date: String,

    /// Observer longitude in degrees east (negative for west)
    #[arg(long, allow_hyphen_values = true)]
    longitude: Option<f64>,

    /// The question
    #[arg(short, long)]
    query: String,

    /// Gender of the person asking (picks the partner marker)
    #[arg(long, value_enum)]
    gender: Option<GenderArg>,

    /// Birth date of the person asking (YYYY-MM-DD)
    #[arg(long)]
    birth_date: Option<NaiveDate>,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output the full reading as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Debug logging to stderr
    #[arg(long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GenderArg {
    Male,
    Female,
}

impl From<GenderArg> for Gender {
    fn from(arg: GenderArg) -> Self {
        match arg {
            GenderArg::Male => Gender::Male,
            GenderArg::Female => Gender::Female,
        }
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);
    if args.no_color {
        colored::control::set_override(false);
    }

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> EngineResult<()> {
    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let context = EngineContext::new(config)?;

    let moment = CalendarMoment::parse(&args.date, args.longitude)?;
    let mut request = ReadingRequest::new(moment, args.query.clone());
    if args.gender.is_some() || args.birth_date.is_some() {
        request = request.with_profile(Profile {
            gender: args.gender.map(Gender::from),
            reference_date: args.birth_date,
        });
    }

    let reading = QimenEngine::new(&context).read(&request)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reading)?);
    } else {
        print_reading(&reading);
    }
    Ok(())
}

/// Print the whole reading for a terminal
fn print_reading(reading: &Reading) {
    let pillars = &reading.pillars;
    let term = &reading.solar_term;

    println!();
    println!(
        "{}",
        format!("Qimen reading for {}", reading.moment.civil.format("%Y-%m-%d %H:%M")).bold()
    );
    println!(
        "  Pillars  {} {} {} {}   ({} {} {} {})",
        pillars.year,
        pillars.month.resolved,
        pillars.day,
        pillars.hour,
        pillars.year.hanzi(),
        pillars.month.resolved.hanzi(),
        pillars.day.hanzi(),
        pillars.hour.hanzi()
    );
    if pillars.month.past_term_crossing {
        println!("           month past {} crossing (civil month gives {})", term.term, pillars.month.naive);
    }
    println!(
        "  Term     {} {}  since {}  yuan {}{}",
        term.term,
        term.term.hanzi(),
        term.crossing.format("%Y-%m-%d %H:%M"),
        term.yuan.number(),
        if term.approximate { " (approximate)" } else { "" }
    );
    let void = pillars.hour_void();
    println!("  Cycle    {}   hour void {} {}", reading.cycle, void[0], void[1]);
    println!();

    print_plate(reading);
    println!();

    if reading.matches.is_empty() {
        println!("{}", "No patterns".dimmed());
    } else {
        println!("{}", "Patterns".bold());
        for m in &reading.matches {
            let line = format!("  {:+4}  {:<32} {}", m.magnitude, m.name, m.palace);
            match m.polarity {
                Polarity::Auspicious => println!("{}", line.green()),
                Polarity::Inauspicious => println!("{}", line.red()),
            }
        }
    }
    println!();

    println!("{} ({})", "Subjects".bold(), reading.subjects.intent);
    for s in &reading.subjects.scores {
        let place = match (s.layer, s.palace) {
            (Some(layer), Some(palace)) => format!("{:?} {}", layer, palace),
            _ => "not on plate".to_string(),
        };
        println!(
            "  {:<10} {:<18} {:<14} season {:+3}  palace {:+3}  hour {:+3}  = {:+}",
            s.subject,
            s.marker.to_string(),
            place,
            s.seasonal,
            s.palace_relation,
            s.hour_relation,
            s.total
        );
    }
    println!();

    println!("{}", reading.outcome.to_terminal_string());

    for advisory in &reading.advisories {
        println!("{}", format!("  ! {}", advisory).yellow());
    }
    if reading.degraded {
        println!("{}", "  reading is degraded".yellow().bold());
    }
    println!();
}

const CELL_WIDTH: usize = 18;

/// 3x3 grid, south on top; heaven/ground stems, star, door, guardian per cell
fn print_plate(reading: &Reading) {
    let plate = &reading.plate;
    let border = format!("+{}", format!("{}+", "-".repeat(CELL_WIDTH)).repeat(3));

    println!("{}", border);
    for row in Palace::GRID {
        let cells: Vec<[String; 5]> = row.iter().map(|p| cell_lines(reading, *p)).collect();
        for line in 0..5 {
            let mut out = String::from("|");
            for (palace, cell) in row.iter().zip(&cells) {
                let text = format!("{:<width$}", cell[line], width = CELL_WIDTH);
                let text = if *palace == plate.hour_palace {
                    text.cyan().bold().to_string()
                } else if line == 0 {
                    text.bold().to_string()
                } else {
                    text
                };
                out.push_str(&text);
                out.push('|');
            }
            println!("{}", out);
        }
        println!("{}", border);
    }
}

fn cell_lines(reading: &Reading, palace: Palace) -> [String; 5] {
    let plate = &reading.plate;
    let heaven = plate.heaven.get(palace);
    let ground = plate.ground.get(palace);
    let moved = match plate.displacement_at(palace) {
        Displacement::Unmoved => "",
        Displacement::Opposite => " <>",
        Displacement::Small | Displacement::Large => " ~",
    };
    [
        format!(" {} {}{}", palace, palace.direction(), moved),
        format!(" {} / {}", heaven.stem, ground.stem),
        format!(" {}", heaven.star),
        format!(" {}", heaven.door.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())),
        format!(" {}", heaven.guardian.map(|g| g.to_string()).unwrap_or_else(|| "-".to_string())),
    ]
}
