#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use creneaux::{
    io,
    model::Schedule,
    report::{unavailability_flags, ReportRenderer, TextReport},
    staffing::Requirements,
    storage::{JsonStorage, Storage},
    CarryOverPolicy, Scheduler, Settings,
};
use clap::{Args, Parser, Subcommand};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de génération de plannings horaires (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier TOML de paramètres
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

/// Surcharges des paramètres du fichier TOML
#[derive(Args, Debug, Default)]
struct Overrides {
    #[arg(long)]
    open_hour: Option<u8>,
    #[arg(long)]
    close_hour: Option<u8>,
    #[arg(long)]
    max_hours: Option<u32>,
    #[arg(long)]
    max_workers: Option<u32>,
    #[arg(long)]
    full_time: Option<f64>,
    #[arg(long)]
    max_unavailability: Option<u32>,
    /// Maintien d'une heure sur l'autre seulement sous l'effectif minimum
    #[arg(long)]
    strict_carry_over: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Générer le planning
    Generate {
        /// CSV `worker_id,name,work_time,reduced_hours`
        #[arg(long)]
        roster: String,
        /// CSV `worker_id,<date>...`
        #[arg(long)]
        availability: String,
        /// CSV `hour,<date>...` ; sans lui, `max_workers` par créneau
        #[arg(long)]
        staffing: Option<String>,
        /// Graine du tirage pondéré ; tirée au hasard (et affichée) si absente
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
        /// Export CSV du rapport (optionnel)
        #[arg(long)]
        report: Option<String>,
        #[command(flatten)]
        overrides: Overrides,
    },

    /// Vérifier les fichiers d'entrée et les indisponibilités déclarées
    Check {
        #[arg(long)]
        roster: String,
        #[arg(long)]
        availability: String,
        #[arg(long)]
        staffing: Option<String>,
        #[command(flatten)]
        overrides: Overrides,
    },

    /// Afficher un planning JSON déjà généré
    Show {
        #[arg(long)]
        schedule: String,
    },
}

fn load_settings(path: Option<&str>, overrides: &Overrides) -> Result<Settings> {
    let mut settings = match path {
        Some(p) => Settings::load(p).with_context(|| format!("loading settings {p}"))?,
        None => Settings::default(),
    };
    if let Some(v) = overrides.open_hour {
        settings.open_hour = v;
    }
    if let Some(v) = overrides.close_hour {
        settings.close_hour = v;
    }
    if let Some(v) = overrides.max_hours {
        settings.max_hours = v;
    }
    if let Some(v) = overrides.max_workers {
        settings.max_workers = v;
    }
    if let Some(v) = overrides.full_time {
        settings.full_time = v;
    }
    if let Some(v) = overrides.max_unavailability {
        settings.max_unavailability = v;
    }
    if overrides.strict_carry_over {
        settings.carry_over = CarryOverPolicy::Strict;
    }
    settings.validate()?;
    Ok(settings)
}

fn load_requirements(staffing: Option<&str>, settings: &Settings) -> Result<Requirements> {
    Ok(match staffing {
        Some(path) => Requirements::Table(io::import_staffing_csv(path)?),
        None => {
            tracing::warn!(
                max_workers = settings.max_workers,
                "no staffing table, using uniform headcount"
            );
            Requirements::Uniform(settings.max_workers)
        }
    })
}

fn print_schedule(schedule: &Schedule) {
    for day in &schedule.days {
        for slot in &day.slots {
            let workers = slot
                .worker_ids()
                .map(|id| id.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            println!(
                "{} | {:02}:00 | {}/{} | {}",
                day.day,
                slot.hour,
                slot.headcount(),
                slot.required,
                if workers.is_empty() { "-" } else { workers.as_str() }
            );
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let code = match cli.cmd {
        Commands::Generate {
            roster,
            availability,
            staffing,
            seed,
            out_json,
            out_csv,
            report,
            overrides,
        } => {
            let settings = load_settings(cli.config.as_deref(), &overrides)?;
            let roster = io::import_roster_csv(&roster)
                .with_context(|| format!("importing roster {roster}"))?;
            let availability = io::import_availability_csv(&availability, &roster, &settings)?;
            let requirements = load_requirements(staffing.as_deref(), &settings)?;

            let seed = seed.unwrap_or_else(rand::random);
            eprintln!("seed: {seed}");

            let scheduler = Scheduler::new(roster, settings)?;
            let run = scheduler.schedule_seeded(&availability, &requirements, seed)?;

            if let Some(path) = out_json {
                JsonStorage::open(path)?.save(&run.schedule)?;
            }
            if let Some(path) = out_csv {
                io::export_schedule_csv(path, &run.schedule)?;
            }
            if let Some(path) = report {
                io::export_report_csv(path, &run.report)?;
            }

            print_schedule(&run.schedule);
            println!();
            print!("{}", TextReport.render(&run.report));

            // Code 2 = WARNING/INCOMPLETE
            if run.report.has_understaffing() {
                2
            } else {
                0
            }
        }
        Commands::Check {
            roster,
            availability,
            staffing,
            overrides,
        } => {
            let settings = load_settings(cli.config.as_deref(), &overrides)?;
            let roster = io::import_roster_csv(&roster)
                .with_context(|| format!("importing roster {roster}"))?;
            let availability = io::import_availability_csv(&availability, &roster, &settings)?;
            load_requirements(staffing.as_deref(), &settings)?
                .ensure_covers(availability.days(), settings.business_hours())?;

            let flags = unavailability_flags(&roster, &availability, &settings);
            if flags.is_empty() {
                println!("OK: {} worker(s), {} day(s)", roster.len(), availability.days().len());
                0
            } else {
                eprintln!(
                    "Following workers declared more than {} unavailable day(s):",
                    settings.max_unavailability
                );
                for flag in &flags {
                    eprintln!("  - {flag}");
                }
                2
            }
        }
        Commands::Show { schedule } => {
            let schedule = JsonStorage::open(&schedule)?.load()?;
            print_schedule(&schedule);
            0
        }
    };

    std::process::exit(code);
}
