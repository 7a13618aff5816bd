#![forbid(unsafe_code)]
use anyhow::{bail, Context, Result};
use carerota::{
    index_preferences, io,
    model::Staff,
    scheduler::{validate_all, validate_preferences, GenerationRequest, Generator, Severity},
    storage::{JsonRuleStorage, RuleStorage},
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de génération et de contrôle des plannings de postes
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON de règles
    #[arg(long, global = true, default_value = "rule.json")]
    rule: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Écrire un fichier de règles (valeurs par défaut, surchargeables)
    InitRule {
        #[arg(long)]
        max_consecutive_days: Option<u32>,
        #[arg(long)]
        off_days_after_night: Option<u32>,
        #[arg(long)]
        weekend_staff_count: Option<u32>,
        #[arg(long)]
        night_shift_ratio: Option<u8>,
    },

    /// Générer un planning sur une période
    Generate {
        /// CSV `id,name,position[,status]`
        #[arg(long)]
        staff: String,
        /// YYYY-MM-DD
        #[arg(long)]
        start: String,
        /// YYYY-MM-DD (inclus)
        #[arg(long)]
        end: String,
        #[arg(long, default_value = "")]
        building: String,
        #[arg(long, default_value = "")]
        floor: String,
        /// Tableau JSON de préférences
        #[arg(long)]
        preferences: Option<String>,
        /// Graine pour une génération reproductible
        #[arg(long)]
        seed: Option<u64>,
        /// Inclure le personnel non actif
        #[arg(long)]
        include_inactive: bool,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Contrôler un planning existant
    Validate {
        #[arg(long)]
        staff: String,
        /// CSV `staff_id,date,work_type[,...]`
        #[arg(long)]
        schedules: String,
        #[arg(long)]
        preferences: Option<String>,
        /// Export CSV des violations (optionnel)
        #[arg(long)]
        report: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = JsonRuleStorage::open(&cli.rule)?;

    let code = match cli.cmd {
        Commands::InitRule {
            max_consecutive_days,
            off_days_after_night,
            weekend_staff_count,
            night_shift_ratio,
        } => {
            let mut rule = storage.load_or_default()?;
            if let Some(days) = max_consecutive_days {
                rule = rule.with_max_consecutive_days(days);
            }
            if let Some(days) = off_days_after_night {
                rule = rule.with_off_days_after_night(days);
            }
            if let Some(count) = weekend_staff_count {
                rule = rule.with_weekend_staff_count(count);
            }
            if let Some(ratio) = night_shift_ratio {
                rule = rule.with_night_shift_ratio(ratio);
            }
            storage.save(&rule)?;
            println!("rule written to {}", storage.path().display());
            0
        }
        Commands::Generate {
            staff,
            start,
            end,
            building,
            floor,
            preferences,
            seed,
            include_inactive,
            out_json,
            out_csv,
        } => {
            let rule = storage.load_or_default()?;
            let mut roster = io::import_staff_csv(staff)?;
            if !include_inactive {
                roster.retain(Staff::is_active);
            }
            if roster.is_empty() {
                bail!("no active staff in roster");
            }
            let prefs = match preferences {
                Some(path) => Some(index_preferences(io::import_preferences_json(path)?)),
                None => None,
            };

            let mut req =
                GenerationRequest::new(&rule, &roster, parse_date(&start)?, parse_date(&end)?)
                    .with_location(&building, &floor);
            if let Some(prefs) = prefs.as_ref() {
                req = req.with_preferences(prefs);
            }
            let result = match seed {
                Some(seed) => Generator::with_seed(seed).generate(&req)?,
                None => Generator::from_entropy().generate(&req)?,
            };

            if let Some(path) = out_json {
                io::export_result_json(path, &result)?;
            }
            if let Some(path) = out_csv {
                io::export_schedules_csv(path, &result.schedules)?;
            }

            for (id, stats) in &result.statistics.by_staff {
                println!(
                    "{} | work {} | hours {} | nights {} | weekends {}",
                    id, stats.work_days, stats.total_hours, stats.night_count, stats.weekend_count
                );
            }
            println!(
                "schedules: {} | violations: {} (hard {}) | score: {}",
                result.statistics.total_schedules,
                result.violations.len(),
                result.hard_violations().count(),
                result.score
            );
            0
        }
        Commands::Validate {
            staff,
            schedules,
            preferences,
            report,
        } => {
            let rule = storage.load_or_default()?;
            let roster = io::import_staff_csv(staff)?;
            let schedules = io::import_schedules_csv(schedules)?;
            let mut violations = validate_all(&schedules, &rule, &roster);
            if let Some(path) = preferences {
                let prefs = index_preferences(io::import_preferences_json(path)?);
                violations.extend(validate_preferences(&schedules, &prefs));
            }

            if violations.is_empty() {
                println!("OK: no violations");
                0
            } else {
                let hard = violations
                    .iter()
                    .filter(|v| v.severity == Severity::Hard)
                    .count();
                eprintln!("Found {} violation(s), {} hard", violations.len(), hard);
                for v in &violations {
                    eprintln!(
                        "{} | {} | {} | {} | {}",
                        v.severity.as_str(),
                        v.staff_id,
                        v.date,
                        v.rule.as_str(),
                        v.message
                    );
                }
                if let Some(path) = report {
                    io::export_violations_csv(path, &violations)?;
                }
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
    };

    std::process::exit(code);
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").with_context(|| format!("invalid date: {raw}"))
}
