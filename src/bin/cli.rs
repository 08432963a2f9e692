//! NASCAR Stats CLI - Command-line views over the snapshot data

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use nascar_stats::data::{
    filter_by_driver, filter_by_entity, list_distinct_entities, truncate_to_race, DriverFilter,
    EntityType, ReferenceTables, SnapshotStore, TrackMatch,
};
use nascar_stats::stats::{
    average, compare_across_periods, compare_to_other_entities, entity_averages, rank_entities,
    rank_of, round_wins, stage_points_percentage, standing_value, sum, Aggregator, Feature,
    SortDirection, StandingsField,
};

/// Default snapshot directory (relative to project root)
const DEFAULT_DATA_DIR: &str = "data";

#[derive(Parser)]
#[command(name = "nascar-stats")]
#[command(author, version, about = "NASCAR Cup Series statistics CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the snapshot data directory
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the points standings as of a race
    Standings {
        /// Season year (default: current season)
        #[arg(short, long)]
        year: Option<i32>,

        /// Race number the standings are taken after (default: latest run)
        #[arg(short, long)]
        race: Option<u32>,
    },

    /// Rank drivers, teams, or manufacturers by a feature average
    Rank {
        /// Feature to rank by (e.g. race_pos, fantasy_points)
        #[arg(short, long)]
        feature: Feature,

        /// Entity kind: driver, team, or manufacturer
        #[arg(short, long, default_value = "driver")]
        entity_type: EntityType,

        /// Season year (default: current season)
        #[arg(short, long)]
        year: Option<i32>,

        /// Force sort direction: asc or desc
        #[arg(long)]
        direction: Option<String>,

        /// Number of rows to show
        #[arg(long, default_value = "10")]
        top: usize,
    },

    /// Season summary for one driver
    Driver {
        /// Driver name, as it appears in the results
        name: String,

        /// Season year (default: current season)
        #[arg(short, long)]
        year: Option<i32>,

        /// Regular-season races only
        #[arg(long)]
        exclude_playoffs: bool,

        /// Finished races only
        #[arg(long)]
        exclude_dnf: bool,
    },

    /// Compare an entity's aggregate against the previous season
    Compare {
        /// Entity name
        name: String,

        /// Entity kind: driver, team, or manufacturer
        #[arg(short, long, default_value = "driver")]
        entity_type: EntityType,

        /// Feature to compare
        #[arg(short, long)]
        feature: Feature,

        /// Aggregate: sum or average
        #[arg(short, long, default_value = "average")]
        aggregator: Aggregator,

        /// Season year (default: current season)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Driver averages at one track across seasons
    Track {
        /// Track name, as it appears in the results
        name: String,

        /// Track matching: exact, similar, or both
        #[arg(short, long, default_value = "exact")]
        mode: TrackMatch,

        /// First season to include
        #[arg(long, default_value = "2016")]
        start_year: i32,

        /// Feature to average (default: race_pos)
        #[arg(short, long, default_value = "race_pos")]
        feature: Feature,

        /// Number of rows to show
        #[arg(long, default_value = "10")]
        top: usize,
    },
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::WARN)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    let cli = Cli::parse();

    println!("{}", "NASCAR Stats CLI".cyan().bold());
    println!();

    let store = SnapshotStore::new(&cli.data_dir);
    let tables = store
        .reference_tables()
        .context("Failed to load reference tables")?;

    match cli.command {
        Commands::Standings { year, race } => {
            show_standings(&store, &tables, year, race)?;
        }
        Commands::Rank {
            feature,
            entity_type,
            year,
            direction,
            top,
        } => {
            let direction = direction
                .as_deref()
                .map(parse_direction)
                .transpose()?;
            show_ranking(&store, &tables, feature, entity_type, year, direction, top)?;
        }
        Commands::Driver {
            name,
            year,
            exclude_playoffs,
            exclude_dnf,
        } => {
            let filter = DriverFilter {
                exclude_playoffs,
                exclude_dnf,
            };
            show_driver(&store, &tables, &name, year, filter)?;
        }
        Commands::Compare {
            name,
            entity_type,
            feature,
            aggregator,
            year,
        } => {
            show_comparison(&store, &tables, &name, entity_type, feature, aggregator, year)?;
        }
        Commands::Track {
            name,
            mode,
            start_year,
            feature,
            top,
        } => {
            show_track(&store, &tables, &name, mode, start_year, feature, top)?;
        }
    }

    Ok(())
}

fn parse_direction(s: &str) -> Result<SortDirection> {
    match s {
        "asc" => Ok(SortDirection::Ascending),
        "desc" => Ok(SortDirection::Descending),
        other => anyhow::bail!("unknown direction: {} (expected asc or desc)", other),
    }
}

/// "-" for missing values, mirroring how the standings pages render them.
fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}", v),
        None => "-".to_string(),
    }
}

fn fmt_delta(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:+.1}%", v),
        None => "-".to_string(),
    }
}

fn loading_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb
}

fn resolve_season(tables: &ReferenceTables, year: Option<i32>) -> i32 {
    year.unwrap_or_else(|| tables.current_season())
}

fn show_standings(
    store: &SnapshotStore,
    tables: &ReferenceTables,
    year: Option<i32>,
    race: Option<u32>,
) -> Result<()> {
    let year = resolve_season(tables, year);
    let today = Local::now().date_naive();
    let race = match race.or_else(|| tables.latest_race_number(year, today)) {
        Some(r) => r,
        None => {
            println!("{}", "No races run yet this season.".yellow());
            return Ok(());
        }
    };

    println!("{}: {} after race {}", "Standings".green(), year, race);
    println!();

    let pb = loading_spinner("Loading standings...");
    let all_rows = store
        .standings(year)
        .with_context(|| format!("Failed to load standings for {}", year))?;
    pb.finish_and_clear();

    // One snapshot row per driver, taken after the requested race.
    let rows: Vec<_> = all_rows
        .iter()
        .filter(|r| r.race_number == Some(race))
        .cloned()
        .collect();
    if rows.is_empty() {
        println!("{}", "No standings snapshot for that race.".yellow());
        return Ok(());
    }

    let mut drivers: Vec<&str> = rows.iter().map(|r| r.driver_name.as_str()).collect();
    drivers.sort_by(|a, b| {
        let points_a = standing_value(&rows, a, StandingsField::SeasonPoints);
        let points_b = standing_value(&rows, b, StandingsField::SeasonPoints);
        points_b
            .partial_cmp(&points_a)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    println!(
        "{:>4} {:<24} {:>8} {:>6} {:>10} {:>6} {:>8}",
        "Pos", "Driver", "Points", "Wins", "Rnd Wins", "Best", "Bubble"
    );
    println!("{}", "-".repeat(72));
    for (i, driver) in drivers.iter().enumerate() {
        println!(
            "{:>4} {:<24} {:>8} {:>6} {:>10} {:>6} {:>8}",
            i + 1,
            driver,
            fmt_opt(standing_value(&rows, driver, StandingsField::SeasonPoints)),
            fmt_opt(standing_value(&rows, driver, StandingsField::Wins)),
            fmt_opt(round_wins(&rows, driver, race)),
            fmt_opt(standing_value(&rows, driver, StandingsField::BestPosition)),
            fmt_opt(standing_value(&rows, driver, StandingsField::PointGapToBubble)),
        );
    }

    Ok(())
}

fn show_ranking(
    store: &SnapshotStore,
    tables: &ReferenceTables,
    feature: Feature,
    entity_type: EntityType,
    year: Option<i32>,
    direction: Option<SortDirection>,
    top: usize,
) -> Result<()> {
    let year = resolve_season(tables, year);

    println!(
        "{}: {} by {} ({})",
        "Ranking".green(),
        entity_type,
        feature,
        year
    );
    println!();

    let pb = loading_spinner("Loading season results...");
    let records = store
        .season_results(year, None)
        .with_context(|| format!("Failed to load results for {}", year))?;
    pb.finish_and_clear();

    let entities = list_distinct_entities(&records, entity_type, tables.eligible_drivers(year));
    if entities.is_empty() {
        println!("{}", "No entities found for this season.".yellow());
        return Ok(());
    }

    let averages = entity_averages(&entities, &records, entity_type, feature);
    let ranked = rank_entities(&entities, &records, entity_type, feature, direction);

    println!("{:>4} {:<28} {:>10}", "Rank", "Name", "Average");
    println!("{}", "-".repeat(44));
    for (i, name) in ranked.iter().take(top).enumerate() {
        println!("{:>4} {:<28} {:>10}", i + 1, name, fmt_opt(averages[name]));
    }

    Ok(())
}

fn show_driver(
    store: &SnapshotStore,
    tables: &ReferenceTables,
    name: &str,
    year: Option<i32>,
    filter: DriverFilter,
) -> Result<()> {
    let year = resolve_season(tables, year);

    println!("{}: {} ({})", "Driver".green(), name, year);
    println!();

    let pb = loading_spinner("Loading season results...");
    let season = store
        .season_results(year, None)
        .with_context(|| format!("Failed to load results for {}", year))?;
    pb.finish_and_clear();

    let races = filter_by_driver(&season, name, filter);
    if races.is_empty() {
        println!("{}", "No races found for this driver.".red());
        return Ok(());
    }
    println!("Races: {}", races.len());
    println!();

    println!("{}", "Season averages:".yellow().bold());
    println!("{:<22} {:>10}", "Feature", "Average");
    println!("{}", "-".repeat(34));
    for feature in [
        Feature::RacePos,
        Feature::QualiPos,
        Feature::AvgPos,
        Feature::FantasyPoints,
        Feature::LapsLed,
        Feature::PassDiff,
        Feature::PctTop15Laps,
    ] {
        println!(
            "{:<22} {:>10}",
            feature.as_str(),
            fmt_opt(average(&races, feature))
        );
    }
    println!();

    println!("{}", "Season totals:".yellow().bold());
    println!("{:<22} {:>10}", "Feature", "Total");
    println!("{}", "-".repeat(34));
    for feature in [
        Feature::RaceFinishPoints,
        Feature::RaceStagePoints,
        Feature::RacePlayoffPoints,
        Feature::LapsLed,
    ] {
        println!(
            "{:<22} {:>10}",
            feature.as_str(),
            fmt_opt(sum(&races, feature))
        );
    }
    println!();

    println!("{}", "Versus the field:".yellow().bold());
    let drivers = list_distinct_entities(&season, EntityType::Driver, tables.eligible_drivers(year));
    let field_size = drivers.len();
    for feature in [Feature::RacePos, Feature::FantasyPoints] {
        let rank = rank_of(&drivers, &season, EntityType::Driver, feature, name);
        let delta = compare_to_other_entities(&season, name, EntityType::Driver, feature);
        println!(
            "{:<22} rank {:>2}/{:<2}  vs field {}",
            feature.as_str(),
            rank,
            field_size,
            fmt_delta(delta)
        );
    }
    match stage_points_percentage(&races) {
        Some(pct) => println!("{:<22} {:.1}% of points from stages", "stage_points_share", pct),
        None => println!("{:<22} -", "stage_points_share"),
    }

    Ok(())
}

fn show_comparison(
    store: &SnapshotStore,
    tables: &ReferenceTables,
    name: &str,
    entity_type: EntityType,
    feature: Feature,
    aggregator: Aggregator,
    year: Option<i32>,
) -> Result<()> {
    let year = resolve_season(tables, year);
    let today = Local::now().date_naive();

    println!(
        "{}: {} {} of {} for {}, {} vs {}",
        "Comparing".green(),
        aggregator,
        feature,
        name,
        entity_type,
        year,
        year - 1
    );
    println!();

    let pb = loading_spinner("Loading seasons...");
    let current = store
        .season_results(year, None)
        .with_context(|| format!("Failed to load results for {}", year))?;
    let previous = store
        .season_results(year - 1, None)
        .with_context(|| format!("Failed to load results for {}", year - 1))?;
    pb.finish_and_clear();

    // A partial season is compared against the same span of the previous one.
    let previous = match tables.latest_race_number(year, today) {
        Some(race) => truncate_to_race(&previous, race),
        None => previous,
    };

    let delta = compare_across_periods(&current, &previous, name, entity_type, feature, aggregator);
    match delta {
        Some(d) if d >= 0.0 => println!("{} {}", fmt_delta(delta).green().bold(), "vs last season"),
        Some(_) => println!("{} {}", fmt_delta(delta).red().bold(), "vs last season"),
        None => println!("{}", "No comparable data for both seasons.".yellow()),
    }

    Ok(())
}

fn show_track(
    store: &SnapshotStore,
    tables: &ReferenceTables,
    name: &str,
    mode: TrackMatch,
    start_year: i32,
    feature: Feature,
    top: usize,
) -> Result<()> {
    let end_year = tables.current_season();

    println!(
        "{}: {} ({} matching, {}-{})",
        "Track".green(),
        name,
        mode,
        start_year,
        end_year
    );
    println!();

    let pb = loading_spinner("Loading track history...");
    let records = store.track_results(
        start_year,
        end_year,
        name,
        mode,
        &tables.track_similarity,
    );
    pb.finish_and_clear();

    if records.is_empty() {
        println!("{}", "No races found at this track.".yellow());
        return Ok(());
    }

    let drivers = list_distinct_entities(&records, EntityType::Driver, None);
    let averages = entity_averages(&drivers, &records, EntityType::Driver, feature);
    let ranked = rank_entities(&drivers, &records, EntityType::Driver, feature, None);

    println!("{:>4} {:<24} {:>10} {:>6}", "Rank", "Driver", feature.as_str(), "Races");
    println!("{}", "-".repeat(48));
    for (i, driver) in ranked.iter().take(top).enumerate() {
        let races = filter_by_entity(&records, EntityType::Driver, driver).len();
        println!(
            "{:>4} {:<24} {:>10} {:>6}",
            i + 1,
            driver,
            fmt_opt(averages[driver]),
            races
        );
    }

    Ok(())
}
