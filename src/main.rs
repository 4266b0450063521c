use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{Duration, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod db;
mod ingest;
mod models;
mod mood;
mod prediction;
mod report;
mod sentiment;
mod space_weather;
mod stats;
mod trends;

use prediction::TrainOutcome;
use sentiment::SentimentAnalyzer;

#[derive(Parser)]
#[command(name = "cosmic-mood")]
#[command(about = "Daily collective-mood tracker correlating text sentiment with space weather", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load fixed sample data for local runs
    Seed,
    /// Import short posts from a CSV file and aggregate daily sentiment
    ImportTweets {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Train the correlation model from history and predict a day's mood
    Predict {
        #[arg(long, default_value_t = 90)]
        days: i64,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Combine trend and space-weather signals into a daily mood judgment
    Judge {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Generate a markdown report for a day
    Report {
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to a production Postgres instance")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")?;

    match cli.command {
        Commands::InitDb => {
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            let analyzer = SentimentAnalyzer::default();
            db::seed(&pool, &analyzer).await?;
            println!("Seed data inserted.");
        }
        Commands::ImportTweets { csv } => {
            import_tweets(&pool, &csv).await?;
        }
        Commands::Predict { days, date } => {
            let target = date.unwrap_or_else(today);
            predict(&pool, days, target).await?;
        }
        Commands::Judge { date } => {
            let target = date.unwrap_or_else(today);
            judge(&pool, target).await?;
        }
        Commands::Report { date, out } => {
            let target = date.unwrap_or_else(today);
            write_report(&pool, target, &out).await?;
        }
    }

    Ok(())
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

async fn import_tweets(pool: &PgPool, csv: &Path) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(csv)
        .with_context(|| format!("failed to read {}", csv.display()))?;
    let records = ingest::parse_tweet_csv(&content)?;

    if records.is_empty() {
        println!("No valid posts found in {}.", csv.display());
        return Ok(());
    }

    let analyzer = SentimentAnalyzer::default();
    let mut on_progress = |done: usize, total: usize| println!("analyzed {done}/{total} posts");
    let days = ingest::aggregate_daily_sentiment(&analyzer, &records, Some(&mut on_progress));

    for day in &days {
        db::upsert_daily_sentiment(pool, day).await?;
    }
    println!(
        "Imported {} posts across {} days from {}.",
        records.len(),
        days.len(),
        csv.display()
    );
    Ok(())
}

async fn predict(pool: &PgPool, days: i64, target: NaiveDate) -> anyhow::Result<()> {
    let start = target - Duration::days(days.max(1) - 1);
    let sentiments = db::fetch_daily_sentiment(pool, Some(start), Some(target)).await?;
    let weather = db::fetch_space_weather(pool, Some(start), Some(target)).await?;
    let samples = prediction::build_training_samples(&sentiments, &weather);
    info!(
        window_days = days,
        joined = samples.len(),
        "built training set"
    );

    let observation = db::fetch_space_weather_by_date(pool, target).await?;
    match prediction::train_and_predict(&samples, target, observation.as_ref()) {
        TrainOutcome::NotEnoughTrainingData { training_size } => {
            println!(
                "Not enough training data: {training_size} joined days (need {}).",
                prediction::MIN_TRAINING_SAMPLES
            );
        }
        TrainOutcome::NoSpaceWeather { date } => {
            println!("No space weather observation stored for {date}.");
        }
        TrainOutcome::Predicted {
            training_size,
            prediction: result,
        } => {
            db::insert_prediction(pool, target, &result, prediction::MODEL_VERSION).await?;
            println!(
                "Predicted mood for {target}: {:.3} (confidence {:.2}, {training_size} training days)",
                result.predicted_score, result.confidence
            );
            println!("- kp index impact {:.4}", result.factors.kp_index);
            println!("- solar flare impact {:.4}", result.factors.solar_flares);
            println!("- recent trend impact {:.4}", result.factors.historical_trend);
        }
    }
    Ok(())
}

async fn judge(pool: &PgPool, target: NaiveDate) -> anyhow::Result<()> {
    let analyzer = SentimentAnalyzer::default();

    let google_rows = db::fetch_google_trends_by_date(pool, target).await?;
    let mut twitter_rows = db::fetch_twitter_trends_by_date(pool, target).await?;
    if twitter_rows.is_empty() {
        let (rows, _) = trends::analyze_trend_keywords(
            &analyzer,
            &trends::sample_trend_keywords(),
            target,
            "JP",
        );
        for row in &rows {
            db::upsert_twitter_trend(pool, row).await?;
        }
        info!(count = rows.len(), "no stored social trends; scored sample keywords");
        twitter_rows = rows;
    }

    let google = trends::search_trend_signal(&google_rows);
    let twitter = trends::social_trend_signal(&twitter_rows);

    let space = match db::fetch_space_weather_by_date(pool, target).await? {
        Some(observation) => {
            let kp_index = observation.kp_index_max.unwrap_or(0.0);
            let flare_count = observation.flare_count();
            mood::SpaceSignal {
                kp_index,
                flare_count,
                impact: mood::space_weather_impact(kp_index, flare_count),
            }
        }
        None => mood::SpaceSignal::default(),
    };

    let snapshot = mood::TrendSnapshot {
        google,
        twitter,
        space,
    };
    let result = mood::judge_daily_mood(&snapshot);
    db::upsert_mood_judgment(pool, target, &result).await?;

    println!(
        "Mood for {target}: {} (score {:.3}, confidence {:.2})",
        result.judgment.as_str(),
        result.score,
        result.confidence
    );
    println!(
        "- breakdown: search {:.3} / social {:.3} / space {:.3}",
        result.breakdown.google, result.breakdown.twitter, result.breakdown.space
    );
    println!(
        "- blended social signal {:.3}",
        mood::blended_social_signal(
            twitter.positive_trends,
            twitter.negative_trends,
            twitter.average_sentiment
        )
    );
    println!("{}", result.explanation);
    Ok(())
}

async fn write_report(pool: &PgPool, target: NaiveDate, out: &Path) -> anyhow::Result<()> {
    let history_start = target - Duration::days(13);
    let sentiment = db::fetch_daily_sentiment_by_date(pool, target).await?;
    let history = db::fetch_daily_sentiment(pool, Some(history_start), Some(target)).await?;
    let weather = db::fetch_space_weather_by_date(pool, target).await?;
    let stored_prediction = db::fetch_latest_prediction(pool, target).await?;
    let judgment = db::fetch_mood_judgment(pool, target).await?;

    let markdown = report::build_report(
        target,
        sentiment.as_ref(),
        &history,
        weather.as_ref(),
        stored_prediction.as_ref(),
        judgment.as_ref(),
    );
    std::fs::write(out, markdown)
        .with_context(|| format!("failed to write {}", out.display()))?;
    println!("Report written to {}.", out.display());
    Ok(())
}
