use anyhow::Context;
use chrono::NaiveDate;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{
    DailySentiment, GoogleTrendRow, MoodCategory, MoodJudgmentRecord, SpaceWeatherDaily,
    StoredPrediction, TrendCategory, TwitterTrendRow,
};
use crate::mood::MoodJudgmentResult;
use crate::prediction::Prediction;
use crate::sentiment::SentimentAnalyzer;
use crate::space_weather;
use crate::trends;

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn seed(pool: &PgPool, analyzer: &SentimentAnalyzer) -> anyhow::Result<()> {
    let sentiments = vec![
        (20, 0.24, 180, 80, 30, 70),
        (21, 0.18, 210, 85, 45, 80),
        (22, 0.05, 195, 60, 55, 80),
        (23, -0.12, 240, 50, 95, 95),
        (24, -0.31, 260, 40, 130, 90),
        (25, -0.08, 205, 55, 75, 75),
        (26, 0.11, 190, 70, 45, 75),
        (27, 0.19, 175, 75, 35, 65),
        (28, 0.07, 220, 68, 60, 92),
        (29, 0.14, 200, 74, 48, 78),
    ];

    for (day, score, count, positive, negative, neutral) in sentiments {
        let record = DailySentiment {
            date: seed_date(day)?,
            average_score: score,
            tweet_count: count,
            positive_count: positive,
            negative_count: negative,
            neutral_count: neutral,
        };
        upsert_daily_sentiment(pool, &record).await?;
    }

    let observations = vec![
        (20, 2.3, 0, 0, 360.0, Some(3.2)),
        (21, 3.1, 0, 1, 410.0, Some(5.0)),
        (22, 4.0, 0, 2, 455.0, Some(12.0)),
        (23, 5.2, 1, 3, 520.0, Some(45.0)),
        (24, 6.7, 1, 4, 610.0, Some(150.0)),
        (25, 4.4, 0, 2, 505.0, Some(30.0)),
        (26, 3.0, 0, 1, 430.0, Some(8.0)),
        (27, 2.1, 0, 0, 390.0, Some(4.1)),
        (28, 2.9, 0, 0, 370.0, None),
        (29, 3.3, 0, 1, 415.0, Some(6.5)),
    ];

    for (day, kp, x_flares, m_flares, wind, flux) in observations {
        let record = SpaceWeatherDaily {
            date: seed_date(day)?,
            kp_index_max: Some(kp),
            x_class_flare_count: x_flares,
            m_class_flare_count: m_flares,
            solar_wind_speed: Some(wind),
            proton_flux: flux,
            solar_radiation_scale: flux
                .map(space_weather::solar_radiation_scale)
                .unwrap_or(0),
        };
        upsert_space_weather(pool, &record).await?;
    }

    let trend_date = seed_date(29)?;
    let keywords = [
        ("幸せ", 72),
        ("楽しい", 64),
        ("happy", 58),
        ("良い", 61),
        ("不安", 70),
        ("ストレス", 66),
        ("最悪", 33),
        ("天気", 88),
    ];
    for (keyword, score) in keywords {
        let row = GoogleTrendRow {
            date: trend_date,
            keyword: keyword.to_string(),
            score,
            region: "JP".to_string(),
            category: trends::categorize_keyword(keyword),
        };
        upsert_google_trend(pool, &row).await?;
    }

    let (twitter_rows, _) = trends::analyze_trend_keywords(
        analyzer,
        &trends::sample_trend_keywords(),
        trend_date,
        "JP",
    );
    for row in &twitter_rows {
        upsert_twitter_trend(pool, row).await?;
    }

    Ok(())
}

fn seed_date(day: u32) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(2026, 7, day).context("invalid seed date")
}

pub async fn upsert_daily_sentiment(pool: &PgPool, record: &DailySentiment) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO cosmic_mood.daily_sentiment
        (date, average_score, tweet_count, positive_count, negative_count, neutral_count)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (date) DO UPDATE
        SET average_score = EXCLUDED.average_score,
            tweet_count = EXCLUDED.tweet_count,
            positive_count = EXCLUDED.positive_count,
            negative_count = EXCLUDED.negative_count,
            neutral_count = EXCLUDED.neutral_count,
            updated_at = now()
        "#,
    )
    .bind(record.date)
    .bind(record.average_score)
    .bind(record.tweet_count)
    .bind(record.positive_count)
    .bind(record.negative_count)
    .bind(record.neutral_count)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn fetch_daily_sentiment(
    pool: &PgPool,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> anyhow::Result<Vec<DailySentiment>> {
    let mut query = String::from(
        "SELECT date, average_score, tweet_count, positive_count, negative_count, neutral_count \
         FROM cosmic_mood.daily_sentiment",
    );
    append_date_range(&mut query, start.is_some(), end.is_some());
    query.push_str(" ORDER BY date");

    let mut rows = sqlx::query(&query);
    if let Some(value) = start {
        rows = rows.bind(value);
    }
    if let Some(value) = end {
        rows = rows.bind(value);
    }

    let records = rows.fetch_all(pool).await?;
    Ok(records.iter().map(sentiment_from_row).collect())
}

pub async fn fetch_daily_sentiment_by_date(
    pool: &PgPool,
    date: NaiveDate,
) -> anyhow::Result<Option<DailySentiment>> {
    let row = sqlx::query(
        "SELECT date, average_score, tweet_count, positive_count, negative_count, neutral_count \
         FROM cosmic_mood.daily_sentiment WHERE date = $1",
    )
    .bind(date)
    .fetch_optional(pool)
    .await?;
    Ok(row.as_ref().map(sentiment_from_row))
}

fn sentiment_from_row(row: &sqlx::postgres::PgRow) -> DailySentiment {
    DailySentiment {
        date: row.get("date"),
        average_score: row.get("average_score"),
        tweet_count: row.get("tweet_count"),
        positive_count: row.get("positive_count"),
        negative_count: row.get("negative_count"),
        neutral_count: row.get("neutral_count"),
    }
}

pub async fn upsert_space_weather(pool: &PgPool, record: &SpaceWeatherDaily) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO cosmic_mood.space_weather
        (date, kp_index_max, x_class_flare_count, m_class_flare_count,
         solar_wind_speed, proton_flux, solar_radiation_scale)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (date) DO UPDATE
        SET kp_index_max = EXCLUDED.kp_index_max,
            x_class_flare_count = EXCLUDED.x_class_flare_count,
            m_class_flare_count = EXCLUDED.m_class_flare_count,
            solar_wind_speed = EXCLUDED.solar_wind_speed,
            proton_flux = EXCLUDED.proton_flux,
            solar_radiation_scale = EXCLUDED.solar_radiation_scale,
            updated_at = now()
        "#,
    )
    .bind(record.date)
    .bind(record.kp_index_max)
    .bind(record.x_class_flare_count)
    .bind(record.m_class_flare_count)
    .bind(record.solar_wind_speed)
    .bind(record.proton_flux)
    .bind(record.solar_radiation_scale)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn fetch_space_weather(
    pool: &PgPool,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> anyhow::Result<Vec<SpaceWeatherDaily>> {
    let mut query = String::from(
        "SELECT date, kp_index_max, x_class_flare_count, m_class_flare_count, \
         solar_wind_speed, proton_flux, solar_radiation_scale \
         FROM cosmic_mood.space_weather",
    );
    append_date_range(&mut query, start.is_some(), end.is_some());
    query.push_str(" ORDER BY date");

    let mut rows = sqlx::query(&query);
    if let Some(value) = start {
        rows = rows.bind(value);
    }
    if let Some(value) = end {
        rows = rows.bind(value);
    }

    let records = rows.fetch_all(pool).await?;
    Ok(records.iter().map(weather_from_row).collect())
}

pub async fn fetch_space_weather_by_date(
    pool: &PgPool,
    date: NaiveDate,
) -> anyhow::Result<Option<SpaceWeatherDaily>> {
    let row = sqlx::query(
        "SELECT date, kp_index_max, x_class_flare_count, m_class_flare_count, \
         solar_wind_speed, proton_flux, solar_radiation_scale \
         FROM cosmic_mood.space_weather WHERE date = $1",
    )
    .bind(date)
    .fetch_optional(pool)
    .await?;
    Ok(row.as_ref().map(weather_from_row))
}

fn weather_from_row(row: &sqlx::postgres::PgRow) -> SpaceWeatherDaily {
    SpaceWeatherDaily {
        date: row.get("date"),
        kp_index_max: row.get("kp_index_max"),
        x_class_flare_count: row.get("x_class_flare_count"),
        m_class_flare_count: row.get("m_class_flare_count"),
        solar_wind_speed: row.get("solar_wind_speed"),
        proton_flux: row.get("proton_flux"),
        solar_radiation_scale: row.get("solar_radiation_scale"),
    }
}

pub async fn insert_prediction(
    pool: &PgPool,
    date: NaiveDate,
    prediction: &Prediction,
    model_version: &str,
) -> anyhow::Result<()> {
    let factors =
        serde_json::to_value(prediction.factors).context("failed to serialize factors")?;
    sqlx::query(
        r#"
        INSERT INTO cosmic_mood.predictions
        (id, date, predicted_score, confidence, factors, model_version)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(date)
    .bind(prediction.predicted_score)
    .bind(prediction.confidence)
    .bind(factors)
    .bind(model_version)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn fetch_latest_prediction(
    pool: &PgPool,
    date: NaiveDate,
) -> anyhow::Result<Option<StoredPrediction>> {
    let row = sqlx::query(
        "SELECT date, predicted_score, confidence, factors, model_version \
         FROM cosmic_mood.predictions WHERE date = $1 \
         ORDER BY created_at DESC LIMIT 1",
    )
    .bind(date)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };
    let factors = serde_json::from_value(row.get("factors"))
        .context("failed to deserialize prediction factors")?;
    Ok(Some(StoredPrediction {
        date: row.get("date"),
        predicted_score: row.get("predicted_score"),
        confidence: row.get("confidence"),
        factors,
        model_version: row.get("model_version"),
    }))
}

pub async fn upsert_google_trend(pool: &PgPool, row: &GoogleTrendRow) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO cosmic_mood.google_trends
        (id, date, keyword, score, region, category)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (date, keyword) DO UPDATE
        SET score = EXCLUDED.score,
            region = EXCLUDED.region,
            category = EXCLUDED.category
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(row.date)
    .bind(&row.keyword)
    .bind(row.score)
    .bind(&row.region)
    .bind(row.category.as_str())
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn fetch_google_trends_by_date(
    pool: &PgPool,
    date: NaiveDate,
) -> anyhow::Result<Vec<GoogleTrendRow>> {
    let rows = sqlx::query(
        "SELECT date, keyword, score, region, category \
         FROM cosmic_mood.google_trends WHERE date = $1 ORDER BY keyword",
    )
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| GoogleTrendRow {
            date: row.get("date"),
            keyword: row.get("keyword"),
            score: row.get("score"),
            region: row.get("region"),
            category: TrendCategory::from_label(row.get("category")),
        })
        .collect())
}

pub async fn upsert_twitter_trend(pool: &PgPool, row: &TwitterTrendRow) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO cosmic_mood.twitter_trends
        (id, date, keyword, tweet_volume, sentiment_score, region)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (date, keyword) DO UPDATE
        SET tweet_volume = EXCLUDED.tweet_volume,
            sentiment_score = EXCLUDED.sentiment_score,
            region = EXCLUDED.region
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(row.date)
    .bind(&row.keyword)
    .bind(row.tweet_volume)
    .bind(row.sentiment_score)
    .bind(&row.region)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn fetch_twitter_trends_by_date(
    pool: &PgPool,
    date: NaiveDate,
) -> anyhow::Result<Vec<TwitterTrendRow>> {
    let rows = sqlx::query(
        "SELECT date, keyword, tweet_volume, sentiment_score, region \
         FROM cosmic_mood.twitter_trends WHERE date = $1 ORDER BY keyword",
    )
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| TwitterTrendRow {
            date: row.get("date"),
            keyword: row.get("keyword"),
            tweet_volume: row.get("tweet_volume"),
            sentiment_score: row.get("sentiment_score"),
            region: row.get("region"),
        })
        .collect())
}

pub async fn upsert_mood_judgment(
    pool: &PgPool,
    date: NaiveDate,
    result: &MoodJudgmentResult,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO cosmic_mood.mood_judgments
        (date, judgment, score, confidence, google_score, twitter_score, space_score, explanation)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (date) DO UPDATE
        SET judgment = EXCLUDED.judgment,
            score = EXCLUDED.score,
            confidence = EXCLUDED.confidence,
            google_score = EXCLUDED.google_score,
            twitter_score = EXCLUDED.twitter_score,
            space_score = EXCLUDED.space_score,
            explanation = EXCLUDED.explanation,
            updated_at = now()
        "#,
    )
    .bind(date)
    .bind(result.judgment.as_str())
    .bind(result.score)
    .bind(result.confidence)
    .bind(result.breakdown.google)
    .bind(result.breakdown.twitter)
    .bind(result.breakdown.space)
    .bind(&result.explanation)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn fetch_mood_judgment(
    pool: &PgPool,
    date: NaiveDate,
) -> anyhow::Result<Option<MoodJudgmentRecord>> {
    let row = sqlx::query(
        "SELECT date, judgment, score, confidence, google_score, twitter_score, \
         space_score, explanation \
         FROM cosmic_mood.mood_judgments WHERE date = $1",
    )
    .bind(date)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| MoodJudgmentRecord {
        date: row.get("date"),
        judgment: MoodCategory::from_label(row.get("judgment")),
        score: row.get("score"),
        confidence: row.get("confidence"),
        google_score: row.get("google_score"),
        twitter_score: row.get("twitter_score"),
        space_score: row.get("space_score"),
        explanation: row.get("explanation"),
    }))
}

fn append_date_range(query: &mut String, has_start: bool, has_end: bool) {
    match (has_start, has_end) {
        (true, true) => query.push_str(" WHERE date >= $1 AND date <= $2"),
        (true, false) => query.push_str(" WHERE date >= $1"),
        (false, true) => query.push_str(" WHERE date <= $1"),
        (false, false) => {}
    }
}
