use chrono::NaiveDate;

use crate::prediction::PredictionFactors;

#[derive(Debug, Clone)]
pub struct DailySentiment {
    pub date: NaiveDate,
    pub average_score: f64,
    pub tweet_count: i32,
    pub positive_count: i32,
    pub negative_count: i32,
    pub neutral_count: i32,
}

#[derive(Debug, Clone)]
pub struct SpaceWeatherDaily {
    pub date: NaiveDate,
    pub kp_index_max: Option<f64>,
    pub x_class_flare_count: i32,
    pub m_class_flare_count: i32,
    pub solar_wind_speed: Option<f64>,
    pub proton_flux: Option<f64>,
    pub solar_radiation_scale: i32,
}

impl SpaceWeatherDaily {
    pub fn flare_count(&self) -> i64 {
        (self.x_class_flare_count + self.m_class_flare_count) as i64
    }
}

#[derive(Debug, Clone)]
pub struct StoredPrediction {
    pub date: NaiveDate,
    pub predicted_score: f64,
    pub confidence: f64,
    pub factors: PredictionFactors,
    pub model_version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendCategory {
    SentimentPositive,
    SentimentNegative,
    General,
}

impl TrendCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            TrendCategory::SentimentPositive => "sentiment_positive",
            TrendCategory::SentimentNegative => "sentiment_negative",
            TrendCategory::General => "general",
        }
    }

    pub fn from_label(label: &str) -> TrendCategory {
        match label {
            "sentiment_positive" => TrendCategory::SentimentPositive,
            "sentiment_negative" => TrendCategory::SentimentNegative,
            _ => TrendCategory::General,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GoogleTrendRow {
    pub date: NaiveDate,
    pub keyword: String,
    pub score: i32,
    pub region: String,
    pub category: TrendCategory,
}

#[derive(Debug, Clone)]
pub struct TwitterTrendRow {
    pub date: NaiveDate,
    pub keyword: String,
    pub tweet_volume: Option<i64>,
    pub sentiment_score: f64,
    pub region: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoodCategory {
    Good,
    Bad,
    Neutral,
}

impl MoodCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            MoodCategory::Good => "good",
            MoodCategory::Bad => "bad",
            MoodCategory::Neutral => "neutral",
        }
    }

    pub fn from_label(label: &str) -> MoodCategory {
        match label {
            "good" => MoodCategory::Good,
            "bad" => MoodCategory::Bad,
            _ => MoodCategory::Neutral,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MoodJudgmentRecord {
    pub date: NaiveDate,
    pub judgment: MoodCategory,
    pub score: f64,
    pub confidence: f64,
    pub google_score: f64,
    pub twitter_score: f64,
    pub space_score: f64,
    pub explanation: String,
}
