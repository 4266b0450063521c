use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{DailySentiment, SpaceWeatherDaily};
use crate::stats;

/// Minimum joined history before the train/predict operation will run.
pub const MIN_TRAINING_SAMPLES: usize = 5;
pub const MODEL_VERSION: &str = "simple-correlation-v1";

const RECENT_TREND_WINDOW: usize = 7;
const CONFIDENCE_HISTORY_TARGET: f64 = 30.0;

#[derive(Debug, Clone)]
pub struct TrainingSample {
    pub date: NaiveDate,
    pub sentiment_score: f64,
    pub kp_index_max: f64,
    pub x_class_flare_count: f64,
    pub m_class_flare_count: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct SpaceWeatherInput {
    pub kp_index_max: f64,
    pub x_class_flare_count: f64,
    pub m_class_flare_count: f64,
}

impl SpaceWeatherInput {
    pub fn from_observation(observation: &SpaceWeatherDaily) -> Self {
        Self {
            kp_index_max: observation.kp_index_max.unwrap_or(0.0),
            x_class_flare_count: observation.x_class_flare_count as f64,
            m_class_flare_count: observation.m_class_flare_count as f64,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CorrelationSummary {
    pub kp: f64,
    pub x_flare: f64,
    pub m_flare: f64,
    pub overall: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionFactors {
    pub kp_index: f64,
    pub solar_flares: f64,
    pub historical_trend: f64,
}

#[derive(Debug, Clone)]
pub struct Prediction {
    pub predicted_score: f64,
    pub confidence: f64,
    pub factors: PredictionFactors,
}

#[derive(Debug)]
pub enum TrainOutcome {
    Predicted {
        training_size: usize,
        prediction: Prediction,
    },
    NotEnoughTrainingData {
        training_size: usize,
    },
    NoSpaceWeather {
        date: NaiveDate,
    },
}

/// Join daily sentiment and space-weather history on date. Dates missing
/// from either side are dropped, as are rows with non-finite numeric fields,
/// so no NaN ever reaches the correlation or prediction math. Input order
/// (ascending by date) is preserved.
pub fn build_training_samples(
    sentiments: &[DailySentiment],
    space_weather: &[SpaceWeatherDaily],
) -> Vec<TrainingSample> {
    let by_date: HashMap<NaiveDate, &SpaceWeatherDaily> =
        space_weather.iter().map(|obs| (obs.date, obs)).collect();

    let mut samples = Vec::new();
    for sentiment in sentiments {
        let Some(observation) = by_date.get(&sentiment.date) else {
            continue;
        };
        let kp = observation.kp_index_max.unwrap_or(0.0);
        if !sentiment.average_score.is_finite() || !kp.is_finite() {
            continue;
        }
        samples.push(TrainingSample {
            date: sentiment.date,
            sentiment_score: sentiment.average_score,
            kp_index_max: kp,
            x_class_flare_count: observation.x_class_flare_count as f64,
            m_class_flare_count: observation.m_class_flare_count as f64,
        });
    }
    samples
}

/// Pearson correlation of each space-weather series against the sentiment
/// series, plus a fixed-weight composite. Fewer than 2 samples yields all
/// zeros.
pub fn analyze_correlation(samples: &[TrainingSample]) -> CorrelationSummary {
    if samples.len() < 2 {
        return CorrelationSummary::default();
    }

    let sentiment: Vec<f64> = samples.iter().map(|s| s.sentiment_score).collect();
    let kp_series: Vec<f64> = samples.iter().map(|s| s.kp_index_max).collect();
    let x_series: Vec<f64> = samples.iter().map(|s| s.x_class_flare_count).collect();
    let m_series: Vec<f64> = samples.iter().map(|s| s.m_class_flare_count).collect();

    let kp = stats::pearson(&kp_series, &sentiment);
    let x_flare = stats::pearson(&x_series, &sentiment);
    let m_flare = stats::pearson(&m_series, &sentiment);

    CorrelationSummary {
        kp,
        x_flare,
        m_flare,
        overall: kp * 0.5 + x_flare * 0.3 + m_flare * 0.2,
    }
}

fn non_zero(value: f64) -> f64 {
    if value == 0.0 {
        1.0
    } else {
        value
    }
}

pub fn predict_sentiment(samples: &[TrainingSample], input: SpaceWeatherInput) -> Prediction {
    if samples.is_empty() {
        return Prediction {
            predicted_score: 0.0,
            confidence: 0.0,
            factors: PredictionFactors::default(),
        };
    }

    let scores: Vec<f64> = samples.iter().map(|s| s.sentiment_score).collect();
    let baseline = stats::mean(&scores);
    let correlations = analyze_correlation(samples);

    let avg_kp = stats::mean(&samples.iter().map(|s| s.kp_index_max).collect::<Vec<_>>());
    let avg_x = stats::mean(&samples.iter().map(|s| s.x_class_flare_count).collect::<Vec<_>>());
    let avg_m = stats::mean(&samples.iter().map(|s| s.m_class_flare_count).collect::<Vec<_>>());

    let kp_deviation = (input.kp_index_max - avg_kp) / non_zero(avg_kp);
    let x_deviation = (input.x_class_flare_count - avg_x) / non_zero(avg_x);
    let m_deviation = (input.m_class_flare_count - avg_m) / non_zero(avg_m);

    // Negative correlation means stronger space weather depresses sentiment.
    let kp_impact = -correlations.kp * kp_deviation * 0.1;
    let x_impact = -correlations.x_flare * x_deviation * 0.15;
    let m_impact = -correlations.m_flare * m_deviation * 0.1;

    let recent = &scores[scores.len().saturating_sub(RECENT_TREND_WINDOW)..];
    let trend_impact = (stats::mean(recent) - baseline) * 0.3;

    let predicted_score =
        (baseline + kp_impact + x_impact + m_impact + trend_impact).clamp(-1.0, 1.0);

    let data_quality = (samples.len() as f64 / CONFIDENCE_HISTORY_TARGET).min(1.0);
    let confidence = (data_quality * correlations.overall.abs()).clamp(0.0, 1.0);

    Prediction {
        predicted_score,
        confidence,
        factors: PredictionFactors {
            kp_index: kp_impact,
            solar_flares: x_impact + m_impact,
            historical_trend: trend_impact,
        },
    }
}

/// The train-and-predict operation: short history and a missing observation
/// for the target date are expected outcomes, not errors.
pub fn train_and_predict(
    samples: &[TrainingSample],
    target_date: NaiveDate,
    observation: Option<&SpaceWeatherDaily>,
) -> TrainOutcome {
    if samples.len() < MIN_TRAINING_SAMPLES {
        return TrainOutcome::NotEnoughTrainingData {
            training_size: samples.len(),
        };
    }
    let Some(observation) = observation else {
        return TrainOutcome::NoSpaceWeather { date: target_date };
    };
    TrainOutcome::Predicted {
        training_size: samples.len(),
        prediction: predict_sentiment(samples, SpaceWeatherInput::from_observation(observation)),
    }
}

#[derive(Debug, Clone)]
pub struct Fortune {
    pub mood: String,
    pub message: String,
    pub advice: String,
    pub cosmic_influence: String,
}

pub fn generate_fortune(sentiment_score: f64, weather: &SpaceWeatherDaily) -> Fortune {
    let (mood, message, advice) = if sentiment_score > 0.3 {
        (
            "非常に良い",
            "今日は集合意識が非常にポジティブです。人々の心は明るく、希望に満ちています。",
            "この良い流れに乗って、新しいことにチャレンジしてみましょう。",
        )
    } else if sentiment_score > 0.1 {
        (
            "良い",
            "今日の集合意識は穏やかでポジティブな傾向にあります。",
            "周りの人とのコミュニケーションを大切にしましょう。",
        )
    } else if sentiment_score > -0.1 {
        (
            "普通",
            "今日の集合意識は中立的です。特に大きな波はありません。",
            "自分のペースで過ごすのが良いでしょう。",
        )
    } else if sentiment_score > -0.3 {
        (
            "やや注意",
            "今日の集合意識は少しネガティブな傾向があります。",
            "無理をせず、リラックスする時間を作りましょう。",
        )
    } else {
        (
            "要注意",
            "今日の集合意識はかなりネガティブです。多くの人がストレスを感じているようです。",
            "自分を大切にし、ストレスを避ける工夫をしましょう。",
        )
    };

    let total_flares = weather.flare_count();
    let kp_index = weather.kp_index_max.unwrap_or(0.0);

    let cosmic_influence = if weather.x_class_flare_count > 0 {
        format!(
            "強力な太陽フレア(X{}回)が発生しています。宇宙からの強いエネルギーが地球に影響を与えています。",
            weather.x_class_flare_count
        )
    } else if total_flares > 3 {
        format!(
            "複数の太陽フレア(M{}回)が観測されています。太陽活動が活発です。",
            weather.m_class_flare_count
        )
    } else if kp_index > 5.0 {
        format!(
            "地磁気嵐が発生中です(Kp指数: {kp_index:.1})。地球の磁場が乱れています。"
        )
    } else if kp_index > 3.0 {
        format!("やや地磁気が乱れています(Kp指数: {kp_index:.1})。")
    } else {
        "宇宙天気は穏やかです。太陽活動は静かな状態です。".to_string()
    };

    Fortune {
        mood: mood.to_string(),
        message: message.to_string(),
        advice: advice.to_string(),
        cosmic_influence,
    }
}
