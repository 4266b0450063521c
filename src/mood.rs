use crate::models::MoodCategory;
use crate::stats;

const GOOGLE_WEIGHT: f64 = 0.35;
const TWITTER_WEIGHT: f64 = 0.40;
const SPACE_WEIGHT: f64 = 0.25;

const GOOD_THRESHOLD: f64 = 0.2;
const BAD_THRESHOLD: f64 = -0.2;

#[derive(Debug, Clone, Copy, Default)]
pub struct GoogleSignal {
    pub positive_keywords: usize,
    pub negative_keywords: usize,
    pub overall_score: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TwitterSignal {
    pub average_sentiment: f64,
    pub positive_trends: usize,
    pub negative_trends: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SpaceSignal {
    pub kp_index: f64,
    pub flare_count: i64,
    pub impact: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TrendSnapshot {
    pub google: GoogleSignal,
    pub twitter: TwitterSignal,
    pub space: SpaceSignal,
}

#[derive(Debug, Clone, Copy)]
pub struct MoodBreakdown {
    pub google: f64,
    pub twitter: f64,
    pub space: f64,
}

#[derive(Debug, Clone)]
pub struct MoodJudgmentResult {
    pub judgment: MoodCategory,
    pub score: f64,
    pub confidence: f64,
    pub breakdown: MoodBreakdown,
    pub explanation: String,
}

/// Geomagnetic activity and solar flares both push mood downward. The flare
/// count is capped at 10 before scaling.
pub fn space_weather_impact(kp_index: f64, flare_count: i64) -> f64 {
    let kp_impact = -(kp_index / 9.0) * 0.4;
    let flare_impact = -(flare_count.min(10) as f64 / 10.0) * 0.3;
    (kp_impact + flare_impact).clamp(-1.0, 1.0)
}

pub fn judge_daily_mood(trend: &TrendSnapshot) -> MoodJudgmentResult {
    let google_score = trend.google.overall_score;
    let twitter_score = trend.twitter.average_sentiment;
    let space_score = trend.space.impact;

    let total = google_score * GOOGLE_WEIGHT
        + twitter_score * TWITTER_WEIGHT
        + space_score * SPACE_WEIGHT;
    let score = total.clamp(-1.0, 1.0);

    let judgment = if score > GOOD_THRESHOLD {
        MoodCategory::Good
    } else if score < BAD_THRESHOLD {
        MoodCategory::Bad
    } else {
        MoodCategory::Neutral
    };

    // Coarse completeness proxy: a source counts when it produced any signal.
    let available = [
        trend.google.positive_keywords + trend.google.negative_keywords > 0,
        trend.twitter.positive_trends + trend.twitter.negative_trends > 0,
        trend.space.kp_index > 0.0,
    ]
    .iter()
    .filter(|present| **present)
    .count();
    let confidence = (available as f64 / 3.0).min(1.0);

    let explanation = match judgment {
        MoodCategory::Good => {
            "今日は良い日です。世の中の雰囲気がポジティブで、宇宙からの影響も穏やかです。"
        }
        MoodCategory::Bad => {
            "今日は少し調子が悪いかもしれません。世の中の雰囲気や宇宙からの影響がネガティブに働いています。でも、これはあなたのせいではありません。"
        }
        MoodCategory::Neutral => "今日は普通の日です。特に大きな影響は見られません。",
    };

    MoodJudgmentResult {
        judgment,
        score,
        confidence,
        breakdown: MoodBreakdown {
            google: google_score,
            twitter: twitter_score,
            space: space_score,
        },
        explanation: explanation.to_string(),
    }
}

/// Search-trend sub-score from raw 0-100 keyword scores: mean positive minus
/// mean negative, rescaled onto [-1, 1].
pub fn google_trend_score(positive_scores: &[f64], negative_scores: &[f64]) -> f64 {
    let avg_positive = if positive_scores.is_empty() {
        0.0
    } else {
        stats::mean(positive_scores) / 100.0
    };
    let avg_negative = if negative_scores.is_empty() {
        0.0
    } else {
        stats::mean(negative_scores) / 100.0
    };
    (avg_positive - avg_negative).clamp(-1.0, 1.0)
}

/// Blended social signal: 60% average keyword sentiment, 40% the ratio of
/// positive to negative trends.
pub fn blended_social_signal(
    positive_trends: usize,
    negative_trends: usize,
    average_sentiment: f64,
) -> f64 {
    let total = positive_trends + negative_trends;
    let ratio = if total > 0 {
        (positive_trends as f64 - negative_trends as f64) / total as f64
    } else {
        0.0
    };
    (average_sentiment * 0.6 + ratio * 0.4).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(google: f64, twitter: f64, space: f64) -> TrendSnapshot {
        TrendSnapshot {
            google: GoogleSignal {
                positive_keywords: 3,
                negative_keywords: 2,
                overall_score: google,
            },
            twitter: TwitterSignal {
                average_sentiment: twitter,
                positive_trends: 4,
                negative_trends: 1,
            },
            space: SpaceSignal {
                kp_index: 3.0,
                flare_count: 1,
                impact: space,
            },
        }
    }

    #[test]
    fn space_weather_impact_scales_and_caps() {
        assert_eq!(space_weather_impact(0.0, 0), 0.0);
        assert!((space_weather_impact(9.0, 10) + 0.7).abs() < 1e-9);
        // Cap at 10 flares bounds outlier days.
        assert_eq!(space_weather_impact(9.0, 10), space_weather_impact(9.0, 500));
        assert!((-1.0..=1.0).contains(&space_weather_impact(9.0, 10)));
    }

    #[test]
    fn weighted_total_maps_to_categories() {
        let good = judge_daily_mood(&snapshot(0.8, 0.8, 0.1));
        assert_eq!(good.judgment, MoodCategory::Good);
        assert!(good.score > 0.2);

        let bad = judge_daily_mood(&snapshot(-0.8, -0.8, -0.5));
        assert_eq!(bad.judgment, MoodCategory::Bad);
        assert!(bad.score < -0.2);

        let neutral = judge_daily_mood(&snapshot(0.1, 0.0, -0.1));
        assert_eq!(neutral.judgment, MoodCategory::Neutral);
    }

    #[test]
    fn breakdown_exposes_unweighted_sub_scores() {
        let result = judge_daily_mood(&snapshot(0.5, -0.25, 0.1));
        assert_eq!(result.breakdown.google, 0.5);
        assert_eq!(result.breakdown.twitter, -0.25);
        assert_eq!(result.breakdown.space, 0.1);
    }

    #[test]
    fn confidence_counts_available_sources() {
        let all = judge_daily_mood(&snapshot(0.2, 0.2, 0.0));
        assert!((all.confidence - 1.0).abs() < 1e-9);

        let mut sparse = snapshot(0.2, 0.2, 0.0);
        sparse.twitter.positive_trends = 0;
        sparse.twitter.negative_trends = 0;
        sparse.space.kp_index = 0.0;
        let result = judge_daily_mood(&sparse);
        assert!((result.confidence - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn google_trend_score_balances_keyword_means() {
        assert_eq!(google_trend_score(&[], &[]), 0.0);
        let score = google_trend_score(&[80.0, 60.0], &[40.0]);
        assert!((score - (0.7 - 0.4)).abs() < 1e-9);
        assert!((-1.0..=1.0).contains(&google_trend_score(&[100.0], &[])));
    }

    #[test]
    fn blended_social_signal_mixes_average_and_ratio() {
        assert_eq!(blended_social_signal(0, 0, 0.0), 0.0);
        let blended = blended_social_signal(3, 1, 0.5);
        assert!((blended - (0.5 * 0.6 + 0.5 * 0.4)).abs() < 1e-9);
    }
}
