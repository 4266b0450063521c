use chrono::NaiveDate;

use crate::models::{GoogleTrendRow, TrendCategory, TwitterTrendRow};
use crate::mood::{self, GoogleSignal, TwitterSignal};
use crate::sentiment::SentimentAnalyzer;

pub const POSITIVE_KEYWORDS: &[&str] = &[
    "幸せ",
    "ハッピー",
    "楽しい",
    "嬉しい",
    "良い",
    "素晴らしい",
    "最高",
    "happy",
    "joy",
    "good",
    "great",
    "wonderful",
    "excellent",
];

pub const NEGATIVE_KEYWORDS: &[&str] = &[
    "不安",
    "ストレス",
    "疲れた",
    "悪い",
    "最悪",
    "悲しい",
    "苦しい",
    "anxiety",
    "stress",
    "tired",
    "bad",
    "worst",
    "sad",
    "depressed",
];

/// Case-insensitive substring match against the fixed keyword lists.
pub fn categorize_keyword(keyword: &str) -> TrendCategory {
    let lower = keyword.to_lowercase();
    if POSITIVE_KEYWORDS.iter().any(|p| lower.contains(&p.to_lowercase())) {
        TrendCategory::SentimentPositive
    } else if NEGATIVE_KEYWORDS.iter().any(|n| lower.contains(&n.to_lowercase())) {
        TrendCategory::SentimentNegative
    } else {
        TrendCategory::General
    }
}

/// Per-day search-trend sub-signal from stored keyword rows.
pub fn search_trend_signal(rows: &[GoogleTrendRow]) -> GoogleSignal {
    let positive: Vec<f64> = rows
        .iter()
        .filter(|row| row.category == TrendCategory::SentimentPositive)
        .map(|row| row.score as f64)
        .collect();
    let negative: Vec<f64> = rows
        .iter()
        .filter(|row| row.category == TrendCategory::SentimentNegative)
        .map(|row| row.score as f64)
        .collect();

    GoogleSignal {
        positive_keywords: positive.len(),
        negative_keywords: negative.len(),
        overall_score: mood::google_trend_score(&positive, &negative),
    }
}

/// Score each trending keyword with the sentiment scorer itself, producing
/// the rows to persist plus the per-day summary.
pub fn analyze_trend_keywords(
    analyzer: &SentimentAnalyzer,
    keywords: &[&str],
    date: NaiveDate,
    region: &str,
) -> (Vec<TwitterTrendRow>, TwitterSignal) {
    let mut rows = Vec::with_capacity(keywords.len());
    for keyword in keywords {
        let sentiment = analyzer.score(keyword);
        rows.push(TwitterTrendRow {
            date,
            keyword: keyword.to_string(),
            tweet_volume: None,
            sentiment_score: sentiment.score,
            region: region.to_string(),
        });
    }
    let signal = social_trend_signal(&rows);
    (rows, signal)
}

/// Per-day social-trend sub-signal from stored keyword rows. A trend counts
/// as positive above 0.1 and negative below -0.1.
pub fn social_trend_signal(rows: &[TwitterTrendRow]) -> TwitterSignal {
    let mut total = 0.0;
    let mut positive_trends = 0;
    let mut negative_trends = 0;

    for row in rows {
        total += row.sentiment_score;
        if row.sentiment_score > 0.1 {
            positive_trends += 1;
        } else if row.sentiment_score < -0.1 {
            negative_trends += 1;
        }
    }

    TwitterSignal {
        average_sentiment: if rows.is_empty() {
            0.0
        } else {
            total / rows.len() as f64
        },
        positive_trends,
        negative_trends,
    }
}

/// Stand-in for a live trends feed; mirrors what a day's trending keywords
/// look like when no collaborator supplies real ones.
pub fn sample_trend_keywords() -> Vec<&'static str> {
    POSITIVE_KEYWORDS
        .iter()
        .take(5)
        .chain(NEGATIVE_KEYWORDS.iter().take(5))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, 29).unwrap()
    }

    fn google_row(keyword: &str, score: i32, category: TrendCategory) -> GoogleTrendRow {
        GoogleTrendRow {
            date: date(),
            keyword: keyword.to_string(),
            score,
            region: "JP".to_string(),
            category,
        }
    }

    #[test]
    fn categorizes_by_substring_in_both_languages() {
        assert_eq!(categorize_keyword("happy hour"), TrendCategory::SentimentPositive);
        assert_eq!(categorize_keyword("ストレス解消"), TrendCategory::SentimentNegative);
        assert_eq!(categorize_keyword("HAPPY"), TrendCategory::SentimentPositive);
        assert_eq!(categorize_keyword("天気"), TrendCategory::General);
    }

    #[test]
    fn search_signal_averages_scored_categories() {
        let rows = vec![
            google_row("幸せ", 80, TrendCategory::SentimentPositive),
            google_row("楽しい", 60, TrendCategory::SentimentPositive),
            google_row("不安", 40, TrendCategory::SentimentNegative),
            google_row("天気", 90, TrendCategory::General),
        ];
        let signal = search_trend_signal(&rows);
        assert_eq!(signal.positive_keywords, 2);
        assert_eq!(signal.negative_keywords, 1);
        assert!((signal.overall_score - (0.7 - 0.4)).abs() < 1e-9);
    }

    #[test]
    fn keyword_analysis_counts_polar_trends() {
        let analyzer = SentimentAnalyzer::default();
        let (rows, signal) =
            analyze_trend_keywords(&analyzer, &sample_trend_keywords(), date(), "JP");
        assert_eq!(rows.len(), 10);
        assert!(signal.positive_trends > 0);
        assert!(signal.negative_trends > 0);
        assert!(rows.iter().all(|row| (-1.0..=1.0).contains(&row.sentiment_score)));
    }

    #[test]
    fn social_signal_of_no_rows_is_zero() {
        let signal = social_trend_signal(&[]);
        assert_eq!(signal.average_sentiment, 0.0);
        assert_eq!(signal.positive_trends, 0);
        assert_eq!(signal.negative_trends, 0);
    }
}
