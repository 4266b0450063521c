use std::collections::BTreeMap;

use anyhow::{bail, Context};
use chrono::NaiveDate;
use tracing::warn;

use crate::models::DailySentiment;
use crate::sentiment::SentimentAnalyzer;

const PROGRESS_INTERVAL: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct TweetRecord {
    pub date: NaiveDate,
    pub text: String,
}

/// Parse an uploaded CSV of dated short posts. The date and text columns are
/// located by case-insensitive header match; a file without both columns, or
/// without any data rows, is rejected outright. Rows whose date cannot be
/// parsed are dropped while the rest of the file still parses.
pub fn parse_tweet_csv(content: &str) -> anyhow::Result<Vec<TweetRecord>> {
    if content.trim().lines().count() < 2 {
        bail!("CSV file is empty or invalid");
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());
    let headers = reader.headers().context("failed to read CSV header")?.clone();

    let date_index = headers.iter().position(|h| {
        let h = h.trim().to_lowercase();
        h.contains("date") || h.contains("created_at") || h == "timestamp"
    });
    let text_index = headers.iter().position(|h| {
        let h = h.trim().to_lowercase();
        h.contains("text") || h.contains("content") || h == "tweet"
    });
    let (Some(date_index), Some(text_index)) = (date_index, text_index) else {
        bail!("CSV must contain date and text columns");
    };

    let mut records = Vec::new();
    let mut dropped = 0usize;

    for row in reader.records() {
        let Ok(row) = row else {
            dropped += 1;
            continue;
        };
        let date_field = row.get(date_index).unwrap_or("").trim();
        let text = row.get(text_index).unwrap_or("").trim();
        if date_field.is_empty() || text.is_empty() {
            dropped += 1;
            continue;
        }
        match parse_record_date(date_field) {
            Some(date) => records.push(TweetRecord {
                date,
                text: text.to_string(),
            }),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        warn!(dropped, "skipped CSV rows without a usable date and text");
    }
    Ok(records)
}

fn parse_record_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.date_naive());
    }
    if let Ok(datetime) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(datetime.date());
    }
    // Twitter export format, e.g. "Mon Sep 24 03:35:21 +0000 2018".
    if let Ok(datetime) = chrono::DateTime::parse_from_str(raw, "%a %b %d %H:%M:%S %z %Y") {
        return Some(datetime.date_naive());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%m/%d/%Y") {
        return Some(date);
    }
    None
}

#[derive(Debug, Default, Clone, Copy)]
struct DayAccumulator {
    total_score: f64,
    count: i32,
    positive: i32,
    negative: i32,
    neutral: i32,
}

/// Score every record and fold the results into per-day aggregates. The
/// optional observer is invoked every 100 records and once at completion; a
/// post counts as positive above 0.1, negative below -0.1, neutral between.
pub fn aggregate_daily_sentiment(
    analyzer: &SentimentAnalyzer,
    records: &[TweetRecord],
    mut on_progress: Option<&mut dyn FnMut(usize, usize)>,
) -> Vec<DailySentiment> {
    let total = records.len();
    let mut days: BTreeMap<NaiveDate, DayAccumulator> = BTreeMap::new();

    for (i, record) in records.iter().enumerate() {
        let sentiment = analyzer.score(&record.text);
        let day = days.entry(record.date).or_default();
        day.total_score += sentiment.score;
        day.count += 1;
        if sentiment.score > 0.1 {
            day.positive += 1;
        } else if sentiment.score < -0.1 {
            day.negative += 1;
        } else {
            day.neutral += 1;
        }

        if let Some(progress) = on_progress.as_mut() {
            if i % PROGRESS_INTERVAL == 0 {
                progress(i + 1, total);
            }
        }
    }

    if let Some(progress) = on_progress.as_mut() {
        progress(total, total);
    }

    days.into_iter()
        .map(|(date, day)| DailySentiment {
            date,
            average_score: if day.count > 0 {
                day.total_score / day.count as f64
            } else {
                0.0
            },
            tweet_count: day.count,
            positive_count: day.positive,
            negative_count: day.negative,
            neutral_count: day.neutral,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_in_order_with_quoted_commas() {
        let csv = "date,text\n\
                   2026-07-01,a fine morning\n\
                   2026-07-02,\"great, truly great\"\n\
                   2026-07-03,an awful evening\n";
        let records = parse_tweet_csv(csv).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2026, 7, 1).unwrap());
        assert_eq!(records[1].text, "great, truly great");
        assert_eq!(records[2].date, NaiveDate::from_ymd_opt(2026, 7, 3).unwrap());
    }

    #[test]
    fn detects_columns_by_substring() {
        let csv = "id,created_at,full_text\n1,2026-07-01,hello there\n";
        let records = parse_tweet_csv(csv).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "hello there");
    }

    #[test]
    fn missing_columns_is_a_shape_error() {
        let csv = "id,user_name\n1,alice\n";
        let err = parse_tweet_csv(csv).unwrap_err();
        assert!(err.to_string().contains("date and text columns"));
    }

    #[test]
    fn header_only_file_is_a_shape_error() {
        let err = parse_tweet_csv("date,text\n").unwrap_err();
        assert!(err.to_string().contains("empty or invalid"));
    }

    #[test]
    fn rows_with_bad_dates_are_dropped_not_fatal() {
        let csv = "date,text\n\
                   2026-07-01,first\n\
                   not-a-date,second\n\
                   2026-07-03,third\n";
        let records = parse_tweet_csv(csv).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text, "first");
        assert_eq!(records[1].text, "third");
    }

    #[test]
    fn accepts_common_timestamp_formats() {
        let csv = "created_at,text\n\
                   2026-07-01T09:30:00+09:00,one\n\
                   2026-07-02 18:00:00,two\n\
                   Mon Sep 24 03:35:21 +0000 2018,three\n";
        let records = parse_tweet_csv(csv).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[2].date, NaiveDate::from_ymd_opt(2018, 9, 24).unwrap());
    }

    #[test]
    fn aggregates_by_day_with_polarity_buckets() {
        let records = vec![
            TweetRecord {
                date: NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
                text: "a great wonderful day".to_string(),
            },
            TweetRecord {
                date: NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
                text: "the worst awful news".to_string(),
            },
            TweetRecord {
                date: NaiveDate::from_ymd_opt(2026, 7, 2).unwrap(),
                text: "nothing in particular".to_string(),
            },
        ];
        let analyzer = SentimentAnalyzer::default();
        let days = aggregate_daily_sentiment(&analyzer, &records, None);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].tweet_count, 2);
        assert_eq!(days[0].positive_count, 1);
        assert_eq!(days[0].negative_count, 1);
        assert_eq!(days[1].tweet_count, 1);
        assert_eq!(days[1].neutral_count, 1);
    }

    #[test]
    fn progress_fires_periodically_and_at_completion() {
        let records: Vec<TweetRecord> = (0..250)
            .map(|i| TweetRecord {
                date: NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
                text: format!("post {i}"),
            })
            .collect();
        let analyzer = SentimentAnalyzer::default();
        let mut calls = Vec::new();
        let mut observer = |done: usize, total: usize| calls.push((done, total));
        aggregate_daily_sentiment(&analyzer, &records, Some(&mut observer));

        assert_eq!(calls, vec![(1, 250), (101, 250), (201, 250), (250, 250)]);
    }

    #[test]
    fn empty_record_list_reports_completion_only() {
        let analyzer = SentimentAnalyzer::default();
        let mut calls = Vec::new();
        let mut observer = |done: usize, total: usize| calls.push((done, total));
        let days = aggregate_daily_sentiment(&analyzer, &[], Some(&mut observer));
        assert!(days.is_empty());
        assert_eq!(calls, vec![(0, 0)]);
    }
}
