use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::{DailySentiment, MoodJudgmentRecord, SpaceWeatherDaily, StoredPrediction};
use crate::prediction;
use crate::stats;

const HISTORY_WINDOW: usize = 7;

pub fn build_report(
    date: NaiveDate,
    sentiment: Option<&DailySentiment>,
    history: &[DailySentiment],
    weather: Option<&SpaceWeatherDaily>,
    stored_prediction: Option<&StoredPrediction>,
    judgment: Option<&MoodJudgmentRecord>,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Daily Mood Report");
    let _ = writeln!(output, "Generated for {date}");
    let _ = writeln!(output);
    let _ = writeln!(output, "## Sentiment");

    match sentiment {
        Some(day) => {
            let _ = writeln!(
                output,
                "- average score {:.3} across {} posts ({} positive / {} negative / {} neutral)",
                day.average_score,
                day.tweet_count,
                day.positive_count,
                day.negative_count,
                day.neutral_count
            );
        }
        None => {
            let _ = writeln!(output, "No sentiment aggregate recorded for this date.");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Space Weather");

    match weather {
        Some(observation) => {
            match observation.kp_index_max {
                Some(kp) => {
                    let _ = writeln!(output, "- Kp index max {kp:.1}");
                }
                None => {
                    let _ = writeln!(output, "- Kp index max not observed");
                }
            }
            let _ = writeln!(
                output,
                "- solar flares: {} X-class, {} M-class",
                observation.x_class_flare_count, observation.m_class_flare_count
            );
            if let Some(flux) = observation.proton_flux {
                let _ = writeln!(
                    output,
                    "- proton flux {flux:.1} pfu (S{})",
                    observation.solar_radiation_scale
                );
            }
            if let Some(wind) = observation.solar_wind_speed {
                let _ = writeln!(output, "- solar wind {wind:.0} km/s");
            }
        }
        None => {
            let _ = writeln!(output, "No space weather observation recorded for this date.");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Prediction");

    match stored_prediction {
        Some(record) => {
            let _ = writeln!(
                output,
                "- predicted score {:.3} (confidence {:.2}, model {})",
                record.predicted_score, record.confidence, record.model_version
            );
            let _ = writeln!(
                output,
                "- factors: kp {:.4}, solar flares {:.4}, recent trend {:.4}",
                record.factors.kp_index,
                record.factors.solar_flares,
                record.factors.historical_trend
            );
        }
        None => {
            let _ = writeln!(output, "No prediction recorded for this date.");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Mood Judgment");

    match judgment {
        Some(record) => {
            let _ = writeln!(
                output,
                "- {} (score {:.3}, confidence {:.2})",
                record.judgment.as_str(),
                record.score,
                record.confidence
            );
            let _ = writeln!(
                output,
                "- breakdown: search {:.3} / social {:.3} / space {:.3}",
                record.google_score, record.twitter_score, record.space_score
            );
            let _ = writeln!(output, "- {}", record.explanation);
        }
        None => {
            let _ = writeln!(output, "No mood judgment recorded for this date.");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Recent Sentiment");

    if history.is_empty() {
        let _ = writeln!(output, "No sentiment history in this window.");
    } else {
        let scores: Vec<f64> = history.iter().map(|day| day.average_score).collect();
        let smoothed = stats::moving_average(&scores, HISTORY_WINDOW);
        for (day, average) in history.iter().zip(&smoothed) {
            let _ = writeln!(
                output,
                "- {}: {:.3} (7-day avg {:.3})",
                day.date, day.average_score, average
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Fortune");

    match (sentiment, weather) {
        (Some(day), Some(observation)) => {
            let fortune = prediction::generate_fortune(day.average_score, observation);
            let _ = writeln!(output, "- 気分: {}", fortune.mood);
            let _ = writeln!(output, "- {}", fortune.message);
            let _ = writeln!(output, "- {}", fortune.advice);
            let _ = writeln!(output, "- {}", fortune.cosmic_influence);
        }
        _ => {
            let _ = writeln!(
                output,
                "Sentiment and space weather are both required for a fortune."
            );
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_covers_all_sections_even_when_empty() {
        let date = NaiveDate::from_ymd_opt(2026, 7, 29).unwrap();
        let report = build_report(date, None, &[], None, None, None);
        for heading in [
            "# Daily Mood Report",
            "## Sentiment",
            "## Space Weather",
            "## Prediction",
            "## Mood Judgment",
            "## Recent Sentiment",
            "## Fortune",
        ] {
            assert!(report.contains(heading), "missing {heading}");
        }
        assert!(report.contains("No sentiment aggregate"));
    }

    #[test]
    fn report_includes_fortune_when_inputs_present() {
        let date = NaiveDate::from_ymd_opt(2026, 7, 29).unwrap();
        let sentiment = DailySentiment {
            date,
            average_score: 0.42,
            tweet_count: 120,
            positive_count: 60,
            negative_count: 20,
            neutral_count: 40,
        };
        let weather = SpaceWeatherDaily {
            date,
            kp_index_max: Some(1.2),
            x_class_flare_count: 0,
            m_class_flare_count: 0,
            solar_wind_speed: Some(380.0),
            proton_flux: Some(4.0),
            solar_radiation_scale: 0,
        };
        let report = build_report(date, Some(&sentiment), &[sentiment.clone()], Some(&weather), None, None);
        assert!(report.contains("良い"));
        assert!(report.contains("穏やか"));
        assert!(report.contains("7-day avg"));
    }
}
