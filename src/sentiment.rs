use std::collections::HashMap;

/// Largest weight magnitude in the shipped lexicons; scores are normalized
/// against it to land in [-1, 1].
pub const MAX_WEIGHT: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Script {
    Latin,
    Cjk,
}

const ENGLISH_WORDS: &[(&str, i32)] = &[
    ("good", 1),
    ("great", 2),
    ("excellent", 3),
    ("amazing", 3),
    ("wonderful", 3),
    ("fantastic", 3),
    ("happy", 2),
    ("love", 3),
    ("best", 3),
    ("beautiful", 2),
    ("perfect", 3),
    ("awesome", 3),
    ("brilliant", 3),
    ("outstanding", 3),
    ("superb", 3),
    ("magnificent", 3),
    ("delightful", 2),
    ("bad", -1),
    ("terrible", -3),
    ("horrible", -3),
    ("awful", -3),
    ("worst", -3),
    ("hate", -3),
    ("sad", -2),
    ("angry", -2),
    ("disappointed", -2),
    ("poor", -2),
    ("disgusting", -3),
    ("pathetic", -3),
    ("useless", -2),
    ("failure", -2),
    ("disaster", -3),
    ("nightmare", -3),
];

const JAPANESE_WORDS: &[(&str, i32)] = &[
    ("良い", 1),
    ("いい", 1),
    ("素晴らしい", 3),
    ("最高", 3),
    ("嬉しい", 2),
    ("幸せ", 2),
    ("楽しい", 2),
    ("好き", 2),
    ("愛", 3),
    ("美しい", 2),
    ("完璧", 3),
    ("すごい", 2),
    ("素敵", 2),
    ("感動", 3),
    ("ありがとう", 2),
    ("感謝", 2),
    ("成功", 2),
    ("勝利", 2),
    ("悪い", -1),
    ("最悪", -3),
    ("ひどい", -3),
    ("嫌い", -2),
    ("悲しい", -2),
    ("辛い", -2),
    ("苦しい", -2),
    ("怒り", -2),
    ("失望", -2),
    ("残念", -2),
    ("不安", -2),
    ("心配", -2),
    ("絶望", -3),
    ("地獄", -3),
    ("失敗", -2),
    ("問題", -1),
    ("困難", -2),
];

/// Weighted word tables, one per script class. Built once at startup and
/// never mutated afterward; additional languages extend the table for
/// their script class.
pub struct Lexicon {
    tables: HashMap<Script, HashMap<String, i32>>,
}

impl Lexicon {
    pub fn builtin() -> Self {
        let mut lexicon = Lexicon {
            tables: HashMap::new(),
        };
        lexicon.extend_language(
            Script::Latin,
            ENGLISH_WORDS.iter().map(|(w, s)| (w.to_string(), *s)),
        );
        lexicon.extend_language(
            Script::Cjk,
            JAPANESE_WORDS.iter().map(|(w, s)| (w.to_string(), *s)),
        );
        lexicon
    }

    pub fn extend_language(
        &mut self,
        script: Script,
        entries: impl IntoIterator<Item = (String, i32)>,
    ) {
        self.tables.entry(script).or_default().extend(entries);
    }

    pub fn weight(&self, script: Script, token: &str) -> Option<i32> {
        self.tables.get(&script)?.get(token).copied()
    }
}

fn is_cjk(c: char) -> bool {
    matches!(c, '\u{3040}'..='\u{309F}' | '\u{30A0}'..='\u{30FF}' | '\u{4E00}'..='\u{9FAF}')
}

/// A text with any hiragana, katakana, or CJK ideograph is CJK-class;
/// everything else is Latin-class.
pub fn detect_script(text: &str) -> Script {
    if text.chars().any(is_cjk) {
        Script::Cjk
    } else {
        Script::Latin
    }
}

pub fn tokenize(text: &str, script: Script) -> Vec<String> {
    match script {
        Script::Latin => latin_tokens(text),
        Script::Cjk => cjk_tokens(text),
    }
}

fn latin_tokens(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for c in text.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            current.push(c);
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// No real word segmenter: each maximal CJK run is emitted whole, plus every
/// single character and every 2- and 3-character substring. Overlapping
/// n-gram hits are each counted by the scorer, so CJK scores are noisier
/// than Latin ones.
fn cjk_tokens(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut run: Vec<char> = Vec::new();
    for c in text.chars() {
        if is_cjk(c) {
            run.push(c);
        } else {
            flush_run(&mut run, &mut tokens);
        }
    }
    flush_run(&mut run, &mut tokens);
    tokens
}

fn flush_run(run: &mut Vec<char>, tokens: &mut Vec<String>) {
    if run.is_empty() {
        return;
    }
    tokens.push(run.iter().collect());
    for c in run.iter() {
        tokens.push(c.to_string());
    }
    for pair in run.windows(2) {
        tokens.push(pair.iter().collect());
    }
    for triple in run.windows(3) {
        tokens.push(triple.iter().collect());
    }
    run.clear();
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentScore {
    pub score: f64,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchSentiment {
    pub average_score: f64,
    pub total_positive: usize,
    pub total_negative: usize,
    pub total_neutral: usize,
    pub count: usize,
}

pub struct SentimentAnalyzer {
    lexicon: Lexicon,
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new(Lexicon::builtin())
    }
}

impl SentimentAnalyzer {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn score(&self, text: &str) -> SentimentScore {
        if text.trim().is_empty() {
            return SentimentScore {
                score: 0.0,
                positive: 0,
                negative: 0,
                neutral: 1,
            };
        }

        let script = detect_script(text);
        let tokens = tokenize(text, script);

        let mut total = 0i64;
        let mut matched = 0usize;
        let mut positive = 0usize;
        let mut negative = 0usize;

        for token in &tokens {
            let Some(weight) = self.lexicon.weight(script, token) else {
                continue;
            };
            total += weight as i64;
            matched += 1;
            if weight > 0 {
                positive += 1;
            }
            if weight < 0 {
                negative += 1;
            }
        }

        let score = if matched > 0 {
            (total as f64 / matched as f64 / MAX_WEIGHT).clamp(-1.0, 1.0)
        } else {
            0.0
        };

        SentimentScore {
            score,
            positive,
            negative,
            neutral: tokens.len() - matched,
        }
    }

    pub fn analyze_batch<S: AsRef<str>>(&self, texts: &[S]) -> BatchSentiment {
        if texts.is_empty() {
            return BatchSentiment {
                average_score: 0.0,
                total_positive: 0,
                total_negative: 0,
                total_neutral: 0,
                count: 0,
            };
        }

        let mut total_score = 0.0;
        let mut total_positive = 0;
        let mut total_negative = 0;
        let mut total_neutral = 0;

        for text in texts {
            let result = self.score(text.as_ref());
            total_score += result.score;
            total_positive += result.positive;
            total_negative += result.negative;
            total_neutral += result.neutral;
        }

        BatchSentiment {
            average_score: total_score / texts.len() as f64,
            total_positive,
            total_negative,
            total_neutral,
            count: texts.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_script_class() {
        assert_eq!(detect_script("hello world"), Script::Latin);
        assert_eq!(detect_script("今日はhello"), Script::Cjk);
        assert_eq!(detect_script("カタカナ"), Script::Cjk);
        assert_eq!(detect_script("12345 !?"), Script::Latin);
    }

    #[test]
    fn latin_tokens_lowercase_and_split_on_punctuation() {
        let tokens = tokenize("It's a GREAT day!", Script::Latin);
        assert_eq!(tokens, vec!["it", "s", "a", "great", "day"]);
    }

    #[test]
    fn cjk_tokens_emit_run_and_ngrams() {
        let tokens = tokenize("最悪", Script::Cjk);
        assert_eq!(tokens, vec!["最悪", "最", "悪", "最悪"]);

        let tokens = tokenize("嬉しい日", Script::Cjk);
        assert_eq!(
            tokens,
            vec!["嬉しい日", "嬉", "し", "い", "日", "嬉し", "しい", "い日", "嬉しい", "しい日"]
        );
    }

    #[test]
    fn empty_input_is_a_single_neutral() {
        let analyzer = SentimentAnalyzer::default();
        for text in ["", "   ", "\n\t"] {
            let result = analyzer.score(text);
            assert_eq!(result.score, 0.0);
            assert_eq!(result.positive, 0);
            assert_eq!(result.negative, 0);
            assert_eq!(result.neutral, 1);
        }
    }

    #[test]
    fn english_positive_text_scores_positive() {
        let analyzer = SentimentAnalyzer::default();
        let result = analyzer.score("This is a great and wonderful day!");
        assert!(result.score > 0.0);
        assert!(result.positive > 0);
    }

    #[test]
    fn japanese_negative_text_scores_negative() {
        let analyzer = SentimentAnalyzer::default();
        let result = analyzer.score("最悪の日だ。とても悲しい。");
        assert!(result.score < 0.0);
        assert!(result.negative > 0);
    }

    #[test]
    fn scores_stay_in_bounds() {
        let analyzer = SentimentAnalyzer::default();
        let texts = [
            "love love love amazing perfect best",
            "hate hate terrible awful worst disaster",
            "nothing remarkable here",
            "最高最高最高",
            "絶望地獄最悪",
        ];
        for text in texts {
            let result = analyzer.score(text);
            assert!((-1.0..=1.0).contains(&result.score), "{text}: {}", result.score);
        }
    }

    #[test]
    fn unknown_tokens_count_as_neutral() {
        let analyzer = SentimentAnalyzer::default();
        let result = analyzer.score("the quick brown fox");
        assert_eq!(result.score, 0.0);
        assert_eq!(result.positive, 0);
        assert_eq!(result.negative, 0);
        assert_eq!(result.neutral, 4);
    }

    #[test]
    fn extended_language_is_looked_up() {
        let mut lexicon = Lexicon::builtin();
        lexicon.extend_language(
            Script::Latin,
            [("fantastico".to_string(), 3), ("terribile".to_string(), -3)],
        );
        let analyzer = SentimentAnalyzer::new(lexicon);
        assert!(analyzer.score("un giorno fantastico").score > 0.0);
        assert!(analyzer.score("un giorno terribile").score < 0.0);
    }

    #[test]
    fn empty_batch_is_all_zero() {
        let analyzer = SentimentAnalyzer::default();
        let result = analyzer.analyze_batch::<String>(&[]);
        assert_eq!(result.average_score, 0.0);
        assert_eq!(result.total_positive, 0);
        assert_eq!(result.total_negative, 0);
        assert_eq!(result.total_neutral, 0);
        assert_eq!(result.count, 0);
    }

    #[test]
    fn batch_averages_replicated_texts() {
        let analyzer = SentimentAnalyzer::default();
        let texts = vec!["This is a good day"; 5];
        let result = analyzer.analyze_batch(&texts);
        assert_eq!(result.count, 5);
        assert!(result.average_score > 0.0);
        assert_eq!(result.total_positive, 5);
    }
}
