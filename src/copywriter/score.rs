use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::OPTIMAL_SEO_LENGTH;

/// Result of scoring a piece of generated copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub score: u8, // 0-100
    pub tips: Vec<String>,
}

const DENSITY_POINTS: u32 = 30;
const LENGTH_POINTS: u32 = 25;
const HEADING_POINTS: u32 = 15;
const CTA_POINTS: u32 = 15;
const READABILITY_POINTS: u32 = 15;

const DENSITY_MIN: f64 = 1.0;
const DENSITY_MAX: f64 = 2.0;
const MAX_WORDS_PER_SENTENCE: f64 = 20.0;
const CTA_VERBS: [&str; 3] = ["buy", "order", "get"];

/// Score generated text against a target keyword.
/// Each heuristic either awards its points or adds a tip, in a fixed order.
pub fn score_content(text: &str, keyword: &str) -> ScoreReport {
    let mut tips = Vec::new();
    let mut points = 0u32;

    let lower = text.to_lowercase();
    let word_count = count_words(text);

    // ── Keyword Density ──
    let density = keyword_density(&lower, keyword, word_count);
    if (DENSITY_MIN..=DENSITY_MAX).contains(&density) {
        points += DENSITY_POINTS;
    } else {
        tips.push(format!(
            "Keyword density is {:.1}%. Optimal range is {}-{}%.",
            density, DENSITY_MIN, DENSITY_MAX
        ));
    }

    // ── Length ──
    // word_count >= 0.8 × optimal, kept in integers
    if word_count * 5 >= OPTIMAL_SEO_LENGTH as usize * 4 {
        points += LENGTH_POINTS;
    } else {
        tips.push(format!(
            "Content has {} words. Aim for around {} words for better SEO.",
            word_count, OPTIMAL_SEO_LENGTH
        ));
    }

    // ── Headings ──
    if heading_pattern().is_match(text) {
        points += HEADING_POINTS;
    } else {
        tips.push("Add headings (H1-H6) to structure the content.".to_string());
    }

    // ── Call to Action ──
    if CTA_VERBS.iter().any(|verb| lower.contains(verb)) {
        points += CTA_POINTS;
    } else {
        tips.push("Add a clear call to action (buy, order, get).".to_string());
    }

    // ── Readability ──
    let sentences = count_sentences(text).max(1);
    let avg_words = word_count as f64 / sentences as f64;
    if avg_words <= MAX_WORDS_PER_SENTENCE {
        points += READABILITY_POINTS;
    } else {
        tips.push("Use shorter sentences (20 words or fewer) to improve readability.".to_string());
    }

    ScoreReport {
        score: points.min(100) as u8,
        tips,
    }
}

// ── Helpers ──

fn heading_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)<h[1-6](\s[^>]*)?>").expect("valid heading pattern"))
}

fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Each terminator counts on its own, so "?!" is two sentences.
fn count_sentences(text: &str) -> usize {
    text.chars().filter(|c| matches!(c, '.' | '!' | '?')).count()
}

/// Keyword occurrences per hundred words. `lower` must already be lowercased.
fn keyword_density(lower: &str, keyword: &str, word_count: usize) -> f64 {
    let needle = keyword.trim().to_lowercase();
    if word_count == 0 || needle.is_empty() {
        return 0.0;
    }
    let occurrences = lower.matches(needle.as_str()).count();
    occurrences as f64 * 100.0 / word_count as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 485 words, 6 keyword hits, a heading, a CTA and short sentences.
    fn perfect_sample() -> String {
        let mut text = String::from("<h2>Great Coffee</h2> Buy our organic coffee today!");
        for i in 0..47 {
            if i % 12 == 0 {
                text.push_str(" Our coffee is sourced from farmers who care about quality.");
            } else {
                text.push_str(" The beans are roasted slowly in small batches each morning.");
            }
        }
        text.push_str(" Enjoy every cup with friends at home tonight.");
        text
    }

    fn filler(words: usize) -> String {
        vec!["word"; words].join(" ")
    }

    #[test]
    fn perfect_sample_scores_100() {
        let text = perfect_sample();
        assert_eq!(count_words(&text), 485);
        let report = score_content(&text, "coffee");
        assert_eq!(report.score, 100);
        assert!(report.tips.is_empty(), "{:?}", report.tips);
    }

    #[test]
    fn empty_text_is_bounded() {
        let report = score_content("", "");
        assert!(report.score <= 100);
        // Only readability passes: 0 words over 1 sentence
        assert_eq!(report.score, 15);
        assert_eq!(report.tips.len(), 4);
        assert!(report.tips[0].contains("0.0%"));
    }

    #[test]
    fn empty_keyword_never_matches() {
        let report = score_content("Buy our coffee.", "");
        assert!(report.tips[0].starts_with("Keyword density is 0.0%"));
    }

    #[test]
    fn keyword_stuffing_fails_density() {
        let report = score_content("buy buy buy buy buy apple", "buy");
        assert!(report.tips[0].contains("83.3%"));
        assert!(report.tips[0].contains("1-2%"));
    }

    fn density_tip(report: &ScoreReport) -> Option<&String> {
        report.tips.iter().find(|t| t.starts_with("Keyword density"))
    }

    #[test]
    fn one_percent_is_inside_the_range() {
        // 1 hit in 100 words
        let text = format!("coffee {}", filler(99));
        assert_eq!(density_tip(&score_content(&text, "coffee")), None);
    }

    #[test]
    fn just_below_one_percent_gets_a_tip() {
        // 1 hit in 111 words = 0.9%
        let text = format!("coffee {}", filler(110));
        let report = score_content(&text, "coffee");
        let tip = density_tip(&report).expect("density tip");
        assert!(tip.starts_with("Keyword density is 0.9%"));
    }

    #[test]
    fn just_above_two_percent_gets_a_tip() {
        // 21 hits in 1000 words = 2.1%
        let text = format!("{}{}", "coffee ".repeat(21), filler(979));
        let report = score_content(&text, "coffee");
        let tip = density_tip(&report).expect("density tip");
        assert_eq!(tip, "Keyword density is 2.1%. Optimal range is 1-2%.");
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        // 2 hits in 100 words = 2.0%
        let text = format!("Coffee {} COFFEE", filler(98));
        let report = score_content(&text, "coffee");
        assert!(!report.tips.iter().any(|t| t.starts_with("Keyword density")));
    }

    #[test]
    fn length_threshold() {
        let long = score_content(&filler(485), "word");
        assert!(!long.tips.iter().any(|t| t.starts_with("Content has")));

        let at_cutoff = score_content(&filler(388), "word");
        assert!(!at_cutoff.tips.iter().any(|t| t.starts_with("Content has")));

        let short = score_content(&filler(300), "word");
        assert!(short
            .tips
            .iter()
            .any(|t| t.contains("300 words") && t.contains("485")));
    }

    #[test]
    fn heading_detection() {
        let with = score_content("<h2>Title</h2>", "title");
        assert!(!with.tips.iter().any(|t| t.starts_with("Add headings")));

        let with_attrs = score_content("<H3 class=\"lead\">Title</H3>", "title");
        assert!(!with_attrs.tips.iter().any(|t| t.starts_with("Add headings")));

        let without = score_content("<p>Title</p><header>x</header>", "title");
        assert!(without.tips.iter().any(|t| t.starts_with("Add headings")));
    }

    #[test]
    fn any_cta_verb_is_enough() {
        for text in ["Buy now!", "ORDER today.", "Get started."] {
            let report = score_content(text, "zzz");
            assert!(
                !report.tips.iter().any(|t| t.starts_with("Add a clear call")),
                "{}",
                text
            );
        }
        let none = score_content("Read more about it.", "zzz");
        assert!(none.tips.iter().any(|t| t.starts_with("Add a clear call")));
    }

    #[test]
    fn readability_threshold() {
        // 3 sentences, 45 words → 15 per sentence
        let short = format!("{}. {}. {}.", filler(15), filler(15), filler(15));
        let report = score_content(&short, "zzz");
        assert!(!report.tips.iter().any(|t| t.starts_with("Use shorter")));

        // 1 sentence, 25 words
        let long = format!("{}.", filler(25));
        let report = score_content(&long, "zzz");
        assert!(report.tips.iter().any(|t| t.starts_with("Use shorter")));
    }

    #[test]
    fn terminators_count_individually() {
        assert_eq!(count_sentences("Really?! Yes."), 3);
    }

    #[test]
    fn tips_follow_heuristic_order() {
        let report = score_content(&format!("{}.", filler(25)), "zzz");
        assert_eq!(report.score, 0);
        assert_eq!(report.tips.len(), 5);
        assert!(report.tips[0].starts_with("Keyword density"));
        assert!(report.tips[1].starts_with("Content has"));
        assert!(report.tips[2].starts_with("Add headings"));
        assert!(report.tips[3].starts_with("Add a clear call"));
        assert!(report.tips[4].starts_with("Use shorter"));
    }
}
