//! Fuzzy title comparison used to confirm that two records describe the same
//! work.

/// Default minimum similarity for two titles to count as the same work.
pub const DEFAULT_TITLE_THRESHOLD: f64 = 0.70;

/// Characters dropped before comparing titles.
const IGNORED: &[char] = &[' ', '\n', ',', ':', '"', '\u{201C}', '\u{201D}'];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TitleMatcher {
    threshold: f64,
}

impl Default for TitleMatcher {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_TITLE_THRESHOLD,
        }
    }
}

impl TitleMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Threshold clamped to `[0, 1]`; NaN falls back to the default.
    pub fn with_threshold(threshold: f64) -> Self {
        if threshold.is_nan() {
            return Self::default();
        }
        Self {
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Whether `a` and `b` plausibly name the same work.
    ///
    /// Two empty (after normalization) titles never match. A title that is a
    /// prefix of the other matches regardless of the threshold, which covers
    /// truncated titles and missing subtitles.
    pub fn similar(&self, a: &str, b: &str) -> bool {
        let a = normalize_title(a);
        let b = normalize_title(b);
        if a.is_empty() || b.is_empty() {
            return false;
        }
        if a.starts_with(&b) || b.starts_with(&a) {
            return true;
        }
        strsim::normalized_levenshtein(&a, &b) >= self.threshold
    }

    /// Normalized Levenshtein similarity in `[0, 1]` after title cleanup.
    pub fn score(&self, a: &str, b: &str) -> f64 {
        let a = normalize_title(a);
        let b = normalize_title(b);
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }
        strsim::normalized_levenshtein(&a, &b)
    }
}

/// [`TitleMatcher::similar`] with the default threshold.
pub fn similar(a: &str, b: &str) -> bool {
    TitleMatcher::default().similar(a, b)
}

fn normalize_title(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .filter(|c| !IGNORED.contains(c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_never_matches() {
        assert!(!similar("", "Anything"));
        assert!(!similar("Anything", ""));
        assert!(!similar("", ""));
        assert!(!similar(" , : ", "\"\""));
    }

    #[test]
    fn prefix_matches() {
        assert!(similar("The Effects of X on Y", "the effects of x on y: a study"));
        assert!(similar("the effects of x on y: a study", "The Effects of X on Y"));
    }

    #[test]
    fn formatting_differences_ignored() {
        assert!(similar(
            "\u{201C}Deep\u{201D} learning, revisited",
            "\"deep\" LEARNING revisited"
        ));
        assert!(similar("Title:\nWith Newline", "title with newline"));
    }

    #[test]
    fn near_miss_typos_match() {
        assert!(similar(
            "Measuring the impact of open access policies",
            "Measuring the impact of open-access policy"
        ));
    }

    #[test]
    fn unrelated_titles_do_not_match() {
        assert!(!similar("Quantum Computing Basics", "A History of Rome"));
    }

    #[test]
    fn symmetric() {
        let pairs = [
            ("Quantum Computing Basics", "A History of Rome"),
            ("The Effects of X on Y", "the effects of x on y: a study"),
            ("Open access in practice", "Open access in principle"),
            ("", "x"),
        ];
        for (a, b) in pairs {
            assert_eq!(similar(a, b), similar(b, a), "{a:?} vs {b:?}");
        }
    }

    #[test]
    fn threshold_is_configurable() {
        let strict = TitleMatcher::with_threshold(0.99);
        assert!(!strict.similar("Open access in practice", "Open access in principle"));
        let loose = TitleMatcher::with_threshold(0.5);
        assert!(loose.similar("Open access in practice", "Open access in principle"));
        assert_eq!(TitleMatcher::with_threshold(4.0).threshold(), 1.0);
    }

    #[test]
    fn nan_threshold_uses_default() {
        let m = TitleMatcher::with_threshold(f64::NAN);
        assert_eq!(m.threshold(), DEFAULT_TITLE_THRESHOLD);
        assert!(m.similar(
            "Measuring the impact of open access policies",
            "Measuring the impact of open-access policy"
        ));
    }

    #[test]
    fn score_in_unit_range() {
        let m = TitleMatcher::new();
        assert_eq!(m.score("abc", "abc"), 1.0);
        assert_eq!(m.score("", "abc"), 0.0);
        let s = m.score("Quantum Computing Basics", "A History of Rome");
        assert!((0.0..0.7).contains(&s));
    }
}
