use routewise_core::TaskCategory;

/// Inputs longer than this many characters with no keyword hit are treated as analysis.
pub const LONG_INPUT_THRESHOLD: usize = 500;

/// Keyword table, English and Spanish. Matching is by substring on lowercased text.
const KEYWORDS: [(TaskCategory, &[&str]); 4] = [
    (
        TaskCategory::Summary,
        &[
            "resume",
            "resumen",
            "summarize",
            "summarise",
            "summary",
            "tl;dr",
            "tldr",
        ],
    ),
    (
        TaskCategory::Translation,
        &["translate", "translation", "traducir", "traduce"],
    ),
    (
        TaskCategory::Analysis,
        &[
            "analyze", "analyse", "analysis", "analizar", "evaluate", "compare",
        ],
    ),
    (
        TaskCategory::Coding,
        &[
            "code", "function", "debug", "bug", "implement", "script", "compile", "refactor",
        ],
    ),
];

/// Assigns a task category from request text by keyword counting.
#[derive(Debug, Default, Clone, Copy)]
pub struct TaskClassifier;

impl TaskClassifier {
    /// Classifies `input`. Pure and deterministic.
    ///
    /// The category with the strictly highest keyword count wins; ties and
    /// zero counts fall back to `General`, or to `Analysis` for long inputs
    /// when nothing matched at all.
    pub fn classify(&self, input: &str) -> TaskCategory {
        let lowered = input.to_lowercase();

        let mut best: Option<(TaskCategory, usize)> = None;
        let mut tied = false;
        let mut any_match = false;

        for (category, keywords) in KEYWORDS {
            let count = Self::count_keywords(&lowered, keywords);
            if count == 0 {
                continue;
            }
            any_match = true;
            match best {
                Some((_, best_count)) if count < best_count => {}
                Some((_, best_count)) if count == best_count => tied = true,
                _ => {
                    best = Some((category, count));
                    tied = false;
                }
            }
        }

        match best {
            Some((category, _)) if !tied => category,
            _ if !any_match && input.chars().count() > LONG_INPUT_THRESHOLD => {
                TaskCategory::Analysis
            }
            _ => TaskCategory::General,
        }
    }

    fn count_keywords(text: &str, keywords: &[&str]) -> usize {
        keywords
            .iter()
            .map(|keyword| text.matches(keyword).count())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spanish_summary() {
        let classifier = TaskClassifier;
        assert_eq!(
            classifier.classify("Resume este texto sobre ahorro de energía"),
            TaskCategory::Summary
        );
    }

    #[test]
    fn test_each_category() {
        let classifier = TaskClassifier;
        assert_eq!(
            classifier.classify("Translate this sentence to French"),
            TaskCategory::Translation
        );
        assert_eq!(
            classifier.classify("Please evaluate these two options"),
            TaskCategory::Analysis
        );
        assert_eq!(
            classifier.classify("Fix the bug in my script"),
            TaskCategory::Coding
        );
        assert_eq!(classifier.classify("Hello there"), TaskCategory::General);
    }

    #[test]
    fn test_highest_count_wins() {
        let classifier = TaskClassifier;
        // coding: debug + bug + function = 3, summary: summary = 1
        assert_eq!(
            classifier.classify("Write a summary after you debug this function"),
            TaskCategory::Coding
        );
    }

    #[test]
    fn test_tie_defaults_to_general() {
        let classifier = TaskClassifier;
        assert_eq!(
            classifier.classify("translate and compare"),
            TaskCategory::General
        );
    }

    #[test]
    fn test_long_text_without_keywords_is_analysis() {
        let classifier = TaskClassifier;
        let long = "lorem ipsum ".repeat(50);
        assert!(long.chars().count() > LONG_INPUT_THRESHOLD);
        assert_eq!(classifier.classify(&long), TaskCategory::Analysis);
    }

    #[test]
    fn test_long_tied_text_stays_general() {
        let classifier = TaskClassifier;
        let long = format!("translate and compare {}", "lorem ipsum ".repeat(50));
        assert_eq!(classifier.classify(&long), TaskCategory::General);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let classifier = TaskClassifier;
        let text = "Summarize and translate the code review";
        let first = classifier.classify(text);
        for _ in 0..10 {
            assert_eq!(classifier.classify(text), first);
        }
    }
}
