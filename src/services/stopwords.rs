use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// English stopwords dropped before counting terms
const ENGLISH_STOPWORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst", "an",
    "and", "another", "any", "anyhow", "anyone", "anything", "anyway", "anywhere", "are",
    "around", "as", "at", "back", "be", "became", "because", "become", "becomes", "becoming",
    "been", "before", "beforehand", "behind", "being", "below", "beside", "besides", "between",
    "beyond", "both", "but", "by", "can", "cannot", "could", "did", "do", "does", "doing",
    "done", "down", "due", "during", "each", "either", "else", "elsewhere", "enough", "etc",
    "even", "ever", "every", "everyone", "everything", "everywhere", "except", "few", "for",
    "former", "formerly", "from", "further", "had", "has", "have", "having", "he", "hence",
    "her", "here", "hereafter", "hereby", "herein", "hers", "herself", "him", "himself", "his",
    "how", "however", "if", "in", "indeed", "into", "is", "it", "its", "itself", "just", "last",
    "latter", "latterly", "least", "less", "many", "may", "me", "meanwhile", "might", "mine",
    "more", "moreover", "most", "mostly", "much", "must", "my", "myself", "namely", "neither",
    "never", "nevertheless", "next", "no", "nobody", "none", "noone", "nor", "not", "nothing",
    "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto", "or", "other",
    "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own", "per", "perhaps",
    "please", "rather", "re", "same", "seem", "seemed", "seeming", "seems", "several", "she",
    "should", "since", "so", "some", "somehow", "someone", "something", "sometime",
    "sometimes", "somewhere", "still", "such", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "thence", "there", "thereafter", "thereby", "therefore", "therein",
    "thereupon", "these", "they", "this", "those", "though", "through", "throughout", "thru",
    "thus", "to", "together", "too", "toward", "towards", "under", "until", "up", "upon", "us",
    "very", "via", "was", "we", "well", "were", "what", "whatever", "when", "whence",
    "whenever", "where", "whereafter", "whereas", "whereby", "wherein", "whereupon", "wherever",
    "whether", "which", "while", "whither", "who", "whoever", "whole", "whom", "whose", "why",
    "will", "with", "within", "without", "would", "yet", "you", "your", "yours", "yourself",
    "yourselves",
];

/// Stopword list used by a build
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StopwordList {
    English,
    None,
    Custom(Vec<String>),
}

impl StopwordList {
    /// Parses `english`, `none` (or an empty string), or a comma separated word list
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "english" => StopwordList::English,
            "" | "none" => StopwordList::None,
            other => {
                let mut words: Vec<String> = other
                    .split(',')
                    .map(|w| w.trim().to_string())
                    .filter(|w| !w.is_empty())
                    .collect();
                words.sort();
                words.dedup();
                StopwordList::Custom(words)
            }
        }
    }

    /// Lowercased word set for membership checks
    pub fn to_set(&self) -> HashSet<String> {
        match self {
            StopwordList::English => ENGLISH_STOPWORDS.iter().map(|w| w.to_string()).collect(),
            StopwordList::None => HashSet::new(),
            StopwordList::Custom(words) => words.iter().map(|w| w.to_lowercase()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_presets() {
        assert_eq!(StopwordList::parse("english"), StopwordList::English);
        assert_eq!(StopwordList::parse(" English "), StopwordList::English);
        assert_eq!(StopwordList::parse("none"), StopwordList::None);
        assert_eq!(StopwordList::parse(""), StopwordList::None);
    }

    #[test]
    fn test_parse_custom_list_is_sorted_and_deduped() {
        assert_eq!(
            StopwordList::parse("movie, film,Movie ,,"),
            StopwordList::Custom(vec!["film".to_string(), "movie".to_string()])
        );
    }

    #[test]
    fn test_english_set_contains_common_words() {
        let set = StopwordList::English.to_set();
        assert!(set.contains("the"));
        assert!(set.contains("and"));
        assert!(!set.contains("astronaut"));
        assert!(StopwordList::None.to_set().is_empty());
    }
}
