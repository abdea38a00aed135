pub mod catalog;
pub mod dataset;
pub mod normalizer;
pub mod providers;
pub mod recommendations;
pub mod similarity;
pub mod stopwords;
pub mod vectorizer;
