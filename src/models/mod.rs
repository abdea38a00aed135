pub mod corpus;
pub mod details;
pub mod recommendation;
pub mod record;

pub use corpus::Corpus;
pub use details::{MovieDetails, TmdbMovie};
pub use recommendation::{DetailsStatus, EnrichedRecommendation, Recommendation};
pub use record::{Genre, RawRecord, Record};
