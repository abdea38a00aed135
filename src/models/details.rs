use serde::{Deserialize, Serialize};

const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
const MOVIE_PAGE_BASE_URL: &str = "https://www.themoviedb.org/movie";

/// Presentation details for a single movie, supplied by a metadata provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    pub id: i64,
    pub title: String,
    /// Full poster URL, empty when the provider has no poster
    pub poster_url: String,
    pub rating: Option<f64>,
    pub overview: String,
    pub link: String,
    /// e.g. "Cast: A, B, C | Director: D"
    pub credits: String,
}

// ============================================================================
// TMDb API Types
// ============================================================================

/// Raw response from TMDb `/3/movie/{id}?append_to_response=credits`
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub credits: Option<TmdbCredits>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbCredits {
    #[serde(default)]
    pub cast: Vec<TmdbCastMember>,
    #[serde(default)]
    pub crew: Vec<TmdbCrewMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCastMember {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCrewMember {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub job: Option<String>,
}

impl TmdbCredits {
    /// Top three cast members and every director, joined for display
    fn summary(&self) -> String {
        let cast: Vec<&str> = self
            .cast
            .iter()
            .take(3)
            .filter_map(|c| c.name.as_deref())
            .collect();
        let directors: Vec<&str> = self
            .crew
            .iter()
            .filter(|c| c.job.as_deref() == Some("Director"))
            .filter_map(|c| c.name.as_deref())
            .collect();

        let mut parts = Vec::new();
        if !cast.is_empty() {
            parts.push(format!("Cast: {}", cast.join(", ")));
        }
        if !directors.is_empty() {
            parts.push(format!("Director: {}", directors.join(", ")));
        }

        if parts.is_empty() {
            "Not available".to_string()
        } else {
            parts.join(" | ")
        }
    }
}

impl MovieDetails {
    pub fn from_tmdb(id: i64, movie: TmdbMovie) -> Self {
        let title = movie
            .title
            .filter(|t| !t.is_empty())
            .or(movie.original_title.filter(|t| !t.is_empty()))
            .unwrap_or_else(|| format!("ID {}", id));

        let poster_url = movie
            .poster_path
            .map(|path| format!("{}{}", POSTER_BASE_URL, path))
            .unwrap_or_default();

        let overview = movie
            .overview
            .filter(|o| !o.is_empty())
            .unwrap_or_else(|| "No overview available.".to_string());

        let credits = movie.credits.unwrap_or_default().summary();

        Self {
            id,
            title,
            poster_url,
            rating: movie.vote_average,
            overview,
            link: movie_link(id),
            credits,
        }
    }
}

/// Public TMDb page for a movie id
pub fn movie_link(id: i64) -> String {
    format!("{}/{}", MOVIE_PAGE_BASE_URL, id)
}
