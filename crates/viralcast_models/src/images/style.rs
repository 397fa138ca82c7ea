//! Niche-specific prompt styling for image generators.

/// Style fragments per niche classifier.
///
/// Niche classifiers are the `SCREAMING_SNAKE_CASE` labels of
/// `viralcast_core::NicheType` ("DESIGN", "MOVIES", "NEWS"); anything else
/// gets the generic fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NicheStyles {
    /// Fragment for "DESIGN"
    pub design: &'static str,
    /// Fragment for "MOVIES"
    pub movies: &'static str,
    /// Fragment for "NEWS"
    pub news: &'static str,
    /// Fragment for any other niche
    pub generic: &'static str,
}

impl NicheStyles {
    /// Picks the fragment for a niche classifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use viralcast_models::NicheStyles;
    ///
    /// let styles = NicheStyles {
    ///     design: "minimalist",
    ///     movies: "cinematic",
    ///     news: "journalistic",
    ///     generic: "professional",
    /// };
    /// assert_eq!(styles.pick("MOVIES"), "cinematic");
    /// assert_eq!(styles.pick("GARDENING"), "professional");
    /// ```
    pub fn pick(&self, niche: &str) -> &'static str {
        match niche {
            "DESIGN" => self.design,
            "MOVIES" => self.movies,
            "NEWS" => self.news,
            _ => self.generic,
        }
    }
}
