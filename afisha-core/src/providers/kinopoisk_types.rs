//! Wire types for the Kinopoisk unofficial API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopFilmsPage {
    #[serde(default)]
    pub pages_count: Option<u32>,
    #[serde(default)]
    pub films: Vec<TopFilmItem>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopFilmItem {
    #[serde(default)]
    pub film_id: Option<i64>,
    #[serde(default)]
    pub kinopoisk_id: Option<i64>,
    #[serde(default)]
    pub name_ru: Option<String>,
    #[serde(default)]
    pub name_en: Option<String>,
    #[serde(default)]
    pub name_original: Option<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub poster_url_preview: Option<String>,
    /// Either a number, a numeric string, a percentage for unreleased films,
    /// or the literal string `"null"`.
    #[serde(default)]
    pub rating: Option<Value>,
    #[serde(default)]
    pub rating_kinopoisk: Option<f64>,
    #[serde(default)]
    pub genres: Vec<GenreEntry>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GenreEntry {
    #[serde(default)]
    pub genre: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilmDetailsPayload {
    #[serde(default)]
    pub kinopoisk_id: Option<i64>,
    #[serde(default)]
    pub film_id: Option<i64>,
    #[serde(default)]
    pub name_ru: Option<String>,
    #[serde(default)]
    pub name_en: Option<String>,
    #[serde(default)]
    pub name_original: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub poster_url_preview: Option<String>,
    #[serde(default)]
    pub rating_kinopoisk: Option<f64>,
    #[serde(default)]
    pub rating_imdb: Option<f64>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub film_length: Option<i32>,
    #[serde(default)]
    pub genres: Vec<GenreEntry>,
    #[serde(default)]
    pub premiere_world: Option<String>,
    #[serde(default)]
    pub premiere_ru: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffEntry {
    #[serde(default)]
    pub staff_id: Option<i64>,
    #[serde(default)]
    pub name_ru: Option<String>,
    #[serde(default)]
    pub name_en: Option<String>,
    #[serde(default)]
    pub profession_key: Option<String>,
}

impl StaffEntry {
    pub fn has_profession(&self, key: &str) -> bool {
        self.profession_key
            .as_deref()
            .is_some_and(|p| p.eq_ignore_ascii_case(key))
    }

    pub fn display_name(&self) -> Option<&str> {
        non_blank(self.name_ru.as_deref())
            .or_else(|| non_blank(self.name_en.as_deref()))
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FactsPayload {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub items: Vec<FactItem>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FactItem {
    #[serde(default)]
    pub text: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub spoiler: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewsPayload {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub items: Vec<ReviewItem>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewItem {
    #[serde(default)]
    pub kinopoisk_id: Option<i64>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub positive_rating: i64,
    #[serde(default)]
    pub negative_rating: i64,
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
