//! Conversions from upstream wire payloads into model types.

use afisha_model::{
    FactsPage, FilmDetail, FilmFact, FilmReview, FilmSummary, ReviewsPage,
};
use chrono::NaiveDate;
use serde_json::Value;

use crate::providers::kinopoisk_types::{
    FactsPayload, FilmDetailsPayload, GenreEntry, ReviewsPayload, StaffEntry,
    TopFilmItem, non_blank,
};

pub const UNTITLED: &str = "Untitled";
pub const MAX_ACTORS: usize = 15;

const DIRECTOR_KEY: &str = "DIRECTOR";
const ACTOR_KEY: &str = "ACTOR";

/// Parse a rating that may arrive as a number or a string. Percentages
/// (used for unreleased films) and anything unparsable count as zero.
pub fn parse_rating(value: Option<&Value>) -> f64 {
    let raw = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.ends_with('%') {
                0.0
            } else {
                s.parse::<f64>().unwrap_or(0.0)
            }
        }
        _ => 0.0,
    };
    non_negative(raw)
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn genre_names(genres: &[GenreEntry]) -> Vec<String> {
    genres
        .iter()
        .filter_map(|g| non_blank(Some(&g.genre)).map(str::to_string))
        .collect()
}

/// `None` when the item has no usable identifier.
pub fn map_top_item(item: &TopFilmItem) -> Option<FilmSummary> {
    let external_id = item.film_id.or(item.kinopoisk_id)?;

    let title = non_blank(item.name_ru.as_deref())
        .or_else(|| non_blank(item.name_en.as_deref()))
        .or_else(|| non_blank(item.name_original.as_deref()))
        .unwrap_or(UNTITLED)
        .to_string();

    let poster_url = non_blank(item.poster_url_preview.as_deref())
        .or_else(|| non_blank(item.poster_url.as_deref()))
        .map(str::to_string);

    let rating = match &item.rating {
        Some(value) => parse_rating(Some(value)),
        None => non_negative(item.rating_kinopoisk.unwrap_or(0.0)),
    };

    Some(FilmSummary {
        external_id,
        title,
        poster_url,
        rating,
        genres: genre_names(&item.genres),
    })
}

fn parse_premiere(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = non_blank(raw)?;
    // Premiere dates are plain `YYYY-MM-DD`; tolerate a trailing time part.
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

fn release_date(payload: &FilmDetailsPayload) -> Option<NaiveDate> {
    parse_premiere(payload.premiere_world.as_deref())
        .or_else(|| parse_premiere(payload.premiere_ru.as_deref()))
        .or_else(|| {
            payload
                .year
                .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
        })
}

/// Map a detail payload plus its crew onto the local film shape.
pub fn map_details(
    external_id: i64,
    payload: &FilmDetailsPayload,
    staff: &[StaffEntry],
) -> FilmDetail {
    let title = non_blank(payload.name_ru.as_deref())
        .or_else(|| non_blank(payload.name_en.as_deref()))
        .or_else(|| non_blank(payload.name_original.as_deref()))
        .unwrap_or(UNTITLED)
        .to_string();

    let description = non_blank(payload.description.as_deref())
        .or_else(|| non_blank(payload.short_description.as_deref()))
        .map(str::to_string);

    let poster_url = non_blank(payload.poster_url.as_deref())
        .or_else(|| non_blank(payload.poster_url_preview.as_deref()))
        .map(str::to_string);

    let rating = non_negative(
        payload
            .rating_kinopoisk
            .or(payload.rating_imdb)
            .unwrap_or(0.0),
    );

    let directors: Vec<&str> = staff
        .iter()
        .filter(|s| s.has_profession(DIRECTOR_KEY))
        .filter_map(StaffEntry::display_name)
        .collect();
    let director = (!directors.is_empty()).then(|| directors.join(", "));

    let actors = staff
        .iter()
        .filter(|s| s.has_profession(ACTOR_KEY))
        .filter_map(StaffEntry::display_name)
        .take(MAX_ACTORS)
        .map(str::to_string)
        .collect();

    FilmDetail {
        external_id: payload
            .kinopoisk_id
            .or(payload.film_id)
            .unwrap_or(external_id),
        title,
        description,
        poster_url,
        release_date: release_date(payload),
        rating,
        genres: genre_names(&payload.genres),
        director,
        actors,
        duration: payload.film_length.filter(|len| *len > 0),
    }
}

pub fn map_facts(payload: FactsPayload) -> FactsPage {
    FactsPage {
        total: payload.total,
        items: payload
            .items
            .into_iter()
            .filter(|f| !f.text.trim().is_empty())
            .map(|f| FilmFact {
                text: f.text,
                kind: f.kind,
                spoiler: f.spoiler,
            })
            .collect(),
    }
}

pub fn map_reviews(payload: ReviewsPayload) -> ReviewsPage {
    ReviewsPage {
        total: payload.total,
        total_pages: payload.total_pages,
        items: payload
            .items
            .into_iter()
            .map(|r| FilmReview {
                id: r.kinopoisk_id,
                kind: r.kind,
                date: r.date,
                author: r.author,
                title: r.title,
                description: r.description,
                positive_rating: r.positive_rating,
                negative_rating: r.negative_rating,
            })
            .collect(),
    }
}
