//! Cinemas served when the database is unreachable or has none.

use afisha_model::Cinema;
use serde_json::json;

const SEED: [(i32, &str, &str, &str, &str); 5] = [
    (
        1,
        "Кинотеатр Октябрь",
        "Москва, Новый Арбат, 24",
        "POINT(37.586700 55.749600)",
        "+7 (495) 000-00-01",
    ),
    (
        2,
        "Кинотеатр Пионер",
        "Москва, Кутузовский проспект, 21",
        "POINT(37.542500 55.744900)",
        "+7 (495) 000-00-02",
    ),
    (
        3,
        "Каро 11 Октябрь",
        "Москва, Новый Арбат, 24",
        "POINT(37.586900 55.749800)",
        "+7 (495) 000-00-03",
    ),
    (
        4,
        "Формула Кино Европа",
        "Москва, пл. Киевского Вокзала, 2",
        "POINT(37.565000 55.744000)",
        "+7 (495) 000-00-04",
    ),
    (
        5,
        "Синема Парк Авиапарк",
        "Москва, Ходынский бульвар, 4",
        "POINT(37.529000 55.789000)",
        "+7 (495) 000-00-05",
    ),
];

pub fn static_cinemas() -> Vec<Cinema> {
    SEED.iter()
        .map(|&(id, name, address, coordinates, phone)| Cinema {
            id,
            name: name.to_string(),
            address: address.to_string(),
            coordinates: coordinates.to_string(),
            phone_number: Some(phone.to_string()),
            open_hours: Some(json!({
                "weekdays": "10:00-23:00",
                "weekend": "10:00-01:00",
            })),
            created_at: None,
            updated_at: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::parse_wkt_point;

    #[test]
    fn every_seed_point_parses() {
        let seed = static_cinemas();
        assert_eq!(seed.len(), 5);
        for cinema in &seed {
            assert!(
                parse_wkt_point(&cinema.coordinates).is_some(),
                "{} has a bad point",
                cinema.name
            );
            assert!(cinema.address.starts_with("Москва"));
        }
    }
}
