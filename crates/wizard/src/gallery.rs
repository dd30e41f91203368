//! Destination gallery — the static catalog of landmark cards shown on the
//! browsing step. Clicking any card advances the wizard; no selection is
//! stored.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single gallery entry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Destination {
    pub name: String,
    pub location: String,
    pub image: String,
}

impl Destination {
    fn new(name: &str, location: &str, image: &str) -> Self {
        Self {
            name: name.to_string(),
            location: location.to_string(),
            image: format!("assets/destinations/{image}.jpg"),
        }
    }
}

/// The twelve landmarks shown on the destinations step.
pub fn catalog() -> Vec<Destination> {
    vec![
        Destination::new("Burj Khalifa", "Dubai", "burj-khalifa"),
        Destination::new("Twin Towers", "Kuala Lumpur", "twin-towers"),
        Destination::new("Taj Mahal", "India", "taj-mahal"),
        Destination::new("Leaning Tower", "Pisa, Italy", "pisa-tower"),
        Destination::new("Eiffel Tower", "Paris", "eiffel-tower"),
        Destination::new("Santorini", "Greece", "santorini"),
        Destination::new("Great Wall", "China", "great-wall"),
        Destination::new("Machu Picchu", "Peru", "machu-picchu"),
        Destination::new("Sydney Opera House", "Australia", "sydney-opera"),
        Destination::new("Angkor Wat", "Cambodia", "angkor-wat"),
        Destination::new("Neuschwanstein Castle", "Bavaria, Germany", "neuschwanstein"),
        Destination::new("Christ the Redeemer", "Rio de Janeiro, Brazil", "christ-redeemer"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_size() {
        assert_eq!(catalog().len(), 12);
    }

    #[test]
    fn test_catalog_entries() {
        let destinations = catalog();
        assert_eq!(destinations[0].name, "Burj Khalifa");
        assert_eq!(destinations[0].location, "Dubai");
        assert!(destinations[0].image.ends_with("burj-khalifa.jpg"));
        assert_eq!(destinations[11].name, "Christ the Redeemer");
    }
}
