use crate::domain::model::{Catalog, CatalogOrigin, Site, YearInscribed};

/// (name, country, lat, lng, year, category)
const FALLBACK_SITES: &[(&str, &str, f64, f64, i32, &str)] = &[
    ("Pyramids of Giza", "Egypt", 29.9792, 31.1342, 1979, "Cultural"),
    ("Abu Mena", "Egypt", 30.8419, 29.6581, 1979, "Cultural"),
    ("Historic Cairo", "Egypt", 30.0444, 31.2357, 1979, "Cultural"),
    ("Robben Island", "South Africa", -33.8067, 18.3669, 1999, "Cultural"),
    ("Cradle of Humankind", "South Africa", -25.9317, 27.7167, 1999, "Cultural"),
    ("Great Wall of China", "China", 40.4319, 116.5704, 1987, "Cultural"),
    ("Forbidden City", "China", 39.9163, 116.3972, 1987, "Cultural"),
    ("Terracotta Army", "China", 34.3848, 109.2734, 1987, "Cultural"),
    ("Taj Mahal", "India", 27.1751, 78.0421, 1983, "Cultural"),
    ("Agra Fort", "India", 27.1795, 78.0211, 1983, "Cultural"),
    ("Ajanta Caves", "India", 20.5519, 75.7033, 1983, "Cultural"),
    ("Ellora Caves", "India", 20.0269, 75.1791, 1983, "Cultural"),
    ("Angkor", "Cambodia", 13.4125, 103.8670, 1992, "Cultural"),
    ("Borobudur", "Indonesia", -7.6079, 110.2038, 1991, "Cultural"),
    ("Mount Fuji", "Japan", 35.3606, 138.7274, 2013, "Cultural"),
    ("Acropolis of Athens", "Greece", 37.9715, 23.7267, 1987, "Cultural"),
    ("Colosseum", "Italy", 41.8902, 12.4922, 1980, "Cultural"),
    ("Venice", "Italy", 45.4408, 12.3155, 1987, "Cultural"),
    ("Florence Historic Centre", "Italy", 43.7696, 11.2558, 1982, "Cultural"),
    ("Vatican City", "Vatican", 41.9029, 12.4534, 1984, "Cultural"),
    ("Sagrada Familia", "Spain", 41.4036, 2.1744, 1984, "Cultural"),
    ("Alhambra", "Spain", 37.1773, -3.5986, 1984, "Cultural"),
    ("Stonehenge", "United Kingdom", 51.1789, -1.8262, 1986, "Cultural"),
    ("Tower of London", "United Kingdom", 51.5081, -0.0759, 1988, "Cultural"),
    ("Palace of Versailles", "France", 48.8049, 2.1204, 1979, "Cultural"),
    ("Mont-Saint-Michel", "France", 48.6361, -1.5115, 1979, "Cultural"),
    ("Machu Picchu", "Peru", -13.1631, -72.5450, 1983, "Mixed"),
    ("Chichen Itza", "Mexico", 20.6843, -88.5678, 1988, "Cultural"),
    ("Teotihuacan", "Mexico", 19.6925, -98.8438, 1987, "Cultural"),
    ("Statue of Liberty", "USA", 40.6892, -74.0445, 1984, "Cultural"),
    ("Yellowstone", "USA", 44.4280, -110.5885, 1978, "Natural"),
    ("Grand Canyon", "USA", 36.1069, -112.1129, 1979, "Natural"),
    ("Yosemite", "USA", 37.8651, -119.5383, 1984, "Natural"),
    ("Great Barrier Reef", "Australia", -18.2871, 147.6992, 1981, "Natural"),
    ("Uluru", "Australia", -25.3444, 131.0369, 1987, "Mixed"),
    ("Sydney Opera House", "Australia", -33.8568, 151.2153, 2007, "Cultural"),
    ("Petra", "Jordan", 30.3285, 35.4444, 1985, "Cultural"),
    ("Persepolis", "Iran", 29.9356, 52.8916, 1979, "Cultural"),
    ("Ha Long Bay", "Vietnam", 20.9101, 107.1839, 1994, "Natural"),
    ("Sigiriya", "Sri Lanka", 7.9569, 80.7597, 1982, "Cultural"),
];

/// Small built-in catalog used when neither dataset stage is reachable.
pub fn fallback_catalog() -> Catalog {
    let sites = FALLBACK_SITES
        .iter()
        .map(|&(name, country, lat, lng, year, criteria)| {
            Site::new(name, country, lat, lng, YearInscribed::Known(year), criteria)
        })
        .collect();
    Catalog::new(sites, CatalogOrigin::Fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_fallback_catalog_is_valid() {
        let catalog = fallback_catalog();
        assert_eq!(catalog.len(), 40);
        assert_eq!(catalog.origin(), CatalogOrigin::Fallback);

        for site in catalog.sites() {
            assert!(site.lat.is_finite() && (-90.0..=90.0).contains(&site.lat), "{}", site.name);
            assert!(site.lng.is_finite() && (-180.0..=180.0).contains(&site.lng), "{}", site.name);
        }

        let names: HashSet<&str> = catalog.sites().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names.len(), catalog.len());
        assert!(catalog.contains_name("Petra"));
        assert!(catalog.contains_name("Taj Mahal"));
    }
}
