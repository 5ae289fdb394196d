use crate::core::csv_line;
use crate::domain::model::{Site, YearInscribed};

pub const NAME_COLUMN: &str = "name_en";
pub const COUNTRY_COLUMN: &str = "states_name_en";
pub const LATITUDE_COLUMN: &str = "latitude";
pub const LONGITUDE_COLUMN: &str = "longitude";
pub const YEAR_COLUMN: &str = "date_inscribed";
pub const CATEGORY_COLUMN: &str = "category_short";

const UNKNOWN_SITE: &str = "Unknown Site";
const UNKNOWN_COUNTRY: &str = "Unknown Country";
const UNKNOWN_CRITERIA: &str = "Unknown";

/// Header → column-index table, resolved once per load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SiteSchema {
    pub name: Option<usize>,
    pub country: Option<usize>,
    pub latitude: Option<usize>,
    pub longitude: Option<usize>,
    pub year: Option<usize>,
    pub category: Option<usize>,
}

impl SiteSchema {
    pub fn from_header<S: AsRef<str>>(header: &[S]) -> Self {
        let position = |column: &str| {
            header
                .iter()
                .position(|h| h.as_ref().trim_start_matches('\u{feff}') == column)
        };

        Self {
            name: position(NAME_COLUMN),
            country: position(COUNTRY_COLUMN),
            latitude: position(LATITUDE_COLUMN),
            longitude: position(LONGITUDE_COLUMN),
            year: position(YEAR_COLUMN),
            category: position(CATEGORY_COLUMN),
        }
    }

    /// Number of fields a row needs so that every resolved column is present.
    pub fn min_fields(&self) -> usize {
        [
            self.name,
            self.country,
            self.latitude,
            self.longitude,
            self.year,
            self.category,
        ]
        .into_iter()
        .flatten()
        .max()
        .map_or(0, |max| max + 1)
    }

    pub fn missing_columns(&self) -> Vec<&'static str> {
        [
            (self.name, NAME_COLUMN),
            (self.country, COUNTRY_COLUMN),
            (self.latitude, LATITUDE_COLUMN),
            (self.longitude, LONGITUDE_COLUMN),
            (self.year, YEAR_COLUMN),
            (self.category, CATEGORY_COLUMN),
        ]
        .into_iter()
        .filter_map(|(index, column)| index.is_none().then_some(column))
        .collect()
    }

    /// Coerce one raw row into a `Site`. `None` means the row is unusable.
    pub fn site_from_row<S: AsRef<str>>(&self, fields: &[S]) -> Option<Site> {
        if fields.len() < self.min_fields() {
            return None;
        }

        let field = |index: Option<usize>| {
            index
                .and_then(|i| fields.get(i))
                .map(AsRef::<str>::as_ref)
                .filter(|f| !f.is_empty())
        };

        let lat = field(self.latitude).and_then(parse_coordinate)?;
        let lng = field(self.longitude).and_then(parse_coordinate)?;

        Some(Site {
            name: field(self.name).unwrap_or(UNKNOWN_SITE).to_string(),
            country: field(self.country).unwrap_or(UNKNOWN_COUNTRY).to_string(),
            lat,
            lng,
            year_inscribed: field(self.year).map_or(YearInscribed::Unknown, parse_year),
            criteria: field(self.category).unwrap_or(UNKNOWN_CRITERIA).to_string(),
        })
    }
}

fn parse_coordinate(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Leading-integer parse: `"1983"`, `"1983-05"` and `"1983.0"` all give 1983.
fn parse_year(raw: &str) -> YearInscribed {
    let raw = raw.trim();
    let digits_start = usize::from(raw.starts_with(['-', '+']));
    let digits_end = raw[digits_start..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(raw.len(), |offset| digits_start + offset);

    if digits_end == digits_start {
        return YearInscribed::Unknown;
    }

    raw[..digits_end]
        .parse()
        .map(YearInscribed::Known)
        .unwrap_or(YearInscribed::Unknown)
}

/// Result of normalizing a whole CSV document.
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub sites: Vec<Site>,
    pub skipped_rows: usize,
    pub schema: SiteSchema,
}

/// Parse a CSV document (header line first) into sites, preserving row order.
/// Blank lines are ignored; rows that are too short or lack finite
/// coordinates are counted in `skipped_rows`.
pub fn normalize(text: &str) -> Normalized {
    let mut lines = csv_line::lines(text);

    let Some(header_line) = lines.next() else {
        return Normalized::default();
    };
    let schema = SiteSchema::from_header(&csv_line::parse_line(header_line));

    let missing = schema.missing_columns();
    if !missing.is_empty() {
        tracing::warn!("Dataset header is missing columns: {}", missing.join(", "));
    }

    let mut sites = Vec::new();
    let mut skipped_rows = 0;

    for line in lines.filter(|l| !l.is_empty()) {
        let fields = csv_line::parse_line(line);
        match schema.site_from_row(&fields) {
            Some(site) => sites.push(site),
            None => skipped_rows += 1,
        }
    }

    tracing::debug!(
        "Normalized {} sites ({} rows skipped)",
        sites.len(),
        skipped_rows
    );

    Normalized {
        sites,
        skipped_rows,
        schema,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "name_en,states_name_en,latitude,longitude,date_inscribed,category_short";

    #[test]
    fn test_taj_mahal_row() {
        let text = format!("{}\n\"Taj Mahal\",India,27.1751,78.0421,1983,Cultural\n", HEADER);
        let result = normalize(&text);

        assert_eq!(result.sites.len(), 1);
        assert_eq!(
            result.sites[0],
            Site::new("Taj Mahal", "India", 27.1751, 78.0421, YearInscribed::Known(1983), "Cultural")
        );
        assert_eq!(result.skipped_rows, 0);
    }

    #[test]
    fn test_non_numeric_latitude_drops_row() {
        let text = format!(
            "{}\nPetra,Jordan,30.3285,35.4444,1985,Cultural\nBroken,Nowhere,N/A,10.0,2000,Natural\nAngkor,Cambodia,13.4125,103.8670,1992,Cultural",
            HEADER
        );
        let result = normalize(&text);

        assert_eq!(result.sites.len(), 2);
        assert_eq!(result.skipped_rows, 1);
        assert_eq!(result.sites[0].name, "Petra");
        assert_eq!(result.sites[1].name, "Angkor");
    }

    #[test]
    fn test_non_finite_and_missing_coordinates_drop_row() {
        let text = format!(
            "{}\nA,X,NaN,1,2000,Natural\nB,X,1,inf,2000,Natural\nC,X,,1,2000,Natural\nD,X,1",
            HEADER
        );
        let result = normalize(&text);
        assert!(result.sites.is_empty());
        assert_eq!(result.skipped_rows, 4);
    }

    #[test]
    fn test_bad_year_becomes_unknown() {
        let text = format!(
            "{}\nA,X,1,2,not-a-year,Mixed\nB,X,1,2,1983-05-01,Mixed\nC,X,1,2,,Mixed",
            HEADER
        );
        let result = normalize(&text);

        let years: Vec<YearInscribed> = result.sites.iter().map(|s| s.year_inscribed).collect();
        assert_eq!(
            years,
            vec![YearInscribed::Unknown, YearInscribed::Known(1983), YearInscribed::Unknown]
        );
    }

    #[test]
    fn test_empty_fields_get_defaults() {
        let text = format!("{}\n,,10.5,20.5,1990,", HEADER);
        let result = normalize(&text);

        let site = &result.sites[0];
        assert_eq!(site.name, "Unknown Site");
        assert_eq!(site.country, "Unknown Country");
        assert_eq!(site.criteria, "Unknown");
    }

    #[test]
    fn test_blank_lines_and_crlf_are_ignored() {
        let text = format!(
            "{}\r\n\r\nPetra,Jordan,30.3285,35.4444,1985,Cultural\r\n   \r\n",
            HEADER
        );
        let result = normalize(&text);
        assert_eq!(result.sites.len(), 1);
        assert_eq!(result.skipped_rows, 0);
        assert_eq!(result.sites[0].criteria, "Cultural");
    }

    #[test]
    fn test_columns_resolved_by_name_not_position() {
        let text = "id_no,category_short,longitude,latitude,name_en,date_inscribed,states_name_en\n\
                    668,Cultural,35.4444,30.3285,Petra,1985,Jordan";
        let result = normalize(text);

        let site = &result.sites[0];
        assert_eq!(site.name, "Petra");
        assert_eq!(site.country, "Jordan");
        assert_eq!(site.lat, 30.3285);
        assert_eq!(site.lng, 35.4444);
        assert_eq!(site.year_inscribed, YearInscribed::Known(1985));
    }

    #[test]
    fn test_missing_optional_column_falls_back_to_default() {
        let text = "name_en,latitude,longitude\nPetra,30.3285,35.4444";
        let result = normalize(text);

        assert_eq!(result.sites.len(), 1);
        assert_eq!(result.sites[0].country, "Unknown Country");
        assert_eq!(result.sites[0].year_inscribed, YearInscribed::Unknown);
        assert_eq!(
            result.schema.missing_columns(),
            vec![COUNTRY_COLUMN, YEAR_COLUMN, CATEGORY_COLUMN]
        );
    }

    #[test]
    fn test_missing_coordinate_column_drops_every_row() {
        let text = "name_en,latitude\nPetra,30.3285\nAngkor,13.4125";
        let result = normalize(text);
        assert!(result.sites.is_empty());
        assert_eq!(result.skipped_rows, 2);
    }

    #[test]
    fn test_header_bom_is_ignored() {
        let text = format!("\u{feff}{}\nPetra,Jordan,30.3285,35.4444,1985,Cultural", HEADER);
        let result = normalize(&text);
        assert_eq!(result.sites[0].name, "Petra");
    }

    #[test]
    fn test_duplicate_names_are_kept() {
        let text = format!(
            "{}\nTwin,A,1,1,2000,Natural\nTwin,B,2,2,2001,Natural",
            HEADER
        );
        let result = normalize(&text);
        assert_eq!(result.sites.len(), 2);
        assert_eq!(result.sites[1].country, "B");
    }

    #[test]
    fn test_empty_input() {
        let result = normalize("");
        assert!(result.sites.is_empty());
        assert_eq!(result.skipped_rows, 0);
    }
}
