//! Place records extracted from a listing's detail view.

use std::fmt;

/// Introduction used when the detail view has no summary text.
pub const NO_INTRODUCTION: &str = "None Found";

/// Whether a place advertises an amenity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Availability {
    Yes,
    #[default]
    No,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }

    /// Anything other than a case-insensitive "yes" reads as `No`.
    pub fn from_str_lenient(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("yes") {
            Self::Yes
        } else {
            Self::No
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scraped listing.
///
/// `name` is the identity key: a run never yields two places with the same
/// literal name, and never yields a place with an empty one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Place {
    pub name: String,
    pub address: String,
    pub website: String,
    pub phone_number: String,
    pub whatsapp: String,
    pub reviews_count: Option<u64>,
    pub reviews_average: Option<f64>,
    pub store_shopping: Availability,
    pub in_store_pickup: Availability,
    pub store_delivery: Availability,
    pub place_type: String,
    pub opens_at: String,
    pub introduction: String,
}

impl Place {
    /// Column headers, in output order.
    pub const COLUMNS: [&'static str; 13] = [
        "name",
        "address",
        "website",
        "phone_number",
        "whatsapp",
        "reviews_count",
        "reviews_average",
        "store_shopping",
        "in_store_pickup",
        "store_delivery",
        "place_type",
        "opens_at",
        "introduction",
    ];

    /// Create a place with only its name set.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Render every column as text, in [`Place::COLUMNS`] order.
    /// Missing numbers become empty cells.
    pub fn to_record(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.address.clone(),
            self.website.clone(),
            self.phone_number.clone(),
            self.whatsapp.clone(),
            self.reviews_count.map(|c| c.to_string()).unwrap_or_default(),
            self.reviews_average
                .map(|a| a.to_string())
                .unwrap_or_default(),
            self.store_shopping.to_string(),
            self.in_store_pickup.to_string(),
            self.store_delivery.to_string(),
            self.place_type.clone(),
            self.opens_at.clone(),
            self.introduction.clone(),
        ]
    }

    /// Rebuild a place from `(column, cell)` pairs read back from disk.
    ///
    /// Unknown columns are ignored and missing ones keep their defaults.
    /// Counts written as floats by other tools (`"12.0"`) are accepted.
    pub fn from_cells<'a, I>(cells: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, String)>,
    {
        let mut place = Place::default();
        for (column, value) in cells {
            match column.trim() {
                "name" => place.name = value,
                "address" => place.address = value,
                "website" => place.website = value,
                "phone_number" => place.phone_number = value,
                "whatsapp" => place.whatsapp = value,
                "reviews_count" => place.reviews_count = parse_stored_count(&value),
                "reviews_average" => place.reviews_average = value.trim().parse().ok(),
                "store_shopping" => place.store_shopping = Availability::from_str_lenient(&value),
                "in_store_pickup" => place.in_store_pickup = Availability::from_str_lenient(&value),
                "store_delivery" => place.store_delivery = Availability::from_str_lenient(&value),
                "place_type" => place.place_type = value,
                "opens_at" => place.opens_at = value,
                "introduction" => place.introduction = value,
                _ => {}
            }
        }
        place
    }
}

fn parse_stored_count(value: &str) -> Option<u64> {
    let value = value.trim();
    if let Ok(count) = value.parse::<u64>() {
        return Some(count);
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
        .map(|f| f as u64)
}
