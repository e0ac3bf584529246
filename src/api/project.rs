use crate::util::coord::Located;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A research project as listed on the map.
///
/// Field names follow the source data. Deserialization is lenient: bad or
/// missing coordinates become `None` instead of failing the whole file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default, deserialize_with = "de_lenient_id")]
    pub id: Option<String>,
    #[serde(rename = "ProjectName", default, deserialize_with = "de_lenient_text")]
    pub name: Option<String>,
    #[serde(rename = "Description", default, deserialize_with = "de_lenient_text")]
    pub description: Option<String>,
    #[serde(rename = "Location", default, deserialize_with = "de_lenient_text")]
    pub location: Option<String>,
    #[serde(rename = "Latitude", default, deserialize_with = "de_lenient_number")]
    pub latitude: Option<f64>,
    #[serde(rename = "Longitude", default, deserialize_with = "de_lenient_number")]
    pub longitude: Option<f64>,
    /// Comma-separated theme list.
    #[serde(rename = "Theme", default, deserialize_with = "de_lenient_text")]
    pub theme: Option<String>,
    #[serde(rename = "ProjectCategory", default, deserialize_with = "de_lenient_text")]
    pub category: Option<String>,
    #[serde(rename = "Year", default, deserialize_with = "de_lenient_year")]
    pub year: Option<i64>,
    #[serde(rename = "Product", default, deserialize_with = "de_lenient_text")]
    pub product: Option<String>,
}

impl Project {
    pub fn new(id: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: Some(id.into()),
            latitude: Some(latitude),
            longitude: Some(longitude),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_year(mut self, year: i64) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.product = Some(product.into());
        self
    }

    /// Trimmed, non-empty theme tokens in the order they appear.
    pub fn theme_tokens(&self) -> Vec<&str> {
        self.theme
            .as_deref()
            .map(|t| t.split(',').map(str::trim).filter(|s| !s.is_empty()).collect())
            .unwrap_or_default()
    }

    /// Value of a filterable field by its source name.
    pub fn field(&self, name: &str) -> Option<String> {
        match name {
            "id" => self.id.clone(),
            "ProjectName" => self.name.clone(),
            "Description" => self.description.clone(),
            "Location" => self.location.clone(),
            "Theme" => self.theme.clone(),
            "ProjectCategory" => self.category.clone(),
            "Year" => self.year.map(|y| y.to_string()),
            "Product" => self.product.clone(),
            _ => None,
        }
    }
}

impl Located for Project {
    fn marker_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn latitude(&self) -> Option<f64> {
        self.latitude
    }

    fn longitude(&self) -> Option<f64> {
        self.longitude
    }
}

fn de_lenient_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) => Some(number_id(&n)),
        _ => None,
    })
}

// Integral floats print without a fractional part, so `1.0` and `1` agree.
fn number_id(n: &serde_json::Number) -> String {
    if n.is_f64() {
        if let Some(f) = n.as_f64().filter(|f| f.fract() == 0.0 && f.abs() < 1e21) {
            return format!("{}", f);
        }
    }
    n.to_string()
}

fn de_lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .into_iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect();
            Some(parts.join(","))
        }
        _ => None,
    })
}

// Only JSON numbers count as coordinates; numeric strings do not.
fn de_lenient_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        _ => None,
    })
}

fn de_lenient_year<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}
