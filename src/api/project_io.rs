use crate::api::project::Project;
use crate::util::error::AtlasError;
use csv::StringRecord;
use serde_json::Value;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info, warn};

/// Column positions of the known project fields in a CSV header.
struct ColumnIndices {
    id: Option<usize>,
    name: Option<usize>,
    description: Option<usize>,
    location: Option<usize>,
    latitude: Option<usize>,
    longitude: Option<usize>,
    theme: Option<usize>,
    category: Option<usize>,
    year: Option<usize>,
    product: Option<usize>,
}

impl ColumnIndices {
    fn from_headers(headers: &StringRecord) -> Self {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        Self {
            id: find("id"),
            name: find("ProjectName"),
            description: find("Description"),
            location: find("Location"),
            latitude: find("Latitude"),
            longitude: find("Longitude"),
            theme: find("Theme"),
            category: find("ProjectCategory"),
            year: find("Year"),
            product: find("Product"),
        }
    }
}

/// Parses a JSON array of project records.
///
/// Entries that are not objects are dropped; fields inside an object are
/// read leniently (see [`Project`]).
pub fn parse_projects_json(text: &str) -> Result<Vec<Project>, AtlasError> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Array(items) = value else {
        return Err(AtlasError::JsonError(
            "expected a JSON array of projects".to_string(),
        ));
    };

    let total = items.len();
    let mut projects = Vec::with_capacity(total);
    for item in items {
        if !item.is_object() {
            continue;
        }
        projects.push(serde_json::from_value::<Project>(item)?);
    }

    if projects.len() < total {
        warn!(
            dropped = total - projects.len(),
            "skipped non-object entries in project list"
        );
    }
    Ok(projects)
}

/// Reads projects from a JSON file holding an array of records.
pub fn load_projects_json(path: impl AsRef<Path>) -> Result<Vec<Project>, AtlasError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let projects = parse_projects_json(&text)?;
    info!(path = %path.display(), count = projects.len(), "loaded projects");
    Ok(projects)
}

/// Reads projects from a CSV file whose headers use the source field names.
///
/// Unparseable coordinates and years become `None`, matching the JSON loader.
pub fn load_projects_csv(path: impl AsRef<Path>) -> Result<Vec<Project>, AtlasError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| AtlasError::IoError(e.to_string()))?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AtlasError::CsvError(e.to_string()))?
        .clone();
    let cols = ColumnIndices::from_headers(&headers);

    if cols.latitude.is_none() || cols.longitude.is_none() {
        warn!(path = %path.display(), "CSV has no Latitude/Longitude columns");
    }

    let mut projects = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result.map_err(|e| AtlasError::CsvError(e.to_string()))?;
        let project = record_to_project(&record, &cols);
        if project.latitude.is_none() || project.longitude.is_none() {
            debug!(row, "project row without usable coordinates");
        }
        projects.push(project);
    }

    info!(path = %path.display(), count = projects.len(), "loaded projects");
    Ok(projects)
}

/// Picks the loader from the file extension: `.csv` is CSV, anything else JSON.
pub fn load_projects(path: impl AsRef<Path>) -> Result<Vec<Project>, AtlasError> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if is_csv {
        load_projects_csv(path)
    } else {
        load_projects_json(path)
    }
}

fn record_to_project(record: &StringRecord, cols: &ColumnIndices) -> Project {
    let text = |idx: Option<usize>| -> Option<String> {
        let value = record.get(idx?)?;
        if value.trim().is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    };
    let number = |idx: Option<usize>| -> Option<f64> {
        record
            .get(idx?)?
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    };

    Project {
        id: text(cols.id).map(|s| s.trim().to_string()),
        name: text(cols.name),
        description: text(cols.description),
        location: text(cols.location),
        latitude: number(cols.latitude),
        longitude: number(cols.longitude),
        theme: text(cols.theme),
        category: text(cols.category),
        year: text(cols.year).and_then(|s| s.trim().parse().ok()),
        product: text(cols.product),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::coord::Located;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_parse_projects_json() -> Result<(), AtlasError> {
        let json = r#"[
            {"id": 1, "ProjectName": "A", "Latitude": 32.0, "Longitude": -110.0},
            {"id": "2", "ProjectName": "B", "Latitude": "bad", "Longitude": -110.0},
            42
        ]"#;
        let projects = parse_projects_json(json)?;

        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].id.as_deref(), Some("1"));
        assert_eq!(projects[1].latitude, None);
        Ok(())
    }

    #[test]
    fn test_parse_projects_json_requires_array() {
        let result = parse_projects_json(r#"{"id": 1}"#);
        assert!(matches!(result, Err(AtlasError::JsonError(_))));
    }

    #[test]
    fn test_load_projects_csv() -> Result<(), AtlasError> {
        let dir = tempdir()?;
        let path = dir.path().join("projects.csv");

        let mut file = File::create(&path)?;
        writeln!(file, "id,ProjectName,Latitude,Longitude,Theme,Year")?;
        writeln!(file, "p1,Wall Study,32.0,-110.0,\"Borders, Water\",2019")?;
        writeln!(file, "p2,No Coords,,,Energy,unknown")?;
        drop(file);

        let projects = load_projects_csv(&path)?;
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].lat_lon(), Some((32.0, -110.0)));
        assert_eq!(projects[0].theme_tokens(), vec!["Borders", "Water"]);
        assert_eq!(projects[0].year, Some(2019));
        assert_eq!(projects[1].latitude, None);
        assert_eq!(projects[1].year, None);
        Ok(())
    }

    #[test]
    fn test_load_projects_dispatches_on_extension() -> Result<(), AtlasError> {
        let dir = tempdir()?;
        let json_path = dir.path().join("projects.json");
        std::fs::write(&json_path, r#"[{"id":"a","Latitude":1.0,"Longitude":2.0}]"#)?;

        let projects = load_projects(&json_path)?;
        assert_eq!(projects.len(), 1);
        Ok(())
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_projects_json("/definitely/not/here.json");
        assert!(matches!(result, Err(AtlasError::IoError(_))));
    }
}
