use crate::api::project::Project;
use std::collections::{BTreeSet, HashMap};

/// Themes and combined tags precomputed for one project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectTags {
    /// Unique theme tokens followed by the category, if any.
    pub tags: Vec<String>,
    /// Unique theme tokens in source order.
    pub themes: Vec<String>,
}

/// Tags keyed by project identifier. Projects without an id are keyed by
/// their position in the input slice, prefixed with `#`.
pub type ProjectTagsMap = HashMap<String, ProjectTags>;

fn tags_key(project: &Project, index: usize) -> String {
    project
        .id
        .clone()
        .unwrap_or_else(|| format!("#{}", index))
}

fn push_unique(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|v| v == value) {
        values.push(value.to_string());
    }
}

/// Trimmed, non-empty, unique values of a field, sorted ascending.
pub fn extract_unique_values(projects: &[Project], field: &str) -> Vec<String> {
    let values: BTreeSet<String> = projects
        .iter()
        .filter_map(|p| p.field(field))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect();
    values.into_iter().collect()
}

/// Every theme token across all projects, sorted.
pub fn extract_themes(projects: &[Project]) -> Vec<String> {
    let themes: BTreeSet<String> = projects
        .iter()
        .flat_map(|p| p.theme_tokens())
        .map(str::to_string)
        .collect();
    themes.into_iter().collect()
}

pub fn extract_categories(projects: &[Project]) -> Vec<String> {
    extract_unique_values(projects, "ProjectCategory")
}

pub fn extract_products(projects: &[Project]) -> Vec<String> {
    extract_unique_values(projects, "Product")
}

/// Distinct years, newest first.
pub fn extract_years(projects: &[Project]) -> Vec<i64> {
    let years: BTreeSet<i64> = projects.iter().filter_map(|p| p.year).collect();
    years.into_iter().rev().collect()
}

pub fn build_project_tags_map(projects: &[Project]) -> ProjectTagsMap {
    projects
        .iter()
        .enumerate()
        .map(|(index, project)| {
            let mut themes = Vec::new();
            for token in project.theme_tokens() {
                push_unique(&mut themes, token);
            }

            let mut tags = themes.clone();
            if let Some(category) = project.category.as_deref().map(str::trim) {
                if !category.is_empty() {
                    push_unique(&mut tags, category);
                }
            }

            (tags_key(project, index), ProjectTags { tags, themes })
        })
        .collect()
}

/// Current search text and facet selections of the project list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub search_query: String,
    pub selected_tags: Vec<String>,
    pub selected_categories: Vec<String>,
    pub selected_years: Vec<i64>,
    pub selected_products: Vec<String>,
}

fn toggle<T: PartialEq>(items: &mut Vec<T>, value: T) {
    if let Some(pos) = items.iter().position(|v| *v == value) {
        items.remove(pos);
    } else {
        items.push(value);
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, query: impl Into<String>) -> Self {
        self.search_query = query.into();
        self
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn toggle_tag(&mut self, tag: impl Into<String>) {
        toggle(&mut self.selected_tags, tag.into());
    }

    pub fn toggle_category(&mut self, category: impl Into<String>) {
        toggle(&mut self.selected_categories, category.into());
    }

    pub fn toggle_year(&mut self, year: i64) {
        toggle(&mut self.selected_years, year);
    }

    pub fn toggle_product(&mut self, product: impl Into<String>) {
        toggle(&mut self.selected_products, product.into());
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn has_active_filters(&self) -> bool {
        !self.search_query.is_empty()
            || !self.selected_tags.is_empty()
            || !self.selected_categories.is_empty()
            || !self.selected_years.is_empty()
            || !self.selected_products.is_empty()
    }

    /// Whether `project` passes every active filter.
    ///
    /// `tags` is looked up under the same key [`build_project_tags_map`] used.
    pub fn matches(&self, project: &Project, index: usize, tags_map: &ProjectTagsMap) -> bool {
        if !self.search_query.is_empty() {
            let query = self.search_query.to_lowercase();
            let contains = |field: &Option<String>| {
                field
                    .as_deref()
                    .is_some_and(|v| v.to_lowercase().contains(&query))
            };
            if !contains(&project.name)
                && !contains(&project.description)
                && !contains(&project.location)
            {
                return false;
            }
        }

        if !self.selected_tags.is_empty() {
            let project_tags = tags_map
                .get(&tags_key(project, index))
                .map(|t| t.tags.as_slice())
                .unwrap_or(&[]);
            if !self.selected_tags.iter().any(|t| project_tags.contains(t)) {
                return false;
            }
        }

        if !self.selected_categories.is_empty() {
            let category = project.category.as_deref().unwrap_or("").trim();
            if !self.selected_categories.iter().any(|c| c == category) {
                return false;
            }
        }

        if !self.selected_years.is_empty() {
            match project.year {
                Some(year) if self.selected_years.contains(&year) => {}
                _ => return false,
            }
        }

        if !self.selected_products.is_empty() {
            let product = project.product.as_deref().unwrap_or("").trim();
            if !self.selected_products.iter().any(|p| p == product) {
                return false;
            }
        }

        true
    }
}

/// Projects passing `state`, in input order.
pub fn filter_projects<'a>(
    projects: &'a [Project],
    state: &FilterState,
    tags_map: &ProjectTagsMap,
) -> Vec<&'a Project> {
    projects
        .iter()
        .enumerate()
        .filter(|(index, project)| state.matches(project, *index, tags_map))
        .map(|(_, project)| project)
        .collect()
}
