use crate::api::project::Project;
use std::collections::BTreeMap;
use url::form_urlencoded;

/// Title used when there is nothing more specific to share.
pub const SITE_TITLE: &str = "Arizona-Sonora Borderlands";

/// Location within the app, encoded in the URL fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// No selection.
    Home,
    /// `#project/<id>`
    Project(String),
    /// `#search?<query>`
    Search(BTreeMap<String, String>),
}

impl Route {
    /// Parses a URL fragment, with or without the leading `#`.
    ///
    /// Anything unrecognised is [`Route::Home`].
    pub fn parse(hash: &str) -> Self {
        let hash = hash.strip_prefix('#').unwrap_or(hash);

        if let Some(id) = hash.strip_prefix("project/") {
            if !id.is_empty() {
                return Route::Project(id.to_string());
            }
        }

        if let Some(query) = hash.strip_prefix("search?") {
            if !query.is_empty() {
                let params = form_urlencoded::parse(query.as_bytes())
                    .into_owned()
                    .collect();
                return Route::Search(params);
            }
        }

        Route::Home
    }

    /// Fragment for this route, including `#`. Home has no fragment.
    pub fn to_hash(&self) -> String {
        match self {
            Route::Home => String::new(),
            Route::Project(id) => format!("#project/{}", id),
            Route::Search(params) => {
                let query = form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(params.iter())
                    .finish();
                format!("#search?{}", query)
            }
        }
    }

    pub fn project_id(&self) -> Option<&str> {
        match self {
            Route::Project(id) => Some(id.as_str()),
            _ => None,
        }
    }

    /// The project this route selects, if it exists in `projects`.
    /// The last project with a matching id wins.
    pub fn resolve<'a>(&self, projects: &'a [Project]) -> Option<&'a Project> {
        let id = self.project_id()?;
        projects.iter().rfind(|p| p.id.as_deref() == Some(id))
    }
}

/// Link to a project: `base_url#project/<id>`, or `base_url` alone when
/// there is no project or it has no identifier.
///
/// `base_url` is the page origin plus path, without fragment.
pub fn share_url(base_url: &str, project: Option<&Project>) -> String {
    match project.and_then(|p| p.id.as_deref()) {
        Some(id) => format!("{}{}", base_url, Route::Project(id.to_string()).to_hash()),
        None => base_url.to_string(),
    }
}

/// Human-readable message accompanying a shared link.
pub fn share_text(project: Option<&Project>) -> String {
    let Some(project) = project else {
        return format!("Check out the {} Research Map", SITE_TITLE);
    };
    let name = project
        .name
        .as_deref()
        .filter(|n| !n.is_empty())
        .unwrap_or("this project");
    let location = project
        .location
        .as_deref()
        .filter(|l| !l.is_empty())
        .map(|l| format!(" in {}", l))
        .unwrap_or_default();
    format!("Check out \"{}\"{} on the {} Research Map", name, location, SITE_TITLE)
}

/// Title for a share sheet.
pub fn share_title(project: Option<&Project>) -> String {
    project
        .and_then(|p| p.name.clone())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| SITE_TITLE.to_string())
}
