//! Site content record matching the frontend SiteContent interface.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// The full payload describing all editable site text and media.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    pub hero: Hero,
    pub about: About,
    pub services: Vec<Service>,
    pub projects: Vec<Project>,
    pub contact: Contact,
    pub partners: Vec<Partner>,
    pub company: Company,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub cta_text: String,
    pub cta_secondary_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct About {
    pub title: String,
    /// Paragraphs, rendered in order.
    #[serde(default)]
    pub description: Vec<String>,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub credentials: Vec<Credential>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub title: String,
    pub description: String,
}

/// Accent color of a service card.
///
/// Unrecognized values fall back to [`ServiceColor::Blue`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ServiceColor {
    #[default]
    Blue,
    Green,
    Orange,
    Purple,
    Red,
    Yellow,
}

impl ServiceColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceColor::Blue => "blue",
            ServiceColor::Green => "green",
            ServiceColor::Orange => "orange",
            ServiceColor::Purple => "purple",
            ServiceColor::Red => "red",
            ServiceColor::Yellow => "yellow",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "blue" => Some(ServiceColor::Blue),
            "green" => Some(ServiceColor::Green),
            "orange" => Some(ServiceColor::Orange),
            "purple" => Some(ServiceColor::Purple),
            "red" => Some(ServiceColor::Red),
            "yellow" => Some(ServiceColor::Yellow),
            _ => None,
        }
    }
}

impl From<String> for ServiceColor {
    fn from(value: String) -> Self {
        ServiceColor::parse(&value).unwrap_or_else(|| {
            tracing::debug!("Unknown service color {:?}, using default", value);
            ServiceColor::default()
        })
    }
}

impl From<ServiceColor> for String {
    fn from(value: ServiceColor) -> Self {
        value.as_str().to_string()
    }
}

/// Delivery status of a project.
///
/// Unrecognized values fall back to [`ProjectStatus::Planning`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProjectStatus {
    Completed,
    InProgress,
    #[default]
    Planning,
    OnHold,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Completed => "Completed",
            ProjectStatus::InProgress => "In Progress",
            ProjectStatus::Planning => "Planning",
            ProjectStatus::OnHold => "On Hold",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Completed" => Some(ProjectStatus::Completed),
            "In Progress" => Some(ProjectStatus::InProgress),
            "Planning" => Some(ProjectStatus::Planning),
            "On Hold" => Some(ProjectStatus::OnHold),
            _ => None,
        }
    }

    /// Completed projects get the green badge on the site; everything else is blue.
    pub fn is_completed(&self) -> bool {
        matches!(self, ProjectStatus::Completed)
    }
}

impl From<String> for ProjectStatus {
    fn from(value: String) -> Self {
        ProjectStatus::parse(&value).unwrap_or_else(|| {
            tracing::debug!("Unknown project status {:?}, using default", value);
            ProjectStatus::default()
        })
    }
}

impl From<ProjectStatus> for String {
    fn from(value: ProjectStatus) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub color: ServiceColor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub location: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub units: u32,
    pub year: String,
    pub image: String,
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub status: ProjectStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub phone: String,
    pub email: String,
    pub address: String,
    pub business_hours: String,
    #[serde(default)]
    pub emergency_available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    pub id: String,
    pub name: String,
    pub logo: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub name: String,
    pub tagline: String,
    pub logo: String,
    pub social_media: SocialMedia,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialMedia {
    pub facebook: String,
    pub linkedin: String,
}

/// Accepts a number or a string starting with digits ("12 units" reads as 12);
/// anything else becomes 0.
fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let parsed = match &value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.trunc() as u32)),
        serde_json::Value::String(s) => leading_count(s),
        _ => None,
    };
    Ok(parsed.unwrap_or(0))
}

fn leading_count(s: &str) -> Option<u32> {
    let s = s.trim_start();
    let s = s.strip_prefix('+').unwrap_or(s);
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(s.len(), |(i, _)| i);
    s[..end].parse().ok()
}

/// The editable list sections of the content record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Services,
    Projects,
    Partners,
}

impl Collection {
    /// Literal prefix of client-generated item ids.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Collection::Services => "service",
            Collection::Projects => "project",
            Collection::Partners => "partner",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Services => "services",
            Collection::Projects => "projects",
            Collection::Partners => "partners",
        }
    }
}

/// The single-valued sections of the content record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Hero,
    About,
    Contact,
    Company,
}

/// Common behaviour of list items that carry a stable id.
pub trait ListItem: Clone + Serialize + serde::de::DeserializeOwned {
    const COLLECTION: Collection;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    /// A blank item as the editor creates it, before an id is assigned.
    fn blank() -> Self;
}

impl ListItem for Service {
    const COLLECTION: Collection = Collection::Services;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn blank() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            description: String::new(),
            features: vec![String::new()],
            color: ServiceColor::Blue,
        }
    }
}

impl ListItem for Project {
    const COLLECTION: Collection = Collection::Projects;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn blank() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            location: String::new(),
            units: 0,
            year: Utc::now().year().to_string(),
            image: String::new(),
            description: String::new(),
            features: vec![String::new()],
            status: ProjectStatus::Planning,
        }
    }
}

impl ListItem for Partner {
    const COLLECTION: Collection = Collection::Partners;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn blank() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            logo: String::new(),
            description: String::new(),
        }
    }
}

/// Generate an id of the form `<prefix>-<unix millis>` that is unique within `items`.
pub fn generate_id<T: ListItem>(items: &[T]) -> String {
    let prefix = T::COLLECTION.id_prefix();
    let mut stamp = Utc::now().timestamp_millis();
    loop {
        let candidate = format!("{}-{}", prefix, stamp);
        if !items.iter().any(|item| item.id() == candidate) {
            return candidate;
        }
        stamp += 1;
    }
}

/// Append a new item (blank fields overlaid by `item`) with a freshly generated id.
pub fn add_item<T: ListItem>(items: &mut Vec<T>, item: Option<T>) -> T {
    let mut item = item.unwrap_or_else(T::blank);
    item.set_id(generate_id(items));
    items.push(item.clone());
    item
}

/// Replace the fields of the item with `id`, keeping the id itself.
pub fn update_item<T: ListItem>(items: &mut [T], id: &str, mut item: T) -> Option<T> {
    let slot = items.iter_mut().find(|existing| existing.id() == id)?;
    item.set_id(id.to_string());
    *slot = item.clone();
    Some(item)
}

/// Remove the item with `id`; returns whether anything was removed.
pub fn remove_item<T: ListItem>(items: &mut Vec<T>, id: &str) -> bool {
    let before = items.len();
    items.retain(|item| item.id() != id);
    items.len() != before
}
