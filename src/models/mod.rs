//! Portal objects decoded from the JSON REST API
//!
//! Only the fields the client relies on are typed; everything else the
//! portal sends is kept verbatim in `extra`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// The logged-in user (`user/current.json`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub eid: Option<String>,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A course or project site (`site.json`, `site/<id>.json`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "entityURL", default)]
    pub entity_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub props: HashMap<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Site {
    /// A string-valued site property
    pub fn prop(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(Value::as_str)
    }

    /// Banner course reference number
    pub fn banner_crn(&self) -> Option<&str> {
        self.prop("banner-crn")
    }

    pub fn term(&self) -> Option<&str> {
        self.prop("term")
    }

    pub fn term_eid(&self) -> Option<&str> {
        self.prop("term_eid")
    }

    /// Portal (HTML) URL of the site, where the tool links live
    pub fn portal_url(&self) -> String {
        self.entity_url.replace("direct", "portal")
    }
}

/// Envelope of `site.json`
#[derive(Debug, Deserialize)]
pub(crate) struct SiteListing {
    #[serde(default)]
    pub site_collection: Option<Vec<Site>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(rename = "siteTitle", default)]
    pub site_title: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Envelope of the announcement listings
#[derive(Debug, Deserialize)]
pub(crate) struct AnnouncementListing {
    #[serde(default, deserialize_with = "null_as_default")]
    pub announcement_collection: Vec<Announcement>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
