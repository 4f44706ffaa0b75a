use serde::{Deserialize, Serialize};

use crate::domain::common::*;

/// A tutoring client along with the billing defaults used when logging sessions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub hourly_rate: f64,
    /// One-way distance in miles.
    pub distance_from_home: f64,
    #[serde(default)]
    pub notes: String,
}

impl Client {
    pub fn new(name: impl Into<String>, hourly_rate: f64, distance_from_home: f64) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            email: None,
            phone: None,
            address: None,
            hourly_rate,
            distance_from_home,
            notes: String::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

impl Identifiable for Client {
    fn id(&self) -> &str {
        &self.id
    }
}

impl NamedEntity for Client {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Client {
    fn display_label(&self) -> String {
        format!("{} (${:.2}/hr)", self.name, self.hourly_rate)
    }
}
