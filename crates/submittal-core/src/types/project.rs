//! Project metadata sent along with a packet.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ProductType;

/// Review status flags of a submittal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatusFlags {
    pub for_review: bool,
    pub for_approval: bool,
    pub for_record: bool,
    pub for_information_only: bool,
}

/// Document categories a submission requires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubmittalTypeFlags {
    pub tds: bool,
    pub three_part_specs: bool,
    pub test_report_icc_esr5194: bool,
    pub test_report_icc_esl1645: bool,
    pub fire_assembly: bool,
    pub fire_assembly01: bool,
    pub fire_assembly02: bool,
    pub fire_assembly03: bool,
    pub msds: bool,
    pub leed_guide: bool,
    pub installation_guide: bool,
    pub warranty: bool,
    pub samples: bool,
    pub other: bool,
}

/// Project form data as supplied by the caller.
///
/// Arbitrary caller fields are passed through untouched. The flag groups may
/// be absent; [`ProjectData::complete`] fills them in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectData {
    /// Caller fields other than the flag groups, in insertion order.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusFlags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submittal_type: Option<SubmittalTypeFlags>,
}

/// Wire key of the status flag group.
const STATUS_KEY: &str = "status";
/// Wire key of the submittal type flag group.
const SUBMITTAL_TYPE_KEY: &str = "submittalType";

impl ProjectData {
    /// Creates project data from a caller's form map.
    ///
    /// Flag groups found in the map become the typed groups, so they are
    /// never shadowed by the defaults [`ProjectData::complete`] adds.
    ///
    /// # Errors
    ///
    /// Returns an error if a flag group is not an object of booleans.
    pub fn from_fields(fields: Map<String, Value>) -> serde_json::Result<Self> {
        serde_json::from_value(Value::Object(fields))
    }

    /// Sets a caller field, routing flag group keys to the typed groups.
    ///
    /// # Errors
    ///
    /// Returns an error if a flag group value is not an object of booleans.
    pub fn insert_field(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> serde_json::Result<()> {
        let key = key.into();
        let value = value.into();
        match key.as_str() {
            STATUS_KEY => self.status = serde_json::from_value(value)?,
            SUBMITTAL_TYPE_KEY => self.submittal_type = serde_json::from_value(value)?,
            _ => {
                self.fields.insert(key, value);
            }
        }
        Ok(())
    }

    /// Sets a caller field. See [`ProjectData::insert_field`].
    ///
    /// # Errors
    ///
    /// Returns an error if a flag group value is not an object of booleans.
    pub fn with_field(
        mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> serde_json::Result<Self> {
        self.insert_field(key, value)?;
        Ok(self)
    }

    /// Sets the status flag group.
    pub fn with_status(mut self, status: StatusFlags) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the submittal type flag group.
    pub fn with_submittal_type(mut self, submittal_type: SubmittalTypeFlags) -> Self {
        self.submittal_type = Some(submittal_type);
        self
    }

    /// Returns a copy where both flag groups are present, substituting
    /// all-false groups for missing ones.
    pub fn complete(&self) -> Self {
        Self {
            fields: self.fields.clone(),
            status: Some(self.status.unwrap_or_default()),
            submittal_type: Some(self.submittal_type.unwrap_or_default()),
        }
    }

    /// Returns the project name, when the caller supplied one.
    pub fn project_name(&self) -> Option<&str> {
        self.fields
            .get("projectName")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Returns the product type the caller chose, if any.
    pub fn product_type(&self) -> Option<ProductType> {
        self.fields
            .get("productType")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(ProductType::new)
    }
}
