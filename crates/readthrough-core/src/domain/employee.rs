//! Employee directory document.

use crate::{FetchResult, ValidateExt};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::collections::HashSet;
use validator::Validate;

/// Fixed cache key for the employee directory.
pub const EMPLOYEES_KEY: &str = "employees";

/// Field names owned by [`Employee`]; never valid as attribute keys.
pub const RESERVED_FIELDS: [&str; 3] = ["id", "name", "employee_name"];

/// A single employee record.
///
/// Fields beyond `id` and `name` are kept verbatim in `attributes` so that
/// nothing the origin sends is lost on the way through the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Employee {
    /// Employee identifier, unique within a directory.
    pub id: u64,

    /// Display name.
    #[serde(alias = "employee_name")]
    #[validate(length(min = 1, message = "Employee name must not be empty"))]
    pub name: String,

    /// Any further fields (salary, age, image...).
    #[serde(flatten)]
    pub attributes: Map<String, JsonValue>,
}

impl Employee {
    /// Creates an employee with no extra attributes.
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            attributes: Map::new(),
        }
    }

    /// Adds an extra attribute.
    ///
    /// Keys in [`RESERVED_FIELDS`] are accepted here but make the document
    /// fail validation.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }
}

/// The employee directory, serialized as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeList(Vec<Employee>);

impl EmployeeList {
    /// Creates a directory from its records.
    #[must_use]
    pub fn new(employees: Vec<Employee>) -> Self {
        Self(employees)
    }

    /// Returns the records.
    #[must_use]
    pub fn employees(&self) -> &[Employee] {
        &self.0
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the directory has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Employee>> for EmployeeList {
    fn from(employees: Vec<Employee>) -> Self {
        Self(employees)
    }
}

impl FetchResult for EmployeeList {
    fn validate_document(&self) -> Result<(), String> {
        let mut seen = HashSet::with_capacity(self.0.len());

        for employee in &self.0 {
            employee
                .validate_fields()
                .map_err(|e| format!("employee {}: {}", employee.id, e))?;

            if let Some(key) = employee
                .attributes
                .keys()
                .find(|key| RESERVED_FIELDS.contains(&key.as_str()))
            {
                return Err(format!(
                    "employee {}: attribute '{}' clashes with a built-in field",
                    employee.id, key
                ));
            }

            if !seen.insert(employee.id) {
                return Err(format!("duplicate employee id {}", employee.id));
            }
        }

        Ok(())
    }
}
