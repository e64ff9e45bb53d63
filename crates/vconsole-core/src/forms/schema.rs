//! Schema row sub-editor nested inside the template editor.

use super::{FormFields, Rule, ValidationErrors};
use crate::models::SchemaEntry;

static NAME_RULES: &[Rule] = &[Rule::Required("Please enter Schema Name and Schema URL.")];
static URL_RULES: &[Rule] = &[Rule::Required("Please enter Schema Name and Schema URL.")];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaField {
    Name,
    Url,
    Attributes,
}

/// Draft of one schema row. Lives only while the sub-editor is open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaRowForm {
    pub schema_name: String,
    pub schema_url: String,
    attributes: Vec<String>,
    errors: ValidationErrors,
}

impl SchemaRowForm {
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// Starts a new, empty attribute name.
    pub fn add_attribute(&mut self) {
        self.attributes.push(String::new());
    }

    pub fn remove_attribute(&mut self, index: usize) -> bool {
        if index < self.attributes.len() {
            self.attributes.remove(index);
            true
        } else {
            false
        }
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Validated row with blank attribute names dropped.
    pub fn validate(&mut self) -> Result<SchemaEntry, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.check("schemaName", &self.schema_name, NAME_RULES);
        errors.check("schema", &self.schema_url, URL_RULES);
        self.errors = errors.clone();
        errors.into_result(|| SchemaEntry {
            schema_name: self.schema_name.trim().to_string(),
            schema: self.schema_url.trim().to_string(),
            names: self
                .attributes
                .iter()
                .map(|a| a.trim())
                .filter(|a| !a.is_empty())
                .map(str::to_string)
                .collect(),
        })
    }
}

impl FormFields for SchemaRowForm {
    type Field = SchemaField;

    const FIELDS: &'static [SchemaField] =
        &[SchemaField::Name, SchemaField::Url, SchemaField::Attributes];

    fn label(field: SchemaField) -> &'static str {
        match field {
            SchemaField::Name => "Schema Name",
            SchemaField::Url => "Schema URL",
            SchemaField::Attributes => "Attributes",
        }
    }

    fn text(&self, field: SchemaField) -> Option<&str> {
        match field {
            SchemaField::Name => Some(&self.schema_name),
            SchemaField::Url => Some(&self.schema_url),
            SchemaField::Attributes => self.attributes.last().map(String::as_str),
        }
    }

    /// Typing on the attribute list edits the last attribute, starting one if
    /// the list is empty.
    fn text_mut(&mut self, field: SchemaField) -> Option<&mut String> {
        match field {
            SchemaField::Name => Some(&mut self.schema_name),
            SchemaField::Url => Some(&mut self.schema_url),
            SchemaField::Attributes => {
                if self.attributes.is_empty() {
                    self.add_attribute();
                }
                self.attributes.last_mut()
            }
        }
    }

    fn error(&self, field: SchemaField) -> Option<&str> {
        match field {
            SchemaField::Name => self.errors.get("schemaName"),
            SchemaField::Url => self.errors.get("schema"),
            SchemaField::Attributes => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_and_url_are_required() {
        let mut form = SchemaRowForm::default();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(form.error(SchemaField::Name).is_some());

        form.schema_name = "Passport".into();
        assert!(form.validate().is_err());
        assert!(form.error(SchemaField::Name).is_none());
        assert!(form.error(SchemaField::Url).is_some());
    }

    #[test]
    fn blank_attributes_are_dropped() {
        let mut form = SchemaRowForm {
            schema_name: " Passport ".into(),
            schema_url: "https://s/passport".into(),
            ..Default::default()
        };
        form.text_mut(SchemaField::Attributes).unwrap().push_str("given_name");
        form.add_attribute();
        form.add_attribute();
        form.text_mut(SchemaField::Attributes).unwrap().push_str(" family_name ");

        let row = form.validate().unwrap();
        assert_eq!(row.schema_name, "Passport");
        assert_eq!(row.names, vec!["given_name".to_string(), "family_name".to_string()]);
        assert!(form.remove_attribute(1));
        assert!(!form.remove_attribute(5));
        assert_eq!(form.attributes().len(), 2);
    }
}
