use std::borrow::Cow;

use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError};

use crate::errors::FieldError;

pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// How a field is drawn on an edit page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Widget {
    Text,
    TextArea,
    /// `(value, label)` pairs.
    Select(&'static [(&'static str, &'static str)]),
}

#[derive(Debug, Clone, Copy)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub widget: Widget,
}

impl FormField {
    pub const fn text(name: &'static str, label: &'static str, placeholder: &'static str) -> Self {
        FormField { name, label, placeholder, widget: Widget::Text }
    }

    pub const fn textarea(name: &'static str, label: &'static str, placeholder: &'static str) -> Self {
        FormField { name, label, placeholder, widget: Widget::TextArea }
    }

    pub const fn select(
        name: &'static str,
        label: &'static str,
        choices: &'static [(&'static str, &'static str)],
    ) -> Self {
        FormField { name, label, placeholder: "", widget: Widget::Select(choices) }
    }

    pub fn html_id(&self) -> String {
        format!("id_{}", self.name)
    }
}

/// A urlencoded form bound to one record type.
///
/// `FIELDS` and `values()` line up index for index, so a form can be drawn
/// with whatever the user typed last.
pub trait ModelForm: Validate + Default + Clone + DeserializeOwned + Send + Sync + 'static {
    const FIELDS: &'static [FormField];

    fn values(&self) -> Vec<String>;

    /// Trims surrounding whitespace from every field before validation.
    fn normalize(&mut self);

    fn value_of(&self, name: &str) -> Option<String> {
        Self::FIELDS
            .iter()
            .position(|f| f.name == name)
            .and_then(|idx| self.values().into_iter().nth(idx))
    }
}

/// Field-level messages collected from a failed submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormErrors(Vec<FieldError>);

impl FormErrors {
    pub fn new(errors: Vec<FieldError>) -> Self {
        FormErrors(errors)
    }

    pub fn for_field<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |e| e.field == name)
            .map(|e| e.message.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required").with_message(Cow::Borrowed(REQUIRED_MESSAGE)));
    }
    Ok(())
}

pub(crate) fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_required() {
        assert!(not_blank("").is_err());
        assert!(not_blank("  \n\t").is_err());
        assert!(not_blank("x").is_ok());

        let err = not_blank("").unwrap_err();
        assert_eq!(err.message.as_deref(), Some(REQUIRED_MESSAGE));
    }

    #[test]
    fn trim_in_place_strips_both_ends() {
        let mut value = String::from("  Post 3 \n");
        trim_in_place(&mut value);
        assert_eq!(value, "Post 3");
    }

    #[test]
    fn form_errors_filter_by_field() {
        let errors = FormErrors::new(vec![
            FieldError { field: "title".into(), message: "a".into() },
            FieldError { field: "text".into(), message: "b".into() },
            FieldError { field: "title".into(), message: "c".into() },
        ]);

        assert_eq!(errors.for_field("title").collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(errors.for_field("subtitle").count(), 0);
        assert_eq!(errors.len(), 3);
    }
}
