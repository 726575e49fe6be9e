//! Edit/create form state.
//!
//! One input per schema field, typed by the field's type. Select fields and
//! booleans become choices; booleans offer `true`/`false` and are sent as those
//! strings. The form performs no validation of its own: the backend's
//! rejection message is shown on the form.

use formwork_api::RecordPayload;
use formwork_types::{FieldType, ObjectSchema, Record, RecordId};
use formwork_util::date_handling::{parse_date, parse_datetime};
use serde_json::{Number, Value};

use crate::format::{boolean_value, string_repr};

const BOOLEAN_OPTIONS: [&str; 2] = ["true", "false"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormInput {
    /// Free text; also used for numbers, dates and date-times.
    Text(String),
    Choice { options: Vec<String>, selected: Option<usize> },
}

impl FormInput {
    /// Current value as shown in the input.
    pub fn display(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Choice { options, selected } => selected.and_then(|index| options.get(index)).map_or("", String::as_str),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub field_type: FieldType,
    pub required: bool,
    pub input: FormInput,
    /// Stored value and the text it was pre-filled as. Dates go back
    /// untouched unless that text was edited.
    prefilled: Option<(Value, String)>,
}

impl FormField {
    /// Input hint shown next to the value.
    pub fn hint(&self) -> Option<&'static str> {
        match self.field_type {
            FieldType::Date => Some("YYYY-MM-DD"),
            FieldType::DateTime => Some("YYYY-MM-DDTHH:MM:SS"),
            FieldType::Number => Some("number"),
            _ => None,
        }
    }
}

/// Form for creating a record (`record_id` is `None`) or editing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditForm {
    record_id: Option<RecordId>,
    fields: Vec<FormField>,
    focused: usize,
    error: Option<String>,
    /// Request sequence of the save in flight.
    saving: Option<u64>,
}

impl EditForm {
    /// Blank form with one input per schema field.
    pub fn for_create(schema: &ObjectSchema) -> Self {
        Self::build(None, schema, None)
    }

    /// Form pre-filled from `record`.
    pub fn for_edit(schema: &ObjectSchema, record: &Record) -> Self {
        Self::build(Some(record.id.clone()), schema, Some(record))
    }

    fn build(record_id: Option<RecordId>, schema: &ObjectSchema, record: Option<&Record>) -> Self {
        let fields = schema
            .fields
            .iter()
            .map(|field| {
                let value = record.and_then(|record| record.value(&field.name));
                let mut prefilled = None;
                let input = match field.field_type {
                    FieldType::Boolean => FormInput::Choice {
                        options: BOOLEAN_OPTIONS.iter().map(|option| option.to_string()).collect(),
                        selected: value.and_then(boolean_value).map(|flag| if flag { 0 } else { 1 }),
                    },
                    FieldType::Select if !field.options.is_empty() => {
                        let mut options = field.options.clone();
                        let current = value.map(|value| string_repr(Some(value)).into_owned());
                        let selected = current.map(|current| match options.iter().position(|option| *option == current) {
                            Some(index) => index,
                            None => {
                                options.push(current);
                                options.len() - 1
                            }
                        });
                        FormInput::Choice { options, selected }
                    }
                    FieldType::Date | FieldType::DateTime => {
                        let text = match (value, field.field_type) {
                            (Some(value), FieldType::Date) => date_input_text(value),
                            (Some(value), _) => datetime_input_text(value),
                            (None, _) => String::new(),
                        };
                        prefilled = value.map(|value| (value.clone(), text.clone()));
                        FormInput::Text(text)
                    }
                    _ => FormInput::Text(string_repr(value).into_owned()),
                };
                FormField {
                    name: field.name.clone(),
                    label: field.display_label().to_string(),
                    field_type: field.field_type,
                    required: field.is_required,
                    input,
                    prefilled,
                }
            })
            .collect();

        Self {
            record_id,
            fields,
            focused: 0,
            error: None,
            saving: None,
        }
    }

    pub fn record_id(&self) -> Option<&RecordId> {
        self.record_id.as_ref()
    }

    pub fn is_create(&self) -> bool {
        self.record_id.is_none()
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn is_saving(&self) -> bool {
        self.saving.is_some()
    }

    pub(crate) fn begin_saving(&mut self, sequence: u64) {
        self.saving = Some(sequence);
    }

    /// Whether this form sent the save issued as `sequence`.
    pub(crate) fn awaits(&self, sequence: u64) -> bool {
        self.saving == Some(sequence)
    }

    pub(crate) fn finish_saving(&mut self) {
        self.saving = None;
    }

    /// Replace a text input's content. Returns false for unknown fields and
    /// choice inputs.
    pub fn set_text(&mut self, name: &str, text: impl Into<String>) -> bool {
        match self.fields.iter_mut().find(|field| field.name == name) {
            Some(FormField {
                input: FormInput::Text(current),
                ..
            }) => {
                *current = text.into();
                true
            }
            _ => false,
        }
    }

    /// Select a choice by its option text. Returns false when the field is
    /// not a choice or the option does not exist.
    pub fn choose(&mut self, name: &str, option: &str) -> bool {
        match self.fields.iter_mut().find(|field| field.name == name) {
            Some(FormField {
                input: FormInput::Choice { options, selected },
                ..
            }) => match options.iter().position(|candidate| candidate == option) {
                Some(index) => {
                    *selected = Some(index);
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    /// Set a field from a user-typed value, whatever its input kind.
    pub fn set_value(&mut self, name: &str, value: &str) -> bool {
        self.set_text(name, value) || self.choose(name, value)
    }

    pub fn focused_index(&self) -> usize {
        self.focused
    }

    pub fn focused_field(&self) -> Option<&FormField> {
        self.fields.get(self.focused)
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + 1) % self.fields.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + self.fields.len() - 1) % self.fields.len();
        }
    }

    /// Type into the focused text input.
    pub fn push_char(&mut self, ch: char) {
        if let Some(FormField {
            input: FormInput::Text(text),
            ..
        }) = self.fields.get_mut(self.focused)
        {
            text.push(ch);
        }
    }

    /// Backspace in the focused input; clears a choice.
    pub fn pop_char(&mut self) {
        match self.fields.get_mut(self.focused).map(|field| &mut field.input) {
            Some(FormInput::Text(text)) => {
                text.pop();
            }
            Some(FormInput::Choice { selected, .. }) => *selected = None,
            None => {}
        }
    }

    /// Step the focused choice forward or backward, wrapping around.
    pub fn cycle_choice(&mut self, forward: bool) {
        if let Some(FormField {
            input: FormInput::Choice { options, selected },
            ..
        }) = self.fields.get_mut(self.focused)
        {
            if options.is_empty() {
                return;
            }
            let len = options.len();
            *selected = Some(match (*selected, forward) {
                (None, true) => 0,
                (None, false) => len - 1,
                (Some(index), true) => (index + 1) % len,
                (Some(index), false) => (index + len - 1) % len,
            });
        }
    }

    /// Values to send to the backend, typed per field.
    ///
    /// Empty inputs are sent as `null`. Numbers that parse are sent as JSON
    /// numbers; anything else is sent as entered and left for the backend to
    /// accept or reject.
    pub fn to_payload(&self) -> RecordPayload {
        self.fields
            .iter()
            .map(|field| (field.name.clone(), payload_value(field)))
            .collect()
    }
}

fn payload_value(field: &FormField) -> Value {
    match &field.input {
        FormInput::Choice { options, selected } => {
            let Some(option) = selected.and_then(|index| options.get(index)) else {
                return Value::Null;
            };
            match field.field_type {
                FieldType::Boolean => Value::String((option == "true").to_string()),
                _ => Value::String(option.clone()),
            }
        }
        FormInput::Text(text) => {
            if let Some((stored, shown)) = &field.prefilled
                && shown == text
            {
                return stored.clone();
            }
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Value::Null;
            }
            match field.field_type {
                FieldType::Number => number_value(trimmed).unwrap_or_else(|| Value::String(trimmed.to_string())),
                FieldType::Boolean => boolean_value(&Value::String(trimmed.to_string()))
                    .map(|flag| Value::String(flag.to_string()))
                    .unwrap_or_else(|| Value::String(trimmed.to_string())),
                _ => Value::String(text.clone()),
            }
        }
    }
}

fn number_value(text: &str) -> Option<Value> {
    if let Ok(integer) = text.parse::<i64>() {
        return Some(Value::Number(integer.into()));
    }
    let float = text.parse::<f64>().ok().filter(|float| float.is_finite())?;
    Number::from_f64(float).map(Value::Number)
}

fn date_input_text(value: &Value) -> String {
    let raw = string_repr(Some(value));
    parse_date(&raw)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| raw.into_owned())
}

fn datetime_input_text(value: &Value) -> String {
    let raw = string_repr(Some(value));
    parse_datetime(&raw)
        .map(|date_time| date_time.format("%Y-%m-%dT%H:%M:%S").to_string())
        .unwrap_or_else(|| raw.into_owned())
}
