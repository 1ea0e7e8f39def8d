use std::{collections::BTreeMap, fmt::Display};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::value_objects::enums::payment_methods::PaymentMethod;

pub const PHONE_PREFIX: &str = "+998";

pub const REQUIRED: &str = "This field is required.";
pub const BLANK: &str = "This field may not be blank.";
pub const NOT_NULL: &str = "This field may not be null.";

/// Field-level validation failures, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Returns `value` when nothing was recorded, otherwise the collected errors.
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<&str> = self.fields().collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

/// Checks a text field: presence when `required`, non-blank and within `max_len` characters.
/// Surrounding whitespace is trimmed from the accepted value.
pub fn text_field(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
    max_len: Option<usize>,
    required: bool,
) -> Option<String> {
    let Some(raw) = value else {
        if required {
            errors.add(field, REQUIRED);
        }
        return None;
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        errors.add(field, BLANK);
        return None;
    }

    if let Some(max_len) = max_len {
        if trimmed.chars().count() > max_len {
            errors.add(
                field,
                format!("Ensure this field has no more than {} characters.", max_len),
            );
            return None;
        }
    }

    Some(trimmed.to_string())
}

pub fn check_phone(errors: &mut ValidationErrors, phone: &str) -> bool {
    if phone.starts_with(PHONE_PREFIX) {
        return true;
    }
    errors.add(
        "phone",
        format!("Phone number must start with {}.", PHONE_PREFIX),
    );
    false
}

pub fn check_email(errors: &mut ValidationErrors, email: &str) -> bool {
    if email.contains('@') {
        return true;
    }
    errors.add("email", "Enter a valid email address.");
    false
}

/// Shared phone/email gate used by bookings and contact messages. Each check only runs
/// when the corresponding value was supplied.
pub fn check_contact_details(
    errors: &mut ValidationErrors,
    phone: Option<&str>,
    email: Option<&str>,
) {
    if let Some(phone) = phone {
        check_phone(errors, phone);
    }
    if let Some(email) = email {
        check_email(errors, email);
    }
}

pub fn payment_method_field(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
    required: bool,
) -> Option<PaymentMethod> {
    let Some(raw) = value else {
        if required {
            errors.add(field, REQUIRED);
        }
        return None;
    };

    match raw.parse::<PaymentMethod>() {
        Ok(method) => Some(method),
        Err(_) => {
            errors.add(field, format!("\"{}\" is not a valid choice.", raw));
            None
        }
    }
}

/// Deserializes a loosely typed body field so that `null` stays distinct from a missing key.
pub fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

fn text_of(errors: &mut ValidationErrors, field: &str, value: &Value) -> Option<String> {
    match value {
        Value::String(raw) => Some(raw.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Null => {
            errors.add(field, NOT_NULL);
            None
        }
        _ => {
            errors.add(field, "Not a valid string.");
            None
        }
    }
}

/// [`text_field`] over a raw JSON value. Numbers are read as their decimal text.
pub fn text_value(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&Value>,
    max_len: Option<usize>,
    required: bool,
) -> Option<String> {
    match value {
        None => text_field(errors, field, None, max_len, required),
        Some(value) => {
            let raw = text_of(errors, field, value)?;
            text_field(errors, field, Some(&raw), max_len, required)
        }
    }
}

/// [`payment_method_field`] over a raw JSON value.
pub fn payment_method_value(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&Value>,
    required: bool,
) -> Option<PaymentMethod> {
    match value {
        None => payment_method_field(errors, field, None, required),
        Some(value) => {
            let raw = text_of(errors, field, value)?;
            payment_method_field(errors, field, Some(&raw), required)
        }
    }
}

/// Integer form of a JSON value. Accepts whole numbers written as `12` or `12.0`,
/// and strings holding either.
pub fn integer_of(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|float| float.fract() == 0.0 && float.abs() < i64::MAX as f64)
                .map(|float| float as i64)
        }),
        Value::String(raw) => {
            let raw = raw.trim();
            let whole = match raw.split_once('.') {
                Some((whole, fraction)) if fraction.chars().all(|digit| digit == '0') => whole,
                Some(_) => return None,
                None => raw,
            };
            whole.parse::<i64>().ok()
        }
        _ => None,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "NoneType",
        Value::Bool(_) => "bool",
        Value::Number(number) if number.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

/// Reads a related-row id. Whether the row exists is checked by the caller.
pub fn pk_value(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&Value>,
    required: bool,
) -> Option<i64> {
    let Some(value) = value else {
        if required {
            errors.add(field, REQUIRED);
        }
        return None;
    };

    if value.is_null() {
        errors.add(field, NOT_NULL);
        return None;
    }

    let id = match value {
        Value::Bool(_) => None,
        other => integer_of(other),
    };
    if id.is_none() {
        errors.add(
            field,
            format!(
                "Incorrect type. Expected pk value, received {}.",
                json_type_name(value)
            ),
        );
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn phone_must_carry_country_prefix() {
        let mut errors = ValidationErrors::new();
        assert!(check_phone(&mut errors, "+998901234567"));
        assert!(errors.is_empty());

        assert!(!check_phone(&mut errors, "901234567"));
        assert!(!check_phone(&mut errors, "+7998901234"));
        assert_eq!(errors.messages("phone").len(), 2);
    }

    #[test]
    fn email_only_needs_an_at_sign() {
        let mut errors = ValidationErrors::new();
        assert!(check_email(&mut errors, "a@x"));
        assert!(check_email(&mut errors, "@"));
        assert!(errors.is_empty());

        assert!(!check_email(&mut errors, "aziz.example.com"));
        assert!(errors.contains("email"));
    }

    #[test]
    fn contact_details_skip_absent_values() {
        let mut errors = ValidationErrors::new();
        check_contact_details(&mut errors, None, None);
        assert!(errors.is_empty());

        check_contact_details(&mut errors, Some("998901234567"), Some("a@x.com"));
        assert!(errors.contains("phone"));
        assert!(!errors.contains("email"));
    }

    #[test]
    fn text_field_reports_required_blank_and_length() {
        let mut errors = ValidationErrors::new();

        assert_eq!(text_field(&mut errors, "name", None, Some(100), false), None);
        assert!(errors.is_empty());

        assert_eq!(text_field(&mut errors, "name", None, Some(100), true), None);
        assert_eq!(errors.messages("name"), [REQUIRED.to_string()]);

        let mut errors = ValidationErrors::new();
        assert_eq!(text_field(&mut errors, "name", Some("   "), None, true), None);
        assert_eq!(errors.messages("name"), [BLANK.to_string()]);

        let mut errors = ValidationErrors::new();
        let long = "a".repeat(21);
        assert_eq!(text_field(&mut errors, "phone", Some(&long), Some(20), true), None);
        assert!(errors.messages("phone")[0].contains("20 characters"));

        let mut errors = ValidationErrors::new();
        assert_eq!(
            text_field(&mut errors, "name", Some("  Aziz "), Some(100), true),
            Some("Aziz".to_string())
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn payment_method_accepts_only_known_choices() {
        let mut errors = ValidationErrors::new();
        assert_eq!(
            payment_method_field(&mut errors, "payment_method", Some("click"), true),
            Some(PaymentMethod::Click)
        );
        assert_eq!(
            payment_method_field(&mut errors, "payment_method", Some("paypal"), true),
            None
        );
        assert_eq!(
            errors.messages("payment_method"),
            ["\"paypal\" is not a valid choice.".to_string()]
        );
    }

    #[test]
    fn text_value_reads_numbers_and_rejects_structures() {
        let mut errors = ValidationErrors::new();
        assert_eq!(
            text_value(&mut errors, "phone", Some(&json!(901234567)), Some(20), true),
            Some("901234567".to_string())
        );
        assert!(errors.is_empty());

        assert_eq!(text_value(&mut errors, "name", Some(&json!(["Aziz"])), None, true), None);
        assert_eq!(errors.messages("name"), ["Not a valid string.".to_string()]);

        assert_eq!(text_value(&mut errors, "email", Some(&Value::Null), None, false), None);
        assert_eq!(errors.messages("email"), [NOT_NULL.to_string()]);
    }

    #[test]
    fn integer_of_accepts_whole_floats() {
        assert_eq!(integer_of(&json!(12)), Some(12));
        assert_eq!(integer_of(&json!(12.0)), Some(12));
        assert_eq!(integer_of(&json!("12.0")), Some(12));
        assert_eq!(integer_of(&json!(" 7 ")), Some(7));
        assert_eq!(integer_of(&json!(12.5)), None);
        assert_eq!(integer_of(&json!("12.5")), None);
        assert_eq!(integer_of(&json!(true)), None);
    }

    #[test]
    fn pk_value_names_the_received_type() {
        let mut errors = ValidationErrors::new();
        assert_eq!(pk_value(&mut errors, "tour", Some(&json!("1")), true), Some(1));
        assert_eq!(pk_value(&mut errors, "tour", None, false), None);
        assert!(errors.is_empty());

        assert_eq!(pk_value(&mut errors, "tour", Some(&json!("abc")), true), None);
        assert_eq!(
            errors.messages("tour"),
            ["Incorrect type. Expected pk value, received str.".to_string()]
        );

        let mut errors = ValidationErrors::new();
        assert_eq!(pk_value(&mut errors, "tour", Some(&Value::Null), true), None);
        assert_eq!(errors.messages("tour"), [NOT_NULL.to_string()]);
    }

    #[test]
    fn serializes_as_field_map() {
        let mut errors = ValidationErrors::new();
        errors.add("phone", "bad");
        errors.add("email", "worse");

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({"email": ["worse"], "phone": ["bad"]}));
        assert_eq!(errors.to_string(), "invalid fields: email, phone");
    }
}
