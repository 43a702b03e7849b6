//! Request validation shared by every HTTP entry point.
//!
//! Each request type implements [`Validate`], turning an arbitrary decoded JSON value into
//! a typed value or a [`ValidationError`] listing the violated constraints in field order.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

/// Minimum transcript length. Lengths are UTF-16 code units, matching the browser's
/// `String.length`.
pub const MIN_TRANSCRIPT_LEN: usize = 10;
/// Minimum instruction length, in UTF-16 code units.
pub const MIN_INSTRUCTION_LEN: usize = 3;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

/// A single violated constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// One or more violations. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    violations: Vec<Violation>,
}

impl ValidationError {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            violations: vec![Violation::new(field, message)],
        }
    }

    fn from_violations(violations: Vec<Violation>) -> Option<Self> {
        (!violations.is_empty()).then_some(Self { violations })
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn first(&self) -> &Violation {
        &self.violations[0]
    }

    /// Message of the first violation; the one surfaced to callers.
    pub fn message(&self) -> &str {
        &self.first().message
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for ValidationError {}

pub trait Validate: Sized {
    fn validate(value: &Value) -> Result<Self, ValidationError>;
}

/// Decode a raw request body and validate it.
pub fn parse_body<T: Validate>(body: &[u8]) -> Result<T, ValidationError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|_| ValidationError::single("body", "Request body is not valid JSON"))?;
    T::validate(&value)
}

pub fn is_valid_email(address: &str) -> bool {
    EMAIL_PATTERN.is_match(address)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarizeRequest {
    pub transcript: String,
    pub instruction: String,
}

impl Validate for SummarizeRequest {
    fn validate(value: &Value) -> Result<Self, ValidationError> {
        let mut fields = Fields::new(value)?;

        let transcript = fields.min_length(
            "transcript",
            "Transcript",
            MIN_TRANSCRIPT_LEN,
            "Transcript is too short",
        );

        // The browser client sends `prompt`; `instruction` is accepted as an alias.
        let instruction_key = if fields.contains("prompt") || !fields.contains("instruction") {
            "prompt"
        } else {
            "instruction"
        };
        let instruction = fields.min_length(
            instruction_key,
            "Instruction",
            MIN_INSTRUCTION_LEN,
            "Instruction is too short",
        );

        fields.finish()?;
        match (transcript, instruction) {
            (Some(transcript), Some(instruction)) => Ok(Self {
                transcript,
                instruction,
            }),
            _ => Err(ValidationError::single("body", "Invalid request")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailRequest {
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl Validate for EmailRequest {
    fn validate(value: &Value) -> Result<Self, ValidationError> {
        let mut fields = Fields::new(value)?;
        let recipients = fields.recipients("to");
        let subject = fields.min_length("subject", "Subject", 1, "Subject is required");
        let body = fields.min_length("body", "Body", 1, "Body is required");

        fields.finish()?;
        match (recipients, subject, body) {
            (Some(recipients), Some(subject), Some(body)) => Ok(Self {
                recipients,
                subject,
                body,
            }),
            _ => Err(ValidationError::single("body", "Invalid request")),
        }
    }
}

/// Field reader over a JSON object that accumulates violations instead of stopping at
/// the first one.
struct Fields<'a> {
    object: &'a Map<String, Value>,
    violations: Vec<Violation>,
}

impl<'a> Fields<'a> {
    fn new(value: &'a Value) -> Result<Self, ValidationError> {
        let object = value
            .as_object()
            .ok_or_else(|| ValidationError::single("body", "Request body must be a JSON object"))?;
        Ok(Self {
            object,
            violations: Vec::new(),
        })
    }

    fn contains(&self, key: &str) -> bool {
        self.object.contains_key(key)
    }

    fn string(&mut self, key: &str, label: &str) -> Option<&'a str> {
        let object = self.object;
        match object.get(key) {
            None | Some(Value::Null) => {
                self.violations
                    .push(Violation::new(key, format!("{label} is required")));
                None
            }
            Some(Value::String(value)) => Some(value.as_str()),
            Some(_) => {
                self.violations
                    .push(Violation::new(key, format!("{label} must be a string")));
                None
            }
        }
    }

    fn min_length(&mut self, key: &str, label: &str, min: usize, message: &str) -> Option<String> {
        let value = self.string(key, label)?;
        if value.encode_utf16().count() < min {
            self.violations.push(Violation::new(key, message));
            return None;
        }
        Some(value.to_string())
    }

    fn recipients(&mut self, key: &str) -> Option<Vec<String>> {
        let object = self.object;
        let items = match object.get(key) {
            Some(Value::Array(items)) => items,
            None | Some(Value::Null) => {
                self.violations
                    .push(Violation::new(key, "At least one recipient"));
                return None;
            }
            Some(_) => {
                self.violations.push(Violation::new(
                    key,
                    "Recipients must be a list of email addresses",
                ));
                return None;
            }
        };

        if items.is_empty() {
            self.violations
                .push(Violation::new(key, "At least one recipient"));
            return None;
        }

        let before = self.violations.len();
        let mut recipients = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match item.as_str() {
                Some(address) if is_valid_email(address) => recipients.push(address.to_string()),
                _ => self
                    .violations
                    .push(Violation::new(format!("{key}[{index}]"), "Invalid email")),
            }
        }

        (self.violations.len() == before).then_some(recipients)
    }

    fn finish(self) -> Result<(), ValidationError> {
        match ValidationError::from_violations(self.violations) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn email_pattern_accepts_basic_addresses() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last+tag@sub.example.co.uk"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("a@@b.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn valid_email_request_is_typed() {
        let request = EmailRequest::validate(&json!({
            "to": ["a@b.com", "c@d.org"],
            "subject": "S",
            "body": "B"
        }))
        .expect("valid");

        assert_eq!(request.recipients, vec!["a@b.com", "c@d.org"]);
        assert_eq!(request.subject, "S");
        assert_eq!(request.body, "B");
    }

    #[test]
    fn empty_recipient_list_is_rejected() {
        let err = EmailRequest::validate(&json!({"to": [], "subject": "S", "body": "B"}))
            .expect_err("no recipients");
        assert_eq!(err.message(), "At least one recipient");
        assert_eq!(err.first().field, "to");
    }

    #[test]
    fn malformed_recipient_names_its_position() {
        let err = EmailRequest::validate(&json!({
            "to": ["a@b.com", "not-an-address", 7],
            "subject": "S",
            "body": "B"
        }))
        .expect_err("bad recipient");

        assert_eq!(err.message(), "Invalid email");
        let fields: Vec<&str> = err.violations().iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["to[1]", "to[2]"]);
    }

    #[test]
    fn violations_are_reported_in_field_order() {
        let err = EmailRequest::validate(&json!({"to": "a@b.com", "subject": ""}))
            .expect_err("several problems");

        let messages: Vec<&str> = err
            .violations()
            .iter()
            .map(|v| v.message.as_str())
            .collect();
        assert_eq!(
            messages,
            vec![
                "Recipients must be a list of email addresses",
                "Subject is required",
                "Body is required",
            ]
        );
        assert_eq!(err.to_string(), "Recipients must be a list of email addresses");
    }

    #[test]
    fn wrong_types_are_reported() {
        let err = EmailRequest::validate(&json!({"to": ["a@b.com"], "subject": 3, "body": "B"}))
            .expect_err("subject type");
        assert_eq!(err.message(), "Subject must be a string");
        assert_eq!(err.first().field, "subject");
    }

    #[test]
    fn summarize_request_accepts_prompt_key() {
        let request = SummarizeRequest::validate(&json!({
            "transcript": "Alice: we ship on Friday.",
            "prompt": "Bullet points"
        }))
        .expect("valid");
        assert_eq!(request.transcript, "Alice: we ship on Friday.");
        assert_eq!(request.instruction, "Bullet points");
    }

    #[test]
    fn summarize_request_accepts_instruction_alias() {
        let request = SummarizeRequest::validate(&json!({
            "transcript": "Alice: we ship on Friday.",
            "instruction": "Action items"
        }))
        .expect("valid");
        assert_eq!(request.instruction, "Action items");
    }

    #[test]
    fn short_transcript_is_rejected_first() {
        let err = SummarizeRequest::validate(&json!({"transcript": "short", "prompt": "x"}))
            .expect_err("too short");
        assert_eq!(err.message(), "Transcript is too short");
        assert_eq!(err.violations().len(), 2);
        assert_eq!(err.violations()[1].message, "Instruction is too short");
    }

    #[test]
    fn astral_characters_count_as_two_units() {
        let ok = SummarizeRequest::validate(&json!({
            "transcript": "😀😀😀😀😀",
            "prompt": "abc"
        }));
        assert!(ok.is_ok(), "five emoji are ten UTF-16 units");

        let err = SummarizeRequest::validate(&json!({
            "transcript": "😀😀😀😀",
            "prompt": "😀"
        }))
        .expect_err("eight units and two units");
        assert_eq!(err.message(), "Transcript is too short");
        assert_eq!(err.violations()[1].message, "Instruction is too short");
    }

    #[test]
    fn lengths_count_code_units_not_bytes() {
        // Nine code units, but more than ten bytes.
        let err = SummarizeRequest::validate(&json!({
            "transcript": "ééééééééé",
            "prompt": "abc"
        }))
        .expect_err("nine code units");
        assert_eq!(err.message(), "Transcript is too short");

        let ok = SummarizeRequest::validate(&json!({
            "transcript": "éééééééééé",
            "prompt": "abc"
        }));
        assert!(ok.is_ok());
    }

    #[test]
    fn missing_fields_are_required() {
        let err = SummarizeRequest::validate(&json!({})).expect_err("empty object");
        assert_eq!(err.message(), "Transcript is required");
        assert_eq!(err.violations()[1].field, "prompt");
        assert_eq!(err.violations()[1].message, "Instruction is required");
    }

    #[test]
    fn non_object_and_non_json_bodies_are_rejected() {
        let err = SummarizeRequest::validate(&json!(["transcript"])).expect_err("array");
        assert_eq!(err.message(), "Request body must be a JSON object");

        let err = parse_body::<EmailRequest>(b"{not json").expect_err("garbage");
        assert_eq!(err.message(), "Request body is not valid JSON");
        assert_eq!(err.first().field, "body");
    }

    #[test]
    fn parse_body_decodes_and_validates() {
        let body = br#"{"to":["a@b.com"],"subject":"S","body":"B"}"#;
        let request: EmailRequest = parse_body(body).expect("valid body");
        assert_eq!(request.recipients, vec!["a@b.com"]);
    }
}
