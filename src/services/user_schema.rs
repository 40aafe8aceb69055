/*
 * Responsibility
 * - 型なしの JSON を User (id / name / email) に検証・変換する
 * - 違反はフィールドごとにすべて集める (最初の 1 件で止めない)
 * - 違反が 1 件でもあれば User は生成しない
 */
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const NAME_MIN_CHARS: usize = 3;
pub const NAME_MAX_CHARS: usize = 100;

const KNOWN_FIELDS: [&str; 3] = ["id", "name", "email"];

/// The validated user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    Required,
    Type,
    Constraint,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: String,
    pub kind: ViolationKind,
    pub message: String,
}

impl Violation {
    fn new(field: &str, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            kind,
            message: message.into(),
        }
    }
}

static EMAIL_LOCAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*$")
        .expect("email local-part pattern")
});

static EMAIL_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?$").expect("email label pattern")
});

pub fn validate(candidate: &Value) -> Result<User, Vec<Violation>> {
    let Some(object) = candidate.as_object() else {
        return Err(vec![Violation::new(
            "body",
            ViolationKind::Type,
            "body must be a JSON object",
        )]);
    };

    let id = check_id(object.get("id"));
    let name = check_name(object.get("name"));
    let email = check_email(object.get("email"));
    let unknown = unknown_fields(object);

    match (id, name, email) {
        (Ok(id), Ok(name), Ok(email)) if unknown.is_empty() => Ok(User { id, name, email }),
        (id, name, email) => {
            let mut violations: Vec<Violation> = [id.err(), name.err(), email.err()]
                .into_iter()
                .flatten()
                .collect();
            violations.extend(unknown);
            Err(violations)
        }
    }
}

fn check_id(value: Option<&Value>) -> Result<u64, Violation> {
    let value = present("id", value)?;
    let Value::Number(n) = value else {
        return Err(Violation::new("id", ViolationKind::Type, "id must be a number"));
    };

    match n.as_u64() {
        Some(id) if id > 0 => Ok(id),
        Some(_) => Err(positive_violation()),
        None if n.as_i64().is_some() => Err(positive_violation()),
        None => match n.as_f64() {
            Some(f) if f <= 0.0 => Err(positive_violation()),
            // 1.0 / 1e3 are integers by value
            Some(f) if f.is_finite() && f.fract() == 0.0 && f < u64::MAX as f64 => Ok(f as u64),
            _ => Err(Violation::new(
                "id",
                ViolationKind::Constraint,
                "id must be an integer",
            )),
        },
    }
}

fn positive_violation() -> Violation {
    Violation::new("id", ViolationKind::Constraint, "id must be a positive number")
}

fn check_name(value: Option<&Value>) -> Result<String, Violation> {
    let value = present("name", value)?;
    let Value::String(name) = value else {
        return Err(Violation::new("name", ViolationKind::Type, "name must be a string"));
    };

    let len = name.chars().count();
    if len < NAME_MIN_CHARS {
        return Err(Violation::new(
            "name",
            ViolationKind::Constraint,
            format!("name length must be at least {NAME_MIN_CHARS} characters long"),
        ));
    }
    if len > NAME_MAX_CHARS {
        return Err(Violation::new(
            "name",
            ViolationKind::Constraint,
            format!("name length must be less than or equal to {NAME_MAX_CHARS} characters long"),
        ));
    }

    Ok(name.clone())
}

fn check_email(value: Option<&Value>) -> Result<String, Violation> {
    let value = present("email", value)?;
    let Value::String(email) = value else {
        return Err(Violation::new("email", ViolationKind::Type, "email must be a string"));
    };

    if !is_valid_email(email) {
        return Err(Violation::new(
            "email",
            ViolationKind::Constraint,
            "email must be a valid email",
        ));
    }

    Ok(email.clone())
}

fn present<'a>(field: &str, value: Option<&'a Value>) -> Result<&'a Value, Violation> {
    match value {
        // explicit null counts as absent
        None | Some(Value::Null) => Err(Violation::new(
            field,
            ViolationKind::Required,
            format!("{field} is required"),
        )),
        Some(v) => Ok(v),
    }
}

fn unknown_fields(object: &Map<String, Value>) -> Vec<Violation> {
    object
        .keys()
        .filter(|k| !KNOWN_FIELDS.contains(&k.as_str()))
        .map(|k| Violation::new(k, ViolationKind::Unknown, format!("\"{k}\" is not allowed")))
        .collect()
}

fn is_valid_email(email: &str) -> bool {
    if email.len() > 254 {
        return false;
    }
    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };
    if local.is_empty() || local.len() > 64 || !EMAIL_LOCAL.is_match(local) {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || !labels.iter().all(|l| EMAIL_LABEL.is_match(l)) {
        return false;
    }

    labels
        .last()
        .is_some_and(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()))
}
