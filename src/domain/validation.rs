//! Declarative payload validation.
//!
//! Every payload type owns a [`Schema`]: an ordered table of field rules plus
//! struct-level predicates, built once per type (usually inside a `LazyLock`
//! static) and read-only afterwards. [`Validate::validate`] walks that table
//! depth-first in declaration order and collects every failing field into a
//! [`ValidationReport`]. No I/O happens here.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use url::Url;

const EMAIL_PATTERN: &str = r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$";

static EMAIL: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(EMAIL_PATTERN).ok());

/// A single declarative constraint attached to a payload field.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// The field must be present (non-zero, non-empty).
    Required,
    /// Upper bound: length for strings/sequences, value for numbers.
    Lte(f64),
    /// Lower bound: length for strings/sequences, value for numbers.
    Gte(f64),
    /// Same as [`Rule::Gte`].
    Min(f64),
    /// Same as [`Rule::Lte`].
    Max(f64),
    /// Exact length (or exact value for numbers).
    Len(usize),
    /// Absolute URL with a scheme and a host. Reachability is not checked.
    Url,
    /// Pragmatic email address grammar.
    Email,
    /// International phone number (digits with an optional leading `+`).
    E164,
    /// Number (or numeric string) in `[-90, 90]`.
    Latitude,
    /// Number (or numeric string) in `[-180, 180]`.
    Longitude,
    /// Value must equal one of the tokens (case-sensitive).
    OneOf(Vec<String>),
    /// Required when the sibling `field` renders as `value`.
    RequiredIf { field: String, value: String },
    /// Apply the remaining rules to every element of a sequence.
    Dive,
    /// Skip the remaining rules when the value is zero.
    OmitEmpty,
}

impl Rule {
    pub fn lte(n: impl Into<f64>) -> Self {
        Self::Lte(n.into())
    }

    pub fn gte(n: impl Into<f64>) -> Self {
        Self::Gte(n.into())
    }

    pub fn min(n: impl Into<f64>) -> Self {
        Self::Min(n.into())
    }

    pub fn max(n: impl Into<f64>) -> Self {
        Self::Max(n.into())
    }

    pub fn len(n: usize) -> Self {
        Self::Len(n)
    }

    pub fn one_of<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::OneOf(tokens.into_iter().map(Into::into).collect())
    }

    pub fn required_if(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::RequiredIf {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Declarative tag of this rule, as reported in [`Violation::rule`].
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Lte(_) => "lte",
            Self::Gte(_) => "gte",
            Self::Min(_) => "min",
            Self::Max(_) => "max",
            Self::Len(_) => "len",
            Self::Url => "url",
            Self::Email => "email",
            Self::E164 => "e164",
            Self::Latitude => "latitude",
            Self::Longitude => "longitude",
            Self::OneOf(_) => "oneof",
            Self::RequiredIf { .. } => "required_if",
            Self::Dive => "dive",
            Self::OmitEmpty => "omitempty",
        }
    }

    /// Parameter of this rule in tag syntax (empty for parameterless rules).
    pub fn param(&self) -> String {
        match self {
            Self::Lte(n) | Self::Gte(n) | Self::Min(n) | Self::Max(n) => n.to_string(),
            Self::Len(n) => n.to_string(),
            Self::OneOf(tokens) => tokens.join(" "),
            Self::RequiredIf { field, value } => format!("{field} {value}"),
            _ => String::new(),
        }
    }

    fn accepts(&self, value: &FieldValue<'_>, sibling: &dyn Fn(&str) -> Option<String>) -> bool {
        match self {
            Self::Required => !value.is_zero(),
            Self::RequiredIf { field, value: expected } => {
                if sibling(field).as_deref() == Some(expected.as_str()) {
                    !value.is_zero()
                } else {
                    true
                }
            }
            Self::Lte(n) | Self::Max(n) => value.size().is_none_or(|size| size <= *n),
            Self::Gte(n) | Self::Min(n) => value.size().is_none_or(|size| size >= *n),
            Self::Len(n) => value.size().is_none_or(|size| size == *n as f64),
            Self::Url => value.check_str(is_absolute_url),
            Self::Email => value.check_str(is_email),
            Self::E164 => value.check_str(is_e164),
            Self::Latitude => value.check_number(-90.0, 90.0),
            Self::Longitude => value.check_number(-180.0, 180.0),
            Self::OneOf(tokens) => match value {
                FieldValue::Missing => true,
                other => other
                    .render()
                    .is_some_and(|rendered| tokens.iter().any(|token| *token == rendered)),
            },
            Self::Dive | Self::OmitEmpty => true,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let param = self.param();
        if param.is_empty() {
            f.write_str(self.tag())
        } else {
            write!(f, "{}={param}", self.tag())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
/// A tag string could not be turned into [`Rules`].
pub enum RuleParseError {
    #[error("unknown rule tag: {0}")]
    UnknownTag(String),

    #[error("rule {tag} requires a parameter")]
    MissingParam { tag: String },

    #[error("invalid parameter for rule {tag}: {param:?}")]
    InvalidParam { tag: String, param: String },
}

/// Ordered rule list for one field. `,` in tag syntax is AND, left to right.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rules(Vec<Rule>);

impl Rules {
    pub fn as_slice(&self) -> &[Rule] {
        &self.0
    }
}

impl From<Vec<Rule>> for Rules {
    fn from(value: Vec<Rule>) -> Self {
        Self(value)
    }
}

impl<const N: usize> From<[Rule; N]> for Rules {
    fn from(value: [Rule; N]) -> Self {
        Self(value.into())
    }
}

impl FromStr for Rules {
    type Err = RuleParseError;

    /// Parse tag syntax such as `"omitempty,lte=24,oneof=TEXT IMAGE"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(parse_rule)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

fn parse_rule(token: &str) -> Result<Rule, RuleParseError> {
    let (tag, param) = match token.split_once('=') {
        Some((tag, param)) => (tag.trim(), Some(param.trim())),
        None => (token, None),
    };

    Ok(match tag {
        "required" => Rule::Required,
        "lte" => Rule::Lte(number_param(tag, param)?),
        "gte" => Rule::Gte(number_param(tag, param)?),
        "min" => Rule::Min(number_param(tag, param)?),
        "max" => Rule::Max(number_param(tag, param)?),
        "len" => {
            let raw = require_param(tag, param)?;
            Rule::Len(raw.parse().map_err(|_| invalid_param(tag, raw))?)
        }
        "url" => Rule::Url,
        "email" => Rule::Email,
        "e164" => Rule::E164,
        "latitude" => Rule::Latitude,
        "longitude" => Rule::Longitude,
        "oneof" => Rule::one_of(require_param(tag, param)?.split_whitespace()),
        "required_if" => {
            let raw = require_param(tag, param)?;
            let mut parts = raw.split_whitespace();
            match (parts.next(), parts.next(), parts.next()) {
                (Some(field), Some(value), None) => Rule::required_if(field, value),
                _ => return Err(invalid_param(tag, raw)),
            }
        }
        "dive" => Rule::Dive,
        "omitempty" => Rule::OmitEmpty,
        other => return Err(RuleParseError::UnknownTag(other.to_owned())),
    })
}

fn require_param<'p>(tag: &str, param: Option<&'p str>) -> Result<&'p str, RuleParseError> {
    param
        .filter(|p| !p.is_empty())
        .ok_or_else(|| RuleParseError::MissingParam {
            tag: tag.to_owned(),
        })
}

fn number_param(tag: &str, param: Option<&str>) -> Result<f64, RuleParseError> {
    let raw = require_param(tag, param)?;
    raw.parse().map_err(|_| invalid_param(tag, raw))
}

fn invalid_param(tag: &str, param: &str) -> RuleParseError {
    RuleParseError::InvalidParam {
        tag: tag.to_owned(),
        param: param.to_owned(),
    }
}

/// Borrowed view of a payload field, as seen by the rules.
#[derive(Clone)]
pub enum FieldValue<'a> {
    /// An absent optional value.
    Missing,
    Str(&'a str),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// A nested payload, validated with its own schema.
    Struct(&'a dyn Validate),
    Seq(Vec<FieldValue<'a>>),
}

impl<'a> FieldValue<'a> {
    pub fn nested<V: Validate>(value: &'a V) -> Self {
        Self::Struct(value)
    }

    pub fn nested_opt<V: Validate>(value: &'a Option<V>) -> Self {
        match value {
            Some(value) => Self::Struct(value),
            None => Self::Missing,
        }
    }

    pub fn nested_seq<V: Validate>(values: &'a [V]) -> Self {
        Self::Seq(values.iter().map(|value| Self::Struct(value)).collect())
    }

    /// Zero value in the sense of `required`/`omitempty`.
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::Str(s) => s.is_empty(),
            Self::Int(n) => *n == 0,
            Self::Float(n) => *n == 0.0,
            Self::Bool(b) => !b,
            Self::Struct(_) => false,
            Self::Seq(items) => items.is_empty(),
        }
    }

    fn size(&self) -> Option<f64> {
        match self {
            Self::Str(s) => Some(s.chars().count() as f64),
            Self::Seq(items) => Some(items.len() as f64),
            Self::Int(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            Self::Missing | Self::Bool(_) | Self::Struct(_) => None,
        }
    }

    fn render(&self) -> Option<String> {
        match self {
            Self::Missing => Some(String::new()),
            Self::Str(s) => Some((*s).to_owned()),
            Self::Int(n) => Some(n.to_string()),
            Self::Float(n) => Some(n.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Struct(_) | Self::Seq(_) => None,
        }
    }

    fn check_str(&self, check: fn(&str) -> bool) -> bool {
        match self {
            Self::Missing => true,
            Self::Str(s) => check(s),
            _ => false,
        }
    }

    fn check_number(&self, min: f64, max: f64) -> bool {
        let number = match self {
            Self::Missing => return true,
            Self::Int(n) => *n as f64,
            Self::Float(n) => *n,
            Self::Str(s) => match s.trim().parse::<f64>() {
                Ok(n) => n,
                Err(_) => return false,
            },
            _ => return false,
        };
        (min..=max).contains(&number)
    }
}

impl fmt::Debug for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("Missing"),
            Self::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Self::Int(n) => f.debug_tuple("Int").field(n).finish(),
            Self::Float(n) => f.debug_tuple("Float").field(n).finish(),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Struct(_) => f.write_str("Struct(..)"),
            Self::Seq(items) => f.debug_tuple("Seq").field(items).finish(),
        }
    }
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(value: &'a str) -> Self {
        Self::Str(value)
    }
}

impl<'a> From<&'a String> for FieldValue<'a> {
    fn from(value: &'a String) -> Self {
        Self::Str(value)
    }
}

impl<'a> From<&'a bool> for FieldValue<'a> {
    fn from(value: &'a bool) -> Self {
        Self::Bool(*value)
    }
}

macro_rules! int_field_value {
    ($($ty:ty),*) => {
        $(
            impl<'a> From<&'a $ty> for FieldValue<'a> {
                fn from(value: &'a $ty) -> Self {
                    Self::Int(i64::from(*value))
                }
            }
        )*
    };
}

int_field_value!(i8, i16, i32, i64, u8, u16, u32);

impl<'a> From<&'a u64> for FieldValue<'a> {
    fn from(value: &'a u64) -> Self {
        Self::Int(i64::try_from(*value).unwrap_or(i64::MAX))
    }
}

impl<'a> From<&'a f32> for FieldValue<'a> {
    fn from(value: &'a f32) -> Self {
        Self::Float(f64::from(*value))
    }
}

impl<'a> From<&'a f64> for FieldValue<'a> {
    fn from(value: &'a f64) -> Self {
        Self::Float(*value)
    }
}

impl<'a, T> From<&'a Option<T>> for FieldValue<'a>
where
    &'a T: Into<FieldValue<'a>>,
{
    fn from(value: &'a Option<T>) -> Self {
        match value {
            Some(value) => value.into(),
            None => Self::Missing,
        }
    }
}

impl<'a, T> From<&'a Vec<T>> for FieldValue<'a>
where
    &'a T: Into<FieldValue<'a>>,
{
    fn from(values: &'a Vec<T>) -> Self {
        Self::Seq(values.iter().map(Into::into).collect())
    }
}

/// Location of a field inside a payload, e.g. `messages[0].destinations[1].to`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(String);

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn field(&self, name: &str) -> Self {
        if self.0.is_empty() {
            Self(name.to_owned())
        } else {
            Self(format!("{}.{name}", self.0))
        }
    }

    pub fn index(&self, idx: usize) -> Self {
        Self(format!("{}[{idx}]", self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One failing field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Violation {
    /// Path of the failing field.
    pub field: String,
    /// Tag of the failed rule (`required`, `lte`, ...).
    pub rule: String,
    /// Rule parameter in tag syntax; empty for parameterless rules.
    pub param: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.param.is_empty() {
            write!(f, "{}: failed on '{}'", self.field, self.rule)
        } else {
            write!(f, "{}: failed on '{}={}'", self.field, self.rule, self.param)
        }
    }
}

/// Every violation found in a payload. Empty means valid.
///
/// The report owns its data and holds no reference to the validated value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.violations.iter()
    }

    /// Record a violation.
    pub fn push(
        &mut self,
        field: impl Into<String>,
        rule: impl Into<String>,
        param: impl Into<String>,
    ) {
        self.violations.push(Violation {
            field: field.into(),
            rule: rule.into(),
            param: param.into(),
        });
    }

    /// `Ok(())` for an empty report, `Err(self)` otherwise.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl IntoIterator for ValidationReport {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationReport {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.violations.is_empty() {
            return f.write_str("no violations");
        }
        for (idx, violation) in self.violations.iter().enumerate() {
            if idx > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationReport {}

/// A payload that can check its own constraints.
pub trait Validate {
    /// Append the violations of `self` to `report`, with field paths under `path`.
    fn validate_into(&self, path: &FieldPath, report: &mut ValidationReport);

    fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        self.validate_into(&FieldPath::root(), &mut report);
        report
    }
}

/// Validate `payload` and return the report.
pub fn validate<V: Validate + ?Sized>(payload: &V) -> ValidationReport {
    payload.validate()
}

type Accessor<T> = Box<dyn for<'a> Fn(&'a T) -> FieldValue<'a> + Send + Sync>;
type StructRule<T> = Box<dyn Fn(&T, &mut StructLevel<'_>) + Send + Sync>;

struct FieldEntry<T> {
    name: &'static str,
    rules: Vec<Rule>,
    accessor: Accessor<T>,
}

/// Rule table for one payload type.
///
/// ```rust
/// use std::sync::LazyLock;
/// use infobip::domain::{FieldPath, Rule, Schema, Validate, ValidationReport};
///
/// struct Pin {
///     pin: String,
/// }
///
/// static PIN: LazyLock<Schema<Pin>> = LazyLock::new(|| {
///     Schema::<Pin>::builder()
///         .field("pin", [Rule::Required, Rule::lte(10)], |p| (&p.pin).into())
///         .build()
/// });
///
/// impl Validate for Pin {
///     fn validate_into(&self, path: &FieldPath, report: &mut ValidationReport) {
///         PIN.check(self, path, report);
///     }
/// }
///
/// let report = Pin { pin: String::new() }.validate();
/// assert_eq!(report.violations()[0].rule, "required");
/// ```
pub struct Schema<T> {
    fields: Vec<FieldEntry<T>>,
    struct_rules: Vec<StructRule<T>>,
}

impl<T> Schema<T> {
    pub fn builder() -> SchemaBuilder<T> {
        SchemaBuilder {
            fields: Vec::new(),
            struct_rules: Vec::new(),
        }
    }

    /// Run field rules in declaration order, then struct-level predicates.
    pub fn check(&self, value: &T, path: &FieldPath, report: &mut ValidationReport) {
        let sibling = |name: &str| self.sibling(value, name);
        for entry in &self.fields {
            let field_value = (entry.accessor)(value);
            check_field(
                &field_value,
                &entry.rules,
                &path.field(entry.name),
                report,
                &sibling,
            );
        }

        let mut level = StructLevel { path, report };
        for rule in &self.struct_rules {
            rule(value, &mut level);
        }
    }

    fn sibling(&self, value: &T, name: &str) -> Option<String> {
        self.fields
            .iter()
            .find(|entry| entry.name == name)
            .and_then(|entry| (entry.accessor)(value).render())
    }
}

impl<T> fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field(
                "fields",
                &self.fields.iter().map(|entry| entry.name).collect::<Vec<_>>(),
            )
            .field("struct_rules", &self.struct_rules.len())
            .finish()
    }
}

fn check_field(
    value: &FieldValue<'_>,
    rules: &[Rule],
    path: &FieldPath,
    report: &mut ValidationReport,
    sibling: &dyn Fn(&str) -> Option<String>,
) {
    for (idx, rule) in rules.iter().enumerate() {
        match rule {
            Rule::OmitEmpty => {
                if value.is_zero() {
                    return;
                }
            }
            Rule::Dive => {
                if let FieldValue::Seq(items) = value {
                    let rest = &rules[idx + 1..];
                    for (item_idx, item) in items.iter().enumerate() {
                        check_field(item, rest, &path.index(item_idx), report, sibling);
                    }
                }
                return;
            }
            rule => {
                if !rule.accepts(value, sibling) {
                    report.push(path.as_str(), rule.tag(), rule.param());
                    return;
                }
            }
        }
    }

    if let FieldValue::Struct(nested) = value {
        nested.validate_into(path, report);
    }
}

/// Builder for [`Schema`].
pub struct SchemaBuilder<T> {
    fields: Vec<FieldEntry<T>>,
    struct_rules: Vec<StructRule<T>>,
}

impl<T> SchemaBuilder<T> {
    /// Declare a field with its rules. `name` is the wire name used in reports.
    pub fn field<F>(mut self, name: &'static str, rules: impl Into<Rules>, accessor: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> FieldValue<'a> + Send + Sync + 'static,
    {
        self.fields.push(FieldEntry {
            name,
            rules: rules.into().0,
            accessor: Box::new(accessor),
        });
        self
    }

    /// Register a cross-field predicate, run after all field rules.
    pub fn struct_rule<F>(mut self, rule: F) -> Self
    where
        F: Fn(&T, &mut StructLevel<'_>) + Send + Sync + 'static,
    {
        self.struct_rules.push(Box::new(rule));
        self
    }

    pub fn build(self) -> Schema<T> {
        Schema {
            fields: self.fields,
            struct_rules: self.struct_rules,
        }
    }
}

/// Handle given to struct-level predicates for reporting violations.
pub struct StructLevel<'a> {
    path: &'a FieldPath,
    report: &'a mut ValidationReport,
}

impl StructLevel<'_> {
    /// Path of the struct being validated.
    pub fn path(&self) -> &FieldPath {
        self.path
    }

    /// Report a violation on `field`, relative to the current struct.
    pub fn report(&mut self, field: &str, rule: &str, param: impl Into<String>) {
        self.report
            .push(self.path.field(field).as_str(), rule, param.into());
    }
}

fn is_absolute_url(value: &str) -> bool {
    Url::parse(value).is_ok_and(|url| {
        !url.scheme().is_empty() && url.host_str().is_some_and(|host| !host.is_empty())
    })
}

fn is_email(value: &str) -> bool {
    EMAIL.as_ref().is_some_and(|re| re.is_match(value))
}

fn is_e164(value: &str) -> bool {
    let digits = value.strip_prefix('+').unwrap_or(value);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    phonenumber::parse(None, format!("+{digits}"))
        .is_ok_and(|parsed| phonenumber::is_valid(&parsed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Item {
        code: String,
    }

    static ITEM: LazyLock<Schema<Item>> = LazyLock::new(|| {
        Schema::<Item>::builder()
            .field("code", [Rule::Required, Rule::len(3)], |i| (&i.code).into())
            .build()
    });

    impl Validate for Item {
        fn validate_into(&self, path: &FieldPath, report: &mut ValidationReport) {
            ITEM.check(self, path, report);
        }
    }

    #[derive(Debug, Default)]
    struct Order {
        kind: String,
        note: Option<String>,
        latitude: Option<f64>,
        tags: Vec<String>,
        items: Option<Vec<Item>>,
        primary: Option<Item>,
        website: String,
    }

    static ORDER: LazyLock<Schema<Order>> = LazyLock::new(|| {
        Schema::<Order>::builder()
            .field("kind", [Rule::Required, Rule::one_of(["TEXT", "LOCATION"])], |o| {
                (&o.kind).into()
            })
            .field("note", [Rule::OmitEmpty, Rule::gte(2), Rule::lte(5)], |o| {
                (&o.note).into()
            })
            .field(
                "latitude",
                [Rule::required_if("kind", "LOCATION"), Rule::Latitude],
                |o| (&o.latitude).into(),
            )
            .field("tags", [Rule::Dive, Rule::Email], |o| (&o.tags).into())
            .field("items", [Rule::Dive], |o| match &o.items {
                Some(items) => FieldValue::nested_seq(items),
                None => FieldValue::Missing,
            })
            .field("primary", Rules::default(), |o| FieldValue::nested_opt(&o.primary))
            .field("website", [Rule::OmitEmpty, Rule::Url], |o| {
                (&o.website).into()
            })
            .struct_rule(|o, level| {
                if o.note.as_deref() == Some("bad") {
                    level.report("note", "custom", "");
                }
            })
            .build()
    });

    impl Validate for Order {
        fn validate_into(&self, path: &FieldPath, report: &mut ValidationReport) {
            ORDER.check(self, path, report);
        }
    }

    fn valid_order() -> Order {
        Order {
            kind: "TEXT".to_owned(),
            ..Default::default()
        }
    }

    fn fields(report: &ValidationReport) -> Vec<(&str, &str)> {
        report
            .iter()
            .map(|v| (v.field.as_str(), v.rule.as_str()))
            .collect()
    }

    #[test]
    fn valid_payload_yields_empty_report() {
        let report = validate(&valid_order());
        assert!(report.is_empty(), "{report}");
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn required_and_oneof_are_checked() {
        let report = Order::default().validate();
        assert_eq!(fields(&report), vec![("kind", "required")]);

        let order = Order {
            kind: "text".to_owned(),
            ..Default::default()
        };
        let report = order.validate();
        assert_eq!(fields(&report), vec![("kind", "oneof")]);
        assert_eq!(report.violations()[0].param, "TEXT LOCATION");
    }

    #[test]
    fn omitempty_skips_only_its_own_field() {
        let order = Order {
            kind: String::new(),
            note: Some(String::new()),
            ..Default::default()
        };
        let report = order.validate();
        assert_eq!(fields(&report), vec![("kind", "required")]);
    }

    #[test]
    fn length_bounds_count_characters() {
        let mut order = valid_order();
        order.note = Some("é".to_owned());
        assert_eq!(fields(&order.validate()), vec![("note", "gte")]);

        order.note = Some("ééééé".to_owned());
        assert!(order.validate().is_empty());

        order.note = Some("toolong".to_owned());
        let report = order.validate();
        assert_eq!(fields(&report), vec![("note", "lte")]);
        assert_eq!(report.violations()[0].param, "5");
    }

    #[test]
    fn required_if_depends_on_sibling() {
        let order = Order {
            kind: "LOCATION".to_owned(),
            ..Default::default()
        };
        assert_eq!(fields(&order.validate()), vec![("latitude", "required_if")]);

        let order = Order {
            kind: "LOCATION".to_owned(),
            latitude: Some(91.0),
            ..Default::default()
        };
        assert_eq!(fields(&order.validate()), vec![("latitude", "latitude")]);

        let order = Order {
            kind: "LOCATION".to_owned(),
            latitude: Some(-45.5),
            ..Default::default()
        };
        assert!(order.validate().is_empty());
    }

    #[test]
    fn dive_applies_rules_and_recurses_in_order() {
        let order = Order {
            tags: vec!["a@example.com".to_owned(), "nope".to_owned()],
            items: Some(vec![
                Item {
                    code: "abc".to_owned(),
                },
                Item {
                    code: "ab".to_owned(),
                },
                Item::default(),
            ]),
            ..valid_order()
        };
        let report = order.validate();
        assert_eq!(
            fields(&report),
            vec![
                ("tags[1]", "email"),
                ("items[1].code", "len"),
                ("items[2].code", "required"),
            ]
        );
    }

    #[test]
    fn dive_on_missing_or_empty_sequence_is_noop() {
        let mut order = valid_order();
        order.items = None;
        assert!(order.validate().is_empty());
        order.items = Some(Vec::new());
        assert!(order.validate().is_empty());
    }

    #[test]
    fn nested_struct_is_validated_under_its_path() {
        let order = Order {
            primary: Some(Item::default()),
            ..valid_order()
        };
        assert_eq!(fields(&order.validate()), vec![("primary.code", "required")]);
    }

    #[test]
    fn url_requires_scheme_and_host_only() {
        let mut order = valid_order();
        order.website = "https://unreachable.invalid/path".to_owned();
        assert!(order.validate().is_empty());

        order.website = "not a url".to_owned();
        assert_eq!(fields(&order.validate()), vec![("website", "url")]);

        order.website = "mailto:someone".to_owned();
        assert_eq!(fields(&order.validate()), vec![("website", "url")]);
    }

    #[test]
    fn struct_rules_run_after_field_rules() {
        let order = Order {
            kind: String::new(),
            note: Some("bad".to_owned()),
            ..Default::default()
        };
        assert_eq!(
            fields(&order.validate()),
            vec![("kind", "required"), ("note", "custom")]
        );
    }

    #[test]
    fn required_treats_empty_sequence_as_missing() {
        let value = FieldValue::Seq(Vec::new());
        assert!(!Rule::Required.accepts(&value, &|_| None));
        let value = FieldValue::Seq(vec![FieldValue::Int(1)]);
        assert!(Rule::Required.accepts(&value, &|_| None));
    }

    #[test]
    fn numeric_bounds_compare_values() {
        let lte = Rule::lte(10);
        assert!(lte.accepts(&FieldValue::Int(10), &|_| None));
        assert!(!lte.accepts(&FieldValue::Int(11), &|_| None));
        assert!(Rule::gte(0.5).accepts(&FieldValue::Float(0.5), &|_| None));
        assert!(lte.accepts(&FieldValue::Missing, &|_| None));
    }

    #[test]
    fn e164_accepts_international_numbers() {
        assert!(is_e164("41793026727"));
        assert!(is_e164("+79251234567"));
        assert!(!is_e164("12"));
        assert!(!is_e164("4179302672x"));
    }

    #[test]
    fn email_grammar_is_pragmatic() {
        assert!(is_email("jane.doe+tag@example.co.uk"));
        assert!(!is_email("jane.doe@"));
        assert!(!is_email("@example.com"));
        assert!(!is_email("jane doe@example.com"));
    }

    #[test]
    fn rules_parse_from_tag_syntax() {
        let rules: Rules = "omitempty, lte=24,oneof=TEXT IMAGE,required_if=Type LOCATION,dive"
            .parse()
            .unwrap();
        assert_eq!(
            rules.as_slice(),
            &[
                Rule::OmitEmpty,
                Rule::Lte(24.0),
                Rule::one_of(["TEXT", "IMAGE"]),
                Rule::required_if("Type", "LOCATION"),
                Rule::Dive,
            ]
        );
        assert_eq!(rules.as_slice()[3].to_string(), "required_if=Type LOCATION");
    }

    #[test]
    fn rules_parse_rejects_bad_tags() {
        assert_eq!(
            "bogus".parse::<Rules>(),
            Err(RuleParseError::UnknownTag("bogus".to_owned()))
        );
        assert!(matches!(
            "lte=".parse::<Rules>(),
            Err(RuleParseError::MissingParam { .. })
        ));
        assert!(matches!(
            "len=abc".parse::<Rules>(),
            Err(RuleParseError::InvalidParam { .. })
        ));
        assert!(matches!(
            "required_if=OnlyField".parse::<Rules>(),
            Err(RuleParseError::InvalidParam { .. })
        ));
    }

    #[test]
    fn report_display_is_human_readable() {
        let mut report = ValidationReport::new();
        report.push("to", "required", "");
        report.push("text", "lte", "4096");
        assert_eq!(
            report.to_string(),
            "to: failed on 'required'; text: failed on 'lte=4096'"
        );
    }
}
