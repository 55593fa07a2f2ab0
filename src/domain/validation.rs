//! Step validation primitives shared by every application form.
//!
//! Validators are pure: they read a step's fields and return every
//! violation at once so the UI can flag all invalid fields together.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::Datelike;
use regex::Regex;

pub const REQUIRED_MESSAGE: &str = "This field is required";
pub const EMAIL_MESSAGE: &str = "Please enter a valid email address";
pub const INTERESTS_MESSAGE: &str = "Please select at least one area of interest";
pub const FILES_MESSAGE: &str = "Please upload at least one document";
pub const DECLARATION_MESSAGE: &str = "You must agree to the declaration";

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Field-level error messages keyed by the field's error key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &'static str, message: impl Into<String>) {
        self.0.insert(key, message.into());
    }

    /// Removes the entry for `key`, returning whether one existed.
    pub fn remove(&mut self, key: &str) -> bool {
        self.0.remove(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

/// Inputs to validation that do not live in the form itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationContext {
    pub current_year: i32,
}

impl ValidationContext {
    pub fn for_year(current_year: i32) -> Self {
        Self { current_year }
    }

    pub fn now() -> Self {
        Self::for_year(chrono::Local::now().year())
    }
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self::now()
    }
}

/// Accumulates the checks of one step.
pub struct StepCheck<'a> {
    context: &'a ValidationContext,
    errors: FieldErrors,
}

impl<'a> StepCheck<'a> {
    pub fn new(context: &'a ValidationContext) -> Self {
        Self { context, errors: FieldErrors::new() }
    }

    /// Whitespace-only counts as missing.
    pub fn required(mut self, key: &'static str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.errors.insert(key, REQUIRED_MESSAGE);
        }
        self
    }

    pub fn email(mut self, key: &'static str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.errors.insert(key, REQUIRED_MESSAGE);
        } else if !is_valid_email(value) {
            self.errors.insert(key, EMAIL_MESSAGE);
        }
        self
    }

    /// Range check for a year field, `[min, current year]`.
    ///
    /// Strings that do not parse are left alone: digit-only entry is enforced
    /// before the value ever reaches the form.
    pub fn year(mut self, key: &'static str, value: &str, min: i32, required: bool) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            if required {
                self.errors.insert(key, REQUIRED_MESSAGE);
            }
            return self;
        }
        if let Ok(year) = trimmed.parse::<i32>() {
            let max = self.context.current_year;
            if year < min || year > max {
                self.errors.insert(key, format!("Year must be between {} and {}", min, max));
            }
        }
        self
    }

    pub fn at_least_one(mut self, key: &'static str, count: usize, message: &str) -> Self {
        if count == 0 {
            self.errors.insert(key, message);
        }
        self
    }

    pub fn checked(mut self, key: &'static str, flag: bool, message: &str) -> Self {
        if !flag {
            self.errors.insert(key, message);
        }
        self
    }

    pub fn finish(self) -> FieldErrors {
        self.errors
    }
}
