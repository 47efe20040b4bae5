//! Per-step validators for the four-screen lead form
//!
//! Each validator is a pure function over the data collected at one step.
//! `validate_submission` runs the steps in order and stops at the first
//! failing one, so an invalid postcode never reaches contact validation
//! or the dispatch handler.

use super::{ErrorCode, ValidationResult};
use crate::models::LeadSubmission;
use crate::photos::PhotoValidator;
use crate::validation::rules;

/// One screen of the sequential form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStep {
    Service,
    Postcode,
    Photos,
    Contact,
}

impl FormStep {
    pub const ALL: [FormStep; 4] = [
        FormStep::Service,
        FormStep::Postcode,
        FormStep::Photos,
        FormStep::Contact,
    ];
}

/// Outcome of running the step validators in sequence.
#[derive(Debug, Clone)]
pub enum StepOutcome {
    Valid,
    Failed {
        step: FormStep,
        result: ValidationResult,
    },
}

impl StepOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, StepOutcome::Valid)
    }
}

pub fn validate_service_step(lead: &LeadSubmission) -> ValidationResult {
    let mut result = ValidationResult::success();
    if lead.service.is_none() {
        result.add_error(
            "service",
            ErrorCode::MissingSelection,
            "Please choose a service",
        );
    }
    result
}

/// Record a failed `rules` check against its form field.
fn add_rule_error(
    result: &mut ValidationResult,
    field: &str,
    err: validator::ValidationError,
) {
    let code = match err.code.as_ref() {
        "missing_field" => ErrorCode::MissingField,
        _ => ErrorCode::InvalidFormat,
    };
    let message = err
        .message
        .as_deref()
        .unwrap_or("Invalid value")
        .to_string();
    result.add_error(field, code, message);
}

pub fn validate_postcode_step(lead: &LeadSubmission) -> ValidationResult {
    let mut result = ValidationResult::success();
    if let Err(err) = rules::validate_postcode(&lead.postcode) {
        add_rule_error(&mut result, "postcode", err);
    }
    result
}

pub fn validate_photos_step(lead: &LeadSubmission, validator: &PhotoValidator) -> ValidationResult {
    let mut result = ValidationResult::success();
    for (i, photo) in lead.photos.iter().enumerate() {
        if let Err(err) = validator.validate(photo) {
            result.add_error(&format!("photos[{}]", i), err.code(), err.to_string());
        }
    }
    result
}

pub fn validate_contact_step(lead: &LeadSubmission) -> ValidationResult {
    let mut result = ValidationResult::success();

    if lead.name.trim().is_empty() {
        result.add_error("name", ErrorCode::MissingField, "Name is required");
    }

    if let Err(err) = rules::validate_phone(&lead.phone) {
        add_rule_error(&mut result, "phone", err);
    }

    if let Err(err) = rules::validate_email(&lead.email) {
        add_rule_error(&mut result, "email", err);
    }

    result
}

pub fn validate_step(
    step: FormStep,
    lead: &LeadSubmission,
    photo_validator: &PhotoValidator,
) -> ValidationResult {
    match step {
        FormStep::Service => validate_service_step(lead),
        FormStep::Postcode => validate_postcode_step(lead),
        FormStep::Photos => validate_photos_step(lead, photo_validator),
        FormStep::Contact => validate_contact_step(lead),
    }
}

/// Run all four steps in order, short-circuiting at the first failure.
pub fn validate_submission(
    lead: &LeadSubmission,
    photo_validator: &PhotoValidator,
) -> StepOutcome {
    for step in FormStep::ALL {
        let result = validate_step(step, lead, photo_validator);
        if !result.is_valid() {
            return StepOutcome::Failed { step, result };
        }
    }
    StepOutcome::Valid
}
