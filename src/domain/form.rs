use crate::domain::models::{FieldValue, ShiftReport, ShiftType};
use crate::domain::roster;
use crate::domain::schema::{self, FieldDescriptor, FieldKind};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Everything the capture form sends on submit. Dynamic answers arrive
/// flattened next to the fixed fields, keyed by descriptor id.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDraft {
    pub shift_type: ShiftType,
    pub house: String,
    pub patient_name: String,
    pub shift_date: NaiveDate,
    pub educator: String,
    #[serde(default)]
    pub educator_other: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub incident_status: bool,
    #[serde(flatten)]
    pub answers: BTreeMap<String, FieldValue>,
}

/// Wire keys of the fixed report fields plus the server-assigned ones.
/// A descriptor id equal to one of these would make serde route its answer
/// into the fixed field instead of the dynamic map, so the schema editor
/// refuses such ids and submission drops anything arriving under them.
pub const RESERVED_FIELD_KEYS: [&str; 11] = [
    "id",
    "userId",
    "submittedAt",
    "shiftType",
    "house",
    "patientName",
    "shiftDate",
    "educator",
    "educatorOther",
    "notes",
    "incidentStatus",
];

pub fn is_reserved_field_id(id: &str) -> bool {
    RESERVED_FIELD_KEYS.contains(&id)
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("unknown house \"{0}\"")]
    UnknownHouse(String),
    #[error("patient \"{patient}\" is not in house {house}")]
    PatientNotInHouse { patient: String, house: String },
    #[error("educator must be chosen from the roster")]
    UnknownEducator,
    #[error("educator name is required when \"other\" is chosen")]
    EducatorNameMissing,
    #[error("\"{label}\" is required")]
    MissingAnswer { label: String },
    #[error("\"{label}\" has the wrong value type")]
    WrongValueType { label: String },
    #[error("\"{label}\" is not one of the offered choices")]
    InvalidChoice { label: String },
    #[error("\"{label}\" must be a rating from 1 to 5")]
    RatingOutOfRange { label: String },
}

impl ValidationError {
    /// Stable key for localized user-facing messages.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            ValidationError::UnknownHouse(_) => "error.unknown_house",
            ValidationError::PatientNotInHouse { .. } => "error.patient_not_in_house",
            ValidationError::UnknownEducator => "error.unknown_educator",
            ValidationError::EducatorNameMissing => "error.educator_name_missing",
            ValidationError::MissingAnswer { .. } => "error.missing_answer",
            ValidationError::WrongValueType { .. } => "error.wrong_value_type",
            ValidationError::InvalidChoice { .. } => "error.invalid_choice",
            ValidationError::RatingOutOfRange { .. } => "error.rating_out_of_range",
        }
    }
}

/// Validate a submitted draft against the active schema and assemble the
/// report document. Validation covers the fields visible for the draft's
/// shift type; answers for fields hidden under that shift type are kept
/// as-is (the form retains them when the shift type changes mid-entry, and
/// we store what was submitted rather than silently dropping data).
pub fn prepare_report(
    fields: &[FieldDescriptor],
    draft: &ReportDraft,
) -> Result<ShiftReport, ValidationError> {
    if !roster::is_known_house(&draft.house) {
        return Err(ValidationError::UnknownHouse(draft.house.clone()));
    }
    if !roster::patient_in_house(&draft.house, &draft.patient_name) {
        return Err(ValidationError::PatientNotInHouse {
            patient: draft.patient_name.clone(),
            house: draft.house.trim().to_string(),
        });
    }

    let educator = resolve_educator(draft)?;

    let mut answers = draft.answers.clone();
    for reserved in RESERVED_FIELD_KEYS {
        answers.remove(reserved);
    }
    for field in schema::visible_fields(fields, draft.shift_type) {
        check_answer(field, &mut answers)?;
    }

    Ok(ShiftReport {
        id: String::new(),
        shift_type: draft.shift_type,
        house: draft.house.trim().to_string(),
        patient_name: draft.patient_name.clone(),
        shift_date: draft.shift_date,
        educator,
        notes: draft.notes.clone(),
        incident_status: draft.incident_status,
        user_id: String::new(),
        submitted_at: None,
        answers,
    })
}

/// The educator is either a roster member or the `__other__` sentinel, in
/// which case the free-text name is required and substituted for the
/// sentinel before anything is written.
fn resolve_educator(draft: &ReportDraft) -> Result<String, ValidationError> {
    if draft.educator == roster::OTHER_EDUCATOR {
        let name = draft
            .educator_other
            .as_deref()
            .map(str::trim)
            .unwrap_or_default();
        if name.is_empty() {
            return Err(ValidationError::EducatorNameMissing);
        }
        return Ok(name.to_string());
    }
    if !roster::is_roster_educator(&draft.educator) {
        return Err(ValidationError::UnknownEducator);
    }
    Ok(draft.educator.clone())
}

fn check_answer(
    field: &FieldDescriptor,
    answers: &mut BTreeMap<String, FieldValue>,
) -> Result<(), ValidationError> {
    let missing = || ValidationError::MissingAnswer {
        label: field.label.clone(),
    };
    let wrong_type = || ValidationError::WrongValueType {
        label: field.label.clone(),
    };

    let Some(value) = answers.get(&field.id) else {
        if field.required {
            return Err(missing());
        }
        return Ok(());
    };

    match &field.kind {
        FieldKind::Text => {
            let text = value.as_text().ok_or_else(wrong_type)?;
            if field.required && text.trim().is_empty() {
                return Err(missing());
            }
        }
        FieldKind::Yesno => {
            value.as_bool().ok_or_else(wrong_type)?;
        }
        FieldKind::Star => {
            let stars = value.as_int().ok_or_else(wrong_type)?;
            if !(schema::STAR_MIN..=schema::STAR_MAX).contains(&stars) {
                return Err(ValidationError::RatingOutOfRange {
                    label: field.label.clone(),
                });
            }
        }
        FieldKind::Emoji { .. } => {
            let symbol = value.as_text().ok_or_else(wrong_type)?;
            if !field.kind.emoji_scale().iter().any(|s| s == symbol) {
                return Err(ValidationError::InvalidChoice {
                    label: field.label.clone(),
                });
            }
        }
        FieldKind::Dropdown { .. } => {
            let choice = value.as_text().ok_or_else(wrong_type)?;
            if choice.is_empty() {
                // The disabled placeholder row serializes as "".
                if field.required {
                    return Err(missing());
                }
                answers.remove(&field.id);
            } else if !field.kind.dropdown_choices().iter().any(|c| c == choice) {
                return Err(ValidationError::InvalidChoice {
                    label: field.label.clone(),
                });
            }
        }
        FieldKind::Slider { .. } => {
            let level = value.as_int().ok_or_else(wrong_type)?;
            let (min, max) = field.kind.slider_bounds();
            let clamped = level.clamp(min, max);
            if clamped != level {
                answers.insert(field.id.clone(), FieldValue::Int(clamped));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::Section;

    fn field(id: &str, kind: FieldKind, required: bool, shifts: &[ShiftType]) -> FieldDescriptor {
        FieldDescriptor {
            id: id.to_string(),
            label: id.to_string(),
            kind,
            section: Section::General,
            required,
            shift_types: shifts.to_vec(),
            order: 0,
            placeholder: None,
        }
    }

    fn draft(shift: ShiftType) -> ReportDraft {
        ReportDraft {
            shift_type: shift,
            house: "2".into(),
            patient_name: "מנחם".into(),
            shift_date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            educator: "דנה".into(),
            educator_other: None,
            notes: None,
            incident_status: false,
            answers: BTreeMap::new(),
        }
    }

    #[test]
    fn required_emoji_only_enforced_on_its_shift() {
        let fields = vec![field(
            "mood",
            FieldKind::Emoji { options: vec![] },
            true,
            &[ShiftType::Day],
        )];

        // Night shift: the Mood field is hidden, submission goes through.
        let night = draft(ShiftType::Night);
        assert!(prepare_report(&fields, &night).is_ok());

        // Day shift: hidden no more, required and unanswered.
        let day = draft(ShiftType::Day);
        assert_eq!(
            prepare_report(&fields, &day).unwrap_err(),
            ValidationError::MissingAnswer {
                label: "mood".into()
            }
        );

        let mut answered = draft(ShiftType::Day);
        answered
            .answers
            .insert("mood".into(), FieldValue::Text("🙂".into()));
        let report = prepare_report(&fields, &answered).unwrap();
        assert_eq!(report.answers["mood"], FieldValue::Text("🙂".into()));

        let mut off_scale = draft(ShiftType::Day);
        off_scale
            .answers
            .insert("mood".into(), FieldValue::Text("🤠".into()));
        assert_eq!(
            prepare_report(&fields, &off_scale).unwrap_err(),
            ValidationError::InvalidChoice {
                label: "mood".into()
            }
        );
    }

    #[test]
    fn other_educator_requires_a_name() {
        let mut d = draft(ShiftType::Day);
        d.educator = roster::OTHER_EDUCATOR.into();
        d.educator_other = Some("   ".into());
        assert_eq!(
            prepare_report(&[], &d).unwrap_err(),
            ValidationError::EducatorNameMissing
        );

        d.educator_other = Some("  עדי כהן ".into());
        let report = prepare_report(&[], &d).unwrap();
        assert_eq!(report.educator, "עדי כהן");
    }

    #[test]
    fn off_roster_educator_is_rejected() {
        let mut d = draft(ShiftType::Day);
        d.educator = "somebody".into();
        assert_eq!(
            prepare_report(&[], &d).unwrap_err(),
            ValidationError::UnknownEducator
        );
    }

    #[test]
    fn patient_must_belong_to_selected_house() {
        let mut d = draft(ShiftType::Day);
        d.house = "3".into();
        // מנחם lives in house 2, not house 3.
        assert!(matches!(
            prepare_report(&[], &d).unwrap_err(),
            ValidationError::PatientNotInHouse { .. }
        ));

        d.patient_name = "שחר".into();
        assert!(prepare_report(&[], &d).is_ok());
    }

    #[test]
    fn star_rating_bounds() {
        let fields = vec![field("overall", FieldKind::Star, true, &[])];
        let mut d = draft(ShiftType::Evening);
        d.answers.insert("overall".into(), FieldValue::Int(6));
        assert_eq!(
            prepare_report(&fields, &d).unwrap_err(),
            ValidationError::RatingOutOfRange {
                label: "overall".into()
            }
        );
        d.answers.insert("overall".into(), FieldValue::Int(5));
        assert!(prepare_report(&fields, &d).is_ok());
    }

    #[test]
    fn slider_values_are_clamped_not_rejected() {
        let fields = vec![field(
            "noise",
            FieldKind::Slider { min: 0, max: 10 },
            false,
            &[],
        )];
        let mut d = draft(ShiftType::Day);
        d.answers.insert("noise".into(), FieldValue::Int(25));
        let report = prepare_report(&fields, &d).unwrap();
        assert_eq!(report.answers["noise"], FieldValue::Int(10));
    }

    #[test]
    fn dropdown_placeholder_counts_as_unanswered() {
        let fields = vec![field(
            "meal",
            FieldKind::Dropdown {
                options: vec!["Full".into(), "Partial".into()],
            },
            true,
            &[],
        )];
        let mut d = draft(ShiftType::Day);
        d.answers.insert("meal".into(), FieldValue::Text("".into()));
        assert_eq!(
            prepare_report(&fields, &d).unwrap_err(),
            ValidationError::MissingAnswer {
                label: "meal".into()
            }
        );
        d.answers
            .insert("meal".into(), FieldValue::Text("Partial".into()));
        assert!(prepare_report(&fields, &d).is_ok());
    }

    #[test]
    fn fixed_report_keys_are_reserved() {
        // An answer sent under a fixed field's wire key is consumed by that
        // field during deserialization and never reaches the answer map, so
        // a descriptor with such an id could never be satisfied.
        let d: ReportDraft = serde_json::from_value(serde_json::json!({
            "shiftType": "Day Shift",
            "house": "2",
            "patientName": "מנחם",
            "shiftDate": "2024-03-05",
            "educator": "דנה",
            "notes": "lands in the fixed notes field",
        }))
        .unwrap();
        assert!(d.answers.is_empty());
        assert_eq!(d.notes.as_deref(), Some("lands in the fixed notes field"));

        for key in ["notes", "house", "educator", "shiftType", "userId"] {
            assert!(is_reserved_field_id(key));
        }
        assert!(!is_reserved_field_id("mood"));
        assert!(!is_reserved_field_id("shift_type"));
    }

    #[test]
    fn hidden_answers_are_retained() {
        let fields = vec![field(
            "night_check",
            FieldKind::Yesno,
            true,
            &[ShiftType::Night],
        )];
        // Entered while Night Shift was selected, then the shift type was
        // switched back to Day before submitting.
        let mut d = draft(ShiftType::Day);
        d.answers
            .insert("night_check".into(), FieldValue::Bool(true));
        let report = prepare_report(&fields, &d).unwrap();
        assert_eq!(report.answers["night_check"], FieldValue::Bool(true));
    }
}
