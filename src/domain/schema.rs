use crate::domain::models::ShiftType;
use serde::{Deserialize, Serialize};

/// Default emoji scale, saddest to happiest, used when a descriptor carries
/// no override.
pub const DEFAULT_EMOJI_SCALE: [&str; 5] = ["😢", "🙁", "😐", "🙂", "😃"];

/// Placeholder choices shown for a dropdown whose options were never filled
/// in by the administrator.
pub const FALLBACK_DROPDOWN_OPTIONS: [&str; 3] = ["Option 1", "Option 2", "Option 3"];

pub const STAR_MIN: i64 = 1;
pub const STAR_MAX: i64 = 5;

const SLIDER_MIN_DEFAULT: i64 = 0;
const SLIDER_MAX_DEFAULT: i64 = 10;

fn slider_min_default() -> i64 {
    SLIDER_MIN_DEFAULT
}

fn slider_max_default() -> i64 {
    SLIDER_MAX_DEFAULT
}

/// The closed set of input widgets, each carrying its own payload. On the
/// wire the document stays flat: a `type` tag next to `options` / `min` /
/// `max` at the top level of the descriptor.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Yesno,
    Star,
    Emoji {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        options: Vec<String>,
    },
    Dropdown {
        #[serde(default)]
        options: Vec<String>,
    },
    Slider {
        #[serde(default = "slider_min_default")]
        min: i64,
        #[serde(default = "slider_max_default")]
        max: i64,
    },
}

impl FieldKind {
    /// The emoji symbols this field accepts.
    pub fn emoji_scale(&self) -> Vec<String> {
        match self {
            FieldKind::Emoji { options } if !options.is_empty() => options.clone(),
            _ => DEFAULT_EMOJI_SCALE.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// The choices this dropdown offers, falling back to generic
    /// placeholders when the administrator left options empty.
    pub fn dropdown_choices(&self) -> Vec<String> {
        match self {
            FieldKind::Dropdown { options } if !options.is_empty() => options.clone(),
            _ => FALLBACK_DROPDOWN_OPTIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    pub fn slider_bounds(&self) -> (i64, i64) {
        match self {
            FieldKind::Slider { min, max } => (*min, *max),
            _ => (SLIDER_MIN_DEFAULT, SLIDER_MAX_DEFAULT),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Section {
    General,
    Medical,
}

impl Default for Section {
    fn default() -> Self {
        Section::General
    }
}

/// An admin-authored description of one custom report field. `id` is a
/// slug derived from the label once at creation time; renaming the label
/// later does not regenerate it, so historical reports keep their keys.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub label: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    #[serde(default)]
    pub section: Section,
    #[serde(default)]
    pub required: bool,
    /// Shift types this field applies to. Empty means every shift.
    #[serde(default)]
    pub shift_types: Vec<ShiftType>,
    #[serde(default)]
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl FieldDescriptor {
    pub fn applies_to(&self, shift: ShiftType) -> bool {
        self.shift_types.is_empty() || self.shift_types.contains(&shift)
    }
}

/// Derive a stable field id from a display label: lowercase, runs of
/// non-alphanumeric characters collapse into a single underscore, leading
/// and trailing underscores are stripped.
pub fn to_field_id(label: &str) -> String {
    let mut id = String::with_capacity(label.len());
    let mut pending_sep = false;
    for ch in label.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_sep && !id.is_empty() {
                id.push('_');
            }
            pending_sep = false;
            id.push(ch.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    id
}

/// Descriptors visible for the given shift type, in ascending `order`.
/// The sort is stable, so descriptors with equal `order` keep the order
/// they were fetched in.
pub fn visible_fields(fields: &[FieldDescriptor], shift: ShiftType) -> Vec<&FieldDescriptor> {
    let mut visible: Vec<&FieldDescriptor> =
        fields.iter().filter(|f| f.applies_to(shift)).collect();
    visible.sort_by_key(|f| f.order);
    visible
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(id: &str, order: i64, shifts: &[ShiftType]) -> FieldDescriptor {
        FieldDescriptor {
            id: id.to_string(),
            label: id.to_string(),
            kind: FieldKind::Text,
            section: Section::General,
            required: false,
            shift_types: shifts.to_vec(),
            order,
            placeholder: None,
        }
    }

    #[test]
    fn slug_collapses_separator_runs() {
        assert_eq!(to_field_id("Pain Level!"), "pain_level");
        assert_eq!(to_field_id("pain   level"), "pain_level");
        assert_eq!(to_field_id("  __Pain--Level__  "), "pain_level");
        assert_eq!(to_field_id("Mood"), "mood");
        assert_eq!(to_field_id("!!!"), "");
    }

    #[test]
    fn slug_is_idempotent() {
        let once = to_field_id("Overall Rating (1-5)");
        assert_eq!(once, "overall_rating_1_5");
        assert_eq!(to_field_id(&once), once);
    }

    #[test]
    fn visibility_honors_shift_types_and_order() {
        let fields = vec![
            descriptor("c", 3, &[]),
            descriptor("night_only", 1, &[ShiftType::Night]),
            descriptor("a", 2, &[ShiftType::Day, ShiftType::Night]),
            descriptor("b", 2, &[]),
        ];

        let day: Vec<&str> = visible_fields(&fields, ShiftType::Day)
            .iter()
            .map(|f| f.id.as_str())
            .collect();
        // night_only is hidden; ties on order=2 keep fetch order (a before b).
        assert_eq!(day, vec!["a", "b", "c"]);

        let night: Vec<&str> = visible_fields(&fields, ShiftType::Night)
            .iter()
            .map(|f| f.id.as_str())
            .collect();
        assert_eq!(night, vec!["night_only", "a", "b", "c"]);
    }

    #[test]
    fn descriptor_wire_shape_is_flat() {
        let json = serde_json::json!({
            "label": "Sleep Quality",
            "type": "slider",
            "min": 1,
            "max": 5,
            "section": "Medical",
            "required": true,
            "shiftTypes": ["Night Shift"],
            "order": 4,
        });
        let field: FieldDescriptor = serde_json::from_value(json).unwrap();
        assert_eq!(field.kind, FieldKind::Slider { min: 1, max: 5 });
        assert_eq!(field.section, Section::Medical);
        assert!(field.applies_to(ShiftType::Night));
        assert!(!field.applies_to(ShiftType::Day));

        let back = serde_json::to_value(&field).unwrap();
        assert_eq!(back["type"], "slider");
        assert_eq!(back["min"], 1);
    }

    #[test]
    fn emoji_and_dropdown_fallbacks() {
        let emoji = FieldKind::Emoji { options: vec![] };
        assert_eq!(emoji.emoji_scale().len(), 5);
        let custom = FieldKind::Emoji {
            options: vec!["👍".into(), "👎".into()],
        };
        assert_eq!(custom.emoji_scale(), vec!["👍", "👎"]);

        let dropdown = FieldKind::Dropdown { options: vec![] };
        assert_eq!(dropdown.dropdown_choices(), FALLBACK_DROPDOWN_OPTIONS);
    }
}
