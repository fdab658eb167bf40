//! Minimal localization lookup: English and Hebrew tables, Hebrew as the
//! fallback language (the organization's primary language), and the
//! text-direction flip that has to follow every language change.

use once_cell::sync::Lazy;
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lang {
    En,
    He,
}

impl Default for Lang {
    fn default() -> Self {
        Lang::He
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl TextDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextDirection::Ltr => "ltr",
            TextDirection::Rtl => "rtl",
        }
    }
}

impl Lang {
    /// Parse a language code, tolerating region subtags ("he-IL", "en-US").
    pub fn from_code(code: &str) -> Option<Lang> {
        let primary = code.trim().split(['-', '_']).next().unwrap_or("");
        match primary.to_ascii_lowercase().as_str() {
            "en" => Some(Lang::En),
            "he" | "iw" => Some(Lang::He),
            _ => None,
        }
    }

    pub fn dir(&self) -> TextDirection {
        match self {
            Lang::He => TextDirection::Rtl,
            Lang::En => TextDirection::Ltr,
        }
    }
}

static EN: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("shift.day", "Day Shift"),
        ("shift.evening", "Evening Shift"),
        ("shift.night", "Night Shift"),
        ("report.incident", "Incident"),
        ("report.no_incident", "None"),
        ("error.fetch_failed", "Failed to fetch"),
        ("error.create_failed", "Failed to create report"),
        ("error.save_failed", "Failed to save"),
        ("error.unknown_house", "Unknown house"),
        ("error.patient_not_in_house", "Patient is not in the selected house"),
        ("error.unknown_educator", "Educator must be chosen from the list"),
        ("error.educator_name_missing", "Please enter the educator's name"),
        ("error.missing_answer", "A required field is missing"),
        ("error.wrong_value_type", "A field has an invalid value"),
        ("error.invalid_choice", "A field value is not one of the choices"),
        ("error.rating_out_of_range", "Rating must be between 1 and 5"),
    ])
});

static HE: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("shift.day", "משמרת יום"),
        ("shift.evening", "משמרת ערב"),
        ("shift.night", "משמרת לילה"),
        ("report.incident", "תקרית"),
        ("report.no_incident", "ללא"),
        ("error.fetch_failed", "טעינת הנתונים נכשלה"),
        ("error.create_failed", "יצירת הדוח נכשלה"),
        ("error.save_failed", "השמירה נכשלה"),
        ("error.unknown_house", "מספר בית לא מוכר"),
        ("error.patient_not_in_house", "המטופל אינו שייך לבית שנבחר"),
        ("error.unknown_educator", "יש לבחור מדריך מהרשימה"),
        ("error.educator_name_missing", "יש להזין את שם המדריך"),
        ("error.missing_answer", "חסר שדה חובה"),
        ("error.wrong_value_type", "ערך לא תקין באחד השדות"),
        ("error.invalid_choice", "הערך שנבחר אינו אחת מהאפשרויות"),
        ("error.rating_out_of_range", "הדירוג חייב להיות בין 1 ל-5"),
    ])
});

/// Look up a translation, falling back to Hebrew and finally to the key
/// itself so a missing entry degrades visibly rather than panicking.
pub fn translate(lang: Lang, key: &str) -> &str {
    let table = match lang {
        Lang::En => &*EN,
        Lang::He => &*HE,
    };
    table
        .get(key)
        .or_else(|| HE.get(key))
        .copied()
        .unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hebrew_flips_text_direction() {
        assert_eq!(Lang::He.dir().as_str(), "rtl");
        assert_eq!(Lang::En.dir().as_str(), "ltr");
    }

    #[test]
    fn parses_region_subtags() {
        assert_eq!(Lang::from_code("he-IL"), Some(Lang::He));
        assert_eq!(Lang::from_code("en_US"), Some(Lang::En));
        assert_eq!(Lang::from_code("fr"), None);
    }

    #[test]
    fn falls_back_to_hebrew_then_key() {
        assert_eq!(translate(Lang::En, "shift.day"), "Day Shift");
        assert_eq!(translate(Lang::He, "shift.day"), "משמרת יום");
        assert_eq!(translate(Lang::En, "no.such.key"), "no.such.key");
    }
}
