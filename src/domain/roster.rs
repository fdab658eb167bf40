//! Static house and staff rosters. Houses are numbered 1..=5 and each keeps
//! a fixed patient list; the educator picker offers a fixed staff roster
//! plus an "other" escape hatch resolved at submission time.

/// Sentinel the form sends when the educator is typed in free text instead
/// of being picked from the roster.
pub const OTHER_EDUCATOR: &str = "__other__";

pub const HOUSES: [u8; 5] = [1, 2, 3, 4, 5];

pub const EDUCATORS: [&str; 6] = ["דנה", "אבי", "מיכל", "רונית", "איתן", "שרה"];

/// Patients living in the given house. Unknown house numbers have no
/// patients, which makes any patient choice for them invalid.
pub fn patients_for_house(house: u8) -> &'static [&'static str] {
    match house {
        1 => &["רפאל", "יוסף", "שלמה", "אלי", "אייל", "ירון"],
        2 => &["אדם יעקב", "יוסף", "מנחם", "מרדכי", "שי אריאל", "שמעון"],
        3 => &["אהרן", "גד", "רובין", "אברהם", "שחר", "יהודה"],
        4 => &["מאיר", "אושרי", "יאיר", "אביאל", "בן ציון", "משה"],
        5 => &[
            "דן", "יהושע", "דוד", "אורי", "ליאב", "סטיב", "ז'וליאן", "פרנק", "נאור", "ברונו",
            "בנימין",
        ],
        _ => &[],
    }
}

pub fn is_known_house(house: &str) -> bool {
    parse_house(house).is_some()
}

pub fn parse_house(house: &str) -> Option<u8> {
    house
        .trim()
        .parse::<u8>()
        .ok()
        .filter(|n| HOUSES.contains(n))
}

pub fn patient_in_house(house: &str, patient: &str) -> bool {
    parse_house(house)
        .map(|n| patients_for_house(n).contains(&patient))
        .unwrap_or(false)
}

pub fn is_roster_educator(name: &str) -> bool {
    EDUCATORS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn house_lookup_rejects_unknown_numbers() {
        assert!(is_known_house("3"));
        assert!(is_known_house(" 5 "));
        assert!(!is_known_house("6"));
        assert!(!is_known_house(""));
        assert!(!is_known_house("two"));
    }

    #[test]
    fn patients_belong_to_their_house() {
        assert!(patient_in_house("2", "מנחם"));
        assert!(!patient_in_house("3", "מנחם"));
        // Same first name exists in two houses; membership is per house.
        assert!(patient_in_house("1", "יוסף"));
        assert!(patient_in_house("2", "יוסף"));
    }
}
