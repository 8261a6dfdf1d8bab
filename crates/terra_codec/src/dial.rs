//! Dialing code collapse.

/// Longest suffix that is still treated as part of the national code.
///
/// Suffixes of this length or longer are area codes (e.g. the `201`, `202`
/// ... suffixes of `+1`) and are not appended to the root.
const MAX_NATIONAL_SUFFIX_LEN: usize = 2;

/// Collapses a structured dialing code (root + suffixes) into one string.
///
/// - no suffixes: the root alone
/// - otherwise the shortest suffix wins (first one on ties); if it is empty
///   or longer than two characters the root is used alone, else root and
///   suffix are concatenated
///
/// ```
/// use terra_codec::build_dial_code;
///
/// assert_eq!(build_dial_code("+3", &["906698".into(), "79".into()]), "+379");
/// assert_eq!(build_dial_code("+1", &["201".into(), "202".into()]), "+1");
/// ```
pub fn build_dial_code(root: &str, suffixes: &[String]) -> String {
    let mut shortest: Option<&str> = None;
    for suffix in suffixes {
        match shortest {
            Some(best) if best.chars().count() <= suffix.chars().count() => {}
            _ => shortest = Some(suffix.as_str()),
        }
    }

    match shortest {
        Some(suffix) if !suffix.is_empty() && suffix.chars().count() <= MAX_NATIONAL_SUFFIX_LEN => {
            format!("{root}{suffix}")
        }
        _ => root.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn no_suffixes_uses_root() {
        assert_eq!(build_dial_code("+44", &[]), "+44");
    }

    #[test]
    fn single_short_suffix_is_appended() {
        assert_eq!(build_dial_code("+4", &s(&["9"])), "+49");
        assert_eq!(build_dial_code("+3", &s(&["53"])), "+353");
    }

    #[test]
    fn shortest_suffix_wins() {
        assert_eq!(build_dial_code("+3", &s(&["906698", "79"])), "+379");
    }

    #[test]
    fn long_suffixes_are_area_codes() {
        assert_eq!(build_dial_code("+1", &s(&["201", "202", "203"])), "+1");
        assert_eq!(build_dial_code("+7", &s(&["840"])), "+7");
    }

    #[test]
    fn empty_shortest_suffix_uses_root() {
        assert_eq!(build_dial_code("+7", &s(&["3", ""])), "+7");
    }

    #[test]
    fn ties_keep_first_encountered() {
        assert_eq!(build_dial_code("+2", &s(&["12", "34"])), "+212");
    }

    #[test]
    fn empty_root_keeps_short_suffix() {
        assert_eq!(build_dial_code("", &s(&["1"])), "1");
        assert_eq!(build_dial_code("", &[]), "");
    }

    #[test]
    fn suffixes_are_compared_as_given() {
        assert_eq!(build_dial_code("+3", &s(&[" 5", "79"])), "+3 5");
        assert_eq!(build_dial_code("+3", &s(&[" 79", "12"])), "+312");
    }
}
