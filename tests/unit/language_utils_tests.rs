/*!
 * Tests for ISO language code utilities
 */

use syncwai::language_utils::{get_language_name, normalize_to_part1_or_part2t, resolve_language};

#[test]
fn test_normalize_withTwoAndThreeLetterCodes_shouldPreferPart1() {
    assert_eq!(normalize_to_part1_or_part2t("en").unwrap(), "en");
    assert_eq!(normalize_to_part1_or_part2t("eng").unwrap(), "en");
    assert_eq!(normalize_to_part1_or_part2t("FRA").unwrap(), "fr");
    assert_eq!(normalize_to_part1_or_part2t(" de ").unwrap(), "de");
}

#[test]
fn test_normalize_withBibliographicCode_shouldMapToPart1() {
    assert_eq!(normalize_to_part1_or_part2t("fre").unwrap(), "fr");
    assert_eq!(normalize_to_part1_or_part2t("ger").unwrap(), "de");
    assert_eq!(normalize_to_part1_or_part2t("chi").unwrap(), "zh");
}

#[test]
fn test_resolveLanguage_withInvalidCodes_shouldFail() {
    assert!(resolve_language("").is_err());
    assert!(resolve_language("zz").is_err());
    assert!(resolve_language("english").is_err());
}

#[test]
fn test_getLanguageName_shouldReturnEnglishName() {
    assert_eq!(get_language_name("es").unwrap(), "Spanish");
    assert_eq!(get_language_name("jpn").unwrap(), "Japanese");
}
