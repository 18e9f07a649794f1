//! 팝업 HTML 필드 추출기.
//!
//! 업스트림 feature의 `popupContent`는 `<dt>Label</dt><dd>Value</dd>` 쌍으로 된
//! HTML 조각입니다. 라벨 집합이 작고 고정이므로 HTML 파서 대신 라벨별 정규식으로
//! 값을 꺼냅니다.
//!
//! 추출은 실패하지 않습니다. 라벨이 없거나, 값이 비었거나, 숫자로 읽을 수 없으면
//! `0`(알 수 없음)을 반환합니다.

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// 팝업에서 읽는 의미 필드.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PopupField {
    /// 고도 (ft)
    Altitude,
    /// 대지 속도 (kts). 업스트림은 "Speed" 라벨만 사용합니다.
    GroundSpeed,
    /// 속도 (kts)
    Speed,
}

impl PopupField {
    /// 모든 필드.
    pub const ALL: [PopupField; 3] = [
        PopupField::Altitude,
        PopupField::GroundSpeed,
        PopupField::Speed,
    ];

    /// 업스트림 라벨.
    pub const fn label(self) -> &'static str {
        match self {
            PopupField::Altitude => "Altitude",
            PopupField::GroundSpeed => "Groundspeed",
            PopupField::Speed => "Speed",
        }
    }
}

/// 속도 계열 라벨이 없을 때 한 번 더 찾아보는 라벨.
pub const SPEED_ALIAS: &str = "Speed";

/// 값에서 제거하는 단위/구분자 (` ft`, ` kts`, `,`).
fn unit_noise() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r" ft| kts|,").expect("unit pattern is valid"))
}

/// 라벨 정규식 생성: `<dt>{label}</dt><dd>(.*?)</dd>`
fn label_regex(label: &str) -> Option<Regex> {
    Regex::new(&format!(
        r"<dt>{}</dt><dd>(.*?)</dd>",
        regex::escape(label)
    ))
    .ok()
}

/// 알려진 라벨의 미리 컴파일된 정규식.
fn known_patterns() -> &'static HashMap<&'static str, Regex> {
    static PATTERNS: OnceLock<HashMap<&'static str, Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        PopupField::ALL
            .iter()
            .filter_map(|field| label_regex(field.label()).map(|re| (field.label(), re)))
            .collect()
    })
}

/// 라벨에 대응하는 첫 번째 값 문자열을 찾습니다.
///
/// 라벨이 있으면 값이 비어 있어도 `Some("")`을 반환합니다.
fn find_value<'a>(blob: &'a str, label: &str) -> Option<&'a str> {
    let capture = |re: &Regex| {
        re.captures(blob)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    };

    match known_patterns().get(label) {
        Some(re) => capture(re),
        None => label_regex(label).and_then(|re| capture(&re)),
    }
}

/// 라벨 이름으로 정수 값을 추출합니다.
///
/// `"Groundspeed"` 또는 `"Speed"`를 요청했는데 찾지 못하면 `"Speed"` 라벨로
/// 한 번 더 찾습니다.
pub fn extract_field(blob: &str, label: &str) -> i32 {
    let mut value = find_value(blob, label);

    if value.is_none()
        && (label == PopupField::GroundSpeed.label() || label == PopupField::Speed.label())
    {
        value = find_value(blob, SPEED_ALIAS);
    }

    match value {
        Some(raw) if !raw.is_empty() => parse_numeric(raw),
        _ => 0,
    }
}

/// 의미 필드로 정수 값을 추출합니다.
pub fn extract(blob: &str, field: PopupField) -> i32 {
    extract_field(blob, field.label())
}

/// 단위와 천 단위 구분자를 제거한 뒤 앞쪽 정수를 읽습니다.
///
/// 앞 공백은 건너뛰고, 부호 하나와 이어지는 숫자만 사용합니다
/// (`"12.7"` → 12, `"350abc"` → 350). 숫자가 없으면 `0`.
pub fn parse_numeric(raw: &str) -> i32 {
    let cleaned = unit_noise().replace_all(raw, "");
    parse_leading_int(&cleaned).unwrap_or(0)
}

fn parse_leading_int(s: &str) -> Option<i32> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }

    let magnitude: i64 = rest[..digits_end].parse().ok()?;
    let value = if negative { -magnitude } else { magnitude };
    i32::try_from(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const POPUP: &str = "<dl><dt>Callsign</dt><dd>QFA12</dd>\
        <dt>Altitude</dt><dd>1,234 ft</dd>\
        <dt>Speed</dt><dd>145 kts</dd></dl>";

    #[test]
    fn test_extract_altitude_with_separator_and_unit() {
        assert_eq!(extract_field(POPUP, "Altitude"), 1234);
        assert_eq!(extract(POPUP, PopupField::Altitude), 1234);
    }

    #[test]
    fn test_missing_label_yields_zero() {
        assert_eq!(extract_field("<dt>Speed</dt><dd>145 kts</dd>", "Altitude"), 0);
        assert_eq!(extract_field("", "Altitude"), 0);
    }

    #[test]
    fn test_groundspeed_falls_back_to_speed() {
        assert_eq!(extract_field(POPUP, "Groundspeed"), 145);
        assert_eq!(extract(POPUP, PopupField::GroundSpeed), 145);
    }

    #[test]
    fn test_groundspeed_label_wins_when_present() {
        let blob = "<dt>Groundspeed</dt><dd>150 kts</dd><dt>Speed</dt><dd>145 kts</dd>";
        assert_eq!(extract_field(blob, "Groundspeed"), 150);
    }

    #[test]
    fn test_no_alias_for_other_labels() {
        assert_eq!(extract_field(POPUP, "Heading"), 0);
    }

    #[test]
    fn test_empty_value_yields_zero() {
        assert_eq!(extract_field("<dt>Altitude</dt><dd></dd>", "Altitude"), 0);
    }

    #[test]
    fn test_non_numeric_value_yields_zero() {
        assert_eq!(extract_field("<dt>Altitude</dt><dd>Ground</dd>", "Altitude"), 0);
        assert_eq!(extract_field("<dt>Altitude</dt><dd>FL350</dd>", "Altitude"), 0);
    }

    #[test]
    fn test_label_is_case_sensitive() {
        assert_eq!(extract_field("<dt>altitude</dt><dd>5000 ft</dd>", "Altitude"), 0);
    }

    #[test]
    fn test_first_match_wins() {
        let blob = "<dt>Altitude</dt><dd>100 ft</dd><dt>Altitude</dt><dd>200 ft</dd>";
        assert_eq!(extract_field(blob, "Altitude"), 100);
    }

    #[test]
    fn test_unknown_label_with_regex_metacharacters() {
        let blob = "<dt>V/S (fpm)</dt><dd>-500</dd>";
        assert_eq!(extract_field(blob, "V/S (fpm)"), -500);
    }

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_numeric("5000 ft"), 5000);
        assert_eq!(parse_numeric("210 kts"), 210);
        assert_eq!(parse_numeric("12,345"), 12345);
        assert_eq!(parse_numeric("  42"), 42);
        assert_eq!(parse_numeric("12.7"), 12);
        assert_eq!(parse_numeric("-300"), -300);
        assert_eq!(parse_numeric("-"), 0);
        assert_eq!(parse_numeric("99999999999"), 0);
    }

    proptest! {
        #[test]
        fn prop_altitude_roundtrips_through_popup(alt in 0u32..100_000, prefix in "[a-zA-Z<>/ ]{0,20}") {
            let formatted = format_thousands(alt);
            let blob = format!("{}<dt>Altitude</dt><dd>{} ft</dd>", prefix, formatted);
            prop_assert_eq!(extract_field(&blob, "Altitude"), alt as i32);
        }

        #[test]
        fn prop_missing_altitude_is_zero(blob in "[a-zA-Z0-9<>/ ]{0,80}") {
            prop_assume!(!blob.contains("<dt>Altitude</dt><dd>"));
            prop_assert_eq!(extract_field(&blob, "Altitude"), 0);
        }

        #[test]
        fn prop_extraction_is_pure(blob in ".{0,120}", label in "(Altitude|Speed|Groundspeed)") {
            prop_assert_eq!(extract_field(&blob, &label), extract_field(&blob, &label));
        }
    }

    fn format_thousands(n: u32) -> String {
        let digits = n.to_string();
        let mut out = String::new();
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(c);
        }
        out
    }
}
