//! 表示用の数値・時刻フォーマット

use chrono::{DateTime, Utc};

/// 数字列を 3 桁ごとに区切る
fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// 3 桁区切り（`2847` → `2,847`）
pub fn with_separators(n: i64) -> String {
    let grouped = group_digits(&n.unsigned_abs().to_string());
    if n < 0 { format!("-{}", grouped) } else { grouped }
}

/// 100 万以上は `1.2M`、それ未満は 3 桁区切り
pub fn compact(n: i64) -> String {
    if n.unsigned_abs() < 1_000_000 {
        return with_separators(n);
    }
    let millions = format!("{:.1}", n as f64 / 1_000_000.0);
    let trimmed = millions.strip_suffix(".0").unwrap_or(&millions);
    format!("{}M", trimmed)
}

/// `72` → `72%`
pub fn percent(n: i64) -> String {
    format!("{}%", n)
}

/// 増減率。0 以上は `+` を付ける
pub fn growth(n: i64) -> String {
    if n >= 0 {
        format!("+{}%", n)
    } else {
        format!("{}%", n)
    }
}

/// 熱度スコア（小数 1 桁、整数部は 3 桁区切り、`.0` は省略）
pub fn score(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let formatted = format!("{:.1}", value);
    let (whole, tenth) = formatted.split_once('.').unwrap_or((&formatted, "0"));
    let digits = whole.trim_start_matches('-');
    let sign = if whole.starts_with('-') && (digits != "0" || tenth != "0") {
        "-"
    } else {
        ""
    };
    if tenth == "0" {
        format!("{}{}", sign, group_digits(digits))
    } else {
        format!("{}{}.{}", sign, group_digits(digits), tenth)
    }
}

/// `now` から見た経過時間（`2小时前` など）
pub fn relative_age(published: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(published);
    if elapsed.num_minutes() < 1 {
        "刚刚".to_string()
    } else if elapsed.num_hours() < 1 {
        format!("{}分钟前", elapsed.num_minutes())
    } else if elapsed.num_days() < 1 {
        format!("{}小时前", elapsed.num_hours())
    } else if elapsed.num_days() < 30 {
        format!("{}天前", elapsed.num_days())
    } else {
        published.format("%Y-%m-%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn separators_group_by_thousands() {
        assert_eq!(with_separators(127), "127");
        assert_eq!(with_separators(2847), "2,847");
        assert_eq!(with_separators(1_234_567), "1,234,567");
        assert_eq!(with_separators(-4500), "-4,500");
        assert_eq!(with_separators(0), "0");
    }

    #[test]
    fn compact_switches_to_millions() {
        assert_eq!(compact(1_200_000), "1.2M");
        assert_eq!(compact(3_000_000), "3M");
        assert_eq!(compact(999_999), "999,999");
    }

    #[test]
    fn growth_is_signed() {
        assert_eq!(growth(12), "+12%");
        assert_eq!(growth(0), "+0%");
        assert_eq!(growth(-3), "-3%");
        assert_eq!(percent(72), "72%");
    }

    #[test]
    fn score_keeps_one_decimal() {
        assert_eq!(score(2128.5), "2,128.5");
        assert_eq!(score(948.0), "948");
        assert_eq!(score(f64::NAN), "0");
    }

    #[test]
    fn score_keeps_sign_below_one() {
        assert_eq!(score(-0.5), "-0.5");
        assert_eq!(score(-1234.5), "-1,234.5");
        assert_eq!(score(-0.04), "0");
    }

    #[test]
    fn relative_age_buckets() {
        let now = Utc.with_ymd_and_hms(2024, 1, 7, 12, 30, 0).unwrap();
        assert_eq!(relative_age(now - Duration::seconds(20), now), "刚刚");
        assert_eq!(relative_age(now - Duration::minutes(15), now), "15分钟前");
        assert_eq!(relative_age(now - Duration::hours(2), now), "2小时前");
        assert_eq!(relative_age(now - Duration::days(3), now), "3天前");
        assert_eq!(
            relative_age(Utc.with_ymd_and_hms(2023, 10, 1, 0, 0, 0).unwrap(), now),
            "2023-10-01"
        );
        // 未来の時刻
        assert_eq!(relative_age(now + Duration::hours(1), now), "刚刚");
    }
}
