//! Regex patterns for receipt text.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Issue date: "領収日 2025年7月31日" or "領収日：2025/07/31"
    pub static ref RECEIPT_DATE: Regex = Regex::new(
        r"(?:領収日|発行日)[\s:：]*(\d{4})\s*[年/\-.]\s*(\d{1,2})\s*[月/\-.]\s*(\d{1,2})"
    ).unwrap();

    // Usage line: "ご利用日時 2025年7月5日(土) 10:00〜15:30 (5時間30分)"
    pub static ref USAGE_DATETIME: Regex = Regex::new(r"(?x)
        (?:ご)?利用日時[\s:：]*
        (?:(\d{4})\s*[年/]\s*)?
        (\d{1,2})\s*[月/]\s*(\d{1,2})\s*日?
        \s*(?:[（(][^）)\n]*[）)])?
        \s*(\d{1,2}[:：]\d{2})
        \s*[~〜～\-－―ー–—]\s*
        (\d{1,2}[:：]\d{2})
        (?:\s*[（(]?\s*(?:計|合計)?\s*(\d+)\s*時間\s*(?:(\d+)\s*分)?)?
        "
    ).unwrap();

    // Usage date without a usable time span, for precise error reporting
    pub static ref USAGE_DATE_ONLY: Regex = Regex::new(
        r"(?:ご)?利用日時?[\s:：]*(?:\d{4}\s*[年/]\s*)?(\d{1,2})\s*[月/]\s*(\d{1,2})"
    ).unwrap();

    // Provider line: "シッター名 山田 花子" / "担当シッター：山田 花子" / "シッター 山田 花子".
    // A bare "シッター" needs a separator so fee lines like "シッター交通費" stay out.
    pub static ref PROVIDER_LINE: Regex = Regex::new(
        r"(?m)^[ \t　]*(?:(?:担当シッター名?|シッター名)[ \t　:：]*|シッター[ \t　:：]+)(.*?)[ \t　]*$"
    ).unwrap();

    // Recipient line: "お子さま名 杉並 すけ 様"
    pub static ref RECIPIENT_LINE: Regex = Regex::new(
        r"(?m)^[ \t　]*お子(?:さま|様)(?:名|のお名前)?[ \t　:：]+(.+?)[ \t　]*$"
    ).unwrap();

    // Currency-anchored amounts. The label may be followed by a tax note.
    pub static ref BASE_FEE: Regex = Regex::new(
        r"保育料[^¥￥\n]*[¥￥]\s*([\d,，]+)"
    ).unwrap();

    pub static ref OPTION_FEE: Regex = Regex::new(
        r"オプション(?:料)?[^¥￥\n]*[¥￥]\s*([\d,，]+)"
    ).unwrap();

    pub static ref TRANSPORT_FEE: Regex = Regex::new(
        r"交通費[^¥￥\n]*[¥￥]\s*([\d,，]+)"
    ).unwrap();

    pub static ref TOTAL_PAID: Regex = Regex::new(
        r"(?:お支払い?(?:金)?額|領収金額|合計金額)[^¥￥\n]*[¥￥]\s*([\d,，]+)"
    ).unwrap();
}

/// Label fragments that mark a heading about the provider field rather
/// than an actual name.
pub const PROVIDER_HEADING_PREFIXES: &[&str] = &[
    "名(よみ",
    "名（よみ",
    "(よみ",
    "（よみ",
    "(ふりがな",
    "（ふりがな",
    "よみがな",
    "ふりがな",
    "要件",
    "の要件",
    "登録",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_datetime_dash_variants() {
        for dash in ["〜", "～", "-", "－", "―", "ー", "–", "—", "~"] {
            let line = format!("ご利用日時 2025年7月5日(土) 10:00{dash}15:30 (5時間30分)");
            let caps = USAGE_DATETIME.captures(&line).unwrap_or_else(|| panic!("{dash}"));
            assert_eq!(&caps[2], "7");
            assert_eq!(&caps[3], "5");
            assert_eq!(&caps[4], "10:00");
            assert_eq!(&caps[5], "15:30");
            assert_eq!(&caps[6], "5");
            assert_eq!(&caps[7], "30");
        }
    }

    #[test]
    fn test_usage_datetime_without_year_or_duration() {
        let caps = USAGE_DATETIME.captures("利用日時：7/12 9:00～12:00").unwrap();
        assert!(caps.get(1).is_none());
        assert_eq!(&caps[2], "7");
        assert_eq!(&caps[3], "12");
        assert_eq!(&caps[4], "9:00");
        assert!(caps.get(6).is_none());
    }

    #[test]
    fn test_receipt_date() {
        let caps = RECEIPT_DATE.captures("領収日：2025年7月31日").unwrap();
        assert_eq!(&caps[1], "2025");
        let caps = RECEIPT_DATE.captures("領収日 2024/12/01").unwrap();
        assert_eq!(&caps[1], "2024");
    }

    #[test]
    fn test_provider_line_labels() {
        for line in ["シッター名 山田 花子", "担当シッター：山田 花子", "担当シッター名 山田 花子", "シッター　山田 花子"] {
            let caps = PROVIDER_LINE.captures(line).unwrap_or_else(|| panic!("{line}"));
            assert_eq!(caps[1].trim_start_matches([':', '：']).trim(), "山田 花子", "{line}");
        }
        assert!(PROVIDER_LINE.captures("シッター交通費 ¥800").is_none());
        assert!(PROVIDER_LINE.captures("シッター料金 ¥1,000").is_none());
    }

    #[test]
    fn test_amount_patterns() {
        let caps = BASE_FEE.captures("保育料（非課税） ¥12,000").unwrap();
        assert_eq!(&caps[1], "12,000");
        let caps = TOTAL_PAID.captures("お支払い金額 ￥13,800").unwrap();
        assert_eq!(&caps[1], "13,800");
        assert!(TRANSPORT_FEE.captures("交通費 なし").is_none());
    }
}
