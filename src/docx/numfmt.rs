//! Numeral systems for list markers (`w:numFmt`).

use serde::Serialize;

/// A list numeral system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NumberFormat {
    Decimal,
    DecimalZero,
    UpperRoman,
    LowerRoman,
    UpperLetter,
    LowerLetter,
    Ordinal,
    Bullet,
    None,
    DecimalEnclosedCircle,
    DecimalEnclosedCircleChinese,
    DecimalEnclosedParen,
    DecimalEnclosedFullstop,
    DecimalFullWidth,
    ChineseCounting,
    ChineseCountingThousand,
    ChineseLegalSimplified,
    IdeographDigital,
    IdeographTraditional,
    IdeographZodiac,
}

impl NumberFormat {
    /// Parse a `w:numFmt` value. Unrecognized formats degrade to decimal.
    pub fn parse(value: &str) -> Self {
        match value {
            "decimal" => NumberFormat::Decimal,
            "decimalZero" => NumberFormat::DecimalZero,
            "upperRoman" => NumberFormat::UpperRoman,
            "lowerRoman" => NumberFormat::LowerRoman,
            "upperLetter" => NumberFormat::UpperLetter,
            "lowerLetter" => NumberFormat::LowerLetter,
            "ordinal" => NumberFormat::Ordinal,
            "bullet" => NumberFormat::Bullet,
            "none" => NumberFormat::None,
            "decimalEnclosedCircle" => NumberFormat::DecimalEnclosedCircle,
            "decimalEnclosedCircleChinese" => NumberFormat::DecimalEnclosedCircleChinese,
            "decimalEnclosedParen" => NumberFormat::DecimalEnclosedParen,
            "decimalEnclosedFullstop" => NumberFormat::DecimalEnclosedFullstop,
            "decimalFullWidth" | "decimalFullWidth2" => NumberFormat::DecimalFullWidth,
            "chineseCounting" => NumberFormat::ChineseCounting,
            "chineseCountingThousand" => NumberFormat::ChineseCountingThousand,
            "chineseLegalSimplified" => NumberFormat::ChineseLegalSimplified,
            "ideographDigital" => NumberFormat::IdeographDigital,
            "ideographTraditional" => NumberFormat::IdeographTraditional,
            "ideographZodiac" => NumberFormat::IdeographZodiac,
            other => {
                log::debug!("unsupported numbering format '{}', using decimal", other);
                NumberFormat::Decimal
            }
        }
    }

    /// Render one counter value.
    pub fn format(self, n: u32) -> String {
        match self {
            NumberFormat::Decimal => n.to_string(),
            NumberFormat::DecimalZero => format!("{:02}", n),
            NumberFormat::UpperRoman => roman(n).unwrap_or_else(|| n.to_string()),
            NumberFormat::LowerRoman => roman(n)
                .map(|r| r.to_lowercase())
                .unwrap_or_else(|| n.to_string()),
            NumberFormat::UpperLetter => letters(n, b'A').unwrap_or_else(|| n.to_string()),
            NumberFormat::LowerLetter => letters(n, b'a').unwrap_or_else(|| n.to_string()),
            NumberFormat::Ordinal => ordinal(n),
            NumberFormat::Bullet | NumberFormat::None => String::new(),
            NumberFormat::DecimalEnclosedCircle | NumberFormat::DecimalEnclosedCircleChinese => {
                circled(n).map(String::from).unwrap_or_else(|| n.to_string())
            }
            NumberFormat::DecimalEnclosedParen => offset_glyph(n, 20, 0x2474)
                .map(String::from)
                .unwrap_or_else(|| format!("({})", n)),
            NumberFormat::DecimalEnclosedFullstop => offset_glyph(n, 20, 0x2488)
                .map(String::from)
                .unwrap_or_else(|| format!("{}.", n)),
            NumberFormat::DecimalFullWidth => n
                .to_string()
                .chars()
                .filter_map(|d| d.to_digit(10).and_then(|d| char::from_u32(0xFF10 + d)))
                .collect(),
            NumberFormat::ChineseCounting => chinese(n, &COUNTING),
            NumberFormat::ChineseCountingThousand => chinese(n, &COUNTING_THOUSAND),
            NumberFormat::ChineseLegalSimplified => chinese(n, &LEGAL_SIMPLIFIED),
            NumberFormat::IdeographDigital => n
                .to_string()
                .chars()
                .filter_map(|d| d.to_digit(10).map(|d| COUNTING.digits[d as usize]))
                .collect(),
            NumberFormat::IdeographTraditional => cyclic(n, &HEAVENLY_STEMS),
            NumberFormat::IdeographZodiac => cyclic(n, &EARTHLY_BRANCHES),
        }
    }
}

fn roman(n: u32) -> Option<String> {
    const TABLE: [(u32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    if n == 0 || n > 3999 {
        return None;
    }
    let mut rest = n;
    let mut out = String::new();
    for (value, numeral) in TABLE {
        while rest >= value {
            out.push_str(numeral);
            rest -= value;
        }
    }
    Some(out)
}

/// A, B, ..., Z, AA, BB, ..., ZZ, AAA, ...
fn letters(n: u32, base: u8) -> Option<String> {
    if n == 0 {
        return None;
    }
    let letter = (base + ((n - 1) % 26) as u8) as char;
    let repeat = ((n - 1) / 26 + 1) as usize;
    Some(std::iter::repeat(letter).take(repeat).collect())
}

fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

/// ①..⑳, then ㉑..㉟ and ㊱..㊿.
fn circled(n: u32) -> Option<char> {
    match n {
        1..=20 => char::from_u32(0x2460 + n - 1),
        21..=35 => char::from_u32(0x3251 + n - 21),
        36..=50 => char::from_u32(0x32B1 + n - 36),
        _ => None,
    }
}

fn offset_glyph(n: u32, max: u32, first: u32) -> Option<char> {
    if (1..=max).contains(&n) {
        char::from_u32(first + n - 1)
    } else {
        None
    }
}

fn cyclic(n: u32, glyphs: &[char]) -> String {
    if n == 0 {
        return n.to_string();
    }
    glyphs[((n - 1) as usize) % glyphs.len()].to_string()
}

const HEAVENLY_STEMS: [char; 10] = ['甲', '乙', '丙', '丁', '戊', '己', '庚', '辛', '壬', '癸'];
const EARTHLY_BRANCHES: [char; 12] = [
    '子', '丑', '寅', '卯', '辰', '巳', '午', '未', '申', '酉', '戌', '亥',
];

struct ChineseNumerals {
    digits: [char; 10],
    /// 10, 100, 1000
    units: [char; 3],
    /// 10^4, 10^8
    groups: [char; 2],
    /// Write 10..19 as 十, 十一, ... rather than 一十, 一十一
    omit_leading_one: bool,
}

const COUNTING: ChineseNumerals = ChineseNumerals {
    digits: ['〇', '一', '二', '三', '四', '五', '六', '七', '八', '九'],
    units: ['十', '百', '千'],
    groups: ['万', '亿'],
    omit_leading_one: true,
};

const COUNTING_THOUSAND: ChineseNumerals = ChineseNumerals {
    digits: ['零', '一', '二', '三', '四', '五', '六', '七', '八', '九'],
    units: ['十', '百', '千'],
    groups: ['万', '亿'],
    omit_leading_one: true,
};

const LEGAL_SIMPLIFIED: ChineseNumerals = ChineseNumerals {
    digits: ['零', '壹', '贰', '叁', '肆', '伍', '陆', '柒', '捌', '玖'],
    units: ['拾', '佰', '仟'],
    groups: ['万', '亿'],
    omit_leading_one: false,
};

fn chinese(n: u32, numerals: &ChineseNumerals) -> String {
    if n == 0 {
        return numerals.digits[0].to_string();
    }

    let groups = [
        (n / 100_000_000, Some(numerals.groups[1])),
        ((n / 10_000) % 10_000, Some(numerals.groups[0])),
        (n % 10_000, None),
    ];

    let mut out = String::new();
    let mut gap = false;
    for (value, marker) in groups {
        if value == 0 {
            gap |= !out.is_empty();
            continue;
        }
        if !out.is_empty() && (gap || value < 1000) {
            out.push(numerals.digits[0]);
        }
        gap = false;
        four_digits(value, numerals, &mut out);
        if let Some(marker) = marker {
            out.push(marker);
        }
    }

    if numerals.omit_leading_one && (10..20).contains(&n) {
        out.remove(0);
    }
    out
}

fn four_digits(value: u32, numerals: &ChineseNumerals, out: &mut String) {
    let places = [
        (1000, Some(numerals.units[2])),
        (100, Some(numerals.units[1])),
        (10, Some(numerals.units[0])),
        (1, None),
    ];
    let mut started = false;
    let mut zero = false;
    for (place, unit) in places {
        let digit = (value / place) % 10;
        if digit == 0 {
            zero |= started;
            continue;
        }
        if zero {
            out.push(numerals.digits[0]);
            zero = false;
        }
        out.push(numerals.digits[digit as usize]);
        if let Some(unit) = unit {
            out.push(unit);
        }
        started = true;
    }
}
