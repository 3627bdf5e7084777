use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::str::FromStr;

/// 解析十进制数: 只接受 `[+-]?数字([.,]数字)?`, 逗号为小数点 ("12,50").
/// 科学计数法、千位分隔符等一律视为非数字
pub fn parse_decimal(value: &str) -> Option<BigDecimal> {
    let value = value.trim();
    let unsigned = value.strip_prefix(|c: char| c == '-' || c == '+').unwrap_or(value);
    let (int_part, frac_part) = match unsigned.split_once(|c: char| c == '.' || c == ',') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };

    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) || !frac_part.map_or(true, all_digits) {
        return None;
    }
    BigDecimal::from_str(&value.replacen(',', ".", 1)).ok()
}

/// 解析整数前缀 (可带符号), 其后的非数字字符忽略: "30 dana" -> 30
pub fn parse_int(value: &str) -> Option<i64> {
    let value = value.trim();
    let digits_start = usize::from(value.starts_with(|c: char| c == '-' || c == '+'));
    let digits_len = value[digits_start..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return None;
    }
    value[..digits_start + digits_len].parse().ok()
}

/// 可选整数 (包装数量): 空、非数字或 0 均视为缺失
pub fn parse_optional_int(value: &str) -> Option<i64> {
    parse_int(value).filter(|v| *v != 0)
}

/// 解析 D.M.YYYY (允许不补零, 允许末尾的点) 为日历日期
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let value = value.strip_suffix('.').unwrap_or(value);
    let mut parts = value.split('.').map(str::trim);

    let day = parts.next()?.parse::<u32>().ok()?;
    let month = parts.next()?.parse::<u32>().ok()?;
    let year = parts.next()?.parse::<i32>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}
