/// BigDecimal 以 JSON 数字写出 (保留原始精度, 如 12.50), 读取时兼容数字和字符串
pub mod json_number {
    use bigdecimal::BigDecimal;
    use serde::de::Error as _;
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::{Number, Value};
    use std::str::FromStr;

    pub fn serialize<S: Serializer>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error> {
        Number::from_str(&value.to_string())
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigDecimal, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Number(n) => BigDecimal::from_str(&n.to_string()).map_err(D::Error::custom),
            Value::String(s) => BigDecimal::from_str(&s).map_err(D::Error::custom),
            other => Err(D::Error::custom(format!("expected decimal, found {other}"))),
        }
    }

    /// Option<BigDecimal> 版本, None 对应 null
    pub mod option {
        use bigdecimal::BigDecimal;
        use serde::de::Error as _;
        use serde::{Deserialize, Deserializer, Serializer};
        use serde_json::Value;

        pub fn serialize<S: Serializer>(value: &Option<BigDecimal>, serializer: S) -> Result<S::Ok, S::Error> {
            match value {
                Some(v) => super::serialize(v, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<BigDecimal>, D::Error> {
            match Value::deserialize(deserializer)? {
                Value::Null => Ok(None),
                other => super::deserialize(other).map(Some).map_err(D::Error::custom),
            }
        }
    }
}
