use crate::error::{EtlError, Result};
use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter, Trim};
use std::path::Path;

/// 源文件的一行: 清洗后的字段 + 源行号
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub line: u64,
    pub fields: Vec<String>,
}

impl RawRow {
    /// 缺失的列按空字符串处理
    pub fn get(&self, index: usize) -> &str {
        self.fields.get(index).map(String::as_str).unwrap_or("")
    }

    fn from_record(record: &StringRecord) -> Self {
        Self {
            line: record.position().map(|p| p.line()).unwrap_or(0),
            fields: record.iter().map(clean_field).collect(),
        }
    }
}

/// 去掉首尾空白与包裹的引号
fn clean_field(field: &str) -> String {
    field.trim().trim_matches('"').trim().to_string()
}

/// 行解析器配置
#[derive(Debug, Clone)]
pub struct RowParser {
    /// 字段分隔符 (默认 ';')
    delimiter: u8,

    /// 需要丢弃的前导表头行数
    header_rows: usize,
}

impl Default for RowParser {
    fn default() -> Self {
        Self {
            delimiter: b';',
            header_rows: 2,
        }
    }
}

impl RowParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_header_rows(mut self, header_rows: usize) -> Self {
        self.header_rows = header_rows;
        self
    }

    /// 读取整个源文件并解码; 文件不可读是致命错误
    ///
    /// 编码判断需要全部字节, 所以文件整体读入内存; 之后的行解析仍是惰性的
    pub async fn read_file(&self, path: &Path) -> Result<String> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| EtlError::io(path, e))?;
        tracing::debug!("Read {} bytes from {}", bytes.len(), path.display());
        Ok(decode_source(bytes))
    }

    /// 在已解码的内容上构建行迭代器 (单次、有限、不可重启)
    pub fn rows<'a>(&self, content: &'a str) -> Rows<'a> {
        let reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(content.as_bytes());

        Rows {
            records: reader.into_records(),
            headers_left: self.header_rows,
        }
    }
}

/// RawRow 序列; 无法解码的行以 Err 交给调用方计数后继续
pub struct Rows<'a> {
    records: StringRecordsIntoIter<&'a [u8]>,
    headers_left: usize,
}

impl Iterator for Rows<'_> {
    type Item = std::result::Result<RawRow, csv::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = self.records.next()?;
            if self.headers_left > 0 {
                self.headers_left -= 1;
                continue;
            }
            return Some(record.map(|r| RawRow::from_record(&r)));
        }
    }
}

/// 优先按 UTF-8 解码, 否则按 Windows-1250 (中欧导出编码)
pub fn decode_source(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => match text.strip_prefix('\u{feff}') {
            Some(stripped) => stripped.to_string(),
            None => text,
        },
        Err(err) => {
            let bytes = err.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1250.decode(&bytes);
            decoded.into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(parser: &RowParser, content: &str) -> Vec<RawRow> {
        parser.rows(content).filter_map(|r| r.ok()).collect()
    }

    #[test]
    fn skips_configured_header_rows() {
        let content = "Izvještaj;2024\nSifra;Naziv\nA1;Mlijeko\nA2;Kruh\n";
        let rows = collect(&RowParser::new(), content);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get(0), "A1");
        assert_eq!(rows[1].get(1), "Kruh");
        assert_eq!(rows[0].line, 3);
    }

    #[test]
    fn strips_quotes_and_whitespace() {
        let content = "h\nh\n  \"A1\" ; \" Mlijeko 2,8% \" ;x\n";
        let rows = collect(&RowParser::new(), content);

        assert_eq!(rows[0].fields, vec!["A1", "Mlijeko 2,8%", "x"]);
    }

    #[test]
    fn missing_columns_read_as_empty() {
        let content = "h\nh\nA1;B\nA2\n";
        let rows = collect(&RowParser::new(), content);

        assert_eq!(rows[1].get(1), "");
        assert_eq!(rows[1].get(40), "");
    }

    #[test]
    fn custom_delimiter_and_header_count() {
        let parser = RowParser::new().with_delimiter(b',').with_header_rows(0);
        let rows = collect(&parser, "a,b\nc,d\n");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get(1), "d");
    }

    #[test]
    fn decodes_windows_1250_when_not_utf8() {
        // "Šifra" in Windows-1250: Š = 0x8A
        let bytes = vec![0x8A, b'i', b'f', b'r', b'a'];
        assert_eq!(decode_source(bytes), "Šifra");
    }

    #[test]
    fn strips_utf8_bom() {
        let bytes = "\u{feff}A;B".as_bytes().to_vec();
        assert_eq!(decode_source(bytes), "A;B");
    }
}
