use config::{Config, Environment, File, FileFormat, FileSourceFile};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 可选配置文件名 (工作目录下, 扩展名自动识别)
const CONFIG_FILE_NAME: &str = "catalog-etl";

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub contracts_path: PathBuf,
    pub products_path: PathBuf,
    pub delimiter: char,
    pub header_rows: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub data_dir: PathBuf,
    pub emit_lookup_tables: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// 未配置时跳过数据库导入
    pub url: Option<String>,
    pub batch_size: usize,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            batch_size: 1000,
            max_connections: 4,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input: InputConfig {
                contracts_path: PathBuf::from("input/contracts.csv"),
                products_path: PathBuf::from("input/products.csv"),
                delimiter: ';',
                header_rows: 2,
            },
            output: OutputConfig {
                data_dir: PathBuf::from("data"),
                emit_lookup_tables: true,
            },
            database: DatabaseConfig::default(),
        }
    }
}

impl AppConfig {
    /// 加载顺序: 内置默认值 -> catalog-etl.toml (可选) -> CATALOG_ETL__* 环境变量 -> DATABASE_URL
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::layered(File::with_name(CONFIG_FILE_NAME).required(false))
    }

    /// 同 `from_env`, 但配置文件取自指定路径 (不存在时忽略)
    pub fn from_file_and_env(path: &Path) -> Result<Self, config::ConfigError> {
        Self::layered(File::from(path).required(false))
    }

    fn layered(file: File<FileSourceFile, FileFormat>) -> Result<Self, config::ConfigError> {
        let defaults = Self::default();

        let settings = Config::builder()
            .set_default("input.contracts_path", path_str(&defaults.input.contracts_path))?
            .set_default("input.products_path", path_str(&defaults.input.products_path))?
            .set_default("input.delimiter", defaults.input.delimiter.to_string())?
            .set_default("input.header_rows", defaults.input.header_rows as i64)?
            .set_default("output.data_dir", path_str(&defaults.output.data_dir))?
            .set_default("output.emit_lookup_tables", defaults.output.emit_lookup_tables)?
            .set_default("database.batch_size", defaults.database.batch_size as i64)?
            .set_default("database.max_connections", i64::from(defaults.database.max_connections))?
            .add_source(file)
            .add_source(
                Environment::with_prefix("CATALOG_ETL")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .build()?;

        settings.try_deserialize()
    }

    /// 分隔符必须是单字节字符, 否则回退到 ';'
    pub fn delimiter_byte(&self) -> u8 {
        u8::try_from(self.input.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .unwrap_or(b';')
    }
}

fn path_str(path: &std::path::Path) -> String {
    path.to_string_lossy().into_owned()
}
