// ==========================================
// 电机运行监测系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::monitor_config_trait::MonitorConfigReader;
use crate::db::open_sqlite_connection;
use crate::engine::{CauseThresholds, DetectorConfig};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径（不存在则创建，并建立 config_kv 表）
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 会对传入连接再次应用统一 PRAGMA 并确保 config_kv 存在（幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
            crate::db::ensure_config_schema(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 读取并解析配置值；缺失用默认值，格式错误告警后用默认值
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> Result<T, Box<dyn Error>>
    where
        T: FromStr + Copy + std::fmt::Display,
    {
        let Some(raw) = self.get_config_value(key)? else {
            return Ok(default);
        };
        match raw.trim().parse::<T>() {
            Ok(value) => Ok(value),
            Err(_) => {
                tracing::warn!(
                    config_key = key,
                    raw_value = %raw,
                    default = %default,
                    "配置格式错误，使用默认值"
                );
                Ok(default)
            }
        }
    }

    /// 写入 global scope 配置（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        tracing::info!(config_key = key, value = value, "配置已更新");
        Ok(())
    }

    /// 删除 global scope 配置（恢复默认值）
    pub fn remove_config_value(&self, key: &str) -> Result<bool, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let affected = conn.execute(
            "DELETE FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
        )?;
        Ok(affected > 0)
    }

    /// 获取所有已存储配置的快照（JSON格式，按键排序）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    fn get_optional_path(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        Ok(self
            .get_config_value(key)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()))
    }
}

// ==========================================
// MonitorConfigReader Trait 实现
// ==========================================
#[async_trait]
impl MonitorConfigReader for ConfigManager {
    async fn get_detector_config(&self) -> Result<DetectorConfig, Box<dyn Error>> {
        let defaults = DetectorConfig::default();
        Ok(DetectorConfig {
            contamination: self.get_parsed_or_default(config_keys::CONTAMINATION, defaults.contamination)?,
            seed: self.get_parsed_or_default(config_keys::RANDOM_SEED, defaults.seed)?,
            n_estimators: self.get_parsed_or_default(config_keys::N_ESTIMATORS, defaults.n_estimators)?,
            max_samples: self.get_parsed_or_default(config_keys::MAX_SAMPLES, defaults.max_samples)?,
        })
    }

    async fn get_cause_thresholds(&self) -> Result<CauseThresholds, Box<dyn Error>> {
        let defaults = CauseThresholds::default();
        Ok(CauseThresholds {
            current_max: self.get_parsed_or_default(config_keys::CURRENT_MAX, defaults.current_max)?,
            pressure_min: self.get_parsed_or_default(config_keys::PRESSURE_MIN, defaults.pressure_min)?,
            temp_max: self.get_parsed_or_default(config_keys::TEMP_MAX, defaults.temp_max)?,
            torque_max: self.get_parsed_or_default(config_keys::TORQUE_MAX, defaults.torque_max)?,
        })
    }

    async fn get_readings_path(&self) -> Result<Option<String>, Box<dyn Error>> {
        self.get_optional_path(config_keys::READINGS_PATH)
    }

    async fn get_alarm_log_path(&self) -> Result<Option<String>, Box<dyn Error>> {
        self.get_optional_path(config_keys::ALARM_LOG_PATH)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 异常检测
    pub const CONTAMINATION: &str = "contamination";
    pub const RANDOM_SEED: &str = "random_seed";
    pub const N_ESTIMATORS: &str = "n_estimators";
    pub const MAX_SAMPLES: &str = "max_samples";

    // 原因分类阈值
    pub const CURRENT_MAX: &str = "current_max";
    pub const PRESSURE_MIN: &str = "pressure_min";
    pub const TEMP_MAX: &str = "temp_max";
    pub const TORQUE_MAX: &str = "torque_max";

    // 存储路径
    pub const READINGS_PATH: &str = "readings_path";
    pub const ALARM_LOG_PATH: &str = "alarm_log_path";

    pub const ALL: [&str; 10] = [
        CONTAMINATION,
        RANDOM_SEED,
        N_ESTIMATORS,
        MAX_SAMPLES,
        CURRENT_MAX,
        PRESSURE_MIN,
        TEMP_MAX,
        TORQUE_MAX,
        READINGS_PATH,
        ALARM_LOG_PATH,
    ];
}
