use log::warn;
use serde::Deserialize;
use std::collections::HashMap;

const KEY_PREFIX: &str = "zabbix[";
const KEY_SUFFIX: &str = "]";
pub const NOT_AVAILABLE: &str = "N/A";

const UPTIME_KEY: &str = "uptime";
const VALUES_PROCESSED_KEY: &str = "wcache_values";

const CACHES: [(&str, &str); 5] = [
    ("Configuration cache", "rcache_buffer_pfree"),
    ("History write cache", "wcache_history_pfree"),
    ("History index cache", "wcache_index_pfree"),
    ("Trend write cache", "wcache_trend_pfree"),
    ("Value cache", "vcache_buffer_pfree"),
];

const PROCESSES: [&str; 7] = [
    "poller",
    "trapper",
    "history syncer",
    "unreachable poller",
    "discoverer",
    "housekeeper",
    "preprocessing manager",
];

/// Item as returned by `item.get` with `output: [key_, lastvalue, units]`.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricItem {
    pub key_: String,
    #[serde(default)]
    pub lastvalue: String,
    #[serde(default)]
    pub units: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricValue {
    pub value: String,
    pub unit: String,
}

/// Server internal metrics keyed by their flattened item key.
#[derive(Debug, Default)]
pub struct MetricSnapshot {
    values: HashMap<String, MetricValue>,
}

impl MetricSnapshot {
    pub fn from_items(items: Vec<MetricItem>) -> Self {
        let values = items
            .into_iter()
            .map(|item| {
                (
                    flatten_key(&item.key_),
                    MetricValue {
                        value: item.lastvalue,
                        unit: item.units,
                    },
                )
            })
            .collect();
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&MetricValue> {
        self.values.get(key)
    }

    fn percentage(&self, key: &str) -> String {
        format_percentage(self.get(key).map(|m| m.value.as_str()))
    }
}

/// `zabbix[process,history syncer,avg,busy]` -> `process_history_syncer_avg_busy`
pub fn flatten_key(key: &str) -> String {
    let inner = key
        .strip_prefix(KEY_PREFIX)
        .and_then(|k| k.strip_suffix(KEY_SUFFIX))
        .unwrap_or(key);
    inner.replace([',', ' '], "_")
}

pub fn format_uptime(seconds: u64) -> String {
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3600;
    let minutes = (seconds % 3600) / 60;
    format!("{}d {}h {}m", days, hours, minutes)
}

/// Always one decimal place; missing, unparsable or non-finite values count as 0.
pub fn format_percentage(value: Option<&str>) -> String {
    let parsed = match value {
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or_else(|| {
                warn!("Non-numeric percentage value: {:?}", raw);
                0.0
            }),
        None => 0.0,
    };
    format!("{:.1}", parsed)
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedPercentage {
    pub name: String,
    pub percent: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerMetrics {
    pub uptime: String,
    pub caches_free: Vec<NamedPercentage>,
    pub processes_busy: Vec<NamedPercentage>,
    pub values_processed: String,
}

impl ServerMetrics {
    pub fn from_snapshot(snapshot: &MetricSnapshot) -> Self {
        let uptime = snapshot
            .get(UPTIME_KEY)
            .and_then(|m| m.value.trim().parse::<f64>().ok())
            .map(|secs| format_uptime(secs.max(0.0) as u64))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let caches_free = CACHES
            .iter()
            .map(|(name, key)| NamedPercentage {
                name: name.to_string(),
                percent: snapshot.percentage(key),
            })
            .collect();

        let processes_busy = PROCESSES
            .iter()
            .map(|process| NamedPercentage {
                name: process.to_string(),
                percent: snapshot.percentage(&flatten_key(&format!(
                    "process,{},avg,busy",
                    process
                ))),
            })
            .collect();

        let values_processed = snapshot
            .get(VALUES_PROCESSED_KEY)
            .map(|m| m.value.clone())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        Self {
            uptime,
            caches_free,
            processes_busy,
            values_processed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(key: &str, value: &str, units: &str) -> MetricItem {
        MetricItem {
            key_: key.to_string(),
            lastvalue: value.to_string(),
            units: units.to_string(),
        }
    }

    #[test]
    fn flattens_wrapped_keys() {
        assert_eq!(flatten_key("zabbix[uptime]"), "uptime");
        assert_eq!(
            flatten_key("zabbix[process,history syncer,avg,busy]"),
            "process_history_syncer_avg_busy"
        );
        assert_eq!(flatten_key("zabbix[wcache,values]"), "wcache_values");
        assert_eq!(flatten_key("system.cpu.load"), "system.cpu.load");
    }

    #[test]
    fn uptime_format() {
        assert_eq!(format_uptime(0), "0d 0h 0m");
        assert_eq!(format_uptime(90_061), "1d 1h 1m");
        assert_eq!(format_uptime(3 * 86_400 + 59), "3d 0h 0m");
    }

    #[test]
    fn percentages_have_one_decimal() {
        assert_eq!(format_percentage(Some("97.4563")), "97.5");
        assert_eq!(format_percentage(Some("100")), "100.0");
        assert_eq!(format_percentage(Some("garbage")), "0.0");
        assert_eq!(format_percentage(None), "0.0");
        for raw in ["NaN", "inf", "-infinity", "1e400"] {
            assert_eq!(format_percentage(Some(raw)), "0.0", "{}", raw);
        }
    }

    #[test]
    fn builds_metrics_from_snapshot() {
        let snapshot = MetricSnapshot::from_items(vec![
            item("zabbix[uptime]", "183720", "uptime"),
            item("zabbix[rcache,buffer,pfree]", "88.123", "%"),
            item("zabbix[process,poller,avg,busy]", "3.27", "%"),
            item("zabbix[process,history syncer,avg,busy]", "12", "%"),
            item("zabbix[wcache,values]", "123456789", ""),
        ]);
        assert_eq!(snapshot.get("uptime").unwrap().unit, "uptime");

        let metrics = ServerMetrics::from_snapshot(&snapshot);
        assert_eq!(metrics.uptime, "2d 3h 2m");
        assert_eq!(metrics.values_processed, "123456789");

        let cache = |name: &str| {
            metrics
                .caches_free
                .iter()
                .find(|c| c.name == name)
                .unwrap()
                .percent
                .clone()
        };
        assert_eq!(cache("Configuration cache"), "88.1");
        assert_eq!(cache("Value cache"), "0.0");

        let busy: Vec<(&str, &str)> = metrics
            .processes_busy
            .iter()
            .map(|p| (p.name.as_str(), p.percent.as_str()))
            .collect();
        assert_eq!(busy[0], ("poller", "3.3"));
        assert_eq!(busy[2], ("history syncer", "12.0"));
        assert!(metrics
            .processes_busy
            .iter()
            .all(|p| p.percent.split('.').nth(1).map(str::len) == Some(1)));
    }

    #[test]
    fn empty_snapshot_uses_placeholders() {
        let metrics = ServerMetrics::from_snapshot(&MetricSnapshot::default());
        assert_eq!(metrics.uptime, "N/A");
        assert_eq!(metrics.values_processed, "N/A");
        assert!(metrics.caches_free.iter().all(|c| c.percent == "0.0"));
    }
}
