use serde::Serialize;
use serde_json::{Map, Value};
use strum::{Display, EnumCount, EnumIter, IntoEnumIterator, IntoStaticStr};

/// The five data sections of a refresh, in batch order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumCount, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Section {
    RouterStatus,
    NetworkInfo,
    DataUsage,
    DeviceInfo,
    WlanInfo,
}

impl Section {
    /// Stable snake_case name, identical to the `Snapshot` field name.
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Result of one refresh cycle.
///
/// Each section is the router's payload passed through verbatim, or an
/// empty map when the router gave nothing usable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub router_status: Map<String, Value>,
    pub network_info: Map<String, Value>,
    pub data_usage: Map<String, Value>,
    pub device_info: Map<String, Value>,
    pub wlan_info: Map<String, Value>,
}

impl Snapshot {
    /// Assemble a snapshot from positional batch results in [`Section`]
    /// order. Missing entries and non-object payloads become empty maps.
    pub fn from_results(results: Vec<Option<Value>>) -> Self {
        let mut snapshot = Self::default();
        for (section, result) in Section::iter().zip(results) {
            if let Some(Value::Object(map)) = result {
                *snapshot.section_mut(section) = map;
            }
        }
        snapshot
    }

    pub fn section(&self, section: Section) -> &Map<String, Value> {
        match section {
            Section::RouterStatus => &self.router_status,
            Section::NetworkInfo => &self.network_info,
            Section::DataUsage => &self.data_usage,
            Section::DeviceInfo => &self.device_info,
            Section::WlanInfo => &self.wlan_info,
        }
    }

    fn section_mut(&mut self, section: Section) -> &mut Map<String, Value> {
        match section {
            Section::RouterStatus => &mut self.router_status,
            Section::NetworkInfo => &mut self.network_info,
            Section::DataUsage => &mut self.data_usage,
            Section::DeviceInfo => &mut self.device_info,
            Section::WlanInfo => &mut self.wlan_info,
        }
    }

    /// Sections that came back empty.
    pub fn missing_sections(&self) -> Vec<Section> {
        Section::iter()
            .filter(|s| self.section(*s).is_empty())
            .collect()
    }

    /// `true` if at least one section has data. An all-empty snapshot
    /// usually means the router was unreachable.
    pub fn has_data(&self) -> bool {
        Section::iter().any(|s| !self.section(s).is_empty())
    }
}
