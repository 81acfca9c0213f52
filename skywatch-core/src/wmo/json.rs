use serde::{Deserialize, Serialize};

/// One alert as published by the WMO Severe Weather Information Centre.
///
/// Issuing authorities fill these in unevenly, so every field is optional and
/// timestamps are kept as the provider's strings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SevereWeatherAlert {
    pub id: Option<String>,
    pub identifier: Option<String>,
    pub event: Option<String>,
    pub headline: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "areadesc")]
    pub area_desc: Option<String>,
    pub severity: Option<String>,
    pub urgency: Option<String>,
    pub certainty: Option<String>,
    pub sent: Option<String>,
    pub effective: Option<String>,
    pub onset: Option<String>,
    pub expires: Option<String>,
    pub sender_name: Option<String>,
    pub url: Option<String>,
    #[serde(alias = "capURL")]
    pub cap_url: Option<String>,
}

impl SevereWeatherAlert {
    /// Best available one-line title.
    pub fn title(&self) -> Option<&str> {
        self.headline
            .as_deref()
            .or(self.event.as_deref())
            .or(self.description.as_deref())
    }
}
