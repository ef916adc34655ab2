use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, Unexpected};
use serde::{Deserialize, Serialize};

use super::intake;
use super::scoring::ScoreResult;

/// Identifier wrapper for stored assessments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssessmentId(pub String);

impl fmt::Display for AssessmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Closed set of labels accepted at the intake boundary.
///
/// `label` is the wire/display form and doubles as the text used in reasons.
pub trait Choice: Copy + Sized + 'static {
    const ALL: &'static [Self];

    fn label(self) -> &'static str;

    fn from_label(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|choice| choice.label() == raw)
    }
}

macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl Choice for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

choice_enum! {
    Gender {
        Male => "Male",
        Female => "Female",
        Other => "Other",
    }
}

choice_enum! {
    /// Operational unit the worker is assigned to.
    Department {
        Rig => "Rig",
        Workshop => "Workshop",
        Wellhead => "Wellhead",
        Transport => "Transport",
        Office => "Office",
    }
}

choice_enum! {
    TaskType {
        Lifting => "Lifting",
        Drilling => "Drilling",
        Transport => "Transport",
        Maintenance => "Maintenance",
        Office => "Office",
    }
}

choice_enum! {
    EquipmentCondition {
        Good => "Good",
        NeedsMaintenance => "Needs Maintenance",
        Faulty => "Faulty",
    }
}

choice_enum! {
    WeatherImpact {
        Clear => "Clear",
        Dust => "Dust",
        Rain => "Rain",
        ExtremeHeat => "ExtremeHeat",
    }
}

choice_enum! {
    WorkloadLevel {
        Normal => "Normal",
        High => "High",
        Extreme => "Extreme",
    }
}

choice_enum! {
    CommunicationQuality {
        Good => "Good",
        Fair => "Fair",
        Poor => "Poor",
    }
}

choice_enum! {
    /// Incident categories recorded in a worker's history.
    IncidentType {
        Nearmiss => "Nearmiss",
        AssetDamage => "Asset damage",
        Injury => "Injury",
        Fatality => "Fatality",
    }
}

/// Normalized hazard submission.
///
/// Every field is optional. Loose wire values are coerced by the `intake`
/// deserializers so the scoring rules only ever see typed optionals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(
        default,
        deserialize_with = "intake::loose_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub employee_name: Option<String>,
    #[serde(
        default,
        deserialize_with = "intake::loose_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub age: Option<f64>,
    #[serde(
        default,
        deserialize_with = "intake::loose_choice",
        skip_serializing_if = "Option::is_none"
    )]
    pub gender: Option<Gender>,
    #[serde(
        default,
        deserialize_with = "intake::loose_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub job_title: Option<String>,
    #[serde(
        default,
        deserialize_with = "intake::loose_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub experience_level: Option<String>,
    #[serde(
        default,
        deserialize_with = "intake::loose_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub years_of_service: Option<f64>,

    #[serde(
        default,
        deserialize_with = "intake::loose_choice",
        skip_serializing_if = "Option::is_none"
    )]
    pub department: Option<Department>,
    #[serde(
        default,
        deserialize_with = "intake::loose_choice",
        skip_serializing_if = "Option::is_none"
    )]
    pub task_type: Option<TaskType>,
    #[serde(
        default,
        deserialize_with = "intake::loose_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub work_type: Option<String>,
    #[serde(
        default,
        deserialize_with = "intake::loose_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub location: Option<String>,
    #[serde(
        default,
        deserialize_with = "intake::loose_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub work_hours: Option<f64>,

    #[serde(
        default,
        deserialize_with = "intake::loose_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub temperature: Option<f64>,
    #[serde(
        default,
        deserialize_with = "intake::loose_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub humidity: Option<f64>,
    #[serde(
        default,
        deserialize_with = "intake::loose_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub noise_level: Option<f64>,

    #[serde(
        default,
        deserialize_with = "intake::loose_flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub safety_training: Option<bool>,
    #[serde(
        default,
        deserialize_with = "intake::loose_flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub ppe_usage: Option<bool>,
    #[serde(
        default,
        deserialize_with = "intake::loose_flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub supervisor_presence: Option<bool>,
    #[serde(
        default,
        deserialize_with = "intake::loose_choice",
        skip_serializing_if = "Option::is_none"
    )]
    pub equipment_condition: Option<EquipmentCondition>,
    #[serde(
        default,
        deserialize_with = "intake::loose_choice",
        skip_serializing_if = "Option::is_none"
    )]
    pub weather_impact: Option<WeatherImpact>,
    #[serde(
        default,
        deserialize_with = "intake::loose_choice",
        skip_serializing_if = "Option::is_none"
    )]
    pub workload_level: Option<WorkloadLevel>,
    #[serde(
        default,
        deserialize_with = "intake::loose_choice",
        skip_serializing_if = "Option::is_none"
    )]
    pub communication_quality: Option<CommunicationQuality>,

    #[serde(
        default,
        deserialize_with = "intake::incident_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub previous_incidents: Vec<IncidentType>,
}

impl Submission {
    /// Decodes a submission body, which must be a JSON object.
    ///
    /// The derived `Deserialize` would also fill fields by position from an
    /// array, so anything other than an object is rejected up front.
    pub fn from_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        let unexpected = match &value {
            serde_json::Value::Object(_) => None,
            serde_json::Value::Array(_) => Some(Unexpected::Seq),
            serde_json::Value::String(raw) => Some(Unexpected::Str(raw.as_str())),
            serde_json::Value::Bool(flag) => Some(Unexpected::Bool(*flag)),
            serde_json::Value::Null => Some(Unexpected::Unit),
            serde_json::Value::Number(_) => Some(Unexpected::Other("number")),
        };
        if let Some(unexpected) = unexpected {
            return Err(de::Error::invalid_type(unexpected, &"a submission object"));
        }
        serde_json::from_value(value)
    }
}

/// Stored assessment: the normalized submission together with its result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentRecord {
    pub assessment_id: AssessmentId,
    pub created_at: DateTime<Utc>,
    pub submission: Submission,
    pub result: ScoreResult,
}
