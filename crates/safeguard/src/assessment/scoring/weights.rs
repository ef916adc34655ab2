//! Category weight tables.
//!
//! Every table is an exhaustive `match` over a closed enum. A category that was
//! not selected, or arrived with a label intake did not recognize, contributes
//! [`FALLBACK_WEIGHT`].

use crate::assessment::domain::{
    CommunicationQuality, Department, EquipmentCondition, IncidentType, TaskType, WeatherImpact,
    WorkloadLevel,
};

/// Weight for an absent or unrecognized category selection.
pub const FALLBACK_WEIGHT: u32 = 0;

/// Ceiling applied to the summed incident-history weight.
pub const INCIDENT_HISTORY_CAP: u32 = 5;

/// Fixed score contribution of a category value.
pub trait CategoryWeight: Copy {
    fn weight(self) -> u32;
}

/// Looks up a selection, falling back to [`FALLBACK_WEIGHT`] when absent.
pub fn category_weight<T: CategoryWeight>(selection: Option<T>) -> u32 {
    selection.map_or(FALLBACK_WEIGHT, CategoryWeight::weight)
}

impl CategoryWeight for EquipmentCondition {
    fn weight(self) -> u32 {
        match self {
            EquipmentCondition::Good => 0,
            EquipmentCondition::NeedsMaintenance => 2,
            EquipmentCondition::Faulty => 3,
        }
    }
}

impl CategoryWeight for WeatherImpact {
    fn weight(self) -> u32 {
        match self {
            WeatherImpact::Clear => 0,
            WeatherImpact::Dust => 1,
            WeatherImpact::Rain => 1,
            WeatherImpact::ExtremeHeat => 2,
        }
    }
}

impl CategoryWeight for WorkloadLevel {
    fn weight(self) -> u32 {
        match self {
            WorkloadLevel::Normal => 0,
            WorkloadLevel::High => 1,
            WorkloadLevel::Extreme => 2,
        }
    }
}

impl CategoryWeight for CommunicationQuality {
    fn weight(self) -> u32 {
        match self {
            CommunicationQuality::Good => 0,
            CommunicationQuality::Fair => 1,
            CommunicationQuality::Poor => 2,
        }
    }
}

impl CategoryWeight for Department {
    fn weight(self) -> u32 {
        match self {
            Department::Rig => 2,
            Department::Workshop => 1,
            Department::Wellhead => 2,
            Department::Transport => 1,
            Department::Office => 0,
        }
    }
}

impl CategoryWeight for TaskType {
    fn weight(self) -> u32 {
        match self {
            TaskType::Lifting => 2,
            TaskType::Drilling => 2,
            TaskType::Transport => 1,
            TaskType::Maintenance => 1,
            TaskType::Office => 0,
        }
    }
}

impl CategoryWeight for IncidentType {
    fn weight(self) -> u32 {
        match self {
            IncidentType::Nearmiss => 1,
            IncidentType::AssetDamage => 2,
            IncidentType::Injury => 3,
            IncidentType::Fatality => 5,
        }
    }
}

/// Sums every incident (duplicates included) and clamps the total to `cap`.
pub fn incident_history_weight(incidents: &[IncidentType], cap: u32) -> u32 {
    incidents
        .iter()
        .map(|incident| incident.weight())
        .sum::<u32>()
        .min(cap)
}
