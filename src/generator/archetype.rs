//! Equipment archetypes used by the seed generator
//!
//! Equipment ids are assigned an archetype by rotation, so id 1 is always a
//! turbine engine, id 2 a compressor, and id 11 wraps back to a turbine.

use serde::Serialize;

/// A kind of equipment with its model, manufacturer and maintenance part categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Archetype {
    pub equipment_type: &'static str,
    pub model: &'static str,
    pub manufacturer: &'static str,
    /// Part categories consumed by a service of this equipment, in list order
    pub part_categories: [&'static str; 4],
}

pub const ARCHETYPES: [Archetype; 10] = [
    Archetype {
        equipment_type: "Turbine Engine",
        model: "GT-1000",
        manufacturer: "AeroTech Industries",
        part_categories: ["BEAR", "SEAL", "OIL-FILTER", "GREASE"],
    },
    Archetype {
        equipment_type: "Compressor",
        model: "CP-2000",
        manufacturer: "CompTech Systems",
        part_categories: ["MOTOR", "BELT", "PULLEY", "COUPLING"],
    },
    Archetype {
        equipment_type: "Pump Assembly",
        model: "PA-3000",
        manufacturer: "PumpWorks Inc",
        part_categories: ["PUMP", "IMPELLER", "SHAFT", "BEARING"],
    },
    Archetype {
        equipment_type: "Motor Drive",
        model: "MD-4000",
        manufacturer: "MotorTech Solutions",
        part_categories: ["DRIVE", "GEAR", "CHAIN", "SPROCKET"],
    },
    Archetype {
        equipment_type: "Heat Exchanger",
        model: "HE-5000",
        manufacturer: "Thermal Systems",
        part_categories: ["HEAT", "TUBE", "FIN", "GASKET"],
    },
    Archetype {
        equipment_type: "Valve Assembly",
        model: "VA-6000",
        manufacturer: "ValveTech Corp",
        part_categories: ["VALVE", "ACTUATOR", "POSITIONER", "SEAT"],
    },
    Archetype {
        equipment_type: "Gear Box",
        model: "GB-7000",
        manufacturer: "GearWorks Ltd",
        part_categories: ["GEAR", "PINION", "RACK", "LUBRICANT"],
    },
    Archetype {
        equipment_type: "Control Panel",
        model: "CP-8000",
        manufacturer: "ControlTech",
        part_categories: ["PANEL", "SWITCH", "RELAY", "FUSE"],
    },
    Archetype {
        equipment_type: "Filter System",
        model: "FS-9000",
        manufacturer: "FilterTech",
        part_categories: ["FILTER", "ELEMENT", "HOUSING", "GASKET"],
    },
    Archetype {
        equipment_type: "Cooling Tower",
        model: "CT-1000",
        manufacturer: "CoolTech Industries",
        part_categories: ["TOWER", "FAN", "DRIFT", "NOZZLE"],
    },
];

impl Archetype {
    /// Archetype assigned to an equipment id (ids start at 1)
    pub fn for_equipment(unique_id: u32) -> &'static Archetype {
        let idx = (unique_id.saturating_sub(1) as usize) % ARCHETYPES.len();
        &ARCHETYPES[idx]
    }

    /// Serial number stamped on the manual, e.g. `AE-001-2024`
    pub fn serial_number(&self, unique_id: u32) -> String {
        let prefix: String = self
            .manufacturer
            .chars()
            .take(2)
            .collect::<String>()
            .to_uppercase();
        format!("{}-{:03}-2024", prefix, unique_id)
    }
}

/// Service intervals in operating hours, all offset by the equipment id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MaintenanceSchedule {
    pub inspection_hours: u32,
    pub major_service_hours: u32,
    pub critical_check_hours: u32,
}

impl MaintenanceSchedule {
    pub fn for_equipment(unique_id: u32) -> Self {
        Self {
            inspection_hours: 500 + (unique_id % 300),
            major_service_hours: 2000 + (unique_id % 1000),
            critical_check_hours: 1000 + (unique_id % 500),
        }
    }
}
