//! Default per-rarity stat ranges.
//!
//! Every tier defines all 23 stats. For a given stat, both bounds are
//! non-decreasing from Common to Mythic.

use super::StatId;
use crate::rarity::RarityTier;

pub(super) type TierRanges = (RarityTier, &'static [(StatId, f32, f32)]);

pub(super) const DEFAULT_RANGES: [TierRanges; 7] = [
    (
        RarityTier::Common,
        &[
            (StatId::Hp, 50.0, 100.0),
            (StatId::Shield, 25.0, 50.0),
            (StatId::Speed, 0.5, 1.0),
            (StatId::Energy, 10.0, 20.0),
            (StatId::CritChance, 0.01, 0.03),
            (StatId::CritDamage, 1.2, 1.3),
            (StatId::Dodge, 0.01, 0.05),
            (StatId::Regeneration, 1.0, 2.0),
            (StatId::PhysicalResist, 0.01, 0.05),
            (StatId::FireResist, 0.01, 0.05),
            (StatId::IceResist, 0.01, 0.05),
            (StatId::ElectricResist, 0.01, 0.05),
            (StatId::ToxicResist, 0.01, 0.05),
            (StatId::Damage, 10.0, 20.0),
            (StatId::FireRate, 0.8, 1.0),
            (StatId::Accuracy, 0.7, 0.8),
            (StatId::Range, 10.0, 15.0),
            (StatId::AmmoCapacity, 10.0, 20.0),
            (StatId::ReloadSpeed, 0.8, 1.0),
            (StatId::DroneSpeed, 3.0, 5.0),
            (StatId::DroneDamage, 5.0, 10.0),
            (StatId::DroneHealth, 30.0, 50.0),
            (StatId::EnergyEfficiency, 0.8, 0.9),
        ],
    ),
    (
        RarityTier::Uncommon,
        &[
            (StatId::Hp, 100.0, 200.0),
            (StatId::Shield, 50.0, 100.0),
            (StatId::Speed, 1.0, 2.0),
            (StatId::Energy, 20.0, 40.0),
            (StatId::CritChance, 0.03, 0.06),
            (StatId::CritDamage, 1.3, 1.5),
            (StatId::Dodge, 0.05, 0.10),
            (StatId::Regeneration, 2.0, 4.0),
            (StatId::PhysicalResist, 0.05, 0.10),
            (StatId::FireResist, 0.05, 0.10),
            (StatId::IceResist, 0.05, 0.10),
            (StatId::ElectricResist, 0.05, 0.10),
            (StatId::ToxicResist, 0.05, 0.10),
            (StatId::Damage, 20.0, 40.0),
            (StatId::FireRate, 1.0, 1.2),
            (StatId::Accuracy, 0.8, 0.9),
            (StatId::Range, 15.0, 25.0),
            (StatId::AmmoCapacity, 20.0, 40.0),
            (StatId::ReloadSpeed, 1.0, 1.2),
            (StatId::DroneSpeed, 5.0, 8.0),
            (StatId::DroneDamage, 10.0, 20.0),
            (StatId::DroneHealth, 50.0, 80.0),
            (StatId::EnergyEfficiency, 0.9, 1.0),
        ],
    ),
    (
        RarityTier::Rare,
        &[
            (StatId::Hp, 200.0, 400.0),
            (StatId::Shield, 100.0, 200.0),
            (StatId::Speed, 2.0, 3.0),
            (StatId::Energy, 40.0, 80.0),
            (StatId::CritChance, 0.06, 0.10),
            (StatId::CritDamage, 1.5, 1.8),
            (StatId::Dodge, 0.10, 0.15),
            (StatId::Regeneration, 4.0, 8.0),
            (StatId::PhysicalResist, 0.10, 0.15),
            (StatId::FireResist, 0.10, 0.15),
            (StatId::IceResist, 0.10, 0.15),
            (StatId::ElectricResist, 0.10, 0.15),
            (StatId::ToxicResist, 0.10, 0.15),
            (StatId::Damage, 40.0, 80.0),
            (StatId::FireRate, 1.2, 1.4),
            (StatId::Accuracy, 0.9, 0.95),
            (StatId::Range, 25.0, 35.0),
            (StatId::AmmoCapacity, 40.0, 80.0),
            (StatId::ReloadSpeed, 1.2, 1.4),
            (StatId::DroneSpeed, 8.0, 12.0),
            (StatId::DroneDamage, 20.0, 40.0),
            (StatId::DroneHealth, 80.0, 120.0),
            (StatId::EnergyEfficiency, 1.0, 1.1),
        ],
    ),
    (
        RarityTier::Epic,
        &[
            (StatId::Hp, 400.0, 800.0),
            (StatId::Shield, 200.0, 400.0),
            (StatId::Speed, 3.0, 4.5),
            (StatId::Energy, 80.0, 150.0),
            (StatId::CritChance, 0.10, 0.15),
            (StatId::CritDamage, 1.8, 2.2),
            (StatId::Dodge, 0.15, 0.20),
            (StatId::Regeneration, 8.0, 15.0),
            (StatId::PhysicalResist, 0.15, 0.25),
            (StatId::FireResist, 0.15, 0.25),
            (StatId::IceResist, 0.15, 0.25),
            (StatId::ElectricResist, 0.15, 0.25),
            (StatId::ToxicResist, 0.15, 0.25),
            (StatId::Damage, 80.0, 150.0),
            (StatId::FireRate, 1.4, 1.6),
            (StatId::Accuracy, 0.95, 0.98),
            (StatId::Range, 35.0, 50.0),
            (StatId::AmmoCapacity, 80.0, 150.0),
            (StatId::ReloadSpeed, 1.4, 1.6),
            (StatId::DroneSpeed, 12.0, 18.0),
            (StatId::DroneDamage, 40.0, 80.0),
            (StatId::DroneHealth, 120.0, 180.0),
            (StatId::EnergyEfficiency, 1.1, 1.3),
        ],
    ),
    (
        RarityTier::Legendary,
        &[
            (StatId::Hp, 800.0, 1500.0),
            (StatId::Shield, 400.0, 750.0),
            (StatId::Speed, 4.5, 6.0),
            (StatId::Energy, 150.0, 250.0),
            (StatId::CritChance, 0.15, 0.25),
            (StatId::CritDamage, 2.2, 3.0),
            (StatId::Dodge, 0.20, 0.30),
            (StatId::Regeneration, 15.0, 25.0),
            (StatId::PhysicalResist, 0.25, 0.35),
            (StatId::FireResist, 0.25, 0.35),
            (StatId::IceResist, 0.25, 0.35),
            (StatId::ElectricResist, 0.25, 0.35),
            (StatId::ToxicResist, 0.25, 0.35),
            (StatId::Damage, 150.0, 300.0),
            (StatId::FireRate, 1.6, 2.0),
            (StatId::Accuracy, 0.98, 1.0),
            (StatId::Range, 50.0, 75.0),
            (StatId::AmmoCapacity, 150.0, 250.0),
            (StatId::ReloadSpeed, 1.6, 2.0),
            (StatId::DroneSpeed, 18.0, 25.0),
            (StatId::DroneDamage, 80.0, 150.0),
            (StatId::DroneHealth, 180.0, 300.0),
            (StatId::EnergyEfficiency, 1.3, 1.5),
        ],
    ),
    (
        RarityTier::Exotic,
        &[
            (StatId::Hp, 1500.0, 2500.0),
            (StatId::Shield, 750.0, 1250.0),
            (StatId::Speed, 6.0, 8.0),
            (StatId::Energy, 250.0, 400.0),
            (StatId::CritChance, 0.25, 0.35),
            (StatId::CritDamage, 3.0, 4.0),
            (StatId::Dodge, 0.30, 0.40),
            (StatId::Regeneration, 25.0, 40.0),
            (StatId::PhysicalResist, 0.35, 0.50),
            (StatId::FireResist, 0.35, 0.50),
            (StatId::IceResist, 0.35, 0.50),
            (StatId::ElectricResist, 0.35, 0.50),
            (StatId::ToxicResist, 0.35, 0.50),
            (StatId::Damage, 300.0, 500.0),
            (StatId::FireRate, 2.0, 2.5),
            (StatId::Accuracy, 1.0, 1.0),
            (StatId::Range, 75.0, 100.0),
            (StatId::AmmoCapacity, 250.0, 400.0),
            (StatId::ReloadSpeed, 2.0, 2.5),
            (StatId::DroneSpeed, 25.0, 35.0),
            (StatId::DroneDamage, 150.0, 250.0),
            (StatId::DroneHealth, 300.0, 500.0),
            (StatId::EnergyEfficiency, 1.5, 2.0),
        ],
    ),
    (
        RarityTier::Mythic,
        &[
            (StatId::Hp, 2500.0, 5000.0),
            (StatId::Shield, 1250.0, 2500.0),
            (StatId::Speed, 8.0, 12.0),
            (StatId::Energy, 400.0, 750.0),
            (StatId::CritChance, 0.35, 0.50),
            (StatId::CritDamage, 4.0, 6.0),
            (StatId::Dodge, 0.40, 0.60),
            (StatId::Regeneration, 40.0, 75.0),
            (StatId::PhysicalResist, 0.50, 0.75),
            (StatId::FireResist, 0.50, 0.75),
            (StatId::IceResist, 0.50, 0.75),
            (StatId::ElectricResist, 0.50, 0.75),
            (StatId::ToxicResist, 0.50, 0.75),
            (StatId::Damage, 500.0, 1000.0),
            (StatId::FireRate, 2.5, 3.5),
            (StatId::Accuracy, 1.0, 1.0),
            (StatId::Range, 100.0, 150.0),
            (StatId::AmmoCapacity, 400.0, 750.0),
            (StatId::ReloadSpeed, 2.5, 3.5),
            (StatId::DroneSpeed, 35.0, 50.0),
            (StatId::DroneDamage, 250.0, 500.0),
            (StatId::DroneHealth, 500.0, 1000.0),
            (StatId::EnergyEfficiency, 2.0, 3.0),
        ],
    ),
];
