//! Grazing rule
//!
//! A grazer standing on grass eats up to its `gain_from_food`. Eating tramples
//! the 3x3 block around it (center included) by `trample`, and then the center
//! cell loses a further `center_depletion * eaten`. The center therefore takes
//! two separate hits per meal.

use crate::core::config::FieldConfig;
use crate::core::types::GridPos;
use crate::simulation::resource_field::ResourceField;

/// Graze at `pos`, returning the energy gained (0 on bare ground)
pub fn forage(field: &mut ResourceField, pos: GridPos, gain_from_food: f64, impact: &FieldConfig) -> f64 {
    let grass = field.sample(pos);
    if grass <= 0.0 {
        return 0.0;
    }
    let eaten = gain_from_food.min(grass as f64);

    for dy in -1..=1 {
        for dx in -1..=1 {
            field.deplete(pos.offset(dx, dy), impact.trample);
        }
    }
    field.deplete(pos, impact.center_depletion * eaten as f32);

    eaten
}
