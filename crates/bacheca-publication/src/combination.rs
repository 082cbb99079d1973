//! Cartesian expansion of resolved axes
//!
//! The expansion order is deterministic (location-major, then category, both
//! in resolver output order). All writes happen inside one transaction, so
//! the order matters only for reproducible error messages and fixtures.

use crate::axis::{CategoryTuple, LocationTuple};

/// One concrete tuple of resolved leaf + ancestor ids across both axes,
/// carrying the display labels needed for duplicate error messages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Combination {
    pub city_id: i64,
    pub sub_city_id: i64,
    pub category_id: i64,
    pub sub_category_id: i64,
    pub sub_city_name: String,
    pub sub_category_name: String,
}

impl Combination {
    /// Leaf-id key under which the uniqueness invariant is scoped.
    pub fn key(&self) -> (i64, i64) {
        (self.sub_city_id, self.sub_category_id)
    }
}

/// Expand the per-axis tuple lists into their cartesian product.
pub fn expand(locations: &[LocationTuple], categories: &[CategoryTuple]) -> Vec<Combination> {
    let mut combinations = Vec::with_capacity(locations.len() * categories.len());
    for loc in locations {
        for cat in categories {
            combinations.push(Combination {
                city_id: loc.city_id,
                sub_city_id: loc.sub_city_id,
                category_id: cat.category_id,
                sub_category_id: cat.sub_category_id,
                sub_city_name: loc.sub_city_name.clone(),
                sub_category_name: cat.sub_category_name.clone(),
            });
        }
    }
    combinations
}
