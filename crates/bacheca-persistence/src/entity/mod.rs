//! SeaORM entity modules

pub mod category;
pub mod city;
pub mod listing;
pub mod listing_image;
pub mod sub_category;
pub mod sub_city;
