mod cards;
mod collections;
mod misc;
mod prints;

#[cfg(test)]
mod testing;

pub use cards::card_routes;
pub use collections::collection_routes;
pub use misc::misc_routes;
pub use prints::print_routes;
