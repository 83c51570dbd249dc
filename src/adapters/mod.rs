// Adapters layer: concrete storage backends behind the domain ports.

pub mod bunny;

pub use bunny::BunnyStorage;
