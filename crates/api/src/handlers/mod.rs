pub mod admin;
pub mod characters;
pub mod community;
pub mod enrichment;
pub mod lookup;
