//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&dyn KeyValueStore` as the first argument.

pub mod character_repo;
pub mod community_repo;
pub mod xref_repo;

pub use character_repo::{CharacterListing, CharacterRepo, StoredCharacter};
pub use community_repo::CommunityRepo;
pub use xref_repo::XrefRepo;
