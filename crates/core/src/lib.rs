//! Domain logic for the craftbook service.
//!
//! Nothing in this crate touches the network or the key-value store: the
//! identifier parser, record model, markdown import, enrichment merger and
//! cleanup policy are all pure (or generic over the
//! [`enrichment::CrossReferenceResolver`] seam).

pub mod admin;
pub mod character;
pub mod cleanup;
pub mod craft;
pub mod enrichment;
pub mod error;
pub mod identifier;
pub mod import;
pub mod share_id;
pub mod types;
