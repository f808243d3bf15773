//! # Types
//!
//! Plain data shared by the parsers, the relocation model and the lookup
//! queries.

pub mod address;
pub mod section;
pub mod symbols;

// Re-export all public types
pub use address::Address;
pub use section::{Section, SectionFlags, SectionId, ALLOC_FLAG};
pub use symbols::{Symbol, SymbolOwner, SymbolScope, SymbolType, ABSOLUTE_SECTION};
