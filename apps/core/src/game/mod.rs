//! # Game Module
//!
//! Pure, synchronous word-game logic. Nothing here touches the network.
//!
//! ## Components
//! - `pattern`: `Rack` and `BlankPattern` value types
//! - `dictionary`: normalised word index loaded once at startup
//! - `extractor`: turns noisy broadcast text into a rack and a pattern
//! - `resolver`: dictionary search under letter-multiplicity constraints

pub mod dictionary;
pub mod extractor;
pub mod pattern;
pub mod resolver;

pub use dictionary::Dictionary;
pub use extractor::{extract, Extraction};
pub use pattern::{BlankPattern, Rack, Symbol};
pub use resolver::resolve;
