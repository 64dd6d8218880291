/*!
 * Translation of consolidated captions.
 *
 * - `core`: the `Translator` seam and the provider-backed `TranslationService`
 * - `cache`: in-memory reuse of repeated sentences
 * - `overlay`: concurrent per-cue translation with fallback to the source text
 */

// Re-export main types for easier usage
pub use self::cache::TranslationCache;
pub use self::core::{TranslationService, Translator};
pub use self::overlay::{OverlayReport, overlay_translations};

// Submodules
pub mod cache;
pub mod core;
pub mod overlay;
