/*!
 * # vtt-translate - sentence-aligned WebVTT caption translation
 *
 * Caption tracks are cut by display time, not by meaning. Translating a
 * three-second cue that stops mid-sentence gives poor results, so this
 * library regroups cues into whole sentences before translating them.
 *
 * ## Pipeline
 *
 * raw WebVTT → `vtt_processor::parse_track` → `consolidator::Consolidator`
 * → `translation::overlay_translations` → `vtt_processor::serialize_track`
 *
 * ## Architecture
 *
 * - `timecode`: `HH:MM:SS.mmm` ⇄ seconds
 * - `vtt_processor`: cue parsing and WebVTT serialization
 * - `consolidator`: the sentence regrouping state machine
 * - `translation`: the `Translator` seam, provider-backed service, cache and overlay
 * - `providers`: Workers AI (m2m100), Ollama and Anthropic clients
 * - `source`: fetching caption text from URLs or files
 * - `app_config`: configuration management
 * - `app_controller`: end-to-end orchestration
 * - `language_utils`: ISO language code utilities
 * - `errors`: custom error types
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod consolidator;
pub mod errors;
pub mod language_utils;
pub mod providers;
pub mod source;
pub mod timecode;
pub mod translation;
pub mod vtt_processor;

// Re-export main types for easier usage
pub use app_config::Config;
pub use consolidator::{Consolidator, consolidate};
pub use errors::{AppError, ProviderError, TranslationError, VttError};
pub use timecode::{format_timecode, parse_timecode};
pub use translation::{TranslationService, Translator};
pub use vtt_processor::{Cue, CueTrack, parse_cue, parse_track, serialize_track};
