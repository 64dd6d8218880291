/*!
 * Translation overlay for consolidated cues.
 *
 * Each cue is translated independently and concurrently. A failed, empty or
 * missing translation leaves that cue's text untouched; it never aborts the
 * batch.
 */

use futures::stream::{self, StreamExt};
use log::{info, warn};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::vtt_processor::Cue;
use super::cache::truncate_text;
use super::core::Translator;

/// Outcome of an overlay pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayReport {
    /// Cues whose content was replaced
    pub translated: usize,

    /// Cues that kept their original content
    pub fallbacks: usize,
}

/// Replace each cue's content with its translation, in place.
///
/// At most `concurrency` requests are in flight. Results are applied in cue
/// order. `on_progress(done, total)` is called as each request finishes.
pub async fn overlay_translations<T, F>(
    cues: &mut [Cue],
    translator: &T,
    source_language: &str,
    target_language: &str,
    concurrency: usize,
    on_progress: F,
) -> OverlayReport
where
    T: Translator + ?Sized,
    F: Fn(usize, usize) + Sync,
{
    let total = cues.len();
    let done = AtomicUsize::new(0);
    let done = &done;
    let on_progress = &on_progress;

    let requests: Vec<(u64, String)> = cues.iter()
        .map(|cue| (cue.number, cue.content.clone()))
        .collect();

    let results: Vec<Option<String>> = stream::iter(requests)
        .map(|(number, text)| async move {
            let translated = translate_one(translator, number, &text, source_language, target_language).await;
            on_progress(done.fetch_add(1, Ordering::SeqCst) + 1, total);
            translated
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut report = OverlayReport::default();
    for (cue, translated) in cues.iter_mut().zip(results) {
        match translated {
            Some(text) => {
                cue.content = text;
                report.translated += 1;
            },
            None => report.fallbacks += 1,
        }
    }

    info!("Translated {} of {} cues ({} kept original text)", report.translated, total, report.fallbacks);
    report
}

// Cue text is one line; a blank line inside it would end the cue block
fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

async fn translate_one<T: Translator + ?Sized>(
    translator: &T,
    number: u64,
    text: &str,
    source_language: &str,
    target_language: &str,
) -> Option<String> {
    if text.trim().is_empty() {
        return None;
    }

    match translator.translate(text, source_language, target_language).await {
        Ok(Some(translation)) if !translation.trim().is_empty() => Some(single_line(&translation)),
        Ok(_) => {
            warn!("No translation for cue {} ('{}'), keeping original", number, truncate_text(text, 40));
            None
        },
        Err(e) => {
            warn!("Translation failed for cue {} ('{}'): {}, keeping original", number, truncate_text(text, 40), e);
            None
        },
    }
}
