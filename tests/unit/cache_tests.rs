/*!
 * Tests for the translation cache
 */

use vtt_translate::translation::TranslationCache;

/// Test a stored translation is returned
#[test]
fn test_cache_withStoredTranslation_shouldReturnIt() {
    let cache = TranslationCache::new(true);
    cache.store("Hello world.", "en", "es", "Hola mundo.");

    assert_eq!(cache.get("Hello world.", "en", "es"), Some("Hola mundo.".to_string()));
    assert_eq!(cache.len(), 1);
}

/// Test keys ignore surrounding whitespace and language case
#[test]
fn test_cache_withEquivalentKey_shouldHit() {
    let cache = TranslationCache::new(true);
    cache.store(" Thank you. ", "EN", "es", "Gracias.");

    assert_eq!(cache.get("Thank you.", "en", "ES"), Some("Gracias.".to_string()));
}

/// Test different language pairs do not share entries
#[test]
fn test_cache_withOtherTargetLanguage_shouldMiss() {
    let cache = TranslationCache::new(true);
    cache.store("Thank you.", "en", "es", "Gracias.");

    assert_eq!(cache.get("Thank you.", "en", "fr"), None);
}

/// Test hits and misses are counted
#[test]
fn test_cache_stats_withHitAndMiss_shouldCountBoth() {
    let cache = TranslationCache::new(true);
    cache.store("Okay.", "en", "es", "Vale.");

    cache.get("Okay.", "en", "es");
    cache.get("Nope.", "en", "es");

    let (hits, misses, hit_rate) = cache.stats();
    assert_eq!(hits, 1);
    assert_eq!(misses, 1);
    assert!((hit_rate - 0.5).abs() < f64::EPSILON);
}

/// Test a disabled cache stores nothing
#[test]
fn test_cache_withDisabledCache_shouldNeverHit() {
    let cache = TranslationCache::new(false);
    cache.store("Okay.", "en", "es", "Vale.");

    assert!(!cache.is_enabled());
    assert!(cache.is_empty());
    assert_eq!(cache.get("Okay.", "en", "es"), None);
}

/// Test clones share their entries
#[test]
fn test_cache_withClone_shouldShareEntries() {
    let cache = TranslationCache::default();
    let clone = cache.clone();
    clone.store("Yes.", "en", "de", "Ja.");

    assert_eq!(cache.get("Yes.", "en", "de"), Some("Ja.".to_string()));
}
