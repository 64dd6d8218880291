/*!
 * Tests for the application controller reading and writing caption files
 */

use std::fs;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use vtt_translate::app_config::Config;
use vtt_translate::app_controller::Controller;
use vtt_translate::source::{SourceFetcher, SourceKind, classify, fetcher_for};
use vtt_translate::translation::Translator;
use crate::common::{self, mock_translators::MockTranslator};

/// Fetcher serving a fixed document for one location
struct StaticFetcher {
    location: &'static str,
    body: &'static str,
}

#[async_trait]
impl SourceFetcher for StaticFetcher {
    async fn fetch_text(&self, location: &str) -> Result<String> {
        if location == self.location {
            Ok(self.body.to_string())
        } else {
            Err(anyhow!("404: {}", location))
        }
    }
}

/// Test a local file is consolidated, translated and written
#[tokio::test]
async fn test_run_withLocalFile_shouldWriteTranslatedTrack() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_captions(temp_dir.path(), "en.vtt")?;
    let output = temp_dir.path().join("out").join("es.vtt");

    let controller = Controller::with_config(Config::default())?;
    let translator = MockTranslator::tagging();
    controller.run(
        input.to_str().ok_or_else(|| anyhow!("non-utf8 path"))?,
        Some(output.as_path()),
        Some(&translator as &dyn Translator),
        false,
    ).await?;

    let written = fs::read_to_string(&output)?;
    assert!(written.starts_with("WEBVTT\n\n1\n"));
    assert!(written.contains("[es] Hello world."));
    assert_eq!(translator.call_count(), 3);
    Ok(())
}

/// Test an existing output is left alone without force
#[tokio::test]
async fn test_run_withExistingOutput_shouldSkipUnlessForced() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_captions(temp_dir.path(), "en.vtt")?;
    let output = common::create_test_file(temp_dir.path(), "es.vtt", "keep me")?;
    let input = input.to_str().ok_or_else(|| anyhow!("non-utf8 path"))?;

    let controller = Controller::with_config(Config::default())?;

    controller.run(input, Some(output.as_path()), None, false).await?;
    assert_eq!(fs::read_to_string(&output)?, "keep me");

    controller.run(input, Some(output.as_path()), None, true).await?;
    assert_eq!(fs::read_to_string(&output)?, common::SAMPLE_CONSOLIDATED_VTT);
    Ok(())
}

/// Test a missing input file is reported
#[tokio::test]
async fn test_run_withMissingInput_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let missing = temp_dir.path().join("missing.vtt");
    let output = temp_dir.path().join("out.vtt");

    let controller = Controller::with_config(Config::default())?;
    let result = controller.run(
        missing.to_str().ok_or_else(|| anyhow!("non-utf8 path"))?,
        Some(output.as_path()),
        None,
        false,
    ).await;

    assert!(result.is_err());
    assert!(!output.exists());
    Ok(())
}

/// Test any fetcher can feed the pipeline
#[tokio::test]
async fn test_run_with_fetcher_withRemoteLocation_shouldUseFetcher() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let output = temp_dir.path().join("es.vtt");
    let fetcher = StaticFetcher {
        location: "https://example.com/text/en.vtt",
        body: common::SAMPLE_VTT,
    };

    let controller = Controller::with_config(Config::default())?;
    controller.run_with_fetcher(&fetcher, "https://example.com/text/en.vtt", Some(output.as_path()), None, false).await?;
    assert_eq!(fs::read_to_string(&output)?, common::SAMPLE_CONSOLIDATED_VTT);

    let result = controller.run_with_fetcher(&fetcher, "https://example.com/other.vtt", Some(output.as_path()), None, true).await;
    assert!(result.is_err());
    Ok(())
}

/// Test locations are routed to the right fetcher
#[test]
fn test_fetcher_for_withVariousLocations_shouldClassify() {
    assert_eq!(classify("http://example.com/en.vtt").unwrap(), SourceKind::Remote);
    assert_eq!(classify("/tmp/en.vtt").unwrap(), SourceKind::Local);
    assert!(fetcher_for("https://example.com/en.vtt", 5).is_ok());
    assert!(fetcher_for("s3://bucket/en.vtt", 5).is_err());
}
