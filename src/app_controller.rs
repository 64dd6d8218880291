use anyhow::{Result, Context};
use log::{warn, info, debug};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Instant;

use crate::app_config::Config;
use crate::consolidator::Consolidator;
use crate::errors::VttError;
use crate::language_utils;
use crate::source::{self, SourceFetcher};
use crate::translation::{OverlayReport, Translator, overlay_translations};
use crate::vtt_processor::{self, Cue};

// @module: Application controller for caption processing

/// Result of running one caption track through the pipeline
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    /// Serialized WebVTT output
    pub vtt: String,

    /// Cues found in the input
    pub input_cues: usize,

    /// Cues after consolidation
    pub output_cues: usize,

    /// Translation summary, `None` when translation was skipped
    pub report: Option<OverlayReport>,
}

/// Main application controller: fetch, parse, consolidate, translate, serialize
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Sentence regrouping state machine
    consolidator: Consolidator,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let consolidator = Consolidator::new(config.consolidation.clone());
        Ok(Self {
            config,
            consolidator,
        })
    }

    /// Configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parse a raw track and regroup its cues into sentences
    pub fn parse_and_consolidate(&self, raw: &str) -> Result<(usize, Vec<Cue>), VttError> {
        let track = vtt_processor::parse_track(raw)?;
        let consolidated = self.consolidator.consolidate(&track.cues)?;
        Ok((track.len(), consolidated))
    }

    /// Run the whole pipeline on raw WebVTT text.
    ///
    /// With no translator, or when source and target languages are the same,
    /// the consolidated cues are serialized untranslated.
    pub async fn process_text(&self, raw: &str, translator: Option<&dyn Translator>) -> Result<ProcessOutcome> {
        let (input_cues, mut cues) = self.parse_and_consolidate(raw)
            .context("Failed to process caption track")?;
        info!("Regrouped {} cues into {} sentences", input_cues, cues.len());

        let source_language = &self.config.source_language;
        let target_language = &self.config.target_language;

        let report = match translator {
            Some(_) if language_utils::language_codes_match(source_language, target_language) => {
                warn!("Source and target language are both '{}', skipping translation", target_language);
                None
            },
            Some(translator) => {
                let progress = Self::progress_bar(cues.len());
                let report = overlay_translations(
                    &mut cues,
                    translator,
                    source_language,
                    target_language,
                    self.config.translation.optimal_concurrent_requests(),
                    |done, _total| progress.set_position(done as u64),
                ).await;
                progress.finish_and_clear();
                Some(report)
            },
            None => None,
        };

        Ok(ProcessOutcome {
            vtt: vtt_processor::serialize_track(&cues),
            input_cues,
            output_cues: cues.len(),
            report,
        })
    }

    /// Fetch `location`, process it and write the result to `output` (stdout when `None`)
    pub async fn run(
        &self,
        location: &str,
        output: Option<&Path>,
        translator: Option<&dyn Translator>,
        force_overwrite: bool,
    ) -> Result<()> {
        let fetcher = source::fetcher_for(location, self.config.fetch_timeout_secs)?;
        self.run_with_fetcher(fetcher.as_ref(), location, output, translator, force_overwrite).await
    }

    /// Same as [`Controller::run`] with an explicit fetcher
    pub async fn run_with_fetcher(
        &self,
        fetcher: &dyn SourceFetcher,
        location: &str,
        output: Option<&Path>,
        translator: Option<&dyn Translator>,
        force_overwrite: bool,
    ) -> Result<()> {
        let start_time = Instant::now();

        if let Some(path) = output {
            if path.exists() && !force_overwrite {
                warn!("Skipping, output already exists (use -f to force overwrite): {}", path.display());
                return Ok(());
            }
        }

        let raw = fetcher.fetch_text(location).await?;
        debug!("Fetched {} bytes from {}", raw.len(), location);

        let outcome = self.process_text(&raw, translator).await?;

        match output {
            Some(path) => {
                Self::write_output(path, &outcome.vtt)?;
                info!("Success: {}", path.display());
            },
            None => print!("{}", outcome.vtt),
        }

        info!("Done in {:.1}s", start_time.elapsed().as_secs_f64());
        Ok(())
    }

    fn write_output(path: &Path, vtt: &str) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, vtt)
            .with_context(|| format!("Failed to write captions to {}", path.display()))
    }

    fn progress_bar(total: usize) -> ProgressBar {
        let progress = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} Translating [{bar:40.cyan/blue}] {pos}/{len} cues ({eta})")
        {
            progress.set_style(style.progress_chars("#>-"));
        }
        progress
    }
}
