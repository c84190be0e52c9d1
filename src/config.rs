use crate::error::{AnalysisError, Result};
use crate::pipeline::services::image::analysis::config::{
    SegmentationConfig, DEFAULT_OVERLAY_OPACITY, MAX_OVERLAY_OPACITY, MIN_OVERLAY_OPACITY,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "PROCELL";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub overlay_opacity: f32,
    pub output_dir: PathBuf,
    pub log_level: String,
    pub draw_region_outlines: bool,
    pub segmentation: SegmentationConfig,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            overlay_opacity: DEFAULT_OVERLAY_OPACITY,
            output_dir: PathBuf::from("."),
            log_level: "info".to_string(),
            draw_region_outlines: true,
            segmentation: SegmentationConfig::default(),
        }
    }
}

impl Configuration {
    /// Layers an optional TOML/YAML/JSON file and `PROCELL__*` environment
    /// variables over the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let configuration: Configuration = builder.build()?.try_deserialize()?;
        configuration.validate()?;
        Ok(configuration)
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_OVERLAY_OPACITY..=MAX_OVERLAY_OPACITY).contains(&self.overlay_opacity) {
            return Err(AnalysisError::InvalidConfig(format!(
                "Overlay opacity must be between {} and {}",
                MIN_OVERLAY_OPACITY, MAX_OVERLAY_OPACITY
            )));
        }
        if self.log_level.parse::<tracing::Level>().is_err() {
            return Err(AnalysisError::InvalidConfig(format!(
                "Unknown log level '{}'",
                self.log_level
            )));
        }
        self.segmentation
            .validate()
            .map_err(AnalysisError::InvalidConfig)
    }

    pub fn log_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_validate() {
        let configuration = Configuration::default();
        assert!(configuration.validate().is_ok());
        assert_eq!(configuration.log_level(), tracing::Level::INFO);
    }

    #[test]
    fn load_reads_partial_toml_over_defaults() {
        let path = std::env::temp_dir().join(format!("procell-{}.toml", uuid::Uuid::new_v4()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "overlay_opacity = 0.6\n\n[segmentation]\nmax_width = 640\n\n[segmentation.erythema]\nmin_red_dominance = 0.2"
        )
        .unwrap();

        let configuration = Configuration::load(Some(&path)).unwrap();
        assert_eq!(configuration.overlay_opacity, 0.6);
        assert_eq!(configuration.segmentation.max_width, 640);
        assert_eq!(configuration.segmentation.erythema.min_red_dominance, 0.2);
        assert_eq!(configuration.segmentation.erythema.min_red, 120);
        assert_eq!(configuration.segmentation.regions.len(), 5);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn environment_overrides_defaults() {
        std::env::set_var("PROCELL__LOG_LEVEL", "debug");
        std::env::set_var("PROCELL__DRAW_REGION_OUTLINES", "false");
        std::env::set_var("PROCELL__SEGMENTATION__TEXTURE__SAMPLE_STRIDE", "12");

        let loaded = Configuration::load(None);

        std::env::remove_var("PROCELL__LOG_LEVEL");
        std::env::remove_var("PROCELL__DRAW_REGION_OUTLINES");
        std::env::remove_var("PROCELL__SEGMENTATION__TEXTURE__SAMPLE_STRIDE");

        let configuration = loaded.unwrap();
        assert_eq!(configuration.log_level(), tracing::Level::DEBUG);
        assert!(!configuration.draw_region_outlines);
        assert_eq!(configuration.segmentation.texture.sample_stride, 12);
        assert_eq!(configuration.segmentation.max_width, 900);
    }

    #[test]
    fn out_of_range_opacity_is_rejected() {
        let configuration = Configuration {
            overlay_opacity: 0.99,
            ..Configuration::default()
        };
        assert!(matches!(
            configuration.validate(),
            Err(AnalysisError::InvalidConfig(_))
        ));
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let configuration = Configuration {
            log_level: "chatty".to_string(),
            ..Configuration::default()
        };
        assert!(configuration.validate().is_err());
    }
}
