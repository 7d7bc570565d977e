//! JSON configuration loading.
//!
//! The configuration document is a map of per-module sections. Unknown
//! sections and unknown keys warn and are otherwise ignored.

use log::warn;
use serde_json::Value;

use model::Error;

/// `general` configuration section.
#[derive(Debug, Clone)]
pub struct GeneralConfiguration {
    pub progress_bar: bool,
    pub log_level: Option<log::LevelFilter>,
    pub document_lang: Option<String>,
}

impl Default for GeneralConfiguration {
    fn default() -> Self {
        Self { progress_bar: true, log_level: None, document_lang: None }
    }
}

impl GeneralConfiguration {
    fn parse(value: &Value) -> Result<GeneralConfiguration, Error> {
        let mut config = GeneralConfiguration::default();
        let Some(map) = value.as_object() else {
            return Err(Error::Parse("general configuration must be an object".into()));
        };
        for (key, value) in map {
            match key.as_str() {
                "progress_bar" => {
                    config.progress_bar = value.as_bool().ok_or_else(|| {
                        Error::Parse("general.progress_bar must be a boolean".into())
                    })?;
                }
                "log_level" => {
                    let level = value.as_str().unwrap_or_default();
                    config.log_level = Some(match level {
                        "INFO" => log::LevelFilter::Info,
                        "WARN" => log::LevelFilter::Warn,
                        "ERROR" => log::LevelFilter::Error,
                        other => {
                            return Err(Error::Parse(format!("unknown log level: {other}")));
                        }
                    });
                }
                "document_lang" => {
                    config.document_lang = value.as_str().map(str::to_owned);
                }
                other => warn!("ignoring unknown configuration key general.{other}"),
            }
        }
        Ok(config)
    }
}

// `imsc_writer` and `stl_reader` are recognized section names whose
// modules are not part of this build; their keys are accepted and unused.
const KNOWN_SECTIONS: &[&str] = &[
    "general",
    "imsc_writer",
    "stl_reader",
    "scc_reader",
    "scc_writer",
    "srt_writer",
    "vtt_writer",
    "lcd",
    "isd",
];

/// All recognized configuration sections of a conversion.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    pub general: GeneralConfiguration,
    pub scc_reader: Option<scc::config::SccReaderConfiguration>,
    pub scc_writer: Option<scc::config::SccWriterConfiguration>,
    pub srt_writer: Option<srt::config::SrtWriterConfiguration>,
    pub vtt_writer: Option<vtt::config::VttWriterConfiguration>,
    raw: Option<Value>,
}

fn parse_section<T: serde::de::DeserializeOwned>(
    section: &str,
    value: &Value,
) -> Result<T, Error> {
    serde_json::from_value(value.clone())
        .map_err(|e| Error::Parse(format!("invalid {section} configuration: {e}")))
}

impl Configuration {
    pub fn from_json(text: &str) -> Result<Configuration, Error> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| Error::Parse(format!("invalid configuration JSON: {e}")))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Configuration, Error> {
        let mut config = Configuration::default();

        let Some(map) = value.as_object() else {
            return Err(Error::Parse("configuration must be a JSON object".into()));
        };

        for (section, section_value) in map {
            match section.as_str() {
                "general" => config.general = GeneralConfiguration::parse(section_value)?,
                "scc_reader" => {
                    config.scc_reader = Some(parse_section(section, section_value)?);
                }
                "scc_writer" => {
                    config.scc_writer = Some(parse_section(section, section_value)?);
                }
                "srt_writer" => {
                    config.srt_writer = Some(parse_section(section, section_value)?);
                }
                "vtt_writer" => {
                    config.vtt_writer = Some(parse_section(section, section_value)?);
                }
                known if KNOWN_SECTIONS.contains(&known) => {}
                other => warn!("ignoring unknown configuration section {other:?}"),
            }
        }

        config.raw = Some(value);
        config
            .validate_known_keys()
            .map(|()| config)
    }

    /// Filter configuration sections are looked up by filter name.
    pub fn filter_section(&self, name: &str) -> Option<&Value> {
        self.raw.as_ref().and_then(|v| v.get(name))
    }

    fn validate_known_keys(&self) -> Result<(), Error> {
        // serde tolerates unknown keys inside sections; surface them as
        // warnings the way unknown sections are
        let Some(map) = self.raw.as_ref().and_then(Value::as_object) else {
            return Ok(());
        };
        let known_keys: &[(&str, &[&str])] = &[
            ("scc_reader", &["text_align"]),
            (
                "scc_writer",
                &["allow_reflow", "force_popon", "rollup_lines", "frame_rate", "start_tc"],
            ),
            ("srt_writer", &["text_formatting"]),
            ("vtt_writer", &["line_position", "text_align", "cue_id"]),
            ("lcd", &["safe_area", "preserve_text_align", "color", "bg_color"]),
        ];
        for (section, keys) in known_keys {
            let Some(section_map) = map.get(*section).and_then(Value::as_object) else {
                continue;
            };
            for key in section_map.keys() {
                if !keys.contains(&key.as_str()) {
                    warn!("ignoring unknown configuration key {section}.{key}");
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_recognized_sections() {
        let config = Configuration::from_json(
            r#"{
                "general": {"progress_bar": false, "log_level": "WARN"},
                "scc_reader": {"text_align": "center"},
                "srt_writer": {"text_formatting": false}
            }"#,
        )
        .unwrap();

        assert!(!config.general.progress_bar);
        assert_eq!(config.general.log_level, Some(log::LevelFilter::Warn));
        assert!(!config.srt_writer.unwrap().text_formatting);
    }

    #[test]
    fn unknown_sections_are_ignored() {
        let config = Configuration::from_json(r#"{"nonsense": {"a": 1}}"#).unwrap();
        assert!(config.general.progress_bar);
    }

    #[test]
    fn malformed_sections_are_parse_errors() {
        assert!(Configuration::from_json(r#"{"general": {"progress_bar": "yes"}}"#).is_err());
        assert!(Configuration::from_json("[1, 2]").is_err());
    }
}
