use std::path::{Path, PathBuf};

use crate::commands;
use crate::composer::{ComposeOptions, Strategy};
use crate::DisguiseError;

pub fn prepare() -> DisguiseApi {
    DisguiseApi::default()
}

#[derive(Default, Debug)]
pub struct DisguiseApi {
    payload: Option<PathBuf>,
    cover: Option<PathBuf>,
    format: Option<String>,
    output_folder: Option<PathBuf>,
    options: ComposeOptions,
}

impl DisguiseApi {
    pub fn with_options(mut self, options: ComposeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.options.strategy = strategy;
        self
    }

    pub fn with_payload<A: AsRef<Path>>(mut self, payload: A) -> Self {
        self.payload = Some(payload.as_ref().to_path_buf());
        self
    }

    pub fn with_cover<A: AsRef<Path>>(mut self, cover: A) -> Self {
        self.cover = Some(cover.as_ref().to_path_buf());
        self
    }

    /// Set the output format tag, for example `"jpg"` or `"png"`.
    pub fn with_format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }

    /// Set the format tag only when one was given, keeping the default
    /// (`"jpg"`) otherwise.
    pub fn use_format<S: AsRef<str>>(mut self, format: Option<S>) -> Self {
        self.format = format.map(|s| s.as_ref().to_string());
        self
    }

    pub fn with_output_folder<A: AsRef<Path>>(mut self, output_folder: A) -> Self {
        self.output_folder = Some(output_folder.as_ref().to_path_buf());
        self
    }

    pub fn execute(self) -> Result<PathBuf, DisguiseError> {
        let Some(payload) = self.payload else {
            return Err(DisguiseError::PayloadNotSet);
        };
        let Some(cover) = self.cover else {
            return Err(DisguiseError::CoverNotSet);
        };
        let Some(output_folder) = self.output_folder else {
            return Err(DisguiseError::TargetNotSet);
        };
        let format = self.format.unwrap_or_else(|| "jpg".to_string());

        commands::disguise(&payload, &cover, &format, &output_folder, self.options)
    }
}
