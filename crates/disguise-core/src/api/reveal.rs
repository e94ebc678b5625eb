use std::path::{Path, PathBuf};

use crate::commands;
use crate::DisguiseError;

pub fn prepare() -> RevealApi {
    RevealApi::default()
}

#[derive(Default, Debug)]
pub struct RevealApi {
    suspect: Option<PathBuf>,
    output_folder: Option<PathBuf>,
}

impl RevealApi {
    pub fn with_suspect<A: AsRef<Path>>(mut self, suspect: A) -> Self {
        self.suspect = Some(suspect.as_ref().to_path_buf());
        self
    }

    pub fn with_output_folder<A: AsRef<Path>>(mut self, output_folder: A) -> Self {
        self.output_folder = Some(output_folder.as_ref().to_path_buf());
        self
    }

    /// Runs the extraction and returns the path of the recovered payload.
    pub fn execute(self) -> Result<PathBuf, DisguiseError> {
        let Some(suspect) = self.suspect else {
            return Err(DisguiseError::SuspectNotSet);
        };
        let Some(output_folder) = self.output_folder else {
            return Err(DisguiseError::TargetNotSet);
        };

        commands::reveal(&suspect, &output_folder)
    }
}
