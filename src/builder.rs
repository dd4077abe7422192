//! Session builder
//!
//! Combines a dataset source, configuration and an initial selection into
//! a [`MapSession`].

use crate::config::Config;
use crate::error::{GeoclusterError, Result};
use crate::selection::SelectionState;
use crate::session::MapSession;
use crate::store::{DatasetLoader, PointStore};
use std::path::PathBuf;

#[derive(Debug)]
enum DatasetInput {
    Empty,
    Store(PointStore),
    Path(PathBuf),
}

/// Builder for [`MapSession`] with a dataset file or an already loaded store.
#[derive(Debug)]
pub struct SessionBuilder {
    dataset: DatasetInput,
    config: Config,
    selection: SelectionState,
}

impl SessionBuilder {
    /// Create a new builder with default configuration and an empty dataset.
    pub fn new() -> Self {
        Self {
            dataset: DatasetInput::Empty,
            config: Config::default(),
            selection: SelectionState::default(),
        }
    }

    /// Load the dataset from a file when building.
    pub fn dataset_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.dataset = DatasetInput::Path(path.into());
        self
    }

    /// Use an already loaded store.
    pub fn store(mut self, store: PointStore) -> Self {
        self.dataset = DatasetInput::Store(store);
        self
    }

    /// Set glyph, viewport and cache settings.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Initial category and precision selection.
    pub fn selection(mut self, selection: SelectionState) -> Self {
        self.selection = selection;
        self
    }

    /// Validate the configuration, load the dataset and create the session.
    pub fn build(self) -> Result<MapSession> {
        self.config
            .validate()
            .map_err(GeoclusterError::InvalidInput)?;

        let store = match self.dataset {
            DatasetInput::Empty => PointStore::default(),
            DatasetInput::Store(store) => store,
            DatasetInput::Path(path) => {
                let loader = DatasetLoader::new()
                    .warn_on_invalid_coordinates(self.config.warn_on_invalid_coordinates);
                PointStore::from_records(loader.load_path(&path)?)?
            }
        };

        log::info!(
            "session ready: {} points, {} categories present",
            store.len(),
            store.categories().len()
        );

        Ok(MapSession::with_parts(store, self.config, self.selection))
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geocluster_types::precision::Precision;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_build_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": "a", "type": 1, "lat": 10.0, "lon": 20.0, "gh_3": "xyz"}}]"#
        )
        .unwrap();

        let session = SessionBuilder::new()
            .dataset_path(file.path())
            .selection(SelectionState::default().with_precision(Precision::level(3).unwrap()))
            .build()
            .unwrap();

        assert_eq!(session.store().len(), 1);
        assert_eq!(session.clusters().len(), 1);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = Config::default().with_fallback_center(0.0, 500.0);
        let result = SessionBuilder::new().config(config).build();
        assert!(matches!(result, Err(GeoclusterError::InvalidInput(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = SessionBuilder::new()
            .dataset_path("/definitely/not/here.json")
            .build();
        assert!(matches!(result, Err(GeoclusterError::Io(_))));
    }

    #[test]
    fn test_default_builder_is_empty() {
        let session = SessionBuilder::default().build().unwrap();
        assert!(session.store().is_empty());
        assert!(session.render().markers.is_empty());
    }
}
