//! Class registry: ordered class names with stable integer indices.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::ids::ClassId;
use crate::error::BoxlabelError;

/// Ordered list of class names; a name's position is its wire id.
///
/// The registry also tracks which class new rectangles are tagged with.
/// Rectangles already placed keep their ids when the registry reloads.
#[derive(Clone, Debug, Default)]
pub struct ClassRegistry {
    names: Vec<String>,
    selected: ClassId,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding `names`.
    pub fn with_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = Self::new();
        registry.load(names);
        registry
    }

    /// Replaces every name and resets the selected class to 0.
    pub fn load<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names = names.into_iter().map(Into::into).collect();
        self.selected = ClassId::default();
    }

    /// Returns the class name, or the raw id as text when no name exists.
    pub fn name_for(&self, class_id: ClassId) -> String {
        self.names
            .get(class_id.index())
            .cloned()
            .unwrap_or_else(|| class_id.to_string())
    }

    /// Class that newly drawn rectangles are tagged with.
    pub fn selected(&self) -> ClassId {
        self.selected
    }

    /// Selects the class for new rectangles.
    ///
    /// Ids past the end of a non-empty registry are refused and leave the
    /// selection unchanged; with no names loaded only class 0 is accepted.
    pub fn select(&mut self, class_id: ClassId) -> bool {
        let limit = self.names.len().max(1);
        if class_id.index() >= limit {
            return false;
        }
        self.selected = class_id;
        true
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Loads names from a `classes.txt` or YOLO `data.yaml` file.
    ///
    /// Files ending in `.yaml`/`.yml` are read as `data.yaml`; anything else
    /// is treated as one name per line.
    pub fn from_file(path: &Path) -> Result<Self, BoxlabelError> {
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
            .unwrap_or(false);

        let names = if is_yaml {
            read_data_yaml_names(path)?
        } else {
            read_classes_txt(path)?
        };
        Ok(Self::with_names(names))
    }
}

/// Reads one class name per line.
///
/// Trailing blank lines are ignored; a blank line between names would shift
/// every following index and is rejected.
pub fn read_classes_txt(path: &Path) -> Result<Vec<String>, BoxlabelError> {
    let data = fs::read_to_string(path).map_err(|source| BoxlabelError::ReadText {
        path: path.to_path_buf(),
        source,
    })?;
    parse_classes_txt(&data).map_err(|message| BoxlabelError::ClassesTxtInvalid {
        path: path.to_path_buf(),
        message,
    })
}

fn parse_classes_txt(data: &str) -> Result<Vec<String>, String> {
    let lines: Vec<&str> = data.trim_end().lines().collect();
    let mut names = Vec::with_capacity(lines.len());

    for (line_idx, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Err(format!("line {} is empty", line_idx + 1));
        }
        names.push(trimmed.to_string());
    }

    Ok(names)
}

#[derive(Debug, Deserialize)]
struct DataYaml {
    names: DataYamlNames,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DataYamlNames {
    Sequence(Vec<String>),
    Mapping(BTreeMap<usize, String>),
}

/// Reads the `names:` entry of a YOLO `data.yaml`.
///
/// Both the list form and the `index: name` mapping form are accepted; gaps
/// in a mapping are filled with `class_<index>`.
pub fn read_data_yaml_names(path: &Path) -> Result<Vec<String>, BoxlabelError> {
    let data = fs::read_to_string(path).map_err(|source| BoxlabelError::ReadText {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: DataYaml =
        serde_yaml::from_str(&data).map_err(|source| BoxlabelError::DataYamlParse {
            path: path.to_path_buf(),
            source,
        })?;

    let names = match parsed.names {
        DataYamlNames::Sequence(names) => names,
        DataYamlNames::Mapping(mapping) => {
            let Some(max_index) = mapping.keys().max().copied() else {
                return Ok(Vec::new());
            };
            let mut names = vec![String::new(); max_index + 1];
            for (index, name) in mapping {
                names[index] = name;
            }
            for (index, name) in names.iter_mut().enumerate() {
                if name.trim().is_empty() {
                    *name = format!("class_{}", index);
                }
            }
            names
        }
    };

    Ok(names)
}
