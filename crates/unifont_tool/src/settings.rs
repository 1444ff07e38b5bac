use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

const SETTINGS_FILE: &str = "unifont.toml";

/// Vertical metrics of a font project. `baseline` counts pixels up from the
/// bottom of a `size` pixel cell; the other metrics count from the baseline,
/// `descender` downwards.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ProjectSettings {
    pub size: usize,
    pub baseline: i32,
    pub cap_height: i32,
    pub x_height: i32,
    pub descender: i32,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            size: 16,
            baseline: 2,
            cap_height: 10,
            x_height: 8,
            descender: 2,
        }
    }
}

impl ProjectSettings {
    /// Loads `path` if given, otherwise the settings file in the configuration directory.
    /// A missing default file yields the default settings.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        if let Some(file) = Self::default_file() {
            if file.exists() {
                return Self::from_file(&file);
            }
        }
        Ok(Self::default())
    }

    pub fn default_file() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "GitHub", "unifont").map(|proj_dirs| proj_dirs.config_dir().join(SETTINGS_FILE))
    }

    fn from_file(path: &Path) -> anyhow::Result<Self> {
        let txt = fs::read_to_string(path)?;
        let settings = toml::from_str(&txt)?;
        log::info!("loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Guide lines as `(row, label)`, top to bottom. A guide at `row` runs
    /// along the top edge of that row; `size` is the bottom edge of the cell.
    /// Guides outside of the cell are left out.
    pub fn guide_lines(&self) -> Vec<(usize, &'static str)> {
        let baseline = self.size as i32 - self.baseline;
        let mut result: Vec<(usize, &'static str)> = [
            (baseline - self.cap_height, "cap height"),
            (baseline - self.x_height, "x height"),
            (baseline, "baseline"),
            (baseline + self.descender, "descender"),
        ]
        .into_iter()
        .filter_map(|(row, label)| usize::try_from(row).ok().filter(|&row| row <= self.size).map(|row| (row, label)))
        .collect();
        result.sort_by_key(|(row, _)| *row);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings() {
        let settings: ProjectSettings = toml::from_str("baseline = 4\ncap_height = 9\n").unwrap();
        assert_eq!(settings.baseline, 4);
        assert_eq!(settings.cap_height, 9);
        assert_eq!(settings.size, 16);
    }

    #[test]
    fn test_guide_lines() {
        let settings = ProjectSettings::default();
        assert_eq!(
            settings.guide_lines(),
            vec![(4, "cap height"), (6, "x height"), (14, "baseline"), (16, "descender")]
        );

        let settings = ProjectSettings {
            baseline: 0,
            cap_height: 20,
            ..Default::default()
        };
        assert_eq!(settings.guide_lines(), vec![(8, "x height"), (16, "baseline")]);
    }
}
