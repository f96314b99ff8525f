use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// Project-level configuration. The directory layout below `project_dir`
/// is fixed by convention: `public/audio/<book>` for LRC and audio
/// assets, `src/data/lessons` for lesson JSON, `src/data/curriculum.json`
/// for the shared manifest.
#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default = "default_project_dir")]
    pub project_dir: String,
}

fn default_project_dir() -> String {
    ".".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            project_dir: default_project_dir(),
        }
    }
}

impl Config {
    pub fn audio_dir(&self, book_id: &str) -> PathBuf {
        PathBuf::from(&self.project_dir)
            .join("public/audio")
            .join(book_id)
    }

    pub fn lessons_dir(&self) -> PathBuf {
        PathBuf::from(&self.project_dir).join("src/data/lessons")
    }

    pub fn curriculum_path(&self) -> PathBuf {
        PathBuf::from(&self.project_dir).join("src/data/curriculum.json")
    }
}

/// Load configuration from a TOML file. A missing file is not an error;
/// the fixed conventions then apply to the current directory.
pub fn load_config_from_file(file_path: &str) -> Result<Config, String> {
    if !PathBuf::from(file_path).exists() {
        return Ok(Config::default());
    }
    match fs::read_to_string(file_path) {
        Ok(contents) => match toml::from_str::<Config>(&contents) {
            Ok(loaded_config) => {
                let path = PathBuf::from(&loaded_config.project_dir);
                if path.is_dir() {
                    Ok(loaded_config)
                } else {
                    Err(format!(
                        "Error: project_dir specified in {} ('{}') is not a valid directory.",
                        file_path, loaded_config.project_dir
                    ))
                }
            }
            Err(e) => Err(format!("Failed to parse {}: {}", file_path, e)),
        },
        Err(e) => Err(format!("Failed to read {}: {}", file_path, e)),
    }
}
