use crate::events::PreviewEvent;
use async_channel::Sender;
use directories::ProjectDirs;
use donut::chart::{DonutProps, Viewport};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct PreviewSettings {
    #[serde(default)]
    pub container_width: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub chart: DonutProps,
    #[serde(default)]
    pub preview: PreviewSettings,
}

impl Config {
    /// The pixel width the chart's container would measure at.
    ///
    /// Percentage sizes follow the viewport once one is known; anything else
    /// uses the configured width, falling back to the ring size.
    pub fn container_width(&self, viewport: Option<Viewport>) -> f64 {
        match (viewport, self.preview.container_width) {
            (Some(vp), _) if self.chart.unit.as_str() == "%" => vp.width * self.chart.size / 100.0,
            (_, Some(width)) => width,
            _ => self.chart.size,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "donut", "donut").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => get_config_path(),
    }
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("DONUT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn write_default_config(path: &Path) -> std::io::Result<PathBuf> {
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(path, DEFAULT_CONFIG)?;
    }
    Ok(path.to_path_buf())
}

pub const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

pub async fn run_async_watcher(tx: Sender<PreviewEvent>, config_path: PathBuf) {
    let config_dir = match config_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    // notify reports paths under the directory as it was watched
    let config_dir = fs_err::canonicalize(&config_dir).unwrap_or(config_dir);
    let Some(config_path) = config_path.file_name().map(|name| config_dir.join(name)) else {
        log::error!("Config path {} has no file name", config_path.display());
        return;
    };

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                if touches_config(&event, &config_path)
                    && tx.send(PreviewEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

fn touches_config(event: &notify::Event, config_path: &Path) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|p| p == config_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use donut::chart::{LegendPlacement, Unit};

    fn parse(toml: &str) -> Config {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_default_config_parses() {
        let config = parse(DEFAULT_CONFIG);

        assert_eq!(config.chart.sections.len(), 3);
        assert_eq!(config.chart.total, Some(100.0));
        assert_eq!(config.chart.legend_placement, LegendPlacement::Right);
        assert_eq!(config.chart.section_hover_class.as_deref(), Some("hovered"));
        assert!(config.chart.has_legend);
        assert!(config.chart.validate().is_ok());
        assert_eq!(config.preview.container_width, Some(250.0));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse("");
        assert_eq!(config.chart, DonutProps::default());
        assert_eq!(config.container_width(None), 250.0);
    }

    #[test]
    fn test_container_width() {
        let mut config = parse(
            r#"
            [chart]
            size = 50
            unit = "%"
            "#,
        );
        assert_eq!(config.chart.unit, Unit::new("%"));
        assert_eq!(config.container_width(None), 50.0);
        assert_eq!(
            config.container_width(Some(Viewport::new(800.0, 600.0))),
            400.0
        );

        config.chart.unit = Unit::new("px");
        config.preview.container_width = Some(120.0);
        assert_eq!(
            config.container_width(Some(Viewport::new(800.0, 600.0))),
            120.0
        );
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let config = load_config(Path::new("/nonexistent/donut/config.toml")).unwrap();
        assert!(config.chart.sections.is_empty());
    }

    #[test]
    fn test_touches_config_compares_full_path() {
        use notify::event::{AccessKind, CreateKind, ModifyKind};

        let config_path = Path::new("/home/user/.config/donut/config.toml");
        let event =
            |kind, path: &str| notify::Event::new(kind).add_path(PathBuf::from(path));

        assert!(touches_config(
            &event(EventKind::Modify(ModifyKind::Any), "/home/user/.config/donut/config.toml"),
            config_path
        ));
        assert!(touches_config(
            &event(EventKind::Create(CreateKind::File), "/home/user/.config/donut/config.toml"),
            config_path
        ));
        assert!(!touches_config(
            &event(EventKind::Modify(ModifyKind::Any), "/home/user/.config/other/config.toml"),
            config_path
        ));
        assert!(!touches_config(
            &event(EventKind::Modify(ModifyKind::Any), "/home/user/.config/donut/config.toml.bak"),
            config_path
        ));
        assert!(!touches_config(
            &event(EventKind::Access(AccessKind::Any), "/home/user/.config/donut/config.toml"),
            config_path
        ));
    }
}
